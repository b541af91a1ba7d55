//! Attendance/Assignment state.
//!
//! One value owns everything that changes when the roster changes. All
//! fields start empty; [`SessionState::replace`] swaps them together.

use std::sync::Arc;

use assignment::{Assignment, PlanSource};
use data_loader::{Diner, DinerLookup, WaiterId};
use enrichment::DerivedCache;
use tracing::info;

#[derive(Debug, Default)]
pub struct SessionState {
    /// Present waiters, sorted, no duplicates
    pub roster: Vec<WaiterId>,
    pub assignment: Assignment,
    /// Diners appearing in `assignment`, by name
    pub diners: DinerLookup,
    pub cache: DerivedCache,
    /// How the current assignment was produced; `None` before the first update
    pub source: Option<PlanSource>,
}

impl SessionState {
    /// Install a new assignment and drop every derived value
    pub fn replace(
        &mut self,
        roster: Vec<WaiterId>,
        assignment: Assignment,
        diners: DinerLookup,
        source: PlanSource,
    ) {
        info!(
            "Installing assignment: {} waiters, {} tables, {} diners",
            roster.len(),
            assignment.total_tables(),
            diners.len()
        );
        self.roster = roster;
        self.assignment = assignment;
        self.diners = diners;
        self.source = Some(source);
        self.cache.clear_all();
    }

    pub fn diner(&self, name: &str) -> Option<Arc<Diner>> {
        self.diners.get(name).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_empty() {
        let state = SessionState::default();
        assert!(state.roster.is_empty());
        assert!(state.assignment.is_empty());
        assert!(state.diners.is_empty());
        assert!(state.source.is_none());
        assert!(state.diner("Ana").is_none());
    }

    #[test]
    fn test_replace_swaps_everything() {
        let mut state = SessionState::default();
        let mut diners = DinerLookup::new();
        diners.insert(
            "Ana".to_string(),
            Arc::new(Diner {
                name: "Ana".to_string(),
                reservations: vec![],
                emails: vec![],
                reviews: vec![],
            }),
        );

        state.replace(
            vec![1, 2],
            Assignment::for_waiters(&[1, 2]),
            diners,
            PlanSource::Fallback {
                reason: "test".to_string(),
            },
        );

        assert_eq!(state.roster, vec![1, 2]);
        assert!(state.diner("Ana").is_some());
        assert!(state.source.as_ref().is_some_and(PlanSource::is_fallback));
    }
}
