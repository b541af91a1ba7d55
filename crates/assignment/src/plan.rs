//! The [`Assignment`] type: which waiter serves which tables.

use data_loader::{ReservationRecord, WaiterId};
use serde::Serialize;
use std::collections::BTreeMap;

/// Mapping from waiter id to that waiter's tables.
///
/// Waiters are kept in ascending id order. Every waiter passed to
/// [`Assignment::for_waiters`] has an entry, even when it ends up empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Assignment {
    tables: BTreeMap<WaiterId, Vec<ReservationRecord>>,
}

impl Assignment {
    /// An assignment with an empty table list for each waiter
    pub fn for_waiters(waiters: &[WaiterId]) -> Self {
        Self {
            tables: waiters.iter().map(|&id| (id, Vec::new())).collect(),
        }
    }

    /// Give `record` to `waiter`, adding the waiter if needed
    pub fn push(&mut self, waiter: WaiterId, record: ReservationRecord) {
        self.tables.entry(waiter).or_default().push(record);
    }

    /// Waiter ids in ascending order
    pub fn waiters(&self) -> impl Iterator<Item = WaiterId> + '_ {
        self.tables.keys().copied()
    }

    /// Tables for one waiter (empty when the waiter is not on this assignment)
    pub fn tables(&self, waiter: WaiterId) -> &[ReservationRecord] {
        self.tables
            .get(&waiter)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// `(waiter, tables)` pairs in waiter order
    pub fn iter(&self) -> impl Iterator<Item = (WaiterId, &[ReservationRecord])> + '_ {
        self.tables.iter().map(|(&id, tables)| (id, tables.as_slice()))
    }

    /// Every assigned record
    pub fn records(&self) -> impl Iterator<Item = &ReservationRecord> + '_ {
        self.tables.values().flatten()
    }

    pub fn total_tables(&self) -> usize {
        self.tables.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Whether any waiter serves this diner
    pub fn contains_diner(&self, diner_name: &str) -> bool {
        self.records().any(|r| r.diner_name == diner_name)
    }

    /// Sort each waiter's tables by start time.
    ///
    /// The sort is stable, so tables starting at the same time keep their
    /// relative order and sorting twice changes nothing.
    pub fn sort_by_start_time(&mut self) {
        for tables in self.tables.values_mut() {
            tables.sort_by_key(|r| r.start_time);
        }
    }
}
