//! Fixed waiter name table.

use data_loader::WaiterId;

/// Name shown for ids missing from the table
pub const UNKNOWN_WAITER: &str = "Unknown Waiter";

const WAITER_NAMES: &[(WaiterId, &str)] = &[
    (1, "Sophie Martin"),
    (2, "Lucas Bernard"),
    (3, "Camille Dubois"),
    (4, "Hugo Laurent"),
    (5, "Chloé Moreau"),
    (6, "Louis Lefèvre"),
    (7, "Manon Girard"),
    (8, "Jules Fontaine"),
];

pub fn waiter_name(id: WaiterId) -> &'static str {
    WAITER_NAMES
        .iter()
        .find(|(known, _)| *known == id)
        .map(|(_, name)| *name)
        .unwrap_or(UNKNOWN_WAITER)
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_and_unknown_ids() {
        assert_eq!(waiter_name(1), "Sophie Martin");
        assert_eq!(waiter_name(0), UNKNOWN_WAITER);
        assert_eq!(waiter_name(42), UNKNOWN_WAITER);
    }

    #[test]
    fn test_staff_ids_are_unique() {
        let mut ids: Vec<WaiterId> = WAITER_NAMES.iter().map(|(id, _)| *id).collect();
        let total = ids.len();
        ids.dedup();
        assert_eq!(ids.len(), total);
    }
}
