//! Pure set arithmetic for layout reconciliation.
//!
//! The save path compares a client-submitted full snapshot against
//! persisted state. The deletion sets are computed here so they can be
//! tested without a database; the transactional apply lives in the db
//! crate.

use std::collections::HashSet;

use crate::types::DbId;

/// Ids present in storage but absent from the incoming snapshot: the rows
/// the new layout no longer contains and the save must delete.
pub fn stale_ids(persisted: impl IntoIterator<Item = DbId>, incoming: &HashSet<DbId>) -> Vec<DbId> {
    persisted
        .into_iter()
        .filter(|id| !incoming.contains(id))
        .collect()
}

/// Card ids captured when the layout was loaded that the incoming card
/// list no longer references. Pending (not yet persisted) cards never
/// appear in `current`, so they can never mask a deletion.
pub fn stale_card_ids(original: &[DbId], current: &[DbId]) -> Vec<DbId> {
    let keep: HashSet<DbId> = current.iter().copied().collect();
    original
        .iter()
        .copied()
        .filter(|id| !keep.contains(id))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stale_ids_keeps_order_and_drops_survivors() {
        let incoming: HashSet<DbId> = [2, 4].into_iter().collect();
        assert_eq!(stale_ids([1, 2, 3, 4, 5], &incoming), vec![1, 3, 5]);
    }

    #[test]
    fn stale_ids_empty_incoming_deletes_everything() {
        let incoming = HashSet::new();
        assert_eq!(stale_ids([7, 8], &incoming), vec![7, 8]);
    }

    #[test]
    fn stale_card_ids_computes_removed_cards() {
        // Card 10 was removed, card 11 retained, card 12 is brand new and
        // therefore absent from the original snapshot.
        assert_eq!(stale_card_ids(&[10, 11], &[11, 12]), vec![10]);
        assert_eq!(stale_card_ids(&[], &[1, 2]), Vec::<DbId>::new());
    }
}
