//! Property-based tests for the reconciliation core.
//!
//! These tests use proptest to generate random desired/observed collections
//! and verify that the delta invariants hold for all possible inputs.

#[cfg(test)]
mod proptest_tests {
    use crate::reconcile::reconcile;
    use proptest::prelude::*;
    use std::collections::{HashMap, HashSet};

    #[derive(Debug, Clone, PartialEq, Eq)]
    struct Item {
        name: String,
        value: u8,
    }

    fn items(max_len: usize) -> impl Strategy<Value = Vec<Item>> {
        prop::collection::vec(("[a-e]{1,3}", any::<u8>()), 0..max_len).prop_map(|pairs| {
            // Deduplicate by name; descriptor collections are keyed sets.
            let mut seen = HashSet::new();
            pairs
                .into_iter()
                .filter(|(name, _)| seen.insert(name.clone()))
                .map(|(name, value)| Item { name, value })
                .collect()
        })
    }

    fn diff(
        desired: &[Item],
        observed: &[Item],
    ) -> crate::reconcile::Delta<Item> {
        reconcile(desired, observed, |i| i.name.clone(), |a, b| a == b)
    }

    proptest! {
        /// Property: every key of desired ∪ observed lands in exactly one of
        /// to_create / to_update / to_delete, or in neither side of the delta
        /// when the descriptors already match.
        #[test]
        fn partition_is_total_and_exclusive(desired in items(8), observed in items(8)) {
            let delta = diff(&desired, &observed);

            let create: HashSet<&str> = delta.to_create.iter().map(|i| i.name.as_str()).collect();
            let update: HashSet<&str> = delta.to_update.iter().map(|i| i.name.as_str()).collect();
            let delete: HashSet<&str> = delta.to_delete.iter().map(|i| i.name.as_str()).collect();

            // Pairwise disjoint.
            prop_assert!(create.is_disjoint(&update));
            prop_assert!(create.is_disjoint(&delete));
            prop_assert!(update.is_disjoint(&delete));

            let desired_keys: HashSet<&str> = desired.iter().map(|i| i.name.as_str()).collect();
            let observed_map: HashMap<&str, &Item> =
                observed.iter().map(|i| (i.name.as_str(), i)).collect();

            for item in &desired {
                let key = item.name.as_str();
                match observed_map.get(key) {
                    None => prop_assert!(create.contains(key)),
                    Some(have) if *have != item => prop_assert!(update.contains(key)),
                    Some(_) => {
                        prop_assert!(!create.contains(key));
                        prop_assert!(!update.contains(key));
                        prop_assert!(!delete.contains(key));
                    }
                }
            }
            for item in &observed {
                let key = item.name.as_str();
                if !desired_keys.contains(key) {
                    prop_assert!(delete.contains(key));
                }
            }
        }

        /// Property: reconcile is deterministic (same inputs, same delta).
        #[test]
        fn reconcile_is_deterministic(desired in items(8), observed in items(8)) {
            let first = diff(&desired, &observed);
            let second = diff(&desired, &observed);
            prop_assert_eq!(first, second);
        }

        /// Property: applying the delta in memory converges: reconciling the
        /// simulated post-apply state against the same desired state yields an
        /// empty delta.
        #[test]
        fn apply_then_reconcile_is_empty(desired in items(8), observed in items(8)) {
            let delta = diff(&desired, &observed);

            // Simulate apply: drop deletes, replace updates, add creates.
            let deleted: HashSet<String> =
                delta.to_delete.iter().map(|i| i.name.clone()).collect();
            let updated: HashMap<String, Item> =
                delta.to_update.iter().map(|i| (i.name.clone(), i.clone())).collect();

            let mut next: Vec<Item> = observed
                .iter()
                .filter(|i| !deleted.contains(&i.name))
                .map(|i| updated.get(&i.name).cloned().unwrap_or_else(|| i.clone()))
                .collect();
            next.extend(delta.to_create.iter().cloned());

            let second = diff(&desired, &next);
            prop_assert!(second.is_empty(), "second delta not empty: {:?}", second);
        }

        /// Property: with an empty desired set, everything observed is deleted.
        #[test]
        fn empty_desired_tears_down_everything(observed in items(8)) {
            let delta = diff(&[], &observed);
            prop_assert!(delta.to_create.is_empty());
            prop_assert!(delta.to_update.is_empty());
            prop_assert_eq!(delta.to_delete.len(), observed.len());
        }
    }
}
