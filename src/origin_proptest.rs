//! Property-based tests for the origin list parser.
//!
//! These tests use proptest to generate random origin lists and verify that
//! parsing is total on well-formed input, injective on the origin tuple, and
//! never silently drops a malformed entry.

#[cfg(test)]
mod proptest_tests {
    use crate::origin::{parse, Origin};
    use proptest::prelude::*;
    use std::collections::BTreeSet;

    fn segment() -> impl Strategy<Value = String> {
        "[a-z][a-z0-9.-]{0,12}"
    }

    fn entry() -> impl Strategy<Value = (String, String, String, String)> {
        (segment(), segment(), "[0-9]{1,2}\\.[0-9]{1,2}\\.[0-9]{1,2}", segment())
    }

    proptest! {
        /// Property: every well-formed entry yields exactly one origin
        #[test]
        fn parse_is_total_on_well_formed_entries(
            entries in prop::collection::vec(entry(), 0..8)
        ) {
            // Distinct locations, so no two entries collide.
            let encoded = entries
                .iter()
                .enumerate()
                .map(|(i, (g, a, v, p))| format!("{}:{}:{}:/origins/{}/{}", g, a, v, i, p))
                .collect::<Vec<_>>()
                .join(";");
            let origins = parse(&encoded).unwrap();
            prop_assert_eq!(origins.len(), entries.len());

            for (g, a, v, _) in &entries {
                let found = origins.values().any(|o: &Origin| {
                    &o.group_id == g && &o.artifact_id == a && &o.version == v
                });
                prop_assert!(found, "no origin for {}:{}:{}", g, a, v);
            }
        }

        /// Property: distinct tuples map to distinct origins
        #[test]
        fn parse_is_injective(entries in prop::collection::vec(entry(), 1..8)) {
            let encoded = entries
                .iter()
                .enumerate()
                .map(|(i, (g, a, v, p))| format!("{}:{}:{}:/origins/{}/{}", g, a, v, i, p))
                .collect::<Vec<_>>()
                .join(";");
            let origins = parse(&encoded).unwrap();
            let tuples: BTreeSet<String> = origins
                .values()
                .map(|o| format!("{}:{}", o, o.location))
                .collect();
            prop_assert_eq!(tuples.len(), origins.len());
        }

        /// Property: re-parsing the same list is deterministic
        #[test]
        fn parse_is_deterministic((g, a, v, p) in entry()) {
            let encoded = format!("{}:{}:{}:/origins/{}", g, a, v, p);
            prop_assert_eq!(parse(&encoded).unwrap(), parse(&encoded).unwrap());
        }

        /// Property: an entry with fewer than four fields is always rejected
        #[test]
        fn parse_rejects_short_entries(
            good in entry(),
            bad in prop::collection::vec(segment(), 1..4)
        ) {
            let (g, a, v, p) = good;
            let encoded = format!("{}:{}:{}:/origins/{};{}", g, a, v, p, bad.join(":"));
            prop_assert!(parse(&encoded).is_err());
        }

        /// Property: separators without entries are ignored
        #[test]
        fn parse_ignores_empty_segments(count in 0usize..5) {
            let encoded = ";".repeat(count);
            prop_assert!(parse(&encoded).unwrap().is_empty());
        }
    }
}
