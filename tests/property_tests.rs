//! Property-based tests for core domain types.
//!
//! These tests use proptest to verify invariants hold across
//! randomly generated inputs.

use std::time::{Duration, Instant};

use proptest::prelude::*;

use veridoc::core::pagination::Pager;
use veridoc::core::types::FileHash;
use veridoc::lookup::QueryDebouncer;

/// Strategy for generating valid 64-char lowercase hex hashes.
fn valid_hash_string() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop::sample::select(vec![
            '0', '1', '2', '3', '4', '5', '6', '7', '8', '9', 'a', 'b', 'c', 'd', 'e', 'f',
        ]),
        64,
    )
    .prop_map(|chars| chars.into_iter().collect())
}

/// Strategy for short query fragments, including non-ASCII.
fn query_fragment() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-z]{1,8}",
        Just("계약서".to_string()),
        Just("контракт".to_string()),
        Just(String::new()),
    ]
}

proptest! {
    /// Any valid hash round-trips through serde.
    #[test]
    fn file_hash_serde_roundtrip(s in valid_hash_string()) {
        let hash = FileHash::new(&s).unwrap();
        let json = serde_json::to_string(&hash).unwrap();
        let parsed: FileHash = serde_json::from_str(&json).unwrap();
        prop_assert_eq!(hash, parsed);
    }

    /// Exactly 64 hex chars validate; anything else is rejected. Case is
    /// normalized, never rejected.
    #[test]
    fn file_hash_validation_is_length_and_hex(s in "[0-9A-Fa-f]{0,100}") {
        match FileHash::new(&s) {
            Ok(hash) => {
                prop_assert_eq!(s.len(), 64);
                prop_assert_eq!(hash.as_str(), s.to_ascii_lowercase());
            }
            Err(_) => prop_assert_ne!(s.len(), 64),
        }
    }

    /// totalPages is always ceil(n / p), and at least 1.
    #[test]
    fn total_pages_is_ceiling(len in 0usize..10_000, page_size in 1usize..50) {
        let pager = Pager::new(page_size);
        let expected = if len == 0 { 1 } else { len.div_ceil(page_size) };
        prop_assert_eq!(pager.total_pages(len), expected);
    }

    /// Navigation always lands inside [1, totalPages].
    #[test]
    fn goto_always_clamps(
        len in 0usize..10_000,
        page_size in 1usize..50,
        target in 0usize..20_000,
    ) {
        let mut pager = Pager::new(page_size);
        pager.goto(target, len);
        let page = pager.current_page();
        prop_assert!(page >= 1);
        prop_assert!(page <= pager.total_pages(len));
    }

    /// Every element appears on exactly one page.
    #[test]
    fn pages_partition_the_list(len in 0usize..500, page_size in 1usize..20) {
        let items: Vec<usize> = (0..len).collect();
        let mut pager = Pager::new(page_size);

        let mut seen = Vec::new();
        for page in 1..=pager.total_pages(len) {
            pager.goto(page, len);
            seen.extend_from_slice(pager.slice(&items));
        }
        prop_assert_eq!(seen, items);
    }

    /// For any edit sequence, the debouncer forwards only the final value,
    /// and only after quiescence.
    #[test]
    fn debounce_forwards_only_final_value(edits in prop::collection::vec(query_fragment(), 1..10)) {
        let delay = Duration::from_millis(400);
        let mut deb = QueryDebouncer::new(delay);
        let t0 = Instant::now();

        // Edits arrive faster than the delay.
        let mut t = t0;
        for edit in &edits {
            deb.edit(edit.clone(), t);
            t += Duration::from_millis(10);
            // Nothing forwards while the value is still churning.
            prop_assert_eq!(deb.poll(t), None);
        }

        let settled = deb.poll(t + delay);
        let last = edits.last().unwrap();
        if last.is_empty() && edits.iter().all(|e| e.is_empty()) {
            // The raw value never changed from the initial empty string.
            prop_assert_eq!(settled, None);
        } else {
            prop_assert_eq!(settled, Some(last.clone()));
        }
        // At most once per settled value.
        prop_assert_eq!(deb.poll(t + delay * 4), None);
    }

    /// No intermediate composition value ever forwards.
    #[test]
    fn composition_suppresses_intermediates(
        intermediates in prop::collection::vec(query_fragment(), 1..8),
        final_value in "[a-z]{1,8}",
    ) {
        let delay = Duration::from_millis(400);
        let mut deb = QueryDebouncer::new(delay);
        let t0 = Instant::now();

        deb.composition_start();
        let mut t = t0;
        for value in &intermediates {
            deb.edit(value.clone(), t);
            t += Duration::from_millis(600); // well past the delay
            prop_assert_eq!(deb.poll(t), None);
        }
        deb.composition_end(final_value.clone(), t);

        // Only the value current at composition end forwards, immediately.
        prop_assert_eq!(deb.poll(t), Some(final_value));
        prop_assert_eq!(deb.poll(t + delay * 4), None);
    }
}
