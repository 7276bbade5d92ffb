// SPDX-FileCopyrightText: 2026 Relayr Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ordered literal text replacement.

use relayr_config::lists::ReplaceRule;
use relayr_core::StatsSink;

/// Applies the ordered replacement rules to `text`.
///
/// Rules are literal substring replacements, never regex. Later rules see
/// the output of earlier ones. One replacement event is recorded per rule
/// that actually matched, regardless of occurrence count.
pub fn apply_replacements(text: &str, rules: &[ReplaceRule], stats: &dyn StatsSink) -> String {
    let mut out = text.to_string();
    for rule in rules {
        if out.contains(&rule.find) {
            out = out.replace(&rule.find, &rule.replace);
            stats.record_replacement();
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use relayr_core::NoopStats;
    use std::sync::atomic::{AtomicU64, Ordering};

    struct CountingStats {
        replacements: AtomicU64,
    }

    impl StatsSink for CountingStats {
        fn record_message(&self, _success: bool, _has_media: bool) {}
        fn record_replacement(&self) {
            self.replacements.fetch_add(1, Ordering::Relaxed);
        }
        fn record_link_cleaned(&self) {}
        fn record_error(&self, _message: &str) {}
    }

    fn rules(raw: &str) -> Vec<ReplaceRule> {
        relayr_config::parse_replacements(raw)
    }

    #[test]
    fn replaces_all_occurrences_literally() {
        let out = apply_replacements("a.b a.b", &rules("a.b->x"), &NoopStats);
        assert_eq!(out, "x x");
    }

    #[test]
    fn rules_apply_in_order_and_see_earlier_output() {
        let out = apply_replacements("a", &rules("a->b,b->c"), &NoopStats);
        assert_eq!(out, "c");
    }

    #[test]
    fn empty_replacement_deletes() {
        let out = apply_replacements("buy promo now", &rules("promo ->"), &NoopStats);
        assert_eq!(out, "buy  now");
    }

    #[test]
    fn one_event_per_matching_rule() {
        let stats = CountingStats {
            replacements: AtomicU64::new(0),
        };
        apply_replacements("aa bb", &rules("a->x,b->y,zz->q"), &stats);
        // "zz" does not match; "a" and "b" each count once despite two hits.
        assert_eq!(stats.replacements.load(Ordering::Relaxed), 2);
    }
}
