// SPDX-FileCopyrightText: 2026 Relayr Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Parse/serialize boundary for string-encoded configuration lists.
//!
//! The config file stores lists as comma-separated strings and replacement
//! rules as `old->new` entries. Everything past this module works with
//! typed values; no other code touches the raw delimiter format.

use serde::{Deserialize, Serialize};

/// One ordered replacement rule. An empty `replace` deletes occurrences
/// of `find`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplaceRule {
    pub find: String,
    pub replace: String,
}

/// Parses a comma-separated word list: elements are whitespace-trimmed and
/// empties dropped. Order is preserved.
pub fn parse_word_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|w| !w.is_empty())
        .map(str::to_string)
        .collect()
}

/// Joins a word list back into the comma-separated wire form, dropping
/// duplicates (first occurrence wins) and empty elements.
pub fn join_word_list(words: &[String]) -> String {
    let mut seen = std::collections::HashSet::new();
    words
        .iter()
        .map(|w| w.trim())
        .filter(|w| !w.is_empty() && seen.insert(w.to_string()))
        .collect::<Vec<_>>()
        .join(",")
}

/// Parses the `old->new,old2->new2` replacement encoding.
///
/// Entries without `->` or with an empty `old` are skipped rather than
/// failing the whole parse; a half-written rule from the control UI must
/// never stall the pipeline.
pub fn parse_replacements(raw: &str) -> Vec<ReplaceRule> {
    raw.split(',')
        .filter_map(|entry| {
            let (find, replace) = entry.split_once("->")?;
            let find = find.trim();
            if find.is_empty() {
                return None;
            }
            Some(ReplaceRule {
                find: find.to_string(),
                replace: replace.trim().to_string(),
            })
        })
        .collect()
}

/// Serializes replacement rules back into the wire encoding.
pub fn join_replacements(rules: &[ReplaceRule]) -> String {
    rules
        .iter()
        .map(|r| format!("{}->{}", r.find, r.replace))
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_word_list_trims_and_drops_empties() {
        assert_eq!(
            parse_word_list(" spam , ads ,, promo "),
            vec!["spam", "ads", "promo"]
        );
        assert!(parse_word_list("").is_empty());
        assert!(parse_word_list(" , ,").is_empty());
    }

    #[test]
    fn join_word_list_removes_duplicates_preserving_order() {
        let words = vec![
            "spam".to_string(),
            "ads".to_string(),
            "spam".to_string(),
            " ".to_string(),
        ];
        assert_eq!(join_word_list(&words), "spam,ads");
    }

    #[test]
    fn parse_replacements_ordered() {
        let rules = parse_replacements("a->b, b->c");
        assert_eq!(
            rules,
            vec![
                ReplaceRule {
                    find: "a".into(),
                    replace: "b".into()
                },
                ReplaceRule {
                    find: "b".into(),
                    replace: "c".into()
                },
            ]
        );
    }

    #[test]
    fn parse_replacements_empty_new_means_delete() {
        let rules = parse_replacements("promo->");
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].find, "promo");
        assert!(rules[0].replace.is_empty());
    }

    #[test]
    fn parse_replacements_skips_malformed_entries() {
        let rules = parse_replacements("good->better,malformed,->nothing, also bad ");
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].find, "good");
        assert_eq!(rules[0].replace, "better");
    }

    #[test]
    fn replacements_round_trip() {
        let raw = "a->b,promo->";
        let rules = parse_replacements(raw);
        assert_eq!(join_replacements(&rules), raw);
    }
}
