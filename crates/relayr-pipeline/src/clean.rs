// SPDX-FileCopyrightText: 2026 Relayr Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Text cleaning sub-steps.
//!
//! Each sub-step is independently toggleable and applied in a fixed order:
//! links and mentions, hashtags, formatting markers, flagged lines, blank
//! lines. Whitespace normalization always runs last so cleaned output never
//! carries leftover gaps from the removals.

use std::sync::LazyLock;

use regex::Regex;
use relayr_core::StatsSink;

use crate::options::CleanOptions;

static URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"https?://\S+").unwrap());
static SHORTLINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bt\.me/\S+").unwrap());
static WWW_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bwww\.\S+").unwrap());
static BARE_DOMAIN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b[a-z0-9-]+\.(?:com|org|net|io|co|me|ly|gg|tv)\b(?:/\S*)?").unwrap()
});
static MENTION_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"@\w+").unwrap());
static HASHTAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"#\w+").unwrap());
static EMPHASIS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[*_~`]+").unwrap());
static HTML_TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").unwrap());
static EXCESS_NEWLINES_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n{3,}").unwrap());
static SPACE_RUN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[ \t]{2,}").unwrap());

/// Applies the enabled cleaning sub-steps to `text`.
///
/// One link-cleaned event is recorded when the link sub-step removed
/// anything. Normalization (collapse 3+ newlines to 2, collapse space runs,
/// trim ends) runs unconditionally.
pub fn clean_text(text: &str, options: &CleanOptions, stats: &dyn StatsSink) -> String {
    let mut out = text.to_string();

    if options.links {
        let before_len = out.len();
        out = URL_RE.replace_all(&out, "").into_owned();
        out = SHORTLINK_RE.replace_all(&out, "").into_owned();
        out = WWW_RE.replace_all(&out, "").into_owned();
        out = BARE_DOMAIN_RE.replace_all(&out, "").into_owned();
        out = MENTION_RE.replace_all(&out, "").into_owned();
        if out.len() != before_len {
            stats.record_link_cleaned();
        }
    }

    if options.hashtags {
        out = HASHTAG_RE.replace_all(&out, "").into_owned();
    }

    if options.formatting {
        out = EMPHASIS_RE.replace_all(&out, "").into_owned();
        out = HTML_TAG_RE.replace_all(&out, "").into_owned();
    }

    if options.lines_with_words && !options.words.is_empty() {
        out = retain_lines(&out, |line| {
            let lowered = line.to_lowercase();
            !options.words.iter().any(|w| lowered.contains(w.as_str()))
        });
    }

    if options.empty_lines {
        out = retain_lines(&out, |line| !line.trim().is_empty());
    }

    normalize_whitespace(&out)
}

fn retain_lines(text: &str, keep: impl Fn(&str) -> bool) -> String {
    text.lines()
        .filter(|line| keep(line))
        .collect::<Vec<_>>()
        .join("\n")
}

fn normalize_whitespace(text: &str) -> String {
    let out = EXCESS_NEWLINES_RE.replace_all(text, "\n\n");
    let out = SPACE_RUN_RE.replace_all(&out, " ");
    // Per-line trailing space left behind by the removals.
    out.lines()
        .map(str::trim_end)
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use relayr_core::NoopStats;

    fn opts() -> CleanOptions {
        CleanOptions::default()
    }

    #[test]
    fn strips_urls_shortlinks_and_mentions() {
        let options = CleanOptions {
            links: true,
            ..opts()
        };
        let out = clean_text(
            "check https://example.com/x and t.me/chan via @someone www.spam.io",
            &options,
            &NoopStats,
        );
        assert_eq!(out, "check and via");
    }

    #[test]
    fn strips_bare_domains() {
        let options = CleanOptions {
            links: true,
            ..opts()
        };
        let out = clean_text("visit example.com/promo today", &options, &NoopStats);
        assert_eq!(out, "visit today");
    }

    #[test]
    fn strips_hashtags_only_when_enabled() {
        let options = CleanOptions {
            hashtags: true,
            ..opts()
        };
        assert_eq!(
            clean_text("news #breaking #now", &options, &NoopStats),
            "news"
        );
        assert_eq!(
            clean_text("news #breaking", &opts(), &NoopStats),
            "news #breaking"
        );
    }

    #[test]
    fn strips_formatting_markers_and_tags() {
        let options = CleanOptions {
            formatting: true,
            ..opts()
        };
        assert_eq!(
            clean_text("**bold** _ital_ <b>html</b> `code`", &options, &NoopStats),
            "bold ital html code"
        );
    }

    #[test]
    fn drops_lines_containing_flagged_words() {
        let options = CleanOptions {
            lines_with_words: true,
            words: vec!["promo".into()],
            ..opts()
        };
        let out = clean_text("keep this\nbig PROMO here\nand this", &options, &NoopStats);
        assert_eq!(out, "keep this\nand this");
    }

    #[test]
    fn drops_blank_lines_when_enabled() {
        let options = CleanOptions {
            empty_lines: true,
            ..opts()
        };
        let out = clean_text("a\n   \n\nb", &options, &NoopStats);
        assert_eq!(out, "a\nb");
    }

    #[test]
    fn normalization_always_runs() {
        let out = clean_text("a\n\n\n\n\nb  and   c  ", &opts(), &NoopStats);
        assert_eq!(out, "a\n\nb and c");
    }

    #[test]
    fn clean_without_matches_is_whitespace_normalization_only() {
        let options = CleanOptions {
            links: true,
            hashtags: true,
            formatting: true,
            ..opts()
        };
        let text = "plain sentence\nwith two lines";
        assert_eq!(clean_text(text, &options, &NoopStats), text);
    }
}
