//! Message-to-entry matching.
//!
//! Matching is whole-string, case-insensitive equality with first match
//! winning. There is no scoring and no partial matching.
//!
//! Lookup order:
//! 1. The first entry whose `query` equals the message.
//!    - If one of that entry's own options also equals the message, the
//!      option's response wins and nothing is offered.
//!    - Otherwise the entry's response is returned and its option texts are
//!      offered in order.
//! 2. On a continuation turn only: the first option of any entry (entries in
//!    order, options in order) whose `option_text` equals the message.
//! 3. The fixed fallback reply.
//!
//! Step 2 is deliberately skipped on the first message of a session. That
//! asymmetry is existing behaviour that clients rely on, so both modes are
//! kept rather than unified.

use faqchat_types::faq::{FaqEntry, FaqOption};

/// Reply sent when nothing matches.
pub const FALLBACK_REPLY: &str = "Sorry, I don't have an answer for that.";

/// Which kind of turn is being matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMode {
    /// First message of a new session. No cross-entry option scan.
    Start,
    /// Any later message. Falls back to scanning every entry's options.
    Continuation,
}

/// What the message matched, for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    /// Matched an entry's query; its options are offered.
    Entry,
    /// Matched an entry's query and one of that entry's own options.
    EntryOption,
    /// Matched an option of some entry during a continuation scan.
    AnyOption,
    /// Nothing matched.
    Fallback,
}

impl MatchKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchKind::Entry => "entry",
            MatchKind::EntryOption => "entry_option",
            MatchKind::AnyOption => "any_option",
            MatchKind::Fallback => "fallback",
        }
    }
}

/// Reply text plus the follow-up choices to offer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchOutcome {
    pub reply: String,
    pub options: Vec<String>,
    pub kind: MatchKind,
}

impl MatchOutcome {
    fn option(option: &FaqOption, kind: MatchKind) -> Self {
        Self {
            reply: option.response.clone(),
            options: Vec::new(),
            kind,
        }
    }

    fn fallback() -> Self {
        Self {
            reply: FALLBACK_REPLY.to_string(),
            options: Vec::new(),
            kind: MatchKind::Fallback,
        }
    }
}

/// Match `message` against `entries`. Total: never fails.
pub fn match_message(message: &str, entries: &[FaqEntry], mode: MatchMode) -> MatchOutcome {
    if let Some(entry) = entries.iter().find(|e| eq_ignore_case(&e.query, message)) {
        if let Some(option) = find_option(&entry.options, message) {
            return MatchOutcome::option(option, MatchKind::EntryOption);
        }
        return MatchOutcome {
            reply: entry.response.clone(),
            options: entry.options.iter().map(|o| o.option_text.clone()).collect(),
            kind: MatchKind::Entry,
        };
    }

    if mode == MatchMode::Continuation {
        if let Some(option) = entries
            .iter()
            .flat_map(|e| e.options.iter())
            .find(|o| eq_ignore_case(&o.option_text, message))
        {
            return MatchOutcome::option(option, MatchKind::AnyOption);
        }
    }

    MatchOutcome::fallback()
}

fn find_option<'a>(options: &'a [FaqOption], message: &str) -> Option<&'a FaqOption> {
    options.iter().find(|o| eq_ignore_case(&o.option_text, message))
}

/// Whole-string equality under Unicode lowercase folding. No trimming.
fn eq_ignore_case(a: &str, b: &str) -> bool {
    if a.is_ascii() && b.is_ascii() {
        return a.eq_ignore_ascii_case(b);
    }
    a.chars()
        .flat_map(char::to_lowercase)
        .eq(b.chars().flat_map(char::to_lowercase))
}
