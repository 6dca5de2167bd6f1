//! Keyword tables and the first-match lookup over them.
//!
//! Table order is observable behaviour: the first label whose phrase occurs anywhere in
//! the text wins, even when a later label has a longer or more specific phrase.

use crate::domain::Intent;

pub type TriggerTable<L> = [(L, &'static [&'static str])];

pub static INTENT_TRIGGERS: &TriggerTable<Intent> = &[
    (
        Intent::ReadInbox,
        &["read inbox", "check inbox", "show inbox", "open inbox"],
    ),
    (
        Intent::ReadSent,
        &["read sent", "show sent", "sent emails", "sent folder"],
    ),
    (
        Intent::ReadDrafts,
        &["read drafts", "show drafts", "open drafts"],
    ),
    (
        Intent::ComposeEmail,
        &["compose", "new email", "write email", "send email"],
    ),
    (Intent::ReplyEmail, &["reply", "respond", "reply to this"]),
    (
        Intent::ForwardEmail,
        &["forward", "forward this", "forward email"],
    ),
    (
        Intent::DeleteEmail,
        &["delete", "remove", "trash", "delete this"],
    ),
    (Intent::MarkSpam, &["spam", "mark spam", "mark as spam"]),
    (Intent::Search, &["search", "find", "look for"]),
    (Intent::ReadEmail, &["read", "read email", "read this"]),
    (Intent::NextEmail, &["next", "next email"]),
    (
        Intent::PreviousEmail,
        &["previous", "previous email", "go back"],
    ),
];

pub static SPAM_INDICATORS: &[&str] = &[
    "viagra",
    "cialis",
    "casino",
    "lottery",
    "winner",
    "congratulations",
    "free money",
    "click here",
    "act now",
    "limited time",
    "urgent",
    "nigerian prince",
    "inheritance",
    "million dollars",
    "wire transfer",
    "verify account",
    "suspended account",
    "confirm identity",
];

pub fn first_match<L: Copy>(text: &str, table: &TriggerTable<L>) -> Option<L> {
    let lowered = text.to_lowercase();
    table
        .iter()
        .find(|(_, phrases)| phrases.iter().any(|phrase| lowered.contains(phrase)))
        .map(|(label, _)| *label)
}

pub fn matched_indicators(text: &str, indicators: &[&'static str]) -> Vec<&'static str> {
    let lowered = text.to_lowercase();
    indicators
        .iter()
        .copied()
        .filter(|indicator| lowered.contains(indicator))
        .collect()
}
