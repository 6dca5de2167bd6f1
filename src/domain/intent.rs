use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    ReadInbox,
    ReadSent,
    ReadDrafts,
    ComposeEmail,
    ReplyEmail,
    ForwardEmail,
    DeleteEmail,
    MarkSpam,
    Search,
    ReadEmail,
    NextEmail,
    PreviousEmail,
    Unknown,
}

impl Intent {
    pub const KNOWN: [Intent; 12] = [
        Intent::ReadInbox,
        Intent::ReadSent,
        Intent::ReadDrafts,
        Intent::ComposeEmail,
        Intent::ReplyEmail,
        Intent::ForwardEmail,
        Intent::DeleteEmail,
        Intent::MarkSpam,
        Intent::Search,
        Intent::ReadEmail,
        Intent::NextEmail,
        Intent::PreviousEmail,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Intent::ReadInbox => "read_inbox",
            Intent::ReadSent => "read_sent",
            Intent::ReadDrafts => "read_drafts",
            Intent::ComposeEmail => "compose_email",
            Intent::ReplyEmail => "reply_email",
            Intent::ForwardEmail => "forward_email",
            Intent::DeleteEmail => "delete_email",
            Intent::MarkSpam => "mark_spam",
            Intent::Search => "search",
            Intent::ReadEmail => "read_email",
            Intent::NextEmail => "next_email",
            Intent::PreviousEmail => "previous_email",
            Intent::Unknown => "unknown",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::KNOWN
            .into_iter()
            .chain(std::iter::once(Intent::Unknown))
            .find(|intent| intent.label().eq_ignore_ascii_case(label.trim()))
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
