/// One mind (activity) mirrored from the remote feed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Item {
    /// Remote guid, kept as the exact string the server sent.
    pub id: String,
    /// `None` means the body has not been fetched yet.
    pub message: Option<String>,
    pub pinned: bool,
    pub time_created: Option<String>,
    pub time_updated: Option<String>,
    /// Guid of the original mind when this one is a remind.
    pub remind_of: Option<String>,
}

impl Item {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    pub fn with_message(id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::new(id)
        }
    }

    /// An item is complete once a non-blank message body has been retrieved.
    pub fn is_complete(&self) -> bool {
        self.message
            .as_deref()
            .is_some_and(|m| !m.trim().is_empty())
    }

    /// First line of the message, for listings
    pub fn headline(&self) -> &str {
        self.message
            .as_deref()
            .and_then(|m| m.lines().find(|l| !l.trim().is_empty()))
            .unwrap_or("")
    }
}
