//! Notifications broadcast by a [`crate::CatalogSession`].

use std::fmt;

/// A single user-facing message, replaced by the next one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    message: String,
}

impl Notice {
    /// Wrap a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The message text.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// State changes observed by session subscribers.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// The catalog list was replaced by a fresh fetch.
    RecordsReplaced {
        /// Number of records now held.
        count: usize,
    },
    /// A locally synthesised record was appended after a submission.
    RecordAdded {
        /// Identifier of the new record.
        id: String,
    },
    /// Record details were appended to the downloaded collection.
    DetailDownloaded {
        /// Identifier that was requested.
        id: String,
        /// Number of records newly added; records already held are skipped.
        count: usize,
    },
    /// A record was stored as a favorite.
    FavoriteAdded {
        /// Identifier of the record.
        id: String,
    },
    /// A rating was stored locally.
    RatingSaved {
        /// Identifier of the record.
        id: String,
        /// The stored rating.
        rating: f64,
    },
    /// The catalog rejected or never received a rating that is stored locally.
    RemoteRatingFailed {
        /// Identifier of the record.
        id: String,
    },
    /// The local cache was wiped.
    CacheReset,
    /// The search query or sort order changed.
    ViewChanged,
    /// A notice was raised for the user.
    Notice(Notice),
}
