//! Crawl status definitions
//!
//! This module defines the lifecycle states of a crawl record.

use serde::Serialize;
use std::fmt;

/// Represents the current state of a crawl
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CrawlStatus {
    /// Crawl is exploring links
    Active,

    /// Crawl has been asked to stop; observed at the next chunk boundary
    Halt,

    /// Crawl has finished. Terminal: the record accepts no further status writes
    Done,

    /// Crawl hit a fault during background exploration
    Failed,
}

impl CrawlStatus {
    /// Returns true if the record no longer accepts status writes
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done)
    }

    /// Returns true if background exploration must not record anything more
    pub fn is_finished(&self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }

    /// Lower-case wire representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Halt => "halt",
            Self::Done => "done",
            Self::Failed => "failed",
        }
    }

    /// Parses a status case-insensitively
    ///
    /// Returns None if the string doesn't match any known status.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "active" => Some(Self::Active),
            "halt" => Some(Self::Halt),
            "done" => Some(Self::Done),
            "failed" => Some(Self::Failed),
            _ => None,
        }
    }

    /// Returns all possible statuses
    pub fn all() -> [Self; 4] {
        [Self::Active, Self::Halt, Self::Done, Self::Failed]
    }
}

impl Default for CrawlStatus {
    fn default() -> Self {
        Self::Active
    }
}

impl fmt::Display for CrawlStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
