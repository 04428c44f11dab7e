//! User-supplied video links and the naive id heuristic.
//!
//! The id is whatever follows the last `=` in the link. This matches
//! `watch?v=<id>` links but gives the wrong answer for links carrying further
//! query parameters (`watch?v=abc&t=10` yields `10`) and for short links
//! without any `=` (`youtu.be/abc` yields the whole link). No validation is
//! done; a bad id simply makes the metadata lookup fail.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque link string as typed into the form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VideoLink(String);

impl VideoLink {
    pub fn new(link: impl Into<String>) -> Self {
        Self(link.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Substring after the last `=`, or the whole link when there is none.
    pub fn video_id(&self) -> &str {
        match self.0.rfind('=') {
            Some(pos) => &self.0[pos + 1..],
            None => &self.0,
        }
    }
}

impl fmt::Display for VideoLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for VideoLink {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for VideoLink {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}
