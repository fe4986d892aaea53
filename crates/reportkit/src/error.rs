//! Error type shared by report building and markup serialization.

use std::fmt;

/// Failures that can surface while building or encoding a report.
///
/// Report building itself never validates holders, methods or content
/// types. Apart from running out of numeric stack indices, everything here
/// comes from turning a markup node or the report stack into text.
#[derive(Debug)]
pub enum ReportError {
    /// The markup node is not attached to a document root.
    DetachedNode,
    /// The markup serializer failed while writing the node.
    Serialize(std::io::Error),
    /// The serialized markup was not valid UTF-8.
    InvalidUtf8(std::string::FromUtf8Error),
    /// A record or the report stack could not be encoded as JSON.
    Encode(serde_json::Error),
    /// Unkeyed content arrived after the largest numeric index was used.
    IndexExhausted,
}

impl fmt::Display for ReportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DetachedNode => write!(f, "markup node is not attached to a document"),
            Self::Serialize(e) => write!(f, "markup serialization failed: {e}"),
            Self::InvalidUtf8(e) => write!(f, "serialized markup is not UTF-8: {e}"),
            Self::Encode(e) => write!(f, "report encoding failed: {e}"),
            Self::IndexExhausted => write!(f, "no numeric index left for unkeyed content"),
        }
    }
}

impl std::error::Error for ReportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::DetachedNode | Self::IndexExhausted => None,
            Self::Serialize(e) => Some(e),
            Self::InvalidUtf8(e) => Some(e),
            Self::Encode(e) => Some(e),
        }
    }
}

impl From<serde_json::Error> for ReportError {
    fn from(e: serde_json::Error) -> Self {
        Self::Encode(e)
    }
}
