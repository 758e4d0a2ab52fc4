use serde::{Deserialize, Serialize};
use std::fmt;

/// One backend entry: a single value of a record, as the backend sees it
///
/// `rtype` stays a string because backends list types this crate does not
/// implement (URL redirects and the like).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlatEntry {
    /// Record type name as reported by the backend
    #[serde(rename = "type")]
    pub rtype: String,
    /// Entry name: relative, `@`, or fully qualified
    pub name: String,
    /// Time-to-live
    pub ttl: u32,
    /// Content string in the backend's format
    pub content: String,
    /// Backend-assigned identifier, not guaranteed unique
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl FlatEntry {
    /// Create an entry without an identifier
    pub fn new(
        rtype: impl Into<String>,
        name: impl Into<String>,
        ttl: u32,
        content: impl Into<String>,
    ) -> Self {
        Self {
            rtype: rtype.into(),
            name: name.into(),
            ttl,
            content: content.into(),
            id: None,
        }
    }

    /// Set the identifier
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// The (type, name, content) triple identifying this entry in errors
    pub fn entry_ref(&self) -> EntryRef {
        EntryRef {
            rtype: self.rtype.clone(),
            name: self.name.clone(),
            content: self.content.clone(),
        }
    }
}

/// Type, name and content of an entry, carried by the typed record errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryRef {
    /// Record type name
    pub rtype: String,
    /// Entry name
    pub name: String,
    /// Content string
    pub content: String,
}

impl fmt::Display for EntryRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} \"{}\"", self.rtype, self.name, self.content)
    }
}
