use serde::{Deserialize, Serialize};

/// The one persisted entity: a named, content-addressed upload.
///
/// Field order matches the JSON the gateway has always returned:
/// `{id, hash, name, size, time, type}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    pub id: u64,
    pub hash: String,
    pub name: String,
    pub size: u64,
    /// Upload time, epoch milliseconds
    pub time: i64,
    #[serde(rename = "type")]
    pub content_type: String,
}

/// Equality filter over records; unset fields match anything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileFilter {
    pub name: Option<String>,
    pub hash: Option<String>,
}

impl FileFilter {
    /// Matches every record
    pub fn any() -> Self {
        Self::default()
    }

    pub fn by_name<S: Into<String>>(name: S) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn by_hash<S: Into<String>>(hash: S) -> Self {
        Self {
            hash: Some(hash.into()),
            ..Self::default()
        }
    }

    pub fn matches(&self, record: &FileRecord) -> bool {
        self.name.as_deref().map_or(true, |n| n == record.name)
            && self.hash.as_deref().map_or(true, |h| h == record.hash)
    }
}
