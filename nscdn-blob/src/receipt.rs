use serde::{Deserialize, Serialize};

/// Receipt returned once a blob has been fully persisted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredBlob {
    /// Content address of the stored bytes
    pub hash: String,
    /// Number of bytes consumed from the input stream
    pub size: u64,
}

impl StoredBlob {
    pub fn new<S: Into<String>>(hash: S, size: u64) -> Self {
        Self {
            hash: hash.into(),
            size,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }
}
