use std::path::PathBuf;

use crate::naming::DEFAULT_CONTENT_TYPE;
use crate::{CdnConfigSnapshot, CdnError, CdnResult};

pub const DEFAULT_LEGACY_ORIGIN: &str = "https://cdn.nodesite.eu";

/// Where records and blobs live
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    /// `files.jsonl` + `blobs/` under the data dir
    Fs,
    /// Process memory; lost on exit
    Memory,
}

/// Typed gateway settings read from a config snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CdnSettings {
    pub host: String,
    pub port: u16,
    pub data_dir: PathBuf,
    pub store: StoreKind,
    /// Base URL of the legacy origin; `None` disables fallback
    pub legacy_origin: Option<String>,
    pub default_type: String,
    /// Send the whole object size as `Content-Length` on 206 responses
    pub declared_range_length: bool,
}

impl Default for CdnSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            data_dir: PathBuf::from("."),
            store: StoreKind::Fs,
            legacy_origin: Some(DEFAULT_LEGACY_ORIGIN.to_string()),
            default_type: DEFAULT_CONTENT_TYPE.to_string(),
            declared_range_length: false,
        }
    }
}

impl CdnSettings {
    pub fn from_config(config: &CdnConfigSnapshot) -> CdnResult<Self> {
        let defaults = Self::default();

        let port = match config.get("http.port") {
            Some(raw) => config
                .get_u16("http.port")
                .ok_or_else(|| CdnError::config(format!("http.port is not a port: {raw}")))?,
            None => defaults.port,
        };

        let store = match config.get("store.kind").map(str::trim) {
            None | Some("fs") => StoreKind::Fs,
            Some("memory") => StoreKind::Memory,
            Some(other) => {
                return Err(CdnError::config(format!(
                    "store.kind must be fs or memory, got {other}"
                )))
            }
        };

        let legacy_origin = match config.get("legacy.origin") {
            Some(origin) if origin.trim().is_empty() => None,
            Some(origin) => Some(origin.trim().trim_end_matches('/').to_string()),
            None => defaults.legacy_origin,
        };

        Ok(Self {
            host: config.get_string("http.host").unwrap_or(defaults.host),
            port,
            data_dir: config
                .get("data.dir")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
            store,
            legacy_origin,
            default_type: config
                .get_string("upload.default_type")
                .unwrap_or(defaults.default_type),
            declared_range_length: config
                .get_bool("compat.declared_range_length")
                .unwrap_or(defaults.declared_range_length),
        })
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn table_path(&self) -> PathBuf {
        self.data_dir.join("files.jsonl")
    }

    pub fn blob_dir(&self) -> PathBuf {
        self.data_dir.join("blobs")
    }
}
