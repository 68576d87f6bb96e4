//! # Configuration
//!
//! A flat string key/value store. Keys are dotted (`http.port`,
//! `legacy.origin`); typed views are read from a [`CdnConfigSnapshot`].
//!
//! ```rust
//! use nscdn_core::CdnConfig;
//! let mut config = CdnConfig::new();
//!
//! config.set("http.port", "8080");
//! assert_eq!(config.snapshot().get_u16("http.port"), Some(8080));
//! ```
//!
//! ## Environment overrides
//!
//! [`CdnConfig::load_env`] copies every variable carrying a prefix into the
//! store, lowercasing it and turning `__` into `.`:
//!
//! ```bash
//! export NSCDN__HTTP__PORT=9000        # http.port
//! export NSCDN__LEGACY__ORIGIN=        # legacy.origin (empty: no fallback)
//! ```

use std::collections::HashMap;

#[derive(Debug, Default, Clone)]
pub struct CdnConfig {
    values: HashMap<String, String>,
}

impl CdnConfig {
    /// Create an empty config store.
    pub fn new() -> Self {
        Self {
            values: HashMap::new(),
        }
    }

    /// Set a configuration key to a string value.
    pub fn set<K, V>(&mut self, key: K, value: V)
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.values.insert(key.into(), value.into());
    }

    /// Get a configuration value by key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(|s| s.as_str())
    }

    /// Check whether a key is present.
    pub fn has(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Load `PREFIX` + `SECTION__KEY` variables from the process environment.
    pub fn load_env(&mut self, prefix: &str) {
        self.load_vars(prefix, std::env::vars());
    }

    /// Same as [`load_env`](Self::load_env) over an explicit variable list.
    pub fn load_vars<I>(&mut self, prefix: &str, vars: I)
    where
        I: IntoIterator<Item = (String, String)>,
    {
        for (key, value) in vars {
            if let Some(stripped) = key.strip_prefix(prefix) {
                let normalized = stripped.to_lowercase().replace("__", "."); // NSCDN__HTTP__PORT → http.port
                self.set(normalized, value);
            }
        }
    }

    pub fn snapshot(&self) -> CdnConfigSnapshot {
        CdnConfigSnapshot::new(self.values.clone())
    }
}

#[derive(Debug, Clone, Default)]
pub struct CdnConfigSnapshot {
    map: HashMap<String, String>,
}

impl CdnConfigSnapshot {
    pub(crate) fn new(map: HashMap<String, String>) -> Self {
        Self { map }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.map.get(key).map(|s| s.as_str())
    }

    pub fn get_string(&self, key: &str) -> Option<String> {
        self.map.get(key).cloned()
    }

    pub fn get_u16(&self, key: &str) -> Option<u16> {
        self.get(key).and_then(|v| v.trim().parse::<u16>().ok())
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(|v| v.trim().parse::<bool>().ok())
    }
}
