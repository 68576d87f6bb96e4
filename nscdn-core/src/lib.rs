//! nscdn-core: transport-agnostic core for the nscdn gateway.
//!
//! Everything here decides *what* to do with an exchange; the HTTP crate
//! decides how to put it on the wire.

pub mod classify;
pub mod config;
pub mod errors;
pub mod jsonl;
pub mod naming;
pub mod range;
pub mod record;
pub mod resolver;
pub mod service;
pub mod settings;
pub mod table;

pub use classify::{classify, Exchange, LEGACY_EMPTY_BODY_HASHES};
pub use config::{CdnConfig, CdnConfigSnapshot};
pub use errors::{CdnError, CdnResult};
pub use jsonl::JsonlFileTable;
pub use naming::{looks_like_hash, synthetic_name, NewUpload, DEFAULT_CONTENT_TYPE};
pub use range::ServedRange;
pub use record::{FileFilter, FileRecord};
pub use resolver::{ReadRequest, Resolution};
pub use service::FileService;
pub use settings::{CdnSettings, StoreKind};
pub use table::{FileTable, IdSequence, MemoryFileTable};
