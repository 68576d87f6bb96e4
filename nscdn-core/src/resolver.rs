use crate::{FileRecord, ServedRange};

/// A read exchange, already stripped of transport details
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadRequest<'a> {
    pub name: &'a str,
    /// `?info` was present (with or without a value)
    pub info: bool,
    /// Raw `Range` header, if any
    pub range: Option<&'a str>,
}

impl<'a> ReadRequest<'a> {
    pub fn new(name: &'a str) -> Self {
        Self {
            name,
            info: false,
            range: None,
        }
    }

    pub fn with_info(mut self, info: bool) -> Self {
        self.info = info;
        self
    }

    pub fn with_range(mut self, range: Option<&'a str>) -> Self {
        self.range = range;
        self
    }
}

/// How a read should be answered
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Unknown locally: hand the request to the legacy origin
    Fallback,
    /// Metadata only
    Info(FileRecord),
    /// Whole object, 200
    Full(FileRecord),
    /// Part of the object, 206. `range` is `None` for empty objects.
    Partial {
        record: FileRecord,
        range: Option<ServedRange>,
    },
}

/// Decide how to answer `request` given the record found for its name.
///
/// `info` wins over `Range`.
pub fn resolve(found: Option<FileRecord>, request: &ReadRequest<'_>) -> Resolution {
    let Some(record) = found else {
        return Resolution::Fallback;
    };

    if request.info {
        return Resolution::Info(record);
    }

    match request.range {
        Some(header) => {
            let range = ServedRange::resolve(header, record.size);
            Resolution::Partial { record, range }
        }
        None => Resolution::Full(record),
    }
}
