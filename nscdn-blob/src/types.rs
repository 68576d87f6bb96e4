use bytes::Bytes;
use futures_core::Stream;
use std::pin::Pin;

/// Stream of bytes for blob content
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, std::io::Error>> + Send>>;

/// Half-open byte range `[start, end)` for partial reads
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
    pub start: u64,
    pub end: Option<u64>, // exclusive; None means "to end of blob"
}

impl ByteRange {
    pub fn new(start: u64, end: Option<u64>) -> Self {
        Self { start, end }
    }

    pub fn from_start(start: u64) -> Self {
        Self { start, end: None }
    }

    /// Range covering `first..=last`, the form HTTP `Content-Range` speaks in.
    pub fn inclusive(first: u64, last: u64) -> Self {
        Self {
            start: first,
            end: Some(last.saturating_add(1)),
        }
    }

    /// Clamp against a blob of `total_size` bytes, returning `(start, end)`
    /// with `start <= end <= total_size`.
    pub fn bounds(&self, total_size: u64) -> (u64, u64) {
        let end = self.end.unwrap_or(total_size).min(total_size);
        let start = self.start.min(end);
        (start, end)
    }

    pub fn length(&self, total_size: u64) -> u64 {
        let (start, end) = self.bounds(total_size);
        end - start
    }
}
