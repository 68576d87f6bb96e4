//! `Range` header resolution.
//!
//! Deliberately forgiving: the header is never rejected. Whatever decimal
//! numbers it contains are read in order as `first` and `last`, then clamped
//! into the object.

/// Inclusive byte interval `[first, last]` of an object of `total` bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServedRange {
    pub first: u64,
    pub last: u64,
    pub total: u64,
}

impl ServedRange {
    /// Resolve a raw `Range` header against an object of `total` bytes.
    ///
    /// Returns `None` only for empty objects, which have no byte to serve.
    pub fn resolve(header: &str, total: u64) -> Option<Self> {
        if total == 0 {
            return None;
        }

        let numbers = extract_integers(header);
        let mut first = numbers.first().copied().unwrap_or(0);
        let mut last = numbers.get(1).copied().unwrap_or(total - 1);

        if last >= total {
            last = total - 1;
        }
        if first >= last {
            first = last;
        }

        Some(Self { first, last, total })
    }

    /// Number of bytes served
    pub fn len(&self) -> u64 {
        self.last - self.first + 1
    }

    /// `Content-Range` header value
    pub fn content_range(&self) -> String {
        format!("bytes {}-{}/{}", self.first, self.last, self.total)
    }
}

/// `Content-Range` for an object with no satisfiable interval
pub fn unsatisfied_content_range(total: u64) -> String {
    format!("bytes */{total}")
}

/// All runs of ASCII digits in `text`, in order. Runs too long for a `u64`
/// saturate.
fn extract_integers(text: &str) -> Vec<u64> {
    let mut numbers = Vec::new();
    let mut current: Option<u64> = None;

    for byte in text.bytes() {
        if byte.is_ascii_digit() {
            let digit = u64::from(byte - b'0');
            let value = current.unwrap_or(0);
            current = Some(value.saturating_mul(10).saturating_add(digit));
        } else if let Some(value) = current.take() {
            numbers.push(value);
        }
    }
    numbers.extend(current);
    numbers
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve(header: &str, total: u64) -> (u64, u64) {
        let r = ServedRange::resolve(header, total).unwrap();
        (r.first, r.last)
    }

    #[test]
    fn explicit_bounds() {
        assert_eq!(resolve("bytes=2-5", 10), (2, 5));
        assert_eq!(ServedRange::resolve("bytes=2-5", 10).unwrap().len(), 4);
    }

    #[test]
    fn no_numbers_serves_everything() {
        assert_eq!(resolve("bytes=-", 10), (0, 9));
        assert_eq!(resolve("", 10), (0, 9));
    }

    #[test]
    fn open_end_serves_to_end() {
        assert_eq!(resolve("bytes=4-", 10), (4, 9));
    }

    #[test]
    fn last_past_end_is_clamped() {
        assert_eq!(resolve("bytes=3-999", 10), (3, 9));
    }

    #[test]
    fn inverted_range_collapses_to_last() {
        assert_eq!(resolve("bytes=10-5", 11), (5, 5));
        assert_eq!(resolve("bytes=7-7", 11), (7, 7));
    }

    #[test]
    fn start_past_end_collapses_to_final_byte() {
        assert_eq!(resolve("bytes=50-", 10), (9, 9));
    }

    #[test]
    fn suffix_form_is_read_as_a_start() {
        assert_eq!(resolve("bytes=-3", 10), (3, 9));
    }

    #[test]
    fn only_first_two_numbers_count() {
        assert_eq!(resolve("bytes=0-1, 4-8", 10), (0, 1));
    }

    #[test]
    fn oversized_numbers_saturate() {
        assert_eq!(resolve("bytes=0-99999999999999999999999", 10), (0, 9));
    }

    #[test]
    fn empty_object_has_no_range() {
        assert!(ServedRange::resolve("bytes=0-10", 0).is_none());
        assert_eq!(unsatisfied_content_range(0), "bytes */0");
    }

    #[test]
    fn content_range_header() {
        let r = ServedRange::resolve("bytes=1-2", 3).unwrap();
        assert_eq!(r.content_range(), "bytes 1-2/3");
    }
}
