//! HTTP Range request parsing module
//!
//! Single `bytes` ranges only (RFC 7233). Multi-range requests fall back to
//! the full body.

/// Inclusive byte range resolved against the file length
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
    pub start: u64,
    pub end: u64,
}

impl ByteRange {
    pub const fn content_length(self) -> u64 {
        self.end - self.start + 1
    }
}

/// Range header parse result
#[derive(Debug, PartialEq, Eq)]
pub enum RangeParseResult {
    /// Serve this slice with 206
    Valid(ByteRange),
    /// Well-formed but outside the file, answer 416
    NotSatisfiable,
    /// No usable Range header, serve the whole file
    None,
}

/// Parse a `Range` header against a file of `file_size` bytes
///
/// Accepts `bytes=start-end`, `bytes=start-` and `bytes=-suffix`.
pub fn parse_range_header(range_header: Option<&str>, file_size: u64) -> RangeParseResult {
    let Some(spec) = range_header.and_then(|h| h.trim().strip_prefix("bytes=")) else {
        return RangeParseResult::None;
    };
    if spec.contains(',') {
        return RangeParseResult::None;
    }
    let Some((first, last)) = spec.split_once('-') else {
        return RangeParseResult::None;
    };
    let (first, last) = (first.trim(), last.trim());

    if first.is_empty() {
        return suffix_range(last, file_size);
    }

    let Ok(start) = first.parse::<u64>() else {
        return RangeParseResult::None;
    };
    let end = if last.is_empty() {
        None
    } else {
        match last.parse::<u64>() {
            Ok(end) => Some(end),
            Err(_) => return RangeParseResult::None,
        }
    };

    if start >= file_size {
        return RangeParseResult::NotSatisfiable;
    }
    let end = end.map_or(file_size - 1, |e| e.min(file_size - 1));
    if start > end {
        return RangeParseResult::NotSatisfiable;
    }

    RangeParseResult::Valid(ByteRange { start, end })
}

/// `bytes=-N`: the last N bytes
fn suffix_range(suffix: &str, file_size: u64) -> RangeParseResult {
    let Ok(suffix) = suffix.parse::<u64>() else {
        return RangeParseResult::None;
    };
    if suffix == 0 || file_size == 0 {
        return RangeParseResult::NotSatisfiable;
    }

    RangeParseResult::Valid(ByteRange {
        start: file_size.saturating_sub(suffix),
        end: file_size - 1,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid(start: u64, end: u64) -> RangeParseResult {
        RangeParseResult::Valid(ByteRange { start, end })
    }

    #[test]
    fn test_no_range() {
        assert_eq!(parse_range_header(None, 100), RangeParseResult::None);
        assert_eq!(parse_range_header(Some("items=0-5"), 100), RangeParseResult::None);
    }

    #[test]
    fn test_closed_and_open_ranges() {
        assert_eq!(parse_range_header(Some("bytes=0-9"), 100), valid(0, 9));
        assert_eq!(parse_range_header(Some("bytes=50-"), 100), valid(50, 99));
        assert_eq!(parse_range_header(Some("bytes=90-500"), 100), valid(90, 99));
    }

    #[test]
    fn test_suffix_range() {
        assert_eq!(parse_range_header(Some("bytes=-20"), 100), valid(80, 99));
        assert_eq!(parse_range_header(Some("bytes=-500"), 100), valid(0, 99));
        assert_eq!(
            parse_range_header(Some("bytes=-0"), 100),
            RangeParseResult::NotSatisfiable
        );
    }

    #[test]
    fn test_not_satisfiable() {
        assert_eq!(
            parse_range_header(Some("bytes=200-"), 100),
            RangeParseResult::NotSatisfiable
        );
        assert_eq!(
            parse_range_header(Some("bytes=9-3"), 100),
            RangeParseResult::NotSatisfiable
        );
        assert_eq!(
            parse_range_header(Some("bytes=0-"), 0),
            RangeParseResult::NotSatisfiable
        );
    }

    #[test]
    fn test_malformed_falls_back_to_full() {
        assert_eq!(parse_range_header(Some("bytes=a-b"), 100), RangeParseResult::None);
        assert_eq!(
            parse_range_header(Some("bytes=0-9,20-29"), 100),
            RangeParseResult::None
        );
        assert_eq!(parse_range_header(Some("bytes=10"), 100), RangeParseResult::None);
    }

    #[test]
    fn test_content_length() {
        assert_eq!(ByteRange { start: 2, end: 4 }.content_length(), 3);
    }
}
