//! Item-range pagination for training listings.
//!
//! Clients page through training data with an HTTP `Range: items=start-end`
//! header (inclusive, zero-based). The range is parsed into a value type up
//! front; absence of a range means "all items".

use crate::error::{Error, Result};

/// An inclusive, zero-based [start, end] slice request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemRange {
    pub start: u32,
    pub end: u32,
}

impl ItemRange {
    /// Parse a `Range` header value of the form `items=0-9`.
    pub fn parse(header: &str) -> Result<Self> {
        let slice = header
            .strip_prefix("items=")
            .ok_or_else(|| Error::InvalidInput(format!("Unsupported range unit: {}", header)))?;

        let (start, end) = slice
            .split_once('-')
            .ok_or_else(|| Error::InvalidInput(format!("Malformed range: {}", header)))?;

        let start: u32 = start
            .parse()
            .map_err(|_| Error::InvalidInput(format!("Malformed range: {}", header)))?;
        let end: u32 = end
            .parse()
            .map_err(|_| Error::InvalidInput(format!("Malformed range: {}", header)))?;

        if end < start {
            return Err(Error::InvalidInput(format!("Malformed range: {}", header)));
        }

        Ok(Self { start, end })
    }

    /// Number of items the slice asks for.
    pub fn count(&self) -> u32 {
        self.end - self.start + 1
    }

    /// Clamp the slice to the number of items actually available and
    /// render the `Content-Range` response header, e.g. `items 0-9/20`.
    /// A request entirely beyond the data reports an empty-slice marker.
    pub fn content_range(&self, total: i64) -> String {
        let total = total.max(0) as u32;
        if total == 0 || self.start >= total {
            return format!("items */{}", total);
        }
        let end = self.end.min(total - 1);
        format!("items {}-{}/{}", self.start, end, total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_simple_range() {
        let range = ItemRange::parse("items=0-9").unwrap();
        assert_eq!(range, ItemRange { start: 0, end: 9 });
        assert_eq!(range.count(), 10);
    }

    #[test]
    fn rejects_malformed_ranges() {
        assert!(ItemRange::parse("bytes=0-9").is_err());
        assert!(ItemRange::parse("items=9").is_err());
        assert!(ItemRange::parse("items=a-b").is_err());
        assert!(ItemRange::parse("items=9-2").is_err());
    }

    #[test]
    fn renders_content_range_with_total() {
        let range = ItemRange::parse("items=0-9").unwrap();
        assert_eq!(range.content_range(20), "items 0-9/20");
    }

    #[test]
    fn clamps_to_available_items() {
        let range = ItemRange::parse("items=0-9").unwrap();
        assert_eq!(range.content_range(4), "items 0-3/4");

        let beyond = ItemRange::parse("items=50-59").unwrap();
        assert_eq!(beyond.content_range(20), "items */20");
        assert_eq!(range.content_range(0), "items */0");
    }
}
