//! Range markers for rule test fixtures
//!
//! Expected diagnostic spans are written inline as `[|...|]`. The markers
//! are stripped and the byte ranges they enclosed are returned.

use rowan::{TextRange, TextSize};

const OPEN: &str = "[|";
const CLOSE: &str = "|]";

/// Strip `[|` / `|]` markers, returning the clean source and marked ranges
///
/// # Example
///
/// ```
/// use sable_test_utils::extract_ranges;
///
/// let (source, ranges) = extract_ranges("a [|// TODO|] b");
/// assert_eq!(source, "a // TODO b");
/// assert_eq!(&source[ranges[0]], "// TODO");
/// ```
///
/// # Panics
///
/// Panics on unbalanced or nested markers.
pub fn extract_ranges(input: &str) -> (String, Vec<TextRange>) {
    let mut source = String::with_capacity(input.len());
    let mut ranges = Vec::new();
    let mut open: Option<TextSize> = None;
    let mut rest = input;

    loop {
        let next_open = rest.find(OPEN);
        let next_close = rest.find(CLOSE);
        let (index, is_open) = match (next_open, next_close) {
            (Some(o), Some(c)) if o < c => (o, true),
            (Some(o), None) => (o, true),
            (_, Some(c)) => (c, false),
            (None, None) => break,
        };

        source.push_str(&rest[..index]);
        let offset = TextSize::from(source.len() as u32);
        if is_open {
            assert!(open.is_none(), "extract_ranges: nested '[|' marker");
            open = Some(offset);
        } else {
            let start = open.take().expect("extract_ranges: '|]' without '[|'");
            ranges.push(TextRange::new(start, offset));
        }
        rest = &rest[index + 2..];
    }

    assert!(open.is_none(), "extract_ranges: unclosed '[|' marker");
    source.push_str(rest);
    (source, ranges)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_multiple_ranges() {
        let (source, ranges) = extract_ranges("[|a|] b [|c|]");
        assert_eq!(source, "a b c");
        assert_eq!(ranges.len(), 2);
        assert_eq!(&source[ranges[1]], "c");
    }

    #[test]
    fn test_no_markers() {
        let (source, ranges) = extract_ranges("plain");
        assert_eq!(source, "plain");
        assert!(ranges.is_empty());
    }

    #[test]
    #[should_panic(expected = "unclosed")]
    fn test_unclosed_marker_panics() {
        extract_ranges("[|a");
    }
}
