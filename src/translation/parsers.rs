//! Byte-level lookahead helpers for the placeholder scanner.

pub(super) const LINE_COMMENT: &[u8; 2] = b"--";
pub(super) const BLOCK_OPEN: &[u8; 2] = b"/*";
pub(super) const BLOCK_CLOSE: &[u8; 2] = b"*/";

/// True when `bytes[idx..]` begins with `pair`.
pub(super) fn pair_at(bytes: &[u8], idx: usize, pair: &[u8; 2]) -> bool {
    bytes.get(idx..idx + 2) == Some(pair.as_slice())
}

pub(super) fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

/// True when the byte before `idx` would glue a marker onto a preceding word (`abc$1`, `a::int`).
pub(super) fn follows_word(bytes: &[u8], idx: usize) -> bool {
    idx.checked_sub(1)
        .and_then(|prev| bytes.get(prev))
        .is_some_and(|&b| is_ident_byte(b) || b == b'$' || b == b':')
}

/// Length of the run of bytes from `start` satisfying `pred`.
pub(super) fn run_len(bytes: &[u8], start: usize, pred: impl Fn(u8) -> bool) -> usize {
    bytes
        .get(start..)
        .map_or(0, |rest| rest.iter().take_while(|&&b| pred(b)).count())
}

/// Tag of a `$tag$` opener at `start`, and the index of its closing `$`.
///
/// The tag may be empty (`$$`) but may not start with a digit, so `$1` followed by another
/// `$` is never mistaken for a quote.
pub(super) fn dollar_quote_tag(bytes: &[u8], start: usize) -> Option<(String, usize)> {
    let tag_start = start + 1;
    if bytes.get(tag_start).is_some_and(u8::is_ascii_digit) {
        return None;
    }
    let close = tag_start + run_len(bytes, tag_start, is_ident_byte);
    if bytes.get(close) != Some(&b'$') {
        return None;
    }
    let tag = std::str::from_utf8(&bytes[tag_start..close]).ok()?;
    Some((tag.to_string(), close))
}

/// True when a `$tag$` closer starts at `idx`.
pub(super) fn closes_dollar_quote(bytes: &[u8], idx: usize, tag: &str) -> bool {
    let tag_end = idx + 1 + tag.len();
    bytes.get(idx) == Some(&b'$')
        && bytes.get(idx + 1..tag_end) == Some(tag.as_bytes())
        && bytes.get(tag_end) == Some(&b'$')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dollar_quote_tags() {
        assert_eq!(dollar_quote_tag(b"$$ x $$", 0), Some((String::new(), 1)));
        assert_eq!(dollar_quote_tag(b"$fn$ x $fn$", 0), Some(("fn".to_string(), 3)));
        assert_eq!(dollar_quote_tag(b"$1$", 0), None);
        assert_eq!(dollar_quote_tag(b"$name ", 0), None);
        assert!(closes_dollar_quote(b"x $fn$", 2, "fn"));
        assert!(!closes_dollar_quote(b"x $fn", 2, "fn"));
    }
}
