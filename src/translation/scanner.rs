use super::parsers::{
    BLOCK_CLOSE, BLOCK_OPEN, LINE_COMMENT, closes_dollar_quote, dollar_quote_tag, follows_word,
    is_ident_byte, pair_at, run_len,
};

#[derive(Clone)]
enum State {
    Normal,
    /// Inside a literal or quoted identifier; holds the closing byte.
    Quoted(u8),
    LineComment,
    BlockComment(u32),
    DollarQuoted(String),
}

/// What a live marker refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkerKind {
    /// `$name` bind parameter.
    NamedBind(String),
    /// `$1` bind parameter.
    PositionalBind(usize),
    /// `:name` replacement.
    NamedReplacement(String),
    /// `?` replacement.
    PositionalReplacement,
}

/// A placeholder found in an executable position of a statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiveMarker {
    pub start: usize,
    pub end: usize,
    pub kind: MarkerKind,
}

/// `$1` or `$name` directly after the `$` at `idx`.
fn bind_marker(bytes: &[u8], idx: usize) -> Option<LiveMarker> {
    let digits = run_len(bytes, idx + 1, |b| b.is_ascii_digit());
    if digits > 0 {
        let end = idx + 1 + digits;
        let position = std::str::from_utf8(&bytes[idx + 1..end]).ok()?.parse().ok()?;
        return Some(LiveMarker {
            start: idx,
            end,
            kind: MarkerKind::PositionalBind(position),
        });
    }
    let (end, name) = name_after(bytes, idx)?;
    Some(LiveMarker {
        start: idx,
        end,
        kind: MarkerKind::NamedBind(name),
    })
}

/// Identifier starting right after the sigil at `idx`.
fn name_after(bytes: &[u8], idx: usize) -> Option<(usize, String)> {
    let first = *bytes.get(idx + 1)?;
    if !(first.is_ascii_alphabetic() || first == b'_') {
        return None;
    }
    let end = idx + 1 + run_len(bytes, idx + 1, is_ident_byte);
    let name = std::str::from_utf8(&bytes[idx + 1..end]).ok()?;
    Some((end, name.to_string()))
}

/// Walk `sql` and return every marker outside string literals, quoted identifiers, comments,
/// and dollar-quoted blocks.
///
/// `identifier_quotes` is the dialect's opening/closing identifier quote pair; `"` is always
/// treated as a quote as well. With `backslash_escapes`, a `\` inside a `'` or `"` literal
/// escapes the byte after it.
pub(super) fn scan(
    sql: &str,
    identifier_quotes: (char, char),
    backslash_escapes: bool,
) -> Vec<LiveMarker> {
    let bytes = sql.as_bytes();
    let (open, close) = ascii_quotes(identifier_quotes);
    let mut markers = Vec::new();
    let mut state = State::Normal;
    let mut idx = 0;

    while idx < bytes.len() {
        let b = bytes[idx];
        match state {
            State::Normal => match b {
                b'\'' | b'"' => state = State::Quoted(b),
                _ if Some(b) == open => state = State::Quoted(close.unwrap_or(b)),
                _ if pair_at(bytes, idx, LINE_COMMENT) => state = State::LineComment,
                _ if pair_at(bytes, idx, BLOCK_OPEN) => {
                    state = State::BlockComment(1);
                    idx += 1;
                }
                b'$' => {
                    if let Some((tag, closer)) = dollar_quote_tag(bytes, idx) {
                        state = State::DollarQuoted(tag);
                        idx = closer;
                    } else if !follows_word(bytes, idx)
                        && let Some(marker) = bind_marker(bytes, idx)
                    {
                        idx = marker.end - 1;
                        markers.push(marker);
                    }
                }
                b':' if !follows_word(bytes, idx) && bytes.get(idx + 1) != Some(&b':') => {
                    if let Some((end, name)) = name_after(bytes, idx) {
                        markers.push(LiveMarker {
                            start: idx,
                            end,
                            kind: MarkerKind::NamedReplacement(name),
                        });
                        idx = end - 1;
                    }
                }
                b'?' => markers.push(LiveMarker {
                    start: idx,
                    end: idx + 1,
                    kind: MarkerKind::PositionalReplacement,
                }),
                _ => {}
            },
            State::Quoted(end) => {
                if b == b'\\' && backslash_escapes && matches!(end, b'\'' | b'"') {
                    idx += 1;
                } else if b == end {
                    if bytes.get(idx + 1) == Some(&end) {
                        idx += 1; // doubled quote
                    } else {
                        state = State::Normal;
                    }
                }
            }
            State::LineComment => {
                if b == b'\n' {
                    state = State::Normal;
                }
            }
            State::BlockComment(depth) => {
                if pair_at(bytes, idx, BLOCK_OPEN) {
                    state = State::BlockComment(depth + 1);
                    idx += 1;
                } else if pair_at(bytes, idx, BLOCK_CLOSE) {
                    if depth == 1 {
                        state = State::Normal;
                    } else {
                        state = State::BlockComment(depth - 1);
                    }
                    idx += 1;
                }
            }
            State::DollarQuoted(ref tag) => {
                if closes_dollar_quote(bytes, idx, tag) {
                    idx += tag.len() + 1;
                    state = State::Normal;
                }
            }
        }

        idx += 1;
    }

    markers
}

fn ascii_quotes((open, close): (char, char)) -> (Option<u8>, Option<u8>) {
    let as_byte = |c: char| u8::try_from(c).ok().filter(u8::is_ascii);
    (as_byte(open), as_byte(close))
}
