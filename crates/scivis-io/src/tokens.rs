//! Line-tracking tokenizer for legacy VTK text.
//!
//! Legacy files start with two free-form lines (header and title) and
//! continue as whitespace-separated tokens. [`Tokens`] serves both views
//! over any `BufRead` and remembers the current line for error reports.

use std::collections::VecDeque;
use std::io::BufRead;
use std::str::FromStr;

use crate::error::VtkError;

/// Upper bound on values reserved ahead of reading a declared count.
const PREALLOC_LIMIT: usize = 1 << 16;

/// Token stream over legacy VTK text.
pub struct Tokens<R: BufRead> {
    reader: R,
    line: usize,
    pending: VecDeque<String>,
}

impl<R: BufRead> Tokens<R> {
    /// Wrap a reader. No input is consumed until the first call.
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line: 0,
            pending: VecDeque::new(),
        }
    }

    /// Line number of the most recently read line (1-based; 0 before any read).
    pub fn line(&self) -> usize {
        self.line
    }

    /// Returns `true` if unread tokens remain on the current line.
    pub fn has_more_on_line(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Read the next raw line, without its terminator.
    ///
    /// Any tokens still pending from the current line are discarded.
    pub fn raw_line(&mut self) -> Result<Option<String>, VtkError> {
        self.pending.clear();
        let mut buf = String::new();
        if self.reader.read_line(&mut buf)? == 0 {
            return Ok(None);
        }
        self.line += 1;
        let trimmed = buf.trim_end_matches(['\r', '\n']);
        Ok(Some(trimmed.to_string()))
    }

    /// Next whitespace-separated token, skipping blank lines.
    pub fn next_token(&mut self) -> Result<Option<String>, VtkError> {
        self.fill()?;
        Ok(self.pending.pop_front())
    }

    /// Look at the next token without consuming it.
    pub fn peek_token(&mut self) -> Result<Option<&str>, VtkError> {
        self.fill()?;
        Ok(self.pending.front().map(String::as_str))
    }

    /// Next token, or `UnexpectedEof` naming `expected`.
    pub fn expect_token(&mut self, expected: &'static str) -> Result<String, VtkError> {
        self.next_token()?.ok_or(VtkError::UnexpectedEof {
            line: self.line,
            expected,
        })
    }

    /// Consume a keyword, compared case-insensitively.
    pub fn expect_keyword(&mut self, keyword: &'static str) -> Result<(), VtkError> {
        let token = self.expect_token(keyword)?;
        if token.eq_ignore_ascii_case(keyword) {
            Ok(())
        } else {
            Err(VtkError::InvalidToken {
                line: self.line,
                token,
                expected: keyword,
            })
        }
    }

    /// Next token parsed as `T`.
    pub fn parse<T: FromStr>(&mut self, expected: &'static str) -> Result<T, VtkError> {
        let token = self.expect_token(expected)?;
        token.parse().map_err(|_| VtkError::InvalidToken {
            line: self.line,
            token,
            expected,
        })
    }

    /// Read exactly `n` floating-point values.
    ///
    /// `n` comes from the file, so the buffer grows with the values
    /// actually read rather than being reserved up front.
    pub fn parse_f64s(&mut self, n: usize) -> Result<Vec<f64>, VtkError> {
        let mut out = Vec::with_capacity(n.min(PREALLOC_LIMIT));
        for _ in 0..n {
            out.push(self.parse("a number")?);
        }
        Ok(out)
    }

    /// Consume `n` tokens without keeping them.
    pub fn skip_tokens(&mut self, n: usize, expected: &'static str) -> Result<(), VtkError> {
        for _ in 0..n {
            self.expect_token(expected)?;
        }
        Ok(())
    }

    fn fill(&mut self) -> Result<(), VtkError> {
        let mut buf = String::new();
        while self.pending.is_empty() {
            buf.clear();
            if self.reader.read_line(&mut buf)? == 0 {
                break;
            }
            self.line += 1;
            self.pending
                .extend(buf.split_whitespace().map(str::to_string));
        }
        Ok(())
    }
}

/// Escape an array name for a whitespace-separated format.
///
/// Whitespace, `%`, and non-printable bytes become `%XX`.
pub fn encode_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for b in name.bytes() {
        if b <= b' ' || b == b'%' || b > b'~' {
            out.push_str(&format!("%{b:02X}"));
        } else {
            out.push(b as char);
        }
    }
    out
}

/// Inverse of [`encode_name`]. Malformed escapes are kept verbatim.
pub fn decode_name(token: &str) -> String {
    let bytes = token.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            let escaped = std::str::from_utf8(&bytes[i + 1..i + 3])
                .ok()
                .filter(|hex| hex.bytes().all(|c| c.is_ascii_hexdigit()))
                .and_then(|hex| u8::from_str_radix(hex, 16).ok());
            if let Some(b) = escaped {
                out.push(b);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_track_lines_and_skip_blanks() {
        let text = "header\ntitle\n\nA B\n\n  C\n";
        let mut t = Tokens::new(text.as_bytes());
        assert_eq!(t.raw_line().unwrap().as_deref(), Some("header"));
        assert_eq!(t.raw_line().unwrap().as_deref(), Some("title"));
        assert_eq!(t.next_token().unwrap().as_deref(), Some("A"));
        assert_eq!(t.line(), 4);
        assert_eq!(t.peek_token().unwrap(), Some("B"));
        assert_eq!(t.next_token().unwrap().as_deref(), Some("B"));
        assert_eq!(t.next_token().unwrap().as_deref(), Some("C"));
        assert_eq!(t.line(), 6);
        assert_eq!(t.next_token().unwrap(), None);
    }

    #[test]
    fn parse_reports_line_and_token() {
        let mut t = Tokens::new("1 2\nx\n".as_bytes());
        assert_eq!(t.parse_f64s(2).unwrap(), vec![1.0, 2.0]);
        match t.parse::<f64>("a number") {
            Err(VtkError::InvalidToken { line, token, .. }) => {
                assert_eq!(line, 2);
                assert_eq!(token, "x");
            }
            other => panic!("expected InvalidToken, got {other:?}"),
        }
    }

    #[test]
    fn huge_declared_count_fails_at_eof() {
        let mut t = Tokens::new("1 2 3\n".as_bytes());
        assert!(matches!(
            t.parse_f64s(usize::MAX),
            Err(VtkError::UnexpectedEof { line: 1, .. })
        ));
    }

    #[test]
    fn skip_tokens_crosses_lines() {
        let mut t = Tokens::new("a b\nc\nd\n".as_bytes());
        t.skip_tokens(3, "a value").unwrap();
        assert_eq!(t.next_token().unwrap().as_deref(), Some("d"));
        assert!(matches!(
            t.skip_tokens(1, "a value"),
            Err(VtkError::UnexpectedEof { expected: "a value", .. })
        ));
    }

    #[test]
    fn eof_is_reported() {
        let mut t = Tokens::new("".as_bytes());
        assert!(matches!(
            t.expect_token("DATASET"),
            Err(VtkError::UnexpectedEof {
                expected: "DATASET",
                ..
            })
        ));
    }

    #[test]
    fn keywords_are_case_insensitive() {
        let mut t = Tokens::new("dataset\n".as_bytes());
        assert!(t.expect_keyword("DATASET").is_ok());
    }

    #[test]
    fn names_with_spaces_round_trip() {
        let name = "wind speed 100%";
        let encoded = encode_name(name);
        assert_eq!(encoded, "wind%20speed%20100%25");
        assert_eq!(decode_name(&encoded), name);
        assert_eq!(decode_name("Pressure"), "Pressure");
        assert_eq!(decode_name("bad%zz"), "bad%zz");
        assert_eq!(decode_name("tail%2"), "tail%2");
    }
}
