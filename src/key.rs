//! Key grammar for hierarchical variable references.
//!
//! A key is a `.`-separated path into a nested document:
//!
//! - bare segments are identifiers (`mode`, `φ`) or decimal numbers (`12`)
//! - quoted segments use double quotes and may contain anything (`"a b"`, `"a.b"`)
//! - whitespace around segments and separators is ignored
//!
//! A key set is a `,`-separated list of keys, used to declare bind groups.

use std::{fmt, iter::Peekable, str::CharIndices, str::FromStr};

use crate::error::{Result, SpanError};

/// A hierarchical path to a variable, e.g. `simulation.mode`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Key(Vec<String>);

impl Key {
    /// Build a key from raw segments without going through the grammar.
    pub fn from_segments<S: Into<String>>(segments: impl IntoIterator<Item = S>) -> Self {
        Self(segments.into_iter().map(Into::into).collect())
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }
}

impl fmt::Display for Key {
    /// Canonical form: bare where the grammar allows it, quoted otherwise.
    /// Re-parsing the output yields an equal key.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            if is_bare(segment) {
                f.write_str(segment)?;
            } else {
                write_quoted(f, segment)?;
            }
        }
        Ok(())
    }
}

impl FromStr for Key {
    type Err = SpanError;

    fn from_str(s: &str) -> Result<Self> {
        parse_key(s)
    }
}

/// Parse a single key.
///
/// ```
/// use span::key::parse_key;
///
/// let key = parse_key(r#""a b".c"#).unwrap();
/// assert_eq!(key.segments(), ["a b", "c"]);
/// assert!(parse_key("a..b").is_err());
/// ```
pub fn parse_key(s: &str) -> Result<Key> {
    let mut keys = parse_key_set(s)?;
    if keys.len() > 1 {
        return Err(SpanError::malformed(s, "too many keys"));
    }
    keys.pop().ok_or_else(|| SpanError::malformed(s, "empty key"))
}

/// Parse a comma separated list of keys.
pub fn parse_key_set(s: &str) -> Result<Vec<Key>> {
    let mut scanner = Scanner::new(s);
    let mut keys = Vec::new();
    let mut segments = Vec::new();

    loop {
        // segment
        match scanner.next_token()? {
            Token::Segment(segment) => segments.push(segment),
            Token::Eof if keys.is_empty() && segments.is_empty() => {
                return Err(SpanError::malformed(s, "empty key"));
            }
            _ => return Err(SpanError::malformed(s, "missing segment")),
        }

        // separator
        match scanner.next_token()? {
            Token::Dot => continue,
            Token::Comma => keys.push(Key(std::mem::take(&mut segments))),
            Token::Eof => {
                keys.push(Key(segments));
                return Ok(keys);
            }
            Token::Segment(_) => return Err(SpanError::malformed(s, "missing separator")),
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Token {
    Segment(String),
    Dot,
    Comma,
    Eof,
}

struct Scanner<'a> {
    input: &'a str,
    chars: Peekable<CharIndices<'a>>,
}

impl<'a> Scanner<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input,
            chars: input.char_indices().peekable(),
        }
    }

    fn next_token(&mut self) -> Result<Token> {
        while self.chars.next_if(|(_, c)| c.is_whitespace()).is_some() {}

        let Some((start, c)) = self.chars.next() else {
            return Ok(Token::Eof);
        };
        match c {
            '.' => Ok(Token::Dot),
            ',' => Ok(Token::Comma),
            '"' => self.quoted().map(Token::Segment),
            c if c.is_ascii_digit() => {
                let end = self.eat_while(|c| c.is_ascii_digit(), start + c.len_utf8());
                Ok(Token::Segment(self.input[start..end].to_string()))
            }
            c if is_ident_start(c) => {
                let end = self.eat_while(is_ident_continue, start + c.len_utf8());
                Ok(Token::Segment(self.input[start..end].to_string()))
            }
            _ => Err(SpanError::malformed(self.input, "unexpected character")),
        }
    }

    /// Consume characters matching `pred`, returning the end byte offset.
    fn eat_while(&mut self, pred: impl Fn(char) -> bool, mut end: usize) -> usize {
        while let Some((i, c)) = self.chars.next_if(|&(_, c)| pred(c)) {
            end = i + c.len_utf8();
        }
        end
    }

    fn quoted(&mut self) -> Result<String> {
        let mut out = String::new();
        loop {
            match self.chars.next() {
                None | Some((_, '\n')) => {
                    return Err(SpanError::malformed(self.input, "unterminated quoted segment"));
                }
                Some((_, '"')) => break,
                Some((_, '\\')) => out.push(self.escape()?),
                Some((_, c)) => out.push(c),
            }
        }
        if out.is_empty() {
            return Err(SpanError::malformed(self.input, "empty quoted segment"));
        }
        Ok(out)
    }

    fn escape(&mut self) -> Result<char> {
        let input = self.input;
        let bad = move || SpanError::malformed(input, "invalid escape sequence");
        let Some((_, c)) = self.chars.next() else {
            return Err(bad());
        };
        let c = match c {
            '"' | '\\' | '\'' => c,
            'n' => '\n',
            't' => '\t',
            'r' => '\r',
            'a' => '\u{07}',
            'b' => '\u{08}',
            'f' => '\u{0C}',
            'v' => '\u{0B}',
            'u' => self.hex_char(4).ok_or_else(bad)?,
            'U' => self.hex_char(8).ok_or_else(bad)?,
            _ => return Err(bad()),
        };
        Ok(c)
    }

    fn hex_char(&mut self, digits: usize) -> Option<char> {
        let mut code = 0u32;
        for _ in 0..digits {
            let (_, c) = self.chars.next()?;
            code = code * 16 + c.to_digit(16)?;
        }
        char::from_u32(code)
    }
}

fn is_ident_start(c: char) -> bool {
    c == '_' || c.is_alphabetic()
}

fn is_ident_continue(c: char) -> bool {
    c == '_' || c.is_alphanumeric()
}

fn is_bare(segment: &str) -> bool {
    let mut chars = segment.chars();
    match chars.next() {
        Some(c) if c.is_ascii_digit() => segment.chars().all(|c| c.is_ascii_digit()),
        Some(c) if is_ident_start(c) => chars.all(is_ident_continue),
        _ => false,
    }
}

fn write_quoted(f: &mut fmt::Formatter<'_>, segment: &str) -> fmt::Result {
    f.write_str("\"")?;
    for c in segment.chars() {
        match c {
            '"' => f.write_str("\\\"")?,
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            '\t' => f.write_str("\\t")?,
            '\r' => f.write_str("\\r")?,
            c if c.is_control() => write!(f, "\\U{:08x}", c as u32)?,
            c => write!(f, "{c}")?,
        }
    }
    f.write_str("\"")
}
