//! Single-pass tokenizer for normalized project documents.
//!
//! Every piece of non-whitespace text must belong to exactly one token;
//! anything the grammar does not recognize is reported with its line number.

use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;

use crate::constants::PRODUCT_KEYWORD;
use crate::document::{DownloadKind, FileEntry, Platform};
use crate::error::{Error, Result};

static HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"\A{}[ \t]+v(\S+)", regex::escape(PRODUCT_KEYWORD)))
        .expect("header pattern is valid")
});

static NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\AMAKE[ \t]+"([^"\n]+)""#).expect("name pattern is valid"));

static UPDATE_REF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\Aupdate_link\([ \t]*([^)\n]*?)[ \t]*\)").expect("update pattern is valid")
});

static WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\A[^\s(]+").expect("word pattern is valid"));

static DOWNLOAD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\ADOWNLOAD(?::(text|binary))?\(([^)\n]*)\)").expect("download pattern is valid")
});

const BLOCK_OPEN: &str = "(\n";
const BLOCK_CLOSE: &str = "\n)";
const BASE64_OPEN: &str = "BASE64(\n";

/// What a token carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    /// `vibezip v<version>` at the start of a line
    Header(String),
    /// `MAKE "<name>"`
    Name(String),
    /// `update_link(<value>)`
    UpdateRef(String),
    /// `commandsWIN(\n...\n)` and friends, body trimmed
    CommandBlock { platform: Platform, body: String },
    /// `<path>` followed by one of the file block forms
    File(FileEntry),
}

/// A token with the 1-based line it starts on and its byte span in the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub line: usize,
    pub span: Range<usize>,
}

impl Token {
    /// Whether the token describes the document itself rather than a file.
    pub fn is_structural(&self) -> bool {
        !matches!(self.kind, TokenKind::File(_))
    }
}

struct Lexer<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> Lexer<'a> {
    fn new(text: &'a str) -> Self {
        Self { text, pos: 0 }
    }

    fn rest(&self) -> &'a str {
        &self.text[self.pos..]
    }

    fn line_at(&self, offset: usize) -> usize {
        self.text[..offset].matches('\n').count() + 1
    }

    fn skip_whitespace(&mut self) {
        let rest = self.rest();
        self.pos += rest.len() - rest.trim_start().len();
    }

    /// Only spaces and tabs precede `pos` on its line.
    fn at_line_start(&self) -> bool {
        self.text[..self.pos]
            .rsplit('\n')
            .next()
            .is_some_and(|prefix| prefix.chars().all(|c| c == ' ' || c == '\t'))
    }

    fn error(&self, offset: usize, message: impl Into<String>) -> Error {
        Error::ParseError { line: self.line_at(offset), message: message.into() }
    }

    /// Reads a multi-line body starting right after an opening `(\n`.
    /// Returns the body and the offset just past the closing `\n)`, or
    /// just past the `)` when the block is written as `(\n)`.
    fn block_body(&self, body_start: usize, what: &str) -> Result<(&'a str, usize)> {
        let tail = &self.text[body_start..];
        if tail.starts_with(')') {
            return Ok(("", body_start + 1));
        }
        match tail.find(BLOCK_CLOSE) {
            Some(idx) => Ok((&tail[..idx], body_start + idx + BLOCK_CLOSE.len())),
            None => Err(self.error(body_start, format!("unterminated block for '{what}'"))),
        }
    }

    fn next_token(&mut self) -> Result<Option<Token>> {
        self.skip_whitespace();
        if self.pos >= self.text.len() {
            return Ok(None);
        }

        let start = self.pos;
        let line = self.line_at(start);
        let rest = self.rest();

        let (kind, end) = if let Some(caps) =
            HEADER.captures(rest).filter(|_| self.at_line_start())
        {
            (TokenKind::Header(caps[1].to_string()), start + caps[0].len())
        } else if let Some(caps) = NAME.captures(rest) {
            (TokenKind::Name(caps[1].trim().to_string()), start + caps[0].len())
        } else if let Some(caps) = UPDATE_REF.captures(rest) {
            (TokenKind::UpdateRef(caps[1].trim().to_string()), start + caps[0].len())
        } else {
            self.file_or_command(start)?
        };

        self.pos = end;
        Ok(Some(Token { kind, line, span: start..end }))
    }

    fn file_or_command(&self, start: usize) -> Result<(TokenKind, usize)> {
        let word = WORD
            .find(&self.text[start..])
            .map(|m| m.as_str())
            .ok_or_else(|| self.error(start, "unexpected '('"))?;

        let after_word = start + word.len();
        let tail = &self.text[after_word..];
        let block_start = after_word + (tail.len() - tail.trim_start_matches([' ', '\t']).len());
        let tail = &self.text[block_start..];
        let path = word.to_string();

        if tail.starts_with(BLOCK_OPEN) {
            let (body, end) = self.block_body(block_start + BLOCK_OPEN.len(), word)?;
            let kind = if let Some(platform) = Platform::from_block_key(word) {
                TokenKind::CommandBlock { platform, body: body.trim().to_string() }
            } else if body.is_empty() {
                TokenKind::File(FileEntry::Empty { path })
            } else {
                TokenKind::File(FileEntry::Text { path, content: body.to_string() })
            };
            return Ok((kind, end));
        }

        if let Some(caps) = DOWNLOAD.captures(tail) {
            let url = caps[2].trim();
            if url.is_empty() {
                return Err(self.error(start, format!("empty DOWNLOAD url for '{word}'")));
            }
            let kind = match caps.get(1).map(|m| m.as_str()) {
                Some("text") => DownloadKind::Text,
                _ => DownloadKind::Binary,
            };
            let entry = FileEntry::Download { path, url: url.to_string(), kind };
            return Ok((TokenKind::File(entry), block_start + caps[0].len()));
        }

        if tail.starts_with(BASE64_OPEN) {
            let (blob, end) = self.block_body(block_start + BASE64_OPEN.len(), word)?;
            let entry = FileEntry::Base64 { path, blob: blob.trim().to_string() };
            return Ok((TokenKind::File(entry), end));
        }

        if Platform::from_block_key(word).is_some() {
            return Err(self.error(
                start,
                format!("command block '{word}' must open with '(' followed by a newline"),
            ));
        }

        Err(self.error(start, format!("'{word}' is not followed by a file block")))
    }
}

/// Splits normalized document text into tokens, in source order.
///
/// # Errors
/// * `Error::ParseError` for unrecognized text or unterminated blocks
pub fn tokenize(text: &str) -> Result<Vec<Token>> {
    let mut lexer = Lexer::new(text);
    let mut tokens = Vec::new();
    while let Some(token) = lexer.next_token()? {
        tokens.push(token);
    }
    Ok(tokens)
}
