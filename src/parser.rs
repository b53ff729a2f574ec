//! Document parsing pipeline: comment stripping, structural extraction and
//! file entry parsing.

use indexmap::IndexMap;
use log::debug;

use crate::document::{FileEntry, ParsedDocument, Platform};
use crate::error::{Error, Result};
use crate::lexer::{tokenize, Token, TokenKind};

const COMMENT_MARKER: char = '#';

/// Header fields and command blocks pulled out of a document, together with
/// the text that is left for file entry parsing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Structure {
    pub project_name: Option<String>,
    pub project_version: Option<String>,
    pub update_reference: Option<String>,
    pub command_blocks: IndexMap<Platform, String>,
    /// Input text with every structural token removed. Line breaks inside
    /// removed spans are kept so line numbers still match the source.
    pub residual: String,
}

/// Removes every line whose first non-whitespace character is `#`.
pub fn normalize(raw: &str) -> String {
    raw.lines()
        .filter(|line| !line.trim_start().starts_with(COMMENT_MARKER))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Extracts version, name, update reference and command blocks.
///
/// The first header, name and update reference win. A platform command
/// block declared twice is an error.
///
/// # Errors
/// * `Error::ParseError` if the text does not tokenize
/// * `Error::DuplicateCommandBlock` if a platform key repeats
pub fn extract_structure(text: &str) -> Result<Structure> {
    let tokens = tokenize(text)?;
    let mut structure = Structure::default();
    let mut claimed = Vec::new();

    for token in tokens.into_iter().filter(Token::is_structural) {
        claimed.push(token.span.clone());
        match token.kind {
            TokenKind::Header(version) => {
                structure.project_version.get_or_insert(version);
            }
            TokenKind::Name(name) => {
                structure.project_name.get_or_insert(name);
            }
            TokenKind::UpdateRef(reference) => {
                structure.update_reference.get_or_insert(reference);
            }
            TokenKind::CommandBlock { platform, body } => {
                if structure.command_blocks.contains_key(&platform) {
                    return Err(Error::DuplicateCommandBlock {
                        key: platform.block_key(),
                        line: token.line,
                    });
                }
                debug!("Found {} command block at line {}", platform, token.line);
                structure.command_blocks.insert(platform, body);
            }
            TokenKind::File(_) => unreachable!("file tokens are filtered out"),
        }
    }

    let mut residual = String::with_capacity(text.len());
    let mut cursor = 0;
    for span in claimed {
        residual.push_str(&text[cursor..span.start]);
        residual.extend(text[span.clone()].chars().filter(|c| *c == '\n'));
        cursor = span.end;
    }
    residual.push_str(&text[cursor..]);
    structure.residual = residual;

    Ok(structure)
}

/// Parses the residual text into file entries, in order of appearance.
///
/// # Errors
/// * `Error::ParseError` if the text does not tokenize or still holds
///   header fields or command blocks
pub fn parse_file_entries(residual: &str) -> Result<Vec<FileEntry>> {
    tokenize(residual)?
        .into_iter()
        .map(|token| match token.kind {
            TokenKind::File(entry) => Ok(entry),
            _ => Err(Error::ParseError {
                line: token.line,
                message: "unexpected header field among file entries".to_string(),
            }),
        })
        .collect()
}

/// Runs the full pipeline over a raw document.
///
/// # Arguments
/// * `raw` - Document text as read from disk or fetched from a URL
///
/// # Returns
/// * `Result<ParsedDocument>` - The assembled document model
///
/// # Errors
/// * `Error::MissingRequiredField` if there is no `MAKE "<name>"`
/// * Any error raised by [`extract_structure`] or [`parse_file_entries`]
pub fn parse_document(raw: &str) -> Result<ParsedDocument> {
    let text = normalize(raw);
    let structure = extract_structure(&text)?;

    let project_name = structure
        .project_name
        .ok_or(Error::MissingRequiredField { field: "Project name (MAKE \"<name>\")" })?;

    let file_entries = parse_file_entries(&structure.residual)?;
    debug!("Parsed project '{}' with {} file entries", project_name, file_entries.len());

    Ok(ParsedDocument {
        project_name,
        project_version: structure.project_version,
        update_reference: structure.update_reference,
        command_blocks: structure.command_blocks,
        file_entries,
    })
}
