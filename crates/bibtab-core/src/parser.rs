//! BibTeX reader built on nom
//!
//! Handles:
//! - @string definitions (plus the builtin month macros)
//! - @preamble declarations
//! - @comment sections
//! - Braced and quoted field values, nested braces
//! - String concatenation with #
//!
//! Entries come out as [`Record`]s: type and field names lowercased,
//! `author`/`editor` split into [`Person`](crate::Person) lists.

use nom::{
    branch::alt,
    bytes::complete::take_while1,
    character::complete::{char, multispace0},
    combinator::map,
    IResult,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use crate::error::{BibtabError, Result};
use crate::person::parse_persons;
use crate::record::{Database, Record, PERSON_ROLES};

/// A recoverable problem found while reading
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseIssue {
    pub line: u32,
    pub message: String,
}

/// Result of parsing a BibTeX file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseResult {
    pub database: Database,
    pub preambles: Vec<String>,
    pub strings: HashMap<String, String>,
    pub issues: Vec<ParseIssue>,
}

/// Error type for input that is not BibTeX at all
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("input has content but no @-declarations")]
    NoEntries,
}

/// Characters that end a cite key
const KEY_TERMINATORS: &str = ",{}()=\"#%";

const MONTHS: [(&str, &str); 12] = [
    ("jan", "January"),
    ("feb", "February"),
    ("mar", "March"),
    ("apr", "April"),
    ("may", "May"),
    ("jun", "June"),
    ("jul", "July"),
    ("aug", "August"),
    ("sep", "September"),
    ("oct", "October"),
    ("nov", "November"),
    ("dec", "December"),
];

/// Parse BibTeX text
pub fn parse(input: &str) -> ParseResult {
    let mut result = ParseResult {
        strings: MONTHS
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
        ..ParseResult::default()
    };

    let mut remaining = input;
    let mut current_line = 1u32;

    while !remaining.is_empty() {
        let (rest, skipped) = skip_whitespace_and_comments(remaining);
        current_line += skipped.matches('\n').count() as u32;
        remaining = rest;

        if remaining.is_empty() {
            break;
        }

        if remaining.starts_with('@') {
            match parse_at_entry(remaining, &result.strings) {
                Ok((rest, at_entry)) => {
                    match at_entry {
                        AtEntry::Entry(record) => {
                            if result.database.contains_key(&record.key) {
                                result.issues.push(ParseIssue {
                                    line: current_line,
                                    message: format!(
                                        "duplicate entry key '{}' (later entry ignored)",
                                        record.key
                                    ),
                                });
                            } else {
                                result.database.insert(record);
                            }
                        }
                        AtEntry::String(key, value) => {
                            result.strings.insert(key.to_lowercase(), value);
                        }
                        AtEntry::Preamble(text) => result.preambles.push(text),
                        AtEntry::Comment => {}
                    }
                    let consumed = &remaining[..remaining.len() - rest.len()];
                    current_line += consumed.matches('\n').count() as u32;
                    remaining = rest;
                }
                Err(_) => {
                    result.issues.push(ParseIssue {
                        line: current_line,
                        message: "Failed to parse entry".to_string(),
                    });
                    // Skip to next @ or end
                    match remaining[1..].find('@') {
                        Some(pos) => {
                            let skipped = &remaining[..pos + 1];
                            current_line += skipped.matches('\n').count() as u32;
                            remaining = &remaining[pos + 1..];
                        }
                        None => break,
                    }
                }
            }
        } else {
            match remaining.find('@') {
                Some(pos) => {
                    current_line += remaining[..pos].matches('\n').count() as u32;
                    remaining = &remaining[pos..];
                }
                None => break,
            }
        }
    }

    result
}

/// Parse input that must be BibTeX.
///
/// Text outside of `@`-declarations is normally skipped. Input with content
/// (other than `%` comment lines) but no `@` at all is rejected.
pub fn parse_document(input: &str) -> std::result::Result<ParseResult, ParseError> {
    let has_content = input
        .lines()
        .map(str::trim)
        .any(|line| !line.is_empty() && !line.starts_with('%'));
    if has_content && !input.contains('@') {
        return Err(ParseError::NoEntries);
    }
    Ok(parse(input))
}

/// Read and parse a BibTeX file
pub fn read_file(path: &Path) -> Result<ParseResult> {
    if !path.is_file() {
        return Err(BibtabError::MissingInput(path.to_path_buf()));
    }
    let content = std::fs::read_to_string(path)?;
    let result = parse_document(&content)?;
    tracing::info!(
        "Parsed '{}': found {} reference(s)",
        path.display(),
        result.database.len()
    );
    Ok(result)
}

enum AtEntry {
    Entry(Record),
    String(String, String),
    Preamble(String),
    Comment,
}

/// Skip whitespace and % line comments, return remaining input and skipped text
fn skip_whitespace_and_comments(input: &str) -> (&str, &str) {
    let mut pos = 0;
    let bytes = input.as_bytes();

    while pos < bytes.len() {
        if bytes[pos].is_ascii_whitespace() {
            pos += 1;
        } else if bytes[pos] == b'%' {
            while pos < bytes.len() && bytes[pos] != b'\n' {
                pos += 1;
            }
        } else {
            break;
        }
    }

    (&input[pos..], &input[..pos])
}

fn parse_at_entry<'a>(
    input: &'a str,
    strings: &HashMap<String, String>,
) -> IResult<&'a str, AtEntry> {
    let (rest, _) = char('@')(input)?;
    let (rest, _) = multispace0(rest)?;
    let (rest, entry_type) = take_while1(|c: char| c.is_ascii_alphanumeric())(rest)?;

    match entry_type.to_lowercase().as_str() {
        "string" => {
            let (rest, (key, value)) = parse_string_definition(rest, strings)?;
            Ok((rest, AtEntry::String(key, value)))
        }
        "preamble" => {
            let (rest, text) = parse_preamble(rest, strings)?;
            Ok((rest, AtEntry::Preamble(text)))
        }
        "comment" => {
            let (rest, _) = parse_comment_body(rest)?;
            Ok((rest, AtEntry::Comment))
        }
        _ => {
            let (rest, record) = parse_entry_body(rest, entry_type, strings)?;
            Ok((rest, AtEntry::Entry(record)))
        }
    }
}

fn parse_string_definition<'a>(
    input: &'a str,
    strings: &HashMap<String, String>,
) -> IResult<&'a str, (String, String)> {
    let (rest, _) = multispace0(input)?;
    let (rest, _) = char('{')(rest)?;
    let (rest, (key, value)) = parse_single_field(rest, strings)?;
    let (rest, _) = multispace0(rest)?;
    let (rest, _) = char('}')(rest)?;

    Ok((rest, (key, value)))
}

fn parse_preamble<'a>(
    input: &'a str,
    strings: &HashMap<String, String>,
) -> IResult<&'a str, String> {
    let (rest, _) = multispace0(input)?;
    let (rest, _) = char('{')(rest)?;
    let (rest, _) = multispace0(rest)?;
    let (rest, value) = parse_field_value(rest, strings)?;
    let (rest, _) = multispace0(rest)?;
    let (rest, _) = char('}')(rest)?;

    Ok((rest, value))
}

/// Skip a @comment body (braced, or to end of line)
fn parse_comment_body(input: &str) -> IResult<&str, ()> {
    let (rest, _) = multispace0(input)?;
    if rest.starts_with('{') {
        let (rest, _) = parse_braced_content(rest)?;
        Ok((rest, ()))
    } else {
        let pos = rest.find('\n').unwrap_or(rest.len());
        Ok((&rest[pos..], ()))
    }
}

fn parse_entry_body<'a>(
    input: &'a str,
    entry_type: &str,
    strings: &HashMap<String, String>,
) -> IResult<&'a str, Record> {
    let (rest, _) = multispace0(input)?;
    let (rest, _) = char('{')(rest)?;
    let (rest, _) = multispace0(rest)?;

    let (rest, key) =
        take_while1(|c: char| !c.is_whitespace() && !KEY_TERMINATORS.contains(c))(rest)?;
    let (rest, _) = multispace0(rest)?;
    let (rest, _) = char(',')(rest)?;

    let (rest, fields) = parse_fields(rest, strings)?;

    let (rest, _) = multispace0(rest)?;
    let (rest, _) = char('}')(rest)?;

    let mut record = Record::new(key, entry_type);
    for (name, value) in fields {
        let name = name.to_lowercase();
        if PERSON_ROLES.contains(&name.as_str()) {
            for person in parse_persons(&value) {
                record.add_person(&name, person);
            }
        } else {
            record.set_field(&name, value);
        }
    }

    Ok((rest, record))
}

fn parse_fields<'a>(
    input: &'a str,
    strings: &HashMap<String, String>,
) -> IResult<&'a str, Vec<(String, String)>> {
    let mut fields = Vec::new();
    let mut remaining = input;

    loop {
        let (rest, _) = multispace0(remaining)?;

        if rest.starts_with('}') {
            return Ok((rest, fields));
        }

        match parse_single_field(rest, strings) {
            Ok((rest, field)) => {
                fields.push(field);
                let (rest, _) = multispace0(rest)?;
                remaining = rest.strip_prefix(',').unwrap_or(rest);
            }
            Err(_) => return Ok((remaining, fields)),
        }
    }
}

/// Parse `name = value`
fn parse_single_field<'a>(
    input: &'a str,
    strings: &HashMap<String, String>,
) -> IResult<&'a str, (String, String)> {
    let (rest, _) = multispace0(input)?;
    let (rest, key) =
        take_while1(|c: char| c.is_ascii_alphanumeric() || c == '_' || c == '-')(rest)?;
    let (rest, _) = multispace0(rest)?;
    let (rest, _) = char('=')(rest)?;
    let (rest, _) = multispace0(rest)?;
    let (rest, value) = parse_field_value(rest, strings)?;

    Ok((rest, (key.to_string(), value)))
}

/// Parse a field value (braced, quoted, number, or macro), joined by #
fn parse_field_value<'a>(
    input: &'a str,
    strings: &HashMap<String, String>,
) -> IResult<&'a str, String> {
    let mut result = String::new();
    let mut remaining = input;

    loop {
        let (rest, _) = multispace0(remaining)?;

        let (rest, part) = alt((
            parse_braced_value,
            parse_quoted_value,
            map(take_while1(|c: char| c.is_ascii_digit()), |s: &str| {
                s.to_string()
            }),
            map(
                take_while1(|c: char| c.is_ascii_alphanumeric() || c == '_' || c == '-'),
                |s: &str| {
                    strings
                        .get(&s.to_lowercase())
                        .cloned()
                        .unwrap_or_else(|| s.to_string())
                },
            ),
        ))(rest)?;

        result.push_str(&part);
        remaining = rest;

        let (rest, _) = multispace0(remaining)?;
        match rest.strip_prefix('#') {
            Some(stripped) => remaining = stripped,
            None => return Ok((rest, result)),
        }
    }
}

/// Parse {content}, dropping the outer braces
fn parse_braced_value(input: &str) -> IResult<&str, String> {
    let (rest, content) = parse_braced_content(input)?;
    Ok((rest, content[1..content.len() - 1].to_string()))
}

/// Braced content including nested braces
fn parse_braced_content(input: &str) -> IResult<&str, &str> {
    if !input.starts_with('{') {
        return Err(char_error(input));
    }

    let mut depth = 0;
    let mut pos = 0;
    let bytes = input.as_bytes();

    while pos < bytes.len() {
        match bytes[pos] {
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Ok((&input[pos + 1..], &input[..pos + 1]));
                }
            }
            b'\\' => pos += 1,
            _ => {}
        }
        pos += 1;
    }

    Err(char_error(input))
}

/// Parse "content", allowing braces and escapes inside
fn parse_quoted_value(input: &str) -> IResult<&str, String> {
    let Some(body) = input.strip_prefix('"') else {
        return Err(char_error(input));
    };

    let mut result = String::new();
    let mut brace_depth = 0usize;
    let mut chars = body.char_indices();

    while let Some((i, c)) = chars.next() {
        match c {
            '"' if brace_depth == 0 => return Ok((&body[i + 1..], result)),
            '{' => {
                brace_depth += 1;
                result.push(c);
            }
            '}' => {
                brace_depth = brace_depth.saturating_sub(1);
                result.push(c);
            }
            '\\' => {
                result.push(c);
                if let Some((_, escaped)) = chars.next() {
                    result.push(escaped);
                }
            }
            c => result.push(c),
        }
    }

    Err(char_error(input))
}

fn char_error(input: &str) -> nom::Err<nom::error::Error<&str>> {
    nom::Err::Error(nom::error::Error::new(input, nom::error::ErrorKind::Char))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_entry() {
        let input = r#"
@article{Smith2024,
    author = {John Smith},
    title = {A Great Paper},
    year = {2024},
    journal = {Nature},
}
"#;
        let result = parse(input);
        assert_eq!(result.database.len(), 1);
        assert!(result.issues.is_empty());

        let record = result.database.get("Smith2024").unwrap();
        assert_eq!(record.entry_type, "article");
        assert_eq!(record.persons("author")[0].last_name(), "Smith");
        assert_eq!(record.get_field("author"), None);
        assert_eq!(record.get_field("title"), Some("A Great Paper"));
        assert_eq!(record.year(), Some("2024"));
    }

    #[test]
    fn test_field_names_and_type_lowercased() {
        let result = parse("@ARTICLE{K, Title = {T}, abstractNote = {A}}");
        let record = result.database.get("K").unwrap();
        assert_eq!(record.entry_type, "article");
        assert_eq!(record.fields()[0].name, "title");
        assert_eq!(record.get_field("abstractNote"), Some("A"));
    }

    #[test]
    fn test_parse_quoted_values() {
        let input = r#"@misc{Test2024, title = "Testing \"Quotes\" in Zürich"}"#;
        let result = parse(input);
        assert_eq!(
            result.database.get("Test2024").unwrap().get_field("title"),
            Some(r#"Testing \"Quotes\" in Zürich"#)
        );
    }

    #[test]
    fn test_parse_nested_braces() {
        let result = parse("@article{T, title = {A {B}ook about {LaTeX}}}");
        assert_eq!(
            result.database.get("T").unwrap().get_field("title"),
            Some("A {B}ook about {LaTeX}")
        );
    }

    #[test]
    fn test_parse_string_definitions_and_months() {
        let input = r#"
@string{nature = "Nature"}
@article{Test2024,
    journal = nature # " Physics",
    month = jan,
}
"#;
        let result = parse(input);
        let record = result.database.get("Test2024").unwrap();
        assert_eq!(record.get_field("journal"), Some("Nature Physics"));
        assert_eq!(record.get_field("month"), Some("January"));
    }

    #[test]
    fn test_recovers_after_broken_entry() {
        let input = "@article{Broken title = {x}}\n\n@book{Good, title = {Fine}}";
        let result = parse(input);
        assert_eq!(result.issues.len(), 1);
        assert_eq!(result.issues[0].line, 1);
        assert!(result.database.contains_key("Good"));
    }

    #[test]
    fn test_duplicate_key_keeps_first() {
        let input = "@misc{A, title = {One}}\n@misc{A, title = {Two}}";
        let result = parse(input);
        assert_eq!(result.database.len(), 1);
        assert_eq!(result.database.get("A").unwrap().get_field("title"), Some("One"));
        assert_eq!(result.issues.len(), 1);
        assert_eq!(result.issues[0].line, 2);
    }

    #[test]
    fn test_non_ascii_and_punctuated_keys() {
        let input = "@article{Müller2020, title = {T}}\n@misc{doi:10.1/x_y+z, title = {U}}";
        let result = parse(input);
        assert!(result.issues.is_empty());
        assert!(result.database.contains_key("Müller2020"));
        assert!(result.database.contains_key("doi:10.1/x_y+z"));
    }

    #[test]
    fn test_parse_document_rejects_non_bibtex() {
        assert_eq!(
            parse_document("this is not a bibtex file at all\n\x00\x01").unwrap_err(),
            ParseError::NoEntries
        );
    }

    #[test]
    fn test_parse_document_accepts_empty_and_comment_only() {
        assert!(parse_document("").unwrap().database.is_empty());
        assert!(parse_document("% just a comment\n\n").unwrap().database.is_empty());
        assert_eq!(parse_document("@misc{A, title = {T}}").unwrap().database.len(), 1);
    }
}
