//! Person names
//!
//! Names are split into first/middle/last token lists the simple way:
//! "Last, First Middle" or "First Middle Last". Prefixes like "van" are not
//! treated specially and a "Jr" part in "Last, Jr, First" is dropped.

use serde::{Deserialize, Serialize};

/// Separator placed between rendered persons in a flat table cell
pub const PERSON_SEPARATOR: &str = "  and  ";

/// Structured person name
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Person {
    pub first: Vec<String>,
    pub middle: Vec<String>,
    pub last: Vec<String>,
}

impl Person {
    /// Create a person from a family name only
    pub fn new(last: impl Into<String>) -> Self {
        Self {
            last: vec![last.into()],
            ..Self::default()
        }
    }

    /// Builder method to add a first-name token
    pub fn with_first(mut self, first: impl Into<String>) -> Self {
        self.first.push(first.into());
        self
    }

    /// Builder method to add a middle-name token
    pub fn with_middle(mut self, middle: impl Into<String>) -> Self {
        self.middle.push(middle.into());
        self
    }

    /// Parse a single BibTeX name
    pub fn parse(name: &str) -> Self {
        let parts: Vec<&str> = split_top_level(name, ',');

        match parts.as_slice() {
            [] => Self::default(),
            [whole] => {
                let tokens = tokens(whole);
                match tokens.split_last() {
                    None => Self::default(),
                    Some((last, [])) => Self::new(last.clone()),
                    Some((last, rest)) => Self {
                        first: rest[..1].to_vec(),
                        middle: rest[1..].to_vec(),
                        last: vec![last.clone()],
                    },
                }
            }
            [last, .., given] => {
                let given = tokens(given);
                let (first, middle) = match given.split_first() {
                    Some((first, middle)) => (vec![first.clone()], middle.to_vec()),
                    None => (Vec::new(), Vec::new()),
                };
                Self {
                    first,
                    middle,
                    last: tokens(last),
                }
            }
        }
    }

    pub fn first_name(&self) -> String {
        self.first.concat()
    }

    pub fn middle_name(&self) -> String {
        self.middle.concat()
    }

    pub fn last_name(&self) -> String {
        self.last.concat()
    }

    /// Flat rendering: each part's tokens concatenated, non-empty parts
    /// joined by single spaces
    pub fn render(&self) -> String {
        [self.first_name(), self.middle_name(), self.last_name()]
            .into_iter()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Format as "Last, First Middle" for BibTeX output
    pub fn to_bibtex_format(&self) -> String {
        let family = self.last.join(" ");
        let given = self
            .first
            .iter()
            .chain(&self.middle)
            .cloned()
            .collect::<Vec<_>>()
            .join(" ");

        if given.is_empty() {
            family
        } else {
            format!("{}, {}", family, given)
        }
    }
}

/// Render a person list as one flat table cell
pub fn render_persons(persons: &[Person]) -> String {
    persons
        .iter()
        .map(Person::render)
        .collect::<Vec<_>>()
        .join(PERSON_SEPARATOR)
}

/// Parse a BibTeX name-list field ("A and B and C") into persons
pub fn parse_persons(field: &str) -> Vec<Person> {
    split_names(field)
        .iter()
        .map(|name| Person::parse(name))
        .collect()
}

/// Split a name-list field on the word "and" outside of braces
pub fn split_names(field: &str) -> Vec<String> {
    let mut names = Vec::new();
    let mut current: Vec<String> = Vec::new();

    for token in tokens(field) {
        if token.eq_ignore_ascii_case("and") {
            if !current.is_empty() {
                names.push(current.join(" "));
                current.clear();
            }
        } else {
            current.push(token);
        }
    }
    if !current.is_empty() {
        names.push(current.join(" "));
    }

    names
}

/// Whitespace-separated tokens, keeping braced groups intact
fn tokens(input: &str) -> Vec<String> {
    let mut result = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;

    for c in input.chars() {
        match c {
            '{' => {
                depth += 1;
                current.push(c);
            }
            '}' => {
                depth = depth.saturating_sub(1);
                current.push(c);
            }
            c if c.is_whitespace() && depth == 0 => {
                if !current.is_empty() {
                    result.push(std::mem::take(&mut current));
                }
            }
            c => current.push(c),
        }
    }
    if !current.is_empty() {
        result.push(current);
    }

    result
}

/// Split on `sep` outside of braces, trimming each piece
fn split_top_level(input: &str, sep: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;

    for (i, c) in input.char_indices() {
        match c {
            '{' => depth += 1,
            '}' => depth = depth.saturating_sub(1),
            c if c == sep && depth == 0 => {
                parts.push(input[start..i].trim());
                start = i + c.len_utf8();
            }
            _ => {}
        }
    }
    parts.push(input[start..].trim());

    if parts.iter().all(|p| p.is_empty()) {
        Vec::new()
    } else {
        parts
    }
}
