//! parse document with structure like
//! ```text
//! plot
//!  output: derivative_plot.png
//!  width: 700
//! logging
//!  loglevel: info
//! ```
//! a sequence of sections, each a title followed by `key: value, value` pairs. Lines starting
//! with `#` or `//` are comments. Values are typed on the fly: integer, float, boolean, or
//! plain text otherwise.
use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::{tag, take_while1},
    character::complete::{alpha1, alphanumeric1, multispace0, space0},
    combinator::{map, recognize},
    multi::{many0, many1, separated_list1},
    sequence::{delimited, pair, separated_pair},
};
use std::collections::HashMap;
use std::fmt;

/// A single value on the right of `key:`.
#[derive(Debug, Clone, PartialEq)]
pub enum SettingValue {
    Text(String),
    Float(f64),
    Integer(i64),
    Boolean(bool),
}

impl SettingValue {
    fn from_token(token: &str) -> SettingValue {
        if let Ok(val) = token.parse::<i64>() {
            SettingValue::Integer(val)
        } else if let Ok(val) = token.parse::<f64>() {
            SettingValue::Float(val)
        } else if let Ok(val) = token.parse::<bool>() {
            SettingValue::Boolean(val)
        } else {
            SettingValue::Text(token.to_string())
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        if let SettingValue::Text(s) = self { Some(s.as_str()) } else { None }
    }

    /// integers widen to floats
    pub fn as_float(&self) -> Option<f64> {
        match self {
            SettingValue::Float(f) => Some(*f),
            SettingValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        if let SettingValue::Integer(i) = self { Some(*i) } else { None }
    }

    pub fn as_boolean(&self) -> Option<bool> {
        if let SettingValue::Boolean(b) = self { Some(*b) } else { None }
    }
}

impl fmt::Display for SettingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingValue::Text(s) => write!(f, "{}", s),
            SettingValue::Float(val) => write!(f, "{}", val),
            SettingValue::Integer(val) => write!(f, "{}", val),
            SettingValue::Boolean(val) => write!(f, "{}", val),
        }
    }
}

/// Parsed document: section title -> key -> values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SettingsDocument {
    sections: HashMap<String, HashMap<String, Vec<SettingValue>>>,
}

impl SettingsDocument {
    pub fn get(&self, section: &str, key: &str) -> Option<&[SettingValue]> {
        self.sections.get(section)?.get(key).map(Vec::as_slice)
    }

    /// first value of `section.key`
    pub fn first(&self, section: &str, key: &str) -> Option<&SettingValue> {
        self.get(section, key)?.first()
    }

    pub fn has_section(&self, section: &str) -> bool {
        self.sections.contains_key(section)
    }

    pub fn section_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.sections.keys().map(String::as_str).collect();
        names.sort();
        names
    }
}

/// word of letters, digits and '_', not starting with a digit
fn parse_identifier(input: &str) -> IResult<&str, String> {
    map(
        recognize(pair(
            alt((alpha1, tag("_"))),
            many0(alt((alphanumeric1, tag("_")))),
        )),
        String::from,
    )
    .parse(input)
}

fn parse_value(input: &str) -> IResult<&str, SettingValue> {
    map(
        take_while1(|c: char| !matches!(c, ',' | ' ' | '\t' | '\r' | '\n' | ';')),
        SettingValue::from_token,
    )
    .parse(input)
}

/// `key: v1, v2, ...` followed by any whitespace
fn parse_key_values(input: &str) -> IResult<&str, (String, Vec<SettingValue>)> {
    let values = separated_list1(delimited(space0, tag(","), space0), parse_value);
    let (input, entry) =
        separated_pair(parse_identifier, delimited(space0, tag(":"), space0), values).parse(input)?;
    let (input, _) = multispace0(input)?;
    Ok((input, entry))
}

fn parse_section(input: &str) -> IResult<&str, (String, HashMap<String, Vec<SettingValue>>)> {
    let (input, title) = parse_identifier(input)?;
    let (input, _) = multispace0(input)?;
    let (input, entries) = many1(parse_key_values).parse(input)?;
    Ok((input, (title, entries.into_iter().collect())))
}

fn strip_comments(input: &str) -> String {
    input
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#') && !line.starts_with("//"))
        .collect::<Vec<&str>>()
        .join("\n")
}

/// Parses a whole document. An empty (or comment-only) document is valid and has no sections.
///
/// # Errors
/// Text that is not a sequence of sections, reported with the part that could not be read.
pub fn parse_settings_document(input: &str) -> Result<SettingsDocument, String> {
    let cleaned = strip_comments(input);
    if cleaned.is_empty() {
        return Ok(SettingsDocument::default());
    }
    let mut sections = many1(delimited(multispace0, parse_section, multispace0));
    match sections.parse(cleaned.as_str()) {
        Ok((rest, parsed)) if rest.trim().is_empty() => {
            let mut document = SettingsDocument::default();
            for (title, entries) in parsed {
                document.sections.entry(title).or_default().extend(entries);
            }
            Ok(document)
        }
        Ok((rest, _)) => Err(format!("unexpected text in settings: '{}'", first_line(rest))),
        Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => {
            Err(format!("malformed settings near '{}'", first_line(e.input)))
        }
        Err(nom::Err::Incomplete(_)) => Err("incomplete settings document".to_string()),
    }
}

fn first_line(text: &str) -> &str {
    text.trim().lines().next().unwrap_or("")
}
