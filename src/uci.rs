//! Line grammar for UCI configuration text.
//!
//! A file is a run of sections, each introduced by `config <type> '<name>'`
//! and followed by `option <key> '<value>'` lines. Values may be single
//! quoted, double quoted or bare. Anything else on a line is ignored.
use nom::branch::alt;
use nom::bytes::complete::{is_not, tag, take_while1};
use nom::character::complete::{char, space1};
use nom::combinator::{map, opt, rest};
use nom::sequence::{delimited, preceded, tuple};
use nom::IResult;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line<'a> {
    Header { section_type: &'a str, name: &'a str },
    Opt { key: &'a str, value: &'a str },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section<'a> {
    pub section_type: &'a str,
    pub name: &'a str,
    // Options in file order, duplicates kept
    pub options: Vec<(&'a str, &'a str)>,
}

impl<'a> Section<'a> {
    /// An empty `name` filter matches every section of the type.
    pub fn matches(&self, section_type: &str, name: &str) -> bool {
        self.section_type == section_type && (name.is_empty() || self.name == name)
    }

    /// Last value given for `key` in this section.
    pub fn get(&self, key: &str) -> Option<&'a str> {
        self.options
            .iter()
            .rev()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| *v)
    }
}

fn word(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| !c.is_whitespace())(input)
}

fn single_quoted(input: &str) -> IResult<&str, &str> {
    delimited(
        char('\''),
        map(opt(is_not("'")), |v| v.unwrap_or("")),
        char('\''),
    )(input)
}

fn double_quoted(input: &str) -> IResult<&str, &str> {
    delimited(
        char('"'),
        map(opt(is_not("\"")), |v| v.unwrap_or("")),
        char('"'),
    )(input)
}

fn value(input: &str) -> IResult<&str, &str> {
    alt((single_quoted, double_quoted, rest))(input)
}

fn header_line(input: &str) -> IResult<&str, Line<'_>> {
    map(
        tuple((tag("config"), space1, word, opt(preceded(space1, value)))),
        |(_, _, section_type, name)| Line::Header {
            section_type,
            name: name.unwrap_or(""),
        },
    )(input)
}

fn option_line(input: &str) -> IResult<&str, Line<'_>> {
    map(
        tuple((tag("option"), space1, word, space1, value)),
        |(_, _, key, _, value)| Line::Opt { key, value },
    )(input)
}

/// Parse one line, surrounding whitespace ignored.
pub fn parse_line(line: &str) -> Option<Line<'_>> {
    alt((header_line, option_line))(line.trim())
        .ok()
        .map(|(_, line)| line)
}

/// Split `text` into sections. Option lines before the first header are dropped.
pub fn sections(text: &str) -> Vec<Section<'_>> {
    let mut sections: Vec<Section<'_>> = Vec::new();
    for line in text.lines() {
        match parse_line(line) {
            Some(Line::Header { section_type, name }) => sections.push(Section {
                section_type,
                name,
                options: Vec::new(),
            }),
            Some(Line::Opt { key, value }) => {
                if let Some(section) = sections.last_mut() {
                    section.options.push((key, value));
                }
            }
            None => {}
        }
    }
    sections
}
