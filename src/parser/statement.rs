//! The line grammar: an ordered list of matchers, first match wins.

use regex::Regex;
use std::sync::OnceLock;

/// A recognized statement, borrowing from the source line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement<'a> {
    /// `:name;`
    Activity { name: &'a str },
    /// `start`
    Start,
    /// `stop`
    Stop,
    /// `if (condition) then (label)`
    Conditional {
        condition: &'a str,
        yes_label: &'a str,
    },
    /// `label name`
    Label { name: &'a str },
    /// `<shape> "label" [as alias]`
    Shape {
        keyword: &'a str,
        label: &'a str,
        alias: Option<&'a str>,
    },
    /// `-> target;`
    ActivityGoto { target: &'a str },
    /// `source <arrow> target [: "label"]`
    Connection {
        source: &'a str,
        arrow: &'a str,
        target: &'a str,
        label: Option<&'a str>,
    },
    /// A lone word.
    Identifier { name: &'a str },
}

type Matcher = for<'a> fn(&'a str) -> Option<Statement<'a>>;

/// Statement matchers in priority order.
const MATCHERS: &[Matcher] = &[
    match_activity,
    match_start,
    match_stop,
    match_conditional,
    match_label,
    match_shape_with_alias,
    match_shape,
    match_activity_goto,
    match_connection,
    match_identifier,
];

/// Shape keywords accepted in declarations, as a regex alternation.
macro_rules! shapes {
    () => {
        "rectangle|component|actor|database|cloud|folder|frame|package|node|activity|start|stop|diamond|label"
    };
}

/// Whether `word` is a shape keyword the declaration statements accept.
pub fn is_shape_keyword(word: &str) -> bool {
    shapes!().split('|').any(|keyword| keyword == word)
}

/// Recognizes a trimmed, non-comment line.
pub fn recognize(line: &str) -> Option<Statement<'_>> {
    MATCHERS.iter().find_map(|matcher| matcher(line))
}

/// Whether a `note` line opens a multi-line block rather than carrying its text inline.
///
/// Block openers have no text of their own: `note left`, `note right of x`,
/// `note on link`, `note as N1`. Quoted or `:` text makes the note single-line.
pub fn opens_note_block(line: &str) -> bool {
    static RE: OnceLock<Regex> = OnceLock::new();
    regex(
        &RE,
        r"^note\s+(?:(?:left|right|top|bottom)(?:\s+of\s+[A-Za-z0-9_]+)?|over\s+[A-Za-z0-9_, ]+|on\s+link|as\s+[A-Za-z0-9_]+)\s*$",
    )
    .is_match(line)
}

fn regex(cell: &'static OnceLock<Regex>, pattern: &str) -> &'static Regex {
    cell.get_or_init(|| Regex::new(pattern).expect("statement pattern is valid"))
}

fn match_activity(line: &str) -> Option<Statement<'_>> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let caps = regex(&RE, r"^:([^:;]+);").captures(line)?;
    Some(Statement::Activity {
        name: caps.get(1)?.as_str(),
    })
}

fn match_start(line: &str) -> Option<Statement<'_>> {
    (line == "start").then_some(Statement::Start)
}

fn match_stop(line: &str) -> Option<Statement<'_>> {
    (line == "stop").then_some(Statement::Stop)
}

fn match_conditional(line: &str) -> Option<Statement<'_>> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let caps = regex(&RE, r"^if\s*\(([^)]+)\)\s*then\s*\(([^)]+)\)").captures(line)?;
    Some(Statement::Conditional {
        condition: caps.get(1)?.as_str(),
        yes_label: caps.get(2)?.as_str(),
    })
}

fn match_label(line: &str) -> Option<Statement<'_>> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let caps = regex(&RE, r"^label\s+([A-Za-z0-9_]+)").captures(line)?;
    Some(Statement::Label {
        name: caps.get(1)?.as_str(),
    })
}

fn match_shape_with_alias(line: &str) -> Option<Statement<'_>> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let pattern = concat!("^(", shapes!(), r#")\s+"([^"]+)"\s+as\s+([A-Za-z0-9_]+)"#);
    let caps = regex(&RE, pattern).captures(line)?;
    Some(Statement::Shape {
        keyword: caps.get(1)?.as_str(),
        label: caps.get(2)?.as_str(),
        alias: Some(caps.get(3)?.as_str()),
    })
}

fn match_shape(line: &str) -> Option<Statement<'_>> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let pattern = concat!("^(", shapes!(), r#")\s+"([^"]+)""#);
    let caps = regex(&RE, pattern).captures(line)?;
    Some(Statement::Shape {
        keyword: caps.get(1)?.as_str(),
        label: caps.get(2)?.as_str(),
        alias: None,
    })
}

fn match_activity_goto(line: &str) -> Option<Statement<'_>> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let caps = regex(&RE, r"^->\s*([A-Za-z0-9_]+);").captures(line)?;
    Some(Statement::ActivityGoto {
        target: caps.get(1)?.as_str(),
    })
}

fn match_connection(line: &str) -> Option<Statement<'_>> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let caps = regex(
        &RE,
        r#"^([A-Za-z0-9_]+)\s*(-->|->|\.\.>|\.\.\.>)\s*([A-Za-z0-9_]+)(?:\s*:\s*"([^"]+)")?"#,
    )
    .captures(line)?;
    Some(Statement::Connection {
        source: caps.get(1)?.as_str(),
        arrow: caps.get(2)?.as_str(),
        target: caps.get(3)?.as_str(),
        label: caps.get(4).map(|m| m.as_str()),
    })
}

fn match_identifier(line: &str) -> Option<Statement<'_>> {
    static RE: OnceLock<Regex> = OnceLock::new();
    regex(&RE, r"^[A-Za-z0-9_]+$")
        .is_match(line)
        .then_some(Statement::Identifier { name: line })
}
