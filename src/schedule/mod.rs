// src/schedule/mod.rs

use crate::error::{RegistrarError, Result};
use crate::model::{ComponentType, DesiredSchedule, DesiredSection};
use regex::Regex;
use std::fmt;
use std::path::Path;
use std::sync::OnceLock;
use tracing::{debug, info};

/// Something in the wishlist that was ignored while parsing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParseWarning {
    NoSeparator { line: usize },
    EmptyCourseCode { line: usize },
    MalformedSpec { line: usize, course: String, spec: String },
    NoValidSections { line: usize, course: String },
    DuplicateCourse { line: usize, course: String },
}

impl fmt::Display for ParseWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseWarning::NoSeparator { line } => {
                write!(f, "line {line}: no ':' separator, line ignored")
            }
            ParseWarning::EmptyCourseCode { line } => {
                write!(f, "line {line}: empty course code, line ignored")
            }
            ParseWarning::MalformedSpec { line, course, spec } => write!(
                f,
                "line {line}: '{spec}' for '{course}' is not <number><type>, ignored"
            ),
            ParseWarning::NoValidSections { line, course } => {
                write!(f, "line {line}: '{course}' has no valid sections, ignored")
            }
            ParseWarning::DuplicateCourse { line, course } => write!(
                f,
                "line {line}: '{course}' listed again, replaces the earlier line"
            ),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct ParsedSchedule {
    pub schedule: DesiredSchedule,
    pub warnings: Vec<ParseWarning>,
}

fn spec_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^(\d+)([A-Za-z]+)$").expect("section spec pattern"))
}

/// Splits `2Lb` into its section number and normalized component type.
pub fn parse_section_spec(spec: &str) -> Option<DesiredSection> {
    let caps = spec_pattern().captures(spec)?;
    Some(DesiredSection {
        section_num: caps[1].to_string(),
        kind: ComponentType::from_abbreviation(&caps[2]),
    })
}

/// Parses wishlist text of the form `COURSE CODE: 1L, 2Lb`.
pub fn parse_wishlist(text: &str) -> ParsedSchedule {
    let mut parsed = ParsedSchedule::default();

    for (idx, raw_line) in text.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw_line.trim();
        if line.is_empty() {
            continue;
        }

        let Some((code, specs)) = line.split_once(':') else {
            parsed.warnings.push(ParseWarning::NoSeparator { line: line_no });
            continue;
        };

        let code = code.trim();
        if code.is_empty() {
            parsed.warnings.push(ParseWarning::EmptyCourseCode { line: line_no });
            continue;
        }

        let mut sections = Vec::new();
        for spec in specs.split(',').map(str::trim) {
            match parse_section_spec(spec) {
                Some(section) => sections.push(section),
                None if spec.is_empty() => {}
                None => parsed.warnings.push(ParseWarning::MalformedSpec {
                    line: line_no,
                    course: code.to_string(),
                    spec: spec.to_string(),
                }),
            }
        }

        if sections.is_empty() {
            parsed.warnings.push(ParseWarning::NoValidSections {
                line: line_no,
                course: code.to_string(),
            });
            continue;
        }

        debug!(course = code, sections = sections.len(), "Parsed wishlist line");
        if parsed.schedule.upsert(code, sections) {
            parsed.warnings.push(ParseWarning::DuplicateCourse {
                line: line_no,
                course: code.to_string(),
            });
        }
    }

    parsed
}

/// Reads and parses a wishlist file. A missing file is `MissingInput`.
pub fn load_wishlist(path: &Path) -> Result<ParsedSchedule> {
    info!("📖 Reading wishlist '{}'", path.display());
    let text = std::fs::read_to_string(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => RegistrarError::MissingInput(path.to_path_buf()),
        _ => RegistrarError::Io(e),
    })?;

    let parsed = parse_wishlist(&text);
    info!(
        courses = parsed.schedule.len(),
        warnings = parsed.warnings.len(),
        "✅ Wishlist parsed"
    );
    Ok(parsed)
}
