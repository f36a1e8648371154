// src/model/component.rs

use serde::{Deserialize, Serialize};
use std::fmt;

/// A sub-part of a course that is sectioned on its own.
///
/// Wishlists spell these as abbreviations (`L`, `Lb`, `S`, `R`) while the
/// portal uses full words (`Lecture`, `Lab`, ...). Both spellings parse into
/// this one enumeration. Tokens that match neither are kept verbatim in
/// `Other` and only rejected when a course is resolved.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ComponentType {
    Lecture,
    Lab,
    Seminar,
    Recitation,
    Other(String),
}

impl ComponentType {
    /// Parses a wishlist abbreviation. Any token containing `Lb` (e.g. `CLb`)
    /// collapses to `Lab`.
    pub fn from_abbreviation(token: &str) -> Self {
        if token.contains("Lb") {
            return ComponentType::Lab;
        }
        match token {
            "L" => ComponentType::Lecture,
            "S" => ComponentType::Seminar,
            "R" => ComponentType::Recitation,
            other => ComponentType::Other(other.to_string()),
        }
    }

    /// Parses a component name as the portal renders it. Any name containing
    /// `Lab` (e.g. `Computer Lab`) collapses to `Lab`.
    pub fn from_portal_name(name: &str) -> Self {
        if name.contains("Lab") {
            return ComponentType::Lab;
        }
        match name {
            "Lecture" => ComponentType::Lecture,
            "Seminar" => ComponentType::Seminar,
            "Recitation" => ComponentType::Recitation,
            other => ComponentType::Other(other.to_string()),
        }
    }

    pub fn abbreviation(&self) -> &str {
        match self {
            ComponentType::Lecture => "L",
            ComponentType::Lab => "Lb",
            ComponentType::Seminar => "S",
            ComponentType::Recitation => "R",
            ComponentType::Other(raw) => raw,
        }
    }

    pub fn portal_name(&self) -> &str {
        match self {
            ComponentType::Lecture => "Lecture",
            ComponentType::Lab => "Lab",
            ComponentType::Seminar => "Seminar",
            ComponentType::Recitation => "Recitation",
            ComponentType::Other(raw) => raw,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, ComponentType::Other(_))
    }
}

impl fmt::Display for ComponentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.portal_name())
    }
}

// Catalog files are keyed by the portal's wording.
impl From<String> for ComponentType {
    fn from(name: String) -> Self {
        ComponentType::from_portal_name(&name)
    }
}

impl From<ComponentType> for String {
    fn from(kind: ComponentType) -> Self {
        kind.portal_name().to_string()
    }
}
