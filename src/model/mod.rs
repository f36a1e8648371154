// src/model/mod.rs

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

pub mod component;
pub use component::ComponentType;

/// One `<section-number><type>` entry from the wishlist.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DesiredSection {
    pub section_num: String,
    pub kind: ComponentType,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DesiredCourse {
    pub code: String,
    pub sections: Vec<DesiredSection>,
}

/// The user's wishlist, in file order. Course codes are unique.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DesiredSchedule {
    courses: Vec<DesiredCourse>,
}

impl DesiredSchedule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a course. An existing code keeps its position but takes the
    /// new sections; returns `true` in that case.
    pub fn upsert(&mut self, code: &str, sections: Vec<DesiredSection>) -> bool {
        match self.courses.iter_mut().find(|c| c.code == code) {
            Some(existing) => {
                existing.sections = sections;
                true
            }
            None => {
                self.courses.push(DesiredCourse {
                    code: code.to_string(),
                    sections,
                });
                false
            }
        }
    }

    pub fn get(&self, code: &str) -> Option<&[DesiredSection]> {
        self.courses
            .iter()
            .find(|c| c.code == code)
            .map(|c| c.sections.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = &DesiredCourse> {
        self.courses.iter()
    }

    pub fn course_codes(&self) -> Vec<String> {
        self.courses.iter().map(|c| c.code.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.courses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.courses.is_empty()
    }

    /// Renders the schedule back into wishlist syntax.
    pub fn to_wishlist(&self) -> String {
        self.courses
            .iter()
            .map(|course| {
                let specs = course
                    .sections
                    .iter()
                    .map(|s| format!("{}{}", s.section_num, s.kind.abbreviation()))
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("{}: {}\n", course.code, specs)
            })
            .collect()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentEntry {
    pub component_id: String,
    pub available_sections: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrapedCourse {
    #[serde(default)]
    pub instance_id: String,
    #[serde(default)]
    pub components: BTreeMap<ComponentType, ComponentEntry>,
}

impl ScrapedCourse {
    /// Records one section input seen on the portal. The first instance id
    /// sticks; returns the conflicting id when a later one disagrees.
    pub fn record_section(
        &mut self,
        instance_id: &str,
        kind: ComponentType,
        component_id: &str,
        section_num: &str,
    ) -> Option<String> {
        let conflict = if self.instance_id.is_empty() {
            self.instance_id = instance_id.to_string();
            None
        } else if self.instance_id != instance_id {
            Some(instance_id.to_string())
        } else {
            None
        };

        self.components
            .entry(kind)
            .or_insert_with(|| ComponentEntry {
                component_id: component_id.to_string(),
                available_sections: Vec::new(),
            })
            .available_sections
            .push(section_num.to_string());

        conflict
    }
}

/// Section metadata discovered on the portal, keyed by course code.
pub type ScrapedCatalog = HashMap<String, ScrapedCourse>;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedComponent {
    pub component_id: String,
    pub section_id: String,
}

/// A course whose every desired section was confirmed on the portal. This is
/// also the `courses_to_register` entry shape in `config.json`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedCourse {
    pub name: String,
    pub instance_id: String,
    pub components: Vec<ResolvedComponent>,
}
