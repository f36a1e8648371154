// src/validation/schedule.rs

use crate::model::{
    ComponentType, DesiredSchedule, DesiredSection, ResolvedComponent, ResolvedCourse,
    ScrapedCatalog,
};
use std::fmt;

/// Why a wishlist course could not be turned into a registration request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Diagnostic {
    NotScraped {
        course: String,
    },
    UnknownComponent {
        course: String,
        requested: String,
    },
    ComponentNotOffered {
        course: String,
        component: ComponentType,
        offered: Vec<ComponentType>,
    },
    SectionUnavailable {
        course: String,
        component: ComponentType,
        requested: String,
        available: Vec<String>,
    },
}

impl Diagnostic {
    pub fn course(&self) -> &str {
        match self {
            Diagnostic::NotScraped { course }
            | Diagnostic::UnknownComponent { course, .. }
            | Diagnostic::ComponentNotOffered { course, .. }
            | Diagnostic::SectionUnavailable { course, .. } => course,
        }
    }

    /// What the operator can do about it.
    pub fn hint(&self) -> &'static str {
        match self {
            Diagnostic::NotScraped { .. } => {
                "Check the course code spelling and that the course is in the selected-courses table."
            }
            Diagnostic::UnknownComponent { .. } => "Use one of L, Lb, S or R in the wishlist.",
            Diagnostic::ComponentNotOffered { .. } => {
                "Remove this component from the wishlist line or pick one the course offers."
            }
            Diagnostic::SectionUnavailable { .. } => {
                "Pick one of the available sections or register manually."
            }
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::NotScraped { course } => {
                write!(f, "'{course}' is in the wishlist but was not scraped")
            }
            Diagnostic::UnknownComponent { course, requested } => write!(
                f,
                "'{course}': component type '{requested}' is not a known type"
            ),
            Diagnostic::ComponentNotOffered {
                course,
                component,
                offered,
            } => {
                let offered = offered.iter().map(|c| c.to_string()).collect::<Vec<_>>();
                write!(
                    f,
                    "'{course}': component '{component}' not found in scraped data (offered: [{}])",
                    offered.join(", ")
                )
            }
            Diagnostic::SectionUnavailable {
                course,
                component,
                requested,
                available,
            } => write!(
                f,
                "'{course}': {component} section '{requested}' is not available (available: [{}])",
                available.join(", ")
            ),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Resolution {
    pub resolved: Vec<ResolvedCourse>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Matches every wishlist course against the scraped catalog.
///
/// Output follows wishlist order, and components follow the order the user
/// listed them in. A course either resolves completely or contributes exactly
/// one diagnostic and nothing else.
pub fn resolve(desired: &DesiredSchedule, catalog: &ScrapedCatalog) -> Resolution {
    let mut resolution = Resolution::default();

    for course in desired.iter() {
        match resolve_course(&course.code, &course.sections, catalog) {
            Ok(resolved) => resolution.resolved.push(resolved),
            Err(diagnostic) => resolution.diagnostics.push(diagnostic),
        }
    }

    resolution
}

fn resolve_course(
    code: &str,
    sections: &[DesiredSection],
    catalog: &ScrapedCatalog,
) -> Result<ResolvedCourse, Diagnostic> {
    let scraped = catalog.get(code).ok_or_else(|| Diagnostic::NotScraped {
        course: code.to_string(),
    })?;

    let mut components = Vec::with_capacity(sections.len());
    for section in sections {
        if !section.kind.is_known() {
            return Err(Diagnostic::UnknownComponent {
                course: code.to_string(),
                requested: section.kind.abbreviation().to_string(),
            });
        }

        let entry = scraped
            .components
            .get(&section.kind)
            .ok_or_else(|| Diagnostic::ComponentNotOffered {
                course: code.to_string(),
                component: section.kind.clone(),
                offered: scraped.components.keys().cloned().collect(),
            })?;

        if !entry.available_sections.contains(&section.section_num) {
            return Err(Diagnostic::SectionUnavailable {
                course: code.to_string(),
                component: section.kind.clone(),
                requested: section.section_num.clone(),
                available: entry.available_sections.clone(),
            });
        }

        components.push(ResolvedComponent {
            component_id: entry.component_id.clone(),
            section_id: section.section_num.clone(),
        });
    }

    Ok(ResolvedCourse {
        name: code.to_string(),
        instance_id: scraped.instance_id.clone(),
        components,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ComponentEntry, ScrapedCourse};
    use crate::schedule::parse_wishlist;

    fn csci_catalog() -> ScrapedCatalog {
        let mut course = ScrapedCourse {
            instance_id: "28008".into(),
            ..Default::default()
        };
        course.components.insert(
            ComponentType::Lecture,
            ComponentEntry {
                component_id: "34172".into(),
                available_sections: vec!["2".into(), "3".into()],
            },
        );
        course.components.insert(
            ComponentType::Lab,
            ComponentEntry {
                component_id: "34173".into(),
                available_sections: vec!["2".into(), "4".into()],
            },
        );
        ScrapedCatalog::from([("CSCI 361".to_string(), course)])
    }

    #[test]
    fn resolves_lecture_and_lab() {
        let desired = parse_wishlist("CSCI 361: 2L, 2Lb").schedule;
        let resolution = resolve(&desired, &csci_catalog());

        assert!(resolution.diagnostics.is_empty());
        assert_eq!(
            resolution.resolved,
            vec![ResolvedCourse {
                name: "CSCI 361".into(),
                instance_id: "28008".into(),
                components: vec![
                    ResolvedComponent {
                        component_id: "34172".into(),
                        section_id: "2".into()
                    },
                    ResolvedComponent {
                        component_id: "34173".into(),
                        section_id: "2".into()
                    },
                ],
            }]
        );
    }

    #[test]
    fn component_order_follows_wishlist() {
        let desired = parse_wishlist("CSCI 361: 4Lb, 3L").schedule;
        let resolution = resolve(&desired, &csci_catalog());
        let ids: Vec<_> = resolution.resolved[0]
            .components
            .iter()
            .map(|c| c.component_id.as_str())
            .collect();
        assert_eq!(ids, vec!["34173", "34172"]);
    }

    #[test]
    fn unavailable_section_drops_whole_course() {
        let desired = parse_wishlist("CSCI 361: 2L, 5Lb").schedule;
        let resolution = resolve(&desired, &csci_catalog());

        assert!(resolution.resolved.is_empty());
        assert_eq!(
            resolution.diagnostics,
            vec![Diagnostic::SectionUnavailable {
                course: "CSCI 361".into(),
                component: ComponentType::Lab,
                requested: "5".into(),
                available: vec!["2".into(), "4".into()],
            }]
        );
        let text = resolution.diagnostics[0].to_string();
        assert!(text.contains("CSCI 361"));
        assert!(text.contains("Lab"));
        assert!(text.contains("'5'"));
        assert!(text.contains("[2, 4]"));
    }

    #[test]
    fn first_failure_stops_the_course() {
        let desired = parse_wishlist("CSCI 361: 9L, 1S").schedule;
        let resolution = resolve(&desired, &csci_catalog());
        assert_eq!(resolution.diagnostics.len(), 1);
        assert!(matches!(
            resolution.diagnostics[0],
            Diagnostic::SectionUnavailable { .. }
        ));
    }

    #[test]
    fn missing_component_and_unknown_type_are_reported() {
        let catalog = csci_catalog();

        let desired = parse_wishlist("CSCI 361: 2L, 1S").schedule;
        let resolution = resolve(&desired, &catalog);
        assert!(resolution.resolved.is_empty());
        assert!(matches!(
            &resolution.diagnostics[0],
            Diagnostic::ComponentNotOffered { component: ComponentType::Seminar, .. }
        ));

        let desired = parse_wishlist("CSCI 361: 2Tut").schedule;
        let resolution = resolve(&desired, &catalog);
        assert_eq!(
            resolution.diagnostics,
            vec![Diagnostic::UnknownComponent {
                course: "CSCI 361".into(),
                requested: "Tut".into()
            }]
        );
    }

    #[test]
    fn unscraped_course_does_not_block_others() {
        let desired = parse_wishlist("HIST 100: 1L\nCSCI 361: 3L").schedule;
        let resolution = resolve(&desired, &csci_catalog());
        assert_eq!(
            resolution.diagnostics,
            vec![Diagnostic::NotScraped {
                course: "HIST 100".into()
            }]
        );
        assert_eq!(resolution.resolved.len(), 1);
        assert_eq!(resolution.resolved[0].name, "CSCI 361");
    }

    #[test]
    fn resolve_is_deterministic() {
        let desired = parse_wishlist("CSCI 361: 2L, 2Lb\nHIST 100: 1L\nCSCI 362: 1L").schedule;
        let catalog = csci_catalog();
        assert_eq!(resolve(&desired, &catalog), resolve(&desired, &catalog));
    }
}
