// src/catalog/section_panel.rs

use crate::catalog::CatalogSource;
use crate::error::Result;
use crate::model::{ComponentType, ScrapedCatalog, ScrapedCourse};
use scraper::{Html, Selector};
use std::path::PathBuf;
use std::sync::OnceLock;
use tracing::{debug, info, warn};

fn panel() -> &'static Selector {
    static SELECTOR: OnceLock<Selector> = OnceLock::new();
    SELECTOR.get_or_init(|| Selector::parse("#instanceSectionsPanel").expect("panel selector"))
}

fn panel_inputs() -> &'static Selector {
    static SELECTOR: OnceLock<Selector> = OnceLock::new();
    SELECTOR.get_or_init(|| {
        Selector::parse("div#instanceSectionsPanel input").expect("panel input selector")
    })
}

fn any_input() -> &'static Selector {
    static SELECTOR: OnceLock<Selector> = OnceLock::new();
    SELECTOR.get_or_init(|| Selector::parse("input").expect("input selector"))
}

/// One section checkbox id: `instance_<i>_component_<c>_section_<s>`.
#[derive(Debug, PartialEq, Eq)]
struct SectionId<'a> {
    instance_id: &'a str,
    component_id: &'a str,
    section_num: &'a str,
}

fn split_section_id(id: &str) -> Option<SectionId<'_>> {
    let parts: Vec<&str> = id.split('_').collect();
    if parts.len() < 6 {
        return None;
    }
    Some(SectionId {
        instance_id: parts[1],
        component_id: parts[3],
        section_num: parts[5],
    })
}

/// Extracts section metadata from the portal's "instance sections" panel.
///
/// Accepts either a full page or just the panel's inner markup. When the
/// page has a panel, only inputs inside it count. Returns `None` when there
/// are no section inputs to read.
pub fn parse_section_panel(html: &str) -> Option<ScrapedCourse> {
    let document = Html::parse_document(html);

    let inputs: Vec<_> = if document.select(panel()).next().is_some() {
        document.select(panel_inputs()).collect()
    } else {
        document.select(any_input()).collect()
    };

    let mut course = ScrapedCourse::default();
    let mut seen = 0usize;
    for input in inputs {
        let Some(full_id) = input.value().attr("id") else {
            continue;
        };
        if !full_id.contains("instance") {
            continue;
        }
        let Some(section) = split_section_id(full_id) else {
            debug!(id = full_id, "Skipping malformed section id");
            continue;
        };
        let kind = ComponentType::from_portal_name(input.value().attr("name").unwrap_or_default());

        if let Some(other) =
            course.record_section(section.instance_id, kind, section.component_id, section.section_num)
        {
            warn!(
                kept = %course.instance_id,
                ignored = %other,
                "⚠️ Panel lists more than one course instance; keeping the first"
            );
        }
        seen += 1;
    }

    (seen > 0).then_some(course)
}

/// Reads saved section panels from a directory, one HTML file per course
/// (`CSCI 361` is looked up as `CSCI_361.html`).
pub struct PanelDirectoryCatalog {
    dir: PathBuf,
}

impl PanelDirectoryCatalog {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn panel_path(&self, course_code: &str) -> PathBuf {
        let stem = course_code.split_whitespace().collect::<Vec<_>>().join("_");
        self.dir.join(format!("{stem}.html"))
    }
}

impl CatalogSource for PanelDirectoryCatalog {
    fn name(&self) -> &str {
        "panels"
    }

    fn description(&self) -> &str {
        "Parses saved course section panels from a directory of HTML pages."
    }

    fn fetch(&self, course_codes: &[String]) -> Result<ScrapedCatalog> {
        let mut catalog = ScrapedCatalog::new();

        for code in course_codes {
            let path = self.panel_path(code);
            let html = match std::fs::read_to_string(&path) {
                Ok(html) => html,
                Err(e) => {
                    warn!("⚠️ Could not read panel for '{}' at '{}': {}", code, path.display(), e);
                    continue;
                }
            };

            match parse_section_panel(&html) {
                Some(course) => {
                    let sections: usize = course
                        .components
                        .values()
                        .map(|c| c.available_sections.len())
                        .sum();
                    info!("✅ Scraped {} sections for '{}'", sections, code);
                    catalog.insert(code.clone(), course);
                }
                None => warn!("⚠️ No section inputs found in panel for '{}'", code),
            }
        }

        Ok(catalog)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PANEL: &str = r#"
        <html><body>
        <div id="instanceSectionsPanel">
          <input type="checkbox" id="instance_28008_component_34172_section_2" name="Lecture">
          <input type="checkbox" id="instance_28008_component_34172_section_3" name="Lecture">
          <input type="checkbox" id="instance_28008_component_34173_section_2" name="Computer Lab">
          <input type="checkbox" id="instance_28008_component_34173_section_4" name="Computer Lab">
          <input type="hidden" id="csrf" name="token" value="x">
        </div>
        <input type="checkbox" id="instance_99999_component_1_section_1" name="Lecture">
        </body></html>
    "#;

    #[test]
    fn splits_section_ids() {
        assert_eq!(
            split_section_id("instance_28008_component_34172_section_2"),
            Some(SectionId {
                instance_id: "28008",
                component_id: "34172",
                section_num: "2"
            })
        );
        assert_eq!(split_section_id("instance_28008"), None);
    }

    #[test]
    fn parses_components_from_panel_only() {
        let course = parse_section_panel(PANEL).unwrap();
        assert_eq!(course.instance_id, "28008");

        let lecture = &course.components[&ComponentType::Lecture];
        assert_eq!(lecture.component_id, "34172");
        assert_eq!(lecture.available_sections, vec!["2", "3"]);

        let lab = &course.components[&ComponentType::Lab];
        assert_eq!(lab.component_id, "34173");
        assert_eq!(lab.available_sections, vec!["2", "4"]);
    }

    #[test]
    fn fragment_without_panel_wrapper_still_parses() {
        let fragment = r#"<input id="instance_27635_component_33602_section_29" name="Lecture">"#;
        let course = parse_section_panel(fragment).unwrap();
        assert_eq!(course.instance_id, "27635");
        assert_eq!(
            course.components[&ComponentType::Lecture].available_sections,
            vec!["29"]
        );
    }

    #[test]
    fn empty_panel_ignores_inputs_elsewhere_on_the_page() {
        let page = r#"
            <div id="instanceSectionsPanel"></div>
            <form id="cart">
              <input id="instance_99999_component_1_section_7" name="Lecture">
            </form>
        "#;
        assert_eq!(parse_section_panel(page), None);
    }

    #[test]
    fn page_without_sections_is_none() {
        assert_eq!(parse_section_panel("<p>Session expired</p>"), None);
    }

    #[test]
    fn directory_source_reads_one_file_per_course() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("CSCI_361.html"), PANEL).unwrap();

        let source = PanelDirectoryCatalog::new(dir.path());
        let catalog = source
            .fetch(&["CSCI 361".to_string(), "KAZ 313".to_string()])
            .unwrap();

        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog["CSCI 361"].instance_id, "28008");
    }
}
