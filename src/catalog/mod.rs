// src/catalog/mod.rs

use crate::error::{RegistrarError, Result};
use crate::model::ScrapedCatalog;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub mod section_panel;
pub use section_panel::{PanelDirectoryCatalog, parse_section_panel};

/// A place section metadata can be discovered from.
pub trait CatalogSource {
    fn name(&self) -> &str;
    fn description(&self) -> &str;

    /// Looks up every requested course. Courses that cannot be found are
    /// left out of the returned catalog rather than failing the call.
    fn fetch(&self, course_codes: &[String]) -> Result<ScrapedCatalog>;
}

/// Reads a catalog previously written as JSON.
pub struct SnapshotCatalog {
    path: PathBuf,
}

impl SnapshotCatalog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Writes a catalog in the format `fetch` reads.
    pub fn save(path: &Path, catalog: &ScrapedCatalog) -> Result<()> {
        let json = serde_json::to_string_pretty(catalog)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

impl CatalogSource for SnapshotCatalog {
    fn name(&self) -> &str {
        "snapshot"
    }

    fn description(&self) -> &str {
        "Loads section metadata from a JSON catalog snapshot."
    }

    fn fetch(&self, course_codes: &[String]) -> Result<ScrapedCatalog> {
        let text = std::fs::read_to_string(&self.path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => RegistrarError::MissingInput(self.path.clone()),
            _ => RegistrarError::Io(e),
        })?;
        let mut snapshot: ScrapedCatalog = serde_json::from_str(&text)?;

        let mut catalog = ScrapedCatalog::new();
        for code in course_codes {
            match snapshot.remove(code) {
                Some(course) => {
                    info!("✅ Found '{}' in snapshot ({} components)", code, course.components.len());
                    catalog.insert(code.clone(), course);
                }
                None => warn!("⚠️ '{}' is not in the catalog snapshot", code),
            }
        }
        Ok(catalog)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ComponentEntry, ComponentType, ScrapedCourse};

    #[test]
    fn snapshot_round_trips_and_filters() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.json");

        let mut course = ScrapedCourse {
            instance_id: "27724".into(),
            ..Default::default()
        };
        course.components.insert(
            ComponentType::Seminar,
            ComponentEntry {
                component_id: "33713".into(),
                available_sections: vec!["2".into()],
            },
        );
        let mut full = ScrapedCatalog::new();
        full.insert("KAZ 313".into(), course.clone());
        full.insert("HIST 100".into(), ScrapedCourse::default());
        SnapshotCatalog::save(&path, &full).unwrap();

        let source = SnapshotCatalog::new(&path);
        let catalog = source
            .fetch(&["KAZ 313".to_string(), "MATH 999".to_string()])
            .unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog["KAZ 313"], course);
    }

    #[test]
    fn missing_snapshot_is_missing_input() {
        let source = SnapshotCatalog::new("/no/such/catalog.json");
        assert!(matches!(
            source.fetch(&[]),
            Err(RegistrarError::MissingInput(_))
        ));
    }
}
