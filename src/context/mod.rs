// src/context/mod.rs

use crate::catalog::CatalogSource;
use crate::error::{RegistrarError, Result};
use crate::journal::{Journal, RunJournal, Step};
use crate::settings::Settings;

/// Everything one run needs besides the network: settings, where the catalog
/// comes from, and the per-course journal the run report is built from.
pub struct RunContext {
    pub settings: Settings,
    pub dry_run: bool,
    pub catalog: Option<Box<dyn CatalogSource + Send + Sync>>,
    pub journal: RunJournal,
}

impl RunContext {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            dry_run: false,
            catalog: None,
            journal: RunJournal::new(),
        }
    }

    pub fn with_catalog<C: CatalogSource + Send + Sync + 'static>(mut self, source: C) -> Self {
        self.catalog = Some(Box::new(source));
        self
    }

    pub fn enable_dry_run(mut self) -> Self {
        self.dry_run = true;
        self
    }

    pub fn catalog(&self) -> Result<&(dyn CatalogSource + Send + Sync)> {
        self.catalog
            .as_deref()
            .ok_or_else(|| RegistrarError::Config("no catalog source configured".into()))
    }

    pub fn journal(&self) -> &RunJournal {
        &self.journal
    }

    pub fn record(&mut self, course: &str, step: Step, detail: &str) {
        self.journal.record(course, step, detail);
    }
}

impl Default for RunContext {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}
