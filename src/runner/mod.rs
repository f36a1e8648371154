// src/runner/mod.rs

use crate::context::RunContext;
use crate::error::{RegistrarError, Result};
use crate::journal::Step;
use crate::model::{ResolvedCourse, ScrapedCatalog};
use crate::portal::{PortalSession, Submitter};
use crate::registration::{
    RegistrationOutcome, RegistrationRequest, RunSummary, build_request, classify, current_nonce,
};
use crate::schedule::{ParseWarning, load_wishlist};
use crate::storage::LocalStorage;
use crate::validation::{Resolution, resolve};
use tracing::{debug, error, info, warn};

/// Result of matching the wishlist against the scraped catalog.
#[derive(Clone, Debug)]
pub struct ResolveReport {
    pub warnings: Vec<ParseWarning>,
    pub catalog: ScrapedCatalog,
    pub resolution: Resolution,
}

/// Drives the resolve, update and register workflows over one context.
pub struct Registrar {
    pub context: RunContext,
}

impl Registrar {
    pub fn new(context: RunContext) -> Self {
        Self { context }
    }

    /// Parses the wishlist, fetches the catalog and resolves every course.
    /// An empty catalog aborts the run.
    pub fn resolve(&mut self) -> Result<ResolveReport> {
        let parsed = load_wishlist(&self.context.settings.wishlist_file)?;
        for warning in &parsed.warnings {
            debug!("wishlist: {}", warning);
        }

        let codes = parsed.schedule.course_codes();
        let source = self.context.catalog()?;
        info!(
            "--- Fetching section data via '{}' ({}) ---",
            source.name(),
            source.description()
        );
        let catalog = source.fetch(&codes)?;
        if catalog.is_empty() {
            error!("❌ No data was scraped. Halting before any update.");
            return Err(RegistrarError::EmptyCatalog);
        }

        info!("--- Validating scraped data ---");
        let resolution = resolve(&parsed.schedule, &catalog);
        for diagnostic in &resolution.diagnostics {
            debug!("unresolved: {}", diagnostic);
        }
        for course in &resolution.resolved {
            debug!("'{}' successfully validated", course.name);
        }

        Ok(ResolveReport {
            warnings: parsed.warnings,
            catalog,
            resolution,
        })
    }

    /// Resolves and writes the result into `courses_to_register`. Nothing is
    /// written when no course resolved.
    pub fn update_ids(&mut self, storage: &LocalStorage) -> Result<ResolveReport> {
        let report = self.resolve()?;
        if report.resolution.resolved.is_empty() {
            warn!("⚠️ No valid courses were found after validation. Config will not be updated.");
        } else {
            storage.update_courses(&report.resolution.resolved)?;
        }
        Ok(report)
    }

    /// One request per course, in order.
    pub fn plan_requests(&self, courses: &[ResolvedCourse], user_id: &str) -> Vec<RegistrationRequest> {
        courses
            .iter()
            .map(|course| build_request(course, user_id, current_nonce()))
            .collect()
    }

    /// Submits every course exactly once. With `use_cart`, every course is
    /// offered to the shopping cart first and only the accepted ones are
    /// registered; if none are accepted nothing is registered. Failures are
    /// recorded per course and never stop the rest of the batch.
    pub fn register(
        &mut self,
        submitter: &dyn Submitter,
        session: &PortalSession,
        user_id: &str,
        courses: &[ResolvedCourse],
        use_cart: bool,
    ) -> RunSummary {
        let mut summary = RunSummary::new();

        let queue: Vec<&ResolvedCourse> = if use_cart {
            let accepted = self.fill_cart(submitter, session, courses, &mut summary);
            if accepted.is_empty() {
                error!("❌ No courses were added to the cart. Skipping registration.");
                return summary;
            }
            accepted
        } else {
            courses.iter().collect()
        };

        info!("--- Initiating Final Registration ---");
        for (idx, course) in queue.into_iter().enumerate() {
            if idx > 0 && !self.context.settings.submit_delay.is_zero() {
                std::thread::sleep(self.context.settings.submit_delay);
            }

            // Built just before sending so the nonce is fresh.
            let request = build_request(course, user_id, current_nonce());
            info!("📤 Registering '{}'", request.course_name);
            info!("   Submitting sections: {}", request.sections);

            let outcome = match submitter.register(session, &request) {
                Ok(response) => {
                    info!("   Response: {} {}", response.status, response.body.trim());
                    self.context.record(
                        &course.name,
                        Step::Response,
                        &format!("{} {}", response.status, response.body.trim()),
                    );
                    classify(response.status, &response.body)
                }
                Err(reason) => RegistrationOutcome::RequestFailed(reason),
            };

            if outcome.is_success() {
                info!("   ✅ SUCCESS for '{}'", course.name);
            } else {
                error!("   ❌ FAILED for '{}': {}", course.name, outcome);
            }
            self.finish(&mut summary, course, outcome);
        }

        info!(
            "--- Registration Complete: {} out of {} courses ---",
            summary.succeeded(),
            summary.attempted()
        );
        summary
    }

    /// Offers every course to the shopping cart and returns those accepted.
    /// Refused courses are finished in `summary` here.
    fn fill_cart<'a>(
        &mut self,
        submitter: &dyn Submitter,
        session: &PortalSession,
        courses: &'a [ResolvedCourse],
        summary: &mut RunSummary,
    ) -> Vec<&'a ResolvedCourse> {
        info!("--- Processing Shopping Cart ---");
        let mut accepted = Vec::with_capacity(courses.len());

        for course in courses {
            info!("🛒 Adding '{}' (instance {}) to cart", course.name, course.instance_id);
            match submitter.add_to_cart(session, course) {
                Ok(response) if response.cart_accepted() => {
                    info!("   ✅ In cart: '{}'", course.name);
                    self.context.record(&course.name, Step::Cart, response.body.trim());
                    accepted.push(course);
                }
                Ok(response) => {
                    warn!("   ❌ Cart refused '{}': {}", course.name, response.body.trim());
                    self.context.record(&course.name, Step::Cart, response.body.trim());
                    let outcome = RegistrationOutcome::Rejected(format!(
                        "not added to cart: {}",
                        response.body.trim()
                    ));
                    self.finish(summary, course, outcome);
                }
                Err(reason) => {
                    warn!("   ❌ Cart request failed for '{}': {}", course.name, reason);
                    self.finish(summary, course, RegistrationOutcome::RequestFailed(reason));
                }
            }
        }

        accepted
    }

    fn finish(&mut self, summary: &mut RunSummary, course: &ResolvedCourse, outcome: RegistrationOutcome) {
        self.context.record(&course.name, Step::Outcome, &outcome.to_string());
        summary.record(&course.name, outcome);
    }
}
