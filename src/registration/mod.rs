// src/registration/mod.rs

use crate::model::ResolvedCourse;
use std::time::{SystemTime, UNIX_EPOCH};

pub mod outcome;
pub use outcome::{CourseResult, RegistrationOutcome, RunSummary, classify};

/// Everything the portal needs to register one course in a single call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RegistrationRequest {
    pub course_name: String,
    pub instance_id: String,
    pub sections: String,
    pub user_id: String,
    pub nonce: u128,
}

impl RegistrationRequest {
    /// Query string pairs for the `registerSections` JSON endpoint.
    pub fn query(&self) -> Vec<(&'static str, String)> {
        vec![
            ("_dc", self.nonce.to_string()),
            ("method", "registerSections".to_string()),
            ("sections", self.sections.clone()),
            ("userid", self.user_id.clone()),
        ]
    }
}

/// `instance_<i>_component_<c>_section_<s>` per component, dash-joined.
pub fn sections_descriptor(course: &ResolvedCourse) -> String {
    course
        .components
        .iter()
        .map(|comp| {
            format!(
                "instance_{}_component_{}_section_{}",
                course.instance_id, comp.component_id, comp.section_id
            )
        })
        .collect::<Vec<_>>()
        .join("-")
}

pub fn build_request(course: &ResolvedCourse, user_id: &str, nonce: u128) -> RegistrationRequest {
    RegistrationRequest {
        course_name: course.name.clone(),
        instance_id: course.instance_id.clone(),
        sections: sections_descriptor(course),
        user_id: user_id.to_string(),
        nonce,
    }
}

/// Milliseconds since the epoch, used as the `_dc` cache buster.
pub fn current_nonce() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ResolvedComponent;

    fn csci_361() -> ResolvedCourse {
        ResolvedCourse {
            name: "CSCI 361".into(),
            instance_id: "28008".into(),
            components: vec![
                ResolvedComponent {
                    component_id: "34172".into(),
                    section_id: "2".into(),
                },
                ResolvedComponent {
                    component_id: "34173".into(),
                    section_id: "2".into(),
                },
            ],
        }
    }

    #[test]
    fn lecture_and_lab_share_one_descriptor() {
        assert_eq!(
            sections_descriptor(&csci_361()),
            "instance_28008_component_34172_section_2-instance_28008_component_34173_section_2"
        );
    }

    #[test]
    fn single_component_has_no_separator() {
        let course = ResolvedCourse {
            name: "WCS 150".into(),
            instance_id: "27635".into(),
            components: vec![ResolvedComponent {
                component_id: "33602".into(),
                section_id: "29".into(),
            }],
        };
        assert_eq!(
            sections_descriptor(&course),
            "instance_27635_component_33602_section_29"
        );
    }

    #[test]
    fn request_carries_query_parameters() {
        let request = build_request(&csci_361(), "201912345", 1_700_000_000_000);
        assert_eq!(request.course_name, "CSCI 361");
        assert_eq!(request.instance_id, "28008");

        let query = request.query();
        assert_eq!(query[0], ("_dc", "1700000000000".to_string()));
        assert_eq!(query[1], ("method", "registerSections".to_string()));
        assert_eq!(query[2].1, request.sections);
        assert_eq!(query[3], ("userid", "201912345".to_string()));
    }

    #[test]
    fn nonce_moves_forward() {
        let a = current_nonce();
        let b = current_nonce();
        assert!(a > 0);
        assert!(b >= a);
    }
}
