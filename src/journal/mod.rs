// src/journal/mod.rs

use std::fmt;

/// The portal exchange an entry belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    Cart,
    Response,
    Outcome,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Step::Cart => "cart",
            Step::Response => "response",
            Step::Outcome => "outcome",
        };
        f.write_str(label)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct JournalEntry {
    pub course: String,
    pub step: Step,
    pub detail: String,
}

/// Per-course record of what was sent to the portal and what came back.
pub trait Journal {
    fn record(&mut self, course: &str, step: Step, detail: &str);
    fn entries(&self) -> &[JournalEntry];
}

#[derive(Default, Debug)]
pub struct RunJournal {
    entries: Vec<JournalEntry>,
}

impl RunJournal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Courses in the order they first appeared.
    pub fn courses(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for entry in &self.entries {
            if !seen.contains(&entry.course.as_str()) {
                seen.push(&entry.course);
            }
        }
        seen
    }

    pub fn for_course<'a>(&'a self, course: &'a str) -> impl Iterator<Item = &'a JournalEntry> + 'a {
        self.entries.iter().filter(move |e| e.course == course)
    }

    pub fn at_step(&self, step: Step) -> impl Iterator<Item = &JournalEntry> {
        self.entries.iter().filter(move |e| e.step == step)
    }
}

impl Journal for RunJournal {
    fn record(&mut self, course: &str, step: Step, detail: &str) {
        self.entries.push(JournalEntry {
            course: course.to_string(),
            step,
            detail: detail.to_string(),
        });
    }

    fn entries(&self) -> &[JournalEntry] {
        &self.entries
    }
}
