use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;

/// Upper bound on items in a generated task list.
pub const MAX_TASKS: usize = 3;

// ────────────────────────────────────────────────────────────────────────────
// Request
// ────────────────────────────────────────────────────────────────────────────

/// Everything the student fills in before asking for a draft.
///
/// Missing JSON keys deserialize to empty strings so that they are reported by
/// `validate` alongside blank values instead of failing extraction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportRequest {
    pub institute_name: String,
    pub student_name: String,
    pub enrollment_number: String,
    pub organization: String,
    pub external_guide_name: String,
    pub external_guide_contact: String,
    pub internal_guide_name: String,
    pub work_description: String,
    pub hours: String,
}

impl ReportRequest {
    /// Form labels of every field that is empty after trimming, in form order.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("Institute Name", &self.institute_name),
            ("Student Name", &self.student_name),
            ("Enrollment Number", &self.enrollment_number),
            ("Name of Organization", &self.organization),
            ("External Guide Name", &self.external_guide_name),
            ("External Guide Contact Details", &self.external_guide_contact),
            ("Internal Faculty Guide Name", &self.internal_guide_name),
            ("Work Description", &self.work_description),
            ("Total Working Hours", &self.hours),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(label, _)| label)
        .collect()
    }

    pub fn validate(&self) -> Result<(), AppError> {
        let missing = self.missing_fields();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(format!(
                "Please fill in all fields. Missing: {}",
                missing.join(", ")
            )))
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Task lists
// ────────────────────────────────────────────────────────────────────────────

/// Which of the two generated lists an operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskSection {
    WorkDone,
    Plans,
}

impl TaskSection {
    pub fn label(self) -> &'static str {
        match self {
            TaskSection::WorkDone => "work done",
            TaskSection::Plans => "plans",
        }
    }
}

/// Ordered, bounded list of one-sentence tasks. Length never exceeds `MAX_TASKS`;
/// edits replace items in place and never change the length.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskList(Vec<String>);

impl TaskList {
    /// Builds a list from already-cleaned items, keeping at most `MAX_TASKS`.
    pub fn from_items<I>(items: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        TaskList(items.into_iter().take(MAX_TASKS).collect())
    }

    pub fn items(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Replaces the item at 1-based `position`. Returns `false` if out of range.
    pub fn replace(&mut self, position: usize, text: &str) -> bool {
        match position.checked_sub(1).and_then(|i| self.0.get_mut(i)) {
            Some(slot) => {
                *slot = text.trim().to_string();
                true
            }
            None => false,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Session state
// ────────────────────────────────────────────────────────────────────────────

/// Per-session aggregate carried from generate through edits to finalize.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportState {
    pub session_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub request: ReportRequest,
    pub work_done: TaskList,
    pub plans: TaskList,
    /// Set once the report has been rendered.
    pub output_file: Option<String>,
}

impl ReportState {
    pub fn new(request: ReportRequest) -> Self {
        Self {
            session_id: Uuid::new_v4(),
            created_at: Utc::now(),
            request,
            work_done: TaskList::default(),
            plans: TaskList::default(),
            output_file: None,
        }
    }

    pub fn tasks(&self, section: TaskSection) -> &TaskList {
        match section {
            TaskSection::WorkDone => &self.work_done,
            TaskSection::Plans => &self.plans,
        }
    }

    pub fn tasks_mut(&mut self, section: TaskSection) -> &mut TaskList {
        match section {
            TaskSection::WorkDone => &mut self.work_done,
            TaskSection::Plans => &mut self.plans,
        }
    }
}

#[cfg(test)]
pub(crate) fn sample_request() -> ReportRequest {
    ReportRequest {
        institute_name: "Test Institute".to_string(),
        student_name: "Jane Doe".to_string(),
        enrollment_number: "12345".to_string(),
        organization: "Acme Corp".to_string(),
        external_guide_name: "John Smith".to_string(),
        external_guide_contact: "Email: john.smith@acme.example".to_string(),
        internal_guide_name: "Dr. Ada Patel".to_string(),
        work_description: "Built a login page and wrote unit tests".to_string(),
        hours: "35".to_string(),
    }
}
