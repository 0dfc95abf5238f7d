use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::datekey::DateKey;
use crate::error::{PlannerError, PlannerResult};
use crate::subject::SubjectId;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TaskId(String);

impl TaskId {
    pub fn new(raw: impl Into<String>) -> PlannerResult<Self> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return Err(PlannerError::invalid("task id cannot be empty"));
        }
        Ok(Self(raw))
    }

    pub fn random() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for TaskId {
    type Error = PlannerError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<TaskId> for String {
    fn from(value: TaskId) -> Self {
        value.0
    }
}

/// A single all-day task.
///
/// The calendar layer only ever holds `&Task`; the owner of the collection is
/// the only one mutating it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TaskRecord")]
pub struct Task {
    id: TaskId,

    title: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,

    date: DateKey,

    #[serde(skip_serializing_if = "Option::is_none")]
    subject_id: Option<SubjectId>,

    completed: bool,
}

#[derive(Debug, Deserialize)]
struct TaskRecord {
    id: String,
    title: String,
    #[serde(default)]
    description: Option<String>,
    date: String,
    #[serde(default)]
    subject_id: Option<String>,
    #[serde(default)]
    completed: bool,
}

impl TryFrom<TaskRecord> for Task {
    type Error = PlannerError;

    fn try_from(record: TaskRecord) -> Result<Self, Self::Error> {
        let task = Task::new(record.id, record.title, &record.date)?
            .with_description(record.description.unwrap_or_default())
            .with_subject(subject_ref(record.subject_id)?)
            .with_completed(record.completed);
        Ok(task)
    }
}

/// Task form submission. `date` is the canonical key of the selected day.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskDraft {
    pub title: String,
    pub description: String,
    pub date: String,
    pub subject_id: Option<String>,
}

impl Task {
    /// Validates title and date. Fails with `InvalidInput` for impossible
    /// dates such as `2024-02-31`, before the task can reach any index.
    pub fn new(id: impl Into<String>, title: impl Into<String>, date: &str) -> PlannerResult<Self> {
        let id = TaskId::new(id)?;
        let title = checked_title(title.into())?;
        let date = DateKey::parse(date)?;
        Ok(Self {
            id,
            title,
            description: None,
            date,
            subject_id: None,
            completed: false,
        })
    }

    /// Create a brand new, uncompleted task with a random id.
    pub fn from_draft(draft: TaskDraft) -> PlannerResult<Self> {
        let subject = subject_ref(draft.subject_id)?;
        let task = Task::new(TaskId::random(), draft.title, &draft.date)?
            .with_description(draft.description)
            .with_subject(subject);
        Ok(task)
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        let description = description.into();
        self.description = if description.trim().is_empty() { None } else { Some(description) };
        self
    }

    pub fn with_subject(mut self, subject_id: Option<SubjectId>) -> Self {
        self.subject_id = subject_id;
        self
    }

    pub fn with_completed(mut self, completed: bool) -> Self {
        self.completed = completed;
        self
    }

    pub fn id(&self) -> &TaskId                    { &self.id }
    pub fn title(&self) -> &str                    { &self.title }
    pub fn description(&self) -> Option<&str>      { self.description.as_deref() }
    pub fn date(&self) -> &DateKey                 { &self.date }
    pub fn subject_id(&self) -> Option<&SubjectId> { self.subject_id.as_ref() }
    pub fn completed(&self) -> bool                { self.completed }

    pub fn set_completed(&mut self, completed: bool) {
        self.completed = completed;
    }

    pub fn toggle_completed(&mut self) {
        self.completed = !self.completed;
    }

    /// Replaces the editable fields from a form, keeping id and completion.
    pub fn apply(&mut self, draft: TaskDraft) -> PlannerResult<()> {
        let title = checked_title(draft.title)?;
        let date = DateKey::parse(&draft.date)?;
        let subject = subject_ref(draft.subject_id)?;
        self.title = title;
        self.date = date;
        self.subject_id = subject;
        self.description = if draft.description.trim().is_empty() {
            None
        } else {
            Some(draft.description)
        };
        Ok(())
    }
}

fn checked_title(title: String) -> PlannerResult<String> {
    if title.trim().is_empty() {
        return Err(PlannerError::invalid("task title cannot be empty"));
    }
    Ok(title)
}

/// The form's "No Subject" option arrives as an empty string.
fn subject_ref(raw: Option<String>) -> PlannerResult<Option<SubjectId>> {
    match raw {
        Some(raw) if !raw.trim().is_empty() => SubjectId::new(raw).map(Some),
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_calendar_date_fails_construction() {
        let err = Task::new("t1", "Essay", "2024-02-31").expect_err("feb 31");
        assert!(matches!(err, PlannerError::InvalidInput(_)));
    }

    #[test]
    fn blank_title_is_rejected() {
        assert!(Task::new("t1", "  \t", "2024-02-10").is_err());
        assert!(Task::new("", "Essay", "2024-02-10").is_err());
    }

    #[test]
    fn draft_gets_fresh_id_and_normalised_fields() {
        let draft = TaskDraft {
            title: "Read chapter 3".to_string(),
            description: "   ".to_string(),
            date: "2024-02-10".to_string(),
            subject_id: Some(String::new()),
        };
        let a = Task::from_draft(draft.clone()).expect("task a");
        let b = Task::from_draft(draft).expect("task b");

        assert_ne!(a.id(), b.id());
        assert_eq!(a.description(), None);
        assert_eq!(a.subject_id(), None);
        assert!(!a.completed());
        assert_eq!(a.date().as_str(), "2024-02-10");
    }

    #[test]
    fn apply_keeps_identity_and_completion() {
        let mut task = Task::new("t1", "Essay", "2024-02-10").expect("task").with_completed(true);
        task.apply(TaskDraft {
            title: "Essay draft".to_string(),
            description: "two pages".to_string(),
            date: "2024-02-12".to_string(),
            subject_id: Some("s1".to_string()),
        })
        .expect("apply");

        assert_eq!(task.id().as_str(), "t1");
        assert!(task.completed());
        assert_eq!(task.date().as_str(), "2024-02-12");
        assert_eq!(task.subject_id().map(SubjectId::as_str), Some("s1"));
        assert_eq!(task.description(), Some("two pages"));

        let before = task.clone();
        let bad = task.apply(TaskDraft { title: "x".to_string(), date: "2024-13-01".to_string(), ..TaskDraft::default() });
        assert!(bad.is_err());
        assert_eq!(task, before);
    }

    #[test]
    fn toggle_flips_completion() {
        let mut task = Task::new("t1", "Essay", "2024-02-10").expect("task");
        task.toggle_completed();
        assert!(task.completed());
        task.toggle_completed();
        assert!(!task.completed());
    }

    #[test]
    fn set_completed_is_idempotent() {
        let mut task = Task::new("t1", "Essay", "2024-02-10").expect("task");
        task.set_completed(true);
        task.set_completed(true);
        assert!(task.completed());
        task.set_completed(false);
        assert!(!task.completed());
        assert_eq!(task.date().as_str(), "2024-02-10");
    }

    #[test]
    fn json_roundtrip_validates_dates() {
        let raw = r#"{"id":"a","title":"Quiz","date":"2024-02-10","subject_id":"gone","completed":true}"#;
        let task: Task = serde_json::from_str(raw).expect("task json");
        assert!(task.completed());
        assert_eq!(task.subject_id().map(SubjectId::as_str), Some("gone"));

        let json = serde_json::to_string(&task).expect("serialize");
        let back: Task = serde_json::from_str(&json).expect("reparse");
        assert_eq!(back, task);

        let bad = r#"{"id":"a","title":"Quiz","date":"2024-02-31"}"#;
        assert!(serde_json::from_str::<Task>(bad).is_err());
    }
}
