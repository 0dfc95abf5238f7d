use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{PlannerError, PlannerResult};

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SubjectId(String);

impl SubjectId {
    pub fn new(raw: impl Into<String>) -> PlannerResult<Self> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return Err(PlannerError::invalid("subject id cannot be empty"));
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

impl fmt::Display for SubjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for SubjectId {
    type Error = PlannerError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<SubjectId> for String {
    fn from(value: SubjectId) -> Self {
        value.0
    }
}

/// The fixed subject palette. Colours are only used for visual grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Swatch {
    #[default]
    Black,
    Blue,
    Green,
    Red,
    Yellow,
    Purple,
    Pink,
    Gray,
}

impl Swatch {
    pub const ALL: [Swatch; 8] = [
        Swatch::Black,
        Swatch::Blue,
        Swatch::Green,
        Swatch::Red,
        Swatch::Yellow,
        Swatch::Purple,
        Swatch::Pink,
        Swatch::Gray,
    ];

    pub fn hex(self) -> &'static str {
        match self {
            Swatch::Black => "#000000",
            Swatch::Blue => "#2563EB",
            Swatch::Green => "#10B981",
            Swatch::Red => "#EF4444",
            Swatch::Yellow => "#F59E0B",
            Swatch::Purple => "#8B5CF6",
            Swatch::Pink => "#EC4899",
            Swatch::Gray => "#6B7280",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Swatch::Black => "black",
            Swatch::Blue => "blue",
            Swatch::Green => "green",
            Swatch::Red => "red",
            Swatch::Yellow => "yellow",
            Swatch::Purple => "purple",
            Swatch::Pink => "pink",
            Swatch::Gray => "gray",
        }
    }

    /// Nearest 8-colour ANSI foreground code, for terminal output.
    pub fn ansi_code(self) -> &'static str {
        match self {
            Swatch::Black => "30",
            Swatch::Blue => "34",
            Swatch::Green => "32",
            Swatch::Red => "31",
            Swatch::Yellow => "33",
            Swatch::Purple => "35",
            Swatch::Pink => "95",
            Swatch::Gray => "90",
        }
    }

    /// Case-insensitive hex (`#2563eb`) or palette name (`blue`).
    pub fn parse(raw: &str) -> PlannerResult<Self> {
        let token = raw.trim();
        Swatch::ALL
            .into_iter()
            .find(|swatch| {
                swatch.hex().eq_ignore_ascii_case(token) || swatch.name().eq_ignore_ascii_case(token)
            })
            .ok_or_else(|| PlannerError::invalid(format!("{raw:?} is not a palette colour")))
    }
}

impl fmt::Display for Swatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.hex())
    }
}

impl TryFrom<String> for Swatch {
    type Error = PlannerError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Swatch> for String {
    fn from(value: Swatch) -> Self {
        value.hex().to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "SubjectRecord")]
pub struct Subject {
    id: SubjectId,
    name: String,
    color: Swatch,
}

/// Wire shape of a subject before validation.
#[derive(Debug, Deserialize)]
struct SubjectRecord {
    id: SubjectId,
    name: String,
    #[serde(default)]
    color: Swatch,
}

impl TryFrom<SubjectRecord> for Subject {
    type Error = PlannerError;

    fn try_from(record: SubjectRecord) -> Result<Self, Self::Error> {
        Subject::new(record.id, record.name, record.color)
    }
}

/// Subject form submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubjectDraft {
    pub name: String,
    pub color: Swatch,
}

impl Subject {
    pub fn new(id: SubjectId, name: impl Into<String>, color: Swatch) -> PlannerResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(PlannerError::invalid(format!("subject {id} needs a name")));
        }
        Ok(Self { id, name, color })
    }

    pub fn from_draft(draft: SubjectDraft) -> PlannerResult<Self> {
        Self::new(SubjectId::random(), draft.name, draft.color)
    }

    pub fn id(&self) -> &SubjectId { &self.id }
    pub fn name(&self) -> &str     { &self.name }
    pub fn color(&self) -> Swatch  { self.color }

    /// Replaces name and colour, keeping the id.
    pub fn apply(&mut self, draft: SubjectDraft) -> PlannerResult<()> {
        if draft.name.trim().is_empty() {
            return Err(PlannerError::invalid(format!("subject {} needs a name", self.id)));
        }
        self.name = draft.name;
        self.color = draft.color;
        Ok(())
    }
}

/// Ordered subject collection with weak-reference resolution.
///
/// Tasks point at subjects by id only. Removing a subject here never touches
/// tasks; their ids simply stop resolving.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubjectBook {
    subjects: Vec<Subject>,
}

impl SubjectBook {
    pub fn new(subjects: Vec<Subject>) -> Self {
        Self { subjects }
    }

    pub fn get(&self, id: &SubjectId) -> Option<&Subject> {
        self.subjects.iter().find(|subject| subject.id() == id)
    }

    pub fn resolve_subject(&self, id: Option<&SubjectId>) -> Option<&Subject> {
        let id = id?;
        let found = self.get(id);
        if found.is_none() {
            tracing::trace!(subject = %id, "dangling subject reference");
        }
        found
    }

    /// Inserts or replaces by id, keeping the original position on replace.
    pub fn upsert(&mut self, subject: Subject) {
        match self.subjects.iter_mut().find(|existing| existing.id() == subject.id()) {
            Some(existing) => *existing = subject,
            None => self.subjects.push(subject),
        }
    }

    pub fn remove(&mut self, id: &SubjectId) -> Option<Subject> {
        let idx = self.subjects.iter().position(|subject| subject.id() == id)?;
        Some(self.subjects.remove(idx))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Subject> {
        self.subjects.iter()
    }

    pub fn len(&self) -> usize {
        self.subjects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subjects.is_empty()
    }
}

impl FromIterator<Subject> for SubjectBook {
    fn from_iter<I: IntoIterator<Item = Subject>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
