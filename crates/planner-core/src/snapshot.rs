use std::fs;
use std::path::Path;

use anyhow::Context;
use serde::Deserialize;
use tracing::{info, warn};

use crate::subject::{Subject, SubjectBook};
use crate::task::Task;

/// Tasks and subjects as handed over by whatever persists them.
///
/// Read-only: nothing in this crate writes a snapshot back.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub subjects: Vec<Subject>,
    #[serde(default)]
    pub tasks: Vec<Task>,
}

impl Snapshot {
    #[tracing::instrument(skip(path), fields(path = %path.display()))]
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let path = crate::config::expand_tilde(path);
        let text = fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let snapshot = Self::from_json_str(&text)
            .with_context(|| format!("failed to parse snapshot {}", path.display()))?;

        info!(
            path = %path.display(),
            tasks = snapshot.tasks.len(),
            subjects = snapshot.subjects.len(),
            "loaded snapshot"
        );
        Ok(snapshot)
    }

    pub fn from_json_str(text: &str) -> anyhow::Result<Self> {
        let snapshot: Snapshot = serde_json::from_str(text).context("invalid snapshot json")?;
        snapshot.warn_orphans();
        Ok(snapshot)
    }

    pub fn subject_book(&self) -> SubjectBook {
        self.subjects.iter().cloned().collect()
    }

    // Dangling subject ids are legal; surface them for whoever reads the logs.
    fn warn_orphans(&self) {
        let book = self.subject_book();
        for task in &self.tasks {
            if let Some(subject) = task.subject_id()
                && book.get(subject).is_none()
            {
                warn!(task = %task.id(), subject = %subject, "task references unknown subject");
            }
        }
    }
}
