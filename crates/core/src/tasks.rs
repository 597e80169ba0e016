//! Per-reviewer task lists.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::types::FileRef;

/// One submission a reviewer has to look at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewTask {
    pub submission_id: String,
    pub folder: FileRef,
    /// Summary document inside `folder`, when one was found.
    pub document: Option<FileRef>,
}

impl ReviewTask {
    /// Link handed to the reviewer: the summary document if present, the
    /// folder otherwise.
    pub fn link(&self) -> &str {
        self.document
            .as_ref()
            .map(|doc| doc.url.as_str())
            .unwrap_or(self.folder.url.as_str())
    }
}

/// Every task assigned to one reviewer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewerTasks {
    pub reviewer: String,
    pub tasks: Vec<ReviewTask>,
}

/// Group `(reviewer, task)` pairs by reviewer.
///
/// Reviewers appear in the order they were first seen and each reviewer's
/// tasks keep their input order. A submission listed twice for the same
/// reviewer is kept once.
pub fn group_by_reviewer<I>(pairs: I) -> Vec<ReviewerTasks>
where
    I: IntoIterator<Item = (String, ReviewTask)>,
{
    let mut groups: Vec<ReviewerTasks> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();

    for (reviewer, task) in pairs {
        let idx = *positions.entry(reviewer.clone()).or_insert_with(|| {
            groups.push(ReviewerTasks {
                reviewer,
                tasks: Vec::new(),
            });
            groups.len() - 1
        });
        let group = &mut groups[idx];
        if !group
            .tasks
            .iter()
            .any(|t| t.submission_id == task.submission_id)
        {
            group.tasks.push(task);
        }
    }

    groups
}
