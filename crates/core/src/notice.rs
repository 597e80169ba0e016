//! Reviewer notification composition.

use serde::{Deserialize, Serialize};

use crate::tasks::ReviewerTasks;

/// Default subject line for reviewer notifications.
pub const DEFAULT_SUBJECT: &str = "Your review assignments";

/// A plain-text mail ready for delivery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub to: String,
    pub cc: Vec<String>,
    pub subject: String,
    pub body: String,
}

/// Fixed parts of every reviewer notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoticeTemplate {
    pub subject: String,
    pub cc: Vec<String>,
    /// Appended after the task list, separated by a blank line.
    pub footer: Option<String>,
}

impl Default for NoticeTemplate {
    fn default() -> Self {
        Self {
            subject: DEFAULT_SUBJECT.to_string(),
            cc: Vec::new(),
            footer: None,
        }
    }
}

impl NoticeTemplate {
    /// One notice listing every task of `assigned`.
    pub fn compose(&self, assigned: &ReviewerTasks) -> Notice {
        let count = assigned.tasks.len();
        let mut body = format!(
            "Hello,\n\nYou have been assigned {count} submission{} to review. \
             Access has been granted to each submission folder:\n\n",
            if count == 1 { "" } else { "s" }
        );
        for task in &assigned.tasks {
            body.push_str(&format!("- {}: {}\n", task.submission_id, task.link()));
        }
        if let Some(footer) = self.footer.as_deref().filter(|f| !f.trim().is_empty()) {
            body.push('\n');
            body.push_str(footer.trim_end());
            body.push('\n');
        }

        Notice {
            to: assigned.reviewer.clone(),
            cc: self.cc.clone(),
            subject: self.subject.clone(),
            body,
        }
    }
}
