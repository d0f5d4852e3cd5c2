//! User-facing notifications (toasts).

use serde::Serialize;

use crate::models::ScheduleMutation;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    Success,
    Error,
}

/// A toast to show after a write settles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub level: NotificationLevel,
    pub title: String,
    pub message: String,
}

impl Notification {
    pub fn success(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Success,
            title: title.into(),
            message: message.into(),
        }
    }

    pub fn error(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Error,
            title: title.into(),
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.level == NotificationLevel::Error
    }

    /// Toast for a write the store accepted.
    pub fn saved(mutation: &ScheduleMutation) -> Self {
        match mutation {
            ScheduleMutation::Create(_) => {
                Self::success("Project scheduled", "The project was added to the bay")
            }
            ScheduleMutation::Update(_) => {
                Self::success("Schedule updated", "The schedule entry was moved")
            }
            ScheduleMutation::Delete { .. } => {
                Self::success("Schedule updated", "The schedule entry was removed")
            }
        }
    }

    /// Toast for a write that failed.
    pub fn failed(mutation: &ScheduleMutation, reason: impl std::fmt::Display) -> Self {
        Self::error(
            format!("Failed to {} schedule", mutation.verb()),
            reason.to_string(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failed_toast() {
        let n = Notification::failed(&ScheduleMutation::Delete { id: 3 }, "store unavailable");
        assert!(n.is_error());
        assert_eq!(n.title, "Failed to delete schedule");
        assert_eq!(n.message, "store unavailable");
    }

    #[test]
    fn test_saved_toast() {
        let n = Notification::saved(&ScheduleMutation::Delete { id: 3 });
        assert_eq!(n.level, NotificationLevel::Success);
    }
}
