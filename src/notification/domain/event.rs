//! Server-to-client realtime event payloads.

use crate::task::domain::{TaskComment, TaskId};
use serde::{Deserialize, Serialize};

/// Event delivered to a user's realtime channel.
///
/// # Serialisation
///
/// Events are serialised with a `type` tag field:
///
/// ```json
/// { "type": "new_comment", "task_id": "...", "comment": { ... } }
/// { "type": "notification", "message": "...", "link": "/tasks/..." }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RealtimeEvent {
    /// A comment was posted to a task the recipient participates in.
    NewComment {
        /// The task whose thread received the comment.
        task_id: TaskId,
        /// The comment itself.
        comment: TaskComment,
    },
    /// A human-readable workflow notification with a client route link.
    Notification {
        /// Rendered message text.
        message: String,
        /// Client route the notification points at.
        link: String,
    },
}

impl RealtimeEvent {
    /// Creates a `new_comment` event.
    #[must_use]
    pub const fn new_comment(task_id: TaskId, comment: TaskComment) -> Self {
        Self::NewComment { task_id, comment }
    }

    /// Creates a `notification` event.
    #[must_use]
    pub fn notification(message: impl Into<String>, link: impl Into<String>) -> Self {
        Self::Notification {
            message: message.into(),
            link: link.into(),
        }
    }
}
