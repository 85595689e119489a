//! Request/query types (Deserialize)

use serde::Deserialize;
use therapy_service::clamp_limit;

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub limit: Option<usize>,
}

impl ListQuery {
    pub fn capped_limit(&self) -> usize {
        clamp_limit(self.limit)
    }
}

#[derive(Debug, Deserialize)]
pub struct UserQuery {
    pub user_id: String,
    pub limit: Option<usize>,
}

impl UserQuery {
    pub fn capped_limit(&self) -> usize {
        clamp_limit(self.limit)
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct TaskListQuery {
    #[serde(default)]
    pub include_completed: bool,
}

/// `POST /api/tasks/{id}/complete?completed=false` reopens a task.
#[derive(Debug, Default, Deserialize)]
pub struct CompleteQuery {
    pub completed: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    pub content: String,
}
