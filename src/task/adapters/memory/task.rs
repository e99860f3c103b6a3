//! In-memory repository for task workflow tests.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::task::{
    domain::{Task, TaskId, UserId},
    ports::{TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};

/// Thread-safe in-memory task repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskRepository {
    state: Arc<RwLock<InMemoryTaskState>>,
}

#[derive(Debug, Default)]
struct InMemoryTaskState {
    tasks: HashMap<TaskId, Task>,
    assignee_index: HashMap<UserId, Vec<TaskId>>,
}

impl InMemoryTaskRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn index_assignees(state: &mut InMemoryTaskState, task: &Task) {
    for user_id in task.assigned_to() {
        state
            .assignee_index
            .entry(*user_id)
            .or_default()
            .push(task.id());
    }
}

/// Removes a task ID from the assignee index, cleaning up empty entries.
fn deindex_assignees(state: &mut InMemoryTaskState, task: &Task) {
    let task_id = task.id();
    for user_id in task.assigned_to() {
        if let Some(ids) = state.assignee_index.get_mut(user_id) {
            ids.retain(|id| *id != task_id);
            if ids.is_empty() {
                state.assignee_index.remove(user_id);
            }
        }
    }
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()> {
        let mut state = self.state.write().map_err(|err| {
            TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        if state.tasks.contains_key(&task.id()) {
            return Err(TaskRepositoryError::DuplicateTask(task.id()));
        }

        index_assignees(&mut state, task);
        state.tasks.insert(task.id(), task.clone());
        Ok(())
    }

    async fn update(&self, task: &Task) -> TaskRepositoryResult<Task> {
        let mut state = self.state.write().map_err(|err| {
            TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;

        let stored = state
            .tasks
            .get(&task.id())
            .ok_or(TaskRepositoryError::NotFound(task.id()))?
            .clone();

        if stored.version() != task.version() {
            return Err(TaskRepositoryError::VersionConflict {
                task_id: task.id(),
                expected: task.version(),
            });
        }

        deindex_assignees(&mut state, &stored);
        let mut updated = task.clone();
        updated.set_version(task.version().saturating_add(1));
        index_assignees(&mut state, &updated);
        state.tasks.insert(updated.id(), updated.clone());
        Ok(updated)
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        let state = self.state.read().map_err(|err| {
            TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        Ok(state.tasks.get(&id).cloned())
    }

    async fn list_assigned_to(&self, user_id: UserId) -> TaskRepositoryResult<Vec<Task>> {
        let state = self.state.read().map_err(|err| {
            TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        Ok(state
            .assignee_index
            .get(&user_id)
            .map(|ids| {
                ids.iter()
                    .filter_map(|id| state.tasks.get(id).cloned())
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn delete(&self, id: TaskId) -> TaskRepositoryResult<()> {
        let mut state = self.state.write().map_err(|err| {
            TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        let removed = state
            .tasks
            .remove(&id)
            .ok_or(TaskRepositoryError::NotFound(id))?;
        deindex_assignees(&mut state, &removed);
        Ok(())
    }
}
