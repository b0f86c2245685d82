//! Tasks for one scope: a user, optionally narrowed to one group.
//!
//! # Responsibility
//! - Create, toggle, edit, delete and bulk-reset tasks.
//! - Derive pending/completed views from the loaded collection.
//!
//! # Invariants
//! - Task text is trimmed and never blank.
//! - Derived views read memory only and reflect the last mutation.
//! - Operations on an id that is gone fail with `TaskNotFound`.
//! - Every operation re-reads its scope from storage first, so a
//!   collection dropped elsewhere (group cascade) is never written back.

use crate::model::id::TaskId;
use crate::model::task::{Task, TaskScope};
use crate::model::validation::{require_text, ValidationError};
use crate::repo::collection::{load_collection, save_collection};
use crate::repo::keys::scope_key;
use crate::repo::kv_repo::KeyValueStore;
use crate::store::error::{StoreError, StoreResult};
use log::{debug, info};

/// Pending single-task deletion; confirm with [`TaskStore::confirm_delete`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDeletion {
    scope: TaskScope,
    task: Task,
}

impl TaskDeletion {
    pub fn task(&self) -> &Task {
        &self.task
    }
}

/// Pending bulk reset; confirm with [`TaskStore::confirm_reset`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResetRequest {
    scope: TaskScope,
    count: usize,
}

impl ResetRequest {
    /// Completed tasks in scope when the request was made.
    pub fn count(&self) -> usize {
        self.count
    }
}

/// Task collection for a single scope.
pub struct TaskStore<S: KeyValueStore> {
    kv: S,
    scope: Option<TaskScope>,
    tasks: Vec<Task>,
}

impl<S: KeyValueStore> TaskStore<S> {
    pub fn new(kv: S) -> Self {
        Self {
            kv,
            scope: None,
            tasks: Vec::new(),
        }
    }

    /// Replaces the collection with the one persisted for `scope`.
    pub fn load(&mut self, scope: &TaskScope) -> StoreResult<()> {
        let tasks = load_collection(&self.kv, &scope_key(scope))?;
        self.tasks = tasks;
        self.scope = Some(scope.clone());
        debug!(
            "event=tasks_load module=tasks status=ok grouped={} tasks_count={}",
            scope.group_id.is_some(),
            self.tasks.len()
        );
        Ok(())
    }

    /// Appends a pending task.
    pub fn create(&mut self, text: &str, scope: &TaskScope) -> StoreResult<Task> {
        self.ensure_scope(scope)?;
        let text = require_text(text, ValidationError::EmptyTaskText)?;

        let task = Task::new(text, scope);
        let mut next = self.tasks.clone();
        next.push(task.clone());
        self.commit(scope, next)?;

        info!(
            "event=task_create module=tasks status=ok task_id={} tasks_count={}",
            task.id,
            self.tasks.len()
        );
        Ok(task)
    }

    /// Flips a task between pending and completed.
    pub fn toggle(&mut self, task_id: &TaskId, scope: &TaskScope) -> StoreResult<Task> {
        self.ensure_scope(scope)?;
        let index = self.position(task_id)?;

        let mut next = self.tasks.clone();
        next[index].toggle();
        let toggled = next[index].clone();
        self.commit(scope, next)?;

        debug!(
            "event=task_toggle module=tasks status=ok task_id={} completed={}",
            toggled.id, toggled.completed
        );
        Ok(toggled)
    }

    /// Replaces a task's text.
    ///
    /// Unchanged text is a successful no-op that keeps `updated_at`.
    ///
    /// # Errors
    /// - `TaskNotFound`, then `Validation`.
    pub fn edit(
        &mut self,
        task_id: &TaskId,
        new_text: &str,
        scope: &TaskScope,
    ) -> StoreResult<Task> {
        self.ensure_scope(scope)?;
        let index = self.position(task_id)?;
        let text = require_text(new_text, ValidationError::EmptyTaskText)?;

        if self.tasks[index].text == text {
            return Ok(self.tasks[index].clone());
        }

        let mut next = self.tasks.clone();
        next[index].set_text(text);
        let edited = next[index].clone();
        self.commit(scope, next)?;

        info!("event=task_edit module=tasks status=ok task_id={}", edited.id);
        Ok(edited)
    }

    /// Removes a task. Always returns `true` on success.
    pub fn delete(&mut self, task_id: &TaskId, scope: &TaskScope) -> StoreResult<bool> {
        self.ensure_scope(scope)?;
        let index = self.position(task_id)?;

        let mut next = self.tasks.clone();
        next.remove(index);
        self.commit(scope, next)?;

        info!(
            "event=task_delete module=tasks status=ok task_id={task_id} tasks_count={}",
            self.tasks.len()
        );
        Ok(true)
    }

    /// Moves every completed task in scope back to pending.
    ///
    /// Returns how many tasks changed. Fails with `NoCompletedTasks` when
    /// there is nothing to reset.
    pub fn reset_completed(&mut self, scope: &TaskScope) -> StoreResult<usize> {
        self.ensure_scope(scope)?;
        let count = self.completed_count();
        if count == 0 {
            return Err(StoreError::NoCompletedTasks);
        }

        let mut next = self.tasks.clone();
        for task in next.iter_mut().filter(|task| task.completed) {
            task.completed = false;
        }
        self.commit(scope, next)?;

        info!("event=tasks_reset module=tasks status=ok reset_count={count}");
        Ok(count)
    }

    /// First step of a confirmed deletion. Nothing is modified.
    pub fn request_delete(
        &mut self,
        task_id: &TaskId,
        scope: &TaskScope,
    ) -> StoreResult<TaskDeletion> {
        self.ensure_scope(scope)?;
        let task = self.tasks[self.position(task_id)?].clone();
        Ok(TaskDeletion {
            scope: scope.clone(),
            task,
        })
    }

    pub fn confirm_delete(&mut self, deletion: TaskDeletion) -> StoreResult<bool> {
        self.delete(&deletion.task.id, &deletion.scope)
    }

    /// First step of a confirmed bulk reset. Fails early with
    /// `NoCompletedTasks` so the caller never prompts for nothing.
    pub fn request_reset(&mut self, scope: &TaskScope) -> StoreResult<ResetRequest> {
        self.ensure_scope(scope)?;
        let count = self.completed_count();
        if count == 0 {
            return Err(StoreError::NoCompletedTasks);
        }
        Ok(ResetRequest {
            scope: scope.clone(),
            count,
        })
    }

    /// Performs the reset. The returned count reflects the tasks completed
    /// at confirmation time, which may differ from [`ResetRequest::count`].
    pub fn confirm_reset(&mut self, request: ResetRequest) -> StoreResult<usize> {
        self.reset_completed(&request.scope)
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn pending(&self) -> Vec<&Task> {
        self.tasks.iter().filter(|task| task.is_pending()).collect()
    }

    pub fn completed(&self) -> Vec<&Task> {
        self.tasks.iter().filter(|task| task.completed).collect()
    }

    pub fn pending_count(&self) -> usize {
        self.tasks.iter().filter(|task| task.is_pending()).count()
    }

    pub fn completed_count(&self) -> usize {
        self.tasks.iter().filter(|task| task.completed).count()
    }

    /// Scope whose collection is loaded.
    pub fn scope(&self) -> Option<&TaskScope> {
        self.scope.as_ref()
    }

    /// Drops the loaded collection. Storage is untouched.
    pub fn clear(&mut self) {
        self.tasks.clear();
        self.scope = None;
    }

    fn ensure_scope(&mut self, scope: &TaskScope) -> StoreResult<()> {
        self.load(scope)
    }

    fn position(&self, task_id: &TaskId) -> StoreResult<usize> {
        self.tasks
            .iter()
            .position(|task| &task.id == task_id)
            .ok_or_else(|| StoreError::TaskNotFound(task_id.clone()))
    }

    fn commit(&mut self, scope: &TaskScope, next: Vec<Task>) -> StoreResult<()> {
        save_collection(&self.kv, &scope_key(scope), &next)?;
        self.tasks = next;
        Ok(())
    }
}
