//! Groups owned by one user, with the active selection.
//!
//! # Responsibility
//! - Create, rename, delete and select groups for the loaded owner.
//! - Cascade group deletion to the group's task collection.
//!
//! # Invariants
//! - Group names are trimmed and unique per owner (case-sensitive).
//! - Deleting a group and dropping its tasks is one atomic storage batch.
//! - The selection always points at a group present in the collection.

use crate::model::group::Group;
use crate::model::id::GroupId;
use crate::model::task::Task;
use crate::model::validation::{require_text, ValidationError};
use crate::repo::collection::{encode_collection, load_collection, save_collection};
use crate::repo::keys::{groups_key, tasks_key};
use crate::repo::kv_repo::{KeyValueStore, KvWrite};
use crate::store::error::{StoreError, StoreResult};
use log::{debug, info};

/// Pending group deletion awaiting caller confirmation.
///
/// Obtained from [`GroupStore::request_delete`]; pass it to
/// [`GroupStore::confirm_delete`] to go ahead, or drop it to cancel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupDeletion {
    owner: String,
    group: Group,
    task_count: usize,
}

impl GroupDeletion {
    pub fn group(&self) -> &Group {
        &self.group
    }

    /// Tasks that will be removed together with the group.
    pub fn task_count(&self) -> usize {
        self.task_count
    }
}

/// Group collection for a single owner.
pub struct GroupStore<S: KeyValueStore> {
    kv: S,
    owner: Option<String>,
    groups: Vec<Group>,
    current: Option<GroupId>,
}

impl<S: KeyValueStore> GroupStore<S> {
    pub fn new(kv: S) -> Self {
        Self {
            kv,
            owner: None,
            groups: Vec::new(),
            current: None,
        }
    }

    /// Replaces the collection with the one persisted for `username`.
    ///
    /// Clears the selection.
    pub fn load(&mut self, username: &str) -> StoreResult<()> {
        let groups = load_collection(&self.kv, &groups_key(username))?;
        self.groups = groups;
        self.owner = Some(username.to_string());
        self.current = None;
        debug!(
            "event=groups_load module=groups status=ok groups_count={}",
            self.groups.len()
        );
        Ok(())
    }

    /// Creates a group for `username`.
    ///
    /// # Errors
    /// - `Validation` when the name is blank.
    /// - `DuplicateGroupName` when the owner already uses the name.
    pub fn create(&mut self, name: &str, username: &str) -> StoreResult<Group> {
        self.ensure_scope(username)?;
        let name = require_text(name, ValidationError::EmptyGroupName)?;
        if self.groups.iter().any(|group| group.name == name) {
            return Err(StoreError::DuplicateGroupName(name));
        }

        let group = Group::new(name, username);
        let mut next = self.groups.clone();
        next.push(group.clone());
        self.commit(username, next)?;

        info!(
            "event=group_create module=groups status=ok group_id={} groups_count={}",
            group.id,
            self.groups.len()
        );
        Ok(group)
    }

    /// Renames a group in place.
    ///
    /// Renaming to the current name succeeds without writing and leaves
    /// `updated_at` untouched.
    ///
    /// # Errors
    /// - `GroupNotFound`, then `Validation`, then `DuplicateGroupName`.
    pub fn rename(
        &mut self,
        group_id: &GroupId,
        new_name: &str,
        username: &str,
    ) -> StoreResult<Group> {
        self.ensure_scope(username)?;
        let index = self.position(group_id)?;
        let name = require_text(new_name, ValidationError::EmptyGroupName)?;

        if self.groups[index].name == name {
            return Ok(self.groups[index].clone());
        }
        if self
            .groups
            .iter()
            .any(|group| &group.id != group_id && group.name == name)
        {
            return Err(StoreError::DuplicateGroupName(name));
        }

        let mut next = self.groups.clone();
        next[index].rename(name);
        let renamed = next[index].clone();
        self.commit(username, next)?;

        info!(
            "event=group_rename module=groups status=ok group_id={}",
            renamed.id
        );
        Ok(renamed)
    }

    /// Deletes a group and its persisted task collection.
    ///
    /// Clears the selection when it pointed at the deleted group.
    pub fn delete(&mut self, group_id: &GroupId, username: &str) -> StoreResult<Group> {
        self.ensure_scope(username)?;
        let index = self.position(group_id)?;

        let mut next = self.groups.clone();
        let removed = next.remove(index);

        let groups_entry = groups_key(username);
        let encoded = encode_collection(&groups_entry, &next)?;
        let tasks_entry = tasks_key(username, Some(group_id));
        self.kv.write_batch(&[
            KvWrite::Put {
                key: &groups_entry,
                value: &encoded,
            },
            KvWrite::Remove { key: &tasks_entry },
        ])?;
        self.groups = next;

        if self.current.as_ref() == Some(group_id) {
            self.current = None;
        }

        info!(
            "event=group_delete module=groups status=ok group_id={} groups_count={}",
            removed.id,
            self.groups.len()
        );
        Ok(removed)
    }

    /// First step of a confirmed deletion: looks the group up and counts
    /// the tasks that would go with it. Nothing is modified.
    pub fn request_delete(
        &mut self,
        group_id: &GroupId,
        username: &str,
    ) -> StoreResult<GroupDeletion> {
        self.ensure_scope(username)?;
        let group = self.groups[self.position(group_id)?].clone();
        let tasks: Vec<Task> = load_collection(&self.kv, &tasks_key(username, Some(group_id)))?;
        Ok(GroupDeletion {
            owner: username.to_string(),
            group,
            task_count: tasks.len(),
        })
    }

    /// Second step: performs the deletion described by `deletion`.
    ///
    /// Fails with `GroupNotFound` if the group went away in between.
    pub fn confirm_delete(&mut self, deletion: GroupDeletion) -> StoreResult<Group> {
        self.delete(&deletion.group.id, &deletion.owner)
    }

    /// Makes `group_id` the active group.
    pub fn select(&mut self, group_id: &GroupId) -> StoreResult<Group> {
        let group = self.groups[self.position(group_id)?].clone();
        self.current = Some(group.id.clone());
        Ok(group)
    }

    pub fn current_group(&self) -> Option<&Group> {
        let current = self.current.as_ref()?;
        self.groups.iter().find(|group| &group.id == current)
    }

    pub fn clear_current_group(&mut self) {
        self.current = None;
    }

    /// Drops the loaded collection, e.g. on logout. Storage is untouched.
    pub fn clear(&mut self) {
        self.groups.clear();
        self.owner = None;
        self.current = None;
    }

    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    pub fn groups_count(&self) -> usize {
        self.groups.len()
    }

    /// Username whose collection is loaded.
    pub fn owner(&self) -> Option<&str> {
        self.owner.as_deref()
    }

    fn ensure_scope(&mut self, username: &str) -> StoreResult<()> {
        if self.owner.as_deref() != Some(username) {
            self.load(username)?;
        }
        Ok(())
    }

    fn position(&self, group_id: &GroupId) -> StoreResult<usize> {
        self.groups
            .iter()
            .position(|group| &group.id == group_id)
            .ok_or_else(|| StoreError::GroupNotFound(group_id.clone()))
    }

    fn commit(&mut self, username: &str, next: Vec<Group>) -> StoreResult<()> {
        save_collection(&self.kv, &groups_key(username), &next)?;
        self.groups = next;
        Ok(())
    }
}
