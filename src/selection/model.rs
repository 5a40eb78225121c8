use std::sync::Arc;

use tracing::debug;

use crate::{error::SelectionError, types::{BoundaryLevel, ParentKeys, Region, SelectionPath}};
use super::options::OptionLists;

/// How a selection call changed the path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Set,
    Cleared,
}

/// The single notification emitted by every accepted `SelectionModel` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionChange {
    pub path: SelectionPath,
    pub level: BoundaryLevel, // Field that changed
    pub kind: ChangeKind,
}

impl SelectionChange {
    /// Whether the change needs new geometry. Choosing a sub-district only
    /// filters the set already held; clearing it restores that set.
    pub fn requires_fetch(&self) -> bool {
        self.level != BoundaryLevel::Subdistrict
    }

    /// The region that was chosen; `None` for a clear.
    pub fn region(&self) -> Option<Region> {
        match self.kind {
            ChangeKind::Set => Region::from_path(&self.path, self.level),
            ChangeKind::Cleared => None,
        }
    }
}

/// Single source of truth for the current `(state, district, subdistrict)`
/// path and its derived option lists.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionModel {
    path: SelectionPath,
    options: OptionLists,
}

impl SelectionModel {
    pub fn new() -> Self { Self::default() }

    #[inline] pub fn path(&self) -> &SelectionPath { &self.path }

    #[inline] pub fn options(&self) -> &OptionLists { &self.options }

    /// Set the state, clearing district and sub-district and both child option lists.
    pub fn set_state(&mut self, name: &str) -> Result<SelectionChange, SelectionError> {
        self.set(BoundaryLevel::State, name)
    }

    /// Set the district; rejected while no state is selected.
    pub fn set_district(&mut self, name: &str) -> Result<SelectionChange, SelectionError> {
        self.set(BoundaryLevel::District, name)
    }

    /// Set the sub-district; rejected while no district is selected.
    pub fn set_subdistrict(&mut self, name: &str) -> Result<SelectionChange, SelectionError> {
        self.set(BoundaryLevel::Subdistrict, name)
    }

    /// Set the field at `level`. A blank name behaves like `clear(level)`.
    /// Re-selecting the current name is accepted and re-emitted, which is how
    /// a failed fetch is retried.
    pub fn set(&mut self, level: BoundaryLevel, name: &str) -> Result<SelectionChange, SelectionError> {
        let name = name.trim();
        if name.is_empty() { return Ok(self.clear(level)) }

        if let Some(parent) = level.parent() {
            if self.path.get(parent).is_none() {
                debug!(%level, name, "selection rejected: parent unset");
                return Err(SelectionError::ParentUnset { level, parent });
            }
        }

        self.path.assign(level, Arc::from(name));
        if let Some(child) = level.child() {
            self.options.clear_from(child);
        }
        debug!(path = %self.path, "selection set");
        Ok(SelectionChange { path: self.path.clone(), level, kind: ChangeKind::Set })
    }

    /// Clear `from_level` and everything below it, with the option lists
    /// governed by the cleared fields.
    pub fn clear(&mut self, from_level: BoundaryLevel) -> SelectionChange {
        self.path.clear_from(from_level);
        if let Some(child) = from_level.child() {
            self.options.clear_from(child);
        }
        debug!(path = %self.path, level = %from_level, "selection cleared");
        SelectionChange { path: self.path.clone(), level: from_level, kind: ChangeKind::Cleared }
    }

    /// Replace the option list of `level` with names derived from an accepted
    /// boundary set issued for `parents`. Ignored (returns false) if the
    /// current path no longer leads to that set.
    pub fn publish_options(&mut self, level: BoundaryLevel, parents: &ParentKeys, names: Vec<String>) -> bool {
        if self.path.parents_of(level).as_ref() != Some(parents) { return false }
        self.options.set(level, names);
        true
    }
}
