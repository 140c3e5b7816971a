//! Dual-list assignment editor.
//!
//! Edits one side of the channel/user relation with two panes:
//! *available* (related records not assigned) and *allowed* (assigned ones).
//! Only the assigned set is stored; both panes are derived from it and the
//! loaded related records on every read, so they always partition the
//! loaded records.

use std::collections::BTreeSet;

use ptt_admin_core::Entity;

use super::filter::matches;

/// One of the two panes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pane {
    /// Related records not assigned.
    Available,
    /// Related records assigned.
    Allowed,
}

/// Direction of a transfer between panes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Transfer {
    /// Available to allowed: assign the selection.
    Right,
    /// Allowed to available: unassign the selection.
    Left,
}

impl Transfer {
    /// The pane whose selection this transfer moves.
    #[must_use]
    pub const fn source(self) -> Pane {
        match self {
            Self::Right => Pane::Available,
            Self::Left => Pane::Allowed,
        }
    }
}

/// State of one assignment editor session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignmentEditor<K: Ord> {
    assigned: BTreeSet<K>,
    selected_available: BTreeSet<K>,
    selected_allowed: BTreeSet<K>,
    available_search: String,
    allowed_search: String,
}

impl<K: Ord> Default for AssignmentEditor<K> {
    fn default() -> Self {
        Self {
            assigned: BTreeSet::new(),
            selected_available: BTreeSet::new(),
            selected_allowed: BTreeSet::new(),
            available_search: String::new(),
            allowed_search: String::new(),
        }
    }
}

impl<K: Ord + Copy> AssignmentEditor<K> {
    /// A fresh session seeded with the record's current relation: no
    /// selections, empty searches.
    pub fn new(assigned: impl IntoIterator<Item = K>) -> Self {
        Self {
            assigned: assigned.into_iter().collect(),
            ..Self::default()
        }
    }

    /// The assigned ids.
    ///
    /// Ids with no loaded related record stay here even though no pane
    /// shows them.
    #[must_use]
    pub const fn assigned(&self) -> &BTreeSet<K> {
        &self.assigned
    }

    /// The assigned ids, sorted, as submitted to the API.
    #[must_use]
    pub fn assigned_ids(&self) -> Vec<K> {
        self.assigned.iter().copied().collect()
    }

    /// Ids selected in `pane`.
    #[must_use]
    pub const fn selection(&self, pane: Pane) -> &BTreeSet<K> {
        match pane {
            Pane::Available => &self.selected_available,
            Pane::Allowed => &self.selected_allowed,
        }
    }

    /// Whether `id` is selected in `pane`.
    #[must_use]
    pub fn is_selected(&self, pane: Pane, id: K) -> bool {
        self.selection(pane).contains(&id)
    }

    /// Flip the selection of `id` in `pane`. The other pane is unaffected.
    ///
    /// Only a record currently shown in `pane` can be selected, so ids that
    /// are not among `related` or sit in the other pane are rejected.
    /// Deselecting always works. Returns whether the selection changed.
    pub fn toggle_select<R>(&mut self, pane: Pane, id: K, related: &[R]) -> bool
    where
        R: Entity<Id = K>,
    {
        if self.selection_mut(pane).remove(&id) {
            return true;
        }
        let shown = self.pane(pane, related).iter().any(|item| item.id() == id);
        if shown {
            self.selection_mut(pane).insert(id);
        }
        shown
    }

    /// Whether `transfer` would move anything; drives the enabled state of
    /// the transfer control.
    #[must_use]
    pub fn can_transfer(&self, transfer: Transfer) -> bool {
        !self.selection(transfer.source()).is_empty()
    }

    /// Move the source pane's selection across and clear that selection.
    ///
    /// Returns `false`, changing nothing, when the selection is empty.
    pub fn transfer(&mut self, transfer: Transfer) -> bool {
        if !self.can_transfer(transfer) {
            return false;
        }
        match transfer {
            Transfer::Right => {
                let moved = std::mem::take(&mut self.selected_available);
                self.assigned.extend(moved);
            }
            Transfer::Left => {
                let moved = std::mem::take(&mut self.selected_allowed);
                self.assigned.retain(|id| !moved.contains(id));
            }
        }
        true
    }

    /// Search text of `pane`.
    #[must_use]
    pub fn search(&self, pane: Pane) -> &str {
        match pane {
            Pane::Available => &self.available_search,
            Pane::Allowed => &self.allowed_search,
        }
    }

    /// Replace the search text of `pane`.
    pub fn set_search(&mut self, pane: Pane, query: impl Into<String>) {
        match pane {
            Pane::Available => self.available_search = query.into(),
            Pane::Allowed => self.allowed_search = query.into(),
        }
    }

    /// Records shown in `pane`, in the order of `related`.
    pub fn pane<'a, R>(&self, pane: Pane, related: &'a [R]) -> Vec<&'a R>
    where
        R: Entity<Id = K>,
    {
        let want_assigned = pane == Pane::Allowed;
        let query = self.search(pane);
        related
            .iter()
            .filter(|item| self.assigned.contains(&item.id()) == want_assigned)
            .filter(|item| matches(&item.label(), query))
            .collect()
    }

    /// Records shown in the available pane.
    pub fn available<'a, R>(&self, related: &'a [R]) -> Vec<&'a R>
    where
        R: Entity<Id = K>,
    {
        self.pane(Pane::Available, related)
    }

    /// Records shown in the allowed pane.
    pub fn allowed<'a, R>(&self, related: &'a [R]) -> Vec<&'a R>
    where
        R: Entity<Id = K>,
    {
        self.pane(Pane::Allowed, related)
    }

    const fn selection_mut(&mut self, pane: Pane) -> &mut BTreeSet<K> {
        match pane {
            Pane::Available => &mut self.selected_available,
            Pane::Allowed => &mut self.selected_allowed,
        }
    }
}
