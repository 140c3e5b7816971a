//! Entity list state.

use ptt_admin_core::Entity;

use super::filter::filter;
use crate::api::ApiError;

/// What the list area shows.
///
/// Exactly one of these holds at a time, decided only by the list's current
/// fields, so re-reading an unchanged list always yields the same state.
#[derive(Debug, PartialEq, Eq)]
pub enum ListState<'a, T> {
    /// A fetch is outstanding.
    Loading,
    /// Nothing to show (no records, or none match the query).
    Empty,
    /// Rows matching the query, in server order.
    Populated(Vec<&'a T>),
}

/// A fetched collection with its search query, loading flag and
/// list-level error.
#[derive(Debug, Clone)]
pub struct EntityList<T> {
    items: Vec<T>,
    loading: bool,
    query: String,
    failure: Option<ApiError>,
}

impl<T> Default for EntityList<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            loading: false,
            query: String::new(),
            failure: None,
        }
    }
}

impl<T: Entity> EntityList<T> {
    /// An empty, idle list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a fetch as started and clear the previous error.
    pub fn begin_load(&mut self) {
        self.loading = true;
        self.failure = None;
    }

    /// Apply a fetch result.
    ///
    /// A failure empties the list and records the error. The loading flag is
    /// cleared either way.
    pub fn finish_load(&mut self, result: Result<Vec<T>, ApiError>) {
        match result {
            Ok(items) => {
                self.items = items;
                self.failure = None;
            }
            Err(e) => {
                self.items.clear();
                self.failure = Some(e);
            }
        }
        self.loading = false;
    }

    /// Whether a fetch is outstanding.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    /// Every loaded record, unfiltered.
    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// The record with `id`, if loaded.
    #[must_use]
    pub fn get(&self, id: T::Id) -> Option<&T> {
        self.items.iter().find(|item| item.id() == id)
    }

    /// Current search query.
    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Replace the search query.
    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    /// Records matching the current query.
    #[must_use]
    pub fn visible(&self) -> Vec<&T> {
        filter(&self.items, &self.query)
    }

    /// What the list area should render.
    #[must_use]
    pub fn state(&self) -> ListState<'_, T> {
        if self.loading {
            return ListState::Loading;
        }
        let rows = self.visible();
        if rows.is_empty() {
            ListState::Empty
        } else {
            ListState::Populated(rows)
        }
    }

    /// Inline error text for the list, e.g. `Failed to load channels.`
    #[must_use]
    pub fn error(&self) -> Option<String> {
        self.failure
            .as_ref()
            .map(|_| format!("Failed to load {}s.", T::KIND))
    }

    /// The error behind [`EntityList::error`].
    #[must_use]
    pub const fn failure(&self) -> Option<&ApiError> {
        self.failure.as_ref()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use ptt_admin_core::{Channel, ChannelId};

    use super::*;

    fn channel(id: i64, name: &str) -> Channel {
        Channel {
            id: ChannelId::new(id),
            name: name.to_owned(),
            channel_id: None,
            authorized_users: Vec::new(),
        }
    }

    #[test]
    fn test_states_are_exclusive() {
        let mut list = EntityList::<Channel>::new();
        assert_eq!(list.state(), ListState::Empty);

        list.begin_load();
        assert_eq!(list.state(), ListState::Loading);

        list.finish_load(Ok(vec![channel(1, "ops"), channel(2, "sales")]));
        assert!(!list.is_loading());
        match list.state() {
            ListState::Populated(rows) => assert_eq!(rows.len(), 2),
            other => panic!("expected rows, got {other:?}"),
        }
    }

    #[test]
    fn test_state_is_stable_without_changes() {
        let mut list = EntityList::new();
        list.finish_load(Ok(vec![channel(1, "ops")]));
        assert_eq!(list.state(), list.state());
    }

    #[test]
    fn test_query_narrows_rows() {
        let mut list = EntityList::new();
        list.finish_load(Ok(vec![channel(1, "Ops"), channel(2, "sales")]));

        list.set_query("OP");
        assert_eq!(list.visible(), vec![&channel(1, "Ops")]);

        list.set_query("nothing");
        assert_eq!(list.state(), ListState::Empty);
        assert_eq!(list.items().len(), 2);
    }

    #[test]
    fn test_failed_load_clears_rows() {
        let mut list = EntityList::new();
        list.finish_load(Ok(vec![channel(1, "ops")]));

        list.begin_load();
        list.finish_load(Err(ApiError::Network("connection refused".to_owned())));

        assert!(!list.is_loading());
        assert!(list.items().is_empty());
        assert_eq!(list.error().as_deref(), Some("Failed to load channels."));
        assert!(matches!(list.failure(), Some(ApiError::Network(_))));

        list.begin_load();
        assert!(list.error().is_none());
    }

    #[test]
    fn test_get_by_id() {
        let mut list = EntityList::new();
        list.finish_load(Ok(vec![channel(7, "ops")]));
        assert_eq!(list.get(ChannelId::new(7)).unwrap().name, "ops");
        assert!(list.get(ChannelId::new(8)).is_none());
    }
}
