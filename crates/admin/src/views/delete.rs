//! Two-step delete confirmation.

/// State of the delete confirmation for one list.
///
/// `request` opens the confirmation for a candidate; `cancel` drops it with
/// no network call; `begin` takes the candidate for the API call and
/// `finish` records the outcome. The candidate is cleared whatever the
/// outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteConfirmation<Id> {
    candidate: Option<Id>,
    deleting: Option<Id>,
    error: Option<String>,
}

impl<Id> Default for DeleteConfirmation<Id> {
    fn default() -> Self {
        Self {
            candidate: None,
            deleting: None,
            error: None,
        }
    }
}

impl<Id: Copy + PartialEq> DeleteConfirmation<Id> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Open the confirmation for `id`.
    pub fn request(&mut self, id: Id) {
        self.candidate = Some(id);
        self.error = None;
    }

    /// Close the confirmation without deleting.
    pub fn cancel(&mut self) {
        self.candidate = None;
    }

    /// Whether the confirmation is showing.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.candidate.is_some()
    }

    /// Id awaiting confirmation.
    #[must_use]
    pub const fn candidate(&self) -> Option<Id> {
        self.candidate
    }

    /// Close the confirmation and mark its candidate as being deleted.
    ///
    /// Returns the id to delete, or `None` if nothing was pending.
    pub fn begin(&mut self) -> Option<Id> {
        let id = self.candidate.take()?;
        self.deleting = Some(id);
        self.error = None;
        Some(id)
    }

    /// Record the outcome of the delete started by [`DeleteConfirmation::begin`].
    pub fn finish(&mut self, outcome: Result<(), String>) {
        self.deleting = None;
        self.error = outcome.err();
    }

    /// Id whose delete call is in flight, for a per-row busy marker.
    #[must_use]
    pub const fn deleting(&self) -> Option<Id> {
        self.deleting
    }

    /// Whether `id` is being deleted.
    #[must_use]
    pub fn is_deleting(&self, id: Id) -> bool {
        self.deleting == Some(id)
    }

    /// Delete-specific error from the last attempt.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confirm_flow() {
        let mut confirm = DeleteConfirmation::new();
        confirm.request(7);
        assert!(confirm.is_open());
        assert_eq!(confirm.candidate(), Some(7));

        assert_eq!(confirm.begin(), Some(7));
        assert!(!confirm.is_open());
        assert!(confirm.is_deleting(7));

        confirm.finish(Ok(()));
        assert_eq!(confirm.deleting(), None);
        assert_eq!(confirm.error(), None);
    }

    #[test]
    fn test_cancel_clears_candidate() {
        let mut confirm = DeleteConfirmation::new();
        confirm.request(7);
        confirm.cancel();
        assert_eq!(confirm.candidate(), None);
        assert_eq!(confirm.begin(), None);
    }

    #[test]
    fn test_failure_is_reported_and_cleared_on_next_request() {
        let mut confirm = DeleteConfirmation::new();
        confirm.request(3);
        confirm.begin();
        confirm.finish(Err("HTTP error 500".to_owned()));
        assert!(!confirm.is_open());
        assert_eq!(confirm.error(), Some("HTTP error 500"));

        confirm.request(4);
        assert_eq!(confirm.error(), None);
    }
}
