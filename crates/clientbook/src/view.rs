//! Presentation state for the three client views.
//!
//! [`ViewController`] tracks which view is active (list, form, detail), the
//! current search query, the last form error, and the state of the
//! suggestion panel. It reads records only from repository snapshots and
//! writes only through the repository, so renderers can stay dumb.
//!
//! Each navigation bumps a generation counter. A suggestion fetch started for
//! one detail view carries a [`FetchTicket`]; completing it after the user has
//! navigated elsewhere is a no-op.

use tracing::{debug, warn};

use crate::client::{Client, ClientDraft, ClientId};
use crate::error::{Error, Result};
use crate::repository::{ClientRepository, Snapshot};
use crate::storage::RecordStore;
use crate::suggestions::{ExerciseSummary, FetchError, Suggestions};
use crate::validate::ValidationIssue;

/// The view currently shown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum View {
    /// Searchable client table.
    List {
        /// Current search text.
        query: String,
    },
    /// Create or edit form.
    Form {
        /// The client being edited, or `None` when creating.
        editing: Option<ClientId>,
    },
    /// One client's details plus exercise suggestions.
    Detail {
        /// The client shown.
        id: ClientId,
    },
}

/// State of the suggestion panel on the detail view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SuggestionPanel {
    /// Not on a detail view, or suggestions are turned off.
    Hidden,
    /// A fetch is in flight.
    Loading,
    /// Suggestions arrived.
    Ready(Vec<ExerciseSummary>),
    /// The fetch failed; show the placeholder.
    Unavailable,
}

/// Identifies the detail view a suggestion fetch was started for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    generation: u64,
}

/// Reconciles what is on screen with repository state.
#[derive(Debug)]
pub struct ViewController {
    view: View,
    generation: u64,
    suggestions_enabled: bool,
    suggestions: SuggestionPanel,
    form_error: Option<ValidationIssue>,
    notice: Option<String>,
}

impl Default for ViewController {
    fn default() -> Self {
        Self::new(true)
    }
}

impl ViewController {
    /// Start on an unfiltered list view.
    #[must_use]
    pub fn new(suggestions_enabled: bool) -> Self {
        Self {
            view: View::List {
                query: String::new(),
            },
            generation: 0,
            suggestions_enabled,
            suggestions: SuggestionPanel::Hidden,
            form_error: None,
            notice: None,
        }
    }

    /// The active view.
    #[must_use]
    pub fn view(&self) -> &View {
        &self.view
    }

    /// The suggestion panel state.
    #[must_use]
    pub fn suggestions(&self) -> &SuggestionPanel {
        &self.suggestions
    }

    /// The validation issue from the last rejected form submit.
    #[must_use]
    pub fn form_error(&self) -> Option<ValidationIssue> {
        self.form_error
    }

    /// A one-line message for the user, e.g. after deleting a missing record.
    #[must_use]
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    /// Show the list view filtered by `query`.
    pub fn show_list(&mut self, query: impl Into<String>) {
        self.navigate(View::List {
            query: query.into(),
        });
    }

    /// Records visible on the list view, in stored order.
    ///
    /// Outside the list view every record is visible.
    #[must_use]
    pub fn visible_clients<'a>(&self, snapshot: &'a Snapshot) -> Vec<&'a Client> {
        match &self.view {
            View::List { query } => snapshot.filter(query),
            _ => snapshot.records().iter().collect(),
        }
    }

    /// Show an empty form for a new client.
    pub fn open_create_form(&mut self) {
        self.navigate(View::Form { editing: None });
    }

    /// Show the form prefilled with the client `id`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the snapshot has no such client; the
    /// view does not change.
    pub fn open_edit_form(&mut self, snapshot: &Snapshot, id: &ClientId) -> Result<ClientDraft> {
        let client = snapshot.find(id).ok_or_else(|| Error::not_found(id))?;
        let draft = client.to_draft();
        self.navigate(View::Form {
            editing: Some(id.clone()),
        });
        Ok(draft)
    }

    /// Submit the form: create a client, or update the one being edited.
    ///
    /// Outside the form view the draft is treated as a new client. On success
    /// the list view is shown; on a validation failure the form stays open
    /// with [`form_error`](Self::form_error) set.
    ///
    /// # Errors
    ///
    /// Propagates repository errors unchanged.
    pub fn submit_form<S: RecordStore>(
        &mut self,
        repo: &mut ClientRepository<S>,
        draft: ClientDraft,
    ) -> Result<Client> {
        let editing = match &self.view {
            View::Form { editing } => editing.clone(),
            _ => None,
        };

        let result = match &editing {
            Some(id) => repo.update(id, draft),
            None => repo.create(draft),
        };

        match result {
            Ok(client) => {
                self.show_list("");
                Ok(client)
            }
            Err(err) => {
                if let Some(errors) = err.validation_errors() {
                    self.form_error = Some(errors.first());
                }
                Err(err)
            }
        }
    }

    /// Delete the client `id`.
    ///
    /// A missing client sets a notice instead of failing. If the deleted
    /// client was on screen, the list view is shown.
    ///
    /// # Errors
    ///
    /// Propagates storage errors.
    pub fn delete<S: RecordStore>(
        &mut self,
        repo: &mut ClientRepository<S>,
        id: &ClientId,
    ) -> Result<bool> {
        let removed = repo.delete(id)?;

        let showing_deleted = match &self.view {
            View::Detail { id: shown } => shown == id,
            View::Form { editing } => editing.as_ref() == Some(id),
            View::List { .. } => false,
        };
        if showing_deleted {
            self.show_list("");
        }

        if !removed {
            self.notice = Some(format!("Client {id} no longer exists."));
        }
        Ok(removed)
    }

    /// Show the detail view for `id`.
    ///
    /// Returns a ticket for the suggestion fetch the caller should start, or
    /// `None` when suggestions are turned off.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the snapshot has no such client; the
    /// view does not change.
    pub fn open_detail(&mut self, snapshot: &Snapshot, id: &ClientId) -> Result<Option<FetchTicket>> {
        if snapshot.find(id).is_none() {
            return Err(Error::not_found(id));
        }

        self.navigate(View::Detail { id: id.clone() });
        if !self.suggestions_enabled {
            return Ok(None);
        }

        self.suggestions = SuggestionPanel::Loading;
        Ok(Some(FetchTicket {
            generation: self.generation,
        }))
    }

    /// Deliver the outcome of a suggestion fetch.
    ///
    /// Returns `false`, and changes nothing, when the ticket belongs to a view
    /// that is no longer active.
    pub fn complete_fetch(
        &mut self,
        ticket: FetchTicket,
        outcome: std::result::Result<Suggestions, FetchError>,
    ) -> bool {
        if ticket.generation != self.generation {
            debug!(
                ticket = ticket.generation,
                current = self.generation,
                "Discarding suggestions for an inactive view"
            );
            return false;
        }

        self.suggestions = match outcome {
            Ok(suggestions) => SuggestionPanel::Ready(suggestions.collect()),
            Err(err) => {
                warn!(error = %err, "Exercise suggestions unavailable");
                SuggestionPanel::Unavailable
            }
        };
        true
    }

    fn navigate(&mut self, view: View) {
        self.generation += 1;
        self.view = view;
        self.suggestions = SuggestionPanel::Hidden;
        self.form_error = None;
        self.notice = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::DEFAULT_STORAGE_KEY;
    use crate::storage::MemoryStore;
    use crate::suggestions::ExerciseEntry;

    fn repository_with(names: &[&str]) -> ClientRepository<MemoryStore> {
        let mut repo = ClientRepository::open(MemoryStore::new(), DEFAULT_STORAGE_KEY).unwrap();
        for name in names {
            repo.create(ClientDraft::new(*name, "x@example.com", "2024-01-01"))
                .unwrap();
        }
        repo
    }

    fn sample_suggestions() -> Suggestions {
        Suggestions::new(
            vec![
                ExerciseEntry::new("Squat", "<p>Legs</p>"),
                ExerciseEntry::new("Push-up", "<p>Chest</p>"),
            ],
            5,
            100,
        )
    }

    fn failed_fetch() -> FetchError {
        FetchError::Status {
            status: 500,
            url: "http://catalog.test/".to_string(),
        }
    }

    #[test]
    fn test_starts_on_unfiltered_list() {
        let controller = ViewController::default();
        assert_eq!(
            controller.view(),
            &View::List {
                query: String::new()
            }
        );
        assert_eq!(controller.suggestions(), &SuggestionPanel::Hidden);
    }

    #[test]
    fn test_visible_clients_follow_query() {
        let repo = repository_with(&["Jane Doe", "John Smith"]);
        let snapshot = repo.snapshot();
        let mut controller = ViewController::default();

        assert_eq!(controller.visible_clients(&snapshot).len(), 2);

        controller.show_list("doe");
        let visible = controller.visible_clients(&snapshot);
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].full_name, "Jane Doe");
    }

    #[test]
    fn test_detail_fetch_success() {
        let repo = repository_with(&["Jane Doe"]);
        let snapshot = repo.snapshot();
        let id = snapshot.records()[0].id().clone();
        let mut controller = ViewController::default();

        let ticket = controller.open_detail(&snapshot, &id).unwrap().unwrap();
        assert_eq!(controller.suggestions(), &SuggestionPanel::Loading);

        assert!(controller.complete_fetch(ticket, Ok(sample_suggestions())));
        match controller.suggestions() {
            SuggestionPanel::Ready(items) => {
                assert_eq!(items.len(), 2);
                assert_eq!(items[0].description, "Legs");
            }
            other => panic!("Expected Ready, got {other:?}"),
        }
    }

    #[test]
    fn test_detail_fetch_failure_shows_placeholder() {
        let repo = repository_with(&["Jane Doe"]);
        let snapshot = repo.snapshot();
        let id = snapshot.records()[0].id().clone();
        let mut controller = ViewController::default();

        let ticket = controller.open_detail(&snapshot, &id).unwrap().unwrap();
        assert!(controller.complete_fetch(ticket, Err(failed_fetch())));
        assert_eq!(controller.suggestions(), &SuggestionPanel::Unavailable);
        assert_eq!(controller.view(), &View::Detail { id });
    }

    #[test]
    fn test_fetch_after_navigating_away_is_discarded() {
        let repo = repository_with(&["Jane Doe"]);
        let snapshot = repo.snapshot();
        let id = snapshot.records()[0].id().clone();
        let mut controller = ViewController::default();

        let ticket = controller.open_detail(&snapshot, &id).unwrap().unwrap();
        controller.show_list("");

        assert!(!controller.complete_fetch(ticket, Ok(sample_suggestions())));
        assert_eq!(controller.suggestions(), &SuggestionPanel::Hidden);
    }

    #[test]
    fn test_fetch_for_previous_detail_is_discarded() {
        let repo = repository_with(&["Jane Doe", "John Smith"]);
        let snapshot = repo.snapshot();
        let first = snapshot.records()[0].id().clone();
        let second = snapshot.records()[1].id().clone();
        let mut controller = ViewController::default();

        let stale = controller.open_detail(&snapshot, &first).unwrap().unwrap();
        let current = controller.open_detail(&snapshot, &second).unwrap().unwrap();

        assert!(!controller.complete_fetch(stale, Err(failed_fetch())));
        assert_eq!(controller.suggestions(), &SuggestionPanel::Loading);
        assert!(controller.complete_fetch(current, Ok(sample_suggestions())));
    }

    #[test]
    fn test_detail_without_suggestions() {
        let repo = repository_with(&["Jane Doe"]);
        let snapshot = repo.snapshot();
        let id = snapshot.records()[0].id().clone();
        let mut controller = ViewController::new(false);

        assert!(controller.open_detail(&snapshot, &id).unwrap().is_none());
        assert_eq!(controller.suggestions(), &SuggestionPanel::Hidden);
    }

    #[test]
    fn test_detail_unknown_client() {
        let repo = repository_with(&[]);
        let mut controller = ViewController::default();

        let err = controller
            .open_detail(&repo.snapshot(), &ClientId::from("404"))
            .unwrap_err();
        assert!(err.is_not_found());
        assert!(matches!(controller.view(), View::List { .. }));
    }

    #[test]
    fn test_create_through_form() {
        let mut repo = repository_with(&[]);
        let mut controller = ViewController::default();

        controller.open_create_form();
        let created = controller
            .submit_form(
                &mut repo,
                ClientDraft::new("New Person", "new@example.com", "2024-05-01"),
            )
            .unwrap();

        assert_eq!(repo.snapshot().records(), &[created]);
        assert!(matches!(controller.view(), View::List { .. }));
    }

    #[test]
    fn test_invalid_submit_keeps_form_open() {
        let mut repo = repository_with(&[]);
        let mut controller = ViewController::default();

        controller.open_create_form();
        let err = controller
            .submit_form(&mut repo, ClientDraft::new("", "x@example.com", "2024-01-01"))
            .unwrap_err();

        assert!(err.is_validation());
        assert_eq!(controller.form_error(), Some(ValidationIssue::MissingFullName));
        assert_eq!(controller.view(), &View::Form { editing: None });
        assert!(repo.snapshot().is_empty());
    }

    #[test]
    fn test_edit_through_form() {
        let mut repo = repository_with(&["Jane Doe"]);
        let snapshot = repo.snapshot();
        let id = snapshot.records()[0].id().clone();
        let mut controller = ViewController::default();

        let mut draft = controller.open_edit_form(&snapshot, &id).unwrap();
        assert_eq!(draft.full_name, "Jane Doe");

        draft.phone = Some("555-0199".to_string());
        let updated = controller.submit_form(&mut repo, draft).unwrap();

        assert_eq!(updated.id(), &id);
        assert_eq!(repo.snapshot().len(), 1);
        assert_eq!(
            repo.snapshot().records()[0].phone.as_deref(),
            Some("555-0199")
        );
    }

    #[test]
    fn test_navigation_clears_form_error() {
        let mut repo = repository_with(&[]);
        let mut controller = ViewController::default();

        controller.open_create_form();
        let _ = controller.submit_form(&mut repo, ClientDraft::default());
        assert!(controller.form_error().is_some());

        controller.show_list("");
        assert!(controller.form_error().is_none());
    }

    #[test]
    fn test_delete_shown_client_returns_to_list() {
        let mut repo = repository_with(&["Jane Doe"]);
        let snapshot = repo.snapshot();
        let id = snapshot.records()[0].id().clone();
        let mut controller = ViewController::new(false);

        controller.open_detail(&snapshot, &id).unwrap();
        assert!(controller.delete(&mut repo, &id).unwrap());

        assert!(matches!(controller.view(), View::List { .. }));
        assert!(controller.notice().is_none());
        assert!(repo.snapshot().is_empty());
    }

    #[test]
    fn test_delete_missing_client_sets_notice() {
        let mut repo = repository_with(&[]);
        let mut controller = ViewController::default();

        assert!(!controller.delete(&mut repo, &ClientId::from("77")).unwrap());
        assert!(controller.notice().unwrap().contains("77"));
    }
}
