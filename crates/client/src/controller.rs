//! List controller
//!
//! The list view is an owned [`TodoState`] updated in one direction:
//! a [`Command`] is dispatched, which may transition the state and yield an
//! [`Effect`]; the effect runs against a [`TodoGateway`] and produces an
//! [`Outcome`]; applying the outcome transitions the state again.
//!
//! Changes to `items` happen only after the server confirms them. While a
//! create or an item mutation is in flight, new mutations are refused.

use todo_core::todo::{Filter, Todo, TodoId, TodoPatch};
use tracing::debug;

use crate::error::ClientError;
use crate::gateway::TodoGateway;

/// User intent
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// The view appeared; loads the list the first time
    Mount,
    /// The view went away; later outcomes are discarded
    Unmount,
    SetDraft(String),
    SubmitCreate,
    Toggle(TodoId),
    Delete(TodoId),
    SetFilter(Filter),
}

/// A gateway call requested by a state transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    List,
    Create { title: String },
    Update { id: TodoId, patch: TodoPatch },
    Delete { id: TodoId },
}

/// Result of running an [`Effect`]
#[derive(Debug, Clone)]
pub enum Outcome {
    Listed(Result<Vec<Todo>, ClientError>),
    Created(Result<Todo, ClientError>),
    Updated {
        id: TodoId,
        result: Result<Todo, ClientError>,
    },
    Deleted {
        id: TodoId,
        result: Result<(), ClientError>,
    },
}

/// Everything the list view shows
#[derive(Debug, Clone)]
pub struct TodoState {
    initial_loading: bool,
    items: Vec<Todo>,
    busy_id: Option<TodoId>,
    is_creating: bool,
    filter: Filter,
    error_message: Option<String>,
    draft: String,
    mounted: bool,
    list_requested: bool,
}

impl Default for TodoState {
    fn default() -> Self {
        Self::new()
    }
}

impl TodoState {
    pub fn new() -> Self {
        Self {
            initial_loading: true,
            items: Vec::new(),
            busy_id: None,
            is_creating: false,
            filter: Filter::All,
            error_message: None,
            draft: String::new(),
            mounted: false,
            list_requested: false,
        }
    }

    /// Transition on a command, returning the gateway call to make, if any
    pub fn dispatch(&mut self, command: Command) -> Option<Effect> {
        match command {
            Command::Mount => {
                self.mounted = true;
                if self.list_requested {
                    return None;
                }
                self.list_requested = true;
                self.error_message = None;
                Some(Effect::List)
            }
            Command::Unmount => {
                self.mounted = false;
                None
            }
            Command::SetDraft(draft) => {
                self.draft = draft;
                None
            }
            Command::SetFilter(filter) => {
                self.filter = filter;
                None
            }
            Command::SubmitCreate => {
                let title = self.draft.trim();
                if title.is_empty() || self.initial_loading || self.is_mutating() {
                    return None;
                }
                let title = title.to_string();
                self.is_creating = true;
                self.error_message = None;
                Some(Effect::Create { title })
            }
            Command::Toggle(id) => {
                if self.is_mutating() {
                    debug!(id = %id, "toggle ignored, mutation in flight");
                    return None;
                }
                let completed = self.items.iter().find(|t| t.id == id)?.completed;
                self.busy_id = Some(id.clone());
                self.error_message = None;
                Some(Effect::Update {
                    id,
                    patch: TodoPatch::completed(!completed),
                })
            }
            Command::Delete(id) => {
                if self.is_mutating() {
                    debug!(id = %id, "delete ignored, mutation in flight");
                    return None;
                }
                if !self.items.iter().any(|t| t.id == id) {
                    return None;
                }
                self.busy_id = Some(id.clone());
                self.error_message = None;
                Some(Effect::Delete { id })
            }
        }
    }

    /// Transition on the result of an effect
    pub fn apply(&mut self, outcome: Outcome) {
        // Busy flags are released on every path, including a discarded outcome
        match &outcome {
            Outcome::Listed(_) => self.initial_loading = false,
            Outcome::Created(_) => self.is_creating = false,
            Outcome::Updated { .. } | Outcome::Deleted { .. } => self.busy_id = None,
        }

        if !self.mounted {
            debug!("discarding outcome for unmounted view");
            return;
        }

        match outcome {
            Outcome::Listed(Ok(items)) => self.items = items,
            Outcome::Created(Ok(todo)) => {
                self.items.insert(0, todo);
                self.draft.clear();
            }
            Outcome::Updated { id, result: Ok(todo) } => {
                if let Some(slot) = self.items.iter_mut().find(|t| t.id == id) {
                    *slot = todo;
                }
            }
            Outcome::Deleted { id, result: Ok(()) } => self.items.retain(|t| t.id != id),
            Outcome::Listed(Err(err))
            | Outcome::Created(Err(err))
            | Outcome::Updated { result: Err(err), .. }
            | Outcome::Deleted { result: Err(err), .. } => {
                self.error_message = Some(err.to_string());
            }
        }
    }

    pub fn is_initial_loading(&self) -> bool {
        self.initial_loading
    }

    pub fn items(&self) -> &[Todo] {
        &self.items
    }

    pub fn busy_id(&self) -> Option<&str> {
        self.busy_id.as_deref()
    }

    pub fn is_creating(&self) -> bool {
        self.is_creating
    }

    pub fn filter(&self) -> Filter {
        self.filter
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    /// A create or an item mutation is in flight
    pub fn is_mutating(&self) -> bool {
        self.is_creating || self.busy_id.is_some()
    }

    /// Whether submitting the current draft would start a create
    pub fn can_submit(&self) -> bool {
        !self.initial_loading && !self.is_mutating() && !self.draft.trim().is_empty()
    }

    /// Items passing the current filter, in list order
    pub fn visible(&self) -> Vec<&Todo> {
        self.items.iter().filter(|t| self.filter.matches(t)).collect()
    }

    /// Count of incomplete items, regardless of filter
    pub fn remaining(&self) -> usize {
        self.items.iter().filter(|t| !t.completed).count()
    }
}

/// Run one effect against the gateway; failures are captured in the outcome
pub async fn perform<G>(gateway: &G, effect: Effect) -> Outcome
where
    G: TodoGateway + ?Sized,
{
    match effect {
        Effect::List => Outcome::Listed(gateway.list().await),
        Effect::Create { title } => Outcome::Created(gateway.create(&title).await),
        Effect::Update { id, patch } => {
            let result = gateway.update(&id, &patch).await;
            Outcome::Updated { id, result }
        }
        Effect::Delete { id } => {
            let result = gateway.delete(&id).await;
            Outcome::Deleted { id, result }
        }
    }
}

/// Owns the list state and a gateway, running each command to completion
pub struct TodoController<G> {
    state: TodoState,
    gateway: G,
}

impl<G: TodoGateway> TodoController<G> {
    pub fn new(gateway: G) -> Self {
        Self {
            state: TodoState::new(),
            gateway,
        }
    }

    pub fn state(&self) -> &TodoState {
        &self.state
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Dispatch a command and, if it starts a request, apply the result
    pub async fn handle(&mut self, command: Command) {
        let Some(effect) = self.state.dispatch(command) else {
            return;
        };
        let outcome = perform(&self.gateway, effect).await;
        if let Some(err) = outcome_error(&outcome) {
            tracing::warn!(error = %err, "todo request failed");
        }
        self.state.apply(outcome);
    }
}

fn outcome_error(outcome: &Outcome) -> Option<&ClientError> {
    match outcome {
        Outcome::Listed(Err(err))
        | Outcome::Created(Err(err))
        | Outcome::Updated { result: Err(err), .. }
        | Outcome::Deleted { result: Err(err), .. } => Some(err),
        _ => None,
    }
}
