//! Shared user slice of application state
//!
//! An explicit container replaces ambient global state: views hold a
//! [`UserStore`] handle, dispatch [`UserAction`]s, and read snapshots.
//! Action application is serialized through the watch channel's internal
//! lock, so the reducer never observes torn state.

use hearth_model::User;
use log::debug;
use tokio::sync::watch;

/// The user slice: who is signed in, whether an operation is in flight, and
/// the last surfaced error.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserState {
    /// The signed-in user, if any
    pub current_user: Option<User>,
    /// True while the operation that set it is still in flight
    pub loading: bool,
    /// Last surfaced error text, rendered verbatim
    pub error: Option<String>,
}

/// Lifecycle actions for the three profile operations.
#[derive(Debug, Clone, PartialEq)]
pub enum UserAction {
    /// Profile update request issued
    UpdateStart,
    /// Profile update succeeded; carries the replacement user record
    UpdateSuccess(User),
    /// Profile update failed; carries the surfaced message
    UpdateFailure(String),
    /// Account deletion request issued
    DeleteStart,
    /// Account deletion succeeded
    DeleteSuccess,
    /// Account deletion failed
    DeleteFailure(String),
    /// Sign-out request issued
    SignOutStart,
    /// Sign-out succeeded
    SignOutSuccess,
    /// Sign-out failed
    SignOutFailure(String),
}

impl UserAction {
    /// Action name for logging.
    pub fn name(&self) -> &'static str {
        match self {
            UserAction::UpdateStart => "UpdateStart",
            UserAction::UpdateSuccess(_) => "UpdateSuccess",
            UserAction::UpdateFailure(_) => "UpdateFailure",
            UserAction::DeleteStart => "DeleteStart",
            UserAction::DeleteSuccess => "DeleteSuccess",
            UserAction::DeleteFailure(_) => "DeleteFailure",
            UserAction::SignOutStart => "SignOutStart",
            UserAction::SignOutSuccess => "SignOutSuccess",
            UserAction::SignOutFailure(_) => "SignOutFailure",
        }
    }
}

/// Pure reducer for the user slice.
pub fn reduce(state: &mut UserState, action: UserAction) {
    match action {
        UserAction::UpdateStart | UserAction::DeleteStart | UserAction::SignOutStart => {
            state.loading = true;
            state.error = None;
        }
        UserAction::UpdateSuccess(user) => {
            state.current_user = Some(user);
            state.loading = false;
            state.error = None;
        }
        UserAction::DeleteSuccess | UserAction::SignOutSuccess => {
            state.current_user = None;
            state.loading = false;
            state.error = None;
        }
        UserAction::UpdateFailure(message)
        | UserAction::DeleteFailure(message)
        | UserAction::SignOutFailure(message) => {
            state.loading = false;
            state.error = Some(message);
        }
    }
}

/// Cheap-to-clone handle on the shared user slice.
#[derive(Debug, Clone)]
pub struct UserStore {
    tx: watch::Sender<UserState>,
}

impl UserStore {
    /// Create a store seeded with the given state.
    pub fn new(initial: UserState) -> Self {
        let (tx, _) = watch::channel(initial);
        Self { tx }
    }

    /// Apply an action through the reducer and notify subscribers.
    pub fn dispatch(&self, action: UserAction) {
        debug!("Dispatching user action: {}", action.name());
        self.tx.send_modify(|state| reduce(state, action));
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> UserState {
        self.tx.borrow().clone()
    }

    /// Subscribe to state changes.
    pub fn subscribe(&self) -> watch::Receiver<UserState> {
        self.tx.subscribe()
    }
}

impl Default for UserStore {
    fn default() -> Self {
        Self::new(UserState::default())
    }
}
