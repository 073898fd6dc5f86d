//! Screen-facing view-state controllers.
//!
//! # Responsibility
//! - Hold form state and per-field validation for each screen concern.
//! - Drive repository calls through an `Idle/Loading/Success/Error` machine.
//! - Derive reactive views (search filtering) from fetch results and input.
//!
//! # Invariants
//! - Validation failures never reach a repository.
//! - Form submissions are ignored while the same action is `Loading`.
//! - Reloads are last-write-wins: a superseded call never publishes.
//! - `Error` always carries a non-empty, displayable message.

pub mod admin;
pub mod auth;
pub mod catalog;
pub mod detail;
pub mod form;
pub mod profile;

use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::watch;

/// Observable outcome of one logical action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestState<T> {
    /// Nothing submitted yet (write actions only).
    Idle,
    Loading,
    Success(T),
    Error(String),
}

impl<T> RequestState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn success(&self) -> Option<&T> {
        match self {
            Self::Success(value) => Some(value),
            _ => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Error(message) => Some(message.as_str()),
            _ => None,
        }
    }
}

/// Proof that a call was the latest one started for its action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Ticket(u64);

/// Watch-backed state cell with last-write-wins publishing.
///
/// The generation counter only changes inside the watch write lock, so the
/// staleness check and the publish are one step.
pub(crate) struct StateCell<T> {
    tx: watch::Sender<RequestState<T>>,
    generation: AtomicU64,
}

impl<T: Clone> StateCell<T> {
    pub(crate) fn new(initial: RequestState<T>) -> Self {
        let (tx, _) = watch::channel(initial);
        Self {
            tx,
            generation: AtomicU64::new(0),
        }
    }

    pub(crate) fn get(&self) -> RequestState<T> {
        self.tx.borrow().clone()
    }

    pub(crate) fn subscribe(&self) -> watch::Receiver<RequestState<T>> {
        self.tx.subscribe()
    }

    /// Moves to `Loading` and invalidates every earlier ticket.
    pub(crate) fn begin(&self) -> Ticket {
        let mut ticket = Ticket(0);
        self.tx.send_modify(|state| {
            ticket = Ticket(self.generation.fetch_add(1, Ordering::SeqCst) + 1);
            *state = RequestState::Loading;
        });
        ticket
    }

    /// Like `begin`, but refuses while a call is already in flight.
    pub(crate) fn try_begin(&self) -> Option<Ticket> {
        let mut ticket = None;
        self.tx.send_if_modified(|state| {
            if state.is_loading() {
                return false;
            }
            ticket = Some(Ticket(self.generation.fetch_add(1, Ordering::SeqCst) + 1));
            *state = RequestState::Loading;
            true
        });
        ticket
    }

    /// Publishes `next` unless a newer call has started since `ticket`.
    ///
    /// Returns whether the value was published.
    pub(crate) fn finish(&self, ticket: Ticket, next: RequestState<T>) -> bool {
        self.tx.send_if_modified(|state| {
            if self.generation.load(Ordering::SeqCst) != ticket.0 {
                return false;
            }
            *state = next;
            true
        })
    }
}
