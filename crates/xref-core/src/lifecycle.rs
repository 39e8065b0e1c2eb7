//! Server lifecycle state.
//!
//! The LSP handshake moves the server through a fixed sequence of states.
//! Views may only be created once the sequence has reached
//! [`ServerState::Initialized`].

use std::sync::{Mutex, PoisonError};

use crate::error::{Result, XrefError};

/// Ordered lifecycle states of the language server.
///
/// The derive order is the lifecycle order, so `state < ServerState::Initialized`
/// reads as "the handshake has not finished yet".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum ServerState {
    #[default]
    Created,
    Initializing,
    Initialized,
    ShuttingDown,
}

impl ServerState {
    /// Returns true if `next` is a legal successor of `self`.
    ///
    /// States only move forward. `ShuttingDown` may be entered from any
    /// earlier state since a client can ask for shutdown at any time.
    pub fn can_advance_to(self, next: Self) -> bool {
        match next {
            Self::Created => false,
            Self::Initializing => self == Self::Created,
            Self::Initialized => self == Self::Initializing,
            Self::ShuttingDown => self != Self::ShuttingDown,
        }
    }
}

/// Lock-protected holder of the process-wide [`ServerState`].
///
/// Every access is a short read-then-release critical section. The lock is
/// never held across an await point or a call into another component.
///
/// # Examples
///
/// ```
/// use xref_core::{ServerState, StateGuard};
///
/// let guard = StateGuard::new();
/// assert_eq!(guard.current(), ServerState::Created);
///
/// guard.advance(ServerState::Initializing).unwrap();
/// guard.advance(ServerState::Initialized).unwrap();
/// assert!(guard.is_initialized());
/// ```
#[derive(Debug, Default)]
pub struct StateGuard {
    state: Mutex<ServerState>,
}

impl StateGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current state.
    pub fn current(&self) -> ServerState {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns true once the initialize handshake has completed.
    pub fn is_initialized(&self) -> bool {
        self.current() >= ServerState::Initialized
    }

    /// Moves to `next`, returning the previous state.
    pub fn advance(&self, next: ServerState) -> Result<ServerState> {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        let previous = *state;
        if !previous.can_advance_to(next) {
            return Err(XrefError::InvalidTransition {
                from: previous,
                to: next,
            });
        }
        *state = next;
        drop(state);

        tracing::debug!("server state {:?} -> {:?}", previous, next);
        Ok(previous)
    }
}
