//! Token exchange state machine.
//!
//! Reducer pattern: [`update`] consumes an event, transitions the exchange
//! state, and returns the side effects for the host to execute. Effects are
//! plain values, so the machine itself never touches the network, the cookie
//! store, or navigation.

use crate::cookie::TokenCookie;
use crate::credentials::Credentials;
use crate::page::PageContext;
use crate::redirect;
use crate::token::AuthToken;

/// Lifecycle of one login attempt.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ExchangeState {
    /// No attempt in progress.
    #[default]
    Idle,
    /// Credentials sent, waiting for the service to answer.
    Pending,
    /// Token issued. Terminal: navigation supersedes any further submission.
    Success { token: AuthToken },
    /// The service rejected the attempt; the user may retry.
    Error { message: String },
}

impl ExchangeState {
    /// Whether an exchange is currently in flight.
    pub fn is_pending(&self) -> bool {
        matches!(self, ExchangeState::Pending)
    }
}

/// Events driving the exchange state machine.
#[derive(Debug, Clone)]
pub enum LoginEvent {
    /// The user submitted the login form.
    SubmitRequested { credentials: Credentials },
    /// The token service answered with a token.
    ExchangeSucceeded { token: AuthToken },
    /// The token service rejected the attempt.
    ExchangeFailed { message: String },
}

/// Side effects for the host to execute, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginEffect {
    /// Start the asynchronous token exchange.
    SpawnExchange { credentials: Credentials },
    /// Persist the issued token as the session cookie.
    StoreToken { cookie: TokenCookie },
    /// Replace-navigate to the destination, so the login page cannot be
    /// returned to via back-navigation.
    Navigate { destination: String },
}

/// Main exchange state machine update function.
///
/// A new submission is accepted only from `Idle` or `Error` (any prior error
/// is cleared); a submit while `Pending` is a no-op, so exactly one exchange
/// is ever in flight. Resolutions arriving in any other state than `Pending`
/// are stale (host teardown, duplicate delivery) and are discarded.
pub fn update(
    state: &mut ExchangeState,
    page: &PageContext,
    event: LoginEvent,
) -> Vec<LoginEffect> {
    match event {
        LoginEvent::SubmitRequested { credentials } => match state {
            ExchangeState::Pending => {
                tracing::debug!("submit ignored: exchange already in flight");
                vec![]
            }
            ExchangeState::Success { .. } => {
                tracing::debug!("submit ignored: token already issued");
                vec![]
            }
            ExchangeState::Idle | ExchangeState::Error { .. } => {
                *state = ExchangeState::Pending;
                vec![LoginEffect::SpawnExchange { credentials }]
            }
        },
        LoginEvent::ExchangeSucceeded { token } => {
            if !state.is_pending() {
                tracing::debug!("stale exchange success discarded");
                return vec![];
            }

            let origin = page.origin();
            let destination =
                redirect::resolve_destination(page.intended_destination().as_deref(), &origin);
            let cookie = TokenCookie::session(&token, page);

            // State reflects success before the host sees any effect, so a
            // rapid second submit can never start a second exchange.
            *state = ExchangeState::Success { token };
            vec![
                LoginEffect::StoreToken { cookie },
                LoginEffect::Navigate { destination },
            ]
        }
        LoginEvent::ExchangeFailed { message } => {
            if !state.is_pending() {
                tracing::debug!("stale exchange failure discarded");
                return vec![];
            }
            *state = ExchangeState::Error { message };
            vec![]
        }
    }
}
