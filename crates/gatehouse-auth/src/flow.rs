//! Login flow driver.
//!
//! Owns the exchange state and the token issuer. [`LoginFlow::submit`] runs
//! the reducer and spawns the issuer call; the resolution arrives back
//! through the event inbox as a [`LoginEvent`], which the host feeds to
//! [`LoginFlow::handle_event`]. All state transitions happen on the host's
//! thread, so the pending guard and the effect ordering hold without locks.

use std::sync::Arc;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::credentials::Credentials;
use crate::exchange::{self, ExchangeState, LoginEffect, LoginEvent};
use crate::issuer::TokenIssuer;
use crate::page::PageContext;

/// Stateful controller for one login attempt.
pub struct LoginFlow<I> {
    state: ExchangeState,
    page: PageContext,
    issuer: Arc<I>,
    events_tx: UnboundedSender<LoginEvent>,
}

impl<I: TokenIssuer + Send + Sync + 'static> LoginFlow<I> {
    /// Creates a flow and the inbox receiver the host drains for
    /// resolution events.
    pub fn new(issuer: I, page: PageContext) -> (Self, UnboundedReceiver<LoginEvent>) {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        (
            Self {
                state: ExchangeState::Idle,
                page,
                issuer: Arc::new(issuer),
                events_tx,
            },
            events_rx,
        )
    }

    /// Current lifecycle state, e.g. to disable a submit control while
    /// an exchange is pending.
    pub fn state(&self) -> &ExchangeState {
        &self.state
    }

    /// The page this flow authenticates for.
    pub fn page(&self) -> &PageContext {
        &self.page
    }

    /// Submits credentials for exchange.
    ///
    /// No-op while an exchange is pending or after success. The spawn
    /// effect is consumed here; any remaining effects are returned for the
    /// host to execute.
    pub fn submit(&mut self, credentials: Credentials) -> Vec<LoginEffect> {
        let effects = exchange::update(
            &mut self.state,
            &self.page,
            LoginEvent::SubmitRequested { credentials },
        );
        self.run(effects)
    }

    /// Applies a resolution event from the inbox and returns the effects
    /// the host must execute.
    pub fn handle_event(&mut self, event: LoginEvent) -> Vec<LoginEffect> {
        let effects = exchange::update(&mut self.state, &self.page, event);
        self.run(effects)
    }

    fn run(&self, effects: Vec<LoginEffect>) -> Vec<LoginEffect> {
        effects
            .into_iter()
            .filter_map(|effect| match effect {
                LoginEffect::SpawnExchange { credentials } => {
                    self.spawn_exchange(credentials);
                    None
                }
                other => Some(other),
            })
            .collect()
    }

    fn spawn_exchange(&self, credentials: Credentials) {
        let issuer = Arc::clone(&self.issuer);
        let events_tx = self.events_tx.clone();
        tokio::spawn(async move {
            let event = match issuer.create_token(credentials).await {
                Ok(token) => LoginEvent::ExchangeSucceeded { token },
                Err(err) => LoginEvent::ExchangeFailed {
                    message: format!("{err:#}"),
                },
            };
            // The receiver is gone when the host tore down mid-flight; the
            // resolution is discarded.
            if events_tx.send(event).is_err() {
                tracing::debug!("exchange resolved after flow teardown");
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use anyhow::Result;

    use super::*;
    use crate::token::AuthToken;

    #[derive(Clone, Copy)]
    enum StubOutcome {
        Succeed,
        Fail,
        Hang,
    }

    struct StubIssuer {
        calls: Arc<AtomicUsize>,
        outcome: StubOutcome,
    }

    impl StubIssuer {
        fn new(outcome: StubOutcome) -> (Self, Arc<AtomicUsize>) {
            let calls = Arc::new(AtomicUsize::new(0));
            (
                Self {
                    calls: Arc::clone(&calls),
                    outcome,
                },
                calls,
            )
        }
    }

    impl TokenIssuer for StubIssuer {
        async fn create_token(&self, _credentials: Credentials) -> Result<AuthToken> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.outcome {
                StubOutcome::Succeed => Ok(AuthToken::new("tok-long-token-value-here")),
                StubOutcome::Fail => anyhow::bail!("Invalid credentials"),
                StubOutcome::Hang => std::future::pending::<Result<AuthToken>>().await,
            }
        }
    }

    fn page(query: &str) -> PageContext {
        PageContext::new("https://app.example", query).unwrap()
    }

    /// Test: two rapid submits invoke the issuer exactly once.
    #[tokio::test(flavor = "multi_thread")]
    async fn test_double_submit_single_exchange() {
        let (issuer, calls) = StubIssuer::new(StubOutcome::Hang);
        let (mut flow, _events) = LoginFlow::new(issuer, page(""));

        let first = flow.submit(Credentials::new("admin", "hunter2"));
        assert!(first.is_empty());
        tokio::time::sleep(Duration::from_millis(20)).await;

        let second = flow.submit(Credentials::new("admin", "hunter2"));
        assert!(second.is_empty());
        tokio::time::sleep(Duration::from_millis(20)).await;

        assert!(flow.state().is_pending());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    /// Test: a successful exchange yields exactly one cookie write and one
    /// navigation, using the guarded destination.
    #[tokio::test(flavor = "multi_thread")]
    async fn test_success_stores_and_navigates() {
        let (issuer, calls) = StubIssuer::new(StubOutcome::Succeed);
        let (mut flow, mut events) = LoginFlow::new(issuer, page("next=/dashboard"));

        flow.submit(Credentials::new("admin", "hunter2"));
        let event = events.recv().await.expect("exchange resolution");
        let effects = flow.handle_event(event);

        assert!(matches!(flow.state(), ExchangeState::Success { .. }));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(effects.len(), 2);

        let LoginEffect::StoreToken { cookie } = &effects[0] else {
            panic!("expected StoreToken first, got {:?}", effects[0]);
        };
        assert_eq!(cookie.value, "tok-long-token-value-here");
        assert!(cookie.secure);

        let LoginEffect::Navigate { destination } = &effects[1] else {
            panic!("expected Navigate second, got {:?}", effects[1]);
        };
        assert_eq!(destination, "/dashboard");
    }

    /// Test: a failed exchange surfaces the error state with no cookie
    /// write and no navigation.
    #[tokio::test(flavor = "multi_thread")]
    async fn test_failure_surfaces_error() {
        let (issuer, _calls) = StubIssuer::new(StubOutcome::Fail);
        let (mut flow, mut events) = LoginFlow::new(issuer, page("next=/dashboard"));

        flow.submit(Credentials::new("admin", "wrong"));
        let event = events.recv().await.expect("exchange resolution");
        let effects = flow.handle_event(event);

        assert!(effects.is_empty());
        let ExchangeState::Error { message } = flow.state() else {
            panic!("expected error state, got {:?}", flow.state());
        };
        assert!(message.contains("Invalid credentials"));
    }

    /// Test: resubmission after a failure runs a second exchange.
    #[tokio::test(flavor = "multi_thread")]
    async fn test_retry_after_failure() {
        let (issuer, calls) = StubIssuer::new(StubOutcome::Fail);
        let (mut flow, mut events) = LoginFlow::new(issuer, page(""));

        flow.submit(Credentials::new("admin", "wrong"));
        let event = events.recv().await.expect("exchange resolution");
        flow.handle_event(event);
        assert!(matches!(flow.state(), ExchangeState::Error { .. }));

        flow.submit(Credentials::new("admin", "wrong-again"));
        assert!(flow.state().is_pending());
        let event = events.recv().await.expect("exchange resolution");
        flow.handle_event(event);

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    /// Test: no further exchange starts after success.
    #[tokio::test(flavor = "multi_thread")]
    async fn test_submit_after_success_is_ignored() {
        let (issuer, calls) = StubIssuer::new(StubOutcome::Succeed);
        let (mut flow, mut events) = LoginFlow::new(issuer, page(""));

        flow.submit(Credentials::new("admin", "hunter2"));
        let event = events.recv().await.expect("exchange resolution");
        flow.handle_event(event);

        let effects = flow.submit(Credentials::new("admin", "hunter2"));
        assert!(effects.is_empty());
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
