//! Login command: one credential exchange end to end.

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};
use gatehouse_auth::credentials::Credentials;
use gatehouse_auth::exchange::{ExchangeState, LoginEffect};
use gatehouse_auth::flow::LoginFlow;
use gatehouse_auth::issuer::HttpTokenIssuer;
use gatehouse_auth::page::PageContext;
use gatehouse_auth::token;
use url::Url;

use crate::config::Config;
use crate::session::{SessionCache, StoredSession};

pub async fn run(
    config: &Config,
    console_url: Option<String>,
    username: Option<String>,
    next: Option<String>,
) -> Result<()> {
    let console_url = console_url
        .or_else(|| config.console_url.clone())
        .ok_or_else(|| {
            anyhow::anyhow!(
                "No console URL configured. Pass --console-url or set console_url in config.toml"
            )
        })?;

    let username = match username {
        Some(name) => name,
        None => prompt("Username: ")?,
    };
    if username.is_empty() {
        anyhow::bail!("Username cannot be empty");
    }
    let password = prompt("Password: ")?;
    if password.is_empty() {
        anyhow::bail!("Password cannot be empty");
    }

    let issuer = HttpTokenIssuer::new(&console_url, config.request_timeout())?;
    let page = page_for(&console_url, next.as_deref())?;
    let origin = page.origin();

    let (mut flow, mut events) = LoginFlow::new(issuer, page);

    tracing::debug!(%origin, "starting token exchange");
    println!("Signing in to {origin}...");
    flow.submit(Credentials::new(username, password));

    let event = events
        .recv()
        .await
        .context("Exchange ended without a resolution")?;
    let effects = flow.handle_event(event);

    if let ExchangeState::Error { message } = flow.state() {
        anyhow::bail!("{message}");
    }

    for effect in effects {
        match effect {
            LoginEffect::StoreToken { cookie } => {
                let masked = token::mask(&cookie.value);
                let session = StoredSession::new(&origin, cookie);
                SessionCache::store(&session)?;

                println!();
                println!("✓ Logged in to {origin} (token: {masked})");
                println!(
                    "  Session saved to: {}",
                    SessionCache::cache_path().display()
                );
            }
            LoginEffect::Navigate { destination } => {
                let target = full_destination(&origin, &destination)?;
                println!("  Continue at: {target}");

                // Best effort, skip in tests
                if std::env::var("GATEHOUSE_NO_BROWSER").is_err() {
                    let _ = open::that(target.as_str());
                }
            }
            LoginEffect::SpawnExchange { .. } => {}
        }
    }

    Ok(())
}

/// Builds the page context for the console origin with an optional `next`
/// query parameter, as if the login page had been opened with `?next=...`.
fn page_for(console_url: &str, next: Option<&str>) -> Result<PageContext> {
    let url = Url::parse(console_url)
        .with_context(|| format!("Invalid console URL: {console_url}"))?;
    let origin = url.origin().ascii_serialization();

    let query = match next {
        Some(next) => url::form_urlencoded::Serializer::new(String::new())
            .append_pair("next", next)
            .finish(),
        None => String::new(),
    };

    PageContext::new(&origin, query)
}

/// Resolves the guarded destination against the console origin.
fn full_destination(origin: &str, destination: &str) -> Result<Url> {
    let base = Url::parse(origin).with_context(|| format!("Invalid origin: {origin}"))?;
    base.join(destination)
        .with_context(|| format!("Invalid destination: {destination}"))
}

fn prompt(label: &str) -> Result<String> {
    print!("{label}");
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().lock().read_line(&mut input)?;
    Ok(input.trim().to_string())
}
