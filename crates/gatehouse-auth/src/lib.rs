//! Client-side login handshake for the admin console.
//!
//! Exchanges a username/password pair for a bearer token, persists the token
//! as the session cookie, and redirects to a validated destination. The
//! exchange lifecycle is a reducer over [`exchange::ExchangeState`]; side
//! effects are plain values executed by the host.

pub mod cookie;
pub mod credentials;
pub mod exchange;
pub mod flow;
pub mod issuer;
pub mod page;
pub mod redirect;
pub mod token;
