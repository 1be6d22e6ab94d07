//! Session command handlers.

use anyhow::Result;
use gatehouse_auth::token;

use crate::session::SessionCache;

pub fn show() -> Result<()> {
    match SessionCache::load()? {
        Some(session) => {
            let cookie = &session.cookie;
            let secure = if cookie.secure { "; Secure" } else { "" };
            println!("Session for {}", session.origin);
            println!(
                "  Cookie: {}={}; Path={}{}",
                cookie.name,
                token::mask(&cookie.value),
                cookie.path,
                secure
            );
        }
        None => println!("No session cached."),
    }
    Ok(())
}

pub fn clear() -> Result<()> {
    let had_session = SessionCache::clear()?;

    if had_session {
        println!(
            "✓ Session removed from: {}",
            SessionCache::cache_path().display()
        );
    } else {
        println!("No session cached.");
    }

    Ok(())
}

pub fn path() -> Result<()> {
    println!("{}", SessionCache::cache_path().display());
    Ok(())
}
