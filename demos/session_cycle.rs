//! Walks one user session through several evaluation cycles against an
//! in-memory client jar.
//!
//! Run with `RUST_LOG=cookiesync=debug` to see the round-trips.

use cookiesync::base::cookieerror::Result;
use cookiesync::client::DocumentJar;
use cookiesync::cookies::config::EncryptedStoreConfig;
use cookiesync::cookies::encrypted::EncryptedCookieStore;
use cookiesync::cookies::session::SessionState;
use tracing_subscriber::EnvFilter;

async fn cycle(jar: &DocumentJar, session: &SessionState, round: u32) -> Result<()> {
    let config = EncryptedStoreConfig::from_env()
        .unwrap_or_else(|| EncryptedStoreConfig::new("demo password"))
        .with_iterations(10_000);
    let cookies = EncryptedCookieStore::connect(jar, session, config).await?;

    if !cookies.ready() {
        println!("cycle {}: client has not reported yet", round);
        return Ok(());
    }

    let visits = cookies
        .get("visits")?
        .and_then(|v| v.parse::<u32>().ok())
        .unwrap_or(0);
    println!("cycle {}: visits = {}, store = {:?}", round, visits, cookies);

    cookies.set("visits", &(visits + 1).to_string())?;
    if round == 3 {
        cookies.delete("visits")?;
    }
    cookies.save().await
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let jar = DocumentJar::unmounted();
    let session = SessionState::new();

    for round in 0..5 {
        cycle(&jar, &session, round).await?;
    }

    println!("document.cookie = {:?}", jar.document_cookie());
    Ok(())
}
