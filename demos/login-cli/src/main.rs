//! Minimal command-line client for the DailyOps auth core.
//!
//! ```text
//! login-cli <username> <password>   sign in (restores a stored session first)
//! login-cli --status                show the stored session, if any
//! login-cli --logout                sign out and clear the stored session
//! ```
//!
//! Environment:
//! - `DAILYOPS_API_URL`      base URL of the auth service
//!   (default: http://localhost:8001/api/v1)
//! - `DAILYOPS_SESSION_FILE` where the session record is persisted
//!   (default: dailyops-session.json)
//!
//! With the service down, the offline accounts from the local credential
//! table still work — try `login-cli admin.general admin2024`.

use dailyops::prelude::*;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let base_url = std::env::var("DAILYOPS_API_URL")
        .unwrap_or_else(|_| "http://localhost:8001/api/v1".to_string());
    let session_file = std::env::var("DAILYOPS_SESSION_FILE")
        .unwrap_or_else(|_| "dailyops-session.json".to_string());

    let manager = AuthManager::new(
        FallbackBackend::new(base_url),
        FileStore::new(session_file),
    );

    let args: Vec<String> = std::env::args().skip(1).collect();
    let code = match args.as_slice() {
        [flag] if flag == "--logout" => logout(&manager).await,
        [flag] if flag == "--status" => status(&manager).await,
        [username, password] => sign_in(&manager, username, password).await,
        _ => {
            eprintln!("usage: login-cli <username> <password> | --status | --logout");
            2
        }
    };
    std::process::exit(code);
}

async fn sign_in<B, S>(
    manager: &AuthManager<B, S>,
    username: &str,
    password: &str,
) -> i32
where
    B: CredentialBackend,
    S: SessionStore,
{
    if manager.bootstrap().await {
        if let Some(user) = manager.current_user().await {
            println!("restored session for {}", user.full_name);
        }
    } else {
        match manager.login(username, password).await {
            Ok(user) => {
                println!("signed in as {} ({})", user.full_name, user.role);
            }
            Err(e) => {
                eprintln!("login failed: {e}");
                return 1;
            }
        }
    }

    print_session(manager).await;
    if manager.has_admin_access().await {
        println!("admin panel: available");
    } else {
        println!("admin panel: not available");
    }
    0
}

async fn status<B, S>(manager: &AuthManager<B, S>) -> i32
where
    B: CredentialBackend,
    S: SessionStore,
{
    if manager.bootstrap().await {
        if let Some(user) = manager.current_user().await {
            println!("signed in as {} ({})", user.full_name, user.role);
        }
        print_session(manager).await;
        0
    } else {
        println!("no active session");
        1
    }
}

async fn logout<B, S>(manager: &AuthManager<B, S>) -> i32
where
    B: CredentialBackend,
    S: SessionStore,
{
    match manager.logout().await {
        Ok(()) => {
            println!("signed out");
            0
        }
        Err(e) => {
            eprintln!("logout failed locally: {e}");
            1
        }
    }
}

async fn print_session<B, S>(manager: &AuthManager<B, S>)
where
    B: CredentialBackend,
    S: SessionStore,
{
    if let Some(info) = manager.session_info().await {
        let minutes = info.time_left.as_secs() / 60;
        println!("session expires in {minutes} minutes");
    }
}
