use anyhow::Context;
use fitclub::gateway::{HttpGateway, Records};
use fitclub::session::Session;
use fitclub::vm::BlogFeed;
use fitclub::Config;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Minimal console front end: sign in with credentials from the environment
/// and dump the community feed. Exists to exercise the wiring end to end;
/// real presentation lives elsewhere.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env().map_err(anyhow::Error::msg)?;
    info!(env = %config.app.env, gateway = %config.gateway.base_url, "starting");

    let store = HttpGateway::new(&config.gateway).context("building gateway")?;
    let records = Records::new(Arc::new(store));
    let session = Arc::new(Session::new());

    let username = std::env::var("FITCLUB_USERNAME").context("FITCLUB_USERNAME not set")?;
    let password = std::env::var("FITCLUB_PASSWORD").context("FITCLUB_PASSWORD not set")?;

    let user = session
        .login(&records, &username, &password)
        .await
        .context("login failed")?;
    println!("signed in as {} ({:?})", user.display_name, user.role);

    let mut feed = BlogFeed::new(session.clone(), records.clone());
    feed.load().await;
    feed.sync_comments().await.context("comment sync failed")?;

    match feed.state().ready() {
        Some(posts) => {
            for view in posts {
                println!(
                    "[{}] {}: {}",
                    view.post.created_at.format("%Y-%m-%d %H:%M"),
                    view.author,
                    view.post.content
                );
                for comment in &view.comments {
                    println!("    {}: {}", comment.author, comment.text);
                }
            }
        }
        None => {
            if let Some(message) = feed.state().error() {
                println!("feed unavailable: {message}");
            }
        }
    }

    session.logout();
    Ok(())
}
