use std::{env, sync::Arc};

use env_logger::Env;
use log::info;
use tokio::{net::TcpListener, signal};

use crate::{
    content::{Content, ContentProvider},
    contact::Relay,
    error::SiteError,
    state::AppState,
};

mod calendar;
mod cli;
mod contact;
mod content;
mod error;
mod pages;
mod render;
mod routes;
mod state;

fn setup_logging() {
    env_logger::Builder::from_env(
        Env::default().default_filter_or("skfiles_site=info,skfiles_calendar=info"),
    )
    .init();
}

async fn shutdown() {
    if signal::ctrl_c().await.is_ok() {
        info!("Shutting down");
    }
}

#[tokio::main]
async fn main() -> Result<(), SiteError> {
    let args = cli::parse(env::args().skip(1).collect());

    setup_logging();

    let content = match &args.content {
        Some(path) => Content::from_json_file(path)?,
        None => Content::sample()?,
    };
    info!(
        "Loaded {} posts and {} events",
        content.posts().len(),
        content.seed_events().len()
    );

    let relay = Relay::new(args.relay)?;
    info!("Relaying contact messages to {}", relay.endpoint());

    let state = AppState::new(
        Arc::new(content),
        relay,
        args.calendar_mode,
        args.week_start,
    );

    let listener = TcpListener::bind(args.address).await?;
    info!("Listening at http://{}", args.address);

    axum::serve(listener, routes::router(state))
        .with_graceful_shutdown(shutdown())
        .await?;

    Ok(())
}
