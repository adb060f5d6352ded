use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use kino_core::engine::HeadlessEngine;
use kino_model::PlaybackState;
use kino_player::app::App;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn data_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("kino")
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let path = std::env::args().nth(1).map(PathBuf::from);

    let engine = Arc::new(HeadlessEngine::new());
    let app = App::new(engine.clone(), data_dir());

    // initialize() publishes Closed from the event pump; wait for it so the
    // toggle command sees a settled state.
    let mut state_rx = app.playback.state();
    tokio::time::timeout(Duration::from_secs(5), async {
        while *state_rx.borrow_and_update() == PlaybackState::NotInitialized {
            if state_rx.changed().await.is_err() {
                break;
            }
        }
    })
    .await
    .context("engine did not come up")?;

    if let Some(path) = path {
        if !app.open_media.execute(&[path.clone()]).await {
            anyhow::bail!("could not open {}", path.display());
        }
    } else {
        info!("no media argument; idle until ctrl-c");
    }

    let mut position_rx = app.playback.position();
    let mut ticker = tokio::time::interval(Duration::from_secs(1));
    let mut was_playing = false;

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("interrupted");
                break;
            }
            _ = ticker.tick() => {
                // The headless engine only advances when driven.
                engine.tick(1);
            }
            changed = state_rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = *state_rx.borrow_and_update();
                info!(%state, "playback state");
                match state {
                    PlaybackState::Playing => was_playing = true,
                    PlaybackState::Stopped if was_playing => {
                        info!("playback finished");
                        break;
                    }
                    _ => {}
                }
            }
            changed = position_rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let position = *position_rx.borrow_and_update();
                info!(position, "position");
            }
        }
    }

    app.shutdown();
    Ok(())
}
