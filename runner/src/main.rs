//! Namedraw Runner - terminal host for the namedraw engine.
//!
//! Loads a JSON roster, runs one draw with the configured strategy on a
//! cooperative tokio timer, renders each frame to the terminal and writes the
//! updated roster back once a name is drawn.

mod config;
mod error;
mod render;
mod roster;

use crate::config::Config;
use crate::error::Result;
use namedraw_engine::{
    AnyDrawer, CommandBuffer, DrawEvent, DrawEventKind, Drawer, NameRecord, NameStore,
    RecordStore, Step,
};
use std::io::Write;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "namedraw_runner=info,namedraw_engine=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;

    tracing::info!(
        roster = %config.roster_path.display(),
        strategy = %config.strategy,
        "Starting namedraw"
    );

    let mut store = NameStore::from_records(roster::load(&config.roster_path)?)?;
    let mut surface = CommandBuffer::new(config.viewport);
    let mut drawer = AnyDrawer::new(config.strategy, config.draw.clone())?;

    drawer.subscribe(
        DrawEventKind::Rejected,
        Box::new(|event: &DrawEvent| {
            if let DrawEvent::Rejected { reason } = event {
                eprintln!("Cannot draw: {reason}");
            }
        }),
    );

    if !drawer.start(&store, &mut surface)? {
        report(&store);
        return Ok(());
    }

    if let Some(record) = drive(&mut drawer, &mut store, &mut surface, &config).await? {
        println!();
        println!("Drawn: {}", record.name);
        roster::save(&config.roster_path, store.records())?;
    }

    report(&store);
    Ok(())
}

/// Step the drawer until it settles, sleeping between ticks and requesting a
/// stop on Ctrl-C or when the configured spin time runs out.
async fn drive(
    drawer: &mut AnyDrawer,
    store: &mut NameStore,
    surface: &mut CommandBuffer,
    config: &Config,
) -> Result<Option<NameRecord>> {
    let stop_timer = tokio::time::sleep(config.run_spin.unwrap_or(Duration::ZERO));
    tokio::pin!(stop_timer);
    let mut stop_sent = false;

    loop {
        let step = drawer.step(store, surface)?;
        surface.drain();
        draw_frame(surface, config.draw.max_font_size);

        let delay_ms = match step {
            Step::Settled { record } => return Ok(Some(record)),
            Step::Idle => return Ok(None),
            Step::Continue { delay_ms } => delay_ms,
        };
        let delay = tokio::time::sleep(Duration::from_millis(delay_ms));
        tokio::pin!(delay);

        if stop_sent {
            delay.await;
            continue;
        }

        tokio::select! {
            _ = &mut delay => {}
            _ = &mut stop_timer, if config.run_spin.is_some() => {
                tracing::debug!("spin time elapsed, stopping");
                drawer.stop();
                stop_sent = true;
                delay.await;
            }
            signal = tokio::signal::ctrl_c() => {
                if let Err(e) = signal {
                    tracing::warn!(error = %e, "failed to listen for Ctrl-C");
                }
                tracing::debug!("interrupt received, stopping");
                drawer.stop();
                stop_sent = true;
                delay.await;
            }
        }
    }
}

fn draw_frame(surface: &CommandBuffer, max_font_size: u32) {
    let mut out = std::io::stdout().lock();
    // Best effort; a closed stdout should not abort the draw
    let _ = write!(out, "\r\x1b[2K{}", render::frame(surface, max_font_size));
    let _ = out.flush();
}

fn report(store: &NameStore) {
    let counts = store.counts();
    tracing::info!(
        not_drawn = counts.not_drawn,
        drawn = counts.drawn,
        deleted = counts.deleted,
        total = counts.total(),
        "Pool status"
    );
}
