use std::time::{Duration, Instant};

use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

use nullsec_sim::config::SimConfig;
use nullsec_sim::game::autopilot::Autopilot;
use nullsec_sim::game::events::GameEvent;
use nullsec_sim::game::game_loop::GameLoop;
use nullsec_sim::game::performance::FrameBudget;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    info!("Nullsec Sim v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config = SimConfig::load_or_default();
    if let Err(e) = config.validate() {
        error!("Invalid configuration: {}", e);
        anyhow::bail!(e);
    }
    info!(
        "Configuration loaded: {}Hz, seed={:?}, ship={}, autopilot={}",
        config.tick_rate, config.seed, config.start_ship, config.autopilot
    );

    let mut game = GameLoop::generate(config.world_options(), config.loop_config())?;
    {
        let state = game.state();
        info!(
            "Universe ready: {} systems, starting in {} ({:.1})",
            state.systems.len(),
            state.system().name,
            state.system().security
        );
    }

    // Shutdown signal handler
    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
        info!("Shutdown signal received");
    };

    let deadline = async {
        match config.run_seconds {
            Some(secs) => tokio::time::sleep(Duration::from_secs(secs)).await,
            None => std::future::pending::<()>().await,
        }
    };

    tokio::select! {
        _ = run(&mut game, &config) => {}
        _ = shutdown => {
            info!("Shutting down...");
        }
        _ = deadline => {
            info!("Run time elapsed");
        }
    }

    let state = game.state();
    info!(
        "Simulation stopped at tick {} in {} with {} credits",
        state.tick,
        state.system().name,
        state.player.credits
    );

    Ok(())
}

/// Drive the loop at the configured rate until cancelled
async fn run(game: &mut GameLoop, config: &SimConfig) {
    let mut ticker = interval(Duration::from_millis(config.tick_interval_ms()));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let mut budget = FrameBudget::new(config.tick_rate);
    let mut pilot = config.autopilot.then(Autopilot::new);
    let stats_every = config.stats_interval_secs * u64::from(config.tick_rate);
    let started = Instant::now();
    let mut last = Instant::now();

    loop {
        ticker.tick().await;
        let now = Instant::now();
        let elapsed_ms = now.duration_since(last).as_secs_f32() * 1000.0;
        last = now;

        budget.begin_frame();
        let events = game.advance_ms(elapsed_ms);
        if let Some(pilot) = pilot.as_mut() {
            pilot.step(game.state_mut());
        }
        budget.end_frame(game.state().entity_count());

        for event in &events {
            log_event(event);
        }

        if budget.frames() % stats_every.max(1) == 0 {
            let state = game.state();
            let ship = &state.player;
            let pilot_line = pilot
                .as_ref()
                .map(|p| {
                    let s = p.stats();
                    format!(" | Pilot: {:?}, {} trips, {} ore", p.phase(), s.trips, s.ore_sold)
                })
                .unwrap_or_default();
            info!(
                "Sim: {}s, tick {}, {} | Ship: {:.0}/{:.0}/{:.0}, {} cr{} | Frame: {}",
                started.elapsed().as_secs(),
                state.tick,
                state.system().name,
                ship.defense.shield,
                ship.defense.armor,
                ship.defense.hull,
                ship.credits,
                pilot_line,
                budget.summary()
            );
        }
    }
}

fn log_event(event: &GameEvent) {
    match event {
        GameEvent::PlayerDestroyed { .. }
        | GameEvent::AnomalyCompleted { .. }
        | GameEvent::GateJumped { .. } => info!(?event, "event"),
        _ => debug!(?event, "event"),
    }
}
