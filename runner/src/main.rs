mod bot;
mod config;
mod observer;

use std::time::Duration;

use clap::Parser;
use snake_engine::{SessionRng, SnakeSession, log, logger};
use snake_scoreboard::format::format_duration;
use snake_scoreboard::{MemberId, ScoreRegistry, Submitter};

use bot::AutoPilot;
use config::RunnerConfig;
use observer::RunnerObserver;

#[derive(Parser)]
#[command(name = "snake_runner")]
struct Args {
    /// Optional YAML config file.
    #[arg(long)]
    config: Option<String>,

    /// Overrides the seed from the config.
    #[arg(long)]
    seed: Option<u64>,

    /// Overrides the number of autoplay runs from the config.
    #[arg(long)]
    runs: Option<u32>,

    #[arg(long)]
    use_log_prefix: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let prefix = if args.use_log_prefix {
        Some("Runner".to_string())
    } else {
        None
    };
    logger::init_logger(prefix);

    let mut config = RunnerConfig::load(args.config.as_deref())?;
    if let Some(seed) = args.seed {
        config.seed = Some(seed);
    }
    if let Some(runs) = args.runs {
        config.runs = runs;
    }
    config.validate()?;

    let rng = match config.seed {
        Some(seed) => SessionRng::new(seed),
        None => SessionRng::from_random(),
    };
    log!(
        "Autoplaying {} runs on a {}x{} grid (seed {})",
        config.runs,
        config.engine.grid_size,
        config.engine.grid_size,
        rng.seed()
    );

    let (observer, mut reports) = RunnerObserver::create();
    let session = SnakeSession::create(config.engine.clone(), rng, observer.clone()).await?;

    let mut registry = ScoreRegistry::new();
    let pilot = Submitter::Member {
        id: MemberId::new(1),
        nickname: "autopilot".to_string(),
    };

    // Steer at half the fastest tick rate so no tick window is missed.
    let poll = Duration::from_millis((config.engine.min_tick_interval_ms / 2).max(5));

    for run in 1..=config.runs {
        if run == 1 {
            session.start().await;
        } else {
            session.restart().await;
        }

        let report = loop {
            tokio::select! {
                maybe = reports.recv() => {
                    break maybe.expect("observer channel stays open");
                }
                _ = tokio::time::sleep(poll) => {
                    if let Some(snapshot) = observer.latest_snapshot()
                        && let Some(direction) = AutoPilot::choose(&snapshot, config.engine.grid_size)
                    {
                        session.change_direction(direction).await;
                    }
                }
            }
        };

        log!(
            "Run {} finished: score {}, length {}, time {}",
            run,
            report.score,
            report.length,
            format_duration(report.duration_ms)
        );

        match registry.submit(&report, pilot.clone()) {
            Ok(receipt) => {
                if let (Some(rank), Some(total)) = (receipt.rank, receipt.total_entries) {
                    let best = if receipt.is_personal_best {
                        " (personal best)"
                    } else {
                        ""
                    };
                    log!("Recorded as rank {}/{}{}", rank, total, best);
                }
            }
            Err(e) => log!("Submission rejected: {}", e),
        }
    }

    log!("Leaderboard:");
    for entry in registry.leaderboard(Some(10)) {
        log!(
            "#{} {} - score {}, length {}, best speed {} Hz, time {}",
            entry.rank,
            entry.nickname,
            entry.score,
            entry.length,
            entry.speed,
            entry.duration
        );
    }

    Ok(())
}
