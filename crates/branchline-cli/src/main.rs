//! Branchline replay tool entry point.

use std::io::Write;
use std::process::ExitCode;
use std::sync::Arc;

use branchline_cli::args::Args;
use branchline_cli::error::AppError;
use branchline_cli::replay::{ReplayPlan, replay, report};
use branchline_content::load_story;
use branchline_core::clock::SystemClock;
use branchline_core::rng::SeededRng;
use clap::Parser;
use tracing_subscriber::EnvFilter;

fn init_tracing(json: bool) {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn run(args: &Args) -> Result<(), AppError> {
    let loaded = load_story(&args.story)?;

    let mut rng = match args.seed {
        Some(seed) => SeededRng::from_seed(seed),
        None => SeededRng::from_entropy(),
    };
    let plan = ReplayPlan {
        path: args.path.clone(),
        undo: args.undo,
        config: args.game_config(),
    };

    let (game, events) = replay(
        loaded.definition,
        &plan,
        Arc::new(SystemClock),
        &mut rng,
    )?;
    let report = report(&game, &events, Some(loaded.version_hash));

    let mut stdout = std::io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, &report)?;
    writeln!(stdout).map_err(serde_json::Error::io)?;
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.json);

    tracing::info!(story = %args.story.display(), "Starting Branchline replay");

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(code = err.code(), "{err}");
            eprintln!("error: {err}");
            ExitCode::from(err.exit_code())
        }
    }
}
