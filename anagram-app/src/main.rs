mod app_dir;
mod cli;
mod preferences;
mod script;
mod session;
mod status;

use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing::{error, info};

use anagram_core::{BoundaryMasks, Side};
use anagram_files::read_permutation;

use cli::{CliArgs, CliCommand};
use preferences::EditorPreferences;
use script::Script;
use session::Session;

fn main() -> ExitCode {
    let args = CliArgs::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    info!("Starting Visual Anagram");

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: CliArgs) -> anyhow::Result<()> {
    let prefs_path = args.prefs.unwrap_or_else(preferences::default_path);
    let mut prefs = EditorPreferences::load_from(&prefs_path);

    match args.command {
        CliCommand::Run { script } => {
            let script = Script::load(&script)?;
            let mut session = Session::new(prefs.clone());
            for line in session.run_script(&script)? {
                println!("{line}");
            }
            if let Some(path) = session.permutation_path() {
                prefs.last_permutation = Some(path.to_path_buf());
                prefs.save_to(&prefs_path);
            }
        }
        CliCommand::Inspect { permutation } => {
            let permutation = prefs
                .permutation_or_last(permutation)
                .context("no permutation given and none remembered from an earlier run")?;
            let perm = read_permutation(&permutation)
                .with_context(|| format!("loading {}", permutation.display()))?;
            let masks = BoundaryMasks::compute(&perm);
            println!("file: {}", permutation.display());
            println!("side: {}", perm.side());
            println!("pixels: {}", perm.len());
            println!("boundary pixels (A): {}", masks.flagged_count());
        }
        CliCommand::Map {
            permutation,
            side,
            y,
            x,
        } => {
            let perm = read_permutation(&permutation)
                .with_context(|| format!("loading {}", permutation.display()))?;
            let from = Side::from(side);
            let n = perm.side();
            let (my, mx) = perm
                .map(from, y, x)
                .with_context(|| format!("({y},{x}) is outside the {n}×{n} canvas"))?;
            println!("{}({y},{x}) -> {}({my},{mx})", from.label(), from.other().label());
        }
    }
    Ok(())
}
