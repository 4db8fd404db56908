//! Command-line entry point.

use clap::{Parser, Subcommand};
use kurbo::Size;
use overdraw_app::{check_records, files, plan_summary, valid_records, AppResult, PlanRequest};
use overdraw_render::ReplayConfig;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "overdraw", about = "Inspect and replay Overdraw stroke files")]
struct Cli {
    /// Replay settings as JSON; unset fields keep their defaults.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the replay plan summary for a drawing.
    Plan {
        file: PathBuf,
        /// Paper width the drawing was authored at.
        #[arg(long, default_value_t = 400.0)]
        paper_width: f64,
        #[arg(long, default_value_t = 800.0)]
        width: f64,
        #[arg(long, default_value_t = 800.0)]
        height: f64,
        #[arg(long)]
        auto_center: bool,
        /// Sample the reveal animation this many milliseconds in.
        #[arg(long)]
        elapsed_ms: Option<u64>,
    },
    /// Report which strokes in a drawing would be skipped on replay.
    Check { file: PathBuf },
    /// Write a copy of a drawing without the strokes a replay would skip.
    Clean {
        file: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
    },
}

fn main() -> ExitCode {
    env_logger::init();
    log::info!("Starting Overdraw");

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> AppResult<()> {
    let config = match &cli.config {
        Some(path) => files::read_replay_config(path)?,
        None => ReplayConfig::default(),
    };

    match cli.command {
        Command::Plan {
            file,
            paper_width,
            width,
            height,
            auto_center,
            elapsed_ms,
        } => {
            let json = files::read_drawing(&file)?;
            let request = PlanRequest {
                paper_width,
                viewport: Size::new(width, height),
                auto_center,
                elapsed: elapsed_ms.map(Duration::from_millis),
            };
            let summary = plan_summary(&json, &request, config);
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        Command::Check { file } => {
            let records = files::read_records(&file)?;
            let report = check_records(&records);
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Command::Clean { file, output } => {
            let records = files::read_records(&file)?;
            let kept = valid_records(&records);
            log::info!(
                "Keeping {} of {} strokes, writing {}",
                kept.len(),
                records.len(),
                output.display()
            );
            files::write_records(&output, &kept)?;
        }
    }
    Ok(())
}
