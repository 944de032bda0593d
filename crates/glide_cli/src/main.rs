//! Glide CLI
//!
//! Inspect deceleration curves and simulate momentum glides frame by frame.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use glide_core::Vec2;
use glide_scroll::{DecelerationRate, DecelerationRequest};
use tracing_subscriber::EnvFilter;

mod config;
mod simulate;

use config::GlideConfig;

#[derive(Parser)]
#[command(name = "glide")]
#[command(author, version, about = "Glide momentum scrolling toolkit", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file (defaults to ./glide.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the duration and resting point of a release
    Curve(ReleaseArgs),

    /// Play a release against a virtual scroll view, one line per frame
    Simulate(SimulateArgs),

    /// Print the effective configuration as TOML
    Config,
}

#[derive(Args, Debug, Clone)]
struct ReleaseArgs {
    /// Vertical release velocity (negative = toward the top)
    #[arg(long, allow_negative_numbers = true)]
    velocity_y: f64,

    /// Horizontal release velocity
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    velocity_x: f64,

    /// Deceleration rate (normal, fast)
    #[arg(long, default_value_t = DecelerationRate::Normal)]
    rate: DecelerationRate,

    /// Vertical content offset at release
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    offset: f64,
}

impl ReleaseArgs {
    fn request(&self) -> DecelerationRequest {
        DecelerationRequest::new(Vec2::new(self.velocity_x, self.velocity_y), self.rate)
    }
}

#[derive(Args, Debug, Clone)]
struct SimulateArgs {
    #[command(flatten)]
    release: ReleaseArgs,

    /// Display refresh rate (overrides config)
    #[arg(long)]
    fps: Option<u32>,

    /// Put a finger down this many seconds into the glide
    #[arg(long)]
    interrupt_after: Option<f64>,

    /// Emit JSON lines instead of a table
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = GlideConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Curve(args) => cmd_curve(&args, &config),
        Commands::Simulate(args) => cmd_simulate(&args, &config),
        Commands::Config => {
            print!("{}", config.to_toml()?);
            Ok(())
        }
    }
}

fn cmd_curve(args: &ReleaseArgs, config: &GlideConfig) -> Result<()> {
    let summary = simulate::summarize_curve(args.request(), args.offset, &config.deceleration);

    println!("rate:            {} ({})", args.rate, summary.decay_rate);
    println!(
        "scaled velocity: ({:.3}, {:.3})",
        summary.scaled_velocity.x, summary.scaled_velocity.y
    );
    println!("duration:        {:.4}s", summary.duration_secs);
    println!(
        "rest position:   ({:.3}, {:.3}) before clamping",
        summary.stop_position.x, summary.stop_position.y
    );
    Ok(())
}

fn cmd_simulate(args: &SimulateArgs, config: &GlideConfig) -> Result<()> {
    let mut simulation = config.simulation;
    if let Some(fps) = args.fps {
        simulation.fps = fps;
    }

    tracing::info!(
        "Simulating release velocity_y={} rate={} from offset {} at {} fps",
        args.release.velocity_y,
        args.release.rate,
        args.release.offset,
        simulation.fps
    );

    let report = simulate::simulate(
        args.release.request(),
        args.release.offset,
        args.interrupt_after,
        &config.deceleration,
        &simulation,
    )?;

    if args.json {
        for frame in &report.frames {
            println!(
                "{}",
                serde_json::to_string(frame).context("Failed to serialize frame")?
            );
        }
    } else {
        println!("{:>6}  {:>9}  {:>12}", "frame", "time", "offset_y");
        for frame in &report.frames {
            println!(
                "{:>6}  {:>8.3}s  {:>12.3}",
                frame.frame, frame.time_secs, frame.offset.y
            );
        }
    }

    match report.interrupted_at {
        Some(frame) => tracing::info!(
            "Interrupted at frame {}, offset_y={:.3}",
            frame,
            report.final_offset.y
        ),
        None => tracing::info!(
            "Came to rest after {} frames, offset_y={:.3}",
            report.frames.len(),
            report.final_offset.y
        ),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_release_values_parse() {
        let cli = Cli::try_parse_from([
            "glide",
            "curve",
            "--velocity-y",
            "-3",
            "--velocity-x",
            "-1.5",
            "--offset",
            "-5",
        ])
        .unwrap();

        let Commands::Curve(args) = cli.command else {
            panic!("expected curve subcommand");
        };
        assert_eq!(args.velocity_y, -3.0);
        assert_eq!(args.velocity_x, -1.5);
        assert_eq!(args.offset, -5.0);
    }

    #[test]
    fn test_simulate_accepts_negative_offset() {
        let cli = Cli::try_parse_from(["glide", "simulate", "--velocity-y", "2", "--offset=-40"])
            .unwrap();

        let Commands::Simulate(args) = cli.command else {
            panic!("expected simulate subcommand");
        };
        assert_eq!(args.release.offset, -40.0);
        assert_eq!(args.release.rate, DecelerationRate::Normal);
    }
}
