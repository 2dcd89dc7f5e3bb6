//! Bead Line entry point
//!
//! Native driver for the track engine. Replays a scripted list of inputs, or
//! plays seeded random inputs, checking every track invariant after each one.
//!
//! Usage:
//!   cargo run -- --seed 7 --steps 5000
//!   cargo run -- --script inputs.json --settings track.json

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use bead_line::beads::Direction;
use bead_line::{PartitionedTrack, TokenId, TrackInput, TrackSettings};

/// Drive the bead track with scripted or seeded random inputs
#[derive(Parser, Debug)]
#[command(name = "bead-line")]
#[command(about = "Bead track driver that checks every invariant after each input")]
struct Args {
    /// Track settings JSON (defaults when missing or invalid)
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Seed for autoplay
    #[arg(long, default_value_t = 1)]
    seed: u64,

    /// Number of autoplay steps
    #[arg(long, default_value_t = 1000)]
    steps: usize,

    /// JSON list of inputs to replay instead of autoplay
    #[arg(long)]
    script: Option<PathBuf>,
}

/// Pick a plausible next input for the current track
fn random_input(rng: &mut Pcg32, track: &PartitionedTrack) -> TrackInput {
    let pool = track.settings().pool_size;
    let active = track.active_tokens();

    if active.is_empty() || rng.random_bool(0.1) {
        let left = rng.random_range(0..=pool);
        let right = rng.random_range(0..=pool - left);
        return TrackInput::AddendCountsChanged { left, right };
    }

    let token = active[rng.random_range(0..active.len())].id;
    match rng.random_range(0..10) {
        0..=4 => {
            let range = track.settings().range();
            TrackInput::DragProposed {
                token,
                position: rng.random_range(range.min - 2.0..=range.max + 2.0),
            }
        }
        5 => TrackInput::DragReleased { token },
        6 => TrackInput::Home { token },
        7 => TrackInput::End { token },
        8 => TrackInput::KeyboardStep {
            token,
            direction: if rng.random_bool(0.5) {
                Direction::Left
            } else {
                Direction::Right
            },
        },
        _ if rng.random_bool(0.5) => TrackInput::Organize,
        _ => TrackInput::Reset,
    }
}

fn load_script(path: &PathBuf) -> Result<Vec<TrackInput>, String> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read script {}: {e}", path.display()))?;
    serde_json::from_str(&contents).map_err(|e| format!("invalid script {}: {e}", path.display()))
}

fn run(args: &Args) -> Result<PartitionedTrack, String> {
    let settings = match &args.settings {
        Some(path) => TrackSettings::load_or_default(path),
        None => TrackSettings::default(),
    };
    let mut track = PartitionedTrack::new(settings).map_err(|e| e.to_string())?;

    let mut script = match &args.script {
        Some(path) => Some(load_script(path)?.into_iter()),
        None => {
            log::info!(
                "Autoplay with seed {} for {} steps",
                args.seed,
                args.steps
            );
            None
        }
    };
    let mut rng = Pcg32::seed_from_u64(args.seed);

    for step in 0.. {
        let input = match script.as_mut() {
            Some(inputs) => match inputs.next() {
                Some(input) => input,
                None => break,
            },
            None if step < args.steps => random_input(&mut rng, &track),
            None => break,
        };

        if let TrackInput::AddendCountsChanged { left, right } = input {
            if left + right > track.settings().pool_size {
                return Err(format!("step {step}: addends {left}+{right} exceed the pool"));
            }
        }
        if let Some(token) = manipulated(&input) {
            if !track.token(token).is_some_and(|t| t.is_active()) {
                log::warn!("Step {step}: skipping {input:?}, bead {token} is not on the track");
                continue;
            }
        }

        track.apply(&input);
        log::trace!("Step {step}: {input:?}");

        if let Err(violation) = track.verify() {
            log::error!("Step {step}: {input:?} broke the track: {violation}");
            return Err(violation.to_string());
        }
    }

    Ok(track)
}

/// Bead an input acts on
fn manipulated(input: &TrackInput) -> Option<TokenId> {
    match *input {
        TrackInput::DragProposed { token, .. }
        | TrackInput::DragReleased { token }
        | TrackInput::Home { token }
        | TrackInput::End { token }
        | TrackInput::KeyboardStep { token, .. } => Some(token),
        _ => None,
    }
}

fn main() -> ExitCode {
    env_logger::init();
    log::info!("Bead Line (native) starting...");

    let args = Args::parse();

    match run(&args) {
        Ok(track) => {
            let (left, right) = track.addends();
            log::info!("Finished at {left}+{right}, all invariants held");
            match serde_json::to_string_pretty(&track.snapshot()) {
                Ok(json) => println!("{json}"),
                Err(e) => log::error!("Failed to serialize snapshot: {e}"),
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_defaults() {
        let args = Args::try_parse_from(["bead-line"]).unwrap();
        assert_eq!(args.seed, 1);
        assert_eq!(args.steps, 1000);
        assert!(args.settings.is_none());
        assert!(args.script.is_none());
    }

    #[test]
    fn test_args_parse_flags() {
        let args = Args::try_parse_from([
            "bead-line",
            "--seed",
            "42",
            "--steps",
            "10",
            "--script",
            "inputs.json",
        ])
        .unwrap();
        assert_eq!(args.seed, 42);
        assert_eq!(args.steps, 10);
        assert_eq!(args.script, Some(PathBuf::from("inputs.json")));
    }

    #[test]
    fn test_args_reject_bad_values() {
        assert!(Args::try_parse_from(["bead-line", "--seed", "abc"]).is_err());
        assert!(Args::try_parse_from(["bead-line", "--bogus"]).is_err());
    }

    #[test]
    fn test_autoplay_keeps_invariants() {
        let args = Args::try_parse_from(["bead-line", "--seed", "3", "--steps", "200"]).unwrap();
        let track = run(&args).unwrap();
        assert!(track.verify().is_ok());
    }
}
