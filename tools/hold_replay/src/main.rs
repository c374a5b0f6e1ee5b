mod trace;

use std::{
    path::PathBuf,
    process,
    sync::mpsc::{self, Receiver},
};

use anyhow::{bail, Result};
use clap::Parser;
use log::{info, warn};
use touch_hold::{
    load_timing_config, HoldEngine, HoldNotification, Instant, Position, TimingPolicy,
};

use trace::{read_expected_kinds, read_trace, ReplayInput, ReplayStep};

#[derive(Debug, Parser)]
#[command(name = "hold_replay")]
#[command(about = "Replay a touch-hold input trace and print the notifications it produces")]
struct Cli {
    /// CSV trace of press/move/release/disable/tick lines.
    trace: PathBuf,
    /// Expected notification kinds, one per line.
    #[arg(long)]
    expect: Option<PathBuf>,
    /// Timing policy TOML; defaults to the built-in policy.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Extra tick after the last line so a trailing release is flushed.
    #[arg(long = "tail-ms", default_value_t = 16)]
    tail_ms: u64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Emitted {
    ms: u64,
    notification: HoldNotification,
}

fn main() {
    env_logger::init();
    if let Err(err) = run(Cli::parse()) {
        eprintln!("error: {err:#}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let policy = match &cli.config {
        Some(path) => load_timing_config(path)?,
        None => {
            warn!("hold_replay: no --config given, using default policy");
            TimingPolicy::default()
        }
    };
    info!(
        "hold_replay: policy min_ms={} max_ms={}",
        policy.min_hold_duration().as_millis(),
        policy.max_hold_duration().as_millis()
    );

    let steps = read_trace(&cli.trace)?;
    let emitted = replay(policy, &steps, cli.tail_ms);

    println!("notify,ms,kind,normalized,x,y");
    for item in &emitted {
        let (normalized, position) = match item.notification {
            HoldNotification::Start(event) => (event.normalized_hold_time, event.position),
            HoldNotification::Release(event) => (event.normalized_hold_time, event.position),
        };
        println!(
            "notify,{},{},{:.3},{},{}",
            item.ms,
            kind_label(&item.notification),
            normalized,
            position.x,
            position.y
        );
    }

    if let Some(expect_path) = &cli.expect {
        let expected = read_expected_kinds(expect_path)?;
        let actual: Vec<&'static str> = emitted
            .iter()
            .map(|item| kind_label(&item.notification))
            .collect();
        if actual != expected {
            eprintln!("expected kinds: {}", expected.join(","));
            eprintln!("actual kinds:   {}", actual.join(","));
            bail!("notification sequence mismatch");
        }
    }

    Ok(())
}

fn replay(policy: TimingPolicy, steps: &[ReplayStep], tail_ms: u64) -> Vec<Emitted> {
    let mut engine = HoldEngine::new(policy);
    let (tx, rx) = mpsc::channel();
    let _ = engine.subscribe(Box::new(tx));

    let mut emitted = Vec::new();
    for step in steps {
        let now = Instant::from_millis(step.ms);
        match step.input {
            ReplayInput::Press { x, y } => {
                let _ = engine.begin_press(Position::new(x, y), now);
            }
            ReplayInput::Move { x, y } => engine.update_position(Position::new(x, y)),
            ReplayInput::Release => engine.end_press(now),
            ReplayInput::Disable => engine.disable(),
            ReplayInput::Tick => {
                let _ = engine.tick(now);
            }
        }
        drain(&rx, step.ms, &mut emitted);
    }

    if let Some(last) = steps.last() {
        let tail = last.ms.saturating_add(tail_ms);
        let _ = engine.tick(Instant::from_millis(tail));
        drain(&rx, tail, &mut emitted);
    }

    emitted
}

fn drain(rx: &Receiver<HoldNotification>, ms: u64, out: &mut Vec<Emitted>) {
    out.extend(rx.try_iter().map(|notification| Emitted { ms, notification }));
}

fn kind_label(notification: &HoldNotification) -> &'static str {
    match notification {
        HoldNotification::Start(_) => "start",
        HoldNotification::Release(_) => "release",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step(ms: u64, input: ReplayInput) -> ReplayStep {
        ReplayStep { ms, input }
    }

    #[test]
    fn trailing_release_is_flushed_by_tail_tick() {
        let steps = [
            step(0, ReplayInput::Press { x: 5.0, y: 5.0 }),
            step(16, ReplayInput::Tick),
            step(250, ReplayInput::Release),
        ];

        let emitted = replay(TimingPolicy::default(), &steps, 16);

        let kinds: Vec<_> = emitted.iter().map(|e| kind_label(&e.notification)).collect();
        assert_eq!(kinds, vec!["start", "release"]);
        assert_eq!(emitted[1].ms, 266);
        assert!(matches!(
            emitted[1].notification,
            HoldNotification::Release(event) if event.normalized_hold_time == 0.25
        ));
    }

    #[test]
    fn charge_attack_fixture_matches_expected_kinds() {
        let fixtures = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures");
        let steps = read_trace(&fixtures.join("charge_attack.csv")).expect("fixture trace");
        let expected =
            read_expected_kinds(&fixtures.join("charge_attack.expected")).expect("fixture kinds");

        let emitted = replay(TimingPolicy::default(), &steps, 16);
        let actual: Vec<_> = emitted.iter().map(|e| kind_label(&e.notification)).collect();

        assert_eq!(actual, expected);
        let releases: Vec<f64> = emitted
            .iter()
            .filter_map(|e| match e.notification {
                HoldNotification::Release(event) => Some(event.normalized_hold_time),
                HoldNotification::Start(_) => None,
            })
            .collect();
        assert_eq!(releases, vec![0.5, 1.0]);
    }

    #[test]
    fn disabled_hold_emits_start_only() {
        let steps = [
            step(0, ReplayInput::Press { x: 0.0, y: 0.0 }),
            step(400, ReplayInput::Disable),
            step(2_000, ReplayInput::Tick),
        ];

        let emitted = replay(TimingPolicy::default(), &steps, 16);

        assert_eq!(emitted.len(), 1);
        assert!(matches!(emitted[0].notification, HoldNotification::Start(_)));
    }
}
