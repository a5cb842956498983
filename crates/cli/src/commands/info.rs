//! `info` command implementation.

use anyhow::{Context, Result};
use contracts::SpinConfig;
use serde::Serialize;
use spin_engine::Interpolation;
use tracing::info;

use crate::cli::InfoArgs;
use crate::error::CliError;

/// Reference speed used for the convergence estimate, in units/ms
const REFERENCE_SPEED: f64 = 1.0;

/// Configuration info for JSON output
#[derive(Serialize)]
struct ConfigInfo<'a> {
    config: &'a SpinConfig,
    timing: TimingInfo,
}

#[derive(Serialize)]
struct TimingInfo {
    /// Maximum accepted samples per second
    max_sample_rate_hz: f64,
    /// Ticks needed to move 0 → `REFERENCE_SPEED`
    ticks_to_converge: usize,
    /// Time from the last input until speed reaches zero, starting at `REFERENCE_SPEED`
    time_to_rest_ms: u64,
}

/// Execute the `info` command
pub fn run_info(args: &InfoArgs) -> Result<()> {
    info!(config = %args.config.display(), "Loading configuration info");

    if !args.config.exists() {
        return Err(CliError::config_not_found(args.config.display().to_string()).into());
    }

    let config = config_loader::ConfigLoader::load_from_path(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;
    let timing = timing_info(&config);

    if args.json {
        let info = ConfigInfo {
            config: &config,
            timing,
        };
        let json =
            serde_json::to_string_pretty(&info).context("Failed to serialize config info")?;
        println!("{}", json);
    } else {
        print_config_info(&config, &timing);
    }

    Ok(())
}

fn timing_info(config: &SpinConfig) -> TimingInfo {
    let smoother = &config.smoother;
    let ticks = |start: f64, target: f64| {
        Interpolation::new(start, target, smoother.damping, smoother.threshold).count()
    };
    // first step runs immediately, the rest one tick apart
    let decay_ticks = ticks(REFERENCE_SPEED, 0.0) as u64;

    TimingInfo {
        max_sample_rate_hz: 1000.0 / config.sampler.interval_ms.max(1) as f64,
        ticks_to_converge: ticks(0.0, REFERENCE_SPEED),
        time_to_rest_ms: smoother.decay_delay_ms
            + decay_ticks.saturating_sub(1) * smoother.tick_ms,
    }
}

fn print_config_info(config: &SpinConfig, timing: &TimingInfo) {
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║               Spin Tester Configuration                      ║");
    println!("╚══════════════════════════════════════════════════════════════╝\n");

    println!("🎯 Sampler");
    println!("   ├─ Version: {:?}", config.version);
    println!("   ├─ Min interval: {} ms", config.sampler.interval_ms);
    println!("   └─ Max rate: {:.1} Hz", timing.max_sample_rate_hz);

    let smoother = &config.smoother;
    println!("\n📈 Speed Smoother");
    println!("   ├─ Damping: {}", smoother.damping);
    println!("   ├─ Threshold: {}", smoother.threshold);
    println!("   ├─ Tick: {} ms", smoother.tick_ms);
    println!("   ├─ Decay delay: {} ms", smoother.decay_delay_ms);
    println!(
        "   ├─ Ticks to converge (0 → {}): {}",
        REFERENCE_SPEED, timing.ticks_to_converge
    );
    println!(
        "   └─ Time to rest from {} units/ms: {} ms",
        REFERENCE_SPEED, timing.time_to_rest_ms
    );

    println!("\n🔄 Tracker");
    println!(
        "   └─ Reset speed on gesture reset: {}",
        config.tracker.reset_speed_on_gesture_reset
    );

    println!("\n🌐 Output");
    println!("   └─ Locale: {:?}", config.output.locale);

    println!();
}
