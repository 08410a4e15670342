//! Command-line arguments for `repro`.

use clap::{Parser, ValueEnum};
use isr_scenario::ScenarioConfig;
use log::LevelFilter;
use std::time::Duration;

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum ScenarioPreset {
    /// Hold time above the event interval; likely to show the inversion.
    #[default]
    Literal,
    /// Short holds, long gaps; should never show it.
    Degenerate,
}

#[derive(Parser, Debug)]
#[command(name = "repro", about = "Reproduce an interrupt spinning on a lock held by a starved task")]
#[allow(clippy::struct_excessive_bools)]
pub struct Args {
    /// Preset the other flags override.
    #[arg(long, value_enum, default_value_t)]
    pub scenario: ScenarioPreset,

    /// Number of producer events.
    #[arg(long)]
    pub events: Option<u32>,

    /// Delay between producer events, in milliseconds.
    #[arg(long)]
    pub interval_ms: Option<u64>,

    /// How long the task holds the lock per cycle, in milliseconds.
    #[arg(long)]
    pub processing_ms: Option<u64>,

    /// Head start for the task, in milliseconds.
    #[arg(long)]
    pub grace_ms: Option<u64>,

    /// Task pause after each release, in milliseconds.
    #[arg(long)]
    pub cooldown_ms: Option<u64>,

    /// CPU to pin the scenario to.
    #[arg(long, conflicts_with = "no_pin")]
    pub cpu: Option<usize>,

    /// Leave CPU affinity alone.
    #[arg(long)]
    pub no_pin: bool,

    /// Do not raise the producer above the task.
    #[arg(long)]
    pub no_elevate: bool,

    /// Maximum log level (off, error, warn, info, debug, trace).
    #[arg(long, default_value = "info")]
    pub log_level: LevelFilter,
}

impl Args {
    /// The preset with every given flag applied on top.
    #[must_use]
    pub fn config(&self) -> ScenarioConfig {
        let mut config = match self.scenario {
            ScenarioPreset::Literal => ScenarioConfig::literal(),
            ScenarioPreset::Degenerate => ScenarioConfig::degenerate(),
        };

        if let Some(events) = self.events {
            config.events = events;
        }
        if let Some(ms) = self.interval_ms {
            config.packet_interval = Duration::from_millis(ms);
        }
        if let Some(ms) = self.processing_ms {
            config.processing_time = Duration::from_millis(ms);
        }
        if let Some(ms) = self.grace_ms {
            config.startup_grace = Duration::from_millis(ms);
        }
        if let Some(ms) = self.cooldown_ms {
            config.cooldown = Duration::from_millis(ms);
        }
        if self.no_pin {
            config.pin_cpu = None;
        } else if let Some(cpu) = self.cpu {
            config.pin_cpu = Some(cpu);
        }
        if self.no_elevate {
            config.prioritize = false;
        }
        config
    }
}
