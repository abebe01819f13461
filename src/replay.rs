//! Headless replay of recorded host events.

use anyhow::{Context, Result};
use rinkaudio_core::{HostEvent, SimTick};
use rinkaudio_testkit::{EventRecord, JsonlSink};
use serde::Deserialize;
use std::{fs, path::Path};
use tracing::info;

use crate::system::SoundSystem;

#[derive(Debug, Deserialize)]
struct EventScriptFile {
    events: Vec<HostEvent>,
}

/// Host events loaded from a JSON script.
#[derive(Debug, Clone)]
pub struct EventScript {
    events: Vec<HostEvent>,
}

/// Totals of one replay run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReplayStats {
    pub events: usize,
    pub ticks: u64,
    pub cues: usize,
}

impl EventScript {
    pub fn from_path(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read event script {}", path.display()))?;
        Self::parse(&contents).with_context(|| format!("invalid event script {}", path.display()))
    }

    pub fn parse(contents: &str) -> Result<Self> {
        let file: EventScriptFile = serde_json::from_str(contents)?;
        if file.events.is_empty() {
            anyhow::bail!("event script contains no events");
        }
        Ok(Self {
            events: file.events,
        })
    }

    pub fn events(&self) -> &[HostEvent] {
        &self.events
    }

    /// Feed every event to `system`, logging each played cue to `log`.
    pub fn replay(
        &self,
        system: &mut SoundSystem,
        mut log: Option<&mut JsonlSink>,
    ) -> Result<ReplayStats> {
        let mut stats = ReplayStats::default();
        let mut tick = SimTick::ZERO;
        for event in &self.events {
            stats.events += 1;
            if matches!(event, HostEvent::Tick { .. }) {
                tick = tick.advance(1);
            }
            let cues = system.handle(event);
            stats.cues += cues.len();
            if let Some(sink) = log.as_deref_mut() {
                for cue in &cues {
                    sink.write(&EventRecord {
                        tick,
                        kind: cue.category.name(),
                        payload: cue,
                    })?;
                }
            }
            system.update();
        }
        stats.ticks = tick.0;
        if let Some(sink) = log {
            sink.flush()?;
        }
        info!(
            events = stats.events,
            ticks = stats.ticks,
            cues = stats.cues,
            "Replay finished"
        );
        Ok(stats)
    }
}
