// NanoLoop - Board Control Core & Simulation Bench
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

//! YAML scenario scripts for the bench.
//!
//! ```yaml
//! schema_version: "1.0"
//! name: press-and-step
//! max_ticks: 64
//! tx_busy_ticks: 2
//! events:
//!   - { at: 4, action: press }
//!   - { at: 8, action: release }
//!   - { at: 12, action: rx, bytes: ">" }
//! expect_transmit:
//!   - "Pressed] "
//!   - "[   ON   ]"
//! ```

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

fn default_schema_version() -> String {
    "1.0".to_string()
}

fn default_max_ticks() -> u64 {
    256
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Scenario {
    #[serde(default = "default_schema_version")]
    pub schema_version: String,
    pub name: String,
    #[serde(default = "default_max_ticks")]
    pub max_ticks: u64,
    /// Service ticks the transmitter stays busy after accepting a frame.
    #[serde(default)]
    pub tx_busy_ticks: u32,
    #[serde(default)]
    pub events: Vec<TimedEvent>,
    /// Substrings that must appear somewhere in the transmit transcript.
    #[serde(default)]
    pub expect_transmit: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TimedEvent {
    pub at: u64,
    #[serde(flatten)]
    pub event: Event,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(tag = "action", rename_all = "kebab-case")]
pub enum Event {
    Press,
    Release,
    Rx { bytes: String },
    RxOther,
    TxBusy { ticks: u32 },
}

impl Scenario {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read scenario {path:?}"))?;
        let scenario: Scenario = serde_yaml::from_str(&content)
            .with_context(|| format!("failed to parse scenario {path:?}"))?;
        scenario.validate()?;
        Ok(scenario)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_ticks == 0 {
            bail!("scenario '{}': max_ticks must be positive", self.name);
        }
        for event in &self.events {
            if event.at >= self.max_ticks {
                bail!(
                    "scenario '{}': event at tick {} is beyond max_ticks {}",
                    self.name,
                    event.at,
                    self.max_ticks
                );
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_scenario() {
        let scenario: Scenario = serde_yaml::from_str("name: smoke\n").unwrap();
        assert_eq!(scenario.name, "smoke");
        assert_eq!(scenario.max_ticks, 256);
        assert!(scenario.events.is_empty());
    }

    #[test]
    fn test_parse_events_and_expectations() {
        let yaml = r#"
name: press-and-step
max_ticks: 64
events:
  - { at: 4, action: press }
  - { at: 8, action: release }
  - { at: 12, action: rx, bytes: ">" }
  - { at: 16, action: tx-busy, ticks: 3 }
expect_transmit:
  - "Pressed] "
"#;
        let scenario: Scenario = serde_yaml::from_str(yaml).unwrap();
        scenario.validate().unwrap();
        assert_eq!(scenario.events.len(), 4);
        assert_eq!(
            scenario.events[2].event,
            Event::Rx {
                bytes: ">".to_string()
            }
        );
        assert_eq!(scenario.events[3].event, Event::TxBusy { ticks: 3 });
    }

    #[test]
    fn test_event_beyond_max_ticks_is_rejected() {
        let yaml = "name: bad\nmax_ticks: 8\nevents:\n  - { at: 9, action: press }\n";
        let scenario: Scenario = serde_yaml::from_str(yaml).unwrap();
        assert!(scenario.validate().is_err());
    }
}
