// NanoLoop - Board Control Core & Simulation Bench
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

use crate::{Model, DEFAULT_SETTLE_READS};
use nanoloop_core::regs;

/// Power manager model: performance-level switch with a ready flag that
/// asserts only after a few live status reads.
#[derive(Debug, serde::Serialize)]
pub struct Pm {
    intflag: u32,
    plcfg: u32,
    settle_reads: u32,
    countdown: Option<u32>,
    stuck: bool,
}

impl Default for Pm {
    fn default() -> Self {
        Self {
            intflag: 0,
            plcfg: 0,
            settle_reads: DEFAULT_SETTLE_READS,
            countdown: None,
            stuck: false,
        }
    }
}

impl Pm {
    pub fn new() -> Self {
        Self::default()
    }

    /// A part whose level switch never completes; for timeout tests.
    pub fn stuck() -> Self {
        Self {
            stuck: true,
            ..Self::default()
        }
    }

    fn observe_status(&mut self) {
        if self.stuck {
            return;
        }
        if let Some(left) = self.countdown {
            if left <= 1 {
                self.countdown = None;
                self.intflag |= regs::PM_INTFLAG_PLRDY;
            } else {
                self.countdown = Some(left - 1);
            }
        }
    }
}

impl Model for Pm {
    fn read(&mut self, offset: u32) -> u32 {
        match offset {
            0x10 => {
                self.observe_status();
                self.intflag
            }
            0x14 => self.plcfg,
            _ => 0,
        }
    }

    fn write(&mut self, offset: u32, value: u32) {
        match offset {
            // INTFLAG is write-1-to-clear.
            0x10 => self.intflag &= !value,
            0x14 => {
                self.plcfg = value;
                self.countdown = Some(self.settle_reads);
            }
            _ => {}
        }
    }

    fn as_any(&self) -> Option<&dyn std::any::Any> {
        Some(self)
    }

    fn as_any_mut(&mut self) -> Option<&mut dyn std::any::Any> {
        Some(self)
    }

    fn snapshot(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}
