// NanoLoop - Board Control Core & Simulation Bench
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

use crate::{Model, DEFAULT_SETTLE_READS};
use nanoloop_core::regs;

/// Supply controller model: the PLL regulator settles against the board's
/// VDDPLL capacitance before STATUS reports it ready.
#[derive(Debug, serde::Serialize)]
pub struct Supc {
    status: u32,
    vregpll: u32,
    settle_reads: u32,
    countdown: Option<u32>,
}

impl Default for Supc {
    fn default() -> Self {
        Self {
            status: 0,
            vregpll: 0,
            settle_reads: DEFAULT_SETTLE_READS,
            countdown: None,
        }
    }
}

impl Supc {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Model for Supc {
    fn read(&mut self, offset: u32) -> u32 {
        match offset {
            0x0C => {
                if let Some(left) = self.countdown {
                    if left <= 1 {
                        self.countdown = None;
                        self.status |= regs::SUPC_STATUS_PLLRDY;
                    } else {
                        self.countdown = Some(left - 1);
                    }
                }
                self.status
            }
            0x18 => self.vregpll,
            _ => 0,
        }
    }

    fn write(&mut self, offset: u32, value: u32) {
        if offset == 0x18 {
            self.vregpll = value;
            if value & regs::SUPC_VREGPLL_ON != 0 {
                self.countdown = Some(self.settle_reads);
            } else {
                self.status &= !regs::SUPC_STATUS_PLLRDY;
                self.countdown = None;
            }
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
