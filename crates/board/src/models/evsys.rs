// NanoLoop - Board Control Core & Simulation Bench
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

use crate::Model;
use nanoloop_core::regs;

/// Event system model. Always enabled; the only operation bring-up issues
/// is a software reset, which completes after a few settle cycles rather
/// than exposing a promptly-observable status bit.
#[derive(Debug, Default, serde::Serialize)]
pub struct Evsys {
    ctrla: u32,
    settle_left: u32,
    resets: u32,
}

impl Evsys {
    pub fn new() -> Self {
        Self::default()
    }

    /// How many resets the core issued; bring-up tests assert exactly one.
    pub fn reset_count(&self) -> u32 {
        self.resets
    }

    pub fn reset_settled(&self) -> bool {
        self.settle_left == 0
    }
}

impl Model for Evsys {
    fn read(&mut self, offset: u32) -> u32 {
        match offset {
            0x00 => self.ctrla,
            _ => 0,
        }
    }

    fn write(&mut self, offset: u32, value: u32) {
        if offset == 0x00 && value & regs::EVSYS_CTRLA_SWRST != 0 {
            self.ctrla = regs::EVSYS_CTRLA_SWRST;
            self.settle_left = 3;
            self.resets += 1;
        }
    }

    fn tick(&mut self) {
        if self.settle_left > 0 {
            self.settle_left -= 1;
            if self.settle_left == 0 {
                self.ctrla &= !regs::EVSYS_CTRLA_SWRST;
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reset_settles_after_fixed_cycles() {
        let mut evsys = Evsys::new();
        evsys.write(0x00, regs::EVSYS_CTRLA_SWRST);
        assert!(!evsys.reset_settled());
        for _ in 0..3 {
            evsys.tick();
        }
        assert!(evsys.reset_settled());
        assert_eq!(evsys.read(0x00) & regs::EVSYS_CTRLA_SWRST, 0);
    }
}
