// NanoLoop - Board Control Core & Simulation Bench
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

//! Cold-boot clock and power sequencing.
//!
//! The chip resets in PL0 with the main generator on the 4 MHz internal
//! oscillator. The sequence below steps up to PL2 and 24 MHz. Order is
//! load-bearing: the performance level must rise before the DFLL is
//! powered, the DFLL must report ready before the main generator switches
//! to it, and every generator write is confirmed synchronized before
//! anything downstream is touched.

use crate::drivers::{gclk::Gclk, oscctrl::Oscctrl, pm::Pm, supc::Supc};
use crate::regs;
use crate::{GateTimeout, RegisterBus, SpinPolicy};

/// Runs exactly once at cold boot. Not safely re-enterable mid-sequence:
/// a partial retry can leave the clock tree in a state only a reset clears.
pub struct ClockSequencer {
    policy: SpinPolicy,
}

impl ClockSequencer {
    pub fn new(policy: SpinPolicy) -> Self {
        Self { policy }
    }

    pub fn raise_performance<B: RegisterBus>(&self, bus: &mut B) -> Result<(), GateTimeout> {
        let policy = self.policy;

        // PL2 first: the frequencies below are out of spec in PL0.
        let mut pm = Pm::new(bus);
        pm.clear_performance_ready();
        pm.request_performance_level2();
        pm.wait_performance_ready(policy)?;
        pm.clear_performance_ready();

        // Flash wait states for 24 MHz, then the dedicated PLL regulator.
        bus.write32(regs::NVMCTRL_CTRLB, regs::NVMCTRL_CTRLB_RWS_24MHZ);
        let mut supc = Supc::new(bus);
        supc.power_pll_regulator();
        supc.wait_pll_regulator_ready(policy)?;

        // DFLL48M: every control/value write invalidates readiness, so each
        // step re-waits on the same gate.
        let mut osc = Oscctrl::new(bus);
        osc.dfll_open_loop_defaults();
        osc.wait_dfll_ready(policy)?;
        osc.dfll_load_calibration();
        osc.wait_dfll_ready(policy)?;
        osc.dfll_enable();
        osc.wait_dfll_ready(policy)?;

        // Slow domain before anything references it through a channel gate,
        // then the main generator steps up.
        let mut gclk = Gclk::new(bus);
        gclk.configure_slow_generator();
        gclk.wait_generator_sync(regs::GCLK_GEN_SLOW, policy)?;
        gclk.retarget_main_generator_to_dfll();
        gclk.wait_generator_sync(regs::GCLK_GEN_MAIN, policy)?;

        tracing::info!("clock tree at 24 MHz, performance level 2");
        Ok(())
    }
}
