// NanoLoop - Board Control Core & Simulation Bench
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

//! Ordered peripheral bring-up.
//!
//! The sequence is fixed and wait-gated: power/clocks, event system, EIC
//! early phase (structural configuration while the controller is held
//! disabled), pins, line-level arming, transport, EIC late phase (enable),
//! the periodic counter, and, as the very last act, global interrupt
//! delivery. Nothing that an interrupt handler consumes is left
//! uninitialized by the time an interrupt can first be observed.

use crate::clock::ClockSequencer;
use crate::drivers::{eic::Eic, evsys::Evsys, gclk::Gclk, nvic::Nvic, port::Port, tc::Tc};
use crate::regs;
use crate::{GateTimeout, IrqMaster, RegisterBus, SpinPolicy};

pub struct Bringup {
    policy: SpinPolicy,
}

impl Bringup {
    pub fn new(policy: SpinPolicy) -> Self {
        Self { policy }
    }

    /// Run the whole sequence. `transport_init` is invoked at the fixed
    /// point in the order where the serial transport must come up: after
    /// pin configuration, before the EIC is enabled.
    pub fn run<B, F>(&self, bus: &mut B, transport_init: F) -> Result<(), GateTimeout>
    where
        B: RegisterBus + IrqMaster,
        F: FnOnce(&mut B),
    {
        let policy = self.policy;

        ClockSequencer::new(policy).raise_performance(bus)?;

        // EVSYS may be in an inconsistent state; reset and settle.
        Evsys::new(bus).software_reset();

        self.eic_early(bus)?;

        let mut port = Port::new(bus);
        port.configure_led();
        port.configure_button();

        self.arm_button_line(bus);

        transport_init(bus);

        self.eic_late(bus)?;

        self.arm_periodic_counter(bus)?;

        // Priorities and per-source unmasking first; global delivery is the
        // final act so no handler can observe half-initialized state.
        let mut nvic = Nvic::new(bus);
        nvic.set_priority(regs::IRQ_EIC_EXTINT_2, regs::IRQ_PRIORITY_DEFAULT);
        nvic.set_priority(regs::IRQ_TC0, regs::IRQ_PRIORITY_DEFAULT);
        nvic.enable_irq(regs::IRQ_EIC_EXTINT_2);
        nvic.enable_irq(regs::IRQ_TC0);
        bus.enable_global_interrupts();

        tracing::info!("peripheral bring-up complete");
        Ok(())
    }

    /// Structural EIC configuration. Must complete while the controller is
    /// disabled; these registers write-protect once it is enabled.
    fn eic_early<B: RegisterBus>(&self, bus: &mut B) -> Result<(), GateTimeout> {
        // Debouncing needs the EIC clock: pluck it off the slow generator.
        let mut gclk = Gclk::new(bus);
        gclk.route_channel(regs::GCLK_CH_EIC, regs::GCLK_GEN_SLOW);
        gclk.wait_channel_enabled(regs::GCLK_CH_EIC, self.policy)?;

        let mut eic = Eic::new(bus);
        eic.software_reset();
        eic.wait_reset_sync(self.policy)?;
        eic.set_mechanical_debounce_prescaler();
        Ok(())
    }

    /// Per-line arming for the pushbutton. The controller itself stays
    /// disabled until the late phase.
    fn arm_button_line<B: RegisterBus>(&self, bus: &mut B) {
        let mut eic = Eic::new(bus);
        eic.enable_line_debounce(regs::EIC_LINE_BUTTON);
        eic.configure_line_both_edges(regs::EIC_LINE_BUTTON);
        eic.unmask_line(regs::EIC_LINE_BUTTON);
    }

    fn eic_late<B: RegisterBus>(&self, bus: &mut B) -> Result<(), GateTimeout> {
        let mut eic = Eic::new(bus);
        eic.enable();
        eic.wait_enable_sync(self.policy)
    }

    /// TC0 at 24 MHz / 1024 with CC0 chosen for a ~2 s period. The blink
    /// renderer consumes this; enable comes last.
    fn arm_periodic_counter<B: RegisterBus>(&self, bus: &mut B) -> Result<(), GateTimeout> {
        let mut gclk = Gclk::new(bus);
        gclk.route_channel(regs::GCLK_CH_TC0, regs::GCLK_GEN_MAIN);
        gclk.wait_channel_enabled(regs::GCLK_CH_TC0, self.policy)?;

        let mut tc = Tc::new(bus);
        tc.software_reset();
        tc.wait_reset_sync(self.policy)?;
        tc.configure_16bit_div1024();
        tc.set_match_frequency_top(regs::TC_TOP_2S);
        tc.enable();
        Ok(())
    }
}

/// Free-running blink rendering against the armed counter.
///
/// TODO: drive PA15 from the TC0 half-period once the blink duty table is
/// settled; until then the LED stays under direct Port control.
pub fn blink_modify<B: RegisterBus>(_bus: &mut B, _setting: crate::message::BlinkSetting) {}
