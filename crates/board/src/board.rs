// NanoLoop - Board Control Core & Simulation Bench
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

//! The assembled board: bus, button latch, and interrupt dispatch.

use std::sync::Arc;

use nanoloop_core::bringup::Bringup;
use nanoloop_core::button::{handle_button_irq, ButtonLatch};
use nanoloop_core::{regs, GateTimeout, SpinPolicy};

use crate::bus::BoardBus;
use crate::models::{eic::Eic, nvic::NvicModel, port::Port};

pub struct Board {
    pub bus: BoardBus,
    pub latch: Arc<ButtonLatch>,
    button_down: bool,
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    pub fn new() -> Self {
        Self {
            bus: BoardBus::new(),
            latch: Arc::new(ButtonLatch::new()),
            button_down: false,
        }
    }

    /// Run the full bring-up sequence against the models.
    pub fn bringup(&mut self, policy: SpinPolicy) -> Result<(), GateTimeout> {
        Bringup::new(policy).run(&mut self.bus, |_| {})
    }

    pub fn press_button(&mut self) {
        self.set_button(true);
    }

    pub fn release_button(&mut self) {
        self.set_button(false);
    }

    fn set_button(&mut self, down: bool) {
        if self.button_down == down {
            return;
        }
        self.button_down = down;

        // Active-low wiring: pressed drives the pin to ground.
        let level_high = !down;
        if let Some(port) = self.bus.model_mut::<Port>("port") {
            port.drive_pin(regs::PIN_BUTTON, level_high);
        }
        if let Some(eic) = self.bus.model_mut::<Eic>("eic") {
            eic.set_line_level(regs::EIC_LINE_BUTTON, level_high);
        }
        self.dispatch_pending_irqs();
    }

    /// Deliver pending interrupt lines to their handlers, honouring the
    /// same gating real hardware applies: the peripheral must assert, the
    /// NVIC enable bit must be set, and global delivery must be on. An
    /// edge arriving before bring-up finishes is therefore invisible.
    pub fn dispatch_pending_irqs(&mut self) {
        if !self.bus.global_irq_enabled() {
            return;
        }
        for irq in self.bus.pending_irqs() {
            let enabled = self
                .bus
                .model::<NvicModel>("nvic")
                .map(|nvic| nvic.irq_enabled(irq))
                .unwrap_or(false);
            if !enabled {
                continue;
            }
            if irq == regs::IRQ_EIC_EXTINT_2 {
                let latch = self.latch.clone();
                handle_button_irq(&mut self.bus, &latch);
            }
        }
    }

    pub fn led_is_on(&self) -> bool {
        self.bus
            .model::<Port>("port")
            .map(|port| port.output_level(regs::PIN_LED))
            .unwrap_or(false)
    }

    pub fn snapshot(&self) -> serde_json::Value {
        self.bus.snapshot()
    }
}
