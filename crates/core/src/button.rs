// NanoLoop - Board Control Core & Simulation Bench
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

//! Debounced pushbutton input latch.
//!
//! A single-producer/single-consumer mailbox: the interrupt handler
//! publishes the classification of the most recent edge, the main loop
//! takes it. One unconsumed event at most: a burst of transitions between
//! two polls coalesces to the newest one. That is a property of the design,
//! not a defect: the consumer only ever cares about the latest state.

use core::sync::atomic::{AtomicU8, Ordering};

use crate::drivers::eic::Eic;
use crate::regs;
use crate::RegisterBus;

bitflags::bitflags! {
    /// Classification of a button edge.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct ButtonEvents: u8 {
        const PRESS = 1 << 0;
        const RELEASE = 1 << 1;
    }
}

/// Single-slot, overwrite-on-collision event cell.
///
/// `publish` runs in interrupt context, `take` in the main loop; the swap
/// makes the read-and-clear one operation, so an edge can never fall into
/// a gap between them.
#[derive(Debug, Default)]
pub struct ButtonLatch {
    mask: AtomicU8,
}

impl ButtonLatch {
    pub const fn new() -> Self {
        Self {
            mask: AtomicU8::new(0),
        }
    }

    /// Replace whatever was pending with the newest classification.
    pub fn publish(&self, events: ButtonEvents) {
        self.mask.store(events.bits(), Ordering::Release);
    }

    /// Read and clear. Empty means no transition since the last call.
    pub fn take(&self) -> ButtonEvents {
        ButtonEvents::from_bits_truncate(self.mask.swap(0, Ordering::AcqRel))
    }
}

/// EXTINT2 edge handler body.
///
/// Classifies the edge from the latched pin state (low = pressed for the
/// active-low button), publishes it, and acknowledges the line before
/// returning.
pub fn handle_button_irq<B: RegisterBus>(bus: &mut B, latch: &ButtonLatch) {
    let mut eic = Eic::new(bus);
    let events = if eic.line_pin_low(regs::EIC_LINE_BUTTON) {
        ButtonEvents::PRESS
    } else {
        ButtonEvents::RELEASE
    };
    latch.publish(events);
    eic.acknowledge_line(regs::EIC_LINE_BUTTON);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_take_clears_the_slot() {
        let latch = ButtonLatch::new();
        latch.publish(ButtonEvents::PRESS);
        assert_eq!(latch.take(), ButtonEvents::PRESS);
        assert_eq!(latch.take(), ButtonEvents::empty());
    }

    #[test]
    fn test_burst_keeps_only_the_newest_transition() {
        let latch = ButtonLatch::new();
        latch.publish(ButtonEvents::PRESS);
        latch.publish(ButtonEvents::RELEASE);
        assert_eq!(latch.take(), ButtonEvents::RELEASE);
    }

    #[test]
    fn test_empty_latch_reads_empty() {
        let latch = ButtonLatch::new();
        assert_eq!(latch.take(), ButtonEvents::empty());
    }
}
