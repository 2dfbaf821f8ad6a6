// NanoLoop - Board Control Core & Simulation Bench
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

pub mod bringup;
pub mod button;
pub mod clock;
pub mod coalescer;
pub mod driver;
pub mod drivers;
pub mod message;
pub mod regs;
pub mod transport;

/// Memory-mapped register access seam.
///
/// On target this is a pair of volatile pointer operations; on the hosted
/// bench it is backed by the board models. MMIO itself cannot fail; an
/// unmapped access is a wiring bug in the bus, not a runtime condition the
/// control core could react to.
pub trait RegisterBus {
    fn read32(&mut self, addr: u32) -> u32;
    fn write32(&mut self, addr: u32, value: u32);

    /// Burn a fixed number of cycles. Used only where no status bit asserts
    /// quickly enough to poll (the EVSYS reset settle).
    fn settle(&mut self, _cycles: u32) {}
}

/// PRIMASK seam. Global interrupt delivery is a core-register operation,
/// not a memory-mapped one, so it lives next to the bus rather than on it.
pub trait IrqMaster {
    fn enable_global_interrupts(&mut self);
    fn disable_global_interrupts(&mut self);
}

/// How long a ready-gate wait may spin.
///
/// `Forever` matches the bring-up posture on real hardware: a peripheral
/// that never reaches its expected state hangs the system rather than
/// letting it proceed on a misconfigured clock/interrupt path. `Bounded`
/// exists so the hosted bench terminates deterministically.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpinPolicy {
    Forever,
    Bounded(u32),
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("ready gate '{gate}' did not assert within the spin bound")]
pub struct GateTimeout {
    pub gate: &'static str,
}

/// Poll a live hardware condition until it holds.
///
/// The predicate re-reads status on every iteration; gate state is never
/// cached across polls.
pub fn wait_for<B, F>(
    bus: &mut B,
    policy: SpinPolicy,
    gate: &'static str,
    mut ready: F,
) -> Result<(), GateTimeout>
where
    B: RegisterBus + ?Sized,
    F: FnMut(&mut B) -> bool,
{
    tracing::trace!(gate, "waiting on ready gate");
    match policy {
        SpinPolicy::Forever => {
            while !ready(bus) {
                core::hint::spin_loop();
            }
            Ok(())
        }
        SpinPolicy::Bounded(limit) => {
            for _ in 0..limit {
                if ready(bus) {
                    return Ok(());
                }
                core::hint::spin_loop();
            }
            tracing::debug!(gate, limit, "ready gate timed out");
            Err(GateTimeout { gate })
        }
    }
}
