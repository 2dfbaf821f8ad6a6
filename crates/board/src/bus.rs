// NanoLoop - Board Control Core & Simulation Bench
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

use crate::models::{
    eic::Eic, evsys::Evsys, gclk::Gclk, nvic::NvicModel, nvm::CalibrationRow, nvm::Nvmctrl,
    oscctrl::Oscctrl, pm::Pm, port::Port, supc::Supc, tc::Tc,
};
use crate::Model;
use nanoloop_core::{regs, IrqMaster, RegisterBus};

/// One entry in the access trace. The bring-up ordering tests run entirely
/// over this record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusAccess {
    Read { addr: u32, value: u32 },
    Write { addr: u32, value: u32 },
    GlobalIrqEnable,
    GlobalIrqDisable,
}

pub struct Mapping {
    pub name: &'static str,
    pub base: u32,
    pub size: u32,
    pub model: Box<dyn Model>,
}

/// Address-decoding bus over the peripheral models.
pub struct BoardBus {
    mappings: Vec<Mapping>,
    pub trace: Vec<BusAccess>,
    global_irq: bool,
}

impl Default for BoardBus {
    fn default() -> Self {
        Self::new()
    }
}

impl BoardBus {
    /// The full chip map at the shared register addresses.
    pub fn new() -> Self {
        let mut bus = Self {
            mappings: Vec::new(),
            trace: Vec::new(),
            global_irq: false,
        };
        bus.map("pm", regs::PM_BASE, 0x400, Box::new(Pm::new()));
        bus.map("oscctrl", regs::OSCCTRL_BASE, 0x400, Box::new(Oscctrl::new()));
        bus.map("supc", regs::SUPC_BASE, 0x400, Box::new(Supc::new()));
        bus.map("gclk", regs::GCLK_BASE, 0x400, Box::new(Gclk::new()));
        bus.map("eic", regs::EIC_BASE, 0x400, Box::new(Eic::new()));
        bus.map("port", regs::PORT_BASE, 0x200, Box::new(Port::new()));
        bus.map("nvmctrl", regs::NVMCTRL_BASE, 0x400, Box::new(Nvmctrl::new()));
        bus.map("calrow", regs::NVM_CAL_ROW, 0x4, Box::new(CalibrationRow::new()));
        bus.map("evsys", regs::EVSYS_BASE, 0x400, Box::new(Evsys::new()));
        bus.map("tc0", regs::TC0_BASE, 0x400, Box::new(Tc::new()));
        bus.map("nvic", 0xE000_E000, 0x1000, Box::new(NvicModel::new()));
        bus
    }

    pub fn map(&mut self, name: &'static str, base: u32, size: u32, model: Box<dyn Model>) {
        self.mappings.push(Mapping {
            name,
            base,
            size,
            model,
        });
    }

    fn decode(&mut self, addr: u32) -> Option<&mut Mapping> {
        self.mappings
            .iter_mut()
            .find(|m| addr >= m.base && addr - m.base < m.size)
    }

    /// Typed view of a model, for tests and fault injection.
    pub fn model<T: 'static>(&self, name: &str) -> Option<&T> {
        self.mappings
            .iter()
            .find(|m| m.name == name)
            .and_then(|m| m.model.as_any())
            .and_then(|any| any.downcast_ref::<T>())
    }

    pub fn model_mut<T: 'static>(&mut self, name: &str) -> Option<&mut T> {
        self.mappings
            .iter_mut()
            .find(|m| m.name == name)
            .and_then(|m| m.model.as_any_mut())
            .and_then(|any| any.downcast_mut::<T>())
    }

    /// Swap a model out, keeping its mapping. Fault-injection hook.
    pub fn replace_model(&mut self, name: &str, model: Box<dyn Model>) {
        if let Some(mapping) = self.mappings.iter_mut().find(|m| m.name == name) {
            mapping.model = model;
        }
    }

    pub fn global_irq_enabled(&self) -> bool {
        self.global_irq
    }

    pub fn pending_irqs(&self) -> Vec<u32> {
        self.mappings
            .iter()
            .filter_map(|m| m.model.pending_irq())
            .collect()
    }

    pub fn clear_trace(&mut self) {
        self.trace.clear();
    }

    pub fn snapshot(&self) -> serde_json::Value {
        let map: serde_json::Map<String, serde_json::Value> = self
            .mappings
            .iter()
            .map(|m| (m.name.to_string(), m.model.snapshot()))
            .collect();
        serde_json::Value::Object(map)
    }
}

impl RegisterBus for BoardBus {
    fn read32(&mut self, addr: u32) -> u32 {
        let value = match self.decode(addr) {
            Some(mapping) => {
                let offset = addr - mapping.base;
                mapping.model.read(offset)
            }
            None => {
                tracing::warn!("read of unmapped address {addr:#010x}");
                0
            }
        };
        self.trace.push(BusAccess::Read { addr, value });
        value
    }

    fn write32(&mut self, addr: u32, value: u32) {
        self.trace.push(BusAccess::Write { addr, value });
        match self.decode(addr) {
            Some(mapping) => {
                let offset = addr - mapping.base;
                mapping.model.write(offset, value);
            }
            None => {
                tracing::warn!(value, "write to unmapped address {addr:#010x}");
            }
        }
    }

    fn settle(&mut self, cycles: u32) {
        for _ in 0..cycles {
            for mapping in &mut self.mappings {
                mapping.model.tick();
            }
        }
    }
}

impl IrqMaster for BoardBus {
    fn enable_global_interrupts(&mut self) {
        self.global_irq = true;
        self.trace.push(BusAccess::GlobalIrqEnable);
    }

    fn disable_global_interrupts(&mut self) {
        self.global_irq = false;
        self.trace.push(BusAccess::GlobalIrqDisable);
    }
}
