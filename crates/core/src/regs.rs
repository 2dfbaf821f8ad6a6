// NanoLoop - Board Control Core & Simulation Bench
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

//! Register map for the PIC32CM-class target.
//!
//! One shared address map for the typed drivers and the board models. The
//! bus is word-granular, so byte-packed hardware registers (PINCFG, PMUX,
//! NVIC IPR) are addressed at a word stride here; the bare-metal demo uses
//! the packed on-chip layout directly.

// ---------------------------------------------------------------------------
// PM - power manager

pub const PM_BASE: u32 = 0x4000_0000;
pub const PM_INTFLAG: u32 = PM_BASE + 0x10;
pub const PM_PLCFG: u32 = PM_BASE + 0x14;

/// INTFLAG: performance-level ready (write-1-to-clear).
pub const PM_INTFLAG_PLRDY: u32 = 1 << 0;
/// PLCFG: performance level 2.
pub const PM_PLCFG_PL2: u32 = 0x02;

// ---------------------------------------------------------------------------
// SUPC - supply controller

pub const SUPC_BASE: u32 = 0x4000_1800;
pub const SUPC_STATUS: u32 = SUPC_BASE + 0x0C;
pub const SUPC_VREGPLL: u32 = SUPC_BASE + 0x18;

pub const SUPC_STATUS_PLLRDY: u32 = 1 << 18;
/// Regulator enable + startup time sized for the 1.1 uF VDDPLL capacitance
/// on the Curiosity Nano board.
pub const SUPC_VREGPLL_ON: u32 = 0x0000_0302;

// ---------------------------------------------------------------------------
// NVMCTRL - flash controller

pub const NVMCTRL_BASE: u32 = 0x4100_4000;
pub const NVMCTRL_CTRLB: u32 = NVMCTRL_BASE + 0x04;

/// Read wait states for 24 MHz operation.
pub const NVMCTRL_CTRLB_RWS_24MHZ: u32 = 2 << 1;

/// NVM OTP row holding the DFLL48M coarse calibration.
pub const NVM_CAL_ROW: u32 = 0x0080_6020;

// ---------------------------------------------------------------------------
// OSCCTRL - oscillators

pub const OSCCTRL_BASE: u32 = 0x4000_1000;
pub const OSCCTRL_STATUS: u32 = OSCCTRL_BASE + 0x08;
pub const OSCCTRL_DFLLCTRL: u32 = OSCCTRL_BASE + 0x18;
pub const OSCCTRL_DFLLVAL: u32 = OSCCTRL_BASE + 0x1C;

pub const OSCCTRL_STATUS_DFLLRDY: u32 = 1 << 24;
pub const OSCCTRL_DFLLCTRL_ENABLE: u32 = 1 << 1;

// ---------------------------------------------------------------------------
// GCLK - generic clock controller

pub const GCLK_BASE: u32 = 0x4000_1C00;
pub const GCLK_SYNCBUSY: u32 = GCLK_BASE + 0x04;

pub const fn gclk_genctrl(gen: u32) -> u32 {
    GCLK_BASE + 0x20 + 4 * gen
}

pub const fn gclk_pchctrl(channel: u32) -> u32 {
    GCLK_BASE + 0x80 + 4 * channel
}

/// SYNCBUSY: GENCTRLn synchronization, bit 2 + n.
pub const fn gclk_syncbusy_genctrl(gen: u32) -> u32 {
    1 << (2 + gen)
}

pub const GCLK_GENCTRL_SRC_OSC16M: u32 = 0x05;
pub const GCLK_GENCTRL_SRC_DFLL48M: u32 = 0x07;
pub const GCLK_GENCTRL_GENEN: u32 = 1 << 8;
pub const GCLK_GENCTRL_DIV_SHIFT: u32 = 16;

pub const GCLK_PCHCTRL_CHEN: u32 = 1 << 6;

/// Peripheral channel indices.
pub const GCLK_CH_EIC: u32 = 4;
pub const GCLK_CH_TC0: u32 = 23;

/// Generator indices: GEN0 is the stepped-up main clock, GEN2 stays on the
/// always-on internal oscillator for slow peripherals (EIC debounce).
pub const GCLK_GEN_MAIN: u32 = 0;
pub const GCLK_GEN_SLOW: u32 = 2;

// ---------------------------------------------------------------------------
// EVSYS - event system

pub const EVSYS_BASE: u32 = 0x4200_0000;
pub const EVSYS_CTRLA: u32 = EVSYS_BASE + 0x00;
pub const EVSYS_CTRLA_SWRST: u32 = 1 << 0;

// ---------------------------------------------------------------------------
// EIC - external interrupt controller

pub const EIC_BASE: u32 = 0x4000_2400;
pub const EIC_CTRLA: u32 = EIC_BASE + 0x00;
pub const EIC_SYNCBUSY: u32 = EIC_BASE + 0x04;
pub const EIC_DPRESCALER: u32 = EIC_BASE + 0x08;
pub const EIC_INTENSET: u32 = EIC_BASE + 0x10;
pub const EIC_INTFLAG: u32 = EIC_BASE + 0x14;
pub const EIC_CONFIG0: u32 = EIC_BASE + 0x18;
pub const EIC_DEBOUNCEN: u32 = EIC_BASE + 0x1C;
pub const EIC_PINSTATE: u32 = EIC_BASE + 0x20;

pub const EIC_CTRLA_SWRST: u32 = 1 << 0;
pub const EIC_CTRLA_ENABLE: u32 = 1 << 1;
pub const EIC_SYNCBUSY_SWRST: u32 = 1 << 0;
pub const EIC_SYNCBUSY_ENABLE: u32 = 1 << 1;

/// Debounce prescaler: bounce-sample window off, prescaler0 = /16 tap on
/// the 4 MHz EIC clock, ~15.625 kHz sampling for mechanical inputs.
pub const EIC_DPRESCALER_MECHANICAL: u32 = 0x0000_000F;

/// The on-board pushbutton (PA23) sits on external interrupt line 2.
pub const EIC_LINE_BUTTON: u32 = 2;

/// CONFIG0 sense field for a line: 4 bits per line.
pub const fn eic_config0_sense_shift(line: u32) -> u32 {
    4 * line
}

/// Filtered, both-edges sense.
pub const EIC_SENSE_BOTH_FILTERED: u32 = 0xB;

// ---------------------------------------------------------------------------
// PORT - I/O pin controller, group 0

pub const PORT_BASE: u32 = 0x4100_0000;
pub const PORT_DIRCLR: u32 = PORT_BASE + 0x04;
pub const PORT_DIRSET: u32 = PORT_BASE + 0x08;
pub const PORT_OUTCLR: u32 = PORT_BASE + 0x14;
pub const PORT_OUTSET: u32 = PORT_BASE + 0x18;
pub const PORT_IN: u32 = PORT_BASE + 0x20;

pub const fn port_pincfg(pin: u32) -> u32 {
    PORT_BASE + 0x40 + 4 * pin
}

pub const fn port_pmux(pin: u32) -> u32 {
    PORT_BASE + 0xC0 + 4 * (pin / 2)
}

pub const PORT_PINCFG_PMUXEN: u32 = 1 << 0;
pub const PORT_PINCFG_INEN: u32 = 1 << 1;
pub const PORT_PINCFG_PULLEN: u32 = 1 << 2;

/// Peripheral function A (EIC).
pub const PORT_PMUX_FUNC_A: u32 = 0x0;

/// Active-high LED.
pub const PIN_LED: u32 = 15;
/// Active-low pushbutton with internal pull-up.
pub const PIN_BUTTON: u32 = 23;

// ---------------------------------------------------------------------------
// TC0 - timer/counter, 16-bit view

pub const TC0_BASE: u32 = 0x4200_2000;
pub const TC0_CTRLA: u32 = TC0_BASE + 0x00;
pub const TC0_SYNCBUSY: u32 = TC0_BASE + 0x04;
pub const TC0_CTRLBSET: u32 = TC0_BASE + 0x08;
pub const TC0_WAVE: u32 = TC0_BASE + 0x0C;
pub const TC0_COUNT: u32 = TC0_BASE + 0x14;
pub const TC0_CC0: u32 = TC0_BASE + 0x1C;

pub const TC_CTRLA_SWRST: u32 = 1 << 0;
pub const TC_CTRLA_ENABLE: u32 = 1 << 1;
pub const TC_CTRLA_MODE_COUNT16: u32 = 0x0 << 2;
pub const TC_CTRLA_PRESCSYNC_PRESC: u32 = 0x1 << 4;
pub const TC_CTRLA_PRESCALER_DIV1024: u32 = 0x7 << 8;
pub const TC_SYNCBUSY_SWRST: u32 = 1 << 0;
pub const TC_WAVE_MFRQ: u32 = 0x1;
pub const TC_CTRLBSET_CMD_READSYNC: u32 = 0x4 << 5;

/// Top value for a ~2 s period at 24 MHz / 1024.
pub const TC_TOP_2S: u32 = 0x1E84;

// ---------------------------------------------------------------------------
// NVIC - core interrupt controller

pub const NVIC_ISER: u32 = 0xE000_E100;
pub const NVIC_ICER: u32 = 0xE000_E180;
pub const NVIC_ISPR: u32 = 0xE000_E200;
pub const NVIC_IPR_BASE: u32 = 0xE000_E400;

pub const IRQ_EIC_EXTINT_2: u32 = 10;
pub const IRQ_TC0: u32 = 17;

/// Both serviced sources run at the same, lowest configurable urgency.
pub const IRQ_PRIORITY_DEFAULT: u32 = 3;
