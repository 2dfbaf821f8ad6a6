// NanoLoop - Board Control Core & Simulation Bench
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

//! Bring-up ordering properties, checked over the bus access trace: no
//! configuration write that depends on a ready gate may precede the gate
//! being observed true.

use nanoloop_board::models::{eic::Eic, gclk::Gclk, pm::Pm, tc::Tc};
use nanoloop_board::{Board, BusAccess};
use nanoloop_core::{regs, SpinPolicy};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_test_writer()
        .try_init();
}

const POLICY: SpinPolicy = SpinPolicy::Bounded(10_000);

fn first_index<F>(trace: &[BusAccess], pred: F) -> Option<usize>
where
    F: Fn(&BusAccess) -> bool,
{
    trace.iter().position(pred)
}

fn first_write(trace: &[BusAccess], target: u32) -> Option<usize> {
    first_index(trace, |a| matches!(a, BusAccess::Write { addr, .. } if *addr == target))
}

/// First read of `target` whose returned value satisfies `ready`.
fn first_ready_read<F>(trace: &[BusAccess], target: u32, ready: F) -> Option<usize>
where
    F: Fn(u32) -> bool,
{
    first_index(trace, |a| {
        matches!(a, BusAccess::Read { addr, value } if *addr == target && ready(*value))
    })
}

#[test]
fn test_bringup_completes_under_bounded_spins() -> anyhow::Result<()> {
    init_tracing();
    let mut board = Board::new();
    board.bringup(POLICY)?;

    let eic = board.bus.model::<Eic>("eic").unwrap();
    assert!(eic.enabled());
    assert!(eic.line_debounced(regs::EIC_LINE_BUTTON));
    assert_eq!(
        eic.line_sense(regs::EIC_LINE_BUTTON),
        regs::EIC_SENSE_BOTH_FILTERED
    );

    let tc = board.bus.model::<Tc>("tc0").unwrap();
    assert!(tc.enabled());
    assert_eq!(tc.top(), regs::TC_TOP_2S);
    assert_eq!(tc.wave(), regs::TC_WAVE_MFRQ);

    let gclk = board.bus.model::<Gclk>("gclk").unwrap();
    assert_eq!(
        gclk.generator(0) & 0x1F,
        regs::GCLK_GENCTRL_SRC_DFLL48M,
        "main generator runs off the DFLL"
    );

    assert!(board.bus.global_irq_enabled());
    Ok(())
}

#[test]
fn test_performance_level_ready_before_pll_power() {
    let mut board = Board::new();
    board.bringup(POLICY).unwrap();
    let trace = &board.bus.trace;

    let pl_ready = first_ready_read(trace, regs::PM_INTFLAG, |v| {
        v & regs::PM_INTFLAG_PLRDY != 0
    })
    .expect("PL ready observed");
    let pll_power = first_write(trace, regs::SUPC_VREGPLL).expect("regulator powered");
    assert!(pl_ready < pll_power);
}

#[test]
fn test_dfll_ready_observed_before_main_generator_switch() {
    let mut board = Board::new();
    board.bringup(POLICY).unwrap();
    let trace = &board.bus.trace;

    let switch = first_index(trace, |a| {
        matches!(a, BusAccess::Write { addr, value }
            if *addr == regs::gclk_genctrl(regs::GCLK_GEN_MAIN)
            && value & 0x1F == regs::GCLK_GENCTRL_SRC_DFLL48M)
    })
    .expect("GEN0 switched to the DFLL");

    let dfll_ready = first_ready_read(trace, regs::OSCCTRL_STATUS, |v| {
        v & regs::OSCCTRL_STATUS_DFLLRDY != 0
    })
    .expect("DFLL ready observed");
    assert!(dfll_ready < switch);

    // And the enable itself was confirmed ready before the switch: the last
    // status poll preceding the switch must read ready.
    let last_ready_before = trace[..switch]
        .iter()
        .rposition(|a| {
            matches!(a, BusAccess::Read { addr, value }
                if *addr == regs::OSCCTRL_STATUS && value & regs::OSCCTRL_STATUS_DFLLRDY != 0)
        })
        .expect("a ready poll directly gates the switch");
    assert!(last_ready_before < switch);
}

#[test]
fn test_slow_generator_configured_before_eic_channel_references_it() {
    let mut board = Board::new();
    board.bringup(POLICY).unwrap();
    let trace = &board.bus.trace;

    let gen2 = first_write(trace, regs::gclk_genctrl(regs::GCLK_GEN_SLOW)).unwrap();
    let channel = first_write(trace, regs::gclk_pchctrl(regs::GCLK_CH_EIC)).unwrap();
    assert!(gen2 < channel);
}

#[test]
fn test_eic_structural_configuration_precedes_enable() {
    let mut board = Board::new();
    board.bringup(POLICY).unwrap();
    let trace = &board.bus.trace;

    let enable = first_index(trace, |a| {
        matches!(a, BusAccess::Write { addr, value }
            if *addr == regs::EIC_CTRLA && value & regs::EIC_CTRLA_ENABLE != 0)
    })
    .expect("EIC enabled");

    for addr in [
        regs::EIC_DPRESCALER,
        regs::EIC_CONFIG0,
        regs::EIC_DEBOUNCEN,
        regs::EIC_INTENSET,
    ] {
        let write = first_write(trace, addr).expect("structural write present");
        assert!(
            write < enable,
            "write to {addr:#010x} must precede EIC enable"
        );
    }
}

#[test]
fn test_global_interrupt_enable_is_the_final_act() {
    let mut board = Board::new();
    board.bringup(POLICY).unwrap();
    assert_eq!(
        board.bus.trace.last(),
        Some(&BusAccess::GlobalIrqEnable),
        "nothing may follow global interrupt enable"
    );
    // And it happens exactly once.
    let count = board
        .bus
        .trace
        .iter()
        .filter(|a| matches!(a, BusAccess::GlobalIrqEnable))
        .count();
    assert_eq!(count, 1);
}

#[test]
fn test_stuck_ready_gate_times_out_with_its_name() {
    init_tracing();
    let mut board = Board::new();
    board.bus.replace_model("pm", Box::new(Pm::stuck()));

    let err = board.bringup(SpinPolicy::Bounded(200)).unwrap_err();
    assert_eq!(err.gate, "performance level ready");
}

#[test]
fn test_edge_before_bringup_is_invisible() {
    let mut board = Board::new();

    // Bounce the button before any configuration exists.
    board.press_button();
    board.release_button();
    assert!(board.latch.take().is_empty());

    board.bringup(POLICY).unwrap();
    assert!(
        board.latch.take().is_empty(),
        "pre-bringup edges must not surface after the fact"
    );

    // The first post-bringup edge is delivered normally.
    board.press_button();
    assert!(!board.latch.take().is_empty());
}
