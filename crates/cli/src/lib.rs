// NanoLoop - Board Control Core & Simulation Bench
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

//! Library side of the scenario runner: YAML schema, loader, and the
//! deterministic run loop the `nanoloop` binary drives.

pub mod scenario;

use std::sync::{Arc, Mutex};

use anyhow::Context;
use nanoloop_board::{Board, SimTransport};
use nanoloop_core::driver::EventLoop;
use nanoloop_core::SpinPolicy;

use scenario::{Event, Scenario};

/// Spin bound for the hosted bench; generous next to the handful of reads
/// each modeled gate needs.
pub const BENCH_SPIN_BOUND: u32 = 50_000;

#[derive(Debug)]
pub struct RunOutcome {
    pub ticks: u64,
    pub transcript: Vec<u8>,
    pub failed_expectations: Vec<String>,
    pub snapshot: serde_json::Value,
}

impl RunOutcome {
    pub fn passed(&self) -> bool {
        self.failed_expectations.is_empty()
    }
}

/// Bring the board up, then run the event loop for the scripted ticks.
pub fn run_scenario(scenario: &Scenario, echo_stdout: bool) -> anyhow::Result<RunOutcome> {
    let mut board = Board::new();
    board
        .bringup(SpinPolicy::Bounded(BENCH_SPIN_BOUND))
        .with_context(|| format!("bring-up failed for scenario '{}'", scenario.name))?;

    let sink = Arc::new(Mutex::new(Vec::new()));
    let mut transport = SimTransport::new().with_busy_ticks(scenario.tx_busy_ticks);
    transport.set_sink(Some(sink.clone()), echo_stdout);

    let mut event_loop = EventLoop::new(board.latch.clone());

    for tick in 0..scenario.max_ticks {
        for timed in scenario.events.iter().filter(|e| e.at == tick) {
            match &timed.event {
                Event::Press => board.press_button(),
                Event::Release => board.release_button(),
                Event::Rx { bytes } => transport.queue_rx(bytes.as_bytes()),
                Event::RxOther => transport.queue_rx_other(),
                Event::TxBusy { ticks } => transport.force_busy(*ticks),
            }
        }
        event_loop.tick(&mut board.bus, &mut transport);
    }

    let transcript = sink.lock().expect("transcript sink poisoned").clone();
    let text = String::from_utf8_lossy(&transcript);
    let failed_expectations = scenario
        .expect_transmit
        .iter()
        .filter(|needle| !text.contains(needle.as_str()))
        .cloned()
        .collect();

    let snapshot = serde_json::json!({
        "scenario": scenario.name,
        "ticks": scenario.max_ticks,
        "driver": event_loop.snapshot(),
        "board": board.snapshot(),
    });

    Ok(RunOutcome {
        ticks: scenario.max_ticks,
        transcript,
        failed_expectations,
        snapshot,
    })
}
