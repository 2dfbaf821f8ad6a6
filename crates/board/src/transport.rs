// NanoLoop - Board Control Core & Simulation Bench
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

//! Bench-side transport: descriptor-set semantics with scriptable busy
//! windows and receive completions.

use std::collections::VecDeque;
use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use nanoloop_core::transport::{RxCompletion, Transport, TxFrame};

/// Simulated async serial transport.
///
/// Accepting a frame keeps the transmitter busy for a configurable number
/// of service ticks; submissions during that window are rejected with the
/// frame handed back, exactly like the hardware contract.
#[derive(Debug, Default)]
pub struct SimTransport {
    busy_ticks_per_frame: u32,
    busy_remaining: u32,
    forced_busy: u32,
    sent: Vec<TxFrame>,
    rx_script: VecDeque<RxCompletion>,
    armed_len: Option<usize>,
    sink: Option<Arc<Mutex<Vec<u8>>>>,
    echo_stdout: bool,
}

impl SimTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ticks the transmitter stays busy after accepting a frame.
    pub fn with_busy_ticks(mut self, ticks: u32) -> Self {
        self.busy_ticks_per_frame = ticks;
        self
    }

    pub fn set_sink(&mut self, sink: Option<Arc<Mutex<Vec<u8>>>>, echo_stdout: bool) {
        self.sink = sink;
        self.echo_stdout = echo_stdout;
    }

    /// Hold the transmitter busy for the next `ticks` service calls
    /// regardless of traffic.
    pub fn force_busy(&mut self, ticks: u32) {
        self.forced_busy = ticks;
    }

    /// Queue a data completion for the next armed receive.
    pub fn queue_rx(&mut self, bytes: &[u8]) {
        self.rx_script.push_back(RxCompletion::Data(bytes.to_vec()));
    }

    /// Queue a non-data completion (break, framing error).
    pub fn queue_rx_other(&mut self) {
        self.rx_script.push_back(RxCompletion::Other);
    }

    pub fn sent_frames(&self) -> &[TxFrame] {
        &self.sent
    }

    /// Everything accepted so far, flattened in submission order.
    pub fn transcript(&self) -> Vec<u8> {
        let mut out = Vec::new();
        for frame in &self.sent {
            out.extend_from_slice(&frame.concat());
        }
        out
    }
}

impl Transport for SimTransport {
    fn service(&mut self) {
        self.busy_remaining = self.busy_remaining.saturating_sub(1);
        self.forced_busy = self.forced_busy.saturating_sub(1);
    }

    fn tx_busy(&self) -> bool {
        self.busy_remaining > 0 || self.forced_busy > 0
    }

    fn submit_transmit(&mut self, frame: TxFrame) -> Result<(), TxFrame> {
        if self.tx_busy() {
            return Err(frame);
        }

        let bytes = frame.concat();
        if let Some(sink) = &self.sink {
            if let Ok(mut guard) = sink.lock() {
                guard.extend_from_slice(&bytes);
            }
        }
        if self.echo_stdout {
            #[allow(unused_must_use)]
            {
                io::stdout().write_all(&bytes);
                io::stdout().flush();
            }
        }

        self.sent.push(frame);
        self.busy_remaining = self.busy_ticks_per_frame;
        Ok(())
    }

    fn submit_receive(&mut self, max_len: usize) {
        self.armed_len = Some(max_len);
    }

    fn poll_receive(&mut self) -> RxCompletion {
        let Some(max_len) = self.armed_len else {
            return RxCompletion::None;
        };
        match self.rx_script.pop_front() {
            Some(RxCompletion::Data(mut bytes)) => {
                bytes.truncate(max_len);
                self.armed_len = None;
                RxCompletion::Data(bytes)
            }
            Some(other) => {
                self.armed_len = None;
                other
            }
            None => RxCompletion::None,
        }
    }
}
