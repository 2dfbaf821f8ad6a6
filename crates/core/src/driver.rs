// NanoLoop - Board Control Core & Simulation Bench
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

//! The cooperative main loop.
//!
//! `tick` is called back-to-back forever by the host. Each iteration
//! services the transport, drains the button latch, classifies any receive
//! completion, and runs the message coalescer once. Nothing blocks: a busy
//! transmitter just defers work to the next iteration.

use std::sync::Arc;

use crate::bringup;
use crate::button::ButtonLatch;
use crate::coalescer::{MessageCoalescer, RequestKind, RequestState, UpdatePayload};
use crate::message::{BlinkSetting, CTRL_E};
use crate::transport::{RxCompletion, Transport};
use crate::RegisterBus;

/// Receive buffer size armed for each completion.
pub const RX_MAX_LEN: usize = 16;

pub struct EventLoop {
    coalescer: MessageCoalescer,
    setting: BlinkSetting,
    latch: Arc<ButtonLatch>,
    rx_armed: bool,
}

impl EventLoop {
    /// The first transmission after reset is the banner; it is requested
    /// here and serviced on the first tick.
    pub fn new(latch: Arc<ButtonLatch>) -> Self {
        let mut coalescer = MessageCoalescer::new();
        coalescer.request_banner();
        Self {
            coalescer,
            setting: BlinkSetting::Off,
            latch,
            rx_armed: false,
        }
    }

    pub fn setting(&self) -> BlinkSetting {
        self.setting
    }

    pub fn request_state(&self, kind: RequestKind) -> RequestState {
        self.coalescer.state(kind)
    }

    /// One loop iteration.
    pub fn tick<B, T>(&mut self, bus: &mut B, transport: &mut T)
    where
        B: RegisterBus,
        T: Transport,
    {
        transport.service();

        if !self.rx_armed {
            transport.submit_receive(RX_MAX_LEN);
            self.rx_armed = true;
        }

        // A transition becomes a pending update; bursts have already been
        // coalesced by the latch.
        let events = self.latch.take();
        if !events.is_empty() {
            tracing::debug!(?events, "button transition");
            self.coalescer.request_update(UpdatePayload::Button(events));
        }

        match transport.poll_receive() {
            RxCompletion::Data(payload) => {
                self.classify(&payload);
                // The payload is owned here, so the receiver can be
                // re-armed immediately without clobbering unread bytes.
                transport.submit_receive(RX_MAX_LEN);
            }
            RxCompletion::Other => {
                transport.submit_receive(RX_MAX_LEN);
            }
            RxCompletion::None => {}
        }

        self.coalescer.service(transport);

        bringup::blink_modify(bus, self.setting);
    }

    /// Decide which request class a received packet raises.
    fn classify(&mut self, payload: &[u8]) {
        match payload.first() {
            None => {}
            Some(&CTRL_E) => self.coalescer.request_banner(),
            Some(b'<') | Some(b'a') | Some(b'A') => {
                self.setting = self.setting.decrease();
                self.coalescer
                    .request_update(UpdatePayload::Setting(self.setting));
            }
            Some(b'>') | Some(b'd') | Some(b'D') => {
                self.setting = self.setting.increase();
                self.coalescer
                    .request_update(UpdatePayload::Setting(self.setting));
            }
            Some(_) => {
                self.coalescer
                    .request_update(UpdatePayload::Echo(payload.to_vec()));
            }
        }
    }

    /// Observable loop state, for snapshots and the bench.
    pub fn snapshot(&self) -> serde_json::Value {
        serde_json::json!({
            "setting": self.setting,
            "banner": self.coalescer.state(RequestKind::Banner),
            "update": self.coalescer.state(RequestKind::Update),
        })
    }
}
