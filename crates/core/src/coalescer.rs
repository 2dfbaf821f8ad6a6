// NanoLoop - Board Control Core & Simulation Bench
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

//! Request coalescing over the busy/not-busy transport.
//!
//! Each request class runs its own three-state machine. A pending episode
//! generates its descriptor set exactly once, then resubmits until the
//! transport accepts; acceptance ends the episode in the same step, so no
//! partially-sent state is ever observable across loop iterations.
//! Repeated triggers while an episode is live coalesce instead of queueing.

use crate::button::ButtonEvents;
use crate::message::{self, BlinkSetting};
use crate::transport::{Transport, TxFrame};

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestKind {
    Banner,
    Update,
}

/// Live states of one outstanding request. "Sent" is the acceptance edge
/// back to `Idle`, not a resting state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestState {
    #[default]
    Idle,
    Pending,
    Generating,
}

/// What an Update transmission should show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdatePayload {
    Button(ButtonEvents),
    Setting(BlinkSetting),
    Echo(Vec<u8>),
}

#[derive(Debug, Default)]
struct Slot {
    state: RequestState,
    frame: Option<TxFrame>,
}

impl Slot {
    fn trigger(&mut self) {
        if self.state == RequestState::Idle {
            self.state = RequestState::Pending;
        }
        // Pending or Generating: the live episode already covers this
        // trigger; coalesce.
    }

    /// One service step against the shared transport gate.
    fn service<T, F>(&mut self, transport: &mut T, generate: F)
    where
        T: Transport,
        F: FnOnce() -> TxFrame,
    {
        if self.state == RequestState::Idle {
            return;
        }
        if transport.tx_busy() {
            // Stay put; retried next iteration without regenerating.
            return;
        }

        if self.state == RequestState::Pending {
            self.frame = Some(generate());
            self.state = RequestState::Generating;
        }

        if let Some(frame) = self.frame.take() {
            match transport.submit_transmit(frame) {
                Ok(()) => {
                    // Sent: pending and generating clear together.
                    self.state = RequestState::Idle;
                }
                Err(frame) => {
                    self.frame = Some(frame);
                }
            }
        }
    }
}

/// Per-class request state, serviced in fixed priority order: banner
/// repaints before incremental updates. A later class never preempts an
/// in-flight earlier one; both share the transport-busy gate.
#[derive(Debug, Default)]
pub struct MessageCoalescer {
    banner: Slot,
    update: Slot,
    update_payload: Option<UpdatePayload>,
}

impl MessageCoalescer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request_banner(&mut self) {
        self.banner.trigger();
    }

    /// A newer payload overwrites an unconsumed one: the display only ever
    /// wants the latest state.
    pub fn request_update(&mut self, payload: UpdatePayload) {
        if self.update.state != RequestState::Generating {
            self.update_payload = Some(payload);
        }
        self.update.trigger();
    }

    pub fn state(&self, kind: RequestKind) -> RequestState {
        match kind {
            RequestKind::Banner => self.banner.state,
            RequestKind::Update => self.update.state,
        }
    }

    pub fn is_idle(&self) -> bool {
        self.banner.state == RequestState::Idle && self.update.state == RequestState::Idle
    }

    /// Service both classes once.
    pub fn service<T: Transport>(&mut self, transport: &mut T) {
        self.banner.service(transport, message::banner_frame);

        let payload = &mut self.update_payload;
        self.update.service(transport, || {
            match payload.take() {
                Some(UpdatePayload::Button(events)) => message::button_frame(events),
                Some(UpdatePayload::Setting(setting)) => message::setting_frame(setting),
                Some(UpdatePayload::Echo(bytes)) => message::echo_frame(&bytes),
                // Triggered without a payload: repaint nothing visible.
                None => message::echo_frame(&[]),
            }
        });
    }
}
