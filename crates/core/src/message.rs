// NanoLoop - Board Control Core & Simulation Bench
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

//! Terminal message rendering.
//!
//! The terminal layout is fixed: the banner paints rows 1-12, the button
//! state lives at row 11 column 19, the blink setting at row 12 column 16.
//! Everything after the banner is cursor-addressed repaints of those two
//! cells.

use crate::button::ButtonEvents;
use crate::transport::{TxFrame, TxSegment};

/// CSI 0m (reset attributes), 2J (clear screen), 1;1H (home).
const TERM_RESET_HOME: &[u8] = b"\x1b[0m\x1b[2J\x1b[1;1H";
/// Cursor to the button-state cell.
const CUP_BUTTON: &[u8] = b"\x1b[11;19H";
/// Cursor to the button-state cell, then erase to end of line.
const ERASE_KEY_LINE: &[u8] = b"\x1b[11;19H\x1b[0K";
/// Park the cursor inside the setting brackets when idle.
const CUP_IDLE: &[u8] = b"\x1b[12;17H";
/// Cursor to the setting cell.
const CUP_SETTING: &[u8] = b"\x1b[12;16H";

/// Received control byte that forces a full repaint.
pub const CTRL_E: u8 = 0x05;

const BANNER_BODY: &[u8] = b"\
+--------------------------------------------------------------------+\r\n\
| NanoLoop: Curiosity Nano board control core                        |\r\n\
| Keystroke hexdump & blink-setting demo terminal                    |\r\n\
|                                                                    |\r\n\
| Firmware: nanoloop demo application                                |\r\n\
|                                                                    |\r\n\
| Author:  Andrii Shylenko                                           |\r\n\
| Date:    07 Aug 2026                                               |\r\n\
+--------------------------------------------------------------------+\r\n\
\r\n\
On-board button: [Released]\r\n\
Blink Setting: [   OFF  ]\r\n";

const BUTTON_PRESSED: &[u8] = b"Pressed] ";
const BUTTON_RELEASED: &[u8] = b"Released]";

/// The bounded blink-rate setting shown on row 12.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BlinkSetting {
    #[default]
    Off,
    On,
    Slow,
    Medium,
    Fast,
}

impl BlinkSetting {
    /// Saturates at `Fast`.
    pub fn increase(self) -> Self {
        match self {
            BlinkSetting::Off => BlinkSetting::On,
            BlinkSetting::On => BlinkSetting::Slow,
            BlinkSetting::Slow => BlinkSetting::Medium,
            BlinkSetting::Medium | BlinkSetting::Fast => BlinkSetting::Fast,
        }
    }

    /// Saturates at `Off`.
    pub fn decrease(self) -> Self {
        match self {
            BlinkSetting::Fast => BlinkSetting::Medium,
            BlinkSetting::Medium => BlinkSetting::Slow,
            BlinkSetting::Slow => BlinkSetting::On,
            BlinkSetting::On | BlinkSetting::Off => BlinkSetting::Off,
        }
    }

    pub fn label(self) -> &'static [u8] {
        match self {
            BlinkSetting::Off => b"[   OFF  ]\r\n",
            BlinkSetting::On => b"[   ON   ]\r\n",
            BlinkSetting::Slow => b"[  SLOW  ]\r\n",
            BlinkSetting::Medium => b"[ MEDIUM ]\r\n",
            BlinkSetting::Fast => b"[  FAST  ]\r\n",
        }
    }
}

pub fn banner_frame() -> TxFrame {
    let mut frame = TxFrame::new();
    frame.push(TxSegment::Static(TERM_RESET_HOME));
    frame.push(TxSegment::Static(BANNER_BODY));
    frame
}

pub fn button_frame(events: ButtonEvents) -> TxFrame {
    let mut frame = TxFrame::new();
    frame.push(TxSegment::Static(CUP_BUTTON));
    if events.contains(ButtonEvents::PRESS) {
        frame.push(TxSegment::Static(BUTTON_PRESSED));
    } else {
        frame.push(TxSegment::Static(BUTTON_RELEASED));
    }
    frame
}

pub fn setting_frame(setting: BlinkSetting) -> TxFrame {
    let mut frame = TxFrame::new();
    frame.push(TxSegment::Static(CUP_SETTING));
    frame.push(TxSegment::Static(setting.label()));
    frame
}

/// Echo the received packet as a hex dump on the keypress line.
pub fn echo_frame(payload: &[u8]) -> TxFrame {
    let mut frame = TxFrame::new();
    frame.push(TxSegment::Static(ERASE_KEY_LINE));

    if payload.is_empty() {
        frame.push(TxSegment::Static(b"<None> "));
    } else {
        let mut dump = Vec::with_capacity(payload.len() * 3);
        for byte in payload {
            dump.extend_from_slice(format!("{byte:02X} ").as_bytes());
        }
        frame.push(TxSegment::Owned(dump));
    }

    frame.push(TxSegment::Static(CUP_IDLE));
    frame
}
