//! Byte-level input decoder.
//!
//! Unlike a general-purpose VT parser (built to decode the *outgoing*
//! terminal control repertoire: SGR, DCS, OSC, scroll regions), this
//! state machine decodes a handful of *incoming* keystroke sequences —
//! arrow keys, Home/End, a screen-size response — with parameters
//! accumulated across up to four `;`-separated slots. The surface is
//! small and specific enough that hand-rolling it is simpler and more
//! faithful than bending a rendering-oriented parser to the opposite
//! direction.

use slog::Logger;

const MAX_PARAMS: usize = 4;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Mode {
    Ground,
    Esc,
    Csi,
}

/// A logical event produced by feeding bytes through [`InputDecoder`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InputEvent {
    Printable(u8),
    Backspace,
    Tab,
    ShiftTab,
    CommitLine,
    Cancel,
    DeleteWordBack,
    CursorLeft,
    CursorRight,
    WordLeft,
    WordRight,
    HistoryPrev,
    HistoryNext,
    HistoryFirst,
    HistoryLast,
    Home,
    End,
    ToggleOverwrite,
    DeleteForward,
    ScreenSize { rows: u32, cols: u32 },
    Control(u8),
    /// Nothing observable happened (mid-sequence, or a dropped sequence).
    None,
}

/// Decodes a stream of input bytes into [`InputEvent`]s.
pub struct InputDecoder {
    mode: Mode,
    params: [u32; MAX_PARAMS],
    param_count: usize,
    saw_digit: bool,
    passthrough: bool,
    just_committed_cr: bool,
    logger: Logger,
}

impl InputDecoder {
    pub fn new(logger: Logger) -> InputDecoder {
        InputDecoder {
            mode: Mode::Ground,
            params: [0; MAX_PARAMS],
            param_count: 0,
            saw_digit: false,
            passthrough: false,
            just_committed_cr: false,
            logger,
        }
    }

    pub fn set_passthrough(&mut self, on: bool) {
        self.passthrough = on;
        if on {
            self.mode = Mode::Ground;
        }
    }

    pub fn passthrough(&self) -> bool {
        self.passthrough
    }

    fn reset_params(&mut self) {
        self.params = [0; MAX_PARAMS];
        self.param_count = 0;
        self.saw_digit = false;
    }

    fn current_param(&self) -> u32 {
        if self.param_count == 0 {
            0
        } else {
            self.params[self.param_count - 1]
        }
    }

    pub fn feed(&mut self, byte: u8) -> InputEvent {
        let was_cr = self.just_committed_cr;
        self.just_committed_cr = false;
        match self.mode {
            Mode::Ground => self.feed_ground(byte, was_cr),
            Mode::Esc => self.feed_esc(byte),
            Mode::Csi => self.feed_csi(byte),
        }
    }

    fn feed_ground(&mut self, byte: u8, was_cr: bool) -> InputEvent {
        match byte {
            b'\r' => {
                self.just_committed_cr = true;
                InputEvent::CommitLine
            }
            b'\n' => {
                if was_cr {
                    InputEvent::None
                } else {
                    InputEvent::CommitLine
                }
            }
            0x7F => InputEvent::Backspace,
            b'\t' => InputEvent::Tab,
            0x03 => InputEvent::Cancel,
            0x04 | 0x17 => InputEvent::DeleteWordBack,
            0x1B => {
                self.mode = Mode::Esc;
                InputEvent::None
            }
            0x20..=0x7E => InputEvent::Printable(byte),
            other => {
                trace!(self.logger, "forwarding control byte"; "byte" => other);
                InputEvent::Control(other)
            }
        }
    }

    fn feed_esc(&mut self, byte: u8) -> InputEvent {
        match byte {
            b'[' | b'O' => {
                self.mode = Mode::Csi;
                self.reset_params();
                InputEvent::None
            }
            _ => {
                trace!(self.logger, "dropping unrecognized escape pair"; "byte" => byte);
                self.mode = Mode::Ground;
                InputEvent::None
            }
        }
    }

    fn feed_csi(&mut self, byte: u8) -> InputEvent {
        match byte {
            b'0'..=b'9' => {
                if self.param_count == 0 {
                    self.param_count = 1;
                }
                let idx = self.param_count - 1;
                if idx < MAX_PARAMS {
                    self.params[idx] = self.params[idx].saturating_mul(10).saturating_add((byte - b'0') as u32);
                }
                self.saw_digit = true;
                InputEvent::None
            }
            b';' => {
                if self.param_count < MAX_PARAMS {
                    self.param_count += 1;
                }
                InputEvent::None
            }
            final_byte => {
                let ev = self.dispatch_csi(final_byte);
                self.mode = Mode::Ground;
                self.reset_params();
                ev
            }
        }
    }

    fn dispatch_csi(&self, final_byte: u8) -> InputEvent {
        match final_byte {
            b'A' => InputEvent::HistoryPrev,
            b'B' => InputEvent::HistoryNext,
            b'C' => InputEvent::CursorRight,
            b'D' => InputEvent::CursorLeft,
            b'b' => InputEvent::WordLeft,
            b'f' => InputEvent::WordRight,
            b'Z' => InputEvent::ShiftTab,
            b'H' => InputEvent::Home,
            b'F' => InputEvent::End,
            b'R' => {
                if self.param_count >= 2 {
                    InputEvent::ScreenSize { rows: self.params[0], cols: self.params[1] }
                } else {
                    trace!(self.logger, "screen size response missing parameters");
                    InputEvent::None
                }
            }
            b'~' => match self.current_param() {
                1 => InputEvent::Home,
                2 => InputEvent::ToggleOverwrite,
                3 => InputEvent::DeleteForward,
                5 => InputEvent::HistoryFirst,
                6 => InputEvent::HistoryLast,
                other => {
                    trace!(self.logger, "dropping unknown CSI ~ sequence"; "param" => other);
                    InputEvent::None
                }
            },
            other => {
                trace!(self.logger, "dropping unhandled CSI final byte"; "byte" => other);
                InputEvent::None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::null_logger;

    fn decoder() -> InputDecoder {
        InputDecoder::new(null_logger())
    }

    #[test]
    fn printable_passes_through() {
        let mut d = decoder();
        assert_eq!(d.feed(b'a'), InputEvent::Printable(b'a'));
    }

    #[test]
    fn cr_lf_pair_commits_once() {
        let mut d = decoder();
        assert_eq!(d.feed(b'\r'), InputEvent::CommitLine);
        assert_eq!(d.feed(b'\n'), InputEvent::None);
    }

    #[test]
    fn lone_lf_commits() {
        let mut d = decoder();
        assert_eq!(d.feed(b'\n'), InputEvent::CommitLine);
    }

    #[test]
    fn arrow_up_sequence() {
        let mut d = decoder();
        assert_eq!(d.feed(0x1B), InputEvent::None);
        assert_eq!(d.feed(b'['), InputEvent::None);
        assert_eq!(d.feed(b'A'), InputEvent::HistoryPrev);
    }

    #[test]
    fn home_via_tilde_with_param() {
        let mut d = decoder();
        d.feed(0x1B);
        d.feed(b'[');
        d.feed(b'1');
        assert_eq!(d.feed(b'~'), InputEvent::Home);
    }

    #[test]
    fn screen_size_response() {
        let mut d = decoder();
        d.feed(0x1B);
        d.feed(b'[');
        for b in b"24" {
            d.feed(*b);
        }
        d.feed(b';');
        for b in b"80" {
            d.feed(*b);
        }
        assert_eq!(d.feed(b'R'), InputEvent::ScreenSize { rows: 24, cols: 80 });
    }

    #[test]
    fn unknown_escape_pair_returns_to_ground() {
        let mut d = decoder();
        d.feed(0x1B);
        d.feed(b'Q');
        assert_eq!(d.feed(b'a'), InputEvent::Printable(b'a'));
    }

    #[test]
    fn unknown_csi_final_is_dropped_and_resets() {
        let mut d = decoder();
        d.feed(0x1B);
        d.feed(b'[');
        assert_eq!(d.feed(b'!'), InputEvent::None);
        assert_eq!(d.feed(b'x'), InputEvent::Printable(b'x'));
    }
}
