//! Host command transport over stdin / stdout.
//!
//! A reader thread forwards stdin bytes into a channel so that
//! [`ByteSource::read_byte`] can honour its timeout.  The link counts as
//! connected until stdin reaches EOF.

use std::io::{self, Read, Write};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::Duration;

use log::warn;

use crate::app::ports::{ByteSource, TextReporter};

pub struct StdioLink {
    rx: Receiver<u8>,
    eof: bool,
}

impl StdioLink {
    /// Spawn the stdin reader.
    pub fn spawn() -> io::Result<Self> {
        let (tx, rx) = mpsc::channel();
        std::thread::Builder::new()
            .name("stdin-reader".into())
            .spawn(move || {
                let stdin = io::stdin();
                for byte in stdin.lock().bytes() {
                    match byte {
                        Ok(b) => {
                            if tx.send(b).is_err() {
                                break;
                            }
                        }
                        Err(e) => {
                            warn!("stdin read failed: {}", e);
                            break;
                        }
                    }
                }
            })?;
        Ok(Self { rx, eof: false })
    }

    /// Whether stdin has closed and every byte has been consumed.
    pub fn at_eof(&self) -> bool {
        self.eof
    }
}

impl ByteSource for StdioLink {
    fn is_connected(&mut self) -> bool {
        !self.eof
    }

    fn read_byte(&mut self, timeout_ms: u32) -> Option<u8> {
        match self.rx.recv_timeout(Duration::from_millis(u64::from(timeout_ms))) {
            Ok(b) => Some(b),
            Err(RecvTimeoutError::Timeout) => None,
            Err(RecvTimeoutError::Disconnected) => {
                self.eof = true;
                None
            }
        }
    }
}

impl TextReporter for StdioLink {
    fn write_line(&mut self, line: &str) {
        let mut out = io::stdout().lock();
        if let Err(e) = writeln!(out, "{line}").and_then(|()| out.flush()) {
            warn!("stdout write failed: {}", e);
        }
    }
}
