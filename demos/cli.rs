//! Minimal stdin/stdout driver wiring `Interpreter` to a real terminal.
//! Illustrative only — not part of the crate's public contract.

extern crate cmdline_shell;
extern crate sloggers;
extern crate termion;

use std::io::{self, Read, Write};

use cmdline_shell::{terminal_logger, InterpreterConfig};
use sloggers::types::Severity;
use termion::raw::IntoRawMode;

fn main() -> io::Result<()> {
    let mut raw = io::stdout().into_raw_mode()?;

    let mut interp = InterpreterConfig::new()
        .prompt("demo> ")
        .logger(terminal_logger(Severity::Warning))
        .output(Box::new(move |s: &str| {
            let _ = raw.write_all(s.as_bytes());
            let _ = raw.flush();
        }))
        .build()
        .expect("fixed demo config always has nonzero capacities");

    let mut stdin = io::stdin();
    let mut byte = [0u8; 1];
    loop {
        match stdin.read(&mut byte) {
            Ok(0) => break,
            Ok(_) => interp.char_input(byte[0]),
            Err(e) => return Err(e),
        }
    }
    Ok(())
}
