#[macro_use]
extern crate bitflags;
#[macro_use]
extern crate slog;
extern crate sloggers;

mod builtins;
mod error;
pub mod global;
mod history;
mod input;
mod interpreter;
mod line_buffer;
mod logging;
mod namespace;
mod pipeline;
mod segment;
mod substitution;
mod tokenizer;

pub use error::{RetCode, ShellError};
pub use global as shell;
pub use interpreter::{Interpreter, InterpreterConfig, State};
pub use logging::{null_logger, terminal_logger};
pub use namespace::HandlerFn;
