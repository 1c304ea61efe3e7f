//! A single process-wide interpreter instance, for embedders porting call
//! sites directly from a C-style `cmd_*` API rather than holding an
//! explicit [`crate::Interpreter`] handle.
//!
//! There is no `lazy_static`/`once_cell` in this crate's dependency set,
//! so the instance lives behind a plain `Mutex<Option<Interpreter>>`
//! guarded by the caller calling [`init`] first; every other entry point
//! is a no-op before that.

use std::sync::Mutex;

use crate::error::ShellError;
use crate::interpreter::{Interpreter, InterpreterConfig, OutputFn};
use crate::namespace::HandlerFn;

static INSTANCE: Mutex<Option<Interpreter>> = Mutex::new(None);

fn with_instance<F, R>(default: R, f: F) -> R
where
    F: FnOnce(&mut Interpreter) -> R,
{
    let mut guard = INSTANCE.lock().expect("cmdline instance mutex poisoned");
    match guard.as_mut() {
        Some(interp) => f(interp),
        None => default,
    }
}

pub fn init(output: OutputFn) {
    let mut guard = INSTANCE.lock().expect("cmdline instance mutex poisoned");
    *guard = Some(Interpreter::init(output));
}

pub fn free() {
    let mut guard = INSTANCE.lock().expect("cmdline instance mutex poisoned");
    *guard = None;
}

pub fn reset() {
    with_instance((), |i| i.reset());
}

pub fn char_input(byte: u8) {
    with_instance((), |i| i.char_input(byte));
}

pub fn exe(line: &str) {
    with_instance((), |i| i.exe(line));
}

pub fn ready(code: i32) {
    with_instance((), |i| i.ready(code));
}

pub fn next(code: i32) {
    with_instance((), |i| i.next(code));
}

pub fn add(name: &str, handler: HandlerFn, info: &str, man: &str) -> bool {
    with_instance(false, |i| i.add(name, handler, info, man))
}

pub fn delete(name: &str) {
    with_instance((), |i| i.delete(name));
}

pub fn alias_add(name: &str, value: &str) {
    with_instance((), |i| i.alias_add(name, value));
}

pub fn variable_add(name: &str, value: &str) {
    with_instance((), |i| i.variable_add(name, value));
}

pub fn echo_on() {
    with_instance((), |i| i.echo_on());
}

pub fn echo_off() {
    with_instance((), |i| i.echo_off());
}

pub fn history_size(n: usize) -> usize {
    with_instance(0, |i| i.history_size(n))
}

/// Replaces the process-wide instance with one built from `config`,
/// for embedders that need non-default capacities or a logger before
/// falling back to the plain `init`/`free`/... call sites above.
pub fn init_with_config(config: InterpreterConfig) -> Result<(), ShellError> {
    let interp = config.build()?;
    let mut guard = INSTANCE.lock().expect("cmdline instance mutex poisoned");
    *guard = Some(interp);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn init_free_are_idempotent_no_ops_around_use() {
        let count = Arc::new(AtomicUsize::new(0));
        let c = count.clone();
        init(Box::new(move |_s: &str| {
            c.fetch_add(1, Ordering::SeqCst);
        }));
        char_input(b'a');
        free();
        // after free, further calls are no-ops rather than panics
        char_input(b'b');
        reset();
    }
}
