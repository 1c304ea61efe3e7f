//! The top-level interpreter: wires every component together and exposes
//! the full external API.

use slog::Logger;

use crate::builtins::{self, is_stateful_builtin, BUILTIN_NAMES};
use crate::error::{RetCode, ShellError};
use crate::history::History;
use crate::input::{InputDecoder, InputEvent};
use crate::line_buffer::LineBuffer;
use crate::logging::null_logger;
use crate::namespace::{CommandTable, HandlerFn, ValueTable};
use crate::pipeline::ExecutionQueue;
use crate::segment::Segment;
use crate::substitution::{expand_alias, expand_variables};
use crate::tokenizer::tokenize;

const DEFAULT_LINE_CAPACITY: usize = 2000;
const DEFAULT_MAX_ARGV: usize = 30;
const DEFAULT_PROMPT: &str = "/>";

pub type OutputFn = Box<dyn FnMut(&str) + Send>;
pub type ReadyFn = Box<dyn FnMut(RetCode) + Send>;
pub type ControlFn = Box<dyn FnMut(u8) + Send>;
pub type PassthroughFn = Box<dyn FnMut(u8) + Send>;
pub type MutexFn = Box<dyn FnMut() + Send>;

/// Builder for an [`Interpreter`], in the same `fn foo(mut self, ...) ->
/// Self` chained style used elsewhere in this codebase for assembling a
/// runtime configuration before construction.
pub struct InterpreterConfig {
    line_capacity: usize,
    max_argv: usize,
    history_capacity: usize,
    prompt: String,
    logger: Logger,
    output: Option<OutputFn>,
}

impl InterpreterConfig {
    pub fn new() -> InterpreterConfig {
        InterpreterConfig {
            line_capacity: DEFAULT_LINE_CAPACITY,
            max_argv: DEFAULT_MAX_ARGV,
            history_capacity: 31,
            prompt: DEFAULT_PROMPT.to_string(),
            logger: null_logger(),
            output: None,
        }
    }

    pub fn line_capacity(mut self, capacity: usize) -> Self {
        self.line_capacity = capacity;
        self
    }

    pub fn max_argv(mut self, max_argv: usize) -> Self {
        self.max_argv = max_argv;
        self
    }

    pub fn history_capacity(mut self, capacity: usize) -> Self {
        self.history_capacity = capacity;
        self
    }

    pub fn prompt(mut self, prompt: &str) -> Self {
        self.prompt = prompt.to_string();
        self
    }

    pub fn logger(mut self, logger: Logger) -> Self {
        self.logger = logger;
        self
    }

    pub fn output(mut self, output: OutputFn) -> Self {
        self.output = Some(output);
        self
    }

    /// Fails if `line_capacity` or `max_argv` is zero, which would leave
    /// the interpreter unable to accept any input. A `history_capacity`
    /// of zero is valid — it disables history rather than erroring.
    pub fn build(self) -> Result<Interpreter, ShellError> {
        if self.line_capacity == 0 {
            return Err(ShellError::ZeroCapacity("line"));
        }
        if self.max_argv == 0 {
            return Err(ShellError::ZeroCapacity("argv"));
        }
        Ok(Interpreter::from_config(self))
    }
}

impl Default for InterpreterConfig {
    fn default() -> InterpreterConfig {
        InterpreterConfig::new()
    }
}

/// The current interpreter lifecycle state, returned by [`Interpreter::state`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum State {
    Editing,
    Executing,
    Freed,
}

/// Tracks an in-progress tab-completion cycle across successive Tab
/// presses, so the second press advances rather than re-querying.
struct CompletionState {
    typed: String,
    candidates: Vec<String>,
    index: usize,
}

pub struct Interpreter {
    logger: Logger,
    line: LineBuffer,
    decoder: InputDecoder,
    history: History,
    commands: CommandTable,
    aliases: ValueTable,
    variables: ValueTable,
    queue: ExecutionQueue,
    max_argv: usize,
    current_argv: Vec<String>,
    completion: Option<CompletionState>,

    output: Option<OutputFn>,
    ready_cb: Option<ReadyFn>,
    ctrl_cb: Option<ControlFn>,
    passthrough_cb: Option<PassthroughFn>,
    mutex_wait: Option<MutexFn>,
    mutex_release: Option<MutexFn>,

    freed: bool,
}

impl std::fmt::Debug for Interpreter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Interpreter").finish_non_exhaustive()
    }
}

impl Interpreter {
    /// Convenience constructor matching the external API's `init`: a
    /// default configuration with only the mandatory output callback set.
    pub fn init(output: OutputFn) -> Interpreter {
        InterpreterConfig::new()
            .output(output)
            .build()
            .expect("default interpreter config always has nonzero capacities")
    }

    fn from_config(config: InterpreterConfig) -> Interpreter {
        let mut commands = CommandTable::new();
        builtins::register_all(&mut commands);
        let mut variables = ValueTable::new();
        variables.set("PS1", &config.prompt);
        variables.set("?", "0");

        let mut history = History::new();
        history.set_max(config.history_capacity);

        Interpreter {
            decoder: InputDecoder::new(config.logger.clone()),
            logger: config.logger,
            line: LineBuffer::new(config.line_capacity),
            history,
            commands,
            aliases: ValueTable::new(),
            variables,
            queue: ExecutionQueue::new(),
            max_argv: config.max_argv,
            current_argv: Vec::new(),
            completion: None,
            output: config.output,
            ready_cb: None,
            ctrl_cb: None,
            passthrough_cb: None,
            mutex_wait: None,
            mutex_release: None,
            freed: false,
        }
    }

    /// Releases all state; subsequent calls become no-ops.
    pub fn free(&mut self) {
        self.freed = true;
    }

    /// Drops every non-builtin command, alias, and variable.
    pub fn reset(&mut self) {
        if self.freed {
            return;
        }
        self.commands.clear_non_builtin(BUILTIN_NAMES);
        self.aliases.clear();
        self.variables.clear();
        self.variables.set("PS1", DEFAULT_PROMPT);
        self.variables.set("?", "0");
        self.history.clear();
    }

    pub fn state(&self) -> State {
        if self.freed {
            State::Freed
        } else if self.queue.is_drained() {
            State::Editing
        } else {
            State::Executing
        }
    }

    // -- configuration setters ------------------------------------------------

    pub fn set_ready_cb(&mut self, cb: ReadyFn) {
        self.ready_cb = Some(cb);
    }

    pub fn out_func(&mut self, cb: OutputFn) {
        self.output = Some(cb);
    }

    pub fn ctrl_func(&mut self, cb: ControlFn) {
        self.ctrl_cb = Some(cb);
    }

    pub fn input_passthrough_func(&mut self, cb: PassthroughFn) {
        self.passthrough_cb = Some(cb);
        self.decoder.set_passthrough(true);
    }

    pub fn clear_passthrough(&mut self) {
        self.passthrough_cb = None;
        self.decoder.set_passthrough(false);
    }

    pub fn mutex_wait_func(&mut self, cb: MutexFn) {
        self.mutex_wait = Some(cb);
    }

    pub fn mutex_release_func(&mut self, cb: MutexFn) {
        self.mutex_release = Some(cb);
    }

    pub fn echo_on(&mut self) {
        self.line.set_echo(true);
    }

    pub fn echo_off(&mut self) {
        self.line.set_echo(false);
    }

    pub fn echo_state(&self) -> bool {
        self.line.echo_on()
    }

    pub fn history_size(&mut self, n: usize) -> usize {
        self.history.set_max(n)
    }

    /// Emits the screen-size query escape; the caller's terminal is
    /// expected to answer with `ESC [ row ; col R`, decoded by the input
    /// decoder into `LINES`/`COLUMNS`.
    pub fn request_screen_size(&mut self) {
        self.raw_output("\x1B[6n");
    }

    // -- command/alias/variable management -----------------------------------

    pub fn add(&mut self, name: &str, handler: HandlerFn, info: &str, man: &str) -> bool {
        if self.freed {
            return false;
        }
        let ok = self.commands.add(name, handler, info, man);
        if !ok {
            warn!(self.logger, "rejected command registration"; "name" => name);
        }
        ok
    }

    pub fn delete(&mut self, name: &str) {
        self.commands.delete(name);
    }

    pub fn alias_add(&mut self, name: &str, value: &str) {
        self.aliases.set(name, value);
    }

    pub fn variable_add(&mut self, name: &str, value: &str) {
        self.variables.set(name, value);
    }

    // -- argv inspection helpers, valid during a handler call ----------------

    pub fn parameter_index(&self, name: &str) -> Option<usize> {
        self.current_argv.iter().position(|a| a == name)
    }

    pub fn parameter_val(&self, index: usize) -> Option<&str> {
        self.current_argv.get(index).map(|s| s.as_str())
    }

    pub fn parameter_int(&self, index: usize) -> Option<i64> {
        self.parameter_val(index)?.parse().ok()
    }

    pub fn parameter_float(&self, index: usize) -> Option<f64> {
        self.parameter_val(index)?.parse().ok()
    }

    pub fn parameter_bool(&self, index: usize) -> Option<bool> {
        match self.parameter_val(index)? {
            "1" | "true" | "on" | "yes" => Some(true),
            "0" | "false" | "off" | "no" => Some(false),
            _ => None,
        }
    }

    /// Parses a `HH:MM:SS` parameter into seconds since midnight.
    pub fn parameter_timestamp(&self, index: usize) -> Option<u32> {
        let v = self.parameter_val(index)?;
        let mut parts = v.splitn(3, ':');
        let h: u32 = parts.next()?.parse().ok()?;
        let m: u32 = parts.next()?.parse().ok()?;
        let s: u32 = parts.next()?.parse().ok()?;
        Some(h * 3600 + m * 60 + s)
    }

    pub fn parameter_last(&self) -> Option<&str> {
        self.current_argv.last().map(|s| s.as_str())
    }

    pub fn has_option(&self, short_or_long: &str) -> bool {
        self.current_argv.iter().any(|a| a == short_or_long)
    }

    // -- output ----------------------------------------------------------------

    fn raw_output(&mut self, text: &str) {
        if let Some(wait) = self.mutex_wait.as_mut() {
            wait();
        }
        if let Some(out) = self.output.as_mut() {
            out(text);
        }
        if let Some(release) = self.mutex_release.as_mut() {
            release();
        }
    }

    /// Handler-facing print: writes `text`, then re-renders the prompt and
    /// in-progress line so a handler's mid-edit output doesn't leave the
    /// line buffer's redraw stale.
    pub fn printf(&mut self, text: &str) {
        self.raw_output(text);
        let prompt = self.variables.get("PS1").unwrap_or(DEFAULT_PROMPT).to_string();
        let redraw = self.line.render(&prompt);
        if !redraw.is_empty() {
            self.raw_output(&String::from_utf8_lossy(&redraw));
        }
    }

    pub fn vprintf(&mut self, parts: &[&str]) {
        let joined = parts.concat();
        self.printf(&joined);
    }

    // -- input -------------------------------------------------------------

    pub fn char_input(&mut self, byte: u8) {
        if self.freed {
            return;
        }
        if self.decoder.passthrough() {
            if let Some(cb) = self.passthrough_cb.as_mut() {
                cb(byte);
            }
            return;
        }
        let event = self.decoder.feed(byte);
        self.handle_event(event);
    }

    fn handle_event(&mut self, event: InputEvent) {
        match event {
            InputEvent::Printable(b) => {
                self.line.insert(b);
                self.redraw();
            }
            InputEvent::Backspace => {
                self.line.backspace();
                self.redraw();
            }
            InputEvent::DeleteForward => {
                self.line.delete_forward();
                self.redraw();
            }
            InputEvent::DeleteWordBack => {
                self.line.delete_word_before_cursor();
                self.redraw();
            }
            InputEvent::CursorLeft => {
                self.line.move_left();
                self.redraw();
            }
            InputEvent::CursorRight => {
                self.line.move_right();
                self.redraw();
            }
            InputEvent::WordLeft => {
                self.line.word_left();
                self.redraw();
            }
            InputEvent::WordRight => {
                self.line.word_right();
                self.redraw();
            }
            InputEvent::Home => {
                self.line.move_home();
                self.redraw();
            }
            InputEvent::End => {
                self.line.move_end();
                self.redraw();
            }
            InputEvent::ToggleOverwrite => {
                self.line.toggle_overwrite();
            }
            InputEvent::Tab => self.complete(false),
            InputEvent::ShiftTab => self.complete(true),
            InputEvent::HistoryPrev => self.history_prev(),
            InputEvent::HistoryNext => self.history_next(),
            InputEvent::HistoryFirst => self.history_first(),
            InputEvent::HistoryLast => self.history_last(),
            InputEvent::CommitLine => self.commit_line(),
            InputEvent::Cancel => {
                self.line.take();
                self.raw_output("\r\n");
                self.queue.clear_pending();
                self.history.reset_cursor();
            }
            InputEvent::ScreenSize { rows, cols } => {
                self.variables.set("LINES", &rows.to_string());
                self.variables.set("COLUMNS", &cols.to_string());
            }
            InputEvent::Control(b) => {
                if let Some(cb) = self.ctrl_cb.as_mut() {
                    cb(b);
                }
            }
            InputEvent::None => {}
        }
    }

    fn redraw(&mut self) {
        let prompt = self.variables.get("PS1").unwrap_or(DEFAULT_PROMPT).to_string();
        let bytes = self.line.render(&prompt);
        if !bytes.is_empty() {
            self.raw_output(&String::from_utf8_lossy(&bytes));
        }
    }

    fn history_prev(&mut self) {
        let current = self.line.as_bytes().to_vec();
        if let Some(text) = self.history.prev(&current) {
            let text = text.to_string();
            self.line.set(text.as_bytes());
            self.redraw();
        }
    }

    fn history_next(&mut self) {
        if let Some(text) = self.history.next() {
            self.line.set(&text);
            self.redraw();
        }
    }

    fn history_first(&mut self) {
        let current = self.line.as_bytes().to_vec();
        if let Some(text) = self.history.first(&current) {
            let text = text.to_string();
            self.line.set(text.as_bytes());
            self.redraw();
        }
    }

    fn history_last(&mut self) {
        let current = self.line.as_bytes().to_vec();
        if let Some(text) = self.history.last(&current) {
            let text = text.to_string();
            self.line.set(text.as_bytes());
            self.redraw();
        }
    }

    /// Tab-completion: cycles through matches in command-table order,
    /// restoring the originally typed text once past the last candidate.
    /// `reverse` selects shift-tab.
    fn complete(&mut self, reverse: bool) {
        let text = String::from_utf8_lossy(self.line.as_bytes()).into_owned();

        let continuing = self
            .completion
            .as_ref()
            .map(|c| text == format!("{} ", c.candidates[c.index]))
            .unwrap_or(false);

        if continuing {
            self.advance_completion(reverse);
            return;
        }

        let head_end = text.find(' ').unwrap_or(text.len());
        if head_end != self.line.cursor() {
            self.completion = None;
            return;
        }
        let prefix = text[..head_end].to_string();
        let candidates: Vec<String> = if let Some(var_prefix) = prefix.strip_prefix('$') {
            self.variables.complete(var_prefix).into_iter().map(|s| format!("${}", s)).collect()
        } else {
            let mut c: Vec<String> = self.commands.complete(&prefix).into_iter().map(String::from).collect();
            c.extend(self.aliases.complete(&prefix).into_iter().map(String::from));
            c
        };
        if candidates.is_empty() {
            self.completion = None;
            return;
        }
        let index = if reverse { candidates.len() - 1 } else { 0 };
        let chosen = candidates[index].clone();
        self.line.set(format!("{} ", chosen).as_bytes());
        self.completion = Some(CompletionState { typed: prefix, candidates, index });
        self.redraw();
    }

    fn advance_completion(&mut self, reverse: bool) {
        let restore = {
            let state = self.completion.as_mut().expect("continuing implies Some");
            if reverse {
                if state.index == 0 {
                    true
                } else {
                    state.index -= 1;
                    false
                }
            } else {
                state.index += 1;
                state.index >= state.candidates.len()
            }
        };
        if restore {
            let typed = self.completion.take().unwrap().typed;
            self.line.set(typed.as_bytes());
        } else {
            let state = self.completion.as_ref().unwrap();
            let chosen = state.candidates[state.index].clone();
            self.line.set(format!("{} ", chosen).as_bytes());
        }
        self.redraw();
    }

    fn commit_line(&mut self) {
        let raw = self.line.take();
        let text = String::from_utf8_lossy(&raw).trim().to_string();
        if self.line.echo_on() {
            self.raw_output("\r\n");
        } else if !text.is_empty() {
            self.raw_output(&text);
            self.raw_output("\r\n");
        }
        if text.is_empty() {
            self.redraw();
            return;
        }
        self.history.push(&text);
        // Leave `_` holding the previous command when the committed line is
        // itself `_`, so repeat-last re-runs that command rather than
        // looping on its own name (`_` dispatching `_` forever).
        if text != "_" {
            self.variables.set("_", &text);
        }
        self.queue.push_line(&text);
        self.drive_queue();
    }

    /// Re-executes the text stored in `_`.
    pub fn exe(&mut self, line: &str) {
        self.queue.push_line(line);
        self.drive_queue();
    }

    /// Drives the execution queue forward until it is empty, a handler
    /// asks to wait (`ExecutingContinue`), or a handler is `Busy` (in
    /// which case the caller is expected to call `next` again later).
    fn drive_queue(&mut self) {
        loop {
            let seg = match self.queue.poll() {
                Some(s) => clone_segment(s),
                None => {
                    self.redraw();
                    return;
                }
            };
            let code = self.dispatch(&seg);
            match code {
                RetCode::Busy => return,
                RetCode::ExecutingContinue => return,
                other => {
                    self.queue.complete(other);
                    self.variables.set("?", &other.code().to_string());
                }
            }
        }
    }

    /// Resumes a deferred (`ExecutingContinue`) or retried (`Busy`)
    /// dispatch with an externally supplied result.
    pub fn ready(&mut self, code: i32) {
        self.queue.complete(RetCode::from_code(code));
        self.variables.set("?", &code.to_string());
        self.drive_queue();
    }

    /// Alias for `ready`, matching the external API's naming for
    /// "drive the queue forward from the ready callback".
    pub fn next(&mut self, code: i32) {
        self.ready(code);
    }

    fn dispatch(&mut self, seg: &Segment) -> RetCode {
        let substituted = expand_variables(&expand_alias(&seg.text, &self.aliases), &self.variables);
        let argv = tokenize(&substituted, self.max_argv);
        if argv.is_empty() {
            return RetCode::Success;
        }
        self.current_argv = argv.clone();
        let name = argv[0].as_str();
        if name == "--help" {
            return RetCode::Success;
        }
        if argv[1..].iter().any(|a| a == "--help") {
            let mut buf = String::new();
            {
                let mut sink = |s: &str| buf.push_str(s);
                self.render_help(&[String::from("help"), name.to_string()], &mut sink);
            }
            self.raw_output(&buf);
            return RetCode::Success;
        }
        if is_stateful_builtin(name) {
            return self.dispatch_stateful(name, &argv);
        }
        let found = self.commands.get(name).map(|entry| (entry.handler, entry.man.clone()));
        match found {
            Some((handler, info)) => {
                let mut buf = String::new();
                let code = {
                    let mut sink = |s: &str| buf.push_str(s);
                    handler(&mut sink, &argv)
                };
                self.raw_output(&buf);
                if code.code() <= RetCode::InvalidParameters.code() && !info.is_empty() {
                    self.raw_output(&info);
                    self.raw_output("\r\n");
                }
                code
            }
            None => {
                self.raw_output(&format!("Command '{}' not found.\r\n", name));
                RetCode::CommandNotFound
            }
        }
    }

    fn dispatch_stateful(&mut self, name: &str, argv: &[String]) -> RetCode {
        let mut buf = String::new();
        let code = {
            let mut sink = |s: &str| buf.push_str(s);
            match name {
                "alias" => builtins::run_alias(&mut self.aliases, argv, &mut sink),
                "unalias" => builtins::run_unalias(&mut self.aliases, argv),
                "set" => builtins::run_set(&mut self.variables, argv, &mut sink),
                "unset" => builtins::run_unset(&mut self.variables, argv),
                "history" => builtins::run_history(&mut self.history, argv, &mut sink),
                "echo" => builtins::run_echo(argv, &mut self.line, &mut sink),
                "_" => {
                    let last = self.variables.get("_").unwrap_or("").to_string();
                    if last.is_empty() {
                        RetCode::NotFound
                    } else {
                        self.queue.push_line(&last);
                        RetCode::Success
                    }
                }
                "help" => {
                    self.render_help(argv, &mut sink);
                    RetCode::Success
                }
                _ => RetCode::HandlerMissing,
            }
        };
        self.raw_output(&buf);
        code
    }

    fn render_help(&self, argv: &[String], out: &mut dyn FnMut(&str)) {
        if argv.len() > 1 {
            match self.commands.get(&argv[1]) {
                Some(entry) => out(&format!("{}\r\n", entry.man)),
                None => out(&format!("no such command: {}\r\n", argv[1])),
            }
            return;
        }
        for entry in self.commands.iter() {
            out(&format!("{:<12} {}\r\n", entry.name, entry.info));
        }
    }
}

fn clone_segment(seg: &Segment) -> Segment {
    Segment { text: seg.text.clone(), joined_by: seg.joined_by }
}


#[cfg(test)]
impl Interpreter {
    fn variable_value(&self, name: &str) -> &str {
        self.variables.get(name).unwrap_or("")
    }
}
