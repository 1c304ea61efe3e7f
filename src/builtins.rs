//! The built-in commands every interpreter instance registers up front.

use crate::error::RetCode;
use crate::line_buffer::LineBuffer;
use crate::namespace::{CommandTable, ValueTable};

pub const BUILTIN_NAMES: &[&str] =
    &["help", "echo", "alias", "unalias", "set", "unset", "true", "false", "history", "clear", "_"];

pub fn register_all(table: &mut CommandTable) {
    table.add("help", help, "list commands or show one's manual", "help [name]");
    table.add("echo", echo, "print arguments", "echo [-on|-off|text...]");
    table.add("alias", alias, "list, set, or delete an alias", "alias [name [value]]");
    table.add("unalias", unalias, "delete an alias", "unalias name");
    table.add("set", set, "list or set a variable", "set [name[=value]]");
    table.add("unset", unset, "delete a variable", "unset name");
    table.add("true", cmd_true, "always succeeds", "true");
    table.add("false", cmd_false, "always fails", "false");
    table.add("history", history, "list or clear history", "history [clear]");
    table.add("clear", clear, "clear the screen", "clear");
    table.add("_", repeat_last, "re-run the last command", "_");
}

fn help(out: &mut dyn FnMut(&str), _argv: &[String]) -> RetCode {
    // The real listing is produced by Interpreter::render_help, which has
    // access to the live CommandTable; `help` itself and a trailing
    // `--help` on any command are both intercepted in Interpreter::dispatch
    // before this bare handler is ever reached.
    out("use `help` from the interpreter, not the bare handler\r\n");
    RetCode::NotImplemented
}

fn echo(out: &mut dyn FnMut(&str), argv: &[String]) -> RetCode {
    let joined = argv[1..].join(" ");
    out(&joined);
    out(" \r\n");
    RetCode::Success
}

fn alias(_out: &mut dyn FnMut(&str), _argv: &[String]) -> RetCode {
    RetCode::NotImplemented
}

fn unalias(_out: &mut dyn FnMut(&str), _argv: &[String]) -> RetCode {
    RetCode::NotImplemented
}

fn set(_out: &mut dyn FnMut(&str), _argv: &[String]) -> RetCode {
    RetCode::NotImplemented
}

fn unset(_out: &mut dyn FnMut(&str), _argv: &[String]) -> RetCode {
    RetCode::NotImplemented
}

fn cmd_true(_out: &mut dyn FnMut(&str), _argv: &[String]) -> RetCode {
    RetCode::Success
}

fn cmd_false(_out: &mut dyn FnMut(&str), _argv: &[String]) -> RetCode {
    RetCode::Fail
}

fn history(_out: &mut dyn FnMut(&str), _argv: &[String]) -> RetCode {
    RetCode::NotImplemented
}

fn clear(out: &mut dyn FnMut(&str), _argv: &[String]) -> RetCode {
    out("\x1B[2J\x1B[H");
    RetCode::Success
}

fn repeat_last(_out: &mut dyn FnMut(&str), _argv: &[String]) -> RetCode {
    RetCode::NotImplemented
}

/// Built-ins whose behavior needs direct access to the interpreter's
/// tables (`alias`, `unalias`, `set`, `unset`, `history`, `_`, `help`) or
/// to the line buffer's echo flag (`echo -on`/`-off`) are implemented
/// here instead of as bare `HandlerFn`s, and are recognized by name in
/// `Interpreter::dispatch` before the command table lookup. The entries
/// registered above exist so they still show up in `help`'s listing and
/// so a stray direct call degrades to `NotImplemented` rather than
/// `CommandNotFound`.
pub fn is_stateful_builtin(name: &str) -> bool {
    matches!(name, "alias" | "unalias" | "set" | "unset" | "history" | "_" | "help" | "echo")
}

/// `echo -on`/`-off` toggles line echoing; anything else is printed
/// verbatim with a trailing space, same as the bare `echo` handler.
pub fn run_echo(argv: &[String], line: &mut LineBuffer, out: &mut dyn FnMut(&str)) -> RetCode {
    match argv.get(1).map(String::as_str) {
        Some("-on") => {
            line.set_echo(true);
            RetCode::Success
        }
        Some("-off") => {
            line.set_echo(false);
            RetCode::Success
        }
        _ => {
            out(&argv[1..].join(" "));
            out(" \r\n");
            RetCode::Success
        }
    }
}

pub fn run_alias(aliases: &mut ValueTable, argv: &[String], out: &mut dyn FnMut(&str)) -> RetCode {
    match argv.len() {
        1 => {
            for (name, value) in aliases.iter() {
                out(&format!("{}='{}'\r\n", name, value));
            }
            RetCode::Success
        }
        2 => {
            aliases.delete(&argv[1]);
            RetCode::Success
        }
        _ => {
            let value = argv[2..].join(" ");
            aliases.set(&argv[1], &value);
            RetCode::Success
        }
    }
}

pub fn run_unalias(aliases: &mut ValueTable, argv: &[String]) -> RetCode {
    if argv.len() != 2 {
        return RetCode::InvalidParameters;
    }
    aliases.delete(&argv[1]);
    RetCode::Success
}

pub fn run_set(variables: &mut ValueTable, argv: &[String], out: &mut dyn FnMut(&str)) -> RetCode {
    match argv.len() {
        1 => {
            for (name, value) in variables.iter() {
                out(&format!("{}={}\r\n", name, value));
            }
            RetCode::Success
        }
        2 => {
            if let Some(eq) = argv[1].find('=') {
                let (name, value) = argv[1].split_at(eq);
                variables.set(name, &value[1..]);
            } else {
                out("usage: set name=value\r\n");
                return RetCode::InvalidParameters;
            }
            RetCode::Success
        }
        _ => {
            let value = argv[2..].join(" ");
            variables.set(&argv[1], &value);
            RetCode::Success
        }
    }
}

pub fn run_unset(variables: &mut ValueTable, argv: &[String]) -> RetCode {
    if argv.len() != 2 {
        return RetCode::InvalidParameters;
    }
    variables.delete(&argv[1]);
    RetCode::Success
}

pub fn run_history(history: &mut crate::history::History, argv: &[String], out: &mut dyn FnMut(&str)) -> RetCode {
    if argv.len() == 2 && argv[1] == "clear" {
        history.clear();
        return RetCode::Success;
    }
    for (i, entry) in history.iter().enumerate() {
        out(&format!("[{}]: {}\r\n", i, entry));
    }
    RetCode::Success
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn echo_joins_with_trailing_space() {
        let mut captured = String::new();
        let mut sink = |s: &str| captured.push_str(s);
        assert_eq!(echo(&mut sink, &["echo".into(), "Hi!".into()]), RetCode::Success);
        assert_eq!(captured, "Hi! \r\n");
    }

    #[test]
    fn true_and_false_return_fixed_codes() {
        let mut sink = |_: &str| {};
        assert_eq!(cmd_true(&mut sink, &[]), RetCode::Success);
        assert_eq!(cmd_false(&mut sink, &[]), RetCode::Fail);
    }

    #[test]
    fn alias_set_list_delete_round_trip() {
        let mut aliases = ValueTable::new();
        let mut sink = |_: &str| {};
        run_alias(&mut aliases, &["alias".into(), "p".into(), "echo".into()], &mut sink);
        assert_eq!(aliases.get("p"), Some("echo"));
        run_alias(&mut aliases, &["alias".into(), "p".into()], &mut sink);
        assert_eq!(aliases.get("p"), None);
    }

    #[test]
    fn set_rejects_bare_name_without_equals_or_value() {
        let mut vars = ValueTable::new();
        let mut sink = |_: &str| {};
        assert_eq!(run_set(&mut vars, &["set".into(), "foo".into()], &mut sink), RetCode::InvalidParameters);
    }

    #[test]
    fn history_clear_empties_ring() {
        let mut h = crate::history::History::new();
        h.push("ls");
        let mut sink = |_: &str| {};
        run_history(&mut h, &["history".into(), "clear".into()], &mut sink);
        assert_eq!(h.len(), 0);
    }

    #[test]
    fn run_echo_toggles_line_echo_without_printing() {
        let mut line = LineBuffer::new(64);
        let mut captured = String::new();
        assert!(line.echo_on());
        {
            let mut sink = |s: &str| captured.push_str(s);
            assert_eq!(run_echo(&["echo".into(), "-off".into()], &mut line, &mut sink), RetCode::Success);
        }
        assert!(!line.echo_on());
        assert!(captured.is_empty());
        {
            let mut sink = |s: &str| captured.push_str(s);
            assert_eq!(run_echo(&["echo".into(), "-on".into()], &mut line, &mut sink), RetCode::Success);
        }
        assert!(line.echo_on());
    }

    #[test]
    fn run_echo_prints_text_with_trailing_space() {
        let mut line = LineBuffer::new(64);
        let mut captured = String::new();
        let mut sink = |s: &str| captured.push_str(s);
        run_echo(&["echo".into(), "Hi!".into()], &mut line, &mut sink);
        assert_eq!(captured, "Hi! \r\n");
    }
}
