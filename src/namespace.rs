//! Name-keyed tables for commands, aliases, and variables.
//!
//! All three keep insertion order in a `Vec` rather than a `HashMap`: the
//! tables are small (a handful to a few dozen entries on an embedded
//! target) and `help`/`alias`/`set` all want to list entries in a stable,
//! predictable order.

use crate::error::RetCode;

pub type HandlerFn = fn(&mut dyn FnMut(&str), &[String]) -> RetCode;

pub struct CommandEntry {
    pub name: String,
    pub handler: HandlerFn,
    pub info: String,
    pub man: String,
}

#[derive(Default)]
pub struct CommandTable {
    entries: Vec<CommandEntry>,
}

impl CommandTable {
    pub fn new() -> CommandTable {
        CommandTable { entries: Vec::new() }
    }

    /// Registers or replaces a command. Rejects empty names silently
    /// (the caller is expected to log).
    pub fn add(&mut self, name: &str, handler: HandlerFn, info: &str, man: &str) -> bool {
        if name.is_empty() {
            return false;
        }
        if let Some(existing) = self.entries.iter_mut().find(|e| e.name == name) {
            existing.handler = handler;
            existing.info = info.to_string();
            existing.man = man.to_string();
            return true;
        }
        self.entries.push(CommandEntry {
            name: name.to_string(),
            handler,
            info: info.to_string(),
            man: man.to_string(),
        });
        true
    }

    /// No-op if `name` is unregistered.
    pub fn delete(&mut self, name: &str) {
        self.entries.retain(|e| e.name != name);
    }

    pub fn get(&self, name: &str) -> Option<&CommandEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CommandEntry> {
        self.entries.iter()
    }

    /// Names beginning with `prefix`, in table order.
    pub fn complete(&self, prefix: &str) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|e| e.name.starts_with(prefix))
            .map(|e| e.name.as_str())
            .collect()
    }

    pub fn clear_non_builtin(&mut self, builtin_names: &[&str]) {
        self.entries.retain(|e| builtin_names.contains(&e.name.as_str()));
    }
}

/// A plain name -> value table, shared shape for aliases and variables.
#[derive(Default)]
pub struct ValueTable {
    entries: Vec<(String, String)>,
}

impl ValueTable {
    pub fn new() -> ValueTable {
        ValueTable { entries: Vec::new() }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, v)| v.as_str())
    }

    /// Setting an empty value deletes the entry, matching the
    /// programmatic `alias_add`/`variable_add` contract.
    pub fn set(&mut self, name: &str, value: &str) {
        if value.is_empty() {
            self.entries.retain(|(n, _)| n != name);
            return;
        }
        if let Some(entry) = self.entries.iter_mut().find(|(n, _)| n == name) {
            entry.1 = value.to_string();
        } else {
            self.entries.push((name.to_string(), value.to_string()));
        }
    }

    pub fn delete(&mut self, name: &str) {
        self.entries.retain(|(n, _)| n != name);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn complete(&self, prefix: &str) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|(n, _)| n.starts_with(prefix))
            .map(|(n, _)| n.as_str())
            .collect()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
