//! Two independent substitution passes run over a segment before
//! tokenization: alias expansion at the head of the line, then variable
//! expansion (`$name`) anywhere in the line.

use crate::namespace::ValueTable;

/// Replaces the first whitespace-delimited word with its alias value, if
/// one is registered. Performed once — an alias value starting with
/// another alias name does not recurse.
pub fn expand_alias(line: &str, aliases: &ValueTable) -> String {
    let trimmed = line.trim_start();
    let head_len = trimmed.find(|c: char| c == ' ' || c == '\t').unwrap_or(trimmed.len());
    let (head, rest) = trimmed.split_at(head_len);
    match aliases.get(head) {
        Some(value) => format!("{}{}", value, rest),
        None => line.to_string(),
    }
}

/// Replaces every `$name` (name = `[A-Za-z_][A-Za-z0-9_]*`) with the
/// variable's value, or leaves it literal if unset.
pub fn expand_variables(line: &str, variables: &ValueTable) -> String {
    let bytes = line.as_bytes();
    let mut out = String::with_capacity(line.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'$' && i + 1 < bytes.len() && is_name_start(bytes[i + 1]) {
            let start = i + 1;
            let mut end = start;
            while end < bytes.len() && is_name_continue(bytes[end]) {
                end += 1;
            }
            let name = &line[start..end];
            match variables.get(name) {
                Some(value) => out.push_str(value),
                None => {
                    out.push('$');
                    out.push_str(name);
                }
            }
            i = end;
        } else {
            out.push(bytes[i] as char);
            i += 1;
        }
    }
    out
}

fn is_name_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_'
}

fn is_name_continue(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn alias_replaces_head_word_only() {
        let mut aliases = ValueTable::new();
        aliases.set("p", "echo");
        assert_eq!(expand_alias("p toimii", &aliases), "echo toimii");
        assert_eq!(expand_alias("echo p", &aliases), "echo p");
    }

    #[test]
    fn alias_does_not_recurse() {
        let mut aliases = ValueTable::new();
        aliases.set("a", "b hello");
        aliases.set("b", "echo");
        assert_eq!(expand_alias("a", &aliases), "b hello");
    }

    #[test]
    fn variable_expansion_round_trips() {
        let mut vars = ValueTable::new();
        vars.set("foo", "hello world");
        assert_eq!(expand_variables("echo $foo", &vars), "echo hello world");
    }

    #[test]
    fn unset_variable_left_literal() {
        let vars = ValueTable::new();
        assert_eq!(expand_variables("echo $missing", &vars), "echo $missing");
    }

    #[test]
    fn variable_used_at_expansion_time_not_definition_time() {
        let mut vars = ValueTable::new();
        let mut aliases = ValueTable::new();
        aliases.set("p", "echo $foo");
        vars.set("foo", "first");
        let expanded = expand_variables(&expand_alias("p", &aliases), &vars);
        assert_eq!(expanded, "echo first");
        vars.set("foo", "second");
        let expanded_again = expand_variables(&expand_alias("p", &aliases), &vars);
        assert_eq!(expanded_again, "echo second");
    }

    proptest! {
        #[test]
        fn variable_value_round_trips(name in "[A-Za-z_][A-Za-z0-9_]{0,8}", value in "[A-Za-z0-9 ]{0,16}") {
            let mut vars = ValueTable::new();
            vars.set(&name, &value);
            if value.is_empty() {
                prop_assert_eq!(expand_variables(&format!("${}", name), &vars), format!("${}", name));
            } else {
                prop_assert_eq!(expand_variables(&format!("${}", name), &vars), value);
            }
        }
    }
}
