//! Quote- and escape-aware tokenizer.

const DEFAULT_MAX_ARGV: usize = 30;

/// Splits `line` into argv, honoring quoting and backslash escapes.
/// Argv entries beyond `max_argv` are silently dropped.
pub fn tokenize(line: &str, max_argv: usize) -> Vec<String> {
    let bytes = line.as_bytes();
    let mut argv = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        while i < bytes.len() && (bytes[i] == b' ' || bytes[i] == b'\t') {
            i += 1;
        }
        if i >= bytes.len() {
            break;
        }
        let (token, next) = scan_token(bytes, i);
        if argv.len() < max_argv {
            argv.push(token);
        }
        i = next;
    }
    argv
}

pub fn tokenize_default(line: &str) -> Vec<String> {
    tokenize(line, DEFAULT_MAX_ARGV)
}

/// Scans one token starting at `start` (not whitespace). Returns the
/// decoded token text and the index just past it.
fn scan_token(bytes: &[u8], start: usize) -> (String, usize) {
    let mut out = Vec::new();
    let mut i = start;
    while i < bytes.len() && bytes[i] != b' ' && bytes[i] != b'\t' {
        match bytes[i] {
            quote @ (b'"' | b'\'') => {
                let (span, next, closed) = scan_quoted(bytes, i + 1, quote);
                if closed {
                    out.extend_from_slice(&span);
                    i = next;
                } else {
                    // Mismatched quote: retain the opening quote literally
                    // and the rest of the token as-is.
                    out.push(quote);
                    out.extend_from_slice(&span);
                    i = next;
                }
            }
            b'\\' if i + 1 < bytes.len() && (bytes[i + 1] == b'"' || bytes[i + 1] == b'\\') => {
                out.push(bytes[i + 1]);
                i += 2;
            }
            other => {
                out.push(other);
                i += 1;
            }
        }
    }
    (String::from_utf8_lossy(&out).into_owned(), i)
}

/// Scans the interior of a quoted span starting just after the opening
/// quote. Returns the decoded bytes, the index past the span (either just
/// after the closing quote, or end-of-string if unterminated), and whether
/// a closing quote was found.
fn scan_quoted(bytes: &[u8], start: usize, quote: u8) -> (Vec<u8>, usize, bool) {
    let mut out = Vec::new();
    let mut i = start;
    while i < bytes.len() {
        if bytes[i] == quote {
            return (out, i + 1, true);
        }
        if bytes[i] == b'\\' && i + 1 < bytes.len() && (bytes[i + 1] == quote || bytes[i + 1] == b'\\') {
            out.push(bytes[i + 1]);
            i += 2;
            continue;
        }
        out.push(bytes[i]);
        i += 1;
    }
    (out, i, false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn splits_on_runs_of_whitespace() {
        assert_eq!(tokenize_default("echo   foo  bar"), vec!["echo", "foo", "bar"]);
    }

    #[test]
    fn double_quoted_span_keeps_internal_spaces() {
        assert_eq!(tokenize_default(r#"echo "foo   faa""#), vec!["echo", "foo   faa"]);
    }

    #[test]
    fn single_quotes_behave_the_same() {
        assert_eq!(tokenize_default("echo 'foo bar'"), vec!["echo", "foo bar"]);
    }

    #[test]
    fn escaped_quote_and_backslash() {
        assert_eq!(tokenize_default(r#"echo a\"b"#), vec!["echo", "a\"b"]);
        assert_eq!(tokenize_default(r"echo a\\b"), vec!["echo", "a\\b"]);
    }

    #[test]
    fn mismatched_quote_retained_literally() {
        assert_eq!(tokenize_default(r#"echo "unterminated"#), vec!["echo", "\"unterminated"]);
    }

    #[test]
    fn argv_cap_drops_extras() {
        let line: Vec<String> = (0..5).map(|i| i.to_string()).collect();
        let joined = line.join(" ");
        assert_eq!(tokenize(&joined, 3), vec!["0", "1", "2"]);
    }

    #[test]
    fn empty_line_yields_no_tokens() {
        assert!(tokenize_default("   ").is_empty());
    }

    fn plain_token() -> impl Strategy<Value = String> {
        "[A-Za-z0-9_-]{1,8}"
    }

    proptest! {
        #[test]
        fn unquoted_tokens_round_trip(tokens in proptest::collection::vec(plain_token(), 1..8)) {
            let joined = tokens.join(" ");
            prop_assert_eq!(tokenize_default(&joined), tokens);
        }

        #[test]
        fn argv_count_matches_quoted_word_count(words in proptest::collection::vec("[A-Za-z ]{1,10}", 1..6)) {
            let line: String = words.iter().map(|w| format!("\"{}\" ", w)).collect();
            prop_assert_eq!(tokenize_default(&line).len(), words.len());
        }
    }
}
