//! Operator-aware splitting of a committed line into [`Segment`]s.

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Operator {
    /// Unconditional sequence (`;`), also used for the trailing
    /// background marker (`&`) and end-of-line.
    Sequence,
    And,
    Or,
}

pub struct Segment {
    pub text: String,
    pub joined_by: Operator,
}

/// Splits `line` into segments at `;`, `&&`, `||`, and `&`, ignoring
/// operator characters that occur inside single or double quotes. Empty
/// segments (e.g. between `;;`) are dropped.
pub fn split_segments(line: &str) -> Vec<Segment> {
    let bytes = line.as_bytes();
    let mut segments = Vec::new();
    let mut start = 0;
    let mut i = 0;
    let mut quote: Option<u8> = None;
    while i < bytes.len() {
        match quote {
            Some(q) => {
                if bytes[i] == q {
                    quote = None;
                }
                i += 1;
            }
            None => match bytes[i] {
                b'"' | b'\'' => {
                    quote = Some(bytes[i]);
                    i += 1;
                }
                b'&' if bytes.get(i + 1) == Some(&b'&') => {
                    push_segment(&mut segments, &line[start..i], Operator::And);
                    i += 2;
                    start = i;
                }
                b'|' if bytes.get(i + 1) == Some(&b'|') => {
                    push_segment(&mut segments, &line[start..i], Operator::Or);
                    i += 2;
                    start = i;
                }
                b';' => {
                    push_segment(&mut segments, &line[start..i], Operator::Sequence);
                    i += 1;
                    start = i;
                }
                b'&' => {
                    push_segment(&mut segments, &line[start..i], Operator::Sequence);
                    i += 1;
                    start = i;
                }
                _ => i += 1,
            },
        }
    }
    if start < bytes.len() {
        push_segment(&mut segments, &line[start..], Operator::Sequence);
    }
    segments
}

fn push_segment(segments: &mut Vec<Segment>, text: &str, joined_by: Operator) {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return;
    }
    segments.push(Segment { text: trimmed.to_string(), joined_by });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(line: &str) -> Vec<String> {
        split_segments(line).into_iter().map(|s| s.text).collect()
    }

    #[test]
    fn splits_on_semicolon() {
        assert_eq!(texts("echo a;echo b"), vec!["echo a", "echo b"]);
    }

    #[test]
    fn double_semicolon_skips_empty_segment() {
        let segs = split_segments("true;;false");
        assert_eq!(segs.len(), 2);
        assert_eq!(segs[0].text, "true");
        assert_eq!(segs[1].text, "false");
    }

    #[test]
    fn and_or_operators_recorded() {
        let segs = split_segments("true && false || echo hi");
        assert_eq!(segs[0].joined_by, Operator::And);
        assert_eq!(segs[1].joined_by, Operator::Or);
        assert_eq!(segs[2].text, "echo hi");
    }

    #[test]
    fn operator_inside_quotes_is_literal() {
        let segs = split_segments(r#"echo "a;b""#);
        assert_eq!(segs.len(), 1);
        assert_eq!(segs[0].text, r#"echo "a;b""#);
    }

    #[test]
    fn trailing_ampersand_treated_as_sequence() {
        let segs = split_segments("echo hi &");
        assert_eq!(segs.len(), 1);
        assert_eq!(segs[0].text, "echo hi");
    }
}
