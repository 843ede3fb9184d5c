//! Shell command splitting
//!
//! Splits a command line into its top-level simple commands so rules can be
//! matched one segment at a time. This is a lexical scan, not a parser: it
//! tracks quotes, `$( … )`, `( … )` and backticks only to avoid splitting
//! inside them.

/// Split a command by top-level shell operators (`;`, `&&`, `||`, `|`, `&`,
/// newline). Empty segments are dropped.
///
/// Unbalanced quotes or brackets keep the remainder in one segment.
pub fn split_compound_command(command: &str) -> Vec<&str> {
    let mut segments = Vec::new();
    let mut start = 0;
    let mut depth = 0usize;
    let mut in_single = false;
    let mut in_double = false;
    let mut in_backtick = false;
    let mut escaped = false;

    let bytes = command.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];

        if escaped {
            escaped = false;
            i += 1;
            continue;
        }

        match b {
            b'\\' if !in_single => escaped = true,
            b'\'' if !in_double && !in_backtick => in_single = !in_single,
            b'"' if !in_single && !in_backtick => in_double = !in_double,
            b'`' if !in_single => in_backtick = !in_backtick,
            _ if in_single || in_double || in_backtick => {}
            b'(' => depth += 1,
            b')' => depth = depth.saturating_sub(1),
            b'&' if is_redirection(bytes, i) => {}
            b';' | b'\n' | b'|' | b'&' if depth == 0 => {
                push_segment(&mut segments, &command[start..i]);
                // Two-character operators: && || ;; |&
                let next = bytes.get(i + 1).copied();
                let skip = match (b, next) {
                    (b'&', Some(b'&')) | (b'|', Some(b'|')) | (b';', Some(b';')) => 2,
                    (b'|', Some(b'&')) => 2,
                    _ => 1,
                };
                i += skip;
                start = i;
                continue;
            }
            _ => {}
        }
        i += 1;
    }

    push_segment(&mut segments, &command[start..]);
    segments
}

/// `&` inside `2>&1`, `<&0` or `&>file` is part of a redirection
fn is_redirection(bytes: &[u8], i: usize) -> bool {
    let prev = if i > 0 { bytes.get(i - 1).copied() } else { None };
    let next = bytes.get(i + 1).copied();
    matches!(prev, Some(b'>') | Some(b'<')) || next == Some(b'>')
}

fn push_segment<'a>(segments: &mut Vec<&'a str>, segment: &'a str) {
    let trimmed = segment.trim();
    if !trimmed.is_empty() {
        segments.push(trimmed);
    }
}
