//! Multi-line reassembly — bounded cursor movement, balanced-delimiter
//! extraction, hex-literal GUID payloads, and identifier scanning
//! across line boundaries.
//!
//! Declarations in SDK headers routinely spill their argument lists,
//! brace-delimited hex payloads, or trailing identifiers onto the
//! following lines. Everything here threads an explicit line index and
//! is bounded by a small look-ahead so malformed input can never cause
//! a runaway scan.

use crate::types::Guid;

/// Maximum number of line probes when skipping to a neighboring
/// content line. Reassembly that would need more gives up instead.
pub const LOOK_BOUND: usize = 7;

// ---------------------------------------------------------------------------
// Content-line classification and cursor movement
// ---------------------------------------------------------------------------

/// Whether a normalized line can carry declaration content.
///
/// Preprocessor conditionals, `#define`s and deprecation annotations
/// may be interleaved inside a single declaration and must be stepped
/// over; bare brace lines too, except when gathering a brace-delimited
/// hex payload.
pub fn is_content_line(line: &str, allow_braces: bool) -> bool {
    if line.is_empty()
        || line.starts_with("#if ")
        || line.starts_with("#endif")
        || line.starts_with("#define ")
        || line.starts_with("DEPRECATED")
    {
        return false;
    }
    if !allow_braces && (line.starts_with('{') || line.starts_with('}')) {
        return false;
    }
    true
}

/// Advance `idx` to the next content line, probing at most
/// [`LOOK_BOUND`] lines. Returns the line, or `None` on exhaustion.
pub fn next_content_line<'a>(lines: &'a [String], idx: &mut usize) -> Option<&'a str> {
    for _ in 0..LOOK_BOUND {
        *idx += 1;
        let line = lines.get(*idx)?;
        if is_content_line(line, false) {
            return Some(line);
        }
    }
    None
}

/// Move `idx` to the previous content line, probing at most
/// [`LOOK_BOUND`] lines backward.
pub fn prev_content_line<'a>(lines: &'a [String], idx: &mut usize) -> Option<&'a str> {
    for _ in 0..LOOK_BOUND {
        if *idx == 0 {
            return None;
        }
        *idx -= 1;
        let line = &lines[*idx];
        if is_content_line(line, false) {
            return Some(line);
        }
    }
    None
}

// ---------------------------------------------------------------------------
// Balanced-delimiter extraction
// ---------------------------------------------------------------------------

/// Concatenate content lines starting at `idx` until both delimiters
/// are present, then return the substring strictly between the first
/// `start` and the following `end`. `idx` is left on the last line
/// consumed. `None` when the look-ahead is exhausted first.
pub fn extract_between(
    lines: &[String],
    idx: &mut usize,
    start: &str,
    end: &str,
) -> Option<String> {
    let first = *idx;
    let mut concat = lines.get(*idx)?.clone();
    while !(concat.contains(start) && concat.contains(end)) {
        if *idx - first >= LOOK_BOUND {
            return None;
        }
        concat.push_str(next_content_line(lines, idx)?);
    }

    let s = concat.find(start)? + start.len();
    let e = concat[s..].find(end)? + s;
    Some(concat[s..e].to_string())
}

/// Reassemble a parenthesized argument list and split it on commas.
/// `None` when reassembly fails; `Some(Err(n))` when the list was
/// found but held `n` parts instead of `expected` — a hard rejection,
/// never a best-effort guess.
pub fn extract_args(
    lines: &[String],
    idx: &mut usize,
    expected: usize,
) -> Option<Result<Vec<String>, usize>> {
    let inner = extract_between(lines, idx, "(", ")")?;
    let parts: Vec<String> = inner.split(',').map(|p| p.to_string()).collect();
    if parts.len() != expected {
        return Some(Err(parts.len()));
    }
    Some(Ok(parts))
}

// ---------------------------------------------------------------------------
// Hex-literal GUID payloads
// ---------------------------------------------------------------------------

/// Convert the 11-field integer list form into a canonical [`Guid`]:
/// `0x`-prefixed hex or decimal, optional trailing `L`, any other
/// shape rejected.
pub fn hex_list_to_guid(parts: &[&str]) -> Option<Guid> {
    if parts.len() != 11 {
        return None;
    }

    let mut nums = [0u32; 11];
    for (i, part) in parts.iter().enumerate() {
        let p = part.trim().to_uppercase();
        let p = p.trim_end_matches('L');
        nums[i] = if let Some(hex) = p.strip_prefix("0X") {
            u32::from_str_radix(hex, 16).ok()?
        } else {
            p.parse().ok()?
        };
    }

    let d2 = u16::try_from(nums[1]).ok()?;
    let d3 = u16::try_from(nums[2]).ok()?;
    let mut tail = [0u8; 8];
    for (i, byte) in tail.iter_mut().enumerate() {
        *byte = u8::try_from(nums[3 + i]).ok()?;
    }
    Some(Guid::from_fields(nums[0], d2, d3, tail))
}

/// Extract a brace-delimited hex GUID literal contained in one line:
/// `{ 0x365585A5,0x171A,0x4A2A,{ 0x98,0x5F,...,0x5A } }`.
pub fn inline_hex_guid(line: &str) -> Option<Guid> {
    let flat: String = line.chars().filter(|c| *c != ' ').collect();

    let start = flat.find('{')?;
    let end = flat.find("}}")?;
    if end < start {
        return None;
    }

    let inner: String = flat[start..end].chars().filter(|c| *c != '{').collect();
    let parts: Vec<&str> = inner.split(',').collect();
    hex_list_to_guid(&parts)
}

/// Gather a hex GUID literal that may span several lines, consuming
/// lines (braces allowed) until two closing braces have been seen.
/// `idx` is left on the closing line.
pub fn braced_hex_guid(lines: &[String], idx: &mut usize) -> Option<Guid> {
    let mut concat = String::new();
    for probe in 0.. {
        let line = lines.get(*idx)?;
        if is_content_line(line, true) {
            concat.push_str(line);
        }
        if concat.matches('}').count() >= 2 {
            break;
        }
        if probe >= LOOK_BOUND {
            return None;
        }
        *idx += 1;
    }
    inline_hex_guid(&concat)
}

// ---------------------------------------------------------------------------
// Identifier scanning
// ---------------------------------------------------------------------------

/// Collect the next identifier starting at `pos` in line `idx`,
/// continuing onto following content lines when the current one runs
/// out before anything was collected.
///
/// Angle-bracket template arguments are treated as opaque: commas and
/// spaces inside `< >` do not terminate the token. `::` is rewritten
/// to `.` (continuation lines up front, template spans afterward), a
/// `<.` left by a rewritten leading `::` is repaired, a trailing
/// pointer marker is trimmed, and comma spacing is normalized so
/// `IMap<K,V>` and `IMap<K, V>` compare equal.
pub fn next_token(lines: &[String], idx: &mut usize, pos: &mut usize) -> String {
    let mut chars: Vec<char> = lines[*idx].chars().collect();
    let mut out = String::new();
    let mut angle_open = false;

    loop {
        if *pos >= chars.len() {
            if !out.is_empty() {
                break;
            }
            *pos = 0;
            match next_content_line(lines, idx) {
                Some(next) => chars = next.replace("::", ".").chars().collect(),
                None => break,
            }
            continue;
        }

        let c = chars[*pos];
        if c == '<' {
            angle_open = true;
        }
        if c == '>' {
            angle_open = false;
        }

        if angle_open || c.is_alphanumeric() || "_<.>*".contains(c) {
            out.push(c);
        } else if !out.is_empty() {
            break;
        }
        *pos += 1;
    }

    let out = out.replace("::", ".");
    // `IIterator<::byte>` arrives as `<.byte>` after the rewrite.
    let out = out.replace("<.", "<");
    // `IDebugAdvanced4* PDEBUG_ADVANCED4;` — the pointer star is not
    // part of the name.
    let out = out.trim_end_matches('*');
    let out = out.replace(',', ", ");
    out.split_whitespace().collect::<Vec<_>>().join(" ")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
