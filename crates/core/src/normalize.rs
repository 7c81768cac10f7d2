//! Line normalization — comment stripping, continuation joining,
//! whitespace collapsing.
//!
//! Headers are normalized once per file before pattern dispatch. The
//! output has the same line count as the input so that every
//! diagnostic can point at the original 1-based line number; a line
//! that loses all content stays present as an empty string.

use regex::Regex;
use tracing::warn;

/// Annotation tokens that carry no declaration content but would break
/// whitespace-delimited token extraction if left in place.
const COSMETIC_TOKENS: &[&str] = &["__declspec(novtable)", "DECLSPEC_NOVTABLE"];

/// Normalize the raw lines of one header.
///
/// - joins backslash-continued lines (content moves to the following
///   line, the continuation line is blanked),
/// - strips `//` comments, then `/* ... */` comments — including block
///   comments spanning lines, tracked by a single carried flag,
/// - removes cosmetic annotation tokens,
/// - collapses whitespace runs to single spaces and trims.
pub fn normalize_lines(file: &str, raw: &[String]) -> Vec<String> {
    let ws_re = Regex::new(r"\s+").unwrap();

    let mut lines: Vec<String> = raw.iter().map(|l| l.trim().to_string()).collect();
    let mut in_block_comment = false;

    for i in 0..lines.len() {
        // Backslash continuation: merge downward so later lines keep
        // accumulating, then leave this slot empty.
        if lines[i].ends_with('\\') && i + 1 < lines.len() {
            let joined = format!(
                "{} {}",
                lines[i].trim_end_matches('\\').trim(),
                lines[i + 1].trim()
            );
            lines[i].clear();
            lines[i + 1] = joined;
            continue;
        }

        let mut line = lines[i].clone();

        // A line can open with a double-purpose marker ("//* ..."), so
        // the `//` strip must run before block comment handling.
        if let Some(pos) = line.find("//") {
            line.truncate(pos);
        }

        loop {
            let start = if in_block_comment { Some(0) } else { line.find("/*") };
            let Some(start) = start else { break };

            match line[start..].find("*/").map(|p| start + p) {
                None => {
                    in_block_comment = true;
                    line.truncate(start);
                    break;
                }
                Some(end) => {
                    in_block_comment = false;
                    line.replace_range(start..end + 2, "");
                    // The same line may contain further comments.
                }
            }
        }

        for token in COSMETIC_TOKENS {
            line = line.replace(token, "");
        }

        lines[i] = ws_re.replace_all(line.trim(), " ").into_owned();
    }

    // Should not occur on well-formed headers; flagged rather than
    // fatal so the rest of the corpus still gets scanned.
    if in_block_comment {
        warn!(file, "block comment left open at end of file");
    }

    lines
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
