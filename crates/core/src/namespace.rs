//! Backward namespace resolution.
//!
//! WinRT headers wrap interface declarations in nested C++ namespaces,
//! either one per line or several openings packed onto a single line:
//!
//! ```text
//! namespace ABI { namespace Windows { namespace Foundation {
//!     MIDL_INTERFACE("2b09a173-b68e-4def-88c1-8de84e5aab2f")
//! ```
//!
//! The resolver reconstructs the enclosing chain by scanning backward
//! from the declaration, and stops as soon as the configured root
//! sentinel is reached — the marker separating documented
//! interoperability namespaces from implementation detail.

use crate::assemble::prev_content_line;

/// Look-back bound: how many content lines are examined before giving
/// up and treating the declaration as un-namespaced.
const LOOK_BACK_LINES: usize = 8;

/// Resolve the dotted namespace prefix enclosing the declaration at
/// `start`, e.g. `"ABI.Windows.UI.WebUI."` (note the trailing dot, so
/// callers can concatenate the bare name directly).
///
/// Segments are collected rightmost-first per line, which yields
/// innermost-to-outermost order; each is prepended, producing the
/// outer-to-inner dotted chain. Resolution succeeds only when the
/// `root` sentinel is reached within the bound; otherwise the result
/// is empty — many declarations are legitimately un-namespaced, so
/// this is leniency, not an error.
pub fn resolve(lines: &[String], start: usize, root: &str) -> String {
    let mut chain = String::new();
    let mut idx = start;

    for _ in 0..LOOK_BACK_LINES {
        let Some(line) = prev_content_line(lines, &mut idx) else {
            break;
        };

        let mut rest = line;
        while let Some(found) = rest.rfind("namespace") {
            let segment = rest[found + "namespace".len()..]
                .trim_matches(|c| c == ' ' || c == '{')
                .to_string();
            rest = &rest[..found];

            chain = format!("{segment}.{chain}");
            if segment == root {
                return chain;
            }
        }
    }

    String::new()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
