//! Header discovery.
//!
//! The SDK include tree keeps its headers flat inside a handful of
//! well-known subdirectories (`um`, `shared`, `winrt`, the cppwinrt
//! projections). Nested locations are listed explicitly in the scan
//! configuration, so each directory is walked non-recursively — a
//! recursive walk would count the cppwinrt subtrees twice.

use std::path::PathBuf;
use std::sync::Mutex;

use ignore::{WalkBuilder, WalkState};
use tracing::{debug, warn};

use crate::types::ScanConfig;

/// One header slated for extraction.
#[derive(Debug, Clone)]
pub struct HeaderFile {
    /// Scan-directory-qualified path, used in diagnostics and logs.
    pub rel_path: String,
    pub abs_path: PathBuf,
    /// Whether the file came from a WinRT subtree; controls namespace
    /// qualification during extraction.
    pub winrt: bool,
}

/// Enumerate every header under the configured scan directories.
///
/// A missing directory is logged and skipped — SDK installations ship
/// different subsets, and a partial tree is still worth scanning. The
/// result is sorted by relative path so runs are reproducible.
pub fn discover_headers(config: &ScanConfig) -> Vec<HeaderFile> {
    let collected = Mutex::new(Vec::new());

    for dir in &config.scan_dirs {
        let winrt = dir.contains("winrt");
        if config.only_winrt && !winrt {
            continue;
        }

        let base = config.root.join(dir);
        if !base.is_dir() {
            warn!(dir = %base.display(), "scan directory missing, skipped");
            continue;
        }

        WalkBuilder::new(&base)
            .max_depth(Some(1))
            .standard_filters(false)
            .build_parallel()
            .run(|| {
                Box::new(|entry| {
                    let Ok(entry) = entry else {
                        return WalkState::Continue;
                    };
                    if !entry.file_type().map(|t| t.is_file()).unwrap_or(false) {
                        return WalkState::Continue;
                    }
                    let path = entry.path();
                    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
                    if !config.extensions.contains(ext) {
                        return WalkState::Continue;
                    }
                    let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
                    collected.lock().unwrap().push(HeaderFile {
                        rel_path: format!("{dir}/{name}"),
                        abs_path: path.to_path_buf(),
                        winrt,
                    });
                    WalkState::Continue
                })
            });
    }

    let mut files = collected.into_inner().unwrap();
    files.sort_by(|a, b| a.rel_path.cmp(&b.rel_path));
    debug!(files = files.len(), "header discovery complete");
    files
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
