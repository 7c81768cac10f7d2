//! guidex-core — extraction of GUID → interface-name declarations
//! from Windows SDK header trees.
//!
//! The pipeline: [`walk`] discovers headers under the configured scan
//! directories, [`patterns`] extracts (GUID, name) declarations from
//! each file independently (after [`normalize`] cleanup, with
//! [`assemble`] handling multi-line shapes and [`namespace`] the
//! enclosing C++ namespaces), and [`registry`] reconciles everything
//! into a single report that [`render`] turns into output files.
//!
//! Per-file extraction is pure and runs in parallel; registry folding
//! is serial in path order so name tie-breaks are reproducible.

pub mod assemble;
pub mod namespace;
pub mod normalize;
pub mod patterns;
pub mod registry;
pub mod render;
pub mod types;
pub mod walk;

use std::path::Path;
use std::time::Instant;

use rayon::prelude::*;
use tracing::{debug, info, warn};

use patterns::{extract_file, ExtractOptions};
use registry::Registry;
pub use types::{Diagnostic, ExtraBinding, Guid, GuidReport, ScanConfig};
pub use walk::HeaderFile;

// ---------------------------------------------------------------------------
// .guidex.toml config loading
// ---------------------------------------------------------------------------

/// Known keys in `.guidex.toml` for config validation.
const KNOWN_CONFIG_KEYS: &[&str] =
    &["scan_dirs", "extensions", "only_winrt", "root_namespace", "extra"];

/// Simple Levenshtein edit distance for typo suggestions.
fn edit_distance(a: &str, b: &str) -> usize {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];
    for (i, &ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, &cb) in b.iter().enumerate() {
            let cost = if ca == cb { 0 } else { 1 };
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

/// Load scan configuration from `.guidex.toml` in the given SDK root.
///
/// Returns a [`ScanConfig`] with defaults merged with any overrides
/// from the config file. If the file doesn't exist or can't be parsed,
/// returns defaults with a warning. Unknown keys trigger a warning
/// with a typo suggestion.
pub fn load_guidex_config(root: &Path) -> ScanConfig {
    let mut config = ScanConfig::new(root.to_path_buf());
    let config_path = root.join(".guidex.toml");

    if config_path.exists() {
        debug!("Loading .guidex.toml");
        if let Ok(content) = std::fs::read_to_string(&config_path) {
            if let Ok(table) = content.parse::<toml::Table>() {
                // Validate keys — warn on unknown
                for key in table.keys() {
                    if !KNOWN_CONFIG_KEYS.contains(&key.as_str()) {
                        let suggestion =
                            KNOWN_CONFIG_KEYS.iter().min_by_key(|k| edit_distance(key, k)).unwrap();
                        let dist = edit_distance(key, suggestion);
                        if dist <= 3 {
                            warn!(
                                key = key.as_str(),
                                suggestion = *suggestion,
                                "Unknown key in .guidex.toml — did you mean '{suggestion}'?"
                            );
                        } else {
                            warn!(
                                key = key.as_str(),
                                "Unknown key in .guidex.toml (known keys: {})",
                                KNOWN_CONFIG_KEYS.join(", ")
                            );
                        }
                    }
                }

                // scan_dirs
                if let Some(dirs) = table.get("scan_dirs").and_then(|v| v.as_array()) {
                    config.scan_dirs =
                        dirs.iter().filter_map(|v| v.as_str().map(|s| s.to_string())).collect();
                }

                // extensions
                if let Some(exts) = table.get("extensions").and_then(|v| v.as_array()) {
                    config.extensions =
                        exts.iter().filter_map(|v| v.as_str().map(|s| s.to_string())).collect();
                }

                // only_winrt
                if let Some(flag) = table.get("only_winrt").and_then(|v| v.as_bool()) {
                    config.only_winrt = flag;
                }

                // root_namespace
                if let Some(ns) = table.get("root_namespace").and_then(|v| v.as_str()) {
                    config.root_namespace = ns.to_string();
                }

                // [[extra]] — bindings declared in no public header
                if let Some(extras) = table.get("extra").and_then(|v| v.as_array()) {
                    for item in extras {
                        let entry = item.as_table();
                        let guid = entry.and_then(|t| t.get("guid")).and_then(|v| v.as_str());
                        let name = entry.and_then(|t| t.get("name")).and_then(|v| v.as_str());
                        match (guid, name) {
                            (Some(guid), Some(name)) => config.extra.push(ExtraBinding {
                                guid: guid.to_string(),
                                name: name.to_string(),
                            }),
                            _ => warn!("[[extra]] entry in .guidex.toml missing guid or name"),
                        }
                    }
                }
            } else {
                warn!("Failed to parse .guidex.toml");
            }
        }
    }

    config
}

// ---------------------------------------------------------------------------
// Scan driver
// ---------------------------------------------------------------------------

/// Scan the configured header tree and reconcile every declaration
/// into a [`GuidReport`].
///
/// Unreadable files are logged and skipped; an empty or missing tree
/// yields an empty report, never an error. Headers occasionally carry
/// stray non-UTF-8 bytes in vendor comments, so reads are lossy.
pub fn scan_headers(config: &ScanConfig) -> GuidReport {
    info!(
        root = %config.root.display(),
        only_winrt = config.only_winrt,
        "scanning SDK headers"
    );
    let start = Instant::now();

    let files = walk::discover_headers(config);

    let extracted: Vec<(HeaderFile, patterns::FileExtraction)> = files
        .into_par_iter()
        .filter_map(|file| {
            let bytes = match std::fs::read(&file.abs_path) {
                Ok(b) => b,
                Err(e) => {
                    warn!(file = %file.abs_path.display(), error = %e, "unreadable header skipped");
                    return None;
                }
            };
            let content = String::from_utf8_lossy(&bytes);
            let raw: Vec<String> = content.lines().map(|l| l.to_string()).collect();
            let opts =
                ExtractOptions { root_namespace: &config.root_namespace, winrt: file.winrt };
            let out = extract_file(&file.rel_path, &raw, &opts);
            Some((file, out))
        })
        .collect();

    let files_scanned = extracted.len();
    let mut registry = Registry::new();
    let mut diagnostics = Vec::new();
    let mut declarations = 0usize;

    for (_, out) in extracted {
        declarations += out.declarations.len();
        for d in out.declarations {
            if let Err(reason) = registry.record(&d.guid, &d.name) {
                diagnostics.push(Diagnostic {
                    file: d.file,
                    line: d.line,
                    text: format!("{} = {}", d.guid, d.name),
                    reason,
                });
            }
        }
        diagnostics.extend(out.diagnostics);
    }

    // Out-of-band bindings run last so header declarations win any
    // tie-break against them.
    for extra in &config.extra {
        if let Err(reason) = registry.record(&extra.guid, &extra.name) {
            warn!(guid = %extra.guid, name = %extra.name, %reason, "extra binding rejected");
        }
    }

    let elapsed = start.elapsed().as_millis() as u64;
    let report = GuidReport::assemble(registry, diagnostics, files_scanned, declarations, elapsed);
    info!(
        files = report.files_scanned,
        declarations = report.declarations,
        interfaces = report.interfaces.len(),
        ambiguous = report.ambiguous.len(),
        diagnostics = report.diagnostics.len(),
        elapsed_ms = elapsed,
        "scan complete"
    );
    report
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
