use serde::Serialize;
use std::collections::HashSet;
use std::fmt;
use std::path::PathBuf;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Guid — canonical 128-bit identifier
// ---------------------------------------------------------------------------

/// A 128-bit identifier normalized to the uppercase hyphenated form
/// `XXXXXXXX-XXXX-XXXX-XXXX-XXXXXXXXXXXX`.
///
/// Header text encodes the same value as a quoted hex string or as an
/// 11-field integer list; both canonicalize to the same `Guid`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Guid(Uuid);

impl Guid {
    /// Parse a textual GUID after trimming quotes, braces and spaces.
    ///
    /// Valid iff the trimmed form is exactly 36 characters with hyphens
    /// at positions 8, 13, 18 and 23. Returns `None` otherwise.
    pub fn parse(raw: &str) -> Option<Guid> {
        let s = raw.trim_matches(|c| c == '"' || c == ' ' || c == '{' || c == '}');
        let b = s.as_bytes();
        if b.len() != 36 || b[8] != b'-' || b[13] != b'-' || b[18] != b'-' || b[23] != b'-' {
            return None;
        }
        Uuid::parse_str(s).ok().map(Guid)
    }

    /// Build a `Guid` from the numeric fields of the 11-field list form:
    /// `{high32, mid16, mid16, {8 bytes}}`.
    pub fn from_fields(d1: u32, d2: u16, d3: u16, d4: [u8; 8]) -> Guid {
        Guid(Uuid::from_fields(d1, d2, d3, &d4))
    }
}

impl fmt::Display for Guid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut buf = Uuid::encode_buffer();
        f.write_str(self.0.as_hyphenated().encode_upper(&mut buf))
    }
}

impl Serialize for Guid {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

// ---------------------------------------------------------------------------
// Declarations and diagnostics
// ---------------------------------------------------------------------------

/// One recognized (GUID, name) fact, tied to its source location.
///
/// The GUID is kept textual here; the registry validates and
/// canonicalizes it at record time so that rejects carry the offending
/// text verbatim.
#[derive(Debug, Clone)]
pub struct Declaration {
    pub guid: String,
    pub name: String,
    pub file: String,
    /// 1-based line number of the first line of the declaration.
    pub line: usize,
}

/// Why a declaration-shaped line was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    /// A GUID-shaped token was present but no idiom matched.
    UnrecognizedShape,
    /// An idiom matched but the comma-split argument count was wrong.
    ArgumentCountMismatch,
    /// The GUID failed the 36-character/hyphen-position invariant.
    MalformedGuid,
    /// The name was too short or a reserved keyword capture.
    MalformedName,
    /// Multi-line reassembly ran past the look-ahead bound.
    LookaheadExhausted,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RejectReason::UnrecognizedShape => "unrecognized declaration shape",
            RejectReason::ArgumentCountMismatch => "argument count mismatch",
            RejectReason::MalformedGuid => "malformed GUID",
            RejectReason::MalformedName => "malformed name",
            RejectReason::LookaheadExhausted => "look-ahead exhausted",
        };
        f.write_str(s)
    }
}

/// A structured record of one rejected or unrecognized line.
///
/// Diagnostics are data, not log output: the run always completes and
/// returns the full stream alongside whatever was extracted.
#[derive(Debug, Clone, Serialize)]
pub struct Diagnostic {
    pub file: String,
    pub line: usize,
    pub text: String,
    pub reason: RejectReason,
}

// ---------------------------------------------------------------------------
// Scan configuration — loaded from .guidex.toml or defaults
// ---------------------------------------------------------------------------

/// An out-of-band GUID binding recorded after the header scan.
/// Covers interfaces that exist but are declared in no public header.
#[derive(Debug, Clone)]
pub struct ExtraBinding {
    pub guid: String,
    pub name: String,
}

/// Runtime configuration for a scan run.
#[derive(Clone)]
pub struct ScanConfig {
    /// SDK include root, e.g. `.../Include/10.0.22000.0`.
    pub root: PathBuf,
    /// Subdirectories of the root to scan (non-recursive, like the SDK
    /// layout: `winrt`, `cppwinrt/winrt`, `um`, ...).
    pub scan_dirs: Vec<String>,
    /// Header extensions to include.
    pub extensions: HashSet<String>,
    /// Restrict the scan to WinRT subtrees.
    pub only_winrt: bool,
    /// Sentinel naming the documented interoperability root namespace;
    /// backward namespace resolution stops when it is reached.
    pub root_namespace: String,
    /// Extra bindings fed through the registry after all files.
    pub extra: Vec<ExtraBinding>,
}

impl ScanConfig {
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            scan_dirs: ["winrt", "cppwinrt/winrt", "cppwinrt/winrt/impl", "um", "shared"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            extensions: ["h"].iter().map(|s| s.to_string()).collect(),
            only_winrt: false,
            root_namespace: "ABI".to_string(),
            extra: Vec::new(),
        }
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self::new(PathBuf::from("."))
    }
}

// ---------------------------------------------------------------------------
// Finalized report
// ---------------------------------------------------------------------------

/// One interface name and every GUID it was declared with, newest first.
#[derive(Debug, Clone, Serialize)]
pub struct InterfaceEntry {
    pub name: String,
    pub guids: Vec<Guid>,
}

/// A GUID that was bound to two or more names judged to denote
/// different entities, with the full conflicting name set.
#[derive(Debug, Clone, Serialize)]
pub struct AmbiguousGuid {
    pub guid: Guid,
    pub names: Vec<String>,
}

/// Immutable snapshot of a completed run, consumed by the output stage.
#[derive(Debug, Serialize)]
pub struct GuidReport {
    /// Sorted by name, case-insensitive with a case-sensitive tiebreak.
    pub interfaces: Vec<InterfaceEntry>,
    pub ambiguous: Vec<AmbiguousGuid>,
    pub diagnostics: Vec<Diagnostic>,
    pub files_scanned: usize,
    pub declarations: usize,
    pub scan_time_ms: u64,
}

impl GuidReport {
    /// Conflicting names for a GUID, or `None` when it is unambiguous.
    pub fn ambiguity_for(&self, guid: Guid) -> Option<&[String]> {
        self.ambiguous.iter().find(|a| a.guid == guid).map(|a| a.names.as_slice())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
