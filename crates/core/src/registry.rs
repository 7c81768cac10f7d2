//! Reconciliation registry.
//!
//! Declarations arrive as textual (GUID, name) pairs from many files,
//! and the same GUID is routinely declared more than once: restated
//! verbatim, restated with or without its namespace qualification, or
//! genuinely reused for two different entities. The registry validates
//! each pair, reconciles repeat sightings, and keeps an explicit side
//! table of GUIDs whose names truly conflict.

use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use crate::types::{AmbiguousGuid, Guid, GuidReport, InterfaceEntry, RejectReason};

/// Keyword captures that slip through token extraction on malformed
/// declarations; never legitimate interface names.
const RESERVED_NAMES: &[&str] =
    &["struct", "class", "enum", "null", "DWORD", "__int64", "long", "__declspec"];

/// Accumulates validated bindings across a whole run.
///
/// Both directions are kept: `by_guid` holds the single reconciled
/// name per GUID, `by_name` every GUID a name was declared with
/// (newest first). `BTreeMap` keeps iteration deterministic so two
/// runs over the same tree always render identically.
#[derive(Default)]
pub struct Registry {
    by_name: BTreeMap<String, Vec<Guid>>,
    by_guid: BTreeMap<Guid, String>,
    ambiguous: BTreeMap<Guid, BTreeSet<String>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and record one binding.
    ///
    /// The GUID arrives textual and is canonicalized here, so a reject
    /// can carry the offending text verbatim. The name is trimmed of
    /// quoting residue and must be plausible: at least two characters
    /// and not a keyword capture.
    pub fn record(&mut self, guid: &str, name: &str) -> Result<(), RejectReason> {
        let Some(guid) = Guid::parse(guid) else {
            return Err(RejectReason::MalformedGuid);
        };

        let name = name.trim_matches(|c| c == '"' || c == ' ');
        if name.len() < 2 || RESERVED_NAMES.contains(&name) {
            return Err(RejectReason::MalformedName);
        }

        // Repeat sightings: a name that contains the other (directly,
        // or after marking the other's leaf with the interface `I`
        // prefix) subsumes it — the two denote the same entity at
        // different qualification levels, and the longer form is the
        // single retained spelling. Anything else is genuine
        // ambiguity: both names go into the side table and the newest
        // one wins the forward mapping.
        let mut winner = name.to_string();
        if let Some(existing) = self.by_guid.get(&guid).cloned() {
            if existing != name {
                if existing.contains(name) || existing.contains(&mark_interface(name)) {
                    winner = existing;
                } else if name.contains(existing.as_str())
                    || name.contains(&mark_interface(&existing))
                {
                    // The longer new spelling wins; the GUID migrates
                    // off the shorter one so only one name survives.
                    self.unbind(&existing, guid);
                } else {
                    debug!(%guid, %existing, name, "conflicting names for one GUID");
                    let names = self.ambiguous.entry(guid).or_default();
                    names.insert(existing);
                    names.insert(name.to_string());
                }
            }
        }

        self.by_guid.insert(guid, winner.clone());
        let guids = self.by_name.entry(winner).or_default();
        if !guids.contains(&guid) {
            guids.insert(0, guid);
        }
        Ok(())
    }

    fn unbind(&mut self, name: &str, guid: Guid) {
        if let Some(guids) = self.by_name.get_mut(name) {
            guids.retain(|g| *g != guid);
            if guids.is_empty() {
                self.by_name.remove(name);
            }
        }
    }

    /// Freeze the registry into a report snapshot. Interfaces sort by
    /// name, case-insensitive with a case-sensitive tiebreak.
    pub fn finalize(self) -> (Vec<InterfaceEntry>, Vec<AmbiguousGuid>) {
        let mut interfaces: Vec<InterfaceEntry> = self
            .by_name
            .into_iter()
            .map(|(name, guids)| InterfaceEntry { name, guids })
            .collect();
        interfaces.sort_by(|a, b| {
            let la = a.name.to_lowercase();
            let lb = b.name.to_lowercase();
            la.cmp(&lb).then_with(|| a.name.cmp(&b.name))
        });

        let ambiguous = self
            .ambiguous
            .into_iter()
            .map(|(guid, names)| AmbiguousGuid { guid, names: names.into_iter().collect() })
            .collect();

        (interfaces, ambiguous)
    }
}

/// Re-spell a name with the interface `I` convention on its leaf:
/// `Windows.Foundation.AsyncActionCompletedHandler` becomes
/// `Windows.Foundation.IAsyncActionCompletedHandler`. Template
/// arguments are excluded from the leaf search. Names without a dotted
/// prefix come back unchanged.
fn mark_interface(name: &str) -> String {
    let bound = name.find('<').unwrap_or(name.len());
    match name[..bound].rfind('.') {
        Some(dot) if dot > 0 => format!("{}I{}", &name[..=dot], &name[dot + 1..]),
        _ => name.to_string(),
    }
}

impl GuidReport {
    /// Assemble the final snapshot from a drained registry plus the
    /// run's diagnostics and counters.
    pub fn assemble(
        registry: Registry,
        diagnostics: Vec<crate::types::Diagnostic>,
        files_scanned: usize,
        declarations: usize,
        scan_time_ms: u64,
    ) -> GuidReport {
        let (interfaces, ambiguous) = registry.finalize();
        GuidReport { interfaces, ambiguous, diagnostics, files_scanned, declarations, scan_time_ms }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
