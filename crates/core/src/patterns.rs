//! Pattern dispatch — classify normalized lines into declaration
//! idioms and extract (GUID, name) pairs.
//!
//! SDK headers express "this identifier names this interface" through
//! more than a dozen unrelated macro spellings. There is no grammar to
//! parse against: recognition is shape-based, driven by an ordered
//! table of recognizers evaluated first-match-wins. The ordering is
//! data, not control flow, so the specific-before-general rules stay
//! auditable (see [`recognizers`]).
//!
//! A line that carries a GUID-shaped token but matches no idiom is a
//! syntax error: it becomes a [`Diagnostic`] with file and original
//! line number, and the scan moves on. Nothing here ever aborts a run.

use regex::Regex;

use crate::assemble::{
    braced_hex_guid, extract_args, inline_hex_guid, is_content_line, next_token,
};
use crate::namespace;
use crate::normalize::normalize_lines;
use crate::types::{Declaration, Diagnostic, RejectReason};

/// Textual shape of a hyphenated GUID, found anywhere in a line.
const GUID_TOKEN: &str = r"[0-9a-fA-F]{8}-([0-9a-fA-F]{4}-){3}[0-9a-fA-F]{12}";

// ---------------------------------------------------------------------------
// Extraction context
// ---------------------------------------------------------------------------

/// Per-file options influencing name qualification.
pub struct ExtractOptions<'a> {
    /// Sentinel for backward namespace resolution (and the prefix
    /// forced onto dotted WinRT template names).
    pub root_namespace: &'a str,
    /// Whether the file lives under a WinRT subtree.
    pub winrt: bool,
}

/// Everything recovered from one header file.
#[derive(Debug, Default)]
pub struct FileExtraction {
    pub declarations: Vec<Declaration>,
    pub diagnostics: Vec<Diagnostic>,
}

/// A GUID-shaped token located in the current line.
struct GuidHit {
    /// Byte offset of the token within the normalized line.
    start: usize,
    /// The token text, uppercased.
    text: String,
}

/// Line cursor handed to recognizers; multi-line idioms advance
/// `index`, and the dispatch loop resumes after the last consumed line.
struct Cursor<'a> {
    lines: &'a [String],
    index: usize,
}

/// Outcome of running one recognizer against its matched line.
enum Extraction {
    /// A (GUID, name) fact to submit to the registry.
    Binding { guid: String, name: String },
    /// Recognized and deliberately skipped (whitelisted residuals,
    /// idioms that are always restated by a later declaration).
    Ignored,
    /// Recognized but malformed; reported, never fatal.
    Reject(RejectReason),
}

// ---------------------------------------------------------------------------
// Recognizer table
// ---------------------------------------------------------------------------

/// One declaration idiom: a cheap shape test plus an extraction
/// strategy that may consume further lines.
trait Recognizer: Sync {
    /// Whether this idiom is only meaningful on lines that already
    /// carry a GUID-shaped token.
    fn needs_guid(&self) -> bool {
        true
    }
    fn matches(&self, line: &str) -> bool;
    fn extract(
        &self,
        cur: &mut Cursor<'_>,
        hit: Option<&GuidHit>,
        opts: &ExtractOptions<'_>,
    ) -> Extraction;
}

/// The ordered dispatch table. Order is load-bearing:
///
/// - `TypedefUuid` runs before `InterfaceDecl`: both react to
///   `DECLSPEC_UUID`, but the typedef/`[uuid(...)]` spelling puts a
///   type keyword between GUID and name.
/// - `DECLARE_INTERFACE_IID_` runs before `DECLARE_INTERFACE_IID`: the
///   shorter prefix would otherwise shadow the longer, differently
///   shaped macro.
/// - `DefineGuid` excludes the `DEFINE_GUIDSTRUCT`/`DEFINE_GUIDEX`
///   spellings itself, so the dedicated `DEFINE_GUIDSTRUCT` entry
///   lower in the table still sees its lines.
fn recognizers() -> Vec<Box<dyn Recognizer>> {
    vec![
        Box::new(StaticUuid),
        Box::new(DefineGuid),
        Box::new(ConstexprGuid),
        Box::new(TypedefUuid),
        Box::new(InterfaceDecl),
        Box::new(MacroCall { prefix: "DECLARE_INTERFACE_IID_", args: 3, name_index: 0 }),
        Box::new(MacroCall { prefix: "IMMPID_START_LIST", args: 3, name_index: 0 }),
        Box::new(MacroCall { prefix: "DECLARE_INTERFACE_IID", args: 2, name_index: 0 }),
        Box::new(MacroCall { prefix: "CROSS_PLATFORM_UUIDOF", args: 2, name_index: 0 }),
        Box::new(MacroCall { prefix: "DEFINE_GUIDSTRUCT", args: 2, name_index: 1 }),
        Box::new(MacroCall { prefix: "DEFINE_CODECAPI_GUID", args: 13, name_index: 0 }),
        Box::new(ConstBstr),
        Box::new(EventGuidString),
    ]
}

// ---------------------------------------------------------------------------
// Individual recognizers
// ---------------------------------------------------------------------------

/// `static const UUID Name = { 0x…, …, { 8 bytes } };` — the name sits
/// before `=`, the hex payload runs until two closing braces.
struct StaticUuid;

impl Recognizer for StaticUuid {
    fn needs_guid(&self) -> bool {
        false
    }

    fn matches(&self, line: &str) -> bool {
        line.starts_with("static const UUID ")
    }

    fn extract(
        &self,
        cur: &mut Cursor<'_>,
        _hit: Option<&GuidHit>,
        _opts: &ExtractOptions<'_>,
    ) -> Extraction {
        let line = cur.lines[cur.index].clone();
        let rest = &line["static const UUID ".len()..];
        let Some((name, _)) = rest.split_once('=') else {
            return Extraction::Reject(RejectReason::UnrecognizedShape);
        };
        match braced_hex_guid(cur.lines, &mut cur.index) {
            Some(guid) => {
                Extraction::Binding { guid: guid.to_string(), name: name.trim().to_string() }
            }
            None => Extraction::Reject(RejectReason::LookaheadExhausted),
        }
    }
}

/// `DEFINE_GUID(Name, 0x…, × 11);` — name first, then the 11-field
/// payload; the argument list may span lines.
struct DefineGuid;

impl Recognizer for DefineGuid {
    fn needs_guid(&self) -> bool {
        false
    }

    fn matches(&self, line: &str) -> bool {
        line.starts_with("DEFINE_GUID")
            && !line.contains("DEFINE_GUIDSTRUCT")
            && !line.contains("DEFINE_GUIDEX")
    }

    fn extract(
        &self,
        cur: &mut Cursor<'_>,
        _hit: Option<&GuidHit>,
        _opts: &ExtractOptions<'_>,
    ) -> Extraction {
        let first = cur.lines[cur.index].clone();
        let outcome = match extract_args(cur.lines, &mut cur.index, 12) {
            Some(Ok(parts)) => {
                let fields: Vec<&str> = parts[1..].iter().map(|s| s.as_str()).collect();
                match crate::assemble::hex_list_to_guid(&fields) {
                    Some(guid) => {
                        return Extraction::Binding {
                            guid: guid.to_string(),
                            name: parts[0].clone(),
                        }
                    }
                    None => Extraction::Reject(RejectReason::MalformedGuid),
                }
            }
            Some(Err(_)) => Extraction::Reject(RejectReason::ArgumentCountMismatch),
            None => Extraction::Reject(RejectReason::LookaheadExhausted),
        };

        // ksproxy.h restates GUIDs through an alias macro:
        // DEFINE_GUID(IID_IKsPropertySet, STATIC_IID_IKsPropertySet);
        // Those carry no payload here and are safe to skip.
        if first.contains("STATIC_IID_") || first.contains("STATIC_CLSID_") {
            Extraction::Ignored
        } else {
            outcome
        }
    }
}

/// `template <> inline constexpr guid guid_v<NS::Name>{ …hex… };` —
/// the template argument is the qualified name, `::` folded to `.`.
struct ConstexprGuid;

impl Recognizer for ConstexprGuid {
    fn needs_guid(&self) -> bool {
        false
    }

    fn matches(&self, line: &str) -> bool {
        line.contains("inline constexpr guid")
    }

    fn extract(
        &self,
        cur: &mut Cursor<'_>,
        _hit: Option<&GuidHit>,
        opts: &ExtractOptions<'_>,
    ) -> Extraction {
        let line = &cur.lines[cur.index];
        let mut guid = None;

        // The search for `<` starts after the marker; `template <>`
        // earlier in the line must not be mistaken for the argument.
        let marker = line.find("inline constexpr guid").map(|p| p + "inline constexpr guid".len());
        let open = marker.and_then(|m| line[m..].find('<').map(|p| m + p));

        if let (Some(start), Some(end)) = (open, line.rfind('>')) {
            if end > start {
                let mut name = line[start + 1..end].replace("::", ".");
                guid = inline_hex_guid(line);

                if name.len() > 3 {
                    if let Some(g) = guid {
                        // WinRT headers omit the interop root from the
                        // template argument; qualified names get it back.
                        let root_prefix = format!("{}.", opts.root_namespace);
                        if opts.winrt && name.contains('.') && !name.starts_with(&root_prefix) {
                            name = format!("{root_prefix}{name}");
                        }
                        return Extraction::Binding { guid: g.to_string(), name };
                    }
                }
            }
        }

        // Plenty of constexpr guid lines carry no literal at all;
        // only a present GUID with an unusable name is an error.
        if guid.is_some() {
            Extraction::Reject(RejectReason::MalformedName)
        } else {
            Extraction::Ignored
        }
    }
}

/// `typedef DECLSPEC_UUID("…") enum WbemChangeFlagEnum` and the
/// `[uuid(…)] struct IBufferByteAccess` attribute spelling: the word
/// right after the GUID is a type keyword, the one after that is the
/// real name.
struct TypedefUuid;

impl Recognizer for TypedefUuid {
    fn matches(&self, line: &str) -> bool {
        line.starts_with("typedef DECLSPEC_UUID") || line.contains("[uuid(")
    }

    fn extract(
        &self,
        cur: &mut Cursor<'_>,
        hit: Option<&GuidHit>,
        _opts: &ExtractOptions<'_>,
    ) -> Extraction {
        let Some(hit) = hit else {
            return Extraction::Reject(RejectReason::UnrecognizedShape);
        };
        let mut pos = hit.start + hit.text.len();
        let keyword = next_token(cur.lines, &mut cur.index, &mut pos);
        if keyword.is_empty() {
            return Extraction::Reject(RejectReason::UnrecognizedShape);
        }
        let name = next_token(cur.lines, &mut cur.index, &mut pos);
        Extraction::Binding { guid: hit.text.clone(), name }
    }
}

/// The broad interface-declaration family — `MIDL_INTERFACE("…")`,
/// `class DECLSPEC_UUID("…")`, `struct __declspec(uuid("…"))`,
/// `ENUMG(…)`, and the DirectX `*_DECLARE_INTERFACE` spellings. The
/// name is the next word after the GUID (possibly on a following
/// line), and the enclosing namespace must be recovered by backward
/// scan because the idiom is not self-contained.
struct InterfaceDecl;

impl Recognizer for InterfaceDecl {
    fn matches(&self, line: &str) -> bool {
        line.starts_with("MIDL_INTERFACE")
            || line.starts_with("ENUMG")
            || line.contains("DECLSPEC_UUID")
            || line.contains("__declspec(uuid(")
            || line.starts_with("interface DX_DECLARE_INTERFACE")
            || line.starts_with("interface DWRITE_DECLARE_INTERFACE")
            || line.starts_with("interface DML_DECLARE_INTERFACE")
    }

    fn extract(
        &self,
        cur: &mut Cursor<'_>,
        hit: Option<&GuidHit>,
        opts: &ExtractOptions<'_>,
    ) -> Extraction {
        let Some(hit) = hit else {
            return Extraction::Reject(RejectReason::UnrecognizedShape);
        };
        let first_line = cur.index;
        let mut pos = hit.start + hit.text.len();
        let name = next_token(cur.lines, &mut cur.index, &mut pos);
        if name.is_empty() {
            return Extraction::Reject(RejectReason::UnrecognizedShape);
        }
        let ns = namespace::resolve(cur.lines, first_line, opts.root_namespace);
        Extraction::Binding { guid: hit.text.clone(), name: format!("{ns}{name}") }
    }
}

/// Fixed-arity macro calls differing only in expected argument count
/// and which comma-separated position holds the name. An argument
/// count mismatch after reassembly is a hard rejection.
struct MacroCall {
    prefix: &'static str,
    args: usize,
    name_index: usize,
}

impl Recognizer for MacroCall {
    fn matches(&self, line: &str) -> bool {
        line.starts_with(self.prefix)
    }

    fn extract(
        &self,
        cur: &mut Cursor<'_>,
        hit: Option<&GuidHit>,
        _opts: &ExtractOptions<'_>,
    ) -> Extraction {
        let Some(hit) = hit else {
            return Extraction::Reject(RejectReason::UnrecognizedShape);
        };
        match extract_args(cur.lines, &mut cur.index, self.args) {
            Some(Ok(parts)) => Extraction::Binding {
                guid: hit.text.clone(),
                name: parts[self.name_index].clone(),
            },
            Some(Err(_)) => Extraction::Reject(RejectReason::ArgumentCountMismatch),
            None => Extraction::Reject(RejectReason::LookaheadExhausted),
        }
    }
}

/// `const BSTR SpeechAudioFormatGUIDWave = L"{…}";` — the name sits
/// left of `=`, the GUID is the braced string literal.
struct ConstBstr;

impl Recognizer for ConstBstr {
    fn matches(&self, line: &str) -> bool {
        line.starts_with("const BSTR ")
    }

    fn extract(
        &self,
        cur: &mut Cursor<'_>,
        hit: Option<&GuidHit>,
        _opts: &ExtractOptions<'_>,
    ) -> Extraction {
        let Some(hit) = hit else {
            return Extraction::Reject(RejectReason::UnrecognizedShape);
        };
        let line = &cur.lines[cur.index];
        let rest = &line["const BSTR ".len()..];
        match rest.split_once('=') {
            Some((name, _)) => {
                Extraction::Binding { guid: hit.text.clone(), name: name.trim().to_string() }
            }
            None => Extraction::Reject(RejectReason::UnrecognizedShape),
        }
    }
}

/// `DECLARE_EVENTGUID_STRING(…)` — always restated by a DEFINE_GUID
/// for the same fact on a following line, so recording it here would
/// only duplicate work.
struct EventGuidString;

impl Recognizer for EventGuidString {
    fn matches(&self, line: &str) -> bool {
        line.starts_with("DECLARE_EVENTGUID_STRING")
    }

    fn extract(
        &self,
        _cur: &mut Cursor<'_>,
        _hit: Option<&GuidHit>,
        _opts: &ExtractOptions<'_>,
    ) -> Extraction {
        Extraction::Ignored
    }
}

// ---------------------------------------------------------------------------
// Per-file extraction loop
// ---------------------------------------------------------------------------

/// Extract every recognizable declaration from one header.
///
/// Raw lines are normalized once; the dispatcher then walks them top
/// to bottom, trying the recognizer table in priority order on each
/// content line. Recognizers that consume continuation lines advance
/// the cursor past them. Pure: all output is returned, nothing is
/// recorded globally.
pub fn extract_file(file: &str, raw_lines: &[String], opts: &ExtractOptions<'_>) -> FileExtraction {
    let lines = normalize_lines(file, raw_lines);
    let guid_re = Regex::new(GUID_TOKEN).unwrap();
    let table = recognizers();

    let mut out = FileExtraction::default();

    let mut l = 0;
    while l < lines.len() {
        let first_line = l;
        let line = &lines[l];
        l += 1;

        if !is_content_line(line, false) {
            continue;
        }

        let hit = guid_re
            .find(line)
            .map(|m| GuidHit { start: m.start(), text: m.as_str().to_uppercase() });

        let mut matched = false;
        for rec in &table {
            if rec.needs_guid() && hit.is_none() {
                continue;
            }
            if !rec.matches(line) {
                continue;
            }
            matched = true;

            let mut cur = Cursor { lines: &lines, index: first_line };
            match rec.extract(&mut cur, hit.as_ref(), opts) {
                Extraction::Binding { guid, name } => out.declarations.push(Declaration {
                    guid,
                    name,
                    file: file.to_string(),
                    line: first_line + 1,
                }),
                Extraction::Ignored => {}
                Extraction::Reject(reason) => out.diagnostics.push(Diagnostic {
                    file: file.to_string(),
                    line: first_line + 1,
                    text: lines[first_line].clone(),
                    reason,
                }),
            }
            l = cur.index + 1;
            break;
        }

        // A GUID-shaped token that fit no idiom is a syntax error; a
        // line without one is simply not a declaration.
        if !matched && hit.is_some() {
            out.diagnostics.push(Diagnostic {
                file: file.to_string(),
                line: first_line + 1,
                text: lines[first_line].clone(),
                reason: RejectReason::UnrecognizedShape,
            });
        }
    }

    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(input: &[&str]) -> FileExtraction {
        let raw: Vec<String> = input.iter().map(|s| s.to_string()).collect();
        let opts = ExtractOptions { root_namespace: "ABI", winrt: false };
        extract_file("test.h", &raw, &opts)
    }

    fn extract_winrt(input: &[&str]) -> FileExtraction {
        let raw: Vec<String> = input.iter().map(|s| s.to_string()).collect();
        let opts = ExtractOptions { root_namespace: "ABI", winrt: true };
        extract_file("test.h", &raw, &opts)
    }

    #[test]
    fn test_static_const_uuid_multi_line() {
        let out = extract(&[
            "static const UUID D3D12ExperimentalShaderModels = {",
            "    0x76f5573e,",
            "    0xf13a,",
            "    0x40f5,",
            "    { 0xb2, 0x97, 0x81, 0xce, 0x9e, 0x18, 0x93, 0x3f }",
            "};",
        ]);
        assert_eq!(out.declarations.len(), 1);
        let d = &out.declarations[0];
        assert_eq!(d.guid, "76F5573E-F13A-40F5-B297-81CE9E18933F");
        assert_eq!(d.name, "D3D12ExperimentalShaderModels");
        assert_eq!(d.line, 1);
        assert!(out.diagnostics.is_empty());
    }

    #[test]
    fn test_define_guid_single_line() {
        let out = extract(&[
            "DEFINE_GUID(IID_IScriptNode, 0xaee2a94, 0xbcbb, 0x11d0, 0x8c, 0x72, 0x0, 0xc0, 0x4f, 0xc2, 0xb0, 0x85);",
        ]);
        assert_eq!(out.declarations.len(), 1);
        assert_eq!(out.declarations[0].name, "IID_IScriptNode");
        assert_eq!(out.declarations[0].guid, "0AEE2A94-BCBB-11D0-8C72-00C04FC2B085");
    }

    #[test]
    fn test_define_guid_split_across_lines() {
        let out = extract(&[
            "DEFINE_GUID(CLSID_AMMultiMediaStream,",
            "0x49c47ce5, 0x9ba4, 0x11d0, 0x82, 0x12, 0x00, 0xc0, 0x4f, 0xc3, 0x2c, 0x45);",
        ]);
        assert_eq!(out.declarations.len(), 1);
        assert_eq!(out.declarations[0].guid, "49C47CE5-9BA4-11D0-8212-00C04FC32C45");
        assert_eq!(out.declarations[0].line, 1);
    }

    #[test]
    fn test_define_guid_static_alias_is_whitelisted() {
        let out = extract(&["DEFINE_GUID(IID_IKsPropertySet, STATIC_IID_IKsPropertySet);"]);
        assert!(out.declarations.is_empty());
        assert!(out.diagnostics.is_empty());
    }

    #[test]
    fn test_define_guid_wrong_arity_is_reported() {
        let out = extract(&["DEFINE_GUID(CLSID_Broken, 0x1, 0x2);"]);
        assert!(out.declarations.is_empty());
        assert_eq!(out.diagnostics.len(), 1);
        assert_eq!(out.diagnostics[0].reason, RejectReason::ArgumentCountMismatch);
        assert_eq!(out.diagnostics[0].line, 1);
    }

    #[test]
    fn test_define_guidex_is_not_claimed() {
        // Different macro, no GUID token: silently skipped.
        let out = extract(&["DEFINE_GUIDEX(IID_IKsPinEx);"]);
        assert!(out.declarations.is_empty());
        assert!(out.diagnostics.is_empty());
    }

    #[test]
    fn test_constexpr_guid_template() {
        let out = extract_winrt(&[
            "template <> inline constexpr guid guid_v<Windows::AI::MachineLearning::IImageFeatureDescriptor>{ 0x365585A5,0x171A,0x4A2A,{ 0x98,0x5F,0x26,0x51,0x59,0xD3,0x89,0x5A } };",
        ]);
        assert_eq!(out.declarations.len(), 1);
        let d = &out.declarations[0];
        assert_eq!(d.guid, "365585A5-171A-4A2A-985F-265159D3895A");
        assert_eq!(d.name, "ABI.Windows.AI.MachineLearning.IImageFeatureDescriptor");
    }

    #[test]
    fn test_constexpr_guid_without_literal_is_ignored() {
        let out = extract(&["template <typename T> inline constexpr guid guid_v = guid_of<T>();"]);
        assert!(out.declarations.is_empty());
        assert!(out.diagnostics.is_empty());
    }

    #[test]
    fn test_typedef_declspec_uuid_skips_type_keyword() {
        let out = extract(&[
            r#"typedef DECLSPEC_UUID("4A249B72-FC9A-11d1-8B1E-00600806D9B6")"#,
            "enum WbemChangeFlagEnum",
        ]);
        assert_eq!(out.declarations.len(), 1);
        assert_eq!(out.declarations[0].name, "WbemChangeFlagEnum");
        assert_eq!(out.declarations[0].guid, "4A249B72-FC9A-11D1-8B1E-00600806D9B6");
    }

    #[test]
    fn test_uuid_attribute_skips_type_keyword() {
        let out = extract(&[
            "[uuid(905a0fef-bc53-11df-8c49-001e4fc686da)]",
            "struct IBufferByteAccess : public IUnknown",
        ]);
        assert_eq!(out.declarations.len(), 1);
        assert_eq!(out.declarations[0].name, "IBufferByteAccess");
    }

    #[test]
    fn test_midl_interface_with_namespace() {
        let out = extract(&[
            "namespace ABI {",
            "namespace Windows {",
            "namespace UI {",
            "MIDL_INTERFACE(\"2b09a173-b68e-4def-88c1-8de84e5aab2f\")",
            "IWebUIActivatedEventArgs : public IInspectable",
        ]);
        assert_eq!(out.declarations.len(), 1);
        assert_eq!(out.declarations[0].name, "ABI.Windows.UI.IWebUIActivatedEventArgs");
        assert_eq!(out.declarations[0].line, 4);
    }

    #[test]
    fn test_midl_interface_without_namespace() {
        let out = extract(&[
            "MIDL_INTERFACE(\"00000035-0000-0000-C000-000000000046\")",
            "IActivationFactory : public IInspectable",
        ]);
        assert_eq!(out.declarations.len(), 1);
        assert_eq!(out.declarations[0].name, "IActivationFactory");
    }

    #[test]
    fn test_class_declspec_uuid_name_on_next_line() {
        let out = extract(&[
            r#"class DECLSPEC_UUID("0BFCC060-8C1D-11d0-ACCD-00AA0060275C")"#,
            "DebugHelper;",
        ]);
        assert_eq!(out.declarations.len(), 1);
        assert_eq!(out.declarations[0].name, "DebugHelper");
    }

    #[test]
    fn test_declspec_with_interleaved_directives() {
        let out = extract(&[
            "MIDL_INTERFACE(\"7ae1fa72-029e-4dc5-a2f8-5fb763154150\")",
            "#if WINDOWS_AI_MACHINELEARNING_PREVIEW_CONTRACT_VERSION >= 0x20000",
            "DEPRECATED(\"Use IImageFeatureDescriptor instead.\")",
            "#endif",
            "IImageVariableDescriptorPreview : public IInspectable",
        ]);
        assert_eq!(out.declarations.len(), 1);
        assert_eq!(out.declarations[0].name, "IImageVariableDescriptorPreview");
    }

    #[test]
    fn test_declspec_template_name() {
        let out = extract(&[
            "template <>",
            r#"struct __declspec(uuid("0d82bd8d-fe62-5d67-a7b9-7886dd75bc4e"))"#,
            "IVector<ABI::Windows::Foundation::Uri*> : IVector_impl<ABI::Windows::Foundation::Uri*>",
        ]);
        assert_eq!(out.declarations.len(), 1);
        assert_eq!(out.declarations[0].name, "IVector<ABI.Windows.Foundation.Uri*>");
    }

    #[test]
    fn test_dx_declare_interface() {
        let out = extract(&[
            r#"interface DX_DECLARE_INTERFACE("2cd90691-12e2-11dc-9fed-001143a055f9") ID2D1Resource : public IUnknown"#,
        ]);
        assert_eq!(out.declarations.len(), 1);
        assert_eq!(out.declarations[0].name, "ID2D1Resource");
    }

    #[test]
    fn test_enumg() {
        let out = extract(&["ENUMG(6F8C2442-2BFB-4180-9EE5-EA1FB47AE35C) COPPEventBlockReason"]);
        assert_eq!(out.declarations.len(), 1);
        assert_eq!(out.declarations[0].name, "COPPEventBlockReason");
        assert_eq!(out.declarations[0].guid, "6F8C2442-2BFB-4180-9EE5-EA1FB47AE35C");
    }

    #[test]
    fn test_declare_interface_iid_three_args() {
        let out = extract(&[
            r#"DECLARE_INTERFACE_IID_(ICompositorInterop, IUnknown, "25297D5C-3AD4-4C9C-B5CF-E36A38512330")"#,
        ]);
        assert_eq!(out.declarations.len(), 1);
        assert_eq!(out.declarations[0].name, "ICompositorInterop");
        assert_eq!(out.declarations[0].guid, "25297D5C-3AD4-4C9C-B5CF-E36A38512330");
    }

    #[test]
    fn test_declare_interface_iid_two_args() {
        let out = extract(&[
            r#"DECLARE_INTERFACE_IID(IFileViewerA, "000214f0-0000-0000-c000-000000000046")"#,
        ]);
        assert_eq!(out.declarations.len(), 1);
        assert_eq!(out.declarations[0].name, "IFileViewerA");
        assert_eq!(out.declarations[0].guid, "000214F0-0000-0000-C000-000000000046");
    }

    #[test]
    fn test_cross_platform_uuidof() {
        let out = extract(&[
            r#"CROSS_PLATFORM_UUIDOF(IDxcBlob, "8BA5FB08-5195-40e2-AC58-0D989C3A0102")"#,
        ]);
        assert_eq!(out.declarations.len(), 1);
        assert_eq!(out.declarations[0].name, "IDxcBlob");
    }

    #[test]
    fn test_define_guidstruct_name_is_second_arg() {
        let out = extract(&[
            r#"DEFINE_GUIDSTRUCT("9F2F7B66-65AC-4FA6-8AE4-123C78B89313", DEVINTERFACE_AUDIOENDPOINTPLUGIN);"#,
        ]);
        assert_eq!(out.declarations.len(), 1);
        assert_eq!(out.declarations[0].name.trim(), "DEVINTERFACE_AUDIOENDPOINTPLUGIN");
        assert_eq!(out.declarations[0].guid, "9F2F7B66-65AC-4FA6-8AE4-123C78B89313");
    }

    #[test]
    fn test_define_codecapi_guid() {
        let out = extract(&[
            r#"DEFINE_CODECAPI_GUID( AVEncCommonFormatConstraint, "57cbb9b8-116f-4951-b40c-c2a035ed8f17", 0x57cbb9b8, 0x116f, 0x4951, 0xb4, 0x0c, 0xc2, 0xa0, 0x35, 0xed, 0x8f, 0x17 )"#,
        ]);
        assert_eq!(out.declarations.len(), 1);
        assert_eq!(out.declarations[0].name.trim(), "AVEncCommonFormatConstraint");
        assert_eq!(out.declarations[0].guid, "57CBB9B8-116F-4951-B40C-C2A035ED8F17");
    }

    #[test]
    fn test_const_bstr() {
        let out = extract(&[
            r#"const BSTR SpeechAudioFormatGUIDWave = L"{C31ADBAE-527F-4ff5-A230-F62BB61FF70C}";"#,
        ]);
        assert_eq!(out.declarations.len(), 1);
        assert_eq!(out.declarations[0].name, "SpeechAudioFormatGUIDWave");
        assert_eq!(out.declarations[0].guid, "C31ADBAE-527F-4FF5-A230-F62BB61FF70C");
    }

    #[test]
    fn test_eventguid_string_is_ignored() {
        let out = extract(&[
            r#"DECLARE_EVENTGUID_STRING( g_szGuidSmtpSourceType, "{fb65c4dc-e468-11d1-aa67-00c04fa345f6}");"#,
            "DEFINE_GUID(GUID_SMTP_SOURCE_TYPE, 0xfb65c4dc, 0xe468, 0x11d1, 0xaa, 0x67, 0x0, 0xc0, 0x4f, 0xa3, 0x45, 0xf6);",
        ]);
        // Only the DEFINE_GUID restatement is recorded.
        assert_eq!(out.declarations.len(), 1);
        assert_eq!(out.declarations[0].name, "GUID_SMTP_SOURCE_TYPE");
        assert!(out.diagnostics.is_empty());
    }

    #[test]
    fn test_unrecognized_guid_line_is_syntax_error() {
        let out = extract(&[
            "struct Harmless {};",
            r#"SOME_UNKNOWN_MACRO("d3eb5c44-26f0-4a55-b7cd-2600b4e9a6c2", IMystery)"#,
        ]);
        assert!(out.declarations.is_empty());
        assert_eq!(out.diagnostics.len(), 1);
        assert_eq!(out.diagnostics[0].reason, RejectReason::UnrecognizedShape);
        assert_eq!(out.diagnostics[0].line, 2);
        assert!(out.diagnostics[0].text.contains("SOME_UNKNOWN_MACRO"));
    }

    #[test]
    fn test_guid_in_comment_is_invisible() {
        let out = extract(&[
            "// CLSID 1e0f8400-15bc-4af6-94a8-1cf08c79e355 lives elsewhere",
            "/* 1e0f8400-15bc-4af6-94a8-1cf08c79e355 */",
        ]);
        assert!(out.declarations.is_empty());
        assert!(out.diagnostics.is_empty());
    }

    #[test]
    fn test_run_continues_after_errors() {
        let out = extract(&[
            "DEFINE_GUID(CLSID_Broken, 0x1, 0x2);",
            "DEFINE_GUID(CLSID_Good, 0x49c47ce5, 0x9ba4, 0x11d0, 0x82, 0x12, 0x00, 0xc0, 0x4f, 0xc3, 0x2c, 0x45);",
        ]);
        assert_eq!(out.declarations.len(), 1);
        assert_eq!(out.declarations[0].name, "CLSID_Good");
        assert_eq!(out.diagnostics.len(), 1);
    }
}
