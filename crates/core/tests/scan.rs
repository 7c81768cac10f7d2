//! End-to-end scan over a synthetic SDK include tree.

use std::fs;

use guidex_core::{load_guidex_config, render, scan_headers};

/// Lay out a miniature SDK root covering the main declaration idioms,
/// plus a config file with an out-of-band binding.
fn sdk_fixture() -> tempfile::TempDir {
    let tmp = tempfile::tempdir().unwrap();
    let root = tmp.path();
    fs::create_dir_all(root.join("um")).unwrap();
    fs::create_dir_all(root.join("winrt")).unwrap();
    fs::create_dir_all(root.join("cppwinrt/winrt/impl")).unwrap();

    fs::write(
        root.join("um/d2d1.h"),
        r#"// Direct2D resource interfaces
interface DX_DECLARE_INTERFACE("2cd90691-12e2-11dc-9fed-001143a055f9") ID2D1Resource : public IUnknown
{
};
"#,
    )
    .unwrap();

    fs::write(
        root.join("um/amstream.h"),
        "DEFINE_GUID(CLSID_AMMultiMediaStream,\n\
         0x49c47ce5, 0x9ba4, 0x11d0, 0x82, 0x12, 0x00, 0xc0, 0x4f, 0xc3, 0x2c, 0x45);\n",
    )
    .unwrap();

    fs::write(
        root.join("winrt/windows.ui.webui.h"),
        "namespace ABI {\n\
         namespace Windows {\n\
         namespace UI {\n\
         namespace WebUI {\n\
         MIDL_INTERFACE(\"2b09a173-b68e-4def-88c1-8de84e5aab2f\")\n\
         IWebUIActivatedEventArgs : public IInspectable\n\
         {\n\
         };\n\
         } } } }\n",
    )
    .unwrap();

    // The cppwinrt projection restates the same interface; the run
    // must fold it into the existing entry, not duplicate it.
    fs::write(
        root.join("cppwinrt/winrt/impl/windows.ui.webui.2.h"),
        "template <> inline constexpr guid guid_v<Windows::UI::WebUI::IWebUIActivatedEventArgs>{ 0x2B09A173,0xB68E,0x4DEF,{ 0x88,0xC1,0x8D,0xE8,0x4E,0x5A,0xAB,0x2F } };\n",
    )
    .unwrap();

    fs::write(
        root.join("um/broken.h"),
        "SOME_UNKNOWN_MACRO(\"d3eb5c44-26f0-4a55-b7cd-2600b4e9a6c2\", IMystery)\n",
    )
    .unwrap();

    fs::write(
        root.join(".guidex.toml"),
        r#"
[[extra]]
guid = "1A6B8392-1F98-4E55-AB54-5B4D8E7D1BFD"
name = "IUndocumentedFactory"
"#,
    )
    .unwrap();

    tmp
}

#[test]
fn test_full_scan_reconciles_all_sources() {
    let tmp = sdk_fixture();
    let config = load_guidex_config(tmp.path());
    let report = scan_headers(&config);

    assert_eq!(report.files_scanned, 5);
    assert_eq!(report.declarations, 4);

    let names: Vec<&str> = report.interfaces.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "ABI.Windows.UI.WebUI.IWebUIActivatedEventArgs",
            "CLSID_AMMultiMediaStream",
            "ID2D1Resource",
            "IUndocumentedFactory",
        ]
    );

    // The projected restatement folded into one entry with one GUID.
    let webui = &report.interfaces[0];
    assert_eq!(webui.guids.len(), 1);
    assert_eq!(webui.guids[0].to_string(), "2B09A173-B68E-4DEF-88C1-8DE84E5AAB2F");

    assert!(report.ambiguous.is_empty());

    assert_eq!(report.diagnostics.len(), 1);
    let diag = &report.diagnostics[0];
    assert_eq!(diag.file, "um/broken.h");
    assert_eq!(diag.line, 1);
    assert!(diag.text.contains("SOME_UNKNOWN_MACRO"));
}

#[test]
fn test_only_winrt_narrows_the_report() {
    let tmp = sdk_fixture();
    let mut config = load_guidex_config(tmp.path());
    config.only_winrt = true;
    let report = scan_headers(&config);

    assert!(report
        .interfaces
        .iter()
        .any(|e| e.name == "ABI.Windows.UI.WebUI.IWebUIActivatedEventArgs"));
    assert!(!report.interfaces.iter().any(|e| e.name == "ID2D1Resource"));
    // No um headers scanned, so the broken one never surfaces.
    assert!(report.diagnostics.is_empty());
}

#[test]
fn test_report_renders_and_serializes() {
    let tmp = sdk_fixture();
    let config = load_guidex_config(tmp.path());
    let report = scan_headers(&config);

    let ini = render::render_ini(&report, "All Interfaces - Windows GUID Database", "test");
    assert!(ini.contains("2CD90691-12E2-11DC-9FED-001143A055F9 = ID2D1Resource"));
    assert!(ini.contains("1A6B8392-1F98-4E55-AB54-5B4D8E7D1BFD = IUndocumentedFactory"));

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["files_scanned"], 5);
    assert!(json["interfaces"].as_array().unwrap().len() >= 4);
}

#[test]
fn test_empty_tree_yields_empty_report() {
    let tmp = tempfile::tempdir().unwrap();
    let config = load_guidex_config(tmp.path());
    let report = scan_headers(&config);
    assert_eq!(report.files_scanned, 0);
    assert!(report.interfaces.is_empty());
    assert!(report.diagnostics.is_empty());
}
