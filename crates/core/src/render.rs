//! Report rendering.
//!
//! A finalized [`GuidReport`] is rendered into four textual formats:
//! an INI mapping, an XML database, an HTML table, and a C# source
//! fragment for direct inclusion in tooling. All four walk the report
//! in its already-sorted order, so output is deterministic. Ambiguous
//! GUIDs carry a warning annotation in every format that supports one.

use std::fmt::Write as _;

use crate::types::GuidReport;

/// Escape `&`, `<` and `>` for XML/HTML contexts. Template names like
/// `IVector<Uri*>` appear verbatim in reports and must not break
/// markup.
fn escape(s: &str) -> String {
    s.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

fn ambiguity_note(report: &GuidReport, guid: crate::types::Guid) -> Option<String> {
    report.ambiguity_for(guid).map(|names| names.join(" and "))
}

/// `GUID = Name` pairs under a single section, ambiguities flagged as
/// comment lines.
pub fn render_ini(report: &GuidReport, title: &str, comment: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "; {title}");
    let _ = writeln!(out, "; {comment}");
    out.push_str("\n[All Interfaces]\n");

    for entry in &report.interfaces {
        for guid in &entry.guids {
            if let Some(names) = ambiguity_note(report, *guid) {
                let _ = writeln!(out, "\n; The following GUID is ambiguous for {names}");
            }
            let _ = writeln!(out, "{guid} = {}", entry.name);
        }
    }
    out
}

/// One `<Interface>` element per binding, with a `Warning` attribute
/// on ambiguous GUIDs.
pub fn render_xml(report: &GuidReport, title: &str, comment: &str) -> String {
    let mut out = String::new();
    out.push_str("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n");
    let _ = writeln!(out, "<!-- {} -->", escape(comment));
    let _ = writeln!(out, "<GuidDatabase Title=\"{}\">", escape(title));

    for entry in &report.interfaces {
        for guid in &entry.guids {
            let warn = match ambiguity_note(report, *guid) {
                Some(names) => {
                    format!("\n\t           Warning=\"This GUID is ambiguous for {}\"", escape(&names))
                }
                None => String::new(),
            };
            let _ = writeln!(
                out,
                "\t<Interface GUID=\"{guid}\" Name=\"{}\"{warn} />",
                escape(&entry.name)
            );
        }
    }
    out.push_str("</GuidDatabase>\n");
    out
}

/// A single two-column table; ambiguity warnings become full-width
/// rows with the `Warning` class so a stylesheet can highlight them.
pub fn render_html(report: &GuidReport, title: &str, comment: &str) -> String {
    let mut out = String::new();
    out.push_str("<!DOCTYPE html>\n<html>\n<head>\n");
    let _ = writeln!(out, "<meta charset=\"utf-8\">\n<title>{}</title>", escape(title));
    out.push_str("</head>\n<body>\n");
    let _ = writeln!(out, "<h2>{}</h2>", escape(title));
    let _ = writeln!(out, "<p>{}</p>", escape(comment));
    out.push_str("<table border='1' cellspacing='0' cellpadding='0'>\n");

    for entry in &report.interfaces {
        for guid in &entry.guids {
            if let Some(names) = ambiguity_note(report, *guid) {
                let _ = writeln!(
                    out,
                    "\t<tr><td colspan='2' class='Warning'>The following GUID is ambiguous for {}</td></tr>",
                    escape(&names)
                );
            }
            let _ = writeln!(out, "\t<tr><td>{guid}</td><td>{}</td></tr>", escape(&entry.name));
        }
    }
    out.push_str("</table>\n</body>\n</html>\n");
    out
}

/// A C# dictionary-population fragment, matching the consumer code
/// this database was historically embedded in.
pub fn render_csharp(report: &GuidReport, title: &str, comment: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "// {title}");
    let _ = writeln!(out, "// {comment}");
    out.push_str("\nstatic void FillInterfaces()\n{\n");

    for entry in &report.interfaces {
        for guid in &entry.guids {
            if let Some(names) = ambiguity_note(report, *guid) {
                let _ = writeln!(out, "\n\t\t// The following GUID is ambiguous for {names}");
            }
            let _ = writeln!(out, "\t\tmi_Interfaces[\"{guid}\"] = \"{}\";", entry.name);
        }
    }
    out.push_str("}\n");
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
