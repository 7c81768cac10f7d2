//! guidex CLI — extract the GUID → interface-name database from a
//! Windows SDK header tree.
//!
//! Calls `guidex-core` directly.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use guidex_core::{load_guidex_config, render, scan_headers, Guid};

/// guidex — Windows SDK GUID database extractor.
#[derive(Parser)]
#[command(name = "guidex", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output as JSON instead of human-readable text
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan SDK headers and write the GUID database files
    Scan {
        /// SDK include root (default: current directory)
        #[arg(long)]
        root: Option<PathBuf>,

        /// Restrict the scan to WinRT subtrees
        #[arg(long)]
        only_winrt: bool,

        /// Output directory for the rendered database files
        #[arg(long, default_value = ".")]
        out: PathBuf,

        /// Override the database name used in titles and file names
        #[arg(long)]
        title: Option<String>,
    },
    /// Scan and look up interfaces by name fragment or GUID
    Lookup {
        /// Case-insensitive name fragment, or a full GUID
        query: String,

        /// SDK include root (default: current directory)
        #[arg(long)]
        root: Option<PathBuf>,
    },
    /// Scan and report extraction diagnostics
    Check {
        /// SDK include root (default: current directory)
        #[arg(long)]
        root: Option<PathBuf>,

        /// Maximum diagnostics to print
        #[arg(long, default_value = "50")]
        limit: usize,
    },
}

fn resolve_root(root: Option<PathBuf>) -> PathBuf {
    root.unwrap_or_else(|| std::env::current_dir().expect("Could not determine current directory"))
        .canonicalize()
        .expect("Path not found")
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("guidex=warn".parse().unwrap()),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Scan { root, only_winrt, out, title } => {
            let root = resolve_root(root);
            let mut config = load_guidex_config(&root);
            if only_winrt {
                config.only_winrt = true;
            }
            let report = scan_headers(&config);

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&report).unwrap());
                return;
            }

            let name = title.unwrap_or_else(|| {
                if config.only_winrt { "WinRT Interfaces" } else { "All Interfaces" }.to_string()
            });
            let doc_title = format!("{name} - Windows GUID Database");
            let comment = format!(
                "{} interfaces automatically extracted from the SDK header files",
                report.interfaces.len()
            );

            if let Err(e) = std::fs::create_dir_all(&out) {
                eprintln!("Could not create {}: {e}", out.display());
                std::process::exit(1);
            }

            let outputs = [
                ("ini", render::render_ini(&report, &doc_title, &comment)),
                ("xml", render::render_xml(&report, &doc_title, &comment)),
                ("htm", render::render_html(&report, &doc_title, &comment)),
                ("cs", render::render_csharp(&report, &doc_title, &comment)),
            ];
            for (ext, text) in outputs {
                let path = out.join(format!("{name}.{ext}"));
                match std::fs::write(&path, text) {
                    Ok(()) => println!("File saved: {}", path.display()),
                    Err(e) => {
                        eprintln!("Failed to write {}: {e}", path.display());
                        std::process::exit(1);
                    }
                }
            }
            eprintln!(
                "\n{} interfaces, {} ambiguous GUIDs, {} diagnostics ({} files in {} ms)",
                report.interfaces.len(),
                report.ambiguous.len(),
                report.diagnostics.len(),
                report.files_scanned,
                report.scan_time_ms
            );
        }
        Commands::Lookup { query, root } => {
            let root = resolve_root(root);
            let config = load_guidex_config(&root);
            let report = scan_headers(&config);

            let as_guid = Guid::parse(&query);
            let needle = query.to_lowercase();
            let matches: Vec<_> = report
                .interfaces
                .iter()
                .filter(|e| {
                    e.name.to_lowercase().contains(&needle)
                        || as_guid.map(|g| e.guids.contains(&g)).unwrap_or(false)
                })
                .collect();

            if cli.json {
                let items: Vec<serde_json::Value> = matches
                    .iter()
                    .map(|e| serde_json::json!({ "name": e.name, "guids": e.guids }))
                    .collect();
                println!("{}", serde_json::to_string_pretty(&items).unwrap());
            } else {
                if matches.is_empty() {
                    eprintln!("No results for '{query}'");
                    std::process::exit(1);
                }
                for e in &matches {
                    for g in &e.guids {
                        println!("{g}  {}", e.name);
                    }
                }
                eprintln!("\n{} results", matches.len());
            }
        }
        Commands::Check { root, limit } => {
            let root = resolve_root(root);
            let config = load_guidex_config(&root);
            let report = scan_headers(&config);

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&report.diagnostics).unwrap());
                return;
            }

            for d in report.diagnostics.iter().take(limit) {
                println!("{}:{}: {}: {}", d.file, d.line, d.reason, d.text);
            }
            let total = report.diagnostics.len();
            if total > limit {
                eprintln!("... {} more", total - limit);
            }
            eprintln!("\n{total} diagnostics across {} files", report.files_scanned);
        }
    }
}
