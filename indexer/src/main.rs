use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use regdoc_core::location::Location;
use regdoc_core::lookup::lookup;
use regdoc_core::persist::OutputPaths;
use regdoc_core::{export, AddressableNode, ExportOptions, WORDS_PER_FILE_THRESHOLD};
use tracing_subscriber::{EnvFilter, fmt};
use walkdir::WalkDir;

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "regdoc")]
#[command(about = "Build the search index and node table for register map documentation", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Export one or more register map JSON files
    Build {
        /// Input path (a JSON file, or a directory of them)
        #[arg(long)]
        input: String,
        /// Output documentation directory
        #[arg(long)]
        output: String,
        /// Override the page title
        #[arg(long)]
        title: Option<String>,
        /// Approximate number of words per search shard
        #[arg(long, default_value_t = WORDS_PER_FILE_THRESHOLD)]
        words_per_file: usize,
        /// Also export nodes and fields with ispresent=false
        #[arg(long, default_value_t = false)]
        include_not_present: bool,
        /// Property to list on every page that sets it (repeatable)
        #[arg(long = "extra-doc-property")]
        extra_doc_properties: Vec<String>,
    },
    /// Query a built search index
    Search {
        /// Output documentation directory of a previous build
        #[arg(long)]
        output: String,
        query: String,
    },
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Build { input, output, title, words_per_file, include_not_present, extra_doc_properties } => {
            let options = ExportOptions {
                title,
                words_per_file,
                skip_not_present: !include_not_present,
                extra_doc_properties,
            };
            build(&input, &output, &options)
        }
        Commands::Search { output, query } => search(&output, &query),
    }
}

fn build(input: &str, output: &str, options: &ExportOptions) -> Result<()> {
    let roots = load_roots(Path::new(input))?;
    tracing::info!(input, roots = roots.len(), "loaded register maps");
    export(&roots, Path::new(output), options)?;
    Ok(())
}

fn input_files(input_path: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = Vec::new();
    if input_path.is_dir() {
        for entry in WalkDir::new(input_path).sort_by_file_name().into_iter().filter_map(|e| e.ok()) {
            let p = entry.path();
            if p.is_file() && p.extension().and_then(|s| s.to_str()) == Some("json") {
                files.push(p.to_path_buf());
            }
        }
    } else if input_path.is_file() {
        files.push(input_path.to_path_buf());
    }
    files
}

/// Every root node found under `input_path`, in file name order.
fn load_roots(input_path: &Path) -> Result<Vec<AddressableNode>> {
    let mut roots = Vec::new();
    for file in input_files(input_path) {
        let f = File::open(&file).with_context(|| format!("opening {}", file.display()))?;
        let json: serde_json::Value = serde_json::from_reader(BufReader::new(f))
            .with_context(|| format!("parsing {}", file.display()))?;
        match json {
            serde_json::Value::Array(arr) => {
                for v in arr {
                    let node: AddressableNode = serde_json::from_value(v).with_context(|| format!("reading {}", file.display()))?;
                    roots.push(node);
                }
            }
            serde_json::Value::Object(_) => {
                let node: AddressableNode = serde_json::from_value(json).with_context(|| format!("reading {}", file.display()))?;
                roots.push(node);
            }
            _ => tracing::warn!(file = %file.display(), "skipping file without a register map"),
        }
    }
    Ok(roots)
}

fn search(output: &str, query: &str) -> Result<()> {
    let paths = OutputPaths::new(output);
    for hit in lookup(&paths, query)? {
        for occ in &hit.occurrences {
            let loc = Location::decode(occ.location);
            println!(
                "{} page={} {} {}{} field_idx={}",
                hit.word,
                occ.page_id,
                if loc.is_name { "name" } else { "desc" },
                if loc.is_field { "field" } else { "container" },
                if loc.is_enum { " enum" } else { "" },
                loc.field_idx,
            );
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    const REG: &str = r#"{"kind": "reg", "inst_name": "r", "size": 4}"#;

    #[test]
    fn loads_objects_and_arrays_in_name_order() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("b.json"), format!("[{REG}, {REG}]")).unwrap();
        fs::write(dir.path().join("a.json"), r#"{"kind": "addrmap", "inst_name": "first", "size": 16}"#).unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let roots = load_roots(dir.path()).unwrap();
        let names: Vec<&str> = roots.iter().map(|r| r.inst_name.as_str()).collect();
        assert_eq!(names, vec!["first", "r", "r"]);
    }

    #[test]
    fn malformed_input_is_an_error() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("bad.json");
        fs::write(&file, r#"{"kind": "widget", "inst_name": "x", "size": 1}"#).unwrap();
        assert!(load_roots(&file).is_err());
    }
}
