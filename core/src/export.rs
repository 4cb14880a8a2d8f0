use crate::bucket::{self, bucketize};
use crate::model::AddressableNode;
use crate::persist::{save_page, save_ral_data, OutputPaths};
use crate::ral::PageInfo;
use crate::shard::{ShardWriter, WORDS_PER_FILE_THRESHOLD};
use crate::walk::{walk, WalkOptions};
use anyhow::{bail, Result};
use serde::Deserialize;
use std::path::Path;

/// Settings for one export run.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExportOptions {
    /// Overrides the default `"<top name> Reference"` title.
    pub title: Option<String>,
    pub words_per_file: usize,
    /// Leave out nodes and fields with `ispresent = false`.
    pub skip_not_present: bool,
    /// Properties whose values are listed on each page that sets them.
    pub extra_doc_properties: Vec<String>,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            title: None,
            words_per_file: WORDS_PER_FILE_THRESHOLD,
            skip_not_present: true,
            extra_doc_properties: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportSummary {
    pub pages: usize,
    pub words: usize,
    pub shards: usize,
}

/// Number every node of `roots`, then write the node table, the page
/// descriptors and the search index under `output`.
///
/// All in-memory work finishes before the first file is written. Any write
/// error aborts the export.
pub fn export(roots: &[AddressableNode], output: &Path, options: &ExportOptions) -> Result<ExportSummary> {
    let Some(first) = roots.first() else {
        bail!("nothing to export: no root nodes given");
    };

    let walk_options = WalkOptions {
        skip_not_present: options.skip_not_present,
        extra_doc_properties: options.extra_doc_properties.clone(),
    };
    let mut result = walk(roots, &walk_options);
    result.ral.page_info = PageInfo {
        title: options.title.clone().unwrap_or_else(|| format!("{} Reference", first.display_name())),
    };

    let pages = result.ral.entries.len();
    let words = result.index.len();
    tracing::info!(roots = roots.len(), pages, words, "walked register map");
    result.index.debug_stats(25);
    let buckets = bucketize(result.index);
    bucket::debug_stats(&buckets, 25);

    let paths = OutputPaths::new(output);
    paths.create_dirs()?;
    save_ral_data(&paths, &result.ral)?;
    for page in &result.pages {
        save_page(&paths, page)?;
    }
    let plan = ShardWriter::new(options.words_per_file).write(buckets, &paths)?;

    let summary = ExportSummary { pages, words, shards: plan.shards.len() };
    tracing::info!(pages, words, shards = summary.shards, output = %output.display(), "export complete");
    Ok(summary)
}
