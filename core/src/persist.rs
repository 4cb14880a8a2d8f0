use crate::bucket::WordEntry;
use crate::ral::RalData;
use crate::shard::Shard;
use crate::walk::PageDescriptor;
use anyhow::{anyhow, Context, Result};
use serde::Serialize;
use std::collections::HashMap;
use std::fs::{create_dir_all, File};
use std::io::{BufWriter, Read, Write};
use std::path::{Path, PathBuf};

/// Global the manifest script assigns to.
pub const MANIFEST_VAR: &str = "SearchBucketIndex";

/// Layout of an export output directory.
pub struct OutputPaths {
    pub root: PathBuf,
}

impl OutputPaths {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self { root: root.as_ref().to_path_buf() }
    }
    pub fn search_dir(&self) -> PathBuf { self.root.join("search") }
    pub fn js_dir(&self) -> PathBuf { self.root.join("js") }
    pub fn content_dir(&self) -> PathBuf { self.root.join("content") }
    pub fn shard(&self, n: usize) -> PathBuf { self.search_dir().join(format!("bkt-{n}.json")) }
    pub fn manifest(&self) -> PathBuf { self.search_dir().join("bkt_index.js") }
    pub fn data_js(&self) -> PathBuf { self.js_dir().join("data.js") }
    pub fn page(&self, uid: &str) -> PathBuf { self.content_dir().join(format!("{uid}.json")) }

    pub fn create_dirs(&self) -> Result<()> {
        for dir in [self.search_dir(), self.js_dir(), self.content_dir()] {
            create_dir_all(&dir).with_context(|| format!("creating {}", dir.display()))?;
        }
        Ok(())
    }
}

fn write_compact<T: Serialize + ?Sized, W: Write>(w: &mut W, value: &T) -> Result<()> {
    serde_json::to_writer(&mut *w, value)?;
    Ok(())
}

/// `var <name> = <json>;`
fn write_js_var<T: Serialize + ?Sized, W: Write>(w: &mut W, name: &str, value: &T) -> Result<()> {
    write!(w, "var {name} = ")?;
    write_compact(w, value)?;
    w.write_all(b";")?;
    Ok(())
}

pub fn save_shard(paths: &OutputPaths, n: usize, shard: &Shard) -> Result<()> {
    let path = paths.shard(n);
    let mut f = BufWriter::new(File::create(&path).with_context(|| format!("creating {}", path.display()))?);
    write_compact(&mut f, shard).with_context(|| format!("writing {}", path.display()))?;
    f.flush().with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

pub fn load_shard(paths: &OutputPaths, n: usize) -> Result<HashMap<String, Vec<WordEntry>>> {
    let path = paths.shard(n);
    let f = File::open(&path).with_context(|| format!("opening {}", path.display()))?;
    let shard = serde_json::from_reader(std::io::BufReader::new(f))
        .with_context(|| format!("parsing {}", path.display()))?;
    Ok(shard)
}

pub fn save_manifest(paths: &OutputPaths, boundaries: &[u32]) -> Result<()> {
    let path = paths.manifest();
    let mut f = File::create(&path).with_context(|| format!("creating {}", path.display()))?;
    write_js_var(&mut f, MANIFEST_VAR, boundaries).with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

pub fn load_manifest(paths: &OutputPaths) -> Result<Vec<u32>> {
    let path = paths.manifest();
    let mut f = File::open(&path).with_context(|| format!("opening {}", path.display()))?;
    let mut buf = String::new();
    f.read_to_string(&mut buf)?;
    let json = buf
        .trim()
        .strip_prefix(&format!("var {MANIFEST_VAR} = "))
        .and_then(|s| s.strip_suffix(';'))
        .ok_or_else(|| anyhow!("{} is not a search manifest", path.display()))?;
    let boundaries = serde_json::from_str(json).with_context(|| format!("parsing {}", path.display()))?;
    Ok(boundaries)
}

/// `js/data.js`: node table, root ids and page info, one global per line.
pub fn save_ral_data(paths: &OutputPaths, data: &RalData) -> Result<()> {
    let path = paths.data_js();
    let mut f = BufWriter::new(File::create(&path).with_context(|| format!("creating {}", path.display()))?);
    write_ral_vars(&mut f, data).with_context(|| format!("writing {}", path.display()))?;
    f.flush().with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

fn write_ral_vars<W: Write>(w: &mut W, data: &RalData) -> Result<()> {
    write_js_var(w, "RALIndex", &data.entries)?;
    w.write_all(b"\n")?;
    write_js_var(w, "RootNodeIds", &data.root_ids)?;
    w.write_all(b"\n")?;
    write_js_var(w, "PageInfo", &data.page_info)?;
    w.write_all(b"\n")?;
    Ok(())
}

pub fn save_page(paths: &OutputPaths, page: &PageDescriptor) -> Result<()> {
    let path = paths.page(&page.uid);
    let mut f = BufWriter::new(File::create(&path).with_context(|| format!("creating {}", path.display()))?);
    write_compact(&mut f, page).with_context(|| format!("writing {}", path.display()))?;
    f.flush().with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}
