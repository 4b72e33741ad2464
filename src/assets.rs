//! Asset staging and inventory.
//!
//! Stage 2 of the marquee build pipeline. Takes the scan manifest and stages
//! every file under `assets/` into the intermediate directory, building an
//! inventory the generator consumes:
//!
//! - **Dimensions** for every image asset, probed by content sniffing (a
//!   `.jpg` path holding PNG bytes probes fine). The generator writes these
//!   as `width`/`height` attributes so the page doesn't reflow as images
//!   arrive.
//! - **Fingerprints**: SHA-256 of each file's contents, computed in parallel.
//!   Content-based rather than mtime-based so they survive `git checkout`.
//! - **Site version**: a digest over the whole inventory. Changes whenever
//!   any asset changes; stamped into generated pages.
//!
//! ## Incremental staging
//!
//! The inventory from the previous run is kept alongside the staged files.
//! An asset whose fingerprint is unchanged and whose staged copy still
//! exists is skipped. Pass `--no-cache` to restage everything.
//!
//! Assets are staged as authored — no re-encoding, no resizing. Marketing
//! art is hand-tuned per placement; the pipeline's job is to ship it intact
//! and to know its dimensions, not to second-guess it.

use crate::scan;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use thiserror::Error;

/// Name of the inventory manifest within the staging directory.
const MANIFEST_FILENAME: &str = "manifest.json";

/// Extensions probed for dimensions. Anything else stages with no dimensions.
const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp"];

#[derive(Error, Debug)]
pub enum AssetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("cannot probe '{path}': {source}")]
    Probe {
        path: PathBuf,
        source: image::ImageError,
    },
}

/// One staged asset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetInfo {
    /// Path relative to `assets/`, forward slashes.
    pub path: String,
    /// Hex SHA-256 of the file contents.
    pub sha256: String,
    /// Pixel dimensions for image assets; `None` for everything else.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<(u32, u32)>,
}

/// Stage-2 output manifest: the scan manifest plus the asset inventory.
#[derive(Debug, Serialize, Deserialize)]
pub struct Manifest {
    pub site: scan::Manifest,
    pub inventory: Vec<AssetInfo>,
    /// Digest over the inventory; changes whenever any asset changes.
    pub version: String,
}

impl Manifest {
    /// Load the previous run's manifest from the staging directory.
    /// Missing or unreadable manifests mean a cold start, not an error.
    pub fn load_previous(staged_dir: &Path) -> Option<Self> {
        let content = fs::read_to_string(staged_dir.join(MANIFEST_FILENAME)).ok()?;
        serde_json::from_str(&content).ok()
    }

    /// An inventory-less manifest for flows that skip staging (`check`
    /// assembles pages straight from a scan). Dimension lookups all miss.
    pub fn unstaged(site: scan::Manifest) -> Self {
        Self {
            site,
            inventory: Vec::new(),
            version: "unstaged".to_string(),
        }
    }

    /// Dimension lookup by asset path.
    pub fn dimensions_of(&self, path: &str) -> Option<(u32, u32)> {
        self.inventory
            .iter()
            .find(|a| a.path == path)
            .and_then(|a| a.dimensions)
    }
}

/// Whether an asset was copied this run or reused from the previous one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageStatus {
    Copied,
    Cached,
}

/// Progress event for the CLI reporter.
#[derive(Debug)]
pub struct AssetEvent {
    pub path: String,
    pub status: StageStatus,
    pub dimensions: Option<(u32, u32)>,
}

/// Copied/cached counters, printed after the stage.
#[derive(Debug, Default, Clone, Copy)]
pub struct CacheStats {
    pub copied: usize,
    pub cached: usize,
}

impl fmt::Display for CacheStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} copied, {} cached", self.copied, self.cached)
    }
}

/// Result of the staging stage.
#[derive(Debug)]
pub struct ProcessResult {
    pub manifest: Manifest,
    pub stats: CacheStats,
}

/// Stage all assets listed in the scan manifest.
///
/// Reads the scan manifest JSON from `scan_manifest_path`, fingerprints and
/// probes every asset under `source_root/assets/` in parallel, copies
/// changed ones into `staged_dir/assets/`, and returns the stage-2 manifest.
/// `use_cache = false` forgets the previous inventory and restages all.
pub fn process(
    scan_manifest_path: &Path,
    source_root: &Path,
    staged_dir: &Path,
    use_cache: bool,
    progress: Option<Sender<AssetEvent>>,
) -> Result<ProcessResult, AssetError> {
    let manifest_content = fs::read_to_string(scan_manifest_path)?;
    let site: scan::Manifest = serde_json::from_str(&manifest_content)?;

    let previous: HashMap<String, String> = if use_cache {
        Manifest::load_previous(staged_dir)
            .map(|m| {
                m.inventory
                    .into_iter()
                    .map(|a| (a.path, a.sha256))
                    .collect()
            })
            .unwrap_or_default()
    } else {
        HashMap::new()
    };

    let assets_src = source_root.join("assets");
    let assets_dst = staged_dir.join("assets");
    fs::create_dir_all(&assets_dst)?;

    // Fingerprint and probe in parallel; the copies below are IO-ordered.
    let inventory: Vec<AssetInfo> = site
        .assets
        .par_iter()
        .map(|rel| {
            let path = assets_src.join(rel);
            let bytes = fs::read(&path)?;
            let sha256 = hex_digest(&bytes);
            let dimensions = if is_image_path(rel) {
                Some(probe_dimensions(&path)?)
            } else {
                None
            };
            Ok(AssetInfo {
                path: rel.clone(),
                sha256,
                dimensions,
            })
        })
        .collect::<Result<_, AssetError>>()?;

    let mut stats = CacheStats::default();
    for info in &inventory {
        let dst = assets_dst.join(&info.path);
        let unchanged = previous.get(&info.path) == Some(&info.sha256) && dst.exists();
        let status = if unchanged {
            stats.cached += 1;
            StageStatus::Cached
        } else {
            if let Some(parent) = dst.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(assets_src.join(&info.path), &dst)?;
            stats.copied += 1;
            StageStatus::Copied
        };
        if let Some(tx) = &progress {
            let _ = tx.send(AssetEvent {
                path: info.path.clone(),
                status,
                dimensions: info.dimensions,
            });
        }
    }

    let version = inventory_version(&inventory);
    Ok(ProcessResult {
        manifest: Manifest {
            site,
            inventory,
            version,
        },
        stats,
    })
}

fn is_image_path(rel: &str) -> bool {
    Path::new(rel)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| IMAGE_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// Probe image dimensions by content, not extension.
fn probe_dimensions(path: &Path) -> Result<(u32, u32), AssetError> {
    image::ImageReader::open(path)
        .map_err(AssetError::Io)?
        .with_guessed_format()
        .map_err(AssetError::Io)?
        .into_dimensions()
        .map_err(|source| AssetError::Probe {
            path: path.to_path_buf(),
            source,
        })
}

fn hex_digest(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

/// Digest over the sorted inventory, truncated for display.
fn inventory_version(inventory: &[AssetInfo]) -> String {
    let mut hasher = Sha256::new();
    for info in inventory {
        hasher.update(info.path.as_bytes());
        hasher.update(b"\0");
        hasher.update(info.sha256.as_bytes());
        hasher.update(b"\0");
    }
    let digest = format!("{:x}", hasher.finalize());
    digest[..12].to_string()
}
