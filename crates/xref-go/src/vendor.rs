//! Vendor directory detection.
//!
//! `go mod vendor` writes `vendor/modules.txt` next to the copied sources.
//! A workspace folder carrying that file can be analysed without the shared
//! module cache.

use std::path::{Path, PathBuf};

/// Location of the vendor manifest relative to a module root.
pub const VENDOR_MANIFEST: &str = "vendor/modules.txt";

/// Returns the vendor manifest path for `root`.
pub fn vendor_manifest(root: &Path) -> PathBuf {
    root.join("vendor").join("modules.txt")
}

/// Returns true if `root` holds a vendored dependency tree.
pub async fn has_vendor_manifest(root: &Path) -> bool {
    let manifest = vendor_manifest(root);
    match tokio::fs::metadata(&manifest).await {
        Ok(metadata) => metadata.is_file(),
        Err(e) => {
            tracing::trace!("no vendor manifest at {}: {}", manifest.display(), e);
            false
        }
    }
}
