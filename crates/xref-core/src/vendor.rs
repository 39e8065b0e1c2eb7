use dashmap::DashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

/// Handle to a pending entry in the [`VendorRegistry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VendorSlot(u64);

/// Set of folders that must be analysed in vendor mode.
///
/// Folders are flagged by whatever detected that their dependencies cannot be
/// fetched into the shared cache. Each entry is applied to at most one view
/// creation: the first caller that consumes it wins.
///
/// Safe for concurrent `flag`/`check`/`consume` since several workspace
/// folders can be opened in quick succession.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use xref_core::VendorRegistry;
///
/// let registry = VendorRegistry::new();
/// registry.flag("/work/app");
///
/// let slot = registry.check(Path::new("/work/app"));
/// assert!(slot.is_some());
/// assert!(registry.consume(slot));
///
/// // Consumed entries are gone; consuming "nothing" is a no-op.
/// assert!(registry.check(Path::new("/work/app")).is_none());
/// assert!(!registry.consume(None));
/// ```
#[derive(Debug, Default)]
pub struct VendorRegistry {
    entries: DashMap<u64, PathBuf>,
    next_id: AtomicU64,
}

impl VendorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flags `path` for vendor-mode resolution.
    pub fn flag(&self, path: impl Into<PathBuf>) -> VendorSlot {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let path = path.into();
        tracing::debug!("flagged vendor folder {}", path.display());
        self.entries.insert(id, path);
        VendorSlot(id)
    }

    /// Finds a pending entry for `path`.
    pub fn check(&self, path: &Path) -> Option<VendorSlot> {
        self.entries
            .iter()
            .find(|entry| entry.value().as_path() == path)
            .map(|entry| VendorSlot(*entry.key()))
    }

    /// Removes the entry behind `slot`.
    ///
    /// Returns true only for the caller that actually removed it, so two
    /// concurrent view creations never both observe the same entry.
    pub fn consume(&self, slot: Option<VendorSlot>) -> bool {
        let Some(VendorSlot(id)) = slot else {
            return false;
        };
        self.entries.remove(&id).is_some()
    }

    /// Drops any pending entry for `path`. Returns true if one was removed.
    pub fn discard(&self, path: &Path) -> bool {
        let removed = self.consume(self.check(path));
        if removed {
            tracing::debug!("discarded vendor flag for {}", path.display());
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
