//! Analysis session seams.
//!
//! The analysis engine owns its views; this crate only asks it to create and
//! shut them down. [`Session`] and [`ConfigFetcher`] are the two collaborators
//! the [`ViewLifecycle`](crate::ViewLifecycle) drives.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tower_lsp_server::ls_types::Uri;

use crate::error::Result;
use crate::options::SessionOptions;

/// Filesystem path behind a `file:` URI.
///
/// Other schemes yield `None`; a plain `to_file_path` would map
/// `https://host/repo` to `/repo`.
///
/// # Examples
///
/// ```
/// use std::path::PathBuf;
/// use tower_lsp_server::ls_types::Uri;
/// use xref_core::file_path;
///
/// let local = Uri::from_file_path("/work/app").unwrap();
/// assert_eq!(file_path(&local), Some(PathBuf::from("/work/app")));
///
/// let remote: Uri = "https://example.com/repo".parse().unwrap();
/// assert_eq!(file_path(&remote), None);
/// ```
pub fn file_path(uri: &Uri) -> Option<PathBuf> {
    let is_file = uri
        .as_str()
        .get(..5)
        .is_some_and(|scheme| scheme.eq_ignore_ascii_case("file:"));
    if !is_file {
        return None;
    }
    uri.to_file_path().map(|p| p.to_path_buf())
}

/// Configuration a view is created with.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewConfig {
    pub options: SessionOptions,
    /// Resolve dependencies from the folder's vendor directory instead of the
    /// shared module cache. Fixed for the lifetime of the view.
    pub vendor: bool,
}

/// An analysis context bound to one workspace root.
#[derive(Debug, Clone)]
pub struct View {
    name: String,
    root: Uri,
    config: ViewConfig,
}

impl View {
    pub fn new(name: impl Into<String>, root: Uri, config: ViewConfig) -> Self {
        Self {
            name: name.into(),
            root,
            config,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn root(&self) -> &Uri {
        &self.root
    }

    pub fn config(&self) -> &ViewConfig {
        &self.config
    }

    /// Filesystem path of the view root, if the root is a `file:` URI.
    pub fn root_path(&self) -> Option<PathBuf> {
        file_path(&self.root)
    }

    /// Returns true if `path` lies inside the view root.
    pub fn contains(&self, path: &Path) -> bool {
        self.root_path().is_some_and(|root| path.starts_with(root))
    }
}

/// Owner of all active views.
///
/// Implementations must be internally synchronized: view creation and
/// shutdown may interleave with lookups made by unrelated requests.
#[async_trait]
pub trait Session: Send + Sync {
    /// Looks up a view by name.
    fn view(&self, name: &str) -> Option<Arc<View>>;

    /// Creates a view. Names are unique; callers remove before re-adding.
    async fn new_view(&self, name: &str, root: &Uri, config: ViewConfig) -> Result<()>;

    /// Shuts `view` down and releases everything it holds. The view is gone
    /// from the session once this returns.
    async fn shutdown_view(&self, view: &View);

    /// Current session-wide options.
    fn options(&self) -> SessionOptions;
}

/// Source of folder-specific settings.
#[async_trait]
pub trait ConfigFetcher: Send + Sync {
    /// Merges the settings for folder `name` rooted at `uri` into `options`.
    async fn fetch(&self, name: &str, uri: &Uri, options: &mut SessionOptions) -> Result<()>;
}
