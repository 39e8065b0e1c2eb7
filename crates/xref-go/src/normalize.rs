//! Path normalization for cross-repository locations.
//!
//! A definition can live in the workspace itself or in the shared module
//! cache, where every dependency sits under
//! `<cache>/<repository>/<version marker>/<package subpath>`. Normalization
//! maps both to a repository-relative path so that two checked-out versions of
//! the same dependency resolve to the same logical location.
//!
//! Normalization never fails: when a path cannot be mapped it is returned
//! unchanged.

use serde::Deserialize;
use std::path::{Component, Path, PathBuf};
use xref_core::{ResolvedSymbol, SymbolLocator};

use crate::version::{MARKER_PATTERN, escape_module_path, is_version_marker};

/// How the version marker is located in a module cache path.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MarkerPolicy {
    /// Remove the first segment shaped `@v<digit>...`.
    #[default]
    FirstSegment,
    /// Cut out the single `@v<digit>` occurrence up to the end of its segment.
    /// Zero or several occurrences are ambiguous and leave the path unchanged.
    Unambiguous,
}

/// Result of normalizing a path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedPath {
    pub path: String,
    /// Version taken from the removed marker, without the leading `@`.
    pub version: Option<String>,
}

impl NormalizedPath {
    fn unversioned(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            version: None,
        }
    }
}

/// Normalizes `path` with the default [`MarkerPolicy`].
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use xref_go::normalize_path;
///
/// let cache = Path::new("/home/dev/go/pkg/mod");
/// let root = Path::new("/work/app");
///
/// assert_eq!(
///     normalize_path(
///         Path::new("/home/dev/go/pkg/mod/github.com/json-iter@ator/@/@v0.0.1/@23423afasdf/124/wrew@.go"),
///         root,
///         cache,
///         "github.com/json-iter@ator/@",
///     ),
///     "@23423afasdf/124/wrew@.go"
/// );
///
/// assert_eq!(
///     normalize_path(Path::new("/work/app/lsp/elasticserver.go"), root, cache, ""),
///     "lsp/elasticserver.go"
/// );
/// ```
pub fn normalize_path(path: &Path, workspace_root: &Path, cache_root: &Path, repo_uri: &str) -> String {
    normalize_with_policy(
        path,
        workspace_root,
        Some(cache_root),
        repo_uri,
        MarkerPolicy::FirstSegment,
    )
    .path
}

/// Normalizes `path`, reporting the version of the removed marker.
pub fn normalize_with_policy(
    path: &Path,
    workspace_root: &Path,
    cache_root: Option<&Path>,
    repo_uri: &str,
    policy: MarkerPolicy,
) -> NormalizedPath {
    let cached = non_empty(cache_root).and_then(|root| path.strip_prefix(root).ok());

    let Some(rest) = cached else {
        let relative = non_empty(Some(workspace_root))
            .and_then(|root| path.strip_prefix(root).ok())
            .map_or_else(|| path.to_string_lossy().into_owned(), join_components);
        // The root itself, as `filepath.Rel` reports it.
        if relative.is_empty() {
            return NormalizedPath::unversioned(".");
        }
        return NormalizedPath::unversioned(relative);
    };

    let rest = join_components(rest);
    match strip_repository(&rest, repo_uri) {
        Some(remainder) => strip_marker(remainder, policy),
        None => {
            tracing::debug!(
                "{} is in the module cache but not under {}",
                path.display(),
                repo_uri
            );
            NormalizedPath::unversioned(path.to_string_lossy())
        }
    }
}

fn non_empty(root: Option<&Path>) -> Option<&Path> {
    root.filter(|r| !r.as_os_str().is_empty())
}

fn join_components(path: &Path) -> String {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy()),
            Component::CurDir | Component::ParentDir => Some(c.as_os_str().to_string_lossy()),
            Component::RootDir | Component::Prefix(_) => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Strips `repo_uri` and the separator after it from a cache-relative path.
///
/// The repository is matched literally first, `@` included, then in its
/// case-escaped on-disk form. A marker glued to the last repository segment
/// (`toml@v1.2.0`) stays at the front of the remainder.
fn strip_repository<'a>(rest: &'a str, repo_uri: &str) -> Option<&'a str> {
    let repo_uri = repo_uri.trim_end_matches('/');
    if repo_uri.is_empty() {
        return Some(rest);
    }

    let escaped = escape_module_path(repo_uri);
    let candidates = [repo_uri, escaped.as_ref()];

    candidates.iter().find_map(|candidate| {
        let after = rest.strip_prefix(candidate)?;
        if after.is_empty() {
            Some(after)
        } else if let Some(after) = after.strip_prefix('/') {
            Some(after)
        } else if is_version_marker(after) {
            Some(after)
        } else {
            None
        }
    })
}

fn strip_marker(remainder: &str, policy: MarkerPolicy) -> NormalizedPath {
    match policy {
        MarkerPolicy::FirstSegment => strip_first_segment(remainder),
        MarkerPolicy::Unambiguous => strip_unambiguous(remainder),
    }
}

fn strip_first_segment(remainder: &str) -> NormalizedPath {
    let mut segments: Vec<&str> = remainder.split('/').collect();
    let Some(index) = segments.iter().position(|s| is_version_marker(s)) else {
        return NormalizedPath::unversioned(remainder);
    };

    let marker = segments.remove(index);
    NormalizedPath {
        path: segments.join("/"),
        version: Some(marker[1..].to_string()),
    }
}

fn strip_unambiguous(remainder: &str) -> NormalizedPath {
    let mut markers = MARKER_PATTERN
        .captures_iter(remainder)
        .filter_map(|captures| captures.get(1));
    let (Some(marker), None) = (markers.next(), markers.next()) else {
        return NormalizedPath::unversioned(remainder);
    };

    let start = marker.start();
    let end = remainder[start..]
        .find('/')
        .map_or(remainder.len(), |offset| start + offset);

    let head = remainder[..start].trim_end_matches('/');
    let tail = remainder.get(end + 1..).unwrap_or("");
    let path = match (head.is_empty(), tail.is_empty()) {
        (true, _) => tail.to_string(),
        (false, true) => head.to_string(),
        (false, false) => format!("{head}/{tail}"),
    };

    NormalizedPath {
        path,
        version: Some(remainder[start + 1..end].to_string()),
    }
}

/// The module cache of one server, with the policy used to read it.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use xref_go::ModuleCache;
///
/// let cache = ModuleCache::new("/home/dev/go/pkg/mod");
/// let normalized = cache.normalize(
///     Path::new("/home/dev/go/pkg/mod/github.com/!burnt!sushi/toml@v1.2.0/decode.go"),
///     Path::new("/work/app"),
///     "github.com/BurntSushi/toml",
/// );
///
/// assert_eq!(normalized.path, "decode.go");
/// assert_eq!(normalized.version.as_deref(), Some("v1.2.0"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct ModuleCache {
    root: Option<PathBuf>,
    policy: MarkerPolicy,
}

impl ModuleCache {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Some(root.into()),
            policy: MarkerPolicy::default(),
        }
    }

    /// A cache that could not be located; every path is treated as a
    /// workspace path.
    pub fn unavailable() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_policy(mut self, policy: MarkerPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }

    pub fn policy(&self) -> MarkerPolicy {
        self.policy
    }

    pub fn normalize(&self, path: &Path, workspace_root: &Path, repo_uri: &str) -> NormalizedPath {
        normalize_with_policy(path, workspace_root, self.root(), repo_uri, self.policy)
    }

    /// Turns a raw definition result into a locator with a normalized path.
    ///
    /// A version already reported by the analysis engine wins over the one
    /// read from the cache path.
    pub fn locate(&self, symbol: ResolvedSymbol, workspace_root: &Path) -> SymbolLocator {
        let normalized = self.normalize(&symbol.file, workspace_root, &symbol.package.repo_uri);

        let mut package = symbol.package;
        package.path = normalized.path;
        if package.version.is_none() {
            package.version = normalized.version;
        }

        SymbolLocator {
            qname: symbol.qname,
            kind: symbol.kind,
            package,
        }
    }
}
