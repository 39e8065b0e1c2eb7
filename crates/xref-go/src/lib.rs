//! Go module cache support for xref-lsp.
//!
//! This crate knows how the Go module cache lays dependencies out on disk and
//! turns absolute paths into repository-relative ones for cross-repository
//! symbol locators.
//!
//! # Features
//!
//! - Normalize cache and workspace paths ([`normalize_path`], [`ModuleCache`])
//! - Recognize `@v<version>` markers and case-escaped module paths
//! - Locate the cache root from `GOMODCACHE`/`GOPATH`/`HOME`
//! - Detect vendored folders (`vendor/modules.txt`)
//!
//! # Example
//!
//! ```
//! use std::path::Path;
//! use xref_go::{MarkerPolicy, ModuleCache};
//!
//! let cache = ModuleCache::new("/home/dev/go/pkg/mod").with_policy(MarkerPolicy::FirstSegment);
//! let normalized = cache.normalize(
//!     Path::new("/home/dev/go/pkg/mod/golang.org/x/tools@v0.1.0/internal/lsp/server.go"),
//!     Path::new("/work/app"),
//!     "golang.org/x/tools",
//! );
//! assert_eq!(normalized.path, "internal/lsp/server.go");
//! ```

pub mod modcache;
pub mod normalize;
pub mod vendor;
pub mod version;

// Re-export commonly used types
pub use modcache::{cache_root_from_env, resolve_cache_root};
pub use normalize::{
    MarkerPolicy, ModuleCache, NormalizedPath, normalize_path, normalize_with_policy,
};
pub use vendor::{VENDOR_MANIFEST, has_vendor_manifest, vendor_manifest};
pub use version::{escape_module_path, is_version_marker, marker_version};
