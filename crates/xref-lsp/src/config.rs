use serde::Deserialize;
use std::path::PathBuf;
use xref_core::SessionOptions;
use xref_go::MarkerPolicy;

/// Root configuration for the xref-lsp server.
///
/// Provided by the client through `initializationOptions`. All fields fall
/// back to defaults when absent.
///
/// # Examples
///
/// ```
/// use xref_lsp::config::XrefConfig;
/// use xref_go::MarkerPolicy;
///
/// let json = r#"{
///     "session": { "installDependencyAutomatically": false },
///     "moduleCacheRoot": "/home/dev/go/pkg/mod",
///     "markerPolicy": "unambiguous"
/// }"#;
///
/// let config: XrefConfig = serde_json::from_str(json).unwrap();
/// assert!(!config.session.install_dependency_automatically);
/// assert_eq!(config.marker_policy, MarkerPolicy::Unambiguous);
/// assert!(config.vendor_detection);
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct XrefConfig {
    #[serde(default)]
    pub session: SessionOptions,
    /// Overrides `GOMODCACHE`/`GOPATH` discovery.
    #[serde(default)]
    pub module_cache_root: Option<PathBuf>,
    #[serde(default)]
    pub marker_policy: MarkerPolicy,
    /// Flag folders with `vendor/modules.txt` for vendor mode.
    #[serde(default = "default_true")]
    pub vendor_detection: bool,
}

impl Default for XrefConfig {
    fn default() -> Self {
        Self {
            session: SessionOptions::default(),
            module_cache_root: None,
            marker_policy: MarkerPolicy::default(),
            vendor_detection: true,
        }
    }
}

const fn default_true() -> bool {
    true
}
