use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tower_lsp_server::ls_types::{SymbolKind, TextDocumentPositionParams};

use crate::error::Result;
use crate::session::View;

/// Identifies a package within a specific repository.
///
/// `path` is always in normalized, repository-relative form once the locator
/// leaves the server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageLocator {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "repoURI", default)]
    pub repo_uri: String,
    #[serde(default)]
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

/// Result of a cross-repository definition lookup.
///
/// # Examples
///
/// ```
/// use tower_lsp_server::ls_types::SymbolKind;
/// use xref_core::{PackageLocator, SymbolLocator};
///
/// let locator = SymbolLocator {
///     qname: "jsoniter.Config.Froze".into(),
///     kind: SymbolKind::METHOD,
///     package: PackageLocator {
///         name: "jsoniter".into(),
///         repo_uri: "github.com/json-iterator/go".into(),
///         path: "config.go".into(),
///         version: Some("v1.1.12".into()),
///     },
/// };
///
/// let json = serde_json::to_value(&locator).unwrap();
/// assert_eq!(json["package"]["repoURI"], "github.com/json-iterator/go");
/// assert_eq!(json["kind"], 6);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolLocator {
    pub qname: String,
    pub kind: SymbolKind,
    pub package: PackageLocator,
}

/// Raw definition result as produced by the analysis engine, before its file
/// path has been normalized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSymbol {
    pub qname: String,
    pub kind: SymbolKind,
    /// Absolute path of the file holding the definition.
    pub file: PathBuf,
    /// Owning package; `path` is ignored and replaced during normalization.
    pub package: PackageLocator,
}

/// Cross-repository definition lookup provided by the analysis engine.
#[async_trait]
pub trait SymbolResolver: Send + Sync {
    async fn resolve(
        &self,
        view: &View,
        params: &TextDocumentPositionParams,
    ) -> Result<Vec<ResolvedSymbol>>;
}
