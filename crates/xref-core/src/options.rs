use serde::Deserialize;
use std::collections::HashMap;

/// Session-wide analysis options.
///
/// Handed out by the [`Session`](crate::Session) and copied into every view
/// at creation time, after folder-specific settings have been merged in.
///
/// # Examples
///
/// ```
/// use xref_core::SessionOptions;
///
/// let json = r#"{
///     "installDependencyAutomatically": false,
///     "buildFlags": ["-tags=integration"]
/// }"#;
///
/// let options: SessionOptions = serde_json::from_str(json).unwrap();
/// assert!(!options.install_dependency_automatically);
/// assert_eq!(options.build_flags, vec!["-tags=integration"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionOptions {
    /// Download missing dependencies into the shared cache. When disabled every
    /// view resolves dependencies from its vendor directory.
    #[serde(default = "default_true")]
    pub install_dependency_automatically: bool,
    #[serde(default)]
    pub build_flags: Vec<String>,
    #[serde(default)]
    pub env: HashMap<String, String>,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            install_dependency_automatically: true,
            build_flags: Vec::new(),
            env: HashMap::new(),
        }
    }
}

impl SessionOptions {
    /// Merges folder-scoped settings over these options.
    pub fn apply(&mut self, patch: SettingsPatch) {
        if let Some(install) = patch.install_dependency_automatically {
            self.install_dependency_automatically = install;
        }
        if let Some(flags) = patch.build_flags {
            self.build_flags = flags;
        }
        if let Some(env) = patch.env {
            self.env.extend(env);
        }
    }
}

/// Partial settings returned by the client for a single folder.
///
/// Absent fields leave the session value untouched; `env` entries are added
/// on top of the session environment.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsPatch {
    pub install_dependency_automatically: Option<bool>,
    pub build_flags: Option<Vec<String>>,
    pub env: Option<HashMap<String, String>>,
}

const fn default_true() -> bool {
    true
}
