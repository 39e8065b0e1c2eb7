//! Folder settings pulled from the client via `workspace/configuration`.

use async_trait::async_trait;
use serde_json::Value;
use std::sync::atomic::{AtomicBool, Ordering};
use tower_lsp_server::Client;
use tower_lsp_server::ls_types::{ConfigurationItem, Uri};
use xref_core::{ConfigFetcher, Result, SessionOptions, SettingsPatch, XrefError};

/// Configuration section requested from the client.
pub const CONFIG_SECTION: &str = "xref";

/// Merges a settings value returned by the client into `options`.
///
/// `null` means the client has nothing for this folder.
pub fn apply_settings(value: Value, options: &mut SessionOptions) -> serde_json::Result<()> {
    if value.is_null() {
        return Ok(());
    }
    let patch: SettingsPatch = serde_json::from_value(value)?;
    options.apply(patch);
    Ok(())
}

/// Fetches folder-scoped settings from the editor.
///
/// Does nothing until the client has advertised `workspace.configuration`.
pub struct ClientConfigFetcher {
    client: Client,
    supported: AtomicBool,
}

impl ClientConfigFetcher {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            supported: AtomicBool::new(false),
        }
    }

    pub fn set_supported(&self, supported: bool) {
        self.supported.store(supported, Ordering::Release);
    }

    pub fn is_supported(&self) -> bool {
        self.supported.load(Ordering::Acquire)
    }
}

#[async_trait]
impl ConfigFetcher for ClientConfigFetcher {
    async fn fetch(&self, name: &str, uri: &Uri, options: &mut SessionOptions) -> Result<()> {
        if !self.is_supported() {
            tracing::debug!("client has no workspace/configuration, skipping {}", name);
            return Ok(());
        }

        let items = vec![ConfigurationItem {
            scope_uri: Some(uri.clone()),
            section: Some(CONFIG_SECTION.into()),
        }];

        let values = self
            .client
            .configuration(items)
            .await
            .map_err(|e| XrefError::ConfigFetch {
                name: name.to_string(),
                message: e.to_string(),
            })?;

        let Some(value) = values.into_iter().next() else {
            return Ok(());
        };

        apply_settings(value, options).map_err(|e| XrefError::ConfigFetch {
            name: name.to_string(),
            message: e.to_string(),
        })?;

        tracing::debug!("applied folder settings for {}", name);
        Ok(())
    }
}
