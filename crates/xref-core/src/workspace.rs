//! Workspace view lifecycle.
//!
//! Keeps the session's views in step with the workspace folders reported by
//! the editor.

use std::sync::Arc;
use tower_lsp_server::ls_types::{Uri, WorkspaceFoldersChangeEvent};

use crate::error::{Result, XrefError};
use crate::lifecycle::StateGuard;
use crate::options::SessionOptions;
use crate::session::{ConfigFetcher, Session, ViewConfig, file_path};
use crate::vendor::VendorRegistry;

/// Creates and shuts down views in response to workspace folder changes.
///
/// Holds no view references of its own: every lookup goes through the
/// [`Session`], which stays the single owner of views.
pub struct ViewLifecycle {
    session: Arc<dyn Session>,
    fetcher: Arc<dyn ConfigFetcher>,
    vendor: Arc<VendorRegistry>,
    state: Arc<StateGuard>,
}

impl ViewLifecycle {
    pub fn new(
        session: Arc<dyn Session>,
        fetcher: Arc<dyn ConfigFetcher>,
        vendor: Arc<VendorRegistry>,
        state: Arc<StateGuard>,
    ) -> Self {
        Self {
            session,
            fetcher,
            vendor,
            state,
        }
    }

    /// Applies a workspace folder change event.
    ///
    /// Removed folders are processed first, in order. A removed folder without
    /// a view stops the whole event: later removals and all additions are left
    /// untouched. Additions then run in order and stop at the first failure;
    /// views added before it are kept.
    pub async fn change_folders(&self, event: &WorkspaceFoldersChangeEvent) -> Result<()> {
        for folder in &event.removed {
            let Some(view) = self.session.view(&folder.name) else {
                return Err(XrefError::ViewNotFound {
                    name: folder.name.clone(),
                    uri: folder.uri.as_str().to_string(),
                });
            };

            tracing::info!("shutting down view {}", folder.name);
            self.session.shutdown_view(&view).await;
        }

        for folder in &event.added {
            self.add_view(&folder.name, &folder.uri).await?;
        }

        Ok(())
    }

    /// Creates a view named `name` rooted at `uri`.
    ///
    /// The vendor registry entry for the folder is consumed even when the
    /// server turns out not to be initialized yet.
    pub async fn add_view(&self, name: &str, uri: &Uri) -> Result<()> {
        let mut options = self.session.options();
        let vendor = self.vendor_mode(&options, uri);

        if !self.state.is_initialized() {
            return Err(XrefError::NotInitialized);
        }

        self.fetcher.fetch(name, uri, &mut options).await?;

        tracing::info!("adding view {} at {:?} (vendor: {})", name, uri, vendor);
        self.session
            .new_view(name, uri, ViewConfig { options, vendor })
            .await
    }

    fn vendor_mode(&self, options: &SessionOptions, uri: &Uri) -> bool {
        if !options.install_dependency_automatically {
            tracing::debug!("dependency installation disabled, vendor mode for {:?}", uri);
            return true;
        }

        let slot = file_path(uri).and_then(|path| self.vendor.check(&path));
        self.vendor.consume(slot)
    }
}
