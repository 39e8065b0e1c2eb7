//! In-process view registry.

use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock};
use tower_lsp_server::ls_types::Uri;
use xref_core::{Result, Session, SessionOptions, View, ViewConfig, XrefError, file_path};

/// Session that keeps views in memory, keyed by folder name.
///
/// The analysis engine attaches through [`SymbolResolver`](xref_core::SymbolResolver),
/// which receives the [`View`] a request belongs to.
#[derive(Debug, Default)]
pub struct MemorySession {
    views: DashMap<String, Arc<View>>,
    options: RwLock<SessionOptions>,
}

impl MemorySession {
    /// Replaces the session-wide options. Existing views keep theirs.
    pub fn set_options(&self, options: SessionOptions) {
        *self.options.write().unwrap_or_else(PoisonError::into_inner) = options;
    }

    /// Finds the view whose root contains `path`. Nested roots resolve to the
    /// innermost view.
    pub fn view_for_path(&self, path: &Path) -> Option<Arc<View>> {
        self.views
            .iter()
            .filter_map(|entry| {
                let root = entry.value().root_path()?;
                path.starts_with(&root)
                    .then(|| (root.components().count(), Arc::clone(entry.value())))
            })
            .max_by_key(|(depth, _)| *depth)
            .map(|(_, view)| view)
    }

    /// Names of all active views, sorted.
    pub fn view_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.views.iter().map(|e| e.key().clone()).collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.views.len()
    }

    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }

    /// Shuts every view down.
    pub async fn shutdown_all(&self) {
        let views: Vec<Arc<View>> = self.views.iter().map(|e| Arc::clone(e.value())).collect();
        for view in views {
            self.shutdown_view(&view).await;
        }
    }
}

#[async_trait]
impl Session for MemorySession {
    fn view(&self, name: &str) -> Option<Arc<View>> {
        self.views.get(name).map(|v| Arc::clone(v.value()))
    }

    async fn new_view(&self, name: &str, root: &Uri, config: ViewConfig) -> Result<()> {
        if file_path(root).is_none() {
            return Err(XrefError::InvalidRoot(root.as_str().to_string()));
        }

        match self.views.entry(name.to_string()) {
            Entry::Occupied(_) => Err(XrefError::DuplicateView(name.to_string())),
            Entry::Vacant(slot) => {
                tracing::info!(
                    "created view {} at {} (vendor: {})",
                    name,
                    root.as_str(),
                    config.vendor
                );
                slot.insert(Arc::new(View::new(name, root.clone(), config)));
                Ok(())
            }
        }
    }

    async fn shutdown_view(&self, view: &View) {
        let removed = self
            .views
            .remove_if(view.name(), |_, existing| existing.root() == view.root());

        if removed.is_some() {
            tracing::info!("view {} shut down", view.name());
        } else {
            tracing::debug!("view {} already gone", view.name());
        }
    }

    fn options(&self) -> SessionOptions {
        self.options
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uri(path: &str) -> Uri {
        Uri::from_file_path(path).unwrap()
    }

    #[tokio::test]
    async fn test_new_view_and_lookup() {
        let session = MemorySession::default();
        session
            .new_view("app", &uri("/work/app"), ViewConfig::default())
            .await
            .unwrap();

        let view = session.view("app").unwrap();
        assert_eq!(view.name(), "app");
        assert_eq!(session.len(), 1);
        assert!(session.view("other").is_none());
    }

    #[tokio::test]
    async fn test_duplicate_view_rejected() {
        let session = MemorySession::default();
        session
            .new_view("app", &uri("/work/app"), ViewConfig::default())
            .await
            .unwrap();

        let err = session
            .new_view("app", &uri("/work/other"), ViewConfig::default())
            .await
            .unwrap_err();
        assert!(matches!(err, XrefError::DuplicateView(ref name) if name == "app"));
        assert_eq!(session.view("app").unwrap().root(), &uri("/work/app"));
    }

    #[test]
    fn test_non_file_root_rejected() {
        let session = MemorySession::default();
        let root: Uri = "https://example.com/repo".parse().unwrap();

        let err = tokio_test::block_on(session.new_view("remote", &root, ViewConfig::default()))
            .unwrap_err();
        assert!(matches!(err, XrefError::InvalidRoot(_)));
        assert!(session.is_empty());
    }

    #[tokio::test]
    async fn test_shutdown_view_removes_it() {
        let session = MemorySession::default();
        session
            .new_view("app", &uri("/work/app"), ViewConfig::default())
            .await
            .unwrap();

        let view = session.view("app").unwrap();
        session.shutdown_view(&view).await;

        assert!(session.view("app").is_none());
        assert!(session.is_empty());
    }

    #[tokio::test]
    async fn test_stale_shutdown_keeps_replacement() {
        let session = MemorySession::default();
        session
            .new_view("app", &uri("/work/app"), ViewConfig::default())
            .await
            .unwrap();
        let stale = session.view("app").unwrap();
        session.shutdown_view(&stale).await;
        session
            .new_view("app", &uri("/work/app-v2"), ViewConfig::default())
            .await
            .unwrap();

        session.shutdown_view(&stale).await;

        assert_eq!(session.view("app").unwrap().root(), &uri("/work/app-v2"));
    }

    #[tokio::test]
    async fn test_view_for_path_prefers_innermost_root() {
        let session = MemorySession::default();
        session
            .new_view("mono", &uri("/work/mono"), ViewConfig::default())
            .await
            .unwrap();
        session
            .new_view("svc", &uri("/work/mono/services/api"), ViewConfig::default())
            .await
            .unwrap();

        let view = session
            .view_for_path(Path::new("/work/mono/services/api/main.go"))
            .unwrap();
        assert_eq!(view.name(), "svc");

        let view = session
            .view_for_path(Path::new("/work/mono/cmd/tool/main.go"))
            .unwrap();
        assert_eq!(view.name(), "mono");

        assert!(session.view_for_path(Path::new("/elsewhere/main.go")).is_none());
    }

    #[tokio::test]
    async fn test_shutdown_all() {
        let session = MemorySession::default();
        for name in ["a", "b", "c"] {
            session
                .new_view(name, &uri(&format!("/work/{name}")), ViewConfig::default())
                .await
                .unwrap();
        }
        assert_eq!(session.view_names(), vec!["a", "b", "c"]);

        session.shutdown_all().await;
        assert!(session.is_empty());
    }

    #[test]
    fn test_set_options() {
        let session = MemorySession::default();
        assert!(session.options().install_dependency_automatically);

        session.set_options(SessionOptions {
            install_dependency_automatically: false,
            ..Default::default()
        });
        assert!(!session.options().install_dependency_automatically);
    }
}
