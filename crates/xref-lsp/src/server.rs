use crate::config::XrefConfig;
use crate::fetch::{CONFIG_SECTION, ClientConfigFetcher};
use crate::session::MemorySession;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tower_lsp_server::ls_types::{
    DidChangeConfigurationParams, DidChangeWorkspaceFoldersParams, InitializeParams,
    InitializeResult, InitializedParams, MessageType, OneOf, ServerCapabilities, ServerInfo,
    TextDocumentPositionParams, WorkspaceFolder, WorkspaceFoldersServerCapabilities,
    WorkspaceServerCapabilities,
};
use tower_lsp_server::{Client, LanguageServer, jsonrpc, jsonrpc::Result};
use xref_core::{
    ServerState, Session, SettingsPatch, StateGuard, SymbolLocator, SymbolResolver,
    VendorRegistry, ViewLifecycle, file_path,
};
use xref_go::ModuleCache;

/// Custom LSP method identifiers.
pub mod methods {
    /// Cross-repository definition lookup.
    pub const EDEFINITION: &str = "textDocument/edefinition";
}

pub struct Backend {
    pub(crate) client: Client,
    state: Arc<StateGuard>,
    session: Arc<MemorySession>,
    vendor: Arc<VendorRegistry>,
    fetcher: Arc<ClientConfigFetcher>,
    views: ViewLifecycle,
    config: Arc<RwLock<XrefConfig>>,
    module_cache: RwLock<ModuleCache>,
    initial_folders: Mutex<Vec<WorkspaceFolder>>,
    resolver: Option<Arc<dyn SymbolResolver>>,
}

impl Backend {
    pub fn new(client: Client) -> Self {
        Self::build(client, None)
    }

    /// Creates a backend that answers `textDocument/edefinition` through
    /// `resolver`.
    pub fn with_resolver(client: Client, resolver: Arc<dyn SymbolResolver>) -> Self {
        Self::build(client, Some(resolver))
    }

    fn build(client: Client, resolver: Option<Arc<dyn SymbolResolver>>) -> Self {
        let state = Arc::new(StateGuard::new());
        let session = Arc::new(MemorySession::default());
        let vendor = Arc::new(VendorRegistry::new());
        let fetcher = Arc::new(ClientConfigFetcher::new(client.clone()));
        let views = ViewLifecycle::new(
            Arc::clone(&session) as Arc<dyn Session>,
            Arc::clone(&fetcher) as Arc<dyn xref_core::ConfigFetcher>,
            Arc::clone(&vendor),
            Arc::clone(&state),
        );

        Self {
            client,
            state,
            session,
            vendor,
            fetcher,
            views,
            config: Arc::new(RwLock::new(XrefConfig::default())),
            module_cache: RwLock::new(ModuleCache::unavailable()),
            initial_folders: Mutex::new(Vec::new()),
            resolver,
        }
    }

    /// Get a reference to the LSP client (primarily for testing).
    #[doc(hidden)]
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Flags every folder that ships a vendor manifest.
    ///
    /// Flags are only read while dependency installation is enabled, so
    /// nothing is recorded otherwise.
    async fn flag_vendor_folders(&self, folders: &[WorkspaceFolder]) {
        if !self.config.read().await.vendor_detection {
            return;
        }
        if !self.session.options().install_dependency_automatically {
            tracing::debug!("dependency installation disabled, skipping vendor detection");
            return;
        }

        for folder in folders {
            let Some(root) = file_path(&folder.uri) else {
                continue;
            };
            if xref_go::has_vendor_manifest(&root).await {
                tracing::info!("vendor directory found in {}", folder.name);
                self.vendor.flag(root);
            }
        }
    }

    /// Drops flags left behind by folders whose view was never created.
    fn discard_vendor_flags(&self, folders: &[WorkspaceFolder]) {
        for root in folders.iter().filter_map(|folder| file_path(&folder.uri)) {
            self.vendor.discard(&root);
        }
    }

    async fn report_error(&self, context: &str, error: &xref_core::XrefError) {
        tracing::error!("{}: {}", context, error);
        self.client
            .log_message(MessageType::ERROR, format!("{context}: {error}"))
            .await;
    }

    /// Handles `textDocument/edefinition`.
    ///
    /// Returns the symbols under the cursor with file paths made relative to
    /// their repository. An empty list means no view covers the document or
    /// no resolver is attached.
    pub async fn edefinition(
        &self,
        params: TextDocumentPositionParams,
    ) -> Result<Vec<SymbolLocator>> {
        let Some(resolver) = &self.resolver else {
            tracing::debug!("no symbol resolver attached");
            return Ok(Vec::new());
        };

        let uri = &params.text_document.uri;
        let Some(path) = file_path(uri) else {
            return Ok(Vec::new());
        };
        let Some(view) = self.session.view_for_path(&path) else {
            tracing::debug!("no view for {}", uri.as_str());
            return Ok(Vec::new());
        };
        let Some(root) = view.root_path() else {
            return Ok(Vec::new());
        };

        let symbols = resolver.resolve(&view, &params).await.map_err(|e| {
            tracing::error!("symbol resolution failed for {}: {}", uri.as_str(), e);
            let mut error = jsonrpc::Error::internal_error();
            error.message = e.to_string().into();
            error
        })?;

        let cache = self.module_cache.read().await.clone();
        Ok(symbols
            .into_iter()
            .map(|symbol| cache.locate(symbol, &root))
            .collect())
    }

    fn server_capabilities() -> ServerCapabilities {
        ServerCapabilities {
            workspace: Some(WorkspaceServerCapabilities {
                workspace_folders: Some(WorkspaceFoldersServerCapabilities {
                    supported: Some(true),
                    change_notifications: Some(OneOf::Left(true)),
                }),
                ..Default::default()
            }),
            experimental: Some(serde_json::json!({ "xrefDefinition": true })),
            ..Default::default()
        }
    }
}

impl LanguageServer for Backend {
    async fn initialize(&self, params: InitializeParams) -> Result<InitializeResult> {
        tracing::info!("initializing xref-lsp server");

        if let Err(e) = self.state.advance(ServerState::Initializing) {
            tracing::error!("{}", e);
            return Err(jsonrpc::Error::invalid_request());
        }

        if let Some(init_options) = params.initialization_options {
            match serde_json::from_value::<XrefConfig>(init_options) {
                Ok(config) => {
                    tracing::debug!("loaded configuration: {:?}", config);
                    *self.config.write().await = config;
                }
                Err(e) => tracing::warn!("ignoring invalid initialization options: {}", e),
            }
        }

        let config = self.config.read().await.clone();
        self.session.set_options(config.session.clone());

        let configuration = params
            .capabilities
            .workspace
            .as_ref()
            .and_then(|workspace| workspace.configuration)
            .unwrap_or(false);
        self.fetcher.set_supported(configuration);

        let cache = xref_go::cache_root_from_env(config.module_cache_root.as_deref())
            .map_or_else(ModuleCache::unavailable, ModuleCache::new)
            .with_policy(config.marker_policy);
        *self.module_cache.write().await = cache;

        let folders = params.workspace_folders.unwrap_or_default();
        self.flag_vendor_folders(&folders).await;
        *self.initial_folders.lock().await = folders;

        Ok(InitializeResult {
            capabilities: Self::server_capabilities(),
            server_info: Some(ServerInfo {
                name: "xref-lsp".into(),
                version: Some(env!("CARGO_PKG_VERSION").into()),
            }),
            offset_encoding: None,
        })
    }

    async fn initialized(&self, _: InitializedParams) {
        if let Err(e) = self.state.advance(ServerState::Initialized) {
            tracing::error!("{}", e);
            return;
        }

        tracing::info!("xref-lsp server initialized");
        self.client
            .log_message(MessageType::INFO, "xref-lsp ready")
            .await;

        let folders = std::mem::take(&mut *self.initial_folders.lock().await);
        for folder in &folders {
            if let Err(e) = self.views.add_view(&folder.name, &folder.uri).await {
                self.report_error(&format!("failed to add view {}", folder.name), &e)
                    .await;
            }
        }
        // Options may have changed since `initialize`, leaving flags unread.
        self.discard_vendor_flags(&folders);
    }

    async fn did_change_workspace_folders(&self, params: DidChangeWorkspaceFoldersParams) {
        let event = params.event;
        tracing::debug!(
            "workspace folders changed: +{} -{}",
            event.added.len(),
            event.removed.len()
        );

        self.flag_vendor_folders(&event.added).await;

        if let Err(e) = self.views.change_folders(&event).await {
            self.discard_vendor_flags(&event.added);
            self.report_error("workspace folder change failed", &e).await;
        }
    }

    async fn did_change_configuration(&self, params: DidChangeConfigurationParams) {
        let Some(section) = params.settings.get(CONFIG_SECTION).cloned() else {
            return;
        };

        match serde_json::from_value::<SettingsPatch>(section) {
            Ok(patch) => {
                let mut options = self.session.options();
                options.apply(patch);
                tracing::debug!("session options updated: {:?}", options);
                self.session.set_options(options);
            }
            Err(e) => tracing::warn!("ignoring invalid {} settings: {}", CONFIG_SECTION, e),
        }
    }

    async fn shutdown(&self) -> Result<()> {
        tracing::info!("shutting down xref-lsp server");
        if let Err(e) = self.state.advance(ServerState::ShuttingDown) {
            tracing::warn!("{}", e);
        }
        self.session.shutdown_all().await;
        Ok(())
    }
}
