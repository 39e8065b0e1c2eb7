//! Core abstractions for xref-lsp.
//!
//! This crate holds the pieces of the cross-repository extension that do not
//! depend on a particular language ecosystem:
//!
//! - **Lifecycle**: the ordered [`ServerState`] and its lock ([`StateGuard`])
//! - **Views**: the [`Session`] and [`ConfigFetcher`] seams and the
//!   [`ViewLifecycle`] manager that keeps views in step with workspace folders
//! - **Vendor mode**: the [`VendorRegistry`] of folders awaiting vendor resolution
//! - **Locators**: [`SymbolLocator`]/[`PackageLocator`] returned by
//!   cross-repository definition lookups
//!
//! # Examples
//!
//! ```no_run
//! use std::sync::Arc;
//! use xref_core::{ConfigFetcher, Session, StateGuard, VendorRegistry, ViewLifecycle};
//!
//! # async fn run(session: Arc<dyn Session>, fetcher: Arc<dyn ConfigFetcher>) -> xref_core::Result<()> {
//! let manager = ViewLifecycle::new(
//!     session,
//!     fetcher,
//!     Arc::new(VendorRegistry::new()),
//!     Arc::new(StateGuard::new()),
//! );
//!
//! let uri = tower_lsp_server::ls_types::Uri::from_file_path("/work/app").unwrap();
//! manager.add_view("app", &uri).await?;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod lifecycle;
pub mod locator;
pub mod options;
pub mod session;
pub mod vendor;
pub mod workspace;

// Re-export commonly used types
pub use error::{Result, XrefError};
pub use lifecycle::{ServerState, StateGuard};
pub use locator::{PackageLocator, ResolvedSymbol, SymbolLocator, SymbolResolver};
pub use options::{SessionOptions, SettingsPatch};
pub use session::{ConfigFetcher, Session, View, ViewConfig, file_path};
pub use vendor::{VendorRegistry, VendorSlot};
pub use workspace::ViewLifecycle;
