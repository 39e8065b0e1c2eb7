//! Language server exposing cross-repository symbol lookup.
//!
//! The server keeps one analysis view per workspace folder and answers
//! `textDocument/edefinition` with locators whose file paths are relative to
//! the repository that defines the symbol.

pub mod config;
pub mod fetch;
pub mod server;
pub mod session;

// Re-export commonly used types
pub use config::XrefConfig;
pub use server::Backend;
pub use session::MemorySession;
