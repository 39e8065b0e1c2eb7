use tower_lsp_server::{LspService, Server};
use tracing_subscriber::EnvFilter;
use xref_lsp::server::{Backend, methods};

#[tokio::main]
async fn main() {
    // stdout carries the protocol
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let stdin = tokio::io::stdin();
    let stdout = tokio::io::stdout();

    let (service, socket) = LspService::build(Backend::new)
        .custom_method(methods::EDEFINITION, Backend::edefinition)
        .finish();

    Server::new(stdin, stdout, socket).serve(service).await;
}
