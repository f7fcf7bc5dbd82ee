//! # Dormant Server
//!
//! HTTP front-end of the inactive custom object scanner, built on `Axum`.
//!
//! ## Example
//! ```no_run
//! use dormant_server::Server;
//! use dormant_kernel::config::load_config;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let cfg = load_config(Some("server"))?;
//!     Server::builder()
//!         .config(cfg)
//!         .build()?
//!         .run()
//!         .await
//! }
//! ```

mod router;

use anyhow::{Context, Result};
use axum::Router;
use axum_server::Handle;
use dormant_crm::{CrmApi, SalesforceClient};
use dormant_domain::config::ApiConfig;
use dormant_kernel::server::ApiState;
use dormant_vault::TokenVault;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tracing::{error, info};

const SHUTDOWN_GRACE: Duration = Duration::from_secs(30);

/// A fluent builder for configuring and initializing the [`Server`].
#[must_use = "builders do nothing unless you call .build()"]
#[derive(Debug, Default)]
pub struct ServerBuilder {
    cfg: ApiConfig,
    crm: Option<Arc<dyn CrmApi>>,
}

impl ServerBuilder {
    /// Set up the server's configuration.
    pub fn config(mut self, cfg: ApiConfig) -> Self {
        self.cfg = cfg;
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.cfg.server.port = port;
        self
    }

    /// Replaces the Salesforce client, e.g. with an in-memory org.
    pub fn crm(mut self, crm: Arc<dyn CrmApi>) -> Self {
        self.crm = Some(crm);
        self
    }

    fn init_crm(&self) -> Result<Arc<dyn CrmApi>> {
        if let Some(crm) = &self.crm {
            return Ok(Arc::clone(crm));
        }

        let crm_cfg = &self.cfg.crm;
        let client = SalesforceClient::builder()
            .api_version(&crm_cfg.api_version)
            .connect_timeout(crm_cfg.connect_timeout())
            .build()
            .context("Failed to initialize the Salesforce client")?;

        Ok(Arc::new(client))
    }

    fn validate_ssl_config(&self) -> Result<()> {
        if let Some(ssl) = &self.cfg.server.ssl {
            if !ssl.cert.exists() {
                anyhow::bail!("SSL certificate not found at: {}", ssl.cert.display());
            }
            if !ssl.key.exists() {
                anyhow::bail!("SSL key not found at: {}", ssl.key.display());
            }

            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                let metadata = ssl.key.metadata()?;
                if metadata.permissions().mode() & 0o077 != 0 {
                    tracing::warn!(
                        "SECURITY: SSL Private Key {} has insecure permissions (should be 600)",
                        ssl.key.display()
                    );
                }
            }
        }
        Ok(())
    }

    /// Consumes the builder and initializes the server.
    ///
    /// # Process
    /// 1. Validates TLS files and scanner limits
    /// 2. Builds the token vault from the configured key
    /// 3. Creates the pooled Salesforce client (unless one was injected)
    /// 4. Constructs application state
    ///
    /// # Errors
    /// Returns an error if:
    /// * A configured SSL certificate/key file is missing
    /// * A scanner limit is zero or the default window is out of range
    /// * `security.token_key` is not 64 hex characters
    pub fn build(self) -> Result<Server> {
        self.validate_ssl_config()?;
        dormant_kernel::config::validate(&self.cfg).context("Configuration rejected")?;

        let address = SocketAddr::new(self.cfg.server.address, self.cfg.server.port);
        info!(address = %address, "Initializing server");

        let vault = TokenVault::from_hex(&self.cfg.security.token_key)
            .context("Failed to load the token key")?;
        let crm = self.init_crm()?;

        info!(
            api_version = %self.cfg.crm.api_version,
            concurrency = self.cfg.scanner.concurrency,
            query_timeout_secs = self.cfg.scanner.query_timeout_secs,
            request_timeout_secs = self.cfg.scanner.request_timeout_secs,
            plain_tokens = self.cfg.security.allow_plain_tokens,
            "Scanner configured"
        );

        let state = ApiState::builder()
            .config(self.cfg)
            .vault(vault)
            .crm(crm)
            .build()
            .context("Failed to finalize API state")?;

        Ok(Server { state })
    }
}

/// A fully initialized server instance ready to run.
#[must_use = "call .run().await to start the server"]
#[derive(Debug)]
pub struct Server {
    state: ApiState,
}

impl Server {
    /// Returns a new [`ServerBuilder`] to configure the server.
    pub fn builder() -> ServerBuilder {
        ServerBuilder::default()
    }

    /// The complete application router, without binding a socket.
    pub fn router(&self) -> Router {
        router::init(self.state.clone())
    }

    /// Starts the server and runs until the shutdown signal is received.
    ///
    /// # Errors
    /// Returns an error if the server fails to bind to the configured address
    /// or if SSL/TLS setup fails.
    pub async fn run(self) -> Result<()> {
        let cfg = self.state.config.clone();
        let address = SocketAddr::new(cfg.server.address, cfg.server.port);

        info!(
            address = %address,
            ssl = cfg.server.ssl.is_some(),
            "Starting server"
        );

        let app = self.router();

        let handle = Handle::<SocketAddr>::new();
        let shutdown_handle = handle.clone();

        tokio::spawn(async move {
            if let Err(e) = shutdown_signal().await {
                error!("Error while waiting for shutdown signal: {e}");
                return;
            }
            info!("Shutdown signal received, starting graceful shutdown...");
            shutdown_handle.graceful_shutdown(Some(SHUTDOWN_GRACE));
        });

        if let Some(ssl_config) = &cfg.server.ssl {
            info!("Starting HTTPS server on https://{address}");

            let tls_config = axum_server::tls_rustls::RustlsConfig::from_pem_file(
                &ssl_config.cert,
                &ssl_config.key,
            )
            .await
            .context("Failed to load SSL/TLS certificates")?;

            axum_server::bind_rustls(address, tls_config)
                .handle(handle)
                .serve(app.into_make_service())
                .await
                .context("HTTPS server failed")?;
        } else {
            info!("Starting HTTP server on http://{address}");

            axum_server::bind(address)
                .handle(handle)
                .serve(app.into_make_service())
                .await
                .context("HTTP server failed")?;
        }

        info!("Server shutdown complete");
        Ok(())
    }

    /// Returns a reference to the application state.
    #[must_use]
    pub const fn state(&self) -> &ApiState {
        &self.state
    }
}

/// Listens for shutdown signals (Ctrl+C, SIGTERM).
async fn shutdown_signal() -> Result<()> {
    let ctrl_c = async { signal::ctrl_c().await.context("Failed to install Ctrl+C handler") };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .context("Failed to install SIGTERM handler")?
            .recv()
            .await;
        Ok::<_, anyhow::Error>(())
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<Result<()>>();

    tokio::select! {
        res = ctrl_c => {
            res.context("Ctrl+C signal received")?;
        },
        res = terminate => {
            res.context("SIGTERM signal received")?;
        },
    }

    Ok(())
}
