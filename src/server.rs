//! Server bootstrap.
//!
//! Parses the protocol, discovers handlers, composes the router and serves it
//! over plain HTTP or TLS until the operator interrupts the process.

use std::future::IntoFuture;
use std::net::{Ipv4Addr, SocketAddr};
use std::str::FromStr;

use axum::Router;
use axum_server::tls_rustls::RustlsConfig;
use colored::Colorize;
use tokio::net::TcpListener;

use crate::config::Config;
use crate::error::StartupError;
use crate::logging::LoggingHandle;
use crate::registry::{HandlerDescriptor, HandlerRegistry, discover};
use crate::routes::app_router;

/// Notice printed when the server stops on an interrupt.
pub const STOP_NOTICE: &str = "Server was stopped by user";

/// Listening mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Protocol {
    Http,
    Https,
}

impl Protocol {
    pub fn scheme(self) -> &'static str {
        match self {
            Self::Http => "http",
            Self::Https => "https",
        }
    }
}

impl FromStr for Protocol {
    type Err = StartupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "http" => Ok(Self::Http),
            "https" => Ok(Self::Https),
            _ => Err(StartupError::UnsupportedProtocol(s.trim().to_string())),
        }
    }
}

/// A configured server ready to run.
pub struct Server {
    config: Config,
    registry: HandlerRegistry,
    logging: Option<LoggingHandle>,
}

impl Server {
    pub fn new(config: Config, registry: HandlerRegistry) -> Self {
        Self {
            config,
            registry,
            logging: None,
        }
    }

    /// Hands the logging handle to the server, which keeps it until it stops.
    pub fn with_logging(mut self, logging: LoggingHandle) -> Self {
        self.logging = Some(logging);
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Discovers handlers and builds the router without binding anything.
    ///
    /// # Errors
    ///
    /// Returns [`StartupError::Discovery`] if the handler directory is missing
    /// or unreadable, or if routes collide.
    pub fn router(&self) -> Result<Router, StartupError> {
        self.build().map(|(_, router)| router)
    }

    fn build(&self) -> Result<(Vec<HandlerDescriptor>, Router), StartupError> {
        let descriptors = discover(&self.config.handlers_dir, &self.registry)?;
        let router = app_router(
            &descriptors,
            &self.config.static_url,
            &self.config.static_dir,
        )?;
        Ok((descriptors, router))
    }

    /// Runs the server until Ctrl-C.
    ///
    /// The protocol is checked before discovery and binding, so an unsupported
    /// value fails without opening a socket. Requests still in flight at
    /// shutdown are abandoned.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - the protocol is neither `http` nor `https`
    /// - handler discovery fails
    /// - the TLS certificate or key cannot be loaded
    /// - the port cannot be bound
    pub async fn run(self) -> Result<(), StartupError> {
        let protocol: Protocol = self.config.protocol.parse()?;
        let (descriptors, app) = self.build()?;
        let addr = SocketAddr::from((Ipv4Addr::UNSPECIFIED, self.config.port));

        tracing::info!(
            "Registered {} handler route(s) from {}",
            descriptors.len(),
            self.config.handlers_dir.display()
        );

        if self.config.console_messages {
            print_routes(protocol, &self.config, &descriptors);
        }

        match protocol {
            Protocol::Http => serve_plain(addr, app).await?,
            Protocol::Https => serve_tls(addr, app, &self.config).await?,
        }

        tracing::info!("{STOP_NOTICE}");
        if self.config.console_messages {
            println!("{}", STOP_NOTICE.yellow());
        }

        Ok(())
    }
}

async fn serve_plain(addr: SocketAddr, app: Router) -> Result<(), StartupError> {
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| StartupError::Bind { addr, source })?;
    tracing::info!("Listening on http://{addr}");

    tokio::select! {
        result = axum::serve(listener, app).into_future() => result.map_err(StartupError::Serve),
        () = shutdown_signal() => Ok(()),
    }
}

async fn serve_tls(addr: SocketAddr, app: Router, config: &Config) -> Result<(), StartupError> {
    let tls = RustlsConfig::from_pem_file(config.tls.cert_path(), config.tls.key_path())
        .await
        .map_err(StartupError::Tls)?;
    tracing::info!("Listening on https://{addr}");

    let server = axum_server::bind_rustls(addr, tls).serve(app.into_make_service());

    tokio::select! {
        result = server => result.map_err(|source| {
            if source.kind() == std::io::ErrorKind::AddrInUse {
                StartupError::Bind { addr, source }
            } else {
                StartupError::Serve(source)
            }
        }),
        () = shutdown_signal() => Ok(()),
    }
}

/// Resolves on Ctrl-C (SIGINT).
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for interrupt signal: {e}");
        std::future::pending::<()>().await;
    }
}

/// Fully qualified URLs announced at startup.
pub fn route_urls(
    protocol: Protocol,
    config: &Config,
    descriptors: &[HandlerDescriptor],
) -> (Vec<String>, String) {
    let base = format!("{}://localhost:{}", protocol.scheme(), config.port);
    let routes = descriptors
        .iter()
        .map(|d| format!("{base}{}", d.route))
        .collect();
    let static_root = format!("{base}{}", config.static_url.trim());
    (routes, static_root)
}

fn print_routes(protocol: Protocol, config: &Config, descriptors: &[HandlerDescriptor]) {
    let (routes, static_root) = route_urls(protocol, config, descriptors);

    println!("{}", "Handlers:".bold());
    for url in routes {
        println!("  {}", url.cyan());
    }
    println!("{} {}", "Static content:".bold(), static_root.cyan());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_protocol_parse() {
        assert_eq!("http".parse::<Protocol>().unwrap(), Protocol::Http);
        assert_eq!(" HTTPS ".parse::<Protocol>().unwrap(), Protocol::Https);
    }

    #[test]
    fn test_protocol_parse_rejects_unknown() {
        let err = "ftp".parse::<Protocol>().unwrap_err();
        assert!(matches!(err, StartupError::UnsupportedProtocol(p) if p == "ftp"));
    }

    #[test]
    fn test_route_urls() {
        let config = Config {
            port: 9000,
            static_url: "/static/".to_string(),
            ..Config::default()
        };

        let (routes, static_root) = route_urls(Protocol::Https, &config, &[]);
        assert!(routes.is_empty());
        assert_eq!(static_root, "https://localhost:9000/static/");
    }
}
