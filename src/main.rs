use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use handlerkit::{config::Config, handlers, logging, server::Server};

/// Serve the bundled JSON handlers and static content.
#[derive(Parser)]
#[command(name = "handlerkit")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Protocol: http or https (overrides PROTOCOL)
    #[arg(long)]
    protocol: Option<String>,

    /// Listening port (overrides PORT)
    #[arg(short, long)]
    port: Option<u16>,

    /// URL prefix of static content (overrides STATIC_URL)
    #[arg(long)]
    static_url: Option<String>,

    /// Handler manifest directory (overrides HANDLERS_DIR)
    #[arg(long)]
    handlers_dir: Option<PathBuf>,

    /// Static content directory (overrides STATIC_DIR)
    #[arg(long)]
    static_dir: Option<PathBuf>,

    /// Log directory (overrides LOG_DIR)
    #[arg(long)]
    log_dir: Option<PathBuf>,

    /// Do not print routes or console logs
    #[arg(short, long)]
    quiet: bool,
}

impl Cli {
    fn apply(self, config: &mut Config) {
        if let Some(protocol) = self.protocol {
            config.protocol = protocol;
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(static_url) = self.static_url {
            config.static_url = static_url;
        }
        if let Some(dir) = self.handlers_dir {
            config.handlers_dir = dir;
        }
        if let Some(dir) = self.static_dir {
            config.static_dir = dir;
        }
        if let Some(dir) = self.log_dir {
            config.log_dir = dir;
        }
        if self.quiet {
            config.console_messages = false;
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let mut config = Config::from_env()?;
    cli.apply(&mut config);
    config.validate()?;

    let logging = logging::init(&config.log_settings()).context("Failed to initialize logging")?;
    config.print_summary();

    let registry = handlers::registry()?;

    Server::new(config, registry)
        .with_logging(logging)
        .run()
        .await?;

    Ok(())
}
