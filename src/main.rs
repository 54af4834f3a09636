use anyhow::Result;
use clap::Parser;
use fuelportal_exporter::{config::Config, portal::PortalClient, server, setup};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/Default.toml")]
    config: String,

    /// Portal provider subdomain (overrides config)
    #[arg(long, env = "FUELPORTAL_PROVIDER")]
    provider: Option<String>,

    /// Portal login e-mail (overrides config)
    #[arg(long, env = "FUELPORTAL_USERNAME")]
    username: Option<String>,

    /// Portal password (overrides config)
    #[arg(long, env = "FUELPORTAL_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// Port to listen on for metrics
    #[arg(short, long, env = "EXPORTER_PORT")]
    port: Option<u16>,

    /// Address to bind to
    #[arg(short, long, env = "EXPORTER_ADDR")]
    addr: Option<String>,

    /// Validate the credentials with one login and exit
    #[arg(long)]
    check: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting MyFuelPortal Exporter v{}",
        env!("CARGO_PKG_VERSION")
    );

    // Parse CLI arguments
    let args = Args::parse();

    // Load configuration
    let mut config = Config::load(&args.config)?;

    // Override with CLI arguments if provided
    if let Some(provider) = args.provider {
        config.portal.provider = provider;
    }
    if let Some(username) = args.username {
        config.portal.username = username;
    }
    if let Some(password) = args.password {
        config.portal.password = secrecy::SecretString::new(password.into());
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(addr) = args.addr {
        config.server.addr = addr;
    }
    config.validate()?;

    info!("Configuration loaded successfully");
    info!("Portal: {}", config.portal.base_url());

    if args.check {
        let client = PortalClient::from_config(&config.portal);
        match setup::validate_credentials(&client, &config.portal.credentials()).await {
            Ok(()) => {
                info!("Credentials are valid");
                return Ok(());
            }
            Err(e) => {
                error!("Setup check failed ({}): {}", e.tag(), e);
                std::process::exit(1);
            }
        }
    }

    info!(
        "Metrics endpoint: http://{}:{}/metrics",
        config.server.addr, config.server.port
    );

    // Start the metrics server
    if let Err(e) = server::start(config).await {
        error!("Server error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}
