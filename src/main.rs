//! Collector Console - terminal administration console for the collector agent
//!
//! Run with `collector-console` or `collector-console --help` for usage.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, WrapErr};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use collector_console::{
    APP_NAME, VERSION,
    config::Config,
    service::HttpSessionService,
    shell::SessionService,
    tui::{App, ShellExit},
};

#[derive(Parser)]
#[command(name = APP_NAME)]
#[command(version = VERSION)]
#[command(about = "Terminal administration console for the performance collector agent")]
#[command(long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Path to config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Agent base URL (overrides the config file)
    #[arg(short, long)]
    server: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the interactive console (default)
    Tui,

    /// Print the agent's version information
    Info,

    /// Ask the agent to reload its configuration
    Reload,

    /// Show configuration
    Config {
        /// Initialize config file with defaults
        #[arg(long)]
        init: bool,
    },
}

fn setup_logging(debug: bool, log_file: Option<PathBuf>) -> Result<()> {
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        // Use info level for our crate, warn for dependencies
        EnvFilter::new("info")
            .add_directive("hyper=warn".parse()?)
            .add_directive("reqwest=warn".parse()?)
            .add_directive("tokio=warn".parse()?)
    };

    if let Some(path) = log_file {
        // Log to file when running TUI (so logs don't interfere with display)
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .wrap_err_with(|| format!("cannot open log file {}", path.display()))?;

        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(file).with_target(false))
            .with(filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
            .with(filter)
            .init();
    }

    Ok(())
}

/// Build the agent client and sign in when credentials are configured
async fn connect(config: &Config) -> Result<HttpSessionService> {
    let service = HttpSessionService::new(&config.server_url, config.request_timeout())?;

    if let Some((username, password)) = config.credentials() {
        service
            .login(username, password)
            .await
            .wrap_err_with(|| format!("sign-in to {} failed", service.base_url()))?;
        info!("Signed in to {} as {}", service.base_url(), username);
    }

    Ok(service)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Install color-eyre error hooks
    color_eyre::install()?;

    let cli = Cli::parse();

    // Load configuration
    let mut config = Config::load(cli.config.as_deref()).unwrap_or_else(|e| {
        eprintln!("Warning: Failed to load config, using defaults: {}", e);
        Config::default()
    });
    if let Some(server) = cli.server {
        config.server_url = server;
    }
    config.debug |= cli.debug;

    match cli.command {
        None | Some(Commands::Tui) => {
            // Ensure required directories exist
            if let Err(e) = config.ensure_directories() {
                eprintln!("Warning: Failed to create directories: {}", e);
            }

            let log_file = match &config.log_file {
                Some(path) => path.clone(),
                None => Config::default_log_file()?,
            };
            setup_logging(config.debug, Some(log_file))?;

            info!("Starting Collector Console TUI v{}", VERSION);

            let service = connect(&config).await?;
            let server_url = service.base_url().to_string();

            let mut app = App::new(config, Arc::new(service))?;
            match app.run().await? {
                ShellExit::Quit => info!("Console closed"),
                ShellExit::SignedOut => {
                    info!("Signed out");
                    println!("Signed out from {}.", server_url);
                    println!("Sign in again by running '{}' with credentials configured.", APP_NAME);
                }
            }
        }

        Some(Commands::Info) => {
            setup_logging(config.debug, None)?;

            let service = connect(&config).await?;
            let version = service.fetch_info().await?;

            println!("Agent:      {}", service.base_url());
            println!("Instance:   {}", version.instance_id);
            println!("Version:    {}", version.version);
            println!("Commit:     {}", version.commit);
            println!("Branch:     {}", version.branch);
            println!("Build:      {}", version.build_stamp);
        }

        Some(Commands::Reload) => {
            setup_logging(config.debug, None)?;

            let service = connect(&config).await?;
            println!("Reloading configuration on {}...", service.base_url());
            let elapsed = service.reload_config().await?;
            println!("Configuration reloaded (took {})", elapsed);
        }

        Some(Commands::Config { init }) => {
            setup_logging(config.debug, None)?;

            if init {
                let path = match &cli.config {
                    Some(path) => {
                        config.save_to(path)?;
                        path.clone()
                    }
                    None => config.save()?,
                };
                println!("Configuration initialized at {:?}", path);
            } else {
                println!("Configuration:");
                println!("{}", toml::to_string_pretty(&config.redacted())?);
                println!("\nConfig file: {:?}", Config::config_file_path()?);
                println!("Data dir: {:?}", Config::data_dir()?);
            }
        }
    }

    Ok(())
}
