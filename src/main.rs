use anyhow::Result;
use clap::{Parser, Subcommand};

use resonanze::{cli, config, web};

#[derive(Debug, Parser)]
#[command(name = "resonanze")]
#[command(about = "Voice-health dashboard client", version)]
struct App {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Fetch the dashboard statistics and show the derived view
    Dashboard {
        /// Output format: table (default), json
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// Strip reasoning blocks and signatures from a findings text
    Findings {
        /// The findings text (read from stdin when omitted)
        text: Option<String>,
    },
    /// Show recent dashboard fetch attempts
    History {
        /// Number of most recent entries to include
        #[arg(long, default_value = "20")]
        limit: usize,
        /// Output format: table (default), json
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// Serve the dashboard as a local web page
    Serve {
        /// Listen address (defaults to web.addr from the config)
        #[arg(long)]
        addr: Option<String>,
        /// Do not open a browser window
        #[arg(long)]
        no_open: bool,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Debug, Subcommand)]
enum ConfigAction {
    /// Show the effective configuration
    Show,
    /// Write a default config to ~/.resonanze/config.toml
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Set a dotted key, e.g. `backend.base_url`
    Set { key: String, value: String },
    /// Reset the global config to defaults
    Reset,
}

fn main() -> Result<()> {
    let app = App::parse();

    match app.command {
        Commands::Dashboard { format } => {
            let fmt = cli::OutputFormat::from_str_opt(Some(&format));
            cli::run_dashboard(fmt)
        }
        Commands::Findings { text } => cli::run_findings(text),
        Commands::History { limit, format } => {
            let fmt = cli::OutputFormat::from_str_opt(Some(&format));
            cli::run_history(limit, fmt)
        }
        Commands::Serve { addr, no_open } => {
            let cfg = config::load();
            let ctx = web::WebContext {
                client: resonanze::dashboard::DashboardClient::new(&config::client_options(&cfg)),
                auth: config::auth_context(&cfg),
            };
            let addr = addr.unwrap_or_else(|| cfg.web.addr.clone());
            web::serve(&addr, &ctx, !no_open)
        }
        Commands::Config { action } => match action {
            ConfigAction::Show => cli::run_config_show(),
            ConfigAction::Init { force } => cli::run_config_init(force),
            ConfigAction::Set { key, value } => cli::run_config_set(&key, &value),
            ConfigAction::Reset => cli::run_config_reset(),
        },
    }
}
