//! ZkAuth - ZooKeeper SASL posture checker
//!
//! Reports whether a broker's ZooKeeper client would authenticate with SASL
//! given its JAAS login configuration and `zookeeper.sasl.client` setting.

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]

use anyhow::Result;
use clap::{Parser, Subcommand};

mod cli;
mod config;

#[derive(Parser)]
#[command(name = "zkauth")]
#[command(author, version, about = "ZkAuth - ZooKeeper SASL posture checker", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Settings file (TOML or JSON)
    #[arg(short, long, env = "ZKAUTH_CONFIG")]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve whether the ZooKeeper client must use SASL
    Check {
        /// JAAS login configuration file
        #[arg(short, long, env = "JAVA_SECURITY_AUTH_LOGIN_CONFIG")]
        login_config: Option<String>,

        /// Login context looked up in the JAAS file
        #[arg(long)]
        context: Option<String>,

        /// Value of zookeeper.sasl.client
        #[arg(long)]
        sasl_client: Option<bool>,
    },

    /// List the login contexts defined in a JAAS file
    Contexts {
        /// JAAS login configuration file
        path: String,
    },

    /// Show version information
    Version,
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("zkauth=info".parse()?),
        )
        .with_target(true)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Check {
            login_config,
            context,
            sasl_client,
        } => {
            let overrides = config::Overrides {
                login_config,
                context,
                sasl_client,
            };
            let config = config::load(cli.config.as_deref(), overrides)?;
            let enabled = cli::check(&config)?;
            println!("{}", if enabled { "enabled" } else { "disabled" });
        }

        Commands::Contexts { path } => cli::list_contexts(&path)?,

        Commands::Version => {
            println!("zkauth version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
