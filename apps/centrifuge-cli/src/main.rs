//! centrifuge-cli - call the Centrifuge HTTP API from the command line.
//!
//! Connection settings come from the environment and can be overridden per
//! invocation with flags. Results are printed to stdout as pretty JSON; logs
//! go to stderr.
//!
//! # Usage
//!
//! ```text
//! CENTRIFUGE_HOST=http://localhost:8000 CENTRIFUGE_SECRET=secret \
//!     centrifuge-cli publish news '{"text":"hi"}'
//! centrifuge-cli client-token 42 --info '{"name":"Ann"}'
//! ```
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `CENTRIFUGE_HOST` | `http://localhost:8000` | Server address |
//! | `CENTRIFUGE_SECRET` | `secret` | Shared MAC secret |
//! | `CENTRIFUGE_ALGORITHM` | `sha256` | MAC digest algorithm |
//! | `CENTRIFUGE_CA_FILE` | *(unset)* | Extra trusted CA bundle |
//! | `CENTRIFUGE_CA_PATH` | *(unset)* | Directory of extra trusted CAs |
//! | `CENTRIFUGE_CONNECT_TIMEOUT_MS` | *(unset)* | Connect timeout |
//! | `CENTRIFUGE_REQUEST_TIMEOUT_MS` | *(unset)* | Total request timeout |
//! | `LOG_LEVEL` | `warn` | Log level filter |
//! | `RUST_LOG` | *(unset)* | Fine-grained tracing filter (overrides `LOG_LEVEL`) |

use std::path::PathBuf;

use anyhow::{Context, Result};
use centrifuge_client::{Client, ClientConfig, ConnectCredentials, HashAlgorithm};
use clap::{Parser, Subcommand};
use serde_json::Value;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Call the Centrifuge HTTP API.
#[derive(Parser, Debug)]
#[command(name = "centrifuge-cli", version)]
struct Cli {
    /// Server address (overrides `CENTRIFUGE_HOST`).
    #[arg(long)]
    host: Option<String>,

    /// Shared secret (overrides `CENTRIFUGE_SECRET`).
    #[arg(long)]
    secret: Option<String>,

    /// MAC digest algorithm (overrides `CENTRIFUGE_ALGORITHM`).
    #[arg(long)]
    algorithm: Option<HashAlgorithm>,

    /// Extra trusted CA bundle in PEM format.
    #[arg(long)]
    ca_file: Option<PathBuf>,

    /// Directory of extra trusted CA certificates.
    #[arg(long)]
    ca_path: Option<PathBuf>,

    /// Connect timeout in milliseconds.
    #[arg(long)]
    connect_timeout_ms: Option<u64>,

    /// Total request timeout in milliseconds.
    #[arg(long)]
    request_timeout_ms: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Publish JSON data into a channel.
    Publish {
        /// Channel name.
        channel: String,
        /// JSON payload.
        data: String,
    },
    /// Publish the same JSON data into several channels.
    Broadcast {
        /// JSON payload.
        data: String,
        /// Channel names.
        #[arg(required = true)]
        channels: Vec<String>,
    },
    /// Unsubscribe a user from a channel.
    Unsubscribe {
        /// Channel name.
        channel: String,
        /// User id.
        user: String,
    },
    /// Disconnect a user.
    Disconnect {
        /// User id.
        user: String,
    },
    /// Show clients subscribed to a channel.
    Presence {
        /// Channel name.
        channel: String,
    },
    /// Show recent messages of a channel.
    History {
        /// Channel name.
        channel: String,
    },
    /// List active channels.
    Channels,
    /// Show server node statistics.
    Stats,
    /// Issue connection credentials for an end-user client.
    ClientToken {
        /// User id.
        user: String,
        /// Unix timestamp to sign; defaults to now.
        #[arg(long)]
        timestamp: Option<String>,
        /// Extra connection info.
        #[arg(long, default_value = "")]
        info: String,
    },
    /// Sign a private-channel subscription.
    ChannelSign {
        /// Connection id.
        client: String,
        /// Private channel name.
        channel: String,
        /// Extra channel info.
        #[arg(long, default_value = "")]
        info: String,
    },
}

/// Initialize the tracing subscriber on stderr.
///
/// Uses `RUST_LOG` if set, otherwise falls back to `LOG_LEVEL`.
fn init_tracing() -> Result<()> {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "warn".to_owned());
        EnvFilter::try_new(&log_level)
            .with_context(|| format!("invalid log level filter: {log_level}"))?
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    Ok(())
}

/// Environment configuration with command-line overrides applied.
fn build_config(cli: &Cli) -> Result<ClientConfig> {
    let mut config = ClientConfig::from_env().context("invalid environment configuration")?;

    if let Some(host) = &cli.host {
        config.host.clone_from(host);
    }
    if let Some(secret) = &cli.secret {
        config.secret.clone_from(secret);
    }
    if let Some(algorithm) = cli.algorithm {
        config.algorithm = algorithm;
    }
    if cli.ca_file.is_some() {
        config.transport.trusted_cert_file.clone_from(&cli.ca_file);
    }
    if cli.ca_path.is_some() {
        config.transport.trusted_ca_path.clone_from(&cli.ca_path);
    }
    if cli.connect_timeout_ms.is_some() {
        config.transport.connect_timeout_ms = cli.connect_timeout_ms;
    }
    if cli.request_timeout_ms.is_some() {
        config.transport.request_timeout_ms = cli.request_timeout_ms;
    }

    Ok(config)
}

fn parse_json(data: &str) -> Result<Value> {
    serde_json::from_str(data).with_context(|| format!("payload is not valid JSON: {data}"))
}

async fn run(client: &Client, command: Command) -> Result<Value> {
    let value = match command {
        Command::Publish { channel, data } => client.publish(&channel, &parse_json(&data)?).await?,
        Command::Broadcast { data, channels } => {
            client.broadcast(channels.as_slice(), &parse_json(&data)?).await?
        }
        Command::Unsubscribe { channel, user } => client.unsubscribe(&channel, &user).await?,
        Command::Disconnect { user } => client.disconnect(&user).await?,
        Command::Presence { channel } => client.presence(&channel).await?,
        Command::History { channel } => client.history(&channel).await?,
        Command::Channels => client.channels().await?,
        Command::Stats => client.stats().await?,
        Command::ClientToken {
            user,
            timestamp,
            info,
        } => {
            let credentials = match timestamp {
                Some(timestamp) => ConnectCredentials {
                    token: client.generate_client_token(&user, &timestamp, &info),
                    user,
                    timestamp,
                    info,
                },
                None => client.connect_credentials(&user, &info),
            };
            serde_json::to_value(credentials)?
        }
        Command::ChannelSign {
            client: client_id,
            channel,
            info,
        } => serde_json::to_value(client.channel_credentials(&client_id, &channel, &info))?,
    };
    Ok(value)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing()?;

    let config = build_config(&cli)?;
    debug!(?config, "resolved configuration");

    let client = Client::from_config(&config).context("failed to create client")?;
    let value = run(&client, cli.command).await?;

    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}
