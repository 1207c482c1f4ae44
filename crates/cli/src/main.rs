//! TRSS CLI entry point.
//!
//! This binary is the composition root. Responsibilities:
//!
//! 1. **Parse configuration** — base URL and timeout from flags or the
//!    `TRSS_BASE_URL` / `TRSS_TIMEOUT_SECS` environment variables.
//! 2. **Wire observability** — configure `tracing-subscriber` with an
//!    `EnvFilter` (`RUST_LOG`, default `warn`) and a text or JSON layer on
//!    stderr. All spans and events emitted by `trss` and `trss-http` flow
//!    through it.
//! 3. **Construct infrastructure** — build the `HttpTransport` and inject it
//!    into a `TrssClient`.
//! 4. **Dispatch the command**: `skin-stats`, `decode`, `encode` or `check`.

mod output;

use std::io::Read;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;
use trss::{ApiConfig, DecodedSkin, Layout, SkinGrid, SkinId, TrssClient, DEFAULT_BASE_URL};
use trss_http::{HttpTransport, HttpTransportConfig};

#[derive(Debug, Parser)]
#[command(name = "trss", version, about = "Query the TRSS skin database and work with encoded skins")]
struct Cli {
    /// Base URL that `users.php` and `skins.php` live under.
    #[arg(long, env = "TRSS_BASE_URL", default_value = DEFAULT_BASE_URL, global = true)]
    base_url: String,

    /// Request timeout in seconds.
    #[arg(long, env = "TRSS_TIMEOUT_SECS", default_value_t = 30, global = true)]
    timeout_secs: u64,

    /// Log line format on stderr.
    #[arg(long, value_enum, default_value_t = LogFormat::Text, global = true)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print every field of a skin and whether its author liked it.
    SkinStats {
        /// Skin id.
        id: u64,
    },
    /// Decode a `trSkin1…` string and print the cells as JSON.
    Decode {
        wire: String,
        /// Print one flat list of 360 cells instead of 18 rows.
        #[arg(long)]
        flat: bool,
    },
    /// Read an 18x20 JSON grid from stdin and print its wire form.
    Encode,
    /// Report whether a string is a valid encoded skin.
    Check { wire: String },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.log_format);

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    match format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    match cli.command {
        Command::SkinStats { id } => {
            tracing::debug!(base_url = %cli.base_url, timeout_secs = cli.timeout_secs, "building client");
            let transport = HttpTransport::new(&HttpTransportConfig {
                timeout: Duration::from_secs(cli.timeout_secs),
                ..HttpTransportConfig::default()
            })?;
            let client = TrssClient::new(transport, ApiConfig::with_base_url(&cli.base_url));
            skin_stats(&client, SkinId::new(id)).await?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Decode { wire, flat } => {
            let layout = if flat { Layout::Flat } else { Layout::Grid };
            let json = match trss::decode(&wire, layout).context("decoding skin")? {
                DecodedSkin::Grid(rows) => serde_json::to_string_pretty(&rows)?,
                DecodedSkin::Flat(cells) => serde_json::to_string_pretty(&cells)?,
            };
            println!("{json}");
            Ok(ExitCode::SUCCESS)
        }
        Command::Encode => {
            let mut input = String::new();
            std::io::stdin()
                .read_to_string(&mut input)
                .context("reading grid from stdin")?;
            let grid: SkinGrid = serde_json::from_str(&input).context("parsing grid JSON")?;
            println!("{}", grid.to_wire()?);
            Ok(ExitCode::SUCCESS)
        }
        Command::Check { wire } => {
            let valid = trss::is_encoded_skin(&wire);
            println!("{}", if valid { "valid" } else { "invalid" });
            Ok(if valid {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
    }
}

async fn skin_stats(client: &TrssClient<HttpTransport>, id: SkinId) -> anyhow::Result<()> {
    let skin = client
        .get_skin_by_id(id)
        .await
        .with_context(|| format!("fetching skin {id}"))?;
    let self_like = client
        .get_like(skin.author_id, skin.id)
        .await
        .context("checking self-like")?;
    print!("{}", output::render_stats(&skin, self_like));
    Ok(())
}
