//! riftwatch: match-history reports from the command line

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use riftwatch::analysis::analyze_riot_id;
use riftwatch::config::Secrets;
use riftwatch::{Config, RiftwatchError, RiotClient};

/// Riftwatch CLI
#[derive(Parser)]
#[command(name = "riftwatch")]
#[command(version = riftwatch::PKG_VERSION)]
#[command(about = "League of Legends match-history analytics")]
struct Args {
    /// Config file (default: ~/.riftwatch/config.toml, then /etc/riftwatch/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Riot API key (overrides the secrets file)
    #[arg(long, env = "RIOT_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Resolve a Riot ID and print the account
    Account {
        /// In-game name (the part before '#')
        game_name: String,
        /// Tag line (the part after '#')
        tag_line: String,
    },

    /// Analyse a player's history and write the report and charts
    Report {
        game_name: String,
        tag_line: String,
        /// Output directory
        #[arg(short, long, default_value = "riftwatch-report")]
        out: PathBuf,
        /// Matches to analyse (default: from config)
        #[arg(short, long)]
        matches: Option<usize>,
    },

    /// Print version information
    Version,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialise tracing (default: warn for CLI; override with RUST_LOG).
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let args = Args::parse();
    let config = Config::load_or_default(args.config.as_deref())?;

    match args.command {
        Command::Account {
            game_name,
            tag_line,
        } => {
            let client = build_client(&config, args.api_key)?;
            let account = client.account_by_riot_id(&game_name, &tag_line).await?;
            println!("{}", serde_json::to_string_pretty(&account)?);
        }
        Command::Report {
            game_name,
            tag_line,
            out,
            matches,
        } => {
            let client = build_client(&config, args.api_key)?;
            let mut analysis = config.analysis.clone();
            if let Some(n) = matches {
                analysis = analysis.match_history_limit(n);
            }
            let report = analyze_riot_id(&client, &game_name, &tag_line, &analysis).await?;
            let written = riftwatch::render::write_report(&out, &report)?;

            let o = &report.overall;
            println!(
                "{}: {} games, {}% win rate, {} KDA",
                report.player_name, o.total_games, o.win_rate, o.avg_kda
            );
            for tip in &report.coaching_tips {
                println!("  - {tip}");
            }
            for path in written {
                println!("wrote {}", path.display());
            }
        }
        Command::Version => {
            println!("riftwatch {}", riftwatch::version_string());
        }
    }

    Ok(())
}

/// Client from config, with the key taken from the flag, the secrets file or
/// `RIOT_API_KEY`.
fn build_client(config: &Config, api_key: Option<String>) -> riftwatch::Result<RiotClient> {
    let api_key = match api_key {
        Some(key) => key,
        None => Secrets::load()?.api_key().ok_or_else(|| {
            RiftwatchError::Configuration(
                "no API key: set RIOT_API_KEY or add [riot] api_key to ~/.riftwatch/secrets.toml"
                    .to_string(),
            )
        })?,
    };
    config.client_builder(api_key).build()
}
