use clap::{Args, Parser, Subcommand, builder::styling};
use eyre::Result;
use owo_colors::OwoColorize;
use query_tool::{
    cli::{ExportOptions, connect, default_prefix, export_saved_queries, import_saved_queries},
    config::{ConnectionArgs, ConnectionConfig, Prompt, load_dotenv},
    queries::{AssetCategory, QueryFilter},
    storage::{ExportLayout, JsonSourceReader},
};
use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;

// CLI Styling
const STYLES: styling::Styles = styling::Styles::styled()
    .header(styling::AnsiColor::BrightWhite.on_default())
    .usage(styling::AnsiColor::BrightWhite.on_default())
    .literal(styling::AnsiColor::Green.on_default())
    .placeholder(styling::AnsiColor::Cyan.on_default());

/// Export saved queries to JSON files and import them back
#[derive(Parser)]
#[command(name = "query-tool", version, styles = STYLES)]
struct Cli {
    /// The dotenv file to source AX_URL, AX_KEY and AX_SECRET from
    #[arg(short, long, global = true, default_value = ".env")]
    env: PathBuf,

    /// Service URL [env: AX_URL]
    #[arg(long, global = true)]
    url: Option<String>,

    /// API key [env: AX_KEY]
    #[arg(long, global = true)]
    key: Option<String>,

    /// API secret [env: AX_SECRET]
    #[arg(long, global = true)]
    secret: Option<String>,

    /// Accept invalid TLS certificates
    #[arg(long, global = true)]
    insecure: bool,

    /// More verbose logging
    #[arg(long, global = true)]
    debug: bool,

    /// Command to execute
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
#[group(required = true, multiple = false)]
struct AssetSelector {
    /// Saved queries for devices
    #[arg(short, long)]
    devices: bool,

    /// Saved queries for users
    #[arg(short, long)]
    users: bool,
}

impl AssetSelector {
    fn category(&self) -> AssetCategory {
        match (self.devices, self.users) {
            (_, true) => AssetCategory::Users,
            _ => AssetCategory::Devices,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Write saved queries to JSON files
    #[command(visible_alias = "get")]
    Export {
        #[command(flatten)]
        asset: AssetSelector,

        /// Only queries with at least one of these tags (repeatable or comma-separated)
        #[arg(short, long = "tag", value_delimiter = ',')]
        tags: Vec<String>,

        /// Only queries whose name starts with this (case-sensitive)
        #[arg(short, long, conflicts_with = "ax_queries")]
        name_prefix: Option<String>,

        /// Only the built-in queries (names starting with "AX -")
        #[arg(short, long)]
        ax_queries: bool,

        /// Directory to write the export to
        #[arg(short, long, default_value = ".")]
        path: PathBuf,

        /// Output file name (single file) or subdirectory (per query), without extension
        /// [default: <category>_saved_queries_<timestamp>]
        #[arg(long)]
        prefix: Option<String>,

        /// Write one file per saved query instead of a single JSON array
        #[arg(long)]
        per_file: bool,
    },

    /// Create saved queries from JSON files, skipping names that already exist
    #[command(visible_alias = "push")]
    Import {
        #[command(flatten)]
        asset: AssetSelector,

        /// A .json file or a directory of .json files
        path: PathBuf,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let log_level = match cli.debug {
        true => "debug",
        false => "info",
    };
    let env = env_logger::Env::default().filter_or("LOG_LEVEL", log_level);
    env_logger::Builder::from_env(env)
        .format_timestamp_millis()
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::debug!("{:?}", e);
            eprintln!("{} {:#}", "error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    load_dotenv(&cli.env)?;

    let prompt = match std::io::stdin().is_terminal() {
        true => Prompt::Interactive,
        false => Prompt::Never,
    };
    let config = ConnectionConfig::resolve(
        ConnectionArgs {
            url: cli.url,
            key: cli.key,
            secret: cli.secret,
            insecure: cli.insecure,
        },
        prompt,
    )?;

    match cli.command {
        Commands::Export {
            asset,
            tags,
            name_prefix,
            ax_queries,
            path,
            prefix,
            per_file,
        } => {
            let category = asset.category();
            let filter = export_filter(tags, name_prefix, ax_queries);

            let options = ExportOptions {
                category,
                filter,
                output_dir: path,
                prefix: prefix.unwrap_or_else(|| default_prefix(category)),
                layout: match per_file {
                    true => ExportLayout::PerQuery,
                    false => ExportLayout::SingleFile,
                },
            };

            let client = connect(&config).await?;
            export_saved_queries(client, &options).await?;
        }
        Commands::Import { asset, path } => {
            // Bad paths fail before any request is made
            JsonSourceReader::new(&path).files()?;
            let client = connect(&config).await?;
            import_saved_queries(client, asset.category(), path).await?;
        }
    }

    Ok(())
}

fn export_filter(tags: Vec<String>, name_prefix: Option<String>, ax_queries: bool) -> QueryFilter {
    let filter = match ax_queries {
        true => QueryFilter::vendor_queries(),
        false => QueryFilter::new(),
    }
    .with_tags(tags);

    match name_prefix {
        Some(prefix) => filter.with_name_prefix(prefix),
        None => filter,
    }
}
