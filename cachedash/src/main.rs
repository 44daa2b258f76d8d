//! cachedash - Prerender cache dashboard
//!
//! Renders the dashboard tables (domains, queue, sitemaps, render history,
//! cached pages, URL parameters) from a JSON snapshot.

mod table;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use cachedash_core::format::{parse_timestamp, RelativeTime};
use cachedash_core::validate::{parse_invite_emails, validate_domain, validate_parameter_name};
use cachedash_core::view::{
    domain_matches_search, DomainFilter, HistoryFilter, QueueFilter, RenderPass,
};
use cachedash_core::{Config, Dashboard};
use chrono::Utc;
use clap::{Parser, Subcommand, ValueEnum};
use comfy_table::Table;
use serde::Serialize;

#[derive(Parser, Debug)]
#[command(name = "cachedash")]
#[command(about = "Prerender cache dashboard tables")]
#[command(version)]
struct Args {
    /// Config file (default: $XDG_CONFIG_HOME/cachedash/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Reference time for relative columns (default: now)
    #[arg(long, global = true)]
    now: Option<String>,

    /// Fail on status values outside the known vocabulary
    #[arg(long, global = true)]
    strict: bool,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Domains with integration and 404 status
    Domains {
        snapshot: PathBuf,
        #[arg(long, value_enum, default_value_t = DomainFilterArg::All)]
        filter: DomainFilterArg,
        /// Only domains whose name contains this text
        #[arg(long)]
        search: Option<String>,
    },
    /// URLs waiting for cache generation
    Queue {
        snapshot: PathBuf,
        #[arg(long, value_enum, default_value_t = QueueFilterArg::All)]
        filter: QueueFilterArg,
    },
    /// Sitemaps and their health
    Sitemaps { snapshot: PathBuf },
    /// Render history
    History {
        snapshot: PathBuf,
        /// Only successful or failed renders
        #[arg(long, value_enum)]
        status: Option<OutcomeArg>,
        /// Only renders for this device
        #[arg(long)]
        device: Option<String>,
    },
    /// Cached pages
    Pages { snapshot: PathBuf },
    /// URL parameter caching rules
    Parameters {
        snapshot: PathBuf,
        /// Include built-in tracking parameters
        #[arg(long)]
        show_system: bool,
    },
    /// Format a single timestamp relative to the reference time
    Ago { timestamp: String },
    /// Check a domain name for the "Add Domain" form
    ValidateDomain { name: String },
    /// Check a URL parameter name
    ValidateParameter { name: String },
    /// Check a team invite list, one email per line ("-" reads stdin)
    Invite { emails: PathBuf },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum DomainFilterArg {
    All,
    Active,
    Issues,
    #[value(name = "404-error")]
    NotFoundErrors,
}

impl From<DomainFilterArg> for DomainFilter {
    fn from(arg: DomainFilterArg) -> Self {
        match arg {
            DomainFilterArg::All => DomainFilter::All,
            DomainFilterArg::Active => DomainFilter::Active,
            DomainFilterArg::Issues => DomainFilter::Issues,
            DomainFilterArg::NotFoundErrors => DomainFilter::NotFoundErrors,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum QueueFilterArg {
    All,
    Automatic,
    Priority,
}

impl From<QueueFilterArg> for QueueFilter {
    fn from(arg: QueueFilterArg) -> Self {
        match arg {
            QueueFilterArg::All => QueueFilter::All,
            QueueFilterArg::Automatic => QueueFilter::Automatic,
            QueueFilterArg::Priority => QueueFilter::Priority,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum OutcomeArg {
    Success,
    Failed,
}

#[derive(Serialize)]
struct AgoOutput {
    text: String,
    #[serde(flatten)]
    relative: RelativeTime,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => Config::load_from(path)
            .with_context(|| format!("failed to load configuration from {}", path.display()))?,
        None => Config::load().context("failed to load configuration")?,
    };
    let _log_guard = cachedash_core::logging::init(&config.logging).ok();

    if args.strict {
        config.display.strict_status = true;
    }

    let reference = match &args.now {
        Some(raw) => parse_timestamp(raw).context("invalid --now value")?,
        None => Utc::now(),
    };
    tracing::info!(command = ?args.command, %reference, "cachedash starting");

    let pass = RenderPass::from_config(&config.display, reference);
    run(&args, &pass)
}

fn run(args: &Args, pass: &RenderPass) -> Result<()> {
    let format = args.format;

    match &args.command {
        Command::Domains {
            snapshot,
            filter,
            search,
        } => {
            let dashboard = load_snapshot(snapshot)?;
            let filter = DomainFilter::from(*filter);
            let search = search.as_deref().unwrap_or_default();
            let domains: Vec<_> = dashboard
                .domains
                .into_iter()
                .filter(|d| filter.matches(d) && domain_matches_search(d, search))
                .collect();
            let rows = pass
                .rows(&domains, RenderPass::domain_row)
                .context("failed to render domains")?;
            emit(format, &rows, || table::domains(&rows))
        }
        Command::Queue { snapshot, filter } => {
            let dashboard = load_snapshot(snapshot)?;
            let filter = QueueFilter::from(*filter);
            let items: Vec<_> = dashboard
                .queue
                .into_iter()
                .filter(|q| filter.matches(q))
                .collect();
            let rows = pass
                .rows(&items, RenderPass::queue_row)
                .context("failed to render queue")?;
            emit(format, &rows, || table::queue(&rows))
        }
        Command::Sitemaps { snapshot } => {
            let dashboard = load_snapshot(snapshot)?;
            let rows = pass
                .rows(&dashboard.sitemaps, RenderPass::sitemap_row)
                .context("failed to render sitemaps")?;
            emit(format, &rows, || table::sitemaps(&rows))
        }
        Command::History {
            snapshot,
            status,
            device,
        } => {
            let dashboard = load_snapshot(snapshot)?;
            let filter = HistoryFilter {
                success: status.map(|s| matches!(s, OutcomeArg::Success)),
                device: device.clone(),
            };
            let records: Vec<_> = dashboard
                .history
                .into_iter()
                .filter(|r| filter.matches(r))
                .collect();
            let rows = pass
                .rows(&records, RenderPass::history_row)
                .context("failed to render history")?;
            emit(format, &rows, || table::history(&rows))
        }
        Command::Pages { snapshot } => {
            let dashboard = load_snapshot(snapshot)?;
            let rows = pass
                .rows(&dashboard.pages, RenderPass::page_row)
                .context("failed to render pages")?;
            emit(format, &rows, || table::pages(&rows))
        }
        Command::Parameters {
            snapshot,
            show_system,
        } => {
            let dashboard = load_snapshot(snapshot)?;
            let parameters: Vec<_> = dashboard
                .parameters
                .into_iter()
                .filter(|p| *show_system || !p.is_system)
                .collect();
            let rows = pass
                .rows(&parameters, RenderPass::parameter_row)
                .context("failed to render parameters")?;
            emit(format, &rows, || table::parameters(&rows))
        }
        Command::Ago { timestamp } => {
            let target = parse_timestamp(timestamp).context("invalid timestamp")?;
            let relative = pass.formatter().classify(target, pass.reference());
            match format {
                OutputFormat::Json => {
                    let output = AgoOutput {
                        text: relative.to_string(),
                        relative,
                    };
                    println!("{}", serde_json::to_string_pretty(&output)?);
                }
                OutputFormat::Text => println!("{}", relative),
            }
            Ok(())
        }
        Command::ValidateDomain { name } => {
            let domain = validate_domain(name)?;
            println!("valid domain: {}", domain);
            Ok(())
        }
        Command::ValidateParameter { name } => {
            let parameter = validate_parameter_name(name)?;
            println!("valid parameter: {}", parameter);
            Ok(())
        }
        Command::Invite { emails } => {
            let input = if emails.as_os_str() == "-" {
                std::io::read_to_string(std::io::stdin()).context("failed to read stdin")?
            } else {
                std::fs::read_to_string(emails)
                    .with_context(|| format!("failed to read {}", emails.display()))?
            };
            let addresses = parse_invite_emails(&input)?;
            tracing::info!(count = addresses.len(), "invite list accepted");
            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&addresses)?),
                OutputFormat::Text => {
                    for address in &addresses {
                        println!("{}", address);
                    }
                }
            }
            Ok(())
        }
    }
}

fn load_snapshot(path: &Path) -> Result<Dashboard> {
    Dashboard::load_from(path)
        .with_context(|| format!("failed to load snapshot {}", path.display()))
}

/// Print rows as JSON or as a text table.
fn emit<R: Serialize>(
    format: OutputFormat,
    rows: &[R],
    build: impl FnOnce() -> Table,
) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(rows)?),
        OutputFormat::Text if rows.is_empty() => println!("No rows."),
        OutputFormat::Text => println!("{}", build()),
    }
    Ok(())
}
