//! Workshop Harvest CLI — entry point.

use std::process::ExitCode;
use std::time::Duration;

use anyhow::Context;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use tracing::info;

use workshop_harvest::config::DEFAULT_USER_AGENT;
use workshop_harvest::{CancellationFlag, HarvestConfig, Harvester, ReferenceList};

mod output;
mod prompt;

use prompt::PromptOutcome;

/// Shortest pause allowed between two requests to the workshop host.
const MIN_DELAY_MS: u64 = 1000;

#[derive(Parser)]
#[command(
    name = "workshop-harvest",
    about = "Collect mod, workshop and vehicle IDs from Steam Workshop pages",
    version,
    args_conflicts_with_subcommands = true,
    after_help = "Run without URLs to enter them interactively."
)]
struct Cli {
    /// Item or modpack URLs to process, in order.
    urls: Vec<String>,

    /// Request timeout in seconds.
    #[arg(long, default_value = "10", value_parser = clap::value_parser!(u64).range(1..))]
    timeout: u64,

    /// Delay between requests in milliseconds (at least 1000).
    #[arg(long, default_value = "1000", value_parser = clap::value_parser!(u64).range(MIN_DELAY_MS..))]
    delay_ms: u64,

    /// User-Agent header sent with every request.
    #[arg(long, default_value = DEFAULT_USER_AGENT)]
    user_agent: String,

    /// Print the report as JSON instead of config lines.
    #[arg(long)]
    json: bool,

    /// Enable debug logging.
    #[arg(long, short, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log warnings and errors.
    #[arg(long, short)]
    quiet: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate shell completion scripts.
    ///
    /// Example:
    ///   workshop-harvest completions bash > ~/.local/share/bash-completion/completions/workshop-harvest
    Completions {
        /// Shell type (bash, zsh, fish, powershell, elvish).
        shell: Shell,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    if let Some(Commands::Completions { shell }) = cli.command {
        let mut cmd = Cli::command();
        clap_complete::generate(shell, &mut cmd, "workshop-harvest", &mut std::io::stdout());
        return Ok(ExitCode::SUCCESS);
    }

    let level = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "warn"
    } else {
        "info"
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let config = HarvestConfig::default()
        .with_user_agent(cli.user_agent)
        .with_timeout(Duration::from_secs(cli.timeout))
        .with_request_delay(Duration::from_millis(cli.delay_ms));

    let references = if cli.urls.is_empty() {
        match prompt::collect(&config.host_prefix)? {
            PromptOutcome::Finished(references) => references,
            PromptOutcome::Interrupted(references) => {
                eprintln!("  Cancelled by operator.");
                return Ok(ExitCode::from(exit_status(&references)));
            }
        }
    } else {
        references_from_args(&cli.urls, &config.host_prefix)
    };

    if references.is_empty() {
        eprintln!("  No URLs provided.");
        return Ok(ExitCode::from(exit_status(&references)));
    }

    let harvester = Harvester::new(config).context("failed to set up HTTP client")?;

    let cancel = CancellationFlag::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("received interrupt, stopping harvest");
            on_interrupt.cancel();
        }
    });

    info!(urls = references.len(), "starting harvest");
    let report = harvester.run(references.as_slice(), &cancel).await;

    if report.interrupted {
        eprintln!("  Interrupted by operator; printing results collected so far.");
    }
    eprintln!("  {}", output::summary(&report));
    println!("{}", output::render(&report, cli.json)?);

    Ok(ExitCode::from(exit_status(&references)))
}

/// Validate positional URLs with the same rules as the prompt, skipping
/// (and reporting) the ones that fail.
fn references_from_args(urls: &[String], host_prefix: &str) -> ReferenceList {
    let mut references = ReferenceList::new(host_prefix);
    for url in urls {
        if let Err(e) = references.push(url) {
            eprintln!("  Skipping argument: {e}");
        }
    }
    references
}

/// 1 when nothing was supplied, 0 otherwise. Per-URL failures never count.
fn exit_status(references: &ReferenceList) -> u8 {
    u8::from(references.is_empty())
}
