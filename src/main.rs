//! Storefront E2E CLI

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use storefront_e2e::logging::default_logger;
use storefront_e2e::pages::{BasePage, InventoryPage, LoginPage};
use storefront_e2e::test_data::{User, DEFAULT_PASSWORD};
use storefront_e2e::{
    init_logging, ChromiumSession, FailureArtifacts, HarnessConfig, SessionConfig,
};

#[derive(Parser)]
#[command(name = "storefront-e2e")]
#[command(about = "Drive the demo storefront with retrying actions and failure diagnostics", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// YAML config file (E2E_* variables still apply on top)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Show the browser window
    #[arg(long)]
    headed: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Print a diagnostics snapshot for a URL
    Diagnose {
        /// URL to visit
        url: String,
    },

    /// Log in and report where the storefront lands
    Login {
        /// Account alias or username
        #[arg(short, long, default_value = "standard")]
        user: String,
    },

    /// Wait for an element to become visible
    Wait {
        /// URL to visit
        url: String,
        /// CSS selector
        selector: String,
        /// Timeout (milliseconds)
        #[arg(long, default_value_t = 30_000)]
        timeout_ms: u64,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => HarnessConfig::from_yaml_file(path)?
            .with_overrides(|name| std::env::var(name).ok())?,
        None => HarnessConfig::from_env()?,
    };

    if cli.headed {
        config.headless = false;
    }

    let session = Arc::new(ChromiumSession::launch(&SessionConfig::from(&config)).await?);
    let logger = default_logger();
    let base = BasePage::new(session.clone(), config.clone(), logger);

    let outcome = run(&cli.command, &base).await;

    if let Err(e) = &outcome {
        eprintln!("✗ {}", e);

        let artifacts = FailureArtifacts::new(&config.artifacts_dir);
        match artifacts
            .capture("cli failure", base.session().as_ref(), base.diagnostics())
            .await
        {
            Ok(paths) => eprintln!("  Diagnostics: {}", paths.report.display()),
            Err(write_err) => eprintln!("  Could not write diagnostics: {}", write_err),
        }
    }

    // Print stats
    let stats = base.executor().get_stats().await;
    println!("\n=== Statistics ===");
    println!("Total actions: {}", stats.total_actions);
    println!("Successful: {}", stats.successful_actions);
    println!("Failed: {}", stats.failed_actions);
    println!("Total execution time: {}ms", stats.total_execution_time_ms);

    session.close().await;

    outcome
}

async fn run(command: &Commands, base: &BasePage) -> anyhow::Result<()> {
    match command {
        Commands::Diagnose { url } => {
            println!("Navigating to: {}", url);
            base.navigate(url).await?;

            let snapshot = base.diagnostics().capture().await;
            println!("{}", serde_json::to_string_pretty(&snapshot)?);
        }

        Commands::Login { user } => {
            let user =
                User::named(user).unwrap_or_else(|| User::new(user.as_str(), DEFAULT_PASSWORD));
            let login = LoginPage::new(base.clone());

            login.open().await?;
            println!("Logging in as: {}", user.username);
            login.login(&user).await?;

            if let Some(message) = login.error_message().await? {
                anyhow::bail!("Login rejected: {}", message);
            }

            InventoryPage::new(base.clone()).wait_until_loaded().await?;
            println!("✓ Landed on {}", base.current_url().await?);
        }

        Commands::Wait {
            url,
            selector,
            timeout_ms,
        } => {
            println!("Navigating to: {}", url);
            base.navigate(url).await?;

            println!("Waiting for: {}", selector);
            base.wait_for_visible(selector, Some(Duration::from_millis(*timeout_ms)))
                .await?;
            println!("✓ {} is visible", selector);
        }
    }

    Ok(())
}
