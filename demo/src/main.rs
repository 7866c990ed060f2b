//! Site Manager demo CLI
//!
//! Provisions the restricted role on a seeded in-memory host, or runs the
//! reference scenarios against it.
//!
//! Usage:
//!   cargo run -p demo -- provision
//!   cargo run -p demo -- provision --config demo/config/site-manager.toml --tenants 3
//!   cargo run -p demo -- run-all
//!   cargo run -p demo -- role-change

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use sitemgr_contracts::error::{SiteManagerError, SiteResult};
use sitemgr_core::{traits::RoleRegistry, Filters};
use sitemgr_policy::SiteManagerConfig;
use sitemgr_ref_host::{
    scenarios::{privacy_policy, provisioning, registration, role_change, screens, user_delete},
    seed, Site,
};

// ── CLI definition ────────────────────────────────────────────────────────────

/// Site Manager: an administrator-lite role and the guard that keeps it there.
#[derive(Parser)]
#[command(
    name = "demo",
    about = "Site Manager role gate demo",
    long_about = "Builds the Site Manager role on a seeded in-memory host and runs\n\
                  scenarios showing role provisioning, vetoes and corrections."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Build the role and print its definition and the provisioning report.
    Provision {
        /// TOML configuration file. Defaults apply when omitted.
        #[arg(long)]
        config: Option<PathBuf>,
        /// Number of tenants. More than one provisions a network.
        #[arg(long, default_value_t = 1)]
        tenants: u64,
    },
    /// Run every scenario in sequence.
    RunAll,
    /// Single site and network provisioning.
    Provisioning,
    /// Direct role change on an administrator.
    RoleChange,
    /// Deleting editors and administrators.
    UserDelete,
    /// User-edit and appearance screens.
    Screens,
    /// Registration and profile updates granting administrator.
    Registration,
    /// Privacy-policy page capability check.
    PrivacyPolicy,
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    // RUST_LOG=info shows provisioning and guard decisions.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Command::Provision { config, tenants } => provision(config, tenants),
        Command::RunAll => {
            print_banner();
            run_all()
        }
        Command::Provisioning => provisioning::run_scenario(),
        Command::RoleChange => role_change::run_scenario(),
        Command::UserDelete => user_delete::run_scenario(),
        Command::Screens => screens::run_scenario(),
        Command::Registration => registration::run_scenario(),
        Command::PrivacyPolicy => privacy_policy::run_scenario(),
    };

    if let Err(e) = result {
        eprintln!("Demo error: {}", e);
        std::process::exit(1);
    }
}

// ── Commands ──────────────────────────────────────────────────────────────────

fn provision(config: Option<PathBuf>, tenants: u64) -> SiteResult<()> {
    let config = match config {
        Some(path) => SiteManagerConfig::from_file(&path)?,
        None => SiteManagerConfig::default(),
    };

    let host = if tenants > 1 {
        seed::network(tenants, &[])
    } else {
        seed::single_site()
    };
    let site = Site::new(host, &config, Filters::new());

    let report = site.activate()?;
    info!(role = %report.role, rebuilt = report.rebuilt.len(), "provisioning finished");

    let role = site.host.get_role(&report.role);
    let output = serde_json::json!({
        "role": role,
        "report": report,
    });
    let rendered = serde_json::to_string_pretty(&output).map_err(|e| SiteManagerError::HostError {
        reason: format!("failed to render report: {}", e),
    })?;
    println!("{}", rendered);
    Ok(())
}

fn run_all() -> SiteResult<()> {
    provisioning::run_scenario()?;
    role_change::run_scenario()?;
    user_delete::run_scenario()?;
    screens::run_scenario()?;
    registration::run_scenario()?;
    privacy_policy::run_scenario()?;
    println!("All scenarios completed.");
    Ok(())
}

// ── Banner ────────────────────────────────────────────────────────────────────

fn print_banner() {
    println!();
    println!("Site Manager role gate");
    println!("======================");
    println!();
    println!("  [1] Role builder: base role capabilities + enabled bundles");
    println!("  [2] Guard: vetoes on administrator targets, silent demotion");
    println!("  [3] Privacy policy page: capabilities granted per check");
    println!();
}
