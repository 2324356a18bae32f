//! NAS Service Provisioner CLI
//!
//! Resolves a provisioning request from flags, a batch string, or guided
//! prompting, then provisions the service endpoint against the cluster's
//! management API and prints a per-step report.

use clap::Parser;
use std::process::ExitCode;
use std::time::Duration;
use tracing::{error, info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use nas_provisioner::config::resolver::{resolve, resolve_mode, Field, RequestDraft};
use nas_provisioner::console::{render_report, ConsolePrompter};
use nas_provisioner::domain::ports::{Credentials, DomainCredentials, Prompter};
use nas_provisioner::pipeline::Verdict;
use nas_provisioner::{
    run_provisioning, DryRunClient, Error, RestConfig, RestControlPlane, Result,
};

// =============================================================================
// CLI Arguments
// =============================================================================

/// NAS Service Provisioner - idempotent multi-resource provisioning
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Batch configuration: 13 comma-separated fields (cluster, tenant, pool,
    /// volume, volume-size, interface-name, interface-address,
    /// interface-netmask, home-node, home-port, protocol-server,
    /// directory-domain, dns-servers); DNS servers semicolon-separated.
    /// Forces non-interactive resolution.
    #[arg(long, short = 'b', env = "NASPROV_BATCH")]
    batch: Option<String>,

    /// Full guided mode: prompts for everything, selects pool and home node
    /// from live candidates, and offers the optional features
    #[arg(long, short = 'i')]
    interactive: bool,

    /// Report every mutating action without performing it
    #[arg(long)]
    dry_run: bool,

    /// Cluster management endpoint
    #[arg(long, env = "NASPROV_CLUSTER")]
    cluster: Option<String>,

    /// Tenant name
    #[arg(long)]
    tenant: Option<String>,

    /// Storage pool
    #[arg(long)]
    pool: Option<String>,

    /// Data volume name
    #[arg(long)]
    volume: Option<String>,

    /// Data volume size, e.g. 100g
    #[arg(long)]
    volume_size: Option<String>,

    /// Network interface name
    #[arg(long)]
    interface_name: Option<String>,

    /// Network interface address
    #[arg(long)]
    interface_address: Option<String>,

    /// Network interface netmask
    #[arg(long)]
    interface_netmask: Option<String>,

    /// Node homing the network interface
    #[arg(long)]
    home_node: Option<String>,

    /// Port on the home node, e.g. e0c
    #[arg(long)]
    home_port: Option<String>,

    /// Protocol server (SMB) name
    #[arg(long)]
    protocol_server: Option<String>,

    /// Directory domain the protocol server joins
    #[arg(long)]
    directory_domain: Option<String>,

    /// DNS servers, semicolon-separated
    #[arg(long)]
    dns_servers: Option<String>,

    /// DNS search domain (independent of the directory domain)
    #[arg(long)]
    dns_search_domain: Option<String>,

    /// Cluster admin username
    #[arg(long, env = "NASPROV_USERNAME")]
    username: Option<String>,

    /// Cluster admin password
    #[arg(long, env = "NASPROV_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// Directory domain join username
    #[arg(long, env = "NASPROV_DOMAIN_USERNAME")]
    domain_username: Option<String>,

    /// Directory domain join password
    #[arg(long, env = "NASPROV_DOMAIN_PASSWORD", hide_env_values = true)]
    domain_password: Option<String>,

    /// Accept invalid TLS certificates (lab clusters)
    #[arg(long)]
    insecure: bool,

    /// Per-request timeout in seconds
    #[arg(long, default_value = "60")]
    timeout_secs: u64,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Output logs as JSON
    #[arg(long, env = "LOG_JSON")]
    log_json: bool,
}

impl Args {
    /// Fields supplied via flags; guided modes skip prompting for these
    fn draft(&self) -> RequestDraft {
        let mut draft = RequestDraft::default();
        let flags = [
            (Field::Cluster, &self.cluster),
            (Field::Tenant, &self.tenant),
            (Field::Pool, &self.pool),
            (Field::Volume, &self.volume),
            (Field::VolumeSize, &self.volume_size),
            (Field::InterfaceName, &self.interface_name),
            (Field::InterfaceAddress, &self.interface_address),
            (Field::InterfaceNetmask, &self.interface_netmask),
            (Field::HomeNode, &self.home_node),
            (Field::HomePort, &self.home_port),
            (Field::ProtocolServer, &self.protocol_server),
            (Field::DirectoryDomain, &self.directory_domain),
            (Field::DnsServers, &self.dns_servers),
        ];
        for (field, value) in flags {
            if let Some(value) = value {
                draft.set(field, value);
            }
        }
        draft.dns_search_domain = self
            .dns_search_domain
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);
        draft
    }
}

// =============================================================================
// Main
// =============================================================================

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(&args);

    match run(args).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            error!("{}", e);
            eprintln!("Error: {}", e);
            ExitCode::from(e.exit_code())
        }
    }
}

async fn run(args: Args) -> Result<bool> {
    info!("NAS provisioner {}", nas_provisioner::VERSION);
    let mut prompter = ConsolePrompter;

    // Resolve the request before any remote call: a configuration error must
    // abort with zero control plane traffic.
    let mode = resolve_mode(args.batch.is_some(), args.interactive, &mut prompter)?;
    let resolution = resolve(args.draft(), args.batch.as_deref(), mode, &mut prompter)?;

    let credentials = cluster_credentials(&args, &mut prompter)?;
    let domain = domain_credentials(&args, &mut prompter)?;

    let rest = RestControlPlane::new(RestConfig {
        timeout: Duration::from_secs(args.timeout_secs),
        insecure: args.insecure,
    })?;

    let (request, outcome) = if args.dry_run {
        info!("dry-run mode: mutating calls will be reported, not performed");
        let client = DryRunClient::new(rest);
        run_provisioning(&client, resolution, &credentials, &domain, &mut prompter).await?
    } else {
        run_provisioning(&rest, resolution, &credentials, &domain, &mut prompter).await?
    };

    render_report(&request, &outcome, args.dry_run);
    Ok(!matches!(outcome.verdict(), Verdict::Failed(_)))
}

fn cluster_credentials(args: &Args, prompter: &mut ConsolePrompter) -> Result<Credentials> {
    let username = match &args.username {
        Some(u) => u.clone(),
        None => prompter.input("Cluster admin username")?,
    };
    if username.is_empty() {
        return Err(Error::Configuration("cluster username is required".into()));
    }
    let password = match &args.password {
        Some(p) => p.clone(),
        None => prompter.password("Cluster admin password")?,
    };
    Ok(Credentials { username, password })
}

fn domain_credentials(args: &Args, prompter: &mut ConsolePrompter) -> Result<DomainCredentials> {
    let username = match &args.domain_username {
        Some(u) => u.clone(),
        None => prompter.input("Directory domain join username")?,
    };
    if username.is_empty() {
        return Err(Error::Configuration(
            "directory domain username is required".into(),
        ));
    }
    let password = match &args.domain_password {
        Some(p) => p.clone(),
        None => prompter.password("Directory domain join password")?,
    };
    Ok(DomainCredentials { username, password })
}

// =============================================================================
// Logging Setup
// =============================================================================

fn init_logging(args: &Args) {
    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let filter = EnvFilter::from_default_env()
        .add_directive(level.into())
        .add_directive("hyper=warn".parse().unwrap())
        .add_directive("reqwest=warn".parse().unwrap())
        .add_directive("rustls=warn".parse().unwrap());

    if args.log_json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true))
            .init();
    }
}
