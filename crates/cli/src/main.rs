use clap::Parser;
use hexcamp_domain::CliOverrides;
use hexcamp_infrastructure::dns::DnsServerHandler;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

mod bootstrap;
mod di;
mod server;

#[derive(Parser)]
#[command(name = "hexcamp")]
#[command(version)]
#[command(about = "hexcamp - DNS responder that rewrites geocell identifiers into canonical names")]
struct Cli {
    /// Configuration file path
    #[arg(short = 'c', long, value_name = "FILE")]
    config: Option<String>,

    /// Domain suffix served by the hexcamp handler (e.g. test.hex.camp)
    #[arg(long)]
    domain: Option<String>,

    /// DNS server port
    #[arg(short = 'p', long)]
    dns_port: Option<u16>,

    /// Bind address
    #[arg(short = 'b', long)]
    bind: Option<String>,

    /// Upstream server (ip:port), repeatable
    #[arg(short = 'u', long, value_delimiter = ',')]
    upstream: Vec<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let cli_overrides = CliOverrides {
        domain: cli.domain.clone(),
        dns_port: cli.dns_port,
        bind_address: cli.bind.clone(),
        upstream_servers: cli.upstream.clone(),
        log_level: cli.log_level.clone(),
    };

    let config = bootstrap::load_config(cli.config.as_deref(), cli_overrides)?;

    bootstrap::init_logging(&config.logging)?;

    info!("Starting hexcamp v{}", env!("CARGO_PKG_VERSION"));
    info!(
        domain = %config.hexcamp.domain,
        lookup = ?config.upstream.lookup,
        upstreams = ?config.upstream.servers,
        "Configuration loaded"
    );

    let dns_services = di::DnsServices::new(&config)?;

    let bind_ip: IpAddr = config.server.bind_address.parse().map_err(|e| {
        anyhow::anyhow!("Invalid bind address '{}': {}", config.server.bind_address, e)
    })?;
    let dns_addr = SocketAddr::new(bind_ip, config.server.dns_port);
    let settings = server::ServerSettings {
        request_timeout: Duration::from_millis(config.server.request_timeout_ms),
        tcp_idle_timeout: Duration::from_secs(config.server.tcp_idle_timeout_secs),
    };

    let shutdown = CancellationToken::new();
    let dns_handler = DnsServerHandler::new(dns_services.chain.clone());
    let mut server_task = tokio::spawn(server::start_dns_server(
        dns_addr,
        dns_handler,
        settings,
        shutdown.clone(),
    ));

    tokio::select! {
        signal = tokio::signal::ctrl_c() => {
            signal?;
            info!("Shutdown signal received");
        }
        result = &mut server_task => {
            match result {
                Ok(Ok(())) => info!("DNS server stopped"),
                Ok(Err(e)) => error!(error = %e, "DNS server error"),
                Err(e) => error!(error = %e, "DNS server task failed"),
            }
        }
    }

    shutdown.cancel();
    if !server_task.is_finished() {
        let _ = server_task.await;
    }

    info!(stats = %dns_services.stats.snapshot(), "hexcamp handler stats");
    info!("Server shutdown complete");
    Ok(())
}
