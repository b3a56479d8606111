//! Sinkhole - a filtering DNS proxy.
//!
//! Binds a UDP listener, loads one or more blocklist files, and serves:
//! blocklisted names get a null-route answer, everything else is forwarded
//! to the upstream resolver.

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use sinkhole::error::DnsError;
use sinkhole::proxy;
use sinkhole::transport::DNS_PORT;

#[derive(Parser)]
#[command(name = "sinkhole")]
#[command(about = "Filtering DNS proxy", long_about = None)]
struct Args {
    /// Bind address
    #[arg(short, long, default_value = "127.0.0.1")]
    bind: String,

    /// Local UDP port to listen on
    #[arg(short, long, default_value = "53")]
    port: u16,

    /// Upstream DNS resolver (IPv4, queried on port 53)
    #[arg(short, long, default_value = "8.8.8.8")]
    upstream: String,

    /// Upstream receive timeout in milliseconds
    #[arg(short, long, default_value = "5000")]
    timeout: u64,

    /// Blocklist file, one domain per line (repeatable)
    #[arg(short = 'l', long = "blocklist")]
    blocklist: Vec<PathBuf>,

    /// Log every query decision
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<(), DnsError> {
    let args = Args::parse();

    let default_level = if args.verbose { "sinkhole=debug" } else { "sinkhole=info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    let bind_ip: IpAddr = args.bind.parse().map_err(|_| DnsError::InvalidIp)?;
    let upstream_ip: IpAddr = args.upstream.parse().map_err(|_| DnsError::InvalidIp)?;

    let config = proxy::ProxyConfig {
        bind_addr: SocketAddr::new(bind_ip, args.port),
        upstream_addr: SocketAddr::new(upstream_ip, DNS_PORT),
        timeout: Duration::from_millis(args.timeout),
        blocklist_paths: args.blocklist,
    };

    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|_| DnsError::SocketFail)?
        .block_on(proxy::run(config))
}
