//! Proxy orchestration and the serving loop.
//!
//! Loads the blocklist, binds both endpoints, then serves one datagram at a
//! time: parse, match, and either answer with a null route or forward and
//! relay. Per-datagram failures are logged and the loop keeps accepting.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::error::DnsError;
use crate::filter::Blocklist;
use crate::resolver::{QueryAction, Resolver};
use crate::stats::Stats;
use crate::transport::udp::{Listener, Upstream};
use crate::wire::MAX_EDNS_PAYLOAD;

/// Smallest datagram worth parsing: the fixed header plus one byte of
/// question data.
const MIN_QUERY_LEN: usize = 13;

/// How often the serving loop logs a stats summary.
const STATS_INTERVAL: u64 = 1024;

/// Runtime configuration for the proxy.
pub struct ProxyConfig {
    /// Local address to bind (e.g. 127.0.0.1:53).
    pub bind_addr: SocketAddr,
    /// Upstream resolver address (port 53).
    pub upstream_addr: SocketAddr,
    /// Upstream receive timeout.
    pub timeout: Duration,
    /// Blocklist files, loaded in order before serving.
    pub blocklist_paths: Vec<PathBuf>,
}

/// Run the proxy with the given configuration. Serves indefinitely.
pub async fn run(config: ProxyConfig) -> Result<(), DnsError> {
    let mut blocklist = Blocklist::new();
    if let Err(e) = blocklist.load_files(&config.blocklist_paths) {
        warn!(code = e.code(), error = %e, "blocklist loading stopped early");
    }
    if blocklist.is_empty() {
        warn!(
            code = DnsError::BlocklistEmpty.code(),
            "blocklist is empty, no queries will be blocked"
        );
    }

    let listener = Listener::bind(config.bind_addr).await?;
    let upstream = Upstream::connect(config.upstream_addr, config.timeout).await?;
    let resolver = Resolver::new(blocklist);

    info!(
        addr = %config.bind_addr,
        blocked_domains = resolver.blocked_count(),
        "listener bound"
    );
    info!(addr = %upstream.addr(), timeout_ms = config.timeout.as_millis() as u64, "upstream resolver");

    let mut stats = Stats::new();
    let mut buf = [0u8; MAX_EDNS_PAYLOAD];

    loop {
        if let Err(e) = handle_datagram(&listener, &upstream, &resolver, &mut buf, &mut stats).await
        {
            stats.record_failed();
            warn!(code = e.code(), error = %e, "query handling failed");
        }
        if stats.requests() % STATS_INTERVAL == 0 {
            debug!(
                requests = stats.requests(),
                blocked = stats.blocked(),
                forwarded = stats.forwarded(),
                failed = stats.failed(),
                "serving stats"
            );
        }
    }
}

/// Process one datagram to completion.
///
/// The handler never retries; any error bubbles to the loop, which logs it
/// and moves on to the next receive.
async fn handle_datagram(
    listener: &Listener,
    upstream: &Upstream,
    resolver: &Resolver,
    buf: &mut [u8; MAX_EDNS_PAYLOAD],
    stats: &mut Stats,
) -> Result<(), DnsError> {
    let (len, client) = listener.recv_from(buf).await?;
    if len < MIN_QUERY_LEN {
        return Err(DnsError::TooShort);
    }
    let data = &buf[..len];

    match resolver.process_query(data)? {
        QueryAction::Blocked { response, domain } => {
            listener.send_to(&response, client).await?;
            stats.record_blocked();
            debug!(client = %client, domain = %domain, "blocked");
        }
        QueryAction::Forward { domain } => {
            upstream.send(data).await?;

            let mut reply = [0u8; MAX_EDNS_PAYLOAD];
            let reply_len = upstream.recv(&mut reply).await?;

            listener.relay_to(&reply[..reply_len], client).await?;
            stats.record_forwarded();
            debug!(client = %client, domain = %domain, "forwarded");
        }
    }
    Ok(())
}
