//! UDP listener and upstream client endpoints.

use std::io;
use std::net::SocketAddr;
use std::time::Duration;

use tokio::net::UdpSocket;
use tokio::time;

use crate::error::DnsError;

/// Client-facing listener socket.
pub struct Listener {
    socket: UdpSocket,
}

impl Listener {
    /// Bind to the configured local address.
    pub async fn bind(addr: SocketAddr) -> Result<Self, DnsError> {
        let socket = UdpSocket::bind(addr).await.map_err(|_| DnsError::BindFail)?;
        Ok(Self { socket })
    }

    pub fn local_addr(&self) -> Result<SocketAddr, DnsError> {
        self.socket.local_addr().map_err(|_| DnsError::SocketFail)
    }

    /// Wait for one datagram, capturing the sender address.
    pub async fn recv_from(&self, buf: &mut [u8]) -> Result<(usize, SocketAddr), DnsError> {
        self.socket.recv_from(buf).await.map_err(|_| DnsError::RecvFail)
    }

    /// Send a complete datagram to `dest`.
    ///
    /// UDP sends are atomic so a short send should be impossible, but it is
    /// checked and reported rather than silently accepted.
    pub async fn send_to(&self, data: &[u8], dest: SocketAddr) -> Result<(), DnsError> {
        let sent = self.socket.send_to(data, dest).await.map_err(|_| DnsError::SendFail)?;
        if sent != data.len() {
            return Err(DnsError::SendFail);
        }
        Ok(())
    }

    /// Send an upstream reply back to a client.
    ///
    /// A connection-reset indication here was queued by an ICMP error from an
    /// earlier datagram whose client already closed its port; it says nothing
    /// about this send, so it counts as delivered.
    pub async fn relay_to(&self, data: &[u8], dest: SocketAddr) -> Result<(), DnsError> {
        match self.socket.send_to(data, dest).await {
            Ok(sent) if sent == data.len() => Ok(()),
            Ok(_) => Err(DnsError::SendFail),
            Err(e) if e.kind() == io::ErrorKind::ConnectionReset => Ok(()),
            Err(_) => Err(DnsError::SendFail),
        }
    }
}

/// Upstream resolver client, pre-addressed to a single server.
pub struct Upstream {
    socket: UdpSocket,
    addr: SocketAddr,
    timeout: Duration,
}

impl Upstream {
    /// Open a socket on an ephemeral local port aimed at `addr`, with
    /// `timeout` bounding every receive so a dead resolver never stalls the
    /// serving loop.
    pub async fn connect(addr: SocketAddr, timeout: Duration) -> Result<Self, DnsError> {
        let socket = UdpSocket::bind("0.0.0.0:0").await.map_err(|_| DnsError::SocketFail)?;
        Ok(Self { socket, addr, timeout })
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Relay one query to the upstream resolver.
    pub async fn send(&self, data: &[u8]) -> Result<(), DnsError> {
        let sent = self
            .socket
            .send_to(data, self.addr)
            .await
            .map_err(|_| DnsError::UpstreamUnreachable)?;
        if sent != data.len() {
            return Err(DnsError::UpstreamUnreachable);
        }
        Ok(())
    }

    /// Wait for the upstream reply, bounded by the configured timeout.
    pub async fn recv(&self, buf: &mut [u8]) -> Result<usize, DnsError> {
        match time::timeout(self.timeout, self.socket.recv_from(buf)).await {
            Ok(Ok((len, _from))) => Ok(len),
            Ok(Err(_)) => Err(DnsError::UpstreamUnreachable),
            Err(_) => Err(DnsError::UpstreamTimeout),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[tokio::test]
    async fn listener_binds_to_available_port() {
        let addr: SocketAddr = "127.0.0.1:0".parse().unwrap();

        let listener = Listener::bind(addr).await;

        assert!(listener.is_ok());
    }

    #[tokio::test]
    async fn listener_bind_conflict_fails() {
        let addr: SocketAddr = "127.0.0.1:0".parse().unwrap();
        let first = Listener::bind(addr).await.unwrap();
        let taken = first.local_addr().unwrap();

        let second = Listener::bind(taken).await;

        assert!(matches!(second, Err(DnsError::BindFail)));
    }

    #[tokio::test]
    async fn forward_and_reply_are_byte_identical() {
        let fake_upstream = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let upstream_addr = fake_upstream.local_addr().unwrap();
        let upstream = Upstream::connect(upstream_addr, Duration::from_secs(1)).await.unwrap();

        let query = [0x12, 0x34, 0x01, 0x00, 0x00, 0x01, 0, 0, 0, 0, 0, 0, 0];
        upstream.send(&query).await.unwrap();

        let mut received = [0u8; 64];
        let (len, from) = fake_upstream.recv_from(&mut received).await.unwrap();
        assert_eq!(&received[..len], &query);

        let reply = [0xAB; 24];
        fake_upstream.send_to(&reply, from).await.unwrap();

        let mut buf = [0u8; 64];
        let len = upstream.recv(&mut buf).await.unwrap();
        assert_eq!(&buf[..len], &reply);
    }

    #[tokio::test]
    async fn silent_upstream_times_out() {
        let silent = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let upstream = Upstream::connect(silent.local_addr().unwrap(), Duration::from_millis(100))
            .await
            .unwrap();
        upstream.send(&[0u8; 16]).await.unwrap();

        let start = Instant::now();
        let mut buf = [0u8; 64];
        let result = upstream.recv(&mut buf).await;

        assert!(matches!(result, Err(DnsError::UpstreamTimeout)));
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_millis(100));
        assert!(elapsed < Duration::from_secs(1));
    }

    #[tokio::test]
    async fn listener_send_reaches_destination() {
        let listener = Listener::bind("127.0.0.1:0".parse().unwrap()).await.unwrap();
        let client = UdpSocket::bind("127.0.0.1:0").await.unwrap();

        let payload = [7u8; 32];
        listener.send_to(&payload, client.local_addr().unwrap()).await.unwrap();

        let mut buf = [0u8; 64];
        let (len, _) = client.recv_from(&mut buf).await.unwrap();
        assert_eq!(&buf[..len], &payload);
    }
}
