//! Error taxonomy for the codec, blocklist, and serving loop.
//!
//! Every variant carries a stable numeric code so log lines stay comparable
//! with the pre-existing deployment's logs.

use thiserror::Error;

/// All failure modes surfaced by the proxy.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum DnsError {
    /// Packet smaller than the 12-byte header.
    #[error("packet too short")]
    TooShort,
    /// Opcode outside the recognized set {0, 1, 2, 4, 5, 6}.
    #[error("unsupported opcode")]
    BadOpcode,
    /// Label length byte exceeds 63.
    #[error("label too long")]
    BadLabel,
    /// Decoded name exceeds 255 bytes.
    #[error("name too long")]
    NameTooLong,
    /// Compression pointer chain exceeded the hop limit.
    #[error("compression pointer loop")]
    PtrLoop,
    /// Compression pointer target outside the buffer.
    #[error("compression pointer out of bounds")]
    PtrOob,
    /// Packet ends mid-field.
    #[error("packet truncated mid-field")]
    Truncated,
    /// Unrecognised QTYPE value.
    #[error("unrecognised qtype")]
    BadQtype,
    /// Unrecognised QCLASS value.
    #[error("unrecognised qclass")]
    BadQclass,
    /// QDCOUNT is zero on a query, or greater than one.
    #[error("unsupported qdcount")]
    BadQdcount,

    /// Encoded name exceeds 255 bytes.
    #[error("encode: name too long")]
    EncodeNameTooLong,
    /// A single label is empty or exceeds 63 bytes on encode.
    #[error("encode: label too long")]
    LabelTooLong,
    /// Encoded packet exceeds the maximum datagram size.
    #[error("encode: packet overflow")]
    EncodeOverflow,

    /// Socket creation failed.
    #[error("socket creation failed")]
    SocketFail,
    /// Binding the listener socket failed.
    #[error("bind failed")]
    BindFail,
    /// Receiving on the listener socket failed.
    #[error("receive failed")]
    RecvFail,
    /// Sending a datagram failed, or fewer bytes left than were encoded.
    #[error("send failed")]
    SendFail,
    /// Serving operation invoked without a bound listener.
    #[error("server not running")]
    NotRunning,

    /// Upstream did not respond within the configured timeout.
    #[error("upstream timeout")]
    UpstreamTimeout,
    /// Upstream endpoint absent or the send to it failed.
    #[error("upstream unreachable")]
    UpstreamUnreachable,
    /// Upstream answered with SERVFAIL.
    #[error("upstream SERVFAIL")]
    UpstreamServfail,

    /// A blocklist file could not be opened.
    #[error("blocklist file not found")]
    BlocklistNotFound,
    /// A blocklist file contained an unreadable line.
    #[error("blocklist parse error")]
    BlocklistParse,
    /// Blocklist loaded but contains no entries.
    #[error("blocklist is empty")]
    BlocklistEmpty,
    /// An address string failed to parse as an IPv4 address.
    #[error("invalid IP address")]
    InvalidIp,
}

impl DnsError {
    /// Stable numeric code for log interop.
    pub fn code(&self) -> u16 {
        match self {
            DnsError::TooShort => 10,
            DnsError::BadOpcode => 11,
            DnsError::BadLabel => 12,
            DnsError::NameTooLong => 13,
            DnsError::PtrLoop => 14,
            DnsError::PtrOob => 15,
            DnsError::Truncated => 16,
            DnsError::BadQtype => 17,
            DnsError::BadQclass => 18,
            DnsError::BadQdcount => 19,
            DnsError::EncodeNameTooLong => 20,
            DnsError::LabelTooLong => 21,
            DnsError::EncodeOverflow => 22,
            DnsError::SocketFail => 30,
            DnsError::BindFail => 31,
            DnsError::RecvFail => 32,
            DnsError::SendFail => 33,
            DnsError::NotRunning => 34,
            DnsError::UpstreamTimeout => 40,
            DnsError::UpstreamUnreachable => 41,
            DnsError::UpstreamServfail => 43,
            DnsError::BlocklistNotFound => 60,
            DnsError::BlocklistParse => 61,
            DnsError::BlocklistEmpty => 62,
            DnsError::InvalidIp => 63,
        }
    }
}
