//! DNS query resolution decisions.
//!
//! The per-datagram pipeline: parse the query, check each question against
//! the blocklist, and either hand back a ready-to-send blocked response or
//! tell the transport to forward the original bytes upstream. The transport
//! owns the I/O; this module owns the decisions.

use crate::error::DnsError;
use crate::filter::Blocklist;
use crate::wire::record::qtype;
use crate::wire::{Header, Message, Question, ResourceRecord};

/// Action to take for a received datagram.
pub enum QueryAction {
    /// A question matched the blocklist; send this encoded response back.
    Blocked { response: Vec<u8>, domain: String },
    /// Nothing matched; relay the original datagram to the upstream resolver.
    Forward { domain: String },
}

/// Decides what happens to each query.
pub struct Resolver {
    blocklist: Blocklist,
}

impl Resolver {
    /// Create a resolver over a loaded blocklist.
    pub fn new(blocklist: Blocklist) -> Self {
        Self { blocklist }
    }

    /// Parse one received datagram and decide its fate.
    ///
    /// Questions are checked in order; the first blocklist hit wins. A parse
    /// failure propagates so the serving loop can log it; malformed packets
    /// are never forwarded.
    pub fn process_query(&self, data: &[u8]) -> Result<QueryAction, DnsError> {
        let query = Message::parse(data)?;

        for question in &query.questions {
            if self.blocklist.matches(&question.name) {
                let response = blocked_response(&query, question).encode()?;
                return Ok(QueryAction::Blocked { response, domain: question.name.clone() });
            }
        }

        let domain = query.questions.first().map(|q| q.name.clone()).unwrap_or_default();
        Ok(QueryAction::Forward { domain })
    }

    /// Number of domains in the blocklist.
    pub fn blocked_count(&self) -> usize {
        self.blocklist.len()
    }
}

/// Build a fresh null-route response for a blocked question.
///
/// The header mirrors the query with QR and RA raised; the rcode stays
/// NOERROR because stub resolvers retry on NXDOMAIN but accept an empty-ish
/// success silently. HTTPS (SVCB-family) questions get no answer at all so
/// the client falls back to A/AAAA, which this proxy also intercepts. All
/// other types get a single answer with TTL 0 and an all-zero address, 16
/// bytes for AAAA and 4 otherwise.
fn blocked_response(query: &Message, question: &Question) -> Message {
    let answers = if question.qtype == qtype::HTTPS {
        Vec::new()
    } else {
        let rdlen = if question.qtype == qtype::AAAA { 16 } else { 4 };
        vec![ResourceRecord {
            name: question.name.clone(),
            rtype: question.qtype,
            rclass: question.qclass,
            ttl: 0,
            rdata: vec![0; rdlen],
        }]
    };

    Message {
        header: Header { response: true, recursion_available: true, ..query.header },
        questions: query.questions.clone(),
        answers,
        authority: Vec::new(),
        additional: Vec::new(),
    }
}
