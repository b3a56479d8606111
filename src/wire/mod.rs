//! DNS wire-format codec per RFC 1035.
//!
//! `Message` is the unit of work: one parsed UDP datagram, query or response.
//! Parsing walks the four sections with a single cursor so compression
//! pointers into earlier sections resolve; encoding rebuilds the datagram
//! with a fresh suffix table per call.

pub mod header;
pub mod name;
pub mod record;

pub use header::{Header, Opcode, HEADER_LEN};
pub use record::{Question, ResourceRecord};

use crate::error::DnsError;
use crate::wire::name::CompressionTable;

/// Maximum accepted and emitted datagram size (EDNS0 extended UDP payload).
pub const MAX_EDNS_PAYLOAD: usize = 4096;

/// One DNS message: header plus the four ordered sections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub header: Header,
    pub questions: Vec<Question>,
    pub answers: Vec<ResourceRecord>,
    pub authority: Vec<ResourceRecord>,
    pub additional: Vec<ResourceRecord>,
}

impl Message {
    /// Parse a whole datagram.
    pub fn parse(buf: &[u8]) -> Result<Self, DnsError> {
        if buf.len() < HEADER_LEN {
            return Err(DnsError::TooShort);
        }
        if buf.len() > MAX_EDNS_PAYLOAD {
            return Err(DnsError::Truncated);
        }

        let header = Header::decode(buf)?;
        let mut cursor = HEADER_LEN;

        let mut questions = Vec::with_capacity(header.qdcount as usize);
        for _ in 0..header.qdcount {
            questions.push(Question::decode(buf, &mut cursor)?);
        }

        let answers = Self::parse_section(buf, &mut cursor, header.ancount)?;
        let authority = Self::parse_section(buf, &mut cursor, header.nscount)?;
        let additional = Self::parse_section(buf, &mut cursor, header.arcount)?;

        Ok(Message { header, questions, answers, authority, additional })
    }

    fn parse_section(
        buf: &[u8],
        cursor: &mut usize,
        count: u16,
    ) -> Result<Vec<ResourceRecord>, DnsError> {
        let mut records = Vec::with_capacity(count as usize);
        for _ in 0..count {
            records.push(ResourceRecord::decode(buf, cursor)?);
        }
        Ok(records)
    }

    /// Encode back to wire format.
    ///
    /// Header counts are taken from the actual section lengths, never from
    /// the stored header.
    pub fn encode(&self) -> Result<Vec<u8>, DnsError> {
        let mut header = self.header;
        header.qdcount = self.questions.len() as u16;
        header.ancount = self.answers.len() as u16;
        header.nscount = self.authority.len() as u16;
        header.arcount = self.additional.len() as u16;

        let mut buf = Vec::with_capacity(512);
        buf.extend_from_slice(&header.encode());

        let mut table = CompressionTable::default();

        for question in &self.questions {
            if buf.len() > MAX_EDNS_PAYLOAD {
                return Err(DnsError::EncodeOverflow);
            }
            let bytes = question.encode(Some(&mut table), buf.len() as u16)?;
            buf.extend_from_slice(&bytes);
        }
        for record in self.answers.iter().chain(&self.authority).chain(&self.additional) {
            if buf.len() > MAX_EDNS_PAYLOAD {
                return Err(DnsError::EncodeOverflow);
            }
            let bytes = record.encode(Some(&mut table), buf.len() as u16)?;
            buf.extend_from_slice(&bytes);
        }

        if buf.len() > MAX_EDNS_PAYLOAD {
            return Err(DnsError::EncodeOverflow);
        }
        Ok(buf)
    }
}
