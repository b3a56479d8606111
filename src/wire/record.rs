//! Question and resource-record codecs.
//!
//! Both shapes keep their type and class as raw `u16` so unrecognized values
//! survive a round trip; the constants below exist for the handful of places
//! that need to name one (A/AAAA/HTTPS decisions, logs, tests).

use crate::error::DnsError;
use crate::wire::name::{decode_name, encode_name, CompressionTable};

/// Well-known RR type numbers.
pub mod qtype {
    pub const A: u16 = 1;
    pub const NS: u16 = 2;
    pub const MD: u16 = 3;
    pub const MF: u16 = 4;
    pub const CNAME: u16 = 5;
    pub const SOA: u16 = 6;
    pub const MB: u16 = 7;
    pub const MG: u16 = 8;
    pub const MR: u16 = 9;
    pub const NULL: u16 = 10;
    pub const WKS: u16 = 11;
    pub const PTR: u16 = 12;
    pub const HINFO: u16 = 13;
    pub const MINFO: u16 = 14;
    pub const MX: u16 = 15;
    pub const TXT: u16 = 16;
    pub const RP: u16 = 17;
    pub const AFSDB: u16 = 18;
    pub const SIG: u16 = 24;
    pub const KEY: u16 = 25;
    pub const AAAA: u16 = 28;
    pub const LOC: u16 = 29;
    pub const SRV: u16 = 33;
    pub const NAPTR: u16 = 35;
    pub const KX: u16 = 36;
    pub const CERT: u16 = 37;
    pub const DNAME: u16 = 39;
    pub const OPT: u16 = 41;
    pub const APL: u16 = 42;
    pub const DS: u16 = 43;
    pub const SSHFP: u16 = 44;
    pub const IPSECKEY: u16 = 45;
    pub const RRSIG: u16 = 46;
    pub const NSEC: u16 = 47;
    pub const DNSKEY: u16 = 48;
    pub const DHCID: u16 = 49;
    pub const NSEC3: u16 = 50;
    pub const NSEC3PARAM: u16 = 51;
    pub const TLSA: u16 = 52;
    pub const SMIMEA: u16 = 53;
    pub const HIP: u16 = 55;
    pub const CDS: u16 = 59;
    pub const CDNSKEY: u16 = 60;
    pub const OPENPGPKEY: u16 = 61;
    pub const CSYNC: u16 = 62;
    pub const ZONEMD: u16 = 63;
    pub const SVCB: u16 = 64;
    pub const HTTPS: u16 = 65;
    pub const EUI48: u16 = 108;
    pub const EUI64: u16 = 109;
    pub const TKEY: u16 = 249;
    pub const TSIG: u16 = 250;
    pub const IXFR: u16 = 251;
    pub const AXFR: u16 = 252;
    pub const ANY: u16 = 255;
    pub const URI: u16 = 256;
    pub const CAA: u16 = 257;
}

/// Well-known RR class numbers.
pub mod qclass {
    pub const IN: u16 = 1;
    pub const CS: u16 = 2;
    pub const CH: u16 = 3;
    pub const HS: u16 = 4;
    pub const ANY: u16 = 255;
}

/// One entry of the question section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    pub name: String,
    pub qtype: u16,
    pub qclass: u16,
}

impl Question {
    /// Decode a question at `*cursor`, leaving the cursor past it.
    pub fn decode(buf: &[u8], cursor: &mut usize) -> Result<Self, DnsError> {
        let name = decode_name(buf, cursor)?;

        if *cursor + 4 > buf.len() {
            return Err(DnsError::Truncated);
        }
        let qtype = u16::from_be_bytes([buf[*cursor], buf[*cursor + 1]]);
        let qclass = u16::from_be_bytes([buf[*cursor + 2], buf[*cursor + 3]]);
        *cursor += 4;

        Ok(Question { name, qtype, qclass })
    }

    /// Encode name, qtype, qclass.
    pub fn encode(
        &self,
        table: Option<&mut CompressionTable>,
        base_offset: u16,
    ) -> Result<Vec<u8>, DnsError> {
        let mut buf = encode_name(&self.name, table, base_offset)?;
        buf.extend_from_slice(&self.qtype.to_be_bytes());
        buf.extend_from_slice(&self.qclass.to_be_bytes());
        Ok(buf)
    }
}

/// One answer, authority, or additional record.
///
/// rdata stays opaque. Names embedded inside it (CNAME, MX, NS, ...) are
/// relayed untouched and never re-compressed on encode; pointers inside rdata
/// still decode correctly because the name codec reads the absolute buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceRecord {
    pub name: String,
    pub rtype: u16,
    pub rclass: u16,
    pub ttl: u32,
    pub rdata: Vec<u8>,
}

impl ResourceRecord {
    /// Decode a record at `*cursor`, leaving the cursor past its rdata.
    pub fn decode(buf: &[u8], cursor: &mut usize) -> Result<Self, DnsError> {
        let name = decode_name(buf, cursor)?;

        // type + class + ttl + rdlength
        if *cursor + 10 > buf.len() {
            return Err(DnsError::Truncated);
        }
        let rtype = u16::from_be_bytes([buf[*cursor], buf[*cursor + 1]]);
        let rclass = u16::from_be_bytes([buf[*cursor + 2], buf[*cursor + 3]]);
        let ttl = u32::from_be_bytes([
            buf[*cursor + 4],
            buf[*cursor + 5],
            buf[*cursor + 6],
            buf[*cursor + 7],
        ]);
        let rdlength = u16::from_be_bytes([buf[*cursor + 8], buf[*cursor + 9]]) as usize;

        let rdata_start = *cursor + 10;
        if rdata_start + rdlength > buf.len() {
            return Err(DnsError::Truncated);
        }
        let rdata = buf[rdata_start..rdata_start + rdlength].to_vec();
        *cursor = rdata_start + rdlength;

        Ok(ResourceRecord { name, rtype, rclass, ttl, rdata })
    }

    /// Encode name, fixed fields, then rdata. rdlength always reflects the
    /// actual rdata length.
    pub fn encode(
        &self,
        table: Option<&mut CompressionTable>,
        base_offset: u16,
    ) -> Result<Vec<u8>, DnsError> {
        let mut buf = encode_name(&self.name, table, base_offset)?;
        buf.extend_from_slice(&self.rtype.to_be_bytes());
        buf.extend_from_slice(&self.rclass.to_be_bytes());
        buf.extend_from_slice(&self.ttl.to_be_bytes());
        buf.extend_from_slice(&(self.rdata.len() as u16).to_be_bytes());
        buf.extend_from_slice(&self.rdata);
        Ok(buf)
    }
}
