//! Suffix blocklist with hierarchical lookup.
//!
//! Entries are lowercased dot-separated domains, one per line in the source
//! files. A lookup strips leading labels one at a time, so an entry blocks
//! the domain itself and every subdomain under it.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use rustc_hash::FxHashSet;

use crate::error::DnsError;

/// A set of blocked domain suffixes.
pub struct Blocklist {
    domains: FxHashSet<String>,
}

impl Blocklist {
    /// Create an empty blocklist.
    pub fn new() -> Self {
        Self { domains: FxHashSet::default() }
    }

    /// Load domain files in order, one domain per line, lowercased on insert.
    ///
    /// Loading stops at the first file that cannot be opened; entries from
    /// earlier files are retained.
    pub fn load_files<P: AsRef<Path>>(&mut self, paths: &[P]) -> Result<(), DnsError> {
        for path in paths {
            let file = File::open(path).map_err(|_| DnsError::BlocklistNotFound)?;
            for line in BufReader::new(file).lines() {
                let line = line.map_err(|_| DnsError::BlocklistParse)?;
                self.domains.insert(line.to_ascii_lowercase());
            }
        }
        Ok(())
    }

    /// Insert a single domain.
    pub fn insert(&mut self, domain: &str) {
        self.domains.insert(domain.to_ascii_lowercase());
    }

    /// Check whether a domain or any parent domain is blocked.
    ///
    /// The input is normalized first (scheme and path/port/fragment stripped,
    /// ASCII-lowercased), then leading labels are stripped at the first dot
    /// until a match is found or no dot remains. Stripping is whole-label:
    /// entry `ads.net` blocks `x.ads.net` but never `myads.net`.
    pub fn matches(&self, domain: &str) -> bool {
        let normalized = normalize(domain);
        let mut current = normalized.as_str();
        loop {
            if self.domains.contains(current) {
                return true;
            }
            match current.find('.') {
                Some(dot) => current = &current[dot + 1..],
                None => return false,
            }
        }
    }

    /// Number of entries in the set.
    pub fn len(&self) -> usize {
        self.domains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.domains.is_empty()
    }
}

impl Default for Blocklist {
    fn default() -> Self {
        Self::new()
    }
}

/// Reduce a URL-ish string to a bare lowercase hostname.
fn normalize(input: &str) -> String {
    let host = input.split_once("://").map_or(input, |(_, rest)| rest);
    let host = host.find(['/', '?', ':', '#']).map_or(host, |pos| &host[..pos]);
    host.to_ascii_lowercase()
}
