// src/core/crypto/hash.rs
//! SHA-256 content digests rendered as lowercase hex.
//!
//! Everything that ends up in the Merkle tree goes through this module: file
//! contents are hashed with [`hash_bytes`] (or the streaming [`hash_reader`])
//! and internal nodes are derived with [`combine`].

use std::fmt;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;
use std::str::FromStr;

use ring::digest::{self, Context, SHA256};
use serde::{Deserialize, Serialize};

use crate::core::merkle::MerkleError;

/// Length of a SHA-256 digest in hex characters.
pub const DIGEST_HEX_LEN: usize = 64;

const READ_CHUNK: usize = 4096;

/// A hex-encoded SHA-256 digest.
///
/// The inner string is always exactly [`DIGEST_HEX_LEN`] lowercase hex
/// characters. Ordering is plain lexicographic string order, which is the
/// order [`combine`] uses to canonicalize its inputs.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Digest(String);

impl Digest {
    /// Parses untrusted text. Uppercase input is rejected rather than folded.
    pub fn parse(text: &str) -> Result<Self, MerkleError> {
        if text.len() != DIGEST_HEX_LEN {
            return Err(MerkleError::HashInput(format!(
                "expected {} hex characters, got {}",
                DIGEST_HEX_LEN,
                text.len()
            )));
        }
        if let Some(bad) = text.chars().find(|c| !matches!(*c, '0'..='9' | 'a'..='f')) {
            return Err(MerkleError::HashInput(format!(
                "invalid digest character {:?}",
                bad
            )));
        }
        Ok(Self(text.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn from_raw(raw: &[u8]) -> Self {
        Self(hex::encode(raw))
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Digest {
    type Err = MerkleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Digest {
    type Error = MerkleError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Digest> for String {
    fn from(digest: Digest) -> Self {
        digest.0
    }
}

impl AsRef<str> for Digest {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Hashes raw bytes.
pub fn hash_bytes(data: &[u8]) -> Digest {
    Digest::from_raw(digest::digest(&SHA256, data).as_ref())
}

/// Hashes everything `reader` yields, in fixed-size chunks.
pub fn hash_reader<R: Read>(mut reader: R) -> io::Result<Digest> {
    let mut context = Context::new(&SHA256);
    let mut buffer = [0u8; READ_CHUNK];
    loop {
        let read = reader.read(&mut buffer)?;
        if read == 0 {
            break;
        }
        context.update(&buffer[..read]);
    }
    Ok(Digest::from_raw(context.finish().as_ref()))
}

pub fn hash_file<P: AsRef<Path>>(path: P) -> io::Result<Digest> {
    hash_reader(File::open(path)?)
}

/// Hashes the concatenation of two digests, smaller one first.
///
/// Swapping the arguments never changes the result, so a verifier does not
/// need to know which side its sibling was on.
pub fn combine(a: &Digest, b: &Digest) -> Digest {
    let (low, high) = if a <= b { (a, b) } else { (b, a) };
    let mut context = Context::new(&SHA256);
    context.update(low.as_str().as_bytes());
    context.update(high.as_str().as_bytes());
    Digest::from_raw(context.finish().as_ref())
}
