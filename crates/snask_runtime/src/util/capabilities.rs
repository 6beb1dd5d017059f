//! System capability traits for dependency injection.

use std::io;
use std::time::{SystemTime, UNIX_EPOCH};

pub trait Clock: Send + Sync {
    fn unix_secs(&self) -> i64;
    fn unix_millis(&self) -> i64;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn unix_secs(&self) -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs() as i64)
            .unwrap_or(0)
    }

    fn unix_millis(&self) -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as i64)
            .unwrap_or(0)
    }
}

/// Source of random bytes for tokens and session ids.
pub trait RandomSource: Send + Sync {
    fn fill(&self, buf: &mut [u8]) -> io::Result<()>;
}

/// The operating system's CSPRNG.
pub struct OsRandom;

impl RandomSource for OsRandom {
    fn fill(&self, buf: &mut [u8]) -> io::Result<()> {
        getrandom::getrandom(buf).map_err(|e| io::Error::other(e.to_string()))
    }
}

pub struct Capabilities {
    pub clock: Box<dyn Clock>,
    pub rng: Box<dyn RandomSource>,
}

impl Default for Capabilities {
    fn default() -> Self {
        Self {
            clock: Box::new(SystemClock),
            rng: Box::new(OsRandom),
        }
    }
}

/// `n` random bytes rendered as `2n` lowercase hex digits.
pub fn random_hex(rng: &dyn RandomSource, n: usize) -> io::Result<String> {
    const HEX: &[u8; 16] = b"0123456789abcdef";
    let mut bytes = vec![0u8; n];
    rng.fill(&mut bytes)?;
    let mut out = String::with_capacity(n * 2);
    for b in bytes {
        out.push(HEX[(b >> 4) as usize] as char);
        out.push(HEX[(b & 0xf) as usize] as char);
    }
    Ok(out)
}
