//! Scoping class name allocation.
//!
//! A name is `<prefix><seed>-<counter>`, where the seed always starts with a
//! letter. The counter makes names unique within one registry; the
//! time-derived seed keeps two registries (two documents, or two plugin
//! installs) from handing out the same names.

/// Hands out scoping class names for one registry.
#[derive(Debug, Clone)]
pub struct ClassAllocator {
    prefix: String,
    seed: String,
    counter: u64,
}

impl ClassAllocator {
    /// Create an allocator seeded from the clock.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self::with_seed(prefix, crate::util::time_seed_nanos())
    }

    /// Create an allocator with an explicit seed (deterministic names).
    pub fn with_seed(prefix: impl Into<String>, seed: u64) -> Self {
        let mixed = seed
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        // Leading letter keeps `.<class>` a valid selector even with an
        // empty or digit-ending prefix.
        let lead = char::from(b'a' + (mixed % 26) as u8);
        Self {
            prefix: prefix.into(),
            seed: format!("{lead}{}", base36(mixed >> 24)),
            counter: 0,
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Allocate the next class name.
    pub fn allocate(&mut self) -> String {
        self.counter += 1;
        format!("{}{}-{}", self.prefix, self.seed, base36(self.counter))
    }
}

/// Render `n` in lowercase base 36.
pub fn base36(mut n: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

    if n == 0 {
        return "0".to_string();
    }
    let mut buf = Vec::with_capacity(13);
    while n > 0 {
        buf.push(DIGITS[(n % 36) as usize]);
        n /= 36;
    }
    buf.iter().rev().map(|&b| char::from(b)).collect()
}
