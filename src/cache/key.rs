//! Cache key derivation.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Compute a cache key from a query descriptor and its ordered parameters.
///
/// Pure function: equal `(descriptor, params)` inputs always produce equal
/// keys, and distinct inputs collide only with the probability of a 64-bit
/// hash. Uses `DefaultHasher` (SipHash) for a reasonable collision-resistance
/// / performance trade-off; the hash is deterministic within a process
/// lifetime, which is sufficient for an in-memory cache.
///
/// The parameter count is folded into the digest, so a descriptor queried
/// with no parameters never collides with the same descriptor queried with
/// any parameter list.
pub fn derive_key(descriptor: &str, params: &[String]) -> u64 {
    let mut hasher = DefaultHasher::new();
    descriptor.hash(&mut hasher);
    params.len().hash(&mut hasher);
    for p in params {
        p.hash(&mut hasher);
    }
    hasher.finish()
}
