//! Content hashing for revisioned (cache-busted) filenames.
//!
//! Uses blake3: fast, stable across platforms and runs, and any byte change
//! in the input changes the fingerprint.

/// Length of the hex fingerprint embedded in revisioned filenames.
pub const FINGERPRINT_LEN: usize = 8;

/// Compute the hex fingerprint of a byte slice.
///
/// Deterministic function of content only; used to build revisioned
/// filenames like `index-9f86d081.js`.
#[inline]
pub fn fingerprint<T: AsRef<[u8]> + ?Sized>(data: &T) -> String {
    let hash = blake3::hash(data.as_ref());
    hex::encode(&hash.as_bytes()[..FINGERPRINT_LEN / 2])
}
