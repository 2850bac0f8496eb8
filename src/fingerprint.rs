use sha2::{Digest, Sha256};

/// Computes the SHA-256 fingerprint of the condensed content string.
///
/// The digest is taken over the UTF-8 bytes of `content` and rendered as 64
/// lowercase hex characters. This is the value persisted in the state store
/// and compared across runs, so its encoding must remain stable.
pub fn fingerprint(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    format!("{:x}", hasher.finalize())
}
