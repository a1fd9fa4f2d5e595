use blake3::Hasher;

/// Hashes one canonical PR text to a 32-byte key.
#[inline]
pub fn hash_text(text: &str) -> [u8; 32] {
    *blake3::hash(text.as_bytes()).as_bytes()
}

/// Cache key for an embedding: model identifier and canonical text, with a
/// separator so `("ab", "c")` and `("a", "bc")` never collide.
#[inline]
pub fn hash_embedding_key(model_id: &str, text: &str) -> [u8; 32] {
    let mut hasher = Hasher::new();
    hasher.update(model_id.as_bytes());
    hasher.update(b"|");
    hasher.update(text.as_bytes());
    *hasher.finalize().as_bytes()
}

/// Computes a 64-bit hash of a token using BLAKE3, truncated from 256 bits.
///
/// Used by the hashed embedding provider to bucket tokens into vector
/// dimensions. Truncation to 64 bits is fine here: a collision merges two
/// tokens into one bucket, which the hashing-trick representation tolerates
/// by construction. Nothing cryptographic depends on this value.
#[inline]
pub fn hash_token_to_u64(token: &str) -> u64 {
    let hash = blake3::hash(token.as_bytes());
    let bytes: [u8; 8] = hash.as_bytes()[0..8]
        .try_into()
        .expect("BLAKE3 always produces at least 8 bytes");
    u64::from_le_bytes(bytes)
}
