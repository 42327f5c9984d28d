use sha2::{Digest, Sha256};

/// Hex-encoded sha256 of the normalized text.
pub fn fingerprint(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_digest() {
        assert_eq!(
            fingerprint(""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn deterministic_and_content_sensitive() {
        assert_eq!(fingerprint("Score: 3-2"), fingerprint("Score: 3-2"));
        assert_ne!(fingerprint("Score: 3-2"), fingerprint("Score: 4-2"));
        assert_eq!(fingerprint("Hello world").len(), 64);
    }
}
