use sha2::{Digest, Sha256};

/// SHA-256 of the UTF-8 bytes of `text`, as 64 lowercase hex characters.
///
/// Only ever compared for equality against another digest.
pub fn digest(text: &str) -> String {
    format!("{:x}", Sha256::digest(text.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_known_sha256_vector() {
        assert_eq!(
            digest("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn is_fixed_length_lowercase_hex() {
        let value = digest("hunter2");
        assert_eq!(value.len(), 64);
        assert!(value
            .chars()
            .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
    }

    #[test]
    fn is_deterministic() {
        assert_eq!(digest("same input"), digest("same input"));
        assert_ne!(digest("one"), digest("two"));
    }
}
