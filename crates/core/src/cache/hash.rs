//! Entry key generation.

use sha2::{Digest, Sha256};

/// Compute the key a request is stored under: method and URL, nothing else.
///
/// The method is uppercased so `get` and `GET` share an entry.
pub fn compute_entry_key(method: &str, url: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(method.to_ascii_uppercase().as_bytes());
    hasher.update(b"\n");
    hasher.update(url.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_stability() {
        let key1 = compute_entry_key("GET", "https://blog.example/");
        let key2 = compute_entry_key("GET", "https://blog.example/");
        assert_eq!(key1, key2);
    }

    #[test]
    fn test_key_method_case_insensitive() {
        assert_eq!(
            compute_entry_key("get", "https://blog.example/"),
            compute_entry_key("GET", "https://blog.example/")
        );
    }

    #[test]
    fn test_key_different_method() {
        let get = compute_entry_key("GET", "https://blog.example/");
        let head = compute_entry_key("HEAD", "https://blog.example/");
        assert_ne!(get, head);
    }

    #[test]
    fn test_key_different_url() {
        let a = compute_entry_key("GET", "https://blog.example/a");
        let b = compute_entry_key("GET", "https://blog.example/b");
        assert_ne!(a, b);
    }

    #[test]
    fn test_key_format() {
        let key = compute_entry_key("GET", "https://blog.example/");
        assert_eq!(key.len(), 64);
        assert!(key.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
