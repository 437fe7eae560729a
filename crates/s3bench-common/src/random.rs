//! Cryptographically secure randomness used to fill benchmark object payloads.

/// Generate `N` cryptographically secure random bytes.
pub fn random_bytes<const N: usize>() -> [u8; N] {
    let mut val = [0u8; N];
    aws_lc_rs::rand::fill(&mut val).expect("should be infallible");
    val
}

/// Fill `buf` in place with cryptographically secure random bytes.
pub fn fill_random(buf: &mut [u8]) {
    aws_lc_rs::rand::fill(buf).expect("should be infallible");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_bytes_are_distinct() {
        let a = random_bytes::<32>();
        let b = random_bytes::<32>();

        assert_ne!(a, b);
        assert_eq!(a.len(), 32);
    }

    #[test]
    fn fill_random_fills_whole_buffer() {
        let mut buf = [0u8; 64];
        fill_random(&mut buf);

        assert!(buf.iter().any(|&b| b != 0));
    }
}
