//! Random prefix and object name generation for benchmark runs.
//!
//! Every invocation of the benchmark tooling gets its own prefix so that
//! concurrent or repeated runs against the same bucket never collide, and so
//! that [`Benchmark::cleanup`](../../s3bench_bench/trait.Benchmark.html) can
//! find everything it created without tracking individual object names.

const PREFIX_LEN: usize = 8;
const NAME_LEN: usize = 16;

/// Generate a random run prefix, e.g. `s3bench/3f8a9c2d/`.
pub fn random_prefix() -> String {
    format!("s3bench/{}/", random_alnum(PREFIX_LEN))
}

/// Generate a random object name to place under a run prefix.
pub fn random_object_name() -> String {
    random_alnum(NAME_LEN)
}

fn random_alnum(len: usize) -> String {
    (0..len).map(|_| fastrand::alphanumeric()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_has_expected_shape() {
        let prefix = random_prefix();
        assert!(prefix.starts_with("s3bench/"));
        assert!(prefix.ends_with('/'));
        assert_eq!(prefix.len(), "s3bench/".len() + PREFIX_LEN + 1);
    }

    #[test]
    fn object_names_are_distinct() {
        let a = random_object_name();
        let b = random_object_name();
        assert_eq!(a.len(), NAME_LEN);
        assert_ne!(a, b);
    }
}
