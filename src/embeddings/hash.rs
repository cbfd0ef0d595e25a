use crate::embeddings::{EmbeddingError, EmbeddingProvider};

/// Deterministic embedding derived from the MD5 digest of the text.
///
/// Each dimension `i` reads the digest as a big-endian 128-bit integer,
/// shifts it right by `8 * i` bits and maps the remainder mod 200 onto
/// `[-1.0, 1.0)` in steps of 0.01. Dimensions past the 16th see a fully
/// shifted-out integer and come out as -1.0. Empty text is all zeros.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashEmbedder {
    dimensions: usize,
}

impl HashEmbedder {
    pub fn new(dimensions: usize) -> Self {
        Self { dimensions }
    }
}

impl EmbeddingProvider for HashEmbedder {
    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn embed(&self, text: &str) -> Result<Vec<f64>, EmbeddingError> {
        if text.is_empty() {
            return Ok(vec![0.0; self.dimensions]);
        }

        let digest = md5::compute(text.as_bytes());
        let value = u128::from_be_bytes(digest.0);

        Ok((0..self.dimensions)
            .map(|i| {
                let shifted = u32::try_from(i * 8)
                    .ok()
                    .and_then(|bits| value.checked_shr(bits))
                    .unwrap_or(0);
                let bucket = (shifted % 200) as f64 - 100.0;
                round3(bucket / 100.0)
            })
            .collect())
    }

    fn name(&self) -> &'static str {
        "hash"
    }
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_text_is_all_zeros() {
        let embedding = HashEmbedder::new(16).embed("").unwrap();
        assert_eq!(embedding, vec![0.0; 16]);
    }

    #[test]
    fn same_text_same_vector() {
        let embedder = HashEmbedder::new(16);
        let a = embedder.embed("Rust parsers").unwrap();
        let b = embedder.embed("Rust parsers").unwrap();
        assert_eq!(a, b);
        assert_ne!(a, embedder.embed("Rust parser").unwrap());
    }

    #[test]
    fn values_stay_in_range() {
        let embedding = HashEmbedder::new(16).embed("hello world").unwrap();
        assert_eq!(embedding.len(), 16);
        assert!(embedding.iter().all(|v| (-1.0..1.0).contains(v)));
    }

    #[test]
    fn first_dimension_matches_digest() {
        // md5("hello") = 5d41402abc4b2a76b9719d911017c592
        let value: u128 = 0x5d41402abc4b2a76b9719d911017c592;
        let expected = ((value % 200) as f64 - 100.0) / 100.0;
        let embedding = HashEmbedder::new(2).embed("hello").unwrap();
        assert_eq!(embedding[0], round3(expected));
        let second = (((value >> 8) % 200) as f64 - 100.0) / 100.0;
        assert_eq!(embedding[1], round3(second));
    }

    #[test]
    fn dimensions_past_digest_width_are_minus_one() {
        let embedding = HashEmbedder::new(20).embed("hello").unwrap();
        assert_eq!(embedding[16..], [-1.0; 4]);
    }
}
