use itertools::Itertools;
use rand::seq::SliceRandom;
use rand::Rng;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SampleError {
    #[error("word source is empty")]
    EmptySource,
    #[error("word count must be positive")]
    InvalidCount,
}

/// The text a session asks the user to reproduce. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Passage(String);

impl Passage {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn word_count(&self) -> usize {
        self.0.split(' ').filter(|w| !w.is_empty()).count()
    }
}

impl From<&str> for Passage {
    fn from(text: &str) -> Self {
        Passage(text.to_string())
    }
}

impl fmt::Display for Passage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Draws passages from an injected word list.
#[derive(Debug, Clone)]
pub struct WordSampler {
    words: Vec<String>,
}

impl WordSampler {
    pub fn new(words: Vec<String>) -> Result<Self, SampleError> {
        if words.is_empty() {
            return Err(SampleError::EmptySource);
        }
        Ok(Self { words })
    }

    pub fn sample(&self, count: usize) -> Result<Passage, SampleError> {
        self.sample_with(&mut rand::thread_rng(), count)
    }

    pub fn sample_with<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        count: usize,
    ) -> Result<Passage, SampleError> {
        sample(rng, &self.words, count)
    }
}

/// Draws `count` words uniformly with replacement and joins them with single
/// spaces. Duplicates are expected.
pub fn sample<R: Rng + ?Sized>(
    rng: &mut R,
    source: &[String],
    count: usize,
) -> Result<Passage, SampleError> {
    if source.is_empty() {
        return Err(SampleError::EmptySource);
    }
    if count == 0 {
        return Err(SampleError::InvalidCount);
    }

    let text = (0..count)
        .filter_map(|_| source.choose(&mut *rng))
        .join(" ");

    Ok(Passage(text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn words(list: &[&str]) -> Vec<String> {
        list.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn empty_source_is_rejected() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(sample(&mut rng, &[], 5), Err(SampleError::EmptySource));
        assert_eq!(WordSampler::new(vec![]).unwrap_err(), SampleError::EmptySource);
    }

    #[test]
    fn zero_count_is_rejected() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(
            sample(&mut rng, &words(&["a"]), 0),
            Err(SampleError::InvalidCount)
        );
    }

    #[test]
    fn produces_requested_number_of_words() {
        let mut rng = StdRng::seed_from_u64(42);
        let source = words(&["the", "quick", "brown", "fox"]);
        let passage = sample(&mut rng, &source, 50).unwrap();

        let drawn: Vec<&str> = passage.as_str().split(' ').collect();
        assert_eq!(drawn.len(), 50);
        assert_eq!(passage.word_count(), 50);
        assert!(drawn.iter().all(|w| source.iter().any(|s| s == w)));
    }

    #[test]
    fn no_leading_or_trailing_space() {
        let sampler = WordSampler::new(words(&["cat", "dog"])).unwrap();
        let passage = sampler.sample(10).unwrap();
        assert!(!passage.as_str().starts_with(' '));
        assert!(!passage.as_str().ends_with(' '));
        assert!(!passage.as_str().contains("  "));
    }

    #[test]
    fn single_word_source_repeats() {
        let mut rng = StdRng::seed_from_u64(7);
        let passage = sample(&mut rng, &words(&["echo"]), 3).unwrap();
        assert_eq!(passage.as_str(), "echo echo echo");
        assert_eq!(passage.as_str().chars().count(), 14);
    }

    #[test]
    fn same_seed_same_passage() {
        let sampler = WordSampler::new(words(&["a", "b", "c", "d", "e"])).unwrap();
        let first = sampler.sample_with(&mut StdRng::seed_from_u64(9), 20).unwrap();
        let second = sampler.sample_with(&mut StdRng::seed_from_u64(9), 20).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn draws_with_replacement() {
        // 30 draws from 2 words must repeat
        let mut rng = StdRng::seed_from_u64(3);
        let passage = sample(&mut rng, &words(&["x", "y"]), 30).unwrap();
        assert_eq!(passage.word_count(), 30);
    }
}
