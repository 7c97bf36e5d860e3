//! Pair picker
//!
//! Chooses unordered pairs of images that have not been shown yet in the
//! current session. Exhaustion is detected lazily: `next_pair` reports it
//! when there is nothing left to pick, `mark_seen` never does.

use crate::error::{Error, Result};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;
use std::collections::HashSet;
use std::hash::{Hash, Hasher};

/// Two distinct image ids shown together
///
/// `image_a`/`image_b` keep the left/right presentation order, but
/// equality and hashing ignore it: `{A,B} == {B,A}`.
#[derive(Debug, Clone, Serialize)]
pub struct Pair {
    image_a: String,
    image_b: String,
}

impl Pair {
    /// Build a pair, rejecting identical ids
    pub fn new(image_a: impl Into<String>, image_b: impl Into<String>) -> Result<Self> {
        let image_a = image_a.into();
        let image_b = image_b.into();
        if image_a == image_b {
            return Err(Error::InvalidSelection(format!(
                "a pair needs two different images, got '{}' twice",
                image_a
            )));
        }
        Ok(Self { image_a, image_b })
    }

    pub fn image_a(&self) -> &str {
        &self.image_a
    }

    pub fn image_b(&self) -> &str {
        &self.image_b
    }

    pub fn contains(&self, id: &str) -> bool {
        self.image_a == id || self.image_b == id
    }

    /// Same pair with the presentation order flipped
    pub fn swapped(self) -> Self {
        Self {
            image_a: self.image_b,
            image_b: self.image_a,
        }
    }

    fn key(&self) -> (&str, &str) {
        if self.image_a <= self.image_b {
            (&self.image_a, &self.image_b)
        } else {
            (&self.image_b, &self.image_a)
        }
    }
}

impl PartialEq for Pair {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Pair {}

impl Hash for Pair {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

/// Pairs already shown in the current session
#[derive(Debug, Default, Clone)]
pub struct SeenPairs {
    pairs: HashSet<Pair>,
}

impl SeenPairs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a pair as shown. Returns false if it was already present.
    pub fn mark_seen(&mut self, pair: Pair) -> bool {
        self.pairs.insert(pair)
    }

    pub fn contains(&self, pair: &Pair) -> bool {
        self.pairs.contains(pair)
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Forget every shown pair. Only call after the log was archived.
    pub fn reset(&mut self) {
        self.pairs.clear();
    }
}

/// Result of asking for the next pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickOutcome {
    Pair(Pair),
    /// Every pair of the current image set has been shown
    Exhausted,
}

/// Number of unordered pairs among `n` images
pub fn total_pairs(n: usize) -> usize {
    n * n.saturating_sub(1) / 2
}

/// Pick an unseen pair uniformly at random
pub fn next_pair<S: AsRef<str>>(ids: &[S], seen: &SeenPairs) -> Result<PickOutcome> {
    next_pair_with_rng(ids, seen, &mut rand::thread_rng())
}

/// [`next_pair`] with a caller supplied random source
pub fn next_pair_with_rng<S, R>(ids: &[S], seen: &SeenPairs, rng: &mut R) -> Result<PickOutcome>
where
    S: AsRef<str>,
    R: Rng + ?Sized,
{
    let candidates = unseen_pairs(ids, seen)?;

    match candidates.choose(&mut *rng) {
        Some(pair) if rng.gen_bool(0.5) => Ok(PickOutcome::Pair(pair.clone().swapped())),
        Some(pair) => Ok(PickOutcome::Pair(pair.clone())),
        None => Ok(PickOutcome::Exhausted),
    }
}

/// Count the pairs of the current image set not yet shown
///
/// Seen pairs that reference images no longer in the set are ignored.
pub fn remaining<S: AsRef<str>>(ids: &[S], seen: &SeenPairs) -> Result<usize> {
    Ok(unseen_pairs(ids, seen)?.len())
}

/// Fail with `InsufficientAssets` unless at least two distinct ids are present
pub fn ensure_pairable<S: AsRef<str>>(ids: &[S]) -> Result<()> {
    distinct_ids(ids).map(|_| ())
}

fn distinct_ids<S: AsRef<str>>(ids: &[S]) -> Result<Vec<&str>> {
    let mut unique: Vec<&str> = ids.iter().map(AsRef::as_ref).collect();
    unique.sort_unstable();
    unique.dedup();

    if unique.len() < 2 {
        return Err(Error::InsufficientAssets(unique.len()));
    }
    Ok(unique)
}

fn unseen_pairs<S: AsRef<str>>(ids: &[S], seen: &SeenPairs) -> Result<Vec<Pair>> {
    let unique = distinct_ids(ids)?;

    let mut candidates = Vec::with_capacity(total_pairs(unique.len()).saturating_sub(seen.len()));
    for (i, first) in unique.iter().enumerate() {
        for second in &unique[i + 1..] {
            let pair = Pair {
                image_a: first.to_string(),
                image_b: second.to_string(),
            };
            if !seen.contains(&pair) {
                candidates.push(pair);
            }
        }
    }
    Ok(candidates)
}
