//! Target selection for image generation.
//!
//! The catalog handed in is already filtered to the session's gender.
//! Selection is uniform: no weighting and no memory of earlier picks, so a
//! repeat generation may land on the same target again.

use rand::seq::IndexedRandom;
use rand::Rng;

/// Pick one candidate uniformly at random; `None` when the slice is empty.
pub fn choose_target<T>(candidates: &[T]) -> Option<&T> {
    choose_target_with(candidates, &mut rand::rng())
}

/// [`choose_target`] with an explicit RNG.
pub fn choose_target_with<'a, T, R: Rng + ?Sized>(
    candidates: &'a [T],
    rng: &mut R,
) -> Option<&'a T> {
    candidates.choose(rng)
}
