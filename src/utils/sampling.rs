use rand::Rng;
use std::collections::BTreeMap;

/// Draws one key uniformly from an ordered map.
///
/// Iteration order of a `BTreeMap` is fixed, so the same generator state
/// always selects the same key. Returns `None` for an empty map.
pub(crate) fn choose_key<R, V>(rng: &mut R, map: &BTreeMap<i64, V>) -> Option<i64>
where
    R: Rng + ?Sized,
{
    if map.is_empty() {
        return None;
    }
    let index = rng.gen_range(0..map.len());
    map.keys().nth(index).copied()
}
