//! Slime chunk classification.

use crate::random::JavaRandom;

/// Seed of one deterministic world.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct WorldSeed(i64);

impl WorldSeed {
    #[inline]
    #[must_use]
    pub const fn new(seed: i64) -> Self {
        Self(seed)
    }

    #[inline]
    #[must_use]
    pub const fn value(self) -> i64 {
        self.0
    }

    /// Shorthand for [`is_slime_chunk`] with this seed.
    #[inline]
    #[must_use]
    pub fn is_slime_chunk(self, chunk_x: i32, chunk_z: i32) -> bool {
        is_slime_chunk(self.0, chunk_x, chunk_z)
    }
}

impl From<i64> for WorldSeed {
    fn from(seed: i64) -> Self {
        Self(seed)
    }
}

/// Returns true when chunk `(chunk_x, chunk_z)` is a slime chunk in the world
/// identified by `seed`.
///
/// Every product is taken in 64 bits: a squared coordinate times a
/// multi-million constant does not fit in 32.
pub fn is_slime_chunk(seed: i64, chunk_x: i32, chunk_z: i32) -> bool {
    let x = i64::from(chunk_x);
    let z = i64::from(chunk_z);
    let mixed_seed = seed
        .wrapping_add(x.wrapping_mul(x).wrapping_mul(4_987_142))
        .wrapping_add(x.wrapping_mul(5_947_611))
        .wrapping_add(z.wrapping_mul(z).wrapping_mul(4_392_871))
        .wrapping_add(z.wrapping_mul(389_711))
        ^ 987_234_911_i64;
    let mut random = JavaRandom::new(mixed_seed);
    random.next_int(10) == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_zero_first_square() {
        let found: Vec<(i32, i32)> = (0..16)
            .flat_map(|x| (0..16).map(move |z| (x, z)))
            .filter(|&(x, z)| is_slime_chunk(0, x, z))
            .collect();
        assert_eq!(found.len(), 31);
        assert_eq!(
            &found[..10],
            &[
                (0, 10),
                (0, 13),
                (1, 14),
                (2, 2),
                (2, 4),
                (2, 10),
                (2, 11),
                (3, 8),
                (4, 2),
                (7, 1)
            ]
        );
    }

    #[test]
    fn negative_coordinates() {
        let found: Vec<(i32, i32)> = (-8..8)
            .flat_map(|x| (-8..8).map(move |z| (x, z)))
            .filter(|&(x, z)| is_slime_chunk(12_345, x, z))
            .collect();
        assert_eq!(
            found,
            vec![
                (-8, -7),
                (-8, -2),
                (-7, 1),
                (-7, 3),
                (-5, 2),
                (-4, 0),
                (-3, 7),
                (-2, -4),
                (-2, 1),
                (-2, 4),
                (-1, 2),
                (0, -6),
                (0, -2),
                (0, 7),
                (3, 0),
                (3, 5),
                (4, -6),
                (4, -5),
                (4, -3),
                (4, 1),
                (5, -3),
                (6, -2),
                (6, 7),
            ]
        );
    }

    #[test]
    fn classification_is_deterministic() {
        let seed = WorldSeed::new(-4_172_144_997_902_289_642);
        for (x, z) in [(0, 0), (-1, 1), (30_000_000, -30_000_000), (i32::MIN, i32::MAX)] {
            let first = seed.is_slime_chunk(x, z);
            for _ in 0..4 {
                assert_eq!(seed.is_slime_chunk(x, z), first);
            }
        }
    }

    #[test]
    fn seed_from_raw_value() {
        let seed = WorldSeed::from(-42_i64);
        assert_eq!(seed, WorldSeed::new(-42));
        assert_eq!(seed.value(), -42);
        assert_eq!(seed.is_slime_chunk(3, 9), is_slime_chunk(-42, 3, 9));
    }

    #[test]
    fn roughly_one_in_ten() {
        let seed = WorldSeed::new(99);
        let hits = (0..200)
            .flat_map(|x| (0..200).map(move |z| (x, z)))
            .filter(|&(x, z)| seed.is_slime_chunk(x, z))
            .count();
        assert!((3_000..5_000).contains(&hits), "unexpected density: {hits}");
    }
}
