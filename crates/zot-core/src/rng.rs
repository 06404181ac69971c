//! Random number generation.
//!
//! Uses a seeded ChaCha RNG for reproducibility (seeded games, save/restore).

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Game random number generator.
///
/// Wraps ChaCha8Rng. Only the seed is serialized; a restored game replays
/// from a fresh stream rather than the exact generator state.
#[derive(Debug, Clone)]
pub struct GameRng {
    rng: ChaCha8Rng,
    seed: u64,
}

impl Serialize for GameRng {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.seed.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for GameRng {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let seed = u64::deserialize(deserializer)?;
        Ok(GameRng::new(seed))
    }
}

impl GameRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Create a new RNG with a random seed
    pub fn from_entropy() -> Self {
        Self::new(rand::random())
    }

    /// Get the seed used to create this RNG
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Uniform roll in 0..n. Returns 0 if n <= 0.
    pub fn random2(&mut self, n: i32) -> i32 {
        if n <= 0 {
            return 0;
        }
        self.rng.gen_range(0..n)
    }

    /// Average of `rolls` independent random2(n) rolls; flatter distribution
    /// with the same 0..n-1 support.
    pub fn random2avg(&mut self, n: i32, rolls: i32) -> i32 {
        let rolls = rolls.max(1);
        let mut sum = self.random2(n);
        for _ in 1..rolls {
            sum += self.random2(n + 1);
        }
        sum / rolls
    }

    /// Uniform roll in low..=high. Returns low if the range is inverted.
    pub fn random_range(&mut self, low: i32, high: i32) -> i32 {
        if high <= low {
            return low;
        }
        self.rng.gen_range(low..=high)
    }

    /// True with probability x in y. y <= 0 is treated as never.
    pub fn x_chance_in_y(&mut self, x: i32, y: i32) -> bool {
        if y <= 0 {
            return false;
        }
        if x >= y {
            return true;
        }
        self.random2(y) < x
    }

    /// True with probability 1 in n
    pub fn one_chance_in(&mut self, n: i32) -> bool {
        self.x_chance_in_y(1, n)
    }

    /// Fair coin
    pub fn coinflip(&mut self) -> bool {
        self.x_chance_in_y(1, 2)
    }

    /// Sum of `num` rolls of 1..=size; 0 if either argument is 0
    pub fn roll_dice(&mut self, num: i32, size: i32) -> i32 {
        if num <= 0 || size <= 0 {
            return 0;
        }
        (0..num).map(|_| self.random_range(1, size)).sum()
    }

    /// Choose a random element from a slice
    pub fn choose<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            None
        } else {
            Some(&items[self.random2(items.len() as i32) as usize])
        }
    }

    /// Shuffle a slice in place
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        for i in (1..items.len()).rev() {
            let j = self.random2(i as i32 + 1) as usize;
            items.swap(i, j);
        }
    }
}

impl Default for GameRng {
    fn default() -> Self {
        Self::from_entropy()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random2_bounds() {
        let mut rng = GameRng::new(42);
        for _ in 0..1000 {
            let n = rng.random2(10);
            assert!((0..10).contains(&n));
        }
        assert_eq!(rng.random2(0), 0);
        assert_eq!(rng.random2(-5), 0);
    }

    #[test]
    fn test_random_range_bounds() {
        let mut rng = GameRng::new(42);
        for _ in 0..1000 {
            let n = rng.random_range(3, 9);
            assert!((3..=9).contains(&n));
        }
        assert_eq!(rng.random_range(7, 7), 7);
        assert_eq!(rng.random_range(9, 3), 9);
    }

    #[test]
    fn test_roll_dice() {
        let mut rng = GameRng::new(42);
        for _ in 0..1000 {
            let n = rng.roll_dice(2, 6);
            assert!((2..=12).contains(&n));
        }
        assert_eq!(rng.roll_dice(0, 6), 0);
        assert_eq!(rng.roll_dice(2, 0), 0);
    }

    #[test]
    fn test_x_chance_in_y_extremes() {
        let mut rng = GameRng::new(42);
        for _ in 0..100 {
            assert!(rng.x_chance_in_y(5, 5));
            assert!(rng.x_chance_in_y(6, 5));
            assert!(!rng.x_chance_in_y(0, 5));
            assert!(!rng.x_chance_in_y(5, 0));
        }
    }

    #[test]
    fn test_reproducibility() {
        let mut a = GameRng::new(1234);
        let mut b = GameRng::new(1234);
        for _ in 0..100 {
            assert_eq!(a.random2(100), b.random2(100));
        }
    }

    #[test]
    fn test_seed_roundtrip_through_serde() {
        let rng = GameRng::new(99);
        let json = serde_json::to_string(&rng).unwrap();
        let restored: GameRng = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.seed(), 99);
    }
}
