//! Transient player durations.
//!
//! Timed statuses the casting pipeline reads and writes, stored as a
//! parallel timeout array indexed by the duration enum.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

/// Duration types
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter,
)]
#[repr(u8)]
pub enum Duration {
    // States that gate casting entirely
    Berserk = 0,
    Confusion = 1,
    Silenced = 2,
    NoCast = 3,
    WaterHold = 4,

    // Spell power modifiers
    Horror = 5,
    Enkindled = 6,
    DiminishedSpells = 7,
    Brilliance = 8,

    // Cast side effects
    SapMagic = 9,
    EphemeralShield = 10,

    // Self-enchantments
    Swiftness = 11,
    FrostArmour = 12,
    DeathChannel = 13,
}

impl Duration {
    pub const LAST: Duration = Duration::DeathChannel;
}

/// Timeout array for all durations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DurationSet {
    timeouts: Vec<u32>,
}

impl Default for DurationSet {
    fn default() -> Self {
        Self {
            timeouts: vec![0; Duration::LAST as usize + 1],
        }
    }
}

impl DurationSet {
    pub fn has(&self, dur: Duration) -> bool {
        self.timeouts[dur as usize] > 0
    }

    pub fn remaining(&self, dur: Duration) -> u32 {
        self.timeouts[dur as usize]
    }

    /// Set a duration outright
    pub fn set(&mut self, dur: Duration, turns: u32) {
        self.timeouts[dur as usize] = turns;
    }

    /// Extend a duration, never shortening an existing one
    pub fn increase(&mut self, dur: Duration, turns: u32) {
        let slot = &mut self.timeouts[dur as usize];
        *slot = (*slot).saturating_add(turns);
    }

    pub fn clear(&mut self, dur: Duration) {
        self.timeouts[dur as usize] = 0;
    }

    /// Decrement every active duration by one turn; returns the durations
    /// that expired this tick.
    pub fn tick(&mut self) -> Vec<Duration> {
        let mut expired = Vec::new();
        for (i, timeout) in self.timeouts.iter_mut().enumerate() {
            if *timeout > 0 {
                *timeout -= 1;
                if *timeout == 0 {
                    // index always round-trips: the vec is sized off the enum
                    if let Some(dur) = duration_from_index(i) {
                        expired.push(dur);
                    }
                }
            }
        }
        expired
    }
}

fn duration_from_index(i: usize) -> Option<Duration> {
    use strum::IntoEnumIterator;
    Duration::iter().find(|d| *d as usize == i)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_query() {
        let mut durs = DurationSet::default();
        assert!(!durs.has(Duration::Horror));
        durs.set(Duration::Horror, 3);
        assert!(durs.has(Duration::Horror));
        assert_eq!(durs.remaining(Duration::Horror), 3);
    }

    #[test]
    fn test_increase_extends() {
        let mut durs = DurationSet::default();
        durs.set(Duration::Brilliance, 2);
        durs.increase(Duration::Brilliance, 5);
        assert_eq!(durs.remaining(Duration::Brilliance), 7);
    }

    #[test]
    fn test_tick_reports_expiry() {
        let mut durs = DurationSet::default();
        durs.set(Duration::Swiftness, 1);
        durs.set(Duration::SapMagic, 2);
        let expired = durs.tick();
        assert_eq!(expired, vec![Duration::Swiftness]);
        let expired = durs.tick();
        assert_eq!(expired, vec![Duration::SapMagic]);
        assert!(durs.tick().is_empty());
    }
}
