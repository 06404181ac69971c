//! Player stats: strength, intelligence, dexterity.
//!
//! Stat queries combine a base value with mutation modifiers and temporary
//! loss. A stat drained to zero applies a per-stat affliction until the
//! stat recovers.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use crate::consts::MAX_STAT_VALUE;
use crate::player::mutation::Mutation;
use crate::player::you::You;
use crate::rng::GameRng;

pub const NUM_STATS: usize = 3;

/// Stat axes
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter,
)]
#[repr(u8)]
pub enum StatType {
    Strength = 0,
    Intelligence = 1,
    Dexterity = 2,
}

impl StatType {
    pub const ALL: [StatType; NUM_STATS] = [
        StatType::Strength,
        StatType::Intelligence,
        StatType::Dexterity,
    ];

    /// Pick a random stat
    pub fn random(rng: &mut GameRng) -> StatType {
        Self::ALL[rng.random2(NUM_STATS as i32) as usize]
    }
}

/// Which flavour of message to use for a stat change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatDesc {
    Name,
    Lost,
    Decrease,
    Increase,
}

static STAT_DESCS: [[&str; 4]; NUM_STATS] = [
    ["strength", "weakened", "weaker", "stronger"],
    ["intelligence", "dopey", "stupid", "clever"],
    ["dexterity", "clumsy", "clumsy", "agile"],
];

pub fn stat_desc(stat: StatType, desc: StatDesc) -> &'static str {
    STAT_DESCS[stat as usize][desc as usize]
}

/// Affliction applied while the matching stat sits at zero
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[repr(u8)]
pub enum StatZeroEffect {
    /// Str 0: too weak to move freely
    Collapse = 0,
    /// Int 0: cannot cast or read
    Brainless = 1,
    /// Dex 0: constant fumbling
    Clumsy = 2,
}

impl StatZeroEffect {
    pub const fn for_stat(stat: StatType) -> StatZeroEffect {
        match stat {
            StatType::Strength => StatZeroEffect::Collapse,
            StatType::Intelligence => StatZeroEffect::Brainless,
            StatType::Dexterity => StatZeroEffect::Clumsy,
        }
    }
}

/// Base values, temporary drain and zero-stat state for all three axes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatSet {
    base: [i32; NUM_STATS],
    loss: [i32; NUM_STATS],
    zeroed: [bool; NUM_STATS],
}

impl Default for StatSet {
    fn default() -> Self {
        Self {
            base: [10; NUM_STATS],
            loss: [0; NUM_STATS],
            zeroed: [false; NUM_STATS],
        }
    }
}

impl StatSet {
    pub fn base(&self, stat: StatType) -> i32 {
        self.base[stat as usize]
    }

    pub fn set_base(&mut self, stat: StatType, value: i32) {
        self.base[stat as usize] = value;
    }

    pub fn loss(&self, stat: StatType) -> i32 {
        self.loss[stat as usize]
    }

    pub fn is_zeroed(&self, stat: StatType) -> bool {
        self.zeroed[stat as usize]
    }

    fn set_zeroed(&mut self, stat: StatType, flag: bool) {
        self.zeroed[stat as usize] = flag;
    }
}

/// Mutation-driven stat modifier
fn stat_modifier(you: &You, stat: StatType) -> i32 {
    match stat {
        StatType::Strength => 2 * you.get_mutation_level(Mutation::Strong),
        StatType::Intelligence => 2 * you.get_mutation_level(Mutation::Clever),
        StatType::Dexterity => 2 * you.get_mutation_level(Mutation::Agile),
    }
}

/// The player's value for a stat: base plus modifiers minus drain, capped.
///
/// `nonneg` floors the result at zero for callers that feed it into
/// formulas that cannot take negative inputs.
pub fn stat(you: &You, s: StatType, nonneg: bool) -> i32 {
    let val =
        (you.stats.base(s) + stat_modifier(you, s) - you.stats.loss(s)).min(MAX_STAT_VALUE);
    if nonneg { val.max(0) } else { val }
}

/// Base stat including innate modifiers, but no temporary drain
pub fn innate_stat(you: &You, s: StatType) -> i32 {
    (you.stats.base(s) + stat_modifier(you, s)).min(MAX_STAT_VALUE)
}

/// Permanently modify a base stat. Returns the message to show.
pub fn modify_stat(you: &mut You, which: StatType, amount: i32) -> Option<String> {
    if amount == 0 {
        return None;
    }
    let desc = if amount > 0 {
        StatDesc::Increase
    } else {
        StatDesc::Decrease
    };
    let base = you.stats.base(which);
    you.stats.set_base(which, base + amount);
    handle_stat_change(you, which);
    Some(format!("You feel {}.", stat_desc(which, desc)))
}

/// Apply temporary stat drain. Returns the message to show, or None if the
/// drain was fully resisted.
pub fn lose_stat(you: &mut You, which: StatType, amount: i32) -> Option<String> {
    if amount <= 0 {
        return None;
    }
    let loss = you.stats.loss[which as usize] + amount;
    you.stats.loss[which as usize] = loss;
    handle_stat_change(you, which);
    Some(format!("You feel {}.", stat_desc(which, StatDesc::Lost)))
}

/// Recover `amount` points of drain (all of it if `amount` is None).
/// Returns true if anything was restored.
pub fn restore_stat(you: &mut You, which: StatType, amount: Option<i32>) -> bool {
    let cur = you.stats.loss[which as usize];
    if cur == 0 {
        return false;
    }
    let restored = amount.unwrap_or(cur).clamp(0, cur);
    if restored == 0 {
        return false;
    }
    you.stats.loss[which as usize] = cur - restored;
    handle_stat_change(you, which);
    true
}

fn handle_stat_change(you: &mut You, which: StatType) {
    if stat(you, which, false) <= 0 {
        you.stats.set_zeroed(which, true);
    } else if you.stats.is_zeroed(which) {
        you.stats.set_zeroed(which, false);
    }
}

/// Active zero-stat afflictions
pub fn stat_zero_effects(you: &You) -> Vec<StatZeroEffect> {
    StatType::ALL
        .iter()
        .filter(|&&s| you.stats.is_zeroed(s))
        .map(|&s| StatZeroEffect::for_stat(s))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stat_query_floors_and_caps() {
        let mut you = You::default();
        you.stats.set_base(StatType::Strength, 500);
        assert_eq!(stat(&you, StatType::Strength, false), MAX_STAT_VALUE);

        you.stats.set_base(StatType::Dexterity, 2);
        lose_stat(&mut you, StatType::Dexterity, 10);
        assert_eq!(stat(&you, StatType::Dexterity, true), 0);
        assert_eq!(stat(&you, StatType::Dexterity, false), -8);
    }

    #[test]
    fn test_mutation_modifier_feeds_stat() {
        let mut you = You::default();
        let base = stat(&you, StatType::Intelligence, false);
        you.set_mutation_level(Mutation::Clever, 2);
        assert_eq!(stat(&you, StatType::Intelligence, false), base + 4);
        // drain ignores the innate part
        assert_eq!(innate_stat(&you, StatType::Intelligence), base + 4);
    }

    #[test]
    fn test_zero_stat_affliction_tracks_recovery() {
        let mut you = You::default();
        you.stats.set_base(StatType::Strength, 4);
        lose_stat(&mut you, StatType::Strength, 4);
        assert!(you.stats.is_zeroed(StatType::Strength));
        assert_eq!(stat_zero_effects(&you), vec![StatZeroEffect::Collapse]);

        assert!(restore_stat(&mut you, StatType::Strength, None));
        assert!(!you.stats.is_zeroed(StatType::Strength));
        assert!(stat_zero_effects(&you).is_empty());
    }

    #[test]
    fn test_restore_partial() {
        let mut you = You::default();
        lose_stat(&mut you, StatType::Intelligence, 5);
        assert!(restore_stat(&mut you, StatType::Intelligence, Some(2)));
        assert_eq!(you.stats.loss(StatType::Intelligence), 3);
        assert!(!restore_stat(&mut you, StatType::Dexterity, None));
    }

    #[test]
    fn test_modify_stat_messages() {
        let mut you = You::default();
        let up = modify_stat(&mut you, StatType::Dexterity, 1).unwrap();
        assert!(up.contains("agile"));
        let down = modify_stat(&mut you, StatType::Strength, -1).unwrap();
        assert!(down.contains("weaker"));
        assert!(modify_stat(&mut you, StatType::Strength, 0).is_none());
    }
}
