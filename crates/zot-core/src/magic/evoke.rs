//! Evoked casting: wands and XP-charged evokers.
//!
//! Evocations route through the same pipeline as spells with
//! `actual_spell` false: no failure roll, no casting conducts, power from
//! the Evocations skill. XP evokers recharge by paying off an experience
//! debt instead of holding static charges.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use crate::board::{Board, Coord};
use crate::magic::cast::{can_cast_spells, your_spells, CastResult, SpellOutcome};
use crate::magic::spell::Spell;
use crate::player::skills::SkillType;
use crate::player::you::You;
use crate::rng::GameRng;

/// XP-charged evokers
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter,
)]
#[repr(u8)]
pub enum Evoker {
    LightningRod = 0,
    EmberPhial = 1,
    GlacialCore = 2,
}

impl Evoker {
    /// The spell this evoker discharges
    pub const fn spell(&self) -> Spell {
        match self {
            Evoker::LightningRod => Spell::LightningBolt,
            Evoker::EmberPhial => Spell::Fireball,
            Evoker::GlacialCore => Spell::Refrigeration,
        }
    }

    /// Experience debt paid to recharge one use
    pub const fn charge_xp_debt(&self) -> i32 {
        match self {
            Evoker::LightningRod => 80,
            Evoker::EmberPhial => 180,
            Evoker::GlacialCore => 250,
        }
    }

    pub const fn max_charges(&self) -> i32 {
        match self {
            Evoker::LightningRod => 4,
            Evoker::EmberPhial => 1,
            Evoker::GlacialCore => 1,
        }
    }

    /// Message when the evoker finishes recharging
    pub const fn recharge_msg(&self) -> &'static str {
        match self {
            Evoker::LightningRod => "The rod hums, charged and ready.",
            Evoker::EmberPhial => "Embers swirl in the phial, refilled and ready to use.",
            Evoker::GlacialCore => "The core grows cold again, ready to use.",
        }
    }
}

/// Charge state of one carried evoker
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct EvokerCharges {
    pub evoker: Evoker,
    pub charges: i32,
    /// XP still owed before the next charge returns
    pub debt: i32,
}

impl EvokerCharges {
    pub fn new(evoker: Evoker) -> Self {
        Self {
            evoker,
            charges: evoker.max_charges(),
            debt: 0,
        }
    }

    pub fn ready(&self) -> bool {
        self.charges > 0
    }

    /// Spend a charge and take on its recharge debt
    pub fn discharge(&mut self) -> bool {
        if self.charges == 0 {
            return false;
        }
        self.charges -= 1;
        self.debt += self.evoker.charge_xp_debt();
        true
    }

    /// Pay experience toward the debt. Returns the recharge message when a
    /// charge comes back.
    pub fn pay_xp(&mut self, xp: i32) -> Option<&'static str> {
        if self.debt == 0 {
            return None;
        }
        self.debt = (self.debt - xp).max(0);
        let owed_charges = self.evoker.max_charges() - self.charges;
        if self.debt < self.evoker.charge_xp_debt() * (owed_charges - 1).max(0) + 1
            && self.charges < self.evoker.max_charges()
        {
            self.charges += 1;
            return Some(self.evoker.recharge_msg());
        }
        None
    }
}

/// Power of an evoked effect, from the Evocations skill
pub fn evoker_power(you: &You) -> i32 {
    5 + you.skill(SkillType::Evocations, 3)
}

/// Evoke a charged item, discharging its spell through the pipeline.
pub fn evoke_item(
    you: &mut You,
    board: &mut Board,
    rng: &mut GameRng,
    charges: &mut EvokerCharges,
    target: Option<Coord>,
) -> CastResult {
    if let Err(reason) = can_cast_spells(you) {
        // evoking is blocked by the same incapacities as casting
        let mut result = CastResult::default();
        result.outcome = SpellOutcome::Abort;
        result.messages.push(reason);
        return result;
    }
    if !charges.ready() {
        let mut result = CastResult::default();
        result.outcome = SpellOutcome::Abort;
        result
            .messages
            .push("That is presently inert.".to_string());
        return result;
    }

    let power = evoker_power(you);
    let mut result = your_spells(
        you,
        board,
        rng,
        charges.evoker.spell(),
        power,
        false,
        target,
        false,
    );
    if result.outcome == SpellOutcome::Success {
        charges.discharge();
        result
            .messages
            .insert(0, "You feel a surge of power from the device!".to_string());
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::monster::{Monster, MonsterId};
    use crate::player::duration::Duration;

    #[test]
    fn test_discharge_and_recharge_cycle() {
        let mut charges = EvokerCharges::new(Evoker::EmberPhial);
        assert!(charges.ready());
        assert!(charges.discharge());
        assert!(!charges.ready());
        assert!(!charges.discharge());

        assert!(charges.pay_xp(100).is_none());
        let msg = charges.pay_xp(100);
        assert_eq!(msg, Some(Evoker::EmberPhial.recharge_msg()));
        assert!(charges.ready());
    }

    #[test]
    fn test_multi_charge_rod() {
        let mut charges = EvokerCharges::new(Evoker::LightningRod);
        assert!(charges.discharge());
        assert!(charges.discharge());
        assert_eq!(charges.charges, 2);
        assert_eq!(charges.debt, 160);
    }

    #[test]
    fn test_evoke_spends_no_mana_and_no_conduct() {
        let mut you = You::default();
        you.pos = Coord::new(10, 10);
        let mut board = Board::new(30, 30);
        board
            .monsters
            .push(Monster::new(MonsterId(1), "orc", Coord::new(13, 10), 10));
        let mut rng = GameRng::new(2);
        let mut charges = EvokerCharges::new(Evoker::LightningRod);
        let mp_before = you.mp;

        let result = evoke_item(&mut you, &mut board, &mut rng, &mut charges, None);
        assert_eq!(result.outcome, SpellOutcome::Success);
        assert_eq!(you.mp, mp_before);
        assert_eq!(charges.charges, 3);
        // evoking is not spellcasting in the eyes of the gods
        assert!(you.religion.log.is_empty());
    }

    #[test]
    fn test_evoke_blocked_while_berserk() {
        let mut you = You::default();
        you.durations.set(Duration::Berserk, 5);
        let mut board = Board::new(30, 30);
        let mut rng = GameRng::new(2);
        let mut charges = EvokerCharges::new(Evoker::LightningRod);
        let result = evoke_item(&mut you, &mut board, &mut rng, &mut charges, None);
        assert_eq!(result.outcome, SpellOutcome::Abort);
        assert_eq!(charges.charges, 4);
    }
}
