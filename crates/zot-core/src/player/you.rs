//! The player character.
//!
//! `You` is the caster-side state the pipeline reads and writes: health
//! and mana, stats, skills, mutations, durations, religion, the
//! channelling attribute and the enhancer summary of worn equipment.
//! Inventory and equipment themselves live outside this crate; only
//! their casting-relevant totals are mirrored here.

use serde::{Deserialize, Serialize};

use crate::board::Coord;
use crate::magic::channel::ChannelState;
use crate::magic::spell::{Spell, SpellSchools};
use crate::player::conduct::Religion;
use crate::player::duration::{Duration, DurationSet};
use crate::player::free_action::FreeActions;
use crate::player::mutation::{Mutation, MutationSet};
use crate::player::skills::{SkillSet, SkillType};
use crate::player::stats::StatSet;

/// Spell-power enhancers worn or innate, summarised per school.
///
/// Positive counts enhance, negative counts suppress; each level is worth
/// three points of spell power before the cap.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct EnhancerGear {
    pub fire: i32,
    pub ice: i32,
    pub air: i32,
    pub earth: i32,
    pub hexes: i32,
    pub necromancy: i32,
    pub summoning: i32,
    pub translocation: i32,
    /// Robe of the Archmagi and equivalents: enhances everything
    pub archmagi: i32,
    /// Items that sometimes refund the mana of a cast
    pub channelling_sources: i32,
}

impl EnhancerGear {
    /// Enhancer levels applying to a school set
    pub fn for_schools(&self, schools: SpellSchools) -> i32 {
        let mut enhanced = 0;
        if schools.contains(SpellSchools::FIRE) {
            enhanced += self.fire;
        }
        if schools.contains(SpellSchools::ICE) {
            enhanced += self.ice;
        }
        if schools.contains(SpellSchools::AIR) {
            enhanced += self.air;
        }
        if schools.contains(SpellSchools::EARTH) {
            enhanced += self.earth;
        }
        if schools.contains(SpellSchools::HEXES) {
            enhanced += self.hexes;
        }
        if schools.contains(SpellSchools::NECROMANCY) {
            enhanced += self.necromancy;
        }
        if schools.contains(SpellSchools::SUMMONING) {
            enhanced += self.summoning;
        }
        if schools.contains(SpellSchools::TRANSLOCATION) {
            enhanced += self.translocation;
        }
        enhanced + self.archmagi
    }
}

/// The player
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct You {
    pub pos: Coord,

    // Health and mana
    pub hp: i32,
    pub hp_max: i32,
    pub mp: i32,
    pub mp_max: i32,

    pub experience_level: i32,

    pub stats: StatSet,
    pub skills: SkillSet,
    pub mutations: MutationSet,
    pub durations: DurationSet,
    pub religion: Religion,
    pub free_actions: FreeActions,

    // Spell library
    pub spells: Vec<Spell>,
    pub last_cast_spell: Option<Spell>,

    // Casting state
    pub channel: ChannelState,
    pub magic_contamination: i32,
    /// Levels of horror currently suffered; meaningful while the Horror
    /// duration runs
    pub horror_level: i32,
    /// Surges left before the enkindled state burns out
    pub enkindle_charges: i32,
    /// Casting through a divine channel adds Invocations to power
    pub divine_exegesis: bool,

    // Equipment summary
    pub enhancers: EnhancerGear,
    /// Encumbrance from heavy armour; raises spell failure
    pub armour_encumbrance: i32,
    pub can_breathe_water: bool,

    // Zot clock, in turns spent on known floors
    pub zot_clock: i32,
}

impl Default for You {
    fn default() -> Self {
        Self {
            pos: Coord::new(40, 35),
            hp: 20,
            hp_max: 20,
            mp: 10,
            mp_max: 10,
            experience_level: 1,
            stats: StatSet::default(),
            skills: SkillSet::default(),
            mutations: MutationSet::default(),
            durations: DurationSet::default(),
            religion: Religion::default(),
            free_actions: FreeActions::default(),
            spells: Vec::new(),
            last_cast_spell: None,
            channel: ChannelState::default(),
            magic_contamination: 0,
            horror_level: 0,
            enkindle_charges: 0,
            divine_exegesis: false,
            enhancers: EnhancerGear::default(),
            armour_encumbrance: 0,
            can_breathe_water: false,
            zot_clock: 0,
        }
    }
}

impl You {
    /// Skill level times `scale`
    pub fn skill(&self, skill: SkillType, scale: i32) -> i32 {
        self.skills.skill(skill, scale)
    }

    pub fn get_mutation_level(&self, mutation: Mutation) -> i32 {
        self.mutations.level(mutation) as i32
    }

    pub fn set_mutation_level(&mut self, mutation: Mutation, level: u8) {
        self.mutations.set_level(mutation, level);
    }

    pub fn has_spell(&self, spell: Spell) -> bool {
        self.spells.contains(&spell)
    }

    pub fn learn_spell(&mut self, spell: Spell) {
        if !self.has_spell(spell) {
            self.spells.push(spell);
        }
    }

    pub fn spell_count(&self) -> usize {
        self.spells.len()
    }

    pub fn berserk(&self) -> bool {
        self.durations.has(Duration::Berserk)
    }

    pub fn confused(&self) -> bool {
        self.durations.has(Duration::Confusion)
    }

    pub fn silenced(&self) -> bool {
        self.durations.has(Duration::Silenced)
    }

    /// Mana refund sources currently worn
    pub fn channelling_sources(&self) -> i32 {
        self.enhancers.channelling_sources
    }

    /// Can the player afford this mana cost right now? Casters with the
    /// blood-casting mutation pay health instead.
    pub fn can_pay_mana(&self, cost: i32) -> bool {
        if self.get_mutation_level(Mutation::HpCasting) > 0 {
            self.hp > cost
        } else {
            self.mp >= cost
        }
    }

    /// Silently take the mana (or health) for a cast.
    pub fn pay_mana(&mut self, cost: i32) {
        if self.get_mutation_level(Mutation::HpCasting) > 0 {
            self.hp -= cost;
        } else {
            self.mp = (self.mp - cost).max(0);
        }
    }

    /// Return mana taken for an aborted cast.
    pub fn refund_mana(&mut self, cost: i32) {
        if self.get_mutation_level(Mutation::HpCasting) > 0 {
            self.hp = (self.hp + cost).min(self.hp_max);
        } else {
            self.mp = (self.mp + cost).min(self.mp_max);
        }
    }

    pub fn gain_mp(&mut self, amount: i32) {
        self.mp = (self.mp + amount).min(self.mp_max);
    }

    pub fn heal(&mut self, amount: i32) {
        self.hp = (self.hp + amount).min(self.hp_max);
    }

    pub fn hurt(&mut self, amount: i32) {
        self.hp -= amount.max(0);
    }

    pub fn dead(&self) -> bool {
        self.hp <= 0
    }

    /// Raise magical contamination, doubled for the susceptible.
    pub fn contaminate(&mut self, amount: i32) {
        let mul = if self.get_mutation_level(Mutation::ContamSusceptible) > 0 {
            2
        } else {
            1
        };
        self.magic_contamination = (self.magic_contamination + amount * mul).max(0);
    }
}
