//! Spell identifiers and their static data.
//!
//! Every spell is described by a handful of `const fn` tables: schools,
//! flags, difficulty level, mana cost, noise, power cap and range. The
//! rest of the pipeline is driven entirely off these.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use strum::EnumIter;

use crate::consts::LOS_RADIUS;

bitflags! {
    /// Spell schools; most spells belong to one or two
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct SpellSchools: u16 {
        const CONJURATION   = 0x0001;
        const HEXES         = 0x0002;
        const FIRE          = 0x0004;
        const ICE           = 0x0008;
        const AIR           = 0x0010;
        const EARTH         = 0x0020;
        const NECROMANCY    = 0x0040;
        const SUMMONING     = 0x0080;
        const TRANSLOCATION = 0x0100;
        const ALCHEMY       = 0x0200;
    }
}

impl SpellSchools {
    /// All single schools, for iteration
    pub const ALL: [SpellSchools; 10] = [
        SpellSchools::CONJURATION,
        SpellSchools::HEXES,
        SpellSchools::FIRE,
        SpellSchools::ICE,
        SpellSchools::AIR,
        SpellSchools::EARTH,
        SpellSchools::NECROMANCY,
        SpellSchools::SUMMONING,
        SpellSchools::TRANSLOCATION,
        SpellSchools::ALCHEMY,
    ];

    pub fn name(self) -> &'static str {
        if self == SpellSchools::CONJURATION {
            "Conjuration"
        } else if self == SpellSchools::HEXES {
            "Hexes"
        } else if self == SpellSchools::FIRE {
            "Fire"
        } else if self == SpellSchools::ICE {
            "Ice"
        } else if self == SpellSchools::AIR {
            "Air"
        } else if self == SpellSchools::EARTH {
            "Earth"
        } else if self == SpellSchools::NECROMANCY {
            "Necromancy"
        } else if self == SpellSchools::SUMMONING {
            "Summoning"
        } else if self == SpellSchools::TRANSLOCATION {
            "Translocation"
        } else if self == SpellSchools::ALCHEMY {
            "Alchemy"
        } else {
            "None"
        }
    }
}

impl Serialize for SpellSchools {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.bits().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for SpellSchools {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let bits = u16::deserialize(deserializer)?;
        Ok(SpellSchools::from_bits_truncate(bits))
    }
}

bitflags! {
    /// Per-spell behaviour flags
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct SpellFlags: u16 {
        /// Aimed along a path toward a target
        const DIR_OR_TARGET = 0x0001;
        /// Aimed at a cell directly, ignoring the path
        const TARGET        = 0x0002;
        /// Affects an area rather than a single actor
        const AREA          = 0x0004;
        /// Enchantment on the caster
        const SELFENCH      = 0x0008;
        /// Beneficial; aimed at friends
        const HELPFUL       = 0x0010;
        /// Refuses to target the caster
        const NOT_SELF      = 0x0020;
        /// Checked against target willpower
        const WL_CHECK      = 0x0040;
        /// Deals direct damage
        const DESTRUCTIVE   = 0x0080;
        /// Persists across turns while channelled
        const CHANNELLED    = 0x0100;
        /// Usable by monsters only; fatal in the player pipeline
        const MONSTER       = 0x0200;
        /// Warps flesh or reality; chaotic conduct
        const CHAOTIC       = 0x0400;
        /// Corrupts living bodies; unclean conduct
        const UNCLEAN       = 0x0800;
        /// Accelerates the caster; hasty conduct
        const HASTY         = 0x1000;
        /// Union of the aimed-flag bits
        const TARGETING_MASK = Self::DIR_OR_TARGET.bits() | Self::TARGET.bits();
    }
}

impl Serialize for SpellFlags {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.bits().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for SpellFlags {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let bits = u16::deserialize(deserializer)?;
        Ok(SpellFlags::from_bits_truncate(bits))
    }
}

/// Spell identifiers
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter,
)]
#[repr(u8)]
pub enum Spell {
    // Conjurations
    MagicDart = 0,
    SearingRay = 1,
    MysticBlast = 2,
    Fireball = 3,
    LightningBolt = 4,
    FlameWave = 5,
    FireStorm = 6,
    Glaciate = 7,
    ChainLightning = 8,
    GalvanicCoupling = 9,
    Irradiate = 10,
    MephiticCloud = 11,
    StickyFlame = 12,

    // Ice
    Freeze = 13,
    FrostArmour = 14,
    Refrigeration = 15,
    PolarVortex = 16,

    // Hexes
    ConfusingTouch = 17,
    Slow = 18,
    Confuse = 19,
    CauseFear = 20,
    Silence = 21,

    // Translocations
    Blink = 22,
    TeleportOther = 23,
    Passwall = 24,

    // Earth
    Dig = 25,

    // Air
    Swiftness = 26,
    Airstrike = 27,

    // Summonings
    SummonSmallMammal = 28,
    CallImp = 29,
    SummonIceBeast = 30,

    // Necromancy
    Pain = 31,
    SublimationOfBlood = 32,
    VampiricDraining = 33,
    AnimateDead = 34,
    DeathChannel = 35,
    Revivification = 36,

    // Monster-only
    VenomSpit = 37,
}

impl Spell {
    /// Display name
    pub const fn title(&self) -> &'static str {
        match self {
            Spell::MagicDart => "Magic Dart",
            Spell::SearingRay => "Searing Ray",
            Spell::MysticBlast => "Mystic Blast",
            Spell::Fireball => "Fireball",
            Spell::LightningBolt => "Lightning Bolt",
            Spell::FlameWave => "Flame Wave",
            Spell::FireStorm => "Fire Storm",
            Spell::Glaciate => "Glaciate",
            Spell::ChainLightning => "Chain Lightning",
            Spell::GalvanicCoupling => "Galvanic Coupling",
            Spell::Irradiate => "Irradiate",
            Spell::MephiticCloud => "Mephitic Cloud",
            Spell::StickyFlame => "Sticky Flame",
            Spell::Freeze => "Freeze",
            Spell::FrostArmour => "Frost Armour",
            Spell::Refrigeration => "Refrigeration",
            Spell::PolarVortex => "Polar Vortex",
            Spell::ConfusingTouch => "Confusing Touch",
            Spell::Slow => "Slow",
            Spell::Confuse => "Confuse",
            Spell::CauseFear => "Cause Fear",
            Spell::Silence => "Silence",
            Spell::Blink => "Blink",
            Spell::TeleportOther => "Teleport Other",
            Spell::Passwall => "Passwall",
            Spell::Dig => "Dig",
            Spell::Swiftness => "Swiftness",
            Spell::Airstrike => "Airstrike",
            Spell::SummonSmallMammal => "Summon Small Mammal",
            Spell::CallImp => "Call Imp",
            Spell::SummonIceBeast => "Summon Ice Beast",
            Spell::Pain => "Pain",
            Spell::SublimationOfBlood => "Sublimation of Blood",
            Spell::VampiricDraining => "Vampiric Draining",
            Spell::AnimateDead => "Animate Dead",
            Spell::DeathChannel => "Death Channel",
            Spell::Revivification => "Revivification",
            Spell::VenomSpit => "Venom Spit",
        }
    }

    /// School membership
    pub const fn schools(&self) -> SpellSchools {
        match self {
            Spell::MagicDart | Spell::SearingRay | Spell::MysticBlast => SpellSchools::CONJURATION,
            Spell::Fireball | Spell::FlameWave | Spell::FireStorm => {
                SpellSchools::CONJURATION.union(SpellSchools::FIRE)
            }
            Spell::LightningBolt | Spell::ChainLightning | Spell::GalvanicCoupling => {
                SpellSchools::CONJURATION.union(SpellSchools::AIR)
            }
            Spell::Glaciate => SpellSchools::CONJURATION.union(SpellSchools::ICE),
            Spell::Irradiate => SpellSchools::CONJURATION.union(SpellSchools::ALCHEMY),
            Spell::MephiticCloud => SpellSchools::AIR.union(SpellSchools::ALCHEMY),
            Spell::StickyFlame => SpellSchools::FIRE.union(SpellSchools::ALCHEMY),
            Spell::Freeze | Spell::FrostArmour | Spell::Refrigeration | Spell::PolarVortex => {
                SpellSchools::ICE
            }
            Spell::ConfusingTouch | Spell::Slow | Spell::Confuse | Spell::CauseFear => {
                SpellSchools::HEXES
            }
            Spell::Silence => SpellSchools::HEXES.union(SpellSchools::AIR),
            Spell::Blink | Spell::TeleportOther => SpellSchools::TRANSLOCATION,
            Spell::Passwall => SpellSchools::TRANSLOCATION.union(SpellSchools::EARTH),
            Spell::Dig => SpellSchools::EARTH,
            Spell::Swiftness | Spell::Airstrike => SpellSchools::AIR,
            Spell::SummonSmallMammal | Spell::CallImp => SpellSchools::SUMMONING,
            Spell::SummonIceBeast => SpellSchools::SUMMONING.union(SpellSchools::ICE),
            Spell::Pain
            | Spell::SublimationOfBlood
            | Spell::VampiricDraining
            | Spell::AnimateDead
            | Spell::DeathChannel
            | Spell::Revivification => SpellSchools::NECROMANCY,
            Spell::VenomSpit => SpellSchools::ALCHEMY,
        }
    }

    /// Behaviour flags
    pub const fn flags(&self) -> SpellFlags {
        match self {
            Spell::MagicDart | Spell::LightningBolt | Spell::StickyFlame => {
                SpellFlags::DIR_OR_TARGET.union(SpellFlags::DESTRUCTIVE)
            }
            Spell::SearingRay => SpellFlags::DIR_OR_TARGET
                .union(SpellFlags::DESTRUCTIVE)
                .union(SpellFlags::CHANNELLED),
            Spell::MysticBlast | Spell::Refrigeration | Spell::PolarVortex => {
                SpellFlags::AREA.union(SpellFlags::DESTRUCTIVE)
            }
            Spell::Fireball | Spell::MephiticCloud => SpellFlags::DIR_OR_TARGET
                .union(SpellFlags::AREA)
                .union(SpellFlags::DESTRUCTIVE),
            Spell::FlameWave => SpellFlags::AREA
                .union(SpellFlags::DESTRUCTIVE)
                .union(SpellFlags::CHANNELLED),
            Spell::FireStorm | Spell::Glaciate => SpellFlags::TARGET
                .union(SpellFlags::AREA)
                .union(SpellFlags::DESTRUCTIVE),
            Spell::ChainLightning => SpellFlags::AREA.union(SpellFlags::DESTRUCTIVE),
            Spell::GalvanicCoupling => {
                SpellFlags::DESTRUCTIVE.union(SpellFlags::CHANNELLED)
            }
            Spell::Irradiate => SpellFlags::AREA
                .union(SpellFlags::DESTRUCTIVE)
                .union(SpellFlags::CHAOTIC),
            Spell::Freeze => SpellFlags::DIR_OR_TARGET
                .union(SpellFlags::DESTRUCTIVE)
                .union(SpellFlags::NOT_SELF),
            Spell::FrostArmour | Spell::DeathChannel => {
                SpellFlags::SELFENCH.union(SpellFlags::HELPFUL)
            }
            Spell::ConfusingTouch => SpellFlags::DIR_OR_TARGET
                .union(SpellFlags::WL_CHECK)
                .union(SpellFlags::NOT_SELF),
            Spell::Slow | Spell::Confuse => SpellFlags::DIR_OR_TARGET
                .union(SpellFlags::WL_CHECK)
                .union(SpellFlags::NOT_SELF),
            Spell::CauseFear => SpellFlags::AREA.union(SpellFlags::WL_CHECK),
            Spell::Silence => SpellFlags::AREA,
            Spell::Blink => SpellFlags::SELFENCH,
            Spell::TeleportOther => SpellFlags::DIR_OR_TARGET
                .union(SpellFlags::WL_CHECK)
                .union(SpellFlags::NOT_SELF),
            Spell::Passwall | Spell::Dig => SpellFlags::TARGET,
            Spell::Swiftness => SpellFlags::SELFENCH
                .union(SpellFlags::HELPFUL)
                .union(SpellFlags::HASTY),
            Spell::Airstrike => SpellFlags::TARGET
                .union(SpellFlags::DESTRUCTIVE)
                .union(SpellFlags::NOT_SELF),
            Spell::SummonSmallMammal | Spell::CallImp | Spell::SummonIceBeast => {
                SpellFlags::SELFENCH
            }
            Spell::Pain => SpellFlags::DIR_OR_TARGET
                .union(SpellFlags::DESTRUCTIVE)
                .union(SpellFlags::WL_CHECK)
                .union(SpellFlags::NOT_SELF),
            Spell::SublimationOfBlood | Spell::Revivification => SpellFlags::SELFENCH,
            Spell::VampiricDraining => SpellFlags::DIR_OR_TARGET
                .union(SpellFlags::DESTRUCTIVE)
                .union(SpellFlags::UNCLEAN)
                .union(SpellFlags::NOT_SELF),
            Spell::AnimateDead => SpellFlags::AREA,
            Spell::VenomSpit => SpellFlags::DIR_OR_TARGET
                .union(SpellFlags::DESTRUCTIVE)
                .union(SpellFlags::MONSTER),
        }
    }

    /// Difficulty level, 1..=9; also the mana cost
    pub const fn level(&self) -> i32 {
        match self {
            Spell::MagicDart
            | Spell::Freeze
            | Spell::ConfusingTouch
            | Spell::Blink
            | Spell::SummonSmallMammal
            | Spell::Pain => 1,
            Spell::SearingRay
            | Spell::Slow
            | Spell::Swiftness
            | Spell::CallImp
            | Spell::SublimationOfBlood => 2,
            Spell::MephiticCloud
            | Spell::Confuse
            | Spell::TeleportOther
            | Spell::Passwall
            | Spell::FrostArmour
            | Spell::VampiricDraining => 3,
            Spell::MysticBlast
            | Spell::FlameWave
            | Spell::StickyFlame
            | Spell::CauseFear
            | Spell::Dig
            | Spell::Airstrike
            | Spell::SummonIceBeast
            | Spell::AnimateDead => 4,
            Spell::Fireball | Spell::LightningBolt | Spell::Irradiate | Spell::Silence => 5,
            Spell::Refrigeration | Spell::DeathChannel => 6,
            Spell::Revivification => 8,
            Spell::FireStorm
            | Spell::Glaciate
            | Spell::ChainLightning
            | Spell::GalvanicCoupling
            | Spell::PolarVortex => 9,
            Spell::VenomSpit => 3,
        }
    }

    /// Mana cost to cast
    pub const fn mana_cost(&self) -> i32 {
        self.level()
    }

    /// Maximum useful spell power; 0 means power is not used
    pub const fn power_cap(&self) -> i32 {
        match self {
            Spell::MagicDart | Spell::Freeze | Spell::SummonSmallMammal => 25,
            Spell::SearingRay | Spell::ConfusingTouch | Spell::VenomSpit => 50,
            Spell::MysticBlast
            | Spell::MephiticCloud
            | Spell::FlameWave
            | Spell::StickyFlame
            | Spell::FrostArmour
            | Spell::Passwall
            | Spell::Dig
            | Spell::CallImp
            | Spell::SummonIceBeast
            | Spell::Pain
            | Spell::SublimationOfBlood
            | Spell::Swiftness
            | Spell::AnimateDead
            | Spell::DeathChannel => 100,
            Spell::Fireball | Spell::LightningBolt => 150,
            Spell::Irradiate
            | Spell::Slow
            | Spell::Confuse
            | Spell::CauseFear
            | Spell::Silence
            | Spell::TeleportOther
            | Spell::VampiricDraining
            | Spell::Refrigeration
            | Spell::Airstrike
            | Spell::FireStorm
            | Spell::Glaciate
            | Spell::ChainLightning
            | Spell::PolarVortex
            | Spell::GalvanicCoupling => 200,
            Spell::Blink | Spell::Revivification => 0,
        }
    }

    /// Noise made at the moment of casting
    pub const fn casting_noise(&self) -> i32 {
        match self {
            Spell::Silence | Spell::Blink => 0,
            _ => self.level(),
        }
    }

    /// Noise made by the spell's effect, at the affected cells
    pub const fn effect_noise(&self) -> i32 {
        match self {
            Spell::LightningBolt | Spell::ChainLightning | Spell::FireStorm => 25,
            Spell::Fireball | Spell::PolarVortex | Spell::GalvanicCoupling => 15,
            Spell::Glaciate => 9,
            Spell::Airstrike => 4,
            _ => 0,
        }
    }

    /// Reach in cells at the given power. For burst spells this is the
    /// radius; for self-enchantments it is 0.
    pub fn range(&self, power: i32) -> i32 {
        match self {
            Spell::MagicDart
            | Spell::Slow
            | Spell::Confuse
            | Spell::CauseFear
            | Spell::TeleportOther
            | Spell::Pain
            | Spell::Refrigeration
            | Spell::ChainLightning
            | Spell::GalvanicCoupling
            | Spell::AnimateDead
            | Spell::Airstrike => LOS_RADIUS,
            Spell::SearingRay | Spell::MephiticCloud | Spell::Dig | Spell::FlameWave => 4,
            Spell::Fireball | Spell::LightningBolt | Spell::FireStorm | Spell::VenomSpit => 5,
            Spell::Glaciate => 6,
            Spell::PolarVortex => 5,
            Spell::MysticBlast => 2,
            Spell::Irradiate => 1,
            Spell::StickyFlame | Spell::Freeze | Spell::VampiricDraining => 1,
            Spell::ConfusingTouch => 1,
            Spell::Silence => (2 + power / 30).min(5),
            Spell::Passwall => (1 + power / 25).min(5),
            Spell::SummonSmallMammal | Spell::CallImp | Spell::SummonIceBeast => 2,
            Spell::Blink
            | Spell::FrostArmour
            | Spell::Swiftness
            | Spell::SublimationOfBlood
            | Spell::DeathChannel
            | Spell::Revivification => 0,
        }
    }

    /// Does range (or radius) grow with power?
    pub const fn has_variable_range(&self) -> bool {
        matches!(self, Spell::Silence | Spell::Passwall)
    }

    /// Destructive, non-channelled spells surge while enkindled
    pub fn can_be_enkindled(&self) -> bool {
        let flags = self.flags();
        flags.contains(SpellFlags::DESTRUCTIVE) && !flags.contains(SpellFlags::CHANNELLED)
    }

    /// Evil in the eyes of the good gods
    pub fn is_evil(&self) -> bool {
        self.schools().contains(SpellSchools::NECROMANCY)
    }

    pub fn is_unclean(&self) -> bool {
        self.flags().contains(SpellFlags::UNCLEAN)
    }

    pub fn is_chaotic(&self) -> bool {
        self.flags().contains(SpellFlags::CHAOTIC)
    }

    pub fn is_hasty(&self) -> bool {
        self.flags().contains(SpellFlags::HASTY)
    }

    /// Slash-separated school names for display
    pub fn schools_string(&self) -> String {
        let schools = self.schools();
        let names: Vec<&str> = SpellSchools::ALL
            .iter()
            .filter(|s| schools.contains(**s))
            .map(|s| s.name())
            .collect();
        names.join("/")
    }
}

impl core::fmt::Display for Spell {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.title())
    }
}

/// Noise descriptions by loudness, quietest first
pub fn noise_string(noise: i32) -> &'static str {
    const BREAKPOINTS: [i32; 7] = [1, 2, 4, 8, 15, 20, 30];
    const DESCRIPTIONS: [&str; 8] = [
        "Silent",
        "Almost silent",
        "Quiet",
        "A bit loud",
        "Loud",
        "Very loud",
        "Extremely loud",
        "Deafening",
    ];
    let rank = BREAKPOINTS.iter().filter(|&&b| noise >= b).count();
    DESCRIPTIONS[rank]
}

/// The larger of casting and effect noise, described
pub fn spell_noise_string(spell: Spell) -> &'static str {
    noise_string(spell.casting_noise().max(spell.effect_noise()))
}
