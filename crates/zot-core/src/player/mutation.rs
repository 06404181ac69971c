//! Mutation definitions.
//!
//! The static table carries the mechanics the rest of the crate reads:
//! rarity weight, level count, category flags and the gain/lose messages.
//! Longer description text is content and lives with the UI layer.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, IntoEnumIterator};

/// Mutation identifiers
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter,
)]
#[repr(u8)]
pub enum Mutation {
    // Casting interactions
    WildMagic = 0,
    SubduedMagic = 1,
    Augmentation = 2,
    DemonicMagic = 3,
    EphemeralShield = 4,
    HpCasting = 5,
    ContamSusceptible = 6,
    InviolateMagic = 7,

    // Stat mutations
    Strong = 8,
    Clever = 9,
    Agile = 10,

    // Physical texture
    ToughSkin = 11,
}

bitflags! {
    /// Category flags: where a mutation can come from and what it touches
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct MutFlags: u8 {
        const GOOD      = 0x01;
        const BAD       = 0x02;
        /// Tied to body shape; suppressed while transformed
        const ANATOMY   = 0x04;
        /// Tied to body substance
        const SUBSTANCE = 0x08;
    }
}

impl Serialize for MutFlags {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.bits().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for MutFlags {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let bits = u8::deserialize(deserializer)?;
        Ok(MutFlags::from_bits_truncate(bits))
    }
}

/// One row of the mutation table
#[derive(Debug, Clone, Copy)]
pub struct MutationDef {
    pub mutation: Mutation,
    /// Commonality; bigger = offered more often. 0 = never random.
    pub weight: u16,
    /// Number of levels the mutation can reach
    pub levels: u8,
    pub flags: MutFlags,
    /// What appears on the character screen
    pub short_desc: &'static str,
    pub gain_msg: &'static str,
    pub lose_msg: &'static str,
}

static MUT_DATA: &[MutationDef] = &[
    MutationDef {
        mutation: Mutation::WildMagic,
        weight: 6,
        levels: 3,
        flags: MutFlags::GOOD,
        short_desc: "wild magic",
        gain_msg: "You feel your magic becoming wilder.",
        lose_msg: "You feel your magic calming.",
    },
    MutationDef {
        mutation: Mutation::SubduedMagic,
        weight: 6,
        levels: 3,
        flags: MutFlags::BAD,
        short_desc: "subdued magic",
        gain_msg: "You feel your magic dimming.",
        lose_msg: "You feel your magic rekindle.",
    },
    MutationDef {
        mutation: Mutation::Augmentation,
        weight: 4,
        levels: 3,
        flags: MutFlags::GOOD,
        short_desc: "augmentation",
        gain_msg: "You feel power flowing into your body.",
        lose_msg: "You feel power drain from your body.",
    },
    MutationDef {
        mutation: Mutation::DemonicMagic,
        weight: 0,
        levels: 3,
        flags: MutFlags::GOOD,
        short_desc: "demonic magic",
        gain_msg: "Malevolent energies answer your spells.",
        lose_msg: "The malevolent energies abandon you.",
    },
    MutationDef {
        mutation: Mutation::EphemeralShield,
        weight: 0,
        levels: 1,
        flags: MutFlags::GOOD,
        short_desc: "ephemeral shield",
        gain_msg: "A fleeting barrier springs up when you cast.",
        lose_msg: "Your fleeting barrier is gone.",
    },
    MutationDef {
        mutation: Mutation::HpCasting,
        weight: 0,
        levels: 1,
        flags: MutFlags::SUBSTANCE,
        short_desc: "casts from health",
        gain_msg: "Your magic draws on your blood.",
        lose_msg: "Your magic no longer draws on your blood.",
    },
    MutationDef {
        mutation: Mutation::ContamSusceptible,
        weight: 3,
        levels: 1,
        flags: MutFlags::BAD,
        short_desc: "contamination-prone",
        gain_msg: "You feel susceptible to magical residue.",
        lose_msg: "You feel less susceptible to magical residue.",
    },
    MutationDef {
        mutation: Mutation::InviolateMagic,
        weight: 0,
        levels: 1,
        flags: MutFlags::GOOD,
        short_desc: "inviolate magic",
        gain_msg: "Your magical power grows resistant to disruption.",
        lose_msg: "Your magical power loses its resistance to disruption.",
    },
    MutationDef {
        mutation: Mutation::Strong,
        weight: 8,
        levels: 2,
        flags: MutFlags::GOOD,
        short_desc: "strong",
        gain_msg: "You feel stronger.",
        lose_msg: "You feel weaker.",
    },
    MutationDef {
        mutation: Mutation::Clever,
        weight: 8,
        levels: 2,
        flags: MutFlags::GOOD,
        short_desc: "clever",
        gain_msg: "You feel clever.",
        lose_msg: "You feel stupid.",
    },
    MutationDef {
        mutation: Mutation::Agile,
        weight: 8,
        levels: 2,
        flags: MutFlags::GOOD,
        short_desc: "agile",
        gain_msg: "You feel agile.",
        lose_msg: "You feel clumsy.",
    },
    MutationDef {
        mutation: Mutation::ToughSkin,
        weight: 10,
        levels: 3,
        flags: MutFlags::GOOD.union(MutFlags::ANATOMY).union(MutFlags::SUBSTANCE),
        short_desc: "tough skin",
        gain_msg: "Your skin toughens.",
        lose_msg: "Your skin feels delicate.",
    },
];

/// Look up the table row for a mutation
pub fn mutation_def(mutation: Mutation) -> &'static MutationDef {
    // The table is small; a scan keeps it reorderable.
    MUT_DATA
        .iter()
        .find(|d| d.mutation == mutation)
        .unwrap_or(&MUT_DATA[0])
}

/// Mutations eligible for random selection, with weights
pub fn random_mutation_pool() -> Vec<(Mutation, u16)> {
    MUT_DATA
        .iter()
        .filter(|d| d.weight > 0)
        .map(|d| (d.mutation, d.weight))
        .collect()
}

/// Per-player mutation levels
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MutationSet {
    levels: Vec<u8>,
}

impl Default for MutationSet {
    fn default() -> Self {
        Self {
            levels: vec![0; Mutation::iter().count()],
        }
    }
}

impl MutationSet {
    pub fn level(&self, mutation: Mutation) -> u8 {
        self.levels[mutation as usize]
    }

    /// Set a mutation level, clamped to the table's maximum
    pub fn set_level(&mut self, mutation: Mutation, level: u8) {
        self.levels[mutation as usize] = level.min(mutation_def(mutation).levels);
    }

    /// Gain one level. Returns the gain message, or None at the cap.
    pub fn gain(&mut self, mutation: Mutation) -> Option<&'static str> {
        let def = mutation_def(mutation);
        let cur = self.levels[mutation as usize];
        if cur >= def.levels {
            return None;
        }
        self.levels[mutation as usize] = cur + 1;
        Some(def.gain_msg)
    }

    /// Lose one level. Returns the lose message, or None at zero.
    pub fn lose(&mut self, mutation: Mutation) -> Option<&'static str> {
        let cur = self.levels[mutation as usize];
        if cur == 0 {
            return None;
        }
        self.levels[mutation as usize] = cur - 1;
        Some(mutation_def(mutation).lose_msg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_covers_every_mutation() {
        for m in Mutation::iter() {
            assert_eq!(mutation_def(m).mutation, m, "missing table row for {m}");
        }
    }

    #[test]
    fn test_levels_clamp_to_table() {
        let mut set = MutationSet::default();
        set.set_level(Mutation::HpCasting, 5);
        assert_eq!(set.level(Mutation::HpCasting), 1);
    }

    #[test]
    fn test_gain_respects_cap() {
        let mut set = MutationSet::default();
        assert!(set.gain(Mutation::WildMagic).is_some());
        assert!(set.gain(Mutation::WildMagic).is_some());
        assert!(set.gain(Mutation::WildMagic).is_some());
        assert!(set.gain(Mutation::WildMagic).is_none());
        assert_eq!(set.level(Mutation::WildMagic), 3);
    }

    #[test]
    fn test_lose_floors_at_zero() {
        let mut set = MutationSet::default();
        assert!(set.lose(Mutation::Strong).is_none());
        set.gain(Mutation::Strong);
        assert_eq!(set.lose(Mutation::Strong), Some("You feel weaker."));
        assert_eq!(set.level(Mutation::Strong), 0);
    }

    #[test]
    fn test_random_pool_excludes_innate_only() {
        let pool = random_mutation_pool();
        assert!(pool.iter().all(|(_, w)| *w > 0));
        assert!(!pool.iter().any(|(m, _)| *m == Mutation::DemonicMagic));
    }
}
