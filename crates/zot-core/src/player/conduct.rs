//! God conducts triggered by spellcasting.
//!
//! Casting is watched by the gods: evil, unclean, chaotic and hasty spells
//! offend some of them, generic casting pleases the magic patron, and
//! channelling through wizardly items is itself a conduct.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

/// Conducts the casting pipeline can commit
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter,
)]
#[repr(u8)]
pub enum ConductType {
    /// Any spell cast at all
    SpellCasting = 0,
    /// Necromantic and other dark magic
    Evil = 1,
    /// Corruption of living bodies
    Unclean = 2,
    /// Reality-warping magic
    Chaotic = 3,
    /// Magical self-acceleration
    Hasty = 4,
    /// Channelling mana through a wizardly item
    WizardlyItem = 5,
}

/// The pantheon, by archetype
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumIter,
)]
#[repr(u8)]
pub enum God {
    #[default]
    None = 0,
    /// Purity god: abhors evil and unclean magic
    Aster = 1,
    /// Order god: abhors chaotic magic
    Korrel = 2,
    /// Stillness god: abhors haste
    Myre = 3,
    /// Magic patron: rewards casting and wizardly channelling
    Quill = 4,
}

impl God {
    /// Does this god punish the conduct?
    pub const fn hates(&self, conduct: ConductType) -> bool {
        match self {
            God::Aster => matches!(conduct, ConductType::Evil | ConductType::Unclean),
            God::Korrel => matches!(conduct, ConductType::Chaotic),
            God::Myre => matches!(conduct, ConductType::Hasty),
            _ => false,
        }
    }

    /// Does this god reward the conduct?
    pub const fn likes(&self, conduct: ConductType) -> bool {
        matches!(
            (self, conduct),
            (God::Quill, ConductType::SpellCasting) | (God::Quill, ConductType::WizardlyItem)
        )
    }
}

/// A single recorded conduct event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConductEvent {
    pub conduct: ConductType,
    /// Severity; bigger deeds move piety further
    pub level: i32,
}

/// The player's standing with their god
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Religion {
    pub god: God,
    pub piety: i32,
    pub penance: i32,
    /// Every conduct committed, newest last
    pub log: Vec<ConductEvent>,
}

impl Religion {
    pub fn new(god: God) -> Self {
        Self {
            god,
            piety: 15,
            penance: 0,
            log: Vec::new(),
        }
    }

    pub fn under_penance(&self) -> bool {
        self.penance > 0
    }
}

/// Record a conduct and apply the god's reaction.
///
/// Returns the reaction message, if the god cared.
pub fn did_god_conduct(
    religion: &mut Religion,
    conduct: ConductType,
    level: i32,
) -> Option<String> {
    religion.log.push(ConductEvent { conduct, level });

    let god = religion.god;
    if god == God::None {
        return None;
    }
    if god.hates(conduct) {
        religion.piety = (religion.piety - level).max(0);
        religion.penance += level / 2 + 1;
        return Some(format!("{god} is displeased."));
    }
    if god.likes(conduct) {
        // steady trickle, not a flood
        if level > 0 {
            religion.piety += 1;
        }
        return None;
    }
    None
}

/// Would casting this conduct set put the player under penance?
/// Used for the pre-cast confirmation prompt.
pub fn god_punishes_conducts(god: God, conducts: &[ConductType]) -> bool {
    conducts.iter().any(|c| god.hates(*c))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hated_conduct_costs_piety_and_adds_penance() {
        let mut rel = Religion::new(God::Aster);
        let msg = did_god_conduct(&mut rel, ConductType::Evil, 12);
        assert!(msg.unwrap().contains("displeased"));
        assert_eq!(rel.piety, 3);
        assert!(rel.under_penance());
    }

    #[test]
    fn test_piety_floors_at_zero() {
        let mut rel = Religion::new(God::Myre);
        did_god_conduct(&mut rel, ConductType::Hasty, 100);
        assert_eq!(rel.piety, 0);
    }

    #[test]
    fn test_liked_conduct_trickles_piety() {
        let mut rel = Religion::new(God::Quill);
        let before = rel.piety;
        assert!(did_god_conduct(&mut rel, ConductType::SpellCasting, 3).is_none());
        assert_eq!(rel.piety, before + 1);
    }

    #[test]
    fn test_godless_players_log_but_feel_nothing() {
        let mut rel = Religion::default();
        assert!(did_god_conduct(&mut rel, ConductType::Evil, 10).is_none());
        assert_eq!(rel.piety, 0);
        assert_eq!(rel.log.len(), 1);
    }

    #[test]
    fn test_punish_prediction() {
        assert!(god_punishes_conducts(
            God::Korrel,
            &[ConductType::SpellCasting, ConductType::Chaotic]
        ));
        assert!(!god_punishes_conducts(God::Quill, &[ConductType::Evil]));
    }
}
