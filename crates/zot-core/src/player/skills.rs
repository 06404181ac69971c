//! Player magic skills.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, IntoEnumIterator};

use crate::consts::MAX_SKILL_LEVEL;
use crate::magic::spell::SpellSchools;

/// Skill types relevant to casting and evoking
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter,
)]
#[repr(u8)]
pub enum SkillType {
    Spellcasting = 0,
    Conjurations = 1,
    Hexes = 2,
    Summonings = 3,
    Necromancy = 4,
    Translocations = 5,
    FireMagic = 6,
    IceMagic = 7,
    AirMagic = 8,
    EarthMagic = 9,
    Alchemy = 10,
    Invocations = 11,
    Evocations = 12,
}

impl SkillType {
    pub const NUM_SKILLS: usize = 13;

    /// The skill exercised by a spell school
    pub fn from_school(school: SpellSchools) -> Option<SkillType> {
        if school == SpellSchools::CONJURATION {
            Some(SkillType::Conjurations)
        } else if school == SpellSchools::HEXES {
            Some(SkillType::Hexes)
        } else if school == SpellSchools::SUMMONING {
            Some(SkillType::Summonings)
        } else if school == SpellSchools::NECROMANCY {
            Some(SkillType::Necromancy)
        } else if school == SpellSchools::TRANSLOCATION {
            Some(SkillType::Translocations)
        } else if school == SpellSchools::FIRE {
            Some(SkillType::FireMagic)
        } else if school == SpellSchools::ICE {
            Some(SkillType::IceMagic)
        } else if school == SpellSchools::AIR {
            Some(SkillType::AirMagic)
        } else if school == SpellSchools::EARTH {
            Some(SkillType::EarthMagic)
        } else if school == SpellSchools::ALCHEMY {
            Some(SkillType::Alchemy)
        } else {
            None
        }
    }
}

/// One tracked skill: an integer level 0..=27 plus practice toward the next
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Skill {
    pub level: u8,
    pub practice: u16,
}

impl Skill {
    /// Practice needed to go from `level` to the next one
    pub const fn advance_threshold(level: u8) -> u16 {
        (level as u16 + 1) * 10
    }

    /// Add practice points, advancing levels as thresholds are crossed
    pub fn practise(&mut self, points: u16) {
        self.practice = self.practice.saturating_add(points);
        while self.level < MAX_SKILL_LEVEL
            && self.practice >= Self::advance_threshold(self.level)
        {
            self.practice -= Self::advance_threshold(self.level);
            self.level += 1;
        }
    }
}

/// Complete skill set for the player
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillSet {
    skills: Vec<Skill>,
}

impl Default for SkillSet {
    fn default() -> Self {
        Self {
            skills: vec![Skill::default(); SkillType::NUM_SKILLS],
        }
    }
}

impl SkillSet {
    /// Skill level times `scale`
    pub fn skill(&self, skill: SkillType, scale: i32) -> i32 {
        self.skills[skill as usize].level as i32 * scale
    }

    pub fn level(&self, skill: SkillType) -> u8 {
        self.skills[skill as usize].level
    }

    pub fn set_level(&mut self, skill: SkillType, level: u8) {
        self.skills[skill as usize].level = level.min(MAX_SKILL_LEVEL);
    }

    pub fn practise(&mut self, skill: SkillType, points: u16) {
        self.skills[skill as usize].practise(points);
    }

    /// Average level across all magic skills, for display
    pub fn average_magic_level(&self) -> i32 {
        let total: i32 = SkillType::iter()
            .filter(|s| !matches!(s, SkillType::Invocations | SkillType::Evocations))
            .map(|s| self.skill(s, 1))
            .sum();
        total / (SkillType::NUM_SKILLS as i32 - 2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skill_scaling() {
        let mut set = SkillSet::default();
        set.set_level(SkillType::FireMagic, 10);
        assert_eq!(set.skill(SkillType::FireMagic, 1), 10);
        assert_eq!(set.skill(SkillType::FireMagic, 2), 20);
        assert_eq!(set.skill(SkillType::IceMagic, 2), 0);
    }

    #[test]
    fn test_set_level_clamps() {
        let mut set = SkillSet::default();
        set.set_level(SkillType::Hexes, 99);
        assert_eq!(set.level(SkillType::Hexes), MAX_SKILL_LEVEL);
    }

    #[test]
    fn test_practise_advances() {
        let mut skill = Skill::default();
        skill.practise(10);
        assert_eq!(skill.level, 1);
        assert_eq!(skill.practice, 0);
        skill.practise(19);
        assert_eq!(skill.level, 1);
        skill.practise(1);
        assert_eq!(skill.level, 2);
    }

    #[test]
    fn test_practise_stops_at_cap() {
        let mut skill = Skill {
            level: MAX_SKILL_LEVEL,
            practice: 0,
        };
        skill.practise(10_000);
        assert_eq!(skill.level, MAX_SKILL_LEVEL);
    }

    #[test]
    fn test_school_to_skill() {
        assert_eq!(
            SkillType::from_school(SpellSchools::FIRE),
            Some(SkillType::FireMagic)
        );
        assert_eq!(SkillType::from_school(SpellSchools::empty()), None);
    }
}
