//! Free actions: act again without spending the turn.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

/// What kind of action a free-action source covers
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter,
)]
#[repr(u8)]
pub enum FreeActionType {
    None = 0,
    Melee = 1,
    Move = 2,
    Spell = 3,
    Any = 4,
}

impl FreeActionType {
    /// Does a source of this type cover a spell cast?
    pub const fn covers_spell(&self) -> bool {
        matches!(self, FreeActionType::Spell | FreeActionType::Any)
    }
}

/// A charge pool granting free actions of one type
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct FreeActions {
    pub kind: Option<FreeActionType>,
    pub charges: u32,
}

impl FreeActions {
    /// The free-action type currently available, if any charge remains
    pub fn available(&self) -> FreeActionType {
        match self.kind {
            Some(kind) if self.charges > 0 => kind,
            _ => FreeActionType::None,
        }
    }

    /// Spend one charge. Returns false if nothing was available.
    pub fn expend(&mut self) -> bool {
        if self.charges == 0 || self.kind.is_none() {
            return false;
        }
        self.charges -= 1;
        if self.charges == 0 {
            self.kind = None;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expend_drains_pool() {
        let mut fa = FreeActions {
            kind: Some(FreeActionType::Spell),
            charges: 2,
        };
        assert_eq!(fa.available(), FreeActionType::Spell);
        assert!(fa.expend());
        assert!(fa.expend());
        assert!(!fa.expend());
        assert_eq!(fa.available(), FreeActionType::None);
    }

    #[test]
    fn test_coverage() {
        assert!(FreeActionType::Any.covers_spell());
        assert!(FreeActionType::Spell.covers_spell());
        assert!(!FreeActionType::Move.covers_spell());
    }
}
