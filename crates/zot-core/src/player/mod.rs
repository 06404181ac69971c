//! Player state: the caster the pipeline acts for.

pub mod conduct;
pub mod duration;
pub mod free_action;
pub mod mutation;
pub mod skills;
pub mod stats;
pub mod you;

pub use conduct::{did_god_conduct, ConductType, God, Religion};
pub use duration::{Duration, DurationSet};
pub use free_action::{FreeActionType, FreeActions};
pub use mutation::{mutation_def, Mutation, MutationSet};
pub use skills::{SkillSet, SkillType};
pub use stats::{innate_stat, lose_stat, modify_stat, restore_stat, stat, StatType};
pub use you::{EnhancerGear, You};
