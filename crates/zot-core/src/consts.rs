//! Global game constants.

/// Map width in cells
pub const GRID_WIDTH: usize = 80;

/// Map height in cells
pub const GRID_HEIGHT: usize = 70;

/// Line-of-sight radius; also the default range of unlimited-range spells
pub const LOS_RADIUS: i32 = 7;

/// Hard ceiling on any single stat value
pub const MAX_STAT_VALUE: i32 = 125;

/// Skill levels run 0..=27
pub const MAX_SKILL_LEVEL: u8 = 27;

/// Willpower value treated as "cannot be hexed at all"
pub const WILL_INVULN: i32 = 5000;

/// Contamination threshold above which the caster glows dangerously
pub const CONTAM_THRESHOLD: i32 = 1000;

/// Turns without reaching a new floor before the walls of Zot close in
pub const MAX_ZOT_CLOCK: i32 = 5000;

/// Zot clock refund granted on entering an unseen floor
pub const ZOT_CLOCK_PER_FLOOR: i32 = 1500;
