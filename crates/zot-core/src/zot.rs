//! The Zot clock.
//!
//! Lingering too long without reaching somewhere new draws the attention
//! of Zot: past the threshold the caster is "bezotted" and bleeds maximum
//! health every turn until they descend.

use crate::consts::{MAX_ZOT_CLOCK, ZOT_CLOCK_PER_FLOOR};
use crate::player::you::You;

/// Is the player currently suffering the clock?
pub fn bezotted(you: &You) -> bool {
    bezotting_level(you) > 0
}

/// How deep into Zot's attention the player is (0 = safe)
pub fn bezotting_level(you: &You) -> i32 {
    if you.zot_clock <= MAX_ZOT_CLOCK {
        0
    } else {
        1 + (you.zot_clock - MAX_ZOT_CLOCK) / 100
    }
}

/// Turns left before the clock runs out
pub fn turns_until_zot(you: &You) -> i32 {
    (MAX_ZOT_CLOCK - you.zot_clock).max(0)
}

pub fn set_turns_until_zot(you: &mut You, turns_left: i32) {
    you.zot_clock = MAX_ZOT_CLOCK - turns_left.max(0);
}

/// Advance the clock one turn. Returns a warning or drain message when
/// something noteworthy happened.
pub fn incr_zot_clock(you: &mut You) -> Option<String> {
    you.zot_clock += 1;

    let level = bezotting_level(you);
    if level == 0 {
        return match turns_until_zot(you) {
            500 => Some("You feel Zot beginning to take an interest in you.".to_string()),
            100 => Some("Zot is almost upon you!".to_string()),
            _ => None,
        };
    }

    // every turn bezotted gnaws at maximum health
    if you.hp_max > 1 {
        you.hp_max = (you.hp_max - level).max(1);
        you.hp = you.hp.min(you.hp_max);
    }
    Some("Zot's attention withers you!".to_string())
}

/// Entering an unseen floor buys time.
pub fn reset_zot_clock_for_new_floor(you: &mut You) {
    you.zot_clock = (you.zot_clock - ZOT_CLOCK_PER_FLOOR).max(0);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_player_is_safe() {
        let you = You::default();
        assert!(!bezotted(&you));
        assert_eq!(turns_until_zot(&you), MAX_ZOT_CLOCK);
    }

    #[test]
    fn test_warnings_fire_at_thresholds() {
        let mut you = You::default();
        set_turns_until_zot(&mut you, 501);
        assert!(incr_zot_clock(&mut you).unwrap().contains("interest"));
        set_turns_until_zot(&mut you, 101);
        assert!(incr_zot_clock(&mut you).unwrap().contains("almost"));
    }

    #[test]
    fn test_bezotting_drains_max_hp() {
        let mut you = You::default();
        set_turns_until_zot(&mut you, 0);
        let hp_max = you.hp_max;
        let msg = incr_zot_clock(&mut you);
        assert!(bezotted(&mut you));
        assert!(msg.unwrap().contains("withers"));
        assert!(you.hp_max < hp_max);
    }

    #[test]
    fn test_drain_never_kills_outright() {
        let mut you = You::default();
        you.hp_max = 2;
        you.hp = 2;
        you.zot_clock = MAX_ZOT_CLOCK + 10_000;
        for _ in 0..50 {
            incr_zot_clock(&mut you);
        }
        assert_eq!(you.hp_max, 1);
        assert_eq!(you.hp, 1);
    }

    #[test]
    fn test_new_floor_buys_time() {
        let mut you = You::default();
        you.zot_clock = 2000;
        reset_zot_clock_for_new_floor(&mut you);
        assert_eq!(you.zot_clock, 500);
        reset_zot_clock_for_new_floor(&mut you);
        assert_eq!(you.zot_clock, 0);
    }
}
