//! Channelled spells: effects that persist across turns.
//!
//! At most one spell is channelled at a time, tracked as an attribute on
//! the caster. Each turn the state machine advances at end of turn: an
//! explicit wait continues the spell, anything else interrupts it, and
//! sustain-cost spells gutter out when mana runs dry.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::board::{Board, Coord};
use crate::magic::beam::{fire_zap, zap_monster};
use crate::magic::cast::{can_cast_spells, CastResult};
use crate::magic::spell::Spell;
use crate::player::you::You;
use crate::rng::GameRng;

/// Turns of charge before a coupling discharges
const COUPLING_CHARGE_TURNS: i32 = 3;

/// Extra rays a searing ray fires before dissipating
const SEARING_RAY_TURNS: i32 = 4;

/// The caster's channelling attribute
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChannelState {
    pub spell: Option<Spell>,
    /// -1 the moment the spell starts; 1 is skipped (the cast turn
    /// already fired); 2+ are the sustained turns
    pub duration: i32,
    /// Locked aim for refiring beams
    pub aim: Option<Coord>,
    /// Power at cast time, reused each turn
    pub power: i32,
    /// Accumulated charge (coupling only)
    pub charge: i32,
}

impl ChannelState {
    pub fn active(&self) -> bool {
        self.spell.is_some()
    }

    fn reset(&mut self) {
        *self = ChannelState::default();
    }
}

/// What the state machine did this turn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelTick {
    /// Nothing is being channelled
    Idle,
    /// The spell fired again and continues
    Continued,
    /// A non-wait action (or lost casting ability) broke the channel
    Interrupted,
    /// Mana ran out and the spell guttered
    Exhausted,
    /// The spell ran its course
    Completed,
}

/// Is this particular spell the one being channelled?
pub fn channelled_spell_active(you: &You, spell: Spell) -> bool {
    you.channel.spell == Some(spell)
}

/// Begin channelling a spell that was just successfully cast.
///
/// With `do_effect` the first pulse fires immediately, as part of the
/// casting turn.
pub fn start_channelling(
    you: &mut You,
    board: &mut Board,
    rng: &mut GameRng,
    spell: Spell,
    aim: Option<Coord>,
    power: i32,
    do_effect: bool,
    result: &mut CastResult,
) {
    you.channel.spell = Some(spell);
    you.channel.duration = -1;
    you.channel.aim = aim;
    you.channel.power = power;
    you.channel.charge = 0;

    if do_effect {
        handle_channelled_spell(you, board, rng, true, result);
    } else {
        you.channel.duration = 0;
    }
    result
        .messages
        .push("(Press wait to continue channelling.)".to_string());
}

/// Advance the channelled spell at end of turn.
///
/// `prev_was_wait` is whether the command that just resolved was an
/// explicit wait; any other command interrupts a running channel.
pub fn handle_channelled_spell(
    you: &mut You,
    board: &mut Board,
    rng: &mut GameRng,
    prev_was_wait: bool,
    result: &mut CastResult,
) -> ChannelTick {
    let Some(spell) = you.channel.spell else {
        return ChannelTick::Idle;
    };

    // Skip processing at the end of the turn the spell was cast; that
    // pulse already happened as it was cast.
    you.channel.duration += 1;
    if you.channel.duration == 1 {
        return ChannelTick::Continued;
    }

    let turn = if you.channel.duration == 0 {
        1
    } else {
        you.channel.duration
    };

    if (turn > 1 && !prev_was_wait) || can_cast_spells(you).is_err() {
        stop_channelling(you, false, result);
        return ChannelTick::Interrupted;
    }

    let sustained = matches!(spell, Spell::FlameWave | Spell::SearingRay);
    if sustained && turn > 1 {
        if you.mp < 1 {
            result.messages.push(format!(
                "Without enough magic to sustain it, your {} dissipates.",
                spell.title()
            ));
            stop_channelling(you, true, result);
            return ChannelTick::Exhausted;
        }
        you.pay_mana(1);
    }

    match spell {
        Spell::SearingRay => handle_searing_ray(you, board, rng, turn, result),
        Spell::FlameWave => handle_flame_wave(you, board, rng, turn, result),
        Spell::GalvanicCoupling => handle_coupling(you, board, rng, result),
        other => {
            warn!(spell = other.title(), "channelling a non-channelled spell");
            stop_channelling(you, true, result);
            ChannelTick::Interrupted
        }
    }
}

/// End the channel, with the per-spell sign-off unless `quiet`.
pub fn stop_channelling(you: &mut You, quiet: bool, result: &mut CastResult) {
    let Some(spell) = you.channel.spell else {
        return;
    };
    you.channel.reset();

    if quiet {
        return;
    }
    let msg = match spell {
        Spell::FlameWave => "You stop channelling waves of flame.",
        Spell::SearingRay => "You stop channelling your searing ray.",
        Spell::GalvanicCoupling => "The insufficient charge dissipates harmlessly.",
        _ => return,
    };
    result.messages.push(msg.to_string());
}

fn handle_searing_ray(
    you: &mut You,
    board: &mut Board,
    rng: &mut GameRng,
    turn: i32,
    result: &mut CastResult,
) -> ChannelTick {
    let aim = you.channel.aim.unwrap_or(you.pos);
    let power = you.channel.power;
    fire_zap(
        Spell::SearingRay,
        power,
        Spell::SearingRay.range(power),
        aim,
        you.pos,
        board,
        rng,
        result,
    );
    if turn >= SEARING_RAY_TURNS {
        result
            .messages
            .push("Your searing ray is exhausted.".to_string());
        stop_channelling(you, true, result);
        return ChannelTick::Completed;
    }
    ChannelTick::Continued
}

fn handle_flame_wave(
    you: &mut You,
    board: &mut Board,
    rng: &mut GameRng,
    turn: i32,
    result: &mut CastResult,
) -> ChannelTick {
    let power = you.channel.power;
    let max_radius = Spell::FlameWave.range(power);
    let radius = turn.min(max_radius);
    result
        .messages
        .push("A wave of flame rolls out from you.".to_string());

    let targets: Vec<Coord> = board
        .monsters
        .iter()
        .filter(|m| m.alive() && you.pos.distance(m.pos) == radius)
        .filter(|m| board.see_cell(you.pos, m.pos))
        .map(|m| m.pos)
        .collect();
    for pos in targets {
        zap_monster(Spell::FlameWave, power, pos, board, rng, result);
    }

    if turn >= max_radius {
        result
            .messages
            .push("Your wave of flame reaches its crest and breaks.".to_string());
        stop_channelling(you, true, result);
        return ChannelTick::Completed;
    }
    ChannelTick::Continued
}

fn handle_coupling(
    you: &mut You,
    board: &mut Board,
    rng: &mut GameRng,
    result: &mut CastResult,
) -> ChannelTick {
    you.channel.charge += 1;
    if you.channel.charge < COUPLING_CHARGE_TURNS {
        result
            .messages
            .push("You feel charge building up...".to_string());
        return ChannelTick::Continued;
    }

    let victims: Vec<Coord> = board
        .visible_monsters(you.pos)
        .into_iter()
        .filter(|m| m.is_hostile())
        .map(|m| m.pos)
        .collect();
    match rng.choose(&victims) {
        Some(&pos) => {
            if let Some(monster) = board.monster_at_mut(pos) {
                let name = monster.name.clone();
                let id = monster.id;
                monster.hp = 0;
                result
                    .messages
                    .push(format!("The charge arcs to the {name}, slaying it!"));
                result.killed.push(id);
            }
        }
        None => {
            result
                .messages
                .push("The charge dissipates without a target.".to_string());
        }
    }
    stop_channelling(you, true, result);
    ChannelTick::Completed
}
