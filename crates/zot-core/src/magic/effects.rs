//! Spell effect functions: the right-hand side of the dispatch table.
//!
//! Each function performs its own validity checks (aborting costs the
//! player nothing), then honours the already-rolled failure flag, then
//! applies the effect. Messages and kills accumulate in the shared
//! result.

use crate::board::{Board, Coord, Tile};
use crate::consts::LOS_RADIUS;
use crate::magic::beam::{fire_zap, zap_monster};
use crate::magic::cast::{CastResult, SpellOutcome};
use crate::magic::channel::start_channelling;
use crate::magic::power::ench_power_stepdown;
use crate::magic::spell::Spell;
use crate::magic::targeting::{chain_targets, trace_beam, Targeter};
use crate::monster::{Attitude, Holiness, Monster};
use crate::player::duration::Duration;
use crate::player::you::You;
use crate::rng::GameRng;

/// Everything an effect function needs for one cast
pub(crate) struct EffectCtx<'a> {
    pub you: &'a mut You,
    pub board: &'a mut Board,
    pub rng: &'a mut GameRng,
    pub power: i32,
    pub range: i32,
    pub aim: Coord,
    pub fail: bool,
    pub result: &'a mut CastResult,
}

impl EffectCtx<'_> {
    fn msg(&mut self, text: impl Into<String>) {
        self.result.messages.push(text.into());
    }

    fn abort(&mut self, text: impl Into<String>) -> SpellOutcome {
        self.msg(text);
        SpellOutcome::Abort
    }

    /// Enchantment attempt against one monster; returns None if it was
    /// resisted (with message) or the monster is gone.
    fn hex_lands(&mut self, pos: Coord) -> Option<()> {
        let power = ench_power_stepdown(self.power);
        let Some(monster) = self.board.monster_at(pos) else {
            return None;
        };
        let name = monster.name.clone();
        if monster.check_willpower(power, self.rng) > 0 {
            self.msg(format!("The {name} resists."));
            return None;
        }
        Some(())
    }

    /// First monster along a beam path toward the aim, if any
    fn first_monster_on_path(&self) -> Option<Coord> {
        let path = trace_beam(self.board, self.you.pos, self.aim, self.range, false, false);
        path.into_iter()
            .find(|&c| self.board.monster_at(c).is_some())
    }
}

/// Additional contamination a spell inflicts on its caster
pub const fn spell_contam_cost(spell: Spell) -> i32 {
    match spell {
        Spell::Irradiate => 450,
        _ => 0,
    }
}

// ---------------------------------------------------------------------------
// Conjurations

/// Beam that detonates where it stops (fireball, mephitic cloud)
pub(crate) fn cast_explosive_bolt(ctx: &mut EffectCtx, spell: Spell) -> SpellOutcome {
    if ctx.fail {
        return SpellOutcome::Fail;
    }
    let path = trace_beam(ctx.board, ctx.you.pos, ctx.aim, ctx.range, false, false);
    let center = path.last().copied().unwrap_or(ctx.aim);

    ctx.msg(match spell {
        Spell::MephiticCloud => "The cloud bursts into choking vapour!",
        _ => "The fireball explodes!",
    });

    let victims: Vec<Coord> = ctx
        .board
        .monsters
        .iter()
        .filter(|m| m.alive() && center.distance(m.pos) <= 1)
        .map(|m| m.pos)
        .collect();
    for pos in victims {
        if spell == Spell::MephiticCloud {
            mephitic_fumes(ctx, pos);
        } else {
            zap_monster(spell, ctx.power, pos, ctx.board, ctx.rng, ctx.result);
        }
    }
    let noise = spell.effect_noise();
    if noise > 0 {
        ctx.result.noise.push((center, noise));
    }
    SpellOutcome::Success
}

/// Confusion by hit-dice check, plus a whiff of poison
fn mephitic_fumes(ctx: &mut EffectCtx, pos: Coord) {
    zap_monster(Spell::MephiticCloud, ctx.power, pos, ctx.board, ctx.rng, ctx.result);
    let power = ctx.power;
    let Some(monster) = ctx.board.monster_at_mut(pos) else {
        return;
    };
    if monster.res_poison() {
        return;
    }
    let hd = monster.hit_dice;
    let name = monster.name.clone();
    if ctx.rng.x_chance_in_y(power, power + hd * 10) {
        let dur = ctx.rng.random_range(2, 5) as u16;
        if let Some(monster) = ctx.board.monster_at_mut(pos) {
            monster.status.confused = monster.status.confused.saturating_add(dur);
        }
        ctx.msg(format!("The {name} reels in the fumes!"));
    }
}

pub(crate) fn cast_searing_ray(ctx: &mut EffectCtx) -> SpellOutcome {
    if ctx.fail {
        return SpellOutcome::Fail;
    }
    ctx.msg("You channel a ray of searing heat!");
    let you_pos = ctx.you.pos;
    fire_zap(
        Spell::SearingRay,
        ctx.power,
        ctx.range,
        ctx.aim,
        you_pos,
        ctx.board,
        ctx.rng,
        ctx.result,
    );
    start_channelling(
        ctx.you,
        ctx.board,
        ctx.rng,
        Spell::SearingRay,
        Some(ctx.aim),
        ctx.power,
        false,
        ctx.result,
    );
    SpellOutcome::Success
}

/// Burst of force around the caster
pub(crate) fn cast_mystic_blast(ctx: &mut EffectCtx) -> SpellOutcome {
    if ctx.fail {
        return SpellOutcome::Fail;
    }
    ctx.msg("A blast of force erupts from you!");
    area_zap(ctx, Spell::MysticBlast, 2, 1);
    SpellOutcome::Success
}

pub(crate) fn cast_fire_storm(ctx: &mut EffectCtx) -> SpellOutcome {
    if ctx.fail {
        return SpellOutcome::Fail;
    }
    let radius = if ctx.power > 100 { 3 } else { 2 };
    ctx.msg("A raging storm of fire appears!");
    let aim = ctx.aim;
    let victims: Vec<Coord> = ctx
        .board
        .monsters
        .iter()
        .filter(|m| m.alive() && aim.distance(m.pos) <= radius)
        .map(|m| m.pos)
        .collect();
    for pos in victims {
        zap_monster(Spell::FireStorm, ctx.power, pos, ctx.board, ctx.rng, ctx.result);
    }
    ctx.result.noise.push((aim, Spell::FireStorm.effect_noise()));
    SpellOutcome::Success
}

pub(crate) fn cast_glaciate(ctx: &mut EffectCtx) -> SpellOutcome {
    if ctx.aim == ctx.you.pos {
        return ctx.abort("You must sweep the cold toward something.");
    }
    if ctx.fail {
        return SpellOutcome::Fail;
    }
    ctx.msg("A cascade of freezing air sweeps out!");
    let targeter = Targeter::Cone { range: ctx.range };
    let cells = targeter.affected_cells(ctx.board, ctx.you.pos, ctx.aim);
    let you_pos = ctx.you.pos;
    for (pos, _) in cells {
        if ctx.board.monster_at(pos).is_some() {
            // the cold is fiercest near its source
            let falloff = you_pos.distance(pos).max(1);
            let power = (ctx.power * 2 / (falloff + 1)).max(ctx.power / 3);
            zap_monster(Spell::Glaciate, power, pos, ctx.board, ctx.rng, ctx.result);
        }
    }
    ctx.result
        .noise
        .push((you_pos, Spell::Glaciate.effect_noise()));
    SpellOutcome::Success
}

pub(crate) fn cast_chain_lightning(ctx: &mut EffectCtx) -> SpellOutcome {
    if ctx.fail {
        return SpellOutcome::Fail;
    }
    let targets = chain_targets(ctx.board, ctx.you.pos, ctx.range);
    if targets.is_empty() {
        ctx.msg("The lightning arcs harmlessly into the ground.");
        return SpellOutcome::Success;
    }
    ctx.msg("Lightning courses from your hands!");
    let mut power = ctx.power;
    for pos in targets {
        zap_monster(Spell::ChainLightning, power, pos, ctx.board, ctx.rng, ctx.result);
        // each arc bleeds off a quarter of the charge
        power = power * 3 / 4;
    }
    let you_pos = ctx.you.pos;
    ctx.result
        .noise
        .push((you_pos, Spell::ChainLightning.effect_noise()));
    SpellOutcome::Success
}

pub(crate) fn cast_galvanic_coupling(ctx: &mut EffectCtx) -> SpellOutcome {
    if ctx.fail {
        return SpellOutcome::Fail;
    }
    ctx.msg("You begin accumulating a lethal charge.");
    start_channelling(
        ctx.you,
        ctx.board,
        ctx.rng,
        Spell::GalvanicCoupling,
        None,
        ctx.power,
        true,
        ctx.result,
    );
    SpellOutcome::Success
}

pub(crate) fn cast_irradiate(ctx: &mut EffectCtx) -> SpellOutcome {
    if ctx.fail {
        return SpellOutcome::Fail;
    }
    ctx.msg("You erupt in a fountain of uncontrolled magic!");
    area_zap(ctx, Spell::Irradiate, 1, 1);
    let contam = spell_contam_cost(Spell::Irradiate) + ctx.rng.random2(150);
    ctx.you.contaminate(contam);
    SpellOutcome::Success
}

pub(crate) fn cast_flame_wave(ctx: &mut EffectCtx) -> SpellOutcome {
    if ctx.fail {
        return SpellOutcome::Fail;
    }
    start_channelling(
        ctx.you,
        ctx.board,
        ctx.rng,
        Spell::FlameWave,
        None,
        ctx.power,
        true,
        ctx.result,
    );
    SpellOutcome::Success
}

pub(crate) fn cast_refrigeration(ctx: &mut EffectCtx) -> SpellOutcome {
    if ctx.fail {
        return SpellOutcome::Fail;
    }
    ctx.msg("The heat is drained from your surroundings.");
    area_zap(ctx, Spell::Refrigeration, LOS_RADIUS, 1);
    SpellOutcome::Success
}

pub(crate) fn cast_polar_vortex(ctx: &mut EffectCtx) -> SpellOutcome {
    if ctx.fail {
        return SpellOutcome::Fail;
    }
    ctx.msg("A freezing vortex appears!");
    area_zap(ctx, Spell::PolarVortex, ctx.range, 1);
    let you_pos = ctx.you.pos;
    ctx.result
        .noise
        .push((you_pos, Spell::PolarVortex.effect_noise()));
    SpellOutcome::Success
}

/// Zap every visible monster in a ring around the caster
fn area_zap(ctx: &mut EffectCtx, spell: Spell, radius: i32, min_radius: i32) {
    let you_pos = ctx.you.pos;
    let victims: Vec<Coord> = ctx
        .board
        .visible_monsters(you_pos)
        .into_iter()
        .filter(|m| {
            let d = you_pos.distance(m.pos);
            d >= min_radius && d <= radius
        })
        .map(|m| m.pos)
        .collect();
    for pos in victims {
        zap_monster(spell, ctx.power, pos, ctx.board, ctx.rng, ctx.result);
    }
}

// ---------------------------------------------------------------------------
// Touch spells

pub(crate) fn cast_freeze(ctx: &mut EffectCtx) -> SpellOutcome {
    if ctx.board.monster_at(ctx.aim).is_none() {
        return ctx.abort("There is nothing there to freeze.");
    }
    if ctx.fail {
        return SpellOutcome::Fail;
    }
    let aim = ctx.aim;
    let damage = zap_monster(Spell::Freeze, ctx.power, aim, ctx.board, ctx.rng, ctx.result);
    if damage > 0 {
        if let Some(monster) = ctx.board.monster_at_mut(aim) {
            monster.status.slowed = monster.status.slowed.saturating_add(2);
        }
    }
    SpellOutcome::Success
}

pub(crate) fn cast_vampiric_draining(ctx: &mut EffectCtx) -> SpellOutcome {
    let Some(monster) = ctx.board.monster_at(ctx.aim) else {
        return ctx.abort("There is nothing there to drain.");
    };
    if !monster.holiness.can_be_drained() {
        let name = monster.name.clone();
        return ctx.abort(format!("The {name} has no life to drain!"));
    }
    if ctx.fail {
        return SpellOutcome::Fail;
    }
    let aim = ctx.aim;
    let damage = zap_monster(
        Spell::VampiricDraining,
        ctx.power,
        aim,
        ctx.board,
        ctx.rng,
        ctx.result,
    );
    if damage > 0 {
        ctx.you.heal(damage / 2);
        ctx.msg("You feel life coursing into your body.");
    }
    SpellOutcome::Success
}

pub(crate) fn cast_confusing_touch(ctx: &mut EffectCtx) -> SpellOutcome {
    let Some(monster) = ctx.board.monster_at(ctx.aim) else {
        return ctx.abort("There is nothing there to touch.");
    };
    let name = monster.name.clone();
    if ctx.fail {
        return SpellOutcome::Fail;
    }
    let aim = ctx.aim;
    if ctx.hex_lands(aim).is_some() {
        let dur = ctx.rng.random_range(3, 6) as u16;
        if let Some(monster) = ctx.board.monster_at_mut(aim) {
            monster.status.confused = monster.status.confused.saturating_add(dur);
        }
        ctx.msg(format!("The {name} looks befuddled!"));
    }
    SpellOutcome::Success
}

// ---------------------------------------------------------------------------
// Hexes

pub(crate) fn cast_slow(ctx: &mut EffectCtx) -> SpellOutcome {
    if ctx.fail {
        return SpellOutcome::Fail;
    }
    let Some(pos) = ctx.first_monster_on_path() else {
        ctx.msg("The spell dissipates harmlessly.");
        return SpellOutcome::Success;
    };
    if ctx.hex_lands(pos).is_some() {
        let dur = ctx.rng.random_range(4, 8) as u16;
        if let Some(monster) = ctx.board.monster_at_mut(pos) {
            let name = monster.name.clone();
            monster.status.slowed = monster.status.slowed.saturating_add(dur);
            ctx.msg(format!("The {name} seems to slow down."));
        }
    }
    SpellOutcome::Success
}

pub(crate) fn cast_confuse(ctx: &mut EffectCtx) -> SpellOutcome {
    if ctx.fail {
        return SpellOutcome::Fail;
    }
    let Some(pos) = ctx.first_monster_on_path() else {
        ctx.msg("The spell dissipates harmlessly.");
        return SpellOutcome::Success;
    };
    if ctx.hex_lands(pos).is_some() {
        let dur = ctx.rng.random_range(3, 8) as u16;
        if let Some(monster) = ctx.board.monster_at_mut(pos) {
            let name = monster.name.clone();
            monster.status.confused = monster.status.confused.saturating_add(dur);
            ctx.msg(format!("The {name} appears confused."));
        }
    }
    SpellOutcome::Success
}

pub(crate) fn cast_cause_fear(ctx: &mut EffectCtx) -> SpellOutcome {
    if ctx.fail {
        return SpellOutcome::Fail;
    }
    let you_pos = ctx.you.pos;
    let victims: Vec<Coord> = ctx
        .board
        .visible_monsters(you_pos)
        .into_iter()
        .filter(|m| m.is_hostile())
        .map(|m| m.pos)
        .collect();
    let mut feared = 0;
    for pos in victims {
        if ctx.hex_lands(pos).is_some() {
            let dur = ctx.rng.random_range(4, 9) as u16;
            if let Some(monster) = ctx.board.monster_at_mut(pos) {
                monster.status.feared = monster.status.feared.saturating_add(dur);
                feared += 1;
            }
        }
    }
    if feared > 0 {
        ctx.msg(format!("You radiate an aura of fear! ({feared} terrified)"));
    } else {
        ctx.msg("You radiate an aura of fear, but nothing succumbs.");
    }
    SpellOutcome::Success
}

pub(crate) fn cast_silence(ctx: &mut EffectCtx) -> SpellOutcome {
    if ctx.fail {
        return SpellOutcome::Fail;
    }
    let dur = (10 + ctx.power / 5) as u32;
    ctx.you.durations.set(Duration::Silenced, dur);
    let radius = ctx.range;
    let you_pos = ctx.you.pos;
    for monster in ctx
        .board
        .monsters
        .iter_mut()
        .filter(|m| m.alive() && you_pos.distance(m.pos) <= radius)
    {
        monster.status.silenced = monster.status.silenced.saturating_add(dur as u16);
    }
    ctx.msg("A profound silence engulfs you.");
    SpellOutcome::Success
}

// ---------------------------------------------------------------------------
// Translocations and earth

pub(crate) fn cast_blink(ctx: &mut EffectCtx) -> SpellOutcome {
    if ctx.fail {
        return SpellOutcome::Fail;
    }
    let spots = ctx.board.open_cells_within(ctx.you.pos, LOS_RADIUS);
    match ctx.rng.choose(&spots).copied() {
        Some(dest) => {
            ctx.you.pos = dest;
            ctx.msg("You blink.");
        }
        None => ctx.msg("Space distorts around you, but nothing happens."),
    }
    SpellOutcome::Success
}

pub(crate) fn cast_teleport_other(ctx: &mut EffectCtx) -> SpellOutcome {
    if ctx.fail {
        return SpellOutcome::Fail;
    }
    let Some(pos) = ctx.first_monster_on_path() else {
        ctx.msg("The spell dissipates harmlessly.");
        return SpellOutcome::Success;
    };
    if ctx.hex_lands(pos).is_none() {
        return SpellOutcome::Success;
    }
    // fling the victim to a random open cell
    let mut dest = None;
    for _ in 0..100 {
        let candidate = Coord::new(
            ctx.rng.random2(ctx.board.width() as i32),
            ctx.rng.random2(ctx.board.height() as i32),
        );
        if ctx.board.is_open(candidate) {
            dest = Some(candidate);
            break;
        }
    }
    if let (Some(dest), Some(monster)) = (dest, ctx.board.monster_at_mut(pos)) {
        let name = monster.name.clone();
        monster.pos = dest;
        ctx.msg(format!("The {name} vanishes!"));
    }
    SpellOutcome::Success
}

pub(crate) fn cast_passwall(ctx: &mut EffectCtx) -> SpellOutcome {
    let targeter = Targeter::Passwall { range: ctx.range };
    if let Err(reason) = targeter.valid_aim(ctx.board, ctx.you.pos, ctx.aim) {
        return ctx.abort(reason);
    }
    if ctx.fail {
        return SpellOutcome::Fail;
    }
    let cells = targeter.affected_cells(ctx.board, ctx.you.pos, ctx.aim);
    if let Some((exit, _)) = cells.first() {
        ctx.you.pos = *exit;
        ctx.msg("You pass through the rock and emerge on the far side.");
    }
    SpellOutcome::Success
}

pub(crate) fn cast_dig(ctx: &mut EffectCtx) -> SpellOutcome {
    if ctx.fail {
        return SpellOutcome::Fail;
    }
    let path = trace_beam(ctx.board, ctx.you.pos, ctx.aim, ctx.range, false, true);
    let mut dug = false;
    for pos in path {
        if ctx.board.tile(pos).is_diggable() {
            ctx.board.set_tile(pos, Tile::Floor);
            dug = true;
        }
    }
    if dug {
        ctx.msg("The rock crumbles away!");
    } else {
        ctx.msg("Nothing happens.");
    }
    SpellOutcome::Success
}

// ---------------------------------------------------------------------------
// Self-enchantments

pub(crate) fn cast_swiftness(ctx: &mut EffectCtx) -> SpellOutcome {
    if ctx.fail {
        return SpellOutcome::Fail;
    }
    let dur = (15 + ctx.rng.random2(ctx.power.max(1))) as u32;
    ctx.you.durations.increase(Duration::Swiftness, dur);
    ctx.msg("You feel quick.");
    SpellOutcome::Success
}

pub(crate) fn cast_frost_armour(ctx: &mut EffectCtx) -> SpellOutcome {
    if ctx.fail {
        return SpellOutcome::Fail;
    }
    let dur = (20 + ctx.power / 2) as u32;
    ctx.you.durations.set(Duration::FrostArmour, dur);
    ctx.msg("A film of ice covers your body.");
    SpellOutcome::Success
}

pub(crate) fn cast_death_channel(ctx: &mut EffectCtx) -> SpellOutcome {
    if ctx.fail {
        return SpellOutcome::Fail;
    }
    let dur = (30 + ctx.rng.random2(ctx.power.max(1))) as u32;
    ctx.you.durations.set(Duration::DeathChannel, dur);
    ctx.msg("Malign forces permeate your being, awaiting release.");
    SpellOutcome::Success
}

pub(crate) fn cast_revivification(ctx: &mut EffectCtx) -> SpellOutcome {
    if ctx.you.hp >= ctx.you.hp_max {
        return ctx.abort("You are in perfect health already.");
    }
    if ctx.fail {
        return SpellOutcome::Fail;
    }
    // trade a slice of maximum health for a full heal
    let toll = (ctx.you.hp_max / 6).max(1);
    ctx.you.hp_max -= toll;
    ctx.you.hp = ctx.you.hp_max;
    ctx.msg("Your body is suffused with unholy vigour!");
    SpellOutcome::Success
}

pub(crate) fn cast_sublimation_of_blood(ctx: &mut EffectCtx) -> SpellOutcome {
    if ctx.you.mp >= ctx.you.mp_max {
        return ctx.abort("Your magic is already brimming.");
    }
    if ctx.you.hp <= 2 {
        return ctx.abort("Your blood is too thin to sublimate.");
    }
    if ctx.fail {
        return SpellOutcome::Fail;
    }
    let drain = ctx
        .rng
        .roll_dice(2, 3 + ctx.power / 10)
        .min(ctx.you.hp - 1);
    ctx.you.hurt(drain);
    ctx.you.gain_mp(1 + drain / 2);
    ctx.msg("You draw magic from your blood.");
    SpellOutcome::Success
}

// ---------------------------------------------------------------------------
// Summons and necromancy

pub(crate) fn cast_summon(ctx: &mut EffectCtx, name: &str, hp: i32) -> SpellOutcome {
    if ctx.fail {
        return SpellOutcome::Fail;
    }
    let spots = ctx.board.open_cells_within(ctx.you.pos, 2);
    let Some(&pos) = ctx.rng.choose(&spots) else {
        return ctx.abort("There is no room to summon anything.");
    };
    let id = ctx.board.next_monster_id();
    let mut summon = Monster::new(id, name, pos, hp + ctx.rng.random2(ctx.power / 10 + 1));
    summon.attitude = Attitude::Friendly;
    ctx.board.monsters.push(summon);
    ctx.msg(format!("A {name} appears!"));
    SpellOutcome::Success
}

pub(crate) fn cast_animate_dead(ctx: &mut EffectCtx) -> SpellOutcome {
    if ctx.fail {
        return SpellOutcome::Fail;
    }
    let you_pos = ctx.you.pos;
    let nearby: Vec<Coord> = ctx
        .board
        .corpses
        .iter()
        .copied()
        .filter(|&c| ctx.board.see_cell(you_pos, c))
        .collect();
    if nearby.is_empty() {
        ctx.msg("There is nothing here to animate.");
        return SpellOutcome::Success;
    }
    let mut raised = 0;
    for pos in nearby {
        let spot = if ctx.board.is_open(pos) {
            Some(pos)
        } else {
            let open = ctx.board.open_cells_within(pos, 1);
            ctx.rng.choose(&open).copied()
        };
        let Some(spot) = spot else { continue };
        let id = ctx.board.next_monster_id();
        let mut zombie = Monster::new(id, "zombie", spot, 8 + ctx.power / 10);
        zombie.attitude = Attitude::Friendly;
        zombie.holiness = Holiness::Undead;
        ctx.board.monsters.push(zombie);
        ctx.board.corpses.retain(|&c| c != pos);
        raised += 1;
    }
    if raised > 0 {
        ctx.msg("The dead rise to serve you!");
    } else {
        ctx.msg("The dead stir, but cannot rise.");
    }
    SpellOutcome::Success
}

// ---------------------------------------------------------------------------
// Mutation-driven side effects

/// Demonic magic: casting lashes out at nearby enemies.
pub(crate) fn demonic_magic_retaliation(
    you: &mut You,
    board: &mut Board,
    rng: &mut GameRng,
    power: i32,
    rank: i32,
    result: &mut CastResult,
) {
    if rank < 1 {
        return;
    }
    result
        .messages
        .push("Malevolent energies surge around you.".to_string());
    let you_pos = you.pos;
    for monster in board
        .monsters
        .iter_mut()
        .filter(|m| m.alive() && m.is_hostile() && you_pos.distance(m.pos) <= rank)
    {
        if monster.check_willpower(power, rng) <= 0 {
            monster.status.paralysed = monster
                .status
                .paralysed
                .saturating_add(rng.random_range(2, 5) as u16);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::magic::cast::CastResult;
    use crate::monster::MonsterId;

    fn ctx_parts() -> (You, Board, GameRng, CastResult) {
        let mut you = You::default();
        you.pos = Coord::new(10, 10);
        (you, Board::new(30, 30), GameRng::new(11), CastResult::default())
    }

    #[test]
    fn test_freeze_aborts_on_empty_cell() {
        let (mut you, mut board, mut rng, mut result) = ctx_parts();
        let mut ctx = EffectCtx {
            aim: Coord::new(11, 10),
            you: &mut you,
            board: &mut board,
            rng: &mut rng,
            power: 25,
            range: 1,
            fail: false,
            result: &mut result,
        };
        assert_eq!(cast_freeze(&mut ctx), SpellOutcome::Abort);
    }

    #[test]
    fn test_fail_flag_short_circuits_effect() {
        let (mut you, mut board, mut rng, mut result) = ctx_parts();
        board
            .monsters
            .push(Monster::new(MonsterId(1), "rat", Coord::new(11, 10), 5));
        let mut ctx = EffectCtx {
            aim: Coord::new(11, 10),
            you: &mut you,
            board: &mut board,
            rng: &mut rng,
            power: 25,
            range: 1,
            fail: true,
            result: &mut result,
        };
        assert_eq!(cast_freeze(&mut ctx), SpellOutcome::Fail);
        assert_eq!(board.monster_at(Coord::new(11, 10)).unwrap().hp, 5);
    }

    #[test]
    fn test_vampiric_draining_heals_caster() {
        let (mut you, mut board, mut rng, mut result) = ctx_parts();
        you.hp = 5;
        board
            .monsters
            .push(Monster::new(MonsterId(1), "orc", Coord::new(11, 10), 30));
        let mut ctx = EffectCtx {
            aim: Coord::new(11, 10),
            you: &mut you,
            board: &mut board,
            rng: &mut rng,
            power: 100,
            range: 1,
            fail: false,
            result: &mut result,
        };
        assert_eq!(cast_vampiric_draining(&mut ctx), SpellOutcome::Success);
        assert!(you.hp > 5);
    }

    #[test]
    fn test_vampiric_draining_rejects_undead() {
        let (mut you, mut board, mut rng, mut result) = ctx_parts();
        let mut skel = Monster::new(MonsterId(1), "skeleton", Coord::new(11, 10), 10);
        skel.holiness = Holiness::Undead;
        board.monsters.push(skel);
        let mut ctx = EffectCtx {
            aim: Coord::new(11, 10),
            you: &mut you,
            board: &mut board,
            rng: &mut rng,
            power: 100,
            range: 1,
            fail: false,
            result: &mut result,
        };
        assert_eq!(cast_vampiric_draining(&mut ctx), SpellOutcome::Abort);
    }

    #[test]
    fn test_dig_carves_floor() {
        let (mut you, mut board, mut rng, mut result) = ctx_parts();
        board.set_tile(Coord::new(12, 10), Tile::Rock);
        let mut ctx = EffectCtx {
            aim: Coord::new(14, 10),
            you: &mut you,
            board: &mut board,
            rng: &mut rng,
            power: 50,
            range: 4,
            fail: false,
            result: &mut result,
        };
        assert_eq!(cast_dig(&mut ctx), SpellOutcome::Success);
        assert_eq!(board.tile(Coord::new(12, 10)), Tile::Floor);
    }

    #[test]
    fn test_sublimation_converts_health_to_magic() {
        let (mut you, mut board, mut rng, mut result) = ctx_parts();
        you.mp = 2;
        let mut ctx = EffectCtx {
            aim: you.pos,
            you: &mut you,
            board: &mut board,
            rng: &mut rng,
            power: 50,
            range: 0,
            fail: false,
            result: &mut result,
        };
        assert_eq!(cast_sublimation_of_blood(&mut ctx), SpellOutcome::Success);
        assert!(you.hp < you.hp_max);
        assert!(you.mp > 2);
        assert!(you.hp >= 1);
    }

    #[test]
    fn test_animate_dead_consumes_corpses() {
        let (mut you, mut board, mut rng, mut result) = ctx_parts();
        board.corpses.push(Coord::new(12, 10));
        let mut ctx = EffectCtx {
            aim: you.pos,
            you: &mut you,
            board: &mut board,
            rng: &mut rng,
            power: 50,
            range: LOS_RADIUS,
            fail: false,
            result: &mut result,
        };
        assert_eq!(cast_animate_dead(&mut ctx), SpellOutcome::Success);
        assert!(board.corpses.is_empty());
        assert_eq!(board.monsters.len(), 1);
        assert_eq!(board.monsters[0].attitude, Attitude::Friendly);
        assert_eq!(board.monsters[0].holiness, Holiness::Undead);
    }

    #[test]
    fn test_summon_places_friendly() {
        let (mut you, mut board, mut rng, mut result) = ctx_parts();
        let mut ctx = EffectCtx {
            aim: you.pos,
            you: &mut you,
            board: &mut board,
            rng: &mut rng,
            power: 25,
            range: 2,
            fail: false,
            result: &mut result,
        };
        assert_eq!(cast_summon(&mut ctx, "small mammal", 4), SpellOutcome::Success);
        let summon = &board.monsters[0];
        assert_eq!(summon.attitude, Attitude::Friendly);
        assert!(you.pos.distance(summon.pos) <= 2);
    }

    #[test]
    fn test_revivification_trades_max_hp() {
        let (mut you, mut board, mut rng, mut result) = ctx_parts();
        you.hp = 3;
        let max_before = you.hp_max;
        let mut ctx = EffectCtx {
            aim: you.pos,
            you: &mut you,
            board: &mut board,
            rng: &mut rng,
            power: 0,
            range: 0,
            fail: false,
            result: &mut result,
        };
        assert_eq!(cast_revivification(&mut ctx), SpellOutcome::Success);
        assert!(you.hp_max < max_before);
        assert_eq!(you.hp, you.hp_max);
    }

    #[test]
    fn test_silence_silences_the_caster_too() {
        let (mut you, mut board, mut rng, mut result) = ctx_parts();
        let mut ctx = EffectCtx {
            aim: you.pos,
            you: &mut you,
            board: &mut board,
            rng: &mut rng,
            power: 100,
            range: 4,
            fail: false,
            result: &mut result,
        };
        assert_eq!(cast_silence(&mut ctx), SpellOutcome::Success);
        assert!(you.silenced());
    }
}
