//! Spell targeters.
//!
//! A targeter is built per cast from (spell, power, range) and answers two
//! questions: is this aim legal, and which cells does the spell touch.
//! The interactive aiming UI and the monster AI both drive the same
//! objects.

use serde::{Deserialize, Serialize};

use crate::board::{Board, Coord};
use crate::consts::LOS_RADIUS;
use crate::magic::spell::{Spell, SpellFlags};

/// Whether a cell is certainly or only possibly affected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AffectType {
    Maybe,
    Yes,
}

/// Targeting geometry for one cast
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Targeter {
    /// Projectile along a path; stops at the first thing hit unless
    /// piercing, optionally exploding at the endpoint
    Beam {
        range: i32,
        pierce: bool,
        explosion_radius: i32,
    },
    /// Lands directly on any visible cell in range, affecting a ball
    Smite { range: i32, radius: i32 },
    /// Quarter-circle sweep toward the aim
    Cone { range: i32 },
    /// Arcs from victim to victim, starting near the caster
    Chain { range: i32 },
    /// Everything within a radius of the caster
    Radius { radius: i32, min_radius: i32 },
    /// A precomputed set of candidate cells (blink sites and the like)
    MultiPosition { spots: Vec<Coord> },
    /// Adjacent cells only
    Touch,
    /// The caster alone
    SelfTarget,
    /// Through-wall travel: aim picks a wall face, travel depth is ranged
    Passwall { range: i32 },
    /// A beam that eats diggable walls instead of stopping
    DigBeam { range: i32 },
}

/// Trace a projectile path from `from` toward `to`.
///
/// The path enters at most `range` cells. It stops on solid terrain
/// (included when `through_walls` digs it) and on the first occupied cell
/// unless `pierce` lets it continue.
pub(crate) fn trace_beam(
    board: &Board,
    from: Coord,
    to: Coord,
    range: i32,
    pierce: bool,
    through_walls: bool,
) -> Vec<Coord> {
    let mut path = Vec::new();
    if from == to {
        return path;
    }
    // past the aim point a piercing beam keeps its heading
    let heading = ((to.x - from.x).signum(), (to.y - from.y).signum());
    let mut cur = from;
    for _ in 0..range {
        let next = if cur == to {
            cur.offset(heading.0, heading.1)
        } else {
            cur.step_toward(to)
        };
        if next == cur {
            break;
        }
        cur = next;
        if board.is_solid(cur) {
            if through_walls && board.tile(cur).is_diggable() {
                path.push(cur);
                continue;
            }
            break;
        }
        path.push(cur);
        if board.monster_at(cur).is_some() && !pierce {
            break;
        }
        if cur == to && !pierce {
            break;
        }
    }
    path
}

/// Resolve the targeter for a spell at the given power and range.
///
/// Spells whose effect needs no geometry at all return `SelfTarget` via
/// the self-enchantment fallback; a `None` here means the spell cannot be
/// cast by the player pipeline.
pub fn find_spell_targeter(spell: Spell, power: i32, range: i32) -> Option<Targeter> {
    let targeter = match spell {
        Spell::Fireball => Targeter::Beam {
            range,
            pierce: false,
            explosion_radius: 1,
        },
        Spell::MephiticCloud => Targeter::Beam {
            range,
            pierce: false,
            explosion_radius: 1,
        },
        Spell::LightningBolt => Targeter::Beam {
            range,
            pierce: true,
            explosion_radius: 0,
        },
        Spell::MagicDart
        | Spell::SearingRay
        | Spell::StickyFlame
        | Spell::Slow
        | Spell::Confuse
        | Spell::TeleportOther
        | Spell::Pain
        | Spell::VenomSpit => Targeter::Beam {
            range,
            pierce: false,
            explosion_radius: 0,
        },
        Spell::FireStorm => Targeter::Smite {
            range,
            radius: if power > 100 { 3 } else { 2 },
        },
        Spell::Airstrike => Targeter::Smite { range, radius: 0 },
        Spell::Glaciate => Targeter::Cone { range },
        Spell::ChainLightning => Targeter::Chain { range },
        Spell::MysticBlast | Spell::Irradiate | Spell::PolarVortex | Spell::AnimateDead => {
            Targeter::Radius {
                radius: range,
                min_radius: 0,
            }
        }
        Spell::Refrigeration | Spell::CauseFear | Spell::GalvanicCoupling => Targeter::Radius {
            radius: LOS_RADIUS,
            min_radius: 1,
        },
        Spell::FlameWave => Targeter::Radius {
            radius: range,
            min_radius: 1,
        },
        Spell::Silence => Targeter::Radius {
            radius: range,
            min_radius: 0,
        },
        Spell::Freeze | Spell::VampiricDraining | Spell::ConfusingTouch => Targeter::Touch,
        Spell::Passwall => Targeter::Passwall { range },
        Spell::Dig => Targeter::DigBeam { range },
        Spell::SummonSmallMammal | Spell::CallImp | Spell::SummonIceBeast => Targeter::Radius {
            radius: 2,
            min_radius: 1,
        },
        Spell::Blink => Targeter::MultiPosition { spots: Vec::new() },
        _ => {
            // self-enchantments fall back to a self targeter
            if spell.flags().contains(SpellFlags::SELFENCH) {
                Targeter::SelfTarget
            } else {
                return None;
            }
        }
    };
    Some(targeter)
}

impl Targeter {
    /// Check an aim point for legality. Untargeted geometries accept any
    /// aim (it is ignored).
    pub fn valid_aim(&self, board: &Board, caster: Coord, aim: Coord) -> Result<(), String> {
        match self {
            Targeter::Beam { range, .. } => {
                if caster.distance(aim) > *range {
                    Err("Out of range.".to_string())
                } else {
                    Ok(())
                }
            }
            Targeter::Smite { range, .. } => {
                if caster.distance(aim) > *range {
                    Err("Out of range.".to_string())
                } else if !board.see_cell(caster, aim) {
                    Err("You can't see that place.".to_string())
                } else {
                    Ok(())
                }
            }
            Targeter::Cone { .. } | Targeter::Chain { .. } => Ok(()),
            Targeter::Touch => {
                if caster.adjacent(aim) {
                    Ok(())
                } else {
                    Err("That is beyond your reach.".to_string())
                }
            }
            Targeter::Passwall { range } => {
                let depth = passwall_exit(board, caster, aim, *range);
                if !board.is_solid(aim) || !caster.adjacent(aim) {
                    Err("There is no wall there.".to_string())
                } else if depth.is_none() {
                    Err("The wall is too deep to pass through.".to_string())
                } else {
                    Ok(())
                }
            }
            Targeter::DigBeam { .. } => Ok(()),
            Targeter::MultiPosition { .. }
            | Targeter::Radius { .. }
            | Targeter::SelfTarget => Ok(()),
        }
    }

    /// Cells this cast would touch, with certainty annotations.
    pub fn affected_cells(
        &self,
        board: &Board,
        caster: Coord,
        aim: Coord,
    ) -> Vec<(Coord, AffectType)> {
        match self {
            Targeter::Beam {
                range,
                pierce,
                explosion_radius,
            } => {
                let path = trace_beam(board, caster, aim, *range, *pierce, false);
                let mut cells: Vec<(Coord, AffectType)> =
                    path.iter().map(|&c| (c, AffectType::Yes)).collect();
                if *explosion_radius > 0 {
                    if let Some(&center) = path.last() {
                        for cell in ball_around(board, center, *explosion_radius) {
                            if cell != center {
                                cells.push((cell, AffectType::Maybe));
                            }
                        }
                    }
                }
                cells
            }
            Targeter::Smite { radius, .. } => ball_around(board, aim, *radius)
                .into_iter()
                .map(|c| (c, AffectType::Yes))
                .collect(),
            Targeter::Cone { range } => cone_cells(board, caster, aim, *range)
                .into_iter()
                .map(|c| (c, AffectType::Yes))
                .collect(),
            Targeter::Chain { range } => chain_targets(board, caster, *range)
                .into_iter()
                .map(|c| (c, AffectType::Maybe))
                .collect(),
            Targeter::Radius { radius, min_radius } => {
                let mut cells = Vec::new();
                for dy in -radius..=*radius {
                    for dx in -radius..=*radius {
                        let pos = caster.offset(dx, dy);
                        let dist = caster.distance(pos);
                        if dist < *min_radius || dist > *radius {
                            continue;
                        }
                        if board.in_bounds(pos) && board.see_cell(caster, pos) {
                            cells.push((pos, AffectType::Yes));
                        }
                    }
                }
                cells
            }
            Targeter::MultiPosition { spots } => {
                spots.iter().map(|&c| (c, AffectType::Maybe)).collect()
            }
            Targeter::Touch => {
                if caster.adjacent(aim) {
                    vec![(aim, AffectType::Yes)]
                } else {
                    Vec::new()
                }
            }
            Targeter::SelfTarget => vec![(caster, AffectType::Yes)],
            Targeter::Passwall { range } => passwall_exit(board, caster, aim, *range)
                .map(|exit| vec![(exit, AffectType::Yes)])
                .unwrap_or_default(),
            Targeter::DigBeam { range } => {
                trace_beam(board, caster, aim, *range, false, true)
                    .into_iter()
                    .map(|c| (c, AffectType::Yes))
                    .collect()
            }
        }
    }

    /// Does this targeter touch walls? Affects how the aiming UI
    /// describes cells.
    pub fn can_affect_walls(&self) -> bool {
        matches!(self, Targeter::Passwall { .. } | Targeter::DigBeam { .. })
    }
}

/// Open cells in a ball, the center included when open
fn ball_around(board: &Board, center: Coord, radius: i32) -> Vec<Coord> {
    let mut cells = Vec::new();
    for dy in -radius..=radius {
        for dx in -radius..=radius {
            let pos = center.offset(dx, dy);
            if board.in_bounds(pos) && !board.is_solid(pos) {
                cells.push(pos);
            }
        }
    }
    cells
}

/// Cells inside a quarter-circle sweep toward `aim`
fn cone_cells(board: &Board, caster: Coord, aim: Coord, range: i32) -> Vec<Coord> {
    let dir_x = (aim.x - caster.x).signum();
    let dir_y = (aim.y - caster.y).signum();
    if dir_x == 0 && dir_y == 0 {
        return Vec::new();
    }
    let mut cells = Vec::new();
    for dy in -range..=range {
        for dx in -range..=range {
            let pos = caster.offset(dx, dy);
            let dist = caster.distance(pos);
            if dist == 0 || dist > range {
                continue;
            }
            // inside the 90-degree sector around the aim direction
            let toward = dx * dir_x + dy * dir_y;
            let across = (dx * dir_y - dy * dir_x).abs();
            if toward <= 0 || across > toward {
                continue;
            }
            if board.in_bounds(pos) && board.see_cell(caster, pos) {
                cells.push(pos);
            }
        }
    }
    cells
}

/// Victim positions a chain arc would visit, nearest first. The arc jumps
/// between monsters no more than `arc` apart.
pub(crate) fn chain_targets(board: &Board, caster: Coord, range: i32) -> Vec<Coord> {
    const ARC_LENGTH: i32 = 4;
    let mut visited: Vec<Coord> = Vec::new();
    let mut cur = caster;
    loop {
        let next = board
            .visible_monsters(caster)
            .into_iter()
            .filter(|m| m.is_hostile() && !visited.contains(&m.pos))
            .filter(|m| cur.distance(m.pos) <= if cur == caster { range } else { ARC_LENGTH })
            .min_by_key(|m| cur.distance(m.pos));
        match next {
            Some(m) => {
                visited.push(m.pos);
                cur = m.pos;
            }
            None => break,
        }
    }
    visited
}

/// Exit cell for through-wall travel: step into the aimed wall face and
/// keep going until open ground, within `range` cells of rock.
fn passwall_exit(board: &Board, caster: Coord, aim: Coord, range: i32) -> Option<Coord> {
    if !caster.adjacent(aim) || !board.is_solid(aim) {
        return None;
    }
    let dx = aim.x - caster.x;
    let dy = aim.y - caster.y;
    let mut cur = aim;
    for _ in 0..range {
        if !board.tile(cur).is_diggable() {
            return None;
        }
        let next = cur.offset(dx, dy);
        if !board.in_bounds(next) {
            return None;
        }
        if !board.is_solid(next) {
            return board.is_open(next).then_some(next);
        }
        cur = next;
    }
    None
}
