//! The dungeon board spells are traced over.
//!
//! A deliberately small slice of the dungeon model: terrain occupancy,
//! monster placement and line of sight. Level generation, items and
//! everything else live outside this crate.

use serde::{Deserialize, Serialize};
use strum::Display;

use crate::consts::{GRID_HEIGHT, GRID_WIDTH, LOS_RADIUS};
use crate::monster::{Monster, MonsterId};

/// A board coordinate
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize,
)]
pub struct Coord {
    pub x: i32,
    pub y: i32,
}

impl Coord {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Chebyshev distance: the number of king moves between two cells
    pub fn distance(&self, other: Coord) -> i32 {
        (self.x - other.x).abs().max((self.y - other.y).abs())
    }

    pub fn adjacent(&self, other: Coord) -> bool {
        *self != other && self.distance(other) == 1
    }

    /// Unit step toward a target (king move)
    pub fn step_toward(&self, target: Coord) -> Coord {
        Coord::new(
            self.x + (target.x - self.x).signum(),
            self.y + (target.y - self.y).signum(),
        )
    }

    pub fn offset(&self, dx: i32, dy: i32) -> Coord {
        Coord::new(self.x + dx, self.y + dy)
    }
}

/// Terrain type of a single cell
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display,
)]
#[repr(u8)]
pub enum Tile {
    #[default]
    Floor = 0,
    /// Built wall; diggable
    Wall = 1,
    /// Unworked rock; diggable, passwallable
    Rock = 2,
    /// Permanent boundary; stops everything
    Boundary = 3,
}

impl Tile {
    pub const fn is_solid(&self) -> bool {
        !matches!(self, Tile::Floor)
    }

    pub const fn is_diggable(&self) -> bool {
        matches!(self, Tile::Wall | Tile::Rock)
    }
}

/// One dungeon level: terrain grid plus monsters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Board {
    width: usize,
    height: usize,
    tiles: Vec<Tile>,
    pub monsters: Vec<Monster>,
    /// Where the fallen lie; food for necromancy
    pub corpses: Vec<Coord>,
}

impl Default for Board {
    fn default() -> Self {
        Self::new(GRID_WIDTH, GRID_HEIGHT)
    }
}

impl Board {
    /// Create an open board ringed by boundary cells
    pub fn new(width: usize, height: usize) -> Self {
        let mut board = Self {
            width,
            height,
            tiles: vec![Tile::Floor; width * height],
            monsters: Vec::new(),
            corpses: Vec::new(),
        };
        for x in 0..width as i32 {
            board.set_tile(Coord::new(x, 0), Tile::Boundary);
            board.set_tile(Coord::new(x, height as i32 - 1), Tile::Boundary);
        }
        for y in 0..height as i32 {
            board.set_tile(Coord::new(0, y), Tile::Boundary);
            board.set_tile(Coord::new(width as i32 - 1, y), Tile::Boundary);
        }
        board
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn in_bounds(&self, pos: Coord) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as usize) < self.width && (pos.y as usize) < self.height
    }

    pub fn tile(&self, pos: Coord) -> Tile {
        if !self.in_bounds(pos) {
            return Tile::Boundary;
        }
        self.tiles[pos.y as usize * self.width + pos.x as usize]
    }

    pub fn set_tile(&mut self, pos: Coord, tile: Tile) {
        if self.in_bounds(pos) {
            self.tiles[pos.y as usize * self.width + pos.x as usize] = tile;
        }
    }

    pub fn is_solid(&self, pos: Coord) -> bool {
        self.tile(pos).is_solid()
    }

    /// Walkable for actors: open terrain and nobody standing there
    pub fn is_open(&self, pos: Coord) -> bool {
        !self.is_solid(pos) && self.monster_at(pos).is_none()
    }

    pub fn monster_at(&self, pos: Coord) -> Option<&Monster> {
        self.monsters.iter().find(|m| m.alive() && m.pos == pos)
    }

    pub fn monster_at_mut(&mut self, pos: Coord) -> Option<&mut Monster> {
        self.monsters.iter_mut().find(|m| m.alive() && m.pos == pos)
    }

    pub fn monster(&self, id: MonsterId) -> Option<&Monster> {
        self.monsters.iter().find(|m| m.id == id)
    }

    pub fn monster_mut(&mut self, id: MonsterId) -> Option<&mut Monster> {
        self.monsters.iter_mut().find(|m| m.id == id)
    }

    /// Straight-line visibility check: no solid cell strictly between the
    /// two endpoints, and within LOS radius.
    pub fn see_cell(&self, from: Coord, to: Coord) -> bool {
        if from.distance(to) > LOS_RADIUS {
            return false;
        }
        let mut cur = from;
        while cur != to {
            cur = cur.step_toward(to);
            if cur == to {
                break;
            }
            if self.is_solid(cur) {
                return false;
            }
        }
        true
    }

    /// Monsters visible from a position, nearest first
    pub fn visible_monsters(&self, from: Coord) -> Vec<&Monster> {
        let mut seen: Vec<&Monster> = self
            .monsters
            .iter()
            .filter(|m| m.alive() && self.see_cell(from, m.pos))
            .collect();
        seen.sort_by_key(|m| from.distance(m.pos));
        seen
    }

    /// Nearest visible hostile monster, if any
    pub fn nearest_hostile(&self, from: Coord) -> Option<&Monster> {
        self.visible_monsters(from)
            .into_iter()
            .find(|m| m.is_hostile())
    }

    /// Open cells within `radius` of `center`, for blink targets and
    /// summon placement
    pub fn open_cells_within(&self, center: Coord, radius: i32) -> Vec<Coord> {
        let mut cells = Vec::new();
        for dy in -radius..=radius {
            for dx in -radius..=radius {
                let pos = center.offset(dx, dy);
                if pos != center && self.is_open(pos) && self.see_cell(center, pos) {
                    cells.push(pos);
                }
            }
        }
        cells
    }

    /// Remove dead monsters, leaving corpses behind; returns their ids
    pub fn reap(&mut self) -> Vec<MonsterId> {
        let dead: Vec<MonsterId> = self
            .monsters
            .iter()
            .filter(|m| !m.alive())
            .map(|m| m.id)
            .collect();
        for m in self.monsters.iter().filter(|m| !m.alive()) {
            self.corpses.push(m.pos);
        }
        self.monsters.retain(|m| m.alive());
        dead
    }

    /// The next unused monster id
    pub fn next_monster_id(&self) -> MonsterId {
        MonsterId(self.monsters.iter().map(|m| m.id.0 + 1).max().unwrap_or(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::monster::MonsterId;

    #[test]
    fn test_distance_is_chebyshev() {
        assert_eq!(Coord::new(0, 0).distance(Coord::new(3, 1)), 3);
        assert_eq!(Coord::new(5, 5).distance(Coord::new(5, 5)), 0);
        assert_eq!(Coord::new(2, 2).distance(Coord::new(3, 3)), 1);
    }

    #[test]
    fn test_adjacent_excludes_self() {
        let c = Coord::new(4, 4);
        assert!(!c.adjacent(c));
        assert!(c.adjacent(Coord::new(5, 5)));
        assert!(!c.adjacent(Coord::new(6, 4)));
    }

    #[test]
    fn test_boundary_ring() {
        let board = Board::new(10, 10);
        assert_eq!(board.tile(Coord::new(0, 5)), Tile::Boundary);
        assert_eq!(board.tile(Coord::new(9, 0)), Tile::Boundary);
        assert_eq!(board.tile(Coord::new(4, 4)), Tile::Floor);
        // out of bounds reads as boundary
        assert_eq!(board.tile(Coord::new(-1, -1)), Tile::Boundary);
    }

    #[test]
    fn test_wall_blocks_sight() {
        let mut board = Board::new(20, 20);
        let from = Coord::new(3, 3);
        let to = Coord::new(8, 3);
        assert!(board.see_cell(from, to));
        board.set_tile(Coord::new(5, 3), Tile::Wall);
        assert!(!board.see_cell(from, to));
        // the wall itself is still visible as an endpoint
        assert!(board.see_cell(from, Coord::new(5, 3)));
    }

    #[test]
    fn test_los_radius_limit() {
        let board = Board::new(40, 40);
        let from = Coord::new(10, 10);
        assert!(board.see_cell(from, Coord::new(17, 10)));
        assert!(!board.see_cell(from, Coord::new(18, 10)));
    }

    #[test]
    fn test_reap_removes_dead() {
        let mut board = Board::new(10, 10);
        let mut m = Monster::new(MonsterId(1), "rat", Coord::new(2, 2), 5);
        m.hurt(10);
        board.monsters.push(m);
        board
            .monsters
            .push(Monster::new(MonsterId(2), "bat", Coord::new(3, 3), 5));
        let dead = board.reap();
        assert_eq!(dead, vec![MonsterId(1)]);
        assert_eq!(board.monsters.len(), 1);
    }
}
