//! Turn orchestration.
//!
//! One player command per turn. After the command resolves, end-of-turn
//! bookkeeping runs: the channelling state machine (which watches whether
//! the command was a wait), duration and status ticks, contamination
//! decay, the zot clock and mana regeneration.

use serde::{Deserialize, Serialize};

use crate::board::{Board, Coord};
use crate::magic::cast::{cast_a_spell, CastError, CastResult};
use crate::magic::channel::handle_channelled_spell;
use crate::magic::spell::Spell;
use crate::monster::{Attitude, Holiness, Monster};
use crate::options::Options;
use crate::player::duration::Duration;
use crate::player::you::You;
use crate::rng::GameRng;
use crate::zot::incr_zot_clock;

/// A player command for one turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    /// Rest in place; continues a channelled spell
    Wait,
    /// Step one cell
    Move { dx: i32, dy: i32 },
    /// Cast a spell, optionally at an explicit aim point
    Cast { spell: Spell, target: Option<Coord> },
    /// Cast without the susceptible-hostile range check and confirmations
    ForceCast { spell: Spell, target: Option<Coord> },
}

impl Command {
    const fn is_wait(&self) -> bool {
        matches!(self, Command::Wait)
    }
}

/// Result of one game turn
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub enum TurnOutcome {
    #[default]
    Continue,
    PlayerDied,
}

/// The full simulation state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub you: You,
    pub board: Board,
    pub rng: GameRng,
    pub options: Options,
    pub turn: u64,
}

impl GameState {
    pub fn new(seed: u64) -> Self {
        Self {
            you: You::default(),
            board: Board::default(),
            rng: GameRng::new(seed),
            options: Options::default(),
            turn: 0,
        }
    }

    /// Execute one player command and the end-of-turn bookkeeping.
    ///
    /// Returns the messages produced and whether the game continues. A
    /// cast that aborts consumes no turn and triggers no bookkeeping.
    pub fn take_turn(&mut self, cmd: Command) -> Result<(Vec<String>, TurnOutcome), CastError> {
        let mut messages = Vec::new();
        let mut took_turn = true;

        match cmd {
            Command::Wait => {}
            Command::Move { dx, dy } => {
                let dest = self.you.pos.offset(dx, dy);
                if self.board.is_open(dest) {
                    self.you.pos = dest;
                } else {
                    messages.push("You bump into something.".to_string());
                    took_turn = false;
                }
            }
            Command::Cast { spell, target } => {
                let result = cast_a_spell(
                    &mut self.you,
                    &mut self.board,
                    &mut self.rng,
                    &self.options,
                    spell,
                    target,
                    true,
                    false,
                )?;
                took_turn = result.took_turn;
                messages.extend(result.messages.clone());
                self.absorb_kills(&result, &mut messages);
            }
            Command::ForceCast { spell, target } => {
                let result = cast_a_spell(
                    &mut self.you,
                    &mut self.board,
                    &mut self.rng,
                    &self.options,
                    spell,
                    target,
                    false,
                    true,
                )?;
                took_turn = result.took_turn;
                messages.extend(result.messages.clone());
                self.absorb_kills(&result, &mut messages);
            }
        }

        if took_turn {
            self.end_of_turn(cmd.is_wait(), &mut messages);
        }

        let outcome = if self.you.dead() {
            TurnOutcome::PlayerDied
        } else {
            TurnOutcome::Continue
        };
        Ok((messages, outcome))
    }

    /// Fold a cast's kills into the board, honouring death channel.
    fn absorb_kills(&mut self, result: &CastResult, messages: &mut Vec<String>) {
        if result.killed.is_empty() {
            return;
        }
        let dead = self.board.reap();
        if self.you.durations.has(Duration::DeathChannel) && !dead.is_empty() {
            // the fallen rise in service
            let mut raised = 0;
            let corpses: Vec<Coord> = self
                .board
                .corpses
                .iter()
                .rev()
                .take(dead.len())
                .copied()
                .collect();
            for pos in corpses {
                if !self.board.is_open(pos) {
                    continue;
                }
                let id = self.board.next_monster_id();
                let mut spectre = Monster::new(id, "spectral thing", pos, 10);
                spectre.attitude = Attitude::Friendly;
                spectre.holiness = Holiness::Undead;
                self.board.monsters.push(spectre);
                self.board.corpses.retain(|&c| c != pos);
                raised += 1;
            }
            if raised > 0 {
                messages.push("A spectral thing rises from the fallen!".to_string());
            }
        }
    }

    fn end_of_turn(&mut self, was_wait: bool, messages: &mut Vec<String>) {
        self.turn += 1;

        // advance any channelled spell before timers move
        let mut channel_result = CastResult::default();
        handle_channelled_spell(
            &mut self.you,
            &mut self.board,
            &mut self.rng,
            was_wait,
            &mut channel_result,
        );
        messages.extend(channel_result.messages);
        if !channel_result.killed.is_empty() {
            self.board.reap();
        }

        for expired in self.you.durations.tick() {
            if let Some(msg) = duration_expiry_message(expired) {
                messages.push(msg.to_string());
            }
        }
        for monster in &mut self.board.monsters {
            monster.status.tick();
        }

        // residue fades slowly
        if self.you.magic_contamination > 0 {
            self.you.magic_contamination -= 1;
        }

        if let Some(msg) = incr_zot_clock(&mut self.you) {
            messages.push(msg);
        }

        // mana trickles back while resting
        if self.turn % 3 == 0 {
            self.you.gain_mp(1);
        }
    }
}

const fn duration_expiry_message(dur: Duration) -> Option<&'static str> {
    match dur {
        Duration::Swiftness => Some("You feel sluggish."),
        Duration::FrostArmour => Some("Your icy armour melts away."),
        Duration::DeathChannel => Some("Your unholy channel expires."),
        Duration::Silenced => Some("Your hearing returns."),
        Duration::NoCast => Some("You regain access to your magic."),
        Duration::DiminishedSpells => Some("Your magic returns to full strength."),
        Duration::Brilliance => Some("You feel less brilliant."),
        Duration::Enkindled => Some("The fire in your mind burns out."),
        _ => None,
    }
}
