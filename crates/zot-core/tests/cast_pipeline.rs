//! End-to-end tests of the casting pipeline: costs, outcomes, side
//! effects and the channelling state machine.

use zot_core::board::Coord;
use zot_core::gameloop::{Command, GameState};
use zot_core::magic::cast::{cast_a_spell, your_spells, CastError, SpellOutcome};
use zot_core::magic::spell::Spell;
use zot_core::monster::{Monster, MonsterId};
use zot_core::player::conduct::{ConductType, God};
use zot_core::player::duration::Duration;
use zot_core::player::skills::SkillType;

fn trained_game() -> GameState {
    let mut game = GameState::new(42);
    game.you.pos = Coord::new(10, 10);
    for skill in [
        SkillType::Spellcasting,
        SkillType::Conjurations,
        SkillType::FireMagic,
        SkillType::IceMagic,
        SkillType::AirMagic,
        SkillType::Hexes,
        SkillType::Necromancy,
    ] {
        game.you.skills.set_level(skill, 24);
    }
    game
}

fn add_orc(game: &mut GameState, x: i32, y: i32) -> MonsterId {
    let id = game.board.next_monster_id();
    game.board
        .monsters
        .push(Monster::new(id, "orc", Coord::new(x, y), 20));
    id
}

#[test]
fn aborting_a_cast_never_deducts_mana() {
    let mut game = trained_game();
    game.you.learn_spell(Spell::Freeze);
    game.you.learn_spell(Spell::Fireball);
    let mp = game.you.mp;

    // nothing adjacent: touch spell aborts
    let result = cast_a_spell(
        &mut game.you,
        &mut game.board,
        &mut game.rng,
        &game.options,
        Spell::Freeze,
        Some(Coord::new(11, 10)),
        false,
        true,
    )
    .unwrap();
    assert_eq!(result.outcome, SpellOutcome::Abort);
    assert_eq!(game.you.mp, mp);
    assert!(!result.took_turn);
    assert_eq!(result.mana_spent, 0);

    // no visible hostile: the checked cast aborts
    let result = cast_a_spell(
        &mut game.you,
        &mut game.board,
        &mut game.rng,
        &game.options,
        Spell::Fireball,
        None,
        true,
        false,
    )
    .unwrap();
    assert_eq!(result.outcome, SpellOutcome::Abort);
    assert_eq!(game.you.mp, mp);
}

#[test]
fn successful_cast_spends_mana_and_takes_the_turn() {
    let mut game = trained_game();
    game.you.learn_spell(Spell::MagicDart);
    add_orc(&mut game, 13, 10);
    let mp = game.you.mp;

    let (messages, _) = game
        .take_turn(Command::Cast {
            spell: Spell::MagicDart,
            target: None,
        })
        .unwrap();
    assert_eq!(game.you.mp, mp - Spell::MagicDart.mana_cost());
    assert!(!messages.is_empty());
    assert_eq!(game.turn, 1);
}

#[test]
fn miscast_spends_mana_and_contaminates() {
    let mut game = trained_game();
    game.you.learn_spell(Spell::Fireball);
    add_orc(&mut game, 13, 10);
    let mp = game.you.mp;

    game.you.pay_mana(Spell::Fireball.mana_cost());
    let result = your_spells(
        &mut game.you,
        &mut game.board,
        &mut game.rng,
        Spell::Fireball,
        0,
        true,
        None,
        true, // force the failure roll
    );
    assert_eq!(result.outcome, SpellOutcome::Fail);
    assert!(game.you.magic_contamination > 0);
    assert!(game.you.mp < mp);
    assert!(result.messages.iter().any(|m| m.contains("miscast")));
}

#[test]
fn monster_only_spell_is_a_fatal_error() {
    let mut game = trained_game();
    game.you.learn_spell(Spell::VenomSpit);
    let mp = game.you.mp;
    let err = cast_a_spell(
        &mut game.you,
        &mut game.board,
        &mut game.rng,
        &game.options,
        Spell::VenomSpit,
        Some(Coord::new(12, 10)),
        false,
        true,
    )
    .unwrap_err();
    assert_eq!(err, CastError::NotPlayerCastable("Venom Spit"));
    // even the error path refunds the silently-taken mana
    assert_eq!(game.you.mp, mp);
}

#[test]
fn channelled_spell_enters_and_wait_sustains_it() {
    let mut game = trained_game();
    game.you.learn_spell(Spell::GalvanicCoupling);
    add_orc(&mut game, 13, 10);

    game.take_turn(Command::ForceCast {
        spell: Spell::GalvanicCoupling,
        target: None,
    })
    .unwrap();
    assert!(game.you.channel.active());

    game.take_turn(Command::Wait).unwrap();
    assert!(game.you.channel.active());
    assert_eq!(game.you.channel.charge, 2);
}

#[test]
fn non_wait_action_exits_channelling() {
    let mut game = trained_game();
    game.you.learn_spell(Spell::GalvanicCoupling);
    add_orc(&mut game, 13, 10);

    game.take_turn(Command::ForceCast {
        spell: Spell::GalvanicCoupling,
        target: None,
    })
    .unwrap();
    assert!(game.you.channel.active());

    let (messages, _) = game.take_turn(Command::Move { dx: 0, dy: 1 }).unwrap();
    assert!(!game.you.channel.active());
    assert!(messages.iter().any(|m| m.contains("dissipates")));
}

#[test]
fn coupling_discharge_kills_a_hostile() {
    let mut game = trained_game();
    game.you.learn_spell(Spell::GalvanicCoupling);
    let orc = add_orc(&mut game, 13, 10);

    game.take_turn(Command::ForceCast {
        spell: Spell::GalvanicCoupling,
        target: None,
    })
    .unwrap();
    let mut slain = false;
    for _ in 0..4 {
        let (messages, _) = game.take_turn(Command::Wait).unwrap();
        if messages.iter().any(|m| m.contains("slaying")) {
            slain = true;
            break;
        }
    }
    assert!(slain);
    assert!(game.board.monster(orc).is_none());
    assert!(!game.you.channel.active());
}

#[test]
fn evil_casting_offends_the_good_god() {
    let mut game = trained_game();
    game.you.religion = zot_core::player::conduct::Religion::new(God::Aster);
    game.you.learn_spell(Spell::AnimateDead);

    // an unforced cast refuses to commit the conduct
    let result = cast_a_spell(
        &mut game.you,
        &mut game.board,
        &mut game.rng,
        &game.options,
        Spell::AnimateDead,
        None,
        false,
        false,
    )
    .unwrap();
    assert_eq!(result.outcome, SpellOutcome::Abort);
    assert!(!game.you.religion.under_penance());

    // forcing it does, and the god notices
    let result = cast_a_spell(
        &mut game.you,
        &mut game.board,
        &mut game.rng,
        &game.options,
        Spell::AnimateDead,
        None,
        false,
        true,
    )
    .unwrap();
    assert_eq!(result.outcome, SpellOutcome::Success);
    assert!(game.you.religion.under_penance());
    assert!(game
        .you
        .religion
        .log
        .iter()
        .any(|e| e.conduct == ConductType::Evil));
}

#[test]
fn hasty_spell_commits_the_hasty_conduct() {
    let mut game = trained_game();
    game.you.learn_spell(Spell::Swiftness);
    let result = cast_a_spell(
        &mut game.you,
        &mut game.board,
        &mut game.rng,
        &game.options,
        Spell::Swiftness,
        None,
        false,
        true,
    )
    .unwrap();
    assert_eq!(result.outcome, SpellOutcome::Success);
    assert!(game.you.durations.has(Duration::Swiftness));
    assert!(game
        .you
        .religion
        .log
        .iter()
        .any(|e| e.conduct == ConductType::Hasty));
}

#[test]
fn wizardly_item_refunds_mana_on_miscast() {
    // an untrained caster reaching far above their skill always miscasts
    let mut game = GameState::new(9);
    game.you.pos = Coord::new(10, 10);
    game.you.hp_max = 100;
    game.you.hp = 100;
    game.you.enhancers.channelling_sources = 4;
    game.you.learn_spell(Spell::FireStorm);
    add_orc(&mut game, 13, 10);

    let mp = game.you.mp;
    let result = cast_a_spell(
        &mut game.you,
        &mut game.board,
        &mut game.rng,
        &game.options,
        Spell::FireStorm,
        None,
        false,
        true,
    )
    .unwrap();
    assert_eq!(result.outcome, SpellOutcome::Fail);
    // miscasts always get their mana back through a wizardly item
    assert_eq!(game.you.mp, mp);
    assert!(result
        .messages
        .iter()
        .any(|m| m.contains("Magical energy flows into your mind!")));
    assert!(game.you.magic_contamination > 0);
}

#[test]
fn sap_magic_locks_out_casting_after_a_cast() {
    let mut game = trained_game();
    game.you.learn_spell(Spell::MagicDart);
    game.you.durations.set(Duration::SapMagic, 10);
    add_orc(&mut game, 13, 10);

    let result = cast_a_spell(
        &mut game.you,
        &mut game.board,
        &mut game.rng,
        &game.options,
        Spell::MagicDart,
        None,
        false,
        true,
    )
    .unwrap();
    assert_eq!(result.outcome, SpellOutcome::Success);
    assert!(game.you.durations.has(Duration::NoCast));

    let result = cast_a_spell(
        &mut game.you,
        &mut game.board,
        &mut game.rng,
        &game.options,
        Spell::MagicDart,
        None,
        false,
        true,
    )
    .unwrap();
    assert_eq!(result.outcome, SpellOutcome::Abort);
}

#[test]
fn casting_gates_abort_without_cost() {
    let mut game = trained_game();
    game.you.learn_spell(Spell::MagicDart);
    add_orc(&mut game, 13, 10);
    let mp = game.you.mp;

    for gate in [Duration::Berserk, Duration::Confusion, Duration::Silenced] {
        game.you.durations.set(gate, 3);
        let result = cast_a_spell(
            &mut game.you,
            &mut game.board,
            &mut game.rng,
            &game.options,
            Spell::MagicDart,
            None,
            false,
            true,
        )
        .unwrap();
        assert_eq!(result.outcome, SpellOutcome::Abort);
        assert_eq!(game.you.mp, mp);
        game.you.durations.clear(gate);
    }
}

#[test]
fn game_state_survives_serde() {
    let mut game = trained_game();
    game.you.learn_spell(Spell::MagicDart);
    add_orc(&mut game, 13, 10);
    game.take_turn(Command::Cast {
        spell: Spell::MagicDart,
        target: None,
    })
    .unwrap();

    let json = serde_json::to_string(&game).unwrap();
    let restored: GameState = serde_json::from_str(&json).unwrap();
    assert_eq!(restored.turn, game.turn);
    assert_eq!(restored.you.mp, game.you.mp);
    assert_eq!(restored.you.spells, game.you.spells);
    assert_eq!(restored.board.monsters.len(), game.board.monsters.len());
}
