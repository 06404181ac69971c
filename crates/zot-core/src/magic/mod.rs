//! The magic system: spell data, power, targeting, casting, channelling
//! and evoked effects.

pub mod beam;
pub mod cast;
pub mod channel;
pub mod effects;
pub mod evoke;
pub mod fail;
pub mod power;
pub mod spell;
pub mod targeting;

pub use beam::{zap_damage, BeamFlavour, DiceDef};
pub use cast::{
    can_cast_spells, cast_a_spell, your_spells, CastError, CastResult, SpellOutcome,
};
pub use channel::{channelled_spell_active, ChannelState, ChannelTick};
pub use evoke::{evoke_item, Evoker, EvokerCharges};
pub use fail::{fail_severity, failure_rate_string, raw_spell_fail, FailSeverity};
pub use power::{
    calc_spell_power, calc_spell_range, hex_success_chance, spell_damage_string,
    spell_power_percent, spell_range_string,
};
pub use spell::{Spell, SpellFlags, SpellSchools};
pub use targeting::{find_spell_targeter, AffectType, Targeter};
