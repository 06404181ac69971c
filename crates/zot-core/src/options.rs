//! Game options relevant to the casting layer.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// User-configurable casting options
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Options {
    /// Warn before casts that could push contamination into the red
    pub warn_contam_cost: bool,
    /// Always resolve a static targeter for untargeted spells
    pub always_use_static_spell_targeters: bool,
    /// Spell name fragments that demand confirmation before casting
    pub confirm_action: Vec<String>,
    /// Offer the last cast spell for quick recasting
    pub enable_recast_spell: bool,
    /// Dim cells beyond spell range in the aiming view
    pub darken_beyond_range: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            warn_contam_cost: true,
            always_use_static_spell_targeters: false,
            confirm_action: Vec::new(),
            enable_recast_spell: true,
            darken_beyond_range: true,
        }
    }
}

/// Failure to parse an options file
#[derive(Debug, Error)]
pub enum OptionsError {
    #[error("malformed options: {0}")]
    Parse(#[from] serde_json::Error),
}

impl Options {
    /// Load options from their JSON representation. Unknown keys are
    /// rejected so typos surface instead of silently defaulting.
    pub fn from_json(text: &str) -> Result<Self, OptionsError> {
        Ok(serde_json::from_str(text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let opts = Options::default();
        assert!(opts.warn_contam_cost);
        assert!(opts.confirm_action.is_empty());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let opts = Options::from_json(r#"{"warn_contam_cost": false}"#).unwrap();
        assert!(!opts.warn_contam_cost);
        assert!(opts.enable_recast_spell);
    }

    #[test]
    fn test_confirm_list_roundtrip() {
        let opts =
            Options::from_json(r#"{"confirm_action": ["Fire Storm", "Revivification"]}"#).unwrap();
        assert_eq!(opts.confirm_action.len(), 2);
    }

    #[test]
    fn test_malformed_json_errors() {
        assert!(Options::from_json("{not json").is_err());
    }
}
