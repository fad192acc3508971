//! Assembler configuration.
//!
//! Hosts typically deserialize this from their own settings file; every
//! field has a default so partial documents are accepted.

use serde::{Deserialize, Serialize};

///
/// CONSTANTS
///

/// Relation name under which translation rows are reachable.
pub const DEFAULT_TRANSLATION_RELATION: &str = "translations";

/// Literal separator between the two bounds of a date-range value.
pub const DEFAULT_DATERANGE_DELIMITER: &str = " - ";

///
/// TextMode
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TextMode {
    #[default]
    Cs, // case-sensitive
    Ci, // case-insensitive
}

///
/// AssemblerConfig
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default)]
pub struct AssemblerConfig {
    /// Print `[debug]` lines for every assembly event.
    pub debug: bool,

    /// Case rule applied to substring matches.
    pub text_mode: TextMode,

    pub translation_relation: String,
    pub daterange_delimiter: String,
}

impl Default for AssemblerConfig {
    fn default() -> Self {
        Self {
            debug: false,
            text_mode: TextMode::Cs,
            translation_relation: DEFAULT_TRANSLATION_RELATION.to_string(),
            daterange_delimiter: DEFAULT_DATERANGE_DELIMITER.to_string(),
        }
    }
}
