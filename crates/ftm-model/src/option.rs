//! Compiler switches and their preprocessor stand-ins.
//!
//! Generated tests cannot ask the preprocessor which switches were passed, so
//! every switch `S` is paired with a macro `HASOPT…` that the test driver
//! defines (`-DHASOPT…=1`) whenever it passes `S`.

use serde::Serialize;

use crate::error::{ModelError, Result};

/// Prefix of every switch-presence macro.
pub const OPTION_MACRO_PREFIX: &str = "HASOPT";

/// A compiler switch spelling together with its presence macro.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct CompilerSwitch {
    spelling: String,
    identifier: String,
}

impl CompilerSwitch {
    pub fn parse(spelling: &str) -> Result<Self> {
        Ok(Self {
            spelling: spelling.to_string(),
            identifier: option_identifier(spelling)?,
        })
    }

    pub fn spelling(&self) -> &str {
        &self.spelling
    }

    /// Macro defined by the test driver when this switch is passed.
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// `-D` argument that announces this switch to the generated test.
    pub fn define_arg(&self) -> String {
        format!("-D{}=1", self.identifier)
    }
}

/// A switch that explicitly toggles a feature, paired with its negation.
///
/// "switch passed" and "negation passed" are the two explicit states; when
/// neither is passed the compiler's default behavior applies.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct OptionToken {
    enable: CompilerSwitch,
    disable: CompilerSwitch,
}

impl OptionToken {
    pub fn parse(spelling: &str) -> Result<Self> {
        let negated = negate_option(spelling)?;
        Ok(Self {
            enable: CompilerSwitch::parse(spelling)?,
            disable: CompilerSwitch::parse(&negated)?,
        })
    }

    pub fn enable(&self) -> &CompilerSwitch {
        &self.enable
    }

    pub fn disable(&self) -> &CompilerSwitch {
        &self.disable
    }
}

/// Map a switch spelling onto its presence macro.
///
/// `-fconcepts` becomes `HASOPT_fconcepts`; a negated MSVC switch such as
/// `/Zc:char8_t-` becomes `HASOPT_NO_Zc_char8_t`.
pub fn option_identifier(spelling: &str) -> Result<String> {
    let raw = match spelling.strip_suffix('-') {
        Some(stem) if spelling.starts_with('/') => format!("{OPTION_MACRO_PREFIX}_NO{stem}"),
        _ => format!("{OPTION_MACRO_PREFIX}{spelling}"),
    };
    let identifier = raw.replace(['-', '/', ':'], "_");
    if !identifier
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_')
    {
        return Err(ModelError::InvalidOption {
            spelling: spelling.to_string(),
            message: format!("{identifier} is not a valid identifier"),
        });
    }
    Ok(identifier)
}

/// Spell the switch that turns `spelling` off.
///
/// Only positive spellings can be negated: `-fX` becomes `-fno-X` and the
/// MSVC form `/X` becomes `/X-`.
pub fn negate_option(spelling: &str) -> Result<String> {
    if let Some(rest) = spelling.strip_prefix("-f") {
        if rest.starts_with("no-") {
            return Err(not_negatable(spelling, "already negated"));
        }
        return Ok(format!("-fno-{rest}"));
    }
    if spelling.starts_with('/') {
        if spelling.ends_with('-') {
            return Err(not_negatable(spelling, "already negated"));
        }
        return Ok(format!("{spelling}-"));
    }
    Err(not_negatable(spelling, "expected `-f…` or `/…`"))
}

fn not_negatable(spelling: &str, message: &str) -> ModelError {
    ModelError::InvalidOption {
        spelling: spelling.to_string(),
        message: message.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifiers_follow_switch_spelling() {
        assert_eq!(option_identifier("-fconcepts").unwrap(), "HASOPT_fconcepts");
        assert_eq!(
            option_identifier("-fno-char8_t").unwrap(),
            "HASOPT_fno_char8_t"
        );
        assert_eq!(option_identifier("/Zc:char8_t").unwrap(), "HASOPT_Zc_char8_t");
        assert_eq!(
            option_identifier("/Zc:char8_t-").unwrap(),
            "HASOPT_NO_Zc_char8_t"
        );
    }

    #[test]
    fn rejects_spellings_that_are_not_identifiers() {
        assert!(option_identifier("-std=c++20").is_err());
    }

    #[test]
    fn negation_round_trips_positive_forms_only() {
        assert_eq!(negate_option("-fcoroutines").unwrap(), "-fno-coroutines");
        assert_eq!(negate_option("/permissive").unwrap(), "/permissive-");
        assert!(negate_option("-fno-rtti").is_err());
        assert!(negate_option("/permissive-").is_err());
        assert!(negate_option("-pedantic").is_err());
    }
}
