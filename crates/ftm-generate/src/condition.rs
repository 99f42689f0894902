//! Compile one fact into the preprocessor condition that selects it.

use std::fmt;

use ftm_model::{CompilerSwitch, Fact, OptionToken, StandardLadder};

use crate::error::{GenerateError, Result};

/// Macro the test driver defines when strict/pedantic mode is off.
pub const NON_PEDANTIC_MACRO: &str = "NO_pedantic";

/// Conjunction of independent preprocessor tests. Empty means always true.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Condition {
    conjuncts: Vec<String>,
}

impl Condition {
    pub fn always() -> Self {
        Self::default()
    }

    pub fn is_always(&self) -> bool {
        self.conjuncts.is_empty()
    }

    pub fn conjuncts(&self) -> &[String] {
        &self.conjuncts
    }

    pub fn push(&mut self, conjunct: impl Into<String>) {
        self.conjuncts.push(conjunct.into());
    }

    /// A copy of this condition with one more conjunct.
    pub fn and(&self, conjunct: impl Into<String>) -> Self {
        let mut extended = self.clone();
        extended.push(conjunct);
        extended
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_always() {
            return f.write_str("1");
        }
        f.write_str(&self.conjuncts.join(" && "))
    }
}

/// The two explicit states of an option toggle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToggleTests {
    /// Some positive spelling was passed.
    pub enabled: String,
    /// Some negated spelling was passed.
    pub disabled: String,
}

/// A fact's guard, split into the shared condition and the optional toggle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledFact {
    pub value: u32,
    pub condition: Condition,
    pub toggle: Option<ToggleTests>,
}

impl CompiledFact {
    pub fn is_unconditional(&self) -> bool {
        self.condition.is_always() && self.toggle.is_none()
    }
}

/// Build the condition under which `fact` applies.
pub fn compile_fact(fact: &Fact, ladder: &StandardLadder) -> Result<CompiledFact> {
    let mut condition = Condition::always();
    if let Some(since) = &fact.since {
        let rung = ladder.require(since)?;
        if let Some(watermark) = ladder.previous_watermark(rung) {
            condition.push(format!("__cplusplus > {watermark}"));
        }
    }
    if !fact.enabled_by.is_empty() {
        condition.push(join_switches(&fact.enabled_by, "", " && "));
    }
    if !fact.disabled_by.is_empty() {
        condition.push(join_switches(&fact.disabled_by, "!", " && "));
    }
    if let Some(depends) = &fact.depends {
        condition.push(format!("({depends})"));
    }
    if fact.strict_sensitive {
        condition.push(NON_PEDANTIC_MACRO);
    }
    let toggle = if fact.toggle.is_empty() {
        None
    } else {
        Some(toggle_tests(&fact.toggle)?)
    };
    Ok(CompiledFact {
        value: fact.value,
        condition,
        toggle,
    })
}

/// `(A || B)` over the positive spellings and the same over the negations.
pub fn toggle_tests(tokens: &[OptionToken]) -> Result<ToggleTests> {
    if tokens.is_empty() {
        return Err(GenerateError::EmptyToggle);
    }
    let enable: Vec<&CompilerSwitch> = tokens.iter().map(OptionToken::enable).collect();
    let disable: Vec<&CompilerSwitch> = tokens.iter().map(OptionToken::disable).collect();
    Ok(ToggleTests {
        enabled: format!("({})", join_refs(&enable, " || ")),
        disabled: format!("({})", join_refs(&disable, " || ")),
    })
}

fn join_switches(switches: &[CompilerSwitch], prefix: &str, separator: &str) -> String {
    switches
        .iter()
        .map(|switch| format!("{prefix}{}", switch.identifier()))
        .collect::<Vec<_>>()
        .join(separator)
}

fn join_refs(switches: &[&CompilerSwitch], separator: &str) -> String {
    switches
        .iter()
        .map(|switch| switch.identifier())
        .collect::<Vec<_>>()
        .join(separator)
}
