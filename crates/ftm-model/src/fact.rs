use serde::Serialize;

use crate::error::{ModelError, Result};
use crate::option::{CompilerSwitch, OptionToken};
use crate::standard::StandardLadder;

/// One recorded value of a feature-test identifier for one implementation,
/// together with the condition under which it holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Fact {
    pub value: u32,
    /// Standard revision that introduced the value.
    pub since: Option<String>,
    /// Switches that explicitly toggle the value on (and, negated, off).
    pub toggle: Vec<OptionToken>,
    /// Switches that must all be present.
    pub enabled_by: Vec<CompilerSwitch>,
    /// Switches that must all be absent.
    pub disabled_by: Vec<CompilerSwitch>,
    /// Opaque preprocessor expression over other identifiers.
    pub depends: Option<String>,
    /// Value is suppressed under strict/pedantic mode.
    pub strict_sensitive: bool,
    /// Standard this value was retroactively applied to by a defect report.
    pub dr_against: Option<String>,
}

impl Fact {
    pub fn new(value: u32) -> Self {
        Self {
            value,
            since: None,
            toggle: Vec::new(),
            enabled_by: Vec::new(),
            disabled_by: Vec::new(),
            depends: None,
            strict_sensitive: false,
            dr_against: None,
        }
    }

    pub fn since(mut self, standard: impl Into<String>) -> Self {
        self.since = Some(standard.into());
        self
    }

    pub fn toggled_by(mut self, token: OptionToken) -> Self {
        self.toggle.push(token);
        self
    }

    pub fn enabled_by(mut self, switch: CompilerSwitch) -> Self {
        self.enabled_by.push(switch);
        self
    }

    pub fn disabled_by(mut self, switch: CompilerSwitch) -> Self {
        self.disabled_by.push(switch);
        self
    }

    pub fn depends(mut self, expression: impl Into<String>) -> Self {
        self.depends = Some(expression.into());
        self
    }

    pub fn strict_sensitive(mut self) -> Self {
        self.strict_sensitive = true;
        self
    }

    pub fn dr_against(mut self, standard: impl Into<String>) -> Self {
        self.dr_against = Some(standard.into());
        self
    }

    /// Whether any part of the fact restricts when it applies.
    ///
    /// `since` naming the first revision restricts nothing.
    pub fn has_condition(&self, ladder: &StandardLadder) -> bool {
        let since_restricts = self
            .since
            .as_deref()
            .and_then(|name| ladder.rung(name))
            .is_some_and(|rung| ladder.previous_watermark(rung).is_some());
        since_restricts
            || !self.toggle.is_empty()
            || !self.enabled_by.is_empty()
            || !self.disabled_by.is_empty()
            || self.depends.is_some()
            || self.strict_sensitive
    }

    /// Every switch this fact mentions, in the order the test driver runs them.
    pub fn switches(&self) -> impl Iterator<Item = &CompilerSwitch> {
        self.toggle
            .iter()
            .map(OptionToken::enable)
            .chain(self.toggle.iter().map(OptionToken::disable))
            .chain(self.enabled_by.iter())
            .chain(self.disabled_by.iter())
    }

    fn check_shape(&self, ladder: &StandardLadder) -> Result<()> {
        if let (Some(since), Some(dr_against)) = (&self.since, &self.dr_against) {
            return Err(ModelError::ConflictingStandards {
                value: self.value,
                since: since.clone(),
                dr_against: dr_against.clone(),
            });
        }
        for name in self.since.iter().chain(self.dr_against.iter()) {
            ladder.require(name)?;
        }
        Ok(())
    }
}

/// Facts for one (feature, implementation) pair.
///
/// Stored ascending by value, which is the order the classifier walks.
/// The generator walks the reverse, most-specific-first view.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SupportList {
    facts: Vec<Fact>,
    removed: bool,
}

impl SupportList {
    /// Validate ordering invariants once, at ingestion.
    ///
    /// Values must not decrease, and only the lowest entry may be
    /// unconditional since it is the last one the generator can reach.
    pub fn new(facts: Vec<Fact>, removed: bool, ladder: &StandardLadder) -> Result<Self> {
        for fact in &facts {
            fact.check_shape(ladder)?;
        }
        for pair in facts.windows(2) {
            if pair[1].value < pair[0].value {
                return Err(ModelError::UnsortedValues {
                    previous: pair[0].value,
                    value: pair[1].value,
                });
            }
        }
        if let Some(fact) = facts.iter().skip(1).find(|fact| !fact.has_condition(ladder)) {
            return Err(ModelError::UnconditionalNotLast { value: fact.value });
        }
        Ok(Self { facts, removed })
    }

    pub const EMPTY: SupportList = SupportList {
        facts: Vec::new(),
        removed: false,
    };

    pub fn ascending(&self) -> &[Fact] {
        &self.facts
    }

    pub fn most_specific_first(&self) -> impl Iterator<Item = &Fact> {
        self.facts.iter().rev()
    }

    pub fn is_removed(&self) -> bool {
        self.removed
    }

    pub fn is_empty(&self) -> bool {
        self.facts.is_empty()
    }

    pub fn is_strict_sensitive(&self) -> bool {
        self.facts.iter().any(|fact| fact.strict_sensitive)
    }
}
