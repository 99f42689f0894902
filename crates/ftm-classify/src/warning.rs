use std::fmt;

use serde::Serialize;

use ftm_model::{Implementation, Rung, StandardLadder};

use crate::classify::Assignment;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum WarningKind {
    /// The value does not lie past the DR target's watermark.
    InvalidDefectReport,
    /// An earlier value was assigned a later revision than the DR target.
    DefectReportOutOfOrder,
    /// Another value already sits in the same published revision.
    StaleValue,
}

impl WarningKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            WarningKind::InvalidDefectReport => "invalid-dr",
            WarningKind::DefectReportOutOfOrder => "dr-out-of-order",
            WarningKind::StaleValue => "stale-value",
        }
    }
}

impl fmt::Display for WarningKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The value a warning was compared against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PreviousValue {
    pub standard: String,
    pub value: u32,
}

/// A data inconsistency noticed while classifying.
///
/// Never fatal; callers decide whether to print, count, or ignore them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassificationWarning {
    pub feature: String,
    /// Set when the values came from one implementation's support list.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub implementation: Option<Implementation>,
    pub kind: WarningKind,
    pub standard: String,
    pub value: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous: Option<PreviousValue>,
}

impl ClassificationWarning {
    pub(crate) fn new(
        feature: &str,
        kind: WarningKind,
        ladder: &StandardLadder,
        rung: Rung,
        value: u32,
        previous: Option<Assignment>,
    ) -> Self {
        Self {
            feature: feature.to_string(),
            implementation: None,
            kind,
            standard: ladder.standard(rung).name.clone(),
            value,
            previous: previous.map(|prev| PreviousValue {
                standard: ladder.standard(prev.rung).name.clone(),
                value: prev.value,
            }),
        }
    }

    pub fn for_implementation(mut self, implementation: Implementation) -> Self {
        self.implementation = Some(implementation);
        self
    }

    pub fn headline(&self) -> String {
        let subject = match self.implementation {
            Some(implementation) => format!("{} ({implementation})", self.feature),
            None => self.feature.clone(),
        };
        match self.kind {
            WarningKind::InvalidDefectReport | WarningKind::DefectReportOutOfOrder => {
                format!("invalid DR for {subject}")
            }
            WarningKind::StaleValue => format!("there is a newer value for {subject}"),
        }
    }
}

impl fmt::Display for ClassificationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\n  standard: {}\n  printing: {}",
            self.headline(),
            self.standard,
            self.value
        )?;
        if let Some(previous) = &self.previous {
            match self.kind {
                WarningKind::StaleValue => write!(f, "\n  previous value: {}", previous.value)?,
                _ => write!(f, "\n  previous: {}, {}", previous.standard, previous.value)?,
            }
        }
        Ok(())
    }
}
