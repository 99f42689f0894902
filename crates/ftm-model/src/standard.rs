//! The ladder of language standard revisions.

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};

/// One standard revision and the largest `__cplusplus` value it covers.
///
/// The current development revision has no watermark.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Standard {
    pub name: String,
    #[serde(default)]
    pub watermark: Option<u32>,
}

impl Standard {
    pub fn new(name: impl Into<String>, watermark: Option<u32>) -> Self {
        Self {
            name: name.into(),
            watermark,
        }
    }

    /// Lowercase spelling used by compiler switches and table marks.
    pub fn switch_name(&self) -> String {
        self.name.to_lowercase()
    }
}

/// Position of a standard within a [`StandardLadder`].
///
/// Ordering follows the ladder, so `a < b` means `a` was published before `b`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Rung(usize);

impl Rung {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Ordered standard revisions with strictly increasing watermarks.
///
/// Built once and passed by reference; every lookup is a pure function of
/// the ladder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StandardLadder {
    standards: Vec<Standard>,
}

impl StandardLadder {
    /// Validate and build a ladder.
    ///
    /// Exactly one entry may lack a watermark and it must be the last one.
    pub fn new(standards: Vec<Standard>) -> Result<Self> {
        let Some((last, published)) = standards.split_last() else {
            return Err(invalid("ladder is empty"));
        };
        if last.watermark.is_some() {
            return Err(invalid(format!(
                "final standard {} must not have a watermark",
                last.name
            )));
        }
        let mut previous: Option<&Standard> = None;
        for standard in published {
            let Some(watermark) = standard.watermark else {
                return Err(invalid(format!(
                    "only the final standard may omit its watermark, not {}",
                    standard.name
                )));
            };
            if let Some(prev) = previous
                && prev.watermark.is_some_and(|w| w >= watermark)
            {
                return Err(invalid(format!(
                    "watermark of {} does not exceed {}",
                    standard.name, prev.name
                )));
            }
            previous = Some(standard);
        }
        for (index, standard) in standards.iter().enumerate() {
            if standards[..index].iter().any(|s| s.name == standard.name) {
                return Err(invalid(format!("duplicate standard {}", standard.name)));
            }
        }
        Ok(Self { standards })
    }

    /// The C++ revisions from C++98 to the current working draft.
    pub fn cpp() -> Self {
        Self {
            standards: vec![
                Standard::new("C++98", Some(199711)),
                Standard::new("C++11", Some(201103)),
                Standard::new("C++14", Some(201402)),
                Standard::new("C++17", Some(201703)),
                Standard::new("C++20", Some(202002)),
                Standard::new("C++23", Some(202302)),
                Standard::new("C++26", None),
            ],
        }
    }

    pub fn standards(&self) -> &[Standard] {
        &self.standards
    }

    pub fn len(&self) -> usize {
        self.standards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.standards.is_empty()
    }

    pub fn rung(&self, name: &str) -> Option<Rung> {
        self.standards
            .iter()
            .position(|standard| standard.name == name)
            .map(Rung)
    }

    /// Like [`StandardLadder::rung`] but treats an unknown name as a contract violation.
    pub fn require(&self, name: &str) -> Result<Rung> {
        self.rung(name).ok_or_else(|| ModelError::UnknownStandard {
            name: name.to_string(),
        })
    }

    pub fn standard(&self, rung: Rung) -> &Standard {
        &self.standards[rung.0]
    }

    pub fn watermark(&self, rung: Rung) -> Option<u32> {
        self.standards[rung.0].watermark
    }

    /// The unbounded current development revision.
    pub fn final_rung(&self) -> Rung {
        Rung(self.standards.len() - 1)
    }

    pub fn is_final(&self, rung: Rung) -> bool {
        rung == self.final_rung()
    }

    /// Watermark of the revision published right before `rung`.
    ///
    /// `None` for the first rung: every conforming compiler is past it.
    pub fn previous_watermark(&self, rung: Rung) -> Option<u32> {
        rung.0
            .checked_sub(1)
            .and_then(|index| self.standards[index].watermark)
    }

    /// Narrowest revision whose watermark is at least `value`.
    ///
    /// Watermarks are inclusive: a value equal to a watermark belongs to
    /// that revision. Values past every watermark land on the final rung.
    pub fn narrowest_for(&self, value: u32) -> Rung {
        self.standards
            .iter()
            .position(|standard| standard.watermark.is_none_or(|w| value <= w))
            .map_or_else(|| self.final_rung(), Rung)
    }
}

impl Default for StandardLadder {
    fn default() -> Self {
        Self::cpp()
    }
}

fn invalid(message: impl Into<String>) -> ModelError {
    ModelError::InvalidLadder {
        message: message.into(),
    }
}
