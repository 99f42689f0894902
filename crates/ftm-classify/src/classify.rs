//! Assign recorded values to standard revisions.

use serde::Serialize;
use tracing::trace;

use ftm_model::{Fact, HistoryRow, Rung, StandardLadder};

use crate::error::{ClassifyError, Result};
use crate::warning::{ClassificationWarning, WarningKind};

/// Anything carrying a value and an optional defect-report target.
pub trait Classifiable {
    fn value(&self) -> u32;
    fn dr_against(&self) -> Option<&str>;
}

impl Classifiable for Fact {
    fn value(&self) -> u32 {
        self.value
    }

    fn dr_against(&self) -> Option<&str> {
        self.dr_against.as_deref()
    }
}

impl Classifiable for HistoryRow {
    fn value(&self) -> u32 {
        self.value
    }

    fn dr_against(&self) -> Option<&str> {
        self.dr_against.as_deref()
    }
}

impl<T: Classifiable + ?Sized> Classifiable for &T {
    fn value(&self) -> u32 {
        (**self).value()
    }

    fn dr_against(&self) -> Option<&str> {
        (**self).dr_against()
    }
}

/// The revision a value is documented under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Assignment {
    pub value: u32,
    pub rung: Rung,
    /// Assigned by a defect-report override rather than by watermark.
    pub defect_report: bool,
}

/// Assignments in input order plus every inconsistency noticed on the way.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classified {
    pub assignments: Vec<Assignment>,
    pub warnings: Vec<ClassificationWarning>,
}

/// Classify one feature's values, given in ascending order.
///
/// Inconsistent data only produces warnings; the best-effort assignment is
/// always returned. Unknown standards and descending values are contract
/// violations.
pub fn classify<T: Classifiable>(
    feature: &str,
    items: &[T],
    ladder: &StandardLadder,
) -> Result<Classified> {
    for pair in items.windows(2) {
        if pair[1].value() < pair[0].value() {
            return Err(ClassifyError::Unsorted {
                feature: feature.to_string(),
                previous: pair[0].value(),
                value: pair[1].value(),
            });
        }
    }

    let mut classified = Classified::default();
    let mut previous: Option<Assignment> = None;
    for item in items {
        let value = item.value();
        let assignment = match item.dr_against() {
            Some(target) => {
                let rung = ladder
                    .require(target)
                    .map_err(|source| ClassifyError::model(feature, source))?;
                let warn = |kind, previous: Option<Assignment>| {
                    ClassificationWarning::new(feature, kind, ladder, rung, value, previous)
                };
                // A DR cannot retrofit a value the target's own range covers.
                if ladder.watermark(rung).is_none_or(|watermark| value <= watermark) {
                    classified
                        .warnings
                        .push(warn(WarningKind::InvalidDefectReport, None));
                }
                if let Some(prev) = previous
                    && prev.rung > rung
                {
                    classified
                        .warnings
                        .push(warn(WarningKind::DefectReportOutOfOrder, Some(prev)));
                }
                Assignment {
                    value,
                    rung,
                    defect_report: true,
                }
            }
            None => {
                let rung = ladder.narrowest_for(value);
                if let Some(prev) = previous
                    && prev.rung == rung
                    && !ladder.is_final(rung)
                {
                    classified.warnings.push(ClassificationWarning::new(
                        feature,
                        WarningKind::StaleValue,
                        ladder,
                        rung,
                        value,
                        Some(prev),
                    ));
                }
                Assignment {
                    value,
                    rung,
                    defect_report: false,
                }
            }
        };
        trace!(
            feature,
            value,
            standard = %ladder.standard(assignment.rung).name,
            defect_report = assignment.defect_report,
            "classified value"
        );
        classified.assignments.push(assignment);
        previous = Some(assignment);
    }
    Ok(classified)
}
