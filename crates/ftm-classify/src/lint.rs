//! Classification run across a whole registry.

use serde::Serialize;
use tracing::{debug, info_span};

use ftm_model::{Feature, Implementation, Kind, Registry, StandardLadder};

use crate::classify::classify;
use crate::error::Result;
use crate::warning::{ClassificationWarning, WarningKind};

/// Warnings for one kind, from either the documented history or one
/// implementation's support list.
#[derive(Debug, Clone, Serialize)]
pub struct ClassificationReport {
    pub kind: Kind,
    /// `None` for the documented history rows.
    pub implementation: Option<Implementation>,
    pub features_checked: usize,
    pub warnings: Vec<ClassificationWarning>,
}

impl ClassificationReport {
    pub fn source_label(&self) -> String {
        match self.implementation {
            Some(implementation) => implementation.to_string(),
            None => "history".to_string(),
        }
    }

    pub fn count(&self, kind: WarningKind) -> usize {
        self.warnings
            .iter()
            .filter(|warning| warning.kind == kind)
            .count()
    }

    pub fn warning_count(&self) -> usize {
        self.warnings.len()
    }

    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }
}

/// Classify the described history rows of one feature.
///
/// Only described rows become table rows, so only they are compared.
pub fn lint_history(
    feature: &Feature,
    ladder: &StandardLadder,
) -> Result<Vec<ClassificationWarning>> {
    let described: Vec<_> = feature
        .rows
        .iter()
        .filter(|row| row.description.is_some())
        .collect();
    Ok(classify(&feature.name, &described, ladder)?.warnings)
}

/// Classify one implementation's support facts for a feature.
pub fn lint_support(
    feature: &Feature,
    implementation: Implementation,
    ladder: &StandardLadder,
) -> Result<Vec<ClassificationWarning>> {
    let facts = feature.support_for(implementation).ascending();
    Ok(classify(&feature.name, facts, ladder)?
        .warnings
        .into_iter()
        .map(|warning| warning.for_implementation(implementation))
        .collect())
}

/// Lint every kind: history first, then each implementation.
///
/// Removed features are skipped. Warnings never stop the run; only
/// contract violations do.
pub fn lint_registry(
    registry: &Registry,
    ladder: &StandardLadder,
) -> Result<Vec<ClassificationReport>> {
    let mut reports = Vec::new();
    for kind in Kind::ALL {
        let span = info_span!("lint", kind = %kind);
        let _guard = span.enter();

        let mut history = ClassificationReport {
            kind,
            implementation: None,
            features_checked: 0,
            warnings: Vec::new(),
        };
        for feature in registry.published(kind) {
            history.features_checked += 1;
            history.warnings.extend(lint_history(feature, ladder)?);
        }
        debug!(warnings = history.warning_count(), "linted history rows");
        reports.push(history);

        for implementation in Implementation::ALL {
            let mut report = ClassificationReport {
                kind,
                implementation: Some(implementation),
                features_checked: 0,
                warnings: Vec::new(),
            };
            for feature in registry.active(kind, implementation) {
                report.features_checked += 1;
                report
                    .warnings
                    .extend(lint_support(feature, implementation, ladder)?);
            }
            debug!(
                implementation = %implementation,
                warnings = report.warning_count(),
                "linted support"
            );
            reports.push(report);
        }
    }
    Ok(reports)
}
