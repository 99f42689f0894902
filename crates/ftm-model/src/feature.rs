use std::collections::BTreeMap;

use serde::Serialize;

use crate::enums::{Implementation, Kind};
use crate::error::{ModelError, Result};
use crate::fact::SupportList;
use crate::standard::StandardLadder;

/// One published value of an identifier, as documented in the summary tables.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HistoryRow {
    pub value: u32,
    pub papers: Vec<String>,
    /// Table description. Rows without one only carry their papers forward.
    pub description: Option<String>,
    pub dr_against: Option<String>,
    /// Headers specific to this row, overriding the feature's list.
    pub header_list: Option<Vec<String>>,
}

impl HistoryRow {
    pub fn new(value: u32) -> Self {
        Self {
            value,
            ..Self::default()
        }
    }

    pub fn described(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn papers<I, S>(mut self, papers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.papers = papers.into_iter().map(Into::into).collect();
        self
    }

    pub fn dr_against(mut self, standard: impl Into<String>) -> Self {
        self.dr_against = Some(standard.into());
        self
    }
}

/// A named feature-test identifier and everything recorded about it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Feature {
    pub name: String,
    pub kind: Kind,
    pub header_list: Option<Vec<String>>,
    pub rows: Vec<HistoryRow>,
    /// Withdrawn from every implementation.
    pub removed: bool,
    pub support: BTreeMap<Implementation, SupportList>,
}

impl Feature {
    pub fn new(name: impl Into<String>, kind: Kind) -> Self {
        Self {
            name: name.into(),
            kind,
            header_list: None,
            rows: Vec::new(),
            removed: false,
            support: BTreeMap::new(),
        }
    }

    /// Validate history rows and attach them.
    pub fn with_rows(
        mut self,
        rows: Vec<HistoryRow>,
        removed: bool,
        ladder: &StandardLadder,
    ) -> Result<Self> {
        for pair in rows.windows(2) {
            if pair[1].value < pair[0].value {
                return Err(ModelError::UnsortedValues {
                    previous: pair[0].value,
                    value: pair[1].value,
                });
            }
        }
        for row in &rows {
            if let Some(name) = &row.dr_against {
                ladder.require(name)?;
            }
        }
        self.rows = rows;
        self.removed = removed;
        Ok(self)
    }

    pub fn with_support(mut self, implementation: Implementation, support: SupportList) -> Self {
        self.support.insert(implementation, support);
        self
    }

    /// Support for one implementation; an implementation with nothing
    /// recorded has an empty list.
    pub fn support_for(&self, implementation: Implementation) -> &SupportList {
        static EMPTY: SupportList = SupportList::EMPTY;
        self.support.get(&implementation).unwrap_or(&EMPTY)
    }

    /// Removed features are left out of generated tests and tables.
    pub fn is_removed_for(&self, implementation: Implementation) -> bool {
        self.removed || self.support_for(implementation).is_removed()
    }

    /// Rows that appear in the summary table.
    pub fn has_description(&self) -> bool {
        self.rows.iter().any(|row| row.description.is_some())
    }
}

/// Every feature of the registry, grouped by kind in registry order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Registry {
    features: BTreeMap<Kind, Vec<Feature>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, feature: Feature) {
        self.features.entry(feature.kind).or_default().push(feature);
    }

    pub fn features(&self, kind: Kind) -> &[Feature] {
        self.features.get(&kind).map_or(&[], Vec::as_slice)
    }

    /// Features of `kind` that are still present for `implementation`.
    pub fn active(&self, kind: Kind, implementation: Implementation) -> impl Iterator<Item = &Feature> {
        self.features(kind)
            .iter()
            .filter(move |feature| !feature.is_removed_for(implementation))
    }

    /// Features of `kind` that have not been withdrawn everywhere.
    pub fn published(&self, kind: Kind) -> impl Iterator<Item = &Feature> {
        self.features(kind).iter().filter(|feature| !feature.removed)
    }

    pub fn feature_count(&self) -> usize {
        self.features.values().map(Vec::len).sum()
    }
}
