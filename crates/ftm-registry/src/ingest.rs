//! Raw YAML records turned into validated model values.
//!
//! Ingestion fails on the first malformed record; nothing downstream ever
//! sees a partially valid feature.

use tracing::debug;

use ftm_model::{
    CompilerSwitch, Fact, Feature, HistoryRow, Implementation, Kind, ModelError, OptionToken,
    Registry, StandardLadder, SupportList,
};

use crate::error::{RegistryError, Result};
use crate::raw::{RawFact, RawFeature, RawRegistry, RawRow, words};

pub fn ingest_registry(raw: RawRegistry, ladder: &StandardLadder) -> Result<Registry> {
    let mut registry = Registry::new();
    let sections = [
        (Kind::Attributes, raw.attributes),
        (Kind::Language, raw.language),
        (Kind::Library, raw.library),
    ];
    for (kind, features) in sections {
        debug!(kind = %kind, features = features.len(), "ingesting section");
        for feature in features {
            registry.push(ingest_feature(feature, kind, ladder)?);
        }
    }
    Ok(registry)
}

pub fn ingest_feature(raw: RawFeature, kind: Kind, ladder: &StandardLadder) -> Result<Feature> {
    let name = raw.name;
    let (rows, removed) =
        ingest_rows(raw.rows).map_err(|source| RegistryError::feature(&name, source))?;
    let mut feature = Feature::new(name.as_str(), kind)
        .with_rows(rows, removed, ladder)
        .map_err(|source| RegistryError::feature(&name, source))?;
    feature.header_list = raw.header_list.as_deref().map(words);

    for (implementation, facts) in raw.support {
        let support = ingest_support(&name, implementation, facts.unwrap_or_default(), ladder)?;
        feature = feature.with_support(implementation, support);
    }
    Ok(feature)
}

/// History rows plus the feature-wide removal marker.
///
/// An undescribed row may omit its value; its papers move to the next row
/// that is kept.
fn ingest_rows(raw: Vec<RawRow>) -> std::result::Result<(Vec<HistoryRow>, bool), ModelError> {
    let last = raw.len().saturating_sub(1);
    let mut rows = Vec::with_capacity(raw.len());
    let mut removed = false;
    let mut pending = Vec::new();
    for (index, row) in raw.into_iter().enumerate() {
        if row.removed {
            if index != last {
                return Err(ModelError::MisplacedRemoval);
            }
            removed = true;
            continue;
        }
        let papers = row.papers.as_deref().map(words).unwrap_or_default();
        let Some(value) = row.value else {
            if row.description.is_some() {
                return Err(ModelError::MissingValue { index });
            }
            pending.extend(papers);
            continue;
        };
        let mut carried = std::mem::take(&mut pending);
        carried.extend(papers);
        rows.push(HistoryRow {
            value,
            papers: carried,
            description: row.description,
            dr_against: row.dr_against,
            header_list: row.header_list.as_deref().map(words),
        });
    }
    if !pending.is_empty() {
        debug!(papers = ?pending, "papers after the last row are not shown");
    }
    Ok((rows, removed))
}

fn ingest_support(
    feature: &str,
    implementation: Implementation,
    raw: Vec<RawFact>,
    ladder: &StandardLadder,
) -> Result<SupportList> {
    let wrap = |source: ModelError| RegistryError::Support {
        feature: feature.to_string(),
        implementation,
        source,
    };

    let last = raw.len().saturating_sub(1);
    let mut facts = Vec::with_capacity(raw.len());
    let mut removed = false;
    for (index, entry) in raw.into_iter().enumerate() {
        if entry.removed {
            if index != last {
                return Err(wrap(ModelError::MisplacedRemoval));
            }
            removed = true;
            continue;
        }
        facts.push(ingest_fact(entry, index).map_err(wrap)?);
    }
    SupportList::new(facts, removed, ladder).map_err(wrap)
}

fn ingest_fact(raw: RawFact, index: usize) -> std::result::Result<Fact, ModelError> {
    let value = raw.value.ok_or(ModelError::MissingValue { index })?;
    let mut fact = Fact::new(value);
    fact.since = raw.since;
    fact.dr_against = raw.dr_against;
    fact.depends = raw.depends;
    for spelling in raw.option.as_deref().map(words).unwrap_or_default() {
        fact.toggle.push(OptionToken::parse(&spelling)?);
    }
    for spelling in raw.enabled_by.as_deref().map(words).unwrap_or_default() {
        fact.enabled_by.push(CompilerSwitch::parse(&spelling)?);
    }
    for spelling in raw.disabled_by.as_deref().map(words).unwrap_or_default() {
        fact.disabled_by.push(CompilerSwitch::parse(&spelling)?);
    }
    match raw.pedantic {
        Some(true) => return Err(ModelError::PedanticEnabled { value }),
        Some(false) => fact.strict_sensitive = true,
        None => {}
    }
    Ok(fact)
}
