//! Serde shapes of the YAML registry, before validation.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer};

use ftm_model::Implementation;

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawRegistry {
    pub attributes: Vec<RawFeature>,
    pub language: Vec<RawFeature>,
    pub library: Vec<RawFeature>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawFeature {
    pub name: String,
    /// Whitespace separated header names.
    #[serde(default)]
    pub header_list: Option<String>,
    #[serde(default)]
    pub rows: Vec<RawRow>,
    /// `null` and a missing key both mean nothing is recorded.
    #[serde(default)]
    pub support: BTreeMap<Implementation, Option<Vec<RawFact>>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawRow {
    #[serde(default)]
    pub value: Option<u32>,
    /// Whitespace separated paper numbers.
    #[serde(default)]
    pub papers: Option<String>,
    #[serde(default, rename = "cppreference-description")]
    pub description: Option<String>,
    #[serde(default, rename = "cppreference-treats-as-dr-against")]
    pub dr_against: Option<String>,
    #[serde(default, rename = "cppreference-header_list")]
    pub header_list: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub removed: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawFact {
    #[serde(default)]
    pub value: Option<u32>,
    #[serde(default)]
    pub since: Option<String>,
    /// Whitespace separated toggling switches.
    #[serde(default)]
    pub option: Option<String>,
    #[serde(default, rename = "enabled-by")]
    pub enabled_by: Option<String>,
    #[serde(default, rename = "disabled-by")]
    pub disabled_by: Option<String>,
    #[serde(default)]
    pub depends: Option<String>,
    #[serde(default)]
    pub pedantic: Option<bool>,
    #[serde(default, rename = "treats-as-dr-against")]
    pub dr_against: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub removed: bool,
}

/// A removal marker counts by presence, whatever value it carries.
fn present<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    serde::de::IgnoredAny::deserialize(deserializer)?;
    Ok(true)
}

pub(crate) fn words(list: &str) -> Vec<String> {
    list.split_whitespace().map(str::to_string).collect()
}
