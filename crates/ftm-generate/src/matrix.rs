//! Compiler switch combinations a generated test must be run under.

use std::collections::BTreeSet;

use ftm_model::{Implementation, Kind, Registry, Standard, StandardLadder, SupportList};

use crate::condition::NON_PEDANTIC_MACRO;

pub const PEDANTIC_SWITCH: &str = "-pedantic";

/// Earliest revision MSVC accepts a `-std:` switch for.
const MSVC_EARLIEST: &str = "C++14";

/// One set of extra compiler arguments.
pub type OptionSet = Vec<String>;

/// Option sets for one support list: no switches at all, then each switch
/// on its own together with the macro announcing it.
pub fn option_sets(support: &SupportList) -> Vec<OptionSet> {
    let mut sets = vec![Vec::new()];
    for fact in support.ascending() {
        for switch in fact.switches() {
            sets.push(vec![switch.spelling().to_string(), switch.define_arg()]);
        }
    }
    sets
}

/// The strict-mode variants to run, if any fact is sensitive to it.
pub fn strict_variants(support: &SupportList) -> Option<[String; 2]> {
    support.is_strict_sensitive().then(|| {
        [
            PEDANTIC_SWITCH.to_string(),
            format!("-D{NON_PEDANTIC_MACRO}=1"),
        ]
    })
}

/// Every option set needed to exercise a whole (kind, implementation) file.
///
/// When any feature reacts to strict mode, every set runs under
/// `-pedantic` and the non-pedantic announcement is run on its own.
pub fn file_option_sets(
    registry: &Registry,
    kind: Kind,
    implementation: Implementation,
) -> BTreeSet<OptionSet> {
    let mut sets: BTreeSet<OptionSet> = BTreeSet::from([Vec::new()]);
    let mut strict = None;
    for feature in registry.active(kind, implementation) {
        let support = feature.support_for(implementation);
        sets.extend(option_sets(support));
        if strict.is_none() {
            strict = strict_variants(support);
        }
    }
    let Some(variants) = strict else {
        return sets;
    };
    let mut pedantic: BTreeSet<OptionSet> = sets
        .into_iter()
        .map(|set| {
            let mut prefixed = vec![PEDANTIC_SWITCH.to_string()];
            prefixed.extend(set);
            prefixed
        })
        .collect();
    pedantic.extend(variants.into_iter().map(|variant| vec![variant]));
    pedantic
}

/// `-std` switches for every revision the implementation can select.
pub fn standard_switches<'a>(
    implementation: Implementation,
    ladder: &'a StandardLadder,
) -> Vec<(&'a Standard, String)> {
    match implementation {
        Implementation::Clang | Implementation::Gcc => ladder
            .standards()
            .iter()
            .map(|standard| (standard, format!("-std={}", standard.switch_name())))
            .collect(),
        Implementation::Msvc => msvc_switches(ladder),
    }
}

fn msvc_switches(ladder: &StandardLadder) -> Vec<(&Standard, String)> {
    let first = ladder.rung(MSVC_EARLIEST).map_or(0, |rung| rung.index());
    let published = &ladder.standards()[..ladder.final_rung().index()];
    let newest = published.len().saturating_sub(1);
    published
        .iter()
        .enumerate()
        .skip(first)
        .map(|(index, standard)| {
            let switch = if index == newest {
                "-std:c++latest".to_string()
            } else {
                format!("-std:{}", standard.switch_name())
            };
            (standard, switch)
        })
        .collect()
}
