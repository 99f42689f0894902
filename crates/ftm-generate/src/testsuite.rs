//! Assemble generated tests into source files.

use tracing::debug;

use ftm_model::{Feature, Implementation, Kind, Registry, StandardLadder};

use crate::error::Result;
use crate::matrix::{OptionSet, file_option_sets, option_sets, standard_switches, strict_variants};
use crate::render::render_node;
use crate::tree::build_tree;

/// Included ahead of library tests; the fallbacks keep vendor builtins used
/// in `depends` expressions well-formed on every compiler.
pub const LIBRARY_PROLOGUE: &str = "\
#include <version>

#ifndef __is_identifier
# define __is_identifier(x) 1
#endif
#ifndef __has_builtin
# define __has_builtin(x) 0
#endif
#ifndef __has_keyword
# define __has_keyword(x) 0
#endif
";

/// The assertion block for one feature, headed by a comment naming it.
pub fn feature_block(
    feature: &Feature,
    implementation: Implementation,
    ladder: &StandardLadder,
) -> Result<String> {
    let support = feature.support_for(implementation);
    let body = build_tree(support.most_specific_first(), ladder)
        .and_then(|tree| render_node(feature.kind, &feature.name, &tree))
        .map_err(|error| error.in_feature(&feature.name))?;
    Ok(format!("\n// {}\n{body}", feature.name))
}

/// The whole test file for one (kind, implementation) pair.
pub fn testsuite(
    registry: &Registry,
    kind: Kind,
    implementation: Implementation,
    ladder: &StandardLadder,
) -> Result<String> {
    let mut output = String::new();
    let sets = file_option_sets(registry, kind, implementation);
    if sets.len() > 1 || sets.iter().any(|set| !set.is_empty()) {
        output.push_str("// Run with options:\n");
        for set in &sets {
            output.push_str(&format!("//    {}\n", set.join(" ")));
        }
    }
    if kind == Kind::Library {
        output.push_str(LIBRARY_PROLOGUE);
    }
    let mut count = 0usize;
    for feature in registry.active(kind, implementation) {
        debug!(feature = %feature.name, %kind, %implementation, "generating test block");
        output.push_str(&feature_block(feature, implementation, ladder)?);
        count += 1;
    }
    debug!(%kind, %implementation, feature_count = count, "test file assembled");
    Ok(output)
}

/// A single feature's test file plus the compiler runs that exercise it.
#[derive(Debug, Clone)]
pub struct IndividualTest {
    pub name: String,
    /// Line prefix that marks the probe in preprocessed output.
    pub probe: String,
    pub source: String,
    pub invocations: Vec<OptionSet>,
}

/// Build the stand-alone test for one feature.
///
/// The probe line makes the identifier's value visible in the preprocessed
/// output next to any diagnostic.
pub fn individual_test(
    feature: &Feature,
    implementation: Implementation,
    ladder: &StandardLadder,
) -> Result<IndividualTest> {
    let mut source = String::new();
    if feature.kind == Kind::Library {
        source.push_str(LIBRARY_PROLOGUE);
    }
    let probe = format!("\"{}\": ", feature.name);
    source.push_str(&format!("\n{probe}{}\n", feature.kind.query(&feature.name)));
    source.push_str(&feature_block(feature, implementation, ladder)?);

    let support = feature.support_for(implementation);
    let strict: Vec<Option<String>> = match strict_variants(support) {
        Some(variants) => variants.into_iter().map(Some).collect(),
        None => vec![None],
    };
    let mut invocations = Vec::new();
    for (_, std_switch) in standard_switches(implementation, ladder) {
        for set in option_sets(support) {
            for strict_switch in &strict {
                let mut args = vec![std_switch.clone()];
                args.extend(strict_switch.iter().cloned());
                args.extend(set.iter().cloned());
                invocations.push(args);
            }
        }
    }
    Ok(IndividualTest {
        name: feature.name.clone(),
        probe,
        source,
        invocations,
    })
}
