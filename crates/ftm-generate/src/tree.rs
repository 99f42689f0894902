//! Priority list of guarded facts compiled into a decision tree.
//!
//! Each fact is a guarded rule tried in most-specific-first order; the first
//! matching guard wins and the absence of any match means the identifier
//! must not be defined.

use ftm_model::{Fact, StandardLadder};

use crate::condition::{Condition, compile_fact};
use crate::error::{GenerateError, Result};

/// What a generated test checks at one point of the conditional structure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TestNode {
    /// The identifier must equal this value.
    Assert(u32),
    /// The identifier must be undefined (or zero for attributes).
    AssertAbsent,
    /// `if`/`elif` arms tried in order, then the fallback as `else`.
    Branch {
        arms: Vec<Arm>,
        otherwise: Box<TestNode>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Arm {
    pub condition: Condition,
    pub body: TestNode,
}

impl Arm {
    fn new(condition: Condition, body: TestNode) -> Self {
        Self { condition, body }
    }
}

impl TestNode {
    /// Number of conditional blocks this node opens.
    pub fn block_count(&self) -> usize {
        match self {
            TestNode::Assert(_) | TestNode::AssertAbsent => 0,
            TestNode::Branch { arms, otherwise } => {
                1 + arms.iter().map(|arm| arm.body.block_count()).sum::<usize>()
                    + otherwise.block_count()
            }
        }
    }

    /// Follow the structure the way the preprocessor would.
    ///
    /// `holds` decides whether a single conjunct is true; the first arm whose
    /// conjuncts all hold is taken, otherwise the fallback.
    pub fn evaluate<F>(&self, holds: &F) -> Option<u32>
    where
        F: Fn(&str) -> bool,
    {
        match self {
            TestNode::Assert(value) => Some(*value),
            TestNode::AssertAbsent => None,
            TestNode::Branch { arms, otherwise } => arms
                .iter()
                .find(|arm| arm.condition.conjuncts().iter().all(|c| holds(c.as_str())))
                .map_or_else(|| otherwise.evaluate(holds), |arm| arm.body.evaluate(holds)),
        }
    }
}

/// Build the decision tree for facts given most-specific-first.
pub fn build_tree<'a, I>(facts: I, ladder: &StandardLadder) -> Result<TestNode>
where
    I: IntoIterator<Item = &'a Fact>,
{
    let facts: Vec<&Fact> = facts.into_iter().collect();
    chain(&facts, ladder)
}

fn chain(facts: &[&Fact], ladder: &StandardLadder) -> Result<TestNode> {
    let Some((fact, rest)) = facts.split_first() else {
        return Ok(TestNode::AssertAbsent);
    };
    let compiled = compile_fact(fact, ladder)?;
    if let Some(toggle) = compiled.toggle {
        let arms = vec![
            Arm::new(
                compiled.condition.and(toggle.enabled),
                TestNode::Assert(compiled.value),
            ),
            Arm::new(
                compiled.condition.and(toggle.disabled),
                TestNode::AssertAbsent,
            ),
        ];
        return Ok(TestNode::Branch {
            arms,
            otherwise: Box::new(chain(rest, ladder)?),
        });
    }
    if compiled.condition.is_always() {
        if !rest.is_empty() {
            return Err(GenerateError::UnreachableFacts {
                value: compiled.value,
                remaining: rest.len(),
            });
        }
        return Ok(TestNode::Assert(compiled.value));
    }
    Ok(TestNode::Branch {
        arms: vec![Arm::new(compiled.condition, TestNode::Assert(compiled.value))],
        otherwise: Box::new(chain(rest, ladder)?),
    })
}
