//! Pretty-printer from [`TestNode`] to nested preprocessor blocks.
//!
//! Directives are indented after the `#` by the current nesting depth.

use ftm_model::Kind;

use crate::error::{GenerateError, Result};
use crate::tree::TestNode;

/// Accumulates directives for one feature and tracks block depth.
#[derive(Debug)]
pub struct BlockWriter {
    kind: Kind,
    depth: usize,
    output: String,
}

impl BlockWriter {
    pub fn new(kind: Kind) -> Self {
        Self {
            kind,
            depth: 0,
            output: String::new(),
        }
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn writeln(&mut self, line: &str) {
        self.output.push_str(line);
        self.output.push('\n');
    }

    fn directive(&mut self, depth: usize, text: &str) {
        let line = format!("#{}{text}", " ".repeat(depth));
        self.writeln(&line);
    }

    pub fn start_if(&mut self, condition: &str) {
        self.directive(self.depth, &format!("if {condition}"));
        self.depth += 1;
    }

    pub fn start_elif(&mut self, condition: &str) -> Result<()> {
        let depth = self.open_depth()?;
        self.directive(depth, &format!("elif {condition}"));
        Ok(())
    }

    pub fn start_else(&mut self) -> Result<()> {
        let depth = self.open_depth()?;
        self.directive(depth, "else");
        Ok(())
    }

    pub fn endif(&mut self) -> Result<()> {
        self.depth = self.open_depth()?;
        self.directive(self.depth, "endif");
        Ok(())
    }

    fn open_depth(&self) -> Result<usize> {
        self.depth.checked_sub(1).ok_or(GenerateError::UnopenedBlock)
    }

    pub fn positive_test(&mut self, name: &str, value: u32) {
        let query = self.kind.query(name);
        self.directive(self.depth, &format!("if {query} != {value}"));
        self.directive(self.depth, &format!(" error {query} is not equal to {value}"));
        self.directive(self.depth, "endif");
    }

    pub fn negative_test(&mut self, name: &str) {
        match self.kind {
            Kind::Attributes => {
                let query = self.kind.query(name);
                self.directive(self.depth, &format!("if {query}"));
                self.directive(self.depth, &format!(" error {query} is nonzero"));
            }
            Kind::Language | Kind::Library => {
                self.directive(self.depth, &format!("if defined({name})"));
                self.directive(self.depth, &format!(" error {name} is defined"));
            }
        }
        self.directive(self.depth, "endif");
    }

    pub fn write_node(&mut self, name: &str, node: &TestNode) -> Result<()> {
        match node {
            TestNode::Assert(value) => self.positive_test(name, *value),
            TestNode::AssertAbsent => self.negative_test(name),
            TestNode::Branch { arms, otherwise } => {
                for (index, arm) in arms.iter().enumerate() {
                    let condition = arm.condition.to_string();
                    if index == 0 {
                        self.start_if(&condition);
                    } else {
                        self.start_elif(&condition)?;
                    }
                    self.write_node(name, &arm.body)?;
                }
                self.start_else()?;
                self.write_node(name, otherwise)?;
                self.endif()?;
            }
        }
        Ok(())
    }

    /// Return the text, refusing to hand out a structure left open.
    pub fn finish(self) -> Result<String> {
        if self.depth != 0 {
            return Err(GenerateError::UnbalancedBlocks { depth: self.depth });
        }
        Ok(self.output)
    }
}

/// Render one feature's tree as a self-contained block.
pub fn render_node(kind: Kind, name: &str, node: &TestNode) -> Result<String> {
    let mut writer = BlockWriter::new(kind);
    writer.write_node(name, node)?;
    writer.finish()
}
