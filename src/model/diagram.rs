//! Control-flow diagram input
//!
//! - [`DiagramBlock`]: one node of the control-flow representation
//! - [`BlockType`]: closed set of block kinds driving the simulation
//! - [`FunctionDefinition`]: which blocks belong to which function

use serde::{Deserialize, Serialize};

/// Kind of a control-flow block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockType {
    Start,
    End,
    Condition,
    Loop,
    Function,
    Return,
    Process,
}

impl BlockType {
    pub fn label(self) -> &'static str {
        match self {
            BlockType::Start => "start",
            BlockType::End => "end",
            BlockType::Condition => "condition",
            BlockType::Loop => "loop",
            BlockType::Function => "function",
            BlockType::Return => "return",
            BlockType::Process => "process",
        }
    }
}

/// One node of the control-flow diagram
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagramBlock {
    /// Unique, stable ordering key
    pub index: usize,
    pub block_type: BlockType,
    #[serde(default)]
    pub content: String,
    /// Successor edges. The simulation steps by index and does not follow these.
    #[serde(default)]
    pub connections: Vec<usize>,
    #[serde(default)]
    pub function_name: Option<String>,
}

impl DiagramBlock {
    pub fn new(index: usize, block_type: BlockType, content: impl Into<String>) -> Self {
        DiagramBlock {
            index,
            block_type,
            content: content.into(),
            connections: Vec::new(),
            function_name: None,
        }
    }

    pub fn in_function(mut self, name: impl Into<String>) -> Self {
        self.function_name = Some(name.into());
        self
    }

    pub fn connect(mut self, successors: &[usize]) -> Self {
        self.connections.extend_from_slice(successors);
        self
    }
}

/// Recursion metadata attached to a function
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecursionInfo {
    pub is_recursive: bool,
    #[serde(default)]
    pub recursion_type: String,
}

/// A function and the blocks that make it up
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionDefinition {
    pub name: String,
    #[serde(default)]
    pub blocks: Vec<usize>,
    #[serde(default)]
    pub recursion: Option<RecursionInfo>,
}

impl FunctionDefinition {
    pub fn owns(&self, block: usize) -> bool {
        self.blocks.contains(&block)
    }

    pub fn is_recursive(&self) -> bool {
        self.recursion.as_ref().is_some_and(|r| r.is_recursive)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_block() {
        let block: DiagramBlock = serde_json::from_str(
            r#"{"index": 2, "blockType": "condition", "content": "n <= 1", "connections": [3, 5], "functionName": "fact"}"#,
        )
        .unwrap();
        assert_eq!(block.block_type, BlockType::Condition);
        assert_eq!(block.connections, vec![3, 5]);
        assert_eq!(block.function_name.as_deref(), Some("fact"));
    }

    #[test]
    fn test_unknown_block_type_rejected() {
        let result: Result<DiagramBlock, _> =
            serde_json::from_str(r#"{"index": 0, "blockType": "switch"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_function_definition() {
        let def: FunctionDefinition = serde_json::from_str(
            r#"{"name": "fact", "blocks": [1, 2, 3], "recursion": {"isRecursive": true, "recursionType": "linear"}}"#,
        )
        .unwrap();
        assert!(def.owns(2));
        assert!(!def.owns(0));
        assert!(def.is_recursive());
    }
}
