//! Timeline records
//!
//! - [`StackFrame`]: one call-stack entry as authored in a record
//! - [`TimelineStep`]: one self-contained record of the precomputed timeline
//!
//! Records are authored outside the engine and never mutated afterwards.

use super::value::Variable;
use serde::{Deserialize, Serialize};

/// One call-stack entry of a timeline record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StackFrame {
    pub id: String,
    pub function_name: String,
    #[serde(default)]
    pub parameters: Vec<Variable>,
    #[serde(default)]
    pub local_variables: Vec<Variable>,
    /// 0 is the outermost frame
    pub depth: usize,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub timestamp: u64,
    #[serde(default)]
    pub current_line: Option<u32>,
    #[serde(default)]
    pub call_site: Option<String>,
}

impl StackFrame {
    pub fn new(id: impl Into<String>, function_name: impl Into<String>, depth: usize) -> Self {
        StackFrame {
            id: id.into(),
            function_name: function_name.into(),
            parameters: Vec::new(),
            local_variables: Vec::new(),
            depth,
            is_active: false,
            timestamp: 0,
            current_line: None,
            call_site: None,
        }
    }

    /// Parameters followed by locals, in display order
    pub fn variables(&self) -> impl Iterator<Item = &Variable> {
        self.parameters.iter().chain(self.local_variables.iter())
    }

    /// Check whether any variable in this frame changed since the previous record
    pub fn has_changes(&self) -> bool {
        self.variables().any(|v| v.is_changed)
    }
}

/// A precomputed call-stack snapshot held for `duration` milliseconds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineStep {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Ordered by depth ascending
    #[serde(default)]
    pub frames: Vec<StackFrame>,
    pub duration: u64,
}

impl TimelineStep {
    /// The frame flagged as currently executing, if the record marks one
    pub fn active_frame(&self) -> Option<&StackFrame> {
        self.frames.iter().find(|f| f.is_active)
    }

    /// Depth of the deepest frame, or 0 for an empty record
    pub fn max_depth(&self) -> usize {
        self.frames.iter().map(|f| f.depth).max().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::value::Value;

    #[test]
    fn test_deserialize_camel_case() {
        let json = r#"{
            "id": "s1",
            "name": "call fact",
            "description": "fact(3) is called",
            "duration": 800,
            "frames": [
                {"id": "f0", "functionName": "main", "depth": 0},
                {"id": "f1", "functionName": "fact", "depth": 1, "isActive": true,
                 "parameters": [{"name": "n", "value": 3, "type": "number", "isParameter": true}],
                 "currentLine": 4, "callSite": "main:7"}
            ]
        }"#;
        let step: TimelineStep = serde_json::from_str(json).unwrap();
        assert_eq!(step.duration, 800);
        assert_eq!(step.frames.len(), 2);
        let active = step.active_frame().unwrap();
        assert_eq!(active.function_name, "fact");
        assert_eq!(active.parameters[0].value, Value::Int(3));
        assert_eq!(active.call_site.as_deref(), Some("main:7"));
        assert_eq!(step.max_depth(), 1);
    }

    #[test]
    fn test_variables_order_and_changes() {
        let mut frame = StackFrame::new("f", "g", 0);
        frame.parameters.push(Variable::parameter("a", Value::Int(1)));
        frame
            .local_variables
            .push(Variable::new("b", Value::Int(2)).changed());
        let names: Vec<&str> = frame.variables().map(|v| v.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert!(frame.has_changes());
    }
}
