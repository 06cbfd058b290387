//! Environment frames
//!
//! Frames live in an arena and refer to each other by index, so closures can
//! point at their defining frame without ownership cycles. Frames are
//! appended for every call and never removed; everything stays alive for the
//! duration of the run.

use std::collections::HashMap;

use super::builtins::Builtin;
use super::value::{BuiltinApp, Value};

/// One scope of name-to-value bindings.
#[derive(Debug)]
struct Frame {
    parent: Option<usize>,
    bindings: HashMap<String, Value>,
}

/// All frames of a run, addressed by index. Frame 0 is the primordial frame
/// holding the built-ins; every chain of parents ends there.
#[derive(Debug)]
pub struct EnvArena {
    frames: Vec<Frame>,
}

impl EnvArena {
    pub fn new() -> Self {
        let mut bindings = HashMap::new();
        for builtin in Builtin::ALL {
            bindings.insert(
                builtin.name().to_string(),
                Value::Builtin(BuiltinApp::new(builtin)),
            );
        }
        Self {
            frames: vec![Frame {
                parent: None,
                bindings,
            }],
        }
    }

    /// Allocate a fresh frame below `parent`, returning its index.
    pub fn push(&mut self, parent: usize) -> usize {
        let index = self.frames.len();
        self.frames.push(Frame {
            parent: Some(parent),
            bindings: HashMap::new(),
        });
        index
    }

    pub fn bind(&mut self, frame: usize, name: String, value: Value) {
        self.frames[frame].bindings.insert(name, value);
    }

    /// Resolve a name by walking the parent chain from `frame`.
    pub fn lookup(&self, frame: usize, name: &str) -> Option<&Value> {
        let mut current = Some(frame);
        while let Some(index) = current {
            let frame = &self.frames[index];
            if let Some(value) = frame.bindings.get(name) {
                return Some(value);
            }
            current = frame.parent;
        }
        None
    }
}

impl Default for EnvArena {
    fn default() -> Self {
        Self::new()
    }
}
