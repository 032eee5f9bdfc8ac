//! Control-flow simulation
//!
//! Walks a [`DiagramBlock`] sequence strictly in index order, keeping the
//! bookkeeping a viewer needs to follow along:
//!
//! - the single active block and the set of visited blocks
//! - an append-only execution path
//! - a simulated call stack (`function` pushes, `return` pops)
//! - the last outcome drawn for each `condition` block
//! - an iteration counter per `loop` block
//!
//! # Invariants
//!
//! - At most one block is active after any step.
//! - `visited` only grows, and `path.len()` equals the steps taken, until reset.
//! - A pushed frame's `depth` is the call stack's length just before the push.
//!
//! Successor edges (`connections`) are not followed; branch outcomes are
//! recorded but never redirect the cursor.

use super::policy::{Pace, StepContext, Transition, TransitionPolicy};
use crate::model::{BlockType, DiagramBlock, FunctionDefinition};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rustc_hash::{FxHashMap, FxHashSet};
use std::time::Duration;
use tracing::warn;

/// Function name pushed for a `function` block with no name
pub const UNKNOWN_FUNCTION: &str = "unknown";

/// One entry of the execution path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathEntry {
    pub block_index: usize,
    /// Time since the last reset
    pub timestamp: Duration,
    pub function_name: Option<String>,
}

/// A simulated call frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallFrame {
    pub function_name: String,
    pub depth: usize,
    pub entry_step: usize,
}

/// Bookkeeping accumulated by the simulation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExecutionState {
    active_block: Option<usize>,
    visited: FxHashSet<usize>,
    path: Vec<PathEntry>,
    call_stack: Vec<CallFrame>,
    branch_decisions: FxHashMap<usize, bool>,
    loop_iterations: FxHashMap<usize, u32>,
}

impl ExecutionState {
    /// The active block set; holds at most one index
    pub fn active_blocks(&self) -> impl Iterator<Item = usize> + '_ {
        self.active_block.iter().copied()
    }

    pub fn active_block(&self) -> Option<usize> {
        self.active_block
    }

    pub fn is_active(&self, block: usize) -> bool {
        self.active_block == Some(block)
    }

    pub fn visited(&self) -> &FxHashSet<usize> {
        &self.visited
    }

    pub fn is_visited(&self, block: usize) -> bool {
        self.visited.contains(&block)
    }

    /// Visited block indices in ascending order
    pub fn visited_sorted(&self) -> Vec<usize> {
        let mut blocks: Vec<usize> = self.visited.iter().copied().collect();
        blocks.sort_unstable();
        blocks
    }

    pub fn path(&self) -> &[PathEntry] {
        &self.path
    }

    /// Call frames from outermost to innermost
    pub fn call_stack(&self) -> &[CallFrame] {
        &self.call_stack
    }

    pub fn branch_decisions(&self) -> &FxHashMap<usize, bool> {
        &self.branch_decisions
    }

    pub fn branch_decision(&self, block: usize) -> Option<bool> {
        self.branch_decisions.get(&block).copied()
    }

    pub fn loop_iterations(&self) -> &FxHashMap<usize, u32> {
        &self.loop_iterations
    }

    pub fn loop_iteration(&self, block: usize) -> u32 {
        self.loop_iterations.get(&block).copied().unwrap_or(0)
    }

    /// Number of live frames for `name`; above 1 means the function is recursing
    pub fn frames_named(&self, name: &str) -> usize {
        self.call_stack
            .iter()
            .filter(|f| f.function_name == name)
            .count()
    }

    /// Check whether every accumulator is empty
    pub fn is_pristine(&self) -> bool {
        self.active_block.is_none()
            && self.visited.is_empty()
            && self.path.is_empty()
            && self.call_stack.is_empty()
            && self.branch_decisions.is_empty()
            && self.loop_iterations.is_empty()
    }
}

/// Source of outcomes for `condition` blocks
pub trait DecisionOracle {
    fn decide(&mut self, block: usize, state: &ExecutionState) -> bool;

    /// Return to the outcome sequence of a fresh run, where there is one
    fn restart(&mut self) {}
}

impl<F> DecisionOracle for F
where
    F: FnMut(usize, &ExecutionState) -> bool,
{
    fn decide(&mut self, block: usize, state: &ExecutionState) -> bool {
        self(block, state)
    }
}

/// Uniform coin flip per condition block
#[derive(Debug, Clone)]
pub struct RandomOracle {
    rng: ChaCha8Rng,
    seed: Option<u64>,
}

impl RandomOracle {
    /// Seeded from OS entropy; outcomes differ between runs
    pub fn from_entropy() -> Self {
        RandomOracle {
            rng: ChaCha8Rng::from_entropy(),
            seed: None,
        }
    }

    /// Reproducible outcomes for a given seed
    pub fn seeded(seed: u64) -> Self {
        RandomOracle {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed: Some(seed),
        }
    }
}

impl Default for RandomOracle {
    fn default() -> Self {
        Self::from_entropy()
    }
}

impl DecisionOracle for RandomOracle {
    fn decide(&mut self, _block: usize, _state: &ExecutionState) -> bool {
        self.rng.gen_bool(0.5)
    }

    /// Seeded oracles replay the same outcomes; entropy oracles keep drawing
    fn restart(&mut self) {
        if let Some(seed) = self.seed {
            self.rng = ChaCha8Rng::seed_from_u64(seed);
        }
    }
}

/// Index-sequential simulation over a control-flow block list
#[derive(Debug, Clone)]
pub struct CfgSimulationPolicy<O = RandomOracle> {
    blocks: Vec<DiagramBlock>,
    functions: Vec<FunctionDefinition>,
    oracle: O,
}

impl CfgSimulationPolicy<RandomOracle> {
    pub fn new(blocks: Vec<DiagramBlock>, functions: Vec<FunctionDefinition>) -> Self {
        Self::with_oracle(blocks, functions, RandomOracle::from_entropy())
    }
}

impl<O: DecisionOracle> CfgSimulationPolicy<O> {
    pub fn with_oracle(
        blocks: Vec<DiagramBlock>,
        functions: Vec<FunctionDefinition>,
        oracle: O,
    ) -> Self {
        CfgSimulationPolicy {
            blocks,
            functions,
            oracle,
        }
    }

    pub fn blocks(&self) -> &[DiagramBlock] {
        &self.blocks
    }

    pub fn functions(&self) -> &[FunctionDefinition] {
        &self.functions
    }

    /// The function definition that lists `block` among its blocks
    pub fn function_of(&self, block: usize) -> Option<&FunctionDefinition> {
        self.functions.iter().find(|f| f.owns(block))
    }

    pub fn is_recursive(&self, name: &str) -> bool {
        self.functions
            .iter()
            .any(|f| f.name == name && f.is_recursive())
    }
}

impl<O: DecisionOracle> TransitionPolicy for CfgSimulationPolicy<O> {
    type State = ExecutionState;
    type Payload = DiagramBlock;

    fn len(&self) -> usize {
        self.blocks.len()
    }

    fn delay(&self, _index: usize, pace: &Pace) -> Duration {
        pace.speed()
    }

    fn transition(
        &mut self,
        index: usize,
        prior: &ExecutionState,
        ctx: &StepContext,
    ) -> Transition<ExecutionState, DiagramBlock> {
        let block = &self.blocks[index];
        let mut next = prior.clone();

        next.active_block = Some(index);
        next.visited.insert(index);
        next.path.push(PathEntry {
            block_index: index,
            timestamp: ctx.elapsed,
            function_name: block.function_name.clone(),
        });

        match block.block_type {
            BlockType::Function => {
                let depth = next.call_stack.len();
                next.call_stack.push(CallFrame {
                    function_name: block
                        .function_name
                        .clone()
                        .unwrap_or_else(|| UNKNOWN_FUNCTION.to_string()),
                    depth,
                    entry_step: index,
                });
            }
            BlockType::Return => {
                if next.call_stack.pop().is_none() {
                    warn!(block = index, "return with an empty call stack");
                }
            }
            BlockType::Condition => {
                let outcome = self.oracle.decide(index, prior);
                next.branch_decisions.insert(index, outcome);
            }
            BlockType::Loop => {
                *next.loop_iterations.entry(index).or_insert(0) += 1;
            }
            BlockType::Start | BlockType::End | BlockType::Process => {}
        }

        Transition {
            state: next,
            payload: block.clone(),
            delay: ctx.pace.speed(),
        }
    }

    fn restart(&mut self) {
        self.oracle.restart();
    }
}
