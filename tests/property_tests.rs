// Invariants that hold across arbitrary diagrams and control sequences

use flowtty::engine::{
    CfgSimulationPolicy, ExecutionState, ManualClock, PlaybackState, Scheduler, TimelinePolicy,
};
use flowtty::model::{BlockType, DiagramBlock, TimelineStep};
use proptest::prelude::*;

#[derive(Debug, Clone, Copy)]
enum Op {
    Step,
    Play,
    Pause,
    Advance(u64),
    Reset,
    StepN(usize),
}

fn block_type() -> impl Strategy<Value = BlockType> {
    prop_oneof![
        Just(BlockType::Start),
        Just(BlockType::End),
        Just(BlockType::Condition),
        Just(BlockType::Loop),
        Just(BlockType::Function),
        Just(BlockType::Return),
        Just(BlockType::Process),
    ]
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => Just(Op::Step),
        2 => Just(Op::Play),
        2 => Just(Op::Pause),
        3 => (1u64..2500).prop_map(Op::Advance),
        1 => Just(Op::Reset),
        1 => (0usize..5).prop_map(Op::StepN),
    ]
}

fn blocks(types: &[BlockType]) -> Vec<DiagramBlock> {
    types
        .iter()
        .enumerate()
        .map(|(i, &t)| {
            let block = DiagramBlock::new(i, t, format!("block {}", i));
            if t == BlockType::Function {
                block.in_function(format!("f{}", i % 3))
            } else {
                block
            }
        })
        .collect()
}

/// Call-stack depth after replaying the first `taken` blocks
fn expected_depth(types: &[BlockType], taken: usize) -> usize {
    types[..taken].iter().fold(0usize, |depth, t| match t {
        BlockType::Function => depth + 1,
        BlockType::Return => depth.saturating_sub(1),
        _ => depth,
    })
}

fn apply<P, C>(scheduler: &mut Scheduler<P, C>, clock: &ManualClock, op: Op)
where
    P: flowtty::engine::TransitionPolicy,
    C: flowtty::engine::Clock,
{
    match op {
        Op::Step => {
            let _ = scheduler.step();
        }
        Op::Play => {
            let _ = scheduler.play();
        }
        Op::Pause => scheduler.pause(),
        Op::Advance(ms) => {
            clock.advance_ms(ms);
            while scheduler.tick() {}
        }
        Op::Reset => scheduler.reset(),
        Op::StepN(n) => {
            let _ = scheduler.step_n(n);
        }
    }
}

proptest! {
    /// Bookkeeping stays consistent with the number of steps taken
    #[test]
    fn prop_execution_state_tracks_cursor(
        types in prop::collection::vec(block_type(), 0..24),
        ops in prop::collection::vec(op(), 0..60),
    ) {
        let clock = ManualClock::new();
        let policy = CfgSimulationPolicy::with_oracle(
            blocks(&types),
            Vec::new(),
            |index: usize, state: &ExecutionState| (index + state.path().len()) % 2 == 0,
        );
        let mut scheduler = Scheduler::with_clock(policy, clock.clone());
        scheduler.set_speed(500).unwrap();

        let mut previous = scheduler.snapshot();
        for op in ops {
            apply(&mut scheduler, &clock, op);
            let snap = scheduler.snapshot();
            let state = &snap.state;

            prop_assert!(snap.cursor <= types.len());
            prop_assert_eq!(state.path().len(), snap.cursor);
            prop_assert_eq!(state.call_stack().len(), expected_depth(&types, snap.cursor));
            prop_assert!(state.active_blocks().count() <= 1);
            prop_assert_eq!(state.active_block(), state.path().last().map(|e| e.block_index));

            for (depth, frame) in state.call_stack().iter().enumerate() {
                prop_assert_eq!(frame.depth, depth);
            }

            // Visited only grows between resets
            if !matches!(op, Op::Reset) {
                prop_assert!(previous.state.visited().is_subset(state.visited()));
            }

            if snap.cursor == types.len() && !types.is_empty() {
                prop_assert_eq!(snap.playback, PlaybackState::Completed);
            }
            if snap.playback != PlaybackState::Running {
                prop_assert!(scheduler.next_deadline().is_none());
            }
            previous = snap;
        }
    }

    /// Reset always lands on the pristine starting point
    #[test]
    fn prop_reset_is_pure(
        types in prop::collection::vec(block_type(), 0..16),
        ops in prop::collection::vec(op(), 0..40),
    ) {
        let clock = ManualClock::new();
        let policy = CfgSimulationPolicy::with_oracle(
            blocks(&types),
            Vec::new(),
            |index: usize, _: &ExecutionState| index % 3 == 0,
        );
        let mut scheduler = Scheduler::with_clock(policy, clock.clone());
        for op in ops {
            apply(&mut scheduler, &clock, op);
        }
        scheduler.reset();

        let snap = scheduler.snapshot();
        prop_assert_eq!(snap.cursor, 0);
        prop_assert_eq!(snap.playback, PlaybackState::Idle);
        prop_assert!(snap.payload.is_none());
        prop_assert!(snap.state.is_pristine());
        prop_assert!(scheduler.next_deadline().is_none());
    }

    /// A second pause changes nothing
    #[test]
    fn prop_pause_is_idempotent(
        durations in prop::collection::vec(1u64..3000, 1..12),
        ops in prop::collection::vec(op(), 0..30),
    ) {
        let steps: Vec<TimelineStep> = durations
            .iter()
            .enumerate()
            .map(|(i, &duration)| TimelineStep {
                id: i.to_string(),
                name: format!("step {}", i),
                description: String::new(),
                frames: Vec::new(),
                duration,
            })
            .collect();
        let clock = ManualClock::new();
        let mut scheduler = Scheduler::with_clock(TimelinePolicy::new(steps), clock.clone());
        for op in ops {
            apply(&mut scheduler, &clock, op);
        }

        scheduler.pause();
        let once = scheduler.snapshot();
        scheduler.pause();
        prop_assert_eq!(scheduler.snapshot(), once);
    }
}
