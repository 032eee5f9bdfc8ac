//! Plain-text playback without the TUI
//!
//! Plays a scheduler to completion, writing one line per step. Waiting is
//! delegated to the caller so the same loop runs against the real clock
//! (sleeping) or a [`ManualClock`](crate::engine::ManualClock) (advancing).

use crate::engine::{
    Clock, ControlError, ExecutionState, PlaybackState, Scheduler, SnapshotOf, TimelinePolicy,
    TransitionPolicy,
};
use crate::model::DiagramBlock;
use crate::session::Session;
use crate::snapshot::Snapshot;
use std::io::{self, Write};
use std::time::Duration;

/// Play `scheduler` until it completes. Returns the number of steps written.
pub fn replay<P, C, W, F, D>(
    scheduler: &mut Scheduler<P, C>,
    out: &mut W,
    mut wait: F,
    describe: D,
) -> io::Result<usize>
where
    P: TransitionPolicy,
    C: Clock,
    W: Write,
    F: FnMut(Duration),
    D: Fn(&SnapshotOf<P>) -> String,
{
    match scheduler.play() {
        Ok(()) => {}
        Err(ControlError::Exhausted { .. }) => return Ok(0),
        Err(e) => return Err(io::Error::other(e)),
    }

    let mut written = 0;
    while scheduler.state() == PlaybackState::Running {
        if let Some(left) = scheduler.time_until_next_step() {
            if !left.is_zero() {
                wait(left);
            }
        }
        if scheduler.tick() {
            writeln!(out, "{}", describe(&scheduler.snapshot()))?;
            written += 1;
        }
    }
    out.flush()?;
    Ok(written)
}

/// Play a session against the system clock, sleeping between steps
pub fn run<W: Write>(session: &mut Session, out: &mut W) -> io::Result<usize> {
    match session {
        Session::Timeline(s) => replay(s, out, std::thread::sleep, describe_timeline),
        Session::Diagram(s) => replay(s, out, std::thread::sleep, describe_diagram),
    }
}

fn position(cursor: usize, len: usize) -> String {
    format!("[{}/{}]", cursor, len)
}

/// One line for a timeline snapshot: position, record name, frame chain
pub fn describe_timeline(snapshot: &SnapshotOf<TimelinePolicy>) -> String {
    let Some(step) = &snapshot.payload else {
        return format!("{} (no step)", position(snapshot.cursor, snapshot.len));
    };
    let chain: Vec<String> = step
        .frames
        .iter()
        .map(|f| {
            if f.is_active {
                format!("*{}", f.function_name)
            } else {
                f.function_name.clone()
            }
        })
        .collect();
    let mut line = format!("{} {}", position(snapshot.cursor, snapshot.len), step.name);
    if !step.description.is_empty() {
        line.push_str(&format!(" - {}", step.description));
    }
    if !chain.is_empty() {
        line.push_str(&format!(" | stack: {}", chain.join(" > ")));
    }
    line
}

/// One line for a diagram snapshot: position, block, call stack, bookkeeping
pub fn describe_diagram(snapshot: &Snapshot<DiagramBlock, ExecutionState>) -> String {
    let Some(block) = &snapshot.payload else {
        return format!("{} (no block)", position(snapshot.cursor, snapshot.len));
    };
    let state = &snapshot.state;
    let mut line = format!(
        "{} #{} {} {}",
        position(snapshot.cursor, snapshot.len),
        block.index,
        block.block_type.label(),
        block.content
    );
    let position_in_seq = snapshot.cursor.saturating_sub(1);
    if let Some(taken) = state.branch_decision(position_in_seq) {
        line.push_str(if taken { " -> true" } else { " -> false" });
    }
    let iterations = state.loop_iteration(position_in_seq);
    if iterations > 0 {
        line.push_str(&format!(" (iteration {})", iterations));
    }
    let stack: Vec<&str> = state
        .call_stack()
        .iter()
        .map(|f| f.function_name.as_str())
        .collect();
    if !stack.is_empty() {
        line.push_str(&format!(" | stack: {}", stack.join(" > ")));
    }
    line
}
