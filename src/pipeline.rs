//! The execution queue: turns committed lines into a sequence of
//! dispatched [`Segment`]s, applying `&&`/`||` short-circuiting and
//! supporting deferred completion (`Busy`, `ExecutingContinue`).

use std::collections::VecDeque;

use crate::error::RetCode;
use crate::segment::{split_segments, Operator, Segment};

pub struct ExecutionQueue {
    segments: VecDeque<Segment>,
    current: Option<Segment>,
    pending_op: Operator,
    last_code: RetCode,
}

impl ExecutionQueue {
    pub fn new() -> ExecutionQueue {
        ExecutionQueue {
            segments: VecDeque::new(),
            current: None,
            pending_op: Operator::Sequence,
            last_code: RetCode::Success,
        }
    }

    /// Splits `line` on operators and appends the resulting segments to
    /// the back of the queue. Segments from an earlier, still-running
    /// line are left untouched in front.
    pub fn push_line(&mut self, line: &str) {
        self.segments.extend(split_segments(line));
    }

    /// Returns the segment that should run now, skipping any segments
    /// short-circuited by a preceding `&&`/`||`. Returns the same
    /// in-flight segment again if one is already dispatched (so a `Busy`
    /// handler can be retried) and `None` once the queue is drained.
    pub fn poll(&mut self) -> Option<&Segment> {
        if self.current.is_some() {
            return self.current.as_ref();
        }
        while let Some(seg) = self.segments.pop_front() {
            if should_run(self.pending_op, self.last_code) {
                self.current = Some(seg);
                return self.current.as_ref();
            }
            self.pending_op = seg.joined_by;
        }
        None
    }

    /// Records the outcome of the segment last returned by [`poll`] and
    /// retires it, making the next segment eligible.
    pub fn complete(&mut self, code: RetCode) {
        if let Some(seg) = self.current.take() {
            self.last_code = code;
            self.pending_op = seg.joined_by;
        }
    }

    pub fn last_code(&self) -> RetCode {
        self.last_code
    }

    pub fn is_drained(&self) -> bool {
        self.current.is_none() && self.segments.is_empty()
    }

    /// Drops every queued segment, including one in flight. Used by the
    /// `Ctrl-C` cancel path, which clears the edit line but — per the
    /// concurrency model — never aborts a handler already dispatched, so
    /// this only ever discards segments that have not started yet.
    pub fn clear_pending(&mut self) {
        self.segments.clear();
    }
}

impl Default for ExecutionQueue {
    fn default() -> ExecutionQueue {
        ExecutionQueue::new()
    }
}

fn should_run(op: Operator, last: RetCode) -> bool {
    match op {
        Operator::Sequence => true,
        Operator::And => !last.is_failure(),
        Operator::Or => last.is_failure(),
    }
}
