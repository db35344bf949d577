//! Tick-checked timer queue
//!
//! Replaces fire-and-forget timers: work is queued with a due time and the
//! tick drains whatever is due. Entries due at the same time come out in the
//! order they were queued.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use glam::Vec2;

use crate::Millis;

/// Deferred work the tick knows how to run
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScheduledAction {
    /// One pulse of a wind gust
    WindPulse {
        direction: Vec2,
        pulse_index: u32,
        strength: f32,
    },
    /// Opening burst paper
    SpawnPaper,
}

#[derive(Debug, Clone, Copy)]
struct Entry {
    due: Millis,
    seq: u64,
    action: ScheduledAction,
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.due == other.due && self.seq == other.seq
    }
}

impl Eq for Entry {}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Entry {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.due, self.seq).cmp(&(other.due, other.seq))
    }
}

#[derive(Debug, Clone, Default)]
pub struct Schedule {
    queue: BinaryHeap<Reverse<Entry>>,
    next_seq: u64,
}

impl Schedule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, due: Millis, action: ScheduledAction) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.queue.push(Reverse(Entry { due, seq, action }));
    }

    /// Pop everything due at or before `now`, earliest first
    pub fn drain_due(&mut self, now: Millis) -> Vec<ScheduledAction> {
        let mut due = Vec::new();
        while let Some(Reverse(entry)) = self.queue.peek() {
            if entry.due > now {
                break;
            }
            due.push(entry.action);
            self.queue.pop();
        }
        due
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Drop all pending work (session end)
    pub fn clear(&mut self) {
        self.queue.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pulse(i: u32) -> ScheduledAction {
        ScheduledAction::WindPulse {
            direction: Vec2::X,
            pulse_index: i,
            strength: 1.0,
        }
    }

    #[test]
    fn test_drains_in_due_order() {
        let mut schedule = Schedule::new();
        schedule.push(300, pulse(2));
        schedule.push(0, pulse(0));
        schedule.push(150, pulse(1));

        assert_eq!(schedule.drain_due(0), vec![pulse(0)]);
        assert!(schedule.drain_due(149).is_empty());
        assert_eq!(schedule.drain_due(1000), vec![pulse(1), pulse(2)]);
        assert!(schedule.is_empty());
    }

    #[test]
    fn test_ties_keep_insertion_order() {
        let mut schedule = Schedule::new();
        schedule.push(100, ScheduledAction::SpawnPaper);
        schedule.push(100, pulse(7));
        assert_eq!(
            schedule.drain_due(100),
            vec![ScheduledAction::SpawnPaper, pulse(7)]
        );
    }

    #[test]
    fn test_clear() {
        let mut schedule = Schedule::new();
        schedule.push(5, ScheduledAction::SpawnPaper);
        assert_eq!(schedule.len(), 1);
        schedule.clear();
        assert!(schedule.drain_due(u64::MAX).is_empty());
    }
}
