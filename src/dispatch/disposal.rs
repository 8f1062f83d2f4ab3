// Copyright (C) 2026 Michael Wilson <mike@mdwn.dev>
//
// This program is free software: you can redistribute it and/or modify it under
// the terms of the GNU General Public License as published by the Free Software
// Foundation, version 3.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with
// this program. If not, see <https://www.gnu.org/licenses/>.
//

//! Timed disposal of playback instances against the host's frame clock.
//!
//! Disposals are fire-and-forget: once scheduled they cannot be cancelled.

use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::time::Duration;

use super::instance::InstanceId;

/// A pending disposal. Ordered by fire time, then by scheduling order.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
struct Pending {
    fire_at: Duration,
    sequence: u64,
    id: InstanceId,
}

/// A monotonic scheduler of disposals, keyed by fire time.
#[derive(Debug, Default)]
pub struct DisposalScheduler {
    /// Time elapsed on the frame clock.
    now: Duration,
    /// Pending disposals, earliest first.
    queue: BinaryHeap<Reverse<Pending>>,
    /// Tie breaker so equal fire times go out in scheduling order.
    next_sequence: u64,
}

impl DisposalScheduler {
    pub fn new() -> DisposalScheduler {
        DisposalScheduler::default()
    }

    /// Schedules the given instance to be disposed `delay` from now.
    pub fn schedule(&mut self, id: InstanceId, delay: Duration) {
        let pending = Pending {
            fire_at: self.now.saturating_add(delay),
            sequence: self.next_sequence,
            id,
        };
        self.next_sequence += 1;
        self.queue.push(Reverse(pending));
    }

    /// Advances the clock by `elapsed` and returns everything that is now due, in fire order.
    pub fn advance(&mut self, elapsed: Duration) -> Vec<InstanceId> {
        self.now = self.now.saturating_add(elapsed);

        let mut due = Vec::new();
        while let Some(Reverse(next)) = self.queue.peek() {
            if next.fire_at > self.now {
                break;
            }
            if let Some(Reverse(pending)) = self.queue.pop() {
                due.push(pending.id);
            }
        }
        due
    }

    /// The current frame clock time.
    pub fn now(&self) -> Duration {
        self.now
    }

    /// The number of disposals that have not fired yet.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }
}
