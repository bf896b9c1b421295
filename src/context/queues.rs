/*!
The heuristic clause queues --- how the next given clause is picked.

Two evaluation channels are kept over the unprocessed set:

- The *weight* channel, an [IndexHeap] over heuristic evaluations, yielding the lightest clause.
- The *age* channel, a queue in creation order, yielding the oldest clause.

Picks round-robin between the channels under a configurable ratio (so many weight picks per age pick), optionally perturbed by a random channel choice.
Entries are validated lazily against the unprocessed set: a clause removed by maintenance is simply skipped when it surfaces.

Determinism: with a zero random bias the pick order is a function of the strategy, the input order, and clause ids, which are handed out in creation order.
*/

use std::cmp::Reverse;
use std::collections::VecDeque;

use crate::{db::ClauseId, db::ClauseSet, generic::index_heap::IndexHeap};

/// The clause queues struct.
#[derive(Default)]
pub struct ClauseQueues {
    /// The weight channel.
    weight_heap: IndexHeap<Reverse<i64>>,

    /// The age channel.
    age_queue: VecDeque<ClauseId>,

    /// Weight picks remaining before the next age pick.
    weight_picks_left: u32,
}

impl ClauseQueues {
    /// A fresh pair of queues.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueues `id` on both channels under `evaluation`.
    pub fn enqueue(&mut self, id: ClauseId, evaluation: i64) {
        self.weight_heap.add(id as usize, Reverse(evaluation));
        self.weight_heap.activate(id as usize);
        self.age_queue.push_back(id);
    }

    /// Drops every queued entry.
    pub fn clear(&mut self) {
        while self.weight_heap.pop_max().is_some() {}
        self.age_queue.clear();
        self.weight_picks_left = 0;
    }

    /// Picks a clause from `unprocessed`.
    ///
    /// `ratio` weight picks are made per age pick; with probability `bias` the channel is instead chosen by coin flip.
    pub fn pick(
        &mut self,
        unprocessed: &ClauseSet,
        ratio: u32,
        bias: f64,
        rng: &mut impl rand::Rng,
    ) -> Option<ClauseId> {
        let by_weight = if bias > 0.0 && rng.random_bool(bias.clamp(0.0, 1.0)) {
            rng.random_bool(0.5)
        } else if self.weight_picks_left > 0 {
            self.weight_picks_left -= 1;
            true
        } else {
            self.weight_picks_left = ratio;
            false
        };

        if by_weight {
            self.pick_by_weight(unprocessed)
                .or_else(|| self.pick_by_age(unprocessed))
        } else {
            self.pick_by_age(unprocessed)
                .or_else(|| self.pick_by_weight(unprocessed))
        }
    }

    fn pick_by_weight(&mut self, unprocessed: &ClauseSet) -> Option<ClauseId> {
        while let Some(index) = self.weight_heap.pop_max() {
            let id = index as ClauseId;
            if unprocessed.contains(id) {
                return Some(id);
            }
        }
        None
    }

    fn pick_by_age(&mut self, unprocessed: &ClauseSet) -> Option<ClauseId> {
        while let Some(id) = self.age_queue.pop_front() {
            if unprocessed.contains(id) {
                return Some(id);
            }
        }
        None
    }
}
