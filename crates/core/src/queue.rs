use std::collections::VecDeque;

use super::traits::NodeQueue;

/// FIFO queue of node ids, sized once from the node count.
///
/// The reverse breadth-first pass enqueues each node at most once, so the
/// backing buffer never reallocates after construction.
#[derive(Debug)]
pub struct BoundedQueue {
    items: VecDeque<usize>,
}

impl BoundedQueue {
    pub fn with_capacity(num_nodes: usize) -> Self {
        Self {
            items: VecDeque::with_capacity(num_nodes),
        }
    }
}

impl NodeQueue for BoundedQueue {
    fn reset(&mut self) {
        self.items.clear();
    }

    fn push(&mut self, node: usize) {
        self.items.push_back(node);
    }

    fn pop(&mut self) -> Option<usize> {
        self.items.pop_front()
    }

    fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
