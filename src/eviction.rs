/*
 * Created on Thu Jul 30 2026
 *
 * This file is a part of vfscore
 * vfscore is a free and open-source node graph core for a kernel-level
 * virtual file system, built to resolve paths against pluggable backing
 * drivers with fine-grained per-node locking.
 *
 * Copyright (c) 2026, the vfscore authors
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU Affero General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * This program is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
 * GNU Affero General Public License for more details.
 *
 * You should have received a copy of the GNU Affero General Public License
 * along with this program. If not, see <https://www.gnu.org/licenses/>.
 *
*/

//! A fixed-size ring holding an auxiliary reference to every node whose
//! logical ref_count has dropped to zero. Such a node stays attached to its
//! parent — a subsequent lookup can still find it and pull it back out with
//! [`EvictionCache::withdraw`] — until the ring wraps around and displaces
//! it, at which point the caller physically deletes the displaced node.
//!
//! The cache only decides *which* node is the victim; the actual unlink
//! (detach, driver `remove`, resource close) is the caller's job.

use crate::node::Node;
use parking_lot::Mutex;
use std::sync::Arc;

pub struct EvictionCache {
    slots: Mutex<EvictionSlots>,
}

struct EvictionSlots {
    ring: Vec<Option<Arc<Node>>>,
    idx: usize,
}

impl EvictionCache {
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "eviction cache capacity must be non-zero");
        Self {
            slots: Mutex::new(EvictionSlots {
                ring: vec![None; capacity],
                idx: 0,
            }),
        }
    }

    /// Insert `node` (already detached from the tree, ref_count == 0) into the
    /// next ring slot. Returns the node that previously occupied that slot,
    /// if any — the caller must physically delete it.
    pub fn offer(&self, node: Arc<Node>) -> Option<Arc<Node>> {
        let mut slots = self.slots.lock();
        let EvictionSlots { ring, idx } = &mut *slots;
        *idx = (*idx + 1) % ring.len();
        let evicted = ring[*idx].take();
        ring[*idx] = Some(node);
        evicted
    }

    /// Remove and return `node` from the cache if it is still sitting there
    /// unevicted — used when a direct `remove()` targets a node that's
    /// merely cached, not yet overwritten.
    pub fn withdraw(&self, node: &Arc<Node>) -> Option<Arc<Node>> {
        let mut slots = self.slots.lock();
        for slot in slots.ring.iter_mut() {
            if let Some(n) = slot {
                if Arc::ptr_eq(n, node) {
                    return slot.take();
                }
            }
        }
        None
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.slots.lock().ring.iter().filter(|s| s.is_some()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{NodeKind, Stat};

    fn leaf(name: &str) -> Arc<Node> {
        Node::new_raw(name.into(), None, NodeKind::File, None, Stat::default(), None)
    }

    #[test]
    fn wraps_and_evicts_oldest() {
        let cache = EvictionCache::new(2);
        assert!(cache.offer(leaf("a")).is_none());
        assert!(cache.offer(leaf("b")).is_none());
        // capacity 2: the third insert evicts the first (`a`)
        let evicted = cache.offer(leaf("c")).unwrap();
        assert_eq!(&*evicted.name(), "a");
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn withdraw_removes_without_eviction() {
        let cache = EvictionCache::new(4);
        let a = leaf("a");
        cache.offer(Arc::clone(&a));
        assert!(cache.withdraw(&a).is_some());
        assert_eq!(cache.len(), 0);
    }
}
