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

//! The logical VFS reference count, distinct from `Arc`'s own strong count:
//! this one tracks open handles and pins, not how many `Arc<Node>` clones
//! happen to exist at a given instant. A caller holding a `&Node` must
//! already have incremented it, or inherited the increment from a function
//! that handed the node back (traversal does this).

use crate::node::Node;
use std::sync::atomic::Ordering;

const ORD_ACQ: Ordering = Ordering::Acquire;
const ORD_REL: Ordering = Ordering::Release;

pub struct RefCounter;

impl RefCounter {
    /// Increment and transfer the increment to the caller.
    pub fn inc(node: &Node) -> i64 {
        node.ref_count.fetch_add(1, ORD_REL) + 1
    }

    /// Decrement, returning the post-decrement count. Panics on underflow in
    /// debug builds — a caller decrementing without an owed reference is a
    /// bug in the calling operation, not a recoverable condition.
    pub fn dec(node: &Node) -> i64 {
        let prev = node.ref_count.fetch_sub(1, ORD_REL);
        debug_assert!(prev > 0, "ref_count underflow on node {:?}", node.id());
        prev - 1
    }

    pub fn get(node: &Node) -> i64 {
        node.ref_count.load(ORD_ACQ)
    }

    /// Pin the root/a freshly-mounted node at +1 so it is never eviction-eligible.
    pub fn pin(node: &Node) {
        node.ref_count.fetch_add(1, ORD_REL);
    }

    pub fn unpin(node: &Node) -> i64 {
        Self::dec(node)
    }
}
