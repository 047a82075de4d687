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

//! Owns node memory. Allocation is just `Arc::new` (node.rs); this module is
//! the child-list manipulation half — `attach_child`/`detach_child` — the
//! unlink half of the sequence `GraphOps::remove` relies on. Callers must
//! already hold `parent.branch_lock` (enforced here by requiring a
//! [`Branch`] guard, not the `Arc<Node>`).

use crate::node::{Branch, Node, NodeKind, Stat};
use parking_lot::MutexGuard;
use std::sync::{Arc, Weak};

pub struct NodeStore;

impl NodeStore {
    /// Allocate a new node and prepend it under the already-locked parent branch.
    #[allow(clippy::too_many_arguments)]
    pub fn new_node(
        parent_branch: &mut MutexGuard<'_, Branch>,
        parent: &Arc<Node>,
        name: &str,
        kind: NodeKind,
        mount: Option<Weak<Node>>,
        stat: Stat,
        resource: Option<crate::driver::Resource>,
    ) -> Arc<Node> {
        let node = Node::new_raw(
            name.into(),
            Some(Arc::downgrade(parent)),
            kind,
            mount,
            stat,
            resource,
        );
        Self::attach_child(parent_branch, name, Arc::clone(&node));
        node
    }

    /// Insert `node` into `parent_branch.children` (unordered).
    pub fn attach_child(parent_branch: &mut MutexGuard<'_, Branch>, name: &str, node: Arc<Node>) {
        parent_branch.children.insert(name.into(), node);
    }

    /// Remove `name` from `parent_branch.children`, returning the detached node if present.
    pub fn detach_child(parent_branch: &mut MutexGuard<'_, Branch>, name: &str) -> Option<Arc<Node>> {
        parent_branch.children.remove(name)
    }

    /// Rename `node`'s entry in its own branch record (name is part of the
    /// branch-lock domain). Does not touch any parent's child map.
    pub fn rename_self(node: &Node, new_name: &str) {
        node.branch.lock().name = new_name.into();
    }
}
