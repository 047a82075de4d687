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

//! Lock acquisition ordering. Downward traversal hands off branch locks one
//! at a time and never needs this module. Cross-parent operations (`rename`)
//! are the one place the core locks two nodes at once, and does so in
//! address order to stay deadlock-free regardless of which direction a
//! concurrent rename runs.

use crate::node::{Branch, Node};
use parking_lot::MutexGuard;

pub enum BranchPair<'a> {
    /// `first` and `second` name the same node — acquired once.
    Same(MutexGuard<'a, Branch>),
    Distinct {
        first: MutexGuard<'a, Branch>,
        second: MutexGuard<'a, Branch>,
    },
}

/// Lock `first.branch` and `second.branch`, in address order if they differ,
/// once if they're the same node. The returned guards are always named by
/// the caller's original roles (`first`/`second`), independent of which was
/// physically locked first.
pub fn lock_branch_pair<'a>(first: &'a Node, second: &'a Node) -> BranchPair<'a> {
    if std::ptr::eq(first, second) {
        return BranchPair::Same(first.branch.lock());
    }
    let addr_first = first as *const Node as usize;
    let addr_second = second as *const Node as usize;
    if addr_first < addr_second {
        let first_guard = first.branch.lock();
        let second_guard = second.branch.lock();
        BranchPair::Distinct {
            first: first_guard,
            second: second_guard,
        }
    } else {
        let second_guard = second.branch.lock();
        let first_guard = first.branch.lock();
        BranchPair::Distinct {
            first: first_guard,
            second: second_guard,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{NodeKind, Stat};
    use std::sync::Arc;

    #[test]
    fn same_node_locks_once() {
        let n = Node::new_raw("a".into(), None, NodeKind::Dir, None, Stat::default(), None);
        match lock_branch_pair(&n, &n) {
            BranchPair::Same(_) => {}
            BranchPair::Distinct { .. } => panic!("expected Same"),
        };
    }

    #[test]
    fn distinct_nodes_both_locked() {
        let a: Arc<Node> = Node::new_raw("a".into(), None, NodeKind::Dir, None, Stat::default(), None);
        let b: Arc<Node> = Node::new_raw("b".into(), None, NodeKind::Dir, None, Stat::default(), None);
        match lock_branch_pair(&a, &b) {
            BranchPair::Distinct { .. } => {}
            BranchPair::Same(_) => panic!("expected Distinct"),
        };
    }
}
