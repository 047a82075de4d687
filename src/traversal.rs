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

//! The path walker. The hard core — per-component lookup under
//! `branch_lock` hand-off, callback-driven materialization on a miss, and
//! symlink resolution with a hop budget.
//!
//! ## Link resolution returns the target, not the origin
//!
//! A successful link resolution hands back the fully-resolved *target*
//! node's identity, not the link node's — `load_path(link_path,
//! RESOLVE_LINKS)` and `load_path(target_path)` return the same node when
//! `link_target == target`. The origin link gets `link_target` populated as
//! a side effect of the resolution. See DESIGN.md.

use crate::{
    error::{Error, VfsResult},
    lexer::PathLexer,
    node::Node,
    refcount::RefCounter,
};
use log::trace;
use std::sync::Arc;

pub const MAX_LINK_HOPS: u32 = 40;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraversalFlags(u8);

impl TraversalFlags {
    pub const NONE: Self = Self(0);
    /// If the terminal node is a `Link`, resolve it to its target.
    pub const RESOLVE_LINKS: Self = Self(1 << 0);
    /// Stop one component short; the caller handles the last component itself.
    pub const IGNORE_LAST: Self = Self(1 << 1);

    pub fn contains(self, flag: Self) -> bool {
        self.0 & flag.0 == flag.0
    }
}

impl std::ops::BitOr for TraversalFlags {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

pub struct TraversalOutcome {
    /// The deepest resolved node. Carries one reference owed to the caller.
    pub node: Arc<Node>,
    /// Suffix starting at the component that would be processed next; empty
    /// iff the path was fully consumed.
    pub remainder: String,
}

/// Materialization callback: called with the parent's `branch_lock` already
/// held, on a child-miss. `mount_relative` is the suffix of the path from the
/// nearest enclosing mount boundary through the end of `component`, or
/// `None` when nothing in the ancestry is a mount.
pub trait Materializer {
    #[allow(clippy::too_many_arguments)]
    fn materialize(
        &self,
        parent: &Arc<Node>,
        parent_branch: &mut parking_lot::MutexGuard<'_, crate::node::Branch>,
        component: &str,
        mount_relative: Option<&str>,
        is_last: bool,
    ) -> VfsResult<Option<Arc<Node>>>;
}

fn offset_of(path: &str, sub: &str) -> usize {
    sub.as_ptr() as usize - path.as_ptr() as usize
}

/// Walk `path` from `start`, without symlink resolution. Returns the deepest
/// resolved node (with one transferred reference) and the unconsumed
/// remainder. Never fails on a plain miss or a driver failure during
/// materialization — both are reported as a non-empty remainder; only a
/// materializer error it can't interpret as a miss (e.g. out of memory) is
/// propagated as `Err`.
fn walk_components(
    start: &Arc<Node>,
    path: &str,
    flags: TraversalFlags,
    materializer: Option<&dyn Materializer>,
) -> VfsResult<(Arc<Node>, String)> {
    let mut cur = Arc::clone(start);
    RefCounter::inc(&cur);
    let mut mount_base: Option<usize> = None;
    let mut lexer = PathLexer::new(path);

    loop {
        // peek without consuming, so IGNORE_LAST can stop before commit
        let mut probe = lexer.clone();
        let component = match probe.next_component() {
            Some(c) => c,
            None => {
                lexer = probe;
                break;
            }
        };
        if flags.contains(TraversalFlags::IGNORE_LAST) && component.is_last {
            let remainder = path[offset_of(path, component.text)..].to_string();
            return Ok((cur, remainder));
        }
        lexer = probe;

        if cur.kind() == crate::node::NodeKind::Mount && mount_base.is_none() {
            mount_base = Some(offset_of(path, component.text));
        }
        let mount_relative = mount_base.map(|base| &path[base..lexer.cursor()]);

        let next = match component.text {
            ".." => Some(cur.parent().unwrap_or_else(|| Arc::clone(&cur))),
            "." => Some(Arc::clone(&cur)),
            name => {
                let mut branch = cur.branch.lock();
                if let Some(child) = branch.children.get(name) {
                    Some(Arc::clone(child))
                } else if let Some(materializer) = materializer {
                    trace!("traversal miss for {name:?} under node {:?}, materializing", cur.id());
                    materializer.materialize(&cur, &mut branch, name, mount_relative, component.is_last)?
                } else {
                    None
                }
            }
        };

        match next {
            Some(next) if Arc::ptr_eq(&next, &cur) => { /* "." or root-parent-of-root: no refcount churn */ }
            Some(next) => {
                RefCounter::inc(&next);
                RefCounter::dec(&cur);
                cur = next;
            }
            None => {
                let remainder = path[offset_of(path, component.text)..].to_string();
                return Ok((cur, remainder));
            }
        }
    }
    Ok((cur, lexer.remainder().to_string()))
}

/// Follow `link_target` edges (reading the link body through the driver when
/// uncached) until `cur` is no longer an unresolved `Link`, or the hop budget
/// is exhausted.
fn resolve_links(
    cur: Arc<Node>,
    flags: TraversalFlags,
    max_hops: u32,
) -> VfsResult<Arc<Node>> {
    let mut cur = cur;
    let mut hops = 0u32;
    while flags.contains(TraversalFlags::RESOLVE_LINKS) && cur.kind() == crate::node::NodeKind::Link {
        let cached = cur.props.lock().link_target.clone();
        if let Some(target) = cached {
            RefCounter::inc(&target);
            RefCounter::dec(&cur);
            cur = target;
            hops += 1;
            if hops >= max_hops {
                return Err(Error::TooManyLinks);
            }
            continue;
        }
        hops += 1;
        if hops >= max_hops {
            return Err(Error::TooManyLinks);
        }
        let body = read_link_body(&cur)?;
        if body.is_empty() {
            return Err(Error::BrokenLink);
        }
        let origin = Arc::clone(&cur);
        let link_parent = origin.parent().unwrap_or_else(|| Arc::clone(&origin));
        RefCounter::dec(&origin);
        let (resolved, remainder) = walk_components(&link_parent, &body, TraversalFlags::RESOLVE_LINKS, None)
            .map_err(|_| Error::BrokenLink)?;
        if !remainder.is_empty() {
            RefCounter::dec(&resolved);
            return Err(Error::BrokenLink);
        }
        // the nested walk's increment on `resolved` is what flows back up as
        // `cur`; the permanent link_target edge needs its own, independent
        // increment (invariant 6 is a reference held regardless of any
        // traversal in flight)
        RefCounter::inc(&resolved);
        origin.props.lock().link_target = Some(Arc::clone(&resolved));
        cur = resolved;
    }
    Ok(cur)
}

fn read_link_body(link: &Node) -> VfsResult<String> {
    let props = link.props.lock();
    let resource = props.resource.as_ref().ok_or(Error::BrokenLink)?;
    let mut buf = vec![0u8; 4096];
    let n = resource
        .driver
        .read(&resource.handle, 0, &mut buf)
        .map_err(|_| Error::BrokenLink)?;
    buf.truncate(n);
    String::from_utf8(buf).map_err(|_| Error::BrokenLink)
}

/// Public entry point: walk `path` from `start`, then resolve a terminal
/// link if `RESOLVE_LINKS` is set.
pub fn traverse(
    path: &str,
    start: &Arc<Node>,
    flags: TraversalFlags,
    materializer: Option<&dyn Materializer>,
    max_link_hops: u32,
) -> VfsResult<TraversalOutcome> {
    let (terminal, remainder) = walk_components(start, path, flags, materializer)?;
    if remainder.is_empty() {
        let resolved = resolve_links(terminal, flags, max_link_hops)?;
        Ok(TraversalOutcome {
            node: resolved,
            remainder,
        })
    } else {
        Ok(TraversalOutcome {
            node: terminal,
            remainder,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{NodeKind, Stat};

    fn root() -> Arc<Node> {
        let r = Node::new_raw("".into(), None, NodeKind::Root, None, Stat::default(), None);
        RefCounter::pin(&r);
        r
    }

    #[test]
    fn root_path_resolves_to_root() {
        let root = root();
        let out = traverse("/", &root, TraversalFlags::NONE, None, MAX_LINK_HOPS).unwrap();
        assert!(Arc::ptr_eq(&out.node, &root));
        assert_eq!(out.remainder, "");
    }

    #[test]
    fn dot_and_dotdot_stay_at_root() {
        let root = root();
        let out = traverse("/./..", &root, TraversalFlags::NONE, None, MAX_LINK_HOPS).unwrap();
        assert!(Arc::ptr_eq(&out.node, &root));
    }

    #[test]
    fn missing_child_reports_remainder() {
        let root = root();
        let out = traverse("/a/b", &root, TraversalFlags::NONE, None, MAX_LINK_HOPS).unwrap();
        assert!(Arc::ptr_eq(&out.node, &root));
        assert_eq!(out.remainder, "a/b");
    }

    #[test]
    fn ignore_last_stops_one_short() {
        let root = root();
        {
            let mut branch = root.branch.lock();
            let child = Node::new_raw(
                "a".into(),
                Some(Arc::downgrade(&root)),
                NodeKind::Dir,
                None,
                Stat::default(),
                None,
            );
            branch.children.insert("a".into(), child);
        }
        let out = traverse("/a/b", &root, TraversalFlags::IGNORE_LAST, None, MAX_LINK_HOPS).unwrap();
        assert_eq!(&*out.node.name(), "a");
        assert_eq!(out.remainder, "b");
    }
}
