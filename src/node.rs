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

//! The node: the unit of the graph.
//!
//! Tree ownership runs through `children` (an [`Arc`] per child); `parent` is
//! a non-owning [`Weak`] observation. This is the arena-free shape DESIGN.md
//! calls out as the natural one when raw back-references aren't available:
//! a child keeps its ancestry alive, and a parent never keeps a child alive
//! only by knowing about it.
//!
//! Two lock domains:
//! - `branch`: children, parent, name (tree shape)
//! - `props`: kind, mount, stat, resource, link_target (attributes)

use crate::driver::Resource;
use parking_lot::Mutex;
use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicI64, AtomicU64, Ordering},
        Arc, Weak,
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum NodeKind {
    Null = 0,
    File = 1,
    Dir = 2,
    Mount = 3,
    Root = 4,
    Link = 5,
    Buffer = 6,
    Fifo = 7,
    Device = 8,
}

/// POSIX-style type bits within `Stat::mode`, used to infer a node's kind
/// from a driver `stat()` result, used by `load_path`.
pub const MODE_TYPE_MASK: u32 = 0o170000;
pub const MODE_DIR: u32 = 0o040000;
pub const MODE_FILE: u32 = 0o100000;
pub const MODE_LINK: u32 = 0o120000;

pub fn kind_from_mode(mode: u32) -> NodeKind {
    match mode & MODE_TYPE_MASK {
        MODE_DIR => NodeKind::Dir,
        MODE_LINK => NodeKind::Link,
        _ => NodeKind::File,
    }
}

impl NodeKind {
    /// Kinds that permit I/O and therefore require a non-null `resource` (invariant 7)
    pub fn requires_resource(self) -> bool {
        matches!(
            self,
            Self::File | Self::Link | Self::Buffer | Self::Fifo | Self::Device | Self::Mount
        )
    }
    pub fn is_dir_like(self) -> bool {
        matches!(self, Self::Dir | Self::Mount | Self::Root)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Stat {
    pub size: u64,
    pub mode: u32,
    pub atime: u64,
    pub mtime: u64,
    pub ctime: u64,
    pub uid: u32,
    pub gid: u32,
    pub nlink: u32,
}

/// Monotonic allocation id, used for debug output and eviction-slot bookkeeping.
/// Identity between nodes is still decided by `Arc::ptr_eq`, never by this id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub u64);

static NEXT_NODE_ID: AtomicU64 = AtomicU64::new(1);

fn alloc_node_id() -> NodeId {
    NodeId(NEXT_NODE_ID.fetch_add(1, Ordering::Relaxed))
}

/// `branch_lock` domain: tree shape.
pub struct Branch {
    pub name: Box<str>,
    pub parent: Option<Weak<Node>>,
    pub children: HashMap<Box<str>, Arc<Node>>,
}

/// `property_lock` domain: node attributes.
pub(crate) struct Props {
    pub kind: NodeKind,
    pub mount: Option<Weak<Node>>,
    pub stat: Stat,
    pub resource: Option<Resource>,
    pub link_target: Option<Arc<Node>>,
}

pub struct Node {
    pub(crate) id: NodeId,
    pub(crate) branch: Mutex<Branch>,
    pub(crate) props: Mutex<Props>,
    pub(crate) ref_count: AtomicI64,
}

impl Node {
    pub(crate) fn new_raw(
        name: Box<str>,
        parent: Option<Weak<Node>>,
        kind: NodeKind,
        mount: Option<Weak<Node>>,
        stat: Stat,
        resource: Option<Resource>,
    ) -> Arc<Node> {
        Arc::new(Node {
            id: alloc_node_id(),
            branch: Mutex::new(Branch {
                name,
                parent,
                children: HashMap::new(),
            }),
            props: Mutex::new(Props {
                kind,
                mount,
                stat,
                resource,
                link_target: None,
            }),
            ref_count: AtomicI64::new(0),
        })
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn name(&self) -> Box<str> {
        self.branch.lock().name.clone()
    }

    pub fn kind(&self) -> NodeKind {
        self.props.lock().kind
    }

    pub fn stat(&self) -> Stat {
        self.props.lock().stat
    }

    pub fn set_stat(&self, stat: Stat) {
        self.props.lock().stat = stat;
    }

    pub fn parent(&self) -> Option<Arc<Node>> {
        self.branch.lock().parent.as_ref().and_then(Weak::upgrade)
    }

    pub fn mount(&self) -> Option<Arc<Node>> {
        self.props.lock().mount.as_ref().and_then(Weak::upgrade)
    }

    pub fn is_root(&self) -> bool {
        self.branch.lock().parent.is_none()
    }

    /// Snapshot of child names, for listing a directory's entries.
    pub fn list_children(&self) -> Vec<Box<str>> {
        self.branch.lock().children.keys().cloned().collect()
    }

    pub fn child_count(&self) -> usize {
        self.branch.lock().children.len()
    }

    pub fn ref_count(&self) -> i64 {
        self.ref_count.load(Ordering::Acquire)
    }
}

impl std::fmt::Debug for Node {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let branch = self.branch.lock();
        f.debug_struct("Node")
            .field("id", &self.id)
            .field("name", &branch.name)
            .field("ref_count", &self.ref_count())
            .finish()
    }
}
