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

//! Top-level assembly: a root node, the eviction cache, the shared in-memory
//! driver for subtrees outside any mount, and the path operations wired on
//! top of them.

use crate::{
    config::Config,
    driver::{BufferDriver, DriverGroup, DriverHandle, ResourceDriver},
    error::VfsResult,
    eviction::EvictionCache,
    graph_ops::{CreateInfo, GraphOps, RemoveFlags},
    mount::MountTable,
    node::{Node, NodeKind, Stat},
    refcount::RefCounter,
};
use log::debug;
use std::sync::Arc;

pub struct Vfs {
    root: Arc<Node>,
    eviction: EvictionCache,
    ops: GraphOps,
    config: Config,
}

impl Vfs {
    pub fn new(config: Config) -> Self {
        let root = Node::new_raw("".into(), None, NodeKind::Root, None, Stat::default(), None);
        RefCounter::pin(&root);
        let buffer = Arc::new(BufferDriver::new());
        let ops = GraphOps::new(Arc::clone(&root), buffer, config.max_link_hops);
        Self {
            root,
            eviction: EvictionCache::new(config.eviction_cache_size),
            ops,
            config,
        }
    }

    pub fn root(&self) -> Arc<Node> {
        Arc::clone(&self.root)
    }

    pub fn config(&self) -> Config {
        self.config
    }

    pub fn mount(
        &self,
        node: &Arc<Node>,
        driver: Arc<dyn ResourceDriver>,
        group: DriverGroup,
        index: u32,
        handle: DriverHandle,
    ) -> VfsResult<()> {
        MountTable::mount(node, driver, group, index, handle)
    }

    pub fn unmount(&self, node: &Arc<Node>) -> VfsResult<()> {
        MountTable::unmount(node)
    }

    pub fn load_path(&self, path: &str) -> VfsResult<Arc<Node>> {
        let node = self.ops.load_path(path)?;
        self.reclaim_if_cached(&node);
        Ok(node)
    }

    pub fn create_path(&self, path: &str, info: CreateInfo) -> VfsResult<Arc<Node>> {
        let node = self.ops.create_path(path, info)?;
        self.reclaim_if_cached(&node);
        Ok(node)
    }

    /// A node handed back with ref_count freshly at 1 may have been sitting
    /// in the eviction ring at ref_count 0; pull it out so it isn't later
    /// evicted out from under its new reference holder.
    fn reclaim_if_cached(&self, node: &Arc<Node>) {
        if node.ref_count() == 1 {
            self.eviction.withdraw(node);
        }
    }

    pub fn rename(&self, from_path: &str, to_path: &str) -> VfsResult<()> {
        self.ops.rename(from_path, to_path)
    }

    pub fn link(&self, source_path: &str, link_path: &str, mode: u32) -> VfsResult<Arc<Node>> {
        let node = self.ops.link(source_path, link_path, mode)?;
        self.reclaim_if_cached(&node);
        Ok(node)
    }

    /// Direct, caller-requested removal (bypasses the eviction cache).
    pub fn remove(&self, node: &Arc<Node>, flags: RemoveFlags) -> VfsResult<()> {
        self.ops.remove(node, flags)
    }

    pub fn remove_recursive(&self, node: &Arc<Node>, physical: bool) -> usize {
        self.ops.remove_recursive(node, physical)
    }

    /// Release a reference obtained from one of the path operations above. If
    /// it's the last reference and the node isn't pinned (root/mount), it
    /// enters the eviction cache; a node the cache then evicts is physically
    /// deleted.
    pub fn release(&self, node: Arc<Node>) -> VfsResult<()> {
        let remaining = RefCounter::dec(&node);
        if remaining > 0 || node.is_root() || matches!(node.kind(), NodeKind::Mount | NodeKind::Device) {
            return Ok(());
        }
        if let Some(evicted) = self.eviction.offer(node) {
            debug!("eviction cache evicted node {:?}", evicted.id());
            self.ops.remove(&evicted, RemoveFlags::PHYSICAL | RemoveFlags::PRUNE_UPWARD)?;
        }
        Ok(())
    }
}
