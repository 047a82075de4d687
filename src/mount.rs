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

//! Associates a node with a driver [`Resource`] and carries the "driver
//! grouping" rule — directory children inherit the mount's `dri_index`,
//! file-like children inherit `dri_index + 1`.

use crate::{
    driver::{DriverGroup, DriverHandle, Resource},
    error::{Error, VfsResult},
    node::{Node, NodeKind},
    refcount::RefCounter,
};
use log::info;
use std::sync::Arc;

pub struct MountTable;

impl MountTable {
    /// Closest ancestor (inclusive) of kind `Mount`/`Device`, using the
    /// cached `mount` pointer — an optimization that could always be
    /// recomputed by walking up instead.
    pub fn nearest_mount(node: &Arc<Node>) -> Option<Arc<Node>> {
        if matches!(node.kind(), NodeKind::Mount | NodeKind::Device) {
            Some(Arc::clone(node))
        } else {
            node.mount()
        }
    }

    /// Child driver index inheritance rule: dirs inherit the mount's index,
    /// file-like children get `index + 1`.
    pub fn child_driver_index(mount_index: u32, child_kind: NodeKind) -> u32 {
        if child_kind.is_dir_like() {
            mount_index
        } else {
            mount_index + 1
        }
    }

    /// The `mount` pointer a freshly materialized child of `parent` should cache.
    pub fn child_mount_weak(parent: &Arc<Node>) -> Option<std::sync::Weak<Node>> {
        if matches!(parent.kind(), NodeKind::Mount | NodeKind::Device) {
            Some(Arc::downgrade(parent))
        } else {
            parent.props.lock().mount.clone()
        }
    }

    /// Walk up from `node` to its nearest mount, accumulating the
    /// mount-relative path. `None` if no ancestor is a mount (in-memory-only
    /// subtree). Empty string if `node` itself is the mount.
    pub fn relative_path_from_mount(node: &Arc<Node>) -> Option<(Arc<Node>, String)> {
        let mount = Self::nearest_mount(node)?;
        let mut parts = Vec::new();
        let mut cur = Arc::clone(node);
        while !Arc::ptr_eq(&cur, &mount) {
            parts.push(cur.name());
            cur = cur.parent()?;
        }
        parts.reverse();
        let rel = parts
            .iter()
            .map(|b| b.as_ref())
            .collect::<Vec<_>>()
            .join("/");
        Some((mount, rel))
    }

    /// Mount `driver` onto `node`. Preconditions: `node` must be a `Dir`
    /// with no children. Pins `node`'s ref_count at +1 so it can never be
    /// evicted while mounted (mirrors the root's eternal pin).
    pub fn mount(
        node: &Arc<Node>,
        driver: Arc<dyn crate::driver::ResourceDriver>,
        group: DriverGroup,
        index: u32,
        handle: DriverHandle,
    ) -> VfsResult<()> {
        {
            let branch = node.branch.lock();
            if !branch.children.is_empty() {
                return Err(Error::HasChildren);
            }
        }
        let mut props = node.props.lock();
        if props.kind != NodeKind::Dir {
            return Err(Error::NotADirectory);
        }
        props.kind = if matches!(group, DriverGroup::Device) {
            NodeKind::Device
        } else {
            NodeKind::Mount
        };
        props.resource = Some(Resource {
            driver,
            group,
            index,
            handle,
        });
        drop(props);
        RefCounter::pin(node);
        info!("mounted driver group {:?} at index {index} on node {:?}", group, node.id());
        Ok(())
    }

    /// Unmount `node`: release the pin, close the driver resource, drop all
    /// in-memory descendants that aren't still referenced, and reset to a
    /// plain directory.
    pub fn unmount(node: &Arc<Node>) -> VfsResult<()> {
        let resource = {
            let mut props = node.props.lock();
            if !matches!(props.kind, NodeKind::Mount | NodeKind::Device) {
                return Err(Error::NotADirectory);
            }
            props.kind = NodeKind::Dir;
            props.mount = None;
            props.resource.take()
        };
        if let Some(resource) = &resource {
            resource.driver.close(&resource.handle)?;
        }
        Self::prune_in_memory(node);
        RefCounter::unpin(node);
        info!("unmounted node {:?}", node.id());
        Ok(())
    }

    /// Drop the in-memory subtree under `node` without consulting the
    /// driver's remove capability (the backing objects aren't touched, only
    /// the cached nodes are): depth-first, closing each removed descendant's
    /// own resource and releasing a `Link` descendant's target reference,
    /// the same cleanup `GraphOps::detach_and_release` does for a single
    /// node. A descendant still referenced (`ref_count > 0`), or one that
    /// still has an un-prunable descendant of its own, is left attached to
    /// its parent so invariant 2 (`n.parent.children` contains `n`) holds
    /// for every node that didn't get removed.
    fn prune_in_memory(node: &Arc<Node>) {
        let children: Vec<Arc<Node>> = node.branch.lock().children.values().cloned().collect();
        for child in &children {
            Self::prune_in_memory_subtree(node, child);
        }
    }

    /// Returns `true` if `child` (and everything under it) was fully detached.
    fn prune_in_memory_subtree(parent: &Arc<Node>, child: &Arc<Node>) -> bool {
        let grandchildren: Vec<Arc<Node>> = child.branch.lock().children.values().cloned().collect();
        let mut all_clear = true;
        for gc in &grandchildren {
            if !Self::prune_in_memory_subtree(child, gc) {
                all_clear = false;
            }
        }
        if !all_clear || RefCounter::get(child) > 0 {
            return false;
        }
        let name = child.name();
        {
            let mut branch = parent.branch.lock();
            if branch.children.remove(&name).is_none() {
                return false;
            }
        }
        if child.kind() == NodeKind::Link {
            if let Some(target) = child.props.lock().link_target.take() {
                RefCounter::dec(&target);
            }
        }
        if let Some(resource) = child.props.lock().resource.take() {
            let _ = resource.driver.close(&resource.handle);
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{driver::BufferDriver, node::Stat};

    #[test]
    fn mount_requires_empty_dir() {
        let dir = Node::new_raw("mnt".into(), None, NodeKind::Dir, None, Stat::default(), None);
        let driver: Arc<dyn crate::driver::ResourceDriver> = Arc::new(BufferDriver::new());
        MountTable::mount(
            &dir,
            driver,
            DriverGroup::Buffer,
            0,
            DriverHandle(String::new()),
        )
        .unwrap();
        assert_eq!(dir.kind(), NodeKind::Mount);
        assert_eq!(dir.ref_count(), 1);
    }

    #[test]
    fn mount_rejects_non_directory() {
        let node = Node::new_raw("f".into(), None, NodeKind::File, None, Stat::default(), None);
        let driver: Arc<dyn crate::driver::ResourceDriver> = Arc::new(BufferDriver::new());
        assert_eq!(
            MountTable::mount(&node, driver, DriverGroup::Buffer, 0, DriverHandle(String::new()))
                .unwrap_err(),
            Error::NotADirectory
        );
    }

    #[test]
    fn unmount_releases_pin_and_resets_kind() {
        let dir = Node::new_raw("mnt".into(), None, NodeKind::Dir, None, Stat::default(), None);
        let driver: Arc<dyn crate::driver::ResourceDriver> = Arc::new(BufferDriver::new());
        MountTable::mount(
            &dir,
            driver,
            DriverGroup::Buffer,
            0,
            DriverHandle(String::new()),
        )
        .unwrap();
        MountTable::unmount(&dir).unwrap();
        assert_eq!(dir.kind(), NodeKind::Dir);
        assert_eq!(dir.ref_count(), 0);
    }
}
