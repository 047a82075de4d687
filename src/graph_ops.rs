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

//! Path-level operations on the graph: create, load, remove, rename, link.
//! Everything here is expressed in terms of `traversal::traverse` plus the
//! two concrete [`Materializer`] implementations that decide what a miss
//! means for a load versus a create.

use crate::{
    driver::{BufferDriver, DriverGroup, Resource, ResourceDriver, BUFFER_FILE},
    error::{Error, VfsResult},
    locking::{lock_branch_pair, BranchPair},
    mount::MountTable,
    node::{kind_from_mode, Node, NodeKind, Stat},
    refcount::RefCounter,
    store::NodeStore,
    traversal::{traverse, Materializer, TraversalFlags},
};
use std::{cell::Cell, sync::Arc};

/// What to create at a path's terminal component.
#[derive(Debug, Clone, Copy)]
pub struct CreateInfo {
    pub kind: NodeKind,
    pub mode: u32,
    /// When set, a pre-existing terminal is an error rather than a no-op hit.
    pub exclusive: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RemoveFlags(u8);

impl RemoveFlags {
    pub const NONE: Self = Self(0);
    /// After removing the leaf, keep walking up while ancestors become
    /// empty and unreferenced, removing those too.
    pub const PRUNE_UPWARD: Self = Self(1 << 0);
    /// Required to remove a node that isn't under any mount.
    pub const PHYSICAL: Self = Self(1 << 1);

    pub fn contains(self, flag: Self) -> bool {
        self.0 & flag.0 == flag.0
    }
}

impl std::ops::BitOr for RemoveFlags {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

fn resource_for(
    driver: Arc<dyn ResourceDriver>,
    group: DriverGroup,
    mount_index: u32,
    kind: NodeKind,
    handle: crate::driver::DriverHandle,
) -> Resource {
    Resource {
        driver,
        group,
        index: MountTable::child_driver_index(mount_index, kind),
        handle,
    }
}

/// Materializes a directory entry on a traversal miss during a load: consults
/// the owning mount's driver, synthesizing intermediate directories without a
/// `stat` round trip (only the terminal component is actually probed).
pub struct LoadMaterializer;

impl Materializer for LoadMaterializer {
    fn materialize(
        &self,
        parent: &Arc<Node>,
        parent_branch: &mut parking_lot::MutexGuard<'_, crate::node::Branch>,
        component: &str,
        mount_relative: Option<&str>,
        is_last: bool,
    ) -> VfsResult<Option<Arc<Node>>> {
        let Some(rel) = mount_relative else {
            return Ok(None);
        };
        let Some(mount_node) = MountTable::nearest_mount(parent) else {
            return Ok(None);
        };
        let driver_info = {
            let props = mount_node.props.lock();
            props
                .resource
                .as_ref()
                .map(|r| (Arc::clone(&r.driver), r.group, r.index))
        };
        let Some((driver, group, mount_index)) = driver_info else {
            return Ok(None);
        };
        let mount_weak = MountTable::child_mount_weak(parent);
        if !is_last {
            // intermediate directories on a mount are assumed present; only the
            // terminal component pays for a stat round trip
            return Ok(Some(NodeStore::new_node(
                parent_branch,
                parent,
                component,
                NodeKind::Dir,
                mount_weak,
                Stat::default(),
                None,
            )));
        }
        match driver.stat(rel) {
            Ok(stat) => {
                let kind = kind_from_mode(stat.mode);
                let handle = driver.locate(rel)?;
                let resource = resource_for(driver, group, mount_index, kind, handle);
                Ok(Some(NodeStore::new_node(
                    parent_branch,
                    parent,
                    component,
                    kind,
                    mount_weak,
                    stat,
                    Some(resource),
                )))
            }
            Err(_) => Ok(None),
        }
    }
}

/// Materializes missing components during a create: intermediate components
/// become plain directories, the terminal component becomes whatever
/// [`CreateInfo`] asks for. Tracks whether it actually created the terminal,
/// so the caller can tell a fresh create apart from a pre-existing hit.
pub struct CreateMaterializer {
    info: CreateInfo,
    buffer: Arc<BufferDriver>,
    terminal_created: Cell<bool>,
}

impl CreateMaterializer {
    pub fn new(info: CreateInfo, buffer: Arc<BufferDriver>) -> Self {
        Self {
            info,
            buffer,
            terminal_created: Cell::new(false),
        }
    }

    pub fn terminal_created(&self) -> bool {
        self.terminal_created.get()
    }
}

impl Materializer for CreateMaterializer {
    fn materialize(
        &self,
        parent: &Arc<Node>,
        parent_branch: &mut parking_lot::MutexGuard<'_, crate::node::Branch>,
        component: &str,
        mount_relative: Option<&str>,
        is_last: bool,
    ) -> VfsResult<Option<Arc<Node>>> {
        let (kind, mode) = if is_last {
            (self.info.kind, self.info.mode)
        } else {
            (NodeKind::Dir, 0o755)
        };
        let mount_weak = MountTable::child_mount_weak(parent);
        let resource = match mount_relative {
            Some(rel) => {
                let mount_node = MountTable::nearest_mount(parent).ok_or(Error::DriverError(-1))?;
                let driver_info = {
                    let props = mount_node.props.lock();
                    props
                        .resource
                        .as_ref()
                        .map(|r| (Arc::clone(&r.driver), r.group, r.index))
                };
                let Some((driver, group, mount_index)) = driver_info else {
                    return Ok(None);
                };
                if driver.create(rel, mode, kind).is_err() {
                    return Ok(None);
                }
                let Ok(handle) = driver.locate(rel) else {
                    return Ok(None);
                };
                resource_for(driver, group, mount_index, kind, handle)
            }
            None => {
                let key = format!("n{}-{}", parent.id().0, component);
                self.buffer.create(&key, mode, kind)?;
                let handle = self.buffer.locate(&key)?;
                resource_for(
                    Arc::clone(&self.buffer) as Arc<dyn ResourceDriver>,
                    DriverGroup::Buffer,
                    BUFFER_FILE,
                    kind,
                    handle,
                )
            }
        };
        let stat = Stat {
            mode,
            ..Default::default()
        };
        let node = NodeStore::new_node(
            parent_branch,
            parent,
            component,
            kind,
            mount_weak,
            stat,
            Some(resource),
        );
        if is_last {
            self.terminal_created.set(true);
        }
        Ok(Some(node))
    }
}

/// POSIX-style relative path from `from` to `to`: drop their shared directory
/// prefix, prepend one `../` per remaining path separator in `from`'s suffix,
/// then append `to`'s suffix.
pub fn get_relative_path(from: &str, to: &str) -> String {
    let from_bytes = from.as_bytes();
    let to_bytes = to.as_bytes();
    let mut common = 0;
    let mut last_slash = 0;
    while common < from_bytes.len() && common < to_bytes.len() && from_bytes[common] == to_bytes[common] {
        if from_bytes[common] == b'/' {
            last_slash = common + 1;
        }
        common += 1;
    }
    let from_suffix = &from[last_slash..];
    let to_suffix = &to[last_slash..];
    let ups = from_suffix.matches('/').count();
    let mut result = "../".repeat(ups);
    result.push_str(to_suffix);
    result
}

pub struct GraphOps {
    root: Arc<Node>,
    buffer: Arc<BufferDriver>,
    max_link_hops: u32,
}

impl GraphOps {
    pub fn new(root: Arc<Node>, buffer: Arc<BufferDriver>, max_link_hops: u32) -> Self {
        Self {
            root,
            buffer,
            max_link_hops,
        }
    }

    pub fn load_path(&self, path: &str) -> VfsResult<Arc<Node>> {
        let materializer = LoadMaterializer;
        let outcome = traverse(
            path,
            &self.root,
            TraversalFlags::RESOLVE_LINKS,
            Some(&materializer),
            self.max_link_hops,
        )?;
        if !outcome.remainder.is_empty() {
            RefCounter::dec(&outcome.node);
            return Err(Error::NotFound);
        }
        Ok(outcome.node)
    }

    pub fn create_path(&self, path: &str, info: CreateInfo) -> VfsResult<Arc<Node>> {
        let materializer = CreateMaterializer::new(info, Arc::clone(&self.buffer));
        let outcome = traverse(
            path,
            &self.root,
            TraversalFlags::RESOLVE_LINKS,
            Some(&materializer),
            self.max_link_hops,
        )?;
        if !outcome.remainder.is_empty() {
            RefCounter::dec(&outcome.node);
            return Err(Error::NotFound);
        }
        if info.exclusive && !materializer.terminal_created() {
            RefCounter::dec(&outcome.node);
            return Err(Error::AlreadyExists);
        }
        Ok(outcome.node)
    }

    /// Detach `node` from its parent and release its backing resource.
    /// Bypasses the eviction cache: this is direct, caller-requested deletion,
    /// not the ref_count-reached-zero path.
    pub fn remove(&self, node: &Arc<Node>, flags: RemoveFlags) -> VfsResult<()> {
        if node.is_root() {
            return Err(Error::InUse);
        }
        if RefCounter::get(node) > 0 {
            return Err(Error::InUse);
        }
        if node.kind() == NodeKind::Dir && node.child_count() > 0 {
            return Err(Error::HasChildren);
        }
        let mount_info = MountTable::relative_path_from_mount(node);
        if mount_info.is_none() && !flags.contains(RemoveFlags::PHYSICAL) {
            return Err(Error::PhysicalDeleteRequired);
        }
        let parent = self.detach_and_release(node, flags.contains(RemoveFlags::PHYSICAL), mount_info)?;
        if flags.contains(RemoveFlags::PRUNE_UPWARD) {
            if let Some(parent) = parent {
                self.prune_upward(parent, flags.contains(RemoveFlags::PHYSICAL));
            }
        }
        Ok(())
    }

    fn detach_and_release(
        &self,
        node: &Arc<Node>,
        physical: bool,
        mount_info: Option<(Arc<Node>, String)>,
    ) -> VfsResult<Option<Arc<Node>>> {
        let parent = match node.parent() {
            Some(p) => p,
            None => return Ok(None),
        };
        let name = node.name();
        let detached = {
            let mut branch = parent.branch.lock();
            NodeStore::detach_child(&mut branch, &name).is_some()
        };
        if !detached {
            return Ok(Some(parent));
        }
        if node.kind() == NodeKind::Link {
            let target = node.props.lock().link_target.take();
            if let Some(target) = target {
                RefCounter::dec(&target);
            }
        }
        let resource = node.props.lock().resource.take();
        if let Some(resource) = &resource {
            resource.driver.close(&resource.handle)?;
        }
        if physical {
            if let Some((mount_node, rel)) = &mount_info {
                let driver = {
                    let props = mount_node.props.lock();
                    props.resource.as_ref().map(|r| Arc::clone(&r.driver))
                };
                if let Some(driver) = driver {
                    driver.remove(rel)?;
                }
            }
        }
        Ok(Some(parent))
    }

    /// After removing a leaf, walk up while ancestors are empty, unreferenced
    /// and not themselves a mount boundary, removing each in turn.
    fn prune_upward(&self, mut node: Arc<Node>, physical: bool) {
        loop {
            if node.is_root() || matches!(node.kind(), NodeKind::Mount | NodeKind::Device) {
                return;
            }
            if RefCounter::get(&node) > 0 || node.child_count() > 0 {
                return;
            }
            let mount_info = MountTable::relative_path_from_mount(&node);
            if mount_info.is_none() && !physical {
                return;
            }
            match self.detach_and_release(&node, physical, mount_info) {
                Ok(Some(parent)) => node = parent,
                _ => return,
            }
        }
    }

    /// Remove `node` and its entire subtree, deepest-first. Returns the
    /// number of subtrees that could not be removed (still in use).
    pub fn remove_recursive(&self, node: &Arc<Node>, physical: bool) -> usize {
        let children: Vec<Arc<Node>> = node.branch.lock().children.values().cloned().collect();
        let mut failures = 0;
        for child in children {
            failures += self.remove_recursive(&child, physical);
        }
        let flags = if physical {
            RemoveFlags::PHYSICAL
        } else {
            RemoveFlags::NONE
        };
        if self.remove(node, flags).is_err() {
            failures += 1;
        }
        failures
    }

    pub fn rename(&self, from_path: &str, to_path: &str) -> VfsResult<()> {
        let from_outcome = traverse(
            from_path,
            &self.root,
            TraversalFlags::NONE,
            Some(&LoadMaterializer),
            self.max_link_hops,
        )?;
        if !from_outcome.remainder.is_empty() {
            RefCounter::dec(&from_outcome.node);
            return Err(Error::NotFound);
        }
        let source = from_outcome.node;
        if source.is_root() {
            RefCounter::dec(&source);
            return Err(Error::InvalidArgument);
        }

        let to_outcome = traverse(
            to_path,
            &self.root,
            TraversalFlags::IGNORE_LAST,
            Some(&LoadMaterializer),
            self.max_link_hops,
        );
        let to_outcome = match to_outcome {
            Ok(o) => o,
            Err(e) => {
                RefCounter::dec(&source);
                return Err(e);
            }
        };
        let dest_parent = to_outcome.node;
        let new_name = to_outcome.remainder;
        if new_name.is_empty() || new_name.contains('/') {
            RefCounter::dec(&source);
            RefCounter::dec(&dest_parent);
            return Err(Error::InvalidArgument);
        }

        let result = self.rename_locked(&source, &dest_parent, &new_name);
        RefCounter::dec(&source);
        RefCounter::dec(&dest_parent);
        result
    }

    fn rename_locked(&self, source: &Arc<Node>, dest_parent: &Arc<Node>, new_name: &str) -> VfsResult<()> {
        let source_parent = source.parent().ok_or(Error::InvalidArgument)?;

        let src_mount = MountTable::nearest_mount(&source_parent);
        let dst_mount = MountTable::nearest_mount(dest_parent);
        let same_mount = match (&src_mount, &dst_mount) {
            (Some(a), Some(b)) => {
                if !Arc::ptr_eq(a, b) {
                    return Err(Error::CrossMountUnsupported);
                }
                true
            }
            (None, None) => false,
            _ => return Err(Error::CrossMountUnsupported),
        };

        let from_rel = if same_mount {
            MountTable::relative_path_from_mount(source)
        } else {
            None
        };
        let dest_rel = if same_mount {
            MountTable::relative_path_from_mount(dest_parent)
        } else {
            None
        };

        let old_name = source.name();
        match lock_branch_pair(&source_parent, dest_parent) {
            BranchPair::Same(mut branch) => {
                if branch.children.contains_key(new_name) {
                    return Err(Error::AlreadyExists);
                }
                let node = NodeStore::detach_child(&mut branch, &old_name).ok_or(Error::NotFound)?;
                NodeStore::rename_self(&node, new_name);
                NodeStore::attach_child(&mut branch, new_name, node);
            }
            BranchPair::Distinct { mut first, mut second } => {
                if second.children.contains_key(new_name) {
                    return Err(Error::AlreadyExists);
                }
                let node = NodeStore::detach_child(&mut first, &old_name).ok_or(Error::NotFound)?;
                NodeStore::rename_self(&node, new_name);
                NodeStore::attach_child(&mut second, new_name, node);
            }
        }

        if let (Some((mount_node, from_rel)), Some((_, dest_rel))) = (from_rel, dest_rel) {
            let to_rel = if dest_rel.is_empty() {
                new_name.to_string()
            } else {
                format!("{dest_rel}/{new_name}")
            };
            let driver = {
                let props = mount_node.props.lock();
                props.resource.as_ref().map(|r| Arc::clone(&r.driver))
            };
            if let Some(driver) = driver {
                driver.rename(&from_rel, &to_rel)?;
            }
        }
        Ok(())
    }

    /// Create a symbolic link at `link_path` whose body is the relative path
    /// from `link_path` to `source_path`. The resolved source's reference
    /// stays incremented forever, as the link edge (released on removal).
    pub fn link(&self, source_path: &str, link_path: &str, mode: u32) -> VfsResult<Arc<Node>> {
        let source_outcome = traverse(
            source_path,
            &self.root,
            TraversalFlags::RESOLVE_LINKS,
            Some(&LoadMaterializer),
            self.max_link_hops,
        )?;
        if !source_outcome.remainder.is_empty() {
            RefCounter::dec(&source_outcome.node);
            return Err(Error::NotFound);
        }
        let source = source_outcome.node;

        let dest_outcome = traverse(
            link_path,
            &self.root,
            TraversalFlags::IGNORE_LAST,
            Some(&LoadMaterializer),
            self.max_link_hops,
        );
        let dest_outcome = match dest_outcome {
            Ok(o) => o,
            Err(e) => {
                RefCounter::dec(&source);
                return Err(e);
            }
        };
        let dest_parent = dest_outcome.node;
        let link_name = dest_outcome.remainder;
        if link_name.is_empty() || link_name.contains('/') {
            RefCounter::dec(&source);
            RefCounter::dec(&dest_parent);
            return Err(Error::InvalidArgument);
        }
        if dest_parent.branch.lock().children.contains_key(link_name.as_str()) {
            RefCounter::dec(&source);
            RefCounter::dec(&dest_parent);
            return Err(Error::AlreadyExists);
        }

        let body = get_relative_path(link_path, source_path);
        let result = self.create_link_node(&dest_parent, &link_name, mode, body, source);
        RefCounter::dec(&dest_parent);
        result
    }

    fn create_link_node(
        &self,
        dest_parent: &Arc<Node>,
        link_name: &str,
        mode: u32,
        body: String,
        source: Arc<Node>,
    ) -> VfsResult<Arc<Node>> {
        let mount_weak = MountTable::child_mount_weak(dest_parent);
        let resource = match MountTable::relative_path_from_mount(dest_parent) {
            Some((mount_node, dest_rel)) => {
                let rel = if dest_rel.is_empty() {
                    link_name.to_string()
                } else {
                    format!("{dest_rel}/{link_name}")
                };
                let driver_info = {
                    let props = mount_node.props.lock();
                    props
                        .resource
                        .as_ref()
                        .map(|r| (Arc::clone(&r.driver), r.group, r.index))
                };
                let (driver, group, mount_index) =
                    driver_info.ok_or_else(|| {
                        RefCounter::dec(&source);
                        Error::DriverError(-1)
                    })?;
                if let Err(e) = driver.create(&rel, mode, NodeKind::Link) {
                    RefCounter::dec(&source);
                    return Err(e);
                }
                let handle = match driver.locate(&rel) {
                    Ok(h) => h,
                    Err(e) => {
                        RefCounter::dec(&source);
                        return Err(e);
                    }
                };
                resource_for(driver, group, mount_index, NodeKind::Link, handle)
            }
            None => {
                let key = format!("n{}-{}", dest_parent.id().0, link_name);
                if let Err(e) = self.buffer.create(&key, mode, NodeKind::Link) {
                    RefCounter::dec(&source);
                    return Err(e);
                }
                let handle = self.buffer.locate(&key)?;
                resource_for(
                    Arc::clone(&self.buffer) as Arc<dyn ResourceDriver>,
                    DriverGroup::Buffer,
                    BUFFER_FILE,
                    NodeKind::Link,
                    handle,
                )
            }
        };
        if let Err(e) = resource.driver.write(&resource.handle, 0, body.as_bytes()) {
            RefCounter::dec(&source);
            return Err(e);
        }
        let stat = Stat {
            mode,
            size: body.len() as u64,
            ..Default::default()
        };
        let link_node = {
            let mut branch = dest_parent.branch.lock();
            NodeStore::new_node(
                &mut branch,
                dest_parent,
                link_name,
                NodeKind::Link,
                mount_weak,
                stat,
                Some(resource),
            )
        };
        link_node.props.lock().link_target = Some(source);
        RefCounter::inc(&link_node);
        Ok(link_node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_root() -> Arc<Node> {
        let r = Node::new_raw("".into(), None, NodeKind::Root, None, Stat::default(), None);
        RefCounter::pin(&r);
        r
    }

    fn graph() -> GraphOps {
        GraphOps::new(new_root(), Arc::new(BufferDriver::new()), 40)
    }

    #[test]
    fn create_then_load_round_trips() {
        let g = graph();
        let info = CreateInfo {
            kind: NodeKind::File,
            mode: 0o644,
            exclusive: false,
        };
        let created = g.create_path("/a/b.txt", info).unwrap();
        RefCounter::dec(&created);
        let loaded = g.load_path("/a/b.txt").unwrap();
        assert_eq!(&*loaded.name(), "b.txt");
        RefCounter::dec(&loaded);
    }

    #[test]
    fn exclusive_create_on_existing_path_fails() {
        let g = graph();
        let info = CreateInfo {
            kind: NodeKind::File,
            mode: 0o644,
            exclusive: true,
        };
        let first = g.create_path("/a.txt", info).unwrap();
        RefCounter::dec(&first);
        assert_eq!(g.create_path("/a.txt", info).unwrap_err(), Error::AlreadyExists);
    }

    #[test]
    fn non_exclusive_create_is_idempotent() {
        let g = graph();
        let info = CreateInfo {
            kind: NodeKind::File,
            mode: 0o644,
            exclusive: false,
        };
        let first = g.create_path("/a.txt", info).unwrap();
        let second = g.create_path("/a.txt", info).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        RefCounter::dec(&first);
        RefCounter::dec(&second);
    }

    #[test]
    fn remove_requires_zero_refcount() {
        let g = graph();
        let info = CreateInfo {
            kind: NodeKind::File,
            mode: 0o644,
            exclusive: false,
        };
        let node = g.create_path("/a.txt", info).unwrap();
        assert_eq!(
            g.remove(&node, RemoveFlags::PHYSICAL).unwrap_err(),
            Error::InUse
        );
        RefCounter::dec(&node);
        g.remove(&node, RemoveFlags::PHYSICAL).unwrap();
        assert_eq!(g.load_path("/a.txt").unwrap_err(), Error::NotFound);
    }

    #[test]
    fn rename_moves_node_to_new_parent() {
        let g = graph();
        let info = CreateInfo {
            kind: NodeKind::File,
            mode: 0o644,
            exclusive: false,
        };
        let node = g.create_path("/a/b.txt", info).unwrap();
        RefCounter::dec(&node);
        g.rename("/a/b.txt", "/a/c.txt").unwrap();
        assert_eq!(g.load_path("/a/b.txt").unwrap_err(), Error::NotFound);
        let moved = g.load_path("/a/c.txt").unwrap();
        assert_eq!(&*moved.name(), "c.txt");
        RefCounter::dec(&moved);
    }

    #[test]
    fn link_resolves_to_source_and_body_is_relative() {
        let g = graph();
        let info = CreateInfo {
            kind: NodeKind::File,
            mode: 0o644,
            exclusive: false,
        };
        let target = g.create_path("/mnt/t.txt", info).unwrap();
        RefCounter::dec(&target);
        let link = g.link("/mnt/t.txt", "/mnt/l", 0o777).unwrap();
        assert_eq!(&*link.name(), "l");
        RefCounter::dec(&link);
        let resolved = g.load_path("/mnt/l").unwrap();
        let expected = g.load_path("/mnt/t.txt").unwrap();
        assert!(Arc::ptr_eq(&resolved, &expected));
        RefCounter::dec(&resolved);
        RefCounter::dec(&expected);
    }

    #[test]
    fn get_relative_path_drops_shared_prefix() {
        assert_eq!(get_relative_path("/mnt/l", "/mnt/t.txt"), "t.txt");
        assert_eq!(get_relative_path("/a/b", "/c/d"), "../c/d");
    }

    #[test]
    fn remove_recursive_clears_subtree() {
        let g = graph();
        let info = CreateInfo {
            kind: NodeKind::File,
            mode: 0o644,
            exclusive: false,
        };
        let a = g.create_path("/a/b.txt", info).unwrap();
        RefCounter::dec(&a);
        let dir_info = CreateInfo {
            kind: NodeKind::Dir,
            mode: 0o755,
            exclusive: false,
        };
        let dir = g.create_path("/a", dir_info).unwrap();
        RefCounter::dec(&dir);
        let failures = g.remove_recursive(&dir, true);
        assert_eq!(failures, 0);
        assert_eq!(g.load_path("/a").unwrap_err(), Error::NotFound);
    }
}
