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

//! The capability set the core *consumes*. The driver layer itself
//! (on-disk filesystem, char/block device, FIFO) is out of scope; this is
//! only the contract plus the one concrete [`BufferDriver`] the core needs
//! for in-memory-only subtrees and for exercising the contract in tests.

use crate::node::{NodeKind, Stat};
use parking_lot::Mutex;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DriverGroup {
    FileSystem,
    Device,
    Buffer,
    Fifo,
}

/// The in-memory buffer driver's well-known index.
pub const BUFFER_FILE: u32 = 0;

/// Opaque driver handle obtained from [`ResourceDriver::locate`]. Concretized
/// here to the mount-relative path namespace, which is enough for every
/// driver the core actually ships ([`BufferDriver`]) while keeping the
/// contract's "opaque handle" semantics for callers.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DriverHandle(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeekFrom {
    Start(u64),
    Current(i64),
    End(i64),
}

pub type DriverResult<T> = Result<T, crate::error::Error>;

/// A node's driver binding: which driver, which group/index ("driver
/// grouping" — see [`crate::mount::MountTable::child_driver_index`]), and
/// the opaque handle used for I/O.
pub struct Resource {
    pub driver: std::sync::Arc<dyn ResourceDriver>,
    pub group: DriverGroup,
    pub index: u32,
    pub handle: DriverHandle,
}

impl Clone for Resource {
    fn clone(&self) -> Self {
        Self {
            driver: std::sync::Arc::clone(&self.driver),
            group: self.group,
            index: self.index,
            handle: self.handle.clone(),
        }
    }
}

impl std::fmt::Debug for Resource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Resource")
            .field("group", &self.group)
            .field("index", &self.index)
            .field("handle", &self.handle)
            .finish()
    }
}

/// The backing-store capability set consumed by the graph core.
/// Directory children inherit the mount's driver index; file-like children
/// inherit `index + 1` ("driver grouping") — that bookkeeping lives in
/// [`crate::mount::MountTable`], not here.
pub trait ResourceDriver: Send + Sync {
    /// Metadata for the object at `path_from_mount` (empty path = the mount itself).
    fn stat(&self, path_from_mount: &str) -> DriverResult<Stat>;
    /// Obtain the opaque handle to bind to a newly materialized node.
    fn locate(&self, path_from_mount: &str) -> DriverResult<DriverHandle>;
    fn create(&self, path_from_mount: &str, mode: u32, kind: NodeKind) -> DriverResult<()>;
    fn remove(&self, path_from_mount: &str) -> DriverResult<()>;
    fn rename(&self, from_mount_relative: &str, to_mount_relative: &str) -> DriverResult<()>;
    fn open(&self, handle: &DriverHandle) -> DriverResult<()>;
    fn close(&self, handle: &DriverHandle) -> DriverResult<()>;
    fn read(&self, handle: &DriverHandle, offset: u64, buf: &mut [u8]) -> DriverResult<usize>;
    fn write(&self, handle: &DriverHandle, offset: u64, buf: &[u8]) -> DriverResult<usize>;
    fn seek(&self, handle: &DriverHandle, pos: SeekFrom, cur: u64) -> DriverResult<u64>;
}

/// The in-memory backing store for nodes outside any mount, keyed by
/// mount-relative path.
#[derive(Default)]
pub struct BufferDriver {
    objects: Mutex<HashMap<String, BufferObject>>,
}

struct BufferObject {
    kind: NodeKind,
    mode: u32,
    data: Vec<u8>,
}

impl BufferDriver {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ResourceDriver for BufferDriver {
    fn stat(&self, path_from_mount: &str) -> DriverResult<Stat> {
        let objects = self.objects.lock();
        let obj = objects
            .get(path_from_mount)
            .ok_or(crate::error::Error::NotFound)?;
        let type_bits = match obj.kind {
            NodeKind::Dir | NodeKind::Mount | NodeKind::Root => crate::node::MODE_DIR,
            NodeKind::Link => crate::node::MODE_LINK,
            _ => crate::node::MODE_FILE,
        };
        Ok(Stat {
            size: obj.data.len() as u64,
            mode: (obj.mode & !crate::node::MODE_TYPE_MASK) | type_bits,
            ..Default::default()
        })
    }

    fn locate(&self, path_from_mount: &str) -> DriverResult<DriverHandle> {
        if self.objects.lock().contains_key(path_from_mount) {
            Ok(DriverHandle(path_from_mount.to_string()))
        } else {
            Err(crate::error::Error::NotFound)
        }
    }

    fn create(&self, path_from_mount: &str, mode: u32, kind: NodeKind) -> DriverResult<()> {
        let mut objects = self.objects.lock();
        if objects.contains_key(path_from_mount) {
            return Err(crate::error::Error::AlreadyExists);
        }
        objects.insert(
            path_from_mount.to_string(),
            BufferObject {
                kind,
                mode,
                data: Vec::new(),
            },
        );
        Ok(())
    }

    fn remove(&self, path_from_mount: &str) -> DriverResult<()> {
        self.objects
            .lock()
            .remove(path_from_mount)
            .map(|_| ())
            .ok_or(crate::error::Error::NotFound)
    }

    fn rename(&self, from_mount_relative: &str, to_mount_relative: &str) -> DriverResult<()> {
        let mut objects = self.objects.lock();
        let obj = objects
            .remove(from_mount_relative)
            .ok_or(crate::error::Error::NotFound)?;
        objects.insert(to_mount_relative.to_string(), obj);
        Ok(())
    }

    fn open(&self, handle: &DriverHandle) -> DriverResult<()> {
        if self.objects.lock().contains_key(&handle.0) {
            Ok(())
        } else {
            Err(crate::error::Error::NotFound)
        }
    }

    fn close(&self, _handle: &DriverHandle) -> DriverResult<()> {
        Ok(())
    }

    fn read(&self, handle: &DriverHandle, offset: u64, buf: &mut [u8]) -> DriverResult<usize> {
        let objects = self.objects.lock();
        let obj = objects.get(&handle.0).ok_or(crate::error::Error::NotFound)?;
        let offset = offset as usize;
        if offset >= obj.data.len() {
            return Ok(0);
        }
        let n = buf.len().min(obj.data.len() - offset);
        buf[..n].copy_from_slice(&obj.data[offset..offset + n]);
        Ok(n)
    }

    fn write(&self, handle: &DriverHandle, offset: u64, buf: &[u8]) -> DriverResult<usize> {
        let mut objects = self.objects.lock();
        let obj = objects
            .get_mut(&handle.0)
            .ok_or(crate::error::Error::NotFound)?;
        let offset = offset as usize;
        if obj.data.len() < offset + buf.len() {
            obj.data.resize(offset + buf.len(), 0);
        }
        obj.data[offset..offset + buf.len()].copy_from_slice(buf);
        Ok(buf.len())
    }

    fn seek(&self, handle: &DriverHandle, pos: SeekFrom, cur: u64) -> DriverResult<u64> {
        let objects = self.objects.lock();
        let obj = objects.get(&handle.0).ok_or(crate::error::Error::NotFound)?;
        let len = obj.data.len() as u64;
        let new = match pos {
            SeekFrom::Start(n) => n,
            SeekFrom::Current(n) => (cur as i64 + n).max(0) as u64,
            SeekFrom::End(n) => (len as i64 + n).max(0) as u64,
        };
        Ok(new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buffer_driver_create_then_stat() {
        let d = BufferDriver::new();
        d.create("a.txt", 0o644, NodeKind::File).unwrap();
        let st = d.stat("a.txt").unwrap();
        assert_eq!(st.size, 0);
        assert_eq!(st.mode, crate::node::MODE_FILE | 0o644);
    }

    #[test]
    fn buffer_driver_write_then_read_roundtrip() {
        let d = BufferDriver::new();
        d.create("a.txt", 0o644, NodeKind::File).unwrap();
        let h = d.locate("a.txt").unwrap();
        d.write(&h, 0, b"hello").unwrap();
        let mut buf = [0u8; 5];
        let n = d.read(&h, 0, &mut buf).unwrap();
        assert_eq!(n, 5);
        assert_eq!(&buf, b"hello");
    }

    #[test]
    fn buffer_driver_rejects_duplicate_create() {
        let d = BufferDriver::new();
        d.create("a.txt", 0o644, NodeKind::File).unwrap();
        assert_eq!(
            d.create("a.txt", 0o644, NodeKind::File).unwrap_err(),
            crate::error::Error::AlreadyExists
        );
    }
}
