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

//! A byte-oriented handle over a resolved node: open once, read/write/seek
//! by an internally tracked cursor, close to release the reference the
//! graph gave out on open. This is the thin, caller-facing surface; it owns
//! no path-resolution logic of its own, only I/O plumbing over whatever
//! `load_path` handed back.

use crate::{
    driver::SeekFrom,
    error::{Error, VfsResult},
    node::{Node, Stat},
    vfs::Vfs,
};
use parking_lot::Mutex;
use std::sync::Arc;

pub struct Descriptor<'a> {
    vfs: &'a Vfs,
    node: Arc<Node>,
    cursor: Mutex<u64>,
    closed: std::sync::atomic::AtomicBool,
}

impl<'a> Descriptor<'a> {
    pub fn open(vfs: &'a Vfs, path: &str) -> VfsResult<Self> {
        let node = vfs.load_path(path)?;
        let resource = node.props.lock().resource.clone();
        if let Some(resource) = resource {
            if let Err(e) = resource.driver.open(&resource.handle) {
                vfs.release(node)?;
                return Err(e);
            }
        }
        Ok(Self {
            vfs,
            node,
            cursor: Mutex::new(0),
            closed: std::sync::atomic::AtomicBool::new(false),
        })
    }

    pub fn node(&self) -> Arc<Node> {
        Arc::clone(&self.node)
    }

    pub fn stat(&self) -> Stat {
        self.node.stat()
    }

    pub fn list(&self) -> Vec<Box<str>> {
        self.node.list_children()
    }

    pub fn read(&self, buf: &mut [u8]) -> VfsResult<usize> {
        let resource = self.node.props.lock().resource.clone().ok_or(Error::InvalidArgument)?;
        let mut cursor = self.cursor.lock();
        let n = resource.driver.read(&resource.handle, *cursor, buf)?;
        *cursor += n as u64;
        Ok(n)
    }

    pub fn write(&self, buf: &[u8]) -> VfsResult<usize> {
        let resource = self.node.props.lock().resource.clone().ok_or(Error::InvalidArgument)?;
        let mut cursor = self.cursor.lock();
        let n = resource.driver.write(&resource.handle, *cursor, buf)?;
        *cursor += n as u64;
        Ok(n)
    }

    pub fn seek(&self, pos: SeekFrom) -> VfsResult<u64> {
        let resource = self.node.props.lock().resource.clone().ok_or(Error::InvalidArgument)?;
        let mut cursor = self.cursor.lock();
        let new = resource.driver.seek(&resource.handle, pos, *cursor)?;
        *cursor = new;
        Ok(new)
    }

    /// Close the driver-level handle obtained on open, if any. Shared by
    /// `close()` and `Drop` so neither can close the graph reference without
    /// also closing the resource.
    fn close_resource(&self) -> VfsResult<()> {
        if let Some(resource) = self.node.props.lock().resource.clone() {
            resource.driver.close(&resource.handle)?;
        }
        Ok(())
    }

    /// Release the reference obtained on open. Also run implicitly by `Drop`,
    /// ignoring the result — call this explicitly to observe close errors.
    pub fn close(self) -> VfsResult<()> {
        self.closed.store(true, std::sync::atomic::Ordering::Relaxed);
        self.close_resource()?;
        self.vfs.release(Arc::clone(&self.node))
    }
}

impl Drop for Descriptor<'_> {
    fn drop(&mut self) {
        if self.closed.swap(true, std::sync::atomic::Ordering::Relaxed) {
            return;
        }
        let _ = self.close_resource();
        let _ = self.vfs.release(Arc::clone(&self.node));
    }
}
