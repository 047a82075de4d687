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

//! A lazily-populated, mount-aware node graph: the part of a kernel-level
//! virtual file system that resolves paths, holds the in-memory tree
//! together with per-node locking and reference counting, and decides when a
//! node can be evicted or must be kept. Backing storage is a pluggable
//! driver trait ([`driver::ResourceDriver`]); this crate ships only the
//! in-memory [`driver::BufferDriver`] used for mount-less subtrees and tests.

pub mod config;
pub mod driver;
pub mod error;
pub mod eviction;
pub mod facade;
pub mod graph_ops;
pub mod lexer;
pub mod locking;
pub mod mount;
pub mod node;
pub mod refcount;
pub mod store;
pub mod traversal;
pub mod vfs;

pub use config::Config;
pub use driver::{DriverGroup, DriverHandle, ResourceDriver, SeekFrom};
pub use error::{Error, VfsResult};
pub use facade::Descriptor;
pub use graph_ops::{CreateInfo, RemoveFlags};
pub use node::{Node, NodeKind, Stat};
pub use vfs::Vfs;
