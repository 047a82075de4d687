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

use core::fmt;

pub type VfsResult<T> = Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq)]
/// Errors the graph core must distinguish (permission evaluation is left to the caller)
pub enum Error {
    /// null path, empty path, mode 0 where a mode is required
    InvalidArgument,
    /// traversal completed with a non-empty remainder
    NotFound,
    /// `create_path` hit an existing terminal, or `link` an existing link path
    AlreadyExists,
    /// attempted to mount on, or descend into, a non-directory
    NotADirectory,
    /// directory removal attempted with non-empty children and no recursive flag
    HasChildren,
    /// `ref_count > 0` at deletion time
    InUse,
    /// in-memory node (no mount) deleted without the `PHYSICAL` flag
    PhysicalDeleteRequired,
    /// symlink resolution exceeded `MAX_LINK_HOPS`
    TooManyLinks,
    /// link body unreadable or resolves to nothing
    BrokenLink,
    /// backing driver call failed; carries the driver-specific code
    DriverError(i32),
    /// node or name-string allocation failed
    OutOfMemory,
    /// rename was attempted across two distinct mounts
    CrossMountUnsupported,
    /// reserved for the caller; never produced by this crate
    PermissionDenied,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidArgument => write!(f, "invalid argument"),
            Self::NotFound => write!(f, "no such entry"),
            Self::AlreadyExists => write!(f, "entry already exists"),
            Self::NotADirectory => write!(f, "not a directory"),
            Self::HasChildren => write!(f, "directory is not empty"),
            Self::InUse => write!(f, "entry is in use"),
            Self::PhysicalDeleteRequired => {
                write!(f, "in-memory entry requires the physical flag to delete")
            }
            Self::TooManyLinks => write!(f, "too many levels of symbolic links"),
            Self::BrokenLink => write!(f, "broken link"),
            Self::DriverError(code) => write!(f, "driver error (code {code})"),
            Self::OutOfMemory => write!(f, "out of memory"),
            Self::CrossMountUnsupported => write!(f, "rename across mounts is unsupported"),
            Self::PermissionDenied => write!(f, "permission denied"),
        }
    }
}

impl std::error::Error for Error {}
