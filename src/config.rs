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

//! The core's own configuration surface is small: everything else (mount
//! table contents, auth, network) is owned by callers.

use crate::traversal::MAX_LINK_HOPS;

#[derive(Debug, Clone, Copy)]
pub struct Config {
    /// Fixed ring capacity for the eviction cache.
    pub eviction_cache_size: usize,
    /// Symlink resolution hop budget.
    pub max_link_hops: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            eviction_cache_size: 1024,
            max_link_hops: MAX_LINK_HOPS,
        }
    }
}
