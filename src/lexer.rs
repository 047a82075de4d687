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

//! Splits a path string into `/`-separated components. Does not special-case
//! `.`/`..` itself; that's on the caller (see [`crate::traversal`]).

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Component<'a> {
    pub text: &'a str,
    pub is_last: bool,
}

#[derive(Debug, Clone)]
pub struct PathLexer<'a> {
    path: &'a str,
    cursor: usize,
}

impl<'a> PathLexer<'a> {
    pub fn new(path: &'a str) -> Self {
        Self { path, cursor: 0 }
    }
    /// Byte offset of the component that would be yielded next; used by
    /// callers (traversal) to compute the unconsumed remainder.
    pub fn cursor(&self) -> usize {
        self.cursor
    }
    pub fn remainder(&self) -> &'a str {
        &self.path[self.cursor.min(self.path.len())..]
    }
    /// Returns the next non-empty component, or `None` once the path is exhausted.
    pub fn next_component(&mut self) -> Option<Component<'a>> {
        let bytes = self.path.as_bytes();
        // collapse any run of separators (handles leading and repeated `/`)
        while self.cursor < bytes.len() && bytes[self.cursor] == b'/' {
            self.cursor += 1;
        }
        if self.cursor >= bytes.len() {
            return None;
        }
        let start = self.cursor;
        while self.cursor < bytes.len() && bytes[self.cursor] != b'/' {
            self.cursor += 1;
        }
        let end = self.cursor;
        // is_last iff nothing but separators remain after this component
        let mut probe = end;
        while probe < bytes.len() && bytes[probe] == b'/' {
            probe += 1;
        }
        let is_last = probe >= bytes.len();
        Some(Component {
            text: &self.path[start..end],
            is_last,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(path: &str) -> Vec<(&str, bool)> {
        let mut lexer = PathLexer::new(path);
        let mut out = vec![];
        while let Some(c) = lexer.next_component() {
            out.push((c.text, c.is_last));
        }
        out
    }

    #[test]
    fn empty_path_yields_nothing() {
        assert_eq!(collect(""), vec![]);
        assert_eq!(collect("/"), vec![]);
    }

    #[test]
    fn single_component() {
        assert_eq!(collect("/a"), vec![("a", true)]);
    }

    #[test]
    fn multi_component() {
        assert_eq!(collect("/a/b/c"), vec![("a", false), ("b", false), ("c", true)]);
    }

    #[test]
    fn collapses_consecutive_slashes() {
        assert_eq!(collect("///a//b///"), vec![("a", false), ("b", true)]);
    }

    #[test]
    fn trailing_slash_does_not_add_component() {
        assert_eq!(collect("/a/b/"), vec![("a", false), ("b", true)]);
    }
}
