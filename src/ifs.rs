//! IFS archive reader: fixed header, a binary-prop-tree TOC, and raw file
//! bodies addressed relative to the TOC's end.

use std::cell::RefCell;
use std::io::{Read, Seek, SeekFrom};

use crate::binary;
use crate::error::{Error, Result};
use crate::prop::{PropNode, PropType};

const HEADER_SIZE: usize = 0x24;
const HEADER_WORDS: usize = HEADER_SIZE / 4;
const BODY_START_WORD: usize = 4;

/// An open IFS archive: one underlying stream, plus the decoded TOC.
///
/// The stream handle is behind a `RefCell` rather than requiring `&mut
/// self` for reads: callers walk the TOC (borrowed from `self`) while
/// reading file bodies out of the same archive, and the two don't alias —
/// the archive model is still strictly single-threaded and synchronous.
pub struct IfsArchive<R> {
    reader: RefCell<R>,
    body_start: u32,
    toc: PropNode,
}

impl<R: Read + Seek> IfsArchive<R> {
    /// Read the header, parse the TOC, and require its root to be a
    /// directory.
    pub fn open(mut reader: R) -> Result<Self> {
        reader.seek(SeekFrom::Start(0))?;
        let mut header_bytes = [0u8; HEADER_SIZE];
        reader.read_exact(&mut header_bytes)?;

        let mut words = [0u32; HEADER_WORDS];
        for (i, w) in words.iter_mut().enumerate() {
            *w = u32::from_be_bytes(header_bytes[i * 4..i * 4 + 4].try_into().unwrap());
        }
        let body_start = words[BODY_START_WORD];

        if (body_start as usize) < HEADER_SIZE {
            return Err(Error::Malformed("ifs body_start before end of header".into()));
        }
        let toc_len = body_start as usize - HEADER_SIZE;

        let mut toc_bytes = vec![0u8; toc_len];
        reader.read_exact(&mut toc_bytes)?;

        let toc = binary::decode(&toc_bytes)?;
        if !is_dir(&toc) {
            return Err(Error::Malformed("ifs toc root is not a directory".into()));
        }

        Ok(Self { reader: RefCell::new(reader), body_start, toc })
    }

    pub fn root(&self) -> &PropNode {
        &self.toc
    }

    /// Resolve a `/`-separated path from the root.
    pub fn lookup(&self, path: &str) -> Option<&PropNode> {
        let components: Vec<&str> = path.split('/').filter(|c| !c.is_empty()).collect();
        lookup(&self.toc, &components)
    }

    /// Read a file dirent's blob. `dest = None` returns only the length.
    /// A too-small destination fails with `NoSpace`.
    pub fn read_file(&self, dirent: &PropNode, dest: Option<&mut [u8]>) -> Result<usize> {
        if dirent.ptype() != PropType::ThreeS32 {
            return Err(Error::Malformed("dirent is not a file".into()));
        }
        let mut cursor = dirent.value_cursor();
        let offset = cursor.read_u32_be()?;
        let length = cursor.read_u32_be()?;
        let _timestamp = cursor.read_u32_be()?;

        let dest = match dest {
            None => return Ok(length as usize),
            Some(d) => d,
        };
        if dest.len() < length as usize {
            return Err(Error::NoSpace);
        }

        let mut reader = self.reader.borrow_mut();
        reader.seek(SeekFrom::Start(self.body_start as u64 + offset as u64))?;
        reader.read_exact(&mut dest[..length as usize])?;
        Ok(length as usize)
    }
}

/// `void` or `s32` dirents are directories.
pub fn is_dir(node: &PropNode) -> bool {
    matches!(node.ptype(), PropType::Void | PropType::S32)
}

/// `3s32` dirents are files.
pub fn is_file(node: &PropNode) -> bool {
    node.ptype() == PropType::ThreeS32
}

/// Iterate a dirent's children in insertion order, skipping a leading
/// `_info_` metadata entry if present.
pub fn children(node: &PropNode) -> impl Iterator<Item = &PropNode> {
    let kids = node.children();
    let skip = if kids.first().map(|c| c.name()) == Some("_info_") { 1 } else { 0 };
    kids[skip..].iter()
}

/// Apply the lossy name-escaping rule: `_E` -> `.`, other `_X` -> `X`
/// verbatim, underscore consumed either way.
pub fn escape_name(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c == '_' {
            if let Some(next) = chars.next() {
                out.push(if next == 'E' { '.' } else { next });
            }
        } else {
            out.push(c);
        }
    }
    out
}

fn lookup<'a>(node: &'a PropNode, components: &[&str]) -> Option<&'a PropNode> {
    match components.split_first() {
        None => Some(node),
        Some((name, rest)) => {
            for child in children(node) {
                if escape_name(child.name()) == *name {
                    return lookup(child, rest);
                }
            }
            None
        }
    }
}
