//! # propfile
//!
//! Read the binary property-tree format, IFS archives, and the LZSS-style
//! compression used by a particular arcade platform, and render any decoded
//! tree back out as XML.
//!
//! * `binary` decodes the split head/body property-tree stream.
//! * `ifs` opens an IFS archive, whose table of contents is itself a prop
//!   tree, and reads file blobs out of it.
//! * `lz` decompresses the sliding-window format used for file bodies and
//!   texture payloads.
//! * `tex` interprets a `texturelist` prop tree and materializes one
//!   image's pixels.
//! * `xml` renders a decoded prop tree as human-readable XML.
//!
//! ## Example
//!
//! ```rs
//! use propfile::{binary, xml};
//! let bytes = std::fs::read("some_path.bin").expect("read failed");
//! let root = binary::decode(&bytes).expect("decode failed");
//! let rendered = xml::write(&root).expect("xml render failed");
//! eprintln!("{rendered}");
//! ```

pub mod binary;
pub mod error;
pub mod ifs;
pub mod io;
pub mod lz;
pub mod name;
pub mod picture;
pub mod prop;
pub mod tools;
pub mod tex;
pub mod xml;

pub use error::{Error, Result};
