//! Thin filesystem helpers used only by the CLI binaries.

use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Read an entire file into memory.
pub fn read_file(path: &Path) -> std::io::Result<Vec<u8>> {
    let mut f = File::open(path)?;
    let mut buf = Vec::new();
    f.read_to_end(&mut buf)?;
    Ok(buf)
}

/// Write a byte slice to a file, creating or truncating it.
pub fn write_file(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    std::fs::write(path, bytes)
}

/// Create a directory and any missing parents; succeeds if it already
/// exists.
pub fn mkdir(path: &Path) -> std::io::Result<()> {
    if path.is_dir() {
        return Ok(());
    }
    std::fs::create_dir_all(path)
}
