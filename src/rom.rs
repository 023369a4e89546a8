use std::fs;
use std::path::PathBuf;

use crate::error::ScopeError;

/// Fetches ROM images by family and name. A failed fetch never touches a
/// loaded machine; the caller decides what to fall back to.
pub trait RomStore {
    fn fetch(&self, family: &str, name: &str) -> Result<Vec<u8>, ScopeError>;
}

/// serves ROMs straight out of `<root>/<family>/<name>`
pub struct DirRomStore {
    root: PathBuf,
}

impl DirRomStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        DirRomStore { root: root.into() }
    }
}

impl RomStore for DirRomStore {
    fn fetch(&self, family: &str, name: &str) -> Result<Vec<u8>, ScopeError> {
        let path = self.root.join(family).join(name);
        fs::read(&path).map_err(|source| ScopeError::Fetch {
            path: path.display().to_string(),
            source,
        })
    }
}

/// built-in maze demo, drawn on when no ROM is asked for or a fetch
/// fails
#[rustfmt::skip]
pub const TEST_ROM: [u8; 38] = [
    0x60, 0x00, 0x61, 0x00, 0xa2, 0x22, 0xc2, 0x01, 0x32, 0x01, 0xa2, 0x1e,
    0xd0, 0x14, 0x70, 0x04, 0x30, 0x40, 0x12, 0x04, 0x60, 0x00, 0x71, 0x04,
    0x31, 0x20, 0x12, 0x04, 0x12, 0x1c, 0x80, 0x40, 0x20, 0x10, 0x20, 0x40,
    0x80, 0x10,
];
