use std::error::Error;
use std::fmt;
use std::io;

use crate::machine::MachineFault;

/// Everything that can go wrong in the harness, grouped by where it bites:
/// construction (`MissingSurface`), the ROM action (`Fetch`), or the frame
/// loop (`OutOfBounds`, `Machine`).
#[derive(Debug)]
pub enum ScopeError {
    /// a requested memory view exceeds the buffer's current extent
    OutOfBounds {
        base: usize,
        len: usize,
        buffer: usize,
    },
    /// ROM retrieval failed; a running machine is left untouched
    Fetch { path: String, source: io::Error },
    /// the machine reported an unrecoverable execution error
    Machine(MachineFault),
    /// a required rendering anchor is absent at construction
    MissingSurface(String),
}

impl fmt::Display for ScopeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ScopeError::OutOfBounds { base, len, buffer } => write!(
                f,
                "view 0x{:x}+0x{:x} exceeds the machine buffer ({} bytes)",
                base, len, buffer
            ),
            ScopeError::Fetch { path, source } => {
                write!(f, "rom fetch failed for {}: {}", path, source)
            }
            ScopeError::Machine(fault) => write!(f, "{}", fault),
            ScopeError::MissingSurface(detail) => {
                write!(f, "rendering surface unavailable: {}", detail)
            }
        }
    }
}

impl Error for ScopeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ScopeError::Fetch { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<MachineFault> for ScopeError {
    fn from(fault: MachineFault) -> Self {
        ScopeError::Machine(fault)
    }
}
