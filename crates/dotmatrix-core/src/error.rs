use std::io;

use thiserror::Error;

/// Faults the core can surface to the host shell.
///
/// The bus and CPU never recover from these internally; they propagate up
/// through the machine facade so the host can log and exit.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("failed to read ROM image: {0}")]
    RomIo(#[from] io::Error),

    #[error("ROM image is empty")]
    RomEmpty,

    #[error("ROM image is {0} bytes, smaller than the 32 KiB minimum")]
    RomTooSmall(usize),

    #[error("ROM image is {0} bytes, larger than the 8 MiB maximum")]
    RomTooLarge(usize),

    #[error("unsupported cartridge type {0:#04X}")]
    UnsupportedMbc(u8),

    #[error("illegal opcode {opcode:#04X} at {addr:#06X}")]
    IllegalOpcode { opcode: u8, addr: u16 },
}
