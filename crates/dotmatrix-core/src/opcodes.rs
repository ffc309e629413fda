//! Dispatch metadata for the two 256-entry opcode pages.
//!
//! Each entry records the instruction length in bytes and its cost in clock
//! ticks. Conditional control flow carries both the not-taken and taken
//! costs; the executor in [`crate::cpu`] reports which path it took and the
//! matching cost is charged.

#[derive(Clone, Copy, Debug)]
pub struct OpcodeInfo {
    pub len: u8,
    /// Cost in clock ticks; the not-taken cost for conditionals.
    pub cycles: u8,
    /// Cost when a conditional branches. Equals `cycles` otherwise.
    pub cycles_taken: u8,
}

const fn op(len: u8, cycles: u8) -> OpcodeInfo {
    OpcodeInfo {
        len,
        cycles,
        cycles_taken: cycles,
    }
}

const fn br(len: u8, cycles: u8, cycles_taken: u8) -> OpcodeInfo {
    OpcodeInfo {
        len,
        cycles,
        cycles_taken,
    }
}

/// Hardware-undefined opcodes. Fetching one latches an illegal-opcode fault;
/// they never execute as NOP.
pub const fn is_illegal(opcode: u8) -> bool {
    matches!(
        opcode,
        0xD3 | 0xDB | 0xDD | 0xE3 | 0xE4 | 0xEB | 0xEC | 0xED | 0xF4 | 0xFC | 0xFD
    )
}

/// Primary opcode page. The 0xCB entry is the prefix byte itself; the real
/// cost of a prefixed instruction comes from [`CB_OPCODES`], which already
/// includes the prefix fetch.
#[rustfmt::skip]
pub const OPCODES: [OpcodeInfo; 256] = [
    // 0x00
    op(1, 4),  op(3, 12), op(1, 8),  op(1, 8),  op(1, 4),  op(1, 4),  op(2, 8),  op(1, 4),
    op(3, 20), op(1, 8),  op(1, 8),  op(1, 8),  op(1, 4),  op(1, 4),  op(2, 8),  op(1, 4),
    // 0x10
    op(2, 4),  op(3, 12), op(1, 8),  op(1, 8),  op(1, 4),  op(1, 4),  op(2, 8),  op(1, 4),
    op(2, 12), op(1, 8),  op(1, 8),  op(1, 8),  op(1, 4),  op(1, 4),  op(2, 8),  op(1, 4),
    // 0x20
    br(2, 8, 12), op(3, 12), op(1, 8), op(1, 8), op(1, 4), op(1, 4), op(2, 8), op(1, 4),
    br(2, 8, 12), op(1, 8),  op(1, 8), op(1, 8), op(1, 4), op(1, 4), op(2, 8), op(1, 4),
    // 0x30
    br(2, 8, 12), op(3, 12), op(1, 8), op(1, 8), op(1, 12), op(1, 12), op(2, 12), op(1, 4),
    br(2, 8, 12), op(1, 8),  op(1, 8), op(1, 8), op(1, 4),  op(1, 4),  op(2, 8),  op(1, 4),
    // 0x40: LD r,r'
    op(1, 4), op(1, 4), op(1, 4), op(1, 4), op(1, 4), op(1, 4), op(1, 8), op(1, 4),
    op(1, 4), op(1, 4), op(1, 4), op(1, 4), op(1, 4), op(1, 4), op(1, 8), op(1, 4),
    // 0x50
    op(1, 4), op(1, 4), op(1, 4), op(1, 4), op(1, 4), op(1, 4), op(1, 8), op(1, 4),
    op(1, 4), op(1, 4), op(1, 4), op(1, 4), op(1, 4), op(1, 4), op(1, 8), op(1, 4),
    // 0x60
    op(1, 4), op(1, 4), op(1, 4), op(1, 4), op(1, 4), op(1, 4), op(1, 8), op(1, 4),
    op(1, 4), op(1, 4), op(1, 4), op(1, 4), op(1, 4), op(1, 4), op(1, 8), op(1, 4),
    // 0x70: LD (HL),r / HALT
    op(1, 8), op(1, 8), op(1, 8), op(1, 8), op(1, 8), op(1, 8), op(1, 4), op(1, 8),
    op(1, 4), op(1, 4), op(1, 4), op(1, 4), op(1, 4), op(1, 4), op(1, 8), op(1, 4),
    // 0x80: ADD/ADC
    op(1, 4), op(1, 4), op(1, 4), op(1, 4), op(1, 4), op(1, 4), op(1, 8), op(1, 4),
    op(1, 4), op(1, 4), op(1, 4), op(1, 4), op(1, 4), op(1, 4), op(1, 8), op(1, 4),
    // 0x90: SUB/SBC
    op(1, 4), op(1, 4), op(1, 4), op(1, 4), op(1, 4), op(1, 4), op(1, 8), op(1, 4),
    op(1, 4), op(1, 4), op(1, 4), op(1, 4), op(1, 4), op(1, 4), op(1, 8), op(1, 4),
    // 0xA0: AND/XOR
    op(1, 4), op(1, 4), op(1, 4), op(1, 4), op(1, 4), op(1, 4), op(1, 8), op(1, 4),
    op(1, 4), op(1, 4), op(1, 4), op(1, 4), op(1, 4), op(1, 4), op(1, 8), op(1, 4),
    // 0xB0: OR/CP
    op(1, 4), op(1, 4), op(1, 4), op(1, 4), op(1, 4), op(1, 4), op(1, 8), op(1, 4),
    op(1, 4), op(1, 4), op(1, 4), op(1, 4), op(1, 4), op(1, 4), op(1, 8), op(1, 4),
    // 0xC0
    br(1, 8, 20), op(1, 12), br(3, 12, 16), op(3, 16), br(3, 12, 24), op(1, 16), op(2, 8), op(1, 16),
    br(1, 8, 20), op(1, 16), br(3, 12, 16), op(2, 8),  br(3, 12, 24), op(3, 24), op(2, 8), op(1, 16),
    // 0xD0
    br(1, 8, 20), op(1, 12), br(3, 12, 16), op(1, 4),  br(3, 12, 24), op(1, 16), op(2, 8), op(1, 16),
    br(1, 8, 20), op(1, 16), br(3, 12, 16), op(1, 4),  br(3, 12, 24), op(1, 4),  op(2, 8), op(1, 16),
    // 0xE0
    op(2, 12), op(1, 12), op(1, 8),  op(1, 4), op(1, 4), op(1, 16), op(2, 8), op(1, 16),
    op(2, 16), op(1, 4),  op(3, 16), op(1, 4), op(1, 4), op(1, 4),  op(2, 8), op(1, 16),
    // 0xF0
    op(2, 12), op(1, 12), op(1, 8),  op(1, 4), op(1, 4), op(1, 16), op(2, 8), op(1, 16),
    op(2, 12), op(1, 8),  op(3, 16), op(1, 4), op(1, 4), op(1, 4),  op(2, 8), op(1, 16),
];

/// 0xCB-prefixed page: 8 ticks for register operands, 16 for (HL), except
/// BIT n,(HL), which only reads and takes 12. Costs include the prefix
/// fetch.
pub const CB_OPCODES: [OpcodeInfo; 256] = build_cb_table();

const fn build_cb_table() -> [OpcodeInfo; 256] {
    let mut table = [op(2, 8); 256];
    let mut i = 0;
    while i < 256 {
        if i & 0x07 == 0x06 {
            table[i] = if i >= 0x40 && i < 0x80 {
                op(2, 12)
            } else {
                op(2, 16)
            };
        }
        i += 1;
    }
    table
}
