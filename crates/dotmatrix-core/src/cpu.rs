use log::warn;

use crate::interrupts::Interrupt;
use crate::mmu::Mmu;
use crate::opcodes::{self, CB_OPCODES, OPCODES};

// CPU flag bits as documented in gbdev.io/pandocs/The_CPU_Flags.html
const FLAG_Z: u8 = 0x80; // Zero
const FLAG_N: u8 = 0x40; // Subtract
const FLAG_H: u8 = 0x20; // Half Carry
const FLAG_C: u8 = 0x10; // Carry

// Post-boot CPU state from gbdev.io/pandocs/Power_Up_State.html
const BOOT_A: u8 = 0x01;
const BOOT_F: u8 = 0xB0;
const BOOT_B: u8 = 0x00;
const BOOT_C: u8 = 0x13;
const BOOT_D: u8 = 0x00;
const BOOT_E: u8 = 0xD8;
const BOOT_H: u8 = 0x01;
const BOOT_L: u8 = 0x4D;
const BOOT_PC: u16 = 0x0100;
const BOOT_SP: u16 = 0xFFFE;

/// Clock ticks charged for an interrupt dispatch (5 machine cycles).
const INTERRUPT_DISPATCH_CYCLES: u32 = 20;
/// Clock ticks consumed per step while halted.
const HALT_IDLE_CYCLES: u32 = 4;

/// A latched illegal-opcode fault. The CPU halts when one is raised; the
/// scheduler surfaces it to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fault {
    pub opcode: u8,
    pub addr: u16,
}

pub struct Cpu {
    pub a: u8,
    pub f: u8,
    pub b: u8,
    pub c: u8,
    pub d: u8,
    pub e: u8,
    pub h: u8,
    pub l: u8,
    pub pc: u16,
    pub sp: u16,
    /// Total clock ticks elapsed since power-on.
    pub cycles: u64,
    pub ime: bool,
    halted: bool,
    /// EI raises IME only after the following instruction retires.
    ime_enable_delay: u8,
    fault: Option<Fault>,
}

impl Cpu {
    /// Create a CPU initialized to the DMG post-boot register state.
    pub fn new() -> Self {
        Self {
            a: BOOT_A,
            f: BOOT_F,
            b: BOOT_B,
            c: BOOT_C,
            d: BOOT_D,
            e: BOOT_E,
            h: BOOT_H,
            l: BOOT_L,
            pc: BOOT_PC,
            sp: BOOT_SP,
            cycles: 0,
            ime: false,
            halted: false,
            ime_enable_delay: 0,
            fault: None,
        }
    }

    pub fn halted(&self) -> bool {
        self.halted
    }

    pub fn fault(&self) -> Option<Fault> {
        self.fault
    }

    pub fn get_bc(&self) -> u16 {
        ((self.b as u16) << 8) | self.c as u16
    }

    pub fn set_bc(&mut self, val: u16) {
        self.b = (val >> 8) as u8;
        self.c = val as u8;
    }

    pub fn get_de(&self) -> u16 {
        ((self.d as u16) << 8) | self.e as u16
    }

    pub fn set_de(&mut self, val: u16) {
        self.d = (val >> 8) as u8;
        self.e = val as u8;
    }

    pub fn get_hl(&self) -> u16 {
        ((self.h as u16) << 8) | self.l as u16
    }

    pub fn set_hl(&mut self, val: u16) {
        self.h = (val >> 8) as u8;
        self.l = val as u8;
    }

    pub fn get_af(&self) -> u16 {
        ((self.a as u16) << 8) | self.f as u16
    }

    /// The low nibble of F always reads back as zero.
    pub fn set_af(&mut self, val: u16) {
        self.a = (val >> 8) as u8;
        self.f = val as u8 & 0xF0;
    }

    /// Formatted CPU state string for debugging.
    pub fn debug_state(&self) -> String {
        format!(
            "AF:{:04X} BC:{:04X} DE:{:04X} HL:{:04X} PC:{:04X} SP:{:04X} CY:{}",
            self.get_af(),
            self.get_bc(),
            self.get_de(),
            self.get_hl(),
            self.pc,
            self.sp,
            self.cycles
        )
    }

    /// Execute one instruction (or service one interrupt, or idle while
    /// halted) and return the elapsed clock ticks.
    pub fn step(&mut self, mmu: &mut Mmu) -> u32 {
        if self.fault.is_some() {
            return HALT_IDLE_CYCLES;
        }

        // An EI from the previous instruction takes effect now, before the
        // interrupt check.
        if self.ime_enable_delay > 0 {
            self.ime_enable_delay -= 1;
            if self.ime_enable_delay == 0 {
                self.ime = true;
            }
        }

        if mmu.interrupts.pending() != 0 {
            // Pending work always wakes the CPU; IME gates only the dispatch.
            self.halted = false;
            if self.ime {
                if let Some(int) = mmu.interrupts.next_pending() {
                    return self.dispatch_interrupt(mmu, int);
                }
            }
        }

        if self.halted {
            self.cycles += HALT_IDLE_CYCLES as u64;
            return HALT_IDLE_CYCLES;
        }

        let opcode_addr = self.pc;
        let opcode = self.fetch8(mmu);

        if opcodes::is_illegal(opcode) {
            warn!("illegal opcode {opcode:#04X} at {opcode_addr:#06X}");
            self.pc = opcode_addr;
            self.halted = true;
            self.fault = Some(Fault {
                opcode,
                addr: opcode_addr,
            });
            self.cycles += HALT_IDLE_CYCLES as u64;
            return HALT_IDLE_CYCLES;
        }

        let cycles = if opcode == 0xCB {
            let cb = self.fetch8(mmu);
            self.execute_cb(mmu, cb);
            CB_OPCODES[cb as usize].cycles as u32
        } else {
            let info = &OPCODES[opcode as usize];
            let branched = self.execute(mmu, opcode);
            if branched {
                info.cycles_taken as u32
            } else {
                info.cycles as u32
            }
        };
        self.cycles += cycles as u64;
        cycles
    }

    fn dispatch_interrupt(&mut self, mmu: &mut Mmu, int: Interrupt) -> u32 {
        self.ime = false;
        mmu.interrupts.clear(int);
        self.halted = false;
        let pc = self.pc;
        self.push(mmu, pc);
        self.pc = int.vector();
        self.cycles += INTERRUPT_DISPATCH_CYCLES as u64;
        INTERRUPT_DISPATCH_CYCLES
    }

    #[inline(always)]
    fn fetch8(&mut self, mmu: &mut Mmu) -> u8 {
        let val = mmu.read_byte(self.pc);
        self.pc = self.pc.wrapping_add(1);
        val
    }

    #[inline(always)]
    fn fetch16(&mut self, mmu: &mut Mmu) -> u16 {
        let lo = self.fetch8(mmu) as u16;
        let hi = self.fetch8(mmu) as u16;
        (hi << 8) | lo
    }

    fn push(&mut self, mmu: &mut Mmu, val: u16) {
        self.sp = self.sp.wrapping_sub(1);
        mmu.write_byte(self.sp, (val >> 8) as u8);
        self.sp = self.sp.wrapping_sub(1);
        mmu.write_byte(self.sp, val as u8);
    }

    fn pop(&mut self, mmu: &mut Mmu) -> u16 {
        let lo = mmu.read_byte(self.sp) as u16;
        self.sp = self.sp.wrapping_add(1);
        let hi = mmu.read_byte(self.sp) as u16;
        self.sp = self.sp.wrapping_add(1);
        (hi << 8) | lo
    }

    /// Source/destination decode for the r8 field: B C D E H L (HL) A.
    fn read_reg(&mut self, mmu: &mut Mmu, index: u8) -> u8 {
        match index {
            0 => self.b,
            1 => self.c,
            2 => self.d,
            3 => self.e,
            4 => self.h,
            5 => self.l,
            6 => mmu.read_byte(self.get_hl()),
            7 => self.a,
            _ => unreachable!(),
        }
    }

    fn write_reg(&mut self, mmu: &mut Mmu, index: u8, val: u8) {
        match index {
            0 => self.b = val,
            1 => self.c = val,
            2 => self.d = val,
            3 => self.e = val,
            4 => self.h = val,
            5 => self.l = val,
            6 => {
                let addr = self.get_hl();
                mmu.write_byte(addr, val);
            }
            7 => self.a = val,
            _ => unreachable!(),
        }
    }

    /// r16 field decode: BC DE HL SP.
    fn get_r16(&self, index: u8) -> u16 {
        match index {
            0 => self.get_bc(),
            1 => self.get_de(),
            2 => self.get_hl(),
            _ => self.sp,
        }
    }

    fn set_r16(&mut self, index: u8, val: u16) {
        match index {
            0 => self.set_bc(val),
            1 => self.set_de(val),
            2 => self.set_hl(val),
            _ => self.sp = val,
        }
    }

    /// cc field decode: NZ Z NC C.
    fn condition(&self, code: u8) -> bool {
        match code & 0x03 {
            0 => self.f & FLAG_Z == 0,
            1 => self.f & FLAG_Z != 0,
            2 => self.f & FLAG_C == 0,
            _ => self.f & FLAG_C != 0,
        }
    }

    /// Execute one primary-page instruction; returns whether a conditional
    /// took its branch.
    fn execute(&mut self, mmu: &mut Mmu, opcode: u8) -> bool {
        match opcode {
            0x00 => {}
            // LD r16,n16
            0x01 | 0x11 | 0x21 | 0x31 => {
                let val = self.fetch16(mmu);
                self.set_r16((opcode >> 4) & 0x03, val);
            }
            // LD (r16),A and the HL+/HL- stores
            0x02 => mmu.write_byte(self.get_bc(), self.a),
            0x12 => mmu.write_byte(self.get_de(), self.a),
            0x22 => {
                let hl = self.get_hl();
                mmu.write_byte(hl, self.a);
                self.set_hl(hl.wrapping_add(1));
            }
            0x32 => {
                let hl = self.get_hl();
                mmu.write_byte(hl, self.a);
                self.set_hl(hl.wrapping_sub(1));
            }
            // LD A,(r16) and the HL+/HL- loads
            0x0A => self.a = mmu.read_byte(self.get_bc()),
            0x1A => self.a = mmu.read_byte(self.get_de()),
            0x2A => {
                let hl = self.get_hl();
                self.a = mmu.read_byte(hl);
                self.set_hl(hl.wrapping_add(1));
            }
            0x3A => {
                let hl = self.get_hl();
                self.a = mmu.read_byte(hl);
                self.set_hl(hl.wrapping_sub(1));
            }
            // INC/DEC r16 (no flags)
            0x03 | 0x13 | 0x23 | 0x33 => {
                let r = (opcode >> 4) & 0x03;
                self.set_r16(r, self.get_r16(r).wrapping_add(1));
            }
            0x0B | 0x1B | 0x2B | 0x3B => {
                let r = (opcode >> 4) & 0x03;
                self.set_r16(r, self.get_r16(r).wrapping_sub(1));
            }
            // INC/DEC r8
            0x04 | 0x0C | 0x14 | 0x1C | 0x24 | 0x2C | 0x34 | 0x3C => {
                let r = (opcode >> 3) & 0x07;
                let val = self.read_reg(mmu, r);
                let res = self.alu_inc(val);
                self.write_reg(mmu, r, res);
            }
            0x05 | 0x0D | 0x15 | 0x1D | 0x25 | 0x2D | 0x35 | 0x3D => {
                let r = (opcode >> 3) & 0x07;
                let val = self.read_reg(mmu, r);
                let res = self.alu_dec(val);
                self.write_reg(mmu, r, res);
            }
            // LD r8,n8
            0x06 | 0x0E | 0x16 | 0x1E | 0x26 | 0x2E | 0x36 | 0x3E => {
                let val = self.fetch8(mmu);
                self.write_reg(mmu, (opcode >> 3) & 0x07, val);
            }
            // Accumulator rotates force Z=0.
            0x07 => {
                self.a = self.rlc(self.a);
                self.f &= FLAG_C;
            }
            0x0F => {
                self.a = self.rrc(self.a);
                self.f &= FLAG_C;
            }
            0x17 => {
                self.a = self.rl(self.a);
                self.f &= FLAG_C;
            }
            0x1F => {
                self.a = self.rr(self.a);
                self.f &= FLAG_C;
            }
            0x08 => {
                let addr = self.fetch16(mmu);
                mmu.write_byte(addr, self.sp as u8);
                mmu.write_byte(addr.wrapping_add(1), (self.sp >> 8) as u8);
            }
            // ADD HL,r16
            0x09 | 0x19 | 0x29 | 0x39 => {
                let val = self.get_r16((opcode >> 4) & 0x03);
                self.add_hl(val);
            }
            0x10 => {
                // STOP consumes its padding byte and behaves as HALT; the
                // one observable side effect is the DIV reset.
                let _ = self.fetch8(mmu);
                mmu.timer.reset_div(&mut mmu.interrupts);
                self.halted = true;
            }
            // JR e8 / JR cc,e8
            0x18 => {
                let offset = self.fetch8(mmu) as i8;
                self.pc = self.pc.wrapping_add(offset as u16);
            }
            0x20 | 0x28 | 0x30 | 0x38 => {
                let offset = self.fetch8(mmu) as i8;
                if self.condition((opcode >> 3) & 0x03) {
                    self.pc = self.pc.wrapping_add(offset as u16);
                    return true;
                }
            }
            0x27 => self.daa(),
            0x2F => {
                self.a = !self.a;
                self.f = (self.f & (FLAG_Z | FLAG_C)) | FLAG_N | FLAG_H;
            }
            0x37 => self.f = (self.f & FLAG_Z) | FLAG_C,
            0x3F => self.f = (self.f & FLAG_Z) | ((self.f & FLAG_C) ^ FLAG_C),
            0x76 => {
                // HALT with IME=0 and work already pending falls through to
                // the next instruction (the hardware's double-read bug is
                // not modeled).
                if self.ime || mmu.interrupts.pending() == 0 {
                    self.halted = true;
                }
            }
            // LD r8,r8'
            0x40..=0x7F => {
                let val = self.read_reg(mmu, opcode & 0x07);
                self.write_reg(mmu, (opcode >> 3) & 0x07, val);
            }
            // 8-bit ALU on A
            0x80..=0x87 => {
                let val = self.read_reg(mmu, opcode & 0x07);
                self.alu_add(val, false);
            }
            0x88..=0x8F => {
                let val = self.read_reg(mmu, opcode & 0x07);
                self.alu_add(val, true);
            }
            0x90..=0x97 => {
                let val = self.read_reg(mmu, opcode & 0x07);
                self.alu_sub(val, false);
            }
            0x98..=0x9F => {
                let val = self.read_reg(mmu, opcode & 0x07);
                self.alu_sub(val, true);
            }
            0xA0..=0xA7 => {
                let val = self.read_reg(mmu, opcode & 0x07);
                self.a &= val;
                self.f = z_flag(self.a) | FLAG_H;
            }
            0xA8..=0xAF => {
                let val = self.read_reg(mmu, opcode & 0x07);
                self.a ^= val;
                self.f = z_flag(self.a);
            }
            0xB0..=0xB7 => {
                let val = self.read_reg(mmu, opcode & 0x07);
                self.a |= val;
                self.f = z_flag(self.a);
            }
            0xB8..=0xBF => {
                let val = self.read_reg(mmu, opcode & 0x07);
                self.alu_cp(val);
            }
            // RET cc / RET / RETI
            0xC0 | 0xC8 | 0xD0 | 0xD8 => {
                if self.condition((opcode >> 3) & 0x03) {
                    self.pc = self.pop(mmu);
                    return true;
                }
            }
            0xC9 => self.pc = self.pop(mmu),
            0xD9 => {
                self.pc = self.pop(mmu);
                // RETI raises IME immediately, without EI's delay.
                self.ime = true;
            }
            // POP/PUSH r16 (AF keeps its low nibble clear)
            0xC1 => {
                let val = self.pop(mmu);
                self.set_bc(val);
            }
            0xD1 => {
                let val = self.pop(mmu);
                self.set_de(val);
            }
            0xE1 => {
                let val = self.pop(mmu);
                self.set_hl(val);
            }
            0xF1 => {
                let val = self.pop(mmu);
                self.set_af(val);
            }
            0xC5 => {
                let val = self.get_bc();
                self.push(mmu, val);
            }
            0xD5 => {
                let val = self.get_de();
                self.push(mmu, val);
            }
            0xE5 => {
                let val = self.get_hl();
                self.push(mmu, val);
            }
            0xF5 => {
                let val = self.get_af();
                self.push(mmu, val);
            }
            // JP / JP cc / JP HL
            0xC3 => self.pc = self.fetch16(mmu),
            0xC2 | 0xCA | 0xD2 | 0xDA => {
                let addr = self.fetch16(mmu);
                if self.condition((opcode >> 3) & 0x03) {
                    self.pc = addr;
                    return true;
                }
            }
            0xE9 => self.pc = self.get_hl(),
            // CALL / CALL cc
            0xCD => {
                let addr = self.fetch16(mmu);
                let pc = self.pc;
                self.push(mmu, pc);
                self.pc = addr;
            }
            0xC4 | 0xCC | 0xD4 | 0xDC => {
                let addr = self.fetch16(mmu);
                if self.condition((opcode >> 3) & 0x03) {
                    let pc = self.pc;
                    self.push(mmu, pc);
                    self.pc = addr;
                    return true;
                }
            }
            // RST
            0xC7 | 0xCF | 0xD7 | 0xDF | 0xE7 | 0xEF | 0xF7 | 0xFF => {
                let pc = self.pc;
                self.push(mmu, pc);
                self.pc = (opcode & 0x38) as u16;
            }
            // ALU with immediate operand
            0xC6 => {
                let val = self.fetch8(mmu);
                self.alu_add(val, false);
            }
            0xCE => {
                let val = self.fetch8(mmu);
                self.alu_add(val, true);
            }
            0xD6 => {
                let val = self.fetch8(mmu);
                self.alu_sub(val, false);
            }
            0xDE => {
                let val = self.fetch8(mmu);
                self.alu_sub(val, true);
            }
            0xE6 => {
                let val = self.fetch8(mmu);
                self.a &= val;
                self.f = z_flag(self.a) | FLAG_H;
            }
            0xEE => {
                let val = self.fetch8(mmu);
                self.a ^= val;
                self.f = z_flag(self.a);
            }
            0xF6 => {
                let val = self.fetch8(mmu);
                self.a |= val;
                self.f = z_flag(self.a);
            }
            0xFE => {
                let val = self.fetch8(mmu);
                self.alu_cp(val);
            }
            // High-RAM loads/stores
            0xE0 => {
                let offset = self.fetch8(mmu);
                mmu.write_byte(0xFF00 | offset as u16, self.a);
            }
            0xF0 => {
                let offset = self.fetch8(mmu);
                self.a = mmu.read_byte(0xFF00 | offset as u16);
            }
            0xE2 => mmu.write_byte(0xFF00 | self.c as u16, self.a),
            0xF2 => self.a = mmu.read_byte(0xFF00 | self.c as u16),
            0xEA => {
                let addr = self.fetch16(mmu);
                mmu.write_byte(addr, self.a);
            }
            0xFA => {
                let addr = self.fetch16(mmu);
                self.a = mmu.read_byte(addr);
            }
            // SP arithmetic
            0xE8 => {
                let res = self.add_sp_offset(mmu);
                self.sp = res;
            }
            0xF8 => {
                let res = self.add_sp_offset(mmu);
                self.set_hl(res);
            }
            0xF9 => self.sp = self.get_hl(),
            // IME control
            0xF3 => {
                self.ime = false;
                self.ime_enable_delay = 0;
            }
            0xFB => self.ime_enable_delay = 2,
            // 0xCB and the illegal opcodes are filtered before dispatch.
            _ => unreachable!(),
        }
        false
    }

    fn execute_cb(&mut self, mmu: &mut Mmu, opcode: u8) {
        let r = opcode & 0x07;
        match opcode {
            0x00..=0x07 => {
                let val = self.read_reg(mmu, r);
                let res = self.rlc(val);
                self.write_reg(mmu, r, res);
            }
            0x08..=0x0F => {
                let val = self.read_reg(mmu, r);
                let res = self.rrc(val);
                self.write_reg(mmu, r, res);
            }
            0x10..=0x17 => {
                let val = self.read_reg(mmu, r);
                let res = self.rl(val);
                self.write_reg(mmu, r, res);
            }
            0x18..=0x1F => {
                let val = self.read_reg(mmu, r);
                let res = self.rr(val);
                self.write_reg(mmu, r, res);
            }
            0x20..=0x27 => {
                let val = self.read_reg(mmu, r);
                let res = val << 1;
                self.f = z_flag(res) | c_flag(val & 0x80 != 0);
                self.write_reg(mmu, r, res);
            }
            0x28..=0x2F => {
                let val = self.read_reg(mmu, r);
                let res = (val >> 1) | (val & 0x80);
                self.f = z_flag(res) | c_flag(val & 0x01 != 0);
                self.write_reg(mmu, r, res);
            }
            0x30..=0x37 => {
                let val = self.read_reg(mmu, r);
                let res = val.rotate_left(4);
                self.f = z_flag(res);
                self.write_reg(mmu, r, res);
            }
            0x38..=0x3F => {
                let val = self.read_reg(mmu, r);
                let res = val >> 1;
                self.f = z_flag(res) | c_flag(val & 0x01 != 0);
                self.write_reg(mmu, r, res);
            }
            0x40..=0x7F => {
                let bit = (opcode >> 3) & 0x07;
                let val = self.read_reg(mmu, r);
                self.f = (self.f & FLAG_C) | FLAG_H | z_flag(val & (1 << bit));
            }
            0x80..=0xBF => {
                let bit = (opcode >> 3) & 0x07;
                let val = self.read_reg(mmu, r);
                self.write_reg(mmu, r, val & !(1 << bit));
            }
            0xC0..=0xFF => {
                let bit = (opcode >> 3) & 0x07;
                let val = self.read_reg(mmu, r);
                self.write_reg(mmu, r, val | (1 << bit));
            }
        }
    }

    fn alu_inc(&mut self, val: u8) -> u8 {
        let res = val.wrapping_add(1);
        self.f = (self.f & FLAG_C) | z_flag(res) | if val & 0x0F == 0x0F { FLAG_H } else { 0 };
        res
    }

    fn alu_dec(&mut self, val: u8) -> u8 {
        let res = val.wrapping_sub(1);
        self.f = (self.f & FLAG_C)
            | FLAG_N
            | z_flag(res)
            | if val & 0x0F == 0 { FLAG_H } else { 0 };
        res
    }

    fn alu_add(&mut self, val: u8, with_carry: bool) {
        let carry = (with_carry && self.f & FLAG_C != 0) as u8;
        let a = self.a;
        let res = a.wrapping_add(val).wrapping_add(carry);
        self.f = z_flag(res)
            | if (a & 0x0F) + (val & 0x0F) + carry > 0x0F {
                FLAG_H
            } else {
                0
            }
            | c_flag(a as u16 + val as u16 + carry as u16 > 0xFF);
        self.a = res;
    }

    fn alu_sub(&mut self, val: u8, with_carry: bool) {
        let carry = (with_carry && self.f & FLAG_C != 0) as u8;
        let a = self.a;
        let res = a.wrapping_sub(val).wrapping_sub(carry);
        self.f = FLAG_N
            | z_flag(res)
            | if (a & 0x0F) < (val & 0x0F) + carry {
                FLAG_H
            } else {
                0
            }
            | c_flag((a as u16) < val as u16 + carry as u16);
        self.a = res;
    }

    fn alu_cp(&mut self, val: u8) {
        let a = self.a;
        self.f = FLAG_N
            | z_flag(a.wrapping_sub(val))
            | if (a & 0x0F) < (val & 0x0F) { FLAG_H } else { 0 }
            | c_flag(a < val);
    }

    fn add_hl(&mut self, val: u16) {
        let hl = self.get_hl();
        let res = hl.wrapping_add(val);
        self.f = (self.f & FLAG_Z)
            | if (hl & 0x0FFF) + (val & 0x0FFF) > 0x0FFF {
                FLAG_H
            } else {
                0
            }
            | c_flag(hl as u32 + val as u32 > 0xFFFF);
        self.set_hl(res);
    }

    /// SP plus a signed immediate, shared by ADD SP,e8 and LD HL,SP+e8.
    /// H and C come from the low byte's unsigned addition.
    fn add_sp_offset(&mut self, mmu: &mut Mmu) -> u16 {
        let val = self.fetch8(mmu) as i8 as i16 as u16;
        let sp = self.sp;
        self.f = if (sp & 0x0F) + (val & 0x0F) > 0x0F {
            FLAG_H
        } else {
            0
        } | c_flag((sp & 0xFF) + (val & 0xFF) > 0xFF);
        sp.wrapping_add(val)
    }

    fn daa(&mut self) {
        let mut correction = 0u8;
        let mut carry = false;
        if self.f & FLAG_H != 0 || (self.f & FLAG_N == 0 && self.a & 0x0F > 0x09) {
            correction |= 0x06;
        }
        if self.f & FLAG_C != 0 || (self.f & FLAG_N == 0 && self.a > 0x99) {
            correction |= 0x60;
            carry = true;
        }
        if self.f & FLAG_N == 0 {
            self.a = self.a.wrapping_add(correction);
        } else {
            self.a = self.a.wrapping_sub(correction);
        }
        self.f = (self.f & FLAG_N) | z_flag(self.a) | c_flag(carry);
    }

    fn rlc(&mut self, val: u8) -> u8 {
        let res = val.rotate_left(1);
        self.f = z_flag(res) | c_flag(val & 0x80 != 0);
        res
    }

    fn rrc(&mut self, val: u8) -> u8 {
        let res = val.rotate_right(1);
        self.f = z_flag(res) | c_flag(val & 0x01 != 0);
        res
    }

    fn rl(&mut self, val: u8) -> u8 {
        let carry_in = (self.f & FLAG_C != 0) as u8;
        let res = (val << 1) | carry_in;
        self.f = z_flag(res) | c_flag(val & 0x80 != 0);
        res
    }

    fn rr(&mut self, val: u8) -> u8 {
        let carry_in = (self.f & FLAG_C != 0) as u8;
        let res = (val >> 1) | (carry_in << 7);
        self.f = z_flag(res) | c_flag(val & 0x01 != 0);
        res
    }
}

fn z_flag(res: u8) -> u8 {
    if res == 0 { FLAG_Z } else { 0 }
}

fn c_flag(carry: bool) -> u8 {
    if carry { FLAG_C } else { 0 }
}

impl Default for Cpu {
    fn default() -> Self {
        Self::new()
    }
}
