use crate::{
    cartridge::Cartridge,
    interrupts::{Interrupt, InterruptController},
    joypad::{Button, Joypad},
    ppu::Ppu,
    serial::Serial,
    timer::Timer,
};

const WRAM_SIZE: usize = 0x2000;
const HRAM_SIZE: usize = 0x7F;

/// The 64 KiB memory bus.
///
/// Every address is readable and every write is accepted; region policy
/// decides what actually happens (ROM writes become MBC commands, the
/// unusable gap reads 0xFF, echo RAM aliases WRAM, I/O routes to the owning
/// peripheral).
pub struct Mmu {
    pub cart: Option<Cartridge>,
    pub wram: [u8; WRAM_SIZE],
    pub hram: [u8; HRAM_SIZE],
    pub interrupts: InterruptController,
    pub joypad: Joypad,
    pub serial: Serial,
    pub timer: Timer,
    pub ppu: Ppu,
}

impl Mmu {
    pub fn new() -> Self {
        Self {
            cart: None,
            wram: [0xFF; WRAM_SIZE],
            hram: [0xFF; HRAM_SIZE],
            interrupts: InterruptController::new(),
            joypad: Joypad::new(),
            serial: Serial::new(),
            timer: Timer::new(),
            ppu: Ppu::new(),
        }
    }

    pub fn load_cart(&mut self, cart: Cartridge) {
        self.cart = Some(cart);
    }

    pub fn read_byte(&mut self, addr: u16) -> u8 {
        match addr {
            0x0000..=0x7FFF | 0xA000..=0xBFFF => {
                self.cart.as_ref().map(|c| c.read(addr)).unwrap_or(0xFF)
            }
            0x8000..=0x9FFF => self.ppu.vram[(addr - 0x8000) as usize],
            0xC000..=0xDFFF => self.wram[(addr - 0xC000) as usize],
            // Echo RAM aliases 0xC000-0xDDFF.
            0xE000..=0xFDFF => self.wram[(addr - 0xE000) as usize],
            0xFE00..=0xFE9F => self.ppu.oam[(addr - 0xFE00) as usize],
            0xFEA0..=0xFEFF => 0xFF,
            0xFF00 => self.joypad.read(),
            0xFF01 | 0xFF02 => self.serial.read(addr),
            0xFF04..=0xFF07 => self.timer.read(addr),
            0xFF0F => self.interrupts.read_requested(),
            0xFF40..=0xFF4B => self.ppu.read_reg(addr),
            0xFF80..=0xFFFE => self.hram[(addr - 0xFF80) as usize],
            0xFFFF => self.interrupts.read_enabled(),
            _ => 0xFF,
        }
    }

    pub fn write_byte(&mut self, addr: u16, val: u8) {
        match addr {
            0x0000..=0x7FFF | 0xA000..=0xBFFF => {
                if let Some(cart) = self.cart.as_mut() {
                    cart.write(addr, val);
                }
            }
            0x8000..=0x9FFF => self.ppu.vram[(addr - 0x8000) as usize] = val,
            0xC000..=0xDFFF => self.wram[(addr - 0xC000) as usize] = val,
            0xE000..=0xFDFF => self.wram[(addr - 0xE000) as usize] = val,
            0xFE00..=0xFE9F => self.ppu.oam[(addr - 0xFE00) as usize] = val,
            0xFEA0..=0xFEFF => {}
            0xFF00 => self.joypad.write(val),
            0xFF01 | 0xFF02 => self.serial.write(addr, val, &mut self.interrupts),
            0xFF04..=0xFF07 => self.timer.write(addr, val, &mut self.interrupts),
            0xFF0F => self.interrupts.write_requested(val),
            0xFF46 => {
                self.ppu.write_reg(addr, val);
                self.oam_dma(val);
            }
            0xFF40..=0xFF4B => self.ppu.write_reg(addr, val),
            0xFF80..=0xFFFE => self.hram[(addr - 0xFF80) as usize] = val,
            0xFFFF => self.interrupts.write_enabled(val),
            _ => {}
        }
    }

    /// Copy 160 bytes from `val * 0x100` into OAM. Source reads go through
    /// the normal bus path so banking and echo aliasing apply.
    fn oam_dma(&mut self, val: u8) {
        let src = (val as u16) << 8;
        for i in 0..0xA0u16 {
            let byte = self.read_byte(src.wrapping_add(i));
            self.ppu.oam[i as usize] = byte;
        }
    }

    /// Catch the peripherals up after an instruction. Interrupts they raise
    /// become visible to the CPU's next step.
    pub fn advance(&mut self, cycles: u32) {
        self.timer.advance(cycles, &mut self.interrupts);
        self.ppu.advance(cycles, &mut self.interrupts);
    }

    /// Host-facing button update; raises the joypad interrupt on a selected
    /// press edge.
    pub fn set_button(&mut self, button: Button, pressed: bool) {
        if self.joypad.set_button(button, pressed) {
            self.interrupts.request(Interrupt::Joypad);
        }
    }

    pub fn take_serial(&mut self) -> Vec<u8> {
        self.serial.take_output()
    }
}

impl Default for Mmu {
    fn default() -> Self {
        Self::new()
    }
}
