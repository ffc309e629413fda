use crate::{cartridge::Cartridge, cpu::Cpu, error::CoreError, mmu::Mmu};

/// Master clock rate: 4.194304 MHz.
pub const CLOCK_HZ: u32 = 4_194_304;
/// Clock ticks per LCD frame (154 lines of 456 dots).
pub const CYCLES_PER_FRAME: u32 = 70_224;

/// The assembled machine: CPU plus bus, stepped in lock-step.
///
/// After each instruction the peripherals are caught up by the cycle count
/// the CPU reports, so an interrupt a peripheral raises during instruction N
/// is visible to the CPU's step N+1.
pub struct GameBoy {
    pub cpu: Cpu,
    pub mmu: Mmu,
}

impl GameBoy {
    pub fn new() -> Self {
        Self {
            cpu: Cpu::new(),
            mmu: Mmu::new(),
        }
    }

    pub fn load_cart(&mut self, cart: Cartridge) {
        self.mmu.load_cart(cart);
    }

    /// Load a raw ROM image, replacing any loaded cartridge.
    pub fn load_rom(&mut self, data: Vec<u8>) -> Result<(), CoreError> {
        let cart = Cartridge::load(data)?;
        self.mmu.load_cart(cart);
        Ok(())
    }

    /// Execute one instruction and catch the peripherals up. A latched
    /// illegal-opcode fault surfaces as an error.
    pub fn step(&mut self) -> Result<u32, CoreError> {
        let cycles = self.cpu.step(&mut self.mmu);
        self.mmu.advance(cycles);
        match self.cpu.fault() {
            Some(fault) => Err(CoreError::IllegalOpcode {
                opcode: fault.opcode,
                addr: fault.addr,
            }),
            None => Ok(cycles),
        }
    }

    /// Run one frame's worth of cycles (~1/60 s). Returns the ticks actually
    /// elapsed, which may overshoot by one instruction.
    pub fn run_frame(&mut self) -> Result<u32, CoreError> {
        let mut elapsed = 0;
        while elapsed < CYCLES_PER_FRAME {
            elapsed += self.step()?;
        }
        Ok(elapsed)
    }

    /// Reset to the power-on state, preserving the loaded cartridge, the
    /// installed serial sink and the buttons the host is still holding.
    pub fn reset(&mut self) {
        let cart = self.mmu.cart.take();
        let sink = self.mmu.serial.take_sink();
        let mut joypad = std::mem::take(&mut self.mmu.joypad);
        joypad.reset();

        self.cpu = Cpu::new();
        self.mmu = Mmu::new();
        if let Some(c) = cart {
            self.mmu.load_cart(c);
        }
        self.mmu.serial.connect(sink);
        self.mmu.joypad = joypad;
    }
}

impl Default for GameBoy {
    fn default() -> Self {
        Self::new()
    }
}
