use dotmatrix_core::cartridge::Cartridge;
use dotmatrix_core::interrupts::Interrupt;
use dotmatrix_core::joypad::Button;
use dotmatrix_core::mmu::Mmu;

fn mmu_with_cart(cart_type: u8, ram_code: u8, banks: usize) -> Mmu {
    let mut rom = vec![0u8; banks * 0x4000];
    rom[0x0147] = cart_type;
    rom[0x0149] = ram_code;
    let mut mmu = Mmu::new();
    mmu.load_cart(Cartridge::load(rom).unwrap());
    mmu
}

#[test]
fn every_address_is_readable() {
    // With no cartridge at all, the whole 64 KiB space must still answer.
    let mut mmu = Mmu::new();
    for addr in 0..=0xFFFFu16 {
        let _ = mmu.read_byte(addr);
    }

    let mut mmu = mmu_with_cart(0x00, 0x02, 2);
    for addr in 0..=0xFFFFu16 {
        let _ = mmu.read_byte(addr);
    }
}

#[test]
fn writes_never_fail() {
    let mut mmu = mmu_with_cart(0x00, 0x02, 2);
    for addr in 0..=0xFFFFu16 {
        mmu.write_byte(addr, 0xA5);
    }
}

#[test]
fn echo_ram_aliases_work_ram() {
    let mut mmu = Mmu::new();
    for addr in 0xE000..=0xFDFFu16 {
        mmu.write_byte(addr, addr as u8);
        assert_eq!(mmu.read_byte(addr), mmu.read_byte(addr - 0x2000));
    }
    for addr in 0xC000..=0xDDFFu16 {
        mmu.write_byte(addr, (addr >> 4) as u8);
        assert_eq!(mmu.read_byte(addr + 0x2000), mmu.read_byte(addr));
    }
}

#[test]
fn unusable_region_reads_ff_and_drops_writes() {
    let mut mmu = Mmu::new();
    for addr in 0xFEA0..=0xFEFFu16 {
        mmu.write_byte(addr, 0x12);
        assert_eq!(mmu.read_byte(addr), 0xFF);
    }
}

#[test]
fn rom_region_is_write_protected() {
    let mut mmu = mmu_with_cart(0x00, 0x00, 2);
    let before = mmu.read_byte(0x0123);
    mmu.write_byte(0x0123, before.wrapping_add(1));
    assert_eq!(mmu.read_byte(0x0123), before);
}

#[test]
fn missing_cartridge_reads_ff() {
    let mut mmu = Mmu::new();
    assert_eq!(mmu.read_byte(0x0000), 0xFF);
    assert_eq!(mmu.read_byte(0x4000), 0xFF);
    assert_eq!(mmu.read_byte(0xA000), 0xFF);
}

#[test]
fn hram_round_trip() {
    let mut mmu = Mmu::new();
    for addr in 0xFF80..=0xFFFEu16 {
        mmu.write_byte(addr, addr as u8);
    }
    for addr in 0xFF80..=0xFFFEu16 {
        assert_eq!(mmu.read_byte(addr), addr as u8);
    }
}

#[test]
fn if_and_ie_upper_bits_read_as_one() {
    let mut mmu = Mmu::new();
    mmu.write_byte(0xFF0F, 0x00);
    assert_eq!(mmu.read_byte(0xFF0F), 0xE0);
    mmu.write_byte(0xFF0F, 0x15);
    assert_eq!(mmu.read_byte(0xFF0F), 0xF5);

    mmu.write_byte(0xFFFF, 0x00);
    assert_eq!(mmu.read_byte(0xFFFF), 0xE0);
    mmu.write_byte(0xFFFF, 0x0A);
    assert_eq!(mmu.read_byte(0xFFFF), 0xEA);
}

#[test]
fn joypad_register_via_bus() {
    let mut mmu = Mmu::new();
    mmu.write_byte(0xFF00, 0x10); // select buttons
    assert_eq!(mmu.read_byte(0xFF00) & 0x0F, 0x0F);

    mmu.set_button(Button::A, true);
    assert_eq!(mmu.read_byte(0xFF00) & 0x0F, 0x0E);
    assert!(mmu.interrupts.is_pending(Interrupt::Joypad));

    // Only the select bits are writable.
    mmu.write_byte(0xFF00, 0xFF);
    assert_eq!(mmu.read_byte(0xFF00), 0xFF);
}

#[test]
fn serial_transfer_via_bus() {
    let mut mmu = Mmu::new();
    mmu.write_byte(0xFF0F, 0x00);
    mmu.write_byte(0xFF01, b'X');
    mmu.write_byte(0xFF02, 0x81);
    assert_eq!(mmu.take_serial(), vec![b'X']);
    assert_eq!(mmu.read_byte(0xFF02), 0x00);
    assert!(mmu.interrupts.is_pending(Interrupt::Serial));
}

#[test]
fn ly_write_resets_counter() {
    let mut mmu = Mmu::new();
    mmu.advance(456 * 7);
    assert_eq!(mmu.read_byte(0xFF44), 7);
    mmu.write_byte(0xFF44, 0x55);
    assert_eq!(mmu.read_byte(0xFF44), 0);
}

#[test]
fn oam_dma_copies_from_work_ram() {
    let mut mmu = Mmu::new();
    for i in 0..0xA0u16 {
        mmu.write_byte(0xC000 + i, i as u8);
    }
    mmu.write_byte(0xFF46, 0xC0);
    for i in 0..0xA0u16 {
        assert_eq!(mmu.read_byte(0xFE00 + i), i as u8);
    }
    // The DMA register reads back the last written value.
    assert_eq!(mmu.read_byte(0xFF46), 0xC0);
}

#[test]
fn oam_dma_source_honors_echo_aliasing() {
    let mut mmu = Mmu::new();
    mmu.write_byte(0xC000, 0x77);
    mmu.write_byte(0xFF46, 0xE0); // echo of 0xC000
    assert_eq!(mmu.read_byte(0xFE00), 0x77);
}

#[test]
fn timer_registers_via_bus() {
    let mut mmu = Mmu::new();
    mmu.write_byte(0xFF07, 0x05);
    assert_eq!(mmu.read_byte(0xFF07), 0xF8 | 0x05);

    mmu.write_byte(0xFF04, 0x99);
    assert_eq!(mmu.read_byte(0xFF04), 0);
}

#[test]
fn unmapped_io_reads_ff() {
    let mut mmu = Mmu::new();
    for addr in [0xFF03u16, 0xFF08, 0xFF10, 0xFF30, 0xFF4C, 0xFF7F] {
        assert_eq!(mmu.read_byte(addr), 0xFF);
    }
}

#[test]
fn mbc1_bank_switching_via_bus() {
    let mut rom = vec![0u8; 64 * 0x4000];
    rom[0x0147] = 0x01;
    for bank in 0..64 {
        rom[bank * 0x4000 + 0x2000] = bank as u8;
    }
    let mut mmu = Mmu::new();
    mmu.load_cart(Cartridge::load(rom).unwrap());

    assert_eq!(mmu.read_byte(0x6000), 1);
    mmu.write_byte(0x2000, 0x05);
    assert_eq!(mmu.read_byte(0x6000), 5);
}

#[test]
fn cartridge_ram_via_bus() {
    let mut mmu = mmu_with_cart(0x03, 0x02, 2); // MBC1+RAM+Battery, 8 KiB
    mmu.write_byte(0x0000, 0x0A); // enable RAM
    mmu.write_byte(0xA000, 0x55);
    mmu.write_byte(0xBFFF, 0xAA);
    assert_eq!(mmu.read_byte(0xA000), 0x55);
    assert_eq!(mmu.read_byte(0xBFFF), 0xAA);

    mmu.write_byte(0x0000, 0x00); // disable RAM
    assert_eq!(mmu.read_byte(0xA000), 0xFF);
}

#[test]
fn peripheral_interrupts_surface_through_advance() {
    let mut mmu = Mmu::new();
    mmu.write_byte(0xFF0F, 0x00);

    // One full frame raises VBLANK.
    mmu.advance(70_224);
    assert!(mmu.interrupts.is_pending(Interrupt::VBlank));

    // Enable the timer at its fastest rate and overflow TIMA.
    mmu.write_byte(0xFF07, 0x05);
    mmu.write_byte(0xFF05, 0xFF);
    mmu.advance(32);
    assert!(mmu.interrupts.is_pending(Interrupt::Timer));
}
