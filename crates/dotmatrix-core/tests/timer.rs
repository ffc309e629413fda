use dotmatrix_core::interrupts::{Interrupt, InterruptController};
use dotmatrix_core::timer::Timer;

fn fresh() -> (Timer, InterruptController) {
    let mut timer = Timer::new();
    timer.div = 0;
    let mut ints = InterruptController::new();
    ints.write_requested(0);
    (timer, ints)
}

#[test]
fn div_increments_every_256_cycles() {
    let (mut timer, mut ints) = fresh();
    timer.advance(256, &mut ints);
    assert_eq!(timer.read(0xFF04), 1);
    assert_eq!(ints.pending(), 0);
}

#[test]
fn div_resets_on_write() {
    let (mut timer, mut ints) = fresh();
    timer.div = 0xABCD;
    timer.write(0xFF04, 0x12, &mut ints);
    assert_eq!(timer.read(0xFF04), 0);
    assert_eq!(timer.div, 0);
}

#[test]
fn div_reset_edge_ticks_tima() {
    let (mut timer, mut ints) = fresh();
    timer.div = 0x0200; // selected bit (9) high
    timer.write(0xFF07, 0x04, &mut ints); // enable, 4096 Hz
    timer.write(0xFF04, 0, &mut ints); // reset DIV -> falling edge
    assert_eq!(timer.tima, 1);
}

#[test]
fn tac_disable_edge_ticks_tima() {
    let (mut timer, mut ints) = fresh();
    timer.div = 0x0200;
    timer.write(0xFF07, 0x04, &mut ints);
    timer.write(0xFF07, 0x00, &mut ints); // disable -> falling edge
    assert_eq!(timer.tima, 1);
}

#[test]
fn tima_increments_and_overflows() {
    let (mut timer, mut ints) = fresh();
    timer.write(0xFF07, 0x04, &mut ints); // enable, 4096 Hz (bit 9)
    timer.advance(1024, &mut ints);
    assert_eq!(timer.tima, 1);
    assert_eq!(ints.pending(), 0);

    timer.tima = 0xFF;
    timer.tma = 0xAB;
    timer.advance(1024, &mut ints);
    assert_eq!(timer.tima, 0xAB);
    assert!(ints.is_pending(Interrupt::Timer));
}

#[test]
fn disabled_timer_never_ticks() {
    let (mut timer, mut ints) = fresh();
    timer.write(0xFF07, 0x00, &mut ints);
    timer.advance(0x10000, &mut ints);
    assert_eq!(timer.tima, 0);
    assert!(!ints.is_pending(Interrupt::Timer));
    // DIV keeps counting regardless.
    assert_eq!(timer.div, 0);
    assert_eq!(timer.read(0xFF04), 0);
}

#[test]
fn all_four_rates() {
    // TAC & 3 selects DIV bit 9/3/5/7; a full TIMA period is twice the bit
    // period in cycles.
    for (sel, period) in [(0u8, 1024u32), (1, 16), (2, 64), (3, 256)] {
        let (mut timer, mut ints) = fresh();
        timer.write(0xFF07, 0x04 | sel, &mut ints);
        timer.advance(period * 16, &mut ints);
        assert_eq!(timer.tima, 16, "TAC select {sel}");
    }
}

#[test]
fn tac_reads_with_upper_bits_set() {
    let (mut timer, _) = fresh();
    assert_eq!(timer.read(0xFF07), 0xF8);
    let mut ints = InterruptController::new();
    timer.write(0xFF07, 0x07, &mut ints);
    assert_eq!(timer.read(0xFF07), 0xFF);
}
