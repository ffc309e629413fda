use std::io::{self, Write};
use std::process::ExitCode;
use std::time::{Duration, Instant};

use clap::Parser;
use log::{error, info};

use dotmatrix_core::cartridge::Cartridge;
use dotmatrix_core::gameboy::GameBoy;

const GB_FPS: f64 = 59.7275;
const FRAME_TIME: Duration = Duration::from_nanos((1e9_f64 / GB_FPS) as u64);

#[derive(Parser)]
struct Args {
    /// Path to ROM file
    rom: std::path::PathBuf,

    /// Number of frames to run before exiting
    #[arg(long)]
    frames: Option<u64>,

    /// Number of seconds to run before exiting
    #[arg(long)]
    seconds: Option<u64>,

    /// Number of CPU cycles to run before exiting
    #[arg(long)]
    cycles: Option<u64>,

    /// Run as fast as possible instead of pacing to ~60 Hz
    #[arg(long)]
    no_pacing: bool,

    /// Periodically log CPU state
    #[arg(long)]
    debug: bool,
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    let cart = match Cartridge::from_file(&args.rom) {
        Ok(cart) => cart,
        Err(e) => {
            error!("failed to load {}: {e}", args.rom.display());
            return ExitCode::FAILURE;
        }
    };

    let mut gb = GameBoy::new();
    gb.load_cart(cart);
    info!("emulator initialized");

    match run(&mut gb, &args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(gb: &mut GameBoy, args: &Args) -> Result<(), dotmatrix_core::error::CoreError> {
    let second_limit = args.seconds.map(Duration::from_secs);
    let start = Instant::now();
    let mut frame_count = 0u64;
    let mut next_frame = Instant::now() + FRAME_TIME;

    loop {
        gb.run_frame()?;
        frame_count += 1;

        let serial = gb.mmu.take_serial();
        if !serial.is_empty() {
            let stdout = io::stdout();
            let mut out = stdout.lock();
            let _ = out.write_all(&serial);
            let _ = out.flush();
        }

        if args.debug && frame_count % 60 == 0 {
            info!("{}", gb.cpu.debug_state());
        }

        if let Some(max) = args.frames {
            if frame_count >= max {
                break;
            }
        }
        if let Some(max) = args.cycles {
            if gb.cpu.cycles >= max {
                break;
            }
        }
        if let Some(limit) = second_limit {
            if start.elapsed() >= limit {
                break;
            }
        }

        // Best-effort pacing; dropped frames are fine.
        if !args.no_pacing {
            let now = Instant::now();
            if next_frame > now {
                std::thread::sleep(next_frame - now);
            }
            next_frame += FRAME_TIME;
        }
    }

    info!(
        "stopped after {frame_count} frames ({} cycles)",
        gb.cpu.cycles
    );
    Ok(())
}
