use std::error::Error;

use clap::Parser;

use chip8_scope::display::{DisplayRenderer, GridGeometry};
use chip8_scope::engine::Engine;
use chip8_scope::input::CrosstermInput;
use chip8_scope::machine::{Chip8, Machine};
use chip8_scope::rom::{DirRomStore, RomStore, TEST_ROM};
use chip8_scope::term::TermSurface;

#[derive(Parser)]
#[command(name = "chip8-scope")]
#[command(about = "Live state inspector for a CHIP-8 style machine")]
struct Args {
    /// ROM to fetch from the store, as <family>/<name>
    rom: Option<String>,

    /// directory the ROM store serves from
    #[arg(long, default_value = "roms")]
    roms_dir: String,

    /// machine ticks per frame
    #[arg(long, default_value_t = 4)]
    speed: u32,

    /// virtual pixels per display cell
    #[arg(long, default_value_t = 1)]
    cell_size: usize,

    /// draw grid lines between cells
    #[arg(long)]
    grid: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Warn)
        .init();

    let args = Args::parse();

    let mut machine = Chip8::new();
    let rom = match &args.rom {
        Some(selector) => {
            let (family, name) = selector
                .split_once('/')
                .ok_or("ROM must be given as <family>/<name>")?;
            match DirRomStore::new(&args.roms_dir).fetch(family, name) {
                Ok(bytes) => bytes,
                Err(e) => {
                    // a failed fetch falls back to the built-in demo
                    log::error!("{}", e);
                    TEST_ROM.to_vec()
                }
            }
        }
        None => TEST_ROM.to_vec(),
    };
    machine.load_rom(&rom);

    let geometry = GridGeometry::new(
        machine.display_width(),
        machine.display_height(),
        args.cell_size.max(1),
    );
    let renderer = DisplayRenderer::new(geometry, args.grid);
    let mut surface = TermSurface::new(geometry)?;
    let mut input = CrosstermInput::new()?;

    let mut engine = Engine::new(&mut machine, &mut surface, &mut input, renderer, args.speed);
    engine.run()?;

    // shove some newlines at the terminal so the shell prompt doesn't
    // land on the last frame
    for _ in 0..4 {
        println!();
    }
    Ok(())
}
