//! Command-line front end: generate a level, print stats, optionally render
//! an ASCII preview or save the grid as a level file.

use cavern::{
    config, CaveGenerator, CavernResult, EmptyGenerator, FileReaderGenerator, GenerationConfig,
    Level, MapGenerator, Position, TileType,
};
use clap::{Parser, ValueEnum};
use log::info;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "cavern", version, about = "Procedural cave-level generator")]
struct Args {
    /// Generation seed; random when omitted.
    #[arg(long)]
    seed: Option<u64>,

    /// Playable width, before the sealed border is added.
    #[arg(long, default_value_t = config::DEFAULT_LEVEL_WIDTH)]
    width: usize,

    /// Playable height, before the sealed border is added.
    #[arg(long, default_value_t = config::DEFAULT_LEVEL_HEIGHT)]
    height: usize,

    /// Difficulty tier driving spawner counts.
    #[arg(long, default_value_t = 3)]
    difficulty: u32,

    /// Which generator to run (ignored with --load).
    #[arg(long, value_enum, default_value_t = GeneratorKind::Cave)]
    generator: GeneratorKind,

    /// Load a level file instead of generating.
    #[arg(long)]
    load: Option<PathBuf>,

    /// Save the generated grid as a level file.
    #[arg(long)]
    save: Option<PathBuf>,

    /// Print an ASCII rendering of the level.
    #[arg(long)]
    preview: bool,

    /// Log filter (error, warn, info, debug, trace).
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[derive(Clone, Copy, ValueEnum)]
enum GeneratorKind {
    Cave,
    Empty,
}

fn main() -> CavernResult<()> {
    let args = Args::parse();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(args.log_level.as_str()))
        .init();

    let seed = args.seed.unwrap_or_else(rand::random);
    let config = GenerationConfig::new(seed);

    let mut generator: Box<dyn MapGenerator> = match &args.load {
        Some(path) => Box::new(FileReaderGenerator::new(path)),
        None => match args.generator {
            GeneratorKind::Cave => Box::new(CaveGenerator::new(args.width, args.height, config)),
            GeneratorKind::Empty => Box::new(EmptyGenerator::new(args.width, args.height, config)),
        },
    };

    let level = Level::new(generator.as_mut(), args.difficulty)?;
    report(&level, seed);

    if let Some(path) = &args.save {
        cavern::write_level_file(path, &level.grid)?;
        info!("saved level to {}", path.display());
    }
    if args.preview {
        print!("{}", render(&level));
    }

    Ok(())
}

fn report(level: &Level, seed: u64) {
    let grid = &level.grid;
    info!(
        "level ready: {}x{}, seed {}, difficulty {}",
        grid.width(),
        grid.height(),
        seed,
        level.difficulty
    );
    info!(
        "floor {} | gold {} | heal {} | spawners {}/{}/{}",
        grid.count(TileType::Floor),
        grid.count(TileType::GoldOre),
        grid.count(TileType::HealOre),
        level.fighter_spawners,
        level.suicider_spawners,
        level.bomber_spawners
    );

    let path = level.find_path(level.player_start, level.exit);
    if path.is_empty() {
        info!("exit not reachable without digging");
    } else {
        info!("start to exit: {} steps", path.len() - 1);
    }
}

fn render(level: &Level) -> String {
    let grid = &level.grid;
    let mut out = String::with_capacity(grid.height() * (grid.width() + 1));
    for (y, row) in grid.rows().iter().enumerate() {
        for (x, &tile) in row.iter().enumerate() {
            let pos = Position::new(x as i32, y as i32);
            let glyph = if pos == level.player_start {
                '@'
            } else if pos == level.exit {
                '>'
            } else {
                glyph_for(tile)
            };
            out.push(glyph);
        }
        out.push('\n');
    }
    out
}

fn glyph_for(tile: TileType) -> char {
    match tile {
        TileType::Floor => '.',
        TileType::Wall => '#',
        TileType::DestroyableWall => 'D',
        TileType::Blockage => '%',
        TileType::GoldOre => '$',
        TileType::HealOre => '+',
        TileType::Player => '@',
        TileType::Exit => '>',
        TileType::PortalRed
        | TileType::PortalGreen
        | TileType::PortalBlue
        | TileType::PortalMagenta
        | TileType::PortalCyan
        | TileType::PortalYellow => 'O',
        TileType::EnemyFighter | TileType::EnemySuicider | TileType::EnemyBomber => 'e',
        TileType::EnemyFlagman => 'g',
        TileType::EnemyFighterSpawner => 'F',
        TileType::EnemySuiciderSpawner => 'S',
        TileType::EnemyBomberSpawner => 'B',
    }
}
