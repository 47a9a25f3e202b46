//! Integration tests for the binary level-file format.

use cavern::config::{MIN_HEIGHT, MIN_WIDTH};
use cavern::{
    load_level_file, read_level_file, write_level_file, CaveGenerator, FileReaderGenerator,
    GenerationConfig, Level, TileType,
};
use std::fs;

#[test]
fn generated_level_survives_a_save_and_load() {
    let mut gen = CaveGenerator::new(40, 40, GenerationConfig::for_testing(8));
    let level = Level::new(&mut gen, 2).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cave.lvl");
    write_level_file(&path, &level.grid).unwrap();

    let loaded = load_level_file(&path).unwrap();
    assert_eq!(loaded, level.grid);
}

#[test]
fn saved_level_replays_through_the_file_generator() {
    let mut gen = CaveGenerator::new(40, 40, GenerationConfig::for_testing(9));
    let level = Level::new(&mut gen, 0).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cave.lvl");
    write_level_file(&path, &level.grid).unwrap();

    let mut reader = FileReaderGenerator::new(&path);
    let replayed = Level::new(&mut reader, 0).unwrap();

    // Markers were normalized before saving, so the reader stamps fresh ones;
    // terrain and ore must match exactly.
    assert_eq!(replayed.grid.count(TileType::Wall), level.grid.count(TileType::Wall));
    assert_eq!(
        replayed.grid.count(TileType::GoldOre),
        level.grid.count(TileType::GoldOre)
    );
    assert_eq!(replayed.grid.width(), level.grid.width());
}

#[test]
fn garbage_file_falls_back_to_minimal_grid() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("garbage.lvl");
    fs::write(&path, b"this is not a level file").unwrap();

    assert!(load_level_file(&path).is_err());

    let grid = read_level_file(&path);
    assert_eq!(grid.width(), MIN_WIDTH);
    assert_eq!(grid.height(), MIN_HEIGHT);
    assert_eq!(grid.count(TileType::Floor), MIN_WIDTH * MIN_HEIGHT);
}
