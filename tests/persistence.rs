use std::fs;

use ricefield::{
    Action, Engine, GameConfig, ResourceKind, SaveBundle, SaveError, Side, list_saves, load_game,
    save_game, slot_path,
};

fn config(dir: &std::path::Path, seed: u64) -> GameConfig {
    GameConfig::default().with_seed(seed).with_data_dir(dir)
}

fn play(engine: &mut Engine, days: usize) {
    let script = [
        Action::CollectWater,
        Action::BuildPeasantHouse,
        Action::WaterRice,
        Action::CollectWater,
    ];
    for action in script.iter().cycle().take(days) {
        engine.perform_action(*action);
    }
}

#[test]
fn saved_game_resumes_where_it_left_off() {
    let dir = tempfile::tempdir().unwrap();
    let config = config(dir.path(), 17);
    let mut engine = Engine::new(&config);
    play(&mut engine, 6);

    let path = slot_path(dir.path(), "evening").unwrap();
    save_game(&path, &engine.export_bundle()).unwrap();

    let mut resumed = Engine::new(&config.clone().with_seed(99));
    resumed.import(load_game(&path).unwrap()).unwrap();

    assert_eq!(resumed.export(), engine.export());
    assert_eq!(resumed.day(), engine.day());
    assert_eq!(
        resumed.agent(Side::Player).resource(ResourceKind::Rice),
        engine.agent(Side::Player).resource(ResourceKind::Rice)
    );
    assert_eq!(resumed.statistics().total_days(), 1);
    assert_eq!(list_saves(dir.path()).unwrap(), vec!["evening"]);
}

#[test]
fn resumed_games_with_a_seed_continue_identically() {
    let dir = tempfile::tempdir().unwrap();
    let config = config(dir.path(), 5);
    let mut original = Engine::new(&config);
    play(&mut original, 3);
    let bundle = original.export_bundle();

    let mut a = Engine::new(&config);
    let mut b = Engine::new(&config);
    a.import(bundle.clone()).unwrap();
    b.import(bundle).unwrap();
    play(&mut a, 5);
    play(&mut b, 5);
    assert_eq!(a.export(), b.export());
}

#[test]
fn failed_load_leaves_the_running_game_alone() {
    let dir = tempfile::tempdir().unwrap();
    let mut engine = Engine::new(&config(dir.path(), 8));
    play(&mut engine, 2);
    let before = engine.export();

    let path = dir.path().join("broken.json");
    fs::write(&path, "not json").unwrap();
    assert!(matches!(load_game(&path), Err(SaveError::Parse { .. })));

    let mut bundle = SaveBundle::new(before.clone());
    bundle.checksum = "00".repeat(32);
    assert!(matches!(
        engine.import(bundle),
        Err(SaveError::ChecksumMismatch { .. })
    ));
    assert_eq!(engine.export(), before);
}

#[test]
fn bundle_is_human_readable_json() {
    let dir = tempfile::tempdir().unwrap();
    let engine = Engine::new(&config(dir.path(), 4));
    let path = dir.path().join("plain.json");
    save_game(&path, &engine.export_bundle()).unwrap();

    let text = fs::read_to_string(&path).unwrap();
    let value: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(value["version"], 1);
    assert_eq!(value["state"]["day"], 1);
    assert_eq!(value["checksum"].as_str().map(str::len), Some(64));
}
