//! Persistence Tests
//!
//! Tests verify:
//! - Dump file layout (decimal keys, `0` for empty cells)
//! - Dump then load reproduces every cell
//! - Missing, corrupt or out-of-range dumps fall back to an empty grid
//! - Dumps replace the previous file

use std::fs;

use heartgrid::grid::{Grid, DATA_GRID_MAX};
use heartgrid::HeartGridError;
use serde_json::Value;
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn setup_dump_path() -> (TempDir, std::path::PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("grid.json");
    (temp_dir, path)
}

// =============================================================================
// Dump Tests
// =============================================================================

#[test]
fn test_dump_layout() {
    let (_dir, path) = setup_dump_path();
    let grid = Grid::new();
    grid.write(DATA_GRID_MAX - 1, "zA").unwrap();

    grid.dump(&path).unwrap();

    let json: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    let object = json.as_object().unwrap();
    assert_eq!(object.len(), DATA_GRID_MAX);
    assert_eq!(object["0"], Value::from("A"));
    assert_eq!(object["1"], Value::from(0));
    assert_eq!(object["65534"], Value::from("z"));
    assert!(object.get("65535").is_none());
}

#[test]
fn test_dump_replaces_previous_file() {
    let (_dir, path) = setup_dump_path();
    fs::write(&path, "stale contents that are not json").unwrap();

    let grid = Grid::new();
    grid.write(1, "new").unwrap();
    grid.dump(&path).unwrap();

    let restored = Grid::try_load(&path).unwrap();
    assert_eq!(restored.read(1, 3).unwrap(), "new");
}

#[test]
fn test_dump_leaves_no_temp_files() {
    let (dir, path) = setup_dump_path();
    let grid = Grid::new();
    grid.dump(&path).unwrap();
    grid.dump(&path).unwrap();

    let entries: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
    assert_eq!(entries.len(), 1);
}

#[test]
fn test_dump_into_missing_directory_fails() {
    let (dir, _) = setup_dump_path();
    let path = dir.path().join("nope").join("grid.json");

    assert!(matches!(Grid::new().dump(&path), Err(HeartGridError::Io(_))));
}

#[cfg(unix)]
#[test]
fn test_new_dump_is_world_readable() {
    use std::os::unix::fs::PermissionsExt;

    let (_dir, path) = setup_dump_path();
    Grid::new().dump(&path).unwrap();

    let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
    assert_eq!(mode, 0o644);
}

#[cfg(unix)]
#[test]
fn test_dump_keeps_existing_permissions() {
    use std::os::unix::fs::PermissionsExt;

    let (_dir, path) = setup_dump_path();
    fs::write(&path, "{}").unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o640)).unwrap();

    let grid = Grid::new();
    grid.write(0, "p").unwrap();
    grid.dump(&path).unwrap();

    let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
    assert_eq!(mode, 0o640);
    assert_eq!(Grid::try_load(&path).unwrap().read(0, 1).unwrap(), "p");
}

// =============================================================================
// Load Tests
// =============================================================================

#[test]
fn test_dump_then_load_is_identity() {
    let (_dir, path) = setup_dump_path();
    let grid = Grid::new();
    grid.write(0, "first").unwrap();
    grid.write(30000, "m1ddle").unwrap();
    grid.write(DATA_GRID_MAX - 2, "wrap").unwrap();
    grid.write(500, "0").unwrap();

    grid.dump(&path).unwrap();
    let restored = Grid::load(&path);

    assert_eq!(restored.snapshot(), grid.snapshot());
    assert_eq!(restored.read(DATA_GRID_MAX - 2, 4).unwrap(), "wrap");
    assert_eq!(restored.occupied(), grid.occupied());
}

#[test]
fn test_load_missing_file_gives_empty_grid() {
    let (_dir, path) = setup_dump_path();
    let grid = Grid::load(&path);
    assert_eq!(grid.occupied(), 0);
}

#[test]
fn test_load_corrupt_file_gives_empty_grid() {
    let (_dir, path) = setup_dump_path();
    fs::write(&path, "{\"0\": \"a\", ").unwrap();

    assert!(Grid::try_load(&path).is_err());
    assert_eq!(Grid::load(&path).occupied(), 0);
}

#[test]
fn test_load_rejects_bad_keys_and_values() {
    let (_dir, path) = setup_dump_path();
    let cases = [
        r#"{"65535": "a"}"#,
        r#"{"-1": "a"}"#,
        r#"{"abc": "a"}"#,
        r#"{"0": "ab"}"#,
        r#"{"0": 7}"#,
        r#"{"0": "\u0007"}"#,
        r#"["a", "b"]"#,
    ];

    for case in cases {
        fs::write(&path, case).unwrap();
        assert!(Grid::try_load(&path).is_err(), "accepted {}", case);
        assert_eq!(Grid::load(&path).occupied(), 0);
    }
}

#[test]
fn test_load_accepts_falsy_placeholders_and_sparse_files() {
    let (_dir, path) = setup_dump_path();
    fs::write(
        &path,
        r#"{"0": "h", "1": 0, "2": false, "3": null, "4": "", "5": "i"}"#,
    )
    .unwrap();

    let grid = Grid::try_load(&path).unwrap();
    assert_eq!(grid.read(0, 7).unwrap(), "h0000i0");
    assert_eq!(grid.occupied(), 2);
}

#[test]
fn test_open_without_path_is_empty() {
    assert_eq!(Grid::open(None).occupied(), 0);
}

#[test]
fn test_open_with_path_restores() {
    let (_dir, path) = setup_dump_path();
    let grid = Grid::new();
    grid.write(9, "kept").unwrap();
    grid.dump(&path).unwrap();

    assert_eq!(Grid::open(Some(&path)).read(9, 4).unwrap(), "kept");
}
