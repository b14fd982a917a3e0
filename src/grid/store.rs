//! Grid storage
//!
//! The cell array behind a single mutex.

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use parking_lot::Mutex;
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use tempfile::NamedTempFile;

use crate::error::{GridError, HeartGridError, Result};

use super::{is_printable, Cell, DATA_GRID_MAX, INPUT_MAX, REQUEST_MAX};

/// The addressable grid
///
/// ## Concurrency:
/// - `cells`: one coarse Mutex, no reader/writer distinction
/// - `write`, `read` and the dump snapshot hold it for their whole duration,
///   so each call is atomic with respect to every other
/// - All methods use `&self`; share it as `Arc<Grid>`
pub struct Grid {
    cells: Mutex<Box<[Cell]>>,
}

impl Grid {
    /// Create a grid with every cell empty
    pub fn new() -> Self {
        Self {
            cells: Mutex::new(vec![Cell::Empty; DATA_GRID_MAX].into_boxed_slice()),
        }
    }

    /// Restore from `path` when one is given, otherwise start empty
    pub fn open(path: Option<&Path>) -> Self {
        match path {
            Some(path) => Self::load(path),
            None => Self::new(),
        }
    }

    /// Restore a grid from a dump file, falling back to an empty grid
    ///
    /// A missing, unreadable or malformed file is never fatal.
    pub fn load(path: &Path) -> Self {
        match Self::try_load(path) {
            Ok(grid) => {
                tracing::info!(
                    "Restored grid from {} ({} cells occupied)",
                    path.display(),
                    grid.occupied()
                );
                grid
            }
            Err(HeartGridError::Io(ref e)) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!("No dump at {}, starting with an empty grid", path.display());
                Self::new()
            }
            Err(e) => {
                tracing::warn!(
                    "Discarding dump {}: {}; starting with an empty grid",
                    path.display(),
                    e
                );
                Self::new()
            }
        }
    }

    /// Strict restore: any I/O, parse or content problem is an error
    ///
    /// Addresses absent from the file load as empty.
    pub fn try_load(path: &Path) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        let image: HashMap<String, Cell> = serde_json::from_reader(reader)?;

        let mut cells = vec![Cell::Empty; DATA_GRID_MAX].into_boxed_slice();
        for (key, cell) in image {
            let address = parse_dump_key(&key)?;
            if let Cell::Char(c) = cell {
                if !is_printable(c) {
                    return Err(HeartGridError::Persistence(format!(
                        "unprintable character {} at address {}",
                        c.escape_unicode(),
                        address
                    )));
                }
            }
            cells[address] = cell;
        }

        Ok(Self {
            cells: Mutex::new(cells),
        })
    }

    /// Write `payload` starting at `address`, wrapping past the last cell
    ///
    /// Validation happens before the first cell changes: a rejected payload
    /// leaves the grid untouched.
    pub fn write(&self, address: usize, payload: &str) -> std::result::Result<(), GridError> {
        if address >= DATA_GRID_MAX {
            return Err(GridError::OutOfRange);
        }
        if payload.chars().count() >= INPUT_MAX {
            return Err(GridError::PayloadTooLong);
        }
        if let Some(bad) = payload.chars().find(|c| !is_printable(*c)) {
            return Err(GridError::InvalidCharacter(bad));
        }

        let mut cells = self.cells.lock();
        let mut dest = address;
        for c in payload.chars() {
            cells[dest] = Cell::Char(c);
            dest = (dest + 1) % DATA_GRID_MAX;
        }

        Ok(())
    }

    /// Read `length` cells starting at `address`, wrapping past the last cell
    ///
    /// Empty cells come back as `'0'`.
    pub fn read(&self, address: usize, length: usize) -> std::result::Result<String, GridError> {
        if address >= DATA_GRID_MAX {
            return Err(GridError::OutOfRange);
        }
        if length >= REQUEST_MAX {
            return Err(GridError::LengthTooLong);
        }

        let cells = self.cells.lock();
        let value = (0..length)
            .map(|offset| cells[(address + offset) % DATA_GRID_MAX].render())
            .collect();

        Ok(value)
    }

    /// Serialize the whole grid to `path`
    ///
    /// The cells are copied under the lock, so a dump never sees half of a
    /// multi-cell write. The file is replaced atomically: the JSON goes to a
    /// temp file in the same directory which is then renamed over `path`.
    /// An existing dump keeps its permissions; a new one is created 0644 on
    /// unix rather than the temp file's 0600.
    pub fn dump(&self, path: &Path) -> Result<()> {
        let cells = self.snapshot();

        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut tmp = NamedTempFile::new_in(dir)?;
        {
            let mut writer = BufWriter::new(&mut tmp);
            serde_json::to_writer(&mut writer, &GridImage(&cells))?;
            writer.flush()?;
        }
        let perms = dump_permissions(path, tmp.as_file())?;
        tmp.as_file().set_permissions(perms)?;
        tmp.as_file().sync_all()?;
        tmp.persist(path).map_err(|e| HeartGridError::Io(e.error))?;

        tracing::debug!("Dumped {} cells to {}", cells.len(), path.display());
        Ok(())
    }

    /// Copy of every cell, taken under the lock
    pub fn snapshot(&self) -> Vec<Cell> {
        self.cells.lock().to_vec()
    }

    /// Number of addressable cells
    pub fn capacity(&self) -> usize {
        DATA_GRID_MAX
    }

    /// Number of non-empty cells
    pub fn occupied(&self) -> usize {
        self.cells.lock().iter().filter(|c| !c.is_empty()).count()
    }
}

impl Default for Grid {
    fn default() -> Self {
        Self::new()
    }
}

/// Permissions for a dump about to replace `path`
fn dump_permissions(path: &Path, tmp: &File) -> Result<fs::Permissions> {
    match fs::metadata(path) {
        Ok(meta) => Ok(meta.permissions()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            #[allow(unused_mut)]
            let mut perms = tmp.metadata()?.permissions();
            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                perms.set_mode(0o644);
            }
            Ok(perms)
        }
        Err(e) => Err(e.into()),
    }
}

/// Dump key → address. Keys are plain decimal strings in `[0, N)`.
fn parse_dump_key(key: &str) -> Result<usize> {
    let address = key
        .bytes()
        .all(|b| b.is_ascii_digit())
        .then(|| key.parse::<usize>().ok())
        .flatten()
        .ok_or_else(|| HeartGridError::Persistence(format!("invalid address key {:?}", key)))?;

    if address >= DATA_GRID_MAX {
        return Err(HeartGridError::Persistence(format!(
            "address key {} out of range",
            address
        )));
    }

    Ok(address)
}

/// JSON object view of the cells: `{"0": <cell>, "1": <cell>, ...}`
struct GridImage<'a>(&'a [Cell]);

impl Serialize for GridImage<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (address, cell) in self.0.iter().enumerate() {
            map.serialize_entry(&address.to_string(), cell)?;
        }
        map.end()
    }
}
