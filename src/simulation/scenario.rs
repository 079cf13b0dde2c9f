//! Scenario configuration
//!
//! A scenario describes the grid, road layout, lights, parking lots and the
//! vehicles to create. Scenarios are plain JSON documents; the `downtown`
//! scenario ships with the crate.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

use super::types::{Cell, Direction, DirectionSet, LightPhase};

const DOWNTOWN_JSON: &str = include_str!("../../scenarios/downtown.json");

/// Layout token for a cell without road
pub const EMPTY_TOKEN: &str = ".";

/// Layout token for an obstacle cell
pub const OBSTACLE_TOKEN: &str = "#";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("grid must be at least 1x1, got {width}x{height}")]
    InvalidDimensions { width: i32, height: i32 },

    #[error("layout has {got} rows, expected {expected}")]
    LayoutRowCount { expected: usize, got: usize },

    #[error("layout row {row} has {got} cells, expected {expected}")]
    LayoutRowWidth {
        row: usize,
        expected: usize,
        got: usize,
    },

    #[error("unknown layout token {token:?} at row {row}, column {column}")]
    UnknownLayoutToken {
        row: usize,
        column: usize,
        token: String,
    },

    #[error("{what} at {cell} lies outside the grid")]
    OutOfBounds { what: &'static str, cell: Cell },

    #[error("{what} at {cell} sits on an obstacle")]
    OnObstacle { what: &'static str, cell: Cell },

    #[error("two parking lots share position {0}")]
    DuplicateLot(Cell),

    #[error("invalid scenario JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to read scenario: {0}")]
    Io(#[from] std::io::Error),
}

/// A traffic light and the phase it starts in
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LightSpec {
    pub x: i32,
    pub y: i32,
    pub phase: LightPhase,
}

impl LightSpec {
    pub fn cell(&self) -> Cell {
        Cell::new(self.x, self.y)
    }
}

/// The street cell a lot is entered from, with the turn(s) into the lot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntrySpec {
    pub x: i32,
    pub y: i32,
    pub directions: Vec<Direction>,
}

impl EntrySpec {
    pub fn cell(&self) -> Cell {
        Cell::new(self.x, self.y)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LotSpec {
    pub x: i32,
    pub y: i32,
    /// Directions a vehicle may take out of the lot
    #[serde(default)]
    pub exit: Vec<Direction>,
    #[serde(default)]
    pub entry: Option<EntrySpec>,
}

impl LotSpec {
    pub fn cell(&self) -> Cell {
        Cell::new(self.x, self.y)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub name: String,
    pub width: i32,
    pub height: i32,
    /// One row of whitespace-separated tokens per grid row, top row first
    pub layout: Vec<String>,
    #[serde(default)]
    pub obstacles: Vec<Cell>,
    #[serde(default)]
    pub lights: Vec<LightSpec>,
    #[serde(default)]
    pub lots: Vec<LotSpec>,
    /// Spaces to spread across all lots; defaults to the vehicle count
    #[serde(default)]
    pub capacity_pool: Option<u32>,
    /// Vehicles to create; defaults to the number of assignments
    #[serde(default)]
    pub vehicle_count: Option<usize>,
    /// (origin lot index, destination lot index) per vehicle
    #[serde(default)]
    pub assignments: Vec<(usize, usize)>,
    /// Shuffle vehicle activation every tick with this seed
    #[serde(default)]
    pub seed: Option<u64>,
}

/// Road layout decoded from the scenario rows
#[derive(Debug, Clone, Default)]
pub struct ParsedLayout {
    pub roads: Vec<(Cell, DirectionSet)>,
    pub obstacles: Vec<Cell>,
}

impl Scenario {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// The built-in downtown scenario
    pub fn downtown() -> Result<Self, ConfigError> {
        Self::from_json_str(DOWNTOWN_JSON)
    }

    pub fn vehicle_count(&self) -> usize {
        self.vehicle_count.unwrap_or(self.assignments.len())
    }

    pub fn capacity_pool(&self) -> u32 {
        self.capacity_pool
            .unwrap_or_else(|| u32::try_from(self.vehicle_count()).unwrap_or(u32::MAX))
    }

    pub fn in_bounds(&self, cell: Cell) -> bool {
        cell.x >= 0 && cell.y >= 0 && cell.x < self.width && cell.y < self.height
    }

    /// Decode the layout rows into road directions and obstacle cells
    pub fn parse_layout(&self) -> Result<ParsedLayout, ConfigError> {
        if self.width < 1 || self.height < 1 {
            return Err(ConfigError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }

        let expected_rows = self.height as usize;
        if self.layout.len() != expected_rows {
            return Err(ConfigError::LayoutRowCount {
                expected: expected_rows,
                got: self.layout.len(),
            });
        }

        let mut parsed = ParsedLayout::default();
        let expected_columns = self.width as usize;

        for (row, line) in self.layout.iter().enumerate() {
            let tokens: Vec<&str> = line.split_whitespace().collect();
            if tokens.len() != expected_columns {
                return Err(ConfigError::LayoutRowWidth {
                    row,
                    expected: expected_columns,
                    got: tokens.len(),
                });
            }

            // Rows are listed top to bottom
            let y = self.height - 1 - row as i32;
            for (column, token) in tokens.into_iter().enumerate() {
                let cell = Cell::new(column as i32, y);
                match token {
                    EMPTY_TOKEN => {}
                    OBSTACLE_TOKEN => parsed.obstacles.push(cell),
                    letters => {
                        let directions = DirectionSet::from_letters(letters).ok_or_else(|| {
                            ConfigError::UnknownLayoutToken {
                                row,
                                column,
                                token: letters.to_string(),
                            }
                        })?;
                        parsed.roads.push((cell, directions));
                    }
                }
            }
        }

        for cell in &self.obstacles {
            if !self.in_bounds(*cell) {
                return Err(ConfigError::OutOfBounds {
                    what: "obstacle",
                    cell: *cell,
                });
            }
            parsed.obstacles.push(*cell);
        }
        parsed.obstacles.sort();
        parsed.obstacles.dedup();

        Ok(parsed)
    }
}
