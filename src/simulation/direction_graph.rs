//! Directed road graph for pathfinding
//!
//! Maps every grid cell to the directions a vehicle may leave it in. Parking
//! lots add exit overrides (how a car leaves the lot cell) and entry overrides
//! (how a car turns off the street into the lot); both are unioned with the
//! base road directions.

use log::debug;
use petgraph::graphmap::DiGraphMap;
use std::collections::{HashMap, HashSet};

use super::types::{Cell, Direction, DirectionSet};

/// Accumulates road layout data before it is compiled into a [`DirectionGraph`]
#[derive(Debug, Clone)]
pub struct DirectionGraphBuilder {
    width: i32,
    height: i32,
    base: HashMap<Cell, DirectionSet>,
    exit_overrides: HashMap<Cell, DirectionSet>,
    entry_overrides: HashMap<Cell, DirectionSet>,
    obstacles: HashSet<Cell>,
}

impl DirectionGraphBuilder {
    /// Sets the base road directions of a cell, replacing any previous set
    pub fn road(mut self, cell: Cell, directions: DirectionSet) -> Self {
        self.set_road(cell, directions);
        self
    }

    pub fn set_road(&mut self, cell: Cell, directions: DirectionSet) {
        if directions.is_empty() {
            self.base.remove(&cell);
        } else {
            self.base.insert(cell, directions);
        }
    }

    pub fn obstacle(mut self, cell: Cell) -> Self {
        self.add_obstacle(cell);
        self
    }

    pub fn add_obstacle(&mut self, cell: Cell) {
        self.obstacles.insert(cell);
    }

    /// Directions a vehicle may take when leaving the parking lot at `lot`
    pub fn exit(mut self, lot: Cell, directions: DirectionSet) -> Self {
        self.add_exit(lot, directions);
        self
    }

    pub fn add_exit(&mut self, lot: Cell, directions: DirectionSet) {
        let entry = self.exit_overrides.entry(lot).or_default();
        *entry = entry.union(directions);
    }

    /// Directions a vehicle may take from the street cell `cell` into a lot
    pub fn entry(mut self, cell: Cell, directions: DirectionSet) -> Self {
        self.add_entry(cell, directions);
        self
    }

    pub fn add_entry(&mut self, cell: Cell, directions: DirectionSet) {
        let entry = self.entry_overrides.entry(cell).or_default();
        *entry = entry.union(directions);
    }

    /// Compiles the layout into an immutable graph
    ///
    /// Edges leading off the grid or onto an obstacle are dropped, so no
    /// planned path can ever cross an obstacle.
    pub fn build(self) -> DirectionGraph {
        let mut graph = DirectionGraph {
            width: self.width,
            height: self.height,
            base: self.base,
            exit_overrides: self.exit_overrides,
            entry_overrides: self.entry_overrides,
            obstacles: self.obstacles,
            graph: DiGraphMap::new(),
        };

        let mut sources: Vec<Cell> = graph
            .base
            .keys()
            .chain(graph.exit_overrides.keys())
            .chain(graph.entry_overrides.keys())
            .copied()
            .collect();
        sources.sort();
        sources.dedup();

        for from in sources {
            if !graph.in_bounds(from) || graph.is_obstacle(from) {
                debug!("Ignoring directions on unusable cell {}", from);
                continue;
            }
            graph.graph.add_node(from);
            for direction in graph.legal_directions(from).iter() {
                let to = from.step(direction);
                if !graph.in_bounds(to) || graph.is_obstacle(to) {
                    debug!("Dropping edge {} -> {} ({:?})", from, to, direction);
                    continue;
                }
                graph.graph.add_edge(from, to, direction);
            }
        }

        graph
    }
}

/// Immutable directed graph over grid cells
#[derive(Debug, Clone)]
pub struct DirectionGraph {
    width: i32,
    height: i32,
    base: HashMap<Cell, DirectionSet>,
    exit_overrides: HashMap<Cell, DirectionSet>,
    entry_overrides: HashMap<Cell, DirectionSet>,
    obstacles: HashSet<Cell>,
    /// One edge per legal move, weighted with the direction taken
    graph: DiGraphMap<Cell, Direction>,
}

impl DirectionGraph {
    pub fn builder(width: i32, height: i32) -> DirectionGraphBuilder {
        DirectionGraphBuilder {
            width,
            height,
            base: HashMap::new(),
            exit_overrides: HashMap::new(),
            entry_overrides: HashMap::new(),
            obstacles: HashSet::new(),
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    /// Union of the base directions and any parking overrides on `cell`
    pub fn legal_directions(&self, cell: Cell) -> DirectionSet {
        let lookup = |table: &HashMap<Cell, DirectionSet>| {
            table.get(&cell).copied().unwrap_or_default()
        };
        lookup(&self.base)
            .union(lookup(&self.exit_overrides))
            .union(lookup(&self.entry_overrides))
    }

    /// Base road directions only, without parking overrides
    pub fn road_directions(&self, cell: Cell) -> DirectionSet {
        self.base.get(&cell).copied().unwrap_or_default()
    }

    /// Cells reachable in one legal move from `cell`
    pub fn successors(&self, cell: Cell) -> impl Iterator<Item = Cell> + '_ {
        self.graph.neighbors(cell)
    }

    pub fn has_edge(&self, from: Cell, to: Cell) -> bool {
        self.graph.contains_edge(from, to)
    }

    pub fn in_bounds(&self, cell: Cell) -> bool {
        cell.x >= 0 && cell.y >= 0 && cell.x < self.width && cell.y < self.height
    }

    pub fn is_obstacle(&self, cell: Cell) -> bool {
        self.obstacles.contains(&cell)
    }

    /// Read-only view of the compiled graph
    pub fn graph(&self) -> &DiGraphMap<Cell, Direction> {
        &self.graph
    }

    /// Get number of traversable edges
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Get number of cells with at least one legal direction or incoming edge
    pub fn cell_count(&self) -> usize {
        self.graph.node_count()
    }
}
