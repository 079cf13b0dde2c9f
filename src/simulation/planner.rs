//! Shortest-path planning over the direction graph
//!
//! Uniform-cost search with unit edge weights. The frontier is a min-heap
//! keyed by `(cost, cell)`, so equal-cost candidates are expanded in cell
//! order and the result never depends on hashing or insertion order.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap, HashSet};

use super::direction_graph::DirectionGraph;
use super::types::Cell;

/// Finds a shortest directed path from `start` to `goal`
///
/// The returned path begins with `start` and ends with `goal`. Returns `None`
/// when `goal` cannot be reached under the graph's directions.
pub fn find_path(start: Cell, goal: Cell, graph: &DirectionGraph) -> Option<Vec<Cell>> {
    let mut frontier = BinaryHeap::new();
    let mut costs: HashMap<Cell, u32> = HashMap::new();
    let mut parents: HashMap<Cell, Cell> = HashMap::new();
    let mut closed: HashSet<Cell> = HashSet::new();

    costs.insert(start, 0);
    frontier.push(Reverse((0u32, start)));

    while let Some(Reverse((cost, cell))) = frontier.pop() {
        if !closed.insert(cell) {
            continue;
        }

        if cell == goal {
            return Some(reconstruct(&parents, start, goal));
        }

        let next_cost = cost + 1;
        for next in graph.successors(cell) {
            if closed.contains(&next) {
                continue;
            }
            let improves = match costs.get(&next) {
                Some(known) => next_cost < *known,
                None => true,
            };
            if improves {
                costs.insert(next, next_cost);
                parents.insert(next, cell);
                frontier.push(Reverse((next_cost, next)));
            }
        }
    }

    None
}

/// Length of the shortest path in edges, if any
pub fn path_cost(start: Cell, goal: Cell, graph: &DirectionGraph) -> Option<usize> {
    find_path(start, goal, graph).map(|path| path.len() - 1)
}

fn reconstruct(parents: &HashMap<Cell, Cell>, start: Cell, goal: Cell) -> Vec<Cell> {
    let mut path = vec![goal];
    let mut current = goal;
    while current != start {
        match parents.get(&current) {
            Some(parent) => {
                current = *parent;
                path.push(current);
            }
            None => break,
        }
    }
    path.reverse();
    path
}
