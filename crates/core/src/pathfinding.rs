//! Shortest paths and movement ranges over weighted tile grids.
//! This module exists so outdoor and indoor navigation share one A* and one
//! Dijkstra implementation behind the [`NavGrid`] seam. It does not own
//! occupancy rules beyond what callers pass in through [`Avoiding`].

use std::collections::{BTreeMap, BTreeSet};

use crate::content::COST_SCALE;
use crate::types::Pos;

/// A walkable surface. Costs are in hundredths of a tile step.
pub trait NavGrid {
    /// Cost of entering `pos`, or `None` when it cannot be entered.
    fn step_cost(&self, pos: Pos) -> Option<u32>;

    /// Cheapest cardinal step anywhere on this grid; scales the Chebyshev
    /// heuristic so it never overestimates.
    fn min_step_cost(&self) -> u32 {
        COST_SCALE
    }
}

/// Wraps a grid and additionally refuses every position matching `blocked`.
pub struct Avoiding<'a, G: ?Sized, F> {
    pub grid: &'a G,
    pub blocked: F,
}

impl<G, F> NavGrid for Avoiding<'_, G, F>
where
    G: NavGrid + ?Sized,
    F: Fn(Pos) -> bool,
{
    fn step_cost(&self, pos: Pos) -> Option<u32> {
        if (self.blocked)(pos) {
            return None;
        }
        self.grid.step_cost(pos)
    }

    fn min_step_cost(&self) -> u32 {
        self.grid.min_step_cost()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
struct OpenNode {
    f: u32,
    h: u32,
    y: i32,
    x: i32,
}

/// Cardinal directions first, then diagonals.
pub fn neighbors8(p: Pos) -> [Pos; 8] {
    [
        p.offset(0, -1),
        p.offset(1, 0),
        p.offset(0, 1),
        p.offset(-1, 0),
        p.offset(1, -1),
        p.offset(1, 1),
        p.offset(-1, 1),
        p.offset(-1, -1),
    ]
}

fn is_diagonal(from: Pos, to: Pos) -> bool {
    from.x != to.x && from.y != to.y
}

/// Cost of stepping from `from` onto its neighbour `to`; diagonals cost 1.4x.
pub fn edge_cost(grid: &(impl NavGrid + ?Sized), from: Pos, to: Pos) -> Option<u32> {
    let base = grid.step_cost(to)?;
    Some(if is_diagonal(from, to) { base * 14 / 10 } else { base })
}

fn heuristic(grid: &(impl NavGrid + ?Sized), from: Pos, goal: Pos) -> u32 {
    from.chebyshev(goal) * grid.min_step_cost()
}

/// A* over 8-connected tiles. The returned path starts with `start` and ends
/// with `goal`; `None` when the goal cannot be entered or reached.
pub fn find_path(grid: &(impl NavGrid + ?Sized), start: Pos, goal: Pos) -> Option<Vec<Pos>> {
    if start == goal {
        return Some(vec![start]);
    }
    grid.step_cost(goal)?;

    let mut open_set = BTreeSet::new();
    let mut g_score = BTreeMap::new();
    let mut came_from = BTreeMap::new();
    let h = heuristic(grid, start, goal);
    open_set.insert(OpenNode { f: h, h, y: start.y, x: start.x });
    g_score.insert(start, 0_u32);

    while let Some(current) = open_set.pop_first() {
        let pos = Pos { y: current.y, x: current.x };
        let Some(&current_g) = g_score.get(&pos) else {
            continue;
        };
        if current.f != current_g + current.h {
            continue;
        }
        if pos == goal {
            return Some(reconstruct_path(&came_from, start, goal));
        }
        for next in neighbors8(pos) {
            let Some(cost) = edge_cost(grid, pos, next) else {
                continue;
            };
            let tentative = current_g + cost;
            if tentative < g_score.get(&next).copied().unwrap_or(u32::MAX) {
                came_from.insert(next, pos);
                g_score.insert(next, tentative);
                let h = heuristic(grid, next, goal);
                open_set.insert(OpenNode { f: tentative + h, h, y: next.y, x: next.x });
            }
        }
    }
    None
}

fn reconstruct_path(came_from: &BTreeMap<Pos, Pos>, start: Pos, goal: Pos) -> Vec<Pos> {
    let mut path = vec![goal];
    let mut step = goal;
    while step != start {
        match came_from.get(&step) {
            Some(&prev) => {
                path.push(prev);
                step = prev;
            }
            None => break,
        }
    }
    path.reverse();
    path
}

/// Total cost of walking `path`, excluding the tile it starts on.
pub fn path_cost(grid: &(impl NavGrid + ?Sized), path: &[Pos]) -> Option<u32> {
    path.windows(2).try_fold(0, |total, pair| Some(total + edge_cost(grid, pair[0], pair[1])?))
}

/// Every tile reachable from `start` within `budget`, with its cheapest cost.
/// The start tile is excluded, as is every tile matching `occupied`, which
/// can still be walked through.
pub fn movement_range(
    grid: &(impl NavGrid + ?Sized),
    start: Pos,
    budget: u32,
    occupied: impl Fn(Pos) -> bool,
) -> BTreeMap<Pos, u32> {
    let mut best: BTreeMap<Pos, u32> = BTreeMap::new();
    let mut frontier = BTreeSet::new();
    best.insert(start, 0);
    frontier.insert((0_u32, start));

    while let Some((cost, pos)) = frontier.pop_first() {
        if best.get(&pos).is_some_and(|&known| known < cost) {
            continue;
        }
        for next in neighbors8(pos) {
            let Some(step) = edge_cost(grid, pos, next) else {
                continue;
            };
            let total = cost + step;
            if total > budget {
                continue;
            }
            if total < best.get(&next).copied().unwrap_or(u32::MAX) {
                best.insert(next, total);
                frontier.insert((total, next));
            }
        }
    }

    best.remove(&start);
    best.retain(|&pos, _| !occupied(pos));
    best
}
