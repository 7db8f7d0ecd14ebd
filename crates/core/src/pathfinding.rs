//! Deterministic 4-directional A* and neighbor helpers over the board.
//! This module exists so movement and AI share one notion of a legal route.
//! It does not own movement timing or decide where anyone wants to go.
//!
//! Path convention: a returned path excludes the start cell and ends at the goal.
//! An empty path means either "already there" (`start == goal`) or "unreachable";
//! callers that care compare `start` and `goal` themselves.

use std::collections::{BTreeMap, BTreeSet};

use crate::grid::GridMap;
use crate::types::Pos;

/// Open-set entry. Field order gives the tie-break: lowest f, then lowest h,
/// then row-major position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
struct OpenNode {
    f: u32,
    h: u32,
    y: i32,
    x: i32,
}

impl OpenNode {
    fn pos(self) -> Pos {
        Pos { x: self.x, y: self.y }
    }
}

pub fn find_path(grid: &GridMap, start: Pos, goal: Pos) -> Vec<Pos> {
    if !grid.is_valid_tile(start) || !grid.is_valid_tile(goal) {
        return Vec::new();
    }
    if !grid.is_walkable(goal) {
        return Vec::new();
    }
    if start == goal {
        return Vec::new();
    }

    let mut open_set = BTreeSet::new();
    let mut closed = BTreeSet::new();
    let mut g_score = BTreeMap::new();
    let mut came_from = BTreeMap::new();

    let h = manhattan_distance(start, goal);
    open_set.insert(OpenNode { f: h, h, y: start.y, x: start.x });
    g_score.insert(start, 0_u32);

    while let Some(curr) = open_set.pop_first() {
        let p = curr.pos();
        if p == goal {
            return reconstruct_path(&came_from, start, goal);
        }
        if !closed.insert(p) {
            continue;
        }
        let cur_g = g_score.get(&p).copied().unwrap_or(u32::MAX);
        for n in neighbors(grid, p) {
            if closed.contains(&n) || !grid.is_walkable(n) {
                continue;
            }
            let tg = cur_g + 1;
            if tg < g_score.get(&n).copied().unwrap_or(u32::MAX) {
                came_from.insert(n, p);
                g_score.insert(n, tg);
                let h = manhattan_distance(n, goal);
                open_set.insert(OpenNode { f: tg + h, h, y: n.y, x: n.x });
            }
        }
    }
    Vec::new()
}

fn reconstruct_path(came: &BTreeMap<Pos, Pos>, start: Pos, goal: Pos) -> Vec<Pos> {
    let mut p = goal;
    let mut result = vec![p];
    while let Some(prev) = came.get(&p).copied() {
        if prev == start {
            break;
        }
        result.push(prev);
        p = prev;
    }
    result.reverse();
    result
}

/// In-bounds orthogonal neighbours in a fixed order: +x, -x, +y, -y.
pub fn neighbors(grid: &GridMap, p: Pos) -> Vec<Pos> {
    orthogonal(p).into_iter().filter(|n| grid.is_valid_tile(*n)).collect()
}

pub(crate) fn orthogonal(p: Pos) -> [Pos; 4] {
    [p.offset(1, 0), p.offset(-1, 0), p.offset(0, 1), p.offset(0, -1)]
}

pub fn manhattan_distance(a: Pos, b: Pos) -> u32 {
    a.x.abs_diff(b.x) + a.y.abs_diff(b.y)
}
