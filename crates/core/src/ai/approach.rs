//! Choosing where to walk when the target is out of reach.

use crate::character::Character;
use crate::grid::GridMap;
use crate::pathfinding::{find_path, orthogonal};
use crate::types::Pos;

/// Destination for this turn's move toward `target`, or `None` when no cell
/// next to it can be reached.
///
/// Candidates are the four cells orthogonal to the target; the shortest path
/// wins and earlier candidates win ties. The walk is cut to `movement_left` steps.
pub fn approach_destination(grid: &GridMap, actor: &Character, target: &Character) -> Option<Pos> {
    let mut best: Option<Vec<Pos>> = None;
    for cell in orthogonal(target.pos) {
        let path = find_path(grid, actor.pos, cell);
        if path.is_empty() {
            continue;
        }
        if best.as_ref().is_none_or(|b| path.len() < b.len()) {
            best = Some(path);
        }
    }

    let path = best?;
    let steps = path.len().min(actor.movement_left as usize);
    steps.checked_sub(1).map(|last| path[last])
}
