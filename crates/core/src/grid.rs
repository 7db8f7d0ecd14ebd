//! Board tiles and single-occupant cell bookkeeping.
//! This module exists so every system asks the same questions about walkability and occupancy.
//! It does not own characters; cells hold roster ids only.

use tracing::error;

use crate::types::{CharacterId, Pos, TileType};

pub const DEFAULT_GRID_SIZE: usize = 8;

#[derive(Clone, Debug)]
pub struct GridMap {
    width: usize,
    height: usize,
    tiles: Vec<TileType>,
    occupancy: Vec<Option<CharacterId>>,
}

impl Default for GridMap {
    fn default() -> Self {
        Self::new(DEFAULT_GRID_SIZE, DEFAULT_GRID_SIZE)
    }
}

impl GridMap {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            tiles: vec![TileType::Empty; width * height],
            occupancy: vec![None; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn is_valid_tile(&self, pos: Pos) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as usize) < self.width && (pos.y as usize) < self.height
    }

    pub fn tile_type(&self, pos: Pos) -> TileType {
        match self.index(pos) {
            Some(idx) => self.tiles[idx],
            None => TileType::Invalid,
        }
    }

    pub fn set_tile_type(&mut self, pos: Pos, tile: TileType) {
        let Some(idx) = self.index(pos) else {
            error!(?pos, ?tile, "set_tile_type: position out of bounds");
            return;
        };
        if tile == TileType::Invalid {
            error!(?pos, "set_tile_type: Invalid is a sentinel and cannot be stored");
            return;
        }
        self.tiles[idx] = tile;
    }

    /// Out-of-bounds cells report as occupied so callers fail closed.
    pub fn is_occupied(&self, pos: Pos) -> bool {
        match self.index(pos) {
            Some(idx) => self.occupancy[idx].is_some(),
            None => true,
        }
    }

    pub fn is_walkable(&self, pos: Pos) -> bool {
        self.tile_type(pos) == TileType::Empty && !self.is_occupied(pos)
    }

    /// Records `id` at `pos`. Returns false (and leaves the board untouched)
    /// when the cell is out of bounds or already taken.
    pub fn add_character(&mut self, id: CharacterId, pos: Pos) -> bool {
        let Some(idx) = self.index(pos) else {
            error!(?pos, "add_character: position out of bounds");
            return false;
        };
        if let Some(existing) = self.occupancy[idx] {
            error!(?pos, ?existing, "add_character: cell already occupied");
            return false;
        }
        self.occupancy[idx] = Some(id);
        true
    }

    pub fn remove_character(&mut self, pos: Pos) {
        if let Some(idx) = self.index(pos) {
            self.occupancy[idx] = None;
        }
    }

    /// Transfers whatever occupies `from` into `to`.
    ///
    /// Walkability of `to` is not re-checked; callers validate the destination.
    pub fn move_character(&mut self, from: Pos, to: Pos) -> bool {
        let (Some(from_idx), Some(to_idx)) = (self.index(from), self.index(to)) else {
            error!(?from, ?to, "move_character: position out of bounds");
            return false;
        };
        let occupant = self.occupancy[from_idx].take();
        self.occupancy[to_idx] = occupant;
        true
    }

    pub fn character_at(&self, pos: Pos) -> Option<CharacterId> {
        self.index(pos).and_then(|idx| self.occupancy[idx])
    }

    /// Every cell's occupant in row-major order, `None` for empty cells.
    pub fn all_characters(&self) -> impl Iterator<Item = Option<CharacterId>> + '_ {
        self.occupancy.iter().copied()
    }

    /// Occupied cells only, row-major.
    pub fn occupants(&self) -> impl Iterator<Item = (Pos, CharacterId)> + '_ {
        self.occupancy
            .iter()
            .enumerate()
            .filter_map(|(idx, slot)| slot.map(|id| (self.pos_of(idx), id)))
    }

    fn index(&self, pos: Pos) -> Option<usize> {
        if !self.is_valid_tile(pos) {
            return None;
        }
        Some((pos.y as usize) * self.width + (pos.x as usize))
    }

    fn pos_of(&self, idx: usize) -> Pos {
        Pos { x: (idx % self.width) as i32, y: (idx / self.width) as i32 }
    }
}

#[cfg(test)]
mod tests {
    use slotmap::SlotMap;

    use super::*;

    fn ids(count: usize) -> Vec<CharacterId> {
        let mut arena: SlotMap<CharacterId, ()> = SlotMap::with_key();
        (0..count).map(|_| arena.insert(())).collect()
    }

    #[test]
    fn bounds_are_half_open() {
        let grid = GridMap::default();
        for y in 0..8 {
            for x in 0..8 {
                assert!(grid.is_valid_tile(Pos { x, y }));
            }
        }
        for pos in [Pos::new(-1, 0), Pos::new(0, -1), Pos::new(8, 0), Pos::new(0, 8)] {
            assert!(!grid.is_valid_tile(pos));
            assert!(grid.is_occupied(pos), "{pos:?} should fail closed");
            assert_eq!(grid.tile_type(pos), TileType::Invalid);
            assert!(!grid.is_walkable(pos));
        }
    }

    #[test]
    fn only_empty_unoccupied_tiles_are_walkable() {
        let mut grid = GridMap::default();
        let cases = [
            (Pos::new(1, 1), TileType::Wall),
            (Pos::new(2, 1), TileType::Lava),
            (Pos::new(3, 1), TileType::Difficult),
            (Pos::new(4, 1), TileType::Exit),
        ];
        for (pos, tile) in cases {
            grid.set_tile_type(pos, tile);
            assert_eq!(grid.tile_type(pos), tile);
            assert!(!grid.is_walkable(pos), "{tile:?} should not be walkable");
        }
        assert!(grid.is_walkable(Pos::new(5, 1)));

        let id = ids(1)[0];
        assert!(grid.add_character(id, Pos::new(5, 1)));
        assert!(!grid.is_walkable(Pos::new(5, 1)));
    }

    #[test]
    fn set_tile_out_of_bounds_is_ignored() {
        let mut grid = GridMap::new(4, 4);
        grid.set_tile_type(Pos::new(9, 9), TileType::Wall);
        assert!(grid.all_characters().all(|slot| slot.is_none()));
        assert_eq!(grid.tile_type(Pos::new(9, 9)), TileType::Invalid);
    }

    #[test]
    fn add_then_lookup_returns_same_character() {
        let mut grid = GridMap::default();
        let pair = ids(2);
        let (a, b) = (pair[0], pair[1]);
        assert!(grid.add_character(a, Pos::new(3, 4)));
        assert_eq!(grid.character_at(Pos::new(3, 4)), Some(a));

        assert!(!grid.add_character(b, Pos::new(3, 4)), "occupied cell must be refused");
        assert_eq!(grid.character_at(Pos::new(3, 4)), Some(a));
        assert!(!grid.add_character(b, Pos::new(8, 8)));
    }

    #[test]
    fn move_transfers_occupancy() {
        let mut grid = GridMap::default();
        let id = ids(1)[0];
        grid.add_character(id, Pos::new(0, 0));
        assert!(grid.move_character(Pos::new(0, 0), Pos::new(0, 1)));
        assert_eq!(grid.character_at(Pos::new(0, 0)), None);
        assert_eq!(grid.character_at(Pos::new(0, 1)), Some(id));

        assert!(!grid.move_character(Pos::new(0, 1), Pos::new(-1, 1)));
        assert_eq!(grid.character_at(Pos::new(0, 1)), Some(id), "failed move keeps occupant");
    }

    #[test]
    fn remove_clears_cell_and_ignores_invalid() {
        let mut grid = GridMap::default();
        let id = ids(1)[0];
        grid.add_character(id, Pos::new(2, 2));
        grid.remove_character(Pos::new(20, 2));
        assert_eq!(grid.character_at(Pos::new(2, 2)), Some(id));
        grid.remove_character(Pos::new(2, 2));
        assert_eq!(grid.character_at(Pos::new(2, 2)), None);
    }

    #[test]
    fn all_characters_covers_every_cell_and_restarts() {
        let mut grid = GridMap::new(3, 2);
        let id = ids(1)[0];
        grid.add_character(id, Pos::new(2, 1));
        let first: Vec<_> = grid.all_characters().collect();
        let second: Vec<_> = grid.all_characters().collect();
        assert_eq!(first.len(), 6);
        assert_eq!(first, second);
        assert_eq!(first[5], Some(id));
        assert_eq!(grid.occupants().collect::<Vec<_>>(), vec![(Pos::new(2, 1), id)]);
    }
}
