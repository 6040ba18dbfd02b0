//! ASCII tile map loading
//!
//! A level is a list of equal-length strings. Every non-space character is
//! looked up in a [`Legend`] and each archetype listed for it is instantiated
//! at the cell's world position:
//!
//! ```text
//! world = origin + (col, row) * cell_size
//! ```
//!
//! Validation runs over the whole map before anything is spawned, so a
//! malformed map never produces a partial level.

use std::collections::HashMap;

use glam::Vec2;
use thiserror::Error;

use super::entity::{BodyKind, Entity, EntityId, EntityKind};
use super::patrol::BehaviorSpec;
use crate::consts::TILE_SIZE;

/// Structural problems found while loading a level
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedLevel {
    #[error("level has no rows")]
    Empty,
    #[error("row {row} is {found} cells wide, expected {expected}")]
    Ragged {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("undefined tile {ch:?} at row {row}, column {col}")]
    UnknownTile { ch: char, row: usize, col: usize },
    #[error("level needs exactly one player spawn, found {found}")]
    PlayerSpawn { found: usize },
    #[error("no level defined at index {index}")]
    Missing { index: usize },
}

/// Template for entities spawned from a tile
#[derive(Debug, Clone, PartialEq)]
pub struct Archetype {
    pub kind: EntityKind,
    pub sprite: &'static str,
    pub size: Vec2,
    pub body: BodyKind,
    pub behavior: Option<BehaviorSpec>,
}

impl Archetype {
    /// Static, cell-sized archetype
    pub fn new(kind: EntityKind, sprite: &'static str) -> Self {
        Self {
            kind,
            sprite,
            size: Vec2::splat(TILE_SIZE),
            body: BodyKind::Static,
            behavior: None,
        }
    }

    pub fn with_size(mut self, size: f32) -> Self {
        self.size = Vec2::splat(size);
        self
    }

    pub fn dynamic(mut self) -> Self {
        self.body = BodyKind::Dynamic;
        self
    }

    pub fn with_behavior(mut self, behavior: BehaviorSpec) -> Self {
        self.behavior = Some(behavior);
        self
    }

    fn instantiate(&self, id: EntityId, pos: Vec2) -> Entity {
        Entity {
            id,
            kind: self.kind,
            pos,
            size: self.size,
            body: self.body,
            sprite: self.sprite,
            behavior: self.behavior.as_ref().map(BehaviorSpec::build),
        }
    }
}

/// Character -> archetypes mapping. Space is always empty.
#[derive(Debug, Clone, Default)]
pub struct Legend {
    tiles: HashMap<char, Vec<Archetype>>,
}

impl Legend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an archetype for `ch`; repeated calls stack entities on the cell
    pub fn with(mut self, ch: char, archetype: Archetype) -> Self {
        self.tiles.entry(ch).or_default().push(archetype);
        self
    }

    /// Declare `ch` as a known tile that spawns nothing
    #[cfg(test)]
    fn with_empty(mut self, ch: char) -> Self {
        self.tiles.entry(ch).or_default();
        self
    }

    pub fn get(&self, ch: char) -> Option<&[Archetype]> {
        self.tiles.get(&ch).map(Vec::as_slice)
    }

    fn spawns_player(&self, ch: char) -> bool {
        self.get(ch)
            .is_some_and(|arches| arches.iter().any(|a| a.kind == EntityKind::Player))
    }
}

/// A loaded level: entities in spawn order plus a per-kind query index
#[derive(Debug, Default)]
pub struct Level {
    entities: Vec<Entity>,
    by_kind: HashMap<EntityKind, Vec<EntityId>>,
    columns: usize,
    rows: usize,
}

impl Level {
    /// Grid size in cells (columns, rows)
    pub fn grid_size(&self) -> (usize, usize) {
        (self.columns, self.rows)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn entities_mut(&mut self) -> &mut [Entity] {
        &mut self.entities
    }

    fn index_of(&self, id: EntityId) -> Option<usize> {
        // Ids are handed out in increasing order and removal keeps order
        self.entities.binary_search_by_key(&id, |e| e.id).ok()
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.index_of(id).map(|i| &self.entities[i])
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.index_of(id).map(move |i| &mut self.entities[i])
    }

    /// All live entities of a kind, in spawn order
    pub fn find(&self, kind: EntityKind) -> impl Iterator<Item = &Entity> + '_ {
        self.by_kind
            .get(&kind)
            .into_iter()
            .flatten()
            .filter_map(|&id| self.get(id))
    }

    pub fn count(&self, kind: EntityKind) -> usize {
        self.by_kind.get(&kind).map_or(0, Vec::len)
    }

    pub fn player(&self) -> Option<&Entity> {
        self.find(EntityKind::Player).next()
    }

    pub fn player_id(&self) -> Option<EntityId> {
        self.player().map(|p| p.id)
    }

    /// Destroy an entity, returning it if it was alive
    pub fn remove(&mut self, id: EntityId) -> Option<Entity> {
        let index = self.index_of(id)?;
        let entity = self.entities.remove(index);
        if let Some(ids) = self.by_kind.get_mut(&entity.kind) {
            ids.retain(|&other| other != id);
        }
        Some(entity)
    }

    fn register(&mut self, entity: Entity) {
        self.by_kind.entry(entity.kind).or_default().push(entity.id);
        self.entities.push(entity);
    }
}

/// Build a level from its rows.
///
/// Entities are centered on their cell: `origin` is the center of cell (0, 0).
pub fn load<S: AsRef<str>>(
    rows: &[S],
    legend: &Legend,
    cell_size: Vec2,
    origin: Vec2,
) -> Result<Level, MalformedLevel> {
    let grid: Vec<Vec<char>> = rows.iter().map(|r| r.as_ref().chars().collect()).collect();
    validate(&grid, legend)?;

    let mut level = Level {
        columns: grid[0].len(),
        rows: grid.len(),
        ..Level::default()
    };
    let mut next_id = 0u32;

    for (row, cells) in grid.iter().enumerate() {
        for (col, &ch) in cells.iter().enumerate() {
            let Some(archetypes) = legend.get(ch) else {
                continue;
            };
            let pos = origin + Vec2::new(col as f32, row as f32) * cell_size;
            for archetype in archetypes {
                next_id += 1;
                level.register(archetype.instantiate(EntityId(next_id), pos));
            }
        }
    }

    log::debug!(
        "Loaded {}x{} level with {} entities ({} keys, {} ghosts)",
        level.columns,
        level.rows,
        level.len(),
        level.count(EntityKind::Key),
        level.count(EntityKind::Ghost),
    );

    Ok(level)
}

fn validate(grid: &[Vec<char>], legend: &Legend) -> Result<(), MalformedLevel> {
    let expected = grid.first().ok_or(MalformedLevel::Empty)?.len();
    if expected == 0 {
        return Err(MalformedLevel::Empty);
    }

    let mut spawns = 0;
    for (row, cells) in grid.iter().enumerate() {
        if cells.len() != expected {
            return Err(MalformedLevel::Ragged {
                row,
                expected,
                found: cells.len(),
            });
        }
        for (col, &ch) in cells.iter().enumerate() {
            if ch == ' ' {
                continue;
            }
            if legend.get(ch).is_none() {
                return Err(MalformedLevel::UnknownTile { ch, row, col });
            }
            if legend.spawns_player(ch) {
                spawns += 1;
            }
        }
    }

    if spawns != 1 {
        return Err(MalformedLevel::PlayerSpawn { found: spawns });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn legend() -> Legend {
        Legend::new()
            .with('=', Archetype::new(EntityKind::Wall, "grass"))
            .with('@', Archetype::new(EntityKind::Player, "player").dynamic())
            .with('^', Archetype::new(EntityKind::Key, "key"))
            .with('*', Archetype::new(EntityKind::Wall, "grass"))
            .with('*', Archetype::new(EntityKind::Key, "key"))
            .with_empty('.')
    }

    fn load_rows(rows: &[&str]) -> Result<Level, MalformedLevel> {
        load(rows, &legend(), Vec2::splat(64.0), Vec2::new(64.0, 64.0))
    }

    #[test]
    fn test_positions_are_row_major_grid() {
        let level = load_rows(&["=@.", "^ ="]).unwrap();
        assert_eq!(level.grid_size(), (3, 2));
        assert_eq!(level.len(), 4);

        let player = level.player().unwrap();
        assert_eq!(player.pos, Vec2::new(128.0, 64.0));
        assert_eq!(player.body, BodyKind::Dynamic);

        let key = level.find(EntityKind::Key).next().unwrap();
        assert_eq!(key.pos, Vec2::new(64.0, 128.0));

        let ids: Vec<u32> = level.entities().iter().map(|e| e.id.0).collect();
        assert_eq!(ids, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_stacked_archetypes() {
        let level = load_rows(&["@*"]).unwrap();
        assert_eq!(level.count(EntityKind::Wall), 1);
        assert_eq!(level.count(EntityKind::Key), 1);
        let wall = level.find(EntityKind::Wall).next().unwrap();
        let key = level.find(EntityKind::Key).next().unwrap();
        assert_eq!(wall.pos, key.pos);
    }

    #[test]
    fn test_unknown_tile_reports_location() {
        let err = load_rows(&["=@=", "=x="]).unwrap_err();
        assert_eq!(
            err,
            MalformedLevel::UnknownTile {
                ch: 'x',
                row: 1,
                col: 1
            }
        );
        assert!(err.to_string().contains("'x'"));
    }

    #[test]
    fn test_ragged_rows_rejected() {
        let err = load_rows(&["=@=", "=="]).unwrap_err();
        assert_eq!(
            err,
            MalformedLevel::Ragged {
                row: 1,
                expected: 3,
                found: 2
            }
        );
    }

    #[test]
    fn test_player_spawn_count() {
        assert_eq!(
            load_rows(&["==="]).unwrap_err(),
            MalformedLevel::PlayerSpawn { found: 0 }
        );
        assert_eq!(
            load_rows(&["@=@"]).unwrap_err(),
            MalformedLevel::PlayerSpawn { found: 2 }
        );
        assert_eq!(load_rows(&[]).unwrap_err(), MalformedLevel::Empty);
    }

    #[test]
    fn test_remove_updates_index() {
        let mut level = load_rows(&["@^^"]).unwrap();
        let first = level.find(EntityKind::Key).next().unwrap().id;
        assert!(level.remove(first).is_some());
        assert!(level.remove(first).is_none());
        assert_eq!(level.count(EntityKind::Key), 1);
        assert!(level.get(first).is_none());
        assert!(level.player().is_some());
    }

    #[test]
    fn test_patrol_behavior_attached() {
        let legend = legend().with(
            '&',
            Archetype::new(EntityKind::Ghost, "ghost").with_behavior(BehaviorSpec::Patrol {
                speed: 100.0,
                direction: 1.0,
            }),
        );
        let level = load(&["@&"], &legend, Vec2::splat(64.0), Vec2::ZERO).unwrap();
        let ghost = level.find(EntityKind::Ghost).next().unwrap();
        assert!(ghost.behavior.is_some());
    }

    const TILES: [char; 5] = ['=', '^', ' ', '.', '*'];

    proptest! {
        #[test]
        fn rectangular_known_maps_load(
            width in 1usize..12,
            cells in proptest::collection::vec(0usize..TILES.len(), 1..120),
            spawn in any::<prop::sample::Index>(),
        ) {
            let mut chars: Vec<char> = cells.iter().map(|&i| TILES[i]).collect();
            let height = chars.len().div_ceil(width);
            chars.resize(width * height, ' ');
            let at = spawn.index(chars.len());
            chars[at] = '@';

            let rows: Vec<String> = chars.chunks(width).map(|c| c.iter().collect()).collect();
            let level = load(&rows, &legend(), Vec2::splat(64.0), Vec2::ZERO);
            prop_assert!(level.is_ok());
            prop_assert_eq!(level.unwrap().grid_size(), (width, height));
        }

        #[test]
        fn unknown_character_always_rejected(
            row in 0usize..6,
            col in 0usize..6,
            bad in "[a-zA-Z0-9#&|]",
        ) {
            let mut grid = vec![vec!['='; 6]; 6];
            grid[(row + 1) % 6][(col + 1) % 6] = '@';
            let ch = bad.chars().next().unwrap();
            grid[row][col] = ch;
            let rows: Vec<String> = grid.iter().map(|r| r.iter().collect()).collect();

            let err = load(&rows, &legend(), Vec2::splat(64.0), Vec2::ZERO).unwrap_err();
            prop_assert_eq!(err, MalformedLevel::UnknownTile { ch, row, col });
        }

        #[test]
        fn ragged_maps_always_rejected(
            width in 2usize..10,
            short_row in 1usize..5,
        ) {
            let mut rows: Vec<String> = (0..5).map(|_| "=".repeat(width)).collect();
            rows[0].replace_range(0..1, "@");
            rows[short_row].pop();

            let err = load(&rows, &legend(), Vec2::splat(64.0), Vec2::ZERO).unwrap_err();
            let is_ragged = matches!(err, MalformedLevel::Ragged { .. });
            prop_assert!(is_ragged);
        }
    }
}
