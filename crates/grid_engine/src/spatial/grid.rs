//! Uniform-grid spatial hash
//!
//! A fixed grid over the world rectangle. Each cell stores the entities
//! whose world-space collision boxes touch it; a box spanning several
//! cells is recorded in every cell it covers, so a retrieval may return
//! the same entity more than once and callers deduplicate.
//!
//! The hash is rebuilt from scratch at the start of every frame and then
//! updated in place as entities move during motion resolution.
//!
//! Out-of-bounds coordinates clamp to the border cells instead of
//! indexing past the grid, so entities drifting off-world stay queryable
//! until they are culled.

use crate::core::CollisionConfig;
use crate::ecs::Entity;
use crate::foundation::logging::debug;
use crate::geometry::WorldRect;

/// One record in the grid: an entity and its world-space box at insert time.
pub type CellEntry = (Entity, WorldRect);

/// Uniform grid over the world rectangle.
pub struct SpatialHash {
    cell_size: f32,
    rows: usize,
    cols: usize,
    cells: Vec<Vec<CellEntry>>,
}

impl SpatialHash {
    /// Build an empty grid covering the configured world rectangle.
    pub fn new(config: &CollisionConfig) -> Self {
        let cell_size = config.cell_size as f32;
        let cols = (config.world_width.div_ceil(config.cell_size)).max(1) as usize;
        let rows = (config.world_height.div_ceil(config.cell_size)).max(1) as usize;
        debug!("spatial hash: {rows}x{cols} cells of {cell_size} units");
        Self {
            cell_size,
            rows,
            cols,
            cells: vec![Vec::new(); rows * cols],
        }
    }

    /// Number of rows in the grid.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns in the grid.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Side length of a cell in world units.
    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Drop every entry, keeping cell capacity for the next frame.
    pub fn clear(&mut self) {
        for cell in &mut self.cells {
            cell.clear();
        }
    }

    /// Record an entity's world-space box in every cell it covers.
    pub fn insert(&mut self, entity: Entity, rect: WorldRect) {
        let (row_min, row_max) = self.row_span(&rect);
        let (col_min, col_max) = self.col_span(&rect);
        for row in row_min..=row_max {
            for col in col_min..=col_max {
                self.cells[row * self.cols + col].push((entity, rect));
            }
        }
    }

    /// Remove every record of an entity from the cells covered by `rect`.
    ///
    /// `rect` must cover the box the entity was inserted with; passing the
    /// insert-time box removes the entity completely.
    pub fn remove(&mut self, entity: Entity, rect: &WorldRect) {
        let (row_min, row_max) = self.row_span(rect);
        let (col_min, col_max) = self.col_span(rect);
        for row in row_min..=row_max {
            for col in col_min..=col_max {
                self.cells[row * self.cols + col].retain(|(e, _)| *e != entity);
            }
        }
    }

    /// Candidate entries overlapping the cells covered by `rect`.
    ///
    /// Entries for `exclude` are skipped. An entity spanning several of the
    /// covered cells appears once per cell; callers deduplicate.
    pub fn retrieve<'a>(
        &'a self,
        exclude: Entity,
        rect: &WorldRect,
    ) -> impl Iterator<Item = &'a CellEntry> + 'a {
        let (row_min, row_max) = self.row_span(rect);
        let (col_min, col_max) = self.col_span(rect);
        (row_min..=row_max)
            .flat_map(move |row| {
                (col_min..=col_max).flat_map(move |col| self.cells[row * self.cols + col].iter())
            })
            .filter(move |(e, _)| *e != exclude)
    }

    /// Entries recorded in a single cell.
    pub fn cell(&self, row: usize, col: usize) -> &[CellEntry] {
        &self.cells[row * self.cols + col]
    }

    /// World-space rectangle of a single cell.
    pub fn cell_bounds(&self, row: usize, col: usize) -> WorldRect {
        WorldRect::new(
            col as f32 * self.cell_size,
            row as f32 * self.cell_size,
            self.cell_size,
            self.cell_size,
        )
    }

    fn row_span(&self, rect: &WorldRect) -> (usize, usize) {
        (self.row_of(rect.top()), self.row_of(rect.bottom()))
    }

    fn col_span(&self, rect: &WorldRect) -> (usize, usize) {
        (self.col_of(rect.left()), self.col_of(rect.right()))
    }

    fn row_of(&self, y: f32) -> usize {
        let row = (y / self.cell_size).floor();
        (row.max(0.0) as usize).min(self.rows - 1)
    }

    fn col_of(&self, x: f32) -> usize {
        let col = (x / self.cell_size).floor();
        (col.max(0.0) as usize).min(self.cols - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::World;
    use std::collections::HashSet;

    fn hash() -> SpatialHash {
        SpatialHash::new(&CollisionConfig::default())
    }

    fn entities(n: usize) -> Vec<Entity> {
        let mut world = World::new();
        (0..n).map(|_| world.create_entity()).collect()
    }

    #[test]
    fn test_grid_dimensions_cover_world() {
        let hash = hash();
        // 640x360 world with 32-unit cells.
        assert_eq!(hash.cols(), 20);
        assert_eq!(hash.rows(), 12);
    }

    #[test]
    fn test_spanning_box_lands_in_every_covered_cell() {
        let mut hash = hash();
        let ids = entities(1);
        // 48 units wide starting at x=24: covers columns 0..=2 in row 0.
        hash.insert(ids[0], WorldRect::new(24.0, 4.0, 48.0, 8.0));

        assert_eq!(hash.cell(0, 0).len(), 1);
        assert_eq!(hash.cell(0, 1).len(), 1);
        assert_eq!(hash.cell(0, 2).len(), 1);
        assert!(hash.cell(0, 3).is_empty());
        assert!(hash.cell(1, 1).is_empty());
    }

    #[test]
    fn test_retrieve_skips_excluded_and_distant() {
        let mut hash = hash();
        let ids = entities(3);
        hash.insert(ids[0], WorldRect::new(10.0, 10.0, 8.0, 8.0));
        hash.insert(ids[1], WorldRect::new(40.0, 10.0, 8.0, 8.0));
        hash.insert(ids[2], WorldRect::new(600.0, 300.0, 8.0, 8.0));

        let near: HashSet<Entity> = hash
            .retrieve(ids[0], &WorldRect::new(8.0, 8.0, 40.0, 12.0))
            .map(|(e, _)| *e)
            .collect();

        assert!(!near.contains(&ids[0]));
        assert!(near.contains(&ids[1]));
        assert!(!near.contains(&ids[2]));
    }

    #[test]
    fn test_retrieve_at_insert_rect_and_far_away() {
        let mut hash = hash();
        let ids = entities(2);
        hash.insert(ids[0], WorldRect::new(0.0, 0.0, 32.0, 32.0));

        let at_origin: Vec<_> = hash
            .retrieve(ids[1], &WorldRect::new(0.0, 0.0, 32.0, 32.0))
            .collect();
        assert!(at_origin.iter().any(|(e, _)| *e == ids[0]));

        let far: Vec<_> = hash
            .retrieve(ids[1], &WorldRect::new(100.0, 100.0, 10.0, 10.0))
            .collect();
        assert!(far.is_empty());
    }

    #[test]
    fn test_out_of_bounds_clamps_to_border_cells() {
        let mut hash = hash();
        let ids = entities(1);
        hash.insert(ids[0], WorldRect::new(-500.0, -500.0, 8.0, 8.0));
        assert_eq!(hash.cell(0, 0).len(), 1);

        let found: Vec<_> = hash
            .retrieve(Entity::default(), &WorldRect::new(-400.0, -400.0, 10.0, 10.0))
            .collect();
        assert_eq!(found.len(), 1);
    }

    #[test]
    fn test_remove_clears_all_covered_cells() {
        let mut hash = hash();
        let ids = entities(1);
        let rect = WorldRect::new(24.0, 4.0, 48.0, 8.0);
        hash.insert(ids[0], rect);
        hash.remove(ids[0], &rect);

        for col in 0..hash.cols() {
            assert!(hash.cell(0, col).is_empty());
        }
    }

    #[test]
    fn test_clear_empties_every_cell() {
        let mut hash = hash();
        let ids = entities(2);
        hash.insert(ids[0], WorldRect::new(0.0, 0.0, 640.0, 360.0));
        hash.insert(ids[1], WorldRect::new(100.0, 100.0, 8.0, 8.0));
        hash.clear();
        for row in 0..hash.rows() {
            for col in 0..hash.cols() {
                assert!(hash.cell(row, col).is_empty());
            }
        }
    }
}
