//! Octahedral lookup tables on the unit sphere
//!
//! Provides O(1) position-to-value lookups by storing one value per cell of the
//! octahedral parameterization in [`crate::cell`].

use glam::Vec3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::cell::{CellId, OCTANT_COUNT};
use crate::config::{dimension_for, validate_cell_width, IndexConfig};
use crate::error::Result;

/// Fixed-resolution lookup table covering the unit sphere
///
/// Each of the 8 octants is a `dimension × dimension` grid stored contiguously.
/// Lookups clamp out-of-range coordinates onto the nearest edge cell, so every
/// finite direction resolves to some cell.
///
/// # Performance
///
/// - Construction: O(cells), `8 * dimension²` values
/// - Query: O(1), two dot products and a clamp
///
/// # Example
///
/// ```
/// use spheroid_grid::*;
///
/// let mut index = SpatialIndex::with_default(0.1, 0u8).unwrap();
/// index.set(Vec3::X, 7);
///
/// assert_eq!(*index.get(Vec3::X), 7);
/// assert_eq!(*index.get(Vec3::Y), 0);
/// ```
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct SpatialIndex<T> {
    cell_width: f32,
    dimension: usize,
    cells: Vec<T>,
}

impl<T: Clone> SpatialIndex<T> {
    /// Build a table with every cell set to `value`
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the cell width is not finite or too small
    pub fn with_default(cell_width: f32, value: T) -> Result<Self> {
        let cell_width = validate_cell_width(cell_width)?;
        let dimension = dimension_for(cell_width);

        Ok(Self {
            cell_width,
            dimension,
            cells: vec![value; OCTANT_COUNT * dimension * dimension],
        })
    }

    /// Build a table from an already validated configuration
    pub fn from_config(config: &IndexConfig, value: T) -> Self {
        let dimension = config.dimension();
        Self {
            cell_width: config.cell_width,
            dimension,
            cells: vec![value; OCTANT_COUNT * dimension * dimension],
        }
    }

    /// Look up many directions at once
    pub fn get_many(&self, points: &[Vec3]) -> Vec<T> {
        points.iter().map(|&p| self.get(p).clone()).collect()
    }
}

impl<T: Clone + Default> SpatialIndex<T> {
    /// Build a table with every cell set to `T::default()`
    pub fn new(cell_width: f32) -> Result<Self> {
        Self::with_default(cell_width, T::default())
    }
}

impl<T> SpatialIndex<T> {
    /// Width of one cell in projected coordinates
    #[inline]
    pub fn cell_width(&self) -> f32 {
        self.cell_width
    }

    /// Number of cells along each axis of an octant
    #[inline]
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Total number of cells over all octants
    #[inline]
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Cell containing a direction
    #[inline]
    pub fn cell_id(&self, point: Vec3) -> CellId {
        CellId::of(point, self.cell_width)
    }

    /// Linear offset of a cell
    ///
    /// Each coordinate is clamped into range first, so this never fails, at the
    /// cost of aliasing out-of-range cells onto the octant's edge.
    #[inline]
    pub fn memory_index(&self, cell: CellId) -> usize {
        let max = self.dimension as i32 - 1;
        let octant = cell.octant.min(OCTANT_COUNT - 1);
        let x = cell.x.clamp(0, max) as usize;
        let y = cell.y.clamp(0, max) as usize;

        octant * self.dimension * self.dimension + x * self.dimension + y
    }

    /// Approximate 3D position of a cell
    #[inline]
    pub fn midpoint(&self, cell: CellId) -> Vec3 {
        cell.midpoint(self.cell_width)
    }

    /// Value stored for a direction
    #[inline]
    pub fn get(&self, point: Vec3) -> &T {
        self.get_cell(self.cell_id(point))
    }

    /// Replace the value stored for a direction
    #[inline]
    pub fn set(&mut self, point: Vec3, value: T) {
        let cell = self.cell_id(point);
        *self.get_cell_mut(cell) = value;
    }

    #[inline]
    pub fn get_cell(&self, cell: CellId) -> &T {
        &self.cells[self.memory_index(cell)]
    }

    #[inline]
    pub fn get_cell_mut(&mut self, cell: CellId) -> &mut T {
        let index = self.memory_index(cell);
        &mut self.cells[index]
    }

    /// All cell values in memory order
    #[inline]
    pub fn values(&self) -> &[T] {
        &self.cells
    }

    /// Convert every cell value, keeping the layout
    pub fn map<U, F>(self, f: F) -> SpatialIndex<U>
    where
        F: FnMut(T) -> U,
    {
        SpatialIndex {
            cell_width: self.cell_width,
            dimension: self.dimension,
            cells: self.cells.into_iter().map(f).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout() {
        let index = SpatialIndex::<u32>::new(0.5).unwrap();
        assert_eq!(index.dimension(), 5);
        assert_eq!(index.cell_count(), 8 * 25);
        assert!(index.values().iter().all(|&v| v == 0));
    }

    #[test]
    fn test_invalid_cell_width() {
        assert!(SpatialIndex::<u32>::new(0.0).is_err());
        assert!(SpatialIndex::with_default(f32::NAN, 1u32).is_err());
    }

    #[test]
    fn test_memory_index_clamps() {
        let index = SpatialIndex::<u32>::new(0.5).unwrap();

        assert_eq!(index.memory_index(CellId::new(0, 0, 0)), 0);
        assert_eq!(index.memory_index(CellId::new(-3, -1, 0)), 0);
        assert_eq!(index.memory_index(CellId::new(1, 2, 1)), 25 + 5 + 2);
        assert_eq!(
            index.memory_index(CellId::new(99, 99, 7)),
            index.cell_count() - 1
        );
        assert_eq!(
            index.memory_index(CellId::new(4, 4, 42)),
            index.cell_count() - 1
        );
    }

    #[test]
    fn test_set_and_get() {
        let mut index = SpatialIndex::with_default(0.05, -1i64).unwrap();
        let north = Vec3::Z;
        let south = Vec3::NEG_Z;

        index.set(north, 1);
        index.set(south, 2);

        assert_eq!(*index.get(north), 1);
        assert_eq!(*index.get(south), 2);
        assert_eq!(*index.get(Vec3::X), -1);
        assert_eq!(index.get_many(&[north, south, Vec3::X]), vec![1, 2, -1]);
    }

    #[test]
    fn test_zero_vector_is_total() {
        let index = SpatialIndex::<u8>::new(0.1).unwrap();
        let cell = index.cell_id(Vec3::ZERO);
        assert_eq!(cell.octant, 0);
        assert!(index.memory_index(cell) < index.cell_count());
    }

    #[test]
    fn test_map_keeps_layout() {
        let mut index = SpatialIndex::with_default(0.25, 1u8).unwrap();
        index.set(Vec3::Y, 3);

        let doubled = index.map(|v| v as u32 * 2);
        assert_eq!(doubled.dimension(), 9);
        assert_eq!(*doubled.get(Vec3::Y), 6);
        assert_eq!(*doubled.get(Vec3::NEG_Y), 2);
    }
}
