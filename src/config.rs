//! Lookup table configuration and builder
//!
//! This module provides the validated parameters for octahedral lookup tables
//! and the rules a [`SpheroidGrid`](crate::grid::SpheroidGrid) uses to derive
//! them from a mesh.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::cell::OCTANT_COUNT;
use crate::error::{Result, SpheroidError};

/// Smallest accepted cell width
///
/// At this width each octant already holds ~4 million cells.
pub const MIN_CELL_WIDTH: f32 = 0.001;

/// Parameters of an octahedral lookup table over the unit sphere
///
/// `cell_width` is measured in projected coordinates, which range over `[-1, 1]`
/// on each octant. `max_site_distance` only matters to the Voronoi populator:
/// it must be an upper bound on the distance from any point of the sphere to its
/// nearest site, otherwise some cells stay unset.
///
/// # Example
///
/// ```rust
/// use spheroid_grid::*;
///
/// let config = IndexConfigBuilder::new()
///     .cell_width(0.0625)
///     .unwrap()
///     .max_site_distance(0.25)
///     .unwrap()
///     .build()
///     .unwrap();
///
/// assert_eq!(config.dimension(), 33);
/// assert_eq!(config.vicinity_radius(), 5);
/// ```
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndexConfig {
    /// Width of one grid cell in projected coordinates
    pub cell_width: f32,

    /// Upper bound on the distance from any point to its nearest site
    pub max_site_distance: f32,
}

impl IndexConfig {
    /// Number of cells along each axis of an octant
    #[inline]
    pub fn dimension(&self) -> usize {
        dimension_for(self.cell_width)
    }

    /// Total number of cells over all 8 octants
    #[inline]
    pub fn cell_count(&self) -> usize {
        OCTANT_COUNT * self.dimension() * self.dimension()
    }

    /// Half-width, in cells, of the window scanned around each site
    ///
    /// Projecting onto an octant's tangent plane never lengthens a distance, so
    /// a cell within `max_site_distance` of a site is at most
    /// `max_site_distance / cell_width` cells away from the site's own cell.
    /// One extra cell absorbs the flooring of both coordinates.
    ///
    /// Capped at [`dimension`](Self::dimension): such a window already spans
    /// the whole octant from any cell in it.
    #[inline]
    pub fn vicinity_radius(&self) -> i32 {
        let radius = (self.max_site_distance / self.cell_width).ceil() + 1.0;
        radius.min(self.dimension() as f32) as i32
    }
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            cell_width: 0.01,
            max_site_distance: 0.1,
        }
    }
}

/// Number of cells per axis for a given cell width
#[inline]
pub(crate) fn dimension_for(cell_width: f32) -> usize {
    (2.0 / cell_width).ceil() as usize + 1
}

pub(crate) fn validate_cell_width(cell_width: f32) -> Result<f32> {
    if !cell_width.is_finite() || cell_width < MIN_CELL_WIDTH {
        return Err(SpheroidError::InvalidConfig(format!(
            "cell width must be finite and >= {} (got {})",
            MIN_CELL_WIDTH, cell_width
        )));
    }
    Ok(cell_width)
}

fn validate_max_site_distance(distance: f32) -> Result<f32> {
    if !distance.is_finite() || distance <= 0.0 {
        return Err(SpheroidError::InvalidConfig(format!(
            "max site distance must be finite and positive (got {})",
            distance
        )));
    }
    Ok(distance)
}

/// Builder for creating IndexConfig with validation
///
/// Defaults:
/// - cell_width: 0.01
/// - max_site_distance: 0.1
#[derive(Debug, Clone)]
pub struct IndexConfigBuilder {
    cell_width: f32,
    max_site_distance: f32,
}

impl IndexConfigBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        let defaults = IndexConfig::default();
        Self {
            cell_width: defaults.cell_width,
            max_site_distance: defaults.max_site_distance,
        }
    }

    /// Set the cell width in projected coordinates
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the width is not finite or below [`MIN_CELL_WIDTH`]
    pub fn cell_width(mut self, cell_width: f32) -> Result<Self> {
        self.cell_width = validate_cell_width(cell_width)?;
        Ok(self)
    }

    /// Set the guaranteed maximum distance from any point to its nearest site
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the distance is not finite or not positive
    pub fn max_site_distance(mut self, distance: f32) -> Result<Self> {
        self.max_site_distance = validate_max_site_distance(distance)?;
        Ok(self)
    }

    /// Build the configuration
    pub fn build(self) -> Result<IndexConfig> {
        Ok(IndexConfig {
            cell_width: validate_cell_width(self.cell_width)?,
            max_site_distance: validate_max_site_distance(self.max_site_distance)?,
        })
    }
}

impl Default for IndexConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// How a grid derives its nearest-vertex table from its own arrow lengths
///
/// The cell width is a fraction of the shortest arrow so that neighboring
/// vertices never share a cell, and the distance bound is a multiple of the
/// longest arrow since no point is farther than that from its nearest vertex
/// on a well-formed sphere mesh.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridConfig {
    /// Cell width as a fraction of the shortest arrow
    pub cell_width_factor: f32,
    /// Distance bound as a multiple of the longest arrow
    pub max_distance_factor: f32,
}

impl GridConfig {
    /// Derive index parameters from the shortest and longest arrow lengths
    ///
    /// The cell width is clamped to [`MIN_CELL_WIDTH`] for very fine meshes.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the factors or lengths produce invalid parameters
    pub fn index_config(&self, min_arrow_length: f32, max_arrow_length: f32) -> Result<IndexConfig> {
        if !(self.cell_width_factor > 0.0) || !(self.max_distance_factor > 0.0) {
            return Err(SpheroidError::InvalidConfig(format!(
                "grid factors must be positive (got {} and {})",
                self.cell_width_factor, self.max_distance_factor
            )));
        }

        let cell_width = (min_arrow_length * self.cell_width_factor).max(MIN_CELL_WIDTH);

        IndexConfigBuilder::new()
            .cell_width(cell_width)?
            .max_site_distance(max_arrow_length * self.max_distance_factor)?
            .build()
    }
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            cell_width_factor: 1.0 / 8.0,
            max_distance_factor: 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let config = IndexConfigBuilder::new().build().unwrap();
        assert_eq!(config, IndexConfig::default());
        assert_eq!(config.cell_width, 0.01);
        assert_eq!(config.max_site_distance, 0.1);
    }

    #[test]
    fn test_dimension_and_cell_count() {
        let config = IndexConfigBuilder::new()
            .cell_width(0.5)
            .unwrap()
            .build()
            .unwrap();

        assert_eq!(config.dimension(), 5);
        assert_eq!(config.cell_count(), 8 * 5 * 5);
    }

    #[test]
    fn test_vicinity_radius() {
        let config = IndexConfigBuilder::new()
            .cell_width(0.125)
            .unwrap()
            .max_site_distance(1.0)
            .unwrap()
            .build()
            .unwrap();

        // 1.0 / 0.125 = 8, plus one cell of slack
        assert_eq!(config.vicinity_radius(), 9);

        let config = IndexConfigBuilder::new()
            .cell_width(0.125)
            .unwrap()
            .max_site_distance(0.9)
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(config.vicinity_radius(), 9);
    }

    #[test]
    fn test_vicinity_radius_with_huge_bound() {
        let config = IndexConfigBuilder::new()
            .cell_width(MIN_CELL_WIDTH)
            .unwrap()
            .max_site_distance(1e7)
            .unwrap()
            .build()
            .unwrap();

        // clamped to the table rather than overflowing
        assert_eq!(config.vicinity_radius(), config.dimension() as i32);

        let config = IndexConfigBuilder::new()
            .cell_width(0.5)
            .unwrap()
            .max_site_distance(f32::MAX)
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(config.vicinity_radius(), 5);

        // bounds below the cap are untouched
        let config = IndexConfigBuilder::new()
            .cell_width(0.5)
            .unwrap()
            .max_site_distance(1.0)
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(config.vicinity_radius(), 3);
    }

    #[test]
    fn test_builder_invalid_cell_width() {
        assert!(IndexConfigBuilder::new().cell_width(0.0).is_err());
        assert!(IndexConfigBuilder::new().cell_width(-0.1).is_err());
        assert!(IndexConfigBuilder::new().cell_width(f32::NAN).is_err());
        assert!(IndexConfigBuilder::new().cell_width(MIN_CELL_WIDTH / 2.0).is_err());
    }

    #[test]
    fn test_builder_invalid_distance() {
        assert!(IndexConfigBuilder::new().max_site_distance(0.0).is_err());
        assert!(IndexConfigBuilder::new().max_site_distance(-1.0).is_err());
        assert!(IndexConfigBuilder::new()
            .max_site_distance(f32::INFINITY)
            .is_err());
    }

    #[test]
    fn test_grid_config_derivation() {
        let config = GridConfig::default().index_config(0.4, 0.8).unwrap();
        assert!((config.cell_width - 0.05).abs() < 1e-6);
        assert!((config.max_site_distance - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_grid_config_clamps_fine_meshes() {
        let config = GridConfig::default().index_config(1e-5, 0.01).unwrap();
        assert_eq!(config.cell_width, MIN_CELL_WIDTH);
    }

    #[test]
    fn test_grid_config_rejects_bad_factors() {
        let config = GridConfig {
            cell_width_factor: 0.0,
            max_distance_factor: 1.0,
        };
        assert!(config.index_config(0.1, 0.2).is_err());

        let config = GridConfig::default();
        assert!(config.index_config(0.1, 0.0).is_err());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_config_serialization() {
        let config = IndexConfigBuilder::new()
            .cell_width(0.02)
            .unwrap()
            .build()
            .unwrap();

        let json = serde_json::to_string(&config).unwrap();
        let restored: IndexConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, restored);
    }
}
