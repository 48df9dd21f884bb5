//! Nearest-site lookup tables on the unit sphere
//!
//! Populates a [`SpatialIndex`] so that each cell holds the id of the site
//! nearest to its midpoint. Since the nearest site is guaranteed to lie within
//! `max_site_distance`, each site only visits the window of cells around it
//! instead of every cell visiting every site.

use glam::Vec3;
use log::{debug, trace};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::cell::{CellId, OCTANT_COUNT, OCTANT_MIN_ALIGNMENT, OCTANT_Z};
use crate::config::{IndexConfig, IndexConfigBuilder};
use crate::error::{check_id_capacity, Result};
use crate::spatial::SpatialIndex;

/// Index of a site in the slice it was populated from
pub type SiteId = u32;

/// Stored value of a cell no site reached
pub const UNSET: SiteId = SiteId::MAX;

/// Fill a table with the id of the nearest site for every reachable cell
///
/// For each site and octant, the octant is skipped when the site cannot be
/// within `max_site_distance` of it, or when the cell the site projects onto
/// is already farther than that. Otherwise a square window of
/// `2 * vicinity_radius + 1` cells around that cell, clipped to the table, is
/// scanned and every cell whose midpoint is within range keeps the closest
/// site seen so far.
///
/// Equal distances keep the site that was processed first. Cells out of range
/// of every site stay [`UNSET`].
///
/// Cost is `O(sites * vicinity_radius²)` rather than `O(sites * cells)`.
///
/// # Errors
///
/// Returns `IdOverflow` if there are so many sites that one would be numbered
/// [`UNSET`]
pub fn populate_nearest(sites: &[Vec3], config: &IndexConfig) -> Result<SpatialIndex<SiteId>> {
    check_id_capacity("sites", sites.len(), UNSET as u64)?;

    let max_distance = config.max_site_distance;
    let cell_width = config.cell_width;
    let radius = config.vicinity_radius();

    debug!(
        "populating {} cells from {} sites (vicinity radius {})",
        config.cell_count(),
        sites.len(),
        radius
    );

    // best known (site, distance) per cell; distances are dropped afterwards
    let mut working = SpatialIndex::from_config(config, (UNSET, f32::INFINITY));
    let dimension = working.dimension();

    // ids stay below UNSET after the capacity check
    for (site_id, &site) in sites.iter().enumerate() {
        let site_id = site_id as SiteId;
        for octant in 0..OCTANT_COUNT {
            if OCTANT_Z[octant].dot(site) < OCTANT_MIN_ALIGNMENT - max_distance {
                trace!("site {} cannot reach octant {}", site_id, octant);
                continue;
            }
            let center = CellId::project(site, octant, cell_width);
            if site.distance(center.midpoint(cell_width)) > max_distance {
                trace!("site {} projects too far from octant {}", site_id, octant);
                continue;
            }
            for dx in window(center.x, radius, dimension) {
                for dy in window(center.y, radius, dimension) {
                    let cell = center.offset(dx, dy);
                    let distance = site.distance(cell.midpoint(cell_width));
                    if distance > max_distance {
                        continue;
                    }
                    let best = working.get_cell_mut(cell);
                    if distance < best.1 {
                        *best = (site_id, distance);
                    }
                }
            }
        }
    }

    Ok(working.map(|(site_id, _)| site_id))
}

/// Offsets from `center` within `radius` that stay inside `[0, dimension)`
fn window(center: i32, radius: i32, dimension: usize) -> std::ops::RangeInclusive<i32> {
    let dimension = dimension as i32;
    let low = (-radius).max(center.saturating_neg());
    let high = radius.min((dimension - 1).saturating_sub(center));
    low..=high
}

/// Constant-time nearest-site lookup over the unit sphere
///
/// # Example
///
/// ```
/// use spheroid_grid::*;
///
/// let sites = [Vec3::X, Vec3::Y, Vec3::Z, Vec3::NEG_X, Vec3::NEG_Y, Vec3::NEG_Z];
/// let voronoi = VoronoiIndex::new(&sites, 0.02, 1.0).unwrap();
///
/// assert_eq!(voronoi.get(Vec3::new(0.9, 0.1, 0.2).normalize()), Some(0));
/// assert_eq!(voronoi.get(Vec3::new(-0.1, -0.2, -0.9).normalize()), Some(5));
/// ```
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct VoronoiIndex {
    config: IndexConfig,
    site_count: usize,
    table: SpatialIndex<SiteId>,
}

impl VoronoiIndex {
    /// Build a lookup table for `sites`
    ///
    /// # Errors
    ///
    /// - `InvalidConfig` if either parameter is invalid
    /// - `IdOverflow` if there are too many sites to number
    pub fn new(sites: &[Vec3], cell_width: f32, max_site_distance: f32) -> Result<Self> {
        let config = IndexConfigBuilder::new()
            .cell_width(cell_width)?
            .max_site_distance(max_site_distance)?
            .build()?;
        Self::from_config(sites, config)
    }

    /// Build a lookup table from a validated configuration
    ///
    /// # Errors
    ///
    /// Returns `IdOverflow` if there are too many sites to number
    pub fn from_config(sites: &[Vec3], config: IndexConfig) -> Result<Self> {
        let table = populate_nearest(sites, &config)?;

        let unset = table.values().iter().filter(|&&id| id == UNSET).count();
        debug!(
            "populated {} of {} cells ({} unreachable)",
            table.cell_count() - unset,
            table.cell_count(),
            unset
        );

        Ok(Self {
            config,
            site_count: sites.len(),
            table,
        })
    }

    /// Id of the nearest site, or `None` if no site was in range
    #[inline]
    pub fn get(&self, point: Vec3) -> Option<SiteId> {
        match *self.table.get(point) {
            UNSET => None,
            id => Some(id),
        }
    }

    /// Look up many directions at once
    pub fn get_many(&self, points: &[Vec3]) -> Vec<Option<SiteId>> {
        points.iter().map(|&p| self.get(p)).collect()
    }

    #[inline]
    pub fn config(&self) -> &IndexConfig {
        &self.config
    }

    #[inline]
    pub fn site_count(&self) -> usize {
        self.site_count
    }

    /// Underlying table, with [`UNSET`] marking unreachable cells
    #[inline]
    pub fn table(&self) -> &SpatialIndex<SiteId> {
        &self.table
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cube_sites() -> Vec<Vec3> {
        [
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(0.0, 0.0, 1.0),
            Vec3::new(-1.0, 0.0, 0.0),
            Vec3::new(0.0, -1.0, 0.0),
            Vec3::new(0.0, 0.0, -1.0),
            Vec3::new(-1.0, -1.0, -1.0),
            Vec3::new(1.0, -1.0, -1.0),
            Vec3::new(-1.0, 1.0, -1.0),
            Vec3::new(1.0, 1.0, -1.0),
            Vec3::new(-1.0, -1.0, 1.0),
            Vec3::new(1.0, -1.0, 1.0),
            Vec3::new(-1.0, 1.0, 1.0),
            Vec3::new(1.0, 1.0, 1.0),
            Vec3::new(1.0, 1.0, 1.0),
        ]
        .iter()
        .map(|v| v.normalize())
        .collect()
    }

    #[test]
    fn test_purity() {
        let voronoi = VoronoiIndex::new(&cube_sites(), 0.01, 0.1).unwrap();
        assert_eq!(voronoi.get(Vec3::X), voronoi.get(Vec3::X));
    }

    #[test]
    fn test_obvious_answers() {
        let sites = cube_sites();
        let voronoi = VoronoiIndex::new(&sites, 0.01, 0.1).unwrap();

        // the repeated last site never wins over its first occurrence
        for (id, &site) in sites.iter().take(14).enumerate() {
            assert_eq!(voronoi.get(site), Some(id as SiteId), "site {}", id);
        }
    }

    #[test]
    fn test_far_cells_stay_unset() {
        let voronoi = VoronoiIndex::new(&[Vec3::Z], 0.05, 0.2).unwrap();

        assert_eq!(voronoi.get(Vec3::Z), Some(0));
        assert_eq!(voronoi.get(Vec3::NEG_Z), None);
        assert_eq!(voronoi.get(Vec3::X), None);
    }

    #[test]
    fn test_no_sites() {
        let voronoi = VoronoiIndex::new(&[], 0.1, 0.5).unwrap();
        assert_eq!(voronoi.site_count(), 0);
        assert!(voronoi.table().values().iter().all(|&id| id == UNSET));
    }

    #[test]
    fn test_closer_site_wins() {
        let sites = [Vec3::Z, Vec3::new(0.3, 0.0, 1.0).normalize()];
        let voronoi = VoronoiIndex::new(&sites, 0.02, 0.6).unwrap();

        assert_eq!(voronoi.get(Vec3::new(-0.1, 0.0, 1.0).normalize()), Some(0));
        assert_eq!(voronoi.get(Vec3::new(0.4, 0.0, 1.0).normalize()), Some(1));
    }

    #[test]
    fn test_get_many() {
        let sites = cube_sites();
        let voronoi = VoronoiIndex::new(&sites, 0.01, 0.1).unwrap();
        let ids = voronoi.get_many(&sites[..3]);
        assert_eq!(ids, vec![Some(0), Some(1), Some(2)]);
    }

    #[test]
    fn test_window_stays_in_table() {
        assert_eq!(window(10, 3, 21), -3..=3);
        assert_eq!(window(1, 3, 21), -1..=3);
        assert_eq!(window(19, 3, 21), -3..=1);
        assert_eq!(window(0, 50, 5), 0..=4);
        assert!(window(30, 3, 21).is_empty());
        assert!(window(-10, 3, 21).is_empty());
    }

    #[test]
    fn test_oversized_bound_covers_everything() {
        // any bound past the sphere's diameter behaves like the diameter
        let voronoi = VoronoiIndex::new(&[Vec3::Z], 0.1, 1e7).unwrap();

        assert_eq!(voronoi.config().vicinity_radius(), voronoi.table().dimension() as i32);
        assert!(voronoi.table().values().iter().all(|&id| id == 0));
        assert_eq!(voronoi.get(Vec3::NEG_Z), Some(0));
    }

    #[test]
    fn test_invalid_parameters() {
        assert!(VoronoiIndex::new(&[Vec3::X], 0.0, 0.1).is_err());
        assert!(VoronoiIndex::new(&[Vec3::X], 0.01, -0.1).is_err());
    }
}
