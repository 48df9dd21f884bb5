//! Octahedral cell addressing
//!
//! The unit sphere is split into 8 octants, one per combination of axis signs.
//! Each octant is parameterized by an orthonormal basis: `Z` points at the
//! octant's corner direction and `X`/`Y` span the plane tangent to it. A point
//! is addressed by its octant and the floor of its `X`/`Y` projections divided
//! by the cell width.

use glam::Vec3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Number of sides on the octahedron
pub const OCTANT_COUNT: usize = 8;

const R2: f32 = std::f32::consts::FRAC_1_SQRT_2;
const R3: f32 = 0.577_350_26;
const R6: f32 = 0.408_248_3;

// Z = normalize(sx, sy, sz)
macro_rules! corner {
    ($sx:literal, $sy:literal, $sz:literal) => {
        Vec3::new($sx * R3, $sy * R3, $sz * R3)
    };
}

// X = normalize(cross(Z, +z))
macro_rules! tangent_x {
    ($sx:literal, $sy:literal, $sz:literal) => {
        Vec3::new($sy * R2, -$sx * R2, 0.0)
    };
}

// Y = normalize(cross(Z, X))
macro_rules! tangent_y {
    ($sx:literal, $sy:literal, $sz:literal) => {
        Vec3::new($sx * $sz * R6, $sy * $sz * R6, -2.0 * R6)
    };
}

macro_rules! octant_table {
    ($axis:ident) => {
        [
            $axis!(-1.0, -1.0, -1.0),
            $axis!(1.0, -1.0, -1.0),
            $axis!(-1.0, 1.0, -1.0),
            $axis!(1.0, 1.0, -1.0),
            $axis!(-1.0, -1.0, 1.0),
            $axis!(1.0, -1.0, 1.0),
            $axis!(-1.0, 1.0, 1.0),
            $axis!(1.0, 1.0, 1.0),
        ]
    };
}

/// Corner direction of each octant, indexed by sign pattern
pub const OCTANT_Z: [Vec3; OCTANT_COUNT] = octant_table!(corner);
/// First tangent axis of each octant
pub const OCTANT_X: [Vec3; OCTANT_COUNT] = octant_table!(tangent_x);
/// Second tangent axis of each octant
pub const OCTANT_Y: [Vec3; OCTANT_COUNT] = octant_table!(tangent_y);

/// Smallest possible dot product between an octant's corner and a unit vector inside it
pub const OCTANT_MIN_ALIGNMENT: f32 = R3;

/// Octant containing a direction: bit `i` is set when coordinate `i` is positive
///
/// The zero vector maps to octant 0. That result is well defined but carries no
/// geometric meaning.
#[inline]
pub fn octant_of(point: Vec3) -> usize {
    ((point.x > 0.0) as usize) | (((point.y > 0.0) as usize) << 1) | (((point.z > 0.0) as usize) << 2)
}

/// Address of a cell: 2D grid coordinates within an octant
///
/// Coordinates are signed so that windows around a cell can step past the
/// grid edges; [`SpatialIndex`](crate::spatial::SpatialIndex) clamps them when
/// turning a cell into a memory offset.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellId {
    pub x: i32,
    pub y: i32,
    pub octant: usize,
}

impl CellId {
    #[inline]
    pub fn new(x: i32, y: i32, octant: usize) -> Self {
        Self { x, y, octant }
    }

    /// Cell addressed by a point projected onto the given octant
    ///
    /// The octant does not need to be the one containing the point; the
    /// Voronoi populator projects each site onto all octants it may reach.
    #[inline]
    pub fn project(point: Vec3, octant: usize, cell_width: f32) -> Self {
        let x2d = OCTANT_X[octant].dot(point);
        let y2d = OCTANT_Y[octant].dot(point);
        Self {
            x: ((x2d + 1.0) / cell_width).floor() as i32,
            y: ((y2d + 1.0) / cell_width).floor() as i32,
            octant,
        }
    }

    /// Cell containing a direction
    #[inline]
    pub fn of(point: Vec3, cell_width: f32) -> Self {
        Self::project(point, octant_of(point), cell_width)
    }

    /// Same octant, shifted by a number of cells along each axis
    ///
    /// Coordinates saturate at the `i32` range instead of wrapping.
    #[inline]
    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
            octant: self.octant,
        }
    }

    /// Whether both coordinates lie in `[0, dimension)`
    #[inline]
    pub fn is_within(&self, dimension: usize) -> bool {
        let dimension = dimension as i32;
        (0..dimension).contains(&self.x) && (0..dimension).contains(&self.y)
    }

    /// Approximate 3D position of the cell, used to estimate distances
    ///
    /// The radial component is reconstructed as `sqrt(max(1 - x² - y², 0))`
    /// from the cell's lower corner, so the result is close to, but not exactly
    /// on, the unit sphere.
    pub fn midpoint(&self, cell_width: f32) -> Vec3 {
        let x2d = self.x as f32 * cell_width - 1.0;
        let y2d = self.y as f32 * cell_width - 1.0;
        let z2d = (1.0 - x2d * x2d - y2d * y2d).max(0.0).sqrt();

        OCTANT_X[self.octant] * x2d + OCTANT_Y[self.octant] * y2d + OCTANT_Z[self.octant] * z2d
    }
}
