//! Shared dimension arithmetic for grid-sized parts.
//!
//! Every generator sizes itself through [`GridDims`]: a plain value type
//! holding the unit counts plus the couple of options (wall thickness,
//! lite construction) that feed back into derived dimensions. All
//! methods are pure functions of the fields.

use crate::constants::*;

/// Grid unit counts and the options that affect derived dimensions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridDims {
    /// Length in grid units (x).
    pub length_u: usize,
    /// Width in grid units (y).
    pub width_u: usize,
    /// Height in grid height units (z).
    pub height_u: usize,
    /// Exterior wall thickness.
    pub wall_th: f64,
    /// Lite construction: shelled underside, no separate floor slab.
    pub lite_style: bool,
}

impl GridDims {
    /// Dims for a part of the given unit counts, default wall, regular
    /// construction.
    pub fn new(length_u: usize, width_u: usize, height_u: usize) -> Self {
        Self {
            length_u,
            width_u,
            height_u,
            wall_th: GR_WALL,
            lite_style: false,
        }
    }

    /// Same dims with a different wall thickness.
    pub fn with_wall(mut self, wall_th: f64) -> Self {
        self.wall_th = wall_th;
        self
    }

    /// Same dims with lite construction toggled.
    pub fn with_lite(mut self, lite_style: bool) -> Self {
        self.lite_style = lite_style;
        self
    }

    // =========================================================================
    // Envelope
    // =========================================================================

    /// Full-pitch length (baseplates occupy the whole module).
    pub fn pitch_length(&self) -> f64 {
        self.length_u as f64 * GRU
    }

    /// Full-pitch width.
    pub fn pitch_width(&self) -> f64 {
        self.width_u as f64 * GRU
    }

    /// Overall height of a box of this many height units. The upper lip
    /// sections stand proud of the nominal 7 mm module stack.
    pub fn height(&self) -> f64 {
        self.height_u as f64 * GRHU + (GR_LIP_H - GR_UNDER_H - GR_TOPSIDE_H)
    }

    /// Box outer length: full pitch less the mating clearance.
    pub fn outer_length(&self) -> f64 {
        self.pitch_length() - GR_TOL
    }

    /// Box outer width.
    pub fn outer_width(&self) -> f64 {
        self.pitch_width() - GR_TOL
    }

    /// Interior cavity length.
    pub fn inner_length(&self) -> f64 {
        self.outer_length() - 2.0 * self.wall_th
    }

    /// Interior cavity width.
    pub fn inner_width(&self) -> f64 {
        self.outer_width() - 2.0 * self.wall_th
    }

    /// Centre offset of the corner grid cell along x.
    pub fn half_length(&self) -> f64 {
        (self.length_u as f64 - 1.0) * GRU2
    }

    /// Centre offset of the corner grid cell along y.
    pub fn half_width(&self) -> f64 {
        (self.width_u as f64 - 1.0) * GRU2
    }

    /// Interior half-extent of a single cell measured from its centre.
    pub fn half_inside(&self) -> f64 {
        GRU2 - self.wall_th - GR_TOL / 2.0
    }

    /// Outer corner radius of the box envelope.
    pub fn outer_rad(&self) -> f64 {
        GR_RAD - GR_TOL / 2.0
    }

    /// Corner radius of the interior cavity.
    pub fn inner_rad(&self) -> f64 {
        self.outer_rad() - self.wall_th
    }

    // =========================================================================
    // Interior heights
    // =========================================================================

    /// Interior height below the stacking lip.
    pub fn int_height(&self) -> f64 {
        let lite_gain = if self.lite_style { self.wall_th } else { 0.0 };
        self.height() - GR_LIP_H - GR_BOT_H + lite_gain
    }

    /// Usable interior height including the space inside the lip.
    pub fn max_height(&self) -> f64 {
        self.int_height() + GR_UNDER_H + GR_TOPSIDE_H
    }

    /// Floor thickness above the stacking feet.
    pub fn floor_height(&self) -> f64 {
        if self.lite_style {
            GR_FLOOR - self.wall_th
        } else {
            GR_FLOOR
        }
    }

    /// Vertical extent of the lip undercut after thick walls eat into
    /// it.
    pub fn under_height(&self) -> f64 {
        GR_UNDER_H - (self.wall_th - GR_WALL)
    }

    /// Horizontal depth of the stacking lip measured from the outer
    /// wall face.
    pub fn lip_width(&self) -> f64 {
        GR_UNDER_H + GR_WALL
    }

    /// Interior floor fillet radius that clears the lip undercut.
    /// Interior features (scoops, label shelves, dividers) leave less
    /// room, so the radius is clamped against the lip overhang.
    pub fn safe_fillet_rad(&self, has_features: bool) -> f64 {
        if has_features {
            GR_FILLET.min(self.lip_width() - self.wall_th - 0.05)
        } else {
            GR_FILLET
        }
    }

    // =========================================================================
    // Placement grids
    // =========================================================================

    /// Grid cell centres relative to the corner cell, row-major
    /// (x varies slowest).
    pub fn grid_centres(&self) -> Vec<(f64, f64)> {
        let mut pts = Vec::with_capacity(self.length_u * self.width_u);
        for xi in 0..self.length_u {
            for yi in 0..self.width_u {
                pts.push((xi as f64 * GRU, yi as f64 * GRU));
            }
        }
        pts
    }

    /// Magnet/screw hole centres: four per grid cell on a square of
    /// side 2·13 mm about each cell centre.
    pub fn hole_centres(&self) -> Vec<(f64, f64)> {
        let mut pts = Vec::with_capacity(4 * self.length_u * self.width_u);
        for (cx, cy) in self.grid_centres() {
            for (dx, dy) in [(-1.0, -1.0), (1.0, -1.0), (-1.0, 1.0), (1.0, 1.0)] {
                pts.push((cx + dx * GR_HOLE_DIST, cy - dy * GR_HOLE_DIST));
            }
        }
        pts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn envelope_dims() {
        let d = GridDims::new(2, 3, 5);
        assert_relative_eq!(d.outer_length(), 83.5);
        assert_relative_eq!(d.outer_width(), 125.5);
        assert_relative_eq!(d.height(), 38.8);
        assert_relative_eq!(d.inner_length(), 81.5);
        assert_relative_eq!(d.half_length(), 21.0);
        assert_relative_eq!(d.half_width(), 42.0);
    }

    #[test]
    fn baseplate_pitch_is_full() {
        let d = GridDims::new(4, 3, 0);
        assert_relative_eq!(d.pitch_length(), 168.0);
        assert_relative_eq!(d.pitch_width(), 126.0);
    }

    #[test]
    fn interior_heights() {
        let d = GridDims::new(4, 2, 3);
        assert_relative_eq!(d.height(), 24.8);
        assert_relative_eq!(d.int_height(), 11.0, epsilon = 1e-9);
        assert_relative_eq!(d.max_height(), 13.8, epsilon = 1e-9);
        assert_relative_eq!(d.floor_height(), 2.45);
    }

    #[test]
    fn lite_style_reclaims_floor() {
        let d = GridDims::new(2, 2, 3).with_lite(true);
        assert_relative_eq!(d.int_height(), 11.0 + 1.0, epsilon = 1e-9);
        assert_relative_eq!(d.floor_height(), 1.45, epsilon = 1e-9);
    }

    #[test]
    fn thick_wall_derived_dims() {
        let d = GridDims::new(2, 2, 3).with_wall(2.0);
        assert_relative_eq!(d.inner_length(), 83.5 - 4.0);
        assert_relative_eq!(d.under_height(), 0.6, epsilon = 1e-9);
        assert_relative_eq!(d.inner_rad(), 1.75);
        // Features clamp the fillet below the lip overhang.
        assert_relative_eq!(d.safe_fillet_rad(true), 0.55, epsilon = 1e-9);
        assert_relative_eq!(d.safe_fillet_rad(false), GR_FILLET);
    }

    #[test]
    fn grid_centres_row_major() {
        let d = GridDims::new(2, 3, 1);
        let pts = d.grid_centres();
        assert_eq!(pts.len(), 6);
        assert_eq!(pts[0], (0.0, 0.0));
        assert_eq!(pts[1], (0.0, 42.0));
        assert_eq!(pts[3], (42.0, 0.0));
        assert_eq!(pts[5], (42.0, 84.0));
    }

    #[test]
    fn hole_centres_four_per_cell() {
        let d = GridDims::new(2, 2, 1);
        let pts = d.hole_centres();
        assert_eq!(pts.len(), 16);
        assert_eq!(pts[0], (-13.0, 13.0));
        assert_eq!(pts[3], (13.0, -13.0));
    }
}
