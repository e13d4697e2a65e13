//! Box/bin generator.
//!
//! A bin is a lattice of truncated-pyramid stacking feet fused under a
//! wall prism, hollowed by an interior cavity whose rim is either the
//! stacking-lip profile or a plain band. Options add compartment
//! dividers, scoop cutouts, label ledges, magnet/screw holes, a solid
//! fill, thin-wall sizing, and a lite construction that drops the floor
//! slab into the feet.
//!
//! Rendering is a fixed pipeline: validate, shell, cavity cut,
//! dividers, scoops, labels, interior fillet, holes, final placement.
//! The order is a correctness requirement — the cavity must exist
//! before interior features are unioned on, and filleting must run
//! after all unions but before drilling.

use crate::constants::*;
use crate::dims::GridDims;
use crate::solid::Solid;
use crate::{GfError, Result};
use gridfin_ir::{
    EdgeQuery, FaceQuery, Plane, Profile, ProfileStep, ScalarFilter, Vec2, VertexFillet,
};

/// Smallest useful compartment span between divider walls.
const MIN_COMPARTMENT: f64 = 5.0;
/// Bridging strip thickness for unsupported hole printing.
const BRIDGE_TH: f64 = 0.4;
/// Bridging strip width.
const BRIDGE_W: f64 = 1.0;

/// Box options.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxParams {
    /// Length in grid units.
    pub length_u: usize,
    /// Width in grid units.
    pub width_u: usize,
    /// Height in 7 mm height units.
    pub height_u: usize,
    /// Number of length-wise interior divider walls.
    pub length_div: usize,
    /// Number of width-wise interior divider walls.
    pub width_div: usize,
    /// Add a radiused scoop along the front interior wall.
    pub scoops: bool,
    /// Add label-holder ledges along the back wall and dividers.
    pub labels: bool,
    /// Fill the interior solid (for carving custom inserts).
    pub solid: bool,
    /// Fraction of the usable interior height filled when `solid`.
    pub solid_ratio: f64,
    /// Drill magnet/screw counterbores in the base.
    pub holes: bool,
    /// Bridge the counterbores so they print without supports.
    pub unsupported_holes: bool,
    /// Replace the stacking lip with a plain rim.
    pub no_lip: bool,
    /// Exterior wall thickness.
    pub wall_th: f64,
    /// Lite construction: no floor slab, interior drops into the feet.
    pub lite_style: bool,
    /// Label ledge width.
    pub label_width: f64,
    /// Label ledge overhang height.
    pub label_height: f64,
    /// Label ledge vertical lip thickness.
    pub label_lip_height: f64,
    /// Scoop radius.
    pub scoop_rad: f64,
    /// Fillet the interior floor and wall transitions.
    pub fillet_interior: bool,
}

impl Default for BoxParams {
    fn default() -> Self {
        Self {
            length_u: 1,
            width_u: 1,
            height_u: 1,
            length_div: 0,
            width_div: 0,
            scoops: false,
            labels: false,
            solid: false,
            solid_ratio: 1.0,
            holes: false,
            unsupported_holes: false,
            no_lip: false,
            wall_th: GR_WALL,
            lite_style: false,
            label_width: 12.0,
            label_height: 10.0,
            label_lip_height: 0.8,
            scoop_rad: 11.0,
            fillet_interior: true,
        }
    }
}

/// Gridfinity box generator.
#[derive(Debug, Clone)]
pub struct GridfinityBox {
    params: BoxParams,
    dims: GridDims,
}

impl GridfinityBox {
    /// Validate the feature combination and build a generator.
    pub fn new(params: BoxParams) -> Result<Self> {
        for (axis, value) in [
            ('x', params.length_u),
            ('y', params.width_u),
            ('z', params.height_u),
        ] {
            if value == 0 {
                return Err(GfError::UnitCount { axis, value });
            }
        }
        if !(0.5..=2.5).contains(&params.wall_th) {
            return Err(GfError::WallThickness(params.wall_th));
        }
        if params.lite_style {
            if params.solid {
                return Err(GfError::LiteSolidConflict);
            }
            if params.holes {
                return Err(GfError::LiteHolesConflict);
            }
            if params.wall_th > 1.5 {
                return Err(GfError::LiteWall(params.wall_th));
            }
        }
        let dims = GridDims::new(params.length_u, params.width_u, params.height_u)
            .with_wall(params.wall_th)
            .with_lite(params.lite_style);
        // Lite dividers snap to the cell walls regardless of the
        // requested count, so only the standard style is capped.
        if !params.lite_style {
            for (axis, count, units, span) in [
                ('x', params.length_div, params.length_u, dims.inner_length()),
                ('y', params.width_div, params.width_u, dims.inner_width()),
            ] {
                let max = (units - 1).min(((span / MIN_COMPARTMENT) as usize).saturating_sub(1));
                if count > max {
                    return Err(GfError::DividerCount { axis, count, max });
                }
            }
        }
        Ok(Self { params, dims })
    }

    /// Plain box of the given unit counts.
    pub fn sized(length_u: usize, width_u: usize, height_u: usize) -> Result<Self> {
        Self::new(BoxParams {
            length_u,
            width_u,
            height_u,
            ..BoxParams::default()
        })
    }

    /// The generator's options.
    pub fn params(&self) -> &BoxParams {
        &self.params
    }

    /// The shared dimension calculator.
    pub fn dims(&self) -> &GridDims {
        &self.dims
    }

    /// Height of the top surface of a solid box, or the floor height of
    /// an empty box, measured from the part underside. Affine in the
    /// fill ratio.
    pub fn top_ref_height(&self) -> f64 {
        if self.params.solid {
            self.dims.max_height() * self.params.solid_ratio + GR_BOT_H
        } else {
            GR_BOT_H
        }
    }

    /// Divider walls lying on grid cell boundaries in lite style; the
    /// unsupported span under a mid-cell wall cannot print.
    fn effective_length_div(&self) -> usize {
        if self.params.lite_style && self.params.length_div > 0 {
            self.params.length_u - 1
        } else {
            self.params.length_div
        }
    }

    fn effective_width_div(&self) -> usize {
        if self.params.lite_style && self.params.width_div > 0 {
            self.params.width_u - 1
        } else {
            self.params.width_div
        }
    }

    fn has_interior_features(&self) -> bool {
        !self.params.solid
            && (self.params.scoops
                || self.params.labels
                || self.effective_length_div() > 0
                || self.effective_width_div() > 0)
    }

    /// Label ledge height clamped so the ledge clears the interior
    /// floor fillet. With `from_bottom` the result is the ledge
    /// underside height above the cavity floor, which also feeds the
    /// interior fillet edge selection.
    pub fn safe_label_height(&self, backwall: bool, from_bottom: bool) -> f64 {
        let mut lw = self.params.label_width;
        if backwall {
            lw += self.dims.lip_width();
        }
        let mut lh = self.params.label_height * (lw / self.params.label_width);
        let mut yl = self.dims.max_height() - self.params.label_height + GR_WALL;
        if backwall {
            yl -= self.dims.lip_width();
        }
        if yl < 0.0 {
            lh = self.dims.max_height() - 1.5 * GR_FILLET - 0.1;
        } else if yl < 1.5 * GR_FILLET {
            lh -= 1.5 * GR_FILLET - yl + 0.1;
        }
        if from_bottom {
            let ws = self.params.label_height.atan2(self.params.label_width).sin();
            let wall = if backwall { GR_WALL } else { GR_DIV_WALL };
            lh = self.dims.max_height() + self.dims.floor_height() - lh + ws * wall;
        }
        lh
    }

    // =========================================================================
    // Pipeline stages (build coordinates: corner cell centred on the
    // origin, feet below z = 0; final placement happens in `render`)
    // =========================================================================

    /// Interior cavity cutter: inner prism topped with the lip (or
    /// plain-rim) sweep, reduced by the solid fill and the scoop's
    /// front-wall clearance strip. Built once per render and shared by
    /// every stage that clips against it.
    fn interior_cavity(&self) -> Solid {
        let d = &self.dims;
        let profile = Profile::RoundedRect {
            length: d.inner_length(),
            width: d.inner_width(),
            radius: d.inner_rad(),
        };
        let mut steps = vec![ProfileStep::Straight {
            height: d.int_height(),
        }];
        steps.extend(if self.params.no_lip {
            no_lip_profile()
        } else {
            lip_profile()
        });
        let mut cavity = Solid::extrude_steps("interior", profile.clone(), Plane::Xy, steps)
            .translate(d.half_length(), d.half_width(), d.floor_height());

        if self.params.solid {
            let fill = Solid::extrude(
                "solid_fill",
                profile,
                Plane::Xy,
                d.max_height() * self.params.solid_ratio,
            )
            .translate(d.half_length(), d.half_width(), d.floor_height());
            cavity = cavity - fill;
        }
        if self.params.scoops && !self.params.no_lip && !self.params.lite_style {
            // Clear the lip undercut along the front wall so the scoop
            // meets the wall flush.
            let strip = Solid::block(
                "scoop_clearance",
                d.inner_length(),
                2.0 * GR_UNDER_H,
                d.max_height(),
            )
            .translate(d.half_length(), -d.half_inside(), d.floor_height());
            cavity = cavity - strip;
        }
        if self.params.lite_style {
            cavity = cavity + self.foot_pockets();
        }
        cavity
    }

    /// Lite-style pockets that drop the interior into each stacking
    /// foot, leaving a wall-thickness skin.
    fn foot_pockets(&self) -> Solid {
        let d = &self.dims;
        let w = self.params.wall_th;
        let pocket = Solid::extrude_steps(
            "foot_pocket",
            Profile::RoundedRect {
                length: GRU - 2.0 * (w + GR_TOL / 2.0),
                width: GRU - 2.0 * (w + GR_TOL / 2.0),
                radius: GR_RAD - w,
            },
            Plane::Xy,
            box_foot_profile(),
        )
        .mirror_z()
        .translate(0.0, 0.0, d.floor_height());
        pocket.replicated_at(&d.grid_centres())
    }

    /// Stage 2: feet lattice trimmed to the outer envelope, fused with
    /// the wall prism, hollowed by the cavity.
    fn render_shell(&self, cavity: &Solid) -> Solid {
        let d = &self.dims;
        let foot = Solid::extrude_steps(
            "foot",
            Profile::RoundedRect {
                length: GRU,
                width: GRU,
                radius: GR_RAD,
            },
            Plane::Xy,
            box_foot_profile(),
        )
        .mirror_z();
        let feet = foot.replicated_at(&d.grid_centres());

        let outer = Profile::RoundedRect {
            length: d.outer_length(),
            width: d.outer_width(),
            radius: d.outer_rad(),
        };
        let walls = Solid::extrude(
            "walls",
            outer.clone(),
            Plane::Xy,
            d.height() - GR_BASE_HEIGHT,
        )
        .translate(d.half_length(), d.half_width(), 0.0);
        let trim = Solid::extrude("foot_trim", outer, Plane::Xy, GR_BASE_HEIGHT + 1.0)
            .translate(d.half_length(), d.half_width(), -GR_BASE_HEIGHT - 0.5);

        (trim & feet) + walls - cavity.clone()
    }

    /// Stage 4: evenly spaced partition walls across the inner span.
    fn render_dividers(&self) -> Option<Solid> {
        let d = &self.dims;
        let mut result: Option<Solid> = None;
        let length_div = self.effective_length_div();
        if length_div > 0 && !self.params.solid {
            let wall = Solid::block(
                "length_divider",
                GR_DIV_WALL,
                d.outer_width(),
                d.max_height(),
            )
            .translate(0.0, 0.0, d.floor_height());
            let xl = d.inner_length() / (length_div + 1) as f64;
            let pts: Vec<(f64, f64)> = (0..length_div)
                .map(|x| ((x + 1) as f64 * xl - d.half_inside(), d.half_width()))
                .collect();
            result = Some(wall.replicated_at(&pts));
        }
        let width_div = self.effective_width_div();
        if width_div > 0 && !self.params.solid {
            let wall = Solid::block(
                "width_divider",
                d.outer_length(),
                GR_DIV_WALL,
                d.max_height(),
            )
            .translate(0.0, 0.0, d.floor_height());
            let yl = d.inner_width() / (width_div + 1) as f64;
            let pts: Vec<(f64, f64)> = (0..width_div)
                .map(|y| (d.half_length(), (y + 1) as f64 * yl - d.half_inside()))
                .collect();
            let walls = wall.replicated_at(&pts);
            result = Some(match result {
                Some(r) => r + walls,
                None => walls,
            });
        }
        result
    }

    /// One quarter-round scoop bar spanning the inner length, resting
    /// on the cavity floor, centred in y.
    fn scoop_bar(&self) -> Solid {
        let d = &self.dims;
        let srad = self.params.scoop_rad.min(d.int_height() - 0.1);
        let bar = Solid::extrude(
            "scoop",
            Profile::Rect {
                length: srad,
                width: srad,
            },
            Plane::Yz,
            d.inner_length(),
        );
        let round = Solid::cylinder("scoop_round", srad, d.inner_length())
            .rotate_y(90.0)
            .translate(0.0, srad / 2.0, srad / 2.0);
        (bar - round).translate(0.0, 0.0, srad / 2.0 + self.dims.floor_height())
    }

    /// Stage 5: scoop along the front wall, replicated along width
    /// dividers, clipped against the cavity so nothing pokes through
    /// the rounded exterior corners.
    fn render_scoops(&self, cavity: &Solid) -> Option<Solid> {
        if !self.params.scoops || self.params.solid {
            return None;
        }
        let d = &self.dims;
        let srad = self.params.scoop_rad.min(d.int_height() - 0.1);
        let bar = self.scoop_bar();

        let mut yo = -d.half_inside() + srad / 2.0;
        if !self.params.no_lip {
            yo += GR_UNDER_H;
        }
        let front = bar.translate(-d.half_inside(), yo, 0.0);
        let mut r = front & cavity.clone();

        let width_div = self.effective_width_div();
        if width_div > 0 {
            let yl = d.inner_width() / (width_div + 1) as f64;
            let pts: Vec<(f64, f64)> = (0..width_div)
                .map(|y| (-d.half_inside(), (y + 1) as f64 * yl - d.half_inside()))
                .collect();
            let on_dividers = bar
                .replicated_at(&pts)
                .translate(0.0, GR_DIV_WALL / 2.0 + srad / 2.0, 0.0);
            r = r + (on_dividers & cavity.clone());
        }
        Some(r)
    }

    /// Wedge cross-section of a label ledge, hanging below the sketch
    /// origin, with the lip vertex filleted.
    fn label_wedge(&self, width: f64, drop: f64) -> Profile {
        Profile::Polygon {
            points: vec![
                Vec2::new(0.0, 0.0),
                Vec2::new(width, 0.0),
                Vec2::new(width, -drop),
                Vec2::new(0.0, -self.params.label_lip_height),
            ],
            fillets: vec![VertexFillet {
                vertex: 3,
                radius: self.params.label_lip_height / 2.0,
            }],
        }
    }

    /// Stage 6: back-wall label ledge (width compensated for the lip
    /// overhang) plus per-compartment ledges along width dividers.
    fn render_labels(&self, cavity: &Solid) -> Option<Solid> {
        if !self.params.labels || self.params.solid {
            return None;
        }
        let d = &self.dims;
        let lw = self.params.label_width + d.lip_width();
        let back_wedge = Solid::extrude(
            "back_label",
            self.label_wedge(lw, self.safe_label_height(true, false)),
            Plane::Yz,
            d.inner_length(),
        );
        let yo = -lw + d.outer_width() / 2.0 + d.half_width() + GR_WALL / 4.0;
        let back = back_wedge.translate(
            -d.half_inside(),
            yo,
            d.floor_height() + d.max_height(),
        );
        let mut r = back & cavity.clone();

        let width_div = self.effective_width_div();
        if width_div > 0 {
            let wedge = Solid::extrude(
                "divider_label",
                self.label_wedge(self.params.label_width, self.safe_label_height(false, false)),
                Plane::Yz,
                d.inner_length(),
            )
            .translate(
                0.0,
                -self.params.label_width,
                d.floor_height() + d.max_height(),
            );
            let yl = d.inner_width() / (width_div + 1) as f64;
            let pts: Vec<(f64, f64)> = (0..width_div)
                .map(|y| {
                    (
                        -d.half_inside(),
                        (y + 1) as f64 * yl - d.half_inside() + GR_DIV_WALL / 2.0,
                    )
                })
                .collect();
            r = r + (wedge.replicated_at(&pts) & cavity.clone());
        }
        Some(r)
    }

    /// Stage 7 edge selection: horizontal edges at the floor and label
    /// shelf heights, plus tall vertical edges, minus anything below
    /// the floor reference (the foot zone must stay sharp).
    fn interior_fillet_edges(&self) -> EdgeQuery {
        let floor = self.dims.floor_height();
        let mut heights = vec![floor];
        if self.params.labels {
            heights.push(self.safe_label_height(true, true));
            heights.push(self.safe_label_height(false, true));
        }
        (EdgeQuery::AtZ(ScalarFilter::equals_tol(heights, 0.5))
            | EdgeQuery::vertical_longer_than(5.0))
            - EdgeQuery::AtZ(ScalarFilter::Less { bound: floor })
    }

    /// Stage 8: counterbored magnet/screw holes from the underside,
    /// optionally bridged for supportless printing.
    fn render_holes(&self, body: Solid) -> Solid {
        let pts: Vec<Vec2> = self
            .dims
            .hole_centres()
            .into_iter()
            .map(|(x, y)| Vec2::new(x, -y))
            .collect();
        let mut body = body.counterbore_holes(
            FaceQuery::NegZ,
            pts,
            GR_BOLT_D,
            GR_HOLE_D,
            GR_HOLE_H,
            GR_BOLT_H,
        );
        if self.params.unsupported_holes {
            let strip = Solid::block("hole_bridge", GR_HOLE_D, BRIDGE_W, BRIDGE_TH);
            let z = -GR_BASE_HEIGHT + GR_HOLE_H - BRIDGE_TH / 2.0;
            let mut bridges = Solid::empty("hole_bridges");
            for (x, y) in self.dims.hole_centres() {
                for side in [-1.0, 1.0] {
                    bridges = bridges
                        + strip.translate(x, y + side * (GR_BOLT_D / 2.0 + BRIDGE_W / 2.0), z);
                }
            }
            body = body + bridges;
        }
        body
    }

    /// Build the box solid, centred in x and y with its underside on
    /// z = 0.
    pub fn render(&self) -> Solid {
        let d = &self.dims;
        let cavity = self.interior_cavity();
        let mut r = self.render_shell(&cavity);
        for stage in [
            self.render_dividers(),
            self.render_scoops(&cavity),
            self.render_labels(&cavity),
        ] {
            if let Some(s) = stage {
                r = r + s;
            }
        }
        if !self.params.solid && self.params.fillet_interior {
            r = r.fillet(
                self.interior_fillet_edges(),
                d.safe_fillet_rad(self.has_interior_features()),
            );
        }
        if self.params.holes {
            r = self.render_holes(r);
        }
        r.translate(-d.half_length(), -d.half_width(), GR_BASE_HEIGHT)
            .named(self.filename())
    }

    /// Descriptive part filename stem.
    pub fn filename(&self) -> String {
        let p = &self.params;
        let mut name = if p.lite_style {
            String::from("gf_box_lite_")
        } else {
            String::from("gf_box_")
        };
        name.push_str(&format!("{}x{}x{}", p.length_u, p.width_u, p.height_u));
        if p.length_div > 0 && !p.solid {
            name.push_str(&format!("_div{}", p.length_div));
        }
        if p.width_div > 0 && !p.solid {
            if p.length_div > 0 {
                name.push_str(&format!("x{}", p.width_div));
            } else {
                name.push_str(&format!("_div_x{}", p.width_div));
            }
        }
        if (p.wall_th - GR_WALL).abs() > 1e-3 {
            name.push_str(&format!("_{:.2}", p.wall_th));
        }
        if p.no_lip {
            name.push_str("_basic");
        }
        if p.holes {
            name.push_str("_holes");
        }
        if p.solid {
            name.push_str("_solid");
        } else {
            if p.scoops {
                name.push_str("_scoops");
            }
            if p.labels {
                name.push_str("_labels");
            }
        }
        name
    }
}

/// Convenience generator for a solid (filled) box.
#[derive(Debug, Clone)]
pub struct GridfinitySolidBox(GridfinityBox);

impl GridfinitySolidBox {
    /// Solid box of the given unit counts, fully filled.
    pub fn new(length_u: usize, width_u: usize, height_u: usize) -> Result<Self> {
        Self::with_ratio(length_u, width_u, height_u, 1.0)
    }

    /// Solid box filled to a fraction of the usable interior height.
    pub fn with_ratio(
        length_u: usize,
        width_u: usize,
        height_u: usize,
        solid_ratio: f64,
    ) -> Result<Self> {
        Ok(Self(GridfinityBox::new(BoxParams {
            length_u,
            width_u,
            height_u,
            solid: true,
            solid_ratio,
            ..BoxParams::default()
        })?))
    }

    /// The underlying box generator.
    pub fn as_box(&self) -> &GridfinityBox {
        &self.0
    }

    /// Height of the top surface above the part underside.
    pub fn top_ref_height(&self) -> f64 {
        self.0.top_ref_height()
    }

    /// Build the solid, centred in x and y with its underside on z = 0.
    pub fn render(&self) -> Solid {
        self.0.render()
    }

    /// Descriptive part filename stem.
    pub fn filename(&self) -> String {
        self.0.filename()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn box_with(f: impl FnOnce(&mut BoxParams)) -> GridfinityBox {
        let mut p = BoxParams {
            length_u: 2,
            width_u: 3,
            height_u: 5,
            ..BoxParams::default()
        };
        f(&mut p);
        GridfinityBox::new(p).unwrap()
    }

    #[test]
    fn basic_box_envelope() {
        let b = box_with(|_| {});
        assert_eq!(b.filename(), "gf_box_2x3x5");
        let r = b.render();
        let (x, y, z) = r.size();
        assert_relative_eq!(x, 83.5, epsilon = 1e-9);
        assert_relative_eq!(y, 125.5, epsilon = 1e-9);
        assert_relative_eq!(z, 38.8, epsilon = 1e-9);
        let (min, max) = r.bounding_box();
        assert_relative_eq!(min[2], 0.0, epsilon = 1e-9);
        assert_relative_eq!(min[0] + max[0], 0.0, epsilon = 1e-9);
        assert_relative_eq!(min[1] + max[1], 0.0, epsilon = 1e-9);
    }

    #[test]
    fn no_lip_box_is_basic() {
        let b = box_with(|p| p.no_lip = true);
        assert_eq!(b.filename(), "gf_box_2x3x5_basic");
        let (x, y, z) = b.render().size();
        assert_relative_eq!(x, 83.5, epsilon = 1e-9);
        assert_relative_eq!(y, 125.5, epsilon = 1e-9);
        assert_relative_eq!(z, 38.8, epsilon = 1e-9);
    }

    #[test]
    fn features_leave_envelope_unchanged() {
        let b = box_with(|p| {
            p.scoops = true;
            p.labels = true;
            p.length_div = 1;
            p.width_div = 2;
            p.holes = true;
            p.unsupported_holes = true;
        });
        let (x, y, z) = b.render().size();
        assert_relative_eq!(x, 83.5, epsilon = 1e-9);
        assert_relative_eq!(y, 125.5, epsilon = 1e-9);
        assert_relative_eq!(z, 38.8, epsilon = 1e-9);
    }

    #[test]
    fn filename_tokens() {
        let b = box_with(|p| {
            p.length_u = 3;
            p.width_u = 3;
            p.height_u = 3;
            p.length_div = 2;
            p.width_div = 1;
            p.holes = true;
        });
        assert_eq!(b.filename(), "gf_box_3x3x3_div2x1_holes");

        let b = box_with(|p| {
            p.width_div = 2;
            p.scoops = true;
            p.labels = true;
        });
        assert_eq!(b.filename(), "gf_box_2x3x5_div_x2_scoops_labels");

        let b = box_with(|p| p.wall_th = 1.5);
        assert_eq!(b.filename(), "gf_box_2x3x5_1.50");

        let b = box_with(|p| {
            p.lite_style = true;
            p.wall_th = 1.0;
        });
        assert_eq!(b.filename(), "gf_box_lite_2x3x5");
    }

    #[test]
    fn solid_tokens_suppress_interior_features() {
        let b = box_with(|p| {
            p.solid = true;
            p.width_div = 2;
            p.scoops = true;
            p.labels = true;
        });
        assert_eq!(b.filename(), "gf_box_2x3x5_solid");
    }

    #[test]
    fn top_reference_height_is_affine_in_ratio() {
        let full = GridfinitySolidBox::new(4, 2, 3).unwrap();
        assert_relative_eq!(full.top_ref_height(), 21.0, epsilon = 1e-9);
        let half = GridfinitySolidBox::with_ratio(4, 2, 3, 0.5).unwrap();
        assert_relative_eq!(half.top_ref_height(), 14.1, epsilon = 1e-9);
        let empty = GridfinityBox::sized(4, 2, 3).unwrap();
        assert_relative_eq!(empty.top_ref_height(), GR_BOT_H);
        // Affine: evenly spaced ratios give evenly spaced heights.
        let q1 = GridfinitySolidBox::with_ratio(4, 2, 3, 0.25).unwrap();
        let q3 = GridfinitySolidBox::with_ratio(4, 2, 3, 0.75).unwrap();
        assert_relative_eq!(
            q3.top_ref_height() - half.top_ref_height(),
            half.top_ref_height() - q1.top_ref_height(),
            epsilon = 1e-9
        );
    }

    #[test]
    fn validation_rejects_bad_combinations() {
        let lite_solid = GridfinityBox::new(BoxParams {
            length_u: 2,
            width_u: 2,
            height_u: 3,
            lite_style: true,
            solid: true,
            ..BoxParams::default()
        });
        assert!(matches!(lite_solid, Err(GfError::LiteSolidConflict)));

        let lite_holes = GridfinityBox::new(BoxParams {
            length_u: 2,
            width_u: 2,
            height_u: 3,
            lite_style: true,
            holes: true,
            ..BoxParams::default()
        });
        assert!(matches!(lite_holes, Err(GfError::LiteHolesConflict)));

        let thick = GridfinityBox::new(BoxParams {
            length_u: 2,
            width_u: 2,
            height_u: 3,
            wall_th: 3.0,
            ..BoxParams::default()
        });
        assert!(matches!(thick, Err(GfError::WallThickness(_))));

        let lite_thick = GridfinityBox::new(BoxParams {
            length_u: 2,
            width_u: 2,
            height_u: 3,
            lite_style: true,
            wall_th: 2.0,
            ..BoxParams::default()
        });
        assert!(matches!(lite_thick, Err(GfError::LiteWall(_))));

        let too_many = GridfinityBox::new(BoxParams {
            length_u: 1,
            width_u: 1,
            height_u: 3,
            length_div: 30,
            ..BoxParams::default()
        });
        assert!(matches!(too_many, Err(GfError::DividerCount { axis: 'x', .. })));
    }

    #[test]
    fn divider_count_capped_by_unit_count() {
        // Even when the compartments would stay wide enough, a box can
        // carry at most one divider fewer than its unit count.
        let r = GridfinityBox::new(BoxParams {
            length_u: 2,
            width_u: 3,
            height_u: 5,
            length_div: 5,
            ..BoxParams::default()
        });
        assert!(matches!(
            r,
            Err(GfError::DividerCount {
                axis: 'x',
                count: 5,
                max: 1
            })
        ));
        let r = GridfinityBox::new(BoxParams {
            length_u: 2,
            width_u: 3,
            height_u: 5,
            width_div: 3,
            ..BoxParams::default()
        });
        assert!(matches!(
            r,
            Err(GfError::DividerCount {
                axis: 'y',
                count: 3,
                max: 2
            })
        ));
        assert!(box_with(|p| p.width_div = 2).render().size().2 > 0.0);
    }

    #[test]
    fn safe_label_height_clamps_near_floor() {
        // Tall box: nominal ledge height survives untouched.
        let tall = box_with(|p| p.labels = true);
        assert_relative_eq!(
            tall.safe_label_height(false, false),
            tall.params().label_height,
            epsilon = 1e-9
        );
        // Short box: the ledge would hit the floor fillet and shrinks.
        let short = GridfinityBox::new(BoxParams {
            length_u: 2,
            width_u: 2,
            height_u: 2,
            labels: true,
            ..BoxParams::default()
        })
        .unwrap();
        let h = short.safe_label_height(true, false);
        let nominal =
            short.params().label_height * (short.params().label_width + short.dims().lip_width())
                / short.params().label_width;
        assert!(h < nominal);
        // from_bottom stays within the interior.
        let fb = short.safe_label_height(true, true);
        assert!(fb > 0.0 && fb < short.dims().max_height() + short.dims().floor_height());
    }

    #[test]
    fn divider_compartments_evenly_spaced() {
        let b = box_with(|p| {
            p.length_u = 4;
            p.length_div = 3;
        });
        let d = b.dims();
        let xl = d.inner_length() / 4.0;
        // Wall centres relative to the interior start; spacing equals
        // span over (count + 1).
        let c0 = xl - d.half_inside();
        let c1 = 2.0 * xl - d.half_inside();
        assert_relative_eq!(c1 - c0, xl, epsilon = 1e-9);
    }

    #[test]
    fn lite_dividers_snap_to_cells() {
        let b = box_with(|p| {
            p.lite_style = true;
            p.length_div = 2;
            p.width_div = 1;
        });
        assert_eq!(b.effective_length_div(), 1);
        assert_eq!(b.effective_width_div(), 2);
    }

    #[test]
    fn render_is_idempotent() {
        let b = box_with(|p| {
            p.scoops = true;
            p.labels = true;
        });
        let a = b.render();
        let c = b.render();
        assert_eq!(a.bounding_box(), c.bounding_box());
        assert_eq!(a.name, c.name);
    }
}
