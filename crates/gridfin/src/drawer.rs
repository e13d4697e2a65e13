//! Drawer spacer generator.
//!
//! Given a drawer's interior footprint, computes the largest grid that
//! fits and the residual margins, then generates corner and filler
//! spacer parts sized to consume those margins so a baseplate grid sits
//! centred and snug. Spacers interlock with wedge-shaped alignment
//! pegs/holes when the margins leave room, and carry direction arrows
//! showing the drawer sliding axis.

use crate::constants::*;
use crate::solid::Solid;
use gridfin_ir::{EdgeQuery, FaceQuery, Plane, Profile, ScalarFilter, Vec2, VertexFillet};
use tracing::info;

/// Spacer options.
#[derive(Debug, Clone, PartialEq)]
pub struct SpacerParams {
    /// Spacer part thickness.
    pub thickness: f64,
    /// Top/bottom face chamfer.
    pub chamf_rad: f64,
    /// Cut sliding-direction arrows into wide spacers.
    pub show_arrows: bool,
    /// Arrow cut depth.
    pub arrow_h: f64,
    /// Generate interlocking alignment pegs/holes.
    pub align_features: bool,
    /// Nominal alignment wedge length.
    pub align_l: f64,
    /// Clearance added around alignment holes.
    pub align_tol: f64,
    /// Smallest margin that still gets alignment features.
    pub align_min: f64,
    /// Margins at or below this are too thin to bother with spacers.
    pub min_margin: f64,
    /// Clearance left between spacers and the drawer walls.
    pub tolerance: f64,
}

impl Default for SpacerParams {
    fn default() -> Self {
        Self {
            thickness: GR_SPACER_TH,
            chamf_rad: 1.0,
            show_arrows: true,
            arrow_h: 0.8,
            align_features: true,
            align_l: 16.0,
            align_tol: 0.15,
            align_min: 8.0,
            min_margin: 4.0,
            tolerance: GR_TOL,
        }
    }
}

/// Result of a best-fit computation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitReport {
    /// Drawer interior size (x, y).
    pub drawer: (f64, f64),
    /// Grid units that fit (x, y).
    pub size_u: (usize, usize),
    /// Residual margin per side (x, y).
    pub margin: (f64, f64),
    /// Corner spacer size in grid units (x, y).
    pub corner_u: (usize, usize),
    /// Front/back filler length in grid units.
    pub length_fill_u: usize,
    /// Left/right filler depth in grid units.
    pub width_fill_u: usize,
    /// Front/back spacer strip thickness.
    pub length_th: f64,
    /// Left/right spacer strip thickness.
    pub width_th: f64,
    /// Left/right margins justify spacers.
    pub wide_enough: bool,
    /// Front/back margins justify spacers.
    pub deep_enough: bool,
}

/// Drawer spacer generator.
#[derive(Debug, Clone)]
pub struct GridfinityDrawerSpacer {
    params: SpacerParams,
    /// Drawer interior size.
    size: (f64, f64),
    /// Grid units fitting the drawer.
    size_u: (usize, usize),
    /// Corner spacer size in grid units.
    length_u: usize,
    width_u: usize,
    /// Filler spans in millimeters.
    length_fill: f64,
    width_fill: f64,
    /// Strip thicknesses (margin minus clearance).
    length_th: f64,
    width_th: f64,
    /// Alignment wedge length after margin clamping.
    align_l: f64,
}

impl GridfinityDrawerSpacer {
    /// Generator with no fit computed yet.
    pub fn new(params: SpacerParams) -> Self {
        let align_l = params.align_l;
        Self {
            params,
            size: (0.0, 0.0),
            size_u: (0, 0),
            length_u: 1,
            width_u: 1,
            length_fill: 0.0,
            width_fill: 0.0,
            length_th: 10.0,
            width_th: 10.0,
            align_l,
        }
    }

    /// Generator fitted to a drawer interior.
    pub fn fitted(dr_width: f64, dr_depth: f64, params: SpacerParams) -> Self {
        let mut s = Self::new(params);
        s.best_fit_to_dim(dr_width, dr_depth);
        s
    }

    /// Compute the best grid fit for a drawer interior and size every
    /// spacer element to centre the baseplate grid within it.
    pub fn best_fit_to_dim(&mut self, length: f64, width: f64) -> FitReport {
        self.size = (length, width);
        let lu = (length / GRU).floor() as usize;
        let wu = (width / GRU).floor() as usize;
        let (lg, wg) = (lu as f64 * GRU, wu as f64 * GRU);
        let lm = (length - lg) / 2.0;
        let wm = (width - wg) / 2.0;
        self.size_u = (lu, wu);
        self.width_th = lm - self.params.tolerance;
        self.length_th = wm - self.params.tolerance;
        self.length_u = lu / 3;
        self.width_u = wu / 3;
        self.length_fill = lg - 2.0 * self.corner_length();
        self.width_fill = wg - 2.0 * self.corner_width();
        self.align_l = self.params.align_l;
        if self.wide_enough() {
            self.align_l = 1.5 * self.width_th;
        }
        if self.deep_enough() {
            self.align_l = self.align_l.min(1.5 * self.length_th);
        }
        self.align_l = self.align_l.min(16.0);

        let report = FitReport {
            drawer: self.size,
            size_u: self.size_u,
            margin: (lm, wm),
            corner_u: (self.length_u, self.width_u),
            length_fill_u: (self.length_fill / GRU).round() as usize,
            width_fill_u: (self.width_fill / GRU).round() as usize,
            length_th: self.length_th,
            width_th: self.width_th,
            wide_enough: self.wide_enough(),
            deep_enough: self.deep_enough(),
        };
        info!(
            drawer_x = length,
            drawer_y = width,
            units_x = lu,
            units_y = wu,
            margin_x = lm,
            margin_y = wm,
            "best grid fit"
        );
        if report.deep_enough {
            info!(
                fill_u = report.length_fill_u,
                strip_th = self.length_th,
                tolerance = self.params.tolerance,
                "front/back spacers"
            );
        } else {
            info!("front/back spacers not required");
        }
        if report.wide_enough {
            info!(
                fill_u = report.width_fill_u,
                strip_th = self.width_th,
                tolerance = self.params.tolerance,
                "left/right spacers"
            );
        } else {
            info!("left/right spacers not required");
        }
        report
    }

    /// The generator's options.
    pub fn params(&self) -> &SpacerParams {
        &self.params
    }

    /// Grid units fitting the drawer (x, y).
    pub fn size_u(&self) -> (usize, usize) {
        self.size_u
    }

    /// Corner spacer size in grid units (x, y).
    pub fn corner_u(&self) -> (usize, usize) {
        (self.length_u, self.width_u)
    }

    /// Front/back filler span in millimeters.
    pub fn length_fill(&self) -> f64 {
        self.length_fill
    }

    /// Left/right filler span in millimeters.
    pub fn width_fill(&self) -> f64 {
        self.width_fill
    }

    /// Front/back strip thickness.
    pub fn length_th(&self) -> f64 {
        self.length_th
    }

    /// Left/right strip thickness.
    pub fn width_th(&self) -> f64 {
        self.width_th
    }

    fn corner_length(&self) -> f64 {
        self.length_u as f64 * GRU
    }

    fn corner_width(&self) -> f64 {
        self.width_u as f64 * GRU
    }

    /// The left/right margin justifies spacer strips.
    pub fn wide_enough(&self) -> bool {
        self.width_th > self.params.min_margin
    }

    /// The front/back margin justifies spacer strips.
    pub fn deep_enough(&self) -> bool {
        self.length_th > self.params.min_margin
    }

    /// Vertical-edge fillet radius clamped to a sixth of the thinnest
    /// strip.
    pub fn fillet_rad(&self) -> f64 {
        let mut rad: f64 = GR_RAD;
        if self.wide_enough() {
            rad = rad.min(self.width_th / 6.0);
        }
        if self.deep_enough() {
            rad = rad.min(self.length_th / 6.0);
        }
        rad
    }

    /// Top/bottom chamfer clamped the same way as [`Self::fillet_rad`].
    pub fn safe_chamfer_rad(&self) -> f64 {
        let mut rad = self.params.chamf_rad;
        if self.wide_enough() {
            rad = rad.min(self.width_th / 6.0);
        }
        if self.deep_enough() {
            rad = rad.min(self.length_th / 6.0);
        }
        rad
    }

    fn chamfer_faces(&self, s: Solid) -> Solid {
        s.chamfer(
            EdgeQuery::OnFace(FaceQuery::PosZ | FaceQuery::NegZ),
            self.safe_chamfer_rad(),
        )
    }

    /// Interlocking wedge profile. Pegs are cut-to-size; hole cutters
    /// are inflated by the alignment clearance.
    fn alignment_feature(&self, as_cutter: bool, horz: bool) -> Solid {
        let mut x = self.align_l;
        let mut y = if horz {
            self.length_th / 2.0
        } else {
            self.width_th / 2.0
        };
        let mut fr = (GR_RAD / 2.0).min(y / 3.0);
        if as_cutter {
            x += 2.0 * self.params.align_tol;
            y += 2.0 * self.params.align_tol;
            fr += self.params.align_tol;
        }
        let points = vec![
            Vec2::new(0.0, y / 3.0),
            Vec2::new(x / 2.0, y / 2.0),
            Vec2::new(x / 2.0, -y / 2.0),
            Vec2::new(0.0, -y / 3.0),
            Vec2::new(-x / 2.0, -y / 2.0),
            Vec2::new(-x / 2.0, y / 2.0),
        ];
        let fillets = (0..points.len())
            .map(|vertex| VertexFillet { vertex, radius: fr })
            .collect();
        let mut r = Solid::extrude(
            "align_wedge",
            Profile::Polygon { points, fillets },
            Plane::Xy,
            self.params.thickness,
        );
        if !horz {
            r = r.rotate_z(90.0);
        }
        if !as_cutter {
            r = self.chamfer_faces(r);
        }
        r
    }

    /// Cut sliding-direction arrows into the top/bottom faces around
    /// the given centre.
    fn orientation_arrows(&self, obj: Solid, x: f64, y: f64, top: bool, bottom: bool) -> Solid {
        if !self.params.show_arrows || !self.wide_enough() {
            return obj;
        }
        let la = self.width_th / 2.0;
        let arrow = Solid::extrude(
            "arrow",
            Profile::Polygon {
                points: vec![
                    Vec2::new(0.0, 0.0),
                    Vec2::new(la / 2.0, la),
                    Vec2::new(la, 0.0),
                ],
                fillets: vec![],
            },
            Plane::Xy,
            self.params.arrow_h,
        )
        .translate(-la / 2.0, -la / 2.0, 0.0);
        let up = arrow.clone();
        let down = arrow.rotate_z(180.0);
        let th = self.params.thickness - self.params.arrow_h;
        let yo = 10.0 * self.width_th / 15.0;
        let mut obj = obj;
        if top {
            obj = obj - up.translate(x, y + yo, th);
            obj = obj - down.translate(x, y - yo, th);
        }
        if bottom {
            obj = obj - up.translate(x, y + yo, 0.0);
            obj = obj - down.translate(x, y - yo, 0.0);
        }
        obj
    }

    /// One corner spacer. The same part serves all four corners by
    /// symmetry. Arrows can be suppressed per face when a half set
    /// prints two mirrored copies.
    pub fn render_corner(&self, arrows_top: bool, arrows_bottom: bool) -> Solid {
        let sp_length = self.corner_length() + self.width_th + self.params.tolerance;
        let sp_width = self.corner_width() + self.length_th + self.params.tolerance;
        let outer_corner = EdgeQuery::Vertical
            & EdgeQuery::AtX(ScalarFilter::equals([0.0]))
            & EdgeQuery::AtY(ScalarFilter::equals([0.0]));

        let mut arms: Vec<Solid> = Vec::new();
        if self.deep_enough() {
            let arm = Solid::block("corner_x", sp_length, self.length_th, self.params.thickness)
                .translate(sp_length / 2.0, self.length_th / 2.0, 0.0)
                .fillet(outer_corner.clone(), GR_RAD)
                .fillet(EdgeQuery::Vertical, self.fillet_rad());
            arms.push(arm);
        }
        if self.wide_enough() {
            let arm = Solid::block("corner_y", self.width_th, sp_width, self.params.thickness)
                .translate(self.width_th / 2.0, sp_width / 2.0, 0.0)
                .fillet(outer_corner, GR_RAD)
                .fillet(EdgeQuery::Vertical, self.fillet_rad());
            arms.push(arm);
        }
        let mut r = match arms.len() {
            0 => return Solid::empty(self.filename()),
            1 => arms.remove(0),
            _ => arms.remove(0) + arms.remove(0),
        };
        r = self.chamfer_faces(r);
        r = self.orientation_arrows(
            r,
            self.width_th / 2.0,
            sp_width / 2.0,
            arrows_top,
            arrows_bottom,
        );
        if self.params.align_features && self.length_th > self.params.align_min {
            let hole = self.alignment_feature(true, true);
            r = r - hole.translate(sp_length, self.length_th / 2.0, 0.0);
        }
        if self.params.align_features && self.width_th > self.params.align_min {
            let peg = self.alignment_feature(false, false);
            r = r + peg.translate(self.width_th / 2.0, sp_width, 0.0);
        }
        r.named(self.filename())
    }

    /// Centre filler for the front/back drawer walls, with pegs (or
    /// holes) on both ends.
    pub fn render_length_filler(&self, peg_ends: bool) -> Option<Solid> {
        if !self.deep_enough() {
            return None;
        }
        let mut r = Solid::block(
            "length_filler",
            self.length_fill,
            self.length_th,
            self.params.thickness,
        )
        .fillet(EdgeQuery::Vertical, self.fillet_rad());
        r = self.chamfer_faces(r);
        if self.params.align_features && self.length_th > self.params.align_min {
            if peg_ends {
                let peg = self.alignment_feature(false, true);
                r = r + peg.translate(self.length_fill / 2.0, 0.0, 0.0);
                r = r + peg.translate(-self.length_fill / 2.0, 0.0, 0.0);
            } else {
                let hole = self.alignment_feature(true, true);
                r = r - hole.translate(self.length_fill / 2.0, 0.0, 0.0);
                r = r - hole.translate(-self.length_fill / 2.0, 0.0, 0.0);
            }
        }
        Some(r)
    }

    /// Centre filler for the left/right drawer walls, with alignment
    /// holes on both ends.
    pub fn render_width_filler(&self, arrows_top: bool, arrows_bottom: bool) -> Option<Solid> {
        if !self.wide_enough() {
            return None;
        }
        let mut r = Solid::block(
            "width_filler",
            self.width_th,
            self.width_fill,
            self.params.thickness,
        )
        .fillet(EdgeQuery::Vertical, self.fillet_rad());
        r = self.chamfer_faces(r);
        r = self.orientation_arrows(r, 0.0, 0.0, arrows_top, arrows_bottom);
        if self.params.align_features && self.width_th > self.params.align_min {
            let hole = self.alignment_feature(true, false);
            r = r - hole.translate(0.0, self.width_fill / 2.0, 0.0);
            r = r - hole.translate(0.0, -self.width_fill / 2.0, 0.0);
        }
        Some(r)
    }

    /// Every spacer in its installed drawer position, for previewing
    /// the final composition.
    pub fn render_full_set(&self, include_baseplate: bool) -> Solid {
        let (sx, sy) = self.size;
        let th = self.params.thickness;
        let bl = self.render_corner(true, true);
        let tl = bl.rotate_x(180.0).translate(0.0, sy, th);
        let br = bl.rotate_y(180.0).translate(sx, 0.0, th);
        let tr = bl.rotate_z(180.0).translate(sx, sy, 0.0);
        let mut r = bl + tl + br + tr;

        if let Some(lf) = self.render_length_filler(true) {
            r = r + lf.translate(sx / 2.0, self.length_th / 2.0, 0.0);
            r = r + lf.translate(sx / 2.0, sy - self.length_th / 2.0, 0.0);
        }
        if let Some(wf) = self.render_width_filler(true, true) {
            r = r + wf.translate(self.width_th / 2.0, sy / 2.0, 0.0);
            r = r + wf.translate(sx - self.width_th / 2.0, sy / 2.0, 0.0);
        }
        if include_baseplate {
            if let Ok(bp) = crate::baseplate::GridfinityBaseplate::sized(self.size_u.0, self.size_u.1)
            {
                r = r + bp.render().translate(sx / 2.0, sy / 2.0, 0.0);
            }
        }
        r.named(self.filename())
    }

    /// Half of the full set, packed for printing; print two for a
    /// complete drawer.
    pub fn render_half_set(&self) -> Solid {
        let th = self.params.thickness;
        let bl = self.render_corner(true, false);
        let br = self.render_corner(false, true);
        let (xo, yo) = if self.deep_enough() {
            (
                self.corner_length() + 2.5 * self.width_th,
                1.5 * self.length_th,
            )
        } else {
            (2.5 * self.width_th, 0.0)
        };
        let br = br.rotate_y(180.0).translate(xo, yo, th);
        let mut r = bl + br;

        if let Some(lf) = self.render_length_filler(true) {
            let mut xl = self.length_fill / 2.0
                - (self.length_fill - (self.corner_length() + self.width_th));
            if self.length_th > self.params.align_min {
                xl -= self.align_l / 2.0;
            }
            let yl = if self.wide_enough() {
                let mut yt = self.corner_width() + self.length_th;
                if self.width_th > self.params.align_min {
                    yt += self.align_l / 2.0;
                }
                yt.max(self.width_fill) + self.length_th.max(self.align_l / 2.0)
            } else {
                3.5 * self.length_th
            };
            r = r + lf.translate(xl, yl, 0.0);
        }
        if let Some(wf) = self.render_width_filler(true, false) {
            r = r + wf.translate(-self.width_th, self.width_fill / 2.0, 0.0);
        }
        r.named(self.filename())
    }

    /// Descriptive part filename stem.
    pub fn filename(&self) -> String {
        format!("gf_drawer_{}x{}", self.length_u, self.width_u)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn inches(v: f64) -> f64 {
        v * 25.4
    }

    fn quarter_tol() -> SpacerParams {
        SpacerParams {
            tolerance: 0.25,
            ..SpacerParams::default()
        }
    }

    #[test]
    fn best_fit_metric_drawer() {
        let s = GridfinityDrawerSpacer::fitted(582.0, 481.0, quarter_tol());
        assert_eq!(s.size_u(), (13, 11));
        assert_eq!(s.corner_u(), (4, 3));
        assert_relative_eq!(s.length_fill(), 5.0 * GRU);
        assert_relative_eq!(s.width_fill(), 5.0 * GRU);
        assert!(s.wide_enough() && s.deep_enough());
        assert_relative_eq!(s.length_th(), 9.25, epsilon = 0.01);
        assert_relative_eq!(s.width_th(), 17.75, epsilon = 0.01);
        assert_eq!(s.filename(), "gf_drawer_4x3");
    }

    #[test]
    fn shallow_drawer_skips_one_axis() {
        let mut s = GridfinityDrawerSpacer::new(quarter_tol());
        s.best_fit_to_dim(582.0, 300.0);
        assert_eq!(s.size_u(), (13, 7));
        assert_eq!(s.corner_u().1, 2);
        assert_relative_eq!(s.width_fill(), 3.0 * GRU);
        assert!(s.wide_enough());
        assert!(!s.deep_enough());

        s.best_fit_to_dim(300.0, 582.0);
        assert_eq!(s.size_u(), (7, 13));
        assert_eq!(s.corner_u().0, 2);
        assert_relative_eq!(s.length_fill(), 3.0 * GRU);
        assert!(!s.wide_enough());
        assert!(s.deep_enough());
    }

    #[test]
    fn exact_grid_fit_emits_corners_only() {
        // A drawer that is an exact multiple of the pitch leaves no
        // margin worth filling: both filler strips drop out and the
        // corner collapses to its empty placeholder.
        let mut s = GridfinityDrawerSpacer::new(quarter_tol());
        let report = s.best_fit_to_dim(3.0 * GRU, 3.0 * GRU);
        assert_eq!(s.size_u(), (3, 3));
        assert!(!report.wide_enough && !report.deep_enough);
        assert!(s.render_length_filler(true).is_none());
        assert!(s.render_width_filler(true, true).is_none());
        let corner = s.render_corner(true, true);
        let (x, y, z) = corner.size();
        assert_relative_eq!(x, 0.0, epsilon = 1e-9);
        assert_relative_eq!(y, 0.0, epsilon = 1e-9);
        assert_relative_eq!(z, 0.0, epsilon = 1e-9);

        // Margins exactly at the tolerance behave the same way.
        let s = GridfinityDrawerSpacer::fitted(126.5, 126.5, quarter_tol());
        assert!(!s.wide_enough() && !s.deep_enough());
        assert!(s.render_width_filler(true, true).is_none());
    }

    #[test]
    fn imperial_drawer_fit() {
        let mut s = GridfinityDrawerSpacer::new(quarter_tol());
        s.best_fit_to_dim(inches(11.5), inches(20.5));
        assert_eq!(s.size_u(), (6, 12));
        assert_eq!(s.corner_u(), (2, 4));
        assert_relative_eq!(s.length_fill(), 2.0 * GRU);
        assert_relative_eq!(s.width_fill(), 4.0 * GRU);
        assert_relative_eq!(s.length_th(), 8.10, epsilon = 0.01);
        assert_relative_eq!(s.width_th(), 19.80, epsilon = 0.01);
    }

    #[test]
    fn set_envelopes() {
        let mut s = GridfinityDrawerSpacer::new(quarter_tol());
        s.best_fit_to_dim(inches(22.0 + 15.0 / 16.0), inches(16.25));
        assert_eq!(s.size_u(), (13, 9));
        assert_eq!(s.corner_u(), (4, 3));
        assert_relative_eq!(s.length_fill(), 5.0 * GRU);
        assert_relative_eq!(s.width_fill(), 3.0 * GRU);
        assert_relative_eq!(s.length_th(), 17.12, epsilon = 0.01);
        assert_relative_eq!(s.width_th(), 18.06, epsilon = 0.01);

        let full = s.render_full_set(false);
        let (x, y, z) = full.size();
        assert_relative_eq!(x, 582.6125, epsilon = 0.01);
        assert_relative_eq!(y, 412.75, epsilon = 0.01);
        assert_relative_eq!(z, 5.0, epsilon = 1e-9);

        let half = s.render_half_set();
        let (x, y, z) = half.size();
        assert_relative_eq!(x, 253.084, epsilon = 0.01);
        assert_relative_eq!(y, 177.0625, epsilon = 0.01);
        assert_relative_eq!(z, 5.0, epsilon = 1e-9);
    }

    #[test]
    fn clamps_track_margins() {
        let s = GridfinityDrawerSpacer::fitted(582.0, 481.0, quarter_tol());
        // 9.25 / 6 caps both the fillet and the chamfer.
        assert_relative_eq!(s.fillet_rad(), 9.25 / 6.0, epsilon = 0.01);
        assert_relative_eq!(s.safe_chamfer_rad(), 1.0);
        assert!(s.fillet_rad() < GR_RAD);
    }

    #[test]
    fn report_matches_state() {
        let mut s = GridfinityDrawerSpacer::new(quarter_tol());
        let report = s.best_fit_to_dim(582.0, 481.0);
        assert_eq!(report.size_u, (13, 11));
        assert_eq!(report.corner_u, (4, 3));
        assert_eq!(report.length_fill_u, 5);
        assert_eq!(report.width_fill_u, 5);
        assert!(report.wide_enough && report.deep_enough);
        assert_relative_eq!(report.margin.0, s.width_th() + 0.25, epsilon = 1e-9);
    }
}
