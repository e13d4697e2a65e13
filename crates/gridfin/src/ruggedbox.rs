//! Rugged transport box generator.
//!
//! A rugged box is a multi-part assembly: a thick-walled shell with a
//! grid-sized baseplate floor, a separate lid, sliding latches riding on
//! clasp rib ladders, a two-leaf rear hinge pair, carrying handles and a
//! replaceable front label. All mating features (latch channels, rib
//! ladders, hinge pockets, stacking registration keys) derive from the
//! same unit-count dimensional model as the other generators.
//!
//! The box and lid share one `body_shell` stage; option flags select
//! which cutout and union stages run on top of it. A "rib style" body
//! replaces the solid corner blocks with exposed structural ribs while
//! keeping the same outer envelope and mating-feature placement.

use crate::baseplate::{BaseplateParams, GridfinityBaseplate};
use crate::constants::*;
use crate::dims::GridDims;
use crate::solid::Solid;
use crate::{GfError, Result};
use gridfin_ir::{
    Document, EdgeQuery, FaceQuery, Plane, Profile, ProfileStep, ScalarFilter, Vec2, VertexFillet,
};
use tracing::info;

/// Which side of the box a feature is built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Left,
    Right,
    Front,
}

/// Quadrant of a corner registration ring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Quad {
    Tl,
    Tr,
    Bl,
    Br,
}

/// One leaf of the rear hinge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HingeLeaf {
    Inner,
    Outer,
}

/// Quarter ring segment used for the corner stacking registrations.
/// `ext` pushes the two flat faces outward (clearance for the mating
/// cut); `chamf` breaks the top face.
fn quarter_ring(outer: f64, inner: f64, height: f64, quad: Quad, chamf: f64, ext: f64) -> Solid {
    let ring = Solid::cylinder("qtr_ring", outer, height) - Solid::cylinder("qtr_bore", inner, height);
    let (sx, sy) = match quad {
        Quad::Tr => (1.0, 1.0),
        Quad::Tl => (-1.0, 1.0),
        Quad::Br => (1.0, -1.0),
        Quad::Bl => (-1.0, -1.0),
    };
    let window = Solid::block("qtr_window", outer + ext, outer + ext, height).translate(
        sx * (outer - ext) / 2.0,
        sy * (outer - ext) / 2.0,
        0.0,
    );
    let r = (ring & window).translate(-sx * outer / 2.0, -sy * outer / 2.0, 0.0);
    if chamf > 0.0 {
        r.chamfer(EdgeQuery::OnFace(FaceQuery::PosZ), chamf)
    } else {
        r
    }
}

/// Cylinder with both flat faces chamfered.
fn chamf_cyl(rad: f64, height: f64, chamf: f64) -> Solid {
    let r = Solid::cylinder("chamf_cyl", rad, height);
    if chamf > 0.0 {
        r.chamfer(EdgeQuery::OnFace(FaceQuery::PosZ | FaceQuery::NegZ), chamf)
    } else {
        r
    }
}

/// Top-chamfered block for the registration keys. At z = 0 the block is
/// a clearance-inflated mate cutter; raised blocks are exact-size keys.
fn chamf_rect(length: f64, width: f64, height: f64, angle: f64, tol: f64, z_offset: f64) -> Solid {
    let (length, width, height) = if z_offset > 0.0 {
        (length, width, height)
    } else {
        (length + tol, width + tol, height + tol)
    };
    Solid::block("reg_key", length, width, height)
        .chamfer(EdgeQuery::OnFace(FaceQuery::PosZ), 0.5)
        .rotate_z(angle)
        .translate(0.0, 0.0, z_offset)
}

/// Rugged box options.
#[derive(Debug, Clone, PartialEq)]
pub struct RuggedBoxParams {
    /// Length in grid units (minimum 3).
    pub length_u: usize,
    /// Width in grid units (minimum 3).
    pub width_u: usize,
    /// Height in grid height units (minimum 4).
    pub height_u: usize,
    /// Lid height.
    pub lid_height: f64,
    /// Decorative v-grooves around the shell walls.
    pub wall_vgrooves: bool,
    /// Front carrying handle with mounting brackets.
    pub front_handle: bool,
    /// Stacking registration mates on the underside.
    pub stackable: bool,
    /// Latch channels and clasp ribs on the left/right sides.
    pub side_clasps: bool,
    /// Recessed baseplate on top of the lid.
    pub lid_baseplate: bool,
    /// Baseplate floor inside the box.
    pub inside_baseplate: bool,
    /// Wedge-profile grab handles on the left/right sides.
    pub side_handles: bool,
    /// Front label slot.
    pub front_label: bool,
    /// Label panel length override; auto-sized from the box when `None`.
    pub label_length: Option<f64>,
    /// Label panel height override.
    pub label_height: Option<f64>,
    /// Label insert thickness.
    pub label_th: f64,
    /// Feet under the hinges so the box can stand on its back.
    pub back_feet: bool,
    /// Hinge body width along the box back.
    pub hinge_width: f64,
    /// Bolt the hinge leaves together instead of the snap-fit pin.
    pub hinge_bolted: bool,
    /// Exposed structural ribs instead of solid corner blocks.
    pub rib_style: bool,
    /// Clear window panel in the lid (excludes the lid baseplate).
    pub lid_window: bool,
    /// Window panel thickness.
    pub window_th: f64,
}

impl Default for RuggedBoxParams {
    fn default() -> Self {
        Self {
            length_u: 3,
            width_u: 3,
            height_u: 4,
            lid_height: 10.0,
            wall_vgrooves: true,
            front_handle: true,
            stackable: true,
            side_clasps: true,
            lid_baseplate: true,
            inside_baseplate: true,
            side_handles: true,
            front_label: true,
            label_length: None,
            label_height: None,
            label_th: GR_LABEL_TH,
            back_feet: true,
            hinge_width: GR_HINGE_SZ,
            hinge_bolted: false,
            rib_style: false,
            lid_window: false,
            window_th: 1.0,
        }
    }
}

/// Gridfinity rugged box generator.
#[derive(Debug, Clone)]
pub struct GridfinityRuggedBox {
    params: RuggedBoxParams,
    dims: GridDims,
    floor_plate: GridfinityBaseplate,
    lid_plate: GridfinityBaseplate,
}

impl GridfinityRuggedBox {
    /// Validate options and build a generator. A lid window displaces
    /// the lid baseplate.
    pub fn new(params: RuggedBoxParams) -> Result<Self> {
        let mut params = params;
        for (axis, value, min) in [
            ('x', params.length_u, 3),
            ('y', params.width_u, 3),
            ('z', params.height_u, 4),
        ] {
            if value < min {
                return Err(GfError::RuggedSize { axis, value, min });
            }
        }
        if params.lid_window {
            params.lid_baseplate = false;
        }
        let dims = GridDims::new(params.length_u, params.width_u, params.height_u);
        let floor_plate = GridfinityBaseplate::new(BaseplateParams {
            length_u: params.length_u,
            width_u: params.width_u,
            ext_depth: 1.6,
            ..BaseplateParams::default()
        })?;
        let lid_plate = GridfinityBaseplate::new(BaseplateParams {
            length_u: params.length_u,
            width_u: params.width_u,
            ext_depth: 0.4,
            straight_bottom: true,
            ..BaseplateParams::default()
        })?;
        Ok(Self {
            params,
            dims,
            floor_plate,
            lid_plate,
        })
    }

    /// Rugged box of the given unit counts with default options.
    pub fn sized(length_u: usize, width_u: usize, height_u: usize) -> Result<Self> {
        Self::new(RuggedBoxParams {
            length_u,
            width_u,
            height_u,
            ..RuggedBoxParams::default()
        })
    }

    /// The generator's options.
    pub fn params(&self) -> &RuggedBoxParams {
        &self.params
    }

    // =========================================================================
    // Dimensional model
    // =========================================================================

    /// Outer shell length.
    pub fn box_length(&self) -> f64 {
        self.dims.pitch_length() + 2.0 * GR_RBOX_WALL
    }

    /// Interior cavity length.
    pub fn int_length(&self) -> f64 {
        self.dims.pitch_length()
    }

    /// Outer shell width.
    pub fn box_width(&self) -> f64 {
        self.dims.pitch_width() + 2.0 * GR_RBOX_WALL
    }

    /// Interior cavity width.
    pub fn int_width(&self) -> f64 {
        self.dims.pitch_width()
    }

    /// Shell height excluding the lid.
    pub fn box_height(&self) -> f64 {
        self.params.height_u as f64 * GRHU + 3.0
    }

    /// Latch channel centre offsets from the box centre.
    fn clasp_pos(&self) -> (f64, f64) {
        (
            self.int_length() / 2.0 - GRU2,
            self.int_width() / 2.0 - GRU2,
        )
    }

    /// Rib ladder rung heights: one stacking rung near the bottom, two
    /// latch rungs below the lid joint.
    pub fn clasp_heights(&self) -> [f64; 3] {
        let h0 = GR_RIB_CTR / 2.0 + GR_RIB_L / 2.0;
        [
            GR_RIB_L / 2.0,
            self.box_height() - h0,
            self.box_height() - h0 - GR_RIB_CTR,
        ]
    }

    /// Latch channel centres on the left/right walls.
    pub fn side_clasp_centres(&self) -> Vec<(f64, f64)> {
        let xo = self.box_length() / 2.0 + GR_RBOX_CHAN_D / 2.0;
        let yo = self.clasp_pos().1;
        vec![(-xo, yo), (xo, yo), (-xo, -yo), (xo, -yo)]
    }

    /// Latch channel centres on the front wall.
    pub fn front_clasp_centres(&self) -> Vec<(f64, f64)> {
        let xo = self.clasp_pos().0;
        let yo = self.box_width() / 2.0 + GR_RBOX_CHAN_D / 2.0;
        vec![(-xo, -yo), (xo, -yo)]
    }

    /// V-notch positions along a rib-style latch channel.
    fn clasp_notch_points(&self) -> [(f64, f64, f64); 2] {
        let z = self.box_height() - self.params.lid_height;
        [
            (-GR_RBOX_CHAN_W / 2.0, -GR_RBOX_CHAN_D / 2.0, z),
            (GR_RBOX_CHAN_W / 2.0, -GR_RBOX_CHAN_D / 2.0, z),
        ]
    }

    /// Hinge pocket centres on the back wall, at the box top.
    pub fn hinge_centres(&self) -> [(f64, f64, f64); 2] {
        let xo = self.box_length() / 2.0 - GR_HINGE_CTR;
        let yo = self.box_width() / 2.0 + GR_RBOX_CWALL - GR_RBOX_WALL;
        let zo = self.box_height();
        [(-xo, yo, zo), (xo, yo, zo)]
    }

    /// Registration key centres and their z-rotations.
    fn align_centres(&self) -> Vec<((f64, f64), f64)> {
        let ro = GR_RBOX_CHAN_D / 2.0 - GR_REG_W / 2.0;
        let (xo, xc) = (self.box_length() / 2.0 - GRU, self.box_length() / 2.0 + ro);
        let (yo, yc) = (self.box_width() / 2.0 - GRU, self.box_width() / 2.0 + ro);
        vec![
            ((-xo, -yc), 0.0),
            ((xo, -yc), 0.0),
            ((-xc, -yo), 90.0),
            ((xc, -yo), 90.0),
            ((-xc, yo), 90.0),
            ((xc, yo), 90.0),
        ]
    }

    /// Corner ring centres at a given height with a placement clearance.
    fn qtr_centres(&self, tol: f64, at_height: f64, back: bool) -> Vec<(Quad, (f64, f64, f64))> {
        let xo = self.box_length() / 2.0 - GR_RBOX_WALL / 2.0 + tol;
        let yo = self.box_width() / 2.0 - GR_RBOX_WALL / 2.0 + tol;
        let mut pts = vec![
            (Quad::Br, (xo, -yo, at_height)),
            (Quad::Bl, (-xo, -yo, at_height)),
        ];
        if back {
            pts.push((Quad::Tr, (xo, yo, at_height)));
            pts.push((Quad::Tl, (-xo, yo, at_height)));
        }
        pts
    }

    /// Corner-band footprint block at the given height, used to trim
    /// the stacking rings flush with the bands.
    fn ring_clamp(&self, at_height: f64) -> Solid {
        let xb = self.box_length() + 2.0 * (GR_RBOX_CWALL - GR_RBOX_WALL);
        let yb = self.box_width() + 2.0 * (GR_RBOX_CWALL - GR_RBOX_WALL);
        Solid::block("ring_clamp", xb, yb, GR_REG_H).translate(0.0, 0.0, at_height)
    }

    fn right_qtr_centre(&self) -> (f64, f64, f64) {
        (
            self.box_length() / 2.0 - GR_RBOX_WALL / 2.0 + 0.125,
            -self.box_width() / 2.0 + GR_RBOX_WALL / 2.0 - 0.125,
            self.box_height(),
        )
    }

    fn left_qtr_centre(&self) -> (f64, f64, f64) {
        let (x, y, z) = self.right_qtr_centre();
        (-x, y, z)
    }

    /// The front wall is wide enough to fit the carrying handle between
    /// the corner blocks.
    pub fn long_enough_for_handle(&self) -> bool {
        self.right_handle_centre().0 > GRU / 2.0
    }

    /// Right handle bracket centre; the handle drops to mid-height on
    /// short boxes.
    pub fn right_handle_centre(&self) -> (f64, f64, f64) {
        let mut zo = (self.box_height() + self.params.lid_height) / 2.0;
        if zo + GR_HANDLE_SZ / 2.0 > self.box_height() {
            zo = self.box_height() / 2.0;
        }
        (
            self.box_length() / 2.0 - GR_HANDLE_OFS,
            -self.box_width() / 2.0,
            zo,
        )
    }

    fn left_handle_centre(&self) -> (f64, f64, f64) {
        let (x, y, z) = self.right_handle_centre();
        (-x, y, z)
    }

    fn back_corner_centres(&self) -> [(f64, f64); 2] {
        let xo = self.box_length() / 2.0 - GR_RBOX_BACK_L / 2.0 + GR_RBOX_CWALL - GR_RBOX_WALL;
        let yo = self.box_width() / 2.0 - GR_RBOX_CORNER_W / 2.0 + GR_RBOX_CWALL - GR_RBOX_WALL;
        [(-xo, yo), (xo, yo)]
    }

    fn front_corner_centres(&self) -> [(f64, f64); 2] {
        let xo = self.box_length() / 2.0 - GR_RBOX_FRONT_L / 2.0 + GR_RBOX_CWALL - GR_RBOX_WALL;
        let yo = -self.back_corner_centres()[0].1;
        [(-xo, yo), (xo, yo)]
    }

    /// Label slot centre on the front wall, dropped to mid-height when
    /// the panel would otherwise poke above the box.
    fn label_centre(&self) -> (f64, f64, f64) {
        let mut zo = self.left_handle_centre().2;
        if zo + self.label_size().1 / 2.0 > self.box_height() {
            zo = self.box_height() / 2.0;
        }
        (0.0, -self.box_width() / 2.0, zo)
    }

    /// Label panel size: auto-sized to span between the corner blocks,
    /// trimmed around the handle brackets when those are present.
    pub fn label_size(&self) -> (f64, f64) {
        let mut length = match self.params.label_length {
            Some(l) => l,
            None => self.box_length() - 2.0 * GR_RBOX_CORNER_W + GR_RBOX_CWALL / 2.0,
        };
        let mut height = self.params.label_height.unwrap_or(GR_LABEL_H);
        if height >= self.box_height() {
            height = self.box_height() - 5.0;
        }
        if self.params.front_handle && self.long_enough_for_handle() {
            length -= 2.0 * (GR_HANDLE_SEP + GR_HANDLE_W);
        }
        (length, height)
    }

    fn label_size_insert(&self) -> (f64, f64) {
        let (l, h) = self.label_size();
        (l - 5.0, h)
    }

    fn label_size_aperture(&self) -> (f64, f64) {
        let (l, h) = self.label_size();
        (l - 8.0, h - 8.0)
    }

    /// Window panel size for the lid.
    pub fn lid_window_size(&self) -> (f64, f64) {
        self.lid_window_size_ext(4.0, GR_TOL)
    }

    fn lid_window_size_ext(&self, width_ext: f64, tol: f64) -> (f64, f64) {
        (
            self.int_length() - 2.0 - tol,
            self.int_width() + width_ext - tol,
        )
    }

    /// Window retaining screw positions.
    fn lid_window_hole_pos(&self, z: f64) -> Vec<(f64, f64, f64)> {
        let xo = self.box_length() / 2.0 - GR_RBOX_CORNER_W;
        let yo = self.int_width() / 2.0 + 2.0;
        let mut pts = vec![(-xo, yo, z), (xo, yo, z)];
        if self.params.rib_style {
            pts.push((0.0, yo, z));
        }
        pts
    }

    // =========================================================================
    // Shared body stages
    // =========================================================================

    /// Outer shell common to the box and the lid: rounded envelope plus
    /// corner blocks, grooves, stacking mates and clasp features.
    fn body_shell(&self, as_lid: bool) -> Solid {
        let height = if as_lid {
            self.params.lid_height
        } else {
            self.box_height()
        };
        let length = self.box_length();
        let width = self.box_width();
        let mut r = Solid::extrude(
            "rugged_body",
            Profile::RoundedRect {
                length,
                width,
                radius: GR_RAD,
            },
            Plane::Xy,
            height,
        );

        // Corner structure.
        if self.params.rib_style {
            let lb = length + 2.0 * (GR_RBOX_CWALL - GR_RBOX_WALL);
            let yo = self.back_corner_centres()[0].1;
            r = r + Solid::block("back_band", lb, GR_RBOX_CORNER_W, height).translate(0.0, yo, 0.0);
            if !as_lid || !self.params.side_handles {
                let h = if self.params.side_handles {
                    height / 2.0
                } else {
                    height
                };
                r = r + Solid::block("side_band", lb, width - GR_RBOX_CORNER_W, h);
            }
        } else {
            let back = Solid::block("back_corner", GR_RBOX_BACK_L, GR_RBOX_CORNER_W, height);
            r = r + back.replicated_at(&self.back_corner_centres());
        }
        let front = Solid::block("front_corner", GR_RBOX_FRONT_L, GR_RBOX_CORNER_W, height);
        r = r + front.replicated_at(&self.front_corner_centres());

        // Round the verticals; the four corner-block corners get the
        // larger radius.
        let xb = length / 2.0 + GR_RBOX_CWALL - GR_RBOX_WALL;
        let yb = width / 2.0 + GR_RBOX_CWALL - GR_RBOX_WALL;
        let corners = EdgeQuery::Vertical
            & EdgeQuery::AtX(ScalarFilter::equals([-xb, xb]))
            & EdgeQuery::AtY(ScalarFilter::equals([-yb, yb]));
        r = r
            .fillet(EdgeQuery::Vertical - corners.clone(), GR_RBOX_RAD)
            .fillet(corners, GR_RBOX_CRAD);

        // Bottom stacking mates; the lid back corners carry the hinges
        // instead.
        if self.params.stackable || as_lid {
            for (quad, (x, y, z)) in self.qtr_centres(0.25, 0.0, !as_lid) {
                let rq = quarter_ring(GR_BREG_R0, GR_BREG_R1, GR_REG_H + 0.5, quad, 0.0, 0.25);
                r = r - rq.translate(x, y, z);
            }
            for ((x, y), rot) in self.align_centres() {
                r = r - chamf_rect(GR_REG_L, GR_REG_W, GR_REG_H, rot, 0.5, 0.0).translate(x, y, 0.0);
            }
        }

        r = r.chamfer(EdgeQuery::OnFace(FaceQuery::PosZ), GR_RBOX_VCUT_D);

        // Wall grooves run before the overhanging lid lip so the
        // intersection cannot clip it.
        if self.params.wall_vgrooves {
            if self.params.rib_style {
                r = r - self.render_vcut();
            } else {
                r = r & self.render_vcut();
            }
        }
        r = r.chamfer(EdgeQuery::OnFace(FaceQuery::NegZ), GR_RBOX_VCUT_D);

        if as_lid {
            let w = GR_LID_HANDLE_W.min(length - 2.0 * GR_RBOX_FRONT_L);
            r = r + self.lid_handle(w).translate(0.0, -width / 2.0, 0.0);
            let hw = w / 2.0;
            let bends = EdgeQuery::vertical_of_length([9.0])
                & EdgeQuery::AtX(ScalarFilter::equals([-hw, hw]));
            r = r.fillet_safe(bends, 2.5 - EPS);
        }

        if self.params.rib_style && !as_lid {
            r = r & self.rib_style_cut();
        }

        // Latch channels ride on bosses proud of the wall by the full
        // channel depth; cutting the channel through each boss leaves a
        // rail either side of the rib ladder for the latch to slide on.
        let cut = self.clasp_cut(as_lid);
        let boss = Solid::block(
            "latch_boss",
            GR_RBOX_CHAN_D,
            GR_RBOX_CHAN_W + 2.0 * GR_RIB_W,
            height,
        );
        if self.params.side_clasps {
            for (x, y) in self.side_clasp_centres() {
                let side = if x < 0.0 { Side::Left } else { Side::Right };
                r = r + boss.translate(x, y, 0.0);
                r = r - cut.translate(x, y, 0.0);
                r = r + self.clasp_ribs(side, as_lid).translate(x, y, 0.0);
            }
        }
        let front_boss = boss.rotate_z(90.0);
        let front_cut = cut.rotate_z(90.0);
        for (x, y) in self.front_clasp_centres() {
            r = r + front_boss.translate(x, y, 0.0);
            r = r - front_cut.translate(x, y, 0.0);
            r = r + self.clasp_ribs(Side::Front, as_lid).translate(x, y, 0.0);
        }
        r
    }

    /// Groove solid. The standard body intersects with a grooved copy
    /// of its own envelope; the rib style cuts v-notches along the latch
    /// channels instead.
    fn render_vcut(&self) -> Solid {
        if self.params.rib_style {
            let notch = Solid::extrude_tapered(
                "chan_notch",
                Profile::Rect {
                    length: 2.0,
                    width: 2.0,
                },
                Plane::Xy,
                SQRT2,
                45.0,
            )
            .rotate_x(-90.0);
            let mut chan = Solid::empty("chan_notches");
            for (i, (x, y, z)) in self.clasp_notch_points().into_iter().enumerate() {
                let copy = notch.translate(x, y, z);
                chan = if i == 0 { copy } else { chan + copy };
            }
            let mut r = chan.replicated_at(&self.front_clasp_centres());
            if self.params.side_clasps {
                for (x, y) in self.side_clasp_centres() {
                    let rot = if x < 0.0 { -90.0 } else { 90.0 };
                    r = r + chan.rotate_z(rot).translate(x, y, 0.0);
                }
            }
            r
        } else {
            let xl = self.box_length() + 2.0 * (GR_RBOX_CWALL - GR_RBOX_WALL);
            let yl = self.box_width() + 2.0 * (GR_RBOX_CWALL - GR_RBOX_WALL);
            let lead = self.params.lid_height - GR_RBOX_VCUT_D;
            let mid = self.box_height() - 2.0 * (self.params.lid_height + GR_RBOX_VCUT_D);
            Solid::extrude_steps(
                "vcut_body",
                Profile::RoundedRect {
                    length: xl,
                    width: yl,
                    radius: GR_RBOX_CRAD,
                },
                Plane::Xy,
                vec![
                    ProfileStep::Straight { height: lead },
                    ProfileStep::Tapered {
                        height: GR_RBOX_VCUT_D,
                        angle_deg: 45.0,
                    },
                    ProfileStep::Tapered {
                        height: GR_RBOX_VCUT_D,
                        angle_deg: -45.0,
                    },
                    ProfileStep::Straight { height: mid },
                    ProfileStep::Tapered {
                        height: GR_RBOX_VCUT_D,
                        angle_deg: 45.0,
                    },
                    ProfileStep::Tapered {
                        height: GR_RBOX_VCUT_D,
                        angle_deg: -45.0,
                    },
                    ProfileStep::Straight { height: lead },
                ],
            )
        }
    }

    /// Rib-style keep solid: the grooved envelope plus material columns
    /// along the channels, hinge flanks and wall rib lines.
    fn rib_style_cut(&self) -> Solid {
        let xl = self.box_length() + 2.0 * (GR_RBOX_CWALL - GR_RBOX_WALL);
        let yl = self.box_width() + 2.0 * (GR_RBOX_CWALL - GR_RBOX_WALL);
        let wd = GR_RBOX_CWALL - GR_RBOX_WALL;
        let lead = self.params.lid_height - GR_RBOX_VCUT_D;
        let mid = self.box_height() - 2.0 * (lead + wd);
        let mut r = Solid::extrude_steps(
            "rib_keep",
            Profile::RoundedRect {
                length: xl,
                width: yl,
                radius: GR_RBOX_CRAD,
            },
            Plane::Xy,
            vec![
                ProfileStep::Straight { height: lead },
                ProfileStep::Tapered {
                    height: wd,
                    angle_deg: 45.0,
                },
                ProfileStep::Straight { height: mid },
                ProfileStep::Tapered {
                    height: wd,
                    angle_deg: -45.0,
                },
                ProfileStep::Straight { height: lead },
            ],
        );

        let chan_w = GR_RBOX_CHAN_W + 3.0 * GR_RBOX_WALL;
        let chan = Solid::block("chan_column", GR_RBOX_CHAN_D, chan_w, self.box_height());
        if self.params.side_clasps {
            r = r + chan.replicated_at(&self.side_clasp_centres());
        } else {
            let rail = Solid::block(
                "chan_rail",
                GR_RBOX_CHAN_D,
                1.5 * GR_RBOX_WALL,
                self.box_height(),
            );
            let xo = self.box_length() / 2.0 + GR_RBOX_CHAN_D / 2.0;
            let yo = self.clasp_pos().1 + GR_RBOX_CHAN_W / 2.0 + 1.5 * GR_RBOX_WALL / 2.0;
            let pts = [(-xo, -yo), (-xo, yo), (xo, -yo), (xo, yo)];
            r = r + rail.replicated_at(&pts);
        }
        r = r + chan.rotate_z(90.0).replicated_at(&self.front_clasp_centres());

        // Vertical rib lines beside the hinges and along the back wall.
        let rib_w = 1.5 * GR_RBOX_WALL;
        let rib = Solid::block("wall_rib", rib_w, wd, self.box_height());
        for (x, y, _) in self.hinge_centres() {
            let yo = y - wd / 2.0;
            r = r + rib.translate(x - GR_HINGE_SZ / 2.0 - rib_w, yo, 0.0);
            r = r + rib.translate(x + GR_HINGE_SZ / 2.0 + rib_w, yo, 0.0);
        }
        let yo = self.box_width() / 2.0 + GR_RBOX_CWALL - GR_RBOX_WALL - wd / 2.0;
        for xi in 0..self.params.length_u {
            let xo = -self.int_length() / 2.0 + xi as f64 * GRU;
            if xo.abs() < self.box_length() / 2.0 - GR_RBOX_BACK_L {
                r = r + rib.translate(xo, yo, 0.0);
            }
        }
        if !self.params.side_handles {
            let xo = self.box_length() / 2.0 + GR_RBOX_CWALL - GR_RBOX_WALL - wd / 2.0;
            let side_rib = rib.rotate_z(90.0);
            let mut ylim = self.int_width() / 2.0;
            if self.params.side_clasps {
                ylim -= GR_RBOX_CORNER_W;
            }
            for yi in 0..self.params.width_u {
                let yo = -self.int_width() / 2.0 + yi as f64 * GRU;
                if yo.abs() < ylim {
                    r = r + side_rib.translate(xo, yo, 0.0);
                    r = r + side_rib.translate(-xo, yo, 0.0);
                }
            }
        }
        let hm = self.box_height() - 2.0 * lead;
        r.fillet_safe(EdgeQuery::vertical_of_length([mid, hm]), 1.0)
    }

    /// Overhanging grip lip on the lid front.
    fn lid_handle(&self, width: f64) -> Solid {
        let (l0, l1, h1) = (3.0, 5.0, 4.0);
        let h2 = self.params.lid_height - GR_RBOX_VCUT_D;
        let hw = width / 2.0;
        let wedge = Solid::extrude(
            "lid_handle",
            Profile::Polygon {
                points: vec![
                    Vec2::new(l0, 0.0),
                    Vec2::new(-l1, 0.0),
                    Vec2::new(-l1, h1),
                    Vec2::new(l0, h2 + l0),
                ],
                fillets: vec![],
            },
            Plane::Yz,
            width,
        );
        let lip = wedge.shell(FaceQuery::NegZ, -2.5);
        let clip = Solid::block("lip_clip", width + 1.0, l0 + l1, self.params.lid_height)
            .translate(width / 2.0, (l0 - l1) / 2.0, 0.0);
        (lip & clip)
            .translate(-hw, 0.0, 0.0)
            .fillet_safe(
                EdgeQuery::vertical_of_length([h1]) & EdgeQuery::AtX(ScalarFilter::equals([-hw, hw])),
                2.45,
            )
            .fillet_safe(
                EdgeQuery::vertical_of_length([3.0])
                    & EdgeQuery::AtY(ScalarFilter::equals([-l1 + 2.5])),
                1.0,
            )
    }

    /// Shelled grab handle for the box sides, with support gussets.
    fn side_handle(&self, width: f64) -> Solid {
        let l0 = GR_RBOX_WALL;
        let (l1, h1) = (7.0, 4.0);
        let h2 = self.params.lid_height - GR_RBOX_VCUT_D + 2.0;
        let hw = width / 2.0;
        let wedge = Solid::extrude(
            "side_handle",
            Profile::Polygon {
                points: vec![
                    Vec2::new(l0, 0.0),
                    Vec2::new(-l1, 0.0),
                    Vec2::new(-l1, h1),
                    Vec2::new(l0, h2 + l0),
                ],
                fillets: vec![],
            },
            Plane::Yz,
            width,
        );
        let grip = wedge.shell(FaceQuery::NegZ, -2.5);
        let gusset = Solid::extrude(
            "handle_gusset",
            Profile::Polygon {
                points: vec![
                    Vec2::new(0.0, 0.0),
                    Vec2::new(-l1, 0.5),
                    Vec2::new(-l1, h1),
                    Vec2::new(0.0, h2),
                ],
                fillets: vec![],
            },
            Plane::Yz,
            2.5,
        );
        let r = grip
            + gusset.clone()
            + gusset.translate(width / 2.0 - 1.25, 0.0, 0.0)
            + gusset.translate(width - 2.5, 0.0, 0.0);
        let r = r.translate(-hw, 0.0, -2.0);
        // Trim to the wall footprint: the lip tops out level with the
        // box rim.
        let clip = Solid::block("grip_clip", width, l0 + l1, 12.0).translate(
            0.0,
            (l0 - l1) / 2.0,
            -2.0,
        );
        (r & clip)
            .fillet_safe(
                EdgeQuery::vertical_of_length([h1 - 0.5])
                    & EdgeQuery::AtX(ScalarFilter::equals([-hw, hw])),
                2.0,
            )
            .fillet_safe(
                EdgeQuery::vertical_of_length([2.9])
                    & EdgeQuery::AtY(ScalarFilter::equals([-l1 + GR_RBOX_WALL])),
                1.0,
            )
    }

    /// Front label holder: a tapered shroud with the panel aperture,
    /// drop-in chute and retaining ramps.
    fn label_slot(&self) -> Solid {
        let (ll, lh) = self.label_size();
        let mut r = Solid::extrude_steps(
            "label_slot",
            Profile::RoundedRect {
                length: ll,
                width: lh,
                radius: GR_RAD,
            },
            Plane::Xz,
            vec![ProfileStep::Tapered {
                height: GR_LABEL_SLOT_TH,
                angle_deg: 45.0,
            }],
        );
        let (al, ah) = self.label_size_aperture();
        let aperture = Solid::extrude(
            "label_aperture",
            Profile::Rect {
                length: al,
                width: ah,
            },
            Plane::Xz,
            GR_LABEL_SLOT_TH,
        )
        .chamfer(
            EdgeQuery::Length(ScalarFilter::equals([GR_LABEL_SLOT_TH])),
            2.5,
        );
        r = r - aperture;

        let (il, ih) = self.label_size_insert();
        let pocket = Solid::extrude(
            "label_pocket",
            Profile::Rect {
                length: il - 8.0,
                width: ih,
            },
            Plane::Xz,
            GR_LABEL_SLOT_TH,
        );
        r = r - pocket.translate(0.0, 0.0, 5.0);

        let chute = Solid::extrude(
            "label_chute",
            Profile::Rect {
                length: il,
                width: ih,
            },
            Plane::Xz,
            GR_LABEL_SLOT_TH / 2.0,
        )
        .fillet_safe(
            EdgeQuery::AtZ(ScalarFilter::equals([-ih / 2.0])) - EdgeQuery::Vertical,
            GR_LABEL_SLOT_TH / 2.0,
        );
        r = r - chute.translate(0.0, 0.0, GR_LABEL_SLOT_TH);

        // Ramps that keep the panel from sliding back out.
        let ramp = Solid::extrude(
            "label_ramp",
            Profile::Rect {
                length: 10.0,
                width: 2.5,
            },
            Plane::Xz,
            1.25,
        )
        .chamfer(EdgeQuery::OnFace(FaceQuery::NegY), 1.25 - EPS);
        let zr = ih / 2.0 - 2.0;
        if self.params.length_u < 5 {
            r = r + ramp.translate(0.0, 0.0, zr);
        } else {
            let q = (il - 8.0) / 4.0;
            r = r + ramp.translate(-q, 0.0, zr) + ramp.translate(q, 0.0, zr);
        }
        r
    }

    /// Label panel insert, undersized for a sliding fit.
    pub fn render_label(&self) -> Solid {
        let (ll, lh) = self.label_size();
        Solid::extrude(
            "label",
            Profile::RoundedRect {
                length: ll - 6.0,
                width: lh - 6.0,
                radius: GR_RAD,
            },
            Plane::Xz,
            self.params.label_th,
        )
        .named(self.filename_for("label"))
    }

    /// Vertical latch channel cutter with the slide slots top and
    /// bottom.
    fn clasp_cut(&self, as_lid: bool) -> Solid {
        let height = if as_lid {
            GR_CLASP_SLIDE_D + 6.0
        } else {
            self.box_height()
        };
        let w = GR_RBOX_CHAN_W + GR_CLASP_SLIDE_W;
        let slide = Solid::extrude(
            "latch_slide",
            Profile::Slot {
                length: GR_CLASP_SLIDE_D + GR_CLASP_SLIDE_W,
                width: GR_CLASP_SLIDE_W,
                angle_deg: 90.0,
            },
            Plane::Xz,
            w,
        )
        .translate(0.0, w / 2.0, 0.0);
        let chan = Solid::block("latch_channel", GR_RBOX_CHAN_D, GR_RBOX_CHAN_W, height);
        // Short lids still need the full slide travel.
        let height = height.max(GR_CLASP_SLIDE_D + 5.2);
        let zo = -GR_CLASP_SLIDE_D / 2.0 + GR_CLASP_SLIDE_W / 2.0;
        chan + slide.translate(0.0, 0.0, height + zo) + slide.translate(0.0, 0.0, zo)
    }

    /// A single clasp rib; the chamfered variant adds the latch lead-in
    /// ramp.
    fn clasp_rib(&self, chamfered: bool) -> Solid {
        let rib = Solid::block("clasp_rib", GR_RIB_L, GR_RIB_W, GR_RIB_H).chamfer(
            EdgeQuery::OnFace(FaceQuery::PosZ)
                & EdgeQuery::AtX(ScalarFilter::equals([-GR_RIB_L / 2.0, GR_RIB_L / 2.0])),
            1.0,
        );
        if !chamfered {
            return rib;
        }
        let relief = Solid::extrude(
            "rib_relief",
            Profile::Polygon {
                points: vec![
                    Vec2::new(0.0, 0.0),
                    Vec2::new(0.0, GR_RIB_H),
                    Vec2::new(GR_RIB_L / 6.0, GR_RIB_H),
                ],
                fillets: vec![],
            },
            Plane::Xz,
            GR_RIB_W,
        );
        let rib = rib - relief.translate(-GR_RIB_L / 1.85, GR_RIB_W / 2.0, 0.0);
        let ramp = Solid::block("rib_ramp", GR_RIB_L / 2.0, GR_RIB_W, GR_RIB_H / 3.0)
            .chamfer(
                EdgeQuery::OnFace(FaceQuery::PosZ)
                    & EdgeQuery::AtX(ScalarFilter::equals([-GR_RIB_L / 4.0, GR_RIB_L / 4.0])),
                GR_RIB_H / 3.0 - EPS,
            )
            .translate(-GR_RIB_L / 2.33, 0.0, 0.0);
        rib + ramp
    }

    /// Rib ladder for one latch channel, rotated onto the requested
    /// wall. The lid carries only the plain stacking rung.
    fn clasp_ribs(&self, side: Side, as_lid: bool) -> Solid {
        let y1 = GR_RIB_SEP / 2.0 + GR_RIB_W / 2.0;
        let y2 = y1 + GR_RIB_W + GR_RIB_GAP;
        let pts = [(0.0, -y2), (0.0, -y1), (0.0, y1), (0.0, y2)];
        let zo = -GR_RBOX_CHAN_D / 2.0;
        let heights = self.clasp_heights();

        let mut groups: Vec<Solid> = Vec::new();
        if self.params.stackable || as_lid {
            let plain = self.clasp_rib(false).translate(0.0, 0.0, zo).replicated_at(&pts);
            groups.push(plain.translate(heights[0], 0.0, 0.0));
        }
        if !as_lid {
            let ramped = self.clasp_rib(true).translate(0.0, 0.0, zo).replicated_at(&pts);
            groups.push(ramped.translate(heights[1], 0.0, 0.0));
            groups.push(ramped.translate(heights[2], 0.0, 0.0));
        }
        let mut it = groups.into_iter();
        let first = match it.next() {
            Some(g) => g,
            None => Solid::empty("clasp_ribs"),
        };
        let r = it.fold(first, |acc, g| acc + g).rotate_y(-90.0);
        match side {
            Side::Front => r.rotate_z(90.0),
            Side::Right => r.rotate_z(180.0),
            Side::Left => r,
        }
    }

    /// One handle mounting bracket, bored for the handle axle.
    fn handle_bracket(&self, small_hole: bool, side: Side) -> Solid {
        let l1 = GR_HANDLE_L1 / 2.0;
        let l2 = (GR_HANDLE_L2 / 2.0).min((self.box_height() - 6.0) / 2.0);
        let b = Solid::extrude(
            "handle_bracket",
            Profile::Polygon {
                points: vec![
                    Vec2::new(-l2, 0.0),
                    Vec2::new(-l1, GR_HANDLE_H),
                    Vec2::new(l1, GR_HANDLE_H),
                    Vec2::new(l2, 0.0),
                ],
                fillets: vec![
                    VertexFillet {
                        vertex: 1,
                        radius: GR_RAD,
                    },
                    VertexFillet {
                        vertex: 2,
                        radius: GR_RAD,
                    },
                ],
            },
            Plane::Yz,
            GR_HANDLE_W,
        );
        let clip = Solid::block("bracket_clip", 8.0, 2.0 * l2 + 1.0, GR_HANDLE_H)
            .translate(GR_HANDLE_W / 2.0, 0.0, 0.0);
        let mut b = b & clip;
        if small_hole {
            let bore = Solid::extrude(
                "axle_bore",
                Profile::Circle {
                    radius: M3_DIAM / 2.0,
                },
                Plane::Yz,
                GR_HANDLE_W,
            )
            .translate(0.0, 0.0, GR_HANDLE_H / 2.0);
            b = b - bore;
        } else {
            let face = match side {
                Side::Left => FaceQuery::PosX,
                _ => FaceQuery::NegX,
            };
            b = b.counterbore_holes(
                face,
                vec![Vec2::new(0.0, GR_HANDLE_H / 2.0)],
                M3_CLR_DIAM,
                M3_CB_DIAM,
                M3_CB_DEPTH,
                GR_HANDLE_W,
            );
        }
        b.chamfer(EdgeQuery::OnFace(FaceQuery::PosZ), 0.75).rotate_x(90.0)
    }

    /// Bracket pair for one end of the front handle.
    fn handle_mount(&self, side: Side) -> Solid {
        let near = self.handle_bracket(true, side);
        let far = self.handle_bracket(false, side);
        let xo = match side {
            Side::Left => GR_HANDLE_SEP,
            _ => -GR_HANDLE_SEP,
        };
        (near + far.translate(xo, 0.0, 0.0)).translate(-(xo + GR_HANDLE_W) / 2.0, 0.0, 0.0)
    }

    /// Build the front carrying handle, or `None` when the box is too
    /// short lengthwise to fit one.
    pub fn render_handle(&self) -> Option<Solid> {
        if !self.long_enough_for_handle() {
            info!(
                length_u = self.params.length_u,
                "box too short for a front handle"
            );
            return None;
        }
        let x2 = self.right_handle_centre().0;
        let (wt, h, rh) = (GR_HANDLE_TH, GR_HANDLE_SZ, GR_HANDLE_RAD);
        let outer = Solid::block(self.filename_for("handle"), 2.0 * x2 + wt, wt, h + wt / 2.0);
        let relief = Solid::block("handle_relief", 2.0 * x2 - wt, wt + 2.0, h - wt / 2.0 - 5.0)
            .translate(0.0, 0.0, -1.0);
        let bar = outer - relief;
        let inner_bends = EdgeQuery::AtZ(ScalarFilter::equals([h - wt / 2.0 - 6.0]))
            & EdgeQuery::AtX(ScalarFilter::equals([-(x2 - wt / 2.0), x2 - wt / 2.0]));
        let outer_bends = EdgeQuery::AtZ(ScalarFilter::equals([h + wt / 2.0]))
            & EdgeQuery::AtX(ScalarFilter::equals([-(x2 + wt / 2.0), x2 + wt / 2.0]));
        let bar = bar
            .fillet_safe(inner_bends, rh - wt / 2.0)
            .fillet_safe(outer_bends, rh + wt / 2.0)
            .fillet_safe(EdgeQuery::OnFace(FaceQuery::PosZ), wt / 2.0 - EPS)
            .chamfer(EdgeQuery::All, 1.0);
        let axle = Solid::extrude(
            "axle_bore",
            Profile::Circle {
                radius: M3_CLR_DIAM / 2.0,
            },
            Plane::Yz,
            4.0 * x2,
        )
        .translate(-2.0 * x2, 0.0, h - M3_CLR_DIAM);
        Some(bar - axle)
    }

    /// Rear standing foot matching the hinge depth.
    pub fn render_back_foot(&self) -> Solid {
        let w = self.params.hinge_width - 0.4;
        Solid::extrude(
            "back_foot",
            Profile::Slot {
                length: 2.0 * (GR_HINGE_OFFS + GR_HINGE_RAD),
                width: 2.0 * GR_HINGE_RAD,
                angle_deg: 0.0,
            },
            Plane::Yz,
            w,
        )
        .translate(-w / 2.0, 0.0, 0.0)
        .chamfer(EdgeQuery::All, 1.0)
        .translate(0.0, 0.0, GR_HINGE_RAD)
    }

    /// Hinge pocket cutter: stepped leaf recesses, lug slots and hex
    /// sockets, built hanging below the origin.
    fn hinge_mount(&self) -> Solid {
        let l1 = self.params.hinge_width + 2.0;
        let l2 = self.params.hinge_width;
        let l3 = (self.params.hinge_width - 2.0) / 2.0;
        let outer = Solid::block("hinge_pocket", l1, GR_HINGE_W1, GR_HINGE_H1)
            .translate(0.0, -GR_HINGE_W1 / 2.0, -GR_HINGE_H1);
        let inner = Solid::block("hinge_pocket_inner", l2, GR_HINGE_W2, GR_HINGE_H2)
            .translate(0.0, -GR_HINGE_D - GR_HINGE_W2 / 2.0, -GR_HINGE_H2);
        let steps = EdgeQuery::AtZ(ScalarFilter::equals([-GR_HINGE_H1]))
            & EdgeQuery::Length(ScalarFilter::equals([l2, GR_HINGE_W2]));
        let mut r = (outer + inner).chamfer(steps, 0.75);

        let slot = Solid::extrude(
            "lug_slot",
            Profile::RoundedRect {
                length: l3,
                width: GR_HINGE_W3,
                radius: 0.5,
            },
            Plane::Xy,
            GR_HINGE_H2,
        );
        let socket = self.hex_cut(None).translate(
            0.0,
            0.0,
            GR_HINGE_H2 - GR_HINGE_H1 - GR_HEX_H / 2.0 + GR_HINGE_SKEW,
        );
        let xo = GR_HINGE_SEP / 2.0 + l3 / 2.0;
        let yo = -GR_HINGE_W1 - 1.2 - GR_HINGE_W3 / 2.0;
        for x in [-xo, xo] {
            r = r + slot.translate(x, yo, -GR_HINGE_H2);
            r = r + socket.translate(x, yo, -GR_HINGE_H2);
        }
        r
    }

    /// Hex snap-fit lug; `depth` selects the undersized solid lug, the
    /// default is the socket cutter.
    fn hex_cut(&self, depth: Option<f64>) -> Solid {
        let (l1, l2, h) = match depth {
            None => (2.0, 3.5, GR_HEX_H),
            Some(_) => (1.7, 3.0, GR_HEX_H - 0.4),
        };
        let d = depth.unwrap_or(GR_HEX_D);
        let h2 = h / 2.0;
        let lug = Solid::extrude(
            "hex_lug",
            Profile::Polygon {
                points: vec![
                    Vec2::new(-h2, -l1),
                    Vec2::new(-h2, l1),
                    Vec2::new(0.0, l2),
                    Vec2::new(h2, l1),
                    Vec2::new(h2, -l1),
                    Vec2::new(0.0, -l2),
                ],
                fillets: vec![],
            },
            Plane::Yz,
            d,
        );
        if depth.is_some() {
            lug.chamfer(
                EdgeQuery::OnFace(FaceQuery::PosX)
                    & EdgeQuery::AtZ(ScalarFilter::Less { bound: -l1 }),
                d - EPS,
            )
        } else {
            lug
        }
    }

    /// Sliding latch body with interior rib reliefs, grip pads, snap
    /// nubs and the pivot lug.
    pub fn render_latch(&self) -> Solid {
        let l2 = GR_LATCH_L / 2.0;
        let w2 = GR_LATCH_W / 2.0;
        let h2 = GR_LATCH_H / 2.0;
        let c2 = GR_RIB_CTR / 2.0;
        let th = 2.5;
        let hf = GR_LATCH_H - th;

        let mut r = Solid::block("latch_body", GR_LATCH_L, GR_LATCH_W, GR_LATCH_H).chamfer(
            EdgeQuery::AtX(ScalarFilter::equals([l2])) - EdgeQuery::Vertical,
            1.0,
        );

        // Pivot lug riding in the channel slide slots.
        let lug = Solid::extrude(
            "latch_lug",
            Profile::Slot {
                length: 10.0 + GR_LATCH_H,
                width: GR_LATCH_H,
                angle_deg: 0.0,
            },
            Plane::Xz,
            GR_LATCH_W,
        );
        r = r + lug.translate(-l2 + 4.5, w2, h2);

        let hook_relief = Solid::block("hook_relief", 16.0, 15.6, 10.0)
            .fillet(EdgeQuery::Vertical, 4.0)
            .translate(-l2 - 8.0, 0.0, 0.0);
        r = r - hook_relief;

        let thumb = Solid::block("thumb_relief", 5.0, GR_LATCH_W - 2.4, 10.0)
            .fillet_safe(EdgeQuery::OnFace(FaceQuery::NegZ) - EdgeQuery::Vertical, 1.5)
            .fillet_safe(EdgeQuery::Vertical, 1.0)
            .translate(l2, 0.0, 2.0);
        r = (r - thumb).chamfer(EdgeQuery::All, 0.25);

        // Rib reliefs let the latch click over the ladder rungs.
        let pocket = Solid::block("rib_pocket", GR_LATCH_IL, GR_LATCH_IW, hf);
        for x in [-GR_RIB_CTR, 0.0, GR_RIB_CTR] {
            r = r - pocket.translate(x - 1.25, 0.0, th);
        }
        r = r
            .chamfer(
                EdgeQuery::OnFace(FaceQuery::PosZ)
                    & EdgeQuery::Length(ScalarFilter::equals([GR_LATCH_IW])),
                1.5,
            )
            .chamfer(
                EdgeQuery::OnFace(FaceQuery::PosZ)
                    & EdgeQuery::Length(ScalarFilter::equals([GR_LATCH_IL])),
                0.25,
            );
        let spine_relief = Solid::block("spine_relief", 20.0, 2.4, hf);
        r = r - spine_relief.translate(0.0, 0.0, th);

        // Grip pads along the interior webs.
        let pad = Solid::block("grip_pad", 8.5, 0.75, 4.5).chamfer(
            EdgeQuery::OnFace(FaceQuery::PosZ) - EdgeQuery::Vertical,
            1.5,
        );
        for x in [-c2, c2] {
            for y in [-1.575, 1.575] {
                r = r + pad.translate(x - 1.25, y, th);
            }
        }
        let end_clip = Solid::block("end_pad_clip", 4.0, 1.0, 7.0);
        for (x, xo) in [(-l2 + 2.25, 2.25), (13.75, -2.25)] {
            let clipped = pad.clone() & end_clip.translate(xo, 0.0, 0.0);
            for y in [-1.575, 1.575] {
                r = r + clipped.translate(x, y, th);
            }
        }

        // Snap nubs and their flex grooves on the side faces.
        let nub = Solid::extrude(
            "snap_nub",
            Profile::Rect {
                length: 2.0,
                width: 3.2,
            },
            Plane::Xz,
            0.6,
        )
        .chamfer(EdgeQuery::OnFace(FaceQuery::NegY), 0.6 - EPS);
        let xo = l2 + 4.5 - self.params.lid_height;
        for (angle, y) in [(0.0, -w2), (180.0, w2)] {
            r = r + nub.rotate_z(angle).translate(xo, y, h2);
        }
        let groove = Solid::extrude(
            "flex_groove",
            Profile::Rect {
                length: 6.0,
                width: 0.4,
            },
            Plane::Xz,
            1.6,
        );
        for y in [-w2 + 1.6, w2] {
            for z in [-2.1, 2.1] {
                r = r - groove.translate(xo, y, h2 + z);
            }
        }

        // Recentre on the lug overhang, grip end trailing in +y.
        r.translate(2.25, 0.0, 0.0)
            .rotate_z(-90.0)
            .named(self.filename_for("latch"))
    }

    /// One hinge leaf with its knuckles and snap-fit lugs.
    fn hinge_leaf(&self, leaf: HingeLeaf) -> Solid {
        let tol = 0.125;
        let cl = 2.0 * (GR_HINGE_OFFS + GR_HINGE_D + GR_HINGE_W2 / 2.0);
        let wh = GR_HINGE_W2 - GR_HINGE_TOL;
        let dh = GR_HINGE_H2 - 1.0;
        let ls = cl / 2.0;
        let ws = GR_HINGE_H1 - GR_HINGE_TOL;
        let h = self.params.hinge_width - GR_HINGE_TOL;
        let h3 = h / 3.0;
        let (ha, hb, hc, hd) = (h3 - tol, h3 + tol, 2.0 * h3 - tol, 2.0 * h3 + tol);
        let cro = GR_HINGE_RAD + GR_HINGE_TOL;
        let cri = GR_HINGE_RAD;
        let (ctr_x, ctr_y) = (cl / 2.0 + wh / 2.0, -GR_HINGE_SKEW);

        let (leaf_x, base_x) = match leaf {
            HingeLeaf::Inner => (wh / 2.0, ls / 2.0),
            HingeLeaf::Outer => (cl + wh / 2.0, cl + wh - ls / 2.0),
        };
        let body = Solid::block("hinge_leaf", wh, dh, h).translate(leaf_x, dh / 2.0, 0.0);
        let base = Solid::block("hinge_base", ls, ws, h).translate(base_x, ws / 2.0, 0.0);
        let mut r = (body + base).chamfer(
            EdgeQuery::Vertical & EdgeQuery::AtY(ScalarFilter::equals([ws])),
            1.1,
        );

        match leaf {
            HingeLeaf::Inner => {
                r = r - chamf_cyl(cro, hb, 0.0).translate(ctr_x, ctr_y, 0.0);
                r = r - chamf_cyl(cro, hb, 0.0).translate(ctr_x, ctr_y, hc);
                r = r + chamf_cyl(cri, hc - hb, 0.5).translate(ctr_x, ctr_y, hb);
                if !self.params.hinge_bolted {
                    r = r - chamf_cyl(4.5 / 2.0, hc - hb, 0.0).translate(ctr_x, ctr_y, hb);
                } else {
                    r = r - chamf_cyl(M3_CLR_DIAM / 2.0, h, 0.0).translate(ctr_x, ctr_y, 0.0);
                }
            }
            HingeLeaf::Outer => {
                r = r - chamf_cyl(cro, hd - ha, 0.0).translate(ctr_x, ctr_y, ha);
                r = r + chamf_cyl(cri, ha, 0.5).translate(ctr_x, ctr_y, 0.0);
                r = r + chamf_cyl(cri, ha, 0.5).translate(ctr_x, ctr_y, hd);
                if !self.params.hinge_bolted {
                    r = r + chamf_cyl(4.0 / 2.0, h, 0.0).translate(ctr_x, ctr_y, 0.0);
                } else {
                    r = r - chamf_cyl(M3_DIAM / 2.0, h, 0.0).translate(ctr_x, ctr_y, 0.0);
                    r = r - chamf_cyl(M3_CLR_DIAM / 2.0, ha, 0.0).translate(ctr_x, ctr_y, h - ha);
                    r = r - chamf_cyl(M3_CB_DIAM / 2.0, M3_CB_DEPTH, 0.0).translate(
                        ctr_x,
                        ctr_y,
                        h - M3_CB_DEPTH,
                    );
                }
            }
        }

        let breaks = (EdgeQuery::Length(ScalarFilter::Greater { bound: 0.2 })
            - EdgeQuery::Length(ScalarFilter::equals_tol([wh, h], 0.02)))
            - EdgeQuery::Radius(ScalarFilter::equals([cro]));
        r = r.chamfer(breaks, 0.5);

        // Snap-fit lugs on the mounting ends.
        let lug = self.hex_cut(Some(GR_HEX_D));
        let yo = GR_HINGE_H1 + GR_HEX_H / 2.0 - 2.0 * GR_HINGE_SKEW;
        let zo = GR_HINGE_SEP / 2.0 + (self.params.hinge_width - 2.0) / 4.0;
        let lug_x = match leaf {
            HingeLeaf::Inner => -GR_HEX_D,
            HingeLeaf::Outer => cl + wh,
        };
        for zc in [h / 2.0 - zo, h / 2.0 + zo] {
            r = r + lug.translate(lug_x, yo, zc);
        }
        r.named(self.filename_for("hinge"))
    }

    /// Both hinge leaves, laid out flat for printing.
    pub fn render_hinge(&self) -> Solid {
        self.hinge_leaf(HingeLeaf::Inner) + self.hinge_leaf(HingeLeaf::Outer)
    }

    // =========================================================================
    // Parts
    // =========================================================================

    /// Build the box body.
    pub fn render(&self) -> Solid {
        let mut r = self.body_shell(false);

        // Hollow the interior above the floor.
        let cavity = Solid::extrude(
            "interior",
            Profile::RoundedRect {
                length: self.int_length(),
                width: self.int_width(),
                radius: GR_RAD,
            },
            Plane::Xy,
            self.box_height() - GR_RBOX_FLOOR,
        );
        r = r - cavity.translate(0.0, 0.0, GR_RBOX_FLOOR);

        // Top registration keys and corner rings.
        for ((x, y), rot) in self.align_centres() {
            r = r + chamf_rect(GR_REG_L, GR_REG_W, GR_REG_H, rot, 0.75, self.box_height())
                .translate(x, y, 0.0);
        }
        let clamp = self.ring_clamp(self.box_height());
        let (lx, ly, lz) = self.left_qtr_centre();
        let left = quarter_ring(GR_REG_R0, GR_REG_R1, GR_REG_H, Quad::Bl, 0.5, 0.0)
            .translate(lx, ly, lz);
        r = r + (left & clamp.clone());
        let (rx, ry, rz) = self.right_qtr_centre();
        let right = quarter_ring(GR_REG_R0, GR_REG_R1, GR_REG_H, Quad::Br, 0.5, 0.0)
            .translate(rx, ry, rz);
        r = r + (right & clamp);

        if self.params.front_handle && self.long_enough_for_handle() {
            let (x, y, z) = self.left_handle_centre();
            r = r + self.handle_mount(Side::Left).translate(x, y, z);
            let (x, y, z) = self.right_handle_centre();
            r = r + self.handle_mount(Side::Right).translate(x, y, z);
        }

        let mount = self.hinge_mount();
        for (x, y, z) in self.hinge_centres() {
            r = r - mount.translate(x, y, z);
        }

        if self.params.side_handles {
            let w = GR_SIDE_HANDLE_W.min(self.box_width() - 2.0 * GR_RBOX_CORNER_W);
            let grab = self.side_handle(w);
            let zo = self.box_height() - self.params.lid_height;
            let l2 = self.box_length() / 2.0;
            r = r + grab.rotate_z(-90.0).translate(-l2, 0.0, zo);
            r = r + grab.rotate_z(90.0).translate(l2, 0.0, zo);
            let joins = EdgeQuery::Vertical
                & EdgeQuery::AtX(ScalarFilter::equals([-l2, l2]))
                & EdgeQuery::AtY(ScalarFilter::equals([-w / 2.0, w / 2.0]));
            r = r.fillet_safe(joins, 2.5);
        }

        if self.params.front_label {
            let (x, y, z) = self.label_centre();
            r = r + self.label_slot().translate(x, y, z);
        }

        if self.params.back_feet {
            let foot = self.render_back_foot();
            for (x, y, _) in self.hinge_centres() {
                r = r + foot.translate(x, y, 0.0);
            }
        }

        if self.params.inside_baseplate {
            r = r + self.floor_plate.render().translate(0.0, 0.0, GR_RBOX_FLOOR);
            r = r.chamfer(EdgeQuery::FlatAtZ { z: GR_RBOX_FLOOR }, 0.8);
        } else {
            let floor = Solid::extrude(
                "plain_floor",
                Profile::RoundedRect {
                    length: self.int_length(),
                    width: self.int_width(),
                    radius: GR_RAD,
                },
                Plane::Xy,
                GR_RBOX_WALL,
            );
            r = r + floor;
        }
        r.named(self.filename_for("body"))
    }

    /// Build the lid.
    pub fn render_lid(&self) -> Solid {
        let mut r = self.body_shell(true);
        let lid_height = self.params.lid_height;

        if self.params.lid_baseplate {
            let hollow = Solid::extrude_steps(
                "lid_hollow",
                Profile::RoundedRect {
                    length: self.int_length() - GR_TOL,
                    width: self.int_width() - GR_TOL,
                    radius: GR_RAD,
                },
                Plane::Xy,
                vec![
                    ProfileStep::Straight {
                        height: lid_height - 0.5,
                    },
                    ProfileStep::Tapered {
                        height: 1.0,
                        angle_deg: -45.0,
                    },
                ],
            );
            r = r - hollow;
            r = r + self.lid_plate.render().translate(0.0, 0.0, 4.3);
        } else if self.params.lid_window {
            let hollow = Solid::extrude(
                "lid_hollow",
                Profile::RoundedRect {
                    length: self.int_length(),
                    width: self.int_width(),
                    radius: GR_RAD,
                },
                Plane::Xy,
                5.0,
            );
            r = r - hollow;
        }

        let under = Solid::extrude(
            "lid_under_hollow",
            Profile::RoundedRect {
                length: self.int_length(),
                width: self.int_width(),
                radius: GR_RAD,
            },
            Plane::Xy,
            4.6,
        );
        r = r - under;

        // Loose-fit stacking feet on the underside, one per cell.
        let foot_steps = if self.params.lid_baseplate {
            vec![
                ProfileStep::Tapered {
                    height: 2.61,
                    angle_deg: -22.1,
                },
                ProfileStep::Tapered {
                    height: 3.54,
                    angle_deg: -45.0,
                },
            ]
        } else {
            vec![
                ProfileStep::Tapered {
                    height: 2.61,
                    angle_deg: -22.1,
                },
                ProfileStep::Tapered {
                    height: 2.9,
                    angle_deg: -45.0,
                },
                ProfileStep::Tapered {
                    height: 0.78,
                    angle_deg: -85.0,
                },
                ProfileStep::Straight { height: 2.0 },
            ]
        };
        let mut foot = Solid::extrude_steps(
            "lid_foot",
            Profile::RoundedRect {
                length: 35.0,
                width: 35.0,
                radius: 0.8,
            },
            Plane::Xy,
            foot_steps,
        );
        if self.params.lid_baseplate {
            foot = foot.shell(FaceQuery::PosZ, -1.2);
        }
        let feet = foot
            .replicated_at(&self.dims.grid_centres())
            .translate(-self.dims.half_length(), -self.dims.half_width(), 0.0);
        let clamp = Solid::extrude(
            "foot_clamp",
            Profile::RoundedRect {
                length: self.int_length(),
                width: self.int_width(),
                radius: GR_RAD,
            },
            Plane::Xy,
            GR_LID_WINDOW_H,
        );
        r = r + (feet & clamp);
        r = r.chamfer(
            EdgeQuery::Length(ScalarFilter::equals([33.4])) & EdgeQuery::FlatAtZ { z: 0.0 },
            0.75,
        );

        if self.params.stackable {
            // The rings sit on the corner bands; clamp them to the band
            // footprint so nothing overhangs the walls.
            let clamp = self.ring_clamp(lid_height);
            for (quad, (x, y, z)) in self.qtr_centres(0.125, lid_height, true) {
                let ring = quarter_ring(GR_REG_R0, GR_REG_R1, GR_REG_H, quad, 0.5, 0.0)
                    .translate(x, y, z);
                r = r + (ring & clamp.clone());
            }
        }

        if self.params.lid_window {
            r = self.cut_lid_window(r);
        }

        // Hinge pockets, flipped to cut up from the mating face.
        let mount = self.hinge_mount().rotate_y(180.0);
        for (x, y, _) in self.hinge_centres() {
            r = r - mount.translate(x, y, 0.0);
        }

        if self.params.lid_window {
            let bore = Solid::cylinder("window_screw", M2_DIAM / 2.0, 5.0)
                + Solid::extrude_tapered(
                    "window_screw_lead",
                    Profile::Circle {
                        radius: M2_DIAM / 2.0,
                    },
                    Plane::Xy,
                    0.8,
                    -45.0,
                )
                .translate(0.0, 0.0, 5.0);
            for (x, y, z) in self.lid_window_hole_pos(1.0) {
                r = r - bore.translate(x, y, z);
            }
        }
        r.named(self.filename_for("lid"))
    }

    /// Window support grid apertures and the panel slide slot.
    fn cut_lid_window(&self, r: Solid) -> Solid {
        let aperture = Solid::extrude_tapered(
            "window_aperture",
            Profile::RoundedRect {
                length: 30.0,
                width: 30.0,
                radius: 1.0,
            },
            Plane::Xy,
            GR_LID_WINDOW_H,
            -34.0,
        );
        let apertures = aperture
            .replicated_at(&self.dims.grid_centres())
            .translate(-self.dims.half_length(), -self.dims.half_width(), 0.0);
        let mut r = r - apertures;

        let ext = 20.0;
        let (l, w) = self.lid_window_size_ext(-2.0 + ext, 0.0);
        let hlw = self.params.lid_height - GR_LID_WINDOW_H;
        let ht = hlw - self.params.window_th - 0.5;
        let slot = Solid::loft(
            "window_slot",
            Plane::Xy,
            vec![
                gridfin_ir::LoftSection {
                    profile: Profile::Rect {
                        length: l,
                        width: w,
                    },
                    offset: 0.0,
                },
                gridfin_ir::LoftSection {
                    profile: Profile::Rect {
                        length: l,
                        width: w,
                    },
                    offset: self.params.window_th,
                },
                gridfin_ir::LoftSection {
                    profile: Profile::Rect {
                        length: l - 6.0,
                        width: w - 6.0,
                    },
                    offset: self.params.window_th + ht,
                },
                gridfin_ir::LoftSection {
                    profile: Profile::Rect {
                        length: l - 6.0,
                        width: w - 6.0,
                    },
                    offset: self.params.window_th + ht + self.params.lid_height,
                },
            ],
            true,
        )
        .fillet_safe(EdgeQuery::Vertical, 0.5);
        r = r - slot.translate(0.0, ext / 2.0, GR_LID_WINDOW_H);

        let rim = Solid::extrude(
            "window_rim_relief",
            Profile::RoundedRect {
                length: self.int_length() - 5.0,
                width: self.int_width() - 5.0,
                radius: GR_RAD,
            },
            Plane::Xy,
            self.params.lid_height,
        );
        r - rim.translate(0.0, 0.0, self.params.lid_height - ht)
    }

    /// Build the clear window panel for a windowed lid.
    pub fn render_lid_window(&self) -> Solid {
        let (l, w) = self.lid_window_size();
        let mut r = Solid::extrude(
            self.filename_for("lid_window"),
            Profile::RoundedRect {
                length: l,
                width: w,
                radius: 0.5,
            },
            Plane::Xy,
            self.params.window_th,
        )
        .translate(0.0, 3.0, 0.0);
        let bore = Solid::cylinder("window_screw_clr", M2_CLR_DIAM / 2.0, self.params.window_th);
        for (x, y, z) in self.lid_window_hole_pos(0.0) {
            r = r - bore.translate(x, y, z);
        }
        r
    }

    /// Lay out every installable accessory part in one document: the
    /// latches, the handle, the hinge leaves and the label panel.
    pub fn render_accessories(&self) -> Document {
        let margin = 8.0;
        let mut doc = Document::new();

        let latch = self.render_latch();
        let (sx, sy, _) = latch.size();
        let latch_count = if self.params.side_clasps { 6 } else { 2 };
        for i in 0..latch_count {
            latch
                .translate(i as f64 * (sx + margin) + sx / 2.0, sy / 2.0, 0.0)
                .add_to_document(&mut doc, None);
        }
        let mut oy = sy + margin;

        if let Some(handle) = self.render_handle() {
            let flat = handle.rotate_x(-90.0);
            let (hx, hy, hz) = flat.size();
            flat.translate(hx / 2.0, oy + hy / 2.0, hz / 2.0)
                .add_to_document(&mut doc, None);
            oy += hy + margin;
        }

        let inner = self.hinge_leaf(HingeLeaf::Inner);
        let outer = self.hinge_leaf(HingeLeaf::Outer);
        let (hx, hy, _) = self.render_hinge().size();
        for i in 0..2 {
            let ox = margin + i as f64 * 1.5 * hx;
            inner.translate(ox, oy, 0.0).add_to_document(&mut doc, None);
            outer.translate(ox, oy, 0.0).add_to_document(&mut doc, None);
            inner
                .translate(ox + 3.0 * hx, oy + hy / 2.0, 0.0)
                .add_to_document(&mut doc, None);
            outer
                .translate(ox + 3.0 * hx, oy + hy / 2.0, 0.0)
                .add_to_document(&mut doc, None);
        }

        self.render_label()
            .rotate_x(90.0)
            .translate(40.0, -20.0, self.params.label_th)
            .add_to_document(&mut doc, None);
        doc
    }

    /// Compose the full colored assembly: body, lid, latches, hinges,
    /// handle and label in their installed positions.
    pub fn render_assembly(&self) -> Document {
        let mut doc = Document::new();
        let box_color = [0.25, 0.25, 0.25, 1.0];
        let lid_color = [0.25, 0.5, 0.75, 1.0];
        let fitting_color = [0.75, 0.5, 0.25, 1.0];
        let label_color = [0.7, 0.7, 0.7, 1.0];
        let window_color = [0.9, 0.9, 0.9, 0.25];

        self.render().add_to_document(&mut doc, Some(box_color));
        self.render_lid()
            .translate(0.0, 0.0, self.box_height())
            .add_to_document(&mut doc, Some(lid_color));
        if self.params.lid_window {
            self.render_lid_window()
                .translate(0.0, 0.0, self.box_height() + GR_LID_WINDOW_H)
                .add_to_document(&mut doc, Some(window_color));
        }

        if self.params.front_handle {
            if let Some(handle) = self.render_handle() {
                let zo = self.right_handle_centre().2 - (GR_HANDLE_SZ - M3_CB_DEPTH);
                handle
                    .translate(0.0, -self.box_width() / 2.0 - GR_HANDLE_H / 2.0, zo)
                    .add_to_document(&mut doc, Some(fitting_color));
            }
        }

        let yo = GR_LATCH_H / 2.0;
        let zo = self.box_height() - GR_RIB_CTR + yo / 2.0;
        let front_latch = self.render_latch().rotate_x(-90.0);
        for (i, (x, y)) in self.front_clasp_centres().into_iter().enumerate() {
            front_latch
                .translate(x, y - yo, zo)
                .named(format!("latch_{}", i + 1))
                .add_to_document(&mut doc, Some(fitting_color));
        }
        if self.params.side_clasps {
            let left_latch = front_latch.rotate_z(-90.0);
            let right_latch = left_latch.rotate_z(180.0);
            for (i, (x, y)) in self.side_clasp_centres().into_iter().enumerate() {
                let (latch, xo) = if x < 0.0 {
                    (&left_latch, -yo)
                } else {
                    (&right_latch, yo)
                };
                latch
                    .translate(x + xo, y, zo)
                    .named(format!("latch_{}", i + 3))
                    .add_to_document(&mut doc, Some(fitting_color));
            }
        }

        let cl = 2.0 * (GR_HINGE_OFFS + GR_HINGE_D + GR_HINGE_W2 / 2.0);
        let wh = GR_HINGE_W2 - GR_HINGE_TOL;
        let ctr_x = cl / 2.0 + wh / 2.0;
        for (i, (x, y, z)) in self.hinge_centres().into_iter().enumerate() {
            for (leaf, rot) in [(HingeLeaf::Inner, 90.0), (HingeLeaf::Outer, -90.0)] {
                let part = self
                    .hinge_leaf(leaf)
                    .translate(-ctr_x, GR_HINGE_SKEW, 0.0)
                    .rotate_z(rot);
                let c = part.bounds().center();
                part.translate(0.0, -c[1], -c[2])
                    .rotate_y(90.0)
                    .translate(x, y, z)
                    .named(format!(
                        "hinge_{}_{}",
                        if i == 0 { "left" } else { "right" },
                        match leaf {
                            HingeLeaf::Inner => "inner",
                            HingeLeaf::Outer => "outer",
                        }
                    ))
                    .add_to_document(&mut doc, Some(fitting_color));
            }
        }

        if self.params.front_label {
            let (x, y, z) = self.label_centre();
            self.render_label()
                .translate(x, y, z)
                .add_to_document(&mut doc, Some(label_color));
        }
        doc
    }

    /// Descriptive part filename stem.
    pub fn filename(&self) -> String {
        let prefix = if self.params.rib_style {
            "gf_ribbox_"
        } else {
            "gf_ruggedbox_"
        };
        let mut name = format!(
            "{}{}x{}x{}",
            prefix, self.params.length_u, self.params.width_u, self.params.height_u
        );
        if self.params.front_handle || self.params.front_label {
            name.push_str("_fr-");
            if self.params.front_handle {
                name.push('h');
            }
            if self.params.front_label {
                name.push('l');
            }
        }
        if self.params.side_handles || self.params.side_clasps {
            name.push_str("_sd-");
            if self.params.side_handles {
                name.push('h');
            }
            if self.params.side_clasps {
                name.push('c');
            }
        }
        if self.params.stackable {
            name.push_str("_stack");
        }
        if self.params.lid_baseplate {
            name.push_str("_lidbp");
        }
        if self.params.lid_window {
            name.push_str("_win");
        }
        name
    }

    /// Filename stem for one named part of the set.
    pub fn filename_for(&self, part: &str) -> String {
        let base = self.filename();
        let prefix = if self.params.rib_style {
            "gf_ribbox_"
        } else {
            "gf_ruggedbox_"
        };
        let units = format!(
            "{}x{}x{}",
            self.params.length_u, self.params.width_u, self.params.height_u
        );
        let suffix = base
            .strip_prefix(prefix)
            .and_then(|s| s.strip_prefix(&units))
            .unwrap_or("");
        format!("{}{}_{}{}", prefix, units, part, suffix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn test_box() -> GridfinityRuggedBox {
        GridfinityRuggedBox::sized(5, 4, 6).unwrap()
    }

    #[test]
    fn filename_tokens() {
        let b = test_box();
        assert_eq!(b.filename(), "gf_ruggedbox_5x4x6_fr-hl_sd-hc_stack_lidbp");
        assert_eq!(
            b.filename_for("body"),
            "gf_ruggedbox_5x4x6_body_fr-hl_sd-hc_stack_lidbp"
        );

        let rib = GridfinityRuggedBox::new(RuggedBoxParams {
            length_u: 5,
            width_u: 4,
            height_u: 6,
            rib_style: true,
            ..RuggedBoxParams::default()
        })
        .unwrap();
        assert!(rib.filename().starts_with("gf_ribbox_5x4x6"));

        // A window displaces the lid baseplate.
        let win = GridfinityRuggedBox::new(RuggedBoxParams {
            length_u: 5,
            width_u: 4,
            height_u: 6,
            lid_window: true,
            ..RuggedBoxParams::default()
        })
        .unwrap();
        assert_eq!(win.filename(), "gf_ruggedbox_5x4x6_fr-hl_sd-hc_stack_win");
        assert!(!win.params().lid_baseplate);
    }

    #[test]
    fn dimensional_model() {
        let b = test_box();
        assert_relative_eq!(b.box_length(), 215.0);
        assert_relative_eq!(b.box_width(), 173.0);
        assert_relative_eq!(b.box_height(), 45.0);
        let h = b.clasp_heights();
        assert_relative_eq!(h[0], 7.0);
        assert_relative_eq!(h[1], 33.5);
        assert_relative_eq!(h[2], 24.5);
        assert_eq!(b.side_clasp_centres().len(), 4);
        let hinges = b.hinge_centres();
        assert_relative_eq!(hinges[0].0, -67.5);
        assert_relative_eq!(hinges[0].1, 88.0);
        assert!(b.long_enough_for_handle());
        assert_relative_eq!(b.right_handle_centre().2, 27.5);
    }

    #[test]
    fn body_envelope() {
        let b = test_box();
        let r = b.render();
        let (x, y, z) = r.size();
        // The latch bosses reach the full channel depth of 7.5 mm past
        // each side wall, the handle mounts 8 mm past the front, the
        // back feet 10 mm past the hinge line, and the top registration
        // features 2.5 mm above the rim.
        assert_relative_eq!(x, 230.0, epsilon = 1e-9);
        assert_relative_eq!(y, 192.5, epsilon = 1e-9);
        assert_relative_eq!(z, 47.5, epsilon = 1e-9);
        let (min, max) = r.bounding_box();
        assert_relative_eq!(min[0] + max[0], 0.0, epsilon = 1e-9);
        assert_relative_eq!(min[2], 0.0, epsilon = 1e-9);
    }

    #[test]
    fn lid_envelope() {
        let b = test_box();
        let r = b.render_lid();
        let (x, y, z) = r.size();
        // The lid channel bosses match the body's so the latches wrap
        // both halves of the joint; the stacking rings stay clamped to
        // the corner bands.
        assert_relative_eq!(x, 230.0, epsilon = 1e-9);
        assert_relative_eq!(y, 182.0, epsilon = 1e-9);
        // The stacking rung ladder tops out above the lid band.
        assert_relative_eq!(z, 14.0, epsilon = 1e-9);
        let (min, max) = r.bounding_box();
        assert_relative_eq!(min[0] + max[0], 0.0, epsilon = 1e-9);
        assert_relative_eq!(max[1], 88.0, epsilon = 1e-9);
    }

    #[test]
    fn accessory_part_sizes() {
        let b = test_box();
        let (x, y, z) = b.render_latch().size();
        assert_relative_eq!(x, 15.2, epsilon = 1e-9);
        assert_relative_eq!(y, 42.5, epsilon = 1e-9);
        assert_relative_eq!(z, 8.0, epsilon = 1e-9);

        let handle = b.render_handle().unwrap();
        let (x, y, z) = handle.size();
        assert_relative_eq!(x, 161.0, epsilon = 1e-9);
        assert_relative_eq!(y, 6.0, epsilon = 1e-9);
        assert_relative_eq!(z, 28.0, epsilon = 1e-9);

        let (x, y, z) = b.render_hinge().size();
        assert_relative_eq!(x, 38.6, epsilon = 1e-9);
        assert_relative_eq!(y, 18.1, epsilon = 1e-9);
        assert_relative_eq!(z, 33.0, epsilon = 1e-9);
    }

    #[test]
    fn accessory_document_roots() {
        let b = test_box();
        let doc = b.render_accessories();
        // 6 latches, 1 handle, 8 hinge leaves, 1 label.
        assert_eq!(doc.roots.len(), 16);

        let narrow = GridfinityRuggedBox::new(RuggedBoxParams {
            length_u: 5,
            width_u: 4,
            height_u: 6,
            side_clasps: false,
            ..RuggedBoxParams::default()
        })
        .unwrap();
        assert_eq!(narrow.render_accessories().roots.len(), 12);
    }

    #[test]
    fn assembly_document() {
        let b = test_box();
        let doc = b.render_assembly();
        // Body, lid, handle, 6 latches, 4 hinge leaves, label.
        assert_eq!(doc.roots.len(), 14);
        assert_eq!(doc.roots[0].color, Some([0.25, 0.25, 0.25, 1.0]));
        assert_eq!(doc.roots[1].color, Some([0.25, 0.5, 0.75, 1.0]));
        assert!(doc.roots[0].label.contains("body"));
        assert!(doc.roots[1].label.contains("lid"));
    }

    #[test]
    fn label_sizing() {
        let b = test_box();
        // Auto length trimmed around the handle brackets.
        let (l, h) = b.label_size();
        assert_relative_eq!(l, 153.0);
        assert_relative_eq!(h, 30.0);

        let plain = GridfinityRuggedBox::new(RuggedBoxParams {
            length_u: 5,
            width_u: 4,
            height_u: 6,
            front_handle: false,
            ..RuggedBoxParams::default()
        })
        .unwrap();
        assert_relative_eq!(plain.label_size().0, 193.0);

        // A short box clamps the panel height below the rim.
        let short = GridfinityRuggedBox::new(RuggedBoxParams {
            length_u: 5,
            width_u: 4,
            height_u: 4,
            label_height: Some(40.0),
            ..RuggedBoxParams::default()
        })
        .unwrap();
        assert_relative_eq!(short.label_size().1, short.box_height() - 5.0);
    }

    #[test]
    fn rejects_undersized_boxes() {
        assert!(matches!(
            GridfinityRuggedBox::sized(2, 4, 6),
            Err(GfError::RuggedSize { axis: 'x', .. })
        ));
        assert!(matches!(
            GridfinityRuggedBox::sized(5, 2, 6),
            Err(GfError::RuggedSize { axis: 'y', .. })
        ));
        assert!(matches!(
            GridfinityRuggedBox::sized(5, 4, 3),
            Err(GfError::RuggedSize { axis: 'z', .. })
        ));
    }
}
