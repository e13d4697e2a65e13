//! Physical constants of the Gridfinity unit system and the extrusion
//! profiles shared by all generators.
//!
//! Linear dimensions are millimeters, angles degrees. Values carrying a
//! "calibration" note are tuned against kernel fillet/boolean tolerances
//! rather than being part of the published grid geometry.

use gridfin_ir::ProfileStep;

/// √2, used to convert chamfer slant lengths into vertical extents.
pub const SQRT2: f64 = std::f64::consts::SQRT_2;

/// Grid pitch: horizontal module size.
pub const GRU: f64 = 42.0;
/// Half grid pitch.
pub const GRU2: f64 = GRU / 2.0;
/// Grid height unit: vertical module increment.
pub const GRHU: f64 = 7.0;
/// Baseplate cell recess cross-section size (pitch plus mating clearance).
pub const GRU_CUT: f64 = 42.71;

/// Default box wall thickness.
pub const GR_WALL: f64 = 1.0;
/// Divider partition wall thickness.
pub const GR_DIV_WALL: f64 = 1.2;
/// Nominal clearance subtracted from a box outer envelope.
pub const GR_TOL: f64 = 0.5;

/// Outer corner radius of grid modules.
pub const GR_RAD: f64 = 4.0;
/// Height of the baseplate / stacking foot section.
pub const GR_BASE_HEIGHT: f64 = 4.75;
/// Vertical extent of the lower foot chamfer.
pub const GR_BASE_CHAMF_H: f64 = 0.985 / SQRT2;
/// Vertical extent of the straight band between foot chamfers.
pub const GR_STR_H: f64 = 1.8;
/// Vertical extent of the upper baseplate recess chamfer.
pub const GR_BASE_TOP_CHAMF: f64 = GR_BASE_HEIGHT - GR_BASE_CHAMF_H - GR_STR_H;
/// Vertical extent of the lower box-foot chamfer.
pub const GR_BOX_CHAMF_H: f64 = 1.13 / SQRT2;
/// Vertical extent of the upper box-foot chamfer.
pub const GR_BOX_TOP_CHAMF: f64 = GR_BASE_HEIGHT - GR_BOX_CHAMF_H - GR_STR_H;

/// Magnet hole diameter.
pub const GR_HOLE_D: f64 = 6.5;
/// Magnet hole depth.
pub const GR_HOLE_H: f64 = 2.4;
/// Screw bore diameter.
pub const GR_BOLT_D: f64 = 3.0;
/// Screw bore depth (below the magnet counterbore).
pub const GR_BOLT_H: f64 = 3.6 + GR_HOLE_H;
/// Radial offset of each hole from its grid cell center.
pub const GR_HOLE_DIST: f64 = 26.0 / 2.0;

/// Height of a box bottom section (feet plus floor).
pub const GR_BOT_H: f64 = 7.2;
/// Box floor thickness above the feet.
pub const GR_FLOOR: f64 = GR_BOT_H - GR_BASE_HEIGHT;
/// Interior floor fillet radius.
pub const GR_FILLET: f64 = 1.2;

/// Vertical extent of the lip undercut (45° inward).
pub const GR_UNDER_H: f64 = 1.6;
/// Vertical extent of the straight lip band above the undercut.
pub const GR_TOPSIDE_H: f64 = 1.2;
/// Total height of the stacking lip profile.
pub const GR_LIP_H: f64 = GR_UNDER_H + GR_TOPSIDE_H + 0.7 + 1.8 + 1.3;

/// Stacking-lip sweep, bottom to top, applied to the interior cavity.
pub fn lip_profile() -> Vec<ProfileStep> {
    vec![
        ProfileStep::Tapered {
            height: GR_UNDER_H,
            angle_deg: 45.0,
        },
        ProfileStep::Straight {
            height: GR_TOPSIDE_H,
        },
        ProfileStep::Tapered {
            height: 0.7,
            angle_deg: -45.0,
        },
        ProfileStep::Straight { height: 1.8 },
        ProfileStep::Tapered {
            height: 1.3,
            angle_deg: -45.0,
        },
    ]
}

/// Plain-rim sweep used when the stacking lip is suppressed.
pub fn no_lip_profile() -> Vec<ProfileStep> {
    vec![ProfileStep::Straight { height: GR_LIP_H }]
}

/// Baseplate cell recess sweep, bottom to top before the vertical mirror.
pub fn baseplate_recess_profile() -> Vec<ProfileStep> {
    vec![
        ProfileStep::Tapered {
            height: GR_BASE_TOP_CHAMF,
            angle_deg: 45.0,
        },
        ProfileStep::Straight { height: GR_STR_H },
        ProfileStep::Tapered {
            height: GR_BASE_CHAMF_H,
            angle_deg: 45.0,
        },
    ]
}

/// Box stacking-foot sweep, bottom to top before the vertical mirror.
pub fn box_foot_profile() -> Vec<ProfileStep> {
    vec![
        ProfileStep::Tapered {
            height: GR_BOX_TOP_CHAMF,
            angle_deg: 45.0,
        },
        ProfileStep::Straight { height: GR_STR_H },
        ProfileStep::Tapered {
            height: GR_BOX_CHAMF_H,
            angle_deg: 45.0,
        },
    ]
}

/// Drawer spacer part thickness.
pub const GR_SPACER_TH: f64 = 5.0;

// ---------------------------------------------------------------------------
// Rugged box constant block. Wall and channel depth are anchored by the
// reference outer spans (box span = units·42 + 2·wall + 2·channel depth);
// the remainder are calibration parameters.
// ---------------------------------------------------------------------------

/// Rugged box shell wall thickness.
pub const GR_RBOX_WALL: f64 = 2.5;
/// Rugged box corner-block wall depth (outer faces of corner features).
pub const GR_RBOX_CWALL: f64 = 4.0;
/// Rugged box vertical edge fillet radius.
pub const GR_RBOX_RAD: f64 = 1.5;
/// Rugged box corner-block edge fillet radius.
pub const GR_RBOX_CRAD: f64 = 3.0;
/// Depth of the decorative v-groove cuts.
pub const GR_RBOX_VCUT_D: f64 = 1.5;
/// Latch channel width.
pub const GR_RBOX_CHAN_W: f64 = 20.0;
/// Latch channel depth (protrusion beyond the shell wall).
pub const GR_RBOX_CHAN_D: f64 = 7.5;
/// Corner block width.
pub const GR_RBOX_CORNER_W: f64 = 12.0;
/// Front corner block length.
pub const GR_RBOX_FRONT_L: f64 = 26.0;
/// Back corner block length.
pub const GR_RBOX_BACK_L: f64 = 38.0;
/// Rugged box floor thickness.
pub const GR_RBOX_FLOOR: f64 = 4.5;

/// Registration key length.
pub const GR_REG_L: f64 = 15.0;
/// Registration key width.
pub const GR_REG_W: f64 = 3.2;
/// Registration feature height.
pub const GR_REG_H: f64 = 2.5;
/// Top quarter-ring registration outer radius.
pub const GR_REG_R0: f64 = 9.0;
/// Top quarter-ring registration inner radius.
pub const GR_REG_R1: f64 = 6.0;
/// Bottom quarter-ring mate outer radius (clearance inflated).
pub const GR_BREG_R0: f64 = 9.25;
/// Bottom quarter-ring mate inner radius (clearance deflated).
pub const GR_BREG_R1: f64 = 5.75;

/// Clasp rib length.
pub const GR_RIB_L: f64 = 14.0;
/// Clasp rib width.
pub const GR_RIB_W: f64 = 3.0;
/// Clasp rib height.
pub const GR_RIB_H: f64 = 2.5;
/// Vertical spacing between clasp rib ladder rungs.
pub const GR_RIB_CTR: f64 = 9.0;
/// Gap between the two inner ribs of a ladder group.
pub const GR_RIB_SEP: f64 = 5.0;
/// Gap between inner and outer ribs of a ladder group.
pub const GR_RIB_GAP: f64 = 2.0;
/// Latch slide slot length.
pub const GR_CLASP_SLIDE_D: f64 = 14.0;
/// Latch slide slot width.
pub const GR_CLASP_SLIDE_W: f64 = 5.0;

/// Latch body length.
pub const GR_LATCH_L: f64 = 38.0;
/// Latch body width.
pub const GR_LATCH_W: f64 = 14.0;
/// Latch body height.
pub const GR_LATCH_H: f64 = 8.0;
/// Latch interior relief length.
pub const GR_LATCH_IL: f64 = 28.0;
/// Latch interior relief width.
pub const GR_LATCH_IW: f64 = 10.0;

/// Hinge body width along the box back.
pub const GR_HINGE_SZ: f64 = 32.0;
/// Hinge center offset from the box ends.
pub const GR_HINGE_CTR: f64 = 40.0;
/// Hinge mount pocket width (outer leaf).
pub const GR_HINGE_W1: f64 = 12.0;
/// Hinge mount pocket height (outer leaf).
pub const GR_HINGE_H1: f64 = 5.0;
/// Hinge mount pocket width (inner leaf).
pub const GR_HINGE_W2: f64 = 8.0;
/// Hinge mount pocket height (inner leaf).
pub const GR_HINGE_H2: f64 = 14.0;
/// Setback of the inner hinge pocket from the wall face.
pub const GR_HINGE_D: f64 = 2.0;
/// Hinge lug slot width.
pub const GR_HINGE_W3: f64 = 3.0;
/// Separation between hinge lug slots.
pub const GR_HINGE_SEP: f64 = 12.0;
/// Hinge knuckle radius.
pub const GR_HINGE_RAD: f64 = 4.5;
/// Knuckle center offset from the hinge leaf.
pub const GR_HINGE_OFFS: f64 = 5.5;
/// Hinge running clearance.
pub const GR_HINGE_TOL: f64 = 0.4;
/// Vertical skew of the knuckle axis (calibration).
pub const GR_HINGE_SKEW: f64 = 0.6;
/// Hex snap-fit lug height across flats.
pub const GR_HEX_H: f64 = 5.2;
/// Hex snap-fit lug depth.
pub const GR_HEX_D: f64 = 4.0;

/// Front handle bar cross-section size.
pub const GR_HANDLE_SZ: f64 = 25.0;
/// Handle bracket offset from the box ends.
pub const GR_HANDLE_OFS: f64 = 30.0;
/// Handle bracket base length (wide end).
pub const GR_HANDLE_L1: f64 = 22.0;
/// Handle bracket base length (narrow end).
pub const GR_HANDLE_L2: f64 = 30.0;
/// Handle bracket standoff height.
pub const GR_HANDLE_H: f64 = 8.0;
/// Handle bracket width.
pub const GR_HANDLE_W: f64 = 6.0;
/// Separation between paired handle brackets.
pub const GR_HANDLE_SEP: f64 = 14.0;
/// Handle bar thickness.
pub const GR_HANDLE_TH: f64 = 6.0;
/// Handle bar bend radius.
pub const GR_HANDLE_RAD: f64 = 8.0;
/// Lid front handle lip width.
pub const GR_LID_HANDLE_W: f64 = 90.0;
/// Side handle width.
pub const GR_SIDE_HANDLE_W: f64 = 76.0;

/// Front label panel height.
pub const GR_LABEL_H: f64 = 30.0;
/// Label panel insert thickness.
pub const GR_LABEL_TH: f64 = 0.8;
/// Label slot wall thickness.
pub const GR_LABEL_SLOT_TH: f64 = 3.0;
/// Height of the lid window support grid.
pub const GR_LID_WINDOW_H: f64 = 4.0;

/// M2 thread-forming pilot diameter.
pub const M2_DIAM: f64 = 1.9;
/// M2 clearance diameter.
pub const M2_CLR_DIAM: f64 = 2.4;
/// M3 thread-forming pilot diameter.
pub const M3_DIAM: f64 = 2.9;
/// M3 clearance diameter.
pub const M3_CLR_DIAM: f64 = 3.4;
/// M3 counterbore diameter.
pub const M3_CB_DIAM: f64 = 5.5;
/// M3 counterbore depth.
pub const M3_CB_DEPTH: f64 = 2.6;

/// Guard subtracted from fillet/chamfer sizes that would otherwise
/// exactly consume an edge (kernel calibration).
pub const EPS: f64 = 0.01;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_heights_close() {
        let foot: f64 = box_foot_profile().iter().map(|s| s.height()).sum();
        assert!((foot - GR_BASE_HEIGHT).abs() < 1e-9);
        let recess: f64 = baseplate_recess_profile().iter().map(|s| s.height()).sum();
        assert!((recess - GR_BASE_HEIGHT).abs() < 1e-9);
        let lip: f64 = lip_profile().iter().map(|s| s.height()).sum();
        assert!((lip - GR_LIP_H).abs() < 1e-9);
        let rim: f64 = no_lip_profile().iter().map(|s| s.height()).sum();
        assert!((rim - GR_LIP_H).abs() < 1e-9);
    }

    #[test]
    fn floor_sits_on_feet() {
        assert!((GR_FLOOR - 2.45).abs() < 1e-9);
        assert!((GR_BASE_HEIGHT + GR_FLOOR - GR_BOT_H).abs() < 1e-9);
    }
}
