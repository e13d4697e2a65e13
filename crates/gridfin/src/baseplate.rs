//! Baseplate generator.
//!
//! A baseplate is a filleted-corner slab with one tapered recess per
//! grid cell cut into its top face, so stacking feet drop in and
//! register. Options add extra depth below the recess section and
//! countersunk corner mounting screws.

use crate::constants::*;
use crate::dims::GridDims;
use crate::solid::Solid;
use crate::{GfError, Result};
use gridfin_ir::{EdgeQuery, Plane, Profile, ProfileStep, ScalarFilter};

/// Countersink pilot hole diameter for corner screws.
const CSK_HOLE: f64 = 5.0;
/// Countersink top diameter for corner screws.
const CSK_DIAM: f64 = 10.0;
/// Countersink included angle in degrees.
const CSK_ANGLE: f64 = 82.0;
/// Corner screw tab square size.
const CORNER_TAB: f64 = GRU2;
/// Boss-to-slab transition fillet radius.
const TAB_FILLET: f64 = 2.0;

/// Baseplate options.
#[derive(Debug, Clone, PartialEq)]
pub struct BaseplateParams {
    /// Length in grid units.
    pub length_u: usize,
    /// Width in grid units.
    pub width_u: usize,
    /// Extra solid depth added below the recess section.
    pub ext_depth: f64,
    /// Cut the recesses with straight walls below the top chamfer
    /// (prints without bridging when combined with `ext_depth`).
    pub straight_bottom: bool,
    /// Add countersunk mounting screw tabs in the four corners.
    pub corner_screws: bool,
}

impl Default for BaseplateParams {
    fn default() -> Self {
        Self {
            length_u: 1,
            width_u: 1,
            ext_depth: 0.0,
            straight_bottom: false,
            corner_screws: false,
        }
    }
}

/// Gridfinity baseplate generator.
#[derive(Debug, Clone)]
pub struct GridfinityBaseplate {
    params: BaseplateParams,
    dims: GridDims,
}

impl GridfinityBaseplate {
    /// Validate options and build a generator.
    pub fn new(params: BaseplateParams) -> Result<Self> {
        if params.length_u == 0 {
            return Err(GfError::UnitCount {
                axis: 'x',
                value: params.length_u,
            });
        }
        if params.width_u == 0 {
            return Err(GfError::UnitCount {
                axis: 'y',
                value: params.width_u,
            });
        }
        let dims = GridDims::new(params.length_u, params.width_u, 0);
        Ok(Self { params, dims })
    }

    /// Plain baseplate of the given unit counts.
    pub fn sized(length_u: usize, width_u: usize) -> Result<Self> {
        Self::new(BaseplateParams {
            length_u,
            width_u,
            ..BaseplateParams::default()
        })
    }

    /// The generator's options.
    pub fn params(&self) -> &BaseplateParams {
        &self.params
    }

    /// Overall plate depth including any extension.
    pub fn depth(&self) -> f64 {
        GR_BASE_HEIGHT + self.params.ext_depth
    }

    /// One cell recess cutter, widest face up at z = `depth()`, centred
    /// on the corner grid cell.
    fn cell_recess(&self) -> Solid {
        let profile = Profile::RoundedRect {
            length: GRU_CUT,
            width: GRU_CUT,
            radius: GR_RAD,
        };
        let steps = if self.params.straight_bottom {
            vec![
                ProfileStep::Tapered {
                    height: GR_BASE_TOP_CHAMF,
                    angle_deg: 45.0,
                },
                ProfileStep::Straight {
                    height: GR_STR_H + GR_BASE_CHAMF_H + self.params.ext_depth,
                },
            ]
        } else {
            baseplate_recess_profile()
        };
        Solid::extrude_steps("cell_recess", profile, Plane::Xy, steps)
            .rotate_x(180.0)
            .translate(GRU2, GRU2, self.depth())
    }

    /// Corner screw tabs plus their countersunk holes, applied to the
    /// recessed plate.
    fn add_corner_screws(&self, plate: Solid) -> Solid {
        let length = self.dims.pitch_length();
        let width = self.dims.pitch_width();
        let inset = CORNER_TAB / 2.0;
        let corners = [
            (inset, inset),
            (length - inset, inset),
            (inset, width - inset),
            (length - inset, width - inset),
        ];

        let tab = Solid::block("corner_tab", CORNER_TAB, CORNER_TAB, GR_BASE_HEIGHT)
            .translate(0.0, 0.0, self.params.ext_depth);
        let tabs = tab.replicated_at(&corners);
        let plate = plate + tabs;

        // Fillet the boss-to-slab transitions: the tab edges all sit
        // above the extension section, while the perimeter edges reach
        // z = 0; exclude the tab edges flush with the outer faces.
        let boss_edges = (EdgeQuery::Vertical
            & EdgeQuery::AtZ(ScalarFilter::Greater {
                bound: self.params.ext_depth - EPS,
            }))
            - (EdgeQuery::AtX(ScalarFilter::equals([0.0, length]))
                | EdgeQuery::AtY(ScalarFilter::equals([0.0, width])));
        let plate = plate.fillet_safe(boss_edges, TAB_FILLET);

        // Countersunk through-holes, cone seated in the top face.
        let half_angle = (CSK_ANGLE / 2.0).to_radians();
        let cone_h = (CSK_DIAM - CSK_HOLE) / 2.0 / half_angle.tan();
        let bore = Solid::cylinder("csk_bore", CSK_HOLE / 2.0, self.depth());
        let cone = Solid::extrude_tapered(
            "csk_cone",
            Profile::Circle {
                radius: CSK_DIAM / 2.0,
            },
            Plane::Xy,
            cone_h,
            CSK_ANGLE / 2.0,
        )
        .rotate_x(180.0)
        .translate(0.0, 0.0, self.depth());
        let cutter = (bore + cone).replicated_at(&corners);
        plate - cutter
    }

    /// Build the baseplate solid, centred in x and y with its underside
    /// on z = 0.
    pub fn render(&self) -> Solid {
        let length = self.dims.pitch_length();
        let width = self.dims.pitch_width();
        let slab = Solid::extrude(
            self.filename(),
            Profile::RoundedRect {
                length,
                width,
                radius: GR_RAD,
            },
            Plane::Xy,
            self.depth(),
        )
        .translate(length / 2.0, width / 2.0, 0.0);

        let cutter = self.cell_recess().replicated_at(&self.dims.grid_centres());
        let mut plate = slab - cutter;
        if self.params.corner_screws {
            plate = self.add_corner_screws(plate);
        }
        plate.recentred()
    }

    /// Descriptive part filename stem.
    pub fn filename(&self) -> String {
        let mut name = format!("gf_baseplate_{}x{}", self.params.length_u, self.params.width_u);
        if self.params.ext_depth > 0.0 {
            name.push_str(&format!("x{:.1}", self.params.ext_depth));
        }
        if self.params.corner_screws {
            name.push_str("_screwtabs");
        }
        name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn basic_baseplate() {
        let bp = GridfinityBaseplate::sized(4, 3).unwrap();
        assert_eq!(bp.filename(), "gf_baseplate_4x3");
        let r = bp.render();
        let (x, y, z) = r.size();
        assert_relative_eq!(x, 168.0);
        assert_relative_eq!(y, 126.0);
        assert_relative_eq!(z, 4.75);
        // Centred in x/y, underside on z = 0.
        let (min, max) = r.bounding_box();
        assert_relative_eq!(min[0] + max[0], 0.0, epsilon = 1e-9);
        assert_relative_eq!(min[2], 0.0);
    }

    #[test]
    fn extended_baseplate_with_screws() {
        let bp = GridfinityBaseplate::new(BaseplateParams {
            length_u: 5,
            width_u: 4,
            ext_depth: 5.0,
            corner_screws: true,
            ..BaseplateParams::default()
        })
        .unwrap();
        assert_eq!(bp.filename(), "gf_baseplate_5x4x5.0_screwtabs");
        let r = bp.render();
        let (x, y, z) = r.size();
        assert_relative_eq!(x, 210.0);
        assert_relative_eq!(y, 168.0);
        assert_relative_eq!(z, 9.75);
    }

    #[test]
    fn straight_bottom_recess_spans_full_depth() {
        let bp = GridfinityBaseplate::new(BaseplateParams {
            length_u: 1,
            width_u: 1,
            ext_depth: 3.0,
            straight_bottom: true,
            ..BaseplateParams::default()
        })
        .unwrap();
        let recess = bp.cell_recess();
        let (min, max) = recess.bounding_box();
        assert_relative_eq!(max[2], bp.depth(), epsilon = 1e-9);
        assert_relative_eq!(min[2], 0.0, epsilon = 1e-9);
    }

    #[test]
    fn rejects_zero_units() {
        assert!(matches!(
            GridfinityBaseplate::sized(0, 3),
            Err(GfError::UnitCount { axis: 'x', .. })
        ));
        assert!(matches!(
            GridfinityBaseplate::sized(3, 0),
            Err(GfError::UnitCount { axis: 'y', .. })
        ));
    }
}
