#![warn(missing_docs)]

//! Intermediate representation for the gridfin generator ecosystem.
//!
//! This crate defines the DAG-based IR that describes every solid a
//! generator asks the geometry kernel to build: 2D sketch profiles,
//! extrusions (plain, tapered, and multi-segment profile sweeps), lofts,
//! booleans, shells, and fillet/chamfer requests over composable edge
//! selectors.
//!
//! The IR is purely declarative — no mesh or B-rep data, just a graph of
//! operations. Evaluation is handled separately by a kernel backend; the
//! generators only decide WHAT to request and with which dimensions.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Unique identifier for a node in the IR graph.
pub type NodeId = u64;

/// 2D point/vector with f64 components (conventionally millimeters).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    /// X component.
    pub x: f64,
    /// Y component.
    pub y: f64,
}

impl Vec2 {
    /// Create a new Vec2.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// 3D vector with f64 components (conventionally millimeters).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    /// X component.
    pub x: f64,
    /// Y component.
    pub y: f64,
    /// Z component.
    pub z: f64,
}

impl Vec3 {
    /// Create a new Vec3.
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

/// Sketch plane for a profile, fixing the extrusion direction.
///
/// Sketch coordinates map to world coordinates as in conventional CAD
/// workplanes: `Xy` extrudes along +Z, `Yz` along +X, and `Xz` along -Y.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Plane {
    /// Sketch (u, v) → world (x, y); extrusion along +Z.
    Xy,
    /// Sketch (u, v) → world (x, z); extrusion along -Y.
    Xz,
    /// Sketch (u, v) → world (y, z); extrusion along +X.
    Yz,
}

/// A fillet applied to a single vertex of a polygon profile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VertexFillet {
    /// Index into the polygon's point list.
    pub vertex: usize,
    /// Fillet radius.
    pub radius: f64,
}

/// A closed planar sketch profile, centered on the sketch origin unless
/// the variant says otherwise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Profile {
    /// Rectangle with rounded corners.
    RoundedRect {
        /// Extent along the sketch u axis.
        length: f64,
        /// Extent along the sketch v axis.
        width: f64,
        /// Corner radius.
        radius: f64,
    },
    /// Plain rectangle.
    Rect {
        /// Extent along the sketch u axis.
        length: f64,
        /// Extent along the sketch v axis.
        width: f64,
    },
    /// Circle.
    Circle {
        /// Radius.
        radius: f64,
    },
    /// Obround slot (two semicircular ends joined by straights).
    Slot {
        /// Center-to-center length plus the end diameters.
        length: f64,
        /// Slot width (end diameter).
        width: f64,
        /// Rotation of the slot axis in degrees.
        angle_deg: f64,
    },
    /// Arbitrary closed polygon, vertices in order, with optional
    /// per-vertex fillets.
    Polygon {
        /// Vertex list; the profile closes back to the first point.
        points: Vec<Vec2>,
        /// Vertex fillets applied after assembly.
        fillets: Vec<VertexFillet>,
    },
}

/// One segment of a multi-segment extrusion: a sweep silhouette stacked
/// bottom to top from a single planar cross-section.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ProfileStep {
    /// Straight extrusion of the current cross-section.
    Straight {
        /// Vertical extent of the segment.
        height: f64,
    },
    /// Tapered extrusion. Positive angles taper inward (the section
    /// shrinks going up); negative angles flare outward.
    Tapered {
        /// Vertical extent of the segment.
        height: f64,
        /// Taper angle in degrees from vertical.
        angle_deg: f64,
    },
}

impl ProfileStep {
    /// Vertical extent of this segment.
    pub fn height(&self) -> f64 {
        match self {
            ProfileStep::Straight { height } => *height,
            ProfileStep::Tapered { height, .. } => *height,
        }
    }

    /// Taper angle in degrees (0 for straight segments).
    pub fn angle_deg(&self) -> f64 {
        match self {
            ProfileStep::Straight { .. } => 0.0,
            ProfileStep::Tapered { angle_deg, .. } => *angle_deg,
        }
    }
}

/// Scalar predicate used by edge selectors (coordinate membership,
/// length and radius filters).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ScalarFilter {
    /// Matches any value.
    Any,
    /// Matches values within `tolerance` of any listed value.
    Equals {
        /// Accepted values.
        values: Vec<f64>,
        /// Comparison tolerance.
        tolerance: f64,
    },
    /// Matches values strictly greater than the bound.
    Greater {
        /// Exclusive lower bound.
        bound: f64,
    },
    /// Matches values strictly less than the bound.
    Less {
        /// Exclusive upper bound.
        bound: f64,
    },
}

impl ScalarFilter {
    /// Membership filter with the default 0.1 mm tolerance.
    pub fn equals(values: impl IntoIterator<Item = f64>) -> Self {
        ScalarFilter::Equals {
            values: values.into_iter().collect(),
            tolerance: 0.1,
        }
    }

    /// Membership filter with an explicit tolerance.
    pub fn equals_tol(values: impl IntoIterator<Item = f64>, tolerance: f64) -> Self {
        ScalarFilter::Equals {
            values: values.into_iter().collect(),
            tolerance,
        }
    }
}

/// Composable edge-selection predicate.
///
/// Selectors are request data: the kernel resolves them against the
/// evaluated solid. They compose with `&` (intersection), `|` (union)
/// and `-` (subtraction), mirroring the selector algebra the generators
/// rely on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum EdgeQuery {
    /// Every edge of the solid.
    All,
    /// Vertical (Z-aligned) edges.
    Vertical,
    /// Edges whose length satisfies the filter.
    Length(ScalarFilter),
    /// Edges all of whose points satisfy the filter in X.
    AtX(ScalarFilter),
    /// Edges all of whose points satisfy the filter in Y.
    AtY(ScalarFilter),
    /// Edges all of whose points satisfy the filter in Z.
    AtZ(ScalarFilter),
    /// Circular edges whose radius satisfies the filter.
    Radius(ScalarFilter),
    /// Flat (horizontal) edges lying at the given height.
    FlatAtZ {
        /// Height of the plane containing the edges.
        z: f64,
    },
    /// Edges belonging to the face selected by the query.
    OnFace(FaceQuery),
    /// Both sub-queries match.
    And {
        /// Left sub-query.
        left: Box<EdgeQuery>,
        /// Right sub-query.
        right: Box<EdgeQuery>,
    },
    /// Either sub-query matches.
    Or {
        /// Left sub-query.
        left: Box<EdgeQuery>,
        /// Right sub-query.
        right: Box<EdgeQuery>,
    },
    /// The left query matches and the right does not.
    Minus {
        /// Query supplying the candidate edges.
        left: Box<EdgeQuery>,
        /// Query removing edges from the candidates.
        right: Box<EdgeQuery>,
    },
}

impl EdgeQuery {
    /// Vertical edges at least `min_len` long.
    pub fn vertical_longer_than(min_len: f64) -> Self {
        EdgeQuery::Vertical & EdgeQuery::Length(ScalarFilter::Greater { bound: min_len })
    }

    /// Vertical edges whose length matches any of the given values.
    pub fn vertical_of_length(values: impl IntoIterator<Item = f64>) -> Self {
        EdgeQuery::Vertical & EdgeQuery::Length(ScalarFilter::equals(values))
    }
}

impl std::ops::BitAnd for EdgeQuery {
    type Output = EdgeQuery;
    fn bitand(self, rhs: EdgeQuery) -> EdgeQuery {
        EdgeQuery::And {
            left: Box::new(self),
            right: Box::new(rhs),
        }
    }
}

impl std::ops::BitOr for EdgeQuery {
    type Output = EdgeQuery;
    fn bitor(self, rhs: EdgeQuery) -> EdgeQuery {
        EdgeQuery::Or {
            left: Box::new(self),
            right: Box::new(rhs),
        }
    }
}

impl std::ops::Sub for EdgeQuery {
    type Output = EdgeQuery;
    fn sub(self, rhs: EdgeQuery) -> EdgeQuery {
        EdgeQuery::Minus {
            left: Box::new(self),
            right: Box::new(rhs),
        }
    }
}

/// Face-selection predicate, by outward normal direction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum FaceQuery {
    /// Face(s) furthest along +Z.
    PosZ,
    /// Face(s) furthest along -Z.
    NegZ,
    /// Face(s) furthest along +X.
    PosX,
    /// Face(s) furthest along -X.
    NegX,
    /// Face(s) furthest along +Y.
    PosY,
    /// Face(s) furthest along -Y.
    NegY,
    /// Either sub-query matches.
    Or {
        /// Left sub-query.
        left: Box<FaceQuery>,
        /// Right sub-query.
        right: Box<FaceQuery>,
    },
}

impl std::ops::BitOr for FaceQuery {
    type Output = FaceQuery;
    fn bitor(self, rhs: FaceQuery) -> FaceQuery {
        FaceQuery::Or {
            left: Box::new(self),
            right: Box::new(rhs),
        }
    }
}

/// A section of a loft: a profile placed at an offset along the sweep
/// direction of the loft's plane.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoftSection {
    /// Cross-section profile at this station.
    pub profile: Profile,
    /// Offset along the extrusion direction from the loft's base plane.
    pub offset: f64,
}

/// Solid-modeling operation — the building block of the IR DAG.
///
/// Each variant is either a leaf (a swept profile) or an operation over
/// child nodes referenced by [`NodeId`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SolidOp {
    /// Empty geometry (identity for union).
    Empty,
    /// Extrude a profile along the plane normal, with optional taper.
    /// `height` is always the vertical extent of the result; positive
    /// taper angles shrink the cross-section as the extrusion advances.
    Extrude {
        /// Cross-section.
        profile: Profile,
        /// Sketch plane (fixes the extrusion direction).
        plane: Plane,
        /// Extent along the extrusion direction.
        height: f64,
        /// Taper angle in degrees from the extrusion direction.
        taper_deg: f64,
    },
    /// Sweep a profile through an ordered stack of straight/tapered
    /// segments, one solid from a single planar cross-section.
    ExtrudeSteps {
        /// Cross-section at the base of the stack.
        profile: Profile,
        /// Sketch plane.
        plane: Plane,
        /// Ordered segments, base first.
        steps: Vec<ProfileStep>,
    },
    /// Loft between profiles placed at increasing offsets.
    Loft {
        /// Sketch plane of the base section.
        plane: Plane,
        /// Sections in sweep order; at least two.
        sections: Vec<LoftSection>,
        /// Use straight (ruled) interpolation between sections.
        ruled: bool,
    },
    /// Boolean union of two solids.
    Union {
        /// Left operand.
        left: NodeId,
        /// Right operand.
        right: NodeId,
    },
    /// Boolean difference (left minus right).
    Difference {
        /// Left operand (base).
        left: NodeId,
        /// Right operand (subtracted).
        right: NodeId,
    },
    /// Boolean intersection of two solids.
    Intersection {
        /// Left operand.
        left: NodeId,
        /// Right operand.
        right: NodeId,
    },
    /// Translation by an offset vector.
    Translate {
        /// Child node.
        child: NodeId,
        /// Translation offset.
        offset: Vec3,
    },
    /// Rotation by Euler angles in degrees (applied as X, then Y, then Z).
    Rotate {
        /// Child node.
        child: NodeId,
        /// Rotation angles in degrees.
        angles_deg: Vec3,
    },
    /// Non-uniform scale (negative factors mirror).
    Scale {
        /// Child node.
        child: NodeId,
        /// Scale factors per axis.
        factor: Vec3,
    },
    /// Fillet the selected edges.
    Fillet {
        /// Child node.
        child: NodeId,
        /// Edge selection.
        edges: EdgeQuery,
        /// Fillet radius.
        radius: f64,
        /// When true the kernel must leave the solid unchanged if the
        /// selector matches no edges; when false an empty selection is
        /// a fatal geometric error.
        safe: bool,
    },
    /// Chamfer the selected edges.
    Chamfer {
        /// Child node.
        child: NodeId,
        /// Edge selection.
        edges: EdgeQuery,
        /// Chamfer distance.
        distance: f64,
    },
    /// Hollow the solid, removing the selected faces; negative
    /// thickness shells inward.
    Shell {
        /// Child node.
        child: NodeId,
        /// Faces opened by the shell.
        faces: FaceQuery,
        /// Wall offset; negative values offset inward.
        thickness: f64,
    },
    /// Drill a counterbored hole pattern into the selected face,
    /// advancing into the solid along the face normal.
    CounterboreHoles {
        /// Child node.
        child: NodeId,
        /// Face the pattern is drilled from.
        face: FaceQuery,
        /// Hole centers in the face's local plane.
        points: Vec<Vec2>,
        /// Through-hole diameter.
        hole_diameter: f64,
        /// Counterbore diameter.
        cbore_diameter: f64,
        /// Counterbore depth.
        cbore_depth: f64,
        /// Total hole depth.
        depth: f64,
    },
}

/// A node in the IR graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Unique identifier.
    pub id: NodeId,
    /// Optional human-readable name.
    pub name: Option<String>,
    /// The operation this node represents.
    pub op: SolidOp,
}

/// An entry in the document scene — a root node with a part label and an
/// optional display color.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartEntry {
    /// Root node of this part.
    pub root: NodeId,
    /// Part label (used for assembly naming and export filenames).
    pub label: String,
    /// Display color as RGBA in 0.0..1.0, if assigned.
    pub color: Option<[f64; 4]>,
}

/// A gridfin document — the full request handed to a kernel backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Format version string.
    pub version: String,
    /// All nodes in the graph, keyed by [`NodeId`].
    pub nodes: HashMap<NodeId, Node>,
    /// Part roots in assembly order.
    pub roots: Vec<PartEntry>,
}

impl Default for Document {
    fn default() -> Self {
        Self {
            version: "0.3".to_string(),
            nodes: HashMap::new(),
            roots: Vec::new(),
        }
    }
}

impl Document {
    /// Create a new empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Serialize to JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize from JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip_document() {
        let mut doc = Document::new();

        doc.nodes.insert(
            1,
            Node {
                id: 1,
                name: Some("slab".to_string()),
                op: SolidOp::Extrude {
                    profile: Profile::RoundedRect {
                        length: 168.0,
                        width: 126.0,
                        radius: 4.0,
                    },
                    plane: Plane::Xy,
                    height: 4.75,
                    taper_deg: 0.0,
                },
            },
        );
        doc.nodes.insert(
            2,
            Node {
                id: 2,
                name: Some("recess".to_string()),
                op: SolidOp::ExtrudeSteps {
                    profile: Profile::RoundedRect {
                        length: 42.71,
                        width: 42.71,
                        radius: 4.0,
                    },
                    plane: Plane::Xy,
                    steps: vec![
                        ProfileStep::Tapered {
                            height: 2.15,
                            angle_deg: 45.0,
                        },
                        ProfileStep::Straight { height: 1.8 },
                    ],
                },
            },
        );
        doc.nodes.insert(
            3,
            Node {
                id: 3,
                name: Some("plate".to_string()),
                op: SolidOp::Difference { left: 1, right: 2 },
            },
        );
        doc.roots.push(PartEntry {
            root: 3,
            label: "plate".to_string(),
            color: Some([0.25, 0.25, 0.25, 1.0]),
        });

        let json = doc.to_json().expect("serialize");
        let restored = Document::from_json(&json).expect("deserialize");
        assert_eq!(doc, restored);
        assert_eq!(restored.nodes.len(), 3);
        assert_eq!(restored.roots.len(), 1);
    }

    #[test]
    fn node_graph_dag() {
        let mut doc = Document::new();
        doc.nodes.insert(
            1,
            Node {
                id: 1,
                name: None,
                op: SolidOp::Extrude {
                    profile: Profile::Circle { radius: 5.0 },
                    plane: Plane::Xy,
                    height: 10.0,
                    taper_deg: 0.0,
                },
            },
        );
        doc.nodes.insert(
            2,
            Node {
                id: 2,
                name: None,
                op: SolidOp::Extrude {
                    profile: Profile::Rect {
                        length: 8.0,
                        width: 8.0,
                    },
                    plane: Plane::Xy,
                    height: 8.0,
                    taper_deg: 0.0,
                },
            },
        );
        doc.nodes.insert(
            3,
            Node {
                id: 3,
                name: Some("pin".to_string()),
                op: SolidOp::Intersection { left: 1, right: 2 },
            },
        );

        match &doc.nodes[&3].op {
            SolidOp::Intersection { left, right } => {
                assert_eq!(*left, 1);
                assert_eq!(*right, 2);
            }
            _ => panic!("expected Intersection"),
        }
    }

    #[test]
    fn serde_tagged_enum() {
        let op = SolidOp::Extrude {
            profile: Profile::Rect {
                length: 1.0,
                width: 2.0,
            },
            plane: Plane::Xy,
            height: 3.0,
            taper_deg: 0.0,
        };
        let json = serde_json::to_string(&op).unwrap();
        assert!(json.contains(r#""type":"Extrude""#));
        assert!(json.contains(r#""type":"Rect""#));

        let restored: SolidOp = serde_json::from_str(&json).unwrap();
        assert_eq!(op, restored);
    }

    #[test]
    fn selector_composition() {
        // (z ∈ {2.45}) + vertical(>5) - (z < 2.45): the box interior
        // fillet selection shape.
        let q = (EdgeQuery::AtZ(ScalarFilter::equals([2.45]))
            | EdgeQuery::vertical_longer_than(5.0))
            - EdgeQuery::AtZ(ScalarFilter::Less { bound: 2.45 });
        match &q {
            EdgeQuery::Minus { left, right } => {
                assert!(matches!(**left, EdgeQuery::Or { .. }));
                assert!(matches!(**right, EdgeQuery::AtZ(ScalarFilter::Less { .. })));
            }
            _ => panic!("expected Minus at the top"),
        }
        let json = serde_json::to_string(&q).unwrap();
        let restored: EdgeQuery = serde_json::from_str(&json).unwrap();
        assert_eq!(q, restored);
    }

    #[test]
    fn combinators_serialize_tagged() {
        // Every combinator and bound filter must survive the tagged
        // representation; these carry the generators' whole selector
        // vocabulary.
        let q = (EdgeQuery::Vertical & EdgeQuery::Length(ScalarFilter::Greater { bound: 5.0 }))
            | (EdgeQuery::All - EdgeQuery::Radius(ScalarFilter::Less { bound: 2.0 }));
        let json = serde_json::to_string(&q).unwrap();
        assert!(json.contains(r#""type":"Or""#));
        assert!(json.contains(r#""type":"And""#));
        assert!(json.contains(r#""type":"Minus""#));
        assert!(json.contains(r#""type":"Greater""#));
        let restored: EdgeQuery = serde_json::from_str(&json).unwrap();
        assert_eq!(q, restored);

        let f = FaceQuery::PosZ | FaceQuery::NegZ;
        let json = serde_json::to_string(&f).unwrap();
        assert!(json.contains(r#""type":"Or""#));
        let restored: FaceQuery = serde_json::from_str(&json).unwrap();
        assert_eq!(f, restored);
    }

    #[test]
    fn profile_step_accessors() {
        let s = ProfileStep::Straight { height: 1.8 };
        let t = ProfileStep::Tapered {
            height: 0.7,
            angle_deg: -45.0,
        };
        assert_eq!(s.height(), 1.8);
        assert_eq!(s.angle_deg(), 0.0);
        assert_eq!(t.height(), 0.7);
        assert_eq!(t.angle_deg(), -45.0);
    }
}
