//! Solid builder: a named handle over an IR subtree.
//!
//! A [`Solid`] records the declarative construction history of one part
//! (profiles, sweeps, booleans, finishing requests) and tracks an
//! analytic axis-aligned bounding box alongside it, so generators can
//! reason about sizes and placement without evaluating any geometry.

use gridfin_ir::{
    Document, EdgeQuery, FaceQuery, LoftSection, Node, NodeId, PartEntry, Plane, Profile,
    ProfileStep, SolidOp, Vec2, Vec3,
};
use nalgebra::{Rotation3, Vector3};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

/// Global atomic counter for unique IR node IDs.
static NEXT_NODE_ID: AtomicU64 = AtomicU64::new(1);

fn alloc_node_id() -> NodeId {
    NEXT_NODE_ID.fetch_add(1, Ordering::Relaxed)
}

/// Axis-aligned bounding box, tracked analytically per solid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum corner.
    pub min: [f64; 3],
    /// Maximum corner.
    pub max: [f64; 3],
}

impl Aabb {
    /// Box from explicit corners.
    pub fn new(min: [f64; 3], max: [f64; 3]) -> Self {
        Self { min, max }
    }

    /// Degenerate box at the origin.
    pub fn zero() -> Self {
        Self::new([0.0; 3], [0.0; 3])
    }

    /// Extents per axis.
    pub fn size(&self) -> [f64; 3] {
        [
            self.max[0] - self.min[0],
            self.max[1] - self.min[1],
            self.max[2] - self.min[2],
        ]
    }

    /// Center point.
    pub fn center(&self) -> [f64; 3] {
        [
            (self.min[0] + self.max[0]) / 2.0,
            (self.min[1] + self.max[1]) / 2.0,
            (self.min[2] + self.max[2]) / 2.0,
        ]
    }

    /// Smallest box containing both operands.
    pub fn union(&self, other: &Aabb) -> Aabb {
        Aabb::new(
            [
                self.min[0].min(other.min[0]),
                self.min[1].min(other.min[1]),
                self.min[2].min(other.min[2]),
            ],
            [
                self.max[0].max(other.max[0]),
                self.max[1].max(other.max[1]),
                self.max[2].max(other.max[2]),
            ],
        )
    }

    /// Overlap of both operands (degenerate when disjoint).
    pub fn intersect(&self, other: &Aabb) -> Aabb {
        Aabb::new(
            [
                self.min[0].max(other.min[0]),
                self.min[1].max(other.min[1]),
                self.min[2].max(other.min[2]),
            ],
            [
                self.max[0].min(other.max[0]),
                self.max[1].min(other.max[1]),
                self.max[2].min(other.max[2]),
            ],
        )
    }

    /// Box shifted by an offset.
    pub fn translated(&self, x: f64, y: f64, z: f64) -> Aabb {
        Aabb::new(
            [self.min[0] + x, self.min[1] + y, self.min[2] + z],
            [self.max[0] + x, self.max[1] + y, self.max[2] + z],
        )
    }

    /// Box scaled per axis about the origin; negative factors mirror.
    pub fn scaled(&self, x: f64, y: f64, z: f64) -> Aabb {
        let a = [self.min[0] * x, self.min[1] * y, self.min[2] * z];
        let b = [self.max[0] * x, self.max[1] * y, self.max[2] * z];
        Aabb::new(
            [a[0].min(b[0]), a[1].min(b[1]), a[2].min(b[2])],
            [a[0].max(b[0]), a[1].max(b[1]), a[2].max(b[2])],
        )
    }

    /// Bounding box of the rotated box (Euler X, then Y, then Z, degrees).
    pub fn rotated(&self, x_deg: f64, y_deg: f64, z_deg: f64) -> Aabb {
        let rot = Rotation3::from_euler_angles(
            x_deg.to_radians(),
            y_deg.to_radians(),
            z_deg.to_radians(),
        );
        let mut min = [f64::INFINITY; 3];
        let mut max = [f64::NEG_INFINITY; 3];
        for corner in 0..8 {
            let p = Vector3::new(
                if corner & 1 == 0 { self.min[0] } else { self.max[0] },
                if corner & 2 == 0 { self.min[1] } else { self.max[1] },
                if corner & 4 == 0 { self.min[2] } else { self.max[2] },
            );
            let q = rot * p;
            for axis in 0..3 {
                min[axis] = min[axis].min(q[axis]);
                max[axis] = max[axis].max(q[axis]);
            }
        }
        Aabb::new(min, max)
    }
}

/// Half extents of a profile in its sketch plane.
fn profile_half_extents(profile: &Profile) -> (f64, f64) {
    match profile {
        Profile::RoundedRect { length, width, .. } | Profile::Rect { length, width } => {
            (length / 2.0, width / 2.0)
        }
        Profile::Circle { radius } => (*radius, *radius),
        Profile::Slot {
            length,
            width,
            angle_deg,
        } => {
            let (s, c) = (angle_deg.to_radians().sin().abs(), angle_deg.to_radians().cos().abs());
            (
                length / 2.0 * c + width / 2.0 * s,
                length / 2.0 * s + width / 2.0 * c,
            )
        }
        Profile::Polygon { points, .. } => {
            let mut hu = 0.0f64;
            let mut hv = 0.0f64;
            for p in points {
                hu = hu.max(p.x.abs());
                hv = hv.max(p.y.abs());
            }
            (hu, hv)
        }
    }
}

/// Bounding box of a profile extruded `height` along its plane normal,
/// widened by `expand` on every side of the sketch plane.
fn extrusion_bounds(profile: &Profile, plane: Plane, height: f64, expand: f64) -> Aabb {
    let (hu, hv) = profile_half_extents(profile);
    let (hu, hv) = (hu + expand, hv + expand);
    match plane {
        Plane::Xy => Aabb::new([-hu, -hv, 0.0], [hu, hv, height]),
        Plane::Xz => Aabb::new([-hu, -height, -hv], [hu, 0.0, hv]),
        Plane::Yz => Aabb::new([0.0, -hu, -hv], [height, hu, hv]),
    }
}

/// A named solid under construction.
///
/// Solids combine with the `+`, `-` and `&` operators (union, cut,
/// intersection), move with [`Solid::translate`] and friends, and turn
/// into a kernel request with [`Solid::to_document`]. Cloning a solid is
/// cheap relative to geometry evaluation and shares nothing mutable.
#[derive(Debug, Clone)]
pub struct Solid {
    /// Part name, used for document labels.
    pub name: String,
    node: NodeId,
    nodes: HashMap<NodeId, Node>,
    bounds: Aabb,
}

impl Solid {
    fn make_leaf(name: &str, op: SolidOp, bounds: Aabb) -> Self {
        let id = alloc_node_id();
        let mut nodes = HashMap::new();
        nodes.insert(
            id,
            Node {
                id,
                name: Some(name.to_string()),
                op,
            },
        );
        Self {
            name: name.to_string(),
            node: id,
            nodes,
            bounds,
        }
    }

    fn make_unary(&self, op: impl FnOnce(NodeId) -> SolidOp, bounds: Aabb) -> Self {
        let id = alloc_node_id();
        let mut nodes = self.nodes.clone();
        nodes.insert(
            id,
            Node {
                id,
                name: None,
                op: op(self.node),
            },
        );
        Self {
            name: self.name.clone(),
            node: id,
            nodes,
            bounds,
        }
    }

    fn make_binary(
        &self,
        other: &Solid,
        op: impl FnOnce(NodeId, NodeId) -> SolidOp,
        bounds: Aabb,
    ) -> Self {
        let id = alloc_node_id();
        let mut nodes = self.nodes.clone();
        nodes.extend(other.nodes.iter().map(|(k, v)| (*k, v.clone())));
        nodes.insert(
            id,
            Node {
                id,
                name: None,
                op: op(self.node, other.node),
            },
        );
        Self {
            name: self.name.clone(),
            node: id,
            nodes,
            bounds,
        }
    }

    // =========================================================================
    // Constructors
    // =========================================================================

    /// Empty solid (identity for union).
    pub fn empty(name: impl Into<String>) -> Self {
        Self::make_leaf(&name.into(), SolidOp::Empty, Aabb::zero())
    }

    /// Straight extrusion of a profile along the plane normal.
    pub fn extrude(name: impl Into<String>, profile: Profile, plane: Plane, height: f64) -> Self {
        let bounds = extrusion_bounds(&profile, plane, height, 0.0);
        Self::make_leaf(
            &name.into(),
            SolidOp::Extrude {
                profile,
                plane,
                height,
                taper_deg: 0.0,
            },
            bounds,
        )
    }

    /// Tapered extrusion; positive angles shrink the section going up.
    pub fn extrude_tapered(
        name: impl Into<String>,
        profile: Profile,
        plane: Plane,
        height: f64,
        taper_deg: f64,
    ) -> Self {
        let expand = if taper_deg < 0.0 {
            height * taper_deg.to_radians().tan().abs()
        } else {
            0.0
        };
        let bounds = extrusion_bounds(&profile, plane, height, expand);
        Self::make_leaf(
            &name.into(),
            SolidOp::Extrude {
                profile,
                plane,
                height,
                taper_deg,
            },
            bounds,
        )
    }

    /// Multi-segment sweep of a profile (straight and tapered stages
    /// stacked base to top).
    pub fn extrude_steps(
        name: impl Into<String>,
        profile: Profile,
        plane: Plane,
        steps: Vec<ProfileStep>,
    ) -> Self {
        // Walk the stack: positive taper pulls the section inward, so
        // only a net outward excursion widens the footprint.
        let mut offset = 0.0f64;
        let mut expand = 0.0f64;
        let mut height = 0.0f64;
        for step in &steps {
            offset -= step.height() * step.angle_deg().to_radians().tan();
            expand = expand.max(offset);
            height += step.height();
        }
        let bounds = extrusion_bounds(&profile, plane, height, expand);
        Self::make_leaf(
            &name.into(),
            SolidOp::ExtrudeSteps {
                profile,
                plane,
                steps,
            },
            bounds,
        )
    }

    /// Loft through profile sections at increasing offsets along the
    /// plane normal.
    pub fn loft(
        name: impl Into<String>,
        plane: Plane,
        sections: Vec<LoftSection>,
        ruled: bool,
    ) -> Self {
        let mut bounds: Option<Aabb> = None;
        for section in &sections {
            let b = extrusion_bounds(&section.profile, plane, 0.0, 0.0)
                .translated(
                    if plane == Plane::Yz { section.offset } else { 0.0 },
                    if plane == Plane::Xz { -section.offset } else { 0.0 },
                    if plane == Plane::Xy { section.offset } else { 0.0 },
                );
            bounds = Some(match bounds {
                Some(acc) => acc.union(&b),
                None => b,
            });
        }
        let bounds = bounds.unwrap_or_else(Aabb::zero);
        Self::make_leaf(&name.into(), SolidOp::Loft { plane, sections, ruled }, bounds)
    }

    /// Axis-aligned rectangular prism with its base on z = 0, centered
    /// in x and y.
    pub fn block(name: impl Into<String>, length: f64, width: f64, height: f64) -> Self {
        Self::extrude(name, Profile::Rect { length, width }, Plane::Xy, height)
    }

    /// Upright cylinder with its base on z = 0, centered in x and y.
    pub fn cylinder(name: impl Into<String>, radius: f64, height: f64) -> Self {
        Self::extrude(name, Profile::Circle { radius }, Plane::Xy, height)
    }

    // =========================================================================
    // Booleans
    // =========================================================================

    /// Boolean union.
    pub fn union(&self, other: &Solid) -> Self {
        let bounds = self.bounds.union(&other.bounds);
        self.make_binary(other, |l, r| SolidOp::Union { left: l, right: r }, bounds)
    }

    /// Boolean difference. The cutters used by the generators are
    /// interior to the base, so the base bounds carry over.
    pub fn cut(&self, other: &Solid) -> Self {
        let bounds = self.bounds;
        self.make_binary(
            other,
            |l, r| SolidOp::Difference { left: l, right: r },
            bounds,
        )
    }

    /// Boolean intersection.
    pub fn intersect(&self, other: &Solid) -> Self {
        let bounds = self.bounds.intersect(&other.bounds);
        self.make_binary(
            other,
            |l, r| SolidOp::Intersection { left: l, right: r },
            bounds,
        )
    }

    // =========================================================================
    // Transforms
    // =========================================================================

    /// Translate by an offset.
    pub fn translate(&self, x: f64, y: f64, z: f64) -> Self {
        self.make_unary(
            |child| SolidOp::Translate {
                child,
                offset: Vec3::new(x, y, z),
            },
            self.bounds.translated(x, y, z),
        )
    }

    /// Rotate by Euler angles in degrees (X, then Y, then Z).
    pub fn rotate(&self, x_deg: f64, y_deg: f64, z_deg: f64) -> Self {
        self.make_unary(
            |child| SolidOp::Rotate {
                child,
                angles_deg: Vec3::new(x_deg, y_deg, z_deg),
            },
            self.bounds.rotated(x_deg, y_deg, z_deg),
        )
    }

    /// Rotate about the X axis.
    pub fn rotate_x(&self, deg: f64) -> Self {
        self.rotate(deg, 0.0, 0.0)
    }

    /// Rotate about the Y axis.
    pub fn rotate_y(&self, deg: f64) -> Self {
        self.rotate(0.0, deg, 0.0)
    }

    /// Rotate about the Z axis.
    pub fn rotate_z(&self, deg: f64) -> Self {
        self.rotate(0.0, 0.0, deg)
    }

    /// Mirror across the YZ plane.
    pub fn mirror_x(&self) -> Self {
        self.scaled(-1.0, 1.0, 1.0)
    }

    /// Mirror across the XZ plane.
    pub fn mirror_y(&self) -> Self {
        self.scaled(1.0, -1.0, 1.0)
    }

    /// Mirror across the XY plane.
    pub fn mirror_z(&self) -> Self {
        self.scaled(1.0, 1.0, -1.0)
    }

    /// Non-uniform scale about the origin; negative factors mirror.
    pub fn scaled(&self, x: f64, y: f64, z: f64) -> Self {
        self.make_unary(
            |child| SolidOp::Scale {
                child,
                factor: Vec3::new(x, y, z),
            },
            self.bounds.scaled(x, y, z),
        )
    }

    /// Translate so the bounding box is centered on the origin in x and
    /// y; z is left alone.
    pub fn recentred(&self) -> Self {
        let c = self.bounds.center();
        self.translate(-c[0], -c[1], 0.0)
    }

    /// Union of copies of this solid translated to each (x, y) point, in
    /// the order given.
    pub fn replicated_at(&self, points: &[(f64, f64)]) -> Self {
        let mut acc: Option<Solid> = None;
        for &(x, y) in points {
            let copy = self.translate(x, y, 0.0);
            acc = Some(match acc {
                Some(a) => a.union(&copy),
                None => copy,
            });
        }
        acc.unwrap_or_else(|| Solid::empty(&self.name))
    }

    // =========================================================================
    // Finishing requests
    // =========================================================================

    /// Fillet the selected edges. A selector matching no edges is a
    /// fatal kernel error.
    pub fn fillet(&self, edges: EdgeQuery, radius: f64) -> Self {
        self.make_unary(
            |child| SolidOp::Fillet {
                child,
                edges,
                radius,
                safe: false,
            },
            self.bounds,
        )
    }

    /// Fillet that degrades to a no-op when the selector matches no
    /// edges.
    pub fn fillet_safe(&self, edges: EdgeQuery, radius: f64) -> Self {
        self.make_unary(
            |child| SolidOp::Fillet {
                child,
                edges,
                radius,
                safe: true,
            },
            self.bounds,
        )
    }

    /// Chamfer the selected edges.
    pub fn chamfer(&self, edges: EdgeQuery, distance: f64) -> Self {
        self.make_unary(
            |child| SolidOp::Chamfer {
                child,
                edges,
                distance,
            },
            self.bounds,
        )
    }

    /// Hollow the solid, removing the selected faces; negative
    /// thickness shells inward.
    pub fn shell(&self, faces: FaceQuery, thickness: f64) -> Self {
        self.make_unary(
            |child| SolidOp::Shell {
                child,
                faces,
                thickness,
            },
            self.bounds,
        )
    }

    /// Drill a counterbored hole pattern from the selected face.
    pub fn counterbore_holes(
        &self,
        face: FaceQuery,
        points: Vec<Vec2>,
        hole_diameter: f64,
        cbore_diameter: f64,
        cbore_depth: f64,
        depth: f64,
    ) -> Self {
        self.make_unary(
            |child| SolidOp::CounterboreHoles {
                child,
                face,
                points,
                hole_diameter,
                cbore_diameter,
                cbore_depth,
                depth,
            },
            self.bounds,
        )
    }

    // =========================================================================
    // Queries and output
    // =========================================================================

    /// Replace the part name.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Analytic bounding box as `(min, max)` corners.
    pub fn bounding_box(&self) -> ([f64; 3], [f64; 3]) {
        (self.bounds.min, self.bounds.max)
    }

    /// Bounding box extents `(x, y, z)`.
    pub fn size(&self) -> (f64, f64, f64) {
        let s = self.bounds.size();
        (s[0], s[1], s[2])
    }

    /// The tracked bounding box.
    pub fn bounds(&self) -> Aabb {
        self.bounds
    }

    /// Single-part document for this solid.
    pub fn to_document(&self) -> Document {
        let mut doc = Document::new();
        self.add_to_document(&mut doc, None);
        doc
    }

    /// Append this solid as a root of an assembly document.
    pub fn add_to_document(&self, doc: &mut Document, color: Option<[f64; 4]>) {
        doc.nodes
            .extend(self.nodes.iter().map(|(k, v)| (*k, v.clone())));
        doc.roots.push(PartEntry {
            root: self.node,
            label: self.name.clone(),
            color,
        });
    }
}

impl std::ops::Add<&Solid> for &Solid {
    type Output = Solid;
    fn add(self, rhs: &Solid) -> Solid {
        self.union(rhs)
    }
}

impl std::ops::Add<Solid> for Solid {
    type Output = Solid;
    fn add(self, rhs: Solid) -> Solid {
        self.union(&rhs)
    }
}

impl std::ops::Sub<&Solid> for &Solid {
    type Output = Solid;
    fn sub(self, rhs: &Solid) -> Solid {
        self.cut(rhs)
    }
}

impl std::ops::Sub<Solid> for Solid {
    type Output = Solid;
    fn sub(self, rhs: Solid) -> Solid {
        self.cut(&rhs)
    }
}

impl std::ops::BitAnd<&Solid> for &Solid {
    type Output = Solid;
    fn bitand(self, rhs: &Solid) -> Solid {
        self.intersect(rhs)
    }
}

impl std::ops::BitAnd<Solid> for Solid {
    type Output = Solid;
    fn bitand(self, rhs: Solid) -> Solid {
        self.intersect(&rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn extrude_bounds_per_plane() {
        let p = Profile::Rect {
            length: 10.0,
            width: 4.0,
        };
        let xy = Solid::extrude("xy", p.clone(), Plane::Xy, 3.0);
        assert_eq!(xy.bounding_box(), ([-5.0, -2.0, 0.0], [5.0, 2.0, 3.0]));
        let xz = Solid::extrude("xz", p.clone(), Plane::Xz, 3.0);
        assert_eq!(xz.bounding_box(), ([-5.0, -3.0, -2.0], [5.0, 0.0, 2.0]));
        let yz = Solid::extrude("yz", p, Plane::Yz, 3.0);
        assert_eq!(yz.bounding_box(), ([0.0, -5.0, -2.0], [3.0, 5.0, 2.0]));
    }

    #[test]
    fn taper_walk_tracks_outward_flare() {
        // Inward, then outward past the base section.
        let s = Solid::extrude_steps(
            "flare",
            Profile::Rect {
                length: 10.0,
                width: 10.0,
            },
            Plane::Xy,
            vec![
                ProfileStep::Tapered {
                    height: 1.0,
                    angle_deg: 45.0,
                },
                ProfileStep::Tapered {
                    height: 3.0,
                    angle_deg: -45.0,
                },
            ],
        );
        let (min, max) = s.bounding_box();
        // Net excursion: -1 then +3 → widest section is 2 beyond base.
        assert_relative_eq!(max[0], 7.0, epsilon = 1e-9);
        assert_relative_eq!(min[1], -7.0, epsilon = 1e-9);
        assert_relative_eq!(max[2], 4.0, epsilon = 1e-9);
    }

    #[test]
    fn boolean_bounds_semantics() {
        let a = Solid::block("a", 10.0, 10.0, 10.0);
        let b = Solid::block("b", 4.0, 4.0, 20.0).translate(3.0, 0.0, 0.0);
        let (_, umax) = a.union(&b).bounding_box();
        assert_eq!(umax, [5.0, 5.0, 20.0]);
        let (cmin, cmax) = a.cut(&b).bounding_box();
        assert_eq!((cmin, cmax), a.bounding_box());
        let (imin, imax) = a.intersect(&b).bounding_box();
        assert_eq!(imin, [1.0, -2.0, 0.0]);
        assert_eq!(imax, [5.0, 2.0, 10.0]);
    }

    #[test]
    fn rotation_bounds_eight_corners() {
        let s = Solid::block("s", 10.0, 4.0, 2.0).rotate_z(90.0);
        let (min, max) = s.bounding_box();
        assert_relative_eq!(min[0], -2.0, epsilon = 1e-9);
        assert_relative_eq!(max[0], 2.0, epsilon = 1e-9);
        assert_relative_eq!(min[1], -5.0, epsilon = 1e-9);
        assert_relative_eq!(max[1], 5.0, epsilon = 1e-9);
        assert_relative_eq!(max[2], 2.0, epsilon = 1e-9);
    }

    #[test]
    fn replication_preserves_order() {
        let cell = Solid::block("cell", 1.0, 1.0, 1.0);
        let grid = cell.replicated_at(&[(0.0, 0.0), (42.0, 0.0), (0.0, 42.0), (42.0, 42.0)]);
        let doc = grid.to_document();
        // Row-major: first translate listed is the (0,0) copy; unions
        // chain left to right, so the root's right child is the last
        // placement.
        let root = doc.roots[0].root;
        let SolidOp::Union { right, .. } = &doc.nodes[&root].op else {
            panic!("expected union at root");
        };
        let SolidOp::Translate { offset, .. } = &doc.nodes[right].op else {
            panic!("expected translate");
        };
        assert_eq!((offset.x, offset.y), (42.0, 42.0));
        let (min, max) = grid.bounding_box();
        assert_eq!(min, [-0.5, -0.5, 0.0]);
        assert_eq!(max, [42.5, 42.5, 1.0]);
    }

    #[test]
    fn recentre_centers_xy_only() {
        let s = Solid::block("s", 10.0, 6.0, 2.0).translate(20.0, -7.0, 3.0);
        let r = s.recentred();
        let (min, max) = r.bounding_box();
        assert_relative_eq!(min[0] + max[0], 0.0, epsilon = 1e-9);
        assert_relative_eq!(min[1] + max[1], 0.0, epsilon = 1e-9);
        assert_relative_eq!(min[2], 3.0, epsilon = 1e-9);
    }

    #[test]
    fn document_merges_shared_subtrees() {
        let base = Solid::cylinder("pin", 2.0, 5.0);
        let twice = base.translate(-5.0, 0.0, 0.0).union(&base.translate(5.0, 0.0, 0.0));
        let doc = twice.to_document();
        // Leaf is shared: 1 leaf + 2 translates + 1 union.
        assert_eq!(doc.nodes.len(), 4);
        assert_eq!(doc.roots.len(), 1);
    }
}
