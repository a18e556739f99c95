//! Convex polygon and triangle primitives.
//!
//! A ray hits a polygon when it crosses the supporting plane at a point
//! that lies strictly on the same side of every edge. Points on an edge
//! or a vertex do not count as hits.

use super::{GeometryError, Plane};
use lumen_math::{align_zero, is_zero, Aabb, DVec3, Ray};

/// A planar, convex polygon with consistently ordered vertices.
#[derive(Debug, Clone)]
pub struct Polygon {
    vertices: Vec<DVec3>,
    plane: Plane,
    bbox: Aabb,
}

impl Polygon {
    /// Create a polygon from its vertices in boundary order.
    ///
    /// Fails on fewer than 3 vertices, a repeated vertex, three collinear
    /// consecutive vertices, a vertex off the plane of the first three, or
    /// an outline that is concave or out of order.
    pub fn new(vertices: Vec<DVec3>) -> Result<Self, GeometryError> {
        let size = vertices.len();
        if size < 3 {
            return Err(GeometryError::TooFewVertices(size));
        }

        for (first, a) in vertices.iter().enumerate() {
            for (offset, b) in vertices[first + 1..].iter().enumerate() {
                if is_zero(a.distance(*b)) {
                    return Err(GeometryError::RepeatedVertex {
                        first,
                        second: first + 1 + offset,
                        point: *a,
                    });
                }
            }
        }

        let plane = Plane::from_points(vertices[0], vertices[1], vertices[2]).map_err(|_| {
            GeometryError::Collinear {
                shape: "polygon",
                index: 1,
            }
        })?;
        let n = plane.normal();

        // The turn at vertex 0 fixes the winding; every other turn must agree
        let mut edge1 = vertices[size - 1] - vertices[size - 2];
        let mut edge2 = vertices[0] - vertices[size - 1];
        let turn = edge1.cross(edge2);
        if is_zero(turn.length()) {
            return Err(GeometryError::Collinear {
                shape: "polygon",
                index: size - 1,
            });
        }
        let positive = turn.dot(n) > 0.0;

        for i in 1..size {
            if !is_zero((vertices[i] - vertices[0]).dot(n)) {
                return Err(GeometryError::NonPlanar {
                    index: i,
                    point: vertices[i],
                });
            }

            edge1 = edge2;
            edge2 = vertices[i] - vertices[i - 1];
            let turn = edge1.cross(edge2);
            if is_zero(turn.length()) {
                return Err(GeometryError::Collinear {
                    shape: "polygon",
                    index: i - 1,
                });
            }
            if positive != (turn.dot(n) > 0.0) {
                return Err(GeometryError::NonConvex { index: i - 1 });
            }
        }

        let bbox = Aabb::from_vertices(&vertices).ok_or(GeometryError::TooFewVertices(0))?;

        Ok(Self {
            vertices,
            plane,
            bbox,
        })
    }

    pub fn vertices(&self) -> &[DVec3] {
        &self.vertices
    }

    pub fn plane(&self) -> &Plane {
        &self.plane
    }

    pub fn normal(&self) -> DVec3 {
        self.plane.normal()
    }

    pub fn bounding_box(&self) -> Aabb {
        self.bbox
    }

    /// True if `point` (already on the plane) is strictly inside the outline.
    pub fn surrounds(&self, point: DVec3) -> bool {
        let n = self.plane.normal();
        let size = self.vertices.len();
        let mut side = 0.0;

        for i in 0..size {
            let a = self.vertices[i];
            let b = self.vertices[(i + 1) % size];
            let s = align_zero((b - a).cross(point - a).dot(n));
            // On an edge or a vertex
            if s == 0.0 {
                return false;
            }
            if side == 0.0 {
                side = s.signum();
            } else if side != s.signum() {
                return false;
            }
        }

        true
    }

    pub fn hits(&self, ray: &Ray) -> Vec<f64> {
        match self.plane.hit(ray) {
            Some(t) if self.surrounds(ray.at(t)) => vec![t],
            _ => Vec::new(),
        }
    }
}

/// A three-vertex polygon.
#[derive(Debug, Clone)]
pub struct Triangle(Polygon);

impl Triangle {
    /// Create a triangle; fails on coincident or collinear vertices.
    pub fn new(a: DVec3, b: DVec3, c: DVec3) -> Result<Self, GeometryError> {
        Polygon::new(vec![a, b, c]).map(Self)
    }

    pub fn vertices(&self) -> &[DVec3] {
        self.0.vertices()
    }

    pub fn normal(&self) -> DVec3 {
        self.0.normal()
    }

    pub fn bounding_box(&self) -> Aabb {
        self.0.bounding_box()
    }

    pub fn hits(&self, ray: &Ray) -> Vec<f64> {
        self.0.hits(ray)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_near(a: DVec3, b: DVec3) {
        assert!((a - b).length() < 1e-9, "{a} != {b}");
    }

    fn square() -> Vec<DVec3> {
        vec![
            DVec3::new(0.0, 0.0, 1.0),
            DVec3::new(1.0, 0.0, 0.0),
            DVec3::new(0.0, 1.0, 0.0),
            DVec3::new(-1.0, 1.0, 1.0),
        ]
    }

    #[test]
    fn test_polygon_convex_ok() {
        let polygon = Polygon::new(square()).unwrap();
        let sqrt3 = 3f64.sqrt();
        assert_near(polygon.normal(), DVec3::splat(1.0 / sqrt3));
        assert!((polygon.normal().length() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_polygon_too_few_vertices() {
        let err = Polygon::new(vec![DVec3::ZERO, DVec3::X]).unwrap_err();
        assert_eq!(err, GeometryError::TooFewVertices(2));
    }

    #[test]
    fn test_polygon_wrong_order() {
        let v = square();
        let err = Polygon::new(vec![v[0], v[1], v[3], v[2]]).unwrap_err();
        assert!(matches!(err, GeometryError::NonConvex { .. }));
    }

    #[test]
    fn test_polygon_not_planar() {
        let mut v = square();
        v[3] = DVec3::new(0.0, 0.5, 1.0);
        let err = Polygon::new(v).unwrap_err();
        assert!(matches!(err, GeometryError::NonPlanar { index: 3, .. }));
    }

    #[test]
    fn test_polygon_concave() {
        // Fourth vertex pulled inside the triangle of the first three
        let v = square();
        let inner = v[0] * 0.5 + v[2] * 0.5 + (v[1] - v[0]) * 0.1;
        let err = Polygon::new(vec![v[0], v[1], v[2], inner]).unwrap_err();
        assert!(matches!(err, GeometryError::NonConvex { .. }));
    }

    #[test]
    fn test_polygon_collinear_vertex() {
        let v = square();
        let midpoint = (v[0] + v[1]) * 0.5;
        let err = Polygon::new(vec![v[0], midpoint, v[1], v[2], v[3]]).unwrap_err();
        assert!(matches!(err, GeometryError::Collinear { .. }));
    }

    #[test]
    fn test_polygon_repeated_vertex() {
        let v = square();
        let err = Polygon::new(vec![v[0], v[1], v[2], v[1]]).unwrap_err();
        assert!(matches!(
            err,
            GeometryError::RepeatedVertex {
                first: 1,
                second: 3,
                ..
            }
        ));
    }

    #[test]
    fn test_polygon_hit_inside() {
        let polygon = Polygon::new(vec![
            DVec3::new(-1.0, -1.0, 0.0),
            DVec3::new(1.0, -1.0, 0.0),
            DVec3::new(1.0, 1.0, 0.0),
            DVec3::new(-1.0, 1.0, 0.0),
        ])
        .unwrap();

        let ray = Ray::new(DVec3::new(0.2, 0.3, 2.0), -DVec3::Z).unwrap();
        let hits = polygon.hits(&ray);
        assert_eq!(hits.len(), 1);
        assert_near(ray.at(hits[0]), DVec3::new(0.2, 0.3, 0.0));

        // Same result from below: winding does not matter for the test
        let below = Ray::new(DVec3::new(0.2, 0.3, -2.0), DVec3::Z).unwrap();
        assert_eq!(polygon.hits(&below).len(), 1);
    }

    #[test]
    fn test_polygon_edges_and_vertices_are_misses() {
        let polygon = Polygon::new(vec![
            DVec3::new(-1.0, -1.0, 0.0),
            DVec3::new(1.0, -1.0, 0.0),
            DVec3::new(1.0, 1.0, 0.0),
            DVec3::new(-1.0, 1.0, 0.0),
        ])
        .unwrap();

        // Outside, against an edge
        let outside = Ray::new(DVec3::new(2.0, 0.0, 1.0), -DVec3::Z).unwrap();
        assert!(polygon.hits(&outside).is_empty());

        // On an edge
        let edge = Ray::new(DVec3::new(1.0, 0.0, 1.0), -DVec3::Z).unwrap();
        assert!(polygon.hits(&edge).is_empty());

        // On a vertex
        let vertex = Ray::new(DVec3::new(1.0, 1.0, 1.0), -DVec3::Z).unwrap();
        assert!(polygon.hits(&vertex).is_empty());

        // On the continuation of an edge
        let continuation = Ray::new(DVec3::new(2.0, 1.0, 1.0), -DVec3::Z).unwrap();
        assert!(polygon.hits(&continuation).is_empty());
    }

    #[test]
    fn test_triangle_hit_and_reverse_miss() {
        let triangle = Triangle::new(
            DVec3::new(3.0, 0.0, 0.0),
            DVec3::new(0.0, 3.0, 0.0),
            DVec3::new(0.0, 0.0, 3.0),
        )
        .unwrap();

        let ray = Ray::new(DVec3::ZERO, DVec3::ONE).unwrap();
        let hits = triangle.hits(&ray);
        assert_eq!(hits.len(), 1);
        assert_near(ray.at(hits[0]), DVec3::ONE);

        let reverse = Ray::new(DVec3::ZERO, -DVec3::ONE).unwrap();
        assert!(triangle.hits(&reverse).is_empty());
    }

    #[test]
    fn test_triangle_rejects_collinear() {
        let err = Triangle::new(DVec3::ZERO, DVec3::X, DVec3::X * 2.0).unwrap_err();
        assert!(matches!(err, GeometryError::Collinear { .. }));
    }

    #[test]
    fn test_triangle_bounding_box() {
        let triangle = Triangle::new(
            DVec3::new(3.0, 0.0, 0.0),
            DVec3::new(0.0, 3.0, 0.0),
            DVec3::new(0.0, 0.0, 3.0),
        )
        .unwrap();
        let bbox = triangle.bounding_box();
        assert_eq!(bbox.min(), DVec3::ZERO);
        assert_eq!(bbox.max(), DVec3::splat(3.0));
    }
}
