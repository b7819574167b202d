//! Single bezier curve, the payload of shape properties.

use crate::error::Result;
use crate::fields::{FieldReader, FieldSpec, FieldWriter, LottieObject};
use crate::vector::{Vec2, VectorOps};

/// Poly-bezier made of vertices with in/out tangents relative to each vertex.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Bezier {
    pub closed: bool,
    pub in_tangents: Vec<Vec2>,
    pub out_tangents: Vec<Vec2>,
    pub vertices: Vec<Vec2>,
}

const CLOSED: FieldSpec = FieldSpec::scalar("closed", "c");
const IN_TANGENTS: FieldSpec = FieldSpec::scalar("in_tangents", "i");
const OUT_TANGENTS: FieldSpec = FieldSpec::scalar("out_tangents", "o");
const VERTICES: FieldSpec = FieldSpec::scalar("vertices", "v");

impl Bezier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Insert a vertex at `index` with tangents relative to `pos`.
    ///
    /// Panics if `index > self.len()`, like [`Vec::insert`].
    pub fn insert_point(
        &mut self,
        index: usize,
        pos: Vec2,
        in_tangent: Vec2,
        out_tangent: Vec2,
    ) -> &mut Self {
        self.vertices.insert(index, pos);
        self.in_tangents.insert(index, in_tangent);
        self.out_tangents.insert(index, out_tangent);
        self
    }

    pub fn add_point(&mut self, pos: Vec2, in_tangent: Vec2, out_tangent: Vec2) -> &mut Self {
        let end = self.len();
        self.insert_point(end, pos, in_tangent, out_tangent)
    }

    /// Append a vertex with mirrored tangents.
    pub fn add_smooth_point(&mut self, pos: Vec2, in_tangent: Vec2) -> &mut Self {
        let mut out_tangent = in_tangent;
        out_tangent.flip();
        self.add_point(pos, in_tangent, out_tangent)
    }

    pub fn close(&mut self, closed: bool) -> &mut Self {
        self.closed = closed;
        self
    }

    /// Reverse the direction of the curve. In and out tangents swap roles.
    pub fn reverse(&mut self) -> &mut Self {
        self.vertices.reverse();
        self.in_tangents.reverse();
        self.out_tangents.reverse();
        std::mem::swap(&mut self.in_tangents, &mut self.out_tangents);
        self
    }

    /// Tangent lists hold one entry per vertex.
    pub fn is_consistent(&self) -> bool {
        self.in_tangents.len() == self.vertices.len()
            && self.out_tangents.len() == self.vertices.len()
    }

    /// Point at `t` in `[0, 1]`, splitting `t` evenly across segments.
    /// `None` when the curve has fewer than two vertices or its tangent
    /// lists do not match the vertices (decoded data may omit `"i"`/`"o"`).
    pub fn point_at(&self, t: f32) -> Option<Vec2> {
        if self.vertices.len() < 2 || !self.is_consistent() {
            return None;
        }
        let (index, local_t) = self.segment_at(t);
        let v1 = self.vertices[index];
        let v2 = self.vertices[index + 1];
        let mut c1 = self.out_tangents[index];
        c1.add(&v1);
        let mut c2 = self.in_tangents[index + 1];
        c2.add(&v2);

        // de Casteljau
        let mut points = vec![v1, c1, c2, v2];
        while points.len() > 1 {
            points = points
                .windows(2)
                .map(|pair| pair[0].lerp(&pair[1], local_t))
                .collect();
        }
        points.pop()
    }

    /// Blend every vertex and tangent towards `other`.
    /// `None` unless both curves are consistent and have the same vertex count.
    pub fn lerp(&self, other: &Bezier, factor: f32) -> Option<Bezier> {
        if self.len() != other.len() || !self.is_consistent() || !other.is_consistent() {
            return None;
        }
        let blend = |from: &[Vec2], to: &[Vec2]| -> Vec<Vec2> {
            from.iter().zip(to).map(|(a, b)| a.lerp(b, factor)).collect()
        };
        Some(Bezier {
            closed: self.closed,
            in_tangents: blend(&self.in_tangents, &other.in_tangents),
            out_tangents: blend(&self.out_tangents, &other.out_tangents),
            vertices: blend(&self.vertices, &other.vertices),
        })
    }

    fn segment_at(&self, t: f32) -> (usize, f32) {
        let segments = self.vertices.len() - 1;
        if t <= 0.0 {
            return (0, 0.0);
        }
        if t >= 1.0 {
            return (segments - 1, 1.0);
        }
        let scaled = t * segments as f32;
        let index = (scaled.floor() as usize).min(segments - 1);
        (index, scaled - index as f32)
    }
}

impl LottieObject for Bezier {
    const NAME: &'static str = "Bezier";
    const FIELDS: &'static [FieldSpec] = &[CLOSED, IN_TANGENTS, OUT_TANGENTS, VERTICES];

    fn write_fields(&self, out: &mut FieldWriter) {
        out.put(&CLOSED, &self.closed)
            .put(&IN_TANGENTS, &self.in_tangents)
            .put(&OUT_TANGENTS, &self.out_tangents)
            .put(&VERTICES, &self.vertices);
    }

    fn read_fields(&mut self, input: &FieldReader<'_>) -> Result<()> {
        input.read(&CLOSED, &mut self.closed)?;
        input.read(&IN_TANGENTS, &mut self.in_tangents)?;
        input.read(&OUT_TANGENTS, &mut self.out_tangents)?;
        input.read(&VERTICES, &mut self.vertices)
    }
}

crate::lottie_object!(Bezier);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{FromLottie, ToLottie};
    use approx::assert_abs_diff_eq;
    use serde_json::json;

    fn square() -> Bezier {
        let mut b = Bezier::new();
        let zero = Vec2::zeros();
        b.add_point(Vec2::new([0.0, 0.0]), zero, zero)
            .add_point(Vec2::new([10.0, 0.0]), zero, zero)
            .add_point(Vec2::new([10.0, 10.0]), zero, zero)
            .close(true);
        b
    }

    #[test]
    fn encodes_points_as_nested_arrays() {
        let wire = square().to_lottie();
        assert_eq!(
            wire,
            json!({
                "c": true,
                "i": [[0.0, 0.0], [0.0, 0.0], [0.0, 0.0]],
                "o": [[0.0, 0.0], [0.0, 0.0], [0.0, 0.0]],
                "v": [[0.0, 0.0], [10.0, 0.0], [10.0, 10.0]]
            })
        );
        assert_eq!(Bezier::from_lottie(&wire).unwrap(), square());
    }

    #[test]
    fn smooth_point_mirrors_tangent() {
        let mut b = Bezier::new();
        b.add_smooth_point(Vec2::new([1.0, 1.0]), Vec2::new([2.0, -1.0]));
        assert_eq!(b.out_tangents[0], Vec2::new([-2.0, 1.0]));
    }

    #[test]
    fn point_at_follows_straight_segments() {
        let b = square();
        let start = b.point_at(0.0).unwrap();
        assert_eq!(start, Vec2::new([0.0, 0.0]));
        let mid_first = b.point_at(0.25).unwrap();
        assert_abs_diff_eq!(mid_first.x(), 5.0, epsilon = 1e-5);
        assert_abs_diff_eq!(mid_first.y(), 0.0, epsilon = 1e-5);
        let end = b.point_at(1.0).unwrap();
        assert_abs_diff_eq!(end.y(), 10.0, epsilon = 1e-5);
        assert!(Bezier::new().point_at(0.5).is_none());
    }

    #[test]
    fn point_at_rejects_missing_tangents() {
        let decoded = Bezier::from_lottie(&json!({"c": false, "v": [[0.0, 0.0], [10.0, 0.0]]}))
            .unwrap();
        assert_eq!(decoded.len(), 2);
        assert!(!decoded.is_consistent());
        assert!(decoded.point_at(0.5).is_none());

        let short = Bezier::from_lottie(&json!({
            "i": [[0.0, 0.0], [0.0, 0.0]],
            "o": [[0.0, 0.0]],
            "v": [[0.0, 0.0], [10.0, 0.0]]
        }))
        .unwrap();
        assert!(short.point_at(1.0).is_none());
        assert!(square().is_consistent());
    }

    #[test]
    fn lerp_blends_matching_curves() {
        let mut target = square();
        for v in target.vertices.iter_mut() {
            v.multiply(2.0);
        }
        let half = square().lerp(&target, 0.5).unwrap();
        assert_eq!(half.vertices[2], Vec2::new([15.0, 15.0]));
        assert!(half.closed);

        let mut shorter = square();
        shorter.vertices.pop();
        shorter.in_tangents.pop();
        shorter.out_tangents.pop();
        assert!(square().lerp(&shorter, 0.5).is_none());
    }

    #[test]
    fn reverse_swaps_tangents() {
        let mut b = Bezier::new();
        b.add_point(
            Vec2::new([0.0, 0.0]),
            Vec2::new([-1.0, 0.0]),
            Vec2::new([1.0, 0.0]),
        )
        .add_point(
            Vec2::new([5.0, 0.0]),
            Vec2::new([-2.0, 0.0]),
            Vec2::new([2.0, 0.0]),
        );
        b.reverse();
        assert_eq!(b.vertices[0], Vec2::new([5.0, 0.0]));
        assert_eq!(b.in_tangents[0], Vec2::new([2.0, 0.0]));
        assert_eq!(b.out_tangents[0], Vec2::new([-2.0, 0.0]));
    }
}
