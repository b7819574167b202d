//! Numeric vectors used as the payload of multi-dimensional properties
//! (positions, scales, colours).
//!
//! Components are `f32`, matching the precision the wire format carries.
//! Fixed-size vectors ([`Vector<N>`]) encode their size in the type, so
//! combining two of them can never mismatch. [`NVector`] is sized at run time
//! and reports mismatches as [`LottieError::DimensionMismatch`].
//!
//! Every mutator works in place and returns `&mut Self` so calls chain:
//! `v.multiply(2.0).flip()`.

use std::ops::{Index, IndexMut};

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{LottieError, Result};

/// Operations shared by every vector type.
pub trait VectorOps {
    fn components(&self) -> &[f32];
    fn components_mut(&mut self) -> &mut [f32];

    /// Number of components.
    #[inline]
    fn len(&self) -> usize {
        self.components().len()
    }

    #[inline]
    fn is_empty(&self) -> bool {
        self.components().is_empty()
    }

    /// Sum of the squares of all components.
    fn length_squared(&self) -> f32 {
        self.components().iter().map(|c| c * c).sum()
    }

    /// Euclidean norm.
    fn length(&self) -> f32 {
        self.length_squared().sqrt()
    }

    /// Divide every component by [`length`](Self::length).
    ///
    /// A zero-length vector ends up with non-finite components; callers that
    /// can hold zero vectors must check first.
    fn normalize(&mut self) -> &mut Self {
        let len = self.length();
        if len == 0.0 {
            log::debug!("normalizing a zero-length vector");
        }
        for c in self.components_mut() {
            *c /= len;
        }
        self
    }

    /// Negate every component.
    fn flip(&mut self) -> &mut Self {
        for c in self.components_mut() {
            *c = -*c;
        }
        self
    }

    fn multiply(&mut self, scalar: f32) -> &mut Self {
        for c in self.components_mut() {
            *c *= scalar;
        }
        self
    }

    fn divide(&mut self, scalar: f32) -> &mut Self {
        for c in self.components_mut() {
            *c /= scalar;
        }
        self
    }
}

fn add_into(dst: &mut [f32], src: &[f32]) {
    for (d, s) in dst.iter_mut().zip(src) {
        *d += s;
    }
}

fn subtract_into(dst: &mut [f32], src: &[f32]) {
    for (d, s) in dst.iter_mut().zip(src) {
        *d -= s;
    }
}

fn dot_of(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

fn lerp_into(dst: &mut [f32], other: &[f32], factor: f32) {
    for (d, o) in dst.iter_mut().zip(other) {
        *d = *d * (1.0 - factor) + o * factor;
    }
}

// ---------- fixed size ----------

/// Fixed-size numeric vector.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Vector<const N: usize>([f32; N]);

/// 2D point or size
pub type Vec2 = Vector<2>;
/// 3D point (x, y, z)
pub type Vec3 = Vector<3>;
/// Four components; also exposes `r`, `g`, `b`, `a` for colours
pub type Vec4 = Vector<4>;
/// RGBA colour in `[0, 1]`
pub type Color = Vector<4>;

impl<const N: usize> Vector<N> {
    /// Declared component count.
    pub const SIZE: usize = N;

    pub const fn new(components: [f32; N]) -> Self {
        Self(components)
    }

    /// Zero-filled vector of the declared size.
    pub const fn zeros() -> Self {
        Self([0.0; N])
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    pub fn to_array(self) -> [f32; N] {
        self.0
    }

    pub fn add(&mut self, other: &Self) -> &mut Self {
        add_into(&mut self.0, &other.0);
        self
    }

    pub fn subtract(&mut self, other: &Self) -> &mut Self {
        subtract_into(&mut self.0, &other.0);
        self
    }

    pub fn dot(&self, other: &Self) -> f32 {
        dot_of(&self.0, &other.0)
    }

    /// `self * (1 - factor) + other * factor`, as a new vector.
    /// Factors outside `[0, 1]` extrapolate.
    pub fn lerp(&self, other: &Self, factor: f32) -> Self {
        let mut out = *self;
        lerp_into(&mut out.0, &other.0, factor);
        out
    }
}

impl<const N: usize> Default for Vector<N> {
    fn default() -> Self {
        Self::zeros()
    }
}

impl<const N: usize> VectorOps for Vector<N> {
    #[inline]
    fn components(&self) -> &[f32] {
        &self.0
    }

    #[inline]
    fn components_mut(&mut self) -> &mut [f32] {
        &mut self.0
    }
}

impl<const N: usize> From<[f32; N]> for Vector<N> {
    fn from(components: [f32; N]) -> Self {
        Self(components)
    }
}

impl<const N: usize> TryFrom<NVector> for Vector<N> {
    type Error = LottieError;

    fn try_from(v: NVector) -> Result<Self> {
        let found = v.len();
        <[f32; N]>::try_from(v.components)
            .map(Self)
            .map_err(|_| LottieError::DimensionMismatch { expected: N, found })
    }
}

impl<const N: usize> Index<usize> for Vector<N> {
    type Output = f32;

    fn index(&self, index: usize) -> &f32 {
        &self.0[index]
    }
}

impl<const N: usize> IndexMut<usize> for Vector<N> {
    fn index_mut(&mut self, index: usize) -> &mut f32 {
        &mut self.0[index]
    }
}

impl<const N: usize> Serialize for Vector<N> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_seq(self.0.iter())
    }
}

impl<'de, const N: usize> Deserialize<'de> for Vector<N> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let components = Vec::<f32>::deserialize(deserializer)?;
        let found = components.len();
        <[f32; N]>::try_from(components).map(Self).map_err(|_| {
            let expected = format!("{N} components");
            D::Error::invalid_length(found, &expected.as_str())
        })
    }
}

/// Named read/write views onto fixed indices.
macro_rules! named_components {
    ($n:literal => $($get:ident, $set:ident, $get_mut:ident = $idx:literal);+ $(;)?) => {
        impl Vector<$n> {
            $(
                #[inline]
                pub fn $get(&self) -> f32 {
                    self.0[$idx]
                }

                #[inline]
                pub fn $set(&mut self, value: f32) {
                    self.0[$idx] = value;
                }

                #[inline]
                pub fn $get_mut(&mut self) -> &mut f32 {
                    &mut self.0[$idx]
                }
            )+
        }
    };
}

named_components!(2 =>
    x, set_x, x_mut = 0;
    y, set_y, y_mut = 1;
);
named_components!(3 =>
    x, set_x, x_mut = 0;
    y, set_y, y_mut = 1;
    z, set_z, z_mut = 2;
);
named_components!(4 =>
    x, set_x, x_mut = 0;
    y, set_y, y_mut = 1;
    z, set_z, z_mut = 2;
    w, set_w, w_mut = 3;
);
named_components!(4 =>
    r, set_r, r_mut = 0;
    g, set_g, g_mut = 1;
    b, set_b, b_mut = 2;
    a, set_a, a_mut = 3;
);

// ---------- variable size ----------

/// Variable-length numeric vector, sized at construction.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NVector {
    components: Vec<f32>,
}

impl NVector {
    pub fn new(components: Vec<f32>) -> Self {
        Self { components }
    }

    pub fn from_slice(components: &[f32]) -> Self {
        Self::new(components.to_vec())
    }

    pub fn zeros(len: usize) -> Self {
        Self::new(vec![0.0; len])
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.components
    }

    pub fn into_vec(self) -> Vec<f32> {
        self.components
    }

    fn check_len(&self, other: &Self) -> Result<()> {
        if self.components.len() == other.components.len() {
            Ok(())
        } else {
            Err(LottieError::DimensionMismatch {
                expected: self.components.len(),
                found: other.components.len(),
            })
        }
    }

    pub fn add(&mut self, other: &Self) -> Result<&mut Self> {
        self.check_len(other)?;
        add_into(&mut self.components, &other.components);
        Ok(self)
    }

    pub fn subtract(&mut self, other: &Self) -> Result<&mut Self> {
        self.check_len(other)?;
        subtract_into(&mut self.components, &other.components);
        Ok(self)
    }

    pub fn dot(&self, other: &Self) -> Result<f32> {
        self.check_len(other)?;
        Ok(dot_of(&self.components, &other.components))
    }

    /// `self * (1 - factor) + other * factor`, as a new vector.
    pub fn lerp(&self, other: &Self, factor: f32) -> Result<Self> {
        self.check_len(other)?;
        let mut out = self.clone();
        lerp_into(&mut out.components, &other.components, factor);
        Ok(out)
    }
}

impl VectorOps for NVector {
    #[inline]
    fn components(&self) -> &[f32] {
        &self.components
    }

    #[inline]
    fn components_mut(&mut self) -> &mut [f32] {
        &mut self.components
    }
}

impl From<Vec<f32>> for NVector {
    fn from(components: Vec<f32>) -> Self {
        Self::new(components)
    }
}

impl<const N: usize> From<Vector<N>> for NVector {
    fn from(v: Vector<N>) -> Self {
        Self::new(v.0.to_vec())
    }
}

impl<const N: usize> From<[f32; N]> for NVector {
    fn from(components: [f32; N]) -> Self {
        Self::new(components.to_vec())
    }
}

impl FromIterator<f32> for NVector {
    fn from_iter<I: IntoIterator<Item = f32>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl Index<usize> for NVector {
    type Output = f32;

    fn index(&self, index: usize) -> &f32 {
        &self.components[index]
    }
}

impl IndexMut<usize> for NVector {
    fn index_mut(&mut self, index: usize) -> &mut f32 {
        &mut self.components[index]
    }
}
