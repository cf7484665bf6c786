//! Affine geometry passed across the renderer boundary.
//!
//! `Matrix` uses SVG order: `x' = a*x + c*y + e`, `y' = b*x + d*y + f`.

use resvg::tiny_skia;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrix {
    pub a: f32,
    pub b: f32,
    pub c: f32,
    pub d: f32,
    pub e: f32,
    pub f: f32,
}

impl Default for Matrix {
    fn default() -> Self {
        Self::identity()
    }
}

impl Matrix {
    pub fn new(a: f32, b: f32, c: f32, d: f32, e: f32, f: f32) -> Self {
        Self { a, b, c, d, e, f }
    }

    pub fn identity() -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, 0.0, 0.0)
    }

    pub fn translated(tx: f32, ty: f32) -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, tx, ty)
    }

    pub fn scaled(sx: f32, sy: f32) -> Self {
        Self::new(sx, 0.0, 0.0, sy, 0.0, 0.0)
    }

    /// Rotation by `angle` degrees around the origin.
    pub fn rotated(angle: f32) -> Self {
        let (sin, cos) = angle.to_radians().sin_cos();
        Self::new(cos, sin, -sin, cos, 0.0, 0.0)
    }

    /// Rotation by `angle` degrees around the point `(cx, cy)`.
    pub fn rotated_at(angle: f32, cx: f32, cy: f32) -> Self {
        Self::translated(cx, cy) * Self::rotated(angle) * Self::translated(-cx, -cy)
    }

    /// Shear by `shx` / `shy` degrees along the x and y axes.
    pub fn sheared(shx: f32, shy: f32) -> Self {
        Self::new(
            1.0,
            shy.to_radians().tan(),
            shx.to_radians().tan(),
            1.0,
            0.0,
            0.0,
        )
    }

    /// Composes `self * other`: the result applies `other` first, then `self`.
    pub fn multiply(&self, other: &Matrix) -> Matrix {
        Matrix::new(
            self.a * other.a + self.c * other.b,
            self.b * other.a + self.d * other.b,
            self.a * other.c + self.c * other.d,
            self.b * other.c + self.d * other.d,
            self.a * other.e + self.c * other.f + self.e,
            self.b * other.e + self.d * other.f + self.f,
        )
    }

    /// Appends a translation, as if added to the end of an SVG transform list.
    pub fn translate(&mut self, tx: f32, ty: f32) -> &mut Self {
        *self = self.multiply(&Matrix::translated(tx, ty));
        self
    }

    pub fn scale(&mut self, sx: f32, sy: f32) -> &mut Self {
        *self = self.multiply(&Matrix::scaled(sx, sy));
        self
    }

    pub fn rotate(&mut self, angle: f32) -> &mut Self {
        *self = self.multiply(&Matrix::rotated(angle));
        self
    }

    pub fn rotate_at(&mut self, angle: f32, cx: f32, cy: f32) -> &mut Self {
        *self = self.multiply(&Matrix::rotated_at(angle, cx, cy));
        self
    }

    pub fn shear(&mut self, shx: f32, shy: f32) -> &mut Self {
        *self = self.multiply(&Matrix::sheared(shx, shy));
        self
    }

    /// Returns the inverse, or `None` if the matrix is not invertible.
    pub fn inverse(&self) -> Option<Matrix> {
        let det = self.a * self.d - self.b * self.c;
        if det == 0.0 || !det.is_finite() {
            return None;
        }
        Some(Matrix::new(
            self.d / det,
            -self.b / det,
            -self.c / det,
            self.a / det,
            (self.c * self.f - self.d * self.e) / det,
            (self.b * self.e - self.a * self.f) / det,
        ))
    }

    /// Inverts in place. Leaves the matrix untouched and returns `false`
    /// when it is not invertible.
    pub fn invert(&mut self) -> bool {
        match self.inverse() {
            Some(inv) => {
                *self = inv;
                true
            }
            None => false,
        }
    }

    pub fn reset(&mut self) {
        *self = Matrix::identity();
    }

    pub fn map_point(&self, x: f32, y: f32) -> (f32, f32) {
        (
            self.a * x + self.c * y + self.e,
            self.b * x + self.d * y + self.f,
        )
    }

    pub(crate) fn to_transform(self) -> tiny_skia::Transform {
        tiny_skia::Transform::from_row(self.a, self.b, self.c, self.d, self.e, self.f)
    }

    pub(crate) fn from_transform(ts: tiny_skia::Transform) -> Self {
        Self::new(ts.sx, ts.ky, ts.kx, ts.sy, ts.tx, ts.ty)
    }
}

impl std::ops::Mul for Matrix {
    type Output = Matrix;

    fn mul(self, rhs: Matrix) -> Matrix {
        self.multiply(&rhs)
    }
}

/// Axis-aligned rectangle in user units.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BoundingBox {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl BoundingBox {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// The axis-aligned bounds of this box after `matrix` is applied.
    pub fn transformed(&self, matrix: &Matrix) -> BoundingBox {
        let corners = [
            matrix.map_point(self.x, self.y),
            matrix.map_point(self.x + self.w, self.y),
            matrix.map_point(self.x, self.y + self.h),
            matrix.map_point(self.x + self.w, self.y + self.h),
        ];
        let mut min = corners[0];
        let mut max = corners[0];
        for (px, py) in corners {
            min.0 = min.0.min(px);
            min.1 = min.1.min(py);
            max.0 = max.0.max(px);
            max.1 = max.1.max(py);
        }
        BoundingBox::new(min.0, min.1, max.0 - min.0, max.1 - min.1)
    }

    pub fn transform(&mut self, matrix: &Matrix) {
        *self = self.transformed(matrix);
    }

    pub(crate) fn from_rect(rect: tiny_skia::Rect) -> Self {
        Self::new(rect.x(), rect.y(), rect.width(), rect.height())
    }
}
