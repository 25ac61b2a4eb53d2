//! Describes the relationship between a rectangle on the integral
//! plane (the rows and columns of a sample grid, with its origin in
//! the upper-left corner) and a rectangle on the complex plane.
//!
//! A single `scale` governs both axes: one step along a row and one
//! step down a column cover the same distance in the complex plane.
//! Where the output device has non-square cells (a terminal, say)
//! circles come out as ellipses, and that is accepted in both the
//! interactive and the export paths.
use crate::errors::{Error, Result};
use num::Complex;

/// The rectangle of the complex plane currently mapped onto the
/// output grid, plus the distance between two adjacent samples.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Viewport {
    /// Left edge, mapped to column 0.
    pub min_re: f64,
    /// Right edge.
    pub max_re: f64,
    /// Bottom edge.
    pub min_im: f64,
    /// Top edge, mapped to row 0.
    pub max_im: f64,
    /// Complex-plane distance between two neighbouring samples.
    pub scale: f64,
}

impl Viewport {
    /// Constructor.  Refuses inverted or empty boxes and non-positive
    /// scales rather than silently fixing them.
    pub fn new(min_re: f64, max_re: f64, min_im: f64, max_im: f64, scale: f64) -> Result<Viewport> {
        let viewport = Viewport {
            min_re,
            max_re,
            min_im,
            max_im,
            scale,
        };
        viewport.validate()?;
        Ok(viewport)
    }

    /// Builds a viewport from its left-lower and right-upper corners,
    /// choosing the scale so that `columns` samples span the real
    /// extent.
    pub fn from_corners(
        leftlower: Complex<f64>,
        rightupper: Complex<f64>,
        columns: usize,
    ) -> Result<Viewport> {
        if columns == 0 {
            return Err(Error::InvalidViewport(
                "A viewport needs at least one column".to_string(),
            ));
        }
        let scale = (rightupper.re - leftlower.re) / (columns as f64);
        Viewport::new(leftlower.re, rightupper.re, leftlower.im, rightupper.im, scale)
    }

    /// The initial interactive viewport for a terminal of `cols` by
    /// `lines` cells: the shorter side spans two units of the complex
    /// plane, and the box is centered on the origin.
    pub fn fit(cols: u16, lines: u16) -> Result<Viewport> {
        let (rows, columns) = preview_shape(cols, lines);
        if rows == 0 || columns == 0 {
            return Err(Error::InvalidViewport(format!(
                "Terminal of {}x{} is too small to draw in",
                cols, lines
            )));
        }
        let (width, height) = (columns as f64, rows as f64);
        let scale = 2.0 / width.min(height);
        let max_re = width * scale / 2.0;
        let max_im = height * scale / 2.0;
        Viewport::new(-max_re, max_re, -max_im, max_im, scale)
    }

    /// Checks the invariants every render pass relies upon.
    pub fn validate(&self) -> Result<()> {
        let all = [self.min_re, self.max_re, self.min_im, self.max_im, self.scale];
        if all.iter().any(|v| !v.is_finite()) {
            return Err(Error::InvalidViewport(format!("Non-finite bounds in {:?}", self)));
        }
        if !(self.scale > 0.0) {
            return Err(Error::InvalidViewport(format!(
                "Scale must be positive, got {}",
                self.scale
            )));
        }
        if !(self.max_re > self.min_re) {
            return Err(Error::InvalidViewport(
                "The left edge is not to the left of the right edge".to_string(),
            ));
        }
        if !(self.max_im > self.min_im) {
            return Err(Error::InvalidViewport(
                "The bottom edge is not below the top edge".to_string(),
            ));
        }
        Ok(())
    }

    /// Pixel-space width: the number of samples across the real extent.
    pub fn width(&self) -> f64 {
        (self.max_re - self.min_re) / self.scale
    }

    /// Pixel-space height.
    pub fn height(&self) -> f64 {
        (self.max_im - self.min_im) / self.scale
    }

    /// The point halfway across both extents.
    pub fn center(&self) -> Complex<f64> {
        Complex::new(
            (self.min_re + self.max_re) / 2.0,
            (self.min_im + self.max_im) / 2.0,
        )
    }
}

/// The imaginary coordinate shared by every sample on `row`.  Row 0
/// is the top of the box, so the imaginary axis runs against the row
/// index.
#[inline]
pub fn row_imaginary(viewport: &Viewport, row: usize) -> f64 {
    viewport.max_im - (row as f64) * viewport.scale
}

/// The real coordinate shared by every sample in `column`.
#[inline]
pub fn column_real(viewport: &Viewport, column: usize) -> f64 {
    viewport.min_re + (column as f64) * viewport.scale
}

/// Given the row and column of a sample on the integral plane, return
/// the complex number at the equivalent location on the complex plane.
#[inline]
pub fn map_sample(viewport: &Viewport, row: usize, column: usize) -> Complex<f64> {
    Complex::new(column_real(viewport, column), row_imaginary(viewport, row))
}

/// Rows and columns of the preview grid on a terminal of `cols` by
/// `lines` cells.  Two columns are left free at the right edge.
pub fn preview_shape(cols: u16, lines: u16) -> (usize, usize) {
    (usize::from(lines), usize::from(cols).saturating_sub(2))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classic() -> Viewport {
        Viewport::new(-2.0, 1.0, -1.5, 1.5, 0.75).unwrap()
    }

    #[test]
    fn viewport_fails_on_bad_shape() {
        assert!(Viewport::new(1.0, -1.0, -1.0, 1.0, 0.5).is_err());
        assert!(Viewport::new(-1.0, 1.0, 1.0, -1.0, 0.5).is_err());
        assert!(Viewport::new(-1.0, 1.0, -1.0, 1.0, 0.0).is_err());
        assert!(Viewport::new(-1.0, 1.0, -1.0, 1.0, -0.5).is_err());
        assert!(Viewport::new(-1.0, 1.0, -1.0, std::f64::NAN, 0.5).is_err());
    }

    #[test]
    fn viewport_passes_on_good_shape() {
        let vp = Viewport::new(-1.0, 1.0, -1.0, 1.0, 0.5).unwrap();
        assert_eq!(vp.width(), 4.0);
        assert_eq!(vp.height(), 4.0);
    }

    #[test]
    fn corner_sample_is_upper_left() {
        assert_eq!(map_sample(&classic(), 0, 0), Complex::new(-2.0, 1.5));
    }

    #[test]
    fn imaginary_axis_runs_against_rows() {
        let vp = classic();
        assert_eq!(map_sample(&vp, 2, 2), Complex::new(-0.5, 0.0));
        assert_eq!(map_sample(&vp, 3, 1), Complex::new(-1.25, -0.75));
        assert!(row_imaginary(&vp, 1) < row_imaginary(&vp, 0));
    }

    #[test]
    fn both_axes_step_by_the_same_scale() {
        let vp = Viewport::new(0.0, 8.0, 0.0, 2.0, 0.5).unwrap();
        let origin = map_sample(&vp, 0, 0);
        let right = map_sample(&vp, 0, 1);
        let down = map_sample(&vp, 1, 0);
        assert_eq!(right.re - origin.re, origin.im - down.im);
    }

    #[test]
    fn from_corners_divides_the_real_extent() {
        let (ll, ru) = (Complex::new(-2.0, -1.5), Complex::new(1.0, 1.5));
        assert_eq!(Viewport::from_corners(ll, ru, 4).unwrap(), classic());
        assert!(Viewport::from_corners(ll, ru, 0).is_err());
    }

    #[test]
    fn fit_centers_the_terminal_on_the_origin() {
        let vp = Viewport::fit(82, 40).unwrap();
        assert_eq!(vp.scale, 2.0 / 40.0);
        assert_eq!(vp.center(), Complex::new(0.0, 0.0));
        assert!((vp.height() - 40.0).abs() < 1e-9);
        assert!((vp.width() - 80.0).abs() < 1e-9);
        // A symmetric box puts its center sample on the origin.
        assert_eq!(map_sample(&vp, 20, 40), Complex::new(0.0, 0.0));
    }

    #[test]
    fn preview_grid_matches_the_fitted_box() {
        for &(cols, lines) in &[(82, 40), (80, 24), (203, 61), (3, 1)] {
            let vp = Viewport::fit(cols, lines).unwrap();
            let (rows, columns) = preview_shape(cols, lines);
            assert!((vp.width() - columns as f64).abs() < 1e-9, "{}x{}", cols, lines);
            assert!((vp.height() - rows as f64).abs() < 1e-9, "{}x{}", cols, lines);
            // The last column stays inside the box.
            assert!(map_sample(&vp, 0, columns - 1).re < vp.max_re);
        }
    }

    #[test]
    fn fit_rejects_tiny_terminals() {
        assert!(Viewport::fit(2, 10).is_err());
        assert!(Viewport::fit(10, 0).is_err());
    }
}
