//! The handful of complex-number operations the escape loop needs.
//! These are written out longhand rather than leaning on the
//! operator overloads of `num::Complex` so that the arithmetic the
//! renderer performs is exactly the arithmetic written here.

use num::Complex;

/// Componentwise sum.
#[inline]
pub fn add(a: Complex<f64>, b: Complex<f64>) -> Complex<f64> {
    Complex::new(a.re + b.re, a.im + b.im)
}

/// Standard complex product.
#[inline]
pub fn multiply(a: Complex<f64>, b: Complex<f64>) -> Complex<f64> {
    Complex::new(a.re * b.re - a.im * b.im, a.re * b.im + a.im * b.re)
}

/// The square of the modulus.  Comparing this against the square of
/// a threshold spares us a square root on every iteration.
#[inline]
pub fn squared_magnitude(a: Complex<f64>) -> f64 {
    a.re * a.re + a.im * a.im
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::distributions::{Distribution, Uniform};
    use rand::prelude::*;

    fn samples(count: usize) -> Vec<Complex<f64>> {
        let range = Uniform::new_inclusive(-4.0_f64, 4.0_f64);
        let mut rng = StdRng::seed_from_u64(0x5eed);
        (0..count)
            .map(|_| Complex::new(range.sample(&mut rng), range.sample(&mut rng)))
            .collect()
    }

    #[test]
    fn multiply_matches_the_textbook_product() {
        let p = multiply(Complex::new(1.0, 2.0), Complex::new(3.0, -1.0));
        assert_eq!(p, Complex::new(5.0, 5.0));
        let i = Complex::new(0.0, 1.0);
        assert_eq!(multiply(i, i), Complex::new(-1.0, 0.0));
    }

    #[test]
    fn multiply_commutes() {
        let points = samples(200);
        for pair in points.chunks(2) {
            assert_eq!(multiply(pair[0], pair[1]), multiply(pair[1], pair[0]));
        }
    }

    #[test]
    fn doubling_quadruples_the_squared_magnitude() {
        for a in samples(100) {
            let doubled = squared_magnitude(add(a, a));
            let expected = 4.0 * squared_magnitude(a);
            assert!((doubled - expected).abs() <= 1e-12 * expected.max(1.0));
        }
    }

    #[test]
    fn squared_magnitude_of_three_four_is_twenty_five() {
        assert_eq!(squared_magnitude(Complex::new(3.0, -4.0)), 25.0);
    }
}
