//! # Curve Fitting Utilities
//!
//! Shared numerics for the calculation engines: least-squares linear
//! regression (the Atterberg flow curve is fit in log-blows space), quadratic
//! least squares via normal equations (Proctor compaction curve), and
//! piecewise-linear interpolation (CBR load lookup, fitted-curve evaluation).
//!
//! Every routine is total: degenerate systems (coincident abscissae, singular
//! normal equations) return `None` instead of dividing by zero or producing
//! non-finite values.
//!
//! ## References
//!
//! - ASTM D4318 (flow curve, one-point liquid limit)
//! - ASTM D698 / D1557 (compaction curve shape)

/// Pivot magnitude below which the normal-equation system is treated as
/// singular.
const PIVOT_TOLERANCE: f64 = 1e-9;

/// Result of a least-squares straight-line fit `y = slope*x + intercept`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
    /// Coefficient of determination (Pearson r, squared)
    pub r_squared: f64,
}

impl LinearFit {
    /// Evaluate the fitted line at `x`
    pub fn value_at(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

/// Least-squares line through `points`.
///
/// Returns `None` for fewer than 2 points or when all abscissae coincide
/// (`n*Σx² - (Σx)² == 0`), the degenerate case where the slope is undefined.
pub fn linear_regression(points: &[(f64, f64)]) -> Option<LinearFit> {
    let n = points.len() as f64;
    if points.len() < 2 {
        return None;
    }

    let sum_x: f64 = points.iter().map(|p| p.0).sum();
    let sum_y: f64 = points.iter().map(|p| p.1).sum();
    let sum_xy: f64 = points.iter().map(|p| p.0 * p.1).sum();
    let sum_x2: f64 = points.iter().map(|p| p.0 * p.0).sum();
    let sum_y2: f64 = points.iter().map(|p| p.1 * p.1).sum();

    let denominator = n * sum_x2 - sum_x * sum_x;
    if denominator == 0.0 {
        return None;
    }

    let slope = (n * sum_xy - sum_x * sum_y) / denominator;
    let intercept = (sum_y - slope * sum_x) / n;

    // Pearson correlation; a flat response (zero y-variance) yields r = 0
    let r_numerator = n * sum_xy - sum_x * sum_y;
    let r_denominator = (denominator * (n * sum_y2 - sum_y * sum_y)).sqrt();
    let r = if r_denominator != 0.0 {
        r_numerator / r_denominator
    } else {
        0.0
    };

    Some(LinearFit {
        slope,
        intercept,
        r_squared: r * r,
    })
}

/// Coefficients of a fitted quadratic `y = a*x² + b*x + c`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Parabola {
    pub a: f64,
    pub b: f64,
    pub c: f64,
}

impl Parabola {
    /// Evaluate the parabola at `x`
    pub fn value_at(&self, x: f64) -> f64 {
        self.a * x * x + self.b * x + self.c
    }

    /// Abscissa of the vertex, `-b/(2a)`. Caller must ensure `a != 0`.
    pub fn vertex_x(&self) -> f64 {
        -self.b / (2.0 * self.a)
    }
}

/// Least-squares parabola through `points` via the 3x3 normal equations,
/// solved by Gaussian elimination with partial pivoting.
///
/// Returns `None` for fewer than 3 points or when any pivot falls below
/// [`PIVOT_TOLERANCE`] (coincident abscissae make the system singular).
pub fn parabolic_fit(points: &[(f64, f64)]) -> Option<Parabola> {
    if points.len() < 3 {
        return None;
    }
    let n = points.len() as f64;

    let sum_x: f64 = points.iter().map(|p| p.0).sum();
    let sum_x2: f64 = points.iter().map(|p| p.0.powi(2)).sum();
    let sum_x3: f64 = points.iter().map(|p| p.0.powi(3)).sum();
    let sum_x4: f64 = points.iter().map(|p| p.0.powi(4)).sum();
    let sum_y: f64 = points.iter().map(|p| p.1).sum();
    let sum_xy: f64 = points.iter().map(|p| p.0 * p.1).sum();
    let sum_x2y: f64 = points.iter().map(|p| p.0 * p.0 * p.1).sum();

    let matrix = [
        [sum_x4, sum_x3, sum_x2, sum_x2y],
        [sum_x3, sum_x2, sum_x, sum_xy],
        [sum_x2, sum_x, n, sum_y],
    ];

    let [a, b, c] = solve_3x3(matrix)?;
    Some(Parabola { a, b, c })
}

/// Solve a 3x3 augmented system by Gaussian elimination with partial
/// pivoting. `None` when a pivot is numerically zero.
fn solve_3x3(mut m: [[f64; 4]; 3]) -> Option<[f64; 3]> {
    for col in 0..3 {
        // Partial pivot: move the largest remaining entry into place
        let mut pivot_row = col;
        for row in (col + 1)..3 {
            if m[row][col].abs() > m[pivot_row][col].abs() {
                pivot_row = row;
            }
        }
        if m[pivot_row][col].abs() < PIVOT_TOLERANCE {
            return None;
        }
        m.swap(col, pivot_row);

        for row in (col + 1)..3 {
            let factor = m[row][col] / m[col][col];
            for k in col..4 {
                m[row][k] -= factor * m[col][k];
            }
        }
    }

    // Back substitution
    let mut solution = [0.0f64; 3];
    for row in (0..3).rev() {
        let mut value = m[row][3];
        for k in (row + 1)..3 {
            value -= m[row][k] * solution[k];
        }
        solution[row] = value / m[row][row];
    }
    Some(solution)
}

/// Piecewise-linear interpolation of `y` at `x` over points sorted by
/// ascending `x`.
///
/// Returns `None` when `x` lies outside every segment (no extrapolation). A
/// zero-width segment returns its left ordinate.
pub fn interpolate_at(points: &[(f64, f64)], x: f64) -> Option<f64> {
    for pair in points.windows(2) {
        let (x1, y1) = pair[0];
        let (x2, y2) = pair[1];
        if x >= x1 && x <= x2 {
            if x2 - x1 == 0.0 {
                return Some(y1);
            }
            let fraction = (x - x1) / (x2 - x1);
            return Some(y1 + fraction * (y2 - y1));
        }
    }
    None
}

/// Invert a log-linear grain-size bracket: given two sieve points
/// `(d_fine, passing_fine)` and `(d_coarse, passing_coarse)`, find the
/// diameter at which `target_passing` is crossed, interpolating linearly in
/// `log10(diameter)`.
///
/// Caller guarantees both diameters are positive and the passings are
/// distinct; degenerate brackets are resolved before calling (see the sieve
/// engine's Dx lookup).
pub fn log_interpolate_diameter(
    d_fine: f64,
    passing_fine: f64,
    d_coarse: f64,
    passing_coarse: f64,
    target_passing: f64,
) -> f64 {
    let log_fine = d_fine.log10();
    let log_coarse = d_coarse.log10();
    let log_d = log_fine
        + (target_passing - passing_fine) * (log_coarse - log_fine)
            / (passing_coarse - passing_fine);
    10.0f64.powf(log_d)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() < tol
    }

    #[test]
    fn test_regression_exact_line() {
        let points = [(1.0, 3.0), (2.0, 5.0), (4.0, 9.0)];
        let fit = linear_regression(&points).expect("line fit should exist");
        assert!(approx_eq(fit.slope, 2.0, 1e-12), "slope = {}", fit.slope);
        assert!(approx_eq(fit.intercept, 1.0, 1e-12), "intercept = {}", fit.intercept);
        assert!(approx_eq(fit.r_squared, 1.0, 1e-12), "r² = {}", fit.r_squared);
        assert!(approx_eq(fit.value_at(3.0), 7.0, 1e-12));
    }

    #[test]
    fn test_regression_degenerate_abscissae() {
        // All x equal: slope undefined, must fail instead of dividing by zero
        let points = [(2.0, 1.0), (2.0, 5.0), (2.0, 9.0)];
        assert!(linear_regression(&points).is_none());
        assert!(linear_regression(&[(1.0, 1.0)]).is_none(), "single point has no fit");
    }

    #[test]
    fn test_regression_flat_response() {
        let points = [(1.0, 4.0), (2.0, 4.0), (3.0, 4.0)];
        let fit = linear_regression(&points).expect("flat line still fits");
        assert!(approx_eq(fit.slope, 0.0, 1e-12));
        assert_eq!(fit.r_squared, 0.0, "zero y-variance reports r = 0");
    }

    #[test]
    fn test_parabola_exact_recovery() {
        let target = Parabola { a: -0.02, b: 0.6, c: 1.2 };
        let points: Vec<(f64, f64)> = [8.0, 10.0, 12.0, 14.0, 16.0]
            .iter()
            .map(|&x| (x, target.value_at(x)))
            .collect();

        let fit = parabolic_fit(&points).expect("exact parabola should fit");
        assert!(approx_eq(fit.a, target.a, 1e-9), "a = {}", fit.a);
        assert!(approx_eq(fit.b, target.b, 1e-9), "b = {}", fit.b);
        assert!(approx_eq(fit.c, target.c, 1e-9), "c = {}", fit.c);
        assert!(approx_eq(fit.vertex_x(), 15.0, 1e-9), "vertex = {}", fit.vertex_x());
    }

    #[test]
    fn test_parabola_degenerate_points() {
        // Coincident abscissae make the normal equations singular
        let points = [(5.0, 1.0), (5.0, 2.0), (5.0, 3.0)];
        assert!(parabolic_fit(&points).is_none());
        assert!(parabolic_fit(&[(1.0, 1.0), (2.0, 2.0)]).is_none(), "needs 3 points");
    }

    #[test]
    fn test_parabola_through_collinear_points() {
        // Collinear data is still solvable; the quadratic term vanishes
        let points = [(1.0, 2.0), (2.0, 4.0), (3.0, 6.0), (4.0, 8.0)];
        let fit = parabolic_fit(&points).expect("collinear data fits with a = 0");
        assert!(approx_eq(fit.a, 0.0, 1e-9), "a = {}", fit.a);
        assert!(approx_eq(fit.b, 2.0, 1e-9), "b = {}", fit.b);
    }

    #[test]
    fn test_interpolation_inside_and_at_knots() {
        let points = [(0.0, 0.0), (2.0, 4.0), (5.0, 10.0)];
        assert_eq!(interpolate_at(&points, 0.0), Some(0.0));
        assert_eq!(interpolate_at(&points, 2.0), Some(4.0));
        assert_eq!(interpolate_at(&points, 1.0), Some(2.0));
        assert_eq!(interpolate_at(&points, 3.5), Some(7.0));
    }

    #[test]
    fn test_interpolation_outside_range() {
        let points = [(1.0, 1.0), (2.0, 2.0)];
        assert_eq!(interpolate_at(&points, 0.5), None);
        assert_eq!(interpolate_at(&points, 2.5), None);
        assert_eq!(interpolate_at(&[(1.0, 1.0)], 1.0), None, "one point has no segment");
    }

    #[test]
    fn test_interpolation_zero_width_segment() {
        let points = [(1.0, 3.0), (1.0, 9.0), (2.0, 10.0)];
        assert_eq!(interpolate_at(&points, 1.0), Some(3.0), "left ordinate wins");
    }

    #[test]
    fn test_interpolation_collinear_is_exact() {
        // Linearity: for collinear points the interpolated value is the exact
        // line value at any interior abscissa
        let points = [(0.0, 1.0), (2.0, 5.0), (4.0, 9.0)];
        for x in [0.5, 1.0, 1.7, 2.9, 3.999] {
            let y = interpolate_at(&points, x).expect("inside range");
            assert!(approx_eq(y, 2.0 * x + 1.0, 1e-12), "at {}: {}", x, y);
        }
    }

    #[test]
    fn test_log_diameter_midpoint() {
        // Passing 0% at 0.1mm and 100% at 1.0mm: the 50% crossing sits at the
        // logarithmic midpoint sqrt(0.1*1.0)
        let d = log_interpolate_diameter(0.1, 0.0, 1.0, 100.0, 50.0);
        assert!(approx_eq(d, 0.31622776, 1e-6), "d = {}", d);
    }
}
