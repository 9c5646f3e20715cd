//! Natural cubic spline smoothing of a channel window.
//!
//! The window's samples are used as knots (x = epoch seconds, y = value). The
//! fitted curve interpolates every knot and has zero second derivative at both
//! ends. Knots must be strictly increasing in x; windows that contain
//! duplicate or out-of-order timestamps are rejected with an
//! [`InterpolationError`] so the caller can fall back to the raw polyline.

use crate::error::InterpolationError;
use crate::sink::{PlotPoint, Sample};

/// Windows shorter than this are not smoothed.
pub const MIN_INTERPOLATION_POINTS: usize = 4;

/// Default number of points the smoothed curve is sampled at.
pub const DEFAULT_OUTPUT_POINTS: usize = 500;

/// A fitted natural cubic spline.
///
/// Knot positions are stored relative to the first knot so that large epoch
/// offsets do not eat into the precision of the per-segment polynomials.
#[derive(Debug, Clone)]
pub struct NaturalCubicSpline {
    origin: f64,
    knots: Vec<f64>,
    values: Vec<f64>,
    /// Second derivative at each knot.
    curvature: Vec<f64>,
}

impl NaturalCubicSpline {
    /// Fit a spline through `(xs[i], ys[i])`.
    pub fn fit(xs: &[f64], ys: &[f64]) -> Result<Self, InterpolationError> {
        if xs.len() != ys.len() {
            return Err(InterpolationError::LengthMismatch {
                xs: xs.len(),
                ys: ys.len(),
            });
        }
        let n = xs.len();
        if n < 2 {
            return Err(InterpolationError::TooFewKnots(n));
        }
        for (index, (x, y)) in xs.iter().zip(ys).enumerate() {
            if !x.is_finite() || !y.is_finite() {
                return Err(InterpolationError::NonFinite { index });
            }
        }
        for index in 1..n {
            if xs[index] <= xs[index - 1] {
                return Err(InterpolationError::NonMonotonic {
                    index,
                    previous: xs[index - 1],
                    current: xs[index],
                });
            }
        }

        let origin = xs[0];
        let knots: Vec<f64> = xs.iter().map(|x| x - origin).collect();
        let values = ys.to_vec();
        let curvature = solve_curvature(&knots, &values);
        Ok(Self {
            origin,
            knots,
            values,
            curvature,
        })
    }

    /// `(min x, max x)` covered by the knots.
    pub fn domain(&self) -> (f64, f64) {
        let last = self.knots[self.knots.len() - 1];
        (self.origin, self.origin + last)
    }

    /// Evaluate the spline at `x`. Outside the domain the end segments are extended.
    pub fn eval(&self, x: f64) -> f64 {
        let t = x - self.origin;
        let last_seg = self.knots.len() - 2;
        let seg = self
            .knots
            .partition_point(|&k| k <= t)
            .saturating_sub(1)
            .min(last_seg);

        let (x0, x1) = (self.knots[seg], self.knots[seg + 1]);
        let (y0, y1) = (self.values[seg], self.values[seg + 1]);
        let (m0, m1) = (self.curvature[seg], self.curvature[seg + 1]);
        let h = x1 - x0;
        let dt = t - x0;

        let slope = (y1 - y0) / h - h * (2.0 * m0 + m1) / 6.0;
        y0 + dt * (slope + dt * (m0 / 2.0 + dt * (m1 - m0) / (6.0 * h)))
    }

    /// Evaluate at `n` evenly spaced x values spanning the domain, ends included.
    pub fn sample(&self, n: usize) -> Vec<PlotPoint> {
        let (lo, hi) = self.domain();
        match n {
            0 => Vec::new(),
            1 => vec![PlotPoint {
                x: lo,
                y: self.eval(lo),
            }],
            _ => {
                let step = (hi - lo) / (n - 1) as f64;
                (0..n)
                    .map(|i| {
                        let x = if i == n - 1 { hi } else { lo + step * i as f64 };
                        PlotPoint { x, y: self.eval(x) }
                    })
                    .collect()
            }
        }
    }
}

/// Solve the tridiagonal system for the knot second derivatives with natural
/// boundary conditions (Thomas algorithm). The system is strictly diagonally
/// dominant for increasing knots, so no pivoting is needed.
fn solve_curvature(knots: &[f64], values: &[f64]) -> Vec<f64> {
    let n = knots.len();
    let mut m = vec![0.0; n];
    if n < 3 {
        return m;
    }

    let h: Vec<f64> = knots.windows(2).map(|w| w[1] - w[0]).collect();
    let inner = n - 2;
    let mut c_prime = vec![0.0; inner];
    let mut d_prime = vec![0.0; inner];

    for j in 0..inner {
        let i = j + 1;
        let sub = h[i - 1];
        let diag = 2.0 * (h[i - 1] + h[i]);
        let sup = h[i];
        let rhs = 6.0 * ((values[i + 1] - values[i]) / h[i] - (values[i] - values[i - 1]) / h[i - 1]);

        if j == 0 {
            c_prime[j] = sup / diag;
            d_prime[j] = rhs / diag;
        } else {
            let denom = diag - sub * c_prime[j - 1];
            c_prime[j] = sup / denom;
            d_prime[j] = (rhs - sub * d_prime[j - 1]) / denom;
        }
    }

    m[inner] = d_prime[inner - 1];
    for j in (0..inner - 1).rev() {
        m[j + 1] = d_prime[j] - c_prime[j] * m[j + 2];
    }
    m
}

/// Smooth a window for display.
///
/// Returns an empty curve when fewer than [`MIN_INTERPOLATION_POINTS`] samples
/// are present, otherwise exactly `output_points` points.
pub fn interpolate<'a, I>(samples: I, output_points: usize) -> Result<Vec<PlotPoint>, InterpolationError>
where
    I: IntoIterator<Item = &'a Sample>,
{
    let (xs, ys): (Vec<f64>, Vec<f64>) = samples.into_iter().map(|s| (s.x(), s.value)).unzip();
    if xs.len() < MIN_INTERPOLATION_POINTS {
        return Ok(Vec::new());
    }
    let spline = NaturalCubicSpline::fit(&xs, &ys)?;
    Ok(spline.sample(output_points))
}
