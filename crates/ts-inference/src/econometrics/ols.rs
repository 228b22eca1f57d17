//! Ordinary least squares with HC3 heteroskedasticity-consistent covariance.
//!
//! `V_HC3 = (X'X)⁻¹ [Σ_i e_i² / (1 − h_ii)² · x_i x_i'] (X'X)⁻¹`, where
//! `h_ii = x_i' (X'X)⁻¹ x_i` is the leverage of observation i.
//!
//! # References
//!
//! - MacKinnon & White (1985), "Some heteroskedasticity-consistent covariance
//!   matrix estimators with improved finite sample properties." *Journal of Econometrics*.
//! - Long & Ervin (2000), "Using heteroscedasticity consistent standard errors
//!   in the linear regression model." *The American Statistician*.

use nalgebra::{DMatrix, DVector};
use ts_core::{Error, Result};

/// Leverage this close to 1 makes the HC3 weight blow up.
const LEVERAGE_TOL: f64 = 1e-10;

/// Result of [`ols_hc3`].
#[derive(Debug, Clone)]
pub struct OlsFit {
    /// Coefficient estimates, in design-column order.
    pub coefficients: Vec<f64>,
    /// HC3 covariance (k × k).
    pub cov_hc3: DMatrix<f64>,
    /// HC3 standard errors.
    pub se_hc3: Vec<f64>,
    /// Classical (homoskedastic) standard errors.
    pub se_ols: Vec<f64>,
    /// Diagonal of the hat matrix.
    pub leverage: Vec<f64>,
    /// Residual sum of squares.
    pub rss: f64,
    /// Centered R².
    pub r_squared: f64,
    /// Adjusted R².
    pub adj_r_squared: f64,
    /// Number of observations.
    pub n_obs: usize,
    /// Number of design columns.
    pub n_regressors: usize,
}

impl OlsFit {
    /// Residual degrees of freedom `n − k`.
    pub fn df_resid(&self) -> usize {
        self.n_obs - self.n_regressors
    }
}

/// Numerical rank of a design matrix (SVD, relative tolerance).
pub fn design_rank(x: &DMatrix<f64>) -> usize {
    let sv = x.singular_values();
    let max_sv = sv.iter().copied().fold(0.0_f64, f64::max);
    let tol = max_sv * x.nrows().max(x.ncols()) as f64 * f64::EPSILON;
    sv.iter().filter(|&&s| s > tol).count()
}

/// Fit `y = Xβ + ε` by OLS and estimate HC3 covariance.
///
/// `x` must already contain the intercept column if one is wanted.
pub fn ols_hc3(x: &DMatrix<f64>, y: &DVector<f64>) -> Result<OlsFit> {
    let n = x.nrows();
    let k = x.ncols();
    if k == 0 {
        return Err(Error::Validation("design matrix must have at least 1 column".into()));
    }
    if y.len() != n {
        return Err(Error::Validation(format!("y length ({}) != n ({n})", y.len())));
    }
    if n < k {
        return Err(Error::Regression(format!(
            "{n} observations for {k} design columns; need at least {k}"
        )));
    }
    if x.iter().chain(y.iter()).any(|v| !v.is_finite()) {
        return Err(Error::Validation("X and y must contain only finite values".into()));
    }

    let rank = design_rank(x);
    if rank < k {
        return Err(Error::Regression(format!(
            "design matrix is rank-deficient (rank {rank} < {k} columns, {n} rows)"
        )));
    }

    let xt = x.transpose();
    let xtx = &xt * x;
    let xty = &xt * y;
    let xtx_inv =
        xtx.try_inverse().ok_or_else(|| Error::Regression("X'X singular in OLS".into()))?;
    let beta = &xtx_inv * &xty;

    let resid = y - x * &beta;
    let rss: f64 = resid.iter().map(|r| r * r).sum();

    let y_mean = y.mean();
    let tss: f64 = y.iter().map(|v| (v - y_mean) * (v - y_mean)).sum();
    let r_squared = if tss > 0.0 { 1.0 - rss / tss } else { 0.0 };
    let dof = n as f64 - k as f64;
    let adj_r_squared =
        if dof > 0.0 { 1.0 - (1.0 - r_squared) * (n as f64 - 1.0) / dof } else { f64::NAN };

    // Leverage h_ii and the HC3 meat Σ w_i x_i x_i'
    let mut leverage = Vec::with_capacity(n);
    let mut meat = DMatrix::zeros(k, k);
    for i in 0..n {
        let xi = x.row(i);
        let mut h = 0.0;
        for a in 0..k {
            for b in 0..k {
                h += xi[a] * xtx_inv[(a, b)] * xi[b];
            }
        }
        if 1.0 - h < LEVERAGE_TOL {
            return Err(Error::Regression(format!(
                "observation {i} has leverage {h:.6}; HC3 covariance is undefined \
                 (a design cell holds a single observation)"
            )));
        }
        leverage.push(h);

        let w = resid[i] * resid[i] / ((1.0 - h) * (1.0 - h));
        for a in 0..k {
            for b in 0..k {
                meat[(a, b)] += w * xi[a] * xi[b];
            }
        }
    }

    let cov_hc3 = &xtx_inv * &meat * &xtx_inv;
    let se_hc3: Vec<f64> = (0..k).map(|j| cov_hc3[(j, j)].max(0.0).sqrt()).collect();

    let sigma2 = if dof > 0.0 { rss / dof } else { f64::NAN };
    let se_ols: Vec<f64> = (0..k).map(|j| (sigma2 * xtx_inv[(j, j)]).sqrt()).collect();

    Ok(OlsFit {
        coefficients: beta.iter().copied().collect(),
        cov_hc3,
        se_hc3,
        se_ols,
        leverage,
        rss,
        r_squared,
        adj_r_squared,
        n_obs: n,
        n_regressors: k,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    /// Saturated 2×2 design, three observations per cell spread ±1 around the cell mean.
    fn saturated() -> (DMatrix<f64>, DVector<f64>) {
        let cells = [(0.0, 0.0, 10.0), (0.0, 1.0, 12.0), (1.0, 0.0, 10.0), (1.0, 1.0, 15.0)];
        let mut x = Vec::new();
        let mut y = Vec::new();
        for (d, p, m) in cells {
            for off in [-1.0, 0.0, 1.0] {
                x.extend([1.0, d, p, d * p]);
                y.push(m + off);
            }
        }
        (DMatrix::from_row_slice(12, 4, &x), DVector::from_vec(y))
    }

    #[test]
    fn saturated_did_hc3_matches_hand_computation() {
        let (x, y) = saturated();
        let fit = ols_hc3(&x, &y).unwrap();

        assert_abs_diff_eq!(fit.coefficients[0], 10.0, epsilon = 1e-10);
        assert_abs_diff_eq!(fit.coefficients[1], 0.0, epsilon = 1e-10);
        assert_abs_diff_eq!(fit.coefficients[2], 2.0, epsilon = 1e-10);
        assert_abs_diff_eq!(fit.coefficients[3], 3.0, epsilon = 1e-10);

        // h_ii = 1/3 in every cell, so each cell contributes Σe²/(n_c − 1)² = 2/4.
        for h in &fit.leverage {
            assert_abs_diff_eq!(*h, 1.0 / 3.0, epsilon = 1e-10);
        }
        assert_abs_diff_eq!(fit.se_hc3[0], 0.5_f64.sqrt(), epsilon = 1e-10);
        assert_abs_diff_eq!(fit.se_hc3[3], 2.0_f64.sqrt(), epsilon = 1e-10);

        // σ² = 8 / 8 = 1; Var(δ) = Σ 1/n_c = 4/3.
        assert_abs_diff_eq!(fit.se_ols[3], (4.0_f64 / 3.0).sqrt(), epsilon = 1e-10);
        assert_eq!(fit.df_resid(), 8);
        assert!(fit.r_squared > 0.0 && fit.r_squared < 1.0);
    }

    #[test]
    fn rank_deficient_rejected() {
        let (x, y) = saturated();
        // Duplicate `treated` into the interaction column.
        let mut x = x;
        for i in 0..x.nrows() {
            x[(i, 3)] = x[(i, 1)];
        }
        assert_eq!(design_rank(&x), 3);
        assert!(matches!(ols_hc3(&x, &y), Err(Error::Regression(_))));
    }

    #[test]
    fn too_few_rows_rejected() {
        let x = DMatrix::from_row_slice(2, 3, &[1.0, 0.0, 1.0, 1.0, 1.0, 0.0]);
        let y = DVector::from_vec(vec![1.0, 2.0]);
        let err = ols_hc3(&x, &y).unwrap_err();
        assert!(err.to_string().contains("2 observations for 3 design columns"), "{err}");
    }

    #[test]
    fn unit_leverage_rejected() {
        // One observation alone in the treated cell.
        let x = DMatrix::from_row_slice(4, 2, &[1.0, 0.0, 1.0, 0.0, 1.0, 0.0, 1.0, 1.0]);
        let y = DVector::from_vec(vec![1.0, 2.0, 3.0, 5.0]);
        let err = ols_hc3(&x, &y).unwrap_err();
        assert!(err.to_string().contains("leverage"), "{err}");
    }

    #[test]
    fn validation() {
        let x = DMatrix::<f64>::zeros(3, 0);
        assert!(ols_hc3(&x, &DVector::zeros(3)).is_err());
        let x = DMatrix::from_element(3, 1, 1.0);
        assert!(ols_hc3(&x, &DVector::zeros(2)).is_err());
    }
}
