//! 기하평균 행/열 스케일링
//!
//! 행과 열을 번갈아 |a_ij| 의 기하평균(최소·최대의 기하평균)으로 나눕니다.
//! 스케일된 행렬은 diag(1/row) · A · diag(1/col) 입니다.
//! 원래 행렬은 건드리지 않고 스케일 벡터만 돌려주므로 역변환이 쉽습니다.

use log::debug;
use nalgebra::{DMatrix, DVector};

use crate::core::error::{PolyRoundError, Result};

/// 이 값 이하의 원소는 0 으로 취급
const ZERO_ENTRY_TOL: f64 = 0.0;

/// 0이 아닌 원소들의 sqrt(min · max). 원소가 없으면 1
fn extreme_geometric_mean(values: impl Iterator<Item = f64>) -> f64 {
    let (lo, hi) = values
        .filter(|v| *v > ZERO_ENTRY_TOL)
        .fold((f64::INFINITY, 0.0_f64), |(lo, hi), v| (lo.min(v), hi.max(v)));
    if hi > 0.0 {
        (lo * hi).sqrt()
    } else {
        1.0
    }
}

/// 새 스케일 / 옛 스케일 비율의 (max / min) − 1
fn adjustment_spread(new: &DVector<f64>, old: &DVector<f64>) -> f64 {
    if new.is_empty() {
        return 0.0;
    }
    let ratios = new.component_div(old);
    ratios.max() / ratios.min() - 1.0
}

/// 반환값: (col_scale, row_scale)
///
/// 한 번의 패스에서 행 스케일과 열 스케일의 변화 폭이 각각 `row_tol`, `col_tol`
/// 아래로 내려가거나 `max_iterations` 패스를 다 쓰면 멈춥니다. 난수 없음.
pub fn geometric_mean_scaling(
    a: &DMatrix<f64>,
    row_tol: f64,
    col_tol: f64,
    max_iterations: usize,
) -> Result<(DVector<f64>, DVector<f64>)> {
    if a.iter().any(|v| !v.is_finite()) {
        return Err(PolyRoundError::LinearAlgebra(
            "스케일링 입력에 유한하지 않은 값이 있습니다".to_string(),
        ));
    }
    let (m, n) = a.shape();
    let abs = a.abs();
    let mut row_scale = DVector::from_element(m, 1.0);
    let mut col_scale = DVector::from_element(n, 1.0);

    for pass in 0..max_iterations {
        let new_rows = DVector::from_fn(m, |i, _| {
            extreme_geometric_mean((0..n).map(|j| abs[(i, j)] / col_scale[j]))
        });
        let new_cols = DVector::from_fn(n, |j, _| {
            extreme_geometric_mean((0..m).map(|i| abs[(i, j)] / new_rows[i]))
        });

        let row_spread = adjustment_spread(&new_rows, &row_scale);
        let col_spread = adjustment_spread(&new_cols, &col_scale);
        row_scale = new_rows;
        col_scale = new_cols;

        debug!(
            "기하평균 스케일링 패스 {}: 행 변화 {:.3e}, 열 변화 {:.3e}",
            pass, row_spread, col_spread
        );
        // 첫 패스는 항상 수행
        if pass > 0 && row_spread < row_tol && col_spread < col_tol {
            break;
        }
    }

    Ok((col_scale, row_scale))
}

/// diag(1/row) · A · diag(1/col)
pub fn apply_scaling(a: &DMatrix<f64>, col_scale: &DVector<f64>, row_scale: &DVector<f64>) -> Result<DMatrix<f64>> {
    PolyRoundError::check_dim("apply_scaling: col_scale", a.ncols(), col_scale.len())?;
    PolyRoundError::check_dim("apply_scaling: row_scale", a.nrows(), row_scale.len())?;
    Ok(DMatrix::from_fn(a.nrows(), a.ncols(), |i, j| {
        a[(i, j)] / (row_scale[i] * col_scale[j])
    }))
}

/// 0 이 아닌 원소의 max|a| / min|a|
pub fn dynamic_range(a: &DMatrix<f64>) -> f64 {
    let (lo, hi) = a
        .iter()
        .map(|v| v.abs())
        .filter(|v| *v > ZERO_ENTRY_TOL)
        .fold((f64::INFINITY, 0.0_f64), |(lo, hi), v| (lo.min(v), hi.max(v)));
    if hi > 0.0 {
        hi / lo
    } else {
        1.0
    }
}
