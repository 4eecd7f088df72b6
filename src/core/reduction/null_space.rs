//! SVD 기반 null space 직교 기저

use nalgebra::DMatrix;

use crate::core::error::{PolyRoundError, Result};

/// S 의 null space 직교 기저 (n × k, 열이 기저 벡터)
///
/// 얇은 SVD 는 행이 열보다 적으면 V 를 전부 주지 않으므로 0행을 덧대어
/// 정사각 이상으로 만든 뒤 분해합니다. 특이값이 `eps · max(1, σ_max)` 보다
/// 작은 방향을 null space 로 봅니다. S 가 0행이면 단위행렬을 돌려줍니다.
pub fn null_space(s: &DMatrix<f64>, eps: f64) -> Result<DMatrix<f64>> {
    let (m, n) = s.shape();
    if m == 0 {
        return Ok(DMatrix::identity(n, n));
    }
    if n == 0 {
        return Ok(DMatrix::zeros(0, 0));
    }
    if s.iter().any(|v| !v.is_finite()) {
        return Err(PolyRoundError::LinearAlgebra(
            "등식 행렬에 유한하지 않은 값이 있습니다".to_string(),
        ));
    }

    let mut padded = DMatrix::zeros(m.max(n), n);
    padded.rows_mut(0, m).copy_from(s);

    let svd = padded.svd(false, true);
    let v_t = svd
        .v_t
        .ok_or_else(|| PolyRoundError::LinearAlgebra("SVD V^T 가 계산되지 않음".to_string()))?;
    let sigma_max = svd.singular_values.max();
    let tol = eps * sigma_max.max(1.0);

    let null_idx: Vec<usize> = svd
        .singular_values
        .iter()
        .enumerate()
        .filter(|(_, sigma)| **sigma < tol)
        .map(|(i, _)| i)
        .collect();

    let mut basis = DMatrix::zeros(n, null_idx.len());
    for (k, &i) in null_idx.iter().enumerate() {
        basis.column_mut(k).copy_from(&v_t.row(i).transpose());
    }
    Ok(basis)
}

/// 수치 랭크 (같은 허용오차 기준)
pub fn numerical_rank(s: &DMatrix<f64>, eps: f64) -> Result<usize> {
    Ok(s.ncols() - null_space(s, eps)?.ncols())
}
