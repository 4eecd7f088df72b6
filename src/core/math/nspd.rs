//! 가장 가까운 대칭 양의 정부호 행렬 (NSPD)
//!
//! 부동소수점 오차로 고유값이 약간 음수가 된 대칭 행렬을 Frobenius 노름 기준으로
//! 가장 가까운 양의 정부호 행렬로 되돌립니다. 결과는 항상 Cholesky 분해가 됩니다.

use log::debug;
use nalgebra::DMatrix;

use crate::core::error::{PolyRoundError, Result};

/// 대각 보정 루프 최대 횟수
const MAX_REPAIR_STEPS: usize = 100;

/// Cholesky 분해 가능 여부
pub fn is_positive_definite(m: &DMatrix<f64>) -> bool {
    m.is_square() && m.iter().all(|v| v.is_finite()) && m.clone().cholesky().is_some()
}

/// x 근처의 부동소수점 간격
fn spacing(x: f64) -> f64 {
    (x.abs() * f64::EPSILON).max(f64::MIN_POSITIVE)
}

pub fn get_nspd(m: &DMatrix<f64>) -> Result<DMatrix<f64>> {
    if !m.is_square() {
        return Err(PolyRoundError::DimensionMismatch {
            context: "get_nspd: 정사각 행렬이어야 함",
            expected: m.nrows(),
            found: m.ncols(),
        });
    }
    if m.iter().any(|v| !v.is_finite()) {
        return Err(PolyRoundError::LinearAlgebra(
            "NSPD 입력에 유한하지 않은 값이 있습니다".to_string(),
        ));
    }
    let n = m.nrows();
    if n == 0 {
        return Ok(m.clone());
    }

    let sym = (m + m.transpose()) * 0.5;
    if is_positive_definite(&sym) {
        return Ok(sym);
    }

    // 음수/0 근처 고유값을 작은 양수로 끌어올린 뒤 재구성
    let mut eig = sym.symmetric_eigen();
    let scale = eig.eigenvalues.amax().max(f64::MIN_POSITIVE);
    let floor = spacing(m.norm()).max(f64::EPSILON * scale);
    for lambda in eig.eigenvalues.iter_mut() {
        if *lambda < floor {
            *lambda = floor;
        }
    }
    let recomposed = eig.recompose();
    let mut repaired = (&recomposed + recomposed.transpose()) * 0.5;

    // 재구성 오차로 여전히 실패하면 대각을 점점 크게 보정
    let identity = DMatrix::<f64>::identity(n, n);
    let mut k = 1usize;
    while !is_positive_definite(&repaired) {
        if k > MAX_REPAIR_STEPS {
            return Err(PolyRoundError::LinearAlgebra(format!(
                "NSPD 보정이 {}회 안에 끝나지 않았습니다",
                MAX_REPAIR_STEPS
            )));
        }
        let min_eig = repaired.clone().symmetric_eigen().eigenvalues.min();
        let k2 = (k * k) as f64;
        let bump = (-min_eig).max(0.0) * k2 + spacing(m.norm()).max(floor) * k2;
        repaired += &identity * bump;
        k += 1;
    }
    debug!("NSPD 보정 완료 (차원 {}, 대각 보정 {}회)", n, k - 1);
    Ok(repaired)
}
