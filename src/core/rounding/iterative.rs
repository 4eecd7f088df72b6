//! 반복 라운딩
//!
//! 원점을 시작점으로 MVE 를 구하고, 타원체 중심으로 이동한 뒤 Cholesky 인자로
//! 좌표를 바꿉니다. 타원체가 충분히 둥글어질 때까지 반복합니다.

use log::{debug, info, warn};
use nalgebra::{DMatrix, DVector};

use super::mve::{run_mve_with, MveOutcome, MveState, MAX_USABLE_RATIO};
use crate::core::error::{PolyRoundError, Result};
use crate::core::math::{dynamic_range, geometric_mean_scaling};
use crate::core::polytope::Polytope;
use crate::core::settings::{MveConfig, PolyRoundSettings};

/// 라운딩 결과 요약
#[derive(Debug, Clone, PartialEq)]
pub struct RoundingReport {
    pub outer_iterations: usize,
    /// 마지막 MVE 가 수렴했고 비율 기준을 만족했는지
    pub converged: bool,
    /// 마지막 타원체의 λmax/λmin
    pub roundness_ratio: f64,
    /// 외부 반복별 비율
    pub ratio_history: Vec<f64>,
    /// 기하평균 스케일링 적용 여부
    pub scaled: bool,
}

/// MVE 결과를 좌표 변환에 쓸 수 있는지 확인하고 λmax/λmin 을 돌려줌
///
/// 유계가 아닌 방향이 있으면 형상 행렬이 발산해 여기서 걸립니다.
fn usable_ratio(outcome: &MveOutcome, polytope: &Polytope) -> Result<f64> {
    let failed = |reason: String| PolyRoundError::RoundingFailed {
        dimension: polytope.dimension(),
        reason: format!("{} (부등식 {}개)", reason, polytope.num_inequalities()),
    };
    match outcome.state {
        MveState::Failed => {
            return Err(failed(format!(
                "MVE 뉴턴 시스템이 특이해짐 (반복 {})",
                outcome.iterations
            )))
        }
        MveState::Diverged => {
            return Err(failed(format!(
                "MVE 형상 행렬이 발산함 (반복 {}, 유계가 아닌 폴리토프?)",
                outcome.iterations
            )))
        }
        _ => {}
    }
    let e = &outcome.ellipsoid;
    if e.center
        .iter()
        .chain(e.shape.iter())
        .chain(e.factor.iter())
        .any(|v| !v.is_finite())
    {
        return Err(failed("타원체에 유한하지 않은 값이 있음".to_string()));
    }
    let ratio = e.eigen_ratio();
    if !ratio.is_finite() || ratio > MAX_USABLE_RATIO {
        return Err(failed(format!(
            "타원체 고유값 비율 {:.3e} 로는 좌표를 바꿀 수 없음 (유계가 아닌 폴리토프?)",
            ratio
        )));
    }
    Ok(ratio)
}

/// 기하평균 스케일링을 폴리토프에 반영: 열은 좌표 변환, 행은 행 나눗셈
fn scale_polytope(polytope: &mut Polytope, settings: &PolyRoundSettings) -> Result<()> {
    let cfg = &settings.rounding;
    let before = dynamic_range(polytope.a());
    let (col_scale, row_scale) = geometric_mean_scaling(
        polytope.a(),
        cfg.scaling_row_tol,
        cfg.scaling_col_tol,
        cfg.scaling_max_iterations,
    )?;
    let inv_cols = DMatrix::from_diagonal(&col_scale.map(|c| 1.0 / c));
    polytope.apply_transformation(&inv_cols)?;
    polytope.scale_rows(&row_scale)?;
    debug!(
        "기하평균 스케일링: 동적 범위 {:.3e} → {:.3e}",
        before,
        dynamic_range(polytope.a())
    );
    Ok(())
}

/// 부등식만 있는 폴리토프를 제자리에서 둥글게 만듦
///
/// 원점은 엄밀한 내부점이어야 합니다. 외부 반복 한도에 도달해도 오류가 아니며
/// `converged = false` 로 보고합니다. 타원체를 쓸 수 없으면 `RoundingFailed` 이고
/// 이때 폴리토프는 바뀌지 않습니다.
pub fn iterative_solve(polytope: &mut Polytope, settings: &PolyRoundSettings) -> Result<RoundingReport> {
    let mut work = polytope.clone();
    let report = round_in_place(&mut work, settings)?;
    *polytope = work;
    Ok(report)
}

fn round_in_place(polytope: &mut Polytope, settings: &PolyRoundSettings) -> Result<RoundingReport> {
    let n = polytope.dimension();
    if !polytope.inequality_only() {
        return Err(PolyRoundError::RoundingFailed {
            dimension: n,
            reason: "등식이 남아 있는 폴리토프는 라운딩할 수 없음".to_string(),
        });
    }

    let cfg = &settings.rounding;
    let scaled = cfg.geometric_scaling && polytope.num_inequalities() > 0;
    if scaled {
        scale_polytope(polytope, settings)?;
    }

    let mut mve: MveConfig = settings.mve.clone();
    let mut report = RoundingReport {
        outer_iterations: 0,
        converged: false,
        roundness_ratio: f64::INFINITY,
        ratio_history: Vec::new(),
        scaled,
    };

    for outer in 0..cfg.max_outer_iterations {
        let x0 = DVector::zeros(n);
        let outcome = run_mve_with(polytope.a(), polytope.b(), &x0, &mve)?;
        let ratio = usable_ratio(&outcome, polytope)?;
        let MveOutcome {
            ellipsoid,
            converged,
            iterations,
            ..
        } = outcome;

        report.outer_iterations = outer + 1;
        report.roundness_ratio = ratio;
        report.ratio_history.push(ratio);
        debug!(
            "라운딩 반복 {}: MVE 반복 {}, 수렴 {}, 비율 {:.4}, 정규화 {:.1e}",
            outer, iterations, converged, ratio, mve.regularization
        );

        polytope.apply_shift(&ellipsoid.center)?;
        polytope.apply_transformation(&ellipsoid.factor)?;
        polytope.normalize();

        if converged && ratio <= cfg.roundness_ratio {
            report.converged = true;
            break;
        }
        mve.regularization = (mve.regularization / 10.0).max(cfg.min_regularization);
    }

    let summary = format!(
        "라운딩: 차원 {}, 외부 반복 {}, 비율 {:.4}",
        n, report.outer_iterations, report.roundness_ratio
    );
    if !report.converged {
        warn!("{} (기준 미달)", summary);
    } else if settings.verbose {
        info!("{}", summary);
    } else {
        debug!("{}", summary);
    }
    Ok(report)
}
