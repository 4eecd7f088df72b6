//! 최대 부피 내접 타원체 (primal-dual 내점법)
//!
//! `{x : A·x <= b}` 에 내접하는 `{x + E·u : ||u|| <= 1}` 중 부피가 최대인 것을 찾습니다.
//! 시작점 x0 는 엄밀한 내부점이어야 하며, 내부적으로 `b − A·x0 = 1` 이 되도록
//! 행을 스케일합니다. 반환하는 `E` 는 형상 행렬 E2 (= E·Eᵀ) 의 하삼각 Cholesky 인자입니다.

use log::{debug, warn};
use nalgebra::{DMatrix, DVector};

use crate::core::error::{PolyRoundError, Result};
use crate::core::math::get_nspd;
use crate::core::settings::MveConfig;

/// 반복 상태
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MveState {
    Initialized,
    Iterating,
    Converged,
    MaxIterReached,
    /// 뉴턴 시스템이 특이해져 더 진행할 수 없음 (마지막 반복값 반환)
    Failed,
    /// 반복 한도에서 형상 행렬이 발산함 (유계가 아닌 방향)
    Diverged,
}

/// 이보다 찌그러진 형상 행렬은 좌표 변환에 쓸 수 없음
pub const MAX_USABLE_RATIO: f64 = 1.0 / f64::EPSILON;

/// 형상 행렬에 유한하지 않은 값이 있거나 고유값 비율이 한계를 넘음
fn shape_diverged(e2: &DMatrix<f64>) -> bool {
    if e2.iter().any(|v| !v.is_finite()) {
        return true;
    }
    let eig = ((e2 + e2.transpose()) * 0.5).symmetric_eigen().eigenvalues;
    let lo = eig.min();
    lo <= 0.0 || eig.max() / lo > MAX_USABLE_RATIO
}

/// 타원체 `{center + factor·u : ||u|| <= 1}`
///
/// 수렴하지 않은 실행에서는 반복 중 내접 부피가 가장 컸던 타원체를 내접하도록
/// 줄인 것입니다.
#[derive(Debug, Clone)]
pub struct Ellipsoid {
    pub center: DVector<f64>,
    /// 대칭 양의 정부호 형상 행렬 E2
    pub shape: DMatrix<f64>,
    /// E2 의 하삼각 Cholesky 인자
    pub factor: DMatrix<f64>,
}

impl Ellipsoid {
    /// log det(factor) = ½ log det(E2)
    pub fn log_volume(&self) -> f64 {
        self.factor.diagonal().iter().map(|d| d.abs().ln()).sum()
    }

    /// λmax(E2) / λmin(E2)
    pub fn eigen_ratio(&self) -> f64 {
        let eig = self.shape.clone().symmetric_eigen().eigenvalues;
        let lo = eig.min();
        if lo <= 0.0 {
            return f64::INFINITY;
        }
        eig.max() / lo
    }
}

#[derive(Debug, Clone)]
pub struct MveOutcome {
    pub ellipsoid: Ellipsoid,
    pub converged: bool,
    pub state: MveState,
    pub iterations: usize,
    /// 반복별 지금까지 가장 큰 내접 log-부피 (비감소)
    ///
    /// 수렴하지 않았을 때 돌려주는 타원체의 `log_volume()` 은 마지막 값과 같습니다.
    pub log_volume_trace: Vec<f64>,
    /// 마지막 잔차
    pub residual: f64,
}

/// `tolerance` 만 바꾼 기본 설정으로 실행
pub fn run_mve(
    a: &DMatrix<f64>,
    b: &DVector<f64>,
    x0: &DVector<f64>,
    tolerance: f64,
) -> Result<MveOutcome> {
    let config = MveConfig {
        tolerance,
        ..MveConfig::default()
    };
    run_mve_with(a, b, x0, &config)
}

fn lu_solve(m: &DMatrix<f64>, rhs: &DMatrix<f64>) -> Option<DMatrix<f64>> {
    m.clone().lu().solve(rhs)
}

/// A'·diag(y)·A 의 역행렬 (E2)
fn shape_from_duals(a: &DMatrix<f64>, y: &DVector<f64>) -> Option<DMatrix<f64>> {
    let mut ya = a.clone();
    for (i, mut row) in ya.row_iter_mut().enumerate() {
        row *= y[i];
    }
    let gram = a.transpose() * ya;
    let gram = (&gram + gram.transpose()) * 0.5;
    match gram.clone().cholesky() {
        Some(chol) => Some(chol.inverse()),
        None => gram.try_inverse(),
    }
}

/// 벡터 원소 중 최소 (비어 있으면 +∞)
fn min_entry(v: impl Iterator<Item = f64>) -> f64 {
    v.fold(f64::INFINITY, f64::min)
}

pub fn run_mve_with(
    a: &DMatrix<f64>,
    b: &DVector<f64>,
    x0: &DVector<f64>,
    config: &MveConfig,
) -> Result<MveOutcome> {
    let (m, n) = a.shape();
    PolyRoundError::check_dim("run_mve: len(b)", m, b.len())?;
    PolyRoundError::check_dim("run_mve: len(x0)", n, x0.len())?;
    if n == 0 || m <= n {
        return Err(PolyRoundError::RoundingFailed {
            dimension: n,
            reason: format!("부등식 {}개로는 {}차원 유계 영역을 만들 수 없음", m, n),
        });
    }

    let bmax0 = b - a * x0;
    if bmax0.iter().any(|&v| !(v > 0.0)) {
        return Err(PolyRoundError::RoundingFailed {
            dimension: n,
            reason: "시작점이 엄밀한 내부점이 아님".to_string(),
        });
    }

    // b − A·x0 = 1 이 되도록 행 스케일, x 는 x0 기준 상대 좌표
    let mut a = a.clone();
    for (i, mut row) in a.row_iter_mut().enumerate() {
        row /= bmax0[i];
    }
    let a = a;
    let bnrm = (m as f64).sqrt();

    let mut x = DVector::<f64>::zeros(n);
    let mut y = DVector::<f64>::from_element(m, 1.0);
    let mut z = DVector::<f64>::zeros(m);
    let mut bmax = DVector::<f64>::from_element(m, 1.0);
    let mut adx = DVector::<f64>::zeros(m);
    let mut astep = 0.0;

    let mut state = MveState::Initialized;
    let mut trace = Vec::new();
    let mut best_log_volume = f64::NEG_INFINITY;
    // 지금까지 가장 큰 내접 타원체 (x0 기준 중심, 축소된 E2)
    let mut best: Option<(DVector<f64>, DMatrix<f64>)> = None;
    let mut residual = f64::INFINITY;
    let mut e2 = DMatrix::<f64>::identity(n, n);
    let mut iterations = 0;

    for iter in 0..config.max_iterations {
        iterations = iter + 1;
        if iter > 0 {
            bmax -= &adx * astep;
        }
        state = MveState::Iterating;

        let shape = match shape_from_duals(&a, &y) {
            Some(shape) => shape,
            None => {
                warn!("MVE: A'YA 가 특이함 (반복 {})", iter);
                state = MveState::Failed;
                break;
            }
        };
        e2 = shape;

        let mut q = &a * &e2 * a.transpose();
        let mut h = DVector::from_fn(m, |i, _| q[(i, i)].max(0.0).sqrt());

        if iter == 0 {
            let t = min_entry((0..m).map(|i| bmax[i] / h[i]));
            y /= t * t;
            h *= t;
            z = DVector::from_fn(m, |i, _| (bmax[i] - h[i]).max(0.1));
            q *= t * t;
            e2 *= t * t;
        }

        // 현재 타원체를 내접하도록 줄였을 때의 log-부피
        let inscribed_t = min_entry((0..m).map(|i| bmax[i] / h[i])).min(1.0);
        if let Some(chol) = e2.clone().cholesky() {
            let log_vol: f64 = chol.l().diagonal().iter().map(|d| d.ln()).sum::<f64>()
                + n as f64 * inscribed_t.ln();
            if log_vol.is_finite() && log_vol > best_log_volume {
                best_log_volume = log_vol;
                best = Some((x.clone(), &e2 * (inscribed_t * inscribed_t)));
            }
        }
        trace.push(best_log_volume);

        let yz = y.component_mul(&z);
        let yh = y.component_mul(&h);
        let gap = yz.sum() / m as f64;
        let rmu = (gap.min(0.5) * gap).max(config.min_mu);

        let r1 = -(a.transpose() * &yh);
        let r2 = &bmax - &h - &z;
        let r3 = DVector::from_fn(m, |i, _| rmu - yz[i]);
        residual = r1.amax().max(r2.amax()).max(r3.amax());

        debug!(
            "MVE 반복 {}: 잔차 {:.3e}, gap {:.3e}, log-부피 {:.6}",
            iter, residual, gap, best_log_volume
        );

        if residual < config.tolerance * (1.0 + bnrm) && rmu <= config.min_mu {
            state = MveState::Converged;
            break;
        }

        // 뉴턴 방향
        let mut yq = q.clone();
        for (i, mut row) in yq.row_iter_mut().enumerate() {
            row *= y[i];
        }
        let yqqy = yq.component_mul(&yq.transpose());
        let y2h = &yh * 2.0;
        let mut ya = a.clone();
        for (i, mut row) in ya.row_iter_mut().enumerate() {
            row *= y[i];
        }

        let mut g = yqqy;
        for i in 0..m {
            g[(i, i)] += (y2h[i] * z[i]).max(config.regularization);
        }

        let mut hz_ya = ya.clone();
        for (i, mut row) in hz_ya.row_iter_mut().enumerate() {
            row *= h[i] + z[i];
        }
        let t_mat = match lu_solve(&g, &hz_ya) {
            Some(t) => t,
            None => {
                warn!("MVE: G 가 특이함 (반복 {})", iter);
                state = MveState::Failed;
                break;
            }
        };

        let mut y2h_t = t_mat;
        for (i, mut row) in y2h_t.row_iter_mut().enumerate() {
            row *= y2h[i];
        }
        let atp = (y2h_t - &ya).transpose();

        let r3dy = r3.component_div(&y);
        let r23 = &r2 - &r3dy;
        let lhs = &atp * &a;
        let rhs = &r1 + &atp * &r23;
        let dx = match lu_solve(&lhs, &DMatrix::from_column_slice(n, 1, rhs.as_slice())) {
            Some(dx) => dx.column(0).into_owned(),
            None => {
                warn!("MVE: 정규 방정식이 특이함 (반복 {})", iter);
                state = MveState::Failed;
                break;
            }
        };

        adx = &a * &dx;
        let dydy_rhs = DVector::from_fn(m, |i, _| y2h[i] * (adx[i] - r23[i]));
        let dydy = match lu_solve(&g, &DMatrix::from_column_slice(m, 1, dydy_rhs.as_slice())) {
            Some(v) => v.column(0).into_owned(),
            None => {
                state = MveState::Failed;
                break;
            }
        };
        let dy = y.component_mul(&dydy);
        let dz = &r3dy - z.component_mul(&dydy);

        // 경계까지의 최대 보폭
        let ax = -1.0 / min_entry((0..m).map(|i| -adx[i] / bmax[i])).min(-0.5);
        let ay = -1.0 / min_entry(dydy.iter().cloned()).min(-0.5);
        let az = -1.0 / min_entry((0..m).map(|i| dz[i] / z[i])).min(-0.5);
        let tau = config.step_fraction.max(1.0 - residual);
        astep = tau * 1.0_f64.min(ax).min(ay).min(az);

        x += &dx * astep;
        y += &dy * astep;
        z += &dz * astep;
    }

    if state == MveState::Iterating {
        state = MveState::MaxIterReached;
    }
    if state == MveState::MaxIterReached && shape_diverged(&e2) {
        state = MveState::Diverged;
    }
    let converged = state == MveState::Converged;
    if !converged {
        warn!("MVE 미수렴: 상태 {:?}, 반복 {}, 잔차 {:.3e}", state, iterations, residual);
    }

    // 수렴하지 않았으면 마지막 반복값 대신 추적한 최선의 내접 타원체
    let (x, e2) = match best {
        Some(best) if !converged => best,
        _ => (x, e2),
    };
    if e2.iter().any(|v| !v.is_finite()) {
        return Err(PolyRoundError::RoundingFailed {
            dimension: n,
            reason: format!("형상 행렬이 유한하지 않음 (상태 {:?})", state),
        });
    }
    let shape = get_nspd(&e2)?;
    let factor = shape
        .clone()
        .cholesky()
        .map(|c| c.l())
        .ok_or_else(|| PolyRoundError::RoundingFailed {
            dimension: n,
            reason: "NSPD 보정 후에도 Cholesky 분해 실패".to_string(),
        })?;

    Ok(MveOutcome {
        ellipsoid: Ellipsoid {
            center: x + x0,
            shape,
            factor,
        },
        converged,
        state,
        iterations,
        log_volume_trace: trace,
        residual,
    })
}
