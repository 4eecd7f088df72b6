//! 체비쇼프 중심과 FVA 범위
//!
//! 체비쇼프 LP: 변수 (x, r), r 은 자유변수
//!   maximize r  s.t.  A_i·x + r·||P·A_iᵀ|| <= b_i,  S·x = h
//! P 는 S 의 null space 로의 직교 투영이므로 공은 아핀 껍질 안에서 잽니다.

use log::{debug, info};
use nalgebra::{DMatrix, DVector};

use crate::core::error::{PolyRoundError, Result};
use crate::core::lp::{solve_indexed, LpBackend, LpProblem, LpStatus, Sense, SolverOptions};
use crate::core::polytope::Polytope;
use crate::core::reduction::constraint_removal::degenerate;
use crate::core::reduction::null_space;

/// 체비쇼프 계산용 null space 허용오차
const CHEBYSHEV_NULL_EPS: f64 = 1e-12;

/// 좌표별 최소/최대
#[derive(Debug, Clone, PartialEq)]
pub struct FvaBounds {
    pub lower: DVector<f64>,
    pub upper: DVector<f64>,
}

impl FvaBounds {
    /// 좌표별 폭 (upper − lower)
    pub fn widths(&self) -> DVector<f64> {
        &self.upper - &self.lower
    }

    /// 폭이 tol 이하인 (고정된) 좌표
    pub fn fixed_coordinates(&self, tol: f64) -> Vec<usize> {
        self.widths()
            .iter()
            .enumerate()
            .filter(|(_, w)| **w <= tol)
            .map(|(j, _)| j)
            .collect()
    }
}

pub struct ChebyshevFinder;

impl ChebyshevFinder {
    /// 최대 내접구의 중심과 반지름 `(x, r)`
    ///
    /// r <= 0 이면 실행 불가능하거나 부피가 0 입니다. 등식이 모든 좌표를 고정하면
    /// 유일한 점과 `r = min(0, slack)` 을 돌려줍니다. `regularize` 는 백엔드 옵션
    /// `regularize = true` 로 전달될 뿐 코어는 해석하지 않습니다.
    pub fn chebyshev_center(
        polytope: &Polytope,
        backend: &dyn LpBackend,
        regularize: bool,
        options: &SolverOptions,
    ) -> Result<(DVector<f64>, f64)> {
        let n = polytope.dimension();
        let options = if regularize {
            options.merged(&SolverOptions::new().set("regularize", true))
        } else {
            options.clone()
        };

        let basis = null_space(polytope.s(), CHEBYSHEV_NULL_EPS)?;
        if n == 0 || basis.ncols() == 0 {
            return Self::pinned_point(polytope);
        }

        // 아핀 껍질 안에서 잰 행 노름
        let m = polytope.num_inequalities();
        let projected = polytope.a() * &basis;
        let mut a_aug = DMatrix::zeros(m, n + 1);
        a_aug.columns_mut(0, n).copy_from(polytope.a());
        for i in 0..m {
            a_aug[(i, n)] = projected.row(i).norm();
        }
        let mut s_aug = DMatrix::zeros(polytope.num_equalities(), n + 1);
        s_aug.columns_mut(0, n).copy_from(polytope.s());

        let mut objective = DVector::zeros(n + 1);
        objective[n] = 1.0;
        let problem = LpProblem::new(
            Sense::Maximize,
            objective,
            &a_aug,
            polytope.b(),
            &s_aug,
            polytope.h(),
        );
        let solution = backend.solve(&problem, &options)?;
        if solution.status == LpStatus::Unbounded {
            return Err(degenerate(polytope, "유계가 아니어서 체비쇼프 공이 유한하지 않음"));
        }
        let solution = solution.require_optimal(backend.name(), "체비쇼프 중심")?;

        let x = solution.x.rows(0, n).into_owned();
        let r = solution.x[n];
        debug!("체비쇼프 중심: 차원 {}, 반지름 {:.6e}", n, r);
        Ok((x, r))
    }

    /// 등식이 점 하나로 고정한 경우: 최소제곱 해와 r = min(0, slack)
    fn pinned_point(polytope: &Polytope) -> Result<(DVector<f64>, f64)> {
        let n = polytope.dimension();
        let x = if polytope.num_equalities() == 0 || n == 0 {
            DVector::zeros(n)
        } else {
            polytope
                .s()
                .clone()
                .svd(true, true)
                .solve(polytope.h(), CHEBYSHEV_NULL_EPS)
                .map_err(|e| PolyRoundError::LinearAlgebra(e.to_string()))?
        };
        let slack = if polytope.num_inequalities() == 0 {
            0.0
        } else {
            polytope.border_distance(&x)?
        };
        info!("등식이 모든 좌표를 고정함 (차원 {})", n);
        Ok((x, slack.min(0.0)))
    }

    /// 좌표별 최소/최대 LP (2n 회, 서로 독립)
    ///
    /// 유계가 아닌 방향은 ±∞ 로 보고합니다.
    pub fn fva(
        polytope: &Polytope,
        backend: &dyn LpBackend,
        options: &SolverOptions,
        parallel: bool,
    ) -> Result<FvaBounds> {
        let n = polytope.dimension();
        let values = solve_indexed(2 * n, parallel, |task| {
            let j = task / 2;
            let sense = if task % 2 == 0 {
                Sense::Minimize
            } else {
                Sense::Maximize
            };
            let mut objective = DVector::zeros(n);
            objective[j] = 1.0;
            let problem = LpProblem::new(
                sense,
                objective,
                polytope.a(),
                polytope.b(),
                polytope.s(),
                polytope.h(),
            );
            let solution = backend.solve(&problem, options)?;
            match (solution.status, sense) {
                (LpStatus::Unbounded, Sense::Minimize) => Ok(f64::NEG_INFINITY),
                (LpStatus::Unbounded, Sense::Maximize) => Ok(f64::INFINITY),
                (LpStatus::Infeasible, _) => Err(degenerate(polytope, "실행 가능한 점이 없음")),
                _ => Ok(solution.require_optimal(backend.name(), "FVA")?.objective),
            }
        })?;

        Ok(FvaBounds {
            lower: DVector::from_fn(n, |j, _| values[2 * j]),
            upper: DVector::from_fn(n, |j, _| values[2 * j + 1]),
        })
    }
}
