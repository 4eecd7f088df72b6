//! 중복 부등식 제거와 숨은 등식 승격
//!
//! 각 행 i 에 대해 (정규화된 행 기준)
//! - 전체 시스템에서 최대 slack `b_i − min A_i·x` 가 `thresh` 미만이면 등식으로 승격
//! - 그렇지 않고 b_i 를 1 만큼 완화한 시스템에서 `max A_i·x < b_i + thresh` 이면 중복
//!
//! 행별 LP 는 서로 독립이라 병렬로 선별하고, 중복 후보는 행 순서대로 현재
//! 시스템에 대해 다시 확인합니다. 같은 행이 두 번 있어도 하나는 남습니다.

use log::{debug, info};
use nalgebra::{DMatrix, DVector};

use super::null_space::{null_space, numerical_rank};
use crate::core::error::{PolyRoundError, Result};
use crate::core::lp::{solve_indexed, LpBackend, LpProblem, LpStatus, Sense, SolverOptions};
use crate::core::polytope::{Polytope, ZERO_ROW_TOL};
use crate::core::settings::PolyRoundSettings;

/// 중복 판정 LP 에서 대상 행을 완화하는 양
const RELAXATION: f64 = 1.0;

/// 축소 결과 장부 (입력 폴리토프의 행 인덱스)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReductionReport {
    /// 중복으로 제거된 행
    pub removed: Vec<usize>,
    /// 등식으로 승격된 행
    pub refunctioned: Vec<usize>,
}

impl ReductionReport {
    pub fn is_unchanged(&self) -> bool {
        self.removed.is_empty() && self.refunctioned.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RowClass {
    /// ||A_i|| ≈ 0 이고 b_i >= 0
    Trivial,
    Equality,
    RedundantCandidate,
    Keep,
}

pub(crate) fn degenerate(p: &Polytope, reason: impl Into<String>) -> PolyRoundError {
    PolyRoundError::DegeneratePolytope {
        dimension: p.dimension(),
        inequalities: p.num_inequalities(),
        equalities: p.num_equalities(),
        reason: reason.into(),
    }
}

/// 0행 제거. 0·x <= b_i (b_i < 0) 이면 실행 불가능
pub fn remove_zero_rows(p: &Polytope, thresh: f64) -> Result<(Polytope, Vec<usize>)> {
    let mut keep = Vec::with_capacity(p.num_inequalities());
    let mut removed = Vec::new();
    for i in 0..p.num_inequalities() {
        if p.a().row(i).norm() > ZERO_ROW_TOL {
            keep.push(i);
        } else if p.b()[i] >= -thresh {
            removed.push(i);
        } else {
            return Err(degenerate(p, format!("0행 {} 의 우변이 음수 ({})", i, p.b()[i])));
        }
    }
    Ok((p.select_inequalities(&keep), removed))
}

/// 주어진 활성 행 집합에 대해 A_i·x 의 최대값 (b_i 완화). None 이면 unbounded
fn relaxed_max(
    p: &Polytope,
    active: &[usize],
    row: usize,
    backend: &dyn LpBackend,
    options: &SolverOptions,
) -> Result<Option<f64>> {
    let a: DMatrix<f64> = p.a().select_rows(active.iter());
    let b = DVector::from_iterator(
        active.len(),
        active.iter().map(|&k| {
            if k == row {
                p.b()[k] + RELAXATION
            } else {
                p.b()[k]
            }
        }),
    );
    let objective = p.a().row(row).transpose();
    let problem = LpProblem::new(Sense::Maximize, objective, &a, &b, p.s(), p.h());
    let solution = backend.solve(&problem, options)?;
    match solution.status {
        LpStatus::Unbounded => Ok(None),
        _ => {
            let solution = solution.require_optimal(backend.name(), "완화된 행 최대화")?;
            Ok(Some(solution.objective))
        }
    }
}

/// 전체 시스템에서 행 i 의 최대 slack. None 이면 unbounded (+∞)
fn max_slack(
    p: &Polytope,
    row: usize,
    backend: &dyn LpBackend,
    options: &SolverOptions,
) -> Result<Option<f64>> {
    let objective = p.a().row(row).transpose();
    let problem = LpProblem::new(Sense::Minimize, objective, p.a(), p.b(), p.s(), p.h());
    let solution = backend.solve(&problem, options)?;
    match solution.status {
        LpStatus::Unbounded => Ok(None),
        LpStatus::Infeasible => Err(degenerate(p, "실행 가능한 점이 없음")),
        _ => {
            let solution = solution.require_optimal(backend.name(), "행 최소화")?;
            Ok(Some(p.b()[row] - solution.objective))
        }
    }
}

fn classify_row(
    p: &Polytope,
    row: usize,
    thresh: f64,
    backend: &dyn LpBackend,
    options: &SolverOptions,
) -> Result<RowClass> {
    if p.a().row(row).norm() <= ZERO_ROW_TOL {
        return Ok(RowClass::Trivial);
    }
    let slack = max_slack(p, row, backend, options)?;
    if matches!(slack, Some(s) if s < thresh) {
        return Ok(RowClass::Equality);
    }

    let all: Vec<usize> = (0..p.num_inequalities()).collect();
    let class = match relaxed_max(p, &all, row, backend, options)? {
        Some(max) if max - p.b()[row] < thresh => RowClass::RedundantCandidate,
        _ => RowClass::Keep,
    };
    debug!("행 {}: 최대 slack {:?}, 분류 {:?}", row, slack, class);
    Ok(class)
}

/// 등식 시스템의 랭크를 늘리는 승격 후보만 순서대로 고름
///
/// `x <= c` 와 `-x <= -c` 처럼 짝으로 나오는 숨은 등식은 하나만 등식이 됩니다.
fn independent_rows(p: &Polytope, candidates: &[usize], eps: f64) -> Result<Vec<usize>> {
    let mut stack = p.s().clone();
    let mut rank = numerical_rank(&stack, eps)?;
    let mut chosen = Vec::with_capacity(candidates.len());
    for &i in candidates {
        let row = stack.nrows();
        let mut grown = stack.clone().insert_row(row, 0.0);
        grown.row_mut(row).copy_from(&p.a().row(i));
        let grown_rank = numerical_rank(&grown, eps)?;
        if grown_rank > rank {
            chosen.push(i);
            stack = grown;
            rank = grown_rank;
        } else {
            debug!("행 {} 은 기존 등식에 종속되어 승격하지 않음", i);
        }
    }
    Ok(chosen)
}

/// 중복 부등식 제거 + 숨은 등식 승격
///
/// 반환되는 폴리토프는 행이 정규화되어 있고 입력과 같은 영역을 나타냅니다.
pub fn constraint_removal(
    polytope: &Polytope,
    backend: &dyn LpBackend,
    settings: &PolyRoundSettings,
) -> Result<(Polytope, ReductionReport)> {
    let thresh = settings.thresh;
    let options = settings.effective_solver_options();

    let mut work = polytope.clone();
    work.normalize();
    let m = work.num_inequalities();

    // 0행은 LP 없이 처리
    for i in 0..m {
        if work.a().row(i).norm() <= ZERO_ROW_TOL && work.b()[i] < -thresh {
            return Err(degenerate(&work, format!("0행 {} 의 우변이 음수", i)));
        }
    }

    let classes = solve_indexed(m, settings.parallel, |i| {
        classify_row(&work, i, thresh, backend, &options)
    })?;

    let mut report = ReductionReport::default();
    let mut removed = vec![false; m];
    for (i, class) in classes.iter().enumerate() {
        match class {
            RowClass::Trivial => {
                removed[i] = true;
                report.removed.push(i);
            }
            RowClass::Equality => report.refunctioned.push(i),
            _ => {}
        }
    }

    // 중복 후보 순차 확인: 먼저 제거된 행이 빠진 시스템에 대해 다시 풀기
    let mut any_lp_removal = false;
    for i in 0..m {
        if classes[i] != RowClass::RedundantCandidate {
            continue;
        }
        let still_redundant = if !any_lp_removal {
            true
        } else {
            let active: Vec<usize> = (0..m).filter(|&k| !removed[k]).collect();
            matches!(
                relaxed_max(&work, &active, i, backend, &options)?,
                Some(max) if max - work.b()[i] < thresh
            )
        };
        if still_redundant {
            removed[i] = true;
            any_lp_removal = true;
            report.removed.push(i);
        }
    }
    report.removed.sort_unstable();

    let keep: Vec<usize> = (0..m)
        .filter(|&i| !removed[i] && classes[i] != RowClass::Equality)
        .collect();
    let promote = independent_rows(&work, &report.refunctioned, settings.null_space_eps)?;
    let reduced = work.restructure(&keep, &promote);

    let summary = format!(
        "제약 축소: 부등식 {} → {} (중복 제거 {}, 등식 승격 {}), 등식 {}개",
        m,
        reduced.num_inequalities(),
        report.removed.len(),
        report.refunctioned.len(),
        reduced.num_equalities()
    );
    if settings.verbose {
        info!("{}", summary);
    } else {
        debug!("{}", summary);
    }

    Ok((reduced, report))
}

/// 남은 자유도 = 등식 null space 차원
pub fn degrees_of_freedom(p: &Polytope, eps: f64) -> Result<usize> {
    Ok(null_space(p.s(), eps)?.ncols())
}
