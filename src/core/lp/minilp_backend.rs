//! minilp 기반 기본 LP 백엔드
//!
//! 인식하는 옵션: `time_limit` (초). 그 외 키는 무시합니다.

use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use log::{debug, trace};
use minilp::{ComparisonOp, LinearExpr, OptimizationDirection, Problem};
use nalgebra::{DMatrix, DVector};

use super::backend::{LpBackend, LpProblem, LpSolution, LpStatus, Sense, SolverOptions};
use crate::core::error::{PolyRoundError, Result};

/// 계수 0 판정 및 0행 실행가능성 판정 허용오차
const COEFF_EPS: f64 = 1e-14;

#[derive(Debug, Clone, Copy, Default)]
pub struct MinilpBackend;

impl MinilpBackend {
    pub const NAME: &'static str = "minilp";

    pub fn new() -> Self {
        Self
    }
}

/// 스레드로 넘길 수 있는 소유 사본
struct OwnedProblem {
    sense: Sense,
    objective: DVector<f64>,
    a: DMatrix<f64>,
    b: DVector<f64>,
    s: DMatrix<f64>,
    h: DVector<f64>,
    bounds: Option<Vec<(f64, f64)>>,
}

impl OwnedProblem {
    fn from_problem(problem: &LpProblem<'_>) -> Self {
        Self {
            sense: problem.sense,
            objective: problem.objective.clone(),
            a: problem.a.clone(),
            b: problem.b.clone(),
            s: problem.s.clone(),
            h: problem.h.clone(),
            bounds: problem.bounds.clone(),
        }
    }

    fn borrow(&self) -> LpProblem<'_> {
        LpProblem {
            sense: self.sense,
            objective: self.objective.clone(),
            a: &self.a,
            b: &self.b,
            s: &self.s,
            h: &self.h,
            bounds: self.bounds.clone(),
        }
    }
}

fn row_expr(vars: &[minilp::Variable], m: &DMatrix<f64>, i: usize) -> Option<LinearExpr> {
    let mut expr = LinearExpr::empty();
    let mut any = false;
    for (j, &var) in vars.iter().enumerate() {
        let c = m[(i, j)];
        if c.abs() > COEFF_EPS {
            expr.add(var, c);
            any = true;
        }
    }
    if any {
        Some(expr)
    } else {
        None
    }
}

/// 현재 스레드에서 바로 풀이
fn solve_now(problem: &LpProblem<'_>) -> LpSolution {
    let direction = match problem.sense {
        Sense::Maximize => OptimizationDirection::Maximize,
        Sense::Minimize => OptimizationDirection::Minimize,
    };
    let mut lp = Problem::new(direction);

    let vars: Vec<minilp::Variable> = (0..problem.num_vars())
        .map(|j| {
            let bounds = problem
                .bounds
                .as_ref()
                .map(|b| b[j])
                .unwrap_or((f64::NEG_INFINITY, f64::INFINITY));
            lp.add_var(problem.objective[j], bounds)
        })
        .collect();

    for i in 0..problem.a.nrows() {
        match row_expr(&vars, problem.a, i) {
            Some(expr) => lp.add_constraint(expr, ComparisonOp::Le, problem.b[i]),
            // 0·x <= b_i
            None if problem.b[i] < -COEFF_EPS => {
                return LpSolution::with_status(LpStatus::Infeasible)
            }
            None => {}
        }
    }
    for i in 0..problem.s.nrows() {
        match row_expr(&vars, problem.s, i) {
            Some(expr) => lp.add_constraint(expr, ComparisonOp::Eq, problem.h[i]),
            None if problem.h[i].abs() > COEFF_EPS => {
                return LpSolution::with_status(LpStatus::Infeasible)
            }
            None => {}
        }
    }

    match lp.solve() {
        Ok(solution) => {
            let x = DVector::from_iterator(vars.len(), vars.iter().map(|&v| solution[v]));
            LpSolution::optimal(x, solution.objective())
        }
        Err(minilp::Error::Infeasible) => LpSolution::with_status(LpStatus::Infeasible),
        Err(minilp::Error::Unbounded) => LpSolution::with_status(LpStatus::Unbounded),
        #[allow(unreachable_patterns)]
        Err(other) => {
            debug!("minilp 실패: {:?}", other);
            LpSolution::with_status(LpStatus::Error)
        }
    }
}

impl LpBackend for MinilpBackend {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn solve(&self, problem: &LpProblem<'_>, options: &SolverOptions) -> Result<LpSolution> {
        problem.validate()?;
        trace!(
            "minilp: 변수 {}개, 부등식 {}개, 등식 {}개",
            problem.num_vars(),
            problem.a.nrows(),
            problem.s.nrows()
        );

        let limit = match options.get_f64("time_limit") {
            Some(secs) if secs > 0.0 && secs.is_finite() => Duration::from_secs_f64(secs),
            _ => return Ok(solve_now(problem)),
        };

        // 시간 제한이 있으면 작업 스레드에서 풀고 기한까지 기다림
        let owned = OwnedProblem::from_problem(problem);
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let solution = solve_now(&owned.borrow());
            let _ = tx.send(solution);
        });

        match rx.recv_timeout(limit) {
            Ok(solution) => Ok(solution),
            Err(mpsc::RecvTimeoutError::Timeout) => Err(PolyRoundError::BackendTimeout {
                backend: Self::NAME.to_string(),
                limit,
            }),
            Err(mpsc::RecvTimeoutError::Disconnected) => Err(PolyRoundError::Backend {
                backend: Self::NAME.to_string(),
                status: LpStatus::Error,
                message: "풀이 스레드가 결과 없이 종료됨".to_string(),
            }),
        }
    }
}
