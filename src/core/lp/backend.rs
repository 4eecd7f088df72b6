//! LP 백엔드 인터페이스
//!
//! 코어는 LP 를 블랙박스로 취급합니다: 목적함수, `A·x <= b`, `S·x = h` 를 넘기고
//! 해 벡터와 상태만 돌려받습니다. 옵션은 해석하지 않고 그대로 전달합니다.

use std::collections::BTreeMap;

use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::error::{PolyRoundError, Result};

/// LP 풀이 상태
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LpStatus {
    Optimal,
    Infeasible,
    Unbounded,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sense {
    Maximize,
    Minimize,
}

/// 한 번의 LP 풀이 요청 (행렬은 빌려 씀)
#[derive(Debug, Clone)]
pub struct LpProblem<'a> {
    pub sense: Sense,
    pub objective: DVector<f64>,
    pub a: &'a DMatrix<f64>,
    pub b: &'a DVector<f64>,
    pub s: &'a DMatrix<f64>,
    pub h: &'a DVector<f64>,
    /// 변수별 (하한, 상한). None 이면 모든 변수가 자유변수
    pub bounds: Option<Vec<(f64, f64)>>,
}

impl<'a> LpProblem<'a> {
    pub fn new(
        sense: Sense,
        objective: DVector<f64>,
        a: &'a DMatrix<f64>,
        b: &'a DVector<f64>,
        s: &'a DMatrix<f64>,
        h: &'a DVector<f64>,
    ) -> Self {
        Self {
            sense,
            objective,
            a,
            b,
            s,
            h,
            bounds: None,
        }
    }

    pub fn with_bounds(mut self, bounds: Vec<(f64, f64)>) -> Self {
        self.bounds = Some(bounds);
        self
    }

    pub fn num_vars(&self) -> usize {
        self.objective.len()
    }

    /// 모든 행렬/벡터 차원 검사
    pub fn validate(&self) -> Result<()> {
        let n = self.num_vars();
        PolyRoundError::check_dim("LpProblem: cols(A)", n, self.a.ncols())?;
        PolyRoundError::check_dim("LpProblem: len(b)", self.a.nrows(), self.b.len())?;
        PolyRoundError::check_dim("LpProblem: len(h)", self.s.nrows(), self.h.len())?;
        if self.s.nrows() > 0 {
            PolyRoundError::check_dim("LpProblem: cols(S)", n, self.s.ncols())?;
        }
        if let Some(bounds) = &self.bounds {
            PolyRoundError::check_dim("LpProblem: bounds", n, bounds.len())?;
        }
        Ok(())
    }
}

/// LP 풀이 결과
#[derive(Debug, Clone)]
pub struct LpSolution {
    pub status: LpStatus,
    /// Optimal 이 아니면 비어 있음
    pub x: DVector<f64>,
    pub objective: f64,
}

impl LpSolution {
    pub fn optimal(x: DVector<f64>, objective: f64) -> Self {
        Self {
            status: LpStatus::Optimal,
            x,
            objective,
        }
    }

    pub fn with_status(status: LpStatus) -> Self {
        let objective = match status {
            LpStatus::Unbounded => f64::INFINITY,
            _ => f64::NAN,
        };
        Self {
            status,
            x: DVector::zeros(0),
            objective,
        }
    }

    pub fn is_optimal(&self) -> bool {
        self.status == LpStatus::Optimal
    }

    /// 최적해가 아니면 `PolyRoundError::Backend`
    pub fn require_optimal(self, backend: &str, what: &str) -> Result<LpSolution> {
        if self.is_optimal() {
            return Ok(self);
        }
        Err(PolyRoundError::Backend {
            backend: backend.to_string(),
            status: self.status,
            message: format!("{} 에 대한 최적해 없음", what),
        })
    }
}

/// 백엔드로 그대로 넘기는 불투명 옵션
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SolverOptions(BTreeMap<String, Value>);

impl SolverOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.0.insert(key.to_string(), value.into());
        self
    }

    pub fn insert(&mut self, key: &str, value: impl Into<Value>) {
        self.0.insert(key.to_string(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn get_f64(&self, key: &str) -> Option<f64> {
        self.0.get(key).and_then(Value::as_f64)
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.0.get(key).and_then(Value::as_bool)
    }

    /// 두 옵션 집합 병합 (other 가 우선)
    pub fn merged(&self, other: &SolverOptions) -> SolverOptions {
        let mut out = self.clone();
        for (k, v) in &other.0 {
            out.0.insert(k.clone(), v.clone());
        }
        out
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// 교체 가능한 LP 풀이기
pub trait LpBackend: Send + Sync {
    /// 레지스트리 등록 이름
    fn name(&self) -> &str;

    /// infeasible/unbounded 는 `Ok` 상태값으로, 시간 초과와 내부 실패는 `Err` 로 보고
    fn solve(&self, problem: &LpProblem<'_>, options: &SolverOptions) -> Result<LpSolution>;
}
