//! # 파이프라인 설정
//!
//! 단순화/변환/라운딩 각 단계의 허용오차와 반복 한도

use serde::{Deserialize, Serialize};

use crate::core::error::Result;
use crate::core::lp::{MinilpBackend, SolverOptions};

/// 전체 파이프라인 설정
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolyRoundSettings {
    /// LP 백엔드 이름 (레지스트리 조회용)
    pub backend: String,
    /// 백엔드로 그대로 넘기는 옵션
    pub solver_options: SolverOptions,
    /// 중복/등식 판정 slack 허용오차
    pub thresh: f64,
    /// null space 특이값 한계
    pub null_space_eps: f64,
    /// 백엔드에 수치 안정화 옵션 요청
    pub regularize: bool,
    /// 독립 LP 들을 rayon 으로 병렬 처리
    pub parallel: bool,
    /// 단계별 요약을 info 레벨로 출력
    pub verbose: bool,
    /// 최대 부피 타원체 설정
    pub mve: MveConfig,
    /// 반복 라운딩 설정
    pub rounding: RoundingConfig,
}

/// 최대 부피 내접 타원체 (내점법) 설정
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MveConfig {
    /// 잔차 수렴 허용오차
    pub tolerance: f64,
    /// 뉴턴 행렬 대각 정규화 하한
    pub regularization: f64,
    /// 최대 반복
    pub max_iterations: usize,
    /// 최소 중심화 파라미터 μ
    pub min_mu: f64,
    /// 경계까지 이동 비율 하한 (τ₀)
    pub step_fraction: f64,
}

/// 반복 라운딩 (외부 루프) 설정
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoundingConfig {
    /// 외부 반복 최대 횟수
    pub max_outer_iterations: usize,
    /// λmax(E2)/λmin(E2) 가 이 값 이하이면 충분히 둥글다고 판단
    pub roundness_ratio: f64,
    /// 외부 반복마다 정규화를 1/10 로 줄일 때의 하한
    pub min_regularization: f64,
    /// 라운딩 전 기하평균 스케일링 적용
    pub geometric_scaling: bool,
    pub scaling_row_tol: f64,
    pub scaling_col_tol: f64,
    pub scaling_max_iterations: usize,
}

impl Default for PolyRoundSettings {
    fn default() -> Self {
        Self {
            backend: MinilpBackend::NAME.to_string(),
            solver_options: SolverOptions::new(),
            thresh: 1e-7,
            null_space_eps: 1e-12,
            regularize: false,
            parallel: true,
            verbose: false,
            mve: MveConfig::default(),
            rounding: RoundingConfig::default(),
        }
    }
}

impl Default for MveConfig {
    fn default() -> Self {
        Self {
            tolerance: 1e-6,
            regularization: 1e-3,
            max_iterations: 500,
            min_mu: 1e-8,
            step_fraction: 0.75,
        }
    }
}

impl Default for RoundingConfig {
    fn default() -> Self {
        Self {
            max_outer_iterations: 20,
            roundness_ratio: 6.0,
            min_regularization: 1e-10,
            geometric_scaling: true,
            scaling_row_tol: 1e-4,
            scaling_col_tol: 1e-4,
            scaling_max_iterations: 20,
        }
    }
}

impl PolyRoundSettings {
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// 백엔드로 넘길 최종 옵션 (`regularize` 반영)
    pub fn effective_solver_options(&self) -> SolverOptions {
        if self.regularize {
            self.solver_options
                .merged(&SolverOptions::new().set("regularize", true))
        } else {
            self.solver_options.clone()
        }
    }
}
