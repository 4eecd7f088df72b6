//! # 폴리토프 축소
//!
//! LP/타원체 계산 전에 구조적 중복을 없앱니다.

pub mod constraint_removal;
pub mod null_space;

// 테스트 모듈
#[cfg(test)]
mod __tests__;

// 재수출
pub use constraint_removal::{constraint_removal, degrees_of_freedom, remove_zero_rows, ReductionReport};
pub use null_space::{null_space, numerical_rank};

use nalgebra::DMatrix;

use crate::core::error::Result;
use crate::core::lp::LpBackend;
use crate::core::polytope::Polytope;
use crate::core::settings::PolyRoundSettings;

/// 축소 연산 묶음
pub struct PolytopeReducer;

impl PolytopeReducer {
    /// 등식 시스템의 null space 직교 기저
    pub fn null_space(s: &DMatrix<f64>, eps: f64) -> Result<DMatrix<f64>> {
        null_space(s, eps)
    }

    /// 중복 제거 + 등식 승격. 입력은 그대로 두고 새 폴리토프를 돌려줌
    pub fn constraint_removal(
        polytope: &Polytope,
        backend: &dyn LpBackend,
        settings: &PolyRoundSettings,
    ) -> Result<(Polytope, ReductionReport)> {
        constraint_removal(polytope, backend, settings)
    }

    pub fn remove_zero_rows(polytope: &Polytope, thresh: f64) -> Result<(Polytope, Vec<usize>)> {
        remove_zero_rows(polytope, thresh)
    }
}
