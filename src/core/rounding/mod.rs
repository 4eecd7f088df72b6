//! # 라운딩
//!
//! 최대 부피 내접 타원체와 그것을 이용한 반복 좌표 변환

pub mod iterative;
pub mod mve;

// 테스트 모듈
#[cfg(test)]
mod __tests__;

// 재수출
pub use iterative::{iterative_solve, RoundingReport};
pub use mve::{run_mve, run_mve_with, Ellipsoid, MveOutcome, MveState};

use nalgebra::{DMatrix, DVector};

use crate::core::error::Result;
use crate::core::polytope::Polytope;
use crate::core::settings::PolyRoundSettings;

/// 라운딩 연산 묶음
pub struct MaximumVolumeEllipsoidFinder;

impl MaximumVolumeEllipsoidFinder {
    pub fn run_mve(
        a: &DMatrix<f64>,
        b: &DVector<f64>,
        x0: &DVector<f64>,
        tolerance: f64,
    ) -> Result<MveOutcome> {
        run_mve(a, b, x0, tolerance)
    }

    pub fn iterative_solve(
        polytope: &mut Polytope,
        settings: &PolyRoundSettings,
    ) -> Result<RoundingReport> {
        iterative_solve(polytope, settings)
    }
}
