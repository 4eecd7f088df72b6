//! 단순화 → 변환 → 라운딩 파이프라인 파사드
//!
//! 각 단계는 입력을 건드리지 않고 새 `Polytope` 를 돌려줍니다.

use std::sync::Arc;

use log::{debug, info};
use nalgebra::DVector;

use crate::core::error::Result;
use crate::core::geometry::ChebyshevFinder;
use crate::core::lp::{BackendRegistry, LpBackend};
use crate::core::polytope::Polytope;
use crate::core::reduction::constraint_removal::degenerate;
use crate::core::reduction::{
    constraint_removal, degrees_of_freedom, null_space, remove_zero_rows, ReductionReport,
};
use crate::core::rounding::{iterative_solve, RoundingReport};
use crate::core::settings::PolyRoundSettings;

#[derive(Debug, Clone)]
pub struct PolyRoundApi {
    registry: BackendRegistry,
    settings: PolyRoundSettings,
}

impl Default for PolyRoundApi {
    fn default() -> Self {
        Self::new(PolyRoundSettings::default())
    }
}

impl PolyRoundApi {
    /// 기본 백엔드가 등록된 파사드
    pub fn new(settings: PolyRoundSettings) -> Self {
        Self::with_registry(BackendRegistry::with_defaults(), settings)
    }

    pub fn with_registry(registry: BackendRegistry, settings: PolyRoundSettings) -> Self {
        Self { registry, settings }
    }

    pub fn settings(&self) -> &PolyRoundSettings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut PolyRoundSettings {
        &mut self.settings
    }

    pub fn registry_mut(&mut self) -> &mut BackendRegistry {
        &mut self.registry
    }

    /// 설정에 지정된 백엔드
    pub fn backend(&self) -> Result<Arc<dyn LpBackend>> {
        self.registry.get(&self.settings.backend)
    }

    fn log_stage(&self, message: &str) {
        if self.settings.verbose {
            info!("{}", message);
        } else {
            debug!("{}", message);
        }
    }

    /// 중복 제거 + 등식 승격. 자유도가 남지 않으면 `DegeneratePolytope`
    pub fn simplify_polytope(&self, polytope: &Polytope) -> Result<Polytope> {
        Ok(self.simplify_polytope_with_report(polytope)?.0)
    }

    pub fn simplify_polytope_with_report(
        &self,
        polytope: &Polytope,
    ) -> Result<(Polytope, ReductionReport)> {
        let backend = self.backend()?;
        let (reduced, report) = constraint_removal(polytope, backend.as_ref(), &self.settings)?;

        let dof = degrees_of_freedom(&reduced, self.settings.null_space_eps)?;
        if dof == 0 {
            return Err(degenerate(&reduced, "등식이 모든 좌표를 고정하여 자유도가 0"));
        }
        self.log_stage(&format!(
            "단순화: 차원 {}, 자유도 {}, 부등식 {}개, 등식 {}개",
            reduced.dimension(),
            dof,
            reduced.num_inequalities(),
            reduced.num_equalities()
        ));
        Ok((reduced, report))
    }

    /// 체비쇼프 중심으로 이동한 뒤 등식 null space 로 투영
    ///
    /// 결과는 부등식만 남고 원점이 내부점입니다.
    pub fn transform_polytope(&self, polytope: &Polytope) -> Result<Polytope> {
        let backend = self.backend()?;
        let options = self.settings.solver_options.clone();
        let (center, radius) = ChebyshevFinder::chebyshev_center(
            polytope,
            backend.as_ref(),
            self.settings.regularize,
            &options,
        )?;
        if radius <= self.settings.thresh {
            return Err(degenerate(
                polytope,
                format!("체비쇼프 반지름 {:.3e} 이 허용오차 이하", radius),
            ));
        }

        let mut transformed = polytope.clone();
        transformed.apply_shift(&center)?;
        let basis = null_space(transformed.s(), self.settings.null_space_eps)?;
        if basis.ncols() == 0 {
            return Err(degenerate(&transformed, "등식 null space 가 비어 있음"));
        }
        if !transformed.inequality_only() {
            transformed.apply_transformation(&basis)?;
        }
        transformed.drop_equalities();
        // 등식 방향으로만 작용하던 행은 투영 후 0행이 됨
        let (transformed, dropped) = remove_zero_rows(&transformed, self.settings.thresh)?;
        if !dropped.is_empty() {
            debug!("변환: 0행 {}개 제거", dropped.len());
        }

        self.log_stage(&format!(
            "변환: 차원 {} → {}, 체비쇼프 반지름 {:.6e}",
            polytope.dimension(),
            transformed.dimension(),
            radius
        ));
        Ok(transformed)
    }

    /// 반복 라운딩. 등식이 남아 있으면 먼저 변환합니다.
    ///
    /// 원점이 경계에 너무 가까우면 체비쇼프 중심으로 옮긴 뒤 시작합니다.
    /// 어느 좌표든 FVA 범위가 무한하면 `DegeneratePolytope` 입니다.
    pub fn round_polytope(&self, polytope: &Polytope) -> Result<(Polytope, RoundingReport)> {
        let mut rounded = if polytope.inequality_only() {
            polytope.clone()
        } else {
            self.transform_polytope(polytope)?
        };

        let backend = self.backend()?;
        let bounds = ChebyshevFinder::fva(
            &rounded,
            backend.as_ref(),
            &self.settings.effective_solver_options(),
            self.settings.parallel,
        )?;
        let unbounded: Vec<usize> = (0..rounded.dimension())
            .filter(|&j| !bounds.lower[j].is_finite() || !bounds.upper[j].is_finite())
            .collect();
        if !unbounded.is_empty() {
            return Err(degenerate(
                &rounded,
                format!("좌표 {:?} 방향으로 유계가 아니어서 라운딩할 수 없음", unbounded),
            ));
        }

        let origin = DVector::zeros(rounded.dimension());
        if rounded.border_distance(&origin)? <= self.settings.thresh {
            rounded = self.transform_polytope(&rounded)?;
        }

        let report = iterative_solve(&mut rounded, &self.settings)?;
        debug_assert!(rounded.inequality_only());
        Ok((rounded, report))
    }

    /// 세 단계를 한 번에
    pub fn simplify_transform_and_round(
        &self,
        polytope: &Polytope,
    ) -> Result<(Polytope, RoundingReport)> {
        let simplified = self.simplify_polytope(polytope)?;
        let transformed = self.transform_polytope(&simplified)?;
        self.round_polytope(&transformed)
    }
}
