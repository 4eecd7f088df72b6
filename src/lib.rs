//! PolyRound 라이브러리
//!
//! `{x : A·x <= b, S·x = h}` 폴리토프에서 중복 제약을 없애고, 등식을 투영해
//! 전차원 부등식 시스템으로 줄인 뒤, 최대 부피 내접 타원체로 라운딩합니다.
//! 결과 폴리토프는 원래 좌표로 돌아가는 아핀 사상을 함께 가집니다.

pub mod core;

// 핵심 모듈들 재수출
pub use self::core::{
    // 데이터 모델
    AffineMap, Polytope, PolytopeRecord,
    // 파이프라인
    PolyRoundApi, PolyRoundSettings, MveConfig, RoundingConfig,
    // 오류
    PolyRoundError, Result,
    // LP
    BackendRegistry, LpBackend, LpStatus, MinilpBackend, SolverOptions,
    // 라운딩
    MaximumVolumeEllipsoidFinder, RoundingReport,
};
