//! # PolyRound 핵심 라이브러리 모듈
//!
//! 선형 제약 폴리토프의 단순화, 차원 축소, 라운딩을 위한 구성 요소들

pub mod error;
pub mod settings;
pub mod polytope;
pub mod lp;
pub mod math;
pub mod geometry;
pub mod reduction;
pub mod rounding;
pub mod api;

// 주요 타입들 재수출
pub use error::{PolyRoundError, Result};
pub use settings::{MveConfig, PolyRoundSettings, RoundingConfig};
pub use polytope::{AffineMap, Polytope, PolytopeRecord};
pub use lp::{BackendRegistry, LpBackend, LpProblem, LpSolution, LpStatus, MinilpBackend, Sense, SolverOptions};
pub use math::{geometric_mean_scaling, get_nspd};
pub use geometry::{ChebyshevFinder, FvaBounds};
pub use reduction::{PolytopeReducer, ReductionReport};
pub use rounding::{Ellipsoid, MaximumVolumeEllipsoidFinder, MveOutcome, MveState, RoundingReport};
pub use api::{polytope_to_csvs, PolyRoundApi};

// 각 모듈이 자체 테스트를 포함함
