//! # 오류 타입
//!
//! 폴리토프 단순화/라운딩 파이프라인 전체에서 사용하는 오류 분류

use std::time::Duration;
use thiserror::Error;

use crate::core::lp::LpStatus;

/// 파이프라인 공용 Result 별칭
pub type Result<T> = std::result::Result<T, PolyRoundError>;

/// 파이프라인 오류 분류
#[derive(Debug, Error)]
pub enum PolyRoundError {
    /// 입력 행렬/벡터의 차원이 맞지 않음 (상태 변경 전에 검출)
    #[error("{context}: 차원 불일치 (기대 {expected}, 실제 {found})")]
    DimensionMismatch {
        context: &'static str,
        expected: usize,
        found: usize,
    },

    /// 부피가 0이거나 자유도가 남지 않은 폴리토프
    #[error(
        "퇴화 폴리토프: {reason} (차원 {dimension}, 부등식 {inequalities}개, 등식 {equalities}개)"
    )]
    DegeneratePolytope {
        dimension: usize,
        inequalities: usize,
        equalities: usize,
        reason: String,
    },

    /// NSPD 보정 후에도 타원체 형상 행렬을 쓸 수 없음
    #[error("라운딩 실패 (차원 {dimension}): {reason}")]
    RoundingFailed { dimension: usize, reason: String },

    /// LP 백엔드 시간 초과
    #[error("LP 백엔드 '{backend}' 시간 초과 ({limit:?})")]
    BackendTimeout { backend: String, limit: Duration },

    /// LP 백엔드가 최적해를 돌려주지 못함
    #[error("LP 백엔드 '{backend}' 오류 [{status:?}]: {message}")]
    Backend {
        backend: String,
        status: LpStatus,
        message: String,
    },

    /// 분해/역행렬 등 선형대수 연산 실패
    #[error("선형대수 연산 실패: {0}")]
    LinearAlgebra(String),

    /// 레지스트리에 없는 백엔드 이름
    #[error("등록되지 않은 LP 백엔드: {0}")]
    UnknownBackend(String),

    /// 내보낸 CSV 를 다시 읽지 못함
    #[error("CSV 파싱 오류 ({file}:{line}): {message}")]
    CsvParse {
        file: String,
        line: usize,
        message: String,
    },

    #[error("입출력 오류: {0}")]
    Io(#[from] std::io::Error),

    #[error("직렬화 오류: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl PolyRoundError {
    /// 차원 검사 헬퍼: 다르면 `DimensionMismatch`
    pub fn check_dim(context: &'static str, expected: usize, found: usize) -> Result<()> {
        if expected != found {
            return Err(PolyRoundError::DimensionMismatch {
                context,
                expected,
                found,
            });
        }
        Ok(())
    }
}
