//! # 파이프라인 파사드와 내보내기

pub mod persistence;
pub mod polyround_api;

// 테스트 모듈
#[cfg(test)]
mod __tests__;

// 재수출
pub use persistence::{
    polytope_from_csvs, polytope_from_json, polytope_to_csvs, polytope_to_json, CSV_FILES,
};
pub use polyround_api::PolyRoundApi;
