pub mod affine_map;
pub mod polytope;
pub mod record;

// 테스트 모듈
#[cfg(test)]
mod __tests__;

// 재수출
pub use affine_map::AffineMap;
pub use polytope::{Polytope, ZERO_ROW_TOL};
pub use record::PolytopeRecord;
