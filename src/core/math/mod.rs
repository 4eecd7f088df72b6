pub mod nspd;
pub mod scaling;

// 테스트 모듈
#[cfg(test)]
mod __tests__;

// 재수출
pub use nspd::{get_nspd, is_positive_definite};
pub use scaling::{apply_scaling, dynamic_range, geometric_mean_scaling};
