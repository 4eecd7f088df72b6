//! # 수치 보조 모듈 테스트

pub mod nspd_test;
pub mod scaling_test;
