//! # 축소 모듈 테스트
//!
//! null space 기저, 중복 제거, 등식 승격 검증

pub mod null_space_test;
