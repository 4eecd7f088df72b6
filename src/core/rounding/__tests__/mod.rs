//! # 라운딩 모듈 테스트
//!
//! 최대 부피 타원체 내점법과 반복 라운딩 검증

pub mod iterative_test;
