//! # 폴리토프 모듈 테스트
//!
//! 아핀 사상 누적, 행 연산, 내보내기 레코드 검증

pub mod affine_map_test;
