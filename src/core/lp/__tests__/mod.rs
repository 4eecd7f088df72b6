//! # LP 모듈 테스트
//!
//! minilp 백엔드, 레지스트리, 작업 분배 검증
