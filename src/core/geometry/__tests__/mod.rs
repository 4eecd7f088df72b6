//! # 기하 모듈 테스트

pub mod chebyshev_test;
