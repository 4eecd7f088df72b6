//! # 파사드 / 내보내기 테스트
