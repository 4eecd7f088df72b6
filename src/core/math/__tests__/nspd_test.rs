//! # NSPD 보정 단위테스트

use crate::core::error::PolyRoundError;
use crate::core::math::{get_nspd, is_positive_definite};
use nalgebra::DMatrix;

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn 양의_정부호_입력_유지_테스트() {
        let m = DMatrix::from_row_slice(2, 2, &[4.0, 1.0, 1.0, 3.0]);
        let repaired = get_nspd(&m).unwrap();
        assert_eq!(repaired, m);
        println!("✅ 양의 정부호 입력 유지 테스트 통과");
    }

    #[test]
    fn 부정부호_행렬_보정_테스트() {
        // 고유값 3, -1
        let m = DMatrix::from_row_slice(2, 2, &[1.0, 2.0, 2.0, 1.0]);
        assert!(!is_positive_definite(&m));

        let repaired = get_nspd(&m).unwrap();
        assert!(is_positive_definite(&repaired));
        assert!(repaired.clone().cholesky().is_some());
        // 가장 가까운 PSD 행렬은 1.5·[[1,1],[1,1]]
        let nearest = DMatrix::from_element(2, 2, 1.5);
        assert_relative_eq!(repaired, nearest, epsilon = 1e-6);
        println!("✅ 부정부호 행렬 보정 테스트 통과");
    }

    #[test]
    fn 비대칭_입력_대칭화_테스트() {
        let m = DMatrix::from_row_slice(2, 2, &[2.0, 0.5, -0.5, 2.0]);
        let repaired = get_nspd(&m).unwrap();
        assert_relative_eq!(repaired.clone(), repaired.transpose(), epsilon = 1e-15);
        assert_relative_eq!(repaired[(0, 1)], 0.0, epsilon = 1e-15);
    }

    #[test]
    fn 특이_행렬_보정_테스트() {
        let m = DMatrix::from_row_slice(3, 3, &[1.0, 1.0, 0.0, 1.0, 1.0, 0.0, 0.0, 0.0, 0.0]);
        let repaired = get_nspd(&m).unwrap();
        assert!(is_positive_definite(&repaired));
        assert_relative_eq!(repaired, m, epsilon = 1e-8);
    }

    #[test]
    fn 정사각이_아닌_입력_거부_테스트() {
        let m = DMatrix::<f64>::zeros(2, 3);
        let err = get_nspd(&m).unwrap_err();
        assert!(matches!(err, PolyRoundError::DimensionMismatch { .. }));
    }
}
