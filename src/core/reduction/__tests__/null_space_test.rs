//! # null space 단위테스트

use crate::core::reduction::{null_space, numerical_rank, PolytopeReducer};
use nalgebra::DMatrix;

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn null_space_차원_법칙_테스트() {
        let s = DMatrix::from_row_slice(2, 4, &[1.0, 1.0, 0.0, 0.0, 0.0, 1.0, -1.0, 2.0]);
        let basis = null_space(&s, 1e-12).unwrap();

        assert_eq!(basis.shape(), (4, 2));
        assert_abs_diff_eq!(&s * &basis, DMatrix::zeros(2, 2), epsilon = 1e-12);
        // 직교 정규 기저
        assert_abs_diff_eq!(basis.transpose() * &basis, DMatrix::identity(2, 2), epsilon = 1e-12);
        println!("✅ null space 차원 법칙 테스트 통과: {:?}", basis.shape());
    }

    #[test]
    fn 등식이_없으면_단위행렬_테스트() {
        let s = DMatrix::<f64>::zeros(0, 3);
        assert_eq!(null_space(&s, 1e-12).unwrap(), DMatrix::identity(3, 3));
    }

    #[test]
    fn 최대_랭크_정사각_테스트() {
        let s = DMatrix::from_row_slice(2, 2, &[2.0, 1.0, 1.0, 3.0]);
        let basis = PolytopeReducer::null_space(&s, 1e-12).unwrap();
        assert_eq!(basis.ncols(), 0);
        assert_eq!(numerical_rank(&s, 1e-12).unwrap(), 2);
    }

    #[test]
    fn 종속_행_테스트() {
        // 세 행 모두 같은 방향 → 랭크 1
        let s = DMatrix::from_row_slice(3, 3, &[1.0, 2.0, 3.0, 2.0, 4.0, 6.0, -1.0, -2.0, -3.0]);
        let basis = null_space(&s, 1e-12).unwrap();
        assert_eq!(basis.ncols(), 2);
        assert_abs_diff_eq!(&s * &basis, DMatrix::zeros(3, 2), epsilon = 1e-12);
    }

    #[test]
    fn 유한하지_않은_입력_거부_테스트() {
        let s = DMatrix::from_row_slice(1, 2, &[f64::INFINITY, 1.0]);
        assert!(null_space(&s, 1e-12).is_err());
    }
}
