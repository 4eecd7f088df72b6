//! # 기하평균 스케일링 단위테스트

use crate::core::math::{apply_scaling, dynamic_range, geometric_mean_scaling};
use nalgebra::{DMatrix, DVector};

/// 행마다 크기 차이가 큰 3×4 행렬
fn badly_scaled() -> DMatrix<f64> {
    DMatrix::from_row_slice(
        3,
        4,
        &[
            1.0, 2.0, 3.0, 4.0, //
            10.0, 100.0, 1000.0, 10000.0, //
            0.1, 0.01, 0.001, 0.0001,
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn 기하평균_스케일링_고정점_테스트() {
        let a = badly_scaled();
        let (col_scale, row_scale) = geometric_mean_scaling(&a, 1e-4, 1e-4, 20).unwrap();

        let expected_rows = DVector::from_vec(vec![2.0, 1e5_f64.sqrt(), 1e-5_f64.sqrt()]);
        let expected_cols = DVector::from_element(4, 1.0);
        assert_relative_eq!(row_scale, expected_rows, max_relative = 1e-10);
        assert_relative_eq!(col_scale, expected_cols, max_relative = 1e-10);
        println!("✅ 기하평균 스케일링 고정점 테스트 통과");
        println!("   행 스케일: {:?}", row_scale.as_slice());
    }

    #[test]
    fn 동적_범위_감소_테스트() {
        let a = badly_scaled();
        let (col_scale, row_scale) = geometric_mean_scaling(&a, 1e-4, 1e-4, 20).unwrap();
        let scaled = apply_scaling(&a, &col_scale, &row_scale).unwrap();

        let raw = dynamic_range(&a);
        let after = dynamic_range(&scaled);
        assert_relative_eq!(raw, 1e8, max_relative = 1e-12);
        assert_relative_eq!(after, 1e3, max_relative = 1e-9);
        assert!(col_scale.max() / col_scale.min() < raw);
        println!("✅ 동적 범위 감소 테스트 통과: {:.3e} → {:.3e}", raw, after);
    }

    #[test]
    fn 결정적_결과_테스트() {
        let a = DMatrix::from_row_slice(2, 3, &[3.0, -0.5, 0.0, 7.0, 1e-3, 2.0]);
        let first = geometric_mean_scaling(&a, 1e-6, 1e-6, 50).unwrap();
        let second = geometric_mean_scaling(&a, 1e-6, 1e-6, 50).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn 영행_영열_처리_테스트() {
        let a = DMatrix::from_row_slice(2, 2, &[0.0, 0.0, 0.0, 5.0]);
        let (col_scale, row_scale) = geometric_mean_scaling(&a, 1e-4, 1e-4, 10).unwrap();
        assert_eq!(row_scale[0], 1.0);
        assert_eq!(col_scale[0], 1.0);
        assert!(row_scale.iter().chain(col_scale.iter()).all(|v| v.is_finite() && *v > 0.0));
    }

    #[test]
    fn 유한하지_않은_입력_거부_테스트() {
        let a = DMatrix::from_row_slice(1, 2, &[1.0, f64::NAN]);
        assert!(geometric_mean_scaling(&a, 1e-4, 1e-4, 10).is_err());
        assert!(apply_scaling(&a, &DVector::zeros(3), &DVector::zeros(1)).is_err());
    }
}
