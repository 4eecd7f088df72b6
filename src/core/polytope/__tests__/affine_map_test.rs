//! # AffineMap 단위테스트

use crate::core::polytope::AffineMap;
use nalgebra::{DMatrix, DVector};

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn 항등_사상_테스트() {
        let map = AffineMap::identity(3);
        let p = DVector::from_vec(vec![1.0, -2.0, 3.5]);
        assert_eq!(map.apply(&p).unwrap(), p);
        assert_relative_eq!(map.invert_apply(&p).unwrap(), p, epsilon = 1e-12);
        println!("✅ 항등 사상 테스트 통과");
    }

    #[test]
    fn 이동_후_변환_누적_테스트() {
        let mut map = AffineMap::identity(2);
        let v = DVector::from_vec(vec![1.0, 2.0]);
        let m = DMatrix::from_row_slice(2, 2, &[2.0, 0.0, 1.0, 3.0]);
        map.then_shift(&v).unwrap();
        map.then_transform(&m).unwrap();

        // 원래 점 = v + M·w
        let w = DVector::from_vec(vec![0.5, -1.0]);
        let expected = &v + &m * &w;
        assert_relative_eq!(map.apply(&w).unwrap(), expected, epsilon = 1e-12);
        println!("✅ 이동 후 변환 누적 테스트 통과");
    }

    #[test]
    fn 합성_테스트() {
        let outer = AffineMap {
            transformation: DMatrix::from_row_slice(2, 2, &[1.0, 1.0, 0.0, 2.0]),
            shift: DVector::from_vec(vec![1.0, 0.0]),
        };
        let inner = AffineMap {
            transformation: DMatrix::from_row_slice(2, 1, &[1.0, -1.0]),
            shift: DVector::from_vec(vec![0.0, 3.0]),
        };
        let composed = outer.compose(&inner).unwrap();
        assert_eq!(composed.input_dim(), 1);
        assert_eq!(composed.output_dim(), 2);

        let w = DVector::from_vec(vec![2.0]);
        let direct = outer.apply(&inner.apply(&w).unwrap()).unwrap();
        assert_relative_eq!(composed.apply(&w).unwrap(), direct, epsilon = 1e-12);
        println!("✅ 합성 테스트 통과");
    }

    #[test]
    fn 비정사각_역사상_테스트() {
        // 2차원 작업 좌표 → 3차원 원래 좌표
        let map = AffineMap {
            transformation: DMatrix::from_row_slice(3, 2, &[1.0, 0.0, 0.0, 1.0, 1.0, 1.0]),
            shift: DVector::from_vec(vec![0.5, 0.5, 0.5]),
        };
        let w = DVector::from_vec(vec![0.25, -0.75]);
        let p = map.apply(&w).unwrap();
        assert_relative_eq!(map.invert_apply(&p).unwrap(), w, epsilon = 1e-10);

        let batch = DMatrix::from_columns(&[w.clone(), DVector::zeros(2)]);
        let back = map.invert_apply_batch(&map.apply_batch(&batch).unwrap()).unwrap();
        assert_relative_eq!(back, batch, epsilon = 1e-10);
        println!("✅ 비정사각 역사상 테스트 통과");
    }

    #[test]
    fn 차원_불일치_테스트() {
        let mut map = AffineMap::identity(2);
        assert!(map.apply(&DVector::zeros(3)).is_err());
        assert!(map.then_shift(&DVector::zeros(1)).is_err());
        assert!(map.then_transform(&DMatrix::zeros(3, 3)).is_err());
        assert_eq!(map, AffineMap::identity(2));
    }
}
