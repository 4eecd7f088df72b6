//! # 체비쇼프 중심 / FVA 단위테스트

use crate::core::error::PolyRoundError;
use crate::core::geometry::ChebyshevFinder;
use crate::core::lp::{MinilpBackend, SolverOptions};
use crate::core::polytope::Polytope;
use nalgebra::{DMatrix, DVector};

/// [lo, hi]^n 상자
fn cube(n: usize, lo: f64, hi: f64) -> Polytope {
    let mut a = DMatrix::zeros(2 * n, n);
    let mut b = DVector::zeros(2 * n);
    for j in 0..n {
        a[(2 * j, j)] = 1.0;
        b[2 * j] = hi;
        a[(2 * j + 1, j)] = -1.0;
        b[2 * j + 1] = -lo;
    }
    Polytope::new(a, b).unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn 정사각형_체비쇼프_중심_테스트() {
        let p = cube(2, 0.0, 1.0);
        let (x, r) =
            ChebyshevFinder::chebyshev_center(&p, &MinilpBackend::new(), false, &SolverOptions::new())
                .unwrap();
        assert_relative_eq!(r, 0.5, epsilon = 1e-9);
        assert_relative_eq!(x, DVector::from_vec(vec![0.5, 0.5]), epsilon = 1e-9);
        println!("✅ 정사각형 체비쇼프 중심 테스트 통과: r = {}", r);
    }

    #[test]
    fn 삼각형_반지름_테스트() {
        // x >= 0, y >= 0, 2x + 2y <= 2 (정규화 안 된 행)
        let a = DMatrix::from_row_slice(3, 2, &[-1.0, 0.0, 0.0, -1.0, 2.0, 2.0]);
        let b = DVector::from_vec(vec![0.0, 0.0, 2.0]);
        let p = Polytope::new(a, b).unwrap();
        let (x, r) =
            ChebyshevFinder::chebyshev_center(&p, &MinilpBackend::new(), true, &SolverOptions::new())
                .unwrap();

        let expected = 1.0 / (2.0 + 2.0_f64.sqrt());
        assert_relative_eq!(r, expected, epsilon = 1e-9);
        assert_relative_eq!(x[0], expected, epsilon = 1e-9);
        assert_relative_eq!(p.border_distance(&x).unwrap(), expected, epsilon = 1e-9);
    }

    #[test]
    fn 등식_아핀_껍질_안의_공_테스트() {
        // [0,1]³ ∩ {z = 0.5} 는 2차원 정사각형
        let cube3 = cube(3, 0.0, 1.0);
        let s = DMatrix::from_row_slice(1, 3, &[0.0, 0.0, 1.0]);
        let h = DVector::from_vec(vec![0.5]);
        let p = Polytope::with_equalities(cube3.a().clone(), cube3.b().clone(), s, h).unwrap();

        let (x, r) =
            ChebyshevFinder::chebyshev_center(&p, &MinilpBackend::new(), false, &SolverOptions::new())
                .unwrap();
        assert_relative_eq!(r, 0.5, epsilon = 1e-9);
        assert_relative_eq!(x[2], 0.5, epsilon = 1e-9);
    }

    #[test]
    fn 점으로_고정된_폴리토프_테스트() {
        let square = cube(2, 0.0, 1.0);
        let s = DMatrix::identity(2, 2);
        let h = DVector::from_vec(vec![0.25, 0.75]);
        let p = Polytope::with_equalities(square.a().clone(), square.b().clone(), s, h).unwrap();

        let (x, r) =
            ChebyshevFinder::chebyshev_center(&p, &MinilpBackend::new(), false, &SolverOptions::new())
                .unwrap();
        assert_relative_eq!(r, 0.0, epsilon = 1e-12);
        assert_relative_eq!(x, DVector::from_vec(vec![0.25, 0.75]), epsilon = 1e-12);
        println!("✅ 점으로 고정된 폴리토프 테스트 통과");
    }

    #[test]
    fn 유계가_아닌_폴리토프_테스트() {
        let a = DMatrix::from_row_slice(2, 2, &[-1.0, 0.0, 0.0, -1.0]);
        let p = Polytope::new(a, DVector::zeros(2)).unwrap();
        let err =
            ChebyshevFinder::chebyshev_center(&p, &MinilpBackend::new(), false, &SolverOptions::new())
                .unwrap_err();
        assert!(matches!(err, PolyRoundError::DegeneratePolytope { .. }));
    }

    #[test]
    fn FVA_범위_테스트() {
        let p = cube(3, -1.0, 2.0);
        for parallel in [true, false] {
            let bounds =
                ChebyshevFinder::fva(&p, &MinilpBackend::new(), &SolverOptions::new(), parallel)
                    .unwrap();
            assert_relative_eq!(bounds.lower, DVector::from_element(3, -1.0), epsilon = 1e-9);
            assert_relative_eq!(bounds.upper, DVector::from_element(3, 2.0), epsilon = 1e-9);
            assert!(bounds.fixed_coordinates(1e-9).is_empty());
        }
    }

    #[test]
    fn FVA_무한_범위와_고정_좌표_테스트() {
        // y 는 위로 열려 있고 x 는 등식으로 고정
        let a = DMatrix::from_row_slice(3, 2, &[1.0, 0.0, -1.0, 0.0, 0.0, -1.0]);
        let b = DVector::from_vec(vec![1.0, 0.0, 0.0]);
        let s = DMatrix::from_row_slice(1, 2, &[1.0, 0.0]);
        let h = DVector::from_vec(vec![0.5]);
        let p = Polytope::with_equalities(a, b, s, h).unwrap();

        let bounds =
            ChebyshevFinder::fva(&p, &MinilpBackend::new(), &SolverOptions::new(), true).unwrap();
        assert_eq!(bounds.upper[1], f64::INFINITY);
        assert_relative_eq!(bounds.lower[1], 0.0, epsilon = 1e-9);
        assert_eq!(bounds.fixed_coordinates(1e-9), vec![0]);
    }
}
