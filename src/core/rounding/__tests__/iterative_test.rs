//! # 반복 라운딩 단위테스트

use crate::core::error::PolyRoundError;
use crate::core::polytope::Polytope;
use crate::core::rounding::{iterative_solve, MaximumVolumeEllipsoidFinder};
use crate::core::settings::{PolyRoundSettings, RoundingConfig};
use nalgebra::{DMatrix, DVector};

/// 원점을 중심으로 한 [-wx, wx] × [-wy, wy]
fn centered_box(wx: f64, wy: f64) -> Polytope {
    let a = DMatrix::from_row_slice(4, 2, &[1.0, 0.0, -1.0, 0.0, 0.0, 1.0, 0.0, -1.0]);
    let b = DVector::from_vec(vec![wx, wx, wy, wy]);
    Polytope::new(a, b).unwrap()
}

/// 기울어진 평행사변형: |x| <= 1, |x + 20y| <= 1
fn skewed_parallelogram() -> Polytope {
    let a = DMatrix::from_row_slice(4, 2, &[1.0, 0.0, -1.0, 0.0, 1.0, 20.0, -1.0, -20.0]);
    let b = DVector::from_element(4, 1.0);
    Polytope::new(a, b).unwrap()
}

/// +y 방향으로 열린 띠: -1 <= x <= 1, y >= -1
fn open_strip() -> Polytope {
    let a = DMatrix::from_row_slice(3, 2, &[-1.0, 0.0, 0.0, -1.0, 1.0, 0.0]);
    let b = DVector::from_element(3, 1.0);
    Polytope::new(a, b).unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn 길쭉한_상자_라운딩_테스트() {
        let mut p = centered_box(50.0, 0.5);
        let report = iterative_solve(&mut p, &PolyRoundSettings::default()).unwrap();

        assert!(report.converged);
        assert!(report.roundness_ratio <= 6.0);
        assert_eq!(report.ratio_history.len(), report.outer_iterations);
        // 둥글게 만든 뒤에는 원점에서 모든 면까지 거리가 1
        let origin = DVector::zeros(2);
        assert_abs_diff_eq!(p.border_distance(&origin).unwrap(), 1.0, epsilon = 1e-3);
        for i in 0..p.num_inequalities() {
            assert_abs_diff_eq!(p.a().row(i).norm(), 1.0, epsilon = 1e-12);
        }
        // 원점은 원래 상자의 중심
        let center = p.back_transform_point(&origin).unwrap();
        assert_abs_diff_eq!(center, DVector::zeros(2), epsilon = 1e-4);
        println!("✅ 길쭉한 상자 라운딩 테스트 통과: {:?}", report);
    }

    #[test]
    fn 기울어진_평행사변형_라운딩_테스트() {
        let mut p = skewed_parallelogram();
        let report =
            MaximumVolumeEllipsoidFinder::iterative_solve(&mut p, &PolyRoundSettings::default())
                .unwrap();
        assert!(report.converged);
        assert!(report.roundness_ratio <= 6.0);
        assert!(p.inequality_only());

        // 원래 꼭짓점들은 작업 좌표에서 반지름 sqrt(2) 안팎에 놓임
        let corner = DVector::from_vec(vec![1.0, 0.0]);
        let w = p.forward_transform_point(&corner).unwrap();
        assert!(w.norm() < 2.0);
        assert!(p.border_distance(&w).unwrap().abs() < 1e-6);
    }

    #[test]
    fn 스케일링_없이도_동작_테스트() {
        let mut p = centered_box(10.0, 1.0);
        let settings = PolyRoundSettings {
            rounding: RoundingConfig {
                geometric_scaling: false,
                ..RoundingConfig::default()
            },
            ..PolyRoundSettings::default()
        };
        let report = iterative_solve(&mut p, &settings).unwrap();
        assert!(report.converged);
        assert!(!report.scaled);
    }

    #[test]
    fn 외부_반복_한도_보고_테스트() {
        let mut p = centered_box(100.0, 1.0);
        let settings = PolyRoundSettings {
            rounding: RoundingConfig {
                max_outer_iterations: 1,
                ..RoundingConfig::default()
            },
            ..PolyRoundSettings::default()
        };
        let report = iterative_solve(&mut p, &settings).unwrap();
        // 첫 타원체의 비율은 100² 이므로 한 번으로는 기준 미달
        assert!(!report.converged);
        assert_eq!(report.outer_iterations, 1);
    }

    #[test]
    fn 등식이_남은_폴리토프_거부_테스트() {
        let square = centered_box(1.0, 1.0);
        let s = DMatrix::from_row_slice(1, 2, &[1.0, 1.0]);
        let mut p =
            Polytope::with_equalities(square.a().clone(), square.b().clone(), s, DVector::zeros(1))
                .unwrap();
        let err = iterative_solve(&mut p, &PolyRoundSettings::default()).unwrap_err();
        assert!(matches!(err, PolyRoundError::RoundingFailed { .. }));
    }

    #[test]
    fn 유계가_아닌_폴리토프_라운딩_실패_테스트() {
        let mut p = open_strip();
        let before = p.clone();
        let err = iterative_solve(&mut p, &PolyRoundSettings::default()).unwrap_err();
        match err {
            PolyRoundError::RoundingFailed { dimension, reason } => {
                assert_eq!(dimension, 2);
                assert!(reason.contains("부등식 3개"), "{}", reason);
            }
            other => panic!("RoundingFailed 를 기대했지만 {:?}", other),
        }

        // 실패하면 폴리토프는 그대로
        assert_eq!(p.a(), before.a());
        assert_eq!(p.b(), before.b());
        assert_eq!(p.transformation(), before.transformation());
        assert_eq!(p.shift(), before.shift());
        assert!(p.transformation().iter().all(|v| v.is_finite()));
        println!("✅ 유계가 아닌 폴리토프 라운딩 실패 테스트 통과");
    }
}
