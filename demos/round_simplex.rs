use anyhow::Result;
use nalgebra::{DMatrix, DVector};
use polyround::core::rounding::run_mve;
use polyround::{PolyRoundApi, PolyRoundSettings, Polytope};

/// x >= 0, x1 + x2 + x3 <= 1 단체에 합이 0.5 인 등식과 길쭉한 상한을 붙인 폴리토프
fn demo_polytope() -> Result<Polytope> {
    let a = DMatrix::from_row_slice(
        6,
        3,
        &[
            -1.0, 0.0, 0.0, //
            0.0, -1.0, 0.0, //
            0.0, 0.0, -1.0, //
            1.0, 1.0, 1.0, //
            100.0, 0.0, 0.0, //
            0.0, 0.01, 0.0,
        ],
    );
    let b = DVector::from_vec(vec![0.0, 0.0, 0.0, 1.0, 40.0, 0.004]);
    let s = DMatrix::from_row_slice(1, 3, &[1.0, 1.0, 1.0]);
    let h = DVector::from_vec(vec![0.5]);
    Ok(Polytope::with_equalities(a, b, s, h)?)
}

fn main() -> Result<()> {
    env_logger::init();
    println!("🚀 PolyRound 라운딩 데모\n");

    // 1. 단체의 최대 부피 내접 타원체
    println!("📊 1. 단체의 최대 부피 내접 타원체");
    println!("{}", "=".repeat(50));
    let a = DMatrix::from_row_slice(4, 3, &[-1.0, 0.0, 0.0, 0.0, -1.0, 0.0, 0.0, 0.0, -1.0, 1.0, 1.0, 1.0]);
    let b = DVector::from_vec(vec![0.0, 0.0, 0.0, 1.0]);
    let outcome = run_mve(&a, &b, &DVector::from_element(3, 0.1), 1e-6)?;
    println!("  - 수렴: {} ({}회)", outcome.converged, outcome.iterations);
    println!("  - 중심: {:?}", outcome.ellipsoid.center.as_slice());
    println!("  - E = {}", outcome.ellipsoid.factor);

    // 2. 단순화 → 변환 → 라운딩
    println!("\n📊 2. 전체 파이프라인");
    println!("{}", "=".repeat(50));
    let settings = PolyRoundSettings {
        verbose: true,
        ..PolyRoundSettings::default()
    };
    let api = PolyRoundApi::new(settings);
    let original = demo_polytope()?;

    let (simplified, reduction) = api.simplify_polytope_with_report(&original)?;
    println!(
        "  - 축소: 제거 {:?}, 등식 승격 {:?}",
        reduction.removed, reduction.refunctioned
    );
    let transformed = api.transform_polytope(&simplified)?;
    println!(
        "  - 변환: 차원 {} → {}",
        original.dimension(),
        transformed.dimension()
    );
    let (rounded, report) = api.round_polytope(&transformed)?;
    println!(
        "  - 라운딩: 외부 반복 {}, 비율 {:.3}, 수렴 {}",
        report.outer_iterations, report.roundness_ratio, report.converged
    );

    let center = rounded.back_transform_point(&DVector::zeros(rounded.dimension()))?;
    println!("\n✅ 원래 좌표의 라운딩 중심: {:?}", center.as_slice());
    Ok(())
}
