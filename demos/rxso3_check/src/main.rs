use argh::FromArgs;

use kornia_rxso3::glam::DMat3;
use kornia_rxso3::{product, LieError, LieScalar, RxSO3F32, RxSO3F64, RxSO3MapF32, RxSO3MapF64};

#[derive(FromArgs)]
/// Check the RxSO(3) exp/log, inverse, action, adjoint, matrix exponential and bracket identities
struct Args {
    /// precision to check: f32, f64 or all
    #[argh(option, short = 'p', default = "String::from(\"all\")")]
    precision: String,

    /// multiplier applied to the small-value epsilon of each precision
    #[argh(option, short = 't', default = "1.0")]
    tolerance: f64,
}

/// Outcome of the checks run for one precision.
struct Report {
    name: &'static str,
    tolerance: f64,
    checks: usize,
    failures: usize,
}

impl Report {
    fn new(name: &'static str, tolerance: f64) -> Self {
        Self {
            name,
            tolerance,
            checks: 0,
            failures: 0,
        }
    }

    fn check(&mut self, what: &str, case: &str, diff: f64, magnitude: f64) {
        self.checks += 1;
        let tol = self.tolerance * magnitude.max(1.0);
        // NaN must count as a failure
        if diff <= tol {
            log::debug!("{} {what} [{case}]: diff {diff:e}", self.name);
        } else {
            self.failures += 1;
            log::error!("{} {what} [{case}]: diff {diff:e} > {tol:e}", self.name);
        }
    }
}

fn frobenius(m: &DMat3) -> f64 {
    m.to_cols_array().iter().map(|x| x * x).sum::<f64>().sqrt()
}

// matrix exponential by scaling and squaring of a truncated Taylor series
fn expm(a: DMat3) -> DMat3 {
    let norm = frobenius(&a);
    let squarings = if norm > 0.5 {
        (norm / 0.5).log2().ceil() as i32
    } else {
        0
    };
    let scaled = a * 0.5f64.powi(squarings);

    let mut term = DMat3::IDENTITY;
    let mut sum = DMat3::IDENTITY;
    for k in 1..=20 {
        term = term * scaled * (1.0 / k as f64);
        sum += term;
    }
    for _ in 0..squarings {
        sum = sum * sum;
    }
    sum
}

macro_rules! define_checks {
    ($fn_name:ident, $name:literal, $group:ident, $map:ident, $scalar:ty, $vec3:ty, $vec4:ty, $mat3:ty) => {
        fn $fn_name(tolerance_factor: f64) -> Result<Report, LieError> {
            let eps = f64::from(<$scalar as LieScalar>::SMALL_EPSILON);
            let mut report = Report::new($name, eps * tolerance_factor);

            let t = |a: f64, b: f64, c: f64, d: f64| {
                <$vec4>::new(a as $scalar, b as $scalar, c as $scalar, d as $scalar)
            };
            let mat_norm = |m: $mat3| {
                m.to_cols_array()
                    .iter()
                    .map(|&x| f64::from(x).powi(2))
                    .sum::<f64>()
                    .sqrt()
            };
            let vec_norm = |v: $vec4| f64::from(v.length());
            let to_f64 = |m: $mat3| DMat3::from_cols_array(&m.to_cols_array().map(f64::from));

            let pi = f64::from(<$scalar as LieScalar>::pi());
            let elements = [
                $group::exp(t(0.2, 0.5, 0.0, 1.0)),
                $group::exp(t(0.2, 0.5, -1.0, 1.1)),
                $group::exp(t(0.0, 0.0, 0.0, 1.1)),
                $group::exp(t(0.0, 0.0, 0.00001, 0.0)),
                $group::exp(t(0.0, 0.0, 0.00001, 0.00001)),
                $group::exp(t(pi, 0.0, 0.0, 0.9)),
                product([
                    $group::exp(t(0.2, 0.5, 0.0, 0.0)),
                    $group::exp(t(pi, 0.0, 0.0, 0.0)),
                    $group::exp(t(-0.2, -0.5, 0.0, 0.0)),
                ]),
                product([
                    $group::exp(t(0.3, 0.5, 0.1, 0.0)),
                    $group::exp(t(pi, 0.0, 0.0, 0.0)),
                    $group::exp(t(-0.3, -0.5, -0.1, 0.0)),
                ]),
            ];

            let point = <$vec3>::new(1.0, 2.0, 4.0);
            let x = t(0.9, 2.0, 3.0, 1.2);

            for (i, g) in elements.iter().enumerate() {
                let case = i.to_string();
                let m = g.matrix();
                let inv = g.inverse()?;

                let roundtrip = $group::exp(g.log()?).matrix();
                report.check("exp(log(g))", &case, mat_norm(m - roundtrip), mat_norm(m));

                let expected = m * point;
                report.check(
                    "act",
                    &case,
                    f64::from((g.act(point) - expected).length()),
                    f64::from(expected.length()),
                );

                report.check(
                    "inverse",
                    &case,
                    mat_norm(m * inv.matrix() - <$mat3>::IDENTITY),
                    1.0,
                );

                let ad1 = g.adjoint() * x;
                let ad2 = $group::vee(m * $group::hat(x) * inv.matrix());
                report.check("adjoint", &case, vec_norm(ad1 - ad2), vec_norm(x));

                for (j, h) in elements.iter().enumerate() {
                    let mut raw = [0.0 as $scalar; 4];
                    let mut view = $map::new(&mut raw)?;
                    view.assign(g);
                    view.compose_assign(h);
                    let expected = g.compose(h).matrix();
                    report.check(
                        "compose via map",
                        &format!("{i},{j}"),
                        mat_norm(expected - view.matrix()),
                        mat_norm(expected),
                    );
                }
            }

            let tangents = [
                t(0.0, 0.0, 0.0, 0.0),
                t(1.0, 0.0, 0.0, 0.1),
                t(0.0, 1.0, 0.0, 0.1),
                t(0.0, 0.0, 1.0, -0.1),
                t(-1.0, 1.0, 0.0, -0.1),
                t(20.0, -1.0, 0.0, 2.0),
            ];
            for (i, a) in tangents.iter().enumerate() {
                // log only recovers rotation angles below π
                if f64::from(a.truncate().length()) < pi {
                    let back = $group::exp(*a).log()?;
                    report.check("log(exp(x))", &i.to_string(), vec_norm(back - *a), vec_norm(*a));
                }

                let expected = expm(to_f64($group::hat(*a)));
                let diff = to_f64($group::exp(*a).matrix()) - expected;
                report.check(
                    "expm(hat(x))",
                    &i.to_string(),
                    frobenius(&diff),
                    frobenius(&expected),
                );

                report.check(
                    "vee(hat(x))",
                    &i.to_string(),
                    vec_norm(*a - $group::vee($group::hat(*a))),
                    vec_norm(*a),
                );
                for (j, b) in tangents.iter().enumerate() {
                    let (hat_a, hat_b) = ($group::hat(*a), $group::hat(*b));
                    let expected = $group::vee(hat_a * hat_b - hat_b * hat_a);
                    report.check(
                        "lie bracket",
                        &format!("{i},{j}"),
                        vec_norm($group::lie_bracket(*a, *b) - expected),
                        vec_norm(*a) * vec_norm(*b),
                    );
                }
            }

            Ok(report)
        }
    };
}

define_checks!(
    check_f32,
    "f32",
    RxSO3F32,
    RxSO3MapF32,
    f32,
    kornia_rxso3::glam::Vec3,
    kornia_rxso3::glam::Vec4,
    kornia_rxso3::glam::Mat3
);

define_checks!(
    check_f64,
    "f64",
    RxSO3F64,
    RxSO3MapF64,
    f64,
    kornia_rxso3::glam::DVec3,
    kornia_rxso3::glam::DVec4,
    kornia_rxso3::glam::DMat3
);

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args: Args = argh::from_env();

    let reports = match args.precision.as_str() {
        "f32" => vec![check_f32(args.tolerance)?],
        "f64" => vec![check_f64(args.tolerance)?],
        "all" => vec![
            check_f64(args.tolerance)?,
            check_f32(args.tolerance)?,
        ],
        other => {
            return Err(format!("unknown precision '{other}', expected f32, f64 or all").into())
        }
    };

    let mut failed = false;
    for report in reports.iter() {
        log::info!(
            "{}: {} checks, {} failed (tolerance {:e})",
            report.name,
            report.checks,
            report.failures,
            report.tolerance
        );
        failed |= report.failures > 0;
    }

    if failed {
        eprintln!("failed!");
        std::process::exit(1);
    }

    eprintln!("passed.");
    Ok(())
}
