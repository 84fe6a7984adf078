//! Algebraic identities of RxSO(3) checked in single and double precision.

use kornia_rxso3::glam::DMat3;

// Frobenius norm of a column-major 3x3 matrix given as f64 entries.
fn frobenius(cols: &[f64; 9]) -> f64 {
    cols.iter().map(|x| x * x).sum::<f64>().sqrt()
}

// Matrix exponential by scaling and squaring of a truncated Taylor series.
fn expm(a: DMat3) -> DMat3 {
    let norm = frobenius(&a.to_cols_array());
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

macro_rules! rxso3_property_tests {
    (
        $mod_name:ident,
        $group:ident,
        $map:ident,
        $scalar:ty,
        $vec3:ty,
        $vec4:ty,
        $mat3:ty,
        $extreme_sigma:expr
    ) => {
        mod $mod_name {
            use super::{expm, frobenius};
            use kornia_rxso3::glam::DMat3;
            use kornia_rxso3::{product, LieError, LieGroup, LieScalar, $group, $map};

            const SMALL_EPS: f64 = <$scalar as LieScalar>::SMALL_EPSILON as f64;

            fn pi() -> $scalar {
                <$scalar as LieScalar>::pi()
            }

            fn tangent(a: f64, b: f64, c: f64, d: f64) -> $vec4 {
                <$vec4>::new(a as $scalar, b as $scalar, c as $scalar, d as $scalar)
            }

            fn to_f64(m: $mat3) -> DMat3 {
                DMat3::from_cols_array(&m.to_cols_array().map(f64::from))
            }

            fn mat_norm(m: $mat3) -> f64 {
                frobenius(&to_f64(m).to_cols_array())
            }

            fn vec_norm(v: $vec4) -> f64 {
                v.to_array()
                    .iter()
                    .map(|&x| f64::from(x).powi(2))
                    .sum::<f64>()
                    .sqrt()
            }

            // tolerance relative to the magnitude of the reference value
            fn tol(reference: f64) -> f64 {
                SMALL_EPS * reference.max(1.0)
            }

            fn elements() -> Vec<$group> {
                let p = pi() as f64;
                vec![
                    $group::exp(tangent(0.2, 0.5, 0.0, 1.0)),
                    $group::exp(tangent(0.2, 0.5, -1.0, 1.1)),
                    $group::exp(tangent(0.0, 0.0, 0.0, 1.1)),
                    $group::exp(tangent(0.0, 0.0, 0.00001, 0.0)),
                    $group::exp(tangent(0.0, 0.0, 0.00001, 0.00001)),
                    $group::exp(tangent(0.0, 0.0, 0.00001, 0.0)),
                    $group::exp(tangent(p, 0.0, 0.0, 0.9)),
                    product([
                        $group::exp(tangent(0.2, 0.5, 0.0, 0.0)),
                        $group::exp(tangent(p, 0.0, 0.0, 0.0)),
                        $group::exp(tangent(-0.2, -0.5, -0.0, 0.0)),
                    ]),
                    product([
                        $group::exp(tangent(0.3, 0.5, 0.1, 0.0)),
                        $group::exp(tangent(p, 0.0, 0.0, 0.0)),
                        $group::exp(tangent(-0.3, -0.5, -0.1, 0.0)),
                    ]),
                ]
            }

            fn tangents() -> Vec<$vec4> {
                vec![
                    tangent(0.0, 0.0, 0.0, 0.0),
                    tangent(1.0, 0.0, 0.0, 0.0),
                    tangent(1.0, 0.0, 0.0, 0.1),
                    tangent(0.0, 1.0, 0.0, 0.1),
                    tangent(0.0, 0.0, 1.0, -0.1),
                    tangent(-1.0, 1.0, 0.0, -0.1),
                    tangent(20.0, -1.0, 0.0, 2.0),
                ]
            }

            #[test]
            fn test_exp_log_roundtrip_on_elements() {
                for (i, g) in elements().iter().enumerate() {
                    let expected = g.matrix();
                    let roundtrip = $group::exp(g.log().unwrap()).matrix();
                    let diff = mat_norm(expected - roundtrip);
                    assert!(
                        diff <= tol(mat_norm(expected)),
                        "exp(log(g)) case {i}: diff {diff}"
                    );
                }
            }

            #[test]
            fn test_log_exp_roundtrip_on_tangents() {
                let p = pi() as f64;
                let cases = [
                    tangent(0.2, 0.5, 0.0, 1.0),
                    tangent(0.2, 0.5, -1.0, 1.1),
                    tangent(p, 0.0, 0.0, 0.9),
                    tangent(0.0, 0.0, 0.00001, 0.0),
                    tangent(0.0, 0.0, 0.00001, 0.00001),
                    tangent(0.0, 0.0, 0.0, 1.1),
                    tangent(0.1, -0.2, 0.3, -20.0),
                    tangent(-0.1, 0.2, 0.3, 20.0),
                ];
                for (i, x) in cases.iter().enumerate() {
                    let back = $group::exp(*x).log().unwrap();
                    let diff = vec_norm(back - *x);
                    assert!(diff <= tol(vec_norm(*x)), "log(exp(x)) case {i}: diff {diff}");
                }
            }

            #[test]
            fn test_action_matches_matrix() {
                let p = <$vec3>::new(1.0, 2.0, 4.0);
                for (i, g) in elements().iter().enumerate() {
                    let res1 = g.act(p);
                    let res2 = g.matrix() * p;
                    let diff = f64::from((res1 - res2).length());
                    assert!(
                        diff <= tol(f64::from(res2.length())),
                        "act case {i}: diff {diff}"
                    );
                }
            }

            #[test]
            fn test_inverse() {
                for (i, g) in elements().iter().enumerate() {
                    let res = g.matrix() * g.inverse().unwrap().matrix();
                    let diff = mat_norm(res - <$mat3>::IDENTITY);
                    assert!(diff <= tol(1.0), "inverse case {i}: diff {diff}");

                    let composed = g.compose(&g.inverse().unwrap()).matrix();
                    let diff = mat_norm(composed - <$mat3>::IDENTITY);
                    assert!(diff <= tol(1.0), "compose inverse case {i}: diff {diff}");
                }
            }

            #[test]
            fn test_adjoint() {
                let x = tangent(0.9, 2.0, 3.0, 1.2);
                for (i, g) in elements().iter().enumerate() {
                    let ad1 = g.adjoint() * x;
                    let ad2 = $group::vee(
                        g.matrix() * $group::hat(x) * g.inverse().unwrap().matrix(),
                    );
                    let diff = vec_norm(ad1 - ad2);
                    assert!(diff <= tol(vec_norm(x)), "adjoint case {i}: diff {diff}");
                }
            }

            #[test]
            fn test_compose_through_map() {
                let elements = elements();
                for (i, a) in elements.iter().enumerate() {
                    for (j, b) in elements.iter().enumerate() {
                        let expected = a.compose(b).matrix();

                        let mut raw = [0.0 as $scalar; 4];
                        let mut view = $map::new(&mut raw).unwrap();
                        view.assign(a);
                        view.compose_assign(b);

                        let diff = mat_norm(expected - view.matrix());
                        assert!(
                            diff <= tol(mat_norm(expected)),
                            "map compose case {i},{j}: diff {diff}"
                        );
                        assert_eq!(raw, a.compose(b).to_params());
                    }
                }
            }

            #[test]
            fn test_hat_vee() {
                for (i, x) in tangents().iter().enumerate() {
                    let diff = vec_norm(*x - $group::vee($group::hat(*x)));
                    assert!(diff <= tol(vec_norm(*x)), "hat-vee case {i}: diff {diff}");
                }
            }

            #[test]
            fn test_lie_bracket() {
                let tangents = tangents();
                for (i, a) in tangents.iter().enumerate() {
                    for (j, b) in tangents.iter().enumerate() {
                        let res1 = $group::lie_bracket(*a, *b);
                        let hat_a = $group::hat(*a);
                        let hat_b = $group::hat(*b);
                        let res2 = $group::vee(hat_a * hat_b - hat_b * hat_a);
                        let diff = vec_norm(res1 - res2);
                        let magnitude = vec_norm(*a) * vec_norm(*b);
                        assert!(diff <= tol(magnitude), "bracket case {i},{j}: diff {diff}");
                        assert_eq!(res1.w, 0.0);
                    }
                }
            }

            #[test]
            fn test_matrix_exponential_of_hat() {
                for (i, x) in tangents().iter().enumerate() {
                    let exp_x = to_f64($group::exp(*x).matrix());
                    let expm_hat_x = expm(to_f64($group::hat(*x)));
                    let diff = frobenius(&(exp_x - expm_hat_x).to_cols_array());
                    let reference = frobenius(&expm_hat_x.to_cols_array());
                    assert!(diff <= tol(reference), "expm(hat(x)) case {i}: diff {diff}");
                }
            }

            #[test]
            fn test_random_elements() {
                let p = <$vec3>::new(-0.5, 3.0, 1.5);
                for _ in 0..20 {
                    let g = $group::from_random();
                    let res1 = g.act(p);
                    let res2 = g.matrix() * p;
                    assert!(f64::from((res1 - res2).length()) <= tol(f64::from(res2.length())));

                    let back = $group::exp(g.log().unwrap());
                    let diff = mat_norm(back.matrix() - g.matrix());
                    assert!(diff <= tol(mat_norm(g.matrix())));
                }
            }

            #[test]
            fn test_generic_interface() {
                fn roundtrip<G: LieGroup>(g: &G) -> Result<G, LieError> {
                    Ok(G::exp(g.log()?))
                }

                assert_eq!(<$group as LieGroup>::DOF, 4);
                assert_eq!(<$group as LieGroup>::NUM_PARAMETERS, 4);
                assert_eq!(<$group as LieGroup>::identity(), $group::IDENTITY);

                let g = $group::exp(tangent(0.2, 0.5, -1.0, 1.1));
                let back = roundtrip(&g).unwrap();
                let diff = mat_norm(back.matrix() - g.matrix());
                assert!(diff <= tol(mat_norm(g.matrix())));

                let tau = tangent(0.05, -0.02, 0.01, 0.03);
                let delta = LieGroup::rminus(&g, &LieGroup::rplus(&g, tau)).unwrap();
                assert!(vec_norm(delta - tau) <= tol(1.0) * 10.0);
            }

            #[test]
            fn test_extreme_scale() {
                // squared norms of these elements are out of range for the precision
                let p = <$vec3>::new(1.0, 2.0, 4.0);
                for sigma in [$extreme_sigma, -$extreme_sigma] {
                    let x = tangent(0.1, 0.2, 0.3, sigma);
                    let g = $group::exp(x);

                    let back = g.log().unwrap();
                    let diff = vec_norm(back - x);
                    assert!(diff <= tol(vec_norm(x)), "log(exp(x)) sigma {sigma}: diff {diff}");

                    let inv = g.inverse().unwrap();
                    assert_ne!(inv.to_params(), [0.0 as $scalar; 4]);
                    let identity = g.compose(&inv).matrix();
                    let diff = mat_norm(identity - <$mat3>::IDENTITY);
                    assert!(diff <= tol(1.0), "inverse sigma {sigma}: diff {diff}");

                    let unit = f64::from(g.rotation().unwrap().length());
                    assert!((unit - 1.0).abs() <= tol(1.0), "rotation sigma {sigma}");

                    // divide the scale out first, |s·R·p|² is itself out of range
                    let rotated = g.act(p) / g.scale();
                    let ratio = f64::from(rotated.length()) / f64::from(p.length());
                    assert!((ratio - 1.0).abs() <= tol(1.0), "act sigma {sigma}");
                }
            }

            #[test]
            fn test_degenerate_element() {
                let mut raw = [0.0 as $scalar; 4];
                let mut view = $map::new(&mut raw).unwrap();
                assert_eq!(view.invert(), Err(LieError::DegenerateElement));
                assert_eq!(view.log(), Err(LieError::DegenerateElement));
                assert_eq!(raw, [0.0 as $scalar; 4]);

                assert_eq!(
                    $group::from_params([0.0; 4]),
                    Err(LieError::DegenerateElement)
                );

                // scale collapsing to zero is reported, not replaced by the identity
                let collapsed = $group::exp(tangent(0.1, 0.2, 0.3, -1000.0));
                assert_eq!(collapsed.log(), Err(LieError::DegenerateElement));
                assert_eq!(collapsed.inverse(), Err(LieError::DegenerateElement));
                assert_eq!(collapsed.rotation(), Err(LieError::DegenerateElement));
            }
        }
    };
}

rxso3_property_tests!(
    double_precision,
    RxSO3F64,
    RxSO3MapF64,
    f64,
    kornia_rxso3::glam::DVec3,
    kornia_rxso3::glam::DVec4,
    kornia_rxso3::glam::DMat3,
    380.0
);

rxso3_property_tests!(
    single_precision,
    RxSO3F32,
    RxSO3MapF32,
    f32,
    kornia_rxso3::glam::Vec3,
    kornia_rxso3::glam::Vec4,
    kornia_rxso3::glam::Mat3,
    45.0
);
