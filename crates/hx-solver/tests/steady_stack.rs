//! Integration tests for the insulation stack solver.

use hx_core::{Tolerances, nearly_equal};
use hx_materials::{InMemoryMaterialStore, InterpolationMode, KtPoint, Material, MaterialStore};
use hx_solver::*;
use proptest::prelude::*;

fn mineral_wool() -> Material {
    Material::new(
        "Mineral wool",
        Some(0.04),
        vec![KtPoint::new(0.0, 0.03), KtPoint::new(100.0, 0.05)],
    )
    .unwrap()
}

fn high_temp_wool() -> Material {
    Material::new(
        "High temperature wool",
        None,
        vec![
            KtPoint::new(50.0, 0.040),
            KtPoint::new(100.0, 0.045),
            KtPoint::new(200.0, 0.058),
            KtPoint::new(300.0, 0.075),
            KtPoint::new(400.0, 0.097),
        ],
    )
    .unwrap()
}

fn store_with(materials: &[Material]) -> InMemoryMaterialStore {
    materials.iter().cloned().collect()
}

#[test]
fn scenario_two_constant_layers() {
    let problem = InsulationProblem::new(
        vec![Layer::custom(50.0, 0.04), Layer::custom(100.0, 0.12)],
        BoundaryConditions::new(20.0, -10.0, 25.0),
    );
    let sol = solve(&problem, &InMemoryMaterialStore::new(), &SolveConfig::default()).unwrap();

    let r_total = 1.25 + 0.10 / 0.12 + 0.04;
    let q = 30.0 / r_total;
    assert_eq!(sol.method, SolveMethod::Linear);
    assert!(sol.profile.is_none());
    assert!((sol.r_total - r_total).abs() < 1e-12);
    assert!((sol.q - q).abs() < 1e-12);
    assert!((sol.q.abs() - 14.13).abs() < 1e-2);
    let expected = [20.0, 20.0 - q * 1.25, 20.0 - q * (1.25 + 0.10 / 0.12)];
    for (t, e) in sol.interface_temperatures.iter().zip(expected) {
        assert!((t - e).abs() < 1e-12);
    }
    assert_eq!(sol.positions_mm, vec![0.0, 50.0, 150.0]);
}

#[test]
fn single_layer_closed_form() {
    let (l_mm, k, h) = (80.0, 0.05, 12.0);
    let bc = BoundaryConditions::new(250.0, 15.0, h);
    let problem = InsulationProblem::new(vec![Layer::custom(l_mm, k)], bc);
    let sol = solve(&problem, &InMemoryMaterialStore::new(), &SolveConfig::default()).unwrap();

    let r = (l_mm / 1000.0) / k;
    let q = (250.0 - 15.0) / (r + 1.0 / h);
    assert!((sol.q - q).abs() < 1e-12);
    assert_eq!(sol.interface_temperatures.len(), 2);
    assert_eq!(sol.interface_temperatures[0], 250.0);
    assert!((sol.interface_temperatures[1] - (250.0 - q * r)).abs() < 1e-12);
}

#[test]
fn temperature_dependent_layer_uses_relaxation() {
    let wool = high_temp_wool();
    let store = store_with(&[wool.clone()]);
    let problem = InsulationProblem::new(
        vec![
            Layer::material(100.0, wool.id, true).named("Wool"),
            Layer::custom(0.7, 50.0).named("Cladding"),
        ],
        BoundaryConditions::new(400.0, 20.0, 10.0),
    );
    let config = SolveConfig::default();
    let sol = solve(&problem, &store, &config).unwrap();

    assert_eq!(sol.method, SolveMethod::Picard);
    assert!(sol.iterations >= 2);
    let profile = sol.profile.as_ref().unwrap();
    assert_eq!(profile.temperatures.len(), 2 * config.cells_per_layer + 1);
    assert_eq!(profile.positions_mm.len(), profile.temperatures.len());
    assert!((profile.positions_mm.last().unwrap() - 100.7).abs() < 1e-9);
    assert_eq!(
        sol.interface_temperatures[1],
        profile.temperatures[config.cells_per_layer]
    );

    // Energy balance: conduction flux equals convective loss at the surface.
    let t_outer = sol.outer_surface_temperature().unwrap();
    assert!((sol.q - 10.0 * (t_outer - 20.0)).abs() < 1e-6 * sol.q.abs().max(1.0));

    // Effective wool conductivity lies inside the sampled span it sees.
    let k_eff = sol.layer_conductivities[0];
    assert!(k_eff > 0.040 && k_eff < 0.097, "k_eff = {k_eff}");
}

#[test]
fn relaxation_is_idempotent_at_fixed_point() {
    let wool = high_temp_wool();
    let layers = vec![ResolvedLayer {
        index: 0,
        thickness_mm: 120.0,
        source: ConductivitySource::Material {
            material: wool,
            use_kt: true,
        },
    }];
    let bc = BoundaryConditions::new(380.0, 10.0, 8.0);
    let config = PicardConfig::default();

    let cells = discretize(&layers, 25).unwrap();
    let first = relax(
        &cells,
        &bc,
        initial_profile(&layers, 25, &bc).unwrap(),
        &config,
        None,
    )
    .unwrap();
    let second = relax(&cells, &bc, first.profile.clone(), &config, None).unwrap();

    assert_eq!(second.iterations, 1);
    assert!((&second.profile - &first.profile).amax() < config.tol);
    assert!((second.q - first.q).abs() < 1e-3 * first.q.abs());
}

#[test]
fn interpolation_scenario() {
    let wool = mineral_wool();
    let k = wool.conductivity_at(50.0, InterpolationMode::Clamp).unwrap();
    assert!((k - 0.04).abs() < 1e-12);
    assert_eq!(wool.conductivity_at(150.0, InterpolationMode::Clamp).unwrap(), 0.05);
    assert!(wool.conductivity_at(150.0, InterpolationMode::Strict).is_err());
}

#[test]
fn strict_mode_out_of_range_fails_with_range_error() {
    let wool = mineral_wool();
    let store = store_with(&[wool.clone()]);
    let problem = InsulationProblem::new(
        vec![Layer::material(50.0, wool.id, true)],
        BoundaryConditions::new(150.0, 20.0, 10.0),
    );

    let clamp = solve(&problem, &store, &SolveConfig::default());
    assert!(clamp.is_ok());

    let strict = SolveConfig {
        picard: PicardConfig {
            mode: InterpolationMode::Strict,
            ..PicardConfig::default()
        },
        ..SolveConfig::default()
    };
    let err = solve(&problem, &store, &strict).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Range);
    match err {
        SolverError::Range {
            layer, material, max, ..
        } => {
            assert_eq!(layer, 0);
            assert_eq!(material, "Mineral wool");
            assert_eq!(max, 100.0);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn single_iteration_with_sharp_curve_fails_to_converge() {
    let sharp = Material::new(
        "Phase change board",
        None,
        vec![
            KtPoint::new(0.0, 0.02),
            KtPoint::new(300.0, 0.02),
            KtPoint::new(310.0, 2.0),
            KtPoint::new(500.0, 2.0),
        ],
    )
    .unwrap();
    let store = store_with(&[sharp.clone()]);
    let problem = InsulationProblem::new(
        vec![Layer::material(100.0, sharp.id, true)],
        BoundaryConditions::new(400.0, 20.0, 10.0),
    );
    let config = SolveConfig {
        picard: PicardConfig {
            max_iter: 1,
            ..PicardConfig::default()
        },
        ..SolveConfig::default()
    };

    let mut sweeps = 0;
    let mut count = |_: RelaxationEvent| sweeps += 1;
    let err = solve_with_progress(&problem, &store, &config, Some(&mut count)).unwrap_err();
    assert_eq!(sweeps, 1);
    match err {
        SolverError::ConvergenceFailed {
            iterations,
            max_delta,
            tol,
        } => {
            assert_eq!(iterations, 1);
            assert!(max_delta > tol);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn missing_material_is_reported_per_layer() {
    let wool = mineral_wool();
    let mut store = store_with(&[wool.clone()]);
    let problem = InsulationProblem::new(
        vec![Layer::custom(10.0, 1.0), Layer::material(50.0, wool.id, true)],
        BoundaryConditions::new(80.0, 20.0, 10.0),
    );
    store.delete(wool.id).unwrap();

    let err = solve(&problem, &store, &SolveConfig::default()).unwrap_err();
    assert!(matches!(err, SolverError::Resolution { layer: 1, .. }));
}

#[test]
fn invalid_config_is_rejected() {
    let problem = InsulationProblem::new(
        vec![Layer::custom(10.0, 1.0)],
        BoundaryConditions::new(80.0, 20.0, 10.0),
    );
    let config = SolveConfig {
        cells_per_layer: 0,
        ..SolveConfig::default()
    };
    let err = solve(&problem, &InMemoryMaterialStore::new(), &config).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
}

fn is_monotone(temps: &[f64], falling: bool) -> bool {
    temps.windows(2).all(|w| {
        if falling {
            w[1] <= w[0] + 1e-12
        } else {
            w[1] >= w[0] - 1e-12
        }
    })
}

proptest! {
    #[test]
    fn profile_is_monotone_between_boundaries(
        layers in prop::collection::vec((1.0_f64..200.0, 0.01_f64..2.0), 1..4),
        with_wool in any::<bool>(),
        t_left in -50.0_f64..500.0,
        t_inf in -50.0_f64..500.0,
        h in 1.0_f64..100.0,
    ) {
        let wool = mineral_wool();
        let store = store_with(&[wool.clone()]);
        let mut stack: Vec<Layer> = layers.iter().map(|&(d, k)| Layer::custom(d, k)).collect();
        if with_wool {
            stack.insert(0, Layer::material(60.0, wool.id, true));
        }
        let problem = InsulationProblem::new(stack, BoundaryConditions::new(t_left, t_inf, h));
        let sol = solve(&problem, &store, &SolveConfig::default()).unwrap();

        let falling = t_left > t_inf;
        prop_assert!(is_monotone(&sol.interface_temperatures, falling));
        if let Some(profile) = &sol.profile {
            prop_assert!(is_monotone(&profile.temperatures, falling));
        }
        prop_assert_eq!(sol.q > 0.0, falling);
    }

    #[test]
    fn forced_relaxation_matches_linear_for_constant_stack(
        layers in prop::collection::vec((0.5_f64..200.0, 0.02_f64..60.0), 1..5),
        board_at in prop::option::of(0_usize..5),
        t_left in -50.0_f64..600.0,
        t_inf in -50.0_f64..600.0,
        h in 1.0_f64..100.0,
    ) {
        let board = Material::new("Calcium silicate", Some(0.065), vec![]).unwrap();
        let store = store_with(&[board.clone()]);
        let mut stack: Vec<Layer> = layers.iter().map(|&(d, k)| Layer::custom(d, k)).collect();
        if let Some(at) = board_at {
            stack.insert(at.min(stack.len()), Layer::material(60.0, board.id, false));
        }
        let problem = InsulationProblem::new(stack, BoundaryConditions::new(t_left, t_inf, h));

        let linear = solve(&problem, &store, &SolveConfig::default()).unwrap();
        let relaxed = solve(
            &problem,
            &store,
            &SolveConfig {
                force_relaxation: true,
                ..SolveConfig::default()
            },
        )
        .unwrap();

        prop_assert_eq!(linear.method, SolveMethod::Linear);
        prop_assert_eq!(relaxed.method, SolveMethod::Picard);
        prop_assert_eq!(relaxed.iterations, 1);
        let tol = Tolerances {
            abs: 1e-9,
            rel: 1e-9,
        };
        prop_assert!(nearly_equal(linear.q, relaxed.q, tol), "{} vs {}", linear.q, relaxed.q);
        prop_assert!(nearly_equal(linear.r_total, relaxed.r_total, tol));
        prop_assert_eq!(
            linear.interface_temperatures.len(),
            relaxed.interface_temperatures.len()
        );
        for (a, b) in linear
            .interface_temperatures
            .iter()
            .zip(&relaxed.interface_temperatures)
        {
            prop_assert!(nearly_equal(*a, *b, tol), "{} vs {}", a, b);
        }
        for (a, b) in linear.positions_mm.iter().zip(&relaxed.positions_mm) {
            prop_assert!(nearly_equal(*a, *b, tol));
        }
        for (a, b) in linear
            .layer_conductivities
            .iter()
            .zip(&relaxed.layer_conductivities)
        {
            prop_assert!(nearly_equal(*a, *b, tol));
        }
    }
}
