//! Text and CSV rendering of solutions.

use hx_project::Project;
use hx_solver::{SolveMethod, Solution};
use std::fmt::Write;

pub fn solution_summary(solution: &Solution) -> String {
    let mut out = String::new();
    let method = match solution.method {
        SolveMethod::Linear => "linear (constant conductivities)".to_string(),
        SolveMethod::Picard => format!("picard ({} iterations)", solution.iterations),
    };
    let _ = writeln!(out, "  Method:  {method}");
    let _ = writeln!(out, "  q:       {:.3} W/m²", solution.q);
    let _ = writeln!(out, "  R_total: {:.5} m²K/W", solution.r_total);
    let _ = writeln!(out, "  U:       {:.5} W/m²K", solution.u_value());
    let _ = writeln!(out);
    let _ = writeln!(out, "  {:<16} {:>12} {:>12}", "Point", "x [mm]", "T [°C]");
    for (label, x, t) in solution.table() {
        let _ = writeln!(out, "  {label:<16} {x:>12.2} {t:>12.2}");
    }
    out
}

pub fn layer_summary(project: &Project, solution: Option<&Solution>) -> String {
    let mut out = String::new();
    for (i, layer) in project.layers.iter().enumerate() {
        let name = layer.name().unwrap_or("-");
        let source = match layer {
            hx_project::LayerDef::Material {
                material_id,
                use_kt,
                ..
            } => {
                if *use_kt {
                    format!("material {material_id} (k(T))")
                } else {
                    format!("material {material_id}")
                }
            }
            hx_project::LayerDef::Custom { k_w_mk, .. } => format!("k = {k_w_mk} W/m·K"),
        };
        let _ = write!(
            out,
            "  {:>2}. {:<12} {:>8.2} mm  {}",
            i + 1,
            name,
            layer.thickness_mm(),
            source
        );
        if let Some(k) = solution.and_then(|s| s.layer_conductivities.get(i)) {
            let _ = write!(out, "  k_eff = {k:.4}");
        }
        out.push('\n');
    }
    out
}

/// Profile points as `position_mm,temperature_c` rows. Uses the fine
/// relaxation profile when present, otherwise the interface points.
pub fn profile_csv(solution: &Solution) -> String {
    let (positions, temperatures) = match &solution.profile {
        Some(profile) => (&profile.positions_mm, &profile.temperatures),
        None => (&solution.positions_mm, &solution.interface_temperatures),
    };
    let mut csv = String::from("position_mm,temperature_c\n");
    for (x, t) in positions.iter().zip(temperatures) {
        csv.push_str(&format!("{},{}\n", x, t));
    }
    csv
}
