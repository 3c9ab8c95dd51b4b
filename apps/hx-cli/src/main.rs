mod error;
mod report;

use clap::{Args, Parser, Subcommand};
use error::{CliError, CliResult};
use hx_materials::{
    InterpolationMode, JsonMaterialStore, KtCurve, KtPoint, Material, MaterialId, MaterialStore,
};
use hx_project::{Project, ProjectStore, load_any};
use hx_solver::{RelaxationEvent, Solution};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "hx-cli")]
#[command(about = "Heatrix CLI - steady multilayer insulation solver", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve a project file and print the temperature table
    Solve(SolveArgs),
    /// Manage stored projects
    #[command(subcommand)]
    Project(ProjectCommands),
    /// Manage the material library
    #[command(subcommand)]
    Material(MaterialCommands),
}

#[derive(Args)]
struct SolveArgs {
    /// Path to the project YAML or JSON file
    project_path: PathBuf,
    /// Directory holding materials.json
    #[arg(long, default_value = ".")]
    materials: PathBuf,
    /// Cells per layer on the relaxation path
    #[arg(long)]
    cells: Option<usize>,
    /// Maximum relaxation sweeps
    #[arg(long)]
    max_iter: Option<usize>,
    /// Convergence tolerance in °C
    #[arg(long)]
    tol: Option<f64>,
    /// Fail instead of clamping outside the sampled conductivity range
    #[arg(long)]
    strict: bool,
    /// Write the temperature profile to this CSV file
    #[arg(long)]
    profile_csv: Option<PathBuf>,
    /// Save the project and its result into this project store
    #[arg(long)]
    store: Option<PathBuf>,
}

#[derive(Subcommand)]
enum ProjectCommands {
    /// List stored project names
    List {
        #[arg(long)]
        store: PathBuf,
    },
    /// Show a stored project and its last result
    Show {
        name: String,
        #[arg(long)]
        store: PathBuf,
        /// Directory holding materials.json, used to check the stored result
        #[arg(long, default_value = ".")]
        materials: PathBuf,
    },
    /// Delete a stored project
    Delete {
        name: String,
        #[arg(long)]
        store: PathBuf,
    },
    /// Copy a project file into the store, replacing any project of the same name
    Import {
        project_path: PathBuf,
        #[arg(long)]
        store: PathBuf,
    },
}

#[derive(Subcommand)]
enum MaterialCommands {
    /// List all materials
    List {
        #[arg(long, default_value = ".")]
        materials: PathBuf,
    },
    /// Show one material by id or name
    Show {
        material: String,
        #[arg(long, default_value = ".")]
        materials: PathBuf,
    },
    /// Add a material
    Add {
        #[arg(long)]
        name: String,
        /// Constant conductivity in W/m·K
        #[arg(long)]
        k: Option<f64>,
        /// Conductivity sample as `T:k` (°C:W/m·K), repeatable
        #[arg(long = "point")]
        points: Vec<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long, default_value = ".")]
        materials: PathBuf,
    },
    /// Delete a material by id or name
    Delete {
        material: String,
        #[arg(long, default_value = ".")]
        materials: PathBuf,
    },
    /// Replace the conductivity samples of a material
    SetPoints {
        material: String,
        /// Conductivity sample as `T:k` (°C:W/m·K), repeatable; none clears the curve
        #[arg(long = "point")]
        points: Vec<String>,
        #[arg(long, default_value = ".")]
        materials: PathBuf,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Solve(args) => cmd_solve(&args),
        Commands::Project(cmd) => match cmd {
            ProjectCommands::List { store } => cmd_project_list(store),
            ProjectCommands::Show {
                name,
                store,
                materials,
            } => cmd_project_show(&name, store, materials),
            ProjectCommands::Delete { name, store } => cmd_project_delete(&name, store),
            ProjectCommands::Import {
                project_path,
                store,
            } => cmd_project_import(&project_path, store),
        },
        Commands::Material(cmd) => match cmd {
            MaterialCommands::List { materials } => cmd_material_list(materials),
            MaterialCommands::Show {
                material,
                materials,
            } => cmd_material_show(&material, materials),
            MaterialCommands::Add {
                name,
                k,
                points,
                description,
                materials,
            } => cmd_material_add(name, k, &points, description, materials),
            MaterialCommands::Delete {
                material,
                materials,
            } => cmd_material_delete(&material, materials),
            MaterialCommands::SetPoints {
                material,
                points,
                materials,
            } => cmd_material_set_points(&material, &points, materials),
        },
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn cmd_solve(args: &SolveArgs) -> CliResult<()> {
    println!("Solving project: {}", args.project_path.display());
    let mut report_progress = |event: RelaxationEvent| {
        eprint!(
            "\r  iter={}  q={:.3} W/m²  max_delta={:.3e} °C",
            event.iteration, event.q, event.max_delta
        );
        let _ = io::stderr().flush();
    };
    let outcome = run_solve(args, Some(&mut report_progress));
    clear_progress_line();
    let (project, solution) = outcome?;

    println!("✓ Solved '{}'", project.name);
    print!("{}", report::layer_summary(&project, Some(&solution)));
    println!();
    print!("{}", report::solution_summary(&solution));

    if let Some(path) = &args.profile_csv {
        println!("✓ Exported profile to {}", path.display());
    }
    if args.store.is_some() {
        println!("✓ Stored project '{}'", project.name);
    }
    Ok(())
}

/// Write the flag overrides into the project's settings. A project without
/// overrides keeps `settings` as it was loaded.
fn apply_overrides(project: &mut Project, args: &SolveArgs) {
    let overridden =
        args.cells.is_some() || args.max_iter.is_some() || args.tol.is_some() || args.strict;
    if !overridden {
        return;
    }
    let mut settings = project.settings.unwrap_or_default();
    if let Some(cells) = args.cells {
        settings.cells_per_layer = cells;
    }
    if let Some(max_iter) = args.max_iter {
        settings.max_iter = max_iter;
    }
    if let Some(tol) = args.tol {
        settings.tol_c = tol;
    }
    if args.strict {
        settings.interpolation = InterpolationMode::Strict;
    }
    project.settings = Some(settings);
}

/// Load, solve, export and store a project. Returns the project with the
/// new result recorded on it.
fn run_solve(
    args: &SolveArgs,
    observer: Option<&mut dyn FnMut(RelaxationEvent)>,
) -> CliResult<(Project, Solution)> {
    let mut project = load_any(&args.project_path)?;
    let materials = JsonMaterialStore::open(args.materials.clone())?;

    apply_overrides(&mut project, args);
    hx_project::validate_project(&project)?;

    let solution = hx_solver::solve_with_progress(
        &project.to_problem(),
        &materials,
        &project.solve_config(),
        observer,
    )?;

    if let Some(path) = &args.profile_csv {
        std::fs::write(path, report::profile_csv(&solution))?;
    }

    project.record_result(solution.clone(), &materials);
    if let Some(store_dir) = &args.store {
        let store = ProjectStore::new(store_dir.clone())?;
        store.save(&project)?;
        info!(name = %project.name, "stored project with result");
    }
    Ok((project, solution))
}

fn clear_progress_line() {
    eprint!("\r{}\r", " ".repeat(80));
    let _ = io::stderr().flush();
}

fn cmd_project_list(store_dir: PathBuf) -> CliResult<()> {
    let store = ProjectStore::new(store_dir)?;
    let names = store.list_names()?;
    if names.is_empty() {
        println!("No projects stored");
    } else {
        println!("Projects:");
        for name in names {
            println!("  {name}");
        }
    }
    Ok(())
}

fn cmd_project_show(name: &str, store_dir: PathBuf, materials_dir: PathBuf) -> CliResult<()> {
    let store = ProjectStore::new(store_dir)?;
    let project = store.load(name)?;
    let materials = JsonMaterialStore::open(materials_dir)?;
    print_project(&project, &materials);
    Ok(())
}

fn print_project(project: &Project, materials: &dyn MaterialStore) {
    let current = project.current_result(materials);
    println!("Project: {}", project.name);
    println!(
        "  Boundary: T_left = {} °C, T_inf = {} °C, h = {} W/m²K",
        project.boundary.t_left_c, project.boundary.t_inf_c, project.boundary.h_w_m2k
    );
    let config = project.solve_config();
    println!(
        "  Settings: {} cells/layer, max_iter = {}, tol = {} °C, {}",
        config.cells_per_layer,
        config.picard.max_iter,
        config.picard.tol,
        config.picard.mode.as_str()
    );
    println!("\nLayers:");
    print!("{}", report::layer_summary(project, current));

    match (&project.result, current) {
        (Some(stored), Some(solution)) => {
            println!("\nResult (saved {}):", stored.saved_at);
            print!("{}", report::solution_summary(solution));
        }
        (Some(stored), None) => {
            println!(
                "\nStored result from {} is stale: inputs or materials changed since it was computed",
                stored.saved_at
            );
        }
        (None, _) => println!("\nNo stored result"),
    }
}

fn cmd_project_delete(name: &str, store_dir: PathBuf) -> CliResult<()> {
    let store = ProjectStore::new(store_dir)?;
    store.delete(name)?;
    println!("✓ Deleted project '{name}'");
    Ok(())
}

fn cmd_project_import(project_path: &Path, store_dir: PathBuf) -> CliResult<()> {
    let project = load_any(project_path)?;
    let store = ProjectStore::new(store_dir)?;
    let replaced = store.exists(&project.name);
    store.save(&project)?;
    if replaced {
        println!("✓ Replaced project '{}'", project.name);
    } else {
        println!("✓ Imported project '{}'", project.name);
    }
    Ok(())
}

fn find_material(store: &dyn MaterialStore, key: &str) -> CliResult<Material> {
    if let Ok(id) = key.parse::<MaterialId>() {
        return Ok(store.get(id)?);
    }
    store
        .find_by_name(key)?
        .ok_or_else(|| CliError::MaterialNotFound(key.to_string()))
}

fn parse_points(raw: &[String]) -> CliResult<Vec<KtPoint>> {
    raw.iter()
        .map(|s| {
            let (t, k) = s
                .split_once(':')
                .ok_or_else(|| CliError::InvalidInput(format!("expected T:k, got '{s}'")))?;
            let t = t
                .trim()
                .parse::<f64>()
                .map_err(|e| CliError::InvalidInput(format!("temperature in '{s}': {e}")))?;
            let k = k
                .trim()
                .parse::<f64>()
                .map_err(|e| CliError::InvalidInput(format!("conductivity in '{s}': {e}")))?;
            Ok(KtPoint::new(t, k))
        })
        .collect()
}

fn cmd_material_list(dir: PathBuf) -> CliResult<()> {
    let store = JsonMaterialStore::open(dir)?;
    let materials = store.list()?;
    if materials.is_empty() {
        println!("No materials found");
        return Ok(());
    }
    println!("Materials:");
    for m in materials {
        let k = m
            .k_const
            .map(|k| format!("k = {k} W/m·K"))
            .unwrap_or_else(|| "no constant k".to_string());
        println!("  {}  {}  ({}, {} samples)", m.id, m.name, k, m.points.len());
    }
    Ok(())
}

fn cmd_material_show(key: &str, dir: PathBuf) -> CliResult<()> {
    let store = JsonMaterialStore::open(dir)?;
    let m = find_material(&store, key)?;
    println!("Material: {}", m.name);
    println!("  Id: {}", m.id);
    if let Some(description) = &m.description {
        println!("  Description: {description}");
    }
    match m.k_const {
        Some(k) => println!("  Constant k: {k} W/m·K"),
        None => println!("  Constant k: -"),
    }
    if m.points.is_empty() {
        println!("  No conductivity samples");
    } else {
        println!("  {:>10} {:>12}", "T [°C]", "k [W/m·K]");
        for p in m.points.points() {
            println!("  {:>10.1} {:>12.4}", p.t_c, p.k);
        }
    }
    Ok(())
}

fn cmd_material_add(
    name: String,
    k: Option<f64>,
    points: &[String],
    description: Option<String>,
    dir: PathBuf,
) -> CliResult<()> {
    let mut store = JsonMaterialStore::open(dir)?;
    let curve = KtCurve::from_unordered(parse_points(points)?)?;
    let mut material = Material::new(name, k, curve.points().to_vec())?;
    if let Some(description) = description {
        material = material.with_description(description);
    }
    let id = material.id;
    store.insert(material)?;
    println!("✓ Added material {id}");
    Ok(())
}

fn cmd_material_delete(key: &str, dir: PathBuf) -> CliResult<()> {
    let mut store = JsonMaterialStore::open(dir)?;
    let m = find_material(&store, key)?;
    store.delete(m.id)?;
    println!("✓ Deleted material '{}'", m.name);
    Ok(())
}

fn cmd_material_set_points(key: &str, points: &[String], dir: PathBuf) -> CliResult<()> {
    let mut store = JsonMaterialStore::open(dir)?;
    let m = find_material(&store, key)?;
    let curve = KtCurve::from_unordered(parse_points(points)?)?;
    let count = curve.len();
    store.set_points(m.id, curve)?;
    println!("✓ Set {count} samples on '{}'", m.name);
    Ok(())
}
