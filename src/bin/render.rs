use std::path::{Path, PathBuf};

use panve::aggregation::{build_series, DenominatorPolicy};
use panve::catalog::Catalog;
use panve::draw::chart_summary;
use panve::error::{PanveError, Result};
use panve::matrix_layout::{build_matrix_with_meta, ReportMeta};
use panve::responses::Responses;
use panve::{svg, terminal};

const USAGE: &str =
    "Usage: panve-render [--responses FILE] [--out-dir DIR] [--policy evaluated|possible] [--name NAME] [--date DATE] [--quiet]";

struct Args {
    responses: Option<PathBuf>,
    out_dir: PathBuf,
    policy: DenominatorPolicy,
    name: Option<String>,
    date: Option<String>,
    quiet: bool,
}

fn parse_args() -> Args {
    let args: Vec<String> = std::env::args().collect();
    let mut responses: Option<PathBuf> = None;
    let mut out_dir = PathBuf::from("out");
    let mut policy = DenominatorPolicy::default();
    let mut name: Option<String> = None;
    let mut date: Option<String> = None;
    let mut quiet = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--responses" => {
                i += 1;
                if i < args.len() {
                    responses = Some(PathBuf::from(&args[i]));
                }
            }
            "--out-dir" => {
                i += 1;
                if i < args.len() {
                    out_dir = PathBuf::from(&args[i]);
                }
            }
            "--policy" => {
                i += 1;
                if i < args.len() {
                    policy = DenominatorPolicy::parse(&args[i]).unwrap_or_else(|| {
                        eprintln!(
                            "Invalid --policy value: {} (expected evaluated or possible)",
                            args[i]
                        );
                        std::process::exit(1);
                    });
                }
            }
            "--name" => {
                i += 1;
                if i < args.len() {
                    name = Some(args[i].clone());
                }
            }
            "--date" => {
                i += 1;
                if i < args.len() {
                    date = Some(args[i].clone());
                }
            }
            "--quiet" | "-q" => {
                quiet = true;
            }
            "--help" | "-h" => {
                println!("{}", USAGE);
                println!();
                println!("Options:");
                println!(
                    "  --responses FILE   Assessment JSON (stored record or bare responses); empty if omitted"
                );
                println!("  --out-dir DIR      Output directory (default: out)");
                println!("  --policy NAME      Chart denominator: evaluated (default) or possible");
                println!("  --name NAME        Patient name for the matrix header");
                println!("  --date DATE        Assessment date (default: today, dd/mm/yyyy)");
                println!("  --quiet            Do not print the text matrix");
                std::process::exit(0);
            }
            other => {
                eprintln!("Unknown argument: {}", other);
                eprintln!("{}", USAGE);
                std::process::exit(1);
            }
        }
        i += 1;
    }

    Args {
        responses,
        out_dir,
        policy,
        name,
        date,
        quiet,
    }
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    std::fs::write(path, contents).map_err(|e| PanveError::io(path, e))?;
    tracing::info!(path = %path.display(), bytes = contents.len(), "wrote");
    Ok(())
}

fn run(args: Args) -> Result<()> {
    let _base = panve::env_config::init_base_path();
    let catalog: Catalog = panve::env_config::catalog_from_env()?;

    let responses = match &args.responses {
        Some(path) => Some(Responses::load(path)?),
        None => None,
    };
    if let Some(r) = &responses {
        catalog.warn_unknown_questions(r);
    }

    let meta = match args.date {
        Some(date) => ReportMeta::new(args.name, date),
        None => ReportMeta::dated_today(args.name),
    };

    let grid = build_matrix_with_meta(responses.as_ref(), &catalog, &meta);
    let series = build_series(responses.as_ref(), &catalog, args.policy);

    std::fs::create_dir_all(&args.out_dir).map_err(|e| PanveError::io(&args.out_dir, e))?;
    write_file(&args.out_dir.join("matrix.svg"), &svg::matrix_svg(&grid, &meta))?;
    write_file(&args.out_dir.join("chart.svg"), &svg::chart_svg(&series))?;
    let series_json = serde_json::to_string_pretty(&series)?;
    write_file(&args.out_dir.join("series.json"), &series_json)?;

    if !args.quiet {
        print!("{}", terminal::render_matrix(&grid));
        println!();
        for line in chart_summary(&series) {
            println!("{}", line);
        }
    }
    Ok(())
}

fn main() {
    panve::env_config::init_tracing();
    let args = parse_args();
    if let Err(e) = run(args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
