use std::path::PathBuf;

use log::{debug, info};
use pipe_adapters::{JsonFileTarget, MemoryTarget};
use pipe_core::{DataFrame, RunDecision, Value};
use pipeflow::demo::{self, ADDED};
use pipeflow::{AppError, CONFIG};
use tracing_subscriber::EnvFilter;

const USAGE: &str = "uso: pipeflow <etl [--out PATH] | skippy | dag>";

fn main() {
    // CLI mínima: `pipeflow etl [--out PATH]`, `pipeflow skippy`, `pipeflow dag`
    tracing_subscriber::fmt().with_env_filter(EnvFilter::new(&CONFIG.log_filter))
                             .init();
    debug!("configuración: {:?}", *CONFIG);
    let args: Vec<String> = std::env::args().collect();
    let result = match args.get(1).map(String::as_str) {
        Some("etl") => parse_out(&args[2..]).and_then(run_etl),
        Some("skippy") => run_skippy(),
        Some("dag") => print_dag(),
        Some(other) => Err(AppError::Usage(format!("comando desconocido '{other}'"))),
        None => Err(AppError::Usage("falta el comando".into())),
    };
    if let Err(e) = result {
        eprintln!("[pipeflow] {e}");
        if matches!(e, AppError::Usage(_)) {
            eprintln!("{USAGE}");
        }
        std::process::exit(e.exit_code());
    }
}

fn parse_out(args: &[String]) -> Result<Option<PathBuf>, AppError> {
    let mut out = CONFIG.export_path.clone();
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--out" => {
                i += 1;
                let path = args.get(i).ok_or_else(|| AppError::Usage("--out requiere una ruta".into()))?;
                out = Some(PathBuf::from(path));
            }
            other => return Err(AppError::Usage(format!("argumento desconocido '{other}'"))),
        }
        i += 1;
    }
    Ok(out)
}

fn run_etl(out: Option<PathBuf>) -> Result<(), AppError> {
    let result = match out {
        Some(path) => {
            let mut pipeline = demo::etl_pipeline(JsonFileTarget::new(&path))?;
            let df = pipeline.run()?;
            info!("ETL exportado a {}", path.display());
            df
        }
        None => demo::etl_pipeline(MemoryTarget::new())?.run()?,
    };
    println!("{}", demo::format_table(&result));
    Ok(())
}

/// Baseline, skip, cambio en una columna y dataset vaciado.
fn run_skippy() -> Result<(), AppError> {
    let mut skippy = demo::skippy_pipeline()?;
    skippy.run()?;
    skippy.run()?;

    let n = skippy.dataset().n_rows();
    skippy.dataset_mut().insert_column(ADDED, vec![Value::Int(1); n])?;
    let df = skippy.run()?;
    if let Some(RunDecision::Partial { changed, recompute }) = skippy.last_decision() {
        println!("rerun parcial: cambiadas={changed:?} recomputadas={recompute:?}");
    }
    println!("{}", demo::format_table(&df));

    *skippy.dataset_mut() = DataFrame::new();
    skippy.run()?;

    for event in skippy.events() {
        let kind = serde_json::to_string(&event.kind).map_err(|e| AppError::Run(e.into()))?;
        println!("#{} {} {kind}", event.seq, event.ts.to_rfc3339());
    }
    Ok(())
}

fn print_dag() -> Result<(), AppError> {
    let skippy = demo::skippy_pipeline()?;
    let dag = skippy.pipeline().dag();
    for name in dag.node_names() {
        let params = dag.node(&name).map(|n| n.params.clone()).unwrap_or_default();
        if params.is_empty() {
            println!("{name}");
        } else {
            let rendered: Vec<String> = params.iter().map(|(k, v)| format!("{k}={v}")).collect();
            println!("{name} [{}]", rendered.join(", "));
        }
    }
    for (from, to) in dag.edges() {
        println!("{from} -> {to}");
    }
    Ok(())
}
