//! skinweights CLI - export and import skin weights between mesh files.

use std::collections::BTreeSet;
use std::env;
use std::path::Path;
use std::process::ExitCode;

use skinweights::prelude::*;

fn main() -> ExitCode {
    let args: Vec<String> = env::args().collect();

    // Parse global flags
    let mut verbosity = 1i8;
    let mut filtered_args: Vec<&str> = Vec::new();
    for arg in &args[1..] {
        match arg.as_str() {
            "-v" | "--verbose" => verbosity = 2,
            "-q" | "--quiet" => verbosity = 0,
            _ => filtered_args.push(arg),
        }
    }
    init_tracing(verbosity);

    if filtered_args.is_empty() {
        print_help();
        return ExitCode::SUCCESS;
    }

    let result = match filtered_args[0] {
        // Export command - mesh file to weights file
        "export" | "e" => {
            if filtered_args.len() < 3 {
                eprintln!("Error: missing arguments");
                eprintln!("Usage: skinweights export <mesh.json> <weights.json>");
                return ExitCode::FAILURE;
            }
            cmd_export(filtered_args[1], filtered_args[2])
        }

        // Import command - weights file onto mesh file
        "import" | "i" => {
            if filtered_args.len() < 3 {
                eprintln!("Error: missing arguments");
                eprintln!("Usage: skinweights import <mesh.json> <weights.json> [position|uv]");
                return ExitCode::FAILURE;
            }
            let mode = match parse_mode(&filtered_args[3..]) {
                Ok(mode) => mode,
                Err(msg) => {
                    eprintln!("Error: {}", msg);
                    return ExitCode::FAILURE;
                }
            };
            cmd_import(filtered_args[1], filtered_args[2], mode)
        }

        // Info command - summarize a weights file
        "info" => {
            if filtered_args.len() < 2 {
                eprintln!("Error: missing file argument");
                eprintln!("Usage: skinweights info <weights.json>");
                return ExitCode::FAILURE;
            }
            cmd_info(filtered_args[1])
        }

        // Help
        "help" | "h" | "-h" | "--help" => {
            print_help();
            Ok(())
        }

        other => {
            eprintln!("Unknown command: {}", other);
            eprintln!();
            print_help();
            return ExitCode::FAILURE;
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbosity: i8) {
    let filter = match verbosity {
        0 => "skinweights=warn",
        1 => "skinweights=info",
        _ => "skinweights=debug",
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .without_time()
        .try_init();
}

fn parse_mode(rest: &[&str]) -> std::result::Result<MatchMode, String> {
    let mut mode = MatchMode::Position;
    let mut iter = rest.iter();
    while let Some(&arg) = iter.next() {
        match arg {
            "--mode" | "-m" => {
                let value = iter
                    .next()
                    .ok_or_else(|| "--mode requires a value (position|uv)".to_string())?;
                mode = value.parse()?;
            }
            // Bare positional mode: `import <mesh> <weights> uv`
            other => mode = other.parse()?,
        }
    }
    Ok(mode)
}

fn cmd_export(mesh_ref: &str, output: &str) -> Result<()> {
    let provider = FileMeshProvider::new();
    let stats = export_weights(&provider, mesh_ref, Path::new(output))?;
    println!(
        "Exported {} vertices ({} groups, {} influences, {} with UV) to {}",
        stats.vertices, stats.groups, stats.influences, stats.with_uv, output
    );
    Ok(())
}

fn cmd_import(mesh_ref: &str, input: &str, mode: MatchMode) -> Result<()> {
    let mut provider = FileMeshProvider::new();
    let stats = import_weights(&mut provider, mesh_ref, Path::new(input), mode)?;
    println!(
        "Imported weights onto {} vertices ({} groups, {} weights, mode {}, max distance {:.6})",
        stats.matched, stats.groups_written, stats.weights_written, mode, stats.max_distance
    );
    Ok(())
}

fn cmd_info(input: &str) -> Result<()> {
    let doc = ExportDocument::load(Path::new(input))?;

    let with_uv = doc.records.iter().filter(|r| r.uv.is_some()).count();
    let influences: usize = doc.records.iter().map(|r| r.influences.len()).sum();
    let bones: BTreeSet<&str> = doc
        .records
        .iter()
        .flat_map(|r| r.influences.iter().map(|e| e.bone.as_str()))
        .collect();

    let mut min = [f32::INFINITY; 3];
    let mut max = [f32::NEG_INFINITY; 3];
    for r in &doc.records {
        for i in 0..3 {
            min[i] = min[i].min(r.position[i]);
            max[i] = max[i].max(r.position[i]);
        }
    }

    println!("Weights document: {}", input);
    println!("  records:    {}", doc.len());
    println!("  with UV:    {}", with_uv);
    println!("  influences: {}", influences);
    println!("  bones:      {}", bones.len());
    for bone in &bones {
        println!("    {}", bone);
    }
    println!(
        "  bounds:     [{:.4}, {:.4}, {:.4}] - [{:.4}, {:.4}, {:.4}]",
        min[0], min[1], min[2], max[0], max[1], max[2]
    );
    Ok(())
}

fn print_help() {
    println!("skinweights - skin weight transfer toolkit");
    println!();
    println!("USAGE:");
    println!("    skinweights [OPTIONS] <COMMAND> [ARGS]");
    println!();
    println!("COMMANDS:");
    println!("    e, export <mesh.json> <weights.json>    Export mesh skin weights to a JSON document");
    println!("    i, import <mesh.json> <weights.json>    Import weights onto a mesh");
    println!("              [position|uv]                  Matching space (default: position)");
    println!("       info   <weights.json>                 Summarize a weights document");
    println!("    h, help                                  Show this help");
    println!();
    println!("OPTIONS:");
    println!("    -v, --verbose    Debug logging");
    println!("    -q, --quiet      Warnings only");
    println!();
    println!("Mesh files are JSON: {{\"name\", \"positions\", \"uv_loops\"?, \"groups\"?}}.");
    println!("Exit code is 0 on success, 1 on any error.");
}
