use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;

use semi_compiler::{
    compile_bytes_to_result, validate_output_name, CcToolchain, Toolchain, DEFAULT_OUTPUT,
};
use semi_types::{ErrorCode, SemiError};

#[derive(Parser)]
#[command(name = "semic")]
#[command(about = "Semi compiler (Semi -> C -> native executable).", long_about = None)]
struct Cli {
    /// Semi source file.
    source: Option<PathBuf>,

    /// Name of the executable to build.
    #[arg(default_value = DEFAULT_OUTPUT)]
    output: String,

    /// Print the generated C to stdout before building.
    #[arg(short, long)]
    dump: bool,

    /// Write the generated C to PATH and skip the native build.
    #[arg(long, value_name = "PATH")]
    emit_c: Option<PathBuf>,

    /// Print the compile result as JSON instead of a diagnostic line.
    #[arg(long)]
    json: bool,

    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match try_main(&cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{err:#}");
            ExitCode::from(ErrorCode::IO.exit_status())
        }
    }
}

fn try_main(cli: &Cli) -> Result<ExitCode> {
    let Some(source_path) = &cli.source else {
        return Ok(report(&SemiError::invocation(
            ErrorCode::MISSING_SOURCE,
            "Missing source file argument (usage: semic <SOURCE> [OUTPUT])",
        )));
    };
    if let Err(err) = validate_output_name(&cli.output) {
        return Ok(report(&err));
    }

    let source = match std::fs::read(source_path) {
        Ok(s) => s,
        Err(e) => {
            return Ok(report(&SemiError::invocation(
                ErrorCode::IO,
                format!("Cannot read `{}`: {e}", source_path.display()),
            )))
        }
    };
    if cli.verbose {
        eprintln!("semic: read {} bytes from {}", source.len(), source_path.display());
    }

    let result = compile_bytes_to_result(&source, &source_path.display().to_string());
    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&result).context("serialize compile result")?
        );
    }
    let c_source = match (result.c_source, result.error) {
        (Some(c), _) => c,
        (None, Some(err)) => {
            if !cli.json {
                eprintln!("{err}");
            }
            return Ok(ExitCode::from(err.code.exit_status()));
        }
        (None, None) => anyhow::bail!("compiler produced neither output nor error"),
    };
    if cli.verbose {
        eprintln!("semic: emitted {} bytes of C", c_source.len());
    }
    if cli.dump {
        print!("{c_source}");
    }

    if let Some(path) = &cli.emit_c {
        std::fs::write(path, &c_source)
            .with_context(|| format!("write C source: {}", path.display()))?;
        if cli.verbose {
            eprintln!("semic: wrote {}", path.display());
        }
        return Ok(ExitCode::SUCCESS);
    }

    build(cli, &c_source)
}

fn build(cli: &Cli, c_source: &str) -> Result<ExitCode> {
    let toolchain = CcToolchain::from_env();
    let output = Path::new(&cli.output);
    if cli.verbose {
        let cmd = toolchain.command(Path::new("main.c"), output);
        eprintln!("semic: running {cmd:?}");
    }

    let status = toolchain.build(c_source, output)?;
    if cli.verbose {
        if let Some(kept) = toolchain.kept_source_path(output) {
            eprintln!("semic: kept C source at {}", kept.display());
        }
    }
    if status != 0 {
        eprintln!("Compilation errored with code {status}. Terminating.");
        return Ok(ExitCode::from(u8::try_from(status).unwrap_or(1)));
    }
    if cli.verbose {
        eprintln!("semic: built {}", output.display());
    }
    Ok(ExitCode::SUCCESS)
}

/// Print a fatal diagnostic and map it to its exit status.
fn report(err: &SemiError) -> ExitCode {
    eprintln!("{err}");
    ExitCode::from(err.code.exit_status())
}
