#[cfg(not(feature = "cli"))]
compile_error!("The `sqlt` binary requires the `cli` feature. Build with `--features cli`.");

use clap::Parser;
use std::fs::File;
use std::io::Write;
use std::process;

use sq3::cli;
use sq3::cli::app::{Cli, ColorMode, Commands};
use sq3::Sq3Error;

fn main() {
    let cli = Cli::parse();

    match cli.color {
        ColorMode::Always => colored::control::set_override(true),
        ColorMode::Never => colored::control::set_override(false),
        ColorMode::Auto => {} // colored auto-detects tty
    }

    let writer_result: Result<Box<dyn Write>, Sq3Error> = match &cli.output {
        Some(path) => File::create(path)
            .map(|f| Box::new(f) as Box<dyn Write>)
            .map_err(|e| Sq3Error::Io(format!("Cannot create {}: {}", path, e))),
        None => Ok(Box::new(std::io::stdout()) as Box<dyn Write>),
    };

    let mut writer = match writer_result {
        Ok(w) => w,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    let result = match cli.command {
        Commands::Info { file, json } => cli::info::execute(
            &cli::info::InfoOptions {
                file,
                json,
                mmap: cli.mmap,
            },
            &mut writer,
        ),

        Commands::Cells {
            file,
            page,
            limit,
            verbose,
            json,
        } => cli::cells::execute(
            &cli::cells::CellsOptions {
                file,
                page,
                limit,
                verbose,
                json,
                mmap: cli.mmap,
            },
            &mut writer,
        ),

        Commands::Scan {
            file,
            no_unknown,
            page_size,
            json,
        } => cli::scan::execute(
            &cli::scan::ScanOptions {
                file,
                no_unknown,
                page_size,
                json,
                mmap: cli.mmap,
            },
            &mut writer,
        ),

        Commands::Dump {
            file,
            page,
            offset,
            length,
            raw,
        } => cli::dump::execute(
            &cli::dump::DumpOptions {
                file,
                page,
                offset,
                length,
                raw,
                mmap: cli.mmap,
            },
            &mut writer,
        ),

        Commands::Completions { shell } => {
            let mut cmd = <Cli as clap::CommandFactory>::command();
            clap_complete::generate(shell, &mut cmd, "sqlt", &mut std::io::stdout());
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
