use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use compiler::{Error, IoContext};

/// Compiles the rule-based monitoring-action language into a textual
/// GOT+code listing.
#[derive(Parser, Debug)]
#[command(name = "compiler", about = "Compile monitoring-action source into a GOT+code listing")]
struct Cli {
    /// Source files to compile, in order. Reads standard input if none are given.
    files: Vec<PathBuf>,
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    match run(&cli.files) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(files: &[PathBuf]) -> compiler::Result<()> {
    let program = if files.is_empty() {
        log::debug!("no input files given, reading source from stdin");
        let mut source = String::new();
        io::stdin()
            .read_to_string(&mut source)
            .map_err(|err| Error::Io(err, IoContext::ReadInput, PathBuf::from("<stdin>")))?;
        compiler::compile(&source)?
    } else {
        let mut sources = Vec::with_capacity(files.len());
        for path in files {
            log::debug!("reading {}", path.display());
            let source = fs::read_to_string(path)
                .map_err(|err| Error::Io(err, IoContext::ReadInput, path.clone()))?;
            sources.push(source);
        }
        compiler::compile_many(sources.iter().map(String::as_str))?
    };

    if program.code.is_empty() {
        eprintln!("warning: nothing to compile");
        return Ok(());
    }

    print!("{}", program.to_text());
    Ok(())
}
