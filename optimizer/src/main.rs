use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use optimizer::{Error, IoContext};

/// Reads one or more compiler-emitted GOT+code listings and rewrites
/// them: peephole cleanup, then offset compaction.
#[derive(Parser, Debug)]
#[command(name = "optimizer", about = "Optimize a GOT+code listing")]
struct Cli {
    /// Listings to optimize, in order. Reads standard input if none are given.
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

fn run(files: &[PathBuf]) -> optimizer::Result<()> {
    let texts = if files.is_empty() {
        log::debug!("no input files given, reading listing from stdin");
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .map_err(|err| Error::Io(err, IoContext::ReadInput, PathBuf::from("<stdin>")))?;
        vec![text]
    } else {
        let mut texts = Vec::with_capacity(files.len());
        for path in files {
            log::debug!("reading {}", path.display());
            let text = fs::read_to_string(path)
                .map_err(|err| Error::Io(err, IoContext::ReadInput, path.clone()))?;
            texts.push(text);
        }
        texts
    };

    if texts.iter().all(|text| text.trim().is_empty()) {
        eprintln!("warning: nothing to optimize");
        return Ok(());
    }

    let program = optimizer::optimize_many(texts.iter().map(String::as_str))?;
    log::debug!("optimized down to {} instructions", program.code.len());

    if program.code.is_empty() {
        eprintln!("warning: nothing to optimize");
        return Ok(());
    }

    print!("{}", program.to_text());
    Ok(())
}
