//! Interactive shell for building and querying a BSP tree of solids.
//!
//! Usage:
//! ```text
//! cargo run -p bsp-shell                  # random lattice shuffles
//! cargo run -p bsp-shell -- --seed 42     # reproducible shuffles
//! RUST_LOG=solid_bsp=debug cargo run -p bsp-shell
//! ```

use std::io::{self, BufRead, Write};
use std::process::ExitCode;

use bsp_shell::{Command, Outcome, Session};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn main() -> ExitCode {
    // Default: WARN for everything, INFO for the tree and the shell.
    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing_subscriber::filter::LevelFilter::WARN.into())
        .add_directive("solid_bsp=info".parse().unwrap_or_default())
        .add_directive("bsp_shell=info".parse().unwrap_or_default());
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .init();

    let rng = match seed_from_args(std::env::args().skip(1)) {
        Ok(Some(seed)) => StdRng::seed_from_u64(seed),
        Ok(None) => StdRng::from_os_rng(),
        Err(message) => {
            eprintln!("{message}\nusage: bsp-shell [--seed <u64>]");
            return ExitCode::from(2);
        }
    };

    match run(Session::new(rng)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("I/O error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn seed_from_args(mut args: impl Iterator<Item = String>) -> Result<Option<u64>, String> {
    match args.next().as_deref() {
        None => Ok(None),
        Some("--seed") => {
            let value = args.next().ok_or("missing value for --seed")?;
            value
                .parse()
                .map(Some)
                .map_err(|_| format!("invalid seed `{value}`"))
        }
        Some(other) => Err(format!("unexpected argument `{other}`")),
    }
}

fn run(mut session: Session) -> io::Result<()> {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    let mut stdout = io::stdout();

    println!("Welcome! Use `h` for help.");
    loop {
        print!("> ");
        stdout.flush()?;
        let Some(line) = lines.next().transpose()? else {
            break;
        };
        if line.trim().is_empty() {
            continue;
        }

        let command = match Command::parse(&line) {
            Ok(command) => command,
            Err(err) => {
                println!("ERROR: {err}");
                continue;
            }
        };

        if command == Command::Clear {
            print!("Are you sure? (Y/n) ");
            stdout.flush()?;
            let answer = lines.next().transpose()?.unwrap_or_default();
            if answer.trim() != "Y" {
                continue;
            }
        }

        match session.execute(command) {
            Ok(Outcome::Reply(reply)) => println!("{reply}"),
            Ok(Outcome::Quit) => break,
            Err(err) => println!("ERROR: {err}"),
        }
    }
    Ok(())
}
