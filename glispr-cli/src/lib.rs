/// Module representing high-level entry-point of the REPL.
pub mod repl;

use std::{fs, io, path::PathBuf, process::exit};

/// Reads the whole file, or standard input when no file is given.
fn read_source(file: Option<PathBuf>) -> io::Result<String> {
    match file {
        Some(path) => fs::read_to_string(path),
        None => io::read_to_string(io::stdin()),
    }
}

fn fail(err: impl std::fmt::Display) -> ! {
    eprintln!("Error -- {}", err);
    exit(1)
}

pub mod run {

    /// Module that holds implementation detail of [`crate::run::run`].
    /// It glues [`glispr::interpreter`] and [`crate::repl`] together.
    mod glue {
        use super::{Mode, Opts};
        use crate::repl;
        use glispr::interpreter;
        use std::{
            fs::File,
            io::{self, BufReader},
        };
        use thiserror::Error;

        #[derive(Error, Debug)]
        pub enum Error {
            #[error(transparent)]
            Run(#[from] interpreter::Error),
            #[error(transparent)]
            Repl(#[from] rustyline::error::ReadlineError),
        }

        pub type Result<T> = std::result::Result<T, Error>;

        fn open_file(path: &std::path::Path) -> std::result::Result<File, interpreter::Error> {
            File::open(path).map_err(interpreter::Error::from)
        }

        pub fn run(opts: Opts) -> Result<()> {
            match opts.mode {
                Mode::Script(path) => {
                    interpreter::run(BufReader::new(open_file(&path)?))?;
                }
                Mode::Stdin => {
                    interpreter::run(io::stdin().lock())?;
                }
                Mode::Repl => {
                    repl::greet();
                    repl::run()?;
                }
            }
            Ok(())
        }
    }

    use std::path::PathBuf;

    #[derive(Debug)]
    pub enum Mode {
        Script(PathBuf),
        Repl,
        Stdin,
    }

    #[derive(Debug)]
    pub struct Opts {
        pub mode: Mode,
    }

    /// Runs the program; the value it evaluates to is not printed, only what
    /// the program itself prints. Exits with status 1 on the first fault.
    pub fn run(opts: Opts) {
        if let Err(err) = glue::run(opts) {
            crate::fail(err)
        }
    }
}

pub mod parse {
    use glispr::parser;
    use itertools::Itertools;
    use std::path::PathBuf;

    pub fn run(file: Option<PathBuf>) {
        let source = super::read_source(file).unwrap_or_else(|e| super::fail(e));
        match parser::parse_script(&source) {
            Ok(x) => println!("{}", x.iter().join("\n")),
            Err(e) => super::fail(e),
        }
    }
}

pub mod lex {
    use glispr::lexer;
    use itertools::Itertools;
    use std::path::PathBuf;

    pub fn run(file: Option<PathBuf>) {
        let source = super::read_source(file).unwrap_or_else(|e| super::fail(e));
        println!("{}", lexer::Lexer::from(source.as_str()).join("\n"));
    }
}

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
/// A tiny Lisp-like expression interpreter.
///
/// Without a subcommand, reads one expression from standard input and
/// evaluates it.
pub struct Args {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the first expression of a script file.
    Run {
        /// Program to run.
        file: PathBuf,
    },
    /// Parse a script file (or standard input) and print it back.
    Parse {
        /// Program to parse.
        file: Option<PathBuf>,
    },
    /// Lex (tokenize) a script file (or standard input).
    Lex {
        /// Program to lex.
        file: Option<PathBuf>,
    },
    /// Start an interactive session.
    Repl,
}

pub fn run() {
    let args = Args::parse();
    let Some(command) = args.command else {
        return run::run(run::Opts {
            mode: run::Mode::Stdin,
        });
    };
    match command {
        Commands::Run { file } => run::run(run::Opts {
            mode: run::Mode::Script(file),
        }),
        Commands::Parse { file } => parse::run(file),
        Commands::Lex { file } => lex::run(file),
        Commands::Repl => run::run(run::Opts {
            mode: run::Mode::Repl,
        }),
    }
}
