use glispr::interpreter;
use rustyline::{error::ReadlineError, history::History, Editor, Helper};

const HISTORY_FILE: &str = ".glisprhistory";

pub fn greet() {
    eprintln!("Welcome to glispr REPL.")
}

pub type Error = ReadlineError;

/// Evaluates the first expression of `line`. Faults are reported and the
/// session goes on.
fn run_line(ip: &mut interpreter::Interpreter, line: &str) {
    if line.trim().is_empty() {
        return;
    }
    match ip.eval(line) {
        Ok(Some(exp)) => println!("{}", exp),
        // terminates whatever `print` left on the line
        Ok(None) => println!(),
        Err(err) => eprintln!("Error -- {}", err),
    }
}

fn run_loop<H: Helper, I: History>(
    ip: &mut interpreter::Interpreter,
    editor: &mut Editor<H, I>,
) -> Result<(), Error> {
    loop {
        match editor.readline(">> ") {
            Ok(line) => run_line(ip, &line),
            Err(ReadlineError::Eof | ReadlineError::Interrupted) => return Ok(()),
            Err(err) => return Err(err),
        }
    }
}

pub fn run() -> Result<(), Error> {
    let mut ip = interpreter::Interpreter::default();
    let mut editor = {
        let config = rustyline::Config::builder()
            .auto_add_history(true)
            .completion_type(rustyline::CompletionType::List)
            .build();
        rustyline::Editor::<(), _>::with_config(config)?
    };
    _ = editor.load_history(HISTORY_FILE);
    let res = run_loop(&mut ip, &mut editor);
    _ = editor.save_history(HISTORY_FILE);
    res
}
