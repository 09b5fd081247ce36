/// Front-end: argument definition, the interactive REPL and the file
/// runner. Exit codes follow the sysexits convention: 65 for compile
/// errors, 70 for runtime errors, 74 for unreadable input, 64 for misuse.
use std::{fs, process::exit};

use clap::Parser;
use rustyline::{DefaultEditor, error::ReadlineError};

use crate::vm::{VM, errors::InterpretError};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Script to execute; the REPL starts when no file is given.
    pub file: Vec<String>,
}

/// Reads lines until EOF/interrupt, interpreting each against one live VM
/// so definitions persist across lines. Errors are printed and the loop
/// continues; the VM resets its stack after a runtime error, so the next
/// line starts clean.
pub fn repl() {
    let mut editor = match DefaultEditor::new() {
        Ok(editor) => editor,
        Err(error) => {
            eprintln!("Could not start line editing: {error}");
            exit(exitcode::IOERR);
        }
    };

    let mut vm = VM::new();

    loop {
        match editor.readline("> ") {
            Ok(line) => {
                let source = line.trim_end();
                if source.is_empty() {
                    continue;
                }
                if source == "exit" {
                    break;
                }
                let _ = editor.add_history_entry(source);

                if let Err(error) = vm.interpret(source) {
                    eprintln!("{error}");
                }
            }
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => {
                println!();
                break;
            }
            Err(error) => {
                eprintln!("Error reading line: {error}");
                break;
            }
        }
    }
}

/// Interprets a whole file and exits with the matching sysexits code.
pub fn run_file(path: &str) {
    let source = match fs::read_to_string(path) {
        Ok(source) => source,
        Err(error) => {
            eprintln!("Could not open file \"{path}\": {error}");
            exit(exitcode::IOERR);
        }
    };

    let mut vm = VM::new();
    match vm.interpret(&source) {
        Ok(()) => {}
        Err(error @ InterpretError::Compile(_)) => {
            eprintln!("{error}");
            exit(exitcode::DATAERR);
        }
        Err(error @ InterpretError::Runtime(_)) => {
            eprintln!("{error}");
            exit(exitcode::SOFTWARE);
        }
    }
}
