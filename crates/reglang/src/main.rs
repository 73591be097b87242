//! CLI: print every word of a file a pattern accepts.

use std::{env, fs, process};

fn main() {
    env_logger::init();

    let mut args = env::args().skip(1);
    let (Some(path), Some(pattern)) = (args.next(), args.next()) else {
        eprintln!("usage: reglang <word-file> <pattern>");
        process::exit(2);
    };

    let automaton = match reglang::regex::compile(&pattern) {
        Ok(automaton) => automaton,
        Err(err) => {
            eprintln!("reglang: invalid pattern {pattern:?}: {err}");
            process::exit(2);
        }
    };
    let dfa = automaton.determinize();

    let contents = match fs::read_to_string(&path) {
        Ok(contents) => contents,
        Err(err) => {
            eprintln!("reglang: cannot read {path}: {err}");
            process::exit(1);
        }
    };

    for word in contents.split_whitespace() {
        if dfa.accepts(word) {
            println!("{word}");
        }
    }
}
