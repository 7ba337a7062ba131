//! Interactive query shell, a stand-in for a chat host

use colored::*;
use std::io::{self, BufRead, Write};

use doxyref::{DescribeError, Session};

/// Print reply lines the way a chat host would send them, one per message.
pub fn print_reply(lines: &[String]) {
    for line in lines {
        println!("{}", line);
    }
}

pub fn print_error(message: impl std::fmt::Display) {
    println!("{} {}", "❌".red(), message.to_string().red());
}

fn print_help() {
    println!("Commands:");
    println!(
        "  {} <api>                 - Load a documentation version",
        "load".green()
    );
    println!(
        "  {} <class> [<method>] - Describe a class or method",
        "describe".green()
    );
    println!(
        "  {} <class>::<method>  - Same as describe",
        "describe".green()
    );
    println!("  {}                     - Exit", "quit".green());
    println!();
}

/// Describe `query` and print the reply or the host-facing error.
fn describe(session: &Session, query: &str, method: Option<&str>) {
    match session.describe(query, method) {
        Ok(lines) => print_reply(&lines),
        Err(DescribeError::Source(e)) if e.is_not_found() => {
            print_error("Doxygen XML not found.")
        }
        Err(e) => print_error(e),
    }
}

/// Read commands from stdin until `quit` or end of input.
pub fn interactive_search(session: &mut Session) -> Result<(), String> {
    println!("{}", "╔═══════════════════════════════════════════╗".cyan());
    println!("{}", "║   Doxygen API Reference                   ║".cyan());
    println!("{}", "╚═══════════════════════════════════════════╝".cyan());
    println!();
    print_help();

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut lines = stdin.lock().lines();

    loop {
        let prompt = match session.docs() {
            Some(docs) => format!("doxyref({})>", docs.api()),
            None => "doxyref>".to_string(),
        };
        print!("{} ", prompt.blue().bold());
        stdout.flush().map_err(|e| e.to_string())?;

        let Some(input) = lines.next() else {
            break;
        };
        let input = input.map_err(|e| e.to_string())?;
        let input = input.trim();
        if input.is_empty() {
            continue;
        }

        let parts: Vec<&str> = input.split_whitespace().collect();
        match parts[0] {
            "quit" | "exit" | "q" => {
                println!("Goodbye! 👋");
                break;
            }
            "load" => {
                if parts.len() < 2 {
                    println!("{} Usage: load <api>", "⚠️".yellow());
                    continue;
                }
                match session.load(parts[1]) {
                    Ok(summary) => println!("{} {}", "📚".cyan(), summary),
                    Err(e) if e.is_not_found() => print_error("Doxygen XML not found."),
                    Err(e) => print_error(e),
                }
            }
            "describe" => {
                if parts.len() < 2 {
                    println!("{} Usage: describe <class> [<method>]", "⚠️".yellow());
                    continue;
                }
                describe(session, parts[1], parts.get(2).copied());
            }
            "help" | "?" => print_help(),
            _ => describe(session, parts[0], parts.get(1).copied()),
        }
        println!();
    }

    Ok(())
}
