mod device;
mod grammar;
mod session;

use std::env;
use std::io::{self, BufRead, Write};
use std::process;

use indicator_core::config::SplitRole;
use grammar::parse_role as role_from_tag;
use session::Session;

fn main() -> io::Result<()> {
    let role = parse_role().unwrap_or_else(|err| {
        eprintln!("{err}");
        eprintln!("Usage: indicator-emulator [--role <central|peripheral>]");
        process::exit(2);
    });

    let stdin = io::stdin();
    let mut reader = stdin.lock();
    let mut session = Session::start(role);
    let mut line = String::new();

    println!("Indicator emulator ready. Type `help` for commands or `exit` to quit.");

    loop {
        line.clear();
        print!("> ");
        io::stdout().flush()?;

        let bytes_read = reader.read_line(&mut line)?;
        if bytes_read == 0 {
            println!();
            break;
        }

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        if should_terminate(trimmed) {
            println!("Session closed.");
            break;
        }

        for response in session.handle_command(trimmed) {
            println!("{response}");
        }
    }

    Ok(())
}

fn should_terminate(input: &str) -> bool {
    input.eq_ignore_ascii_case("exit") || input.eq_ignore_ascii_case("quit")
}

fn parse_role() -> Result<SplitRole, String> {
    let mut args = env::args().skip(1);
    if let Some(arg) = args.next() {
        if let Some(value) = arg.strip_prefix("--role=") {
            role_from_tag(value)
        } else if arg == "--role" {
            if let Some(value) = args.next() {
                role_from_tag(&value)
            } else {
                Err("Expected value after --role".to_string())
            }
        } else {
            role_from_tag(&arg)
        }
    } else {
        Ok(SplitRole::Central)
    }
}
