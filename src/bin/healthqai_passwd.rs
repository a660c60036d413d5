//!
//! healthqai_passwd
//! ----------------
//! Prints an Argon2 PHC hash for a password, or a complete users-file entry when a username
//! is given. The password is read from `--password` or, if absent, the first line of stdin.

use std::env;
use std::io::{self, BufRead};

use anyhow::{Context, Result, anyhow};

use healthqai::identity::{Credential, Role};
use healthqai::security::hash_password;

fn print_usage(program: &str) {
    eprintln!(
        "Usage:\n  {program} [--password <p>] [--user <name> [--role doctor|patient] [--disabled]]\n\nWithout --user, prints just the PHC string. With --user, prints a JSON entry for the\nusers file (HEALTHQAI_USERS_FILE)."
    );
}

fn arg_value(args: &[String], flag: &str) -> Option<String> {
    args.iter().position(|a| a == flag).and_then(|i| args.get(i + 1)).cloned()
}

fn parse_role(s: &str) -> Result<Role> {
    match s.to_ascii_lowercase().as_str() {
        "doctor" => Ok(Role::Doctor),
        "patient" => Ok(Role::Patient),
        other => Err(anyhow!("unknown role '{}': expected doctor or patient", other)),
    }
}

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    let program = args.first().map(String::as_str).unwrap_or("healthqai_passwd");
    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_usage(program);
        return Ok(());
    }

    let password = match arg_value(&args, "--password") {
        Some(p) => p,
        None => {
            let mut line = String::new();
            io::stdin().lock().read_line(&mut line).context("reading password from stdin")?;
            line.trim_end_matches(['\r', '\n']).to_string()
        }
    };
    if password.is_empty() {
        print_usage(program);
        return Err(anyhow!("empty password"));
    }
    let phc = hash_password(&password)?;

    match arg_value(&args, "--user") {
        None => println!("{}", phc),
        Some(username) => {
            let role = arg_value(&args, "--role").as_deref().map(parse_role).transpose()?.unwrap_or(Role::Patient);
            let entry = Credential {
                username,
                password_hash: phc,
                disabled: args.iter().any(|a| a == "--disabled"),
                role,
            };
            println!("{}", serde_json::to_string_pretty(&entry)?);
        }
    }
    Ok(())
}
