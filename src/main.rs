use std::env;
use std::path::Path;
use std::process::ExitCode;

use codesign_verify::StatusCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let args: Vec<String> = env::args().collect();
    let mut positional: Vec<&str> = Vec::new();
    let mut require_microsoft_root = false;

    for arg in args.iter().skip(1) {
        if arg == "--require-microsoft-root" {
            require_microsoft_root = true;
        } else {
            positional.push(arg);
        }
    }

    if positional.is_empty() || positional.len() > 3 {
        eprintln!(
            "Usage: {} <path> [expected-subject] [expected-issuer] [--require-microsoft-root]",
            args[0]
        );
        return ExitCode::from(2);
    }

    let path = positional[0];
    let expected_subject = positional.get(1).copied().unwrap_or("");
    let expected_issuer = positional.get(2).copied().unwrap_or("");

    let status = run(
        Path::new(path),
        expected_subject,
        expected_issuer,
        require_microsoft_root,
    );

    if status.is_ok() {
        println!("{path} passed code-signature verification.");
    } else {
        println!("{path} failed code-signature verification: {status}");
    }

    ExitCode::from(status.as_i32() as u8)
}

#[cfg(windows)]
fn run(path: &Path, subject: &str, issuer: &str, require_microsoft_root: bool) -> StatusCode {
    codesign_verify::verify_file_code_signature(path, subject, issuer, require_microsoft_root)
}

#[cfg(not(windows))]
fn run(_path: &Path, _subject: &str, _issuer: &str, _require_microsoft_root: bool) -> StatusCode {
    eprintln!("native trust verification is only available on Windows");
    StatusCode::Nonspecific
}
