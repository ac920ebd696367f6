//! Example: Basic signature verification
//!
//! Demonstrates the verification pipeline. On Windows this checks the file
//! given on the command line against the live trust facilities; elsewhere it
//! drives the same pipeline with a synthetic chain so the policy wiring can
//! be explored on any platform.

use codesign_verify::mock::MockTrustProvider;
use codesign_verify::{Certificate, RootAuthority, Verifier};

fn main() {
    let args: Vec<String> = std::env::args().collect();

    #[cfg(windows)]
    if let Some(path) = args.get(1) {
        let status = codesign_verify::verify_file_code_signature(
            std::path::Path::new(path),
            args.get(2).map(String::as_str).unwrap_or(""),
            args.get(3).map(String::as_str).unwrap_or(""),
            true,
        );
        println!("{path}: {status}");
        return;
    }

    let _ = &args;
    println!("No path given (or not on Windows); running against a synthetic chain.\n");

    let chain = vec![
        Certificate::new("Contoso Ltd", "Contoso Code Signing CA", false),
        Certificate::new("Contoso Code Signing CA", "Contoso Root CA", false),
        Certificate::new("Contoso Root CA", "Contoso Root CA", true),
    ];
    let verifier = Verifier::new(MockTrustProvider::trusted(chain))
        .with_designated_root(RootAuthority::with_name("Contoso Root CA"));

    for (subject, issuer, check_root) in [
        ("Contoso Ltd", "Contoso Code Signing CA", true),
        ("Fabrikam Inc", "", true),
        ("", "", false),
    ] {
        let status = verifier.verify_file_code_signature(
            std::path::Path::new("plugin.dll"),
            subject,
            issuer,
            check_root,
        );
        println!(
            "subject={subject:?} issuer={issuer:?} root_check={check_root} -> {status}"
        );
    }
}
