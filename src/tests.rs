mod tests {
    use std::path::Path;

    use crate::chain::{is_anchored_to, leaf_names, name_matches};
    use crate::error::{hr_to_trust_error, hresult, LoaderError, ProviderError, TrustError};
    use crate::mock::MockTrustProvider;
    use crate::provider::{Certificate, RootAuthority, TrustVerdict};
    use crate::status::StatusCode;
    use crate::utils::{bytes_to_hex_upper, to_wide_null_terminated, wide_to_string};
    use crate::verification::Verifier;
    use crate::version_info::string_file_info_key;

    const MS_ROOT: &str = "Microsoft Root Certificate Authority 2011";

    fn contoso_chain() -> Vec<Certificate> {
        vec![
            Certificate::new("Contoso Ltd", "Contoso Code Signing CA", false),
            Certificate::new("Contoso Code Signing CA", MS_ROOT, false),
            Certificate::new(MS_ROOT, MS_ROOT, true),
        ]
    }

    fn verify(
        provider: &MockTrustProvider,
        subject: &str,
        issuer: &str,
        check_root: bool,
    ) -> StatusCode {
        Verifier::new(provider.clone()).verify_file_code_signature(
            Path::new("plugin.dll"),
            subject,
            issuer,
            check_root,
        )
    }

    #[test]
    fn all_checks_pass() {
        let provider = MockTrustProvider::trusted(contoso_chain());
        let status = verify(&provider, "Contoso Ltd", "Contoso Code Signing CA", true);
        assert_eq!(status, StatusCode::Ok);
    }

    #[test]
    fn unsigned_file_fails_trust_verification() {
        let provider =
            MockTrustProvider::untrusted(TrustVerdict::NotTrusted(TrustError::NoSignature));
        let status = verify(&provider, "", "", false);
        assert_eq!(status, StatusCode::VerifyTrustFailure);
    }

    #[test]
    fn untrusted_root_fails_when_root_check_requested() {
        let chain = vec![
            Certificate::new("Contoso Ltd", "Evil CA", false),
            Certificate::new("Evil CA", "Evil CA", true),
        ];
        let provider = MockTrustProvider::trusted(chain);
        let status = verify(&provider, "", "", true);
        assert_eq!(status, StatusCode::NotMicrosoftRoot);
    }

    #[test]
    fn untrusted_root_is_ignored_when_root_check_not_requested() {
        let chain = vec![
            Certificate::new("Contoso Ltd", "Evil CA", false),
            Certificate::new("Evil CA", "Evil CA", true),
        ];
        let provider = MockTrustProvider::trusted(chain);
        let status = verify(&provider, "Contoso Ltd", "", false);
        assert_eq!(status, StatusCode::Ok);
    }

    #[test]
    fn subject_name_mismatch() {
        let provider = MockTrustProvider::trusted(contoso_chain());
        let status = verify(&provider, "Fabrikam Inc", "", true);
        assert_eq!(status, StatusCode::CertNameNotEqual);
    }

    #[test]
    fn issuer_name_mismatch() {
        let provider = MockTrustProvider::trusted(contoso_chain());
        let status = verify(&provider, "Contoso Ltd", "Fabrikam CA", true);
        assert_eq!(status, StatusCode::CertIssuerNameNotEqual);
    }

    #[test]
    fn empty_expected_subject_skips_comparison() {
        let provider = MockTrustProvider::trusted(contoso_chain());
        let status = verify(&provider, "", "Contoso Code Signing CA", true);
        assert_eq!(status, StatusCode::Ok);
    }

    #[test]
    fn empty_expected_issuer_skips_comparison() {
        let provider = MockTrustProvider::trusted(contoso_chain());
        let status = verify(&provider, "Contoso Ltd", "", true);
        assert_eq!(status, StatusCode::Ok);
    }

    #[test]
    fn trust_failure_wins_over_root_mismatch() {
        // Root check requested, but the verdict is already untrusted; the
        // first failing stage is the one reported.
        let provider =
            MockTrustProvider::untrusted(TrustVerdict::NotTrusted(TrustError::UntrustedRoot));
        let status = verify(&provider, "Fabrikam Inc", "", true);
        assert_eq!(status, StatusCode::VerifyTrustFailure);
    }

    #[test]
    fn root_mismatch_wins_over_name_mismatch() {
        let chain = vec![
            Certificate::new("Contoso Ltd", "Evil CA", false),
            Certificate::new("Evil CA", "Evil CA", true),
        ];
        let provider = MockTrustProvider::trusted(chain);
        let status = verify(&provider, "Fabrikam Inc", "Fabrikam CA", true);
        assert_eq!(status, StatusCode::NotMicrosoftRoot);
    }

    #[test]
    fn unreadable_chain_reports_wthelper_failure() {
        let provider = MockTrustProvider::unreadable_chain();
        let status = verify(&provider, "", "", false);
        assert_eq!(status, StatusCode::WtHelperFailed);
    }

    #[test]
    fn missing_library_reports_load_failure() {
        let provider =
            MockTrustProvider::failing(ProviderError::LibraryUnavailable("wintrust.dll".into()));
        let status = verify(&provider, "", "", false);
        assert_eq!(status, StatusCode::LoadLibraryFailure);
    }

    #[test]
    fn missing_symbol_reports_proc_address_failure() {
        let provider = MockTrustProvider::failing(ProviderError::SymbolUnavailable {
            library: "wintrust.dll".into(),
            symbol: "WinVerifyTrust".into(),
        });
        let status = verify(&provider, "", "", false);
        assert_eq!(status, StatusCode::GetProcAddressFailure);
    }

    #[test]
    fn other_provider_failure_is_nonspecific() {
        let provider = MockTrustProvider::failing(ProviderError::Other("allocation failed".into()));
        let status = verify(&provider, "", "", false);
        assert_eq!(status, StatusCode::Nonspecific);
    }

    #[test]
    fn empty_chain_fails_root_check_first() {
        let provider = MockTrustProvider::trusted(Vec::new());
        let status = verify(&provider, "", "", true);
        assert_eq!(status, StatusCode::NotMicrosoftRoot);
    }

    #[test]
    fn empty_chain_without_root_check_is_detail_fetch_failure() {
        let provider = MockTrustProvider::trusted(Vec::new());
        let status = verify(&provider, "", "", false);
        assert_eq!(status, StatusCode::CertDetailFetchFailed);
    }

    #[test]
    fn empty_leaf_subject_is_detail_fetch_failure() {
        let chain = vec![
            Certificate::new("", "Contoso Code Signing CA", false),
            Certificate::new(MS_ROOT, MS_ROOT, true),
        ];
        let provider = MockTrustProvider::trusted(chain);
        let status = verify(&provider, "", "", false);
        assert_eq!(status, StatusCode::CertDetailFetchFailed);
    }

    #[test]
    fn name_comparison_is_case_sensitive() {
        let provider = MockTrustProvider::trusted(contoso_chain());
        assert_eq!(
            verify(&provider, "contoso ltd", "", false),
            StatusCode::CertNameNotEqual
        );
        assert_eq!(verify(&provider, "Contoso Ltd", "", false), StatusCode::Ok);
    }

    #[test]
    fn repeated_verification_is_idempotent() {
        let provider = MockTrustProvider::trusted(contoso_chain());
        let verifier = Verifier::new(provider);
        let results: Vec<StatusCode> = (0..3)
            .map(|_| {
                verifier.verify_file_code_signature(
                    Path::new("plugin.dll"),
                    "Contoso Ltd",
                    "Contoso Code Signing CA",
                    true,
                )
            })
            .collect();
        assert_eq!(results, vec![StatusCode::Ok; 3]);
    }

    #[test]
    fn chain_released_on_every_status_path() {
        // Success path.
        let provider = MockTrustProvider::trusted(contoso_chain());
        verify(&provider, "", "", false);
        assert_eq!(provider.release_count(), 1);

        // Root mismatch.
        let provider = MockTrustProvider::trusted(vec![Certificate::new("X", "X", true)]);
        verify(&provider, "", "", true);
        assert_eq!(provider.release_count(), 1);

        // Name mismatch.
        let provider = MockTrustProvider::trusted(contoso_chain());
        verify(&provider, "Fabrikam Inc", "", false);
        assert_eq!(provider.release_count(), 1);

        // Unreadable chain data.
        let provider = MockTrustProvider::unreadable_chain();
        verify(&provider, "", "", false);
        assert_eq!(provider.release_count(), 1);

        // Untrusted verdict allocates no chain, so there is nothing to leak.
        let provider =
            MockTrustProvider::untrusted(TrustVerdict::NotTrusted(TrustError::NoSignature));
        verify(&provider, "", "", false);
        assert_eq!(provider.release_count(), 0);
    }

    #[test]
    fn path_is_forwarded_to_the_provider_unchecked() {
        // An existing file and a nonexistent one both reach the provider
        // verbatim; path validity is established only by downstream failure.
        let file = tempfile::NamedTempFile::new().expect("temp file");
        let provider = MockTrustProvider::trusted(contoso_chain());
        let verifier = Verifier::new(provider.clone());

        verifier.verify_file_code_signature(file.path(), "", "", false);
        verifier.verify_file_code_signature(Path::new("no/such/file.dll"), "", "", false);

        let seen = provider.seen_paths();
        assert_eq!(seen[0], file.path());
        assert_eq!(seen[1], Path::new("no/such/file.dll"));
    }

    #[test]
    fn root_can_match_by_thumbprint() {
        let chain = vec![
            Certificate::new("Contoso Ltd", "Some Root", false),
            Certificate::new("Some Root", "Some Root", true)
                .with_thumbprint_sha1("CDD4EEAE6000AC7F40C3802C171E30148030C072"),
        ];
        let provider = MockTrustProvider::trusted(chain);
        let status = verify(&provider, "", "", true);
        assert_eq!(status, StatusCode::Ok);
    }

    #[test]
    fn thumbprint_match_is_hex_case_insensitive() {
        let root = Certificate::new("Some Root", "Some Root", true)
            .with_thumbprint_sha1("cdd4eeae6000ac7f40c3802c171e30148030c072");
        assert!(RootAuthority::microsoft().matches(&root));
    }

    #[test]
    fn non_self_signed_terminal_is_not_anchored() {
        // Chain walk stopped short of a root.
        let chain = vec![
            Certificate::new("Contoso Ltd", "Contoso Code Signing CA", false),
            Certificate::new("Contoso Code Signing CA", MS_ROOT, false),
        ];
        let provider = MockTrustProvider::trusted(chain);
        let status = verify(&provider, "", "", true);
        assert_eq!(status, StatusCode::NotMicrosoftRoot);
    }

    #[test]
    fn custom_designated_root() {
        let chain = vec![
            Certificate::new("Contoso Ltd", "Contoso CA", false),
            Certificate::new("Contoso CA", "Contoso CA", true),
        ];
        let verifier = Verifier::new(MockTrustProvider::trusted(chain))
            .with_designated_root(RootAuthority::with_name("Contoso CA"));
        let status =
            verifier.verify_file_code_signature(Path::new("plugin.dll"), "", "", true);
        assert_eq!(status, StatusCode::Ok);
    }

    #[test]
    fn status_code_ordinals_are_pinned() {
        assert_eq!(StatusCode::Ok.as_i32(), 0);
        assert_eq!(StatusCode::VerifyTrustFailure.as_i32(), 1);
        assert_eq!(StatusCode::NotMicrosoftRoot.as_i32(), 2);
        assert_eq!(StatusCode::CertDetailFetchFailed.as_i32(), 3);
        assert_eq!(StatusCode::CertNameNotEqual.as_i32(), 4);
        assert_eq!(StatusCode::CertIssuerNameNotEqual.as_i32(), 5);
        assert_eq!(StatusCode::LoadLibraryFailure.as_i32(), 6);
        assert_eq!(StatusCode::GetProcAddressFailure.as_i32(), 7);
        assert_eq!(StatusCode::WtHelperFailed.as_i32(), 8);
        assert_eq!(StatusCode::Nonspecific.as_i32(), 9);
    }

    #[test]
    fn status_code_mnemonics() {
        assert_eq!(StatusCode::Ok.to_string(), "STATUS_OK");
        assert_eq!(
            StatusCode::VerifyTrustFailure.to_string(),
            "ERROR_VERIFYTRUSTFAILURE"
        );
        assert_eq!(
            StatusCode::NotMicrosoftRoot.to_string(),
            "ERROR_NOTMICROSOFTROOT"
        );
    }

    #[test]
    fn anchoring_and_leaf_names_on_empty_chain() {
        assert!(!is_anchored_to(&[], &RootAuthority::microsoft()));
        assert!(leaf_names(&[]).is_none());
    }

    #[test]
    fn name_matcher_policy() {
        assert!(name_matches("", "anything at all"));
        assert!(name_matches("Contoso Ltd", "Contoso Ltd"));
        assert!(!name_matches("Contoso Ltd", "contoso ltd"));
        assert!(!name_matches("Contoso Ltd", "Contoso Ltd ")); // no trimming
    }

    #[test]
    fn hresult_mapping() {
        assert_eq!(
            hr_to_trust_error(hresult::CERT_E_UNTRUSTEDROOT),
            TrustError::UntrustedRoot
        );
        assert_eq!(
            hr_to_trust_error(hresult::TRUST_E_NOSIGNATURE),
            TrustError::NoSignature
        );
        assert_eq!(hr_to_trust_error(-1), TrustError::Unknown(-1));
        // Spot-check a canonical value against its winerror.h definition.
        assert_eq!(hresult::CERT_E_UNTRUSTEDROOT, -2146762487);
    }

    #[test]
    fn provider_error_status_mapping() {
        assert_eq!(
            ProviderError::LibraryUnavailable("x".into()).status_code(),
            StatusCode::LoadLibraryFailure
        );
        assert_eq!(
            ProviderError::SymbolUnavailable {
                library: "x".into(),
                symbol: "y".into()
            }
            .status_code(),
            StatusCode::GetProcAddressFailure
        );
        assert_eq!(
            ProviderError::Other("x".into()).status_code(),
            StatusCode::Nonspecific
        );
    }

    #[test]
    fn loader_errors_lift_into_provider_errors() {
        let missing = LoaderError::SymbolMissing {
            library: "version.dll".into(),
            symbol: "VerQueryValueW".into(),
        };
        assert_eq!(
            ProviderError::from(missing).status_code(),
            StatusCode::GetProcAddressFailure
        );
        let failed = LoaderError::LoadFailed {
            library: "version.dll".into(),
            reason: "not found".into(),
        };
        assert_eq!(
            ProviderError::from(failed).status_code(),
            StatusCode::LoadLibraryFailure
        );
    }

    #[test]
    fn version_key_format() {
        assert_eq!(
            string_file_info_key(1033, 1252, "FileDescription"),
            "\\StringFileInfo\\040904E4\\FileDescription"
        );
        assert_eq!(
            string_file_info_key(0, 0, "ProductName"),
            "\\StringFileInfo\\00000000\\ProductName"
        );
        assert_eq!(
            string_file_info_key(0xFFFF, 0xFFFF, "x"),
            "\\StringFileInfo\\FFFFFFFF\\x"
        );
    }

    #[test]
    fn hex_encoding_is_uppercase_without_separators() {
        assert_eq!(bytes_to_hex_upper(&[0xDE, 0xAD, 0xBE, 0xEF]), "DEADBEEF");
        assert_eq!(bytes_to_hex_upper(&[]), "");
        assert_eq!(bytes_to_hex_upper(&[0x00, 0x0A]), "000A");
    }

    #[test]
    fn wide_string_round_trip() {
        let wide = to_wide_null_terminated("plugin.dll");
        assert_eq!(wide.last(), Some(&0));
        assert_eq!(wide_to_string(&wide[..wide.len() - 1]), "plugin.dll");
        assert_eq!(to_wide_null_terminated(""), vec![0]);
    }
}

// Smoke tests against the live Windows trust facilities. These depend on
// well-known signed system binaries and are skipped when absent.
#[cfg(windows)]
mod windows_smoke {
    use std::path::Path;

    use crate::status::StatusCode;
    use crate::verification::verify_file_code_signature;
    use crate::version_info::get_file_version_string;

    const NOTEPAD: &str = r"C:\Windows\System32\notepad.exe";

    #[test]
    fn version_string_size_then_copy_round_trip() {
        if !Path::new(NOTEPAD).exists() {
            eprintln!("skipping: {NOTEPAD} not present");
            return;
        }

        let needed = get_file_version_string(NOTEPAD, "FileDescription", 1033, 1252, &mut []);
        if needed < 0 {
            eprintln!("skipping: no 1033/1252 version block in {NOTEPAD}");
            return;
        }

        let mut buf = vec![0u16; needed as usize + 1];
        let copied = get_file_version_string(NOTEPAD, "FileDescription", 1033, 1252, &mut buf);
        assert_eq!(copied, needed);
        assert_eq!(buf[needed as usize], 0);
        let value = String::from_utf16_lossy(&buf[..needed as usize]);
        assert_eq!(value.encode_utf16().count(), needed as usize);
    }

    #[test]
    fn version_string_for_missing_file_is_negative() {
        let rc = get_file_version_string(
            r"C:\no\such\file.exe",
            "FileDescription",
            1033,
            1252,
            &mut [],
        );
        assert!(rc < 0, "expected a negative error code, got {rc}");
    }

    #[test]
    fn unsigned_text_file_fails_trust_verification() {
        let file = tempfile::NamedTempFile::new().expect("temp file");
        std::fs::write(file.path(), b"not a signed binary").expect("write");

        let status = verify_file_code_signature(file.path(), "", "", false);
        assert_eq!(status, StatusCode::VerifyTrustFailure);
    }
}
