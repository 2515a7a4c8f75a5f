//! Property-based tests for input validation.
//!
//! Uses `proptest` to verify invariants across many random inputs.

#![allow(clippy::expect_used)]

use proptest::prelude::*;

use shipyard_cli::domain::config::{
    DEFAULT_APP_PORT, authenticated_url, repo_name, resolve_field, validate_port,
};
use shipyard_cli::domain::{InputField, Secret};

proptest! {
    /// Any digit string in range is used verbatim.
    #[test]
    fn prop_in_range_ports_are_accepted(port in 1u16..=u16::MAX) {
        prop_assert_eq!(validate_port(&port.to_string()).expect("valid"), port);
    }

    /// Any input containing a non-digit is rejected with the port code.
    #[test]
    fn prop_non_digit_ports_are_rejected(
        prefix in "[0-9]{0,3}",
        bad in "[^0-9]",
        suffix in "[0-9]{0,3}",
    ) {
        let raw = format!("{prefix}{bad}{suffix}");
        let err = validate_port(&raw).expect_err("must reject");
        prop_assert_eq!(err.exit_code(), 6);
    }

    /// Whitespace around a valid port is still a non-digit.
    #[test]
    fn prop_padded_port_is_rejected(
        port in 1u16..=u16::MAX,
        before in "[ \t\n]{0,3}",
        after in "[ \t\n]{0,3}",
    ) {
        prop_assume!(!before.is_empty() || !after.is_empty());
        let raw = format!("{before}{port}{after}");
        let err = resolve_field(InputField::AppPort, Some(raw.as_str())).expect_err("must reject");
        prop_assert_eq!(err.exit_code(), 6);
    }

    /// The repository name is the last segment without `.git`.
    #[test]
    fn prop_repo_name_is_last_segment(
        owner in "[a-z][a-z0-9-]{0,10}",
        name in "[a-z][a-z0-9_-]{0,10}",
        suffix in prop::bool::ANY,
    ) {
        let ext = if suffix { ".git" } else { "" };
        let url = format!("https://github.com/{owner}/{name}{ext}");
        prop_assert_eq!(repo_name(&url).expect("name"), name);
    }

    /// The token appears exactly once, right after the scheme.
    #[test]
    fn prop_token_embedded_after_scheme(token in "[A-Za-z0-9_]{1,20}") {
        let url = authenticated_url("https://github.com/acme/shop.git", &Secret::new(token.clone()));
        prop_assert_eq!(url, format!("https://{token}@github.com/acme/shop.git"));
    }
}

#[test]
fn test_empty_port_uses_default() {
    assert_eq!(
        resolve_field(InputField::AppPort, Some("")).expect("default"),
        DEFAULT_APP_PORT
    );
}

#[test]
fn test_ssh_urls_are_left_unchanged() {
    let url = "git@github.com:acme/shop.git";
    assert_eq!(authenticated_url(url, &Secret::new("tok")), url);
}
