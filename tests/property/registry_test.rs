// tests/property/registry_test.rs

//! Property-based tests for command lookup.

use proptest::prelude::*;
use spineltune::core::commands::CommandRegistry;
use spineltune::core::protocol::AckKind;

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 500,
        ..ProptestConfig::default()
    })]

    #[test]
    fn test_lookup_never_panics(line in ".{0,200}") {
        let registry = CommandRegistry::new().unwrap();
        if let Err(e) = registry.lookup(&line) {
            prop_assert!(matches!(e.kind, AckKind::Unknown | AckKind::Arg));
        }
    }

    #[test]
    fn test_registered_name_with_garbage_is_arg_error(
        name in prop::sample::select(vec!["ping", "status", "clear", "close", "noidle", "commands"]),
        garbage in "[A-Z0-9]{1,20}",
    ) {
        let registry = CommandRegistry::new().unwrap();
        let err = registry.lookup(&format!("{name} {garbage}")).unwrap_err();
        prop_assert_eq!(err.kind, AckKind::Arg);
        prop_assert_eq!(err.command, name);
    }

    #[test]
    fn test_unregistered_name_is_unknown(name in "[a-z]{1,12}x[a-z]{0,4}", rest in "( [a-z]{1,5})?") {
        let registry = CommandRegistry::new().unwrap();
        prop_assume!(registry.get(&name).is_none());
        let err = registry.lookup(&format!("{name}{rest}")).unwrap_err();
        prop_assert_eq!(err.kind, AckKind::Unknown);
    }

    #[test]
    fn test_quoted_argument_is_captured_verbatim(uri in "[a-zA-Z0-9/ ._-]{1,64}") {
        let registry = CommandRegistry::new().unwrap();
        let (_, params) = registry.lookup(&format!("add \"{uri}\"")).unwrap();
        prop_assert_eq!(params.get("uri"), Some(&uri));
    }
}
