//! Property-based tests using proptest

use collabgate_core::config::parse_repository;
use collabgate_core::mention::find_mention;
use collabgate_core::{extract_mention, resolve, ActionPlan, ProbeResult};
use proptest::prelude::*;

fn arb_probe() -> impl Strategy<Value = ProbeResult> {
    prop_oneof![
        Just(ProbeResult::AlreadyCollaborator),
        Just(ProbeResult::NotCollaborator),
        "[a-z0-9 ]{0,30}".prop_map(ProbeResult::LookupFailed),
    ]
}

// GitHub login shape: alphanumerics and hyphens
fn arb_username() -> impl Strategy<Value = String> {
    prop::string::string_regex("[A-Za-z0-9][A-Za-z0-9-]{0,38}").expect("valid regex")
}

proptest! {
    #[test]
    fn test_mention_found_in_surrounding_text(
        prefix in "[a-zA-Z ,.!?]{0,40}",
        user in arb_username(),
        suffix in "( [a-zA-Z ,.!?]{0,40})?",
    ) {
        let title = format!("{prefix}@{user}{suffix}");
        prop_assert_eq!(extract_mention(&title).unwrap(), user.as_str());
    }

    #[test]
    fn test_first_mention_wins(a in arb_username(), b in arb_username()) {
        let title = format!("add @{a} and @{b}");
        prop_assert_eq!(find_mention(&title), Some(a.as_str()));
    }

    #[test]
    fn test_no_at_sign_is_error(title in "[^@]{0,80}") {
        prop_assert!(extract_mention(&title).is_err());
    }

    #[test]
    fn test_mention_is_substring_of_title(title in ".{0,80}") {
        if let Some(user) = find_mention(&title) {
            prop_assert!(!user.is_empty());
            let needle = format!("@{}", user);
            prop_assert!(title.contains(&needle));
            prop_assert!(user.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-'));
        }
    }

    #[test]
    fn test_owner_always_aborts(owner in arb_username(), probe in arb_probe()) {
        prop_assert_eq!(resolve(&owner, &owner, probe), ActionPlan::AbortSelfRequest);
    }

    #[test]
    fn test_non_owner_follows_probe(
        user in arb_username(),
        owner in arb_username(),
        probe in arb_probe(),
    ) {
        prop_assume!(user != owner);
        let plan = resolve(&user, &owner, probe.clone());
        match probe {
            ProbeResult::NotCollaborator => {
                prop_assert_eq!(plan, ActionPlan::GrantAndClose(user));
            }
            ProbeResult::AlreadyCollaborator => {
                prop_assert_eq!(plan, ActionPlan::NotifyDuplicateAndClose(user));
            }
            ProbeResult::LookupFailed(reason) => {
                prop_assert_eq!(plan, ActionPlan::AbortProbeFailure(reason));
            }
        }
    }

    #[test]
    fn test_resolve_is_deterministic(
        user in arb_username(),
        owner in arb_username(),
        probe in arb_probe(),
    ) {
        prop_assert_eq!(
            resolve(&user, &owner, probe.clone()),
            resolve(&user, &owner, probe)
        );
    }

    #[test]
    fn test_repository_parse(owner in arb_username(), name in "[A-Za-z0-9._-]{1,30}") {
        let repo = parse_repository(&format!("{owner}/{name}")).unwrap();
        prop_assert_eq!(repo.owner, owner);
        prop_assert_eq!(repo.name, name);
    }
}
