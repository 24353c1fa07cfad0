//! Property-based tests for log_relay using proptest

use log_relay::prelude::*;
use proptest::prelude::*;

fn any_level() -> impl Strategy<Value = Level> {
    prop_oneof![
        Just(Level::Emergency),
        Just(Level::Alert),
        Just(Level::Critical),
        Just(Level::Error),
        Just(Level::Warning),
        Just(Level::Notice),
        Just(Level::Info),
        Just(Level::Debug),
    ]
}

proptest! {
    /// Level string conversions round-trip through the validator
    #[test]
    fn test_level_str_roundtrip(level in any_level()) {
        let parsed = validate_level(level.as_str()).unwrap();
        prop_assert_eq!(level, parsed);
    }

    /// Anything outside the fixed lowercase set is rejected
    #[test]
    fn test_level_rejects_non_members(s in "[a-zA-Z0-9 ]{0,12}") {
        let is_member = LEVELS.iter().any(|l| l.as_str() == s);
        prop_assert_eq!(validate_level(&s).is_ok(), is_member);
    }

    /// Level ordering is consistent with the numeric urgency encoding
    #[test]
    fn test_level_ordering(a in any_level(), b in any_level()) {
        prop_assert_eq!(a <= b, (a as u8) <= (b as u8));
        prop_assert_eq!(a < b, (a as u8) < (b as u8));
    }

    /// An exact exclude match always excludes, regardless of include rules
    #[test]
    fn test_exclude_always_wins(
        category in "[a-z.]{1,16}",
        includes in proptest::collection::vec("[a-z.*]{1,8}", 0..4),
    ) {
        let mut filter = CategoryFilter::new();
        filter.include(includes);
        filter.exclude([category.clone()]);
        prop_assert!(filter.is_excluded(&category));
    }

    /// With no include rules, only exclude matches are excluded
    #[test]
    fn test_empty_include_is_default_allow(
        category in "[a-z.]{1,16}",
        prefix in "[a-z]{1,4}",
    ) {
        let mut filter = CategoryFilter::new();
        filter.exclude([format!("{prefix}*")]);
        prop_assert_eq!(filter.is_excluded(&category), category.starts_with(&prefix));
    }

    /// A non-empty include list excludes everything that matches no pattern
    #[test]
    fn test_nonempty_include_is_allow_list(
        category in "[a-z.]{1,16}",
        include in "[a-z]{1,4}",
    ) {
        let mut filter = CategoryFilter::new();
        filter.include([format!("{include}*")]);
        prop_assert_eq!(filter.is_excluded(&category), !category.starts_with(&include));
    }

    /// Prefix-wildcard include patterns admit every extension of the prefix
    #[test]
    fn test_include_prefix_admits_extensions(
        prefix in "[a-z]{1,6}",
        suffix in "[a-z.]{0,8}",
    ) {
        let mut filter = CategoryFilter::new();
        filter.include([format!("{prefix}*")]);
        let category = format!("{prefix}{suffix}");
        prop_assert!(!filter.is_excluded(&category));
    }

    /// Placeholder substitution replaces known keys and leaves unknown
    /// tokens verbatim, in one pass
    #[test]
    fn test_placeholder_substitution(
        key in "[a-z][a-z0-9_]{0,8}",
        value in "[a-zA-Z0-9 ]{0,12}",
    ) {
        let text = format!("has {{{key}}} placeholder");

        let with_key = Message::new(
            Level::Info,
            text.as_str(),
            Context::new().with(key.as_str(), value.as_str()),
        );
        prop_assert_eq!(with_key.body(), format!("has {value} placeholder"));

        let without_key = Message::new(Level::Info, text.as_str(), Context::new());
        prop_assert_eq!(without_key.body(), text);
    }

    /// Text without placeholder tokens passes through unchanged
    #[test]
    fn test_plain_text_untouched(text in "[a-zA-Z0-9 .,:-]{0,32}") {
        let message = Message::new(
            Level::Info,
            text.as_str(),
            Context::new().with("foo", "some"),
        );
        prop_assert_eq!(message.body(), text);
    }
}
