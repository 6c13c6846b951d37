/// Property-based tests using proptest
/// Tests invariants and properties that should hold for all inputs
use companies_house_lookup::display::mask_secret;
use companies_house_lookup::form_state::format_long_date;
use companies_house_lookup::sanitize::sanitize_text_field;
use companies_house_lookup::services::{filter_companies, filter_directors};
use proptest::prelude::*;
use serde_json::json;

// Property: sanitization is stable and leaves no markup behind
proptest! {
    #[test]
    fn sanitize_never_panics(input in "\\PC*") {
        let _ = sanitize_text_field(&input);
    }

    #[test]
    fn sanitize_is_idempotent(input in ".*") {
        let once = sanitize_text_field(&input);
        prop_assert_eq!(sanitize_text_field(&once), once);
    }

    #[test]
    fn sanitize_output_is_trimmed_single_line(input in ".*") {
        let cleaned = sanitize_text_field(&input);
        prop_assert_eq!(cleaned.trim(), cleaned.as_str());
        prop_assert!(!cleaned.contains("  "));
        prop_assert!(!cleaned.chars().any(|c| c.is_control()));
    }
}

// Property: every company returned starts with the searched term
proptest! {
    #[test]
    fn search_results_match_prefix(
        term in "[A-Za-z]{2,4}",
        titles in prop::collection::vec("[A-Za-z ]{0,12}", 0..10)
    ) {
        let items: Vec<_> = titles
            .iter()
            .enumerate()
            .map(|(i, title)| json!({"title": title, "company_number": i.to_string()}))
            .collect();
        let response = json!({ "items": items });

        let companies = filter_companies(&term, &response);
        let prefix = term.to_lowercase();

        for company in &companies {
            prop_assert!(company.company_name.to_lowercase().starts_with(&prefix));
        }

        let expected = titles
            .iter()
            .filter(|title| title.to_lowercase().starts_with(&prefix))
            .count();
        prop_assert_eq!(companies.len(), expected);
    }

    #[test]
    fn directors_all_have_director_role(
        roles in prop::collection::vec(
            prop::sample::select(vec![
                "Director", "director", "Corporate Director", "Secretary",
                "LLP Member", "nominee-director", ""
            ]),
            0..10
        )
    ) {
        let items: Vec<_> = roles
            .iter()
            .map(|role| json!({"name": "Someone", "officer_role": role}))
            .collect();
        let response = json!({ "items": items });

        for director in filter_directors(&response) {
            prop_assert!(director.role.to_lowercase().contains("director"));
        }
    }
}

// Property: masking never reveals more than the head and tail
proptest! {
    #[test]
    fn mask_never_panics(secret in "\\PC*") {
        let _ = mask_secret(&secret);
    }

    #[test]
    fn long_secrets_keep_only_head_and_tail(secret in "[A-Za-z0-9]{12,64}") {
        let masked = mask_secret(&secret).unwrap();
        prop_assert_eq!(masked.chars().count(), 16);
        prop_assert!(masked.starts_with(&secret[..8]));
        prop_assert!(masked.ends_with(&secret[secret.len() - 4..]));
    }

    #[test]
    fn short_secrets_are_fully_hidden(secret in "[A-Za-z0-9]{1,11}") {
        prop_assert_eq!(mask_secret(&secret), Some("****".to_string()));
    }
}

// Property: date formatting never panics on arbitrary input
proptest! {
    #[test]
    fn long_date_never_panics(input in "\\PC*") {
        let _ = format_long_date(&input);
    }

    #[test]
    fn valid_dates_render_year_last(year in 1900i32..2100, month in 1u32..=12, day in 1u32..=28) {
        let iso = format!("{:04}-{:02}-{:02}", year, month, day);
        let formatted = format_long_date(&iso);
        let expected_prefix = format!("{} ", day);
        prop_assert!(formatted.starts_with(&expected_prefix));
        prop_assert!(formatted.ends_with(&year.to_string()));
    }
}
