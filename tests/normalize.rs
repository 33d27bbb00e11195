use crime_dashboard::{
    data::{normalize_column_name, title_case},
    frame::RawTable,
    resolve::clean_area_name,
};
use proptest::prelude::*;

#[test]
fn normalize_handles_mixed_separators() {
    assert_eq!(normalize_column_name(" Police Count-2023 "), "police_count_2023");
    assert_eq!(normalize_column_name("Crm Cd Desc"), "crm_cd_desc");
}

proptest! {
    #[test]
    fn normalize_column_name_is_idempotent(name in "[ A-Za-z0-9_\\-]{0,24}") {
        let once = normalize_column_name(&name);
        prop_assert_eq!(normalize_column_name(&once), once.clone());
        prop_assert!(!once.contains(' '));
        prop_assert!(!once.contains('-'));
    }

    #[test]
    fn normalize_columns_is_idempotent_on_tables(
        headers in proptest::collection::vec("[ A-Za-z\\-]{1,12}", 0..6)
    ) {
        let table = RawTable::new(headers, Vec::new());
        let once = table.normalize_columns();
        let twice = once.clone().normalize_columns();
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn title_case_is_idempotent(value in "[a-zA-Z0-9 '\\-]{0,24}") {
        let once = title_case(&value);
        prop_assert_eq!(title_case(&once), once);
    }

    #[test]
    fn clean_area_name_is_never_blank(value in "[ a-zA-Z]{0,16}") {
        let cleaned = clean_area_name(&value);
        prop_assert!(!cleaned.is_empty());
        prop_assert_eq!(cleaned.trim(), cleaned.as_str());
    }
}
