/// Company whose brands are forecast.
pub const TARGET_COMPANY: &str = "PM";

/// Brands offered in the dashboard selector, in display order.
pub const BRANDS: [&str; 6] = ["MARLBORO", "HEETS", "FIIT", "BOND", "MERIT", "CHESTERFIELD"];

/// Days forecast past the last observation.
pub const FORECAST_HORIZON_DAYS: usize = 365;

/// Returns the canonical allow-list entry for `name`, ignoring case and
/// surrounding whitespace.
pub fn resolve_brand(name: &str) -> Option<&'static str> {
    let name = name.trim();
    BRANDS
        .iter()
        .copied()
        .find(|brand| brand.eq_ignore_ascii_case(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_brands_case_insensitively() {
        assert_eq!(resolve_brand("heets"), Some("HEETS"));
        assert_eq!(resolve_brand(" Chesterfield "), Some("CHESTERFIELD"));
        assert_eq!(resolve_brand("CAMEL"), None);
        assert_eq!(resolve_brand(""), None);
    }
}
