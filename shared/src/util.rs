/// 获取当前 UTC 时间戳（毫秒）
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// URL slug from a display name: lowercase ASCII alphanumerics joined by `-`.
///
/// `"Boys' Clothing & Shoes"` → `"boys-clothing-shoes"`
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_dash = false;
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
        } else if c != '\'' {
            pending_dash = true;
        }
    }
    slug
}

/// Case-insensitive comparison using full Unicode lowercasing,
/// the same folding as SurrealQL `string::lowercase`
pub fn eq_ignore_case(a: &str, b: &str) -> bool {
    a == b || a.to_lowercase() == b.to_lowercase()
}

/// `haystack` contains `needle`, ignoring case (Unicode)
pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Boys' Clothing & Shoes"), "boys-clothing-shoes");
        assert_eq!(slugify("  Toys  "), "toys");
        assert_eq!(slugify("0-3 Months"), "0-3-months");
        assert_eq!(slugify("!!!"), "");
    }

    #[test]
    fn test_case_folding_is_unicode() {
        assert!(eq_ignore_case("Babies", "BABIES"));
        assert!(eq_ignore_case("ÉTÉ", "été"));
        assert!(eq_ignore_case("Niñas", "NIÑAS"));
        assert!(!eq_ignore_case("Niña", "Nina"));
        assert!(contains_ignore_case("Pijama de ALGODÓN", "algodón"));
    }
}
