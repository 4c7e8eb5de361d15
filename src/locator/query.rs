use crate::locator::rules::{fallback_element_types, MAX_TAG_LEN};

/// Build one XPath query matching any element whose tag is in `element_types`.
///
/// Tokens that are not plain alphanumeric tag names are dropped; if none remain the
/// fallback tag set is used instead.
pub fn build_xpath_query<S: AsRef<str>>(element_types: &[S]) -> String {
    let mut valid: Vec<String> = element_types
        .iter()
        .map(|t| t.as_ref())
        .filter(|t| is_valid_tag(t))
        .map(str::to_string)
        .collect();

    if valid.is_empty() {
        valid = fallback_element_types();
    }

    let conditions: Vec<String> = valid.iter().map(|tag| format!("self::{}", tag)).collect();
    format!("//*[{}]", conditions.join(" or "))
}

fn is_valid_tag(token: &str) -> bool {
    !token.is_empty() && token.len() < MAX_TAG_LEN && token.chars().all(|c| c.is_ascii_alphanumeric())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locator::rules::FALLBACK_ELEMENT_TYPES;

    fn disjuncts(query: &str) -> usize {
        query.matches("self::").count()
    }

    #[test]
    fn test_simple_query() {
        assert_eq!(build_xpath_query(&["button", "a"]), "//*[self::button or self::a]");
        assert_eq!(build_xpath_query(&["input"]), "//*[self::input]");
    }

    #[test]
    fn test_disjunct_count_matches_valid_tokens() {
        let tokens = ["h1", "button", "my-widget", "", "x y", "averyveryverylongtagname", "td"];
        let query = build_xpath_query(&tokens);
        assert_eq!(disjuncts(&query), 3);
        assert_eq!(query, "//*[self::h1 or self::button or self::td]");
    }

    #[test]
    fn test_no_valid_tokens_uses_fallback() {
        let query = build_xpath_query(&["my-widget", "a b"]);
        assert_eq!(disjuncts(&query), FALLBACK_ELEMENT_TYPES.len());
        assert!(query.starts_with("//*[self::button or self::a"));

        let empty: [&str; 0] = [];
        assert_eq!(disjuncts(&build_xpath_query(&empty)), FALLBACK_ELEMENT_TYPES.len());
    }

    #[test]
    fn test_accepts_owned_strings() {
        let tags = vec!["span".to_string(), "div".to_string()];
        assert_eq!(build_xpath_query(&tags), "//*[self::span or self::div]");
    }
}
