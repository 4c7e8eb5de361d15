/// Excel's limit on worksheet name length
pub const MAX_SHEET_NAME_LEN: usize = 31;

/// Characters Excel rejects in worksheet names
const FORBIDDEN_SHEET_CHARS: [char; 7] = ['[', ']', ':', '*', '?', '/', '\\'];

/// Pick a name for a captured page that fits a worksheet and is not in `existing`.
///
/// Over-long names are cut to leave room for a `_N` suffix; on collision the first free
/// `name_1`, `name_2`, ... is used, shortening the base further when the suffix grows.
/// Names are compared ignoring case, as Excel does.
pub fn unique_sheet_name<S: AsRef<str>>(requested: &str, existing: &[S]) -> String {
    let existing: Vec<String> = existing.iter().map(|name| name.as_ref().to_lowercase()).collect();
    let taken = |candidate: &str| existing.contains(&candidate.to_lowercase());

    let mut base: String = requested.to_string();
    if base.chars().count() > MAX_SHEET_NAME_LEN - 3 {
        // A worksheet name may not end with an apostrophe
        base = take_chars(&base, MAX_SHEET_NAME_LEN - 3).trim_end_matches('\'').to_string();
    }

    if !taken(&base) {
        return base;
    }

    let mut counter = 1usize;
    loop {
        let suffix = format!("_{}", counter);
        let mut candidate = format!("{}{}", base, suffix);
        if candidate.chars().count() > MAX_SHEET_NAME_LEN {
            let keep = MAX_SHEET_NAME_LEN.saturating_sub(suffix.len());
            candidate = format!("{}{}", take_chars(&base, keep), suffix);
        }
        if !taken(&candidate) {
            return candidate;
        }
        counter += 1;
    }
}

/// Make a requested page name acceptable as a worksheet name
pub fn sanitize_sheet_name(requested: &str) -> String {
    requested
        .chars()
        .map(|c| if FORBIDDEN_SHEET_CHARS.contains(&c) { '_' } else { c })
        .collect::<String>()
        .trim()
        .trim_matches('\'')
        .trim()
        .to_string()
}

fn take_chars(value: &str, count: usize) -> String {
    value.chars().take(count).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_free_name_unchanged() {
        let existing: [&str; 0] = [];
        assert_eq!(unique_sheet_name("LoginPage", &existing), "LoginPage");
        assert_eq!(unique_sheet_name("Login", &["Home"]), "Login");
    }

    #[test]
    fn test_collision_gets_suffix() {
        assert_eq!(unique_sheet_name("LoginPage", &["LoginPage"]), "LoginPage_1");
        assert_eq!(unique_sheet_name("LoginPage", &["LoginPage", "LoginPage_1"]), "LoginPage_2");
    }

    #[test]
    fn test_long_name_truncated_to_28() {
        let long = "A".repeat(40);
        let existing: [&str; 0] = [];
        let name = unique_sheet_name(&long, &existing);
        assert_eq!(name.len(), 28);
        assert_eq!(name, "A".repeat(28));
    }

    #[test]
    fn test_long_name_collision_fits_limit() {
        let long = "B".repeat(40);
        let first = unique_sheet_name(&long, &[] as &[String]);
        let second = unique_sheet_name(&long, &[first.clone()]);
        assert_eq!(second, format!("{}_1", "B".repeat(28)));
        assert!(second.len() <= MAX_SHEET_NAME_LEN);
    }

    #[test]
    fn test_suffix_shortens_base_when_needed() {
        let base = "C".repeat(28);
        let mut existing = vec![base.clone()];
        for n in 1..=99 {
            existing.push(unique_sheet_name(&base, &existing));
            assert!(existing.last().unwrap().chars().count() <= MAX_SHEET_NAME_LEN, "n = {}", n);
        }
        // Three-digit suffix no longer fits behind a 28 character base
        let next = unique_sheet_name(&base, &existing);
        assert_eq!(next, format!("{}_100", "C".repeat(27)));
        assert_eq!(next.len(), MAX_SHEET_NAME_LEN);
    }

    #[test]
    fn test_counts_characters_not_bytes() {
        let name = "é".repeat(30);
        let result = unique_sheet_name(&name, &[] as &[String]);
        assert_eq!(result.chars().count(), 28);
    }

    #[test]
    fn test_collision_ignores_case() {
        assert_eq!(unique_sheet_name("home", &["Home"]), "home_1");
        assert_eq!(unique_sheet_name("HOME", &["Home", "home_1"]), "HOME_2");
        assert_eq!(unique_sheet_name("config_elements", &["Config_Elements"]), "config_elements_1");
    }

    #[test]
    fn test_truncation_drops_trailing_apostrophe() {
        let requested = format!("{}'bbbb", "a".repeat(27));
        let existing: [&str; 0] = [];
        let name = unique_sheet_name(&requested, &existing);
        assert_eq!(name, "a".repeat(27));

        let again = unique_sheet_name(&requested, &[name.clone()]);
        assert_eq!(again, format!("{}_1", "a".repeat(27)));
    }

    #[test]
    fn test_sanitize_sheet_name() {
        assert_eq!(sanitize_sheet_name("Login/Signup"), "Login_Signup");
        assert_eq!(sanitize_sheet_name("[Cart]: step?*"), "_Cart__ step__");
        assert_eq!(sanitize_sheet_name("  'Home'  "), "Home");
        assert_eq!(sanitize_sheet_name("   "), "");
    }
}
