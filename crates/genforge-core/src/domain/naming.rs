// ============================================================================
// String Case Conversion Helpers
// ============================================================================
//
// Project names arrive as free text ("My Awesome App", "myAwesomeApp") and
// end up in package names, directories, and identifiers. These helpers derive
// the conventional spellings.

/// Convert to snake_case: `"MyApp"` → `"my_app"`, `"HTTPRequest"` → `"http_request"`.
pub fn to_snake_case(s: &str) -> String {
    split_words(s).join("_")
}

/// Convert to kebab-case. Used for npm package names and directories.
pub fn to_kebab_case(s: &str) -> String {
    split_words(s).join("-")
}

/// Convert to PascalCase: `"my-app"` → `"MyApp"`.
pub fn to_pascal_case(s: &str) -> String {
    split_words(s).iter().map(|w| capitalize(w)).collect()
}

/// Kebab-case restricted to `[a-z0-9-]`, safe for package names.
///
/// Falls back to `"app"` when nothing usable remains.
pub fn to_package_slug(s: &str) -> String {
    let slug: String = to_kebab_case(s)
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '-')
        .collect();
    let slug = slug.trim_matches('-').to_string();
    if slug.is_empty() { "app".into() } else { slug }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => {
            let mut out = String::new();
            out.extend(first.to_uppercase());
            out.push_str(chars.as_str());
            out
        }
        None => String::new(),
    }
}

/// Split a string into lowercase words.
///
/// Boundaries:
/// 1. `_`, `-`, `.`, whitespace
/// 2. lower → upper transition (`myApp`)
/// 3. acronym end (`HTTPServer` → `http`, `server`)
pub fn split_words(input: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '_' || c == '-' || c == '.' || c.is_whitespace() {
            if !current.is_empty() {
                words.push(current.to_lowercase());
                current.clear();
            }
            continue;
        }

        if let Some(&next) = chars.peek() {
            if c.is_lowercase() && next.is_uppercase() {
                current.push(c);
                words.push(current.to_lowercase());
                current.clear();
                continue;
            }

            if c.is_uppercase()
                && next.is_uppercase()
                && chars.clone().nth(1).is_some_and(|n| n.is_lowercase())
            {
                current.push(c);
                words.push(current.to_lowercase());
                current.clear();
                continue;
            }
        }

        current.push(c);
    }

    if !current.is_empty() {
        words.push(current.to_lowercase());
    }

    words
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn case_conversions() {
        assert_eq!(to_snake_case("My Awesome App"), "my_awesome_app");
        assert_eq!(to_kebab_case("myAwesomeApp"), "my-awesome-app");
        assert_eq!(to_pascal_case("my-awesome-app"), "MyAwesomeApp");
        assert_eq!(to_snake_case("XMLHttpRequest"), "xml_http_request");
    }

    #[test]
    fn package_slug_strips_unusable_characters() {
        assert_eq!(to_package_slug("Demo"), "demo");
        assert_eq!(to_package_slug("Café Bot!"), "caf-bot");
        assert_eq!(to_package_slug("!!!"), "app");
    }
}
