/*!
 * Slugs
 * Deterministic name-to-slug transform shared by storage and name-based checks
 *
 * The transform runs in two passes:
 * 1. snake: words are capitalized, whitespace removed, and the separator
 *    inserted before every interior uppercase letter, then lowercased
 * 2. slug: the opposite dash flavour becomes the separator, `@` becomes
 *    `<sep>at<sep>`, anything that is not a letter, digit, whitespace or
 *    the separator is stripped, and runs of separators/whitespace collapse
 *    into one separator trimmed from both ends
 */

/// Convert `value` into a slug using `separator`
///
/// ```
/// use can_permissions::permissions::slugify;
///
/// assert_eq!(slugify("Can Create Users", '.'), "can.create.users");
/// assert_eq!(slugify("CreateUsers", '.'), "create.users");
/// assert_eq!(slugify("create users", '_'), "create_users");
/// ```
pub fn slugify(value: &str, separator: char) -> String {
    slug(&snake(value, separator), separator)
}

fn snake(value: &str, delimiter: char) -> String {
    if !value.is_empty() && value.chars().all(|c| c.is_lowercase()) {
        return value.to_string();
    }

    let squashed: Vec<char> = capitalize_words(value)
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();

    let mut out = String::with_capacity(squashed.len() * 2);
    for (i, c) in squashed.iter().enumerate() {
        out.push(*c);
        if squashed.get(i + 1).is_some_and(|next| next.is_uppercase()) {
            out.push(delimiter);
        }
    }
    out.to_lowercase()
}

fn capitalize_words(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut at_word_start = true;
    for c in value.chars() {
        if at_word_start {
            out.extend(c.to_uppercase());
        } else {
            out.push(c);
        }
        at_word_start = c.is_whitespace();
    }
    out
}

fn slug(value: &str, separator: char) -> String {
    let flip = if separator == '-' { '_' } else { '-' };

    let mut cleaned = String::with_capacity(value.len());
    for c in value.chars() {
        if c == flip {
            cleaned.push(separator);
        } else if c == '@' {
            cleaned.push(separator);
            cleaned.push_str("at");
            cleaned.push(separator);
        } else {
            cleaned.push(c);
        }
    }

    let mut out = String::with_capacity(cleaned.len());
    let mut pending_separator = false;
    for c in cleaned.to_lowercase().chars() {
        if c == separator || c.is_whitespace() {
            pending_separator = true;
        } else if c.is_alphanumeric() {
            if pending_separator && !out.is_empty() {
                out.push(separator);
            }
            pending_separator = false;
            out.push(c);
        }
    }
    out
}
