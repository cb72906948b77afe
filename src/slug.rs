//! Canonical slug handling for catalog titles.
//!
//! Every place that derives or compares a URL slug goes through
//! [`generate_slug`]; generator/resolver drift is a bug class this module
//! exists to close.

/// Fold a single character to its unaccented ASCII base, if it has one.
///
/// Covers Latin-1 Supplement and the Latin Extended-A letters that show up
/// in Spanish, Portuguese and French titles. Anything unmapped is returned
/// unchanged and dropped later by the ASCII filter.
const fn fold_diacritic(ch: char) -> char {
    match ch {
        'á' | 'à' | 'â' | 'ä' | 'ã' | 'å' | 'ā' | 'ă' => 'a',
        'é' | 'è' | 'ê' | 'ë' | 'ē' | 'ė' | 'ę' => 'e',
        'í' | 'ì' | 'î' | 'ï' | 'ī' | 'į' => 'i',
        'ó' | 'ò' | 'ô' | 'ö' | 'õ' | 'ō' | 'ø' => 'o',
        'ú' | 'ù' | 'û' | 'ü' | 'ū' | 'ů' => 'u',
        'ñ' | 'ń' => 'n',
        'ç' | 'ć' | 'č' => 'c',
        'ý' | 'ÿ' => 'y',
        'ś' | 'š' => 's',
        'ź' | 'ż' | 'ž' => 'z',
        'ł' => 'l',
        'đ' => 'd',
        other => other,
    }
}

/// Generate a URL-safe slug from a title, optionally suffixed with a year.
///
/// Lowercases, strips diacritics, drops everything outside `[a-z0-9 -]`,
/// collapses whitespace and hyphen runs, and trims hyphens at both ends.
/// Pure and deterministic; an empty or all-symbol title yields `""`.
#[must_use]
pub fn generate_slug(title: &str, year: Option<&str>) -> String {
    let mut slug = String::with_capacity(title.len() + 5);
    let mut last_hyphen = true; // suppress a leading hyphen

    for ch in title.chars().flat_map(char::to_lowercase) {
        let ch = fold_diacritic(ch);
        if ch.is_ascii_alphanumeric() {
            slug.push(ch);
            last_hyphen = false;
        } else if (ch.is_whitespace() || ch == '-') && !last_hyphen {
            slug.push('-');
            last_hyphen = true;
        }
    }

    while slug.ends_with('-') {
        slug.pop();
    }

    match year {
        Some(y) if !y.is_empty() && !slug.is_empty() => format!("{slug}-{y}"),
        _ => slug,
    }
}

/// Whether `input` has the 8-4-4-4-12 hex shape of a canonical record id.
#[must_use]
pub fn is_uuid_shaped(input: &str) -> bool {
    let segments: Vec<&str> = input.split('-').collect();
    if segments.len() != 5 {
        return false;
    }
    const LENS: [usize; 5] = [8, 4, 4, 4, 12];
    segments
        .iter()
        .zip(LENS)
        .all(|(seg, len)| seg.len() == len && seg.chars().all(|c| c.is_ascii_hexdigit()))
}

/// Strip a trailing `-YYYY` segment, if present.
///
/// Returns `None` when the input has no plausible year suffix. "Plausible"
/// means exactly four digits after the final hyphen; no range check, since
/// stored release years are free-form strings upstream.
#[must_use]
pub fn strip_trailing_year(input: &str) -> Option<&str> {
    let (base, tail) = input.rsplit_once('-')?;
    if tail.len() == 4 && tail.chars().all(|c| c.is_ascii_digit()) && !base.is_empty() {
        Some(base)
    } else {
        None
    }
}

/// Extract a four-digit year from a date string such as `2003-05-15`.
#[must_use]
pub fn year_of(date: &str) -> Option<&str> {
    let year = date.get(..4)?;
    if year.len() == 4 && year.chars().all(|c| c.is_ascii_digit()) {
        Some(year)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slug_basic() {
        assert_eq!(generate_slug("Matrix Reloaded", None), "matrix-reloaded");
        assert_eq!(
            generate_slug("Matrix Reloaded", Some("2003")),
            "matrix-reloaded-2003"
        );
    }

    #[test]
    fn slug_strips_diacritics() {
        assert_eq!(generate_slug("Ópera Nocturna", None), "opera-nocturna");
        assert_eq!(generate_slug("El Señor de los Anillos", None), "el-senor-de-los-anillos");
        assert_eq!(generate_slug("Amélie", None), "amelie");
    }

    #[test]
    fn slug_collapses_separators() {
        assert_eq!(generate_slug("  Spider--Man:   No Way Home!! ", None), "spider-man-no-way-home");
        assert_eq!(generate_slug("---", None), "");
    }

    #[test]
    fn slug_empty_title() {
        assert_eq!(generate_slug("", None), "");
        // A year never rides on an empty base.
        assert_eq!(generate_slug("", Some("2021")), "");
    }

    #[test]
    fn slug_is_deterministic() {
        let a = generate_slug("Crónica de una Muerte", Some("1987"));
        let b = generate_slug("Crónica de una Muerte", Some("1987"));
        assert_eq!(a, b);
    }

    #[test]
    fn slug_charset_invariant() {
        for title in ["¿Qué pasó ayer?", "WALL·E", "8½", "Læs mig"] {
            let slug = generate_slug(title, Some("1999"));
            assert!(!slug.starts_with('-') && !slug.ends_with('-'));
            assert!(!slug.contains("--"));
            assert!(slug.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'));
        }
    }

    #[test]
    fn uuid_shape() {
        assert!(is_uuid_shaped("f81d4fae-7dec-41d0-a765-00a0c91e6bf6"));
        assert!(!is_uuid_shaped("matrix-reloaded-2003"));
        assert!(!is_uuid_shaped("f81d4fae-7dec-41d0-a765"));
        assert!(!is_uuid_shaped("zzzzzzzz-7dec-41d0-a765-00a0c91e6bf6"));
    }

    #[test]
    fn trailing_year() {
        assert_eq!(strip_trailing_year("dune-2021"), Some("dune"));
        assert_eq!(strip_trailing_year("dune"), None);
        assert_eq!(strip_trailing_year("blade-runner-2049-2017"), Some("blade-runner-2049"));
        assert_eq!(strip_trailing_year("-2021"), None);
    }

    #[test]
    fn year_extraction() {
        assert_eq!(year_of("2003-05-15"), Some("2003"));
        assert_eq!(year_of("2003"), Some("2003"));
        assert_eq!(year_of("n/a"), None);
        assert_eq!(year_of(""), None);
    }
}
