//! Cell-level coercion helpers shared by the sheet parsers

/// Convert 0/1, true/false, yes/no style cells to bool.
///
/// Anything outside the known spellings attempts integer coercion and
/// finally falls back to the trimmed input's non-emptiness.
pub fn parse_bool(raw: &str) -> bool {
    let v = raw.trim().to_lowercase();
    match v.as_str() {
        "1" | "true" | "yes" | "y" | "t" => true,
        "0" | "false" | "no" | "n" | "f" | "" => false,
        _ => match v.parse::<i64>() {
            Ok(i) => i != 0,
            Err(_) => !v.is_empty(),
        },
    }
}

/// Convert a cell to f64, accepting both decimal-point and decimal-comma
/// input (e.g. `-42.77` and `-42,77`).
///
/// Empty and unparsable cells fall back to the default without a warning;
/// unparsable enum cells warn instead, and that asymmetry is intentional.
pub fn parse_float(raw: &str, default: f64) -> f64 {
    let s = raw.trim();
    if s.is_empty() {
        return default;
    }
    s.replace(',', ".").parse().unwrap_or(default)
}

/// Convert a cell to an integer, tolerating a float spelling like `24.0`.
/// Empty and unparsable cells yield `None`.
pub fn parse_int(raw: &str) -> Option<i64> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(i) = s.parse::<i64>() {
        return Some(i);
    }
    s.replace(',', ".").parse::<f64>().ok().map(|f| f as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bool_truthy_spellings() {
        for raw in ["yes", "1", "true", "Y", "T", "TRUE", " yes "] {
            assert!(parse_bool(raw), "expected '{}' to be true", raw);
        }
    }

    #[test]
    fn test_parse_bool_falsy_spellings() {
        for raw in ["no", "0", "false", "", "N", "F", "  "] {
            assert!(!parse_bool(raw), "expected '{}' to be false", raw);
        }
    }

    #[test]
    fn test_parse_bool_integer_coercion() {
        assert!(parse_bool("2"));
        assert!(parse_bool("-1"));
    }

    #[test]
    fn test_parse_bool_falls_back_to_truthiness() {
        assert!(parse_bool("maybe"));
    }

    #[test]
    fn test_parse_float_decimal_comma_equals_decimal_point() {
        assert_eq!(parse_float("53,02752", 0.0), parse_float("53.02752", 0.0));
        assert_eq!(parse_float("53,02752", 0.0), 53.02752);
        assert_eq!(parse_float("-42,77", 0.0), -42.77);
    }

    #[test]
    fn test_parse_float_falls_back_silently() {
        assert_eq!(parse_float("", 1.5), 1.5);
        assert_eq!(parse_float("not a number", 2.0), 2.0);
        // thousands separators turn into a double dot and fall back too
        assert_eq!(parse_float("1,234.5", 0.0), 0.0);
    }

    #[test]
    fn test_parse_int() {
        assert_eq!(parse_int("24"), Some(24));
        assert_eq!(parse_int("24.0"), Some(24));
        assert_eq!(parse_int(""), None);
        assert_eq!(parse_int("abc"), None);
    }
}
