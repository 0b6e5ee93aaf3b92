//! Number extraction shared by every parser.
//!
//! Listing text uses the Spanish convention: `.` groups thousands and `,`
//! marks decimals ("1.234.567 €", "12,50 €/m²").

use regex::Regex;
use std::sync::LazyLock;

static RE_DIGITS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+").unwrap());

static RE_GROUPED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+(?:\.\d{3})*)(?:,(\d+))?").unwrap());

static RE_JOINT_AREAS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?:(?P<constructed>\d+(?:\.\d{3})*)\s*m²\s*construidos)?(?:\s*,?\s*(?P<usable>\d+(?:\.\d{3})*)\s*m²\s*útiles)?",
    )
    .unwrap()
});

/// First maximal run of decimal digits in `text`
pub fn first_digits(text: &str) -> Option<i64> {
    RE_DIGITS.find(text)?.as_str().parse().ok()
}

/// Parse a dot-grouped amount such as `"1.234.567 €"` into `1234567.0`.
pub fn parse_grouped_price(text: &str) -> Option<f64> {
    let caps = RE_GROUPED.captures(text)?;
    let integer = caps.get(1)?.as_str().replace('.', "");
    let number = match caps.get(2) {
        Some(decimals) => format!("{}.{}", integer, decimals.as_str()),
        None => integer,
    };
    number.parse().ok()
}

/// Extract `(constructed, usable)` from "90 m² construidos, 70 m² útiles".
///
/// Either half may be missing; both are `None` when the phrase is absent.
pub fn parse_joint_areas(text: &str) -> (Option<f64>, Option<f64>) {
    let Some(caps) = RE_JOINT_AREAS
        .captures_iter(text)
        .find(|c| c.name("constructed").is_some() || c.name("usable").is_some())
    else {
        return (None, None);
    };

    let area = |name: &str| {
        caps.name(name)
            .and_then(|m| m.as_str().replace('.', "").parse::<f64>().ok())
    };

    (area("constructed"), area("usable"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_digits() {
        assert_eq!(first_digits("3 habitaciones"), Some(3));
        assert_eq!(first_digits("Construido en 1975"), Some(1975));
        assert_eq!(first_digits("planta 12ª"), Some(12));
        assert_eq!(first_digits("Sin habitaciones"), None);
    }

    #[test]
    fn test_grouped_price() {
        assert_eq!(parse_grouped_price("1.234.567 €"), Some(1_234_567.0));
        assert_eq!(parse_grouped_price("123.456 €"), Some(123_456.0));
        assert_eq!(parse_grouped_price("950 €"), Some(950.0));
        assert_eq!(parse_grouped_price("2.345 €/m²"), Some(2_345.0));
        assert_eq!(parse_grouped_price("12,50 €/mes"), Some(12.5));
    }

    #[test]
    fn test_grouped_price_absent() {
        assert_eq!(parse_grouped_price(""), None);
        assert_eq!(parse_grouped_price("A consultar"), None);
    }

    #[test]
    fn test_joint_areas() {
        assert_eq!(
            parse_joint_areas("90 m² construidos, 70 m² útiles"),
            (Some(90.0), Some(70.0))
        );
        assert_eq!(parse_joint_areas("120 m² construidos"), (Some(120.0), None));
        assert_eq!(parse_joint_areas("70 m² útiles"), (None, Some(70.0)));
        assert_eq!(
            parse_joint_areas("1.250 m² construidos, 1.100 m² útiles"),
            (Some(1250.0), Some(1100.0))
        );
        assert_eq!(parse_joint_areas("2 baños"), (None, None));
    }
}
