//! Tolerant parsers for the persisted text encodings.
//!
//! Shapes use a comma/equals layout:
//!
//! - rectangle: `{X=<int>,Y=<int>,Width=<int>,Height=<int>}`
//! - extent: `{Width=<int>,Height=<int>}`
//!
//! Parsers never fail. Braces and spaces are ignored; a part with no `=`
//! reads as 0; an unparsable number yields the empty value.

use super::geometry::{Extent, Rect};

/// Parse a rectangle, returning `Rect::EMPTY` on malformed input.
#[must_use]
pub fn parse_rect(text: &str) -> Rect {
    match parse_parts::<4>(text) {
        Some([x, y, width, height]) => Rect::new(x, y, width, height),
        None => Rect::EMPTY,
    }
}

/// Parse an extent, returning `Extent::EMPTY` on malformed input.
#[must_use]
pub fn parse_extent(text: &str) -> Extent {
    match parse_parts::<2>(text) {
        Some([width, height]) => Extent::new(width, height),
        None => Extent::EMPTY,
    }
}

/// Parse an integer field, falling back to `default`.
#[must_use]
pub fn parse_int_or<T: std::str::FromStr>(text: &str, default: T) -> T {
    text.trim().parse().unwrap_or(default)
}

/// Parse a boolean token.
///
/// Only a "true" token counts as true: `true` in any case, or the
/// localized spreadsheet spelling `ИСТИНА`. Anything else is false.
#[must_use]
pub fn parse_bool_token(text: &str) -> bool {
    let token = strip(text).to_uppercase();
    token == "TRUE" || token == "ИСТИНА"
}

fn strip(text: &str) -> String {
    text.chars()
        .filter(|c| !matches!(c, '{' | '}' | ' ' | '\0'))
        .collect::<String>()
        .trim()
        .to_string()
}

fn parse_parts<const N: usize>(text: &str) -> Option<[i32; N]> {
    let cleaned = strip(text);
    let mut parts = cleaned.split(',');
    let mut values = [0i32; N];

    for value in &mut values {
        let Some(part) = parts.next() else {
            break;
        };
        let Some((_, raw)) = part.split_once('=') else {
            continue;
        };
        *value = parse_number(raw)?;
    }

    Some(values)
}

fn parse_number(raw: &str) -> Option<i32> {
    if let Ok(value) = raw.parse::<i32>() {
        return Some(value);
    }
    // Older exports wrote float-typed shapes ("3.0")
    let value = raw.parse::<f64>().ok()?;
    value.is_finite().then(|| value.trunc() as i32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rect_canonical() {
        assert_eq!(parse_rect("{X=1,Y=2,Width=3,Height=4}"), Rect::new(1, 2, 3, 4));
    }

    #[test]
    fn test_parse_rect_tolerates_spaces_and_braces() {
        assert_eq!(parse_rect("  {X = 5, Y=6 ,Width=1,Height=2}} "), Rect::new(5, 6, 1, 2));
        assert_eq!(parse_rect("X=5,Y=6,Width=1,Height=2"), Rect::new(5, 6, 1, 2));
    }

    #[test]
    fn test_parse_rect_missing_parts_default_to_zero() {
        assert_eq!(parse_rect("{X=5,Y=6}"), Rect::new(5, 6, 0, 0));
        assert_eq!(parse_rect("{X=5,Y,Width=3,Height=1}"), Rect::new(5, 0, 3, 1));
        assert_eq!(parse_rect(""), Rect::EMPTY);
    }

    #[test]
    fn test_parse_rect_garbage_is_empty() {
        assert_eq!(parse_rect("{X=abc,Y=1,Width=1,Height=1}"), Rect::EMPTY);
    }

    #[test]
    fn test_parse_rect_round_trips_display() {
        let rect = Rect::new(-3, 14, 6, 2);
        assert_eq!(parse_rect(&rect.to_string()), rect);
    }

    #[test]
    fn test_parse_extent() {
        assert_eq!(parse_extent("{Width=20,Height=30}"), Extent::new(20, 30));
        assert_eq!(parse_extent("{Width=2.0,Height=3.9}"), Extent::new(2, 3));
        assert_eq!(parse_extent("nonsense"), Extent::EMPTY);
    }

    #[test]
    fn test_parse_int_or() {
        assert_eq!(parse_int_or(" 42 ", 60u32), 42);
        assert_eq!(parse_int_or("x", 60u32), 60);
        assert_eq!(parse_int_or("-1", 60u32), 60);
    }

    #[test]
    fn test_parse_bool_token() {
        assert!(parse_bool_token("true"));
        assert!(parse_bool_token(" TRUE "));
        assert!(parse_bool_token("истина"));
        assert!(!parse_bool_token("1"));
        assert!(!parse_bool_token("false"));
        assert!(!parse_bool_token(""));
    }
}
