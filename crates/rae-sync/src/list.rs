//! Pure projection helpers shared by the list states.
//!
//! Filtering and sorting always start from the full raw collection. Nothing
//! is memoized.

use std::cmp::Ordering;

use rae_core::dates::parse_display;
use rae_core::enums::SortOrder;

/// Case-insensitive substring test. An empty needle matches everything.
pub fn contains_ci(haystack: &str, needle: &str) -> bool {
    needle.is_empty() || haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Fold a character to its unaccented lowercase base for collation.
fn fold(c: char) -> char {
    match c {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' | 'À' | 'Á' | 'Â' | 'Ã' | 'Ä' | 'Å' => 'a',
        'ç' | 'Ç' => 'c',
        'è' | 'é' | 'ê' | 'ë' | 'È' | 'É' | 'Ê' | 'Ë' => 'e',
        'ì' | 'í' | 'î' | 'ï' | 'Ì' | 'Í' | 'Î' | 'Ï' => 'i',
        'ñ' | 'Ñ' => 'n',
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'Ò' | 'Ó' | 'Ô' | 'Õ' | 'Ö' => 'o',
        'ù' | 'ú' | 'û' | 'ü' | 'Ù' | 'Ú' | 'Û' | 'Ü' => 'u',
        'ÿ' | 'Ÿ' => 'y',
        other => other.to_lowercase().next().unwrap_or(other),
    }
}

/// Collation for titles: accents and case are ignored first, then the raw
/// strings break ties so the order is total.
pub fn locale_cmp(a: &str, b: &str) -> Ordering {
    a.chars()
        .map(fold)
        .cmp(b.chars().map(fold))
        .then_with(|| a.cmp(b))
}

/// Sort items in place by `order`, reading display dates and titles
/// through the given accessors. Unparseable dates order before real ones.
pub fn sort_by_order<T>(
    items: &mut [T],
    order: SortOrder,
    date: impl Fn(&T) -> &str,
    title: impl Fn(&T) -> &str,
) {
    match order {
        SortOrder::Newest => items.sort_by(|a, b| parse_display(date(b)).cmp(&parse_display(date(a)))),
        SortOrder::Oldest => items.sort_by(|a, b| parse_display(date(a)).cmp(&parse_display(date(b)))),
        SortOrder::AlphaAsc => items.sort_by(|a, b| locale_cmp(title(a), title(b))),
        SortOrder::AlphaDesc => items.sort_by(|a, b| locale_cmp(title(b), title(a))),
    }
}
