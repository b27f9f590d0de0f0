use std::sync::LazyLock;

use regex::Regex;

use crate::models::{FoodItem, Macros};

/// Number followed by a gram token (Latin or Arabic spellings).
static GRAM_PATTERN: LazyLock<Option<Regex>> = LazyLock::new(|| {
    // Matches: 100g, 100 grams, 2.5 gr, 100 جرام, 50 غرام
    Regex::new(
        r"(?i)(?:([1-9][0-9]{0,2}(?:,[0-9]{3})+(?:\.[0-9]+)?)|([0-9]+(?:[.,][0-9]+)?))\s*(?:grammes|gramme|grams|gram|gms|gm|gr|g|جرامات|جرام|جم|غرامات|غرام|غ)(?:\b|$)",
    )
    .ok()
});

/// Number followed by a millilitre token.
static MILLILITRE_PATTERN: LazyLock<Option<Regex>> = LazyLock::new(|| {
    // Matches: 250ml, 250 mL, 100 millilitres, 200 مل
    Regex::new(
        r"(?i)(?:([1-9][0-9]{0,2}(?:,[0-9]{3})+(?:\.[0-9]+)?)|([0-9]+(?:[.,][0-9]+)?))\s*(?:millilitres|millilitre|milliliters|milliliter|ml|مللي|مل)(?:\b|$)",
    )
    .ok()
});

/// Replace Arabic-Indic digits and the Arabic decimal separator with ASCII.
fn normalize_digits(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '\u{0660}'..='\u{0669}' => char::from(b'0' + (c as u32 - 0x0660) as u8),
            '\u{06F0}'..='\u{06F9}' => char::from(b'0' + (c as u32 - 0x06F0) as u8),
            '\u{066B}' => '.',
            _ => c,
        })
        .collect()
}

/// Group 1 holds comma-grouped thousands (`1,000`), group 2 a plain number
/// whose comma, if any, is a decimal separator (`12,5`).
fn first_quantity(pattern: Option<&Regex>, text: &str) -> Option<f64> {
    let caps = pattern?.captures(text)?;
    if let Some(grouped) = caps.get(1) {
        return grouped.as_str().replace(',', "").parse().ok();
    }
    caps.get(2)?.as_str().replace(',', ".").parse().ok()
}

/// Extract the gram weight encoded in a serving-size string.
///
/// Looks for the first number followed by a gram unit, then for the first
/// number followed by a millilitre unit (1 ml is treated as 1 g). Strings
/// without a recognizable unit yield `None`.
pub fn parse_serving_size_to_grams(text: &str) -> Option<f64> {
    let normalized = normalize_digits(text);
    first_quantity(GRAM_PATTERN.as_ref(), &normalized)
        .or_else(|| first_quantity(MILLILITRE_PATTERN.as_ref(), &normalized))
}

/// Nutrients of `quantity_grams` of `food`.
///
/// `None` when the serving size does not parse to a positive weight.
pub fn nutrients_for_quantity(food: &FoodItem, quantity_grams: f64) -> Option<Macros> {
    let base = parse_serving_size_to_grams(&food.serving_size)?;
    if base <= 0.0 {
        return None;
    }
    let per_gram = food.macros() / base;
    Some(per_gram * quantity_grams)
}
