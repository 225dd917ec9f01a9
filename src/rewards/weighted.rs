//! Weighted random choice and loot labels.

use serde::{Deserialize, Serialize};

use crate::core::RandomSource;

/// An entry in a loot table.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WeightedItem {
    pub id: String,
    pub weight: f64,
}

impl WeightedItem {
    pub fn new(id: impl Into<String>, weight: f64) -> Self {
        Self { id: id.into(), weight }
    }

    /// Usable entries have a finite, strictly positive weight.
    #[must_use]
    pub fn is_usable(&self) -> bool {
        self.weight.is_finite() && self.weight > 0.0
    }
}

/// Select an item with a uniform `draw` in `[0, 1]`.
///
/// Items without a usable weight are ignored. The draw is clamped to
/// `[0, 1]`, scaled by the total weight, and the first item whose cumulative
/// weight reaches it wins; the last usable item covers floating-point
/// leftovers. Returns `None` when no item is usable.
///
/// ```
/// use letter_cascade::rewards::{pick_weighted_choice, WeightedItem};
///
/// let items = [WeightedItem::new("gem", 60.0), WeightedItem::new("card", 30.0), WeightedItem::new("relic", 10.0)];
/// assert_eq!(pick_weighted_choice(&items, 0.0).map(|i| i.id.as_str()), Some("gem"));
/// assert_eq!(pick_weighted_choice(&items, 0.65).map(|i| i.id.as_str()), Some("card"));
/// assert_eq!(pick_weighted_choice(&items, 0.95).map(|i| i.id.as_str()), Some("relic"));
/// ```
#[must_use]
pub fn pick_weighted_choice(items: &[WeightedItem], draw: f64) -> Option<&WeightedItem> {
    let usable: Vec<&WeightedItem> = items.iter().filter(|item| item.is_usable()).collect();
    let last = *usable.last()?;

    let total: f64 = usable.iter().map(|item| item.weight).sum();
    let draw = if draw.is_nan() { 0.0 } else { draw.clamp(0.0, 1.0) };
    let roll = draw * total;

    let mut cursor = 0.0;
    for item in usable {
        cursor += item.weight;
        if roll <= cursor {
            return Some(item);
        }
    }
    Some(last)
}

/// Draw from `rng` and select an item.
pub fn choose_weighted<'a>(items: &'a [WeightedItem], rng: &mut impl RandomSource) -> Option<&'a WeightedItem> {
    if !items.iter().any(WeightedItem::is_usable) {
        return None;
    }
    pick_weighted_choice(items, rng.next_unit())
}

/// Human-readable label for a loot id: separators become spaces and each
/// word is capitalized. Empty ids read as `"Loot"`.
///
/// ```
/// use letter_cascade::rewards::format_loot_label;
///
/// assert_eq!(format_loot_label("spell_card"), "Spell Card");
/// assert_eq!(format_loot_label("ancient-relic"), "Ancient Relic");
/// ```
#[must_use]
pub fn format_loot_label(id: &str) -> String {
    if id.is_empty() {
        return "Loot".to_string();
    }

    let mut label = String::with_capacity(id.len());
    let mut at_word_start = true;
    let mut in_separator = false;
    for ch in id.chars() {
        if ch == '_' || ch == '-' {
            if !in_separator {
                label.push(' ');
            }
            in_separator = true;
            at_word_start = true;
            continue;
        }
        in_separator = false;
        if at_word_start && ch.is_alphanumeric() {
            label.extend(ch.to_uppercase());
        } else {
            label.push(ch);
        }
        at_word_start = !ch.is_alphanumeric();
    }
    label
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ScriptedRng;

    fn table() -> Vec<WeightedItem> {
        vec![
            WeightedItem::new("gem", 60.0),
            WeightedItem::new("card", 30.0),
            WeightedItem::new("relic", 10.0),
        ]
    }

    fn pick(items: &[WeightedItem], draw: f64) -> Option<&str> {
        pick_weighted_choice(items, draw).map(|item| item.id.as_str())
    }

    #[test]
    fn test_draws_land_in_bands() {
        let items = table();
        assert_eq!(pick(&items, 0.0), Some("gem"));
        assert_eq!(pick(&items, 0.6), Some("gem"));
        assert_eq!(pick(&items, 0.7), Some("card"));
        assert_eq!(pick(&items, 0.99), Some("relic"));
        assert_eq!(pick(&items, 1.0), Some("relic"));
    }

    #[test]
    fn test_out_of_range_draws_clamp() {
        let items = table();
        assert_eq!(pick(&items, -3.0), Some("gem"));
        assert_eq!(pick(&items, 7.0), Some("relic"));
        assert_eq!(pick(&items, f64::NAN), Some("gem"));
    }

    #[test]
    fn test_unusable_weights_are_skipped() {
        let items = vec![
            WeightedItem::new("zero", 0.0),
            WeightedItem::new("negative", -5.0),
            WeightedItem::new("nan", f64::NAN),
            WeightedItem::new("inf", f64::INFINITY),
            WeightedItem::new("only", 2.0),
        ];
        assert_eq!(pick(&items, 0.0), Some("only"));
        assert_eq!(pick(&items, 1.0), Some("only"));
    }

    #[test]
    fn test_empty_pool_is_none() {
        assert_eq!(pick(&[], 0.5), None);
        assert_eq!(pick(&[WeightedItem::new("x", 0.0)], 0.5), None);

        let mut rng = ScriptedRng::constant(0.5);
        assert!(choose_weighted(&[], &mut rng).is_none());
        assert_eq!(rng.consumed(), 0);
    }

    #[test]
    fn test_choose_weighted_uses_rng() {
        let items = table();
        let mut rng = ScriptedRng::new(vec![0.95, 0.1]);
        assert_eq!(choose_weighted(&items, &mut rng).map(|i| i.id.as_str()), Some("relic"));
        assert_eq!(choose_weighted(&items, &mut rng).map(|i| i.id.as_str()), Some("gem"));
    }

    #[test]
    fn test_format_loot_label() {
        assert_eq!(format_loot_label("gem"), "Gem");
        assert_eq!(format_loot_label("spell_card"), "Spell Card");
        assert_eq!(format_loot_label("ancient-relic"), "Ancient Relic");
        assert_eq!(format_loot_label("big__-gem"), "Big Gem");
        assert_eq!(format_loot_label(""), "Loot");
    }
}
