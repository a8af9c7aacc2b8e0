//! Identifier forms derived from free-text model names.
//!
//! Model elements carry human labels such as `"Order Placed"` or
//! `"order-placed"`. Generated code and name comparisons use the derived
//! forms, so `"Order Placed"`, `"orderPlaced"` and `"ORDER_PLACED"` all
//! refer to the same `OrderPlaced` class.

use winnow::combinator::{alt, opt, repeat, terminated};
use winnow::error::ModalResult;
use winnow::prelude::*;
use winnow::stream::Stream;
use winnow::token::{one_of, take, take_while};

/// The spellings of one model name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentifierForms {
    /// `OrderPlaced`
    pub class_name: String,
    /// `orderPlaced`
    pub property_name: String,
    /// `order-placed`
    pub file_name: String,
    /// `ORDER_PLACED`
    pub constant_name: String,
}

#[must_use]
pub fn identifier_forms(raw: &str) -> IdentifierForms {
    let words = split_words(raw);

    let class_name: String = words.iter().map(|w| capitalize(w)).collect();
    let property_name = words
        .iter()
        .enumerate()
        .map(|(i, w)| if i == 0 { w.to_lowercase() } else { capitalize(w) })
        .collect();
    let file_name = words
        .iter()
        .map(|w| w.to_lowercase())
        .collect::<Vec<_>>()
        .join("-");
    let constant_name = words
        .iter()
        .map(|w| w.to_uppercase())
        .collect::<Vec<_>>()
        .join("_");

    IdentifierForms {
        class_name,
        property_name,
        file_name,
        constant_name,
    }
}

/// Whether two raw names denote the same class.
#[must_use]
pub fn same_class(a: &str, b: &str) -> bool {
    identifier_forms(a).class_name == identifier_forms(b).class_name
}

fn split_words(raw: &str) -> Vec<&str> {
    words.parse(raw).unwrap_or_default()
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

// -- Grammar ----------------------------------------------------------------

fn separator(input: &mut &str) -> ModalResult<()> {
    take_while(1.., |c: char| !c.is_alphanumeric())
        .void()
        .parse_next(input)
}

fn capitalized<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    (
        one_of(|c: char| c.is_uppercase()),
        take_while(1.., |c: char| c.is_lowercase()),
    )
        .take()
        .parse_next(input)
}

/// Upper-case run. When a lower-case letter follows, the last capital
/// starts the next word: `HTTPServer` splits as `HTTP`, `Server`.
fn acronym<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    let start = input.checkpoint();
    let run = take_while(1.., |c: char| c.is_uppercase()).parse_next(input)?;
    let followed_by_lower = input.chars().next().is_some_and(char::is_lowercase);
    let letters = run.chars().count();
    if followed_by_lower && letters > 1 {
        let keep = letters - 1;
        input.reset(&start);
        return take(keep).parse_next(input);
    }
    Ok(run)
}

fn word<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    alt((
        capitalized,
        acronym,
        take_while(1.., |c: char| c.is_lowercase()),
        take_while(1.., |c: char| c.is_ascii_digit()),
        // Scripts without case, and non-ASCII digits.
        take_while(1.., |c: char| {
            c.is_alphanumeric() && !c.is_uppercase() && !c.is_lowercase() && !c.is_ascii_digit()
        }),
    ))
    .parse_next(input)
}

fn words<'i>(input: &mut &'i str) -> ModalResult<Vec<&'i str>> {
    opt(separator).parse_next(input)?;
    repeat(0.., terminated(word, opt(separator))).parse_next(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forms_from_spaced_label() {
        let forms = identifier_forms("Order Placed");
        assert_eq!(forms.class_name, "OrderPlaced");
        assert_eq!(forms.property_name, "orderPlaced");
        assert_eq!(forms.file_name, "order-placed");
        assert_eq!(forms.constant_name, "ORDER_PLACED");
    }

    #[test]
    fn split_camel_and_pascal() {
        assert_eq!(split_words("orderPlaced"), ["order", "Placed"]);
        assert_eq!(split_words("OrderPlaced"), ["Order", "Placed"]);
    }

    #[test]
    fn split_acronyms() {
        assert_eq!(split_words("HTTPServer"), ["HTTP", "Server"]);
        assert_eq!(split_words("parseURL"), ["parse", "URL"]);
        assert_eq!(split_words("ORDER_PLACED"), ["ORDER", "PLACED"]);
    }

    #[test]
    fn split_digits_and_separators() {
        assert_eq!(
            split_words("  v2-order__item "),
            ["v", "2", "order", "item"]
        );
        assert_eq!(split_words("Order2Ship"), ["Order", "2", "Ship"]);
    }

    #[test]
    fn empty_and_separator_only() {
        assert!(split_words("").is_empty());
        assert!(split_words(" - _ ").is_empty());
        assert_eq!(identifier_forms("").class_name, "");
    }

    #[test]
    fn same_class_across_spellings() {
        assert!(same_class("Order Placed", "orderPlaced"));
        assert!(same_class("ORDER_PLACED", "order-placed"));
        assert!(!same_class("Order Placed", "Order Shipped"));
    }

    #[test]
    fn uncased_scripts_are_words() {
        assert_eq!(split_words("注文 確定"), ["注文", "確定"]);
    }
}
