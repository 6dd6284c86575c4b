use scraper::{ElementRef, Html, Selector};
use crate::models::Product;

const CONTAINER: &str = "div.item.product_listbox.oh";
const NAME: &str = "div.listbox_title.oh";
const PRICE: &str = "div.listbox_price.text-center";
const FINAL_PRICE: &str = "strong";

struct Selectors {
    container: Selector,
    name: Selector,
    price: Selector,
    final_price: Selector,
}

impl Selectors {
    fn new() -> Self {
        // Constant selectors; parsing them cannot fail.
        Selectors {
            container: Selector::parse(CONTAINER).unwrap(),
            name: Selector::parse(NAME).unwrap(),
            price: Selector::parse(PRICE).unwrap(),
            final_price: Selector::parse(FINAL_PRICE).unwrap(),
        }
    }
}

/// Extracts every product on one listing page, in page order.
///
/// Containers missing either the name or the price block are skipped. Markup
/// with no recognisable containers gives an empty list.
pub fn parse_products(html: &str) -> Vec<Product> {
    let doc = Html::parse_document(html);
    let sel = Selectors::new();

    doc.select(&sel.container)
        .filter_map(|item| parse_item(item, &sel))
        .collect()
}

fn parse_item(item: ElementRef<'_>, sel: &Selectors) -> Option<Product> {
    let name = item.select(&sel.name).next()?;
    let price = item.select(&sel.price).next()?;

    let price = price
        .select(&sel.final_price)
        .next()
        .map(|strong| clean_price(&stripped_text(strong)))
        .and_then(|cleaned| parse_price(&cleaned));

    Some(Product::new(stripped_text(name), price))
}

/// Text of all descendants, each fragment trimmed, joined with nothing.
pub fn stripped_text(el: ElementRef<'_>) -> String {
    el.text().map(str::trim).filter(|t| !t.is_empty()).collect()
}

/// Keeps digits and separators only. The last separator is taken as the
/// decimal point, written as `.`; any earlier ones are digit grouping.
pub fn clean_price(raw: &str) -> String {
    let kept: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == ',' || *c == '.')
        .collect();

    let is_sep = |c: char| c == ',' || c == '.';
    match kept.rfind(is_sep) {
        Some(idx) => {
            let (int_part, frac_part) = kept.split_at(idx);
            let int_digits: String = int_part.chars().filter(|c| !is_sep(*c)).collect();
            format!("{}.{}", int_digits, &frac_part[1..])
        }
        None => kept,
    }
}

pub fn parse_price(cleaned: &str) -> Option<f64> {
    cleaned.parse::<f64>().ok()
}
