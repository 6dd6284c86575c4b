use tracing::{debug, info, warn};

use crate::fetcher::Fetch;
use crate::models::Product;
use crate::pagination::total_pages;
use crate::parser::parse_products;

/// URL of listing page `page`; page 1 is the base URL itself.
pub fn page_url(base_url: &str, page: u32) -> String {
    if page <= 1 {
        return base_url.to_string();
    }
    let sep = if base_url.contains('?') { '&' } else { '?' };
    format!("{base_url}{sep}page={page}")
}

/// Walks the listing from page 1 up to the advertised last page.
///
/// Stops at the first page that cannot be fetched or has no products; the
/// remaining pages are not requested.
pub fn scrape_all_pages(fetcher: &dyn Fetch, base_url: &str) -> Vec<Product> {
    let first = match fetcher.fetch(base_url) {
        Ok(html) => html,
        Err(e) => {
            warn!(url = base_url, error = %e, "Could not load first listing page");
            return Vec::new();
        }
    };

    let pages = total_pages(&first);
    info!(url = base_url, pages, "Scraping listing");

    let mut all_products = Vec::new();
    let mut first = Some(first);
    for page in 1..=pages {
        let html = match first.take() {
            Some(html) => html,
            None => {
                let url = page_url(base_url, page);
                match fetcher.fetch(&url) {
                    Ok(html) => html,
                    Err(e) => {
                        warn!(page, error = %e, "Stopping at page that failed to load");
                        break;
                    }
                }
            }
        };

        let products = parse_products(&html);
        if products.is_empty() {
            debug!(page, "No products on page, stopping");
            break;
        }
        debug!(page, count = products.len(), "Parsed page");
        all_products.extend(products);
    }

    all_products
}
