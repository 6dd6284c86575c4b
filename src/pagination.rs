use scraper::{Html, Selector};

/// Number of listing pages announced by the page's "last page" link.
///
/// The link target ends in `...?page=N`; `N` is the page count. A page without
/// pagination controls, or with a link that does not end in a number, counts
/// as a single page.
pub fn total_pages(html: &str) -> u32 {
    last_page(html).filter(|&n| n > 0).unwrap_or(1)
}

fn last_page(html: &str) -> Option<u32> {
    let doc = Html::parse_document(html);
    let pagination = Selector::parse("ul.pagination").ok()?;
    let last = Selector::parse("li.last").ok()?;
    let link = Selector::parse("a[href]").ok()?;

    let href = doc
        .select(&pagination)
        .next()?
        .select(&last)
        .next()?
        .select(&link)
        .next()?
        .value()
        .attr("href")?;

    href.rsplit('=').next()?.trim().parse().ok()
}
