use std::fmt::{Display, Formatter};

/// One slot of the compact page list shown under the table.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PageItem {
    Page(usize),
    Ellipsis,
}

impl Display for PageItem {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            PageItem::Page(n) => write!(f, "{n}"),
            PageItem::Ellipsis => f.write_str("..."),
        }
    }
}

/// Page numbers to display for `total` pages with `current` selected.
///
/// Up to 7 pages are listed verbatim; beyond that the first and last page stay
/// visible and the rest collapses around the current page.
pub fn visible_pages(total: usize, current: usize) -> Vec<PageItem> {
    use PageItem::{Ellipsis, Page};

    if total <= 7 {
        return (1..=total).map(Page).collect();
    }
    let mut pages = Vec::with_capacity(9);
    if current <= 4 {
        pages.extend((1..=5).map(Page));
        pages.push(Ellipsis);
        pages.push(Page(total));
    } else if current >= total - 3 {
        pages.push(Page(1));
        pages.push(Ellipsis);
        pages.extend((total - 4..=total).map(Page));
    } else {
        pages.push(Page(1));
        pages.push(Ellipsis);
        pages.extend((current - 1..=current + 1).map(Page));
        pages.push(Ellipsis);
        pages.push(Page(total));
    }
    pages
}

#[cfg(test)]
mod tests {
    use super::PageItem::{Ellipsis, Page};
    use super::*;

    fn render(items: &[PageItem]) -> String {
        items.iter().map(|p| p.to_string()).collect::<Vec<_>>().join(" ")
    }

    #[test]
    fn short_lists_are_verbatim() {
        assert_eq!(render(&visible_pages(7, 1)), "1 2 3 4 5 6 7");
        assert_eq!(render(&visible_pages(1, 1)), "1");
    }

    #[test]
    fn head_window() {
        assert_eq!(
            visible_pages(10, 1),
            vec![Page(1), Page(2), Page(3), Page(4), Page(5), Ellipsis, Page(10)]
        );
        assert_eq!(render(&visible_pages(10, 4)), "1 2 3 4 5 ... 10");
    }

    #[test]
    fn tail_window() {
        assert_eq!(
            visible_pages(10, 10),
            vec![Page(1), Ellipsis, Page(6), Page(7), Page(8), Page(9), Page(10)]
        );
        assert_eq!(render(&visible_pages(10, 7)), "1 ... 6 7 8 9 10");
    }

    #[test]
    fn middle_window() {
        assert_eq!(
            visible_pages(10, 5),
            vec![Page(1), Ellipsis, Page(4), Page(5), Page(6), Ellipsis, Page(10)]
        );
        assert_eq!(render(&visible_pages(8, 5)), "1 ... 4 5 6 7 8");
    }
}
