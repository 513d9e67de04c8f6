use crate::model::{Category, GridItem, ItemKind};
use crate::store::DefaultsProvider;

pub fn default_categories() -> Vec<Category> {
    vec![
        Category::new("home", "Home", "house"),
        Category::new("dev", "Dev", "code"),
        Category::new("design", "Design", "palette"),
        Category::new("media", "Media", "play"),
        Category::new("reading", "Reading", "book"),
    ]
}

/// Built-in tiles for the stock categories. Unknown and custom categories have none.
#[derive(Debug, Default, Clone, Copy)]
pub struct SeedCatalog;

impl DefaultsProvider for SeedCatalog {
    fn defaults(&self, category_id: &str) -> Vec<GridItem> {
        let entries: &[(&str, &str, &str, &str)] = match category_id {
            "home" => &[
                ("search", "Search", "https://duckduckgo.com", "2x1"),
                ("mail", "Mail", "https://mail.proton.me", "1x1"),
                ("calendar", "Calendar", "https://calendar.google.com", "1x1"),
                ("maps", "Maps", "https://www.openstreetmap.org", "1x1"),
                ("weather", "Weather", "https://wttr.in", "1x1"),
            ],
            "dev" => &[
                ("github", "GitHub", "https://github.com", "2x2"),
                ("crates", "crates.io", "https://crates.io", "1x1"),
                ("docs-rs", "docs.rs", "https://docs.rs", "1x1"),
                ("std", "std", "https://doc.rust-lang.org/std", "1x1"),
                ("playground", "Playground", "https://play.rust-lang.org", "1x1"),
            ],
            "design" => &[
                ("figma", "Figma", "https://www.figma.com", "1x1"),
                ("coolors", "Coolors", "https://coolors.co", "1x1"),
                ("fonts", "Fonts", "https://fonts.google.com", "1x1"),
            ],
            "media" => &[
                ("youtube", "YouTube", "https://www.youtube.com", "2x1"),
                ("radio", "Radio", "https://radio.garden", "1x1"),
            ],
            "reading" => &[
                ("hn", "Hacker News", "https://news.ycombinator.com", "1x1"),
                ("lobsters", "Lobsters", "https://lobste.rs", "1x1"),
                ("this-week", "This Week in Rust", "https://this-week-in-rust.org", "2x1"),
            ],
            _ => &[],
        };

        let mut items: Vec<GridItem> = entries
            .iter()
            .map(|(id, title, url, size)| {
                GridItem::bookmark(*title, *url)
                    .with_id(*id)
                    .with_size(*size)
                    .with_icon(*id)
            })
            .collect();

        if category_id == "home" {
            items.push(
                GridItem::new(ItemKind::Widget, "Clock")
                    .with_id("clock")
                    .with_size("2x2")
                    .with_color("#2d6872"),
            );
        }
        items
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn stock_categories_have_unique_seed_ids() {
        for category in default_categories() {
            let items = SeedCatalog.defaults(&category.id);
            assert!(!items.is_empty(), "{} has no seed items", category.id);
            let ids: HashSet<&str> = items.iter().map(|i| i.id.as_str()).collect();
            assert_eq!(ids.len(), items.len());
        }
    }

    #[test]
    fn custom_category_has_no_seed() {
        assert!(SeedCatalog.defaults("my-custom").is_empty());
    }
}
