//! # Product Catalog
//!
//! The fixed seed catalog and the read-only queries the shop page runs
//! over it.
//!
//! The seed is materialized into storage the first time the catalog is
//! read (see `ProductRepository` in cirrus-db); after that the stored copy
//! is authoritative.

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::{Category, Product};

/// Category filter for [`search`]. `None` means "all".
pub type CategoryFilter = Option<Category>;

/// Parses the category drop-down value: `all` (or empty) means no filter.
pub fn parse_category_filter(raw: &str) -> Result<CategoryFilter, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("all") {
        return Ok(None);
    }
    trimmed.parse().map(Some)
}

// (id, name, cents, category, description)
const SEED: [(&str, &str, i64, Category, &str); 17] = [
    (
        "p1",
        "Pokémon TCG x Van Gogh Museum Pikachu with Grey Felt Hat (PSA or BGS Graded)",
        55999,
        Category::Premium,
        "Highly sought-after graded Pikachu card from the Van Gogh Museum collaboration.",
    ),
    (
        "p2",
        "Pokémon Mega Evolution Mega Gardevoir Elite Trainer Box",
        6999,
        Category::TrainerBox,
        "Elite Trainer Box featuring Mega Gardevoir with exclusive accessories.",
    ),
    (
        "p3",
        "2025 Pokémon Mega Evolution Phantasmal Flames Elite Trainer Box",
        8999,
        Category::TrainerBox,
        "Latest Mega Evolution series Elite Trainer Box with Phantasmal Flames theme.",
    ),
    (
        "p4",
        "2025 Pokémon Mega Evolution Mega Brave & Mega Symphonia Premium Trainer Box",
        8599,
        Category::TrainerBox,
        "Premium Trainer Box featuring both Mega Brave and Mega Symphonia expansions.",
    ),
    (
        "p5",
        "2025 Pokémon Scarlet & Violet Destined Rivals Elite Trainer Box",
        9199,
        Category::TrainerBox,
        "Scarlet & Violet series Elite Trainer Box with Destined Rivals theme.",
    ),
    (
        "p6",
        "Pokémon Mega Evolution Base Set Enhanced Booster Box (36 Boosters)",
        22999,
        Category::Booster,
        "Complete booster box with 36 Mega Evolution Base Set Enhanced booster packs.",
    ),
    (
        "p7",
        "Pokémon Scarlet & Violet Glory of the Rocket Team Attache Case Set (With Booster Box)",
        13999,
        Category::Special,
        "Premium attache case set featuring Team Rocket theme with included booster box.",
    ),
    (
        "p8",
        "2025 Pokémon Team Rocket Moltres ex Ultra-Premium Collection",
        26999,
        Category::Premium,
        "Ultra-Premium Collection showcasing Team Rocket Moltres ex with exclusive items.",
    ),
    (
        "p9",
        "2025 Pokémon Team Rocket Prismatic Evolutions Lucario ex & Tyranitar ex Premium Collection",
        10999,
        Category::Premium,
        "Premium Collection featuring both Lucario ex and Tyranitar ex from Prismatic Evolutions.",
    ),
    (
        "p10",
        "2025 Pokémon Scarlet & Violet Prismatic Evolutions Elite Trainer Box",
        11599,
        Category::TrainerBox,
        "Elite Trainer Box from the Prismatic Evolutions series of Scarlet & Violet.",
    ),
    (
        "p11",
        "2025 Pokémon Mega Evolution Charizard X ex Ultra-Premium Collection",
        19599,
        Category::Premium,
        "Ultra-Premium Collection centered around the iconic Charizard X ex.",
    ),
    (
        "p12",
        "Pokémon Scarlet & Violet Destined Rivals Pokemon Center Elite Trainer Box",
        33999,
        Category::TrainerBox,
        "Exclusive Pokemon Center edition Elite Trainer Box from the Destined Rivals series.",
    ),
    (
        "p13",
        "Pokémon TCG Scarlet & Violet 151 6pk Booster Bundle",
        8599,
        Category::Booster,
        "Booster bundle containing 6 packs from the Scarlet & Violet 151 collection.",
    ),
    (
        "p14",
        "Pokémon Scarlet & Violet Prismatic Evolutions Booster Bundle",
        5299,
        Category::Booster,
        "Booster bundle featuring packs from the Prismatic Evolutions series.",
    ),
    (
        "p15",
        "2025 Pokémon Scarlet & Violet Destined Rivals Booster Bundle",
        4499,
        Category::Booster,
        "Booster bundle from the latest Destined Rivals expansion.",
    ),
    (
        "p16",
        "2025 Pokémon Scarlet & Violet White Flare Booster Bundle",
        3999,
        Category::Booster,
        "Booster bundle featuring the White Flare expansion packs.",
    ),
    (
        "p17",
        "Pokémon Scarlet & Violet Prismatic Evolutions",
        3299,
        Category::Booster,
        "Surprise Box",
    ),
];

/// The seed catalog, in display order. Image references follow
/// `Assets/image<N>.jpg`.
pub fn seed_products() -> Vec<Product> {
    SEED.iter()
        .enumerate()
        .map(|(i, (id, name, cents, category, description))| Product {
            id: id.to_string(),
            name: name.to_string(),
            price: Money::from_cents(*cents),
            image: format!("Assets/image{}.jpg", i + 1),
            category: *category,
            description: description.to_string(),
        })
        .collect()
}

/// Looks a product up by id.
pub fn find_by_id<'a>(products: &'a [Product], id: &str) -> Option<&'a Product> {
    products.iter().find(|p| p.id == id)
}

/// Filters the catalog for the shop page.
///
/// `term` matches case-insensitively anywhere in the name or description;
/// an empty term matches everything. Catalog order is preserved.
pub fn search<'a>(products: &'a [Product], term: &str, category: CategoryFilter) -> Vec<&'a Product> {
    let needle = term.trim().to_lowercase();

    products
        .iter()
        .filter(|p| category.map_or(true, |c| p.category == c))
        .filter(|p| {
            needle.is_empty()
                || p.name.to_lowercase().contains(&needle)
                || p.description.to_lowercase().contains(&needle)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_catalog() {
        let products = seed_products();
        assert_eq!(products.len(), 17);
        assert_eq!(products[0].id, "p1");
        assert_eq!(products[0].image, "Assets/image1.jpg");
        assert_eq!(products[16].id, "p17");
        assert_eq!(products[16].image, "Assets/image17.jpg");
        assert!(products.iter().all(|p| !p.price.is_negative()));
    }

    #[test]
    fn test_find_by_id() {
        let products = seed_products();
        let bundle = find_by_id(&products, "p15").unwrap();
        assert_eq!(bundle.price, Money::from_cents(4499));
        assert!(find_by_id(&products, "p99").is_none());
    }

    #[test]
    fn test_search_term_is_case_insensitive() {
        let products = seed_products();
        let hits = search(&products, "CHARIZARD", None);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "p11");

        // Matches description only.
        let hits = search(&products, "surprise", None);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "p17");
    }

    #[test]
    fn test_search_with_category() {
        let products = seed_products();
        let boosters = search(&products, "", Some(Category::Booster));
        assert_eq!(boosters.len(), 6);
        assert!(boosters.iter().all(|p| p.category == Category::Booster));

        let hits = search(&products, "rocket", Some(Category::Premium));
        let ids: Vec<&str> = hits.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["p8", "p9"]);
    }

    #[test]
    fn test_parse_category_filter() {
        assert_eq!(parse_category_filter("all").unwrap(), None);
        assert_eq!(parse_category_filter("").unwrap(), None);
        assert_eq!(
            parse_category_filter("special").unwrap(),
            Some(Category::Special)
        );
        assert!(parse_category_filter("cards").is_err());
    }
}
