//! Bundled product catalog.
//!
//! These entries ship with the binary so the storefront renders a full
//! catalog even when the remote document store is unconfigured or down.
//! Entries carry no id; the catalog service assigns synthetic
//! `product-{n}` ids at startup.

use cartwheel_core::{Category, Product};
use rust_decimal::Decimal;

fn product(
    name: &str,
    price_cents: i64,
    description: &str,
    category: Category,
    image: &str,
    features: &[&str],
    rating: f64,
    reviews: i64,
    try_on_available: bool,
) -> Product {
    Product {
        id: String::new(),
        name: name.to_string(),
        price: Decimal::new(price_cents, 2),
        description: description.to_string(),
        category,
        image: image.to_string(),
        features: features.iter().map(ToString::to_string).collect(),
        rating,
        reviews,
        try_on_available,
        seller_id: None,
    }
}

/// The bundled catalog, in display order.
#[must_use]
pub fn products() -> Vec<Product> {
    vec![
        product(
            "Classic Grey Hooded Sweatshirt",
            90_00,
            "A mid-weight hooded sweatshirt in heather grey with a relaxed fit and brushed fleece interior.",
            Category::Apparel,
            "https://i.imgur.com/R2PN9Wq.jpeg",
            &["Brushed fleece interior", "Kangaroo pocket", "Ribbed cuffs and hem"],
            4.6,
            318,
            true,
        ),
        product(
            "Classic Black T-Shirt",
            35_00,
            "A timeless staple cut from heavyweight combed cotton with a clean crew neckline.",
            Category::Apparel,
            "https://i.imgur.com/9DqEOV5.jpeg",
            &["100% combed cotton", "Pre-shrunk", "Reinforced collar"],
            4.5,
            412,
            true,
        ),
        product(
            "Classic Crewneck T-Shirt",
            28_00,
            "An everyday crewneck tee in soft ring-spun cotton, available in a relaxed unisex fit.",
            Category::Apparel,
            "https://i.imgur.com/QkIa5tT.jpeg",
            &["Ring-spun cotton", "Tagless neck label", "Machine washable"],
            4.3,
            187,
            true,
        ),
        product(
            "Slim-Fit Chino Pants",
            54_00,
            "Tailored slim-fit chinos with two-way stretch for all-day comfort at the office or off-duty.",
            Category::Apparel,
            "https://i.imgur.com/cSytoSD.jpeg",
            &["Two-way stretch twill", "Slim tapered leg", "Hidden coin pocket"],
            4.2,
            96,
            true,
        ),
        product(
            "Sleek Wireless Headphone & Inked Earbud Set",
            44_00,
            "An over-ear wireless headphone paired with matching in-ear buds, sharing one charging case.",
            Category::Electronics,
            "https://i.imgur.com/yVeIeDa.jpeg",
            &["Bluetooth 5.3", "Shared USB-C charging case", "18-hour combined playtime"],
            4.1,
            204,
            false,
        ),
        product(
            "Noise-Cancelling Headphones",
            129_00,
            "Active noise-cancelling over-ear headphones tuned for long flights and open offices.",
            Category::Electronics,
            "https://i.imgur.com/L1ZSZ0a.jpeg",
            &["Hybrid active noise cancellation", "30-hour battery life", "Multipoint pairing"],
            4.7,
            531,
            false,
        ),
        product(
            "Compact Smart Speaker",
            79_99,
            "A palm-sized smart speaker with room-filling sound and a built-in voice assistant.",
            Category::Electronics,
            "https://i.imgur.com/2Y1pLqk.jpeg",
            &["360-degree audio", "Voice assistant built in", "Wi-Fi and Bluetooth"],
            4.0,
            143,
            false,
        ),
        product(
            "Vibrant Pink Classic Sneakers",
            84_00,
            "Retro low-top sneakers in bold pink suede with a gum rubber outsole.",
            Category::Shoes,
            "https://i.imgur.com/mcW42Gi.jpeg",
            &["Suede upper", "Gum rubber outsole", "Cushioned insole"],
            4.4,
            167,
            false,
        ),
        product(
            "All-Terrain Trail Runners",
            112_00,
            "Lightweight trail running shoes with an aggressive lug pattern and breathable mesh upper.",
            Category::Shoes,
            "https://i.imgur.com/N1GkCox.jpeg",
            &["5mm multidirectional lugs", "Breathable mesh upper", "Rock plate protection"],
            4.6,
            289,
            false,
        ),
        product(
            "Radiant Glow Face Serum",
            32_50,
            "A vitamin C serum that brightens and evens skin tone with daily use.",
            Category::Beauty,
            "https://i.imgur.com/n3nk9A0.jpeg",
            &["15% vitamin C", "Fragrance free", "Suitable for sensitive skin"],
            4.3,
            221,
            false,
        ),
        product(
            "Hydrating Clay Face Mask",
            19_99,
            "A kaolin clay mask balanced with hyaluronic acid so skin is cleansed without feeling stripped.",
            Category::Beauty,
            "https://i.imgur.com/x0K3SKA.jpeg",
            &["Kaolin clay base", "Hyaluronic acid", "10-minute treatment"],
            4.1,
            98,
            false,
        ),
        product(
            "Ceramic Pour-Over Coffee Set",
            48_00,
            "A matte ceramic dripper and matching carafe for slow, even pour-over brewing at home.",
            Category::HomeGoods,
            "https://i.imgur.com/v2R4Cb2.jpeg",
            &["Matte glazed ceramic", "600ml carafe", "Fits standard #2 filters"],
            4.5,
            134,
            false,
        ),
        product(
            "Linen Throw Blanket",
            65_00,
            "A stonewashed linen throw that gets softer with every wash, woven in a subtle herringbone.",
            Category::HomeGoods,
            "https://i.imgur.com/5Z9Y1fR.jpeg",
            &["100% stonewashed linen", "Herringbone weave", "130x170cm"],
            4.4,
            76,
            false,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_entries_have_no_ids() {
        assert!(products().iter().all(|p| p.id.is_empty()));
    }

    #[test]
    fn test_bundled_entries_are_unique_listings() {
        let all = products();
        for (i, a) in all.iter().enumerate() {
            for b in all.iter().skip(i + 1) {
                assert!(!a.same_listing(b), "duplicate listing: {}", a.name);
            }
        }
    }

    #[test]
    fn test_every_category_is_represented() {
        let all = products();
        for category in [
            Category::Apparel,
            Category::Electronics,
            Category::HomeGoods,
            Category::Beauty,
            Category::Shoes,
        ] {
            assert!(
                all.iter().any(|p| p.category == category),
                "no bundled product in {category}"
            );
        }
    }

    #[test]
    fn test_try_on_entries_are_apparel() {
        assert!(
            products()
                .iter()
                .filter(|p| p.try_on_available)
                .all(|p| p.category == Category::Apparel)
        );
    }
}
