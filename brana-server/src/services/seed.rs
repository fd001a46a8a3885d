//! Demo catalog fixtures
//!
//! `POST /api/admin/seed-data` 清空商品/分类/横幅后写入以下数据。

use serde::Serialize;
use shared::models::{CategoryStatus, ProductImage, StockStatus};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::db::models::{Banner, Category, Product};
use crate::db::repository::{
    BannerRepository, CategoryRepository, ProductRepository, RepoResult,
};

/// Inserted record counts
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedSummary {
    pub products: usize,
    pub categories: usize,
    pub banners: usize,
}

struct CategoryFixture {
    name: &'static str,
    description: &'static str,
    icon: &'static str,
    featured: bool,
    age_groups: &'static [&'static str],
    color: &'static str,
}

const CATEGORIES: &[CategoryFixture] = &[
    CategoryFixture {
        name: "Baby Girls",
        description: "Soft essentials for little girls, 0 to 24 months",
        icon: "👶",
        featured: true,
        age_groups: &["0-6m", "6-12m", "12-24m"],
        color: "#F9A8D4",
    },
    CategoryFixture {
        name: "Baby Boys",
        description: "Everyday comfort for little boys, 0 to 24 months",
        icon: "🍼",
        featured: true,
        age_groups: &["0-6m", "6-12m", "12-24m"],
        color: "#93C5FD",
    },
    CategoryFixture {
        name: "Girls",
        description: "Dresses, sets and playwear for girls",
        icon: "👗",
        featured: true,
        age_groups: &["2-4y", "4-6y", "6-8y"],
        color: "#F472B6",
    },
    CategoryFixture {
        name: "Boys",
        description: "Shirts, shorts and sets for boys",
        icon: "👕",
        featured: false,
        age_groups: &["2-4y", "4-6y", "6-8y"],
        color: "#60A5FA",
    },
    CategoryFixture {
        name: "Shoes",
        description: "First walkers, sandals and sneakers",
        icon: "👟",
        featured: false,
        age_groups: &["6-12m", "12-24m", "2-4y"],
        color: "#FBBF24",
    },
    CategoryFixture {
        name: "Accessories",
        description: "Hats, bibs, socks and hair clips",
        icon: "🎀",
        featured: false,
        age_groups: &[],
        color: "#A78BFA",
    },
];

struct ProductFixture {
    name: &'static str,
    description: &'static str,
    category: &'static str,
    price: f64,
    stock: i64,
    deal: Option<(f64, f64)>,
    tags: &'static [&'static str],
    image: &'static str,
}

const PRODUCTS: &[ProductFixture] = &[
    ProductFixture {
        name: "Floral Cotton Romper",
        description: "Breathable cotton romper with snap buttons",
        category: "Baby Girls",
        price: 6500.0,
        stock: 24,
        deal: None,
        tags: &["new", "cotton"],
        image: "https://images.unsplash.com/photo-1522771930-78848d9293e8",
    },
    ProductFixture {
        name: "Ribbed Knit Bodysuit Set",
        description: "Three long-sleeve bodysuits in neutral tones",
        category: "Baby Boys",
        price: 9800.0,
        stock: 12,
        deal: Some((7900.0, 9800.0)),
        tags: &["bestseller"],
        image: "https://images.unsplash.com/photo-1519689680058-324335c77eba",
    },
    ProductFixture {
        name: "Tulle Party Dress",
        description: "Layered tulle dress with satin bow",
        category: "Girls",
        price: 15500.0,
        stock: 6,
        deal: None,
        tags: &["party"],
        image: "https://images.unsplash.com/photo-1518831959646-742c3a14ebf7",
    },
    ProductFixture {
        name: "Denim Dungarees",
        description: "Stretch denim dungarees with adjustable straps",
        category: "Boys",
        price: 11200.0,
        stock: 0,
        deal: None,
        tags: &["denim"],
        image: "https://images.unsplash.com/photo-1503919545889-aef636e10ad4",
    },
    ProductFixture {
        name: "Dino Print Pyjamas",
        description: "Two-piece cotton pyjamas with glow-in-the-dark print",
        category: "Boys",
        price: 7200.0,
        stock: 18,
        deal: Some((5900.0, 7200.0)),
        tags: &["sleepwear", "cotton"],
        image: "https://images.unsplash.com/photo-1471286174890-9c112ffca5b4",
    },
    ProductFixture {
        name: "Soft Sole First Walkers",
        description: "Leather first walkers with non-slip soles",
        category: "Shoes",
        price: 8400.0,
        stock: 3,
        deal: None,
        tags: &["new"],
        image: "https://images.unsplash.com/photo-1515488042361-ee00e0ddd4e4",
    },
    ProductFixture {
        name: "Sun Hat With Chin Strap",
        description: "Wide-brim cotton sun hat",
        category: "Accessories",
        price: 3500.0,
        stock: 40,
        deal: Some((2800.0, 3500.0)),
        tags: &["summer"],
        image: "https://images.unsplash.com/photo-1519457431-44ccd64a579b",
    },
    ProductFixture {
        name: "Muslin Bib Pack",
        description: "Four absorbent muslin bibs",
        category: "Accessories",
        price: 4200.0,
        stock: 2,
        deal: None,
        tags: &["cotton"],
        image: "https://images.unsplash.com/photo-1544126592-807ade215a0b",
    },
];

struct BannerFixture {
    title: &'static str,
    subtitle: &'static str,
    description: &'static str,
    image: &'static str,
    button_link: &'static str,
}

const BANNERS: &[BannerFixture] = &[
    BannerFixture {
        title: "New Season Arrivals",
        subtitle: "Fresh styles for little ones",
        description: "Soft fabrics and bright colours for every age",
        image: "https://images.unsplash.com/photo-1503454537195-1dcabb73ffb9",
        button_link: "/shop",
    },
    BannerFixture {
        title: "Deals Of The Week",
        subtitle: "Up to 20% off",
        description: "Selected sets and accessories at special prices",
        image: "https://images.unsplash.com/photo-1522771930-78848d9293e8",
        button_link: "/shop?deal=true",
    },
    BannerFixture {
        title: "Party Ready",
        subtitle: "Dresses and outfits for celebrations",
        description: "Make every birthday special",
        image: "https://images.unsplash.com/photo-1518831959646-742c3a14ebf7",
        button_link: "/category/girls",
    },
];

fn fixture_categories(now: i64) -> Vec<Category> {
    CATEGORIES
        .iter()
        .map(|f| Category {
            id: None,
            name: f.name.to_string(),
            slug: shared::util::slugify(f.name),
            description: f.description.to_string(),
            icon: f.icon.to_string(),
            featured: f.featured,
            status: CategoryStatus::Active,
            age_groups: f.age_groups.iter().map(|s| s.to_string()).collect(),
            color: f.color.to_string(),
            product_count: 0,
            created_at: now,
            updated_at: now,
        })
        .collect()
}

fn fixture_products(now: i64) -> Vec<Product> {
    PRODUCTS
        .iter()
        .enumerate()
        .map(|(i, f)| {
            // 逐条错开时间戳，保持"最新优先"排序稳定
            let at = now + i as i64;
            Product {
                id: None,
                name: f.name.to_string(),
                description: f.description.to_string(),
                category: f.category.to_string(),
                price: f.price,
                stock: f.stock,
                status: StockStatus::from_stock(f.stock),
                images: vec![ProductImage::new(f.image)],
                is_deal: f.deal.is_some(),
                deal_price: f.deal.map(|(deal, _)| deal),
                previous_price: f.deal.map(|(_, previous)| previous),
                tags: f.tags.iter().map(|s| s.to_string()).collect(),
                variants: Vec::new(),
                created_at: at,
                updated_at: at,
            }
        })
        .collect()
}

fn fixture_banners(now: i64) -> Vec<Banner> {
    BANNERS
        .iter()
        .enumerate()
        .map(|(i, f)| Banner {
            id: None,
            title: f.title.to_string(),
            subtitle: f.subtitle.to_string(),
            description: f.description.to_string(),
            image: f.image.to_string(),
            button_link: f.button_link.to_string(),
            order: i as i32,
            is_active: true,
            created_at: now,
            updated_at: now,
        })
        .collect()
}

/// Wipe and repopulate products, categories and banners
pub async fn seed_catalog(db: &Surreal<Db>, now: i64) -> RepoResult<SeedSummary> {
    let products = ProductRepository::new(db.clone());
    let categories = CategoryRepository::new(db.clone());
    let banners = BannerRepository::new(db.clone());

    products.delete_all().await?;
    categories.delete_all().await?;
    banners.delete_all().await?;

    let mut summary = SeedSummary::default();
    for c in fixture_categories(now) {
        categories.create(c).await?;
        summary.categories += 1;
    }
    let mut inserted = Vec::with_capacity(PRODUCTS.len());
    for p in fixture_products(now) {
        inserted.push(products.create(p).await?);
        summary.products += 1;
    }
    for b in fixture_banners(now) {
        banners.create(b).await?;
        summary.banners += 1;
    }

    categories.recount(&inserted).await?;

    tracing::info!(
        products = summary.products,
        categories = summary.categories,
        banners = summary.banners,
        "Demo catalog seeded"
    );
    Ok(summary)
}
