//! Filter/Search Engine
//!
//! Pure functions over the loaded collections. Facets are derived from what
//! is loaded, never fetched; filtering never introduces items and has no
//! hidden state, so identical inputs always give identical output.

use chrono::{DateTime, NaiveDate, NaiveTime, TimeDelta, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use shared::models::{Category, Product};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Placeholder brand for products without brand/manufacturer attributes
pub const NO_BRAND: &str = "No Brand";

/// Derived stock/activity label, distinct from the stored product status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum StatusLabel {
    Active,
    LowStock,
    OutOfStock,
    Inactive,
}

impl StatusLabel {
    pub const ALL: [StatusLabel; 4] = [
        StatusLabel::Active,
        StatusLabel::LowStock,
        StatusLabel::OutOfStock,
        StatusLabel::Inactive,
    ];

    /// Stock wins over the active flag: empty stock is always "Out of Stock"
    pub fn of(product: &Product) -> Self {
        if product.stock == 0 {
            StatusLabel::OutOfStock
        } else if product.stock <= product.min_stock {
            StatusLabel::LowStock
        } else if product.is_active {
            StatusLabel::Active
        } else {
            StatusLabel::Inactive
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StatusLabel::Active => "Active",
            StatusLabel::LowStock => "Low Stock",
            StatusLabel::OutOfStock => "Out of Stock",
            StatusLabel::Inactive => "Inactive",
        }
    }

    pub fn option_id(&self) -> &'static str {
        match self {
            StatusLabel::Active => "active",
            StatusLabel::LowStock => "low-stock",
            StatusLabel::OutOfStock => "out-of-stock",
            StatusLabel::Inactive => "inactive",
        }
    }
}

impl fmt::Display for StatusLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for StatusLabel {
    type Err = String;

    /// Accepts either the label ("Low Stock") or the option id ("low-stock")
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        StatusLabel::ALL
            .into_iter()
            .find(|l| l.as_str().eq_ignore_ascii_case(s) || l.option_id().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown status: {s}"))
    }
}

/// Brand from `attributes.brand`, then `attributes.manufacturer`
pub fn brand_of(product: &Product) -> String {
    ["brand", "manufacturer"]
        .iter()
        .filter_map(|key| product.attributes.get(*key))
        .find(|value| !value.is_blank())
        .map(ToString::to_string)
        .unwrap_or_else(|| NO_BRAND.to_string())
}

/// Mean review rating; 0 without reviews
pub fn average_rating(product: &Product) -> f64 {
    if product.reviews.is_empty() {
        return 0.0;
    }
    let sum: f64 = product.reviews.iter().map(|r| r.rating).sum();
    sum / product.reviews.len() as f64
}

/// Category name from the embedded category, else looked up by id
pub fn category_name<'a>(product: &'a Product, categories: &'a [Category]) -> Option<&'a str> {
    product
        .category
        .as_ref()
        .map(|c| c.name.as_str())
        .or_else(|| {
            categories
                .iter()
                .find(|c| c.id == product.category_id)
                .map(|c| c.name.as_str())
        })
}

/// Minimum average rating, written "N+"
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
pub struct RatingThreshold(pub f64);

impl FromStr for RatingThreshold {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let number = s.trim().trim_end_matches('+');
        number
            .parse::<f64>()
            .ok()
            .filter(|n| n.is_finite())
            .map(RatingThreshold)
            .ok_or_else(|| format!("invalid rating threshold: {s}"))
    }
}

impl fmt::Display for RatingThreshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}+", self.0)
    }
}

/// Inclusive created-at range; either bound may be open
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

impl DateRange {
    /// Whole UTC days: start of `from` through the last instant of `to`
    pub fn days(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        Self {
            from: from.map(|d| d.and_time(NaiveTime::MIN).and_utc()),
            to: to.map(|d| {
                (d.and_time(NaiveTime::MIN) + TimeDelta::days(1) - TimeDelta::nanoseconds(1))
                    .and_utc()
            }),
        }
    }

    pub fn is_open(&self) -> bool {
        self.from.is_none() && self.to.is_none()
    }

    pub fn contains(&self, at: &DateTime<Utc>) -> bool {
        self.from.is_none_or(|from| *at >= from) && self.to.is_none_or(|to| *at <= to)
    }
}

/// Active filter dimensions; empty lists and `None` bounds are skipped
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterState {
    /// Category names
    pub categories: Vec<String>,
    pub statuses: Vec<StatusLabel>,
    pub brands: Vec<String>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub min_stock: Option<i64>,
    pub max_stock: Option<i64>,
    pub min_rating: Option<RatingThreshold>,
    pub created: DateRange,
}

impl FilterState {
    /// Number of active dimensions (for a "filters (N)" badge)
    pub fn active_count(&self) -> usize {
        [
            !self.categories.is_empty(),
            !self.statuses.is_empty(),
            !self.brands.is_empty(),
            self.min_price.is_some() || self.max_price.is_some(),
            self.min_stock.is_some() || self.max_stock.is_some(),
            self.min_rating.is_some(),
            !self.created.is_open(),
        ]
        .into_iter()
        .filter(|active| *active)
        .count()
    }

    pub fn is_empty(&self) -> bool {
        self.active_count() == 0
    }
}

fn matches_text(product: &Product, category: Option<&str>, brand: &str, needle: &str) -> bool {
    let hit = |s: &str| s.to_lowercase().contains(needle);
    hit(&product.name)
        || category.is_some_and(hit)
        || hit(brand)
        || product.sku.as_deref().is_some_and(hit)
}

fn matches(
    product: &Product,
    categories: &[Category],
    needle: Option<&str>,
    filters: &FilterState,
) -> bool {
    let category = category_name(product, categories);
    let brand = brand_of(product);

    if let Some(needle) = needle {
        if !matches_text(product, category, &brand, needle) {
            return false;
        }
    }
    if !filters.categories.is_empty()
        && !category.is_some_and(|name| filters.categories.iter().any(|c| c == name))
    {
        return false;
    }
    if !filters.statuses.is_empty() && !filters.statuses.contains(&StatusLabel::of(product)) {
        return false;
    }
    if !filters.brands.is_empty() && !filters.brands.contains(&brand) {
        return false;
    }
    if filters.min_price.is_some_and(|min| product.price < min)
        || filters.max_price.is_some_and(|max| product.price > max)
    {
        return false;
    }
    if filters.min_stock.is_some_and(|min| product.stock < min)
        || filters.max_stock.is_some_and(|max| product.stock > max)
    {
        return false;
    }
    if filters
        .min_rating
        .is_some_and(|RatingThreshold(min)| average_rating(product) < min)
    {
        return false;
    }
    filters.created.contains(&product.created_at)
}

/// Products passing the search term and every active filter, in input order
///
/// An empty (or blank) search term matches everything.
pub fn filter_products<'a>(
    products: &'a [Product],
    categories: &[Category],
    search: &str,
    filters: &FilterState,
) -> Vec<&'a Product> {
    let needle = search.trim().to_lowercase();
    let needle = (!needle.is_empty()).then_some(needle.as_str());
    products
        .iter()
        .filter(|p| matches(p, categories, needle, filters))
        .collect()
}

// ========== Facets ==========

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FacetOption {
    pub id: String,
    pub label: String,
    pub value: String,
}

impl FacetOption {
    fn new(id: impl Into<String>, label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Bounds<T> {
    pub min: T,
    pub max: T,
}

/// Filter dimensions derived from the loaded collections
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Facets {
    pub categories: Vec<FacetOption>,
    pub statuses: Vec<FacetOption>,
    pub brands: Vec<FacetOption>,
    pub price: Bounds<Decimal>,
    pub stock: Bounds<i64>,
    pub ratings: Vec<FacetOption>,
}

fn option_slug(name: &str) -> String {
    name.to_lowercase().split_whitespace().collect::<Vec<_>>().join("-")
}

pub fn facets(products: &[Product], categories: &[Category]) -> Facets {
    let category_options = categories
        .iter()
        .map(|c| {
            let id = if c.id.is_empty() {
                option_slug(&c.name)
            } else {
                c.id.clone()
            };
            FacetOption::new(id, &c.name, &c.name)
        })
        .collect();

    let status_options = StatusLabel::ALL
        .iter()
        .map(|s| FacetOption::new(s.option_id(), s.as_str(), s.as_str()))
        .collect();

    let brands: BTreeSet<String> = products
        .iter()
        .map(brand_of)
        .filter(|b| b != NO_BRAND)
        .collect();
    let brand_options = brands
        .into_iter()
        .map(|b| FacetOption::new(option_slug(&b), &b, &b))
        .collect();

    let prices = products.iter().map(|p| p.price).filter(|p| *p > Decimal::ZERO);
    let price = match (prices.clone().min(), prices.max()) {
        (Some(min), Some(max)) => Bounds {
            min: min.floor(),
            max: max.ceil(),
        },
        _ => Bounds {
            min: Decimal::ZERO,
            max: Decimal::from(1000),
        },
    };

    let stocks = products.iter().map(|p| p.stock).filter(|s| *s >= 0);
    let stock = match (stocks.clone().min(), stocks.max()) {
        (Some(min), Some(max)) => Bounds { min, max },
        _ => Bounds { min: 0, max: 100 },
    };

    let ratings = (1..=4)
        .rev()
        .map(|n| FacetOption::new(format!("{n}plus"), format!("{n}+ Stars"), format!("{n}+")))
        .collect();

    Facets {
        categories: category_options,
        statuses: status_options,
        brands: brand_options,
        price,
        stock,
        ratings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use shared::models::{AttributeValue, ProductReview};

    fn product(id: &str, name: &str, price: i64, stock: i64) -> Product {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "name": name,
            "price": price,
            "stock": stock,
            "minStock": 5,
            "isActive": true,
            "categoryId": "c1",
            "createdAt": "2024-03-10T12:00:00Z",
            "updatedAt": "2024-03-10T12:00:00Z"
        }))
        .unwrap()
    }

    fn review(rating: f64) -> ProductReview {
        serde_json::from_value(serde_json::json!({
            "id": "r", "productId": "p", "rating": rating,
            "createdAt": "2024-03-10T12:00:00Z", "updatedAt": "2024-03-10T12:00:00Z"
        }))
        .unwrap()
    }

    fn categories() -> Vec<Category> {
        serde_json::from_value(serde_json::json!([
            {"id": "c1", "name": "Footwear"},
            {"id": "c2", "name": "Outdoor Gear"}
        ]))
        .unwrap()
    }

    fn catalog() -> Vec<Product> {
        let mut shoe = product("p1", "Trail Shoe", 120, 40);
        shoe.attributes.insert("brand".into(), "Acme".into());
        shoe.sku = Some("SHOE-001".into());
        shoe.reviews = vec![review(5.0), review(4.0)];

        let mut tent = product("p2", "Dome Tent", 300, 3);
        tent.category_id = "c2".into();
        tent.attributes.insert("manufacturer".into(), "Northwind".into());
        tent.reviews = vec![review(2.0)];

        let mut sock = product("p3", "Wool Sock", 9, 0);
        sock.is_active = false;

        let mut cap = product("p4", "Sun Cap", 25, 50);
        cap.is_active = false;
        cap.created_at = Utc.with_ymd_and_hms(2024, 1, 2, 8, 0, 0).unwrap();

        vec![shoe, tent, sock, cap]
    }

    fn ids(found: Vec<&Product>) -> Vec<&str> {
        found.into_iter().map(|p| p.id.as_str()).collect()
    }

    #[test]
    fn test_status_label_derivation() {
        let mut p = product("p", "x", 10, 0);
        assert_eq!(StatusLabel::of(&p), StatusLabel::OutOfStock);
        p.is_active = false;
        assert_eq!(StatusLabel::of(&p), StatusLabel::OutOfStock);

        p.stock = 5;
        p.min_stock = 10;
        p.is_active = true;
        assert_eq!(StatusLabel::of(&p), StatusLabel::LowStock);

        p.stock = 11;
        assert_eq!(StatusLabel::of(&p), StatusLabel::Active);
        p.is_active = false;
        assert_eq!(StatusLabel::of(&p), StatusLabel::Inactive);
    }

    #[test]
    fn test_brand_falls_back_to_manufacturer_then_placeholder() {
        let mut p = product("p", "x", 1, 1);
        assert_eq!(brand_of(&p), NO_BRAND);
        p.attributes.insert("brand".into(), AttributeValue::from(""));
        p.attributes.insert("manufacturer".into(), "Northwind".into());
        assert_eq!(brand_of(&p), "Northwind");
        p.attributes.insert("brand".into(), "Acme".into());
        assert_eq!(brand_of(&p), "Acme");
    }

    #[test]
    fn test_empty_search_is_noop() {
        let products = catalog();
        let all = filter_products(&products, &categories(), "", &FilterState::default());
        assert_eq!(all.len(), products.len());
        let blank = filter_products(&products, &categories(), "   ", &FilterState::default());
        assert_eq!(blank.len(), products.len());
    }

    #[test]
    fn test_search_matches_name_category_brand_and_sku() {
        let products = catalog();
        let cats = categories();
        let f = FilterState::default();
        assert_eq!(ids(filter_products(&products, &cats, "tent", &f)), vec!["p2"]);
        assert_eq!(ids(filter_products(&products, &cats, "OUTDOOR", &f)), vec!["p2"]);
        assert_eq!(ids(filter_products(&products, &cats, "acme", &f)), vec!["p1"]);
        assert_eq!(ids(filter_products(&products, &cats, "shoe-0", &f)), vec!["p1"]);
        assert_eq!(
            ids(filter_products(&products, &cats, "no brand", &f)),
            vec!["p3", "p4"]
        );
    }

    #[test]
    fn test_category_resolves_by_id_when_not_embedded() {
        let products = catalog();
        let filters = FilterState {
            categories: vec!["Outdoor Gear".into()],
            ..Default::default()
        };
        assert_eq!(ids(filter_products(&products, &categories(), "", &filters)), vec!["p2"]);
        // Without the category collection nothing can be resolved
        assert!(filter_products(&products, &[], "", &filters).is_empty());
    }

    #[test]
    fn test_status_brand_and_rating_filters() {
        let products = catalog();
        let cats = categories();

        let filters = FilterState {
            statuses: vec![StatusLabel::OutOfStock, StatusLabel::Inactive],
            ..Default::default()
        };
        assert_eq!(ids(filter_products(&products, &cats, "", &filters)), vec!["p3", "p4"]);

        let filters = FilterState {
            brands: vec!["Northwind".into(), NO_BRAND.into()],
            ..Default::default()
        };
        assert_eq!(
            ids(filter_products(&products, &cats, "", &filters)),
            vec!["p2", "p3", "p4"]
        );

        let filters = FilterState {
            min_rating: Some("4+".parse().unwrap()),
            ..Default::default()
        };
        assert_eq!(ids(filter_products(&products, &cats, "", &filters)), vec!["p1"]);
    }

    #[test]
    fn test_ranges_are_inclusive_and_inverted_range_is_empty() {
        let products = catalog();
        let cats = categories();

        let filters = FilterState {
            min_price: Some(Decimal::from(25)),
            max_price: Some(Decimal::from(120)),
            ..Default::default()
        };
        assert_eq!(ids(filter_products(&products, &cats, "", &filters)), vec!["p1", "p4"]);

        let filters = FilterState {
            min_stock: Some(3),
            max_stock: Some(40),
            ..Default::default()
        };
        assert_eq!(ids(filter_products(&products, &cats, "", &filters)), vec!["p1", "p2"]);

        let inverted = FilterState {
            min_price: Some(Decimal::from(200)),
            max_price: Some(Decimal::from(100)),
            ..Default::default()
        };
        assert!(filter_products(&products, &cats, "", &inverted).is_empty());
    }

    #[test]
    fn test_date_range_whole_days() {
        let products = catalog();
        let range = DateRange::days(
            NaiveDate::from_ymd_opt(2024, 1, 1),
            NaiveDate::from_ymd_opt(2024, 1, 2),
        );
        let filters = FilterState {
            created: range,
            ..Default::default()
        };
        assert_eq!(ids(filter_products(&products, &categories(), "", &filters)), vec!["p4"]);

        let end_of_day = Utc.with_ymd_and_hms(2024, 1, 2, 23, 59, 59).unwrap();
        assert!(range.contains(&end_of_day));
        assert!(!range.contains(&Utc.with_ymd_and_hms(2024, 1, 3, 0, 0, 0).unwrap()));
    }

    #[test]
    fn test_filter_is_subset_and_repeatable() {
        let products = catalog();
        let cats = categories();
        let filters = FilterState {
            statuses: vec![StatusLabel::Active, StatusLabel::LowStock],
            max_price: Some(Decimal::from(500)),
            ..Default::default()
        };
        let first = ids(filter_products(&products, &cats, "o", &filters));
        let second = ids(filter_products(&products, &cats, "o", &filters));
        assert_eq!(first, second);
        assert!(first.iter().all(|id| products.iter().any(|p| p.id == *id)));
        assert_eq!(filters.active_count(), 2);
    }

    #[test]
    fn test_facets_from_loaded_collections() {
        let facets = facets(&catalog(), &categories());
        assert_eq!(facets.categories[1].id, "c2");
        assert_eq!(facets.statuses.len(), 4);
        assert_eq!(facets.statuses[2].value, "Out of Stock");
        let brands: Vec<&str> = facets.brands.iter().map(|b| b.value.as_str()).collect();
        assert_eq!(brands, vec!["Acme", "Northwind"]);
        assert_eq!(
            facets.price,
            Bounds {
                min: Decimal::from(9),
                max: Decimal::from(300)
            }
        );
        assert_eq!(facets.stock, Bounds { min: 0, max: 50 });
        assert_eq!(facets.ratings[0].value, "4+");
    }

    #[test]
    fn test_facet_defaults_without_products() {
        let facets = facets(&[], &[]);
        assert_eq!(
            facets.price,
            Bounds {
                min: Decimal::ZERO,
                max: Decimal::from(1000)
            }
        );
        assert_eq!(facets.stock, Bounds { min: 0, max: 100 });
        assert!(facets.brands.is_empty());
    }

    #[test]
    fn test_parse_labels() {
        assert_eq!("low-stock".parse::<StatusLabel>().unwrap(), StatusLabel::LowStock);
        assert_eq!("Out of Stock".parse::<StatusLabel>().unwrap(), StatusLabel::OutOfStock);
        assert_eq!("3+".parse::<RatingThreshold>().unwrap(), RatingThreshold(3.0));
        assert!("abc+".parse::<RatingThreshold>().is_err());
    }
}
