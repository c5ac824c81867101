//! Search, category filter and sort shared by every catalog listing.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use rocket::{FromForm, FromFormField};

use crate::models::{event::Event, place::Place};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, FromFormField)]
pub enum SortKey {
    #[default]
    #[field(value = "newest")]
    Newest,
    #[field(value = "oldest")]
    Oldest,
    #[field(value = "price_asc")]
    PriceAsc,
    #[field(value = "price_desc")]
    PriceDesc,
    #[field(value = "rating")]
    Rating,
    #[field(value = "name")]
    Name,
}

#[derive(Debug, Clone, Default, FromForm)]
pub struct ListQuery {
    pub q: Option<String>,
    pub category: Option<String>,
    pub sort: Option<SortKey>,
}

pub trait Listable {
    fn title(&self) -> &str;
    fn category(&self) -> &str;
    fn location(&self) -> &str;
    fn price(&self) -> Option<i64>;
    fn rating(&self) -> Option<f64>;
    fn created_at(&self) -> DateTime<Utc>;
}

impl Listable for Place {
    fn title(&self) -> &str {
        &self.name
    }
    fn category(&self) -> &str {
        &self.category
    }
    fn location(&self) -> &str {
        &self.location
    }
    fn price(&self) -> Option<i64> {
        Some(self.price)
    }
    fn rating(&self) -> Option<f64> {
        Some(self.rating)
    }
    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl Listable for Event {
    fn title(&self) -> &str {
        &self.title
    }
    fn category(&self) -> &str {
        &self.category
    }
    fn location(&self) -> &str {
        &self.location_name
    }
    fn price(&self) -> Option<i64> {
        self.min_price()
    }
    fn rating(&self) -> Option<f64> {
        None
    }
    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_lowercase)
}

fn matches_search<T: Listable>(item: &T, needle: &str) -> bool {
    [item.title(), item.location(), item.category()]
        .iter()
        .any(|field| field.to_lowercase().contains(needle))
}

/// Missing values go last regardless of direction.
fn missing_last<V, F: Fn(&V, &V) -> Ordering>(a: Option<V>, b: Option<V>, cmp: F) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => cmp(&a, &b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

pub fn apply<T: Listable>(items: Vec<T>, query: &ListQuery) -> Vec<T> {
    let needle = non_blank(&query.q);
    let category = non_blank(&query.category);

    let mut items: Vec<T> = items
        .into_iter()
        .filter(|item| needle.as_deref().map_or(true, |n| matches_search(item, n)))
        .filter(|item| {
            category
                .as_deref()
                .map_or(true, |c| item.category().to_lowercase() == c)
        })
        .collect();

    items.sort_by(|a, b| b.created_at().cmp(&a.created_at()));

    match query.sort.unwrap_or_default() {
        SortKey::Newest => {}
        SortKey::Oldest => items.reverse(),
        SortKey::PriceAsc => items.sort_by(|a, b| missing_last(a.price(), b.price(), |x, y| x.cmp(y))),
        SortKey::PriceDesc => items.sort_by(|a, b| missing_last(a.price(), b.price(), |x, y| y.cmp(x))),
        SortKey::Rating => items.sort_by(|a, b| missing_last(a.rating(), b.rating(), |x, y| y.total_cmp(x))),
        SortKey::Name => items.sort_by_key(|item| item.title().to_lowercase()),
    }

    items
}
