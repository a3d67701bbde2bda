use std::cmp::Reverse;

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::models::asset::Asset;
use crate::models::order::{Order, OrderStatus, DISPLAY_TIME_FORMAT};

/// Filters of the in-progress order list.
#[derive(Debug, Clone, Default)]
pub struct OrderFilter {
    pub search: Option<String>,
    pub operation_type: Option<String>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletedSummary {
    pub trips: usize,
    pub total_weight: u32,
}

/// Parses an order's display date, with or without the time part.
pub fn parse_display_date(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    NaiveDateTime::parse_from_str(raw, DISPLAY_TIME_FORMAT)
        .ok()
        .or_else(|| {
            let date = raw.split_whitespace().next()?;
            NaiveDate::parse_from_str(date, "%d/%m/%Y")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}

fn matches_search(order: &Order, search: Option<&str>) -> bool {
    match search.map(str::trim) {
        None | Some("") => true,
        Some(needle) => order.id.contains(needle) || order.container_code.contains(needle),
    }
}

fn within_dates(order: &Order, from: Option<NaiveDate>, to: Option<NaiveDate>) -> bool {
    if from.is_none() && to.is_none() {
        return true;
    }

    // Orders with an unreadable pickup date are never hidden by the range.
    let Some(pickup) = parse_display_date(&order.pickup_date).map(|at| at.date()) else {
        return true;
    };

    from.is_none_or(|from| pickup >= from) && to.is_none_or(|to| pickup <= to)
}

/// Newest pickup first; ties and unreadable dates fall back to the id.
fn sort_recent_first(orders: &mut [Order]) {
    orders.sort_by_key(|order| (Reverse(parse_display_date(&order.pickup_date)), order.id.clone()));
}

pub fn active_orders(orders: &[Order], filter: &OrderFilter) -> Vec<Order> {
    let mut matching: Vec<Order> = orders
        .iter()
        .filter(|order| !order.status.is_terminal())
        .filter(|order| matches_search(order, filter.search.as_deref()))
        .filter(|order| match filter.operation_type.as_deref() {
            None | Some("") => true,
            Some(operation) => order.operation_type == operation,
        })
        .filter(|order| within_dates(order, filter.from, filter.to))
        .cloned()
        .collect();

    sort_recent_first(&mut matching);
    matching
}

pub fn completed_orders(orders: &[Order], search: Option<&str>) -> Vec<Order> {
    let mut matching: Vec<Order> = orders
        .iter()
        .filter(|order| order.status == OrderStatus::Completed)
        .filter(|order| matches_search(order, search))
        .cloned()
        .collect();

    sort_recent_first(&mut matching);
    matching
}

pub fn history_orders(orders: &[Order], search: Option<&str>) -> Vec<Order> {
    let mut matching: Vec<Order> = orders
        .iter()
        .filter(|order| order.status.is_terminal())
        .filter(|order| matches_search(order, search))
        .cloned()
        .collect();

    sort_recent_first(&mut matching);
    matching
}

pub fn completed_summary(orders: &[Order]) -> CompletedSummary {
    let completed = orders
        .iter()
        .filter(|order| order.status == OrderStatus::Completed);

    let (trips, total_weight) = completed.fold((0, 0), |(trips, weight), order| {
        (trips + 1, weight + order.weight)
    });

    CompletedSummary {
        trips,
        total_weight,
    }
}

/// Case-insensitive match on plate number or trailer code.
pub fn search_assets<A: Asset>(assets: &[A], search: Option<&str>) -> Vec<A> {
    let needle = search.unwrap_or_default().trim().to_lowercase();

    assets
        .iter()
        .filter(|asset| asset.code().to_lowercase().contains(&needle))
        .cloned()
        .collect()
}
