//! Submitted orders: status lifecycle and admin list shaping.

use std::fmt;
use std::str::FromStr;

use jiff::Timestamp;
use jiff::tz::TimeZone;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cart::CartItem;
use crate::dates::ServiceDate;

/// Order lifecycle status.
///
/// `DaPagare` is the initial state; the other two are terminal. The client
/// never revalidates transitions out of a terminal state; the ordering API
/// is trusted to enforce them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderStatus {
    /// Awaiting payment at the counter.
    #[serde(rename = "da pagare")]
    DaPagare,
    /// Paid; terminal.
    #[serde(rename = "pagato")]
    Pagato,
    /// Cancelled; terminal.
    #[serde(rename = "annullato")]
    Annullato,
}

impl OrderStatus {
    /// All statuses, in lifecycle order.
    pub const ALL: [Self; 3] = [Self::DaPagare, Self::Pagato, Self::Annullato];

    /// Wire value as sent by the ordering API.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::DaPagare => "da pagare",
            Self::Pagato => "pagato",
            Self::Annullato => "annullato",
        }
    }

    /// Customer-facing Italian label.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::DaPagare => "Da Pagare",
            Self::Pagato => "Pagato",
            Self::Annullato => "Annullato",
        }
    }

    /// Whether no further transition is expected from this state.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Pagato | Self::Annullato)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A status string that names no known [`OrderStatus`].
#[derive(Debug, Clone, Error)]
#[error("unknown order status: {value}")]
pub struct StatusParseError {
    /// The rejected input.
    pub value: String,
}

impl FromStr for OrderStatus {
    type Err = StatusParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_lowercase().as_str() {
            "da pagare" | "da-pagare" | "da_pagare" => Ok(Self::DaPagare),
            "pagato" => Ok(Self::Pagato),
            "annullato" => Ok(Self::Annullato),
            _ => Err(StatusParseError {
                value: value.to_string(),
            }),
        }
    }
}

/// A submitted cart as recorded by the ordering API. Server-owned: the
/// client submits, reads and requests transitions, never fabricates one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Opaque identifier.
    pub id: String,
    /// Short human-facing order code, distinct from `id`.
    pub code: String,
    /// Customer-provided display name.
    #[serde(default)]
    pub name: String,
    /// Item snapshot; authoritative once submitted.
    pub items: Vec<CartItem>,
    /// Authoritative total.
    pub total: Decimal,
    /// Lifecycle status.
    pub status: OrderStatus,
    /// Creation instant.
    pub created_at: Timestamp,
    /// Last update instant.
    pub updated_at: Timestamp,
}

/// Total quantity across all lines of an order.
#[must_use]
pub fn item_count(order: &Order) -> u64 {
    order.items.iter().map(|item| item.quantity).sum()
}

/// The service day an instant falls on, under the given time zone.
#[must_use]
pub fn service_day(instant: Timestamp, tz: &TimeZone) -> ServiceDate {
    ServiceDate::from_civil(instant.to_zoned(tz.clone()).date())
}

/// Admin list filter. Selected days take precedence over the day range;
/// a missing range endpoint leaves that side unbounded.
#[derive(Debug, Clone, Default)]
pub struct OrderFilter {
    /// Only orders in this status; `None` shows every status.
    pub status: Option<OrderStatus>,
    /// Only orders created on one of these days.
    pub days: Vec<ServiceDate>,
    /// Inclusive lower bound on the creation day.
    pub from: Option<ServiceDate>,
    /// Inclusive upper bound on the creation day.
    pub to: Option<ServiceDate>,
}

impl OrderFilter {
    /// Whether `order` passes this filter under the given time zone.
    #[must_use]
    pub fn matches(&self, order: &Order, tz: &TimeZone) -> bool {
        if let Some(status) = self.status
            && order.status != status
        {
            return false;
        }

        let day = service_day(order.created_at, tz);

        if !self.days.is_empty() {
            return self.days.contains(&day);
        }

        if let Some(from) = &self.from
            && day < *from
        {
            return false;
        }

        if let Some(to) = &self.to
            && day > *to
        {
            return false;
        }

        true
    }
}

/// Sortable order list columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrderSortField {
    /// Creation instant.
    #[default]
    CreatedAt,
    /// Authoritative total.
    Total,
    /// Total quantity across lines.
    ItemCount,
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    /// Smallest first.
    Asc,
    /// Largest first.
    #[default]
    Desc,
}

/// Sorts the list in place by the given column and direction.
pub fn sort_orders(orders: &mut [Order], field: OrderSortField, direction: SortDirection) {
    orders.sort_by(|a, b| {
        let ordering = match field {
            OrderSortField::CreatedAt => a.created_at.cmp(&b.created_at),
            OrderSortField::Total => a.total.cmp(&b.total),
            OrderSortField::ItemCount => item_count(a).cmp(&item_count(b)),
        };

        match direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });
}

/// Distinct service days that have at least one order, most recent first.
#[must_use]
pub fn days_with_orders(orders: &[Order], tz: &TimeZone) -> Vec<ServiceDate> {
    let mut days: Vec<ServiceDate> = orders
        .iter()
        .map(|order| service_day(order.created_at, tz))
        .collect();

    days.sort();
    days.dedup();
    days.reverse();

    days
}
