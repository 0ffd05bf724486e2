//! Data models for the SICRO inventory wire formats.
//!
//! This module contains all the data structures exchanged with the API,
//! plus the client-side rules applied to them:
//!
//! - `GarmentKind`, `Size`: the fixed garment vocabulary
//! - `MovementItem`, `MovementRequest`, `MovementReceipt`: batch submission
//! - `MovementRecord`, `MovementOrder`: history rows and their grouping
//! - `BalanceEntry`, `KindBalance`: current stock
//! - `MonthlySummary`, `PlanningData`: dashboard endpoints
//!
//! Outbound types use the typed enums; inbound rows keep kind/size as raw
//! strings so legacy values still parse.

pub mod dashboard;
pub mod garment;
pub mod movement;
pub mod stock;

pub use dashboard::{ConsumptionPoint, MonthlySummary, PlanningData, RankedOutflow, SlowMover};
pub use garment::{display_size, GarmentKind, Size, DEFAULT_SIZE_LABEL};
pub use movement::{
    group_orders, validate_batch, CartError, MovementAction, MovementItem, MovementOrder,
    MovementReceipt, MovementRecord, MovementRequest, OrderLine,
};
pub use stock::{group_by_kind, BalanceEntry, KindBalance};
