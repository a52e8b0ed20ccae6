//! # Domain Types
//!
//! Core domain types shared by the store, the API consumer and the UI.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Supplier     │   │      Order      │   │      Quote      │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │   │  id             │   │  line_items     │       │
//! │  │  category_id    │◄──│  supplier_id    │──►│  subtotal_cents │       │
//! │  │  rating         │   │  status         │   │  tax_rate_bps   │       │
//! │  │  verified       │   │  scheduled_at   │   │  total_cents    │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                 │                                       │
//! │  ┌─────────────────┐   ┌────────▼────────┐   ┌─────────────────┐       │
//! │  │  Conversation   │   │     Payment     │   │   OrderStatus   │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  supplier_id    │   │  order_id       │   │  Pending        │       │
//! │  │  unread_count   │   │  amount_cents   │   │  Quoted         │       │
//! │  │  Message[]      │   │  card_last4     │   │  Confirmed ...  │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Wire Format
//! Every type here is exchanged with the backend as camelCase JSON. Ids are
//! opaque strings issued by the server.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::card::CardBrand;
use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::theme::ThemePreference;
use crate::validation::{
    validate_booking_date, validate_email, validate_name, validate_password, validate_phone,
    validate_required,
};

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate represented in basis points (bps).
///
/// 1 basis point = 0.01%, so 825 bps = 8.25%.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaxRate(u32);

impl TaxRate {
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    #[inline]
    pub const fn zero() -> Self {
        TaxRate(0)
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        TaxRate::zero()
    }
}

// =============================================================================
// User & Session
// =============================================================================

/// The signed-in customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

/// A signed-in user and the bearer token that proves it.
///
/// Token absence means unauthenticated, so there is no "empty" session.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub user: User,
    pub token: String,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("user", &self.user)
            .field("token", &"<redacted>")
            .finish()
    }
}

// =============================================================================
// Catalog
// =============================================================================

/// A service category shown on the home screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub supplier_count: u32,
}

/// A business offering services in a category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Supplier {
    pub id: String,
    pub name: String,
    pub category_id: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
    /// Average review score, 0.0-5.0.
    #[serde(default)]
    pub rating: f32,
    #[serde(default)]
    pub review_count: u32,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub verified: bool,
}

/// A customer review of a supplier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: String,
    pub author_name: String,
    /// 1-5 stars.
    pub rating: u8,
    #[serde(default)]
    pub comment: Option<String>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Order Status
// =============================================================================

/// Lifecycle of a booking.
///
/// ```text
/// Pending ──► Quoted ──► Confirmed ──► InProgress ──► Completed
///    │          │            │
///    └──────────┴────────────┴──► Cancelled
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Waiting for the supplier to respond.
    Pending,
    /// Supplier sent a quote; customer must accept or reject it.
    Quoted,
    /// Quote accepted, work scheduled.
    Confirmed,
    InProgress,
    Completed,
    Cancelled,
}

impl OrderStatus {
    /// Whether the customer may still cancel.
    pub const fn can_cancel(self) -> bool {
        matches!(
            self,
            OrderStatus::Pending | OrderStatus::Quoted | OrderStatus::Confirmed
        )
    }

    pub const fn awaits_quote_decision(self) -> bool {
        matches!(self, OrderStatus::Quoted)
    }

    pub const fn is_terminal(self) -> bool {
        matches!(self, OrderStatus::Completed | OrderStatus::Cancelled)
    }

    /// Wire name, also used in query strings.
    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Quoted => "quoted",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::InProgress => "in_progress",
            OrderStatus::Completed => "completed",
            OrderStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "pending" => Ok(OrderStatus::Pending),
            "quoted" => Ok(OrderStatus::Quoted),
            "confirmed" => Ok(OrderStatus::Confirmed),
            "in_progress" => Ok(OrderStatus::InProgress),
            "completed" => Ok(OrderStatus::Completed),
            "cancelled" | "canceled" => Ok(OrderStatus::Cancelled),
            other => Err(ValidationError::InvalidFormat {
                field: "status".to_string(),
                reason: format!("unknown order status '{other}'"),
            }),
        }
    }
}

// =============================================================================
// Quote
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum QuoteStatus {
    #[default]
    Pending,
    Accepted,
    Rejected,
}

/// One priced line on a supplier's quote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct QuoteLineItem {
    pub description: String,
    pub quantity: i64,
    pub unit_price_cents: i64,
}

impl QuoteLineItem {
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    /// Clamped at the i64 bounds; see [`QuoteLineItem::checked_line_total`].
    #[inline]
    pub fn line_total(&self) -> Money {
        self.unit_price().multiply_quantity(self.quantity)
    }

    #[inline]
    pub fn checked_line_total(&self) -> Option<Money> {
        self.unit_price().checked_mul(self.quantity)
    }
}

/// A supplier's priced offer for an order.
///
/// The server sends its own totals; [`Quote::is_consistent`] checks them
/// against the line items before the customer is asked to accept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub id: String,
    pub line_items: Vec<QuoteLineItem>,
    pub subtotal_cents: i64,
    pub tax_cents: i64,
    pub total_cents: i64,
    #[serde(default)]
    pub tax_rate_bps: u32,
    #[serde(default)]
    pub status: QuoteStatus,
    #[serde(default)]
    #[ts(as = "Option<String>")]
    pub valid_until: Option<DateTime<Utc>>,
}

impl Quote {
    pub fn tax_rate(&self) -> TaxRate {
        TaxRate::from_bps(self.tax_rate_bps)
    }

    /// Sum of the line totals, clamped at the i64 bounds.
    pub fn computed_subtotal(&self) -> Money {
        self.line_items
            .iter()
            .map(QuoteLineItem::line_total)
            .fold(Money::zero(), |acc, line| acc.saturating_add(line))
    }

    pub fn computed_tax(&self) -> Money {
        self.computed_subtotal().calculate_tax(self.tax_rate())
    }

    pub fn computed_total(&self) -> Money {
        self.computed_subtotal().saturating_add(self.computed_tax())
    }

    /// `(subtotal, tax, total)` from the line items, `None` if any step
    /// overflows.
    fn checked_totals(&self) -> Option<(Money, Money, Money)> {
        let subtotal = self
            .line_items
            .iter()
            .try_fold(Money::zero(), |acc, item| acc.checked_add(item.checked_line_total()?))?;
        let tax = subtotal.calculate_tax(self.tax_rate());
        let total = subtotal.checked_add(tax)?;
        Some((subtotal, tax, total))
    }

    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }

    /// Server totals match what the line items add up to.
    /// A quote whose line items overflow is never consistent.
    pub fn is_consistent(&self) -> bool {
        match self.checked_totals() {
            Some((subtotal, tax, total)) => {
                self.subtotal_cents == subtotal.cents()
                    && self.tax_cents == tax.cents()
                    && self.total_cents == total.cents()
            }
            None => false,
        }
    }

    /// [`Quote::is_consistent`] as a `Result`, for flows that must stop.
    pub fn ensure_consistent(&self) -> CoreResult<()> {
        if self.is_consistent() {
            Ok(())
        } else {
            Err(CoreError::InconsistentQuote {
                quote_id: self.id.clone(),
                expected: self.computed_total().cents(),
                actual: self.total_cents,
            })
        }
    }

    /// Whether the quote has lapsed at `now`. No expiry means never.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.valid_until.is_some_and(|until| until < now)
    }
}

// =============================================================================
// Order
// =============================================================================

/// A booking the customer made with a supplier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: String,
    pub supplier_id: String,
    pub supplier_name: String,
    pub category_id: String,
    pub status: OrderStatus,
    pub description: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    #[ts(as = "Option<String>")]
    pub scheduled_at: Option<DateTime<Utc>>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub quote: Option<Quote>,
}

impl Order {
    /// Confirmed with an accepted quote.
    pub fn is_payable(&self) -> bool {
        self.status == OrderStatus::Confirmed
            && self
                .quote
                .as_ref()
                .is_some_and(|q| q.status == QuoteStatus::Accepted)
    }

    pub fn ensure_can_cancel(&self) -> CoreResult<()> {
        self.ensure(self.status.can_cancel(), "cancel")
    }

    pub fn ensure_awaits_quote_decision(&self) -> CoreResult<()> {
        self.ensure(
            self.status.awaits_quote_decision() && self.quote.is_some(),
            "decide on a quote",
        )
    }

    pub fn ensure_payable(&self) -> CoreResult<()> {
        self.ensure(self.is_payable(), "be paid")
    }

    /// Amount due: the quote total, if quoted.
    pub fn amount_due(&self) -> Option<Money> {
        self.quote.as_ref().map(Quote::total)
    }

    fn ensure(&self, allowed: bool, action: &str) -> CoreResult<()> {
        if allowed {
            Ok(())
        } else {
            Err(CoreError::InvalidOrderStatus {
                order_id: self.id.clone(),
                status: self.status.to_string(),
                action: action.to_string(),
            })
        }
    }
}

// =============================================================================
// Payment
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    Succeeded,
    Failed,
    Refunded,
}

/// A card payment for an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: String,
    pub order_id: String,
    pub amount_cents: i64,
    pub status: PaymentStatus,
    pub card_brand: CardBrand,
    pub card_last4: String,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl Payment {
    #[inline]
    pub fn amount(&self) -> Money {
        Money::from_cents(self.amount_cents)
    }
}

// =============================================================================
// Chat
// =============================================================================

/// A chat thread with one supplier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    pub id: String,
    pub supplier_id: String,
    pub supplier_name: String,
    #[serde(default)]
    pub supplier_avatar: Option<String>,
    #[serde(default)]
    pub last_message: Option<String>,
    #[serde(default)]
    #[ts(as = "Option<String>")]
    pub last_message_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub unread_count: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum MessageSender {
    User,
    Supplier,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    pub conversation_id: String,
    pub sender: MessageSender,
    pub body: String,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub read: bool,
    /// Idempotency key the client attached when sending.
    #[serde(default)]
    pub client_message_id: Option<String>,
}

// =============================================================================
// Settings
// =============================================================================

/// Server-side user settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct UserSettings {
    /// Absent when the account has never stored a preference.
    #[serde(default)]
    pub theme: Option<ThemePreference>,
    #[serde(default = "default_true")]
    pub notifications_enabled: bool,
    #[serde(default)]
    pub language: Option<String>,
}

impl Default for UserSettings {
    fn default() -> Self {
        UserSettings {
            theme: None,
            notifications_enabled: true,
            language: None,
        }
    }
}

fn default_true() -> bool {
    true
}

/// Partial settings change. Unset fields are left alone by the server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SettingsUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme: Option<ThemePreference>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notifications_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

impl SettingsUpdate {
    pub fn theme(theme: ThemePreference) -> Self {
        SettingsUpdate {
            theme: Some(theme),
            ..Default::default()
        }
    }
}

// =============================================================================
// Requests
// =============================================================================

#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_email(&self.email)?;
        validate_required("password", &self.password)?;
        Ok(())
    }
}

impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl RegisterRequest {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_name(&self.name)?;
        validate_email(&self.email)?;
        validate_password(&self.password)?;
        if let Some(phone) = &self.phone {
            validate_phone(phone)?;
        }
        Ok(())
    }
}

impl fmt::Debug for RegisterRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterRequest")
            .field("name", &self.name)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

/// Profile edits; unset fields are unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

impl ProfileUpdate {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(name) = &self.name {
            validate_name(name)?;
        }
        if let Some(phone) = &self.phone {
            validate_phone(phone)?;
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.phone.is_none() && self.avatar.is_none()
    }
}

/// A new booking request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct NewOrder {
    pub supplier_id: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(as = "Option<String>")]
    pub scheduled_at: Option<DateTime<Utc>>,
}

impl NewOrder {
    /// Checks the booking form; `today` bounds the scheduled date.
    pub fn validate(&self, today: NaiveDate) -> Result<(), ValidationError> {
        validate_required("supplier", &self.supplier_id)?;
        validate_required("description", &self.description)?;
        if let Some(at) = self.scheduled_at {
            validate_booking_date(at.date_naive(), today)?;
        }
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
