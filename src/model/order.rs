//! Order value type and its attribute scalars.

use crate::model::{ClientId, ValidationError};
use chrono::{Local, NaiveDateTime, Timelike};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;
use uuid::Uuid;

/// Textual format shared by deadlines and order dates, e.g. `01-01-2024 23:59`.
pub const DATE_TIME_FORMAT: &str = "%d-%m-%Y %H:%M";

static DATE_TIME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9]{2}-[0-9]{2}-[0-9]{4} [0-9]{2}:[0-9]{2}$").expect("valid date-time regex")
});
static AMOUNT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([0-9]+)(?:\.([0-9]{1,2}))?$").expect("valid amount regex"));

/// Parses `DD-MM-YYYY HH:MM`, rejecting dates and times that do not exist.
fn parse_date_time(value: &str) -> Option<NaiveDateTime> {
    if !DATE_TIME_RE.is_match(value) {
        return None;
    }
    NaiveDateTime::parse_from_str(value, DATE_TIME_FORMAT).ok()
}

/// Type-safe identifier for orders. Assigned once at creation, never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(Uuid);

impl OrderId {
    /// Generates a fresh random identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for OrderId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for OrderId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl FromStr for OrderId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|_| ValidationError::new("order id", "Order IDs should be UUIDs"))
    }
}

impl Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The point in time by which an order must be fulfilled.
///
/// Construction checks only the format. Whether a deadline must lie in the
/// future is a workflow policy, see [`Deadline::ensure_after`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Deadline(NaiveDateTime);

impl Deadline {
    pub const CONSTRAINTS: &'static str =
        "A deadline should be in the format of DD-MM-YYYY HH:MM, e.g. 01-01-2024 23:59";
    pub const FUTURE_CONSTRAINTS: &'static str = "The deadline provided must be set for a time in \
         the future and must not be before the current time.";

    pub fn new(value: &str) -> Result<Self, ValidationError> {
        parse_date_time(value)
            .map(Self)
            .ok_or(ValidationError::new("deadline", Self::CONSTRAINTS))
    }

    pub fn is_valid(value: &str) -> bool {
        parse_date_time(value).is_some()
    }

    pub fn value(&self) -> NaiveDateTime {
        self.0
    }

    pub fn is_after(&self, now: NaiveDateTime) -> bool {
        self.0 > now
    }

    /// Policy check applied by the order-creation workflow.
    pub fn ensure_after(&self, now: NaiveDateTime) -> Result<(), ValidationError> {
        if self.is_after(now) {
            Ok(())
        } else {
            Err(ValidationError::new("deadline", Self::FUTURE_CONSTRAINTS))
        }
    }

    /// [`ensure_after`](Self::ensure_after) against the local wall clock.
    pub fn ensure_in_future(&self) -> Result<(), ValidationError> {
        self.ensure_after(Local::now().naive_local())
    }
}

impl From<NaiveDateTime> for Deadline {
    fn from(value: NaiveDateTime) -> Self {
        Self(value)
    }
}

impl Display for Deadline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.format(DATE_TIME_FORMAT))
    }
}

impl TryFrom<String> for Deadline {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<Deadline> for String {
    fn from(value: Deadline) -> Self {
        value.to_string()
    }
}

/// When the order was placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct OrderDate(NaiveDateTime);

impl OrderDate {
    pub const CONSTRAINTS: &'static str =
        "An order date should be in the format of DD-MM-YYYY HH:MM, e.g. 01-01-2024 23:59";

    pub fn new(value: &str) -> Result<Self, ValidationError> {
        parse_date_time(value)
            .map(Self)
            .ok_or(ValidationError::new("order date", Self::CONSTRAINTS))
    }

    /// The current local time, truncated to the minute like the textual form.
    pub fn now() -> Self {
        let now = Local::now().naive_local();
        Self(
            now.with_second(0)
                .and_then(|t| t.with_nanosecond(0))
                .unwrap_or(now),
        )
    }

    pub fn value(&self) -> NaiveDateTime {
        self.0
    }
}

impl From<NaiveDateTime> for OrderDate {
    fn from(value: NaiveDateTime) -> Self {
        Self(value)
    }
}

impl Display for OrderDate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.format(DATE_TIME_FORMAT))
    }
}

impl TryFrom<String> for OrderDate {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<OrderDate> for String {
    fn from(value: OrderDate) -> Self {
        value.to_string()
    }
}

/// Monetary amount of an order, kept in cents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Amount(u64);

impl Amount {
    pub const CONSTRAINTS: &'static str =
        "Amounts should be non-negative numbers with at most 2 decimal places, e.g. 50 or 12.50";

    pub fn new(value: &str) -> Result<Self, ValidationError> {
        Self::parse_cents(value)
            .map(Self)
            .ok_or(ValidationError::new("amount", Self::CONSTRAINTS))
    }

    pub fn from_cents(cents: u64) -> Self {
        Self(cents)
    }

    pub fn is_valid(value: &str) -> bool {
        Self::parse_cents(value).is_some()
    }

    pub fn cents(&self) -> u64 {
        self.0
    }

    fn parse_cents(value: &str) -> Option<u64> {
        let caps = AMOUNT_RE.captures(value)?;
        let whole: u64 = caps.get(1)?.as_str().parse().ok()?;
        let fraction = match caps.get(2) {
            Some(digits) if digits.as_str().len() == 1 => digits.as_str().parse::<u64>().ok()? * 10,
            Some(digits) => digits.as_str().parse::<u64>().ok()?,
            None => 0,
        };
        whole.checked_mul(100)?.checked_add(fraction)
    }
}

impl Display for Amount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

impl TryFrom<String> for Amount {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<Amount> for String {
    fn from(value: Amount) -> Self {
        value.to_string()
    }
}

/// Free-text note attached to an order. May be empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Remark(String);

impl Remark {
    pub const CONSTRAINTS: &'static str = "Remarks should not contain control characters";

    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        if !Self::is_valid(&value) {
            return Err(ValidationError::new("remark", Self::CONSTRAINTS));
        }
        Ok(Self(value))
    }

    pub fn is_valid(value: &str) -> bool {
        !value.chars().any(char::is_control)
    }
}

text_value!(Remark);

/// Lifecycle state of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    #[default]
    Pending,
    Completed,
    Canceled,
}

impl Status {
    pub const CONSTRAINTS: &'static str = "Status should be one of PENDING, COMPLETED or CANCELED";

    pub fn is_valid(value: &str) -> bool {
        value.parse::<Self>().is_ok()
    }
}

impl FromStr for Status {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "PENDING" => Ok(Self::Pending),
            "COMPLETED" => Ok(Self::Completed),
            "CANCELED" => Ok(Self::Canceled),
            _ => Err(ValidationError::new("status", Self::CONSTRAINTS)),
        }
    }
}

impl Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            Self::Pending => "PENDING",
            Self::Completed => "COMPLETED",
            Self::Canceled => "CANCELED",
        };
        f.write_str(text)
    }
}

/// A customer order.
///
/// `owner` is a lookup key for the client whose order set holds this order,
/// not an ownership edge. Equality compares every attribute, the identifier
/// and the owner included.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Order {
    id: OrderId,
    order_date: OrderDate,
    deadline: Deadline,
    amount: Amount,
    remark: Remark,
    status: Status,
    #[serde(default)]
    owner: Option<ClientId>,
}

impl Order {
    /// Creates an unowned order with a freshly generated identifier.
    pub fn new(
        order_date: OrderDate,
        deadline: Deadline,
        amount: Amount,
        remark: Remark,
        status: Status,
    ) -> Self {
        Self::with_id(OrderId::new(), order_date, deadline, amount, remark, status)
    }

    /// Creates an unowned order with a caller-provided identifier.
    ///
    /// Used by restore paths where the identity already exists.
    pub fn with_id(
        id: OrderId,
        order_date: OrderDate,
        deadline: Deadline,
        amount: Amount,
        remark: Remark,
        status: Status,
    ) -> Self {
        Self {
            id,
            order_date,
            deadline,
            amount,
            remark,
            status,
            owner: None,
        }
    }

    pub fn id(&self) -> OrderId {
        self.id
    }

    pub fn order_date(&self) -> OrderDate {
        self.order_date
    }

    pub fn deadline(&self) -> Deadline {
        self.deadline
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }

    pub fn remark(&self) -> &Remark {
        &self.remark
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn owner(&self) -> Option<ClientId> {
        self.owner
    }

    /// Identity check: both values describe the same order.
    pub fn is_same_order(&self, other: &Order) -> bool {
        self.id == other.id
    }

    pub fn with_deadline(&self, deadline: Deadline) -> Self {
        Self { deadline, ..self.clone() }
    }

    pub fn with_amount(&self, amount: Amount) -> Self {
        Self { amount, ..self.clone() }
    }

    pub fn with_remark(&self, remark: Remark) -> Self {
        Self { remark, ..self.clone() }
    }

    pub fn with_status(&self, status: Status) -> Self {
        Self { status, ..self.clone() }
    }

    pub(crate) fn owned_by(mut self, owner: ClientId) -> Self {
        self.owner = Some(owner);
        self
    }
}

impl Display for Order {
    // Owner is a lookup key and is not shown.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Order {} (placed {}, due {}, amount {}, {}): {}",
            self.id, self.order_date, self.deadline, self.amount, self.status, self.remark
        )
    }
}
