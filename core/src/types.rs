//! Core data types for Insights imports

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, SecondsFormat, Timelike, Utc};
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};

/// Identifier of a custom source on the Insights server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SourceId(pub u64);

impl SourceId {
    /// Create a new SourceId
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the inner numeric value
    pub fn get(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for SourceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for SourceId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// Represents a single entity in an import
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entity {
    /// Identifier, unique within an import
    pub id: String,
    /// Display name
    pub name: String,
    /// Entity type (e.g., "user", "group")
    #[serde(rename = "type")]
    pub entity_type: String,
    /// Attribute values, in the order they were assigned
    #[serde(default)]
    pub attribute_assignments: Vec<AttributeAssignment>,
}

impl Entity {
    /// Create a new entity without attributes
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        entity_type: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            entity_type: entity_type.into(),
            attribute_assignments: Vec::new(),
        }
    }

    /// Append an attribute assignment
    pub fn with_attribute(mut self, attribute_type_id: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attribute_assignments
            .push(AttributeAssignment::new(attribute_type_id, value));
        self
    }
}

/// Represents a directed relationship between two entities in an import
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Relationship {
    pub from_entity_id: String,
    pub from_entity_type: String,
    pub to_entity_id: String,
    pub to_entity_type: String,
    /// Attribute values, in the order they were assigned
    #[serde(default)]
    pub attribute_assignments: Vec<AttributeAssignment>,
}

impl Relationship {
    /// Create a new relationship without attributes.
    ///
    /// The referenced entities do not have to be part of the same import.
    pub fn new(
        from_entity_id: impl Into<String>,
        from_entity_type: impl Into<String>,
        to_entity_id: impl Into<String>,
        to_entity_type: impl Into<String>,
    ) -> Self {
        Self {
            from_entity_id: from_entity_id.into(),
            from_entity_type: from_entity_type.into(),
            to_entity_id: to_entity_id.into(),
            to_entity_type: to_entity_type.into(),
            attribute_assignments: Vec::new(),
        }
    }

    /// Append an attribute assignment
    pub fn with_attribute(mut self, attribute_type_id: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attribute_assignments
            .push(AttributeAssignment::new(attribute_type_id, value));
        self
    }
}

/// Assignment of a value for a specific attribute type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeAssignment {
    pub attribute_type_id: String,
    pub value: Value,
}

impl AttributeAssignment {
    pub fn new(attribute_type_id: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            attribute_type_id: attribute_type_id.into(),
            value: value.into(),
        }
    }
}

/// Lists all supported attribute value types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ValueType {
    Boolean,
    Date,
    DateTime,
    Number,
    String,
    Time,
}

impl ValueType {
    /// Wire tag of this value type
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueType::Boolean => "boolean",
            ValueType::Date => "date",
            ValueType::DateTime => "dateTime",
            ValueType::Number => "number",
            ValueType::String => "string",
            ValueType::Time => "time",
        }
    }
}

impl std::fmt::Display for ValueType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Attribute assignment value
///
/// Encoded as `{"type": <tag>, "value": <payload>}`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "camelCase")]
pub enum Value {
    Boolean(bool),
    Date(Date),
    DateTime(DateTime),
    Number(f64),
    String(String),
    Time(Time),
}

impl Value {
    /// The type tag of this value
    pub fn value_type(&self) -> ValueType {
        match self {
            Value::Boolean(_) => ValueType::Boolean,
            Value::Date(_) => ValueType::Date,
            Value::DateTime(_) => ValueType::DateTime,
            Value::Number(_) => ValueType::Number,
            Value::String(_) => ValueType::String,
            Value::Time(_) => ValueType::Time,
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Value", 2)?;
        state.serialize_field("type", self.value_type().as_str())?;
        match self {
            Value::Boolean(value) => state.serialize_field("value", value)?,
            Value::Date(value) => state.serialize_field("value", value)?,
            Value::DateTime(value) => state.serialize_field("value", value)?,
            Value::Number(value) => state.serialize_field("value", &JsonNumber(*value))?,
            Value::String(value) => state.serialize_field("value", value)?,
            Value::Time(value) => state.serialize_field("value", value)?,
        }
        state.end()
    }
}

/// Largest integer an f64 represents exactly (2^53)
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_992.0;

/// Integral values from here on are written in exponent form
const EXPONENT_THRESHOLD: f64 = 1e21;

/// Number encoding that writes integral values without a fractional part.
///
/// Integers below 1e21 are written in full, using the shortest digits that
/// identify the value followed by zeros (`1e20` becomes `100000000000000000000`).
/// Other values use serde_json's float formatting, so exponents read `1e21`
/// rather than `1e+21` and small fractions may read `1e-6` rather than `0.000001`.
struct JsonNumber(f64);

impl Serialize for JsonNumber {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let n = self.0;
        if !n.is_finite() || n.fract() != 0.0 || n.abs() >= EXPONENT_THRESHOLD {
            // serde_json writes non-finite values as null
            return serializer.serialize_f64(n);
        }
        if n.abs() <= MAX_SAFE_INTEGER {
            return serializer.serialize_i64(n as i64);
        }
        serializer.serialize_i128(shortest_integer(n))
    }
}

/// Integer spelled by the shortest decimal digits of a large integral `n`
fn shortest_integer(n: f64) -> i128 {
    let formatted = format!("{:e}", n);
    let Some((mantissa, exponent)) = formatted.split_once('e') else {
        return n as i128;
    };
    let Ok(exponent) = exponent.parse::<u32>() else {
        return n as i128;
    };

    let negative = mantissa.starts_with('-');
    let digits: String = mantissa.chars().filter(char::is_ascii_digit).collect();
    let fraction_digits = digits.len() as u32 - 1;
    let (Ok(digits), Some(zeros)) = (digits.parse::<i128>(), exponent.checked_sub(fraction_digits)) else {
        return n as i128;
    };

    let value = digits * 10i128.pow(zeros);
    if negative {
        -value
    } else {
        value
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Number(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Number(f64::from(value))
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<Date> for Value {
    fn from(value: Date) -> Self {
        Value::Date(value)
    }
}

impl From<DateTime> for Value {
    fn from(value: DateTime) -> Self {
        Value::DateTime(value)
    }
}

impl From<Time> for Value {
    fn from(value: Time) -> Self {
        Value::Time(value)
    }
}

/// Simple calendar date (UTC)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Date {
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

impl Date {
    pub fn new(year: i32, month: u32, day: u32) -> Self {
        Self { year, month, day }
    }
}

impl From<NaiveDate> for Date {
    fn from(date: NaiveDate) -> Self {
        Self::new(date.year(), date.month(), date.day())
    }
}

/// Timestamp without offset, interpreted as UTC
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateTime {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
}

impl DateTime {
    pub fn new(year: i32, month: u32, day: u32, hour: u32, minute: u32, second: u32) -> Self {
        Self {
            year,
            month,
            day,
            hour,
            minute,
            second,
        }
    }
}

impl From<NaiveDateTime> for DateTime {
    fn from(timestamp: NaiveDateTime) -> Self {
        Self::new(
            timestamp.year(),
            timestamp.month(),
            timestamp.day(),
            timestamp.hour(),
            timestamp.minute(),
            timestamp.second(),
        )
    }
}

impl From<chrono::DateTime<Utc>> for DateTime {
    fn from(timestamp: chrono::DateTime<Utc>) -> Self {
        timestamp.naive_utc().into()
    }
}

/// Time of day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Time {
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
}

impl Time {
    pub fn new(hour: u32, minute: u32, second: u32) -> Self {
        Self {
            hour,
            minute,
            second,
        }
    }
}

impl From<NaiveTime> for Time {
    fn from(time: NaiveTime) -> Self {
        Self::new(time.hour(), time.minute(), time.second())
    }
}

/// Incremental change, processed strictly in order by the server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum StreamItem {
    Entity { entity: Entity },
    Relationship { relationship: Relationship },
}

impl From<Entity> for StreamItem {
    fn from(entity: Entity) -> Self {
        StreamItem::Entity { entity }
    }
}

impl From<Relationship> for StreamItem {
    fn from(relationship: Relationship) -> Self {
        StreamItem::Relationship { relationship }
    }
}

/// Severity of a connector log
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Warning that needs attention
    Alert,
    Info,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Alert => write!(f, "alert"),
            LogLevel::Info => write!(f, "info"),
        }
    }
}

/// A single connector log record
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConnectorLog {
    pub level: LogLevel,
    pub message: String,
    #[serde(serialize_with = "serialize_timestamp")]
    pub timestamp: chrono::DateTime<Utc>,
}

impl ConnectorLog {
    pub fn new(level: LogLevel, message: impl Into<String>, timestamp: chrono::DateTime<Utc>) -> Self {
        Self {
            level,
            message: message.into(),
            timestamp,
        }
    }
}

fn serialize_timestamp<S: Serializer>(
    timestamp: &chrono::DateTime<Utc>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&timestamp.to_rfc3339_opts(SecondsFormat::Millis, true))
}
