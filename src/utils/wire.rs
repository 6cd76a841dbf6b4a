//! Lectura tolerante de campos del backend
//!
//! El backend devuelve números como string o como número según la
//! columna (coordenadas, ids), y fechas con o sin hora. Estos helpers se
//! usan con `#[serde(deserialize_with = ...)]`.

use chrono::NaiveDate;
use serde::de::{self, Deserializer};
use serde::Deserialize;

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Int(i64),
    Float(f64),
    Text(String),
}

/// Entero aceptando `7` o `"7"`
pub fn flexible_i64<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Int(v) => Ok(v),
        NumberOrString::Float(v) if v.fract() == 0.0 => Ok(v as i64),
        NumberOrString::Float(v) => Err(de::Error::custom(format!("expected integer id, got {}", v))),
        NumberOrString::Text(s) => s
            .trim()
            .parse::<i64>()
            .map_err(|_| de::Error::custom(format!("expected integer id, got '{}'", s))),
    }
}

/// Decimal aceptando `6.9` o `"6.9"`
pub fn flexible_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Int(v) => Ok(v as f64),
        NumberOrString::Float(v) => Ok(v),
        NumberOrString::Text(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| de::Error::custom(format!("expected number, got '{}'", s))),
    }
}

/// String que puede venir como `null`
pub fn string_or_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Identificador opcional enviado como número o como string
pub fn opt_id_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<NumberOrString> = Option::deserialize(deserializer)?;
    Ok(match raw {
        None => None,
        Some(NumberOrString::Int(v)) => Some(v.to_string()),
        Some(NumberOrString::Float(v)) => Some(v.to_string()),
        Some(NumberOrString::Text(s)) if s.trim().is_empty() => None,
        Some(NumberOrString::Text(s)) => Some(s),
    })
}

#[derive(Deserialize)]
#[serde(untagged)]
enum FlagRepr {
    Bool(bool),
    Int(i64),
    Text(String),
}

/// Bandera `0`/`1`, `true`/`false` o `"0"`/`"1"`
pub fn flag_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<FlagRepr> = Option::deserialize(deserializer)?;
    Ok(match raw {
        None => false,
        Some(FlagRepr::Bool(b)) => b,
        Some(FlagRepr::Int(v)) => v != 0,
        Some(FlagRepr::Text(s)) => matches!(s.trim(), "1" | "true" | "TRUE" | "True"),
    })
}

/// Fecha opcional: `"2025-01-05"`, `"2025-01-05T00:00:00.000Z"`, `""` o `null`
pub fn lenient_date_opt<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(parse_date_prefix))
}

/// Fecha obligatoria con el mismo formato que `lenient_date_opt`
pub fn lenient_date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_date_prefix(&raw).ok_or_else(|| de::Error::custom(format!("invalid date '{}'", raw)))
}

/// Toma los diez primeros caracteres como fecha ISO
pub fn parse_date_prefix(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    let prefix = trimmed.get(..10)?;
    NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok()
}
