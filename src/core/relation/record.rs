//! Persistierter Datensatz einer Beziehung.
//!
//! Numerische Felder werden beim Laden tolerant gelesen: Zahlen-Strings
//! werden geparst, alles andere fällt auf den Feld-Standardwert zurück.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::style::{LineStyle, TextStyle};

/// Schlüssel, deren Werte beim Schreiben in Zahlen umgewandelt werden.
pub const NUMBER_KEYS: [&str; 2] = ["line-width", "font-size"];
/// Schlüssel der Kontrollpunkt-Overrides.
pub const CONTROLLER_KEYS: [&str; 2] = ["controller0", "controller1"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationData {
    #[serde(default)]
    pub id: String,
    /// ID des Start-Knotens (schwache Referenz)
    #[serde(default)]
    pub from: String,
    /// ID des Ziel-Knotens (schwache Referenz)
    #[serde(default)]
    pub to: String,
    #[serde(default)]
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "lenient::controller")]
    pub controller0: Option<Vec2>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "lenient::controller")]
    pub controller1: Option<Vec2>,
    #[serde(
        rename = "fromPoint",
        default,
        skip_serializing_if = "Option::is_none",
        with = "lenient::percent"
    )]
    pub from_percent: Option<f32>,
    #[serde(
        rename = "toPoint",
        default,
        skip_serializing_if = "Option::is_none",
        with = "lenient::percent"
    )]
    pub to_percent: Option<f32>,
    #[serde(flatten)]
    pub line: LineStyle,
    #[serde(flatten)]
    pub text_style: TextStyle,
    /// Erstellungszeitpunkt (Epoch-Millisekunden)
    #[serde(default, deserialize_with = "lenient::timestamp")]
    pub created: i64,
}

impl RelationData {
    /// Leerer Datensatz mit Standardstilen.
    pub fn new(id: impl Into<String>, created: i64) -> Self {
        Self {
            id: id.into(),
            from: String::new(),
            to: String::new(),
            text: String::new(),
            controller0: None,
            controller1: None,
            from_percent: None,
            to_percent: None,
            line: LineStyle::default(),
            text_style: TextStyle::default(),
            created,
        }
    }
}

/// Wandelt einen JSON-Wert tolerant in eine endliche Zahl.
pub fn coerce_number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    number.is_finite().then_some(number)
}

/// Kontrollpunkt aus `{x, y}`; fehlende oder ungültige Koordinaten verwerfen den Punkt.
pub fn coerce_point(value: &Value) -> Option<Vec2> {
    let obj = value.as_object()?;
    let x = coerce_number(obj.get("x")?)?;
    let y = coerce_number(obj.get("y")?)?;
    Some(Vec2::new(x as f32, y as f32))
}

/// Prozentwert: negativ = nicht gesetzt, `>= 1` wird in `[0, 1)` gefaltet.
pub fn normalize_percent(value: f64) -> Option<f32> {
    if value < 0.0 {
        None
    } else {
        Some(value.rem_euclid(1.0) as f32)
    }
}

/// Bringt einen Patch-Wert für `key` auf den erwarteten Typ.
pub fn coerce_field(key: &str, value: Value) -> Value {
    if NUMBER_KEYS.contains(&key) {
        return match coerce_number(&value) {
            Some(n) => Value::from(n),
            None => {
                log::warn!("Wert für '{}' ist keine Zahl, verwende Standardwert", key);
                Value::Null
            }
        };
    }
    if CONTROLLER_KEYS.contains(&key) {
        return match coerce_point(&value) {
            Some(p) => serde_json::json!({ "x": p.x, "y": p.y }),
            None => Value::Null,
        };
    }
    value
}

pub(crate) mod lenient {
    use super::{coerce_number, coerce_point, normalize_percent};
    use crate::core::relation::style::{DEFAULT_FONT_SIZE, DEFAULT_LINE_WIDTH};
    use glam::Vec2;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use serde_json::Value;

    fn number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(coerce_number(&value))
    }

    pub fn line_width<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f32, D::Error> {
        Ok(number(deserializer)?.map_or(DEFAULT_LINE_WIDTH, |n| n as f32))
    }

    pub fn font_size<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f32, D::Error> {
        Ok(number(deserializer)?.map_or(DEFAULT_FONT_SIZE, |n| n as f32))
    }

    pub fn timestamp<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
        Ok(number(deserializer)?.map_or(0, |n| n as i64))
    }

    pub mod controller {
        use super::*;

        #[derive(Serialize)]
        struct PointRecord {
            x: f32,
            y: f32,
        }

        pub fn serialize<S: Serializer>(
            value: &Option<Vec2>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match value {
                Some(p) => PointRecord { x: p.x, y: p.y }.serialize(serializer),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<Vec2>, D::Error> {
            let value = Value::deserialize(deserializer)?;
            Ok(coerce_point(&value))
        }
    }

    pub mod percent {
        use super::*;

        pub fn serialize<S: Serializer>(
            value: &Option<f32>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            value.serialize(serializer)
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<f32>, D::Error> {
            Ok(number(deserializer)?.and_then(normalize_percent))
        }
    }
}
