use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A user record as it arrives from the platform API.
///
/// Every field is optional. Deserialization never fails: wrong-typed values
/// are coerced where a sensible reading exists and dropped otherwise.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "Value")]
pub struct RawStudentRecord {
    pub tipo_usuario: Option<String>,
    pub estado: Option<String>,
    pub nombre: Option<String>,
    pub apellido: Option<String>,
    pub documento: Option<String>,
    pub puntos: Option<RawScore>,
    pub ficha: Vec<String>,
    pub programa: Option<String>,
    pub created_at: Option<String>,
}

/// Score as sent by the API: sometimes a number, sometimes text.
#[derive(Debug, Clone, PartialEq)]
pub enum RawScore {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl RawScore {
    fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Number(number) => match number.as_i64() {
                Some(integer) => Some(Self::Integer(integer)),
                None => number.as_f64().map(Self::Float),
            },
            Value::String(text) => Some(Self::Text(text.clone())),
            _ => None,
        }
    }
}

impl From<Value> for RawStudentRecord {
    fn from(value: Value) -> Self {
        let Value::Object(map) = value else {
            return Self::default();
        };

        Self {
            tipo_usuario: text_field(&map, "tipoUsuario"),
            estado: text_field(&map, "estado"),
            nombre: text_field(&map, "nombre"),
            apellido: text_field(&map, "apellido"),
            documento: text_field(&map, "documento"),
            puntos: map.get("puntos").and_then(RawScore::from_json),
            ficha: map.get("ficha").map(cohort_codes).unwrap_or_default(),
            programa: text_field(&map, "programa"),
            created_at: text_field(&map, "createdAt"),
        }
    }
}

fn text_field(map: &Map<String, Value>, key: &str) -> Option<String> {
    match map.get(key)? {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}

fn cohort_codes(value: &Value) -> Vec<String> {
    let Value::Array(items) = value else {
        return Vec::new();
    };

    items
        .iter()
        .filter_map(|item| match item {
            Value::String(code) => Some(code.clone()),
            Value::Number(code) => Some(code.to_string()),
            _ => None,
        })
        .collect()
}

/// Canonical view of a learner used by every ranking computation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedStudent {
    pub full_name: String,
    pub score: u64,
    pub cohorts: Vec<String>,
    pub primary_cohort: String,
    pub program: String,
    pub status: String,
    pub identifier: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CohortOption {
    pub id: String,
    pub display_name: String,
    pub code: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgramOption {
    pub id: String,
    pub display_name: String,
    pub code: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankingEntry {
    pub full_name: String,
    pub score: u64,
    pub primary_cohort: String,
    pub cohorts: Vec<String>,
    pub program: String,
    pub status: String,
    pub identifier: String,
    /// Dense, 1-based.
    pub position: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankingMetrics {
    pub total_learners: usize,
    pub total_cohorts: usize,
    pub total_programs: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn deserializes_api_shaped_record() {
        let record: RawStudentRecord = serde_json::from_value(json!({
            "tipoUsuario": "aprendiz",
            "estado": "En formación",
            "nombre": "Laura",
            "apellido": "Gómez",
            "documento": 1034567,
            "puntos": "150",
            "ficha": ["2556678", 2556679, null],
            "programa": "Análisis y Desarrollo de Software",
            "createdAt": "2025-03-14T09:30:00.000Z",
            "_id": "65f0c1"
        }))
        .expect("record deserializes");

        assert_eq!(record.tipo_usuario.as_deref(), Some("aprendiz"));
        assert_eq!(record.documento.as_deref(), Some("1034567"));
        assert_eq!(record.puntos, Some(RawScore::Text("150".to_string())));
        assert_eq!(record.ficha, vec!["2556678", "2556679"]);
        assert_eq!(record.created_at.as_deref(), Some("2025-03-14T09:30:00.000Z"));
    }

    #[test]
    fn malformed_fields_degrade_instead_of_failing() {
        let record: RawStudentRecord = serde_json::from_value(json!({
            "puntos": { "value": 3 },
            "ficha": "2556678",
            "nombre": ["not", "a", "name"]
        }))
        .expect("record deserializes");

        assert_eq!(record.puntos, None);
        assert!(record.ficha.is_empty());
        assert_eq!(record.nombre, None);
    }

    #[test]
    fn non_object_becomes_empty_record() {
        let records: Vec<RawStudentRecord> =
            serde_json::from_value(json!([42, "text", null])).expect("array deserializes");
        assert_eq!(records.len(), 3);
        assert!(records.iter().all(|record| *record == RawStudentRecord::default()));
    }
}
