use crate::models::{NormalizedStudent, RawScore, RawStudentRecord};

/// Placeholder used for any text field the API left out.
pub const NOT_AVAILABLE: &str = "N/A";

const UNKNOWN_STUDENT: &str = "Unknown student";

pub fn normalize(raw: &RawStudentRecord) -> NormalizedStudent {
    let identifier = or_not_available(raw.documento.as_deref());
    let cohorts = raw.ficha.clone();
    let primary_cohort = cohorts
        .first()
        .cloned()
        .unwrap_or_else(|| NOT_AVAILABLE.to_string());

    NormalizedStudent {
        full_name: full_name(raw),
        score: parse_score(raw.puntos.as_ref()),
        cohorts,
        primary_cohort,
        program: or_not_available(raw.programa.as_deref()),
        status: or_not_available(raw.estado.as_deref()),
        identifier,
    }
}

fn full_name(raw: &RawStudentRecord) -> String {
    let parts: Vec<&str> = [raw.nombre.as_deref(), raw.apellido.as_deref()]
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect();

    if !parts.is_empty() {
        return parts.join(" ");
    }

    match raw.documento.as_deref().map(str::trim) {
        Some(identifier) if !identifier.is_empty() => format!("Student {identifier}"),
        _ => UNKNOWN_STUDENT.to_string(),
    }
}

fn or_not_available(value: Option<&str>) -> String {
    match value {
        Some(text) if !text.trim().is_empty() => text.to_string(),
        _ => NOT_AVAILABLE.to_string(),
    }
}

/// Reads a score the lenient way: the leading integer of the value, or 0.
///
/// Fractions truncate and negative values clamp to 0.
pub fn parse_score(score: Option<&RawScore>) -> u64 {
    match score {
        None => 0,
        Some(RawScore::Integer(value)) => u64::try_from(*value).unwrap_or(0),
        Some(RawScore::Float(value)) if value.is_finite() && *value > 0.0 => {
            // `as` saturates at u64::MAX
            value.trunc() as u64
        }
        Some(RawScore::Float(_)) => 0,
        Some(RawScore::Text(text)) => leading_integer(text),
    }
}

fn leading_integer(text: &str) -> u64 {
    let trimmed = text.trim_start();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let mut value: u64 = 0;
    let mut seen_digit = false;
    for byte in digits.bytes() {
        if !byte.is_ascii_digit() {
            break;
        }
        seen_digit = true;
        value = value
            .saturating_mul(10)
            .saturating_add(u64::from(byte - b'0'));
    }

    if negative || !seen_digit {
        0
    } else {
        value
    }
}
