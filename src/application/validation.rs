//! # Request Validation
//!
//! Semantic validation of [`QuoteRequest`] bodies.
//!
//! Structural problems (malformed JSON, wrong field types) are caught by
//! deserialization before this module runs. Here every field is checked
//! against its rule and the first violated rule per field is reported, in
//! Portuguese, with a human-readable field label.
//!
//! # Rules
//!
//! | Field | Rule |
//! |-------|------|
//! | `recipient.address.zipcode` | required, exactly 8 characters, digits only |
//! | `volumes` | required, at least one entry |
//! | `category`, `amount` | required, at least 1 |
//! | `unitary_weight`, `height`, `width`, `length` | required, greater than 0 |
//! | `price` | required, greater than or equal to 0 |
//! | `sku` | optional |

use crate::application::dto::{QuoteRequest, VolumeRequest};
use crate::domain::entities::{Shipment, Volume};
use crate::domain::errors::DomainError;
use crate::domain::value_objects::{ZIPCODE_LEN, Zipcode};
use serde::Serialize;
use std::fmt;

/// Detail used when the request body cannot be decoded at all.
pub const MALFORMED_BODY_MESSAGE: &str =
    "Corpo da requisição inválido. Verifique o JSON enviado (campos obrigatórios e formato).";

/// Field identifiers and their display labels.
const FIELD_LABELS: &[(&str, &str)] = &[
    ("zipcode", "CEP (recipient.address.zipcode)"),
    ("address", "Endereço do destinatário (recipient.address)"),
    ("recipient", "Destinatário (recipient)"),
    ("volumes", "Lista de volumes (volumes)"),
    ("category", "Categoria do volume"),
    ("amount", "Quantidade do volume"),
    ("unitary_weight", "Peso unitário (unitary_weight)"),
    ("price", "Preço do volume (price)"),
    ("height", "Altura do volume (height)"),
    ("width", "Largura do volume (width)"),
    ("length", "Comprimento do volume (length)"),
];

/// Returns the display label of a field identifier, or the identifier
/// itself when it has none.
#[must_use]
pub fn field_label(field: &str) -> &str {
    FIELD_LABELS
        .iter()
        .find(|(id, _)| *id == field)
        .map_or(field, |(_, label)| label)
}

/// A violated validation rule.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Rule {
    /// Field is missing or empty.
    Required,
    /// Integer below the minimum.
    Min(i64),
    /// Integer above the maximum.
    Max(i64),
    /// Text of the wrong length.
    Len(usize),
    /// Text with non-digit characters.
    Numeric,
    /// Number not strictly above the bound.
    Gt(f64),
    /// Number below the bound.
    Gte(f64),
}

impl Rule {
    fn describe(self, label: &str) -> String {
        match self {
            Self::Required => format!("{label} é obrigatório"),
            Self::Min(n) => format!("{label} deve ser no mínimo {n}"),
            Self::Max(n) => format!("{label} deve ser no máximo {n}"),
            Self::Len(n) => format!("{label} deve ter exatamente {n} caracteres"),
            Self::Numeric => format!("{label} deve conter apenas dígitos numéricos"),
            Self::Gt(n) => format!("{label} deve ser maior que {n}"),
            Self::Gte(n) => format!("{label} deve ser maior ou igual a {n}"),
        }
    }
}

/// One field-level validation failure.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldViolation {
    /// Dotted path of the offending field, e.g. `volumes[0].price`.
    pub path: String,
    /// Human-readable message.
    pub message: String,
}

impl FieldViolation {
    fn new(field: &str, rule: Rule) -> Self {
        Self {
            path: field.to_string(),
            message: rule.describe(field_label(field)),
        }
    }

    fn for_volume(index: usize, field: &str, rule: Rule) -> Self {
        Self {
            path: format!("volumes[{index}].{field}"),
            message: format!("volumes[{index}]: {}", rule.describe(field_label(field))),
        }
    }
}

/// Non-empty collection of validation failures.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationErrors {
    violations: Vec<FieldViolation>,
}

impl ValidationErrors {
    /// Errors for a body that could not be decoded.
    #[must_use]
    pub fn malformed_body() -> Self {
        Self {
            violations: vec![FieldViolation {
                path: String::new(),
                message: MALFORMED_BODY_MESSAGE.to_string(),
            }],
        }
    }

    /// Returns the individual violations.
    #[must_use]
    pub fn violations(&self) -> &[FieldViolation] {
        &self.violations
    }

    /// Returns the messages, in field order.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.violations.iter().map(|v| v.message.clone()).collect()
    }

}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages = self.messages();
        write!(f, "{}", messages.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

/// Validates a quote request and converts it into a [`Shipment`].
///
/// # Errors
///
/// Returns every field violation found; nothing is partially accepted.
pub fn validate_quote_request(request: &QuoteRequest) -> Result<Shipment, ValidationErrors> {
    let mut violations = Vec::new();

    let zipcode = validate_recipient(request, &mut violations);

    let mut volumes = Vec::new();
    match request.volumes.as_deref() {
        None => violations.push(FieldViolation::new("volumes", Rule::Required)),
        Some([]) => violations.push(FieldViolation::new("volumes", Rule::Min(1))),
        Some(items) => {
            for (index, item) in items.iter().enumerate() {
                if let Some(volume) = validate_volume(index, item, &mut violations) {
                    volumes.push(volume);
                }
            }
        }
    }

    match zipcode {
        Some(zipcode) if violations.is_empty() => Ok(Shipment::new(zipcode, volumes)),
        _ => Err(ValidationErrors { violations }),
    }
}

fn validate_recipient(
    request: &QuoteRequest,
    violations: &mut Vec<FieldViolation>,
) -> Option<Zipcode> {
    let Some(recipient) = &request.recipient else {
        violations.push(FieldViolation::new("recipient", Rule::Required));
        return None;
    };
    let Some(address) = &recipient.address else {
        violations.push(FieldViolation::new("address", Rule::Required));
        return None;
    };
    let raw = match address.zipcode.as_deref() {
        None | Some("") => {
            violations.push(FieldViolation::new("zipcode", Rule::Required));
            return None;
        }
        Some(raw) => raw,
    };

    match Zipcode::parse(raw) {
        Ok(zipcode) => Some(zipcode),
        Err(DomainError::NonNumericZipcode(_)) => {
            violations.push(FieldViolation::new("zipcode", Rule::Numeric));
            None
        }
        Err(_) => {
            violations.push(FieldViolation::new("zipcode", Rule::Len(ZIPCODE_LEN)));
            None
        }
    }
}

fn validate_volume(
    index: usize,
    item: &VolumeRequest,
    violations: &mut Vec<FieldViolation>,
) -> Option<Volume> {
    let before = violations.len();
    let mut count = |field: &str, value: Option<i64>| -> u32 {
        match value {
            None => {
                violations.push(FieldViolation::for_volume(index, field, Rule::Required));
                0
            }
            Some(n) if n < 1 => {
                violations.push(FieldViolation::for_volume(index, field, Rule::Min(1)));
                0
            }
            Some(n) => u32::try_from(n).unwrap_or_else(|_| {
                violations.push(FieldViolation::for_volume(
                    index,
                    field,
                    Rule::Max(i64::from(u32::MAX)),
                ));
                0
            }),
        }
    };
    let category = count("category", item.category);
    let amount = count("amount", item.amount);

    let mut measure = |field: &str, value: Option<f64>, rule: Rule| -> f64 {
        let Some(v) = value else {
            violations.push(FieldViolation::for_volume(index, field, Rule::Required));
            return 0.0;
        };
        let ok = match rule {
            Rule::Gt(bound) => v > bound,
            Rule::Gte(bound) => v >= bound,
            _ => true,
        };
        if !ok {
            violations.push(FieldViolation::for_volume(index, field, rule));
        }
        v
    };
    let unitary_weight = measure("unitary_weight", item.unitary_weight, Rule::Gt(0.0));
    let price = measure("price", item.price, Rule::Gte(0.0));
    let height = measure("height", item.height, Rule::Gt(0.0));
    let width = measure("width", item.width, Rule::Gt(0.0));
    let length = measure("length", item.length, Rule::Gt(0.0));

    if violations.len() > before {
        return None;
    }

    let sku = item.sku.clone().filter(|s| !s.is_empty());
    Some(Volume::new(
        category,
        amount,
        unitary_weight,
        price,
        sku,
        height,
        width,
        length,
    ))
}
