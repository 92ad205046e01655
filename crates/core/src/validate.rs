//! Field-level validation and sanitization.
//!
//! Contract: every validator takes the raw wire value (a `serde_json::Value`,
//! since clients send prices as either numbers or numeric strings) and returns
//! the normalized value or a [`ValidationError`]. Sanitization runs before
//! any length/charset check, so the limits apply to the cleaned value.
//!
//! Rules:
//! - markup tags are stripped; `<script>` bodies are removed entirely so
//!   stored text can never be replayed as executable content downstream.
//! - names: 2-100 chars, letters (Latin with Spanish diacritics) and spaces.
//! - descriptions: optional, empty by default, at most 500 chars.
//! - prices: 0 ..= 999_999_999, rounded to 2 decimals via x100/round/x0.01
//!   (round half away from zero; see `validate_price`).

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;

use crate::error::ValidationError;
use crate::item::{Item, ItemId};

/// Upper bound for prices, inclusive.
pub const PRICE_MAX: f64 = 999_999_999.0;

const NAME_MIN_CHARS: usize = 2;
const NAME_MAX_CHARS: usize = 100;
const DESCRIPTION_MAX_CHARS: usize = 500;

static SCRIPT_BLOCK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<script\b[^>]*>.*?</script\s*>").expect("valid script regex"));
static MARKUP_TAG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<[^>]*>").expect("valid markup tag regex"));
static NAME_ALPHABET_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-ZáéíóúÁÉÍÓÚñÑ\s]+$").expect("valid name alphabet regex"));

/// Raw, unvalidated request fields as they arrive off the wire.
///
/// Every field is an optional `Value` so the validators decide what counts as
/// text or a number; a field that is absent (or JSON null) deserializes to
/// `None`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ItemInput {
    pub name: Option<Value>,
    pub description: Option<Value>,
    pub price: Option<Value>,
}

/// Fully validated fields for a create operation.
#[derive(Debug, Clone, PartialEq)]
pub struct NewItem {
    pub name: String,
    pub description: String,
    pub price: f64,
}

/// Validated subset of fields for a partial update. `None` means "leave the
/// stored value untouched".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
}

impl ItemPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none() && self.price.is_none()
    }

    /// Merge the validated fields onto an existing record. The id is never
    /// touched.
    pub fn apply_to(&self, item: &mut Item) {
        if let Some(name) = &self.name {
            item.name = name.clone();
        }
        if let Some(description) = &self.description {
            item.description = description.clone();
        }
        if let Some(price) = self.price {
            item.price = price;
        }
    }
}

/// Strip markup from raw text: trims, removes `<script>` blocks including
/// their bodies, then removes every remaining tag.
pub fn sanitize_text(raw: &str) -> String {
    let trimmed = raw.trim();
    let without_scripts = SCRIPT_BLOCK_RE.replace_all(trimmed, "");
    let without_tags = MARKUP_TAG_RE.replace_all(&without_scripts, "");
    without_tags.trim().to_string()
}

pub fn validate_name(raw: Option<&Value>) -> Result<String, ValidationError> {
    let text = match raw {
        Some(Value::String(s)) => s,
        Some(_) => return Err(ValidationError::invalid_name("name must be text")),
        None => return Err(ValidationError::invalid_name("name is required")),
    };

    let cleaned = sanitize_text(text);
    let len = cleaned.chars().count();

    if len < NAME_MIN_CHARS {
        return Err(ValidationError::invalid_name(
            "name must have at least 2 characters",
        ));
    }
    if len > NAME_MAX_CHARS {
        return Err(ValidationError::invalid_name(
            "name cannot exceed 100 characters",
        ));
    }
    if !NAME_ALPHABET_RE.is_match(&cleaned) {
        return Err(ValidationError::invalid_name(
            "name may only contain letters and spaces",
        ));
    }

    Ok(cleaned)
}

pub fn validate_description(raw: Option<&Value>) -> Result<String, ValidationError> {
    let text = match raw {
        None | Some(Value::Null) => return Ok(String::new()),
        Some(Value::String(s)) => s,
        Some(_) => return Err(ValidationError::DescriptionNotText),
    };

    if text.is_empty() {
        return Ok(String::new());
    }

    let cleaned = sanitize_text(text);
    if cleaned.chars().count() > DESCRIPTION_MAX_CHARS {
        return Err(ValidationError::DescriptionTooLong);
    }

    Ok(cleaned)
}

/// Validate and normalize a price.
///
/// Accepts a JSON number or a numeric string. Canonical order: parse, round
/// to 2 decimals, then range-check the value that will actually be stored.
///
/// Rounding is `(price * 100).round() / 100`, i.e. half away from zero on
/// the scaled double. Note that on exact decimal halves this depends on the
/// binary representation: `"0.125"` scales to exactly 12.5 and rounds up to
/// 0.13, while `"12.345"` scales to 1234.4999... and lands on 12.34.
pub fn validate_price(raw: Option<&Value>) -> Result<f64, ValidationError> {
    let number = match raw {
        None | Some(Value::Null) => return Err(ValidationError::PriceRequired),
        Some(Value::Number(n)) => n.as_f64().ok_or(ValidationError::PriceNotNumeric)?,
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return Err(ValidationError::PriceRequired);
            }
            trimmed
                .parse::<f64>()
                .map_err(|_| ValidationError::PriceNotNumeric)?
        }
        Some(_) => return Err(ValidationError::PriceNotNumeric),
    };

    if !number.is_finite() {
        return Err(ValidationError::PriceNotNumeric);
    }

    let rounded = (number * 100.0).round() / 100.0;

    if rounded < 0.0 {
        return Err(ValidationError::PriceNegative);
    }
    if rounded > PRICE_MAX {
        return Err(ValidationError::PriceTooLarge);
    }

    Ok(rounded)
}

/// Validate an identifier from a path segment.
pub fn validate_identifier(raw: &str) -> Result<ItemId, ValidationError> {
    raw.parse()
}

/// Validate all fields for a create. Any failure aborts before any mutation.
pub fn validate_new_item(input: &ItemInput) -> Result<NewItem, ValidationError> {
    let name = validate_name(input.name.as_ref())?;
    let description = validate_description(input.description.as_ref())?;
    let price = validate_price(input.price.as_ref())?;
    Ok(NewItem {
        name,
        description,
        price,
    })
}

/// Validate only the fields present in a partial update.
pub fn validate_patch(input: &ItemInput) -> Result<ItemPatch, ValidationError> {
    let mut patch = ItemPatch::default();
    if let Some(raw) = input.name.as_ref() {
        patch.name = Some(validate_name(Some(raw))?);
    }
    if let Some(raw) = input.description.as_ref() {
        patch.description = Some(validate_description(Some(raw))?);
    }
    if let Some(raw) = input.price.as_ref() {
        patch.price = Some(validate_price(Some(raw))?);
    }
    Ok(patch)
}
