//! Field specifications and form-data validation.
//!
//! Every admin-editable shape (blocks, pages, hero slides, site settings)
//! declares its fields as a static table of [`FieldSpec`]s. A [`FieldReader`]
//! walks the JSON object submitted by the admin API against those specs,
//! returning cleaned values and collecting one [`FieldError`] per violation.
//! Nothing is rejected early: the caller gets every problem in one pass.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use serde_json::{Map, Value};
use uuid::Uuid;

/// Message for a missing required value.
pub const REQUIRED: &str = "This field is required.";

#[allow(clippy::expect_used)]
static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?)+$",
    )
    .expect("valid regex literal")
});

#[allow(clippy::expect_used)]
static DECIMAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+-]?(?:(\d+)(?:\.(\d*))?|\.(\d+))$").expect("valid regex literal")
});

/// URL schemes accepted by URL fields.
const URL_SCHEMES: &[&str] = &["http", "https", "ftp", "ftps"];

/// The kind of value a field holds, with kind-specific constraints.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldKind {
    /// Single-line text.
    Char,
    /// Multi-line text.
    Text,
    /// Absolute URL; a missing scheme is filled in as `http://`.
    Url,
    Email,
    Boolean,
    /// Whole number.
    Integer,
    /// Fixed-precision decimal.
    Decimal { max_digits: u32, decimal_places: u32 },
    /// One value out of an enumeration of `(value, label)` pairs.
    Choice {
        choices: &'static [(&'static str, &'static str)],
        default: Option<&'static str>,
    },
    /// Reference to an image asset by id.
    Image,
    /// Reference to another record by id.
    Reference { model: &'static str },
    /// Ordered list of structured items of the named item type.
    List { item: &'static str },
    /// Ordered content stream of tagged blocks.
    Stream,
}

/// Declared shape of one field.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    #[serde(flatten)]
    pub kind: FieldKind,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    #[serde(skip_serializing_if = "str::is_empty")]
    pub help_text: &'static str,
}

impl FieldSpec {
    pub const fn new(name: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            label,
            kind,
            required: false,
            max_length: None,
            help_text: "",
        }
    }

    pub const fn char(name: &'static str, label: &'static str) -> Self {
        Self::new(name, label, FieldKind::Char)
    }

    pub const fn text(name: &'static str, label: &'static str) -> Self {
        Self::new(name, label, FieldKind::Text)
    }

    pub const fn url(name: &'static str, label: &'static str) -> Self {
        Self::new(name, label, FieldKind::Url)
    }

    pub const fn email(name: &'static str, label: &'static str) -> Self {
        Self::new(name, label, FieldKind::Email)
    }

    pub const fn boolean(name: &'static str, label: &'static str) -> Self {
        Self::new(name, label, FieldKind::Boolean)
    }

    pub const fn integer(name: &'static str, label: &'static str) -> Self {
        Self::new(name, label, FieldKind::Integer)
    }

    pub const fn image(name: &'static str, label: &'static str) -> Self {
        Self::new(name, label, FieldKind::Image)
    }

    pub const fn decimal(
        name: &'static str,
        label: &'static str,
        max_digits: u32,
        decimal_places: u32,
    ) -> Self {
        Self::new(
            name,
            label,
            FieldKind::Decimal {
                max_digits,
                decimal_places,
            },
        )
    }

    pub const fn choice(
        name: &'static str,
        label: &'static str,
        choices: &'static [(&'static str, &'static str)],
        default: Option<&'static str>,
    ) -> Self {
        Self::new(name, label, FieldKind::Choice { choices, default })
    }

    pub const fn list(name: &'static str, label: &'static str, item: &'static str) -> Self {
        Self::new(name, label, FieldKind::List { item })
    }

    /// Mark the field as required.
    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Limit the length of a text value, in characters.
    pub const fn max_length(mut self, max: usize) -> Self {
        self.max_length = Some(max);
        self
    }

    pub const fn help(mut self, text: &'static str) -> Self {
        self.help_text = text;
        self
    }
}

/// A single field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// Dotted path to the field, e.g. `body.2.value.services.0.title`.
    pub field: String,
    pub message: String,
}

/// All validation failures for one submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(transparent)]
#[error("validation failed ({} field error(s))", .errors.len())]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shorthand for a single error.
    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(FieldError {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn merge(&mut self, other: ValidationErrors) {
        self.errors.extend(other.errors);
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    /// First message reported for the given field path.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }

    pub fn contains(&self, field: &str) -> bool {
        self.get(field).is_some()
    }

    /// `Ok(())` when empty, otherwise `Err(self)`.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

/// Reads and validates fields out of one JSON object.
///
/// Accessors never fail: on a bad value they record an error and return an
/// empty value, so a whole record can be cleaned before reporting.
/// `null` and absent keys are treated the same.
pub struct FieldReader<'a> {
    data: Option<&'a Map<String, Value>>,
    prefix: String,
    errors: ValidationErrors,
}

impl<'a> FieldReader<'a> {
    pub fn new(value: &'a Value) -> Self {
        Self::with_prefix(value, "")
    }

    /// Create a reader whose error paths are prefixed with `prefix.`.
    pub fn with_prefix(value: &'a Value, prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        let mut errors = ValidationErrors::new();
        let data = match value {
            Value::Object(map) => Some(map),
            Value::Null => None,
            _ => {
                let field = if prefix.is_empty() {
                    "__all__".to_string()
                } else {
                    prefix.clone()
                };
                errors.add(field, "Expected an object.");
                None
            }
        };
        Self {
            data,
            prefix,
            errors,
        }
    }

    /// Full error path for a field of this object.
    pub fn path(&self, name: &str) -> String {
        if self.prefix.is_empty() {
            name.to_string()
        } else {
            format!("{}.{name}", self.prefix)
        }
    }

    /// Raw value of a field; `null` reads as absent.
    pub fn value(&self, name: &str) -> Option<&'a Value> {
        self.data
            .and_then(|d| d.get(name))
            .filter(|v| !v.is_null())
    }

    /// Whether the key is present at all (even as `null`).
    pub fn has(&self, name: &str) -> bool {
        self.data.is_some_and(|d| d.contains_key(name))
    }

    pub fn add_error(&mut self, name: &str, message: impl Into<String>) {
        let path = self.path(name);
        self.errors.add(path, message);
    }

    /// Fold errors from a nested reader or a custom check into this one.
    pub fn merge(&mut self, errors: ValidationErrors) {
        self.errors.merge(errors);
    }

    /// Read a text-like field (char, text, url, email).
    ///
    /// Values are trimmed; blank optional values come back as `""`.
    pub fn text(&mut self, spec: &FieldSpec) -> String {
        let raw = match self.value(spec.name) {
            None => String::new(),
            Some(Value::String(s)) => s.trim().to_string(),
            Some(Value::Number(n)) => n.to_string(),
            Some(_) => {
                self.add_error(spec.name, "Enter a valid value.");
                return String::new();
            }
        };

        if raw.is_empty() {
            if spec.required {
                self.add_error(spec.name, REQUIRED);
            }
            return String::new();
        }

        let cleaned = match spec.kind {
            FieldKind::Url => match normalize_url(&raw) {
                Some(url) => url,
                None => {
                    self.add_error(spec.name, "Enter a valid URL.");
                    return String::new();
                }
            },
            FieldKind::Email => {
                if !is_valid_email(&raw) {
                    self.add_error(spec.name, "Enter a valid email address.");
                    return String::new();
                }
                raw
            }
            _ => raw,
        };

        if let Some(max) = spec.max_length {
            let len = cleaned.chars().count();
            if len > max {
                self.add_error(
                    spec.name,
                    format!("Ensure this value has at most {max} characters (it has {len})."),
                );
            }
        }

        cleaned
    }

    /// Read a boolean, falling back to `default` when absent.
    pub fn boolean(&mut self, spec: &FieldSpec, default: bool) -> bool {
        match self.value(spec.name) {
            None => default,
            Some(Value::Bool(b)) => *b,
            Some(Value::Number(n)) if n.as_i64() == Some(0) => false,
            Some(Value::Number(n)) if n.as_i64() == Some(1) => true,
            Some(Value::String(s)) => match s.trim().to_ascii_lowercase().as_str() {
                "true" | "on" | "yes" | "1" => true,
                "false" | "off" | "no" | "0" | "" => false,
                _ => {
                    self.add_error(spec.name, "Enter true or false.");
                    default
                }
            },
            Some(_) => {
                self.add_error(spec.name, "Enter true or false.");
                default
            }
        }
    }

    /// Read a whole number.
    pub fn integer(&mut self, spec: &FieldSpec) -> Option<i64> {
        let parsed = match self.value(spec.name) {
            None => None,
            Some(Value::Number(n)) => match n.as_i64() {
                Some(v) => Some(v),
                None => {
                    self.add_error(spec.name, "Enter a whole number.");
                    return None;
                }
            },
            Some(Value::String(s)) if s.trim().is_empty() => None,
            Some(Value::String(s)) => match s.trim().parse::<i64>() {
                Ok(v) => Some(v),
                Err(_) => {
                    self.add_error(spec.name, "Enter a whole number.");
                    return None;
                }
            },
            Some(_) => {
                self.add_error(spec.name, "Enter a whole number.");
                return None;
            }
        };

        if parsed.is_none() && spec.required {
            self.add_error(spec.name, REQUIRED);
        }
        parsed
    }

    /// Read a fixed-precision decimal, returned in its submitted notation.
    pub fn decimal(&mut self, spec: &FieldSpec) -> Option<String> {
        let raw = match self.value(spec.name) {
            None => String::new(),
            Some(Value::Number(n)) => n.to_string(),
            Some(Value::String(s)) => s.trim().to_string(),
            Some(_) => {
                self.add_error(spec.name, "Enter a number.");
                return None;
            }
        };

        if raw.is_empty() {
            if spec.required {
                self.add_error(spec.name, REQUIRED);
            }
            return None;
        }

        let Some(shape) = DecimalShape::parse(&raw) else {
            self.add_error(spec.name, "Enter a number.");
            return None;
        };

        if let FieldKind::Decimal {
            max_digits,
            decimal_places,
        } = spec.kind
        {
            if let Err(message) = shape.check(max_digits, decimal_places) {
                self.add_error(spec.name, message);
                return None;
            }
        }

        Some(raw)
    }

    /// Read a choice field as one of the enumeration `C`.
    ///
    /// An absent key takes the declared default. An empty string is blank:
    /// an error for required fields, `None` otherwise.
    pub fn choice<C: Choice>(&mut self, spec: &FieldSpec) -> Option<C> {
        let raw = match self.value(spec.name) {
            None => {
                let default = match spec.kind {
                    FieldKind::Choice { default, .. } => default,
                    _ => None,
                };
                return match default.and_then(C::from_value) {
                    Some(choice) => Some(choice),
                    None => {
                        if spec.required {
                            self.add_error(spec.name, REQUIRED);
                        }
                        None
                    }
                };
            }
            Some(Value::String(s)) => s.trim().to_string(),
            Some(Value::Number(n)) => n.to_string(),
            Some(_) => {
                self.add_error(spec.name, "Select a valid choice.");
                return None;
            }
        };

        if raw.is_empty() {
            if spec.required {
                self.add_error(spec.name, REQUIRED);
            }
            return None;
        }

        match C::from_value(&raw) {
            Some(choice) => Some(choice),
            None => {
                self.add_error(
                    spec.name,
                    format!("Select a valid choice. {raw} is not one of the available choices."),
                );
                None
            }
        }
    }

    /// Read an image reference. Existence is checked by the caller.
    pub fn image(&mut self, spec: &FieldSpec) -> Option<Uuid> {
        self.uuid(spec, "Select a valid image.")
    }

    /// Read a reference to another record by id.
    pub fn reference(&mut self, spec: &FieldSpec) -> Option<Uuid> {
        self.uuid(spec, "Select a valid choice. That choice is not one of the available choices.")
    }

    fn uuid(&mut self, spec: &FieldSpec, invalid: &str) -> Option<Uuid> {
        let raw = match self.value(spec.name) {
            None => None,
            Some(Value::String(s)) if s.trim().is_empty() => None,
            Some(Value::String(s)) => Some(s.trim()),
            // Choosers may submit `{ "id": "..." }`.
            Some(Value::Object(obj)) => match obj.get("id") {
                Some(Value::String(s)) => Some(s.trim()),
                _ => {
                    self.add_error(spec.name, invalid);
                    return None;
                }
            },
            Some(_) => {
                self.add_error(spec.name, invalid);
                return None;
            }
        };

        match raw {
            None => {
                if spec.required {
                    self.add_error(spec.name, REQUIRED);
                }
                None
            }
            Some(s) => match Uuid::parse_str(s) {
                Ok(id) => Some(id),
                Err(_) => {
                    self.add_error(spec.name, invalid);
                    None
                }
            },
        }
    }

    /// Read an ordered list of structured items.
    ///
    /// `clean_item` is run against a nested reader for every entry; its
    /// errors are reported under `field.<index>.<subfield>`. Items in the
    /// wrapped `{ "type": "item", "value": {...} }` form are unwrapped.
    pub fn list<T>(
        &mut self,
        spec: &FieldSpec,
        mut clean_item: impl FnMut(&mut FieldReader<'a>) -> T,
    ) -> Vec<T> {
        let items = match self.value(spec.name) {
            None => {
                if spec.required {
                    self.add_error(spec.name, REQUIRED);
                }
                return Vec::new();
            }
            Some(Value::Array(items)) => items.as_slice(),
            Some(_) => {
                self.add_error(spec.name, "Enter a list of items.");
                return Vec::new();
            }
        };

        if items.is_empty() && spec.required {
            self.add_error(spec.name, REQUIRED);
        }

        let base = self.path(spec.name);
        let mut cleaned = Vec::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            let item = match item.get("type").and_then(Value::as_str) {
                Some("item") => item.get("value").unwrap_or(item),
                _ => item,
            };
            let mut reader = FieldReader::with_prefix(item, format!("{base}.{index}"));
            cleaned.push(clean_item(&mut reader));
            self.errors.merge(reader.into_errors());
        }
        cleaned
    }

    pub fn into_errors(self) -> ValidationErrors {
        self.errors
    }

    /// Return `value` if no field failed, otherwise every collected error.
    pub fn finish<T>(self, value: T) -> Result<T, ValidationErrors> {
        if self.errors.is_empty() {
            Ok(value)
        } else {
            Err(self.errors)
        }
    }
}

/// An enumeration usable as a choice field.
pub trait Choice: Sized + Copy {
    /// `(value, label)` pairs in display order.
    const CHOICES: &'static [(&'static str, &'static str)];

    fn from_value(value: &str) -> Option<Self>;

    fn as_str(&self) -> &'static str;

    fn label(&self) -> &'static str {
        let value = self.as_str();
        Self::CHOICES
            .iter()
            .find(|(v, _)| *v == value)
            .map(|(_, label)| *label)
            .unwrap_or(value)
    }
}

/// Declare a choice enumeration with its stored values and labels.
///
/// Mark the variant matching the field's declared default with
/// `#[default]`; serde uses the stored values.
#[macro_export]
macro_rules! choice_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $($(#[$vmeta:meta])* $variant:ident => ($value:literal, $label:literal)),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
        $vis enum $name {
            $(
                $(#[$vmeta])*
                #[serde(rename = $value)]
                $variant,
            )+
        }

        impl $crate::content::fields::Choice for $name {
            const CHOICES: &'static [(&'static str, &'static str)] = &[$(($value, $label)),+];

            fn from_value(value: &str) -> Option<Self> {
                match value {
                    $($value => Some(Self::$variant),)+
                    _ => None,
                }
            }

            fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $value,)+
                }
            }
        }
    };
}

/// Normalize a submitted URL, prefixing `http://` when no scheme is given.
///
/// Returns `None` unless the result parses, has a host, and uses one of the
/// accepted schemes.
pub fn normalize_url(input: &str) -> Option<String> {
    let candidate = if input.contains("://") {
        input.to_string()
    } else {
        format!("http://{input}")
    };

    let parsed = url::Url::parse(&candidate).ok()?;
    if !URL_SCHEMES.contains(&parsed.scheme()) {
        return None;
    }
    if parsed.host_str().is_none_or(str::is_empty) {
        return None;
    }
    Some(candidate)
}

pub fn is_valid_email(input: &str) -> bool {
    input.chars().count() <= 254 && EMAIL.is_match(input)
}

/// Digit layout of a decimal literal, counted the way a fixed-precision
/// decimal column counts it: leading zeros are not significant, trailing
/// fractional zeros are.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct DecimalShape {
    digits: u32,
    decimals: u32,
}

impl DecimalShape {
    fn parse(input: &str) -> Option<Self> {
        let caps = DECIMAL.captures(input)?;
        let (whole, fraction) = match (caps.get(1), caps.get(3)) {
            (Some(whole), _) => (whole.as_str(), caps.get(2).map_or("", |m| m.as_str())),
            (None, Some(fraction)) => ("", fraction.as_str()),
            (None, None) => return None,
        };

        let decimals = u32::try_from(fraction.len()).ok()?;
        let combined = format!("{whole}{fraction}");
        let significant = combined.trim_start_matches('0');
        let significant_len = u32::try_from(significant.len().max(1)).ok()?;

        let digits = significant_len.max(decimals);
        Some(Self { digits, decimals })
    }

    fn check(&self, max_digits: u32, decimal_places: u32) -> Result<(), String> {
        let whole_digits = self.digits - self.decimals;
        if self.digits > max_digits {
            return Err(format!(
                "Ensure that there are no more than {max_digits} digits in total."
            ));
        }
        if self.decimals > decimal_places {
            return Err(format!(
                "Ensure that there are no more than {decimal_places} decimal places."
            ));
        }
        let max_whole = max_digits - decimal_places;
        if whole_digits > max_whole {
            return Err(format!(
                "Ensure that there are no more than {max_whole} digits before the decimal point."
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use serde_json::json;

    const TITLE: FieldSpec = FieldSpec::char("title", "Title").required().max_length(5);
    const LINK: FieldSpec = FieldSpec::url("link", "Link");
    const MAIL: FieldSpec = FieldSpec::email("mail", "Mail");
    const OPACITY: FieldSpec = FieldSpec::decimal("opacity", "Opacity", 3, 2);
    const COUNT: FieldSpec = FieldSpec::integer("count", "Count");

    crate::choice_enum! {
        enum Size {
            #[default]
            Small => ("s", "Small"),
            Large => ("l", "Large"),
        }
    }

    const SIZE: FieldSpec = FieldSpec::choice("size", "Size", Size::CHOICES, Some("l")).required();

    #[test]
    fn text_is_trimmed_and_length_counted_in_chars() {
        let data = json!({ "title": "  héllo  " });
        let mut reader = FieldReader::new(&data);
        assert_eq!(reader.text(&TITLE), "héllo");
        assert!(reader.into_errors().is_empty());
    }

    #[test]
    fn whitespace_only_required_text_is_missing() {
        let data = json!({ "title": "   " });
        let mut reader = FieldReader::new(&data);
        reader.text(&TITLE);
        assert_eq!(reader.into_errors().get("title"), Some(REQUIRED));
    }

    #[test]
    fn overlong_text_reports_lengths() {
        let data = json!({ "title": "abcdef" });
        let mut reader = FieldReader::new(&data);
        reader.text(&TITLE);
        let errors = reader.into_errors();
        assert_eq!(
            errors.get("title"),
            Some("Ensure this value has at most 5 characters (it has 6).")
        );
    }

    #[test]
    fn url_without_scheme_gets_http() {
        let data = json!({ "link": "example.com/about" });
        let mut reader = FieldReader::new(&data);
        assert_eq!(reader.text(&LINK), "http://example.com/about");
        assert!(reader.into_errors().is_empty());
    }

    #[test]
    fn url_with_unsupported_scheme_rejected() {
        for bad in ["javascript://alert(1)", "http://", "not a url at all"] {
            let data = json!({ "link": bad });
            let mut reader = FieldReader::new(&data);
            reader.text(&LINK);
            assert_eq!(
                reader.into_errors().get("link"),
                Some("Enter a valid URL."),
                "expected {bad:?} to be rejected"
            );
        }
    }

    #[test]
    fn email_format_checked() {
        let data = json!({ "mail": "info@virtusysglobal.com" });
        let mut reader = FieldReader::new(&data);
        assert_eq!(reader.text(&MAIL), "info@virtusysglobal.com");
        assert!(reader.into_errors().is_empty());

        let data = json!({ "mail": "info@" });
        let mut reader = FieldReader::new(&data);
        reader.text(&MAIL);
        assert!(reader.into_errors().contains("mail"));
    }

    #[test]
    fn decimal_precision() {
        let accepted = ["0.5", "0.50", "1", "9.99", ".25", "-0.3"];
        for value in accepted {
            let data = json!({ "opacity": value });
            let mut reader = FieldReader::new(&data);
            assert_eq!(reader.decimal(&OPACITY).as_deref(), Some(value));
            assert!(reader.into_errors().is_empty(), "{value} should be accepted");
        }

        let rejected = [
            ("0.505", "Ensure that there are no more than 2 decimal places."),
            ("1.505", "Ensure that there are no more than 3 digits in total."),
            ("10", "Ensure that there are no more than 1 digits before the decimal point."),
            ("10.5", "Ensure that there are no more than 1 digits before the decimal point."),
            ("abc", "Enter a number."),
        ];
        for (value, message) in rejected {
            let data = json!({ "opacity": value });
            let mut reader = FieldReader::new(&data);
            assert!(reader.decimal(&OPACITY).is_none());
            assert_eq!(reader.into_errors().get("opacity"), Some(message), "{value}");
        }
    }

    #[test]
    fn decimal_accepts_json_numbers() {
        let data = json!({ "opacity": 0.75 });
        let mut reader = FieldReader::new(&data);
        assert_eq!(reader.decimal(&OPACITY).as_deref(), Some("0.75"));
    }

    #[test]
    fn decimal_too_many_places() {
        let spec = FieldSpec::decimal("d", "D", 5, 2);
        let data = json!({ "d": "1.234" });
        let mut reader = FieldReader::new(&data);
        reader.decimal(&spec);
        assert_eq!(
            reader.into_errors().get("d"),
            Some("Ensure that there are no more than 2 decimal places.")
        );
    }

    #[test]
    fn integer_parsing() {
        let data = json!({ "count": "4" });
        let mut reader = FieldReader::new(&data);
        assert_eq!(reader.integer(&COUNT), Some(4));

        let data = json!({ "count": 4.5 });
        let mut reader = FieldReader::new(&data);
        assert_eq!(reader.integer(&COUNT), None);
        assert_eq!(reader.into_errors().get("count"), Some("Enter a whole number."));
    }

    #[test]
    fn choice_default_applies_when_absent() {
        let data = json!({});
        let mut reader = FieldReader::new(&data);
        assert_eq!(reader.choice::<Size>(&SIZE), Some(Size::Large));
        assert!(reader.into_errors().is_empty());
    }

    #[test]
    fn choice_rejects_non_members_and_blank() {
        let data = json!({ "size": "xl" });
        let mut reader = FieldReader::new(&data);
        assert_eq!(reader.choice::<Size>(&SIZE), None);
        assert_eq!(
            reader.into_errors().get("size"),
            Some("Select a valid choice. xl is not one of the available choices.")
        );

        let data = json!({ "size": "" });
        let mut reader = FieldReader::new(&data);
        reader.choice::<Size>(&SIZE);
        assert_eq!(reader.into_errors().get("size"), Some(REQUIRED));
    }

    #[test]
    fn choice_enum_round_trips_values_and_labels() {
        assert_eq!(Size::default(), Size::Small);
        assert_eq!(Size::Large.as_str(), "l");
        assert_eq!(Size::Large.label(), "Large");
        assert_eq!(serde_json::to_value(Size::Small).unwrap(), json!("s"));
    }

    #[test]
    fn list_errors_carry_index_paths() {
        let spec = FieldSpec::list("items", "Items", "item");
        let data = json!({ "items": [
            { "title": "ok" },
            { "type": "item", "value": { "title": "" } },
        ]});
        let mut reader = FieldReader::new(&data);
        let titles = reader.list(&spec, |item| item.text(&TITLE));
        assert_eq!(titles, vec!["ok".to_string(), String::new()]);
        let errors = reader.into_errors();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get("items.1.title"), Some(REQUIRED));
    }

    #[test]
    fn non_object_input_is_rejected() {
        let data = json!(["not", "an", "object"]);
        let reader = FieldReader::new(&data);
        assert!(reader.into_errors().contains("__all__"));
    }

    #[test]
    fn image_reference_must_be_uuid() {
        let spec = FieldSpec::image("image", "Image");
        let id = Uuid::now_v7();
        let data = json!({ "image": id.to_string() });
        let mut reader = FieldReader::new(&data);
        assert_eq!(reader.image(&spec), Some(id));

        let data = json!({ "image": { "id": id.to_string() } });
        let mut reader = FieldReader::new(&data);
        assert_eq!(reader.image(&spec), Some(id));

        let data = json!({ "image": "42" });
        let mut reader = FieldReader::new(&data);
        assert_eq!(reader.image(&spec), None);
        assert_eq!(reader.into_errors().get("image"), Some("Select a valid image."));
    }
}
