use std::fmt::{self, Debug};
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;

/// Reason reported when there is no value to validate.
pub const UNDEFINED_REASON: &str = "obj is undefined";

/// Path label used when a failure concerns the whole value.
const ROOT_PATH: &str = "(root)";

/// Non-empty list of human-readable validation failures.
///
/// Each reason reads `<path> <message>`, where `<path>` is `(root)` for the
/// whole value. The [`Display`](fmt::Display) implementation joins reasons
/// with `, `.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Deref)]
pub struct ValidationReasons(Vec<String>);

impl ValidationReasons {
    /// Creates reasons from a first mandatory reason and optional others.
    pub fn new(first: impl Into<String>, others: impl IntoIterator<Item = String>) -> Self {
        let mut reasons = vec![first.into()];
        reasons.extend(others);
        Self(reasons)
    }

    /// Creates reasons from a list, `None` when the list is empty.
    pub fn from_vec(reasons: Vec<String>) -> Option<Self> {
        if reasons.is_empty() {
            None
        } else {
            Some(Self(reasons))
        }
    }

    /// The reason used for missing values.
    pub fn undefined() -> Self {
        Self::new(UNDEFINED_REASON, [])
    }

    /// Consumes the reasons.
    pub fn into_vec(self) -> Vec<String> {
        self.0
    }
}

impl fmt::Display for ValidationReasons {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join(", "))
    }
}

/// Outcome of validating a value.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationResult<T> {
    /// The value conforms and has been converted to `T`.
    Valid(T),
    /// The value does not conform.
    Invalid(ValidationReasons),
}

impl<T> ValidationResult<T> {
    /// Whether the value conformed.
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid(_))
    }

    /// Converts into a standard [`Result`].
    ///
    /// # Errors
    ///
    /// Returns the reasons when the value did not conform.
    pub fn into_result(self) -> Result<T, ValidationReasons> {
        match self {
            Self::Valid(value) => Ok(value),
            Self::Invalid(reasons) => Err(reasons),
        }
    }
}

/// A compiled schema, cheap to clone and safe to share between threads.
///
/// Validators are handed out by [`SchemaRegistry::compile`](super::SchemaRegistry::compile)
/// or created with [`Validator::always_valid`].
#[derive(Clone)]
pub enum Validator {
    /// Accepts every defined value and reports no reasons.
    AlwaysValid,
    /// Checks values against a compiled JSON schema.
    Schema {
        /// The registry name of the schema.
        name: Arc<str>,
        /// The compiled schema.
        compiled: Arc<jsonschema::Validator>,
    },
}

impl Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlwaysValid => f.write_str("AlwaysValid"),
            Self::Schema { name, .. } => f.debug_tuple("Schema").field(name).finish(),
        }
    }
}

impl Validator {
    /// A validator accepting anything, used for endpoints without parameters.
    pub fn always_valid() -> Self {
        Self::AlwaysValid
    }

    /// The schema name, `None` for [`Validator::AlwaysValid`].
    pub fn schema_name(&self) -> Option<&str> {
        match self {
            Self::AlwaysValid => None,
            Self::Schema { name, .. } => Some(name),
        }
    }

    /// Judges a value without converting it.
    ///
    /// A missing value (`None` or JSON `null`) fails with [`UNDEFINED_REASON`],
    /// whatever the validator.
    ///
    /// # Errors
    ///
    /// Returns the failure reasons when the value does not conform.
    pub fn check(&self, value: Option<&Value>) -> Result<(), ValidationReasons> {
        let value = match value {
            None | Some(Value::Null) => return Err(ValidationReasons::undefined()),
            Some(value) => value,
        };

        let Self::Schema { compiled, .. } = self else {
            return Ok(());
        };
        if compiled.is_valid(value) {
            return Ok(());
        }

        let reasons = compiled
            .iter_errors(value)
            .map(|error| {
                let path = error.instance_path.to_string();
                let path = if path.is_empty() { ROOT_PATH } else { &path };
                format!("{path} {error}")
            })
            .collect();

        Err(ValidationReasons::from_vec(reasons)
            .unwrap_or_else(|| ValidationReasons::new(format!("{ROOT_PATH} is invalid"), [])))
    }

    /// Judges a value and converts it into `T`.
    ///
    /// Values passing the schema that still cannot be deserialized into `T`
    /// are reported as invalid, with the path of the offending field.
    pub fn validate<T>(&self, value: Option<&Value>) -> ValidationResult<T>
    where
        T: DeserializeOwned,
    {
        if let Err(reasons) = self.check(value) {
            return ValidationResult::Invalid(reasons);
        }
        let Some(value) = value else {
            return ValidationResult::Invalid(ValidationReasons::undefined());
        };

        match serde_path_to_error::deserialize::<_, T>(value) {
            Ok(typed) => ValidationResult::Valid(typed),
            Err(error) => {
                let path = error.path().to_string();
                let path = if path == "." { ROOT_PATH } else { &path };
                let reason = format!("{path} {}", error.inner());
                ValidationResult::Invalid(ValidationReasons::new(reason, []))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;
    use serde_json::json;

    use super::*;

    fn contact_validator() -> Validator {
        let schema = json!({
            "type": "object",
            "properties": {
                "contactId": { "type": "string" },
                "limit": { "type": "integer", "minimum": 1 }
            },
            "required": ["contactId"]
        });
        let compiled = jsonschema::validator_for(&schema).expect("valid schema");

        Validator::Schema {
            name: Arc::from("Contact"),
            compiled: Arc::new(compiled),
        }
    }

    #[derive(Debug, Deserialize, PartialEq)]
    #[serde(rename_all = "camelCase")]
    struct Contact {
        contact_id: String,
        limit: Option<u8>,
    }

    #[test]
    fn should_reject_missing_value() {
        let result = contact_validator().validate::<Contact>(None);

        assert_eq!(
            result,
            ValidationResult::Invalid(ValidationReasons::new(UNDEFINED_REASON, []))
        );
    }

    #[test]
    fn should_reject_null_even_when_always_valid() {
        let result = Validator::always_valid().check(Some(&Value::Null));

        let reasons = result.expect_err("null is undefined");
        assert_eq!(reasons.as_slice(), [UNDEFINED_REASON]);
    }

    #[test]
    fn should_accept_and_convert_valid_value() {
        let value = json!({ "contactId": "bob", "limit": 3 });

        let result = contact_validator().validate::<Contact>(Some(&value));

        assert_eq!(
            result,
            ValidationResult::Valid(Contact {
                contact_id: "bob".to_string(),
                limit: Some(3),
            })
        );
    }

    #[test]
    fn should_report_root_reason() {
        let value = json!({ "limit": 3 });

        let reasons = contact_validator()
            .check(Some(&value))
            .expect_err("contactId is required");

        insta::assert_snapshot!(reasons, @r#"(root) "contactId" is a required property"#);
    }

    #[test]
    fn should_report_all_reasons_with_paths() {
        let value = json!({ "contactId": 42, "limit": 0 });

        let reasons = contact_validator()
            .check(Some(&value))
            .expect_err("two violations");

        assert_eq!(reasons.len(), 2);
        assert!(reasons.iter().any(|reason| reason.starts_with("/contactId ")));
        assert!(reasons.iter().any(|reason| reason.starts_with("/limit ")));
        assert!(reasons.to_string().contains(", "));
    }

    #[test]
    fn should_report_deserialization_failure_as_reason() {
        // passes the schema, but does not fit in a u8
        let value = json!({ "contactId": "bob", "limit": 1000 });

        let result = contact_validator().validate::<Contact>(Some(&value));

        let reasons = match result {
            ValidationResult::Invalid(reasons) => reasons,
            other => panic!("expected an invalid result, got {other:?}"),
        };
        assert_eq!(reasons.len(), 1);
        assert!(reasons[0].starts_with("limit "), "got {reasons}");
    }

    #[test]
    fn should_accept_anything_defined_when_always_valid() {
        let validator = Validator::always_valid();

        assert!(validator.check(Some(&json!({ "any": ["thing"] }))).is_ok());
        assert!(validator.check(Some(&json!(0))).is_ok());
        assert_eq!(validator.schema_name(), None);
    }

    #[test]
    fn should_not_build_empty_reasons() {
        assert_eq!(ValidationReasons::from_vec(vec![]), None);
    }

    #[test]
    fn should_join_reasons() {
        let reasons = ValidationReasons::new("a failed", ["b failed".to_string()]);

        assert_eq!(reasons.to_string(), "a failed, b failed");
        assert_eq!(reasons.into_vec(), vec!["a failed", "b failed"]);
    }
}
