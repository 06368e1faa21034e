//! Configuration validation utilities.
//!
//! Backends receive their configuration as a raw TOML table. Each backend
//! describes the keys it understands with a [`Schema`], which is checked
//! before the backend is put to use.

use thiserror::Error;

/// Errors that can occur during configuration validation.
#[derive(Debug, Error)]
pub enum ValidationError {
	/// Error that occurs when a field has an invalid value.
	#[error("Invalid value for field '{field}': {message}")]
	InvalidValue { field: String, message: String },
	/// Error that occurs when field type is incorrect.
	#[error("Type mismatch for field '{field}': expected {expected}, got {actual}")]
	TypeMismatch {
		field: String,
		expected: String,
		actual: String,
	},
}

/// Type alias for field validator functions.
pub type FieldValidator = Box<dyn Fn(&str) -> Result<(), String> + Send + Sync>;

/// A named string field with an optional custom validator.
pub struct Field {
	pub name: String,
	pub validator: Option<FieldValidator>,
}

impl std::fmt::Debug for Field {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Field")
			.field("name", &self.name)
			.field("validator", &self.validator.is_some())
			.finish()
	}
}

impl Field {
	/// Creates a new string field with the given name.
	pub fn string(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			validator: None,
		}
	}

	/// Adds a custom validator that runs after the type check passes.
	pub fn with_validator<F>(mut self, validator: F) -> Self
	where
		F: Fn(&str) -> Result<(), String> + Send + Sync + 'static,
	{
		self.validator = Some(Box::new(validator));
		self
	}

	fn validate(&self, value: &toml::Value) -> Result<(), ValidationError> {
		let text = value
			.as_str()
			.ok_or_else(|| ValidationError::TypeMismatch {
				field: self.name.clone(),
				expected: "string".to_string(),
				actual: value.type_str().to_string(),
			})?;

		if let Some(validator) = &self.validator {
			validator(text).map_err(|message| ValidationError::InvalidValue {
				field: self.name.clone(),
				message,
			})?;
		}

		Ok(())
	}
}

/// Validation schema made of optional fields.
///
/// Every backend setting has a default, so a field is only checked when the
/// table carries it.
#[derive(Debug, Default)]
pub struct Schema {
	pub fields: Vec<Field>,
}

impl Schema {
	/// Creates a new schema with the given fields.
	pub fn new(fields: Vec<Field>) -> Self {
		Self { fields }
	}

	/// Validates a TOML table against this schema.
	///
	/// Unknown keys are ignored so backends can evolve independently.
	pub fn validate(&self, config: &toml::Value) -> Result<(), ValidationError> {
		let table = match config {
			toml::Value::Table(table) => table,
			other => {
				return Err(ValidationError::TypeMismatch {
					field: "<root>".to_string(),
					expected: "table".to_string(),
					actual: other.type_str().to_string(),
				})
			},
		};

		for field in &self.fields {
			if let Some(value) = table.get(&field.name) {
				field.validate(value)?;
			}
		}

		Ok(())
	}
}

/// Trait implemented by configuration schemas of pluggable backends.
pub trait ConfigSchema: Send + Sync {
	/// Validates the given configuration table.
	fn validate(&self, config: &toml::Value) -> Result<(), ValidationError>;
}

#[cfg(test)]
mod tests {
	use super::*;

	fn table(src: &str) -> toml::Value {
		toml::Value::Table(toml::from_str::<toml::Table>(src).unwrap())
	}

	#[test]
	fn test_non_table_root() {
		let result = Schema::default().validate(&toml::Value::Integer(3));
		assert!(matches!(result, Err(ValidationError::TypeMismatch { field, .. }) if field == "<root>"));
	}

	#[test]
	fn test_type_mismatch() {
		let schema = Schema::new(vec![Field::string("path")]);
		let result = schema.validate(&table("path = 3"));
		assert!(matches!(result, Err(ValidationError::TypeMismatch { .. })));
	}

	#[test]
	fn test_custom_validator_and_absent_fields() {
		let schema = Schema::new(vec![Field::string("name").with_validator(|value| {
			if value.is_empty() {
				Err("must not be empty".into())
			} else {
				Ok(())
			}
		})]);

		assert!(schema.validate(&table("name = \"depot\"")).is_ok());
		assert!(matches!(
			schema.validate(&table("name = \"\"")),
			Err(ValidationError::InvalidValue { .. })
		));
		assert!(schema.validate(&table("other = true")).is_ok());
		assert!(schema.validate(&table("")).is_ok());
	}
}
