//! Validation module
//!
//! Table and column names reach SQL text directly, so every name the facade
//! emits goes through [`Identifier`] first. Names are always rendered quoted,
//! which keeps keywords such as `order` or `date` usable as column names.

use std::fmt;

/// Validation errors for database identifiers
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Name contains invalid characters (only alphanumeric and underscore allowed)
    InvalidCharacters(String),
    /// Name is too long (PostgreSQL limit is 63 characters)
    TooLong {
        name: String,
        length: usize,
        max_length: usize,
    },
    /// Name is empty
    Empty,
    /// Name starts with invalid character (must start with letter or underscore)
    InvalidStartCharacter(String),
    /// Cast target is not a plain type name
    InvalidType(String),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::InvalidCharacters(name) => {
                write!(f, "Invalid characters in name '{}': only alphanumeric characters and underscores are allowed", name)
            }
            ValidationError::TooLong {
                name,
                length,
                max_length,
            } => {
                write!(
                    f,
                    "Name '{}' is too long: {} characters (max {})",
                    name, length, max_length
                )
            }
            ValidationError::Empty => {
                write!(f, "Name cannot be empty")
            }
            ValidationError::InvalidStartCharacter(name) => {
                write!(f, "Name '{}' must start with a letter or underscore", name)
            }
            ValidationError::InvalidType(name) => {
                write!(f, "'{}' is not a usable column type", name)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// A validated table or column name that is safe to place in SQL text
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identifier(String);

impl Identifier {
    /// PostgreSQL identifier length limit
    pub const MAX_LENGTH: usize = 63;

    pub fn new(name: &str) -> Result<Self, ValidationError> {
        Self::validate(name)?;
        Ok(Self(name.to_string()))
    }

    /// The bare name as given
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The name as it appears in generated SQL
    pub fn quoted(&self) -> String {
        format!("\"{}\"", self.0)
    }

    fn validate(name: &str) -> Result<(), ValidationError> {
        let first_char = name.chars().next().ok_or(ValidationError::Empty)?;

        if name.len() > Self::MAX_LENGTH {
            return Err(ValidationError::TooLong {
                name: name.to_string(),
                length: name.len(),
                max_length: Self::MAX_LENGTH,
            });
        }

        if !first_char.is_ascii_alphabetic() && first_char != '_' {
            return Err(ValidationError::InvalidStartCharacter(name.to_string()));
        }

        if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(ValidationError::InvalidCharacters(name.to_string()));
        }

        Ok(())
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A PostgreSQL type name that parameters can be cast to, e.g. `uuid`,
/// `timestamp with time zone` or `text[]`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SqlType(String);

impl SqlType {
    pub fn new(name: &str) -> Result<Self, ValidationError> {
        let base = name.strip_suffix("[]").unwrap_or(name);
        let valid = base.starts_with(|c: char| c.is_ascii_alphabetic())
            && base
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == ' ')
            && !base.ends_with(' ')
            && name.len() <= Identifier::MAX_LENGTH;

        if !valid {
            return Err(ValidationError::InvalidType(name.to_string()));
        }
        Ok(Self(name.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Render a column list, passing `*` through untouched.
pub(crate) fn column_list(columns: &[String]) -> Result<String, ValidationError> {
    if columns.is_empty() || columns.iter().any(|c| c == "*") {
        return Ok("*".to_string());
    }

    let quoted = columns
        .iter()
        .map(|c| Identifier::new(c).map(|id| id.quoted()))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(quoted.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_names() {
        let valid_names = [
            "users",
            "user_profiles",
            "UserProfiles",
            "_id",
            "_updated_at",
            "order",
            "a",
            &"a".repeat(63),
        ];

        for name in valid_names {
            assert!(
                Identifier::new(name).is_ok(),
                "Should accept valid name: {}",
                name
            );
        }
    }

    #[test]
    fn test_invalid_names() {
        let test_cases = [
            ("", ValidationError::Empty),
            (
                "123table",
                ValidationError::InvalidStartCharacter("123table".to_string()),
            ),
            (
                "user-name",
                ValidationError::InvalidCharacters("user-name".to_string()),
            ),
            (
                "name\"; DROP TABLE users; --",
                ValidationError::InvalidCharacters("name\"; DROP TABLE users; --".to_string()),
            ),
        ];

        for (name, expected_error) in test_cases {
            let result = Identifier::new(name);
            assert_eq!(result.unwrap_err(), expected_error, "name: {}", name);
        }
    }

    #[test]
    fn test_too_long_name() {
        let long_name = "a".repeat(64);
        match Identifier::new(&long_name).unwrap_err() {
            ValidationError::TooLong {
                length, max_length, ..
            } => {
                assert_eq!(length, 64);
                assert_eq!(max_length, 63);
            }
            other => panic!("Expected TooLong error, got {:?}", other),
        }
    }

    #[test]
    fn test_quoting() {
        let id = Identifier::new("_change").unwrap();
        assert_eq!(id.quoted(), "\"_change\"");
        assert_eq!(format!("{}", id), "_change");
    }

    #[test]
    fn test_sql_types() {
        for name in ["uuid", "timestamptz", "timestamp with time zone", "text[]", "int8"] {
            assert_eq!(SqlType::new(name).unwrap().as_str(), name);
        }
        for name in ["", "[]", "uuid; DROP TABLE x", "text)", "8bit", "uuid "] {
            assert_eq!(
                SqlType::new(name).unwrap_err(),
                ValidationError::InvalidType(name.to_string()),
                "name: {}",
                name
            );
        }
    }

    #[test]
    fn test_column_list() {
        assert_eq!(column_list(&[]).unwrap(), "*");
        assert_eq!(column_list(&["*".to_string()]).unwrap(), "*");
        assert_eq!(
            column_list(&["_id".to_string(), "name".to_string()]).unwrap(),
            "\"_id\", \"name\""
        );
        assert!(column_list(&["bad name".to_string()]).is_err());
    }
}
