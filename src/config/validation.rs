//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check the base URI parses and route templates are well-formed
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Validation is a pure function: ClientConfig → Result<(), Vec<ValidationError>>
//! - Runs before a config is handed to the client

use thiserror::Error;
use url::Url;

use crate::config::schema::ClientConfig;
use crate::route::template::placeholder_name;

/// A single semantic problem found in a configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("base_uri is empty")]
    EmptyBaseUri,

    #[error("base_uri is not a valid URL: {0}")]
    InvalidBaseUri(String),

    #[error("route {index}: path has no segments")]
    EmptyRoutePath { index: usize },

    #[error("route {index}: malformed placeholder segment \"{segment}\"")]
    MalformedPlaceholder { index: usize, segment: String },

    #[error("header name is empty")]
    EmptyHeaderName,
}

/// Validate a configuration, collecting every problem found.
pub fn validate_config(config: &ClientConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.base_uri.is_empty() {
        errors.push(ValidationError::EmptyBaseUri);
    } else if let Err(e) = Url::parse(&config.base_uri) {
        errors.push(ValidationError::InvalidBaseUri(e.to_string()));
    }

    for (index, spec) in config.routes.iter().enumerate() {
        let segments: Vec<&str> = spec.path.split('/').filter(|s| !s.is_empty()).collect();
        if segments.is_empty() {
            errors.push(ValidationError::EmptyRoutePath { index });
            continue;
        }

        for segment in segments {
            // `${` must pair with a closing brace to form a placeholder.
            let looks_templated = segment.starts_with("${") || segment.ends_with('}');
            if looks_templated && placeholder_name(segment).is_none() {
                errors.push(ValidationError::MalformedPlaceholder {
                    index,
                    segment: segment.to_string(),
                });
            }
        }
    }

    if config.headers.keys().any(|name| name.is_empty()) {
        errors.push(ValidationError::EmptyHeaderName);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
