/// Errors raised while building or querying a [`SchemaRegistry`](super::SchemaRegistry).
///
/// These are configuration mistakes: they surface when the registry or an
/// [`ApiRequestFn`](crate::ApiRequestFn) is built, never during a request.
#[derive(Debug, derive_more::Error, derive_more::Display)]
pub enum SchemaError {
    /// The schema name was never registered.
    #[display("Unknown schema '{name}'")]
    UnknownSchema {
        /// The requested schema name.
        name: String,
    },

    /// The schema document could not be compiled into a validator.
    #[display("Invalid schema '{name}': {message}")]
    InvalidSchema {
        /// The name the schema was registered under.
        name: String,
        /// The compiler error.
        message: String,
    },

    /// A Rust type schema could not be converted into a JSON document.
    #[display("Failed to serialize schema '{name}': {error}")]
    Serialization {
        /// The name the schema was registered under.
        name: String,
        /// The underlying serialization error.
        error: serde_json::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_error_is_send_and_sync() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}

        assert_send::<SchemaError>();
        assert_sync::<SchemaError>();
    }

    #[test]
    fn should_display_unknown_schema() {
        let error = SchemaError::UnknownSchema {
            name: "Missing".to_string(),
        };

        insta::assert_snapshot!(error, @"Unknown schema 'Missing'");
    }
}
