//! Environment variable expansion for configuration strings.

use crate::ConfigError;

/// Expand `${VAR}` and `${VAR:-default}` references in a config value.
///
/// Values without `${` are returned unchanged, so bare `$` characters in
/// literal strings survive. An unset variable without a default is an error
/// naming `field`.
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    if !value.contains("${") {
        return Ok(value.to_owned());
    }

    shellexpand::env_with_context(value, |var| -> Result<Option<String>, LookupError> {
        std::env::var(var).map(Some).map_err(|_| LookupError {
            var_name: var.to_owned(),
        })
    })
    .map(std::borrow::Cow::into_owned)
    .map_err(|e| ConfigError::EnvVar {
        field: field.to_owned(),
        message: format!("${{{}}} not set", e.cause.var_name),
    })
}

struct LookupError {
    var_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_var() {
        // SAFETY: variable name is unique to this test
        unsafe {
            std::env::set_var("MDSERVER_TEST_LISTEN_HOST", "0.0.0.0");
        }
        let result = expand_env("${MDSERVER_TEST_LISTEN_HOST}:3000", "server.listen").unwrap();
        assert_eq!(result, "0.0.0.0:3000");
        unsafe {
            std::env::remove_var("MDSERVER_TEST_LISTEN_HOST");
        }
    }

    #[test]
    fn test_expand_default_when_unset() {
        // SAFETY: variable name is unique to this test
        unsafe {
            std::env::remove_var("MDSERVER_TEST_UNSET_PORT");
        }
        let result = expand_env("127.0.0.1:${MDSERVER_TEST_UNSET_PORT:-8080}", "server.listen")
            .unwrap();
        assert_eq!(result, "127.0.0.1:8080");
    }

    #[test]
    fn test_missing_var_names_field() {
        // SAFETY: variable name is unique to this test
        unsafe {
            std::env::remove_var("MDSERVER_TEST_MISSING");
        }
        let err = expand_env("${MDSERVER_TEST_MISSING}", "server.listen").unwrap_err();
        assert!(matches!(err, ConfigError::EnvVar { .. }));
        assert!(err.to_string().contains("MDSERVER_TEST_MISSING"));
        assert!(err.to_string().contains("server.listen"));
    }

    #[test]
    fn test_literal_unchanged() {
        assert_eq!(
            expand_env("127.0.0.1:3000", "server.listen").unwrap(),
            "127.0.0.1:3000"
        );
        assert_eq!(expand_env("$HOME", "server.listen").unwrap(), "$HOME");
    }
}
