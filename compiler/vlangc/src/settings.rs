//! Evaluator settings taken from the environment.

use vlang_eval::EvalConfig;

pub const MAX_DEPTH_VAR: &str = "VLANG_MAX_DEPTH";
pub const FLOAT_PRECISION_VAR: &str = "VLANG_FLOAT_PRECISION";

/// Build the run configuration from `VLANG_MAX_DEPTH` and
/// `VLANG_FLOAT_PRECISION`, falling back to the defaults.
pub fn config_from_env() -> EvalConfig {
    config_from(|name| std::env::var(name).ok())
}

/// Same as [`config_from_env`] with an explicit variable source.
pub fn config_from(lookup: impl Fn(&str) -> Option<String>) -> EvalConfig {
    let mut config = EvalConfig::default().with_echo(true);
    if let Some(depth) = setting(&lookup, MAX_DEPTH_VAR) {
        if depth == 0 {
            eprintln!("warning: {MAX_DEPTH_VAR} must be at least 1; using the default");
        } else {
            config = config.with_max_call_depth(depth);
        }
    }
    if let Some(precision) = setting(&lookup, FLOAT_PRECISION_VAR) {
        config = config.with_float_precision(precision);
    }
    config
}

fn setting(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Option<usize> {
    let raw = lookup(name)?;
    match raw.trim().parse::<usize>() {
        Ok(value) => Some(value),
        Err(_) => {
            eprintln!("warning: ignoring {name}={raw}: expected a non-negative integer");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn config_with(vars: &[(&str, &str)]) -> EvalConfig {
        config_from(|name| {
            vars.iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| (*value).to_owned())
        })
    }

    #[test]
    fn defaults_echo_to_the_terminal() {
        let config = config_with(&[]);
        assert!(config.echo_console);
        assert_eq!(config.max_call_depth, EvalConfig::DEFAULT_MAX_CALL_DEPTH);
        assert_eq!(config.float_precision, EvalConfig::DEFAULT_FLOAT_PRECISION);
    }

    #[test]
    fn variables_override_defaults() {
        let config = config_with(&[(MAX_DEPTH_VAR, "64"), (FLOAT_PRECISION_VAR, " 2 ")]);
        assert_eq!(config.max_call_depth, 64);
        assert_eq!(config.float_precision, 2);
    }

    #[test]
    fn invalid_values_are_ignored() {
        let config = config_with(&[(MAX_DEPTH_VAR, "0"), (FLOAT_PRECISION_VAR, "lots")]);
        assert_eq!(config.max_call_depth, EvalConfig::DEFAULT_MAX_CALL_DEPTH);
        assert_eq!(config.float_precision, EvalConfig::DEFAULT_FLOAT_PRECISION);
    }
}
