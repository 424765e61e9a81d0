/// Invalid tracking parameters.
#[derive(thiserror::Error, Clone, Debug, PartialEq)]
pub enum ConfigError {
    #[error("{name} must be positive and finite (got {value})")]
    NonPositive { name: &'static str, value: f64 },
    #[error("working volume is empty on the {axis} axis (min={min}, max={max})")]
    EmptyRange { axis: char, min: f64, max: f64 },
}

/// Accept `value` only if it is finite and strictly positive.
pub fn ensure_positive(name: &'static str, value: f64) -> Result<f64, ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(ConfigError::NonPositive { name, value })
    }
}
