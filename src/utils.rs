use crate::data::FloatData;
use crate::errors::RobustWarpError;

// Validation
pub fn validate_unit_interval_parameter<T: FloatData<T>>(value: T, parameter: &str) -> Result<(), RobustWarpError> {
    validate_float_parameter(value, T::ZERO, T::ONE, parameter)
}

pub fn validate_finite_parameter<T: FloatData<T>>(value: T, parameter: &str) -> Result<(), RobustWarpError> {
    validate_float_parameter(value, T::MIN, T::MAX, parameter)
}

pub fn validate_float_parameter<T: FloatData<T>>(
    value: T,
    min: T,
    max: T,
    parameter: &str,
) -> Result<(), RobustWarpError> {
    if value.is_nan() || value < min || max < value {
        let ex_msg = format!("real value within range {} and {}", min, max);
        Err(RobustWarpError::InvalidParameter(
            parameter.to_string(),
            ex_msg,
            value.to_string(),
        ))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_unit_interval() {
        assert!(validate_unit_interval_parameter(0.9, "discount_factor").is_ok());
        assert!(validate_unit_interval_parameter(0.0, "discount_factor").is_ok());
        assert!(validate_unit_interval_parameter(1.5, "discount_factor").is_err());
        assert!(validate_unit_interval_parameter(-0.1, "discount_factor").is_err());
        assert!(validate_unit_interval_parameter(f64::NAN, "discount_factor").is_err());
    }

    #[test]
    fn test_validate_finite() {
        assert!(validate_finite_parameter(-0.8, "discount_margin").is_ok());
        assert!(validate_finite_parameter(f64::INFINITY, "discount_margin").is_err());
        assert!(validate_finite_parameter(f64::NAN, "discount_margin").is_err());
    }
}
