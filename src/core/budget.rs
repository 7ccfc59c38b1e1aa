//! Token budget rules shared by the session and the input layer.

use crate::core::error::ValidationError;
use crate::core::models::ModelDescriptor;

pub const MIN_MAX_TOKENS: u32 = 512;
pub const MAX_TOKENS_STEP: u32 = 512;
const DEFAULT_MAX_TOKENS_CAP: u32 = 32768;

pub fn default_for(model: &ModelDescriptor) -> u32 {
    model.max_tokens.min(DEFAULT_MAX_TOKENS_CAP)
}

pub fn validate(requested: u32, model: &ModelDescriptor) -> Result<u32, ValidationError> {
    if (MIN_MAX_TOKENS..=model.max_tokens).contains(&requested) {
        Ok(requested)
    } else {
        Err(ValidationError::MaxTokensOutOfRange {
            model: model.id.clone(),
            requested,
            min: MIN_MAX_TOKENS,
            max: model.max_tokens,
        })
    }
}

/// Snaps `requested` down to a whole step and into the model's range.
pub fn clamp(requested: u32, model: &ModelDescriptor) -> u32 {
    let snapped = requested - requested % MAX_TOKENS_STEP;
    snapped.clamp(MIN_MAX_TOKENS, model.max_tokens.max(MIN_MAX_TOKENS))
}

/// Moves the budget by `steps` whole steps, staying in range.
pub fn step(current: u32, steps: i32, model: &ModelDescriptor) -> u32 {
    let delta = MAX_TOKENS_STEP.saturating_mul(steps.unsigned_abs());
    let moved = if steps >= 0 {
        current.saturating_add(delta)
    } else {
        current.saturating_sub(delta)
    };
    clamp(moved, model)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model(max_tokens: u32) -> ModelDescriptor {
        ModelDescriptor {
            id: "test".to_string(),
            display_name: "Test".to_string(),
            max_tokens,
            developer: "Tests".to_string(),
        }
    }

    #[test]
    fn default_caps_at_32768() {
        assert_eq!(default_for(&model(8192)), 8192);
        assert_eq!(default_for(&model(32768)), 32768);
        assert_eq!(default_for(&model(131072)), 32768);
    }

    #[test]
    fn validate_accepts_inclusive_bounds() {
        let m = model(4096);
        assert_eq!(validate(512, &m), Ok(512));
        assert_eq!(validate(4096, &m), Ok(4096));
        assert!(validate(511, &m).is_err());
        assert!(validate(4097, &m).is_err());
    }

    #[test]
    fn validate_reports_range() {
        let err = validate(9000, &model(8192)).unwrap_err();
        assert_eq!(
            err,
            ValidationError::MaxTokensOutOfRange {
                model: "test".to_string(),
                requested: 9000,
                min: 512,
                max: 8192,
            }
        );
    }

    #[test]
    fn clamp_snaps_to_steps_inside_range() {
        let m = model(8192);
        assert_eq!(clamp(0, &m), 512);
        assert_eq!(clamp(1000, &m), 512);
        assert_eq!(clamp(1024, &m), 1024);
        assert_eq!(clamp(1500, &m), 1024);
        assert_eq!(clamp(100_000, &m), 8192);
    }

    #[test]
    fn step_moves_and_saturates() {
        let m = model(2048);
        assert_eq!(step(512, 1, &m), 1024);
        assert_eq!(step(2048, 1, &m), 2048);
        assert_eq!(step(1024, -1, &m), 512);
        assert_eq!(step(512, -3, &m), 512);
    }
}
