use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use crate::error::{FmbdError, FmbdResult};

/// `(time, item_index, local_params) -> value` (spec §6 "User-function
/// ABI"). `Arc` rather than `Box` so a `Load` carrying one stays `Clone`
/// the way the rest of the item schema does.
pub type UserFunction = Arc<dyn Fn(f64, usize, &[f64]) -> f64 + Send + Sync>;

/// A `Load`'s optional user-function override, serde-transparent: item
/// files describe loads structurally, never as a serialized closure, so
/// this slot is always `None` coming off disk and is only ever set by
/// code assembling a `System` programmatically.
#[derive(Clone, Default)]
pub struct UserFunctionSlot(pub Option<UserFunction>);

impl std::fmt::Debug for UserFunctionSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.0 {
            Some(_) => f.write_str("UserFunctionSlot(Some(<fn>))"),
            None => f.write_str("UserFunctionSlot(None)"),
        }
    }
}

impl UserFunctionSlot {
    pub fn none() -> Self {
        Self(None)
    }

    pub fn some(f: UserFunction) -> Self {
        Self(Some(f))
    }

    /// Applies the wrapped user function, if any, shielded against
    /// panics/non-finite results; falls through to `base_value`
    /// unmodified when no user function is attached.
    pub fn resolve(&self, time: f64, item_index: usize, base_value: f64) -> f64 {
        match &self.0 {
            Some(f) => match call_shielded(f, time, item_index, &[base_value]) {
                Ok(v) => v,
                Err(err) => {
                    tracing::warn!(item_index, %err, "user function failed, falling back to base load value");
                    base_value
                }
            },
            None => base_value,
        }
    }
}

/// Invokes a user function under an exception shield: a panic inside
/// the callback is converted into a `FmbdError::UserFunction` instead of
/// unwinding into the solver (spec §6/§7).
pub fn call_shielded(f: &UserFunction, time: f64, item_index: usize, params: &[f64]) -> FmbdResult<f64> {
    match catch_unwind(AssertUnwindSafe(|| f(time, item_index, params))) {
        Ok(value) if value.is_finite() => Ok(value),
        Ok(value) => Err(FmbdError::user_function(item_index, format!("user function returned non-finite value {value}"))),
        Err(_) => Err(FmbdError::user_function(item_index, "user function panicked")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shields_panicking_user_function() {
        let f: UserFunction = Arc::new(|_t, _i, _p| panic!("boom"));
        let result = call_shielded(&f, 0.0, 3, &[]);
        assert!(result.is_err());
    }

    #[test]
    fn passes_through_finite_values() {
        let f: UserFunction = Arc::new(|t, _i, _p| t * 2.0);
        let result = call_shielded(&f, 2.5, 0, &[]).unwrap();
        assert_eq!(result, 5.0);
    }

    #[test]
    fn slot_resolve_falls_through_when_empty() {
        let slot = UserFunctionSlot::none();
        assert_eq!(slot.resolve(1.0, 0, 7.0), 7.0);
    }

    #[test]
    fn slot_resolve_overrides_base_value() {
        let slot = UserFunctionSlot::some(Arc::new(|t, _i, p| p[0] + t));
        assert_eq!(slot.resolve(2.0, 0, 5.0), 7.0);
    }

    #[test]
    fn slot_resolve_falls_back_on_panic() {
        let slot = UserFunctionSlot::some(Arc::new(|_t, _i, _p| panic!("boom")));
        assert_eq!(slot.resolve(0.0, 0, 3.0), 3.0);
    }
}
