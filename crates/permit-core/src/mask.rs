//! Pure bitmask algebra over action masks.
//!
//! A mask is a non-negative `i32` whose set bits each correspond to one
//! defined action of a resource type. Every function here is stateless;
//! negative inputs fail with `InvalidArgument` since the sign bit can
//! never represent an action.

use permit_contracts::{
    action::MAX_ACTION_BIT,
    error::{PermitError, PermitResult},
};

/// True iff `v` is a positive power of two, i.e. a single set bit.
pub fn is_power_of_two(v: i32) -> bool {
    v > 0 && (v & (v - 1)) == 0
}

/// Validate a candidate action bit value: a power of two no higher than
/// [`MAX_ACTION_BIT`].
///
/// Registries call this before any definition is applied.
pub fn check_bit_value(v: i32) -> PermitResult<()> {
    if !is_power_of_two(v) {
        return Err(PermitError::invalid(format!(
            "action bit value must be a power of two: {v}"
        )));
    }
    if v > MAX_ACTION_BIT {
        return Err(PermitError::invalid(format!(
            "action bit value {v} exceeds the maximum of {MAX_ACTION_BIT}"
        )));
    }
    Ok(())
}

/// OR-reduce a list of masks. An empty list combines to 0.
pub fn combine(masks: &[i32]) -> PermitResult<i32> {
    let mut out = 0;
    for &m in masks {
        check_non_negative(m)?;
        out |= m;
    }
    Ok(out)
}

/// True iff `mask` contains every bit of `required`.
///
/// This is the fundamental "does this permission set satisfy this
/// requirement" test; `required` may be a single action bit or an OR of
/// several.
pub fn has_all(mask: i32, required: i32) -> PermitResult<bool> {
    check_non_negative(mask)?;
    check_non_negative(required)?;
    Ok((mask & required) == required)
}

/// Add `bits` to `mask`.
pub fn add(mask: i32, bits: i32) -> PermitResult<i32> {
    check_non_negative(mask)?;
    check_non_negative(bits)?;
    Ok(mask | bits)
}

/// Remove `bits` from `mask`. Removing bits not present is a no-op.
pub fn remove(mask: i32, bits: i32) -> PermitResult<i32> {
    check_non_negative(mask)?;
    check_non_negative(bits)?;
    Ok(mask & !bits)
}

fn check_non_negative(v: i32) -> PermitResult<()> {
    if v < 0 {
        return Err(PermitError::invalid(format!("mask value must not be negative: {v}")));
    }
    Ok(())
}
