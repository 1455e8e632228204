use num_traits::Float;

/// Blend factor for a first-order response over one time step.
///
/// Clamped to `[0, 1]` so a stalled frame can never overshoot the target.
pub fn response_alpha<T: Float>(gain: T, dt: T) -> T {
    (gain * dt).min(T::one()).max(T::zero())
}

/// Move `value` toward `target` by the blend factor `alpha`.
///
/// With `alpha = response_alpha(gain, dt)` this is an exponential-decay
/// approach that never overshoots for `gain * dt <= 1`.
pub fn approach<T: Float>(value: T, target: T, alpha: T) -> T {
    value + (target - value) * alpha
}
