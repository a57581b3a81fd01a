// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! Simulated annealing.
//!
//! Worsening swaps are accepted with the Metropolis probability
//! `exp(-(candidate - current) / temperature)`, so the search can climb out
//! of local optima while the temperature is high and settles into strict
//! descent as it cools. Temperature management lives in a separate
//! [`CoolingSchedule`], so schedules can be swapped without touching the
//! acceptance logic.
//!
//! Strict improvements are always accepted. Once the schedule reports itself
//! frozen, or the temperature drops below `1e-9`, everything else is rejected
//! and no floating point work is done. The schedule advances after every
//! evaluated swap, accepted or not.
//!
//! Annealing may leave the current assignment above the best one seen. The
//! engine keeps track of the best assignment and restores it at the end of the
//! run.

use crate::acceptance::AcceptanceCriterion;
use rand::Rng;
use rankmap_core::num::CostNumeric;
use rankmap_model::error::ConfigError;

/// Temperature over the course of a run.
pub trait CoolingSchedule: std::fmt::Debug {
    /// Resets the temperature to its initial value.
    fn on_start(&mut self);

    /// Advances the temperature by one step.
    fn update(&mut self);

    /// Returns the current temperature.
    fn current(&self) -> f64;

    /// Returns `true` once worsening swaps should no longer be considered.
    fn is_frozen(&self) -> bool;
}

fn check_temperatures(initial: f64, min_temp: f64) -> Result<(), ConfigError> {
    if !initial.is_finite() || initial < 0.0 {
        return Err(ConfigError::InvalidAnnealingSchedule(format!(
            "initial temperature must be finite and non-negative, got {}",
            initial
        )));
    }
    if !min_temp.is_finite() || min_temp < 0.0 {
        return Err(ConfigError::InvalidAnnealingSchedule(format!(
            "minimum temperature must be finite and non-negative, got {}",
            min_temp
        )));
    }
    Ok(())
}

/// `T_{k+1} = T_k * alpha`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeometricCooling {
    initial: f64,
    current: f64,
    alpha: f64,
    min_temp: f64,
}

impl GeometricCooling {
    /// Creates a geometric schedule.
    ///
    /// # Panics
    ///
    /// Panics if `alpha` is not strictly between `0.0` and `1.0`.
    #[inline]
    pub fn new(initial: f64, alpha: f64, min_temp: f64) -> Self {
        assert!(
            alpha > 0.0 && alpha < 1.0,
            "called `GeometricCooling::new` with invalid alpha: {}. Must be in (0.0, 1.0)",
            alpha
        );
        Self {
            initial,
            current: initial,
            alpha,
            min_temp,
        }
    }

    /// Creates a geometric schedule, validating every parameter.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidAnnealingSchedule`] if `alpha` is outside
    /// `(0, 1)` or a temperature is negative or not finite.
    pub fn try_new(initial: f64, alpha: f64, min_temp: f64) -> Result<Self, ConfigError> {
        if !(alpha > 0.0 && alpha < 1.0) {
            return Err(ConfigError::InvalidAnnealingSchedule(format!(
                "cooling rate must be in (0, 1), got {}",
                alpha
            )));
        }
        check_temperatures(initial, min_temp)?;
        Ok(Self::new(initial, alpha, min_temp))
    }

    #[inline]
    pub fn alpha(&self) -> f64 {
        self.alpha
    }
}

impl CoolingSchedule for GeometricCooling {
    #[inline]
    fn on_start(&mut self) {
        self.current = self.initial;
    }

    #[inline]
    fn update(&mut self) {
        self.current *= self.alpha;
    }

    #[inline]
    fn current(&self) -> f64 {
        self.current
    }

    #[inline]
    fn is_frozen(&self) -> bool {
        self.current <= self.min_temp
    }
}

/// `T_{k+1} = max(0, T_k - decrement)`.
///
/// Useful with an evaluation budget: choose `decrement = initial / budget` to
/// reach zero exactly when the budget runs out.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearCooling {
    initial: f64,
    current: f64,
    decrement: f64,
    min_temp: f64,
}

impl LinearCooling {
    #[inline]
    pub fn new(initial: f64, decrement: f64, min_temp: f64) -> Self {
        Self {
            initial,
            current: initial,
            decrement,
            min_temp,
        }
    }
}

impl CoolingSchedule for LinearCooling {
    #[inline]
    fn on_start(&mut self) {
        self.current = self.initial;
    }

    /// Decreases the temperature by the fixed decrement, clamped at zero.
    #[inline]
    fn update(&mut self) {
        self.current = (self.current - self.decrement).max(0.0);
    }

    #[inline]
    fn current(&self) -> f64 {
        self.current
    }

    #[inline]
    fn is_frozen(&self) -> bool {
        self.current <= self.min_temp
    }
}

/// Metropolis acceptance driven by a [`CoolingSchedule`].
#[derive(Debug, Clone)]
pub struct SimulatedAnnealing<R, C> {
    cooling_schedule: C,
    rng: R,
}

impl<R, C> SimulatedAnnealing<R, C>
where
    R: Rng,
    C: CoolingSchedule,
{
    #[inline]
    pub fn new(cooling_schedule: C, rng: R) -> Self {
        Self {
            cooling_schedule,
            rng,
        }
    }

    #[inline]
    pub fn cooling_schedule(&self) -> &C {
        &self.cooling_schedule
    }

    /// Returns the current temperature.
    #[inline]
    pub fn temperature(&self) -> f64 {
        self.cooling_schedule.current()
    }
}

impl<T, R, C> AcceptanceCriterion<T> for SimulatedAnnealing<R, C>
where
    T: CostNumeric,
    R: Rng,
    C: CoolingSchedule,
{
    fn name(&self) -> &str {
        "SimulatedAnnealing"
    }

    fn on_start(&mut self) {
        self.cooling_schedule.on_start();
    }

    fn should_accept(&mut self, current: T, candidate: T) -> bool {
        if candidate < current {
            return true;
        }
        if self.cooling_schedule.is_frozen() {
            return false;
        }

        let (candidate, current) = match (candidate.to_f64(), current.to_f64()) {
            (Some(cand), Some(curr)) => (cand, curr),
            _ => return false,
        };
        let temperature = self.cooling_schedule.current();
        if temperature <= 1e-9 {
            return false;
        }

        let probability = (-(candidate - current) / temperature).exp();
        if !probability.is_finite() {
            return false;
        }
        self.rng.random_bool(probability.clamp(0.0, 1.0))
    }

    #[inline]
    fn on_accept(&mut self) {
        self.cooling_schedule.update();
    }

    #[inline]
    fn on_reject(&mut self) {
        // time passes either way
        self.cooling_schedule.update();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(42)
    }

    #[test]
    fn test_geometric_cooling_decays_and_resets() {
        let mut c = GeometricCooling::new(10.0, 0.5, 1.0);
        c.update();
        assert_eq!(c.current(), 5.0);
        c.update();
        c.update();
        assert_eq!(c.current(), 1.25);
        assert!(!c.is_frozen());
        c.update();
        assert!(c.is_frozen());
        c.on_start();
        assert_eq!(c.current(), 10.0);
    }

    #[test]
    #[should_panic(expected = "invalid alpha")]
    fn test_geometric_cooling_rejects_alpha_one() {
        let _ = GeometricCooling::new(1.0, 1.0, 0.0);
    }

    #[test]
    fn test_geometric_try_new_validates() {
        assert!(GeometricCooling::try_new(10.0, 0.9, 0.1).is_ok());
        assert!(matches!(
            GeometricCooling::try_new(10.0, 0.0, 0.1),
            Err(ConfigError::InvalidAnnealingSchedule(_))
        ));
        assert!(matches!(
            GeometricCooling::try_new(f64::NAN, 0.5, 0.1),
            Err(ConfigError::InvalidAnnealingSchedule(_))
        ));
        assert!(matches!(
            GeometricCooling::try_new(1.0, 0.5, -1.0),
            Err(ConfigError::InvalidAnnealingSchedule(_))
        ));
    }

    #[test]
    fn test_linear_cooling_clamps_at_zero() {
        let mut c = LinearCooling::new(1.0, 0.4, 0.0);
        c.update();
        c.update();
        c.update();
        assert_eq!(c.current(), 0.0);
        assert!(c.is_frozen());
    }

    #[test]
    fn test_strict_improvement_always_accepted() {
        let mut sa = SimulatedAnnealing::new(GeometricCooling::new(1.0, 0.9, 2.0), rng());
        AcceptanceCriterion::<i64>::on_start(&mut sa);
        assert!(sa.should_accept(100i64, 99));
    }

    #[test]
    fn test_frozen_rejects_equal_and_worse() {
        let mut sa = SimulatedAnnealing::new(GeometricCooling::new(1.0, 0.9, 1.0), rng());
        AcceptanceCriterion::<i64>::on_start(&mut sa);
        assert!(!sa.should_accept(100i64, 100));
        assert!(!sa.should_accept(100i64, 101));
    }

    #[test]
    fn test_equal_cost_accepted_while_hot() {
        let mut sa = SimulatedAnnealing::new(LinearCooling::new(100.0, 0.0, 0.0), rng());
        AcceptanceCriterion::<i64>::on_start(&mut sa);
        assert!(sa.should_accept(100i64, 100));
    }

    #[test]
    fn test_zero_temperature_rejects_worse() {
        let mut sa = SimulatedAnnealing::new(LinearCooling::new(0.0, 0.0, -1.0), rng());
        AcceptanceCriterion::<i64>::on_start(&mut sa);
        assert!(!sa.should_accept(100i64, 120));
    }

    #[test]
    fn test_huge_worsening_is_rejected_when_cool() {
        let mut sa = SimulatedAnnealing::new(LinearCooling::new(1.0, 0.0, 0.0), rng());
        AcceptanceCriterion::<i64>::on_start(&mut sa);
        // exp(-1000) underflows to zero
        for _ in 0..100 {
            assert!(!sa.should_accept(0i64, 1000));
        }
    }

    #[test]
    fn test_temperature_advances_on_accept_and_reject() {
        let mut sa = SimulatedAnnealing::new(GeometricCooling::new(8.0, 0.5, 0.0), rng());
        AcceptanceCriterion::<i64>::on_start(&mut sa);
        AcceptanceCriterion::<i64>::on_accept(&mut sa);
        assert_eq!(sa.temperature(), 4.0);
        AcceptanceCriterion::<i64>::on_reject(&mut sa);
        assert_eq!(sa.temperature(), 2.0);
        AcceptanceCriterion::<i64>::on_start(&mut sa);
        assert_eq!(sa.temperature(), 8.0);
    }
}
