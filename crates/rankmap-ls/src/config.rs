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

//! Declarative configuration of a local search run.
//!
//! `LocalSearchConfig` names the search space, the acceptance criterion and
//! the run limits as plain values and knows how to build the corresponding
//! trait objects. Random components get independent ChaCha8 streams derived
//! from one seed, so a configuration fully determines a run.
//!
//! ```rust
//! use rankmap_ls::config::{AcceptanceKind, LocalSearchConfig, SearchSpaceKind};
//! use std::time::Duration;
//!
//! let config = LocalSearchConfig::default()
//!     .with_search_space(SearchSpaceKind::Windowed { window: 8 })
//!     .with_seed(7)
//!     .with_time_limit(Duration::from_secs(2));
//! assert!(config.validate().is_ok());
//! assert_eq!(config.acceptance(), AcceptanceKind::GreedyDescent);
//! ```

use crate::{
    acceptance::{
        AcceptanceCriterion,
        greedy_descent::GreedyDescent,
        simulated_annealing::{GeometricCooling, SimulatedAnnealing},
    },
    search_space::{
        SearchSpace, budgeted::BudgetedSearchSpace,
        communication_graph::CommunicationGraphSearchSpace, exhaustive::ExhaustiveSearchSpace,
        random::RandomSearchSpace, time_limited::TimeLimitedSearchSpace,
        windowed::WindowedSearchSpace,
    },
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rankmap_core::num::CostNumeric;
use rankmap_model::{error::ConfigError, graph::CommGraph};
use std::time::Duration;

const SEARCH_SPACE_STREAM: u64 = 0;
const ACCEPTANCE_STREAM: u64 = 1;

/// Which pairs the search tries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchSpaceKind {
    /// Every pair of nodes, in lexicographic order.
    Exhaustive,
    /// Pairs whose node indices differ by at most `window`.
    Windowed { window: usize },
    /// Uniform random pairs until `max_unsuccessful` consecutive rejections.
    Random { max_unsuccessful: u64 },
    /// Pairs at most `depth` hops apart in the communication graph.
    CommunicationGraph { depth: usize },
}

impl Default for SearchSpaceKind {
    fn default() -> Self {
        Self::CommunicationGraph { depth: 10 }
    }
}

impl std::fmt::Display for SearchSpaceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Exhaustive => write!(f, "Exhaustive"),
            Self::Windowed { window } => write!(f, "Windowed(window: {})", window),
            Self::Random { max_unsuccessful } => {
                write!(f, "Random(max_unsuccessful: {})", max_unsuccessful)
            }
            Self::CommunicationGraph { depth } => write!(f, "CommunicationGraph(depth: {})", depth),
        }
    }
}

/// Which swaps are kept.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum AcceptanceKind {
    /// Strict improvement only.
    #[default]
    GreedyDescent,
    /// Metropolis acceptance with geometric cooling.
    SimulatedAnnealing {
        initial_temperature: f64,
        cooling_rate: f64,
        min_temperature: f64,
    },
}

impl std::fmt::Display for AcceptanceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::GreedyDescent => write!(f, "GreedyDescent"),
            Self::SimulatedAnnealing {
                initial_temperature,
                cooling_rate,
                min_temperature,
            } => write!(
                f,
                "SimulatedAnnealing(initial: {}, alpha: {}, min: {})",
                initial_temperature, cooling_rate, min_temperature
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LocalSearchConfig {
    search_space: SearchSpaceKind,
    acceptance: AcceptanceKind,
    seed: u64,
    max_evaluations: Option<u64>,
    time_limit: Option<Duration>,
    log_interval: Option<Duration>,
}

impl Default for LocalSearchConfig {
    fn default() -> Self {
        Self {
            search_space: SearchSpaceKind::default(),
            acceptance: AcceptanceKind::default(),
            seed: 0,
            max_evaluations: None,
            time_limit: None,
            log_interval: Some(Duration::from_secs(1)),
        }
    }
}

impl LocalSearchConfig {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn with_search_space(mut self, search_space: SearchSpaceKind) -> Self {
        self.search_space = search_space;
        self
    }

    #[inline]
    pub fn with_acceptance(mut self, acceptance: AcceptanceKind) -> Self {
        self.acceptance = acceptance;
        self
    }

    #[inline]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Stops after `max_evaluations` drawn pairs, skipped ones included.
    #[inline]
    pub fn with_max_evaluations(mut self, max_evaluations: u64) -> Self {
        self.max_evaluations = Some(max_evaluations);
        self
    }

    #[inline]
    pub fn with_time_limit(mut self, time_limit: Duration) -> Self {
        self.time_limit = Some(time_limit);
        self
    }

    /// Sets how often progress lines are logged; `None` disables progress logging.
    #[inline]
    pub fn with_log_interval(mut self, log_interval: Option<Duration>) -> Self {
        self.log_interval = log_interval;
        self
    }

    #[inline]
    pub fn search_space(&self) -> SearchSpaceKind {
        self.search_space
    }

    #[inline]
    pub fn acceptance(&self) -> AcceptanceKind {
        self.acceptance
    }

    #[inline]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    #[inline]
    pub fn max_evaluations(&self) -> Option<u64> {
        self.max_evaluations
    }

    #[inline]
    pub fn time_limit(&self) -> Option<Duration> {
        self.time_limit
    }

    #[inline]
    pub fn log_interval(&self) -> Option<Duration> {
        self.log_interval
    }

    /// Checks every parameter that does not depend on the graph.
    ///
    /// # Errors
    ///
    /// Returns the [`ConfigError`] of the first invalid parameter.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.search_space {
            SearchSpaceKind::Windowed { window: 0 } => return Err(ConfigError::ZeroWindow),
            SearchSpaceKind::Random {
                max_unsuccessful: 0,
            } => return Err(ConfigError::ZeroMaxUnsuccessful),
            SearchSpaceKind::CommunicationGraph { depth: 0 } => {
                return Err(ConfigError::ZeroDepth);
            }
            _ => {}
        }
        if let AcceptanceKind::SimulatedAnnealing {
            initial_temperature,
            cooling_rate,
            min_temperature,
        } = self.acceptance
        {
            GeometricCooling::try_new(initial_temperature, cooling_rate, min_temperature)?;
        }
        Ok(())
    }

    #[inline]
    fn rng(&self, stream: u64) -> ChaCha8Rng {
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        rng.set_stream(stream);
        rng
    }

    /// Builds the configured search space for `graph`, wrapped in the
    /// evaluation budget and time limit if those are set.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if a parameter is invalid.
    pub fn build_search_space<T>(
        &self,
        graph: &CommGraph<T>,
    ) -> Result<Box<dyn SearchSpace>, ConfigError>
    where
        T: CostNumeric,
    {
        self.validate()?;

        let num_nodes = graph.num_nodes();
        let mut space: Box<dyn SearchSpace> = match self.search_space {
            SearchSpaceKind::Exhaustive => Box::new(ExhaustiveSearchSpace::new(num_nodes)),
            SearchSpaceKind::Windowed { window } => {
                Box::new(WindowedSearchSpace::new(num_nodes, window)?)
            }
            SearchSpaceKind::Random { max_unsuccessful } => Box::new(RandomSearchSpace::new(
                num_nodes,
                max_unsuccessful,
                self.rng(SEARCH_SPACE_STREAM),
            )?),
            SearchSpaceKind::CommunicationGraph { depth } => Box::new(
                CommunicationGraphSearchSpace::new(graph, depth, self.rng(SEARCH_SPACE_STREAM))?,
            ),
        };

        if let Some(max_evaluations) = self.max_evaluations {
            space = Box::new(BudgetedSearchSpace::new(space, max_evaluations));
        }
        if let Some(time_limit) = self.time_limit {
            space = Box::new(TimeLimitedSearchSpace::new(space, time_limit));
        }
        Ok(space)
    }

    /// Builds the configured acceptance criterion.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidAnnealingSchedule`] for invalid annealing
    /// parameters.
    pub fn build_acceptance<T>(&self) -> Result<Box<dyn AcceptanceCriterion<T>>, ConfigError>
    where
        T: CostNumeric,
    {
        match self.acceptance {
            AcceptanceKind::GreedyDescent => Ok(Box::new(GreedyDescent::new())),
            AcceptanceKind::SimulatedAnnealing {
                initial_temperature,
                cooling_rate,
                min_temperature,
            } => {
                let cooling =
                    GeometricCooling::try_new(initial_temperature, cooling_rate, min_temperature)?;
                Ok(Box::new(SimulatedAnnealing::new(
                    cooling,
                    self.rng(ACCEPTANCE_STREAM),
                )))
            }
        }
    }
}

impl std::fmt::Display for LocalSearchConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Local Search Configuration:")?;
        writeln!(f, "   Search Space:     {}", self.search_space)?;
        writeln!(f, "   Acceptance:       {}", self.acceptance)?;
        writeln!(f, "   Seed:             {}", self.seed)?;
        match self.max_evaluations {
            Some(n) => writeln!(f, "   Max Evaluations:  {}", n)?,
            None => writeln!(f, "   Max Evaluations:  unlimited")?,
        }
        match self.time_limit {
            Some(t) => writeln!(f, "   Time Limit:       {:?}", t)?,
            None => writeln!(f, "   Time Limit:       none")?,
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rankmap_model::{graph::CommGraphBuilder, index::NodeIndex};

    fn path(len: usize) -> CommGraph<i64> {
        let mut b = CommGraphBuilder::new(len);
        for i in 1..len {
            b.add_edge(NodeIndex::new(i - 1), NodeIndex::new(i), 1);
        }
        b.build().unwrap()
    }

    #[test]
    fn test_default_is_valid() {
        let config = LocalSearchConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(
            config.search_space(),
            SearchSpaceKind::CommunicationGraph { depth: 10 }
        );
        assert_eq!(config.acceptance(), AcceptanceKind::GreedyDescent);
    }

    #[test]
    fn test_validate_rejects_zero_parameters() {
        let base = LocalSearchConfig::default();
        assert_eq!(
            base.clone()
                .with_search_space(SearchSpaceKind::Windowed { window: 0 })
                .validate(),
            Err(ConfigError::ZeroWindow)
        );
        assert_eq!(
            base.clone()
                .with_search_space(SearchSpaceKind::CommunicationGraph { depth: 0 })
                .validate(),
            Err(ConfigError::ZeroDepth)
        );
        assert_eq!(
            base.with_search_space(SearchSpaceKind::Random {
                max_unsuccessful: 0
            })
            .validate(),
            Err(ConfigError::ZeroMaxUnsuccessful)
        );
    }

    #[test]
    fn test_validate_rejects_bad_annealing() {
        let config = LocalSearchConfig::default().with_acceptance(AcceptanceKind::SimulatedAnnealing {
            initial_temperature: 10.0,
            cooling_rate: 1.5,
            min_temperature: 0.1,
        });
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidAnnealingSchedule(_))
        ));
        assert!(config.build_acceptance::<i64>().is_err());
    }

    #[test]
    fn test_builds_wrapped_search_space() {
        let g = path(6);
        let config = LocalSearchConfig::default()
            .with_search_space(SearchSpaceKind::Exhaustive)
            .with_max_evaluations(3)
            .with_time_limit(Duration::from_secs(60));
        let mut space = config.build_search_space(&g).unwrap();
        assert_eq!(space.name(), "TimeLimitedSearchSpace");
        assert_eq!(space.num_nodes(), 6);

        space.on_start();
        let mut steps = 0;
        while !space.done() {
            space.next_pair();
            space.commit_status(true);
            steps += 1;
        }
        assert_eq!(steps, 3);
    }

    #[test]
    fn test_same_seed_same_pairs() {
        let g = path(12);
        let config = LocalSearchConfig::default()
            .with_search_space(SearchSpaceKind::Random {
                max_unsuccessful: 100,
            })
            .with_seed(99);
        let mut a = config.build_search_space(&g).unwrap();
        let mut b = config.build_search_space(&g).unwrap();
        a.on_start();
        b.on_start();
        for _ in 0..50 {
            assert_eq!(a.next_pair(), b.next_pair());
        }
    }

    #[test]
    fn test_builds_acceptance_by_kind() {
        let greedy = LocalSearchConfig::default().build_acceptance::<i64>().unwrap();
        assert_eq!(greedy.name(), "GreedyDescent");
        let sa = LocalSearchConfig::default()
            .with_acceptance(AcceptanceKind::SimulatedAnnealing {
                initial_temperature: 5.0,
                cooling_rate: 0.99,
                min_temperature: 0.01,
            })
            .build_acceptance::<i64>()
            .unwrap();
        assert_eq!(sa.name(), "SimulatedAnnealing");
    }
}
