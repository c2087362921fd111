//! Simulator: owns the cache controller and its statistics.
//!
//! Each call to [`Simulator::tick`] is one clock edge. The returned
//! [`CycleRecord`] carries both timing domains of that cycle: the
//! combinational `hit` computed from this cycle's request, and the
//! registered outputs a reader sees during this cycle, which were produced
//! by the previous cycle's request.

use tracing::{info, warn};

use super::Stimulus;
use crate::cache::{CacheController, Response, StepOutcome};
use crate::common::error::{ConfigError, SimError};
use crate::config::{Config, GeneralConfig};
use crate::stats::CacheStats;

/// Observable behaviour of one simulated cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CycleRecord {
    /// Zero-based cycle number.
    pub cycle: u64,
    /// Inputs applied this cycle.
    pub stimulus: Stimulus,
    /// Registered outputs visible during this cycle (latched at the end of
    /// the previous one).
    pub visible: Response,
    /// Controller outcome; `None` for reset cycles.
    pub outcome: Option<StepOutcome>,
}

impl CycleRecord {
    /// Same-cycle hit signal. Always false during reset.
    pub fn hit(&self) -> bool {
        self.outcome.is_some_and(|o| o.resolution.hit)
    }

    /// Way that hit, if any.
    pub fn hit_way(&self) -> Option<usize> {
        self.outcome.and_then(|o| o.resolution.hit_way)
    }
}

/// Top-level simulator.
#[derive(Debug)]
pub struct Simulator {
    /// The modelled cache.
    pub controller: CacheController,
    /// Counters accumulated since construction.
    pub stats: CacheStats,
    general: GeneralConfig,
    cycle: u64,
}

impl Simulator {
    /// Builds a simulator from `config`.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the cache geometry is invalid.
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        Ok(Self {
            controller: CacheController::from_config(&config.cache)?,
            stats: CacheStats::default(),
            general: config.general.clone(),
            cycle: 0,
        })
    }

    /// Number of cycles simulated so far.
    pub const fn cycle(&self) -> u64 {
        self.cycle
    }

    /// Advances the simulator by one clock cycle.
    pub fn tick(&mut self, stimulus: &Stimulus) -> CycleRecord {
        let visible = self.controller.outputs();
        let outcome = match stimulus {
            Stimulus::Reset => {
                self.controller.reset();
                self.stats.record_reset();
                None
            }
            Stimulus::Request(request) => {
                let outcome = self.controller.tick(request);
                self.stats.record(&outcome);
                Some(outcome)
            }
        };

        let record = CycleRecord {
            cycle: self.cycle,
            stimulus: *stimulus,
            visible,
            outcome,
        };
        if self.general.trace_requests {
            info!(
                cycle = record.cycle,
                hit = record.hit(),
                read_data = visible.read_data,
                result_valid = visible.result_valid,
                action = ?outcome.map(|o| o.action),
                "cycle"
            );
        }
        self.cycle += 1;
        record
    }

    /// Runs `trace`, calling `on_cycle` after every cycle.
    ///
    /// When invariant checking is enabled the whole line store is verified
    /// after each cycle and the run stops at the first violation.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Invariant`] on a violation.
    pub fn run_with(
        &mut self,
        trace: &[Stimulus],
        mut on_cycle: impl FnMut(&CycleRecord),
    ) -> Result<(), SimError> {
        for stimulus in trace {
            let record = self.tick(stimulus);
            on_cycle(&record);
            if self.general.check_invariants {
                self.check(record.cycle)?;
            }
        }
        Ok(())
    }

    /// Runs `trace` and returns every cycle record.
    ///
    /// # Errors
    ///
    /// See [`run_with`](Self::run_with).
    pub fn run(&mut self, trace: &[Stimulus]) -> Result<Vec<CycleRecord>, SimError> {
        let mut records = Vec::with_capacity(trace.len());
        self.run_with(trace, |record| records.push(*record))?;
        Ok(records)
    }

    fn check(&self, cycle: u64) -> Result<(), SimError> {
        self.controller.verify().map_err(|violation| {
            warn!(cycle, %violation, "invariant violated");
            SimError::Invariant { cycle, violation }
        })
    }
}
