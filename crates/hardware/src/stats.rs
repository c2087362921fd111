//! Simulation statistics collection and reporting.
//!
//! This module tracks what the cache did over a run. It provides:
//! 1. **Cycles:** Total, idle, and reset cycles.
//! 2. **Reads:** Hits and misses (read misses never allocate).
//! 3. **Writes:** Hits and allocating misses.
//! 4. **Replacement:** Evictions of valid lines and victim-fallback events.

use std::fmt::{self, Write as _};
use std::time::Instant;

use crate::cache::{Action, StepOutcome};

/// Cache statistics.
#[derive(Clone, Debug)]
pub struct CacheStats {
    start_time: Instant,
    /// Total simulated cycles, reset cycles included.
    pub cycles: u64,
    /// Cycles with neither enable asserted.
    pub idle_cycles: u64,
    /// Cycles spent in reset.
    pub resets: u64,

    /// Read-only requests (`read_en` without `write_en`).
    pub reads: u64,
    /// Reads that hit.
    pub read_hits: u64,
    /// Reads that missed.
    pub read_misses: u64,

    /// Write requests, including those with `read_en` also asserted.
    pub writes: u64,
    /// Writes that hit and updated data in place.
    pub write_hits: u64,
    /// Writes that missed and allocated a line.
    pub write_misses: u64,

    /// Allocations that overwrote a valid line.
    pub evictions: u64,
    /// Allocations whose victim came from the way-0 fallback.
    pub victim_fallbacks: u64,
}

impl Default for CacheStats {
    /// Returns the default value.
    fn default() -> Self {
        Self {
            start_time: Instant::now(),
            cycles: 0,
            idle_cycles: 0,
            resets: 0,
            reads: 0,
            read_hits: 0,
            read_misses: 0,
            writes: 0,
            write_hits: 0,
            write_misses: 0,
            evictions: 0,
            victim_fallbacks: 0,
        }
    }
}

/// Section names for selective stats output.
///
/// Valid section identifiers: `"summary"`, `"reads"`, `"writes"`, `"replacement"`.
/// Pass an empty slice to `print_sections` to print all sections.
pub const STATS_SECTIONS: &[&str] = &["summary", "reads", "writes", "replacement"];

const RULE: &str = "==========================================================";
const SUB_RULE: &str = "----------------------------------------------------------";

impl CacheStats {
    /// Accounts for one clock cycle.
    pub fn record(&mut self, outcome: &StepOutcome) {
        self.cycles += 1;
        match outcome.action {
            Action::Idle => self.idle_cycles += 1,
            Action::ReadHit { .. } => {
                self.reads += 1;
                self.read_hits += 1;
            }
            Action::ReadMiss => {
                self.reads += 1;
                self.read_misses += 1;
            }
            Action::WriteHit { .. } => {
                self.writes += 1;
                self.write_hits += 1;
            }
            Action::Allocate { evicted, .. } => {
                self.writes += 1;
                self.write_misses += 1;
                if evicted.is_some() {
                    self.evictions += 1;
                }
                if outcome.resolution.victim_fallback {
                    self.victim_fallbacks += 1;
                }
            }
        }
    }

    /// Accounts for one reset cycle.
    pub fn record_reset(&mut self) {
        self.cycles += 1;
        self.resets += 1;
    }

    /// Fraction of read and write requests that hit, in `[0, 1]`.
    pub fn hit_rate(&self) -> f64 {
        ratio(self.read_hits + self.write_hits, self.reads + self.writes)
    }

    /// Fraction of reads that hit, in `[0, 1]`.
    pub fn read_hit_rate(&self) -> f64 {
        ratio(self.read_hits, self.reads)
    }

    /// Fraction of writes that hit, in `[0, 1]`.
    pub fn write_hit_rate(&self) -> f64 {
        ratio(self.write_hits, self.writes)
    }

    /// Renders the requested sections.
    ///
    /// Each element of `sections` should be one of [`STATS_SECTIONS`]; an
    /// empty slice renders all of them.
    pub fn render_sections(&self, sections: &[String]) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = self.write_sections(&mut out, sections);
        out
    }

    fn write_sections(&self, out: &mut String, sections: &[String]) -> fmt::Result {
        let want = |s: &str| sections.is_empty() || sections.iter().any(|x| x == s);
        let seconds = self.start_time.elapsed().as_secs_f64();

        writeln!(out, "\n{RULE}")?;
        writeln!(out, "CACHE SIMULATION STATISTICS")?;
        writeln!(out, "{RULE}")?;
        if want("summary") {
            let requests = self.reads + self.writes;
            writeln!(out, "host_seconds             {seconds:.4} s")?;
            writeln!(out, "sim_cycles               {}", self.cycles)?;
            writeln!(out, "sim_requests             {requests}")?;
            writeln!(out, "sim_idle_cycles          {}", self.idle_cycles)?;
            writeln!(out, "sim_resets               {}", self.resets)?;
            writeln!(out, "hit_rate                 {:.2}%", self.hit_rate() * 100.0)?;
            writeln!(out, "{SUB_RULE}")?;
        }
        if want("reads") {
            writeln!(out, "READS")?;
            writeln!(out, "  read.requests          {}", self.reads)?;
            writeln!(out, "  read.hits              {}", self.read_hits)?;
            writeln!(out, "  read.misses            {}", self.read_misses)?;
            writeln!(out, "  read.hit_rate          {:.2}%", self.read_hit_rate() * 100.0)?;
            writeln!(out, "{SUB_RULE}")?;
        }
        if want("writes") {
            writeln!(out, "WRITES")?;
            writeln!(out, "  write.requests         {}", self.writes)?;
            writeln!(out, "  write.hits             {}", self.write_hits)?;
            writeln!(out, "  write.allocations      {}", self.write_misses)?;
            writeln!(out, "  write.hit_rate         {:.2}%", self.write_hit_rate() * 100.0)?;
            writeln!(out, "{SUB_RULE}")?;
        }
        if want("replacement") {
            writeln!(out, "REPLACEMENT")?;
            writeln!(out, "  evictions              {}", self.evictions)?;
            writeln!(out, "  victim_fallbacks       {}", self.victim_fallbacks)?;
        }
        writeln!(out, "{RULE}")
    }

    /// Prints only the requested statistics sections to stdout.
    pub fn print_sections(&self, sections: &[String]) {
        print!("{}", self.render_sections(sections));
    }

    /// Prints all statistics sections to stdout.
    ///
    /// Equivalent to `print_sections(&[])`.
    pub fn print(&self) {
        self.print_sections(&[]);
    }
}

fn ratio(num: u64, den: u64) -> f64 {
    if den == 0 { 0.0 } else { num as f64 / den as f64 }
}
