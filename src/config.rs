//! Run configuration: stage ceiling, factor-cache capacity, diagnostic
//! verbosity. Affects how hard the driver tries and how much it logs;
//! never affects the result for a given N other than composite/unresolved
//! vs. proven within the stage budget.

/// Tunables for one top-level `prove` call.
#[derive(Debug, Clone, Copy)]
pub struct Config {
    /// Upper bound on the escalating factoring stage the driver will climb
    /// to before giving up and reporting unresolved.
    pub stage_max: u32,
    /// Capacity of the memoized factor cache shared across a single
    /// top-level proof.
    pub memo_capacity: usize,
    /// Diagnostic verbosity, 0..3. Has no effect on the proof's outcome,
    /// only on how much gets logged via `tracing`.
    pub verbosity: u8,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            stage_max: 20,
            memo_capacity: 1000,
            verbosity: 0,
        }
    }
}

impl Config {
    /// Maps `verbosity` onto a `tracing` level (0=warn, 1=info, 2=debug,
    /// 3=trace).
    pub fn tracing_level(&self) -> tracing::Level {
        match self.verbosity {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        }
    }
}
