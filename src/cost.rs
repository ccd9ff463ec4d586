//! Cost parameters for the Revolve family and `Mixed`. \
//! Use [`CostParams::default`] for the documented defaults or
//! [`CostParams::builder`] to override individual fields.

/// Integer cost type used throughout the DP tables. Saturating-ish by
/// convention: callers should keep individual costs small enough that sums
/// over `max_n` steps do not approach `i64::MAX`.
pub type Cost = i64;

/// Sentinel for "infeasible" cells in a DP table. Deliberately not `i64::MAX`
/// so that a small number of additions cannot silently wrap.
pub const INF: Cost = i64::MAX / 4;

/// Per-step and per-storage-operation costs feeding the DP recurrences of
/// §4.3. Mirrors this crate's convention of a small `Config`-like struct with
/// a builder, rather than a constructor with a long positional parameter list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CostParams {
    /// Cost of one forward step.
    pub uf: Cost,
    /// Cost of one backward (adjoint) step.
    pub ub: Cost,
    /// Cost of writing one checkpoint to disk.
    pub wd: Cost,
    /// Cost of reading one checkpoint from disk.
    pub rd: Cost,
    /// Cost of writing one checkpoint to RAM (0 by convention).
    pub wm: Cost,
    /// Cost of reading one checkpoint from RAM (0 by convention).
    pub rm: Cost,
}

impl Default for CostParams {
    fn default() -> Self {
        CostParams {
            uf: 1,
            ub: 1,
            wd: 0,
            rd: 0,
            wm: 0,
            rm: 0,
        }
    }
}

impl CostParams {
    /// Builder pre-populated with the documented defaults.
    pub fn builder() -> CostParamsBuilder {
        CostParamsBuilder::new()
    }
}

/// Builder for [`CostParams`]. Every setter returns `Self` for chaining.
#[derive(Debug, Clone, Copy)]
pub struct CostParamsBuilder {
    params: CostParams,
}

impl CostParamsBuilder {
    pub fn new() -> Self {
        CostParamsBuilder {
            params: CostParams::default(),
        }
    }

    pub fn uf(mut self, uf: Cost) -> Self {
        self.params.uf = uf;
        self
    }

    pub fn ub(mut self, ub: Cost) -> Self {
        self.params.ub = ub;
        self
    }

    pub fn wd(mut self, wd: Cost) -> Self {
        self.params.wd = wd;
        self
    }

    pub fn rd(mut self, rd: Cost) -> Self {
        self.params.rd = rd;
        self
    }

    pub fn wm(mut self, wm: Cost) -> Self {
        self.params.wm = wm;
        self
    }

    pub fn rm(mut self, rm: Cost) -> Self {
        self.params.rm = rm;
        self
    }

    pub fn build(self) -> CostParams {
        self.params
    }
}

impl Default for CostParamsBuilder {
    fn default() -> Self {
        Self::new()
    }
}
