//! Dense dynamic-programming cost tables for the Revolve family and `Mixed`.
//!
//! Every table is a flat, bottom-up-filled array indexed by small integers
//! (never a hash map) per §4.3's performance note. Each cell records both the
//! minimum cost and enough backtrack information for [`crate::compiler`] to
//! reconstruct the optimal low-level operation sequence.

use tracing::debug;

use crate::cost::{CostParams, INF};

/// One DP cell: the minimum cost plus the number of forward steps to take
/// before the next checkpoint (`split`, `1..=l`), used as the tie-break's
/// secondary key and as the backtrack pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub cost: i64,
    /// Minimizing split index `j` (see §4.3). `0` is used as "no entry" for
    /// base cases (`l <= 1`) that do not split.
    pub split: u32,
    /// Total recomputed forward steps under the chosen `split`, used as the
    /// tie-break's secondary criterion ("prefer smaller recomputation count").
    pub recomputations: u64,
}

impl Cell {
    const INFEASIBLE: Cell = Cell {
        cost: INF,
        split: 0,
        recomputations: u64::MAX,
    };
}

/// `Opt0(l, c)`: the classical single-level (RAM-only) Revolve table.
///
/// `table[l][c]` is valid for `l in 0..=l_max`, `c in 0..=c_max`.
pub struct Opt0Table {
    pub l_max: usize,
    pub c_max: usize,
    cells: Vec<Vec<Cell>>,
}

impl Opt0Table {
    pub fn build(l_max: usize, c_max: usize, params: CostParams) -> Self {
        let mut cells = vec![vec![Cell::INFEASIBLE; c_max + 1]; l_max + 1];
        // Base cases hold for every budget, including c == 0.
        for c in 0..=c_max {
            cells[0][c] = Cell {
                cost: params.ub,
                split: 0,
                recomputations: 0,
            };
            if l_max >= 1 {
                cells[1][c] = Cell {
                    cost: params.uf + 2 * params.ub,
                    split: 0,
                    recomputations: 0,
                };
            }
        }
        for c in 0..=c_max {
            for l in 2..=l_max {
                if c == 0 {
                    continue; // infeasible, already INFEASIBLE
                }
                let mut best = Cell::INFEASIBLE;
                for j in 1..=l as u32 {
                    let tail = cells[l - j as usize][c - 1];
                    let front = cells[j as usize - 1][c];
                    if tail.cost >= INF || front.cost >= INF {
                        continue;
                    }
                    let cost = (j as i64) * params.uf + tail.cost + front.cost;
                    let recomputations = (j as u64 - 1) + tail.recomputations + front.recomputations;
                    let candidate = Cell {
                        cost,
                        split: j,
                        recomputations,
                    };
                    if is_better(&candidate, &best) {
                        best = candidate;
                    }
                }
                cells[l][c] = best;
            }
        }
        debug!(l_max, c_max, "built Opt0 table");
        Opt0Table {
            l_max,
            c_max,
            cells,
        }
    }

    pub fn cell(&self, l: usize, c: usize) -> Cell {
        self.cells[l][c]
    }

    pub fn cost(&self, l: usize, c: usize) -> i64 {
        self.cells[l][c].cost
    }
}

/// Tie-break per §4.3: smaller cost; then smaller recomputation count; then
/// (RAM-vs-DISK is resolved by the caller for tables that choose a level);
/// then smaller split index.
fn is_better(candidate: &Cell, current: &Cell) -> bool {
    if candidate.cost != current.cost {
        return candidate.cost < current.cost;
    }
    if candidate.recomputations != current.recomputations {
        return candidate.recomputations < current.recomputations;
    }
    candidate.split < current.split || current.split == 0
}

/// `DiskRevolve(l, cm)`: unbounded disk, bounded RAM. A 1-D table over `l`
/// with `cm` fixed, consulting a fully-built [`Opt0Table`] for the RAM-only
/// sub-solves it is defined in terms of (§4.3).
pub struct DiskRevolveTable {
    pub l_max: usize,
    pub cm: usize,
    cells: Vec<Cell>,
    /// `true` at index `l` when the optimal solution uses no disk checkpoint
    /// at all (falls back to plain `Opt0(l, cm)`).
    ram_only: Vec<bool>,
}

impl DiskRevolveTable {
    pub fn build(l_max: usize, cm: usize, params: CostParams, opt0: &Opt0Table) -> Self {
        let mut cells = vec![Cell::INFEASIBLE; l_max + 1];
        let mut ram_only = vec![false; l_max + 1];
        cells[0] = Cell {
            cost: params.ub,
            split: 0,
            recomputations: 0,
        };
        ram_only[0] = true;
        if l_max >= 1 {
            cells[1] = Cell {
                cost: params.uf + 2 * params.ub,
                split: 0,
                recomputations: 0,
            };
            ram_only[1] = true;
        }
        for l in 2..=l_max {
            let mut best = opt0.cell(l, cm);
            let mut best_ram_only = true;
            for j in 1..l as u32 {
                let front = opt0.cell(j as usize - 1, cm);
                let tail = cells[l - j as usize];
                if front.cost >= INF || tail.cost >= INF {
                    continue;
                }
                let cost = params.wd + (j as i64) * params.uf + front.cost + tail.cost;
                let recomputations =
                    (j as u64 - 1) + front.recomputations + tail.recomputations;
                let candidate = Cell {
                    cost,
                    split: j,
                    recomputations,
                };
                // RAM-only (no disk write) wins ties, per "prefer RAM over DISK".
                let better = if candidate.cost != best.cost {
                    candidate.cost < best.cost
                } else if best_ram_only {
                    false
                } else if candidate.recomputations != best.recomputations {
                    candidate.recomputations < best.recomputations
                } else {
                    candidate.split < best.split
                };
                if better {
                    best = candidate;
                    best_ram_only = false;
                }
            }
            cells[l] = best;
            ram_only[l] = best_ram_only;
        }
        debug!(l_max, cm, "built DiskRevolve table");
        DiskRevolveTable {
            l_max,
            cm,
            cells,
            ram_only,
        }
    }

    pub fn cell(&self, l: usize) -> Cell {
        self.cells[l]
    }

    pub fn is_ram_only(&self, l: usize) -> bool {
        self.ram_only[l]
    }
}

/// `PeriodicDiskRevolve(l, cm)`: chooses an optimal period `p*` directly from
/// the closed-form cost formula in §4.3, consulting `Opt0(p-1, cm)` for the
/// interior of each period.
pub struct PeriodicDiskRevolveChoice {
    pub period: u32,
    pub cost: i64,
}

pub fn periodic_disk_revolve_choice(
    l: usize,
    cm: usize,
    params: CostParams,
    opt0: &Opt0Table,
) -> PeriodicDiskRevolveChoice {
    assert!(l >= 1, "PeriodicDiskRevolve requires at least one step");
    let mut best_p = 1u32;
    let mut best_cost = INF;
    for p in 1..=l as u32 {
        let inner = opt0.cell(p as usize - 1, cm);
        if inner.cost >= INF {
            continue;
        }
        let full_periods = l as i64 / p as i64;
        let remainder = l as i64 % p as i64;
        let cost = full_periods * ((p as i64) * params.uf + params.wd)
            + inner.cost
            + remainder * params.uf
            + params.rd;
        if cost < best_cost {
            best_cost = cost;
            best_p = p;
        }
    }
    PeriodicDiskRevolveChoice {
        period: best_p,
        cost: best_cost,
    }
}

/// `HRevolve(l, cm, cd)`: bounded disk, bounded RAM. A 2-D table over
/// `(l, cd)` with `cm` fixed, falling back to `Opt0(l, cm)` once `cd == 0`.
pub struct HRevolveTable {
    pub l_max: usize,
    pub cm: usize,
    pub cd_max: usize,
    cells: Vec<Vec<Cell>>,
    ram_only: Vec<Vec<bool>>,
}

impl HRevolveTable {
    pub fn build(l_max: usize, cm: usize, cd_max: usize, params: CostParams, opt0: &Opt0Table) -> Self {
        let mut cells = vec![vec![Cell::INFEASIBLE; cd_max + 1]; l_max + 1];
        let mut ram_only = vec![vec![true; cd_max + 1]; l_max + 1];
        for cd in 0..=cd_max {
            cells[0][cd] = Cell {
                cost: params.ub,
                split: 0,
                recomputations: 0,
            };
            if l_max >= 1 {
                cells[1][cd] = Cell {
                    cost: params.uf + 2 * params.ub,
                    split: 0,
                    recomputations: 0,
                };
            }
        }
        for l in 0..=l_max {
            cells[l][0] = opt0.cell(l, cm);
        }
        for cd in 1..=cd_max {
            for l in 2..=l_max {
                let mut best = opt0.cell(l, cm);
                let mut best_ram_only = true;
                for j in 1..l as u32 {
                    let front = opt0.cell(j as usize - 1, cm);
                    let tail = cells[l - j as usize][cd - 1];
                    if front.cost >= INF || tail.cost >= INF {
                        continue;
                    }
                    let cost = params.wd + (j as i64) * params.uf + front.cost + tail.cost;
                    let recomputations =
                        (j as u64 - 1) + front.recomputations + tail.recomputations;
                    let candidate = Cell {
                        cost,
                        split: j,
                        recomputations,
                    };
                    let better = if candidate.cost != best.cost {
                        candidate.cost < best.cost
                    } else if best_ram_only {
                        false
                    } else if candidate.recomputations != best.recomputations {
                        candidate.recomputations < best.recomputations
                    } else {
                        candidate.split < best.split
                    };
                    if better {
                        best = candidate;
                        best_ram_only = false;
                    }
                }
                cells[l][cd] = best;
                ram_only[l][cd] = best_ram_only;
            }
        }
        debug!(l_max, cm, cd_max, "built HRevolve table");
        HRevolveTable {
            l_max,
            cm,
            cd_max,
            cells,
            ram_only,
        }
    }

    pub fn cell(&self, l: usize, cd: usize) -> Cell {
        self.cells[l][cd]
    }

    pub fn is_ram_only(&self, l: usize, cd: usize) -> bool {
        self.ram_only[l][cd]
    }
}

/// `Mixed(l, c)`: single combined budget shared between restart and
/// adjoint-dependency data (§4.8, DESIGN.md Open Question 5). Same recursive
/// shape as [`Opt0Table`], consulting it for the "front" sub-solve.
pub struct MixedTable {
    pub l_max: usize,
    pub c_max: usize,
    cells: Vec<Vec<Cell>>,
}

impl MixedTable {
    pub fn build(l_max: usize, c_max: usize, params: CostParams, opt0: &Opt0Table) -> Self {
        let mut cells = vec![vec![Cell::INFEASIBLE; c_max + 1]; l_max + 1];
        for c in 0..=c_max {
            cells[0][c] = Cell {
                cost: params.ub,
                split: 0,
                recomputations: 0,
            };
            if l_max >= 1 {
                cells[1][c] = Cell {
                    cost: params.uf + 2 * params.ub,
                    split: 0,
                    recomputations: 0,
                };
            }
        }
        for c in 0..=c_max {
            for l in 2..=l_max {
                if c == 0 {
                    continue;
                }
                let mut best = Cell::INFEASIBLE;
                for j in 1..=l as u32 {
                    let tail = cells[l - j as usize][c - 1];
                    let front = opt0.cell(j as usize - 1, c);
                    if tail.cost >= INF || front.cost >= INF {
                        continue;
                    }
                    let cost = (j as i64) * params.uf + tail.cost + front.cost;
                    let recomputations = (j as u64 - 1) + tail.recomputations + front.recomputations;
                    let candidate = Cell {
                        cost,
                        split: j,
                        recomputations,
                    };
                    if is_better(&candidate, &best) {
                        best = candidate;
                    }
                }
                cells[l][c] = best;
            }
        }
        debug!(l_max, c_max, "built Mixed table");
        MixedTable {
            l_max,
            c_max,
            cells,
        }
    }

    pub fn cell(&self, l: usize, c: usize) -> Cell {
        self.cells[l][c]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opt0_base_cases() {
        let t = Opt0Table::build(5, 3, CostParams::default());
        assert_eq!(t.cost(0, 0), 1);
        assert_eq!(t.cost(1, 0), 3);
        assert_eq!(t.cost(2, 0), INF);
    }

    #[test]
    fn opt0_monotone_in_budget() {
        let t = Opt0Table::build(8, 4, CostParams::default());
        for l in 0..=8 {
            let mut prev = t.cost(l, 0);
            for c in 1..=4 {
                let cur = t.cost(l, c);
                assert!(cur <= prev, "cost should be non-increasing in budget");
                prev = cur;
            }
        }
    }

    #[test]
    fn opt0_monotone_in_length() {
        let t = Opt0Table::build(8, 4, CostParams::default());
        for c in 0..=4 {
            let mut prev = t.cost(0, c);
            for l in 1..=8 {
                let cur = t.cost(l, c);
                assert!(cur >= prev, "cost should be non-decreasing in length");
                prev = cur;
            }
        }
    }

    #[test]
    fn opt0_four_two_matches_hand_trace() {
        // l=4, c=2, uf=ub=1: classical revolve example, see DESIGN.md Open
        // Question 4 for why this is a self-traced golden value.
        let t = Opt0Table::build(4, 2, CostParams::default());
        assert_eq!(t.cost(4, 2), 10);
        assert_eq!(t.cell(4, 2).split, 1);
    }

    #[test]
    fn disk_revolve_uses_ram_only_when_it_fits() {
        let opt0 = Opt0Table::build(10, 10, CostParams::default());
        let dr = DiskRevolveTable::build(10, 10, CostParams::default(), &opt0);
        // With RAM budget covering everything, disk should never be cheaper.
        for l in 0..=10 {
            assert!(dr.is_ram_only(l));
        }
    }

    #[test]
    fn periodic_disk_revolve_picks_a_feasible_period() {
        let opt0 = Opt0Table::build(20, 2, CostParams::default());
        let choice = periodic_disk_revolve_choice(20, 2, CostParams::default(), &opt0);
        assert!(choice.period >= 1 && choice.period <= 20);
        assert!(choice.cost < INF);
    }

    #[test]
    fn h_revolve_falls_back_to_opt0_with_no_disk() {
        let opt0 = Opt0Table::build(6, 2, CostParams::default());
        let hr = HRevolveTable::build(6, 2, 0, CostParams::default(), &opt0);
        for l in 0..=6 {
            assert_eq!(hr.cell(l, 0).cost, opt0.cost(l, 2));
        }
    }

    #[test]
    fn mixed_base_cases_match_opt0() {
        let opt0 = Opt0Table::build(5, 3, CostParams::default());
        let mixed = MixedTable::build(5, 3, CostParams::default(), &opt0);
        assert_eq!(mixed.cell(0, 1).cost, opt0.cost(0, 1));
        assert_eq!(mixed.cell(1, 1).cost, opt0.cost(1, 1));
    }
}
