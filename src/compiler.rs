//! Recursive compiler from DP backtrack decisions (§4.3) to low-level
//! operation sequences (§4.4). `compile_opt0` is the shared recursive core;
//! the disk-aware tables reuse it for every RAM-only sub-interval.

use crate::action::{Action, Step, StorageKind};
use crate::lowop::{last_use, shift, LowOp};
use crate::table::{DiskRevolveTable, HRevolveTable, MixedTable, Opt0Table};

/// Folds a compiled low-level program into the public action stream,
/// applying the Revolve adapter's emission rules (§4.5):
///
/// 1. A `Write` immediately covering a forward span sets that span's
///    `write_ics`/`storage`.
/// 2. A `WriteForward` sets `write_adj_deps`/`storage` the same way.
/// 3. A `Read` is folded into a `Copy` into `Work`, upgraded to `Move` when
///    [`last_use`] shows no later read of that slot before it is discarded.
/// 4. `Backward(t0, t1)` becomes `Reverse{n1: t0, n0: t1, clear_adj_deps: true}`.
/// 5. `EndForward` is emitted the first time the forward frontier reaches `max_n`.
/// 6. `EndReverse` is emitted the first time the reverse frontier reaches 0.
pub fn translate(ops: &[LowOp], max_n: Step) -> Vec<Action> {
    let discard_follows = last_use(ops);
    let mut t = Translator {
        actions: Vec::new(),
        pending: None,
        write_ics: false,
        write_adj_deps: false,
        storage: StorageKind::Ram,
        max_n,
        end_forward_emitted: false,
        end_reverse_emitted: false,
    };
    for (idx, op) in ops.iter().enumerate() {
        match *op {
            LowOp::Forward1 => {
                let (_, end) = t.pending.unwrap_or((0, t.cursor()));
                t.extend_forward(end, end + 1);
            }
            LowOp::Forward(a, b) => t.extend_forward(a, b),
            LowOp::Write(l, i) => {
                debug_assert!(t.pending.map(|(_, end)| end == i).unwrap_or(true));
                t.flush();
                t.write_ics = true;
                t.storage = l;
            }
            LowOp::WriteForward(l, _) => {
                t.flush();
                t.write_adj_deps = true;
                t.storage = l;
            }
            LowOp::Backward(t0, t1) => {
                t.flush();
                if t0 != t1 {
                    t.actions.push(Action::Reverse {
                        n1: t0,
                        n0: t1,
                        clear_adj_deps: true,
                    });
                }
                if t1 == 0 && !t.end_reverse_emitted {
                    t.actions.push(Action::EndReverse);
                    t.end_reverse_emitted = true;
                }
            }
            LowOp::Read(l, i) => {
                t.flush();
                let to = if discard_follows[idx] {
                    Action::Move {
                        n: i,
                        from_storage: l,
                        to_storage: StorageKind::Work,
                    }
                } else {
                    Action::Copy {
                        n: i,
                        from_storage: l,
                        to_storage: StorageKind::Work,
                    }
                };
                t.actions.push(to);
            }
            LowOp::ReadForward(..) | LowOp::Discard(..) | LowOp::DiscardForward(..) => {
                // Bookkeeping only: frees a slot or consumes adjoint-dependency
                // data already folded into an earlier Write/WriteForward's
                // flags. No public action corresponds to these on their own.
            }
        }
    }
    t.flush();
    t.actions
}

struct Translator {
    actions: Vec<Action>,
    pending: Option<(Step, Step)>,
    write_ics: bool,
    write_adj_deps: bool,
    storage: StorageKind,
    max_n: Step,
    end_forward_emitted: bool,
    end_reverse_emitted: bool,
}

impl Translator {
    fn cursor(&self) -> Step {
        self.pending.map(|(_, end)| end).unwrap_or(0)
    }

    fn extend_forward(&mut self, a: Step, b: Step) {
        self.pending = Some(match self.pending {
            Some((start, end)) if end == a => (start, b),
            _ => (a, b),
        });
    }

    fn flush(&mut self) {
        if let Some((n0, n1)) = self.pending.take() {
            self.actions.push(Action::Forward {
                n0,
                n1,
                write_ics: self.write_ics,
                write_adj_deps: self.write_adj_deps,
                storage: self.storage,
            });
            if n1 == self.max_n && !self.end_forward_emitted {
                self.actions.push(Action::EndForward);
                self.end_forward_emitted = true;
            }
        }
        self.write_ics = false;
        self.write_adj_deps = false;
        self.storage = StorageKind::Ram;
    }
}

/// Compiles the classical single-level Revolve table into a low-level
/// program covering `l` interior steps, with the live state assumed equal to
/// the checkpoint at `base` on entry and the adjoint value left at `base` on
/// exit.
///
/// Mirrors the recursive structure used to *compute* `Opt0` (§4.3): a split
/// index `j` sends the tail `[base+j, ..)` into a reduced-budget recursion,
/// then replays the front `[base, base+j)` at the original budget once the
/// tail's checkpoint is freed.
pub fn compile_opt0(table: &Opt0Table, l: usize, c: usize, base: Step, level: StorageKind) -> Vec<LowOp> {
    if l == 0 {
        return vec![LowOp::Backward(base, base)];
    }
    if l == 1 {
        return vec![LowOp::Forward(base, base + 1), LowOp::Backward(base + 1, base)];
    }
    let j = table.cell(l, c).split.max(1) as Step;
    let mut ops = vec![LowOp::Forward(base, base + j), LowOp::Write(level, base + j)];
    ops.extend(shift(
        &compile_opt0(table, l - j as usize, c - 1, 0, level),
        base + j,
    ));
    ops.push(LowOp::Discard(level, base + j));
    ops.push(LowOp::Read(level, base));
    ops.extend(shift(&compile_opt0(table, j as usize - 1, c, 0, level), base));
    ops
}

/// Compiles `DiskRevolve(l, cm)` at `base`: either a pure RAM-only `Opt0`
/// solve (when the table recorded no disk split at this `l`) or a
/// disk-anchored prefix plus an inner `Opt0` solve, per §4.3/§4.5.
pub fn compile_disk_revolve(
    disk_table: &DiskRevolveTable,
    opt0: &Opt0Table,
    l: usize,
    base: Step,
) -> Vec<LowOp> {
    if l == 0 {
        return vec![LowOp::Backward(base, base)];
    }
    if l == 1 {
        return vec![LowOp::Forward(base, base + 1), LowOp::Backward(base + 1, base)];
    }
    if disk_table.is_ram_only(l) {
        return compile_opt0(opt0, l, disk_table.cm, base, StorageKind::Ram);
    }
    let j = disk_table.cell(l).split.max(1) as Step;
    let mut ops = vec![
        LowOp::Forward(base, base + j),
        LowOp::Write(StorageKind::Disk, base + j),
    ];
    ops.extend(shift(
        &compile_disk_revolve(disk_table, opt0, l - j as usize, 0),
        base + j,
    ));
    ops.push(LowOp::Discard(StorageKind::Disk, base + j));
    ops.push(LowOp::Read(StorageKind::Disk, base));
    ops.extend(shift(
        &compile_opt0(opt0, j as usize - 1, disk_table.cm, 0, StorageKind::Ram),
        base,
    ));
    ops
}

/// Compiles `PeriodicDiskRevolve(l, cm)` at `base` given the chosen period
/// `p`: `floor(l/p)` disk-anchored blocks of `p` steps each (inner solved by
/// `Opt0`), plus a final partial block of `l mod p` steps.
pub fn compile_periodic_disk_revolve(
    opt0: &Opt0Table,
    l: usize,
    cm: usize,
    period: usize,
    base: Step,
) -> Vec<LowOp> {
    let mut ops = Vec::new();
    let mut cursor = base;
    let mut remaining = l;
    while remaining >= period {
        ops.push(LowOp::Forward(cursor, cursor + period as Step));
        ops.push(LowOp::Write(StorageKind::Disk, cursor + period as Step));
        cursor += period as Step;
        remaining -= period;
    }
    if remaining > 0 {
        ops.push(LowOp::Forward(cursor, cursor + remaining as Step));
        cursor += remaining as Step;
    }
    // Unwind blocks in reverse: read the anchor, replay its interior with
    // Opt0, discard, move to the previous anchor.
    let mut block_ends: Vec<Step> = Vec::new();
    let mut c = base;
    let mut rem = l;
    while rem >= period {
        c += period as Step;
        block_ends.push(c);
        rem -= period;
    }
    if rem > 0 {
        ops.extend(shift(&compile_opt0(opt0, rem, cm, 0, StorageKind::Ram), c));
    }
    for anchor in block_ends.into_iter().rev() {
        let start = anchor - period as Step;
        // The first block's anchor is `base` itself, which the forward loop
        // above never wrote to disk (disk writes start at `period`, not 0):
        // nothing to read back there, only to replay.
        if start > base {
            ops.push(LowOp::Read(StorageKind::Disk, start));
        }
        ops.extend(shift(
            &compile_opt0(opt0, period - 1, cm, 0, StorageKind::Ram),
            start,
        ));
        if start > base {
            ops.push(LowOp::Discard(StorageKind::Disk, start));
        }
    }
    let _ = cursor;
    ops
}

/// Compiles `HRevolve(l, cm, cd)` at `base`: same shape as
/// [`compile_disk_revolve`] but bounded by a disk-write budget `cd`.
pub fn compile_h_revolve(
    h_table: &HRevolveTable,
    opt0: &Opt0Table,
    l: usize,
    cd: usize,
    base: Step,
) -> Vec<LowOp> {
    if l == 0 {
        return vec![LowOp::Backward(base, base)];
    }
    if l == 1 {
        return vec![LowOp::Forward(base, base + 1), LowOp::Backward(base + 1, base)];
    }
    if cd == 0 || h_table.is_ram_only(l, cd) {
        return compile_opt0(opt0, l, h_table.cm, base, StorageKind::Ram);
    }
    let j = h_table.cell(l, cd).split.max(1) as Step;
    let mut ops = vec![
        LowOp::Forward(base, base + j),
        LowOp::Write(StorageKind::Disk, base + j),
    ];
    ops.extend(shift(
        &compile_h_revolve(h_table, opt0, l - j as usize, cd - 1, 0),
        base + j,
    ));
    ops.push(LowOp::Discard(StorageKind::Disk, base + j));
    ops.push(LowOp::Read(StorageKind::Disk, base));
    ops.extend(shift(
        &compile_opt0(opt0, j as usize - 1, h_table.cm, 0, StorageKind::Ram),
        base,
    ));
    ops
}

/// Compiles `Mixed(l, c)` at `base`: same recursive shape as `compile_opt0`,
/// but the tail recurses into the combined-budget `Mixed` table while the
/// front (once freed) falls back to plain `Opt0` (§4.8).
pub fn compile_mixed(
    mixed: &MixedTable,
    opt0: &Opt0Table,
    l: usize,
    c: usize,
    base: Step,
    level: StorageKind,
) -> Vec<LowOp> {
    if l == 0 {
        return vec![LowOp::Backward(base, base)];
    }
    if l == 1 {
        return vec![LowOp::Forward(base, base + 1), LowOp::Backward(base + 1, base)];
    }
    let j = mixed.cell(l, c).split.max(1) as Step;
    let mut ops = vec![LowOp::Forward(base, base + j), LowOp::Write(level, base + j)];
    ops.extend(shift(
        &compile_mixed(mixed, opt0, l - j as usize, c - 1, 0, level),
        base + j,
    ));
    ops.push(LowOp::Discard(level, base + j));
    ops.push(LowOp::Read(level, base));
    ops.extend(shift(&compile_opt0(opt0, j as usize - 1, c, 0, level), base));
    ops
}
