//! Internal, unexposed low-level operations the compiler (§4.4) emits while
//! walking a cost table's backtrack decisions. The Revolve adapters fold
//! these into the public [`crate::action::Action`] stream; nothing here ever
//! reaches a driver directly.

use crate::action::{Step, StorageKind};

/// One primitive step of a compiled low-level program.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LowOp {
    /// Advance one step with no checkpointing side effect.
    Forward1,
    /// Advance from `t0` to `t1` (`t1 > t0`).
    Forward(Step, Step),
    /// Run the adjoint from `t1` back to `t0` (`t0 < t1`).
    Backward(Step, Step),
    /// Persist the live restart state for step `i` to level `l`.
    Write(StorageKind, Step),
    /// Restore step `i`'s restart state from level `l` into the live buffer.
    Read(StorageKind, Step),
    /// Free step `i`'s restart slot on level `l`.
    Discard(StorageKind, Step),
    /// Persist the live adjoint-dependency data for step `i` to level `l`.
    WriteForward(StorageKind, Step),
    /// Restore step `i`'s adjoint-dependency data from level `l`.
    ReadForward(StorageKind, Step),
    /// Free step `i`'s adjoint-dependency slot on level `l`.
    DiscardForward(StorageKind, Step),
}

impl LowOp {
    /// The `(level, step)` key this op addresses, if it addresses storage at all.
    fn storage_key(&self) -> Option<(StorageKind, Step)> {
        match *self {
            LowOp::Write(l, i)
            | LowOp::Read(l, i)
            | LowOp::Discard(l, i)
            | LowOp::WriteForward(l, i)
            | LowOp::ReadForward(l, i)
            | LowOp::DiscardForward(l, i) => Some((l, i)),
            LowOp::Forward1 | LowOp::Forward(..) | LowOp::Backward(..) => None,
        }
    }

    fn is_read(&self) -> bool {
        matches!(self, LowOp::Read(..) | LowOp::ReadForward(..))
    }

    fn is_discard(&self) -> bool {
        matches!(self, LowOp::Discard(..) | LowOp::DiscardForward(..))
    }

    fn is_write_or_read(&self) -> bool {
        matches!(
            self,
            LowOp::Write(..) | LowOp::Read(..) | LowOp::WriteForward(..) | LowOp::ReadForward(..)
        )
    }
}

/// Reindex every step number in `seq` by `k`. Used when splicing a compiled
/// sub-problem solved for interval `[0, l)` into a schedule for an interval
/// starting at `k`.
pub fn shift(seq: &[LowOp], k: Step) -> Vec<LowOp> {
    seq.iter()
        .map(|op| match *op {
            LowOp::Forward1 => LowOp::Forward1,
            LowOp::Forward(a, b) => LowOp::Forward(a + k, b + k),
            LowOp::Backward(a, b) => LowOp::Backward(a + k, b + k),
            LowOp::Write(l, i) => LowOp::Write(l, i + k),
            LowOp::Read(l, i) => LowOp::Read(l, i + k),
            LowOp::Discard(l, i) => LowOp::Discard(l, i + k),
            LowOp::WriteForward(l, i) => LowOp::WriteForward(l, i + k),
            LowOp::ReadForward(l, i) => LowOp::ReadForward(l, i + k),
            LowOp::DiscardForward(l, i) => LowOp::DiscardForward(l, i + k),
        })
        .collect()
}

/// For every `Read`/`ReadForward` in `seq`, reports whether a matching
/// `Discard`/`DiscardForward` of the same `(level, step)` follows later in
/// the sequence with no intervening `Write`/`Read` of that key — i.e.
/// whether this read is the slot's last use. The adapter (§4.5 rule 3) turns
/// a last-use read into a `Move`, and any other read into a `Copy`.
pub fn last_use(seq: &[LowOp]) -> Vec<bool> {
    let mut result = vec![false; seq.len()];
    for (idx, op) in seq.iter().enumerate() {
        if !op.is_read() {
            continue;
        }
        let key = op.storage_key().expect("read ops always have a storage key");
        for later in &seq[idx + 1..] {
            if later.storage_key() != Some(key) {
                continue;
            }
            if later.is_discard() {
                result[idx] = true;
                break;
            }
            if later.is_write_or_read() {
                break;
            }
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shift_moves_every_step_index() {
        let seq = vec![
            LowOp::Forward(0, 2),
            LowOp::Write(StorageKind::Ram, 2),
            LowOp::Backward(2, 0),
        ];
        let shifted = shift(&seq, 5);
        assert_eq!(
            shifted,
            vec![
                LowOp::Forward(5, 7),
                LowOp::Write(StorageKind::Ram, 7),
                LowOp::Backward(7, 5),
            ]
        );
    }

    #[test]
    fn last_use_detects_discard_after_read() {
        let seq = vec![
            LowOp::Read(StorageKind::Ram, 0),
            LowOp::Forward(0, 2),
            LowOp::Discard(StorageKind::Ram, 0),
        ];
        assert_eq!(last_use(&seq), vec![true, false, false]);
    }

    #[test]
    fn last_use_false_when_read_again_before_discard() {
        let seq = vec![
            LowOp::Read(StorageKind::Ram, 0),
            LowOp::Read(StorageKind::Ram, 0),
            LowOp::Discard(StorageKind::Ram, 0),
        ];
        assert_eq!(last_use(&seq), vec![false, true, false]);
    }
}
