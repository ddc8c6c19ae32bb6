//! Reasons a simulator operation is rejected.

use thiserror::Error;

use super::state::ModalKind;
use crate::model::SequenceId;

/// Error returned by [`Simulator::apply`](super::Simulator::apply).
///
/// A rejected operation never changes the session.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SimulatorError {
    #[error("simulator is not open")]
    NotOpen,

    #[error("all scenarios have been played")]
    Complete,

    #[error("scenario {got} submitted out of order, expected {expected}")]
    OutOfOrder {
        expected: SequenceId,
        got: SequenceId,
    },

    #[error("{0:?} modal is still active")]
    ModalActive(ModalKind),

    #[error("no budget exceeded modal to cancel")]
    NoExceededTransaction,

    #[error("no tokio runtime to run the commit timer on")]
    NoRuntime,

    #[error("commit for scenario {sequence_id} belongs to a discarded session")]
    StaleCommit { sequence_id: SequenceId },
}
