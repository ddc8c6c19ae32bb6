//! Scenario driver.
//!
//! The simulator walks a session through an ordered list of scenarios. Each
//! submitted scenario is priced with the footprint calculator and checked
//! against the remaining daily budget: affordable ones show the carbon impact
//! modal and commit after a display delay, the others block on the budget
//! exceeded modal until the user cancels. Also supports async stream of
//! commands.

use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_stream::{Stream, StreamExt};
use tracing::{debug, info, warn};

use crate::config::SimulatorConfig;
use crate::footprint::{Suggestion, compute_footprint, suggest_alternative};
use crate::model::{Scenario, SequenceId, Transaction};

mod state;
pub use state::{CompletionSummary, Modal, ModalKind, Phase, Session, Totals};

mod error;
pub use error::SimulatorError;

/// User input driving the simulator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Open,
    Close,
    Submit(SequenceId),
    CancelExceeded,
}

/// Sent by the commit timer once the display delay has elapsed.
#[derive(Debug, Clone, Copy)]
struct CommitTicket {
    epoch: u64,
    sequence_id: SequenceId,
}

/// The transaction simulator.
///
/// Owns the scenario list, the streak and at most one open session.
pub struct Simulator {
    config: SimulatorConfig,
    scenarios: Vec<Scenario>,
    session: Option<Session>,
    streak: u32,
    /// Bumped on every open/close so in-flight tickets can be told apart
    epoch: u64,
    commit_timer: Option<JoinHandle<()>>,
    commit_tx: mpsc::Sender<CommitTicket>,
    commit_rx: mpsc::Receiver<CommitTicket>,
}

/// Public API
impl Simulator {
    /// Scenarios are played in `sequence_id` order; duplicate ids keep the first entry.
    pub fn new(config: SimulatorConfig, mut scenarios: Vec<Scenario>) -> Self {
        scenarios.sort_by_key(|s| s.sequence_id);
        let before = scenarios.len();
        scenarios.dedup_by_key(|s| s.sequence_id);
        if scenarios.len() != before {
            warn!(
                dropped = before - scenarios.len(),
                "duplicate scenario ids dropped"
            );
        }

        let (commit_tx, commit_rx) = mpsc::channel(16);

        Self {
            streak: config.streak_seed,
            config,
            scenarios,
            session: None,
            epoch: 0,
            commit_timer: None,
            commit_tx,
            commit_rx,
        }
    }

    /// Start a fresh session, discarding any previous one.
    pub fn open(&mut self) {
        self.cancel_commit_timer();
        self.epoch += 1;
        self.session = Some(Session::new(self.config.daily_budget));
        info!(
            budget = %self.config.daily_budget,
            streak = self.streak,
            scenarios = self.scenarios.len(),
            "simulator opened"
        );
    }

    /// Discard the session. A pending commit never fires.
    pub fn close(&mut self) {
        self.cancel_commit_timer();
        self.epoch += 1;
        if self.session.take().is_some() {
            info!(streak = self.streak, "simulator closed");
        }
    }

    /// Submit the scenario with `sequence_id`; it must be the current one.
    ///
    /// An affordable scenario starts the commit timer, which needs a tokio
    /// runtime; without one the submit is rejected with `NoRuntime`.
    pub fn submit(&mut self, sequence_id: SequenceId) -> Result<(), SimulatorError> {
        let result = self.apply_submit(sequence_id);
        Self::log_result("submit", Some(sequence_id), &result);
        result
    }

    /// Skip the scenario blocked by the budget exceeded modal.
    pub fn cancel_exceeded_transaction(&mut self) -> Result<(), SimulatorError> {
        let result = self.apply_cancel_exceeded();
        Self::log_result("cancel", None, &result);
        result
    }

    /// Apply a single command on top of the current state
    pub fn apply(&mut self, command: Command) -> Result<(), SimulatorError> {
        match command {
            Command::Open => {
                self.open();
                Ok(())
            }
            Command::Close => {
                self.close();
                Ok(())
            }
            Command::Submit(sequence_id) => self.submit(sequence_id),
            Command::CancelExceeded => self.cancel_exceeded_transaction(),
        }
    }

    /// Run the simulator with the given command stream, committing
    /// transactions as their timers fire. Waits for a pending commit once the
    /// stream ends.
    pub async fn run(&mut self, mut commands: impl Stream<Item = Command> + Unpin) {
        loop {
            tokio::select! {
                command = commands.next() => match command {
                    // rejected commands leave the session untouched, keep going
                    Some(command) => {
                        let _ = self.apply(command);
                    }
                    None => break,
                },
                Some(ticket) = self.commit_rx.recv() => {
                    let _ = self.handle_commit(ticket);
                }
            }
        }
        self.settle().await;
    }

    /// Wait for the pending commit, if any, and apply it.
    pub async fn settle(&mut self) {
        while self.commit_timer.is_some() {
            match self.commit_rx.recv().await {
                Some(ticket) => {
                    let _ = self.handle_commit(ticket);
                }
                None => break,
            }
        }
    }

    pub fn phase(&self) -> Phase {
        match &self.session {
            None => Phase::Idle,
            Some(session) if session.current_step >= self.scenarios.len() => Phase::Complete,
            Some(_) => Phase::Active,
        }
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn streak(&self) -> u32 {
        self.streak
    }

    pub fn config(&self) -> &SimulatorConfig {
        &self.config
    }

    pub fn scenarios(&self) -> &[Scenario] {
        &self.scenarios
    }

    /// The scenario waiting to be submitted.
    pub fn current_scenario(&self) -> Option<&Scenario> {
        let session = self.session.as_ref()?;
        self.scenarios.get(session.current_step)
    }

    pub fn totals(&self) -> Option<Totals> {
        self.session.as_ref().map(Session::totals)
    }

    /// Lower-emission alternative for the purchase in the carbon impact modal.
    pub fn pending_suggestion(&self) -> Option<Suggestion> {
        match &self.session.as_ref()?.modal {
            Modal::CarbonImpact(tx) => {
                suggest_alternative(tx.scenario.amount, &tx.scenario.category)
            }
            _ => None,
        }
    }

    /// Summary banner, only once every scenario has been played.
    pub fn completion(&self) -> Option<CompletionSummary> {
        if self.phase() != Phase::Complete {
            return None;
        }
        let session = self.session.as_ref()?;
        let committed = session.transaction_log.len();
        Some(CompletionSummary {
            streak: self.streak,
            spent: session.spent_so_far,
            remaining: session.remaining(),
            committed,
            skipped: session.current_step - committed,
            totals: session.totals(),
        })
    }
}

/// Private API
impl Simulator {
    /// Small helper to log operation results
    fn log_result(
        op: &str,
        sequence_id: Option<SequenceId>,
        result: &Result<(), SimulatorError>,
    ) {
        match (result, sequence_id) {
            (Ok(()), Some(id)) => info!(sequence_id = id, "{op} applied"),
            (Ok(()), None) => info!("{op} applied"),
            (Err(e), Some(id)) => info!(sequence_id = id, reason = %e, "{op} skipped"),
            (Err(e), None) => info!(reason = %e, "{op} skipped"),
        }
    }

    /// Submit a scenario:
    /// - Ensure a session is open and not complete
    /// - Ensure no modal is waiting on the user or the timer
    /// - Ensure the scenario is the current one
    /// - Show the budget exceeded modal, or the carbon impact modal and start the commit timer
    ///   (rejected without a runtime to run it on)
    fn apply_submit(&mut self, sequence_id: SequenceId) -> Result<(), SimulatorError> {
        let session = self.session.as_mut().ok_or(SimulatorError::NotOpen)?;
        let scenario = self
            .scenarios
            .get(session.current_step)
            .ok_or(SimulatorError::Complete)?;

        if let Some(kind) = session.modal.kind() {
            return Err(SimulatorError::ModalActive(kind));
        }

        if scenario.sequence_id != sequence_id {
            return Err(SimulatorError::OutOfOrder {
                expected: scenario.sequence_id,
                got: sequence_id,
            });
        }

        let remaining = session.remaining();
        let result = compute_footprint(scenario.amount, &scenario.category);
        let exceeded = scenario.amount > remaining;
        let tx = Transaction {
            scenario: scenario.clone(),
            result,
            exceeded,
        };

        if exceeded {
            info!(
                sequence_id,
                amount = %scenario.amount,
                remaining = %remaining,
                "budget exceeded"
            );
            session.modal = Modal::BudgetExceeded(tx);
        } else {
            let runtime = Handle::try_current().map_err(|_| SimulatorError::NoRuntime)?;
            session.modal = Modal::CarbonImpact(tx);
            self.start_commit_timer(&runtime, sequence_id);
        }

        Ok(())
    }

    /// Cancel an over-budget purchase:
    /// - Ensure the budget exceeded modal is active
    /// - Skip the scenario without spending or logging it
    /// - Reward the user with one more streak day
    fn apply_cancel_exceeded(&mut self) -> Result<(), SimulatorError> {
        let session = self.session.as_mut().ok_or(SimulatorError::NotOpen)?;

        if !matches!(session.modal, Modal::BudgetExceeded(_)) {
            return Err(SimulatorError::NoExceededTransaction);
        }

        session.modal = Modal::None;
        session.current_step += 1;
        self.streak += 1;

        Ok(())
    }

    /// Commit the transaction shown in the carbon impact modal.
    fn handle_commit(&mut self, ticket: CommitTicket) -> Result<(), SimulatorError> {
        let result = self.apply_commit(ticket);
        Self::log_result("commit", Some(ticket.sequence_id), &result);
        result
    }

    fn apply_commit(&mut self, ticket: CommitTicket) -> Result<(), SimulatorError> {
        let stale = SimulatorError::StaleCommit {
            sequence_id: ticket.sequence_id,
        };

        if ticket.epoch != self.epoch {
            return Err(stale);
        }
        self.commit_timer = None;

        let session = self.session.as_mut().ok_or(SimulatorError::NotOpen)?;
        match std::mem::take(&mut session.modal) {
            Modal::CarbonImpact(tx) if tx.scenario.sequence_id == ticket.sequence_id => {
                session.spent_so_far += tx.scenario.amount;
                session.transaction_log.push(tx);
                session.current_step += 1;
                debug_assert!(session.spent_so_far <= session.daily_budget);
                Ok(())
            }
            other => {
                session.modal = other;
                Err(stale)
            }
        }
    }

    fn start_commit_timer(&mut self, runtime: &Handle, sequence_id: SequenceId) {
        let ticket = CommitTicket {
            epoch: self.epoch,
            sequence_id,
        };
        let sender = self.commit_tx.clone();
        let delay = self.config.commit_delay;

        debug!(sequence_id, ?delay, "commit timer started");
        self.commit_timer = Some(runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            // the receiver lives as long as the simulator
            let _ = sender.send(ticket).await;
        }));
    }

    fn cancel_commit_timer(&mut self) {
        if let Some(handle) = self.commit_timer.take() {
            handle.abort();
            debug!("commit timer cancelled");
        }
    }
}

impl Drop for Simulator {
    fn drop(&mut self) {
        self.cancel_commit_timer();
    }
}
