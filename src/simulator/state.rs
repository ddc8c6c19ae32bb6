use crate::Amount;
use crate::footprint::round_half_up;
use crate::model::Transaction;

/// Lifecycle of the simulator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Simulator closed, no session.
    Idle,
    /// Scenarios left to play.
    Active,
    /// Every scenario was either committed or skipped.
    Complete,
}

/// Modal currently shown over the simulator, carrying its pending transaction.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Modal {
    #[default]
    None,
    /// Informational; dismissed by the commit timer.
    CarbonImpact(Transaction),
    /// Blocking; waits for the user to cancel the purchase.
    BudgetExceeded(Transaction),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalKind {
    CarbonImpact,
    BudgetExceeded,
}

impl Modal {
    pub fn kind(&self) -> Option<ModalKind> {
        match self {
            Modal::None => None,
            Modal::CarbonImpact(_) => Some(ModalKind::CarbonImpact),
            Modal::BudgetExceeded(_) => Some(ModalKind::BudgetExceeded),
        }
    }

    pub fn pending_transaction(&self) -> Option<&Transaction> {
        match self {
            Modal::None => None,
            Modal::CarbonImpact(tx) | Modal::BudgetExceeded(tx) => Some(tx),
        }
    }

    pub fn is_active(&self) -> bool {
        !matches!(self, Modal::None)
    }
}

/// State of one simulator run, from `open` to `close`.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub current_step: usize,
    pub daily_budget: Amount,
    pub spent_so_far: Amount,
    pub transaction_log: Vec<Transaction>,
    pub modal: Modal,
}

impl Session {
    pub fn new(daily_budget: Amount) -> Self {
        Self {
            current_step: 0,
            daily_budget,
            spent_so_far: Amount::default(),
            transaction_log: Vec::new(),
            modal: Modal::None,
        }
    }

    pub fn remaining(&self) -> Amount {
        self.daily_budget - self.spent_so_far
    }

    /// Share of the daily budget already spent, in percent (1 decimal).
    pub fn utilization_percentage(&self) -> f64 {
        if !self.daily_budget.is_positive() {
            return 0.0;
        }
        let ratio = self.spent_so_far.to_f64() / self.daily_budget.to_f64();
        round_half_up(ratio * 100.0, 1)
    }

    pub fn pending_transaction(&self) -> Option<&Transaction> {
        self.modal.pending_transaction()
    }

    /// Aggregates over committed transactions.
    pub fn totals(&self) -> Totals {
        let total_carbon_generated: f64 = self
            .transaction_log
            .iter()
            .map(|tx| tx.result.carbon_generated_kg)
            .sum();
        let total_offset: f64 = self
            .transaction_log
            .iter()
            .map(|tx| tx.result.carbon_offset_kg)
            .sum();

        let offset_percentage = if total_carbon_generated > 0.0 {
            round_half_up(total_offset / total_carbon_generated * 100.0, 1)
        } else {
            0.0
        };

        Totals {
            total_carbon_generated,
            total_offset,
            offset_percentage,
            net_impact: total_carbon_generated - total_offset,
        }
    }
}

/// Carbon aggregates recomputed from the transaction log.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Totals {
    pub total_carbon_generated: f64,
    pub total_offset: f64,
    /// Not capped; offsets can exceed the footprint across a day.
    pub offset_percentage: f64,
    /// Negative when the day is carbon negative.
    pub net_impact: f64,
}

/// Banner shown once every scenario has been played.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionSummary {
    pub streak: u32,
    pub spent: Amount,
    pub remaining: Amount,
    pub committed: usize,
    pub skipped: usize,
    pub totals: Totals,
}

impl CompletionSummary {
    pub fn offset_percentage(&self) -> f64 {
        self.totals.offset_percentage
    }
}
