//! Dashboard counters derived from the visible sets.

use std::collections::BTreeMap;

use jiff::civil::Date;
use jiff::tz::TimeZone;
use serde::Serialize;

use crate::filter::{QuickFilter, parse_due};
use crate::model::{Client, ClientStatus, Task};

/// Counters shown on the dashboard cards.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub total_leads: usize,
    pub by_status: BTreeMap<ClientStatus, usize>,
    pub unassigned: usize,
    /// Loan amount summed over approved and active clients.
    pub converted_amount: f64,
    /// Tasks due on the reference day, completed or not, as counted by
    /// [`QuickFilter::Today`].
    pub tasks_today: usize,
    /// Open tasks due before the reference day, as counted by
    /// [`QuickFilter::Overdue`].
    pub tasks_overdue: usize,
    pub tasks_completed: usize,
    pub tasks_pending: usize,
}

impl Summary {
    /// Compute counters over what the viewer can already see.
    ///
    /// Pass the output of the visibility filter, never the full collections.
    pub fn compute(clients: &[&Client], tasks: &[&Task], reference: Date, tz: &TimeZone) -> Self {
        let mut summary = Summary {
            total_leads: clients.len(),
            ..Default::default()
        };
        for status in ClientStatus::ALL {
            summary.by_status.insert(status, 0);
        }

        for client in clients {
            *summary.by_status.entry(client.status).or_default() += 1;
            if client.assigned_to.is_none() {
                summary.unassigned += 1;
            }
            if client.status.is_converted() {
                summary.converted_amount += client.loan_amount.unwrap_or(0.0);
            }
        }

        for task in tasks {
            let due = parse_due(&task.due_date, tz);
            if QuickFilter::Today.matches(task, due, reference) {
                summary.tasks_today += 1;
            }
            if QuickFilter::Overdue.matches(task, due, reference) {
                summary.tasks_overdue += 1;
            }
            if task.completed {
                summary.tasks_completed += 1;
            } else {
                summary.tasks_pending += 1;
            }
        }

        summary
    }

    /// Share of visible leads that reached an approved or active status, in percent.
    pub fn conversion_rate(&self) -> f64 {
        if self.total_leads == 0 {
            return 0.0;
        }
        let converted: usize = self
            .by_status
            .iter()
            .filter(|(status, _)| status.is_converted())
            .map(|(_, count)| count)
            .sum();
        converted as f64 * 100.0 / self.total_leads as f64
    }
}
