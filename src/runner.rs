use std::path::PathBuf;

use tracing::{info, warn};

use crate::Result;
use crate::config::Target;
use crate::evaluator::{CheckOutcome, TargetEvaluator};
use crate::notify::Notifier;
use crate::state::StateStore;

const MESSAGE_HEADER: &str = "<b>ALERTAS MONITOR</b>";
const FRAGMENT_SEPARATOR: &str = "\n\n-----\n\n";

/// What one run did.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct RunReport {
    pub checked: usize,
    pub skipped: usize,
    pub alerts: usize,
    pub notified: bool,
}

/// One complete monitoring pass: every target in order, at most one
/// notification, one state rewrite at the end.
pub struct Runner<N> {
    evaluator: TargetEvaluator,
    notifier: N,
    state_path: PathBuf,
    dry_run: bool,
}

impl<N: Notifier> Runner<N> {
    pub fn new(evaluator: TargetEvaluator, notifier: N, state_path: PathBuf, dry_run: bool) -> Self {
        Self {
            evaluator,
            notifier,
            state_path,
            dry_run,
        }
    }

    /// Targets are isolated: a failing fetch only skips its own state slot
    /// and the rest of the run proceeds. State is saved whether or not
    /// alerts fired, and even when delivery failed.
    pub async fn run(&self, targets: &[Target]) -> Result<RunReport> {
        let mut store = StateStore::load(&self.state_path)?;
        let mut report = RunReport::default();
        let mut fragments: Vec<String> = Vec::new();

        for target in targets {
            info!(id = %target.id, url = %target.url, "checking {}", target.label());
            match self.evaluator.check(target, store.get(&target.id)).await {
                CheckOutcome::Skipped => report.skipped += 1,
                CheckOutcome::Checked { state, alert } => {
                    report.checked += 1;
                    store.insert(&target.id, state);
                    if let Some(fragment) = alert {
                        fragments.push(fragment);
                    }
                }
            }
        }

        report.alerts = fragments.len();
        if fragments.is_empty() {
            info!("no interesting changes");
        } else {
            let message = format!("{MESSAGE_HEADER}\n\n{}", fragments.join(FRAGMENT_SEPARATOR));
            if self.dry_run {
                info!("dry-run mode: not sending telegram message");
                info!("{message}");
            } else {
                report.notified = self.notifier.send(&message).await;
                if !report.notified {
                    warn!("alert delivery failed; state is persisted anyway");
                }
            }
        }

        store.save()?;
        Ok(report)
    }
}
