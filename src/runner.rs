use crate::config::{ErrorPolicy, Watch};
use crate::extract::{Transform, extract_text};
use crate::fetch::Fetch;
use crate::fingerprint::fingerprint;
use crate::notify::{Notify, WatchStatus};
use crate::state::{StateError, StateStore};
use std::path::Path;
use tracing::{debug, error};

/// Result of checking a single watch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckOutcome {
    /// The fetch failed (transport error or HTTP status >= 400). No
    /// fingerprint was computed and the state was not touched.
    FetchFailed,
    /// The selector matched zero elements. State was not touched.
    NoElements,
    /// No fingerprint was stored for this label before; one is now.
    FirstObservation,
    /// The fingerprint differs from the stored one; the store was updated.
    Changed,
    /// The fingerprint matches the stored one. Logged only, no notification.
    Unchanged,
}

impl CheckOutcome {
    /// Anomalies are the outcomes that should make the process exit
    /// nonzero. A changed page is the tool working as intended, not an
    /// anomaly.
    pub fn is_anomaly(self) -> bool {
        matches!(self, CheckOutcome::FetchFailed | CheckOutcome::NoElements)
    }
}

#[derive(Debug)]
pub struct WatchReport {
    pub label: String,
    pub outcome: CheckOutcome,
    /// True if a notification for this watch could not be delivered.
    pub notify_failed: bool,
}

impl WatchReport {
    pub fn is_anomalous(&self) -> bool {
        self.outcome.is_anomaly() || self.notify_failed
    }
}

/// Aggregate result of a run, returned to the caller for exit-code
/// decisions instead of tracking failure in shared mutable process state.
#[derive(Debug, Default)]
pub struct RunSummary {
    pub reports: Vec<WatchReport>,
    /// True if the run stopped early under [`ErrorPolicy::Abort`].
    pub aborted: bool,
}

impl RunSummary {
    pub fn has_anomalies(&self) -> bool {
        self.reports.iter().any(|r| r.is_anomalous())
    }
}

/// Checks one watch: fetch, extract, transform, fingerprint, compare
/// against the stored fingerprint, notify, persist.
///
/// The state store is loaded and saved within this call (read-modify-write
/// per watch). The store is only written when a fingerprint was computed;
/// fetch failures and empty selector matches leave the previous state
/// intact. Notification failures are logged and reported but never block
/// the state update.
pub fn check_watch(
    watch: &Watch,
    fetcher: &dyn Fetch,
    transform: &dyn Transform,
    state_path: &Path,
    notifier: &mut dyn Notify,
) -> Result<WatchReport, StateError> {
    println!(
        "fetching website for '{}' from URL '{}'...",
        watch.label, watch.url
    );

    let page = match fetcher.fetch(&watch.url) {
        Ok(page) => page,
        Err(e) => {
            error!("fetch failed for '{}': {}", watch.label, e);
            let status = WatchStatus::FetchFailed {
                detail: e.to_string(),
            };
            let notify_failed = !send(notifier, &status, watch);
            return Ok(WatchReport {
                label: watch.label.clone(),
                outcome: CheckOutcome::FetchFailed,
                notify_failed,
            });
        }
    };

    debug!(
        "fetched '{}' with HTTP status {}",
        watch.label, page.status
    );

    println!(
        "> parsing website content (selector is '{}')",
        watch.selector_source
    );

    let condensed = match extract_text(&page.body, &watch.selector) {
        Some(condensed) => condensed,
        None => {
            let status = WatchStatus::NoElements {
                selector: watch.selector_source.clone(),
            };
            let notify_failed = !send(notifier, &status, watch);
            return Ok(WatchReport {
                label: watch.label.clone(),
                outcome: CheckOutcome::NoElements,
                notify_failed,
            });
        }
    };

    let content = transform.apply(&condensed);
    let current = fingerprint(&content);

    debug!("fingerprint for '{}' is {}", watch.label, current);

    let mut store = StateStore::load_or_default(state_path)?;

    let (outcome, status) = match store.fingerprint_of(&watch.label) {
        None => (
            CheckOutcome::FirstObservation,
            Some(WatchStatus::NoPreviousState),
        ),
        Some(prev) if prev != current => {
            println!("> change detected");
            (CheckOutcome::Changed, Some(WatchStatus::Changed))
        }
        Some(_) => {
            println!("> no change detected");
            (CheckOutcome::Unchanged, None)
        }
    };

    let notify_failed = match &status {
        Some(status) => !send(notifier, status, watch),
        None => false,
    };

    store.record(&watch.label, current, chrono::Utc::now().to_rfc3339());
    store.save(state_path)?;

    Ok(WatchReport {
        label: watch.label.clone(),
        outcome,
        notify_failed,
    })
}

/// Checks every watch in sequence. One watch is fully processed before the
/// next begins. Under [`ErrorPolicy::Abort`] the run stops after the first
/// anomalous report; under [`ErrorPolicy::Continue`] anomalies are recorded
/// in the summary and the remaining watches still run.
pub fn run_watches(
    watches: &[Watch],
    fetcher: &dyn Fetch,
    transform: &dyn Transform,
    state_path: &Path,
    notifier: &mut dyn Notify,
    policy: ErrorPolicy,
) -> Result<RunSummary, StateError> {
    let mut summary = RunSummary::default();

    for watch in watches {
        let report = check_watch(watch, fetcher, transform, state_path, notifier)?;
        let anomalous = report.is_anomalous();
        summary.reports.push(report);

        if policy == ErrorPolicy::Abort && anomalous {
            summary.aborted = true;
            break;
        }
    }

    Ok(summary)
}

fn send(notifier: &mut dyn Notify, status: &WatchStatus, watch: &Watch) -> bool {
    match notifier.notify(status, &watch.label, &watch.url) {
        Ok(()) => true,
        Err(e) => {
            error!(
                "error sending notification for '{}' (status '{}'): {}",
                watch.label, status, e
            );
            false
        }
    }
}
