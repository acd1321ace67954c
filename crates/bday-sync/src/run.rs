//! One reconciliation pass.

use bday_core::{
  change::SyncReport,
  event::CalendarHandle,
  store::CalendarStore,
};
use chrono::{DateTime, Utc};

use crate::{Error, Result, SyncConfig, derive::derive_events, diff};

/// What a completed run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncOutcome {
  pub principal:  String,
  pub calendar:   CalendarHandle,
  /// Contacts mentioning a birthday at all, before parsing.
  pub candidates: usize,
  pub report:     SyncReport,
}

/// Sync the birthdays of the first principal into its birthday calendar.
///
/// Fails with [`Error::NoPrincipal`] before writing anything when there is no
/// principal. All event changes of the run commit in a single transaction.
pub async fn run<S: CalendarStore>(
  store: &S,
  config: &SyncConfig,
  now: DateTime<Utc>,
) -> Result<SyncOutcome> {
  let principal = store
    .first_principal(config.principal_prefix.clone())
    .await
    .map_err(Error::store)?
    .ok_or_else(|| Error::NoPrincipal(config.principal_prefix.clone()))?;

  let calendar = store
    .ensure_calendar(principal.clone(), config.calendar_spec())
    .await
    .map_err(Error::store)?;
  tracing::info!(
    %principal,
    calendar = %calendar.id,
    created = calendar.created,
    "using birthday calendar"
  );

  let contacts = store.birthday_contacts().await.map_err(Error::store)?;
  let desired = derive_events(&contacts, now);
  tracing::info!(
    candidates = contacts.len(),
    birthdays = desired.len(),
    "derived birthday events"
  );

  let report = store
    .reconcile(calendar.id, move |existing| diff::plan(existing, desired))
    .await
    .map_err(Error::store)?;
  tracing::info!(
    created = report.created,
    updated = report.updated,
    unchanged = report.unchanged,
    deleted = report.deleted,
    sync_token = report.sync_token,
    "birthday calendar reconciled"
  );

  Ok(SyncOutcome {
    principal,
    calendar,
    candidates: contacts.len(),
    report,
  })
}
