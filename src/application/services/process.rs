//! Business process pipeline shared by every handler
//!
//! duplicate check → open process → authorize → run rules → complete →
//! publish. Handlers supply the GSRN, the parsed input and the aggregate
//! change.

use std::sync::Arc;

use tracing::{info, warn};

use crate::application::events::types::{MessageConfirmedEvent, MessageRejectedEvent};
use crate::application::events::{IntegrationEvent, SharedEventBus};
use crate::application::market::{validate_input, BusinessProcessResult, MarketDocument};
use crate::domain::rules::ValidationError;
use crate::domain::values::GlnNumber;
use crate::domain::{
    BusinessProcess, BusinessProcessType, DomainError, DomainResult, MeteringPointEvent,
    RepositoryProvider,
};

/// Outcome of the rule-checking part of a process.
pub(crate) type Outcome = Result<Vec<MeteringPointEvent>, Vec<ValidationError>>;

pub(crate) struct ProcessRunner {
    pub repos: Arc<dyn RepositoryProvider>,
    pub event_bus: SharedEventBus,
}

pub(crate) enum Opened {
    Duplicate(BusinessProcessResult),
    Pending(BusinessProcess),
}

impl ProcessRunner {
    /// Reject a reused transaction id, otherwise store a pending process.
    ///
    /// A document without a transaction id or with a malformed sender GLN
    /// cannot be answered and fails with [`DomainError::Validation`].
    pub async fn open<T>(
        &self,
        process_type: BusinessProcessType,
        gsrn: &str,
        document: &MarketDocument<T>,
    ) -> DomainResult<Opened> {
        let envelope_errors = validate_input(document);
        if !envelope_errors.is_empty() {
            let message = envelope_errors
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("; ");
            return Err(DomainError::Validation(message));
        }

        let transaction_id = document.transaction_id.trim();
        if self
            .repos
            .business_processes()
            .find_by_transaction_id(transaction_id)
            .await?
            .is_some()
        {
            return Ok(self.duplicate(process_type, gsrn, transaction_id, &document.sender_gln));
        }

        let process = BusinessProcess::new(transaction_id, process_type, gsrn);
        match self.repos.business_processes().add(&process).await {
            Ok(()) => Ok(Opened::Pending(process)),
            // Another request with the same id got stored in between.
            Err(DomainError::Conflict(_)) => Ok(self.duplicate(
                process_type,
                gsrn,
                transaction_id,
                &document.sender_gln,
            )),
            Err(e) => Err(e),
        }
    }

    fn duplicate(
        &self,
        process_type: BusinessProcessType,
        gsrn: &str,
        transaction_id: &str,
        sender_gln: &str,
    ) -> Opened {
        warn!(
            transaction_id,
            gsrn,
            process = %process_type,
            "Duplicate transaction id rejected"
        );
        let result = BusinessProcessResult::duplicate(transaction_id, process_type, gsrn);
        self.publish_answer(&result, sender_gln);
        record_metric(&result);
        Opened::Duplicate(result)
    }

    /// Complete the process, persist it and publish its events and answer.
    pub async fn complete(
        &self,
        mut process: BusinessProcess,
        sender_gln: &str,
        outcome: Outcome,
    ) -> DomainResult<BusinessProcessResult> {
        let events = match outcome {
            Ok(events) => {
                process.accept()?;
                events
            }
            Err(errors) => {
                process.reject(errors)?;
                Vec::new()
            }
        };
        self.repos.business_processes().update(&process).await?;

        let result = BusinessProcessResult::from_process(&process);
        if result.is_accepted() {
            info!(
                transaction_id = %result.transaction_id,
                gsrn = %result.gsrn,
                process = %result.process_type,
                "Business process accepted"
            );
        } else {
            warn!(
                transaction_id = %result.transaction_id,
                gsrn = %result.gsrn,
                process = %result.process_type,
                codes = ?result.codes(),
                "Business process rejected"
            );
        }

        for event in events {
            self.event_bus.publish(IntegrationEvent::from(event));
        }
        self.publish_answer(&result, sender_gln);
        record_metric(&result);
        Ok(result)
    }

    fn publish_answer(&self, result: &BusinessProcessResult, sender_gln: &str) {
        let event = if result.is_accepted() {
            IntegrationEvent::MessageConfirmed(MessageConfirmedEvent {
                transaction_id: result.transaction_id.clone(),
                process_type: result.process_type.to_string(),
                gsrn: result.gsrn.clone(),
                receiver_gln: sender_gln.to_string(),
            })
        } else {
            IntegrationEvent::MessageRejected(MessageRejectedEvent {
                transaction_id: result.transaction_id.clone(),
                process_type: result.process_type.to_string(),
                gsrn: result.gsrn.clone(),
                receiver_gln: sender_gln.to_string(),
                reasons: result.errors.clone(),
            })
        };
        self.event_bus.publish(event);
    }
}

fn record_metric(result: &BusinessProcessResult) {
    metrics::counter!(
        "business_processes_total",
        "process" => result.process_type.as_str(),
        "outcome" => result.status.as_str()
    )
    .increment(1);
}

/// Parse the sender GLN, adding the failure to `errors`.
pub(crate) fn parse_sender(
    sender_gln: &str,
    errors: &mut Vec<ValidationError>,
) -> Option<GlnNumber> {
    match GlnNumber::create(sender_gln) {
        Ok(gln) => Some(gln),
        Err(e) => {
            errors.push(e);
            None
        }
    }
}

/// Split a domain failure into rule errors, which reject the process, and
/// everything else, which aborts it.
pub(crate) fn rule_errors(error: DomainError) -> DomainResult<Vec<ValidationError>> {
    match error {
        DomainError::BusinessRules(errors) => Ok(errors),
        other => Err(other),
    }
}

