//! The [`FiscalEngine`] facade: resolve, then calculate, under a session
//! ticket.

use fisco_client::FiscoClient;
use fisco_core::{ClientId, CompanyId, FiscalDocument, JurisdictionCode};

use crate::error::EngineError;
use crate::orchestrator::{EngineSettings, TaxOrchestrator};
use crate::resolver::{ConfigResolver, FallbackNotice};
use crate::session::{CalculationSession, Completion};
use crate::source::{JurisdictionConfigSource, PartnerDirectory, TaxEngine};

/// Result of one [`FiscalEngine::recompute`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecomputeOutcome {
    /// Issue-order sequence number of this recompute.
    pub sequence: u64,
    /// What the session did with the result.
    pub completion: Completion,
    /// Set when a fallback configuration was used.
    pub fallback: Option<FallbackNotice>,
}

/// Fiscal computation engine over its three upstream seams.
#[derive(Debug, Clone)]
pub struct FiscalEngine<S, E, P> {
    resolver: ConfigResolver<S>,
    orchestrator: TaxOrchestrator<E>,
    partners: P,
}

impl FiscalEngine<FiscoClient, FiscoClient, FiscoClient> {
    /// Engine backed by the HTTP services behind `client`.
    pub fn from_client(client: FiscoClient, settings: EngineSettings) -> Self {
        let company_id = client.company_id().clone();
        Self::new(client.clone(), client.clone(), client, company_id, settings)
    }
}

impl<S, E, P> FiscalEngine<S, E, P>
where
    S: JurisdictionConfigSource,
    E: TaxEngine,
    P: PartnerDirectory,
{
    /// Assemble an engine from its sources.
    pub fn new(
        configs: S,
        tax_engine: E,
        partners: P,
        company_id: CompanyId,
        settings: EngineSettings,
    ) -> Self {
        Self {
            resolver: ConfigResolver::new(configs),
            orchestrator: TaxOrchestrator::new(tax_engine, company_id, settings),
            partners,
        }
    }

    /// The configuration resolver.
    pub fn resolver(&self) -> &ConfigResolver<S> {
        &self.resolver
    }

    /// The calculation orchestrator.
    pub fn orchestrator(&self) -> &TaxOrchestrator<E> {
        &self.orchestrator
    }

    /// Recalculate `doc` within `session`.
    ///
    /// The ticket is taken before the first await, so issue order is call
    /// order. The document is read, not written; apply the session's latest
    /// result with [`CalculationSession::apply_latest`].
    pub async fn recompute(
        &self,
        session: &CalculationSession,
        doc: &FiscalDocument,
    ) -> RecomputeOutcome {
        let ticket = session.begin();
        let sequence = ticket.sequence();

        if !doc.has_items() {
            return RecomputeOutcome {
                sequence,
                completion: session.complete(ticket, Err(EngineError::EmptyDocument)),
                fallback: None,
            };
        }

        let header = &doc.header;
        let resolution = match self
            .resolver
            .resolve(
                &header.operation_nature_id,
                &header.origin_jurisdiction,
                &header.destination_jurisdiction,
            )
            .await
        {
            Ok(resolution) => resolution,
            Err(e) => {
                return RecomputeOutcome {
                    sequence,
                    completion: session.complete(ticket, Err(e)),
                    fallback: None,
                }
            }
        };

        let outcome = self.orchestrator.calculate(doc, &resolution).await;
        RecomputeOutcome {
            sequence,
            completion: session.complete(ticket, outcome),
            fallback: resolution.fallback,
        }
    }

    /// Destination jurisdiction for `client`: the state of the partner's
    /// address. `None` when the partner is unknown or has no address.
    pub async fn destination_for(
        &self,
        client: &ClientId,
    ) -> Result<Option<JurisdictionCode>, EngineError> {
        let partner = self.partners.partner(client).await.map_err(|e| {
            EngineError::PartnerLookupFailed {
                client: client.clone(),
                reason: e.to_string(),
            }
        })?;
        Ok(partner.and_then(|p| p.jurisdiction().cloned()))
    }
}
