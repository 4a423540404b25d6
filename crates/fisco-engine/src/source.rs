//! Upstream seams.
//!
//! The engine depends on these traits rather than on the HTTP clients
//! directly, so tests and offline tools can substitute in-process
//! implementations. The `fisco-client` types implement them.

use async_trait::async_trait;
use fisco_client::{
    FiscoApiError, FiscoClient, JurisdictionConfigClient, Partner, PartnerClient,
    TaxCalculationRequest, TaxCalculationResponse, TaxEngineClient,
};
use fisco_core::{ClientId, JurisdictionConfig, OperationNatureId};

/// Source of jurisdiction configuration rows.
#[async_trait]
pub trait JurisdictionConfigSource: Send + Sync {
    /// All rows for an operation nature, in the order the source returns
    /// them. An unknown nature yields an empty list.
    async fn configs_for(
        &self,
        operation_nature: &OperationNatureId,
    ) -> Result<Vec<JurisdictionConfig>, FiscoApiError>;
}

/// A tax calculation service.
#[async_trait]
pub trait TaxEngine: Send + Sync {
    /// Calculate taxes for one request.
    async fn calculate(
        &self,
        request: &TaxCalculationRequest,
    ) -> Result<TaxCalculationResponse, FiscoApiError>;
}

/// Source of partner records.
#[async_trait]
pub trait PartnerDirectory: Send + Sync {
    /// Look up a partner; `None` when unknown.
    async fn partner(&self, id: &ClientId) -> Result<Option<Partner>, FiscoApiError>;
}

#[async_trait]
impl JurisdictionConfigSource for JurisdictionConfigClient {
    async fn configs_for(
        &self,
        operation_nature: &OperationNatureId,
    ) -> Result<Vec<JurisdictionConfig>, FiscoApiError> {
        self.list_for_nature(operation_nature).await
    }
}

#[async_trait]
impl TaxEngine for TaxEngineClient {
    async fn calculate(
        &self,
        request: &TaxCalculationRequest,
    ) -> Result<TaxCalculationResponse, FiscoApiError> {
        TaxEngineClient::calculate(self, request).await
    }
}

#[async_trait]
impl PartnerDirectory for PartnerClient {
    async fn partner(&self, id: &ClientId) -> Result<Option<Partner>, FiscoApiError> {
        self.get_partner(id).await
    }
}

#[async_trait]
impl JurisdictionConfigSource for FiscoClient {
    async fn configs_for(
        &self,
        operation_nature: &OperationNatureId,
    ) -> Result<Vec<JurisdictionConfig>, FiscoApiError> {
        self.jurisdiction_configs().list_for_nature(operation_nature).await
    }
}

#[async_trait]
impl TaxEngine for FiscoClient {
    async fn calculate(
        &self,
        request: &TaxCalculationRequest,
    ) -> Result<TaxCalculationResponse, FiscoApiError> {
        self.tax_engine().calculate(request).await
    }
}

#[async_trait]
impl PartnerDirectory for FiscoClient {
    async fn partner(&self, id: &ClientId) -> Result<Option<Partner>, FiscoApiError> {
        self.partners().get_partner(id).await
    }
}

#[async_trait]
impl<T: JurisdictionConfigSource + ?Sized> JurisdictionConfigSource for std::sync::Arc<T> {
    async fn configs_for(
        &self,
        operation_nature: &OperationNatureId,
    ) -> Result<Vec<JurisdictionConfig>, FiscoApiError> {
        (**self).configs_for(operation_nature).await
    }
}

#[async_trait]
impl<T: TaxEngine + ?Sized> TaxEngine for std::sync::Arc<T> {
    async fn calculate(
        &self,
        request: &TaxCalculationRequest,
    ) -> Result<TaxCalculationResponse, FiscoApiError> {
        (**self).calculate(request).await
    }
}

#[async_trait]
impl<T: PartnerDirectory + ?Sized> PartnerDirectory for std::sync::Arc<T> {
    async fn partner(&self, id: &ClientId) -> Result<Option<Partner>, FiscoApiError> {
        (**self).partner(id).await
    }
}
