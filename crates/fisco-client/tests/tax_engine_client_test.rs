//! Contract tests for TaxEngineClient.
//!
//! ## Endpoints Tested
//!
//! | Method | Path | Test |
//! |--------|------|------|
//! | POST   | `/tax-engine/api/v1/calculations` | `calculate_*` |

use fisco_client::{FiscoApiConfig, FiscoApiError, FiscoClient, TaxCalculationRequest, TaxRequestItem};
use fisco_core::{ClientId, CompanyId, JurisdictionCode, OperationNatureId};
use rust_decimal_macros::dec;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(mock_server: &MockServer) -> FiscoClient {
    let mut config = FiscoApiConfig::local_mock(19000, "test-token").unwrap();
    config.tax_engine_url = mock_server.uri().parse().unwrap();
    FiscoClient::new(config).unwrap()
}

fn sample_request() -> TaxCalculationRequest {
    TaxCalculationRequest {
        company_id: CompanyId::new("acme").unwrap(),
        client_id: ClientId::new("cli-7").unwrap(),
        operation_nature_id: OperationNatureId::new("venda").unwrap(),
        origin_jurisdiction: JurisdictionCode::new("SP").unwrap(),
        destination_jurisdiction: JurisdictionCode::new("RJ").unwrap(),
        include_freight_in_total: true,
        freight_amount: dec!(30),
        other_expenses: dec!(0),
        items: vec![TaxRequestItem {
            code: "P1".into(),
            name: "Parafuso".into(),
            unit: "UN".into(),
            quantity: dec!(10),
            unit_price: dec!(10),
            discount_amount: dec!(0),
            icms_situation: Some("00".into()),
            ipi_situation: Some("50".into()),
            pis_situation: Some("01".into()),
            cofins_situation: Some("01".into()),
            fiscal_benefit_code: None,
        }],
    }
}

// ── POST /tax-engine/api/v1/calculations ─────────────────────────────

#[tokio::test]
async fn calculate_sends_payload_and_parses_breakdown() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/tax-engine/api/v1/calculations"))
        .and(header("authorization", "Bearer test-token"))
        .and(body_partial_json(serde_json::json!({
            "companyId": "acme",
            "clientId": "cli-7",
            "originJurisdiction": "SP",
            "destinationJurisdiction": "RJ",
            "includeFreightInTotal": true,
            "items": [{ "code": "P1", "icmsSituation": "00", "ipiSituation": "50" }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "items": [{
                "name": "Parafuso",
                "icms": { "base": 100.0, "rate": 12.0, "value": 12.0 },
                "ipi": { "base": 100.0, "rate": 5.0, "value": 5.0 },
                "pis": { "base": 100.0, "rate": 1.65, "value": 1.65 },
                "cofins": { "base": 100.0, "rate": 7.6, "value": 7.6 }
            }],
            "totals": { "totalProducts": 100.0, "totalDiscounts": 0.0, "totalTaxes": 26.25 }
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let resp = client.tax_engine().calculate(&sample_request()).await.unwrap();

    assert_eq!(resp.items.len(), 1);
    assert_eq!(resp.items[0].ipi.as_ref().unwrap().value, dec!(5));
    assert_eq!(resp.items[0].pis.as_ref().unwrap().rate, Some(dec!(1.65)));
    assert!(resp.items[0].icms_st.is_none());
    assert_eq!(resp.totals.total_products, dec!(100));
    assert_eq!(resp.totals.total_taxes, dec!(26.25));
}

#[tokio::test]
async fn calculate_surfaces_api_error_with_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/tax-engine/api/v1/calculations"))
        .respond_with(ResponseTemplate::new(422).set_body_string("unknown CST 99"))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let err = client.tax_engine().calculate(&sample_request()).await.unwrap_err();

    match err {
        FiscoApiError::ApiError { status, body, .. } => {
            assert_eq!(status, 422);
            assert_eq!(body, "unknown CST 99");
        }
        other => panic!("expected ApiError, got {other:?}"),
    }
}

#[tokio::test]
async fn calculate_is_not_retried_on_server_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/tax-engine/api/v1/calculations"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    assert!(client.tax_engine().calculate(&sample_request()).await.is_err());
}

#[tokio::test]
async fn calculate_rejects_malformed_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/tax-engine/api/v1/calculations"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>gateway</html>"))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let err = client.tax_engine().calculate(&sample_request()).await.unwrap_err();
    assert!(matches!(err, FiscoApiError::Deserialization { .. }));
}

#[tokio::test]
async fn calculate_times_out_on_slow_engine() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/tax-engine/api/v1/calculations"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(std::time::Duration::from_secs(3))
                .set_body_json(serde_json::json!({
                    "items": [],
                    "totals": { "totalProducts": 0.0, "totalTaxes": 0.0 }
                })),
        )
        .mount(&mock_server)
        .await;

    let mut config = FiscoApiConfig::local_mock(19000, "test-token").unwrap();
    config.tax_engine_url = mock_server.uri().parse().unwrap();
    config.timeout_secs = 1;
    let client = FiscoClient::new(config).unwrap();

    let err = client.tax_engine().calculate(&sample_request()).await.unwrap_err();
    assert!(err.is_timeout(), "expected timeout, got {err:?}");
}
