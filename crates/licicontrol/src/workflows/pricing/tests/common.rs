use std::sync::Arc;

use chrono::NaiveDate;
use serde_json::{json, Value};
use uuid::Uuid;
use wiremock::MockServer;

use crate::config::PncpConfig;
use crate::workflows::pricing::{PncpClient, PricingService, PriceSample, QuotationRequest};
use crate::workflows::testing::memory_store;

pub(super) const PUBLICATION_PATH: &str = "/api/consulta/v1/contratacoes/publicacao";

pub(super) fn client_for(server: &MockServer) -> PncpClient {
    PncpClient::new(&PncpConfig {
        base_url: format!("{}/api/consulta/v1/", server.uri()),
    })
    .expect("client builds")
}

pub(super) fn service_for(server: &MockServer) -> Arc<PricingService> {
    Arc::new(PricingService::new(memory_store(), client_for(server)))
}

pub(super) fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

/// Three publications: two mention "merenda" (in the object or the agency), one does not.
pub(super) fn publication_page() -> Value {
    json!({
        "totalRegistros": 3,
        "data": [
            {
                "numeroControlePNCP": "12345678000190-1-000045/2024",
                "objetoCompra": "Aquisição de gêneros alimentícios para MERENDA escolar",
                "codigoModalidadeContratacao": 6,
                "valorTotalEstimado": 1250000.0,
                "dataPublicacaoPncp": "2024-03-05T10:00:00",
                "dataAberturaProposta": "2024-03-20T09:00:00",
                "orgaoEntidade": { "razaoSocial": "Município de Sobral", "cnpj": "12345678000190", "ufSigla": "CE" },
                "unidadeOrgao": { "ufSigla": "CE" },
                "linkSistemaOrigem": "https://compras.sobral.ce.gov.br/45"
            },
            {
                "numeroControlePNCP": "98765432000110-1-000003/2024",
                "objetoCompra": "Reforma de quadra poliesportiva",
                "codigoModalidadeContratacao": "5",
                "orgaoEntidade": { "razaoSocial": "Município de Crato", "ufSigla": "CE" }
            },
            {
                "objetoCompra": "Transporte de gêneros",
                "codigoModalidadeContratacao": 8,
                "orgaoEntidade": { "razaoSocial": "Fundo Municipal da Merenda", "ufSigla": "PE" }
            }
        ]
    })
}

pub(super) fn sample(description: &str, price: f64, day: u32) -> PriceSample {
    PriceSample {
        description: description.to_string(),
        unit_price: price,
        date: date(2024, 3, day),
        quantity: Some(5),
        unit: Some("UN".to_string()),
        agency: Some("Prefeitura de Sobral".to_string()),
        source: Some("Pregão Eletrônico 045/2024".to_string()),
    }
}

pub(super) fn quotation_request(samples: Vec<PriceSample>) -> QuotationRequest {
    QuotationRequest {
        user_id: Uuid::new_v4(),
        title: "Cotação notebooks 2024".to_string(),
        search_term: "notebook".to_string(),
        start_date: None,
        end_date: None,
        samples,
    }
}
