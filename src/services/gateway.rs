// src/services/gateway.rs
//
// Cliente do gateway de propostas (workflow n8n). O gateway recebe o snapshot
// do orçamento e cuida da geração do documento e do envio por e-mail.

use std::time::Duration;

use serde_json::Value;

use crate::{common::error::AppError, models::orcamento::OrcamentoPayload};

// O workflow processa um orçamento inteiro (documento + e-mail), então a
// chamada pode demorar bem mais que uma API comum.
const TIMEOUT_GATEWAY: Duration = Duration::from_secs(120);

#[derive(Clone)]
pub struct GatewayClient {
    http: reqwest::Client,
    url: String,
}

impl GatewayClient {
    pub fn new(url: String) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(TIMEOUT_GATEWAY)
            .build()?;
        Ok(Self { http, url })
    }

    // Envia o orçamento ao workflow. O corpo é o JSON serializado, mas o
    // Content-Type é text/plain: é assim que o webhook está configurado a
    // receber, e mudar o header quebra o fluxo do lado de lá.
    pub async fn gerar_proposta(&self, payload: &OrcamentoPayload) -> Result<Value, AppError> {
        let corpo = montar_corpo(payload)?;

        tracing::info!(url = %self.url, "Enviando orçamento ao gateway de propostas");

        let resposta = self
            .http
            .post(&self.url)
            .header("Content-Type", "text/plain")
            .body(corpo)
            .send()
            .await
            .map_err(|e| AppError::GatewayError(e.to_string()))?;

        let status = resposta.status();
        let texto = resposta.text().await.unwrap_or_default();

        if !status.is_success() {
            let detalhe = if texto.trim().is_empty() {
                format!("HTTP {}", status)
            } else {
                texto
            };
            return Err(AppError::GatewayError(detalhe));
        }

        // O workflow às vezes responde JSON, às vezes texto puro. Texto que
        // não parseia vira um valor de string, nunca erro.
        Ok(serde_json::from_str::<Value>(&texto).unwrap_or(Value::String(texto)))
    }
}

// Corpo do POST: as chaves do snapshot espalhadas na raiz, mais o "action".
// O workflow lê isEdited, cliente, itens, valores etc. direto da raiz do
// corpo; aninhar o snapshot quebra a geração do documento.
fn montar_corpo(payload: &OrcamentoPayload) -> Result<String, AppError> {
    let valor = serde_json::to_value(payload)
        .map_err(|e| anyhow::anyhow!("Falha ao serializar orçamento: {}", e))?;

    let mut corpo = match valor {
        Value::Object(mapa) => mapa,
        _ => return Err(anyhow::anyhow!("Snapshot de orçamento não é um objeto JSON").into()),
    };
    corpo.insert("action".to_string(), Value::String("proposta".to_string()));

    serde_json::to_string(&Value::Object(corpo))
        .map_err(|e| anyhow::anyhow!("Falha ao serializar corpo do gateway: {}", e).into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::cliente::Cliente;
    use crate::models::orcamento::{DadosComerciais, GerarOrcamentoPayload, Item};
    use crate::services::orcamento::montar_payload;
    use chrono::NaiveDate;

    fn snapshot() -> OrcamentoPayload {
        let pedido = GerarOrcamentoPayload {
            cliente: Cliente {
                nome: "Maria".into(),
                empresa: "Acme Ltda".into(),
                cnpj: "12345678000199".into(),
                inscricao_estadual: "123456".into(),
                email: "maria@acme.com.br".into(),
                email_cobranca: "fiscal@acme.com.br".into(),
                telefone: "(11)91234-5678".into(),
                cidade: "Campinas".into(),
                estado: "SP".into(),
                ..Cliente::default()
            },
            itens: vec![Item {
                codigo: "MV-10".into(),
                nome: "Bobina".into(),
                quantidade: 10,
                preco_unitario: 100.0,
                multiplo: 1,
                unidade: "UN".into(),
                ipi: 5.0,
            }],
            comercial: DadosComerciais::default(),
            icms: Some(18.0),
            desconto: Some(2.0),
            edit_mode: false,
            version: None,
        };
        let agora = NaiveDate::from_ymd_opt(2026, 3, 10)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap();
        montar_payload(&pedido, "Ana", agora)
    }

    #[test]
    fn corpo_leva_o_snapshot_na_raiz() {
        let corpo: Value = serde_json::from_str(&montar_corpo(&snapshot()).unwrap()).unwrap();
        let mapa = corpo.as_object().unwrap();

        assert_eq!(mapa.get("action"), Some(&Value::String("proposta".into())));
        for chave in [
            "isEdited",
            "version",
            "versaoLabel",
            "representante",
            "cliente",
            "itens",
            "comercial",
            "icms",
            "desconto",
            "valores",
        ] {
            assert!(mapa.contains_key(chave), "chave ausente na raiz: {chave}");
        }
        assert!(!mapa.contains_key("dados"));
    }

    #[test]
    fn corpo_preserva_os_valores_calculados() {
        let corpo: Value = serde_json::from_str(&montar_corpo(&snapshot()).unwrap()).unwrap();
        assert_eq!(corpo["valores"]["total"], serde_json::json!(1210.0));
        assert_eq!(corpo["representante"], serde_json::json!("Ana"));
    }
}
