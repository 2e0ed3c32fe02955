// src/models/orcamento.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::models::cliente::Cliente;

fn quantidade_padrao() -> i64 {
    1
}

fn multiplo_padrao() -> i64 {
    1
}

fn unidade_padrao() -> String {
    "UN".to_string()
}

// Item do orçamento como chega do formulário
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    #[serde(default)]
    pub codigo: String,
    #[serde(default)]
    pub nome: String,
    #[serde(default = "quantidade_padrao")]
    pub quantidade: i64,
    #[serde(default)]
    pub preco_unitario: f64,
    #[serde(default = "multiplo_padrao")]
    pub multiplo: i64,
    #[serde(default = "unidade_padrao")]
    pub unidade: String,
    #[serde(default)]
    pub ipi: f64,
}

// Item como vai para o gateway e para o histórico: carrega também os
// valores derivados, para o documento gerado não depender de recálculo.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ItemPayload {
    pub codigo: String,
    pub nome: String,
    pub quantidade: i64,
    pub preco_unitario: f64,
    pub multiplo: i64,
    pub unidade: String,
    pub ipi: f64,
    pub subtotal: f64,
    pub ipi_valor: f64,
}

// Condições comerciais do orçamento
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct DadosComerciais {
    // dd/mm/aaaa; vazio = calcular a validade padrão na submissão
    pub validade: String,
    pub forma_pagamento: String,
    pub forma_pagamento_detalhe: String,
    pub prazo_entrega: String,
    pub frete: String,
    pub transportadora: String,
    pub observacoes: String,
}

impl Default for DadosComerciais {
    fn default() -> Self {
        Self {
            validade: String::new(),
            forma_pagamento: FORMA_PAGAMENTO_PADRAO.to_string(),
            forma_pagamento_detalhe: String::new(),
            prazo_entrega: String::new(),
            frete: FRETE_PADRAO.to_string(),
            transportadora: String::new(),
            observacoes: OBSERVACOES_PADRAO.to_string(),
        }
    }
}

pub const FORMA_PAGAMENTO_PADRAO: &str = "28/56 dias";
pub const FRETE_PADRAO: &str = "FOB";

pub const FORMAS_PAGAMENTO: [&str; 9] = [
    "À vista", "14 dias", "28 dias", "30 dias", "45 dias", "60 dias", "28/56 dias", "30/60 dias",
    "Outros",
];

pub const FRETES: [&str; 4] = ["FOB", "Retira", "Transportadora", "Outros"];

pub const OBSERVACOES_PADRAO: &str = "Frete FOB\n\
Faturamento sujeito à análise de crédito\n\
Validade de 7 dias\n\
Os valores podem sofrer alteração devido à legislação de cada estado\n\
ST: caso aplicável, será passado posteriormente";

// Requisição de geração de orçamento (POST /api/orcamentos)
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GerarOrcamentoPayload {
    pub cliente: Cliente,
    pub itens: Vec<Item>,
    #[serde(default)]
    pub comercial: DadosComerciais,
    // Percentuais escolhidos nos selects; ICMS ausente é erro de validação
    pub icms: Option<f64>,
    #[serde(default)]
    pub desconto: Option<f64>,
    // Modo edição: reenvio a partir de um registro do histórico
    #[serde(default)]
    pub edit_mode: bool,
    // Versão do registro sendo editado (default 1)
    #[serde(default)]
    pub version: Option<i64>,
}

// Totais derivados do orçamento
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Totais {
    pub subtotal: f64,
    pub desconto: f64,
    pub icms: f64,
    pub ipi: f64,
    pub total: f64,
}

// Bloco comercial dentro do payload final: o documento gerado lê os
// percentuais também daqui, então eles vão duplicados de propósito.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ComercialPayload {
    #[serde(flatten)]
    pub dados: DadosComerciais,
    pub icms: f64,
    pub desconto: f64,
}

// Snapshot completo enviado ao gateway e gravado no histórico. O formato
// das chaves é contrato com o fluxo de geração de proposta; não renomear.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrcamentoPayload {
    pub is_edited: bool,
    pub version: i64,
    pub versao_label: String,
    pub representante: String,
    pub cliente: Cliente,
    pub itens: Vec<ItemPayload>,
    pub comercial: ComercialPayload,
    pub icms: f64,
    pub desconto: f64,
    pub valores: Totais,
}

// Linha da tabela `orcamentos` (histórico, append-only)
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrcamentoRegistro {
    pub id: Uuid,
    pub user_id: Uuid,
    pub cliente_nome: String,
    pub cliente_empresa: String,
    pub cliente_cnpj: String,
    pub valor_total: f64,
    #[schema(example = "gerado")]
    pub status: String,
    #[schema(value_type = Object)]
    pub payload: sqlx::types::Json<Value>,
    pub created_at: DateTime<Utc>,
}

// Filtros opcionais do histórico (query string)
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct HistoricoFiltro {
    // Data inicial (aaaa-mm-dd), inclusive
    pub de: Option<chrono::NaiveDate>,
    // Data final (aaaa-mm-dd), inclusive
    pub ate: Option<chrono::NaiveDate>,
    // Trecho do nome da empresa
    pub cliente: Option<String>,
    // Trecho do nome do representante (buscado dentro do payload JSON)
    pub representante: Option<String>,
}

// Resposta da geração: o que o gateway devolveu (JSON ou texto opaco) mais
// os totais calculados, para a tela montar o resumo sem recalcular.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GeracaoResponse {
    #[schema(value_type = Object)]
    pub resposta: Value,
    pub valores: Totais,
    pub version: i64,
    pub versao_label: String,
}

// Valores iniciais do formulário de orçamento (validade já calculada)
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NovoOrcamentoResponse {
    pub comercial: DadosComerciais,
    pub icms_opcoes: Vec<f64>,
    pub desconto_opcoes: Vec<f64>,
    pub formas_pagamento: Vec<String>,
    pub fretes: Vec<String>,
    pub tipos_venda: Vec<String>,
    pub ufs: Vec<String>,
}

// ------------------------------------------------------------------
// Mapa estruturado de erros de validação
// ------------------------------------------------------------------

// Erros de um item individual
#[derive(Debug, Default, Clone, PartialEq, Serialize, ToSchema)]
pub struct ErroItem {
    pub codigo: bool,
    pub quantidade: bool,
}

impl ErroItem {
    pub fn algum(&self) -> bool {
        self.codigo || self.quantidade
    }
}

// Mapa de erros por seção/campo, espelhando as seções do formulário.
// `true` marca o campo inválido; campos válidos não entram no mapa.
#[derive(Debug, Default, Clone, PartialEq, Serialize, ToSchema)]
pub struct ErrosOrcamento {
    pub cliente: BTreeMap<String, bool>,
    pub comercial: BTreeMap<String, bool>,
    pub impostos: BTreeMap<String, bool>,
    // chave = índice do item na lista enviada
    pub itens: BTreeMap<usize, ErroItem>,
}

impl ErrosOrcamento {
    pub fn vazio(&self) -> bool {
        self.cliente.is_empty()
            && self.comercial.is_empty()
            && self.impostos.is_empty()
            && self.itens.is_empty()
    }

    // Primeiro campo inválido na ordem fixa de foco do formulário. Os itens
    // vêm por último; dentro do item, produto antes de quantidade. O detalhe
    // da forma de pagamento entra logo após o select que o habilita (o
    // formulário focava só o select; aqui o campo condicional também tem
    // posição própria, já que é validado).
    pub fn primeiro_campo(&self) -> Option<String> {
        const ORDEM: [(&str, &str); 16] = [
            ("cliente", "cnpj"),
            ("cliente", "nome"),
            ("cliente", "empresa"),
            ("cliente", "email"),
            ("cliente", "emailCobranca"),
            ("cliente", "telefone"),
            ("cliente", "cidade"),
            ("cliente", "estado"),
            ("cliente", "inscricaoEstadual"),
            ("cliente", "tipoVenda"),
            ("comercial", "formaPagamento"),
            ("comercial", "formaPagamentoDetalhe"),
            ("comercial", "prazoEntrega"),
            ("comercial", "frete"),
            ("comercial", "transportadora"),
            ("impostos", "icms"),
        ];

        for (secao, campo) in ORDEM {
            let mapa = match secao {
                "cliente" => &self.cliente,
                "comercial" => &self.comercial,
                _ => &self.impostos,
            };
            if mapa.get(campo).copied().unwrap_or(false) {
                return Some(format!("{secao}.{campo}"));
            }
        }

        self.itens.iter().find(|(_, e)| e.algum()).map(|(idx, e)| {
            let campo = if e.codigo { "codigo" } else { "quantidade" };
            format!("itens.{idx}.{campo}")
        })
    }
}
