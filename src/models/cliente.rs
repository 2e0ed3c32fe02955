// src/models/cliente.rs

use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::services::orcamento::{formatar_cnpj, formatar_telefone};

pub const TIPO_VENDA_CONSUMIDOR_FINAL: &str = "consumidor-final";
pub const TIPO_VENDA_REVENDA: &str = "revenda";
pub const TIPO_VENDA_USO_CONSUMO: &str = "uso-consumo";

pub const TIPOS_VENDA: [&str; 3] = [
    TIPO_VENDA_CONSUMIDOR_FINAL,
    TIPO_VENDA_REVENDA,
    TIPO_VENDA_USO_CONSUMO,
];

// Bloco de dados do cliente dentro de um orçamento. Os valores vindos da
// consulta por CNPJ apenas preenchem o formulário; o representante pode
// sobrescrever qualquer campo manualmente.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct Cliente {
    pub nome: String,
    pub empresa: String,
    pub cnpj: String,
    pub inscricao_estadual: String,
    #[serde(rename = "isentoIE")]
    pub isento_ie: bool,
    pub email: String,
    pub email_cobranca: String,
    pub telefone: String,
    pub cidade: String,
    pub estado: String,
    pub tipo_venda: String,
}

impl Default for Cliente {
    fn default() -> Self {
        Self {
            nome: String::new(),
            empresa: String::new(),
            cnpj: String::new(),
            inscricao_estadual: String::new(),
            isento_ie: false,
            email: String::new(),
            email_cobranca: String::new(),
            telefone: String::new(),
            cidade: String::new(),
            estado: String::new(),
            tipo_venda: TIPO_VENDA_CONSUMIDOR_FINAL.to_string(),
        }
    }
}

// A tabela `clientes` veio de importações com nomes de coluna inconsistentes
// ("empresa_razao_social", "razao_social", "Empresa / Razão Social", ...).
// A normalização acontece toda aqui, na fronteira com o banco; a lógica de
// negócio só enxerga o struct `Cliente`.
fn primeiro_texto(linha: &Value, chaves: &[&str]) -> String {
    for chave in chaves {
        if let Some(v) = linha.get(*chave) {
            let texto = match v {
                Value::String(s) => s.trim().to_string(),
                Value::Number(n) => n.to_string(),
                _ => continue,
            };
            if !texto.is_empty() {
                return texto;
            }
        }
    }
    String::new()
}

impl Cliente {
    // Monta um `Cliente` a partir de uma linha crua (`row_to_json`) da tabela
    // `clientes`. O CNPJ exibido é sempre a máscara dos 14 dígitos buscados.
    pub fn de_linha(linha: &Value, cnpj_normalizado: &str) -> Self {
        let empresa = primeiro_texto(
            linha,
            &[
                "empresa_razao_social",
                "razao_social",
                "Empresa / Razão Social",
                "empresa",
                "Empresa",
            ],
        );
        let nome = primeiro_texto(linha, &["nome_contato", "nome", "contato", "Nome do Contato"]);
        let telefone = primeiro_texto(linha, &["telefone", "fone", "Telefone"]);
        let cidade = primeiro_texto(linha, &["cidade", "Cidade"]);
        let estado = primeiro_texto(linha, &["uf", "UF", "estado"]);
        let inscricao = primeiro_texto(linha, &["inscricao_estadual", "ie", "Inscrição Estadual"]);
        let email = primeiro_texto(linha, &["email", "Email", "E-mail", "E_MAIL"]);

        let isento = inscricao.to_uppercase() == "ISENTO";

        Self {
            cnpj: formatar_cnpj(cnpj_normalizado),
            nome,
            empresa,
            email: email.clone(),
            // E-mail de cobrança começa igual ao principal quando encontrado
            email_cobranca: email,
            telefone: if telefone.is_empty() {
                String::new()
            } else {
                formatar_telefone(&telefone)
            },
            cidade,
            estado,
            inscricao_estadual: if isento { "ISENTO".to_string() } else { inscricao },
            isento_ie: isento,
            tipo_venda: TIPO_VENDA_CONSUMIDOR_FINAL.to_string(),
        }
    }
}

// Resultado da consulta por CNPJ: "não encontrado" NÃO é erro, só um estado
// neutro que a tela mostra com um ícone de aviso.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BuscaClienteResponse {
    #[schema(example = "encontrado")]
    pub status: String,
    pub cliente: Option<Cliente>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn normaliza_colunas_variantes() {
        let linha = json!({
            "razao_social": "Indústria Acme Ltda",
            "contato": "Maria",
            "fone": "11912345678",
            "Cidade": "Campinas",
            "UF": "SP",
            "ie": "123.456.789",
            "E-mail": "compras@acme.com.br"
        });

        let cliente = Cliente::de_linha(&linha, "12345678000199");
        assert_eq!(cliente.empresa, "Indústria Acme Ltda");
        assert_eq!(cliente.nome, "Maria");
        assert_eq!(cliente.cnpj, "12.345.678/0001-99");
        assert_eq!(cliente.telefone, "(11)91234-5678");
        assert_eq!(cliente.cidade, "Campinas");
        assert_eq!(cliente.estado, "SP");
        assert_eq!(cliente.inscricao_estadual, "123.456.789");
        assert!(!cliente.isento_ie);
        assert_eq!(cliente.email_cobranca, "compras@acme.com.br");
    }

    #[test]
    fn ie_isento_liga_a_flag() {
        let linha = json!({ "inscricao_estadual": "isento" });
        let cliente = Cliente::de_linha(&linha, "12345678000199");
        assert!(cliente.isento_ie);
        assert_eq!(cliente.inscricao_estadual, "ISENTO");
    }

    #[test]
    fn coluna_preferida_ganha_da_alternativa() {
        let linha = json!({
            "empresa_razao_social": "Preferida SA",
            "razao_social": "Alternativa SA"
        });
        let cliente = Cliente::de_linha(&linha, "12345678000199");
        assert_eq!(cliente.empresa, "Preferida SA");
    }
}
