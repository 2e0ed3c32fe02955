// src/models/produto.rs

use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

// Produto do catálogo (`lista_produtos`), carregado uma vez por sessão e
// imutável durante a montagem do orçamento.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Produto {
    #[schema(example = "MV-1020")]
    pub codigo: String,
    pub nome: String,
    pub preco: f64,
    // Granularidade mínima de compra; nunca menor que 1
    pub multiplo: i64,
    #[schema(example = "UN")]
    pub unidade: String,
    // Alíquota de IPI em %
    pub ipi: f64,
}

fn texto(linha: &Value, chaves: &[&str]) -> String {
    for chave in chaves {
        if let Some(v) = linha.get(*chave) {
            let s = match v {
                Value::String(s) => s.trim().to_string(),
                Value::Number(n) => n.to_string(),
                _ => continue,
            };
            if !s.is_empty() {
                return s;
            }
        }
    }
    String::new()
}

fn numero(linha: &Value, chaves: &[&str]) -> f64 {
    for chave in chaves {
        match linha.get(*chave) {
            Some(Value::Number(n)) => {
                if let Some(f) = n.as_f64() {
                    return f;
                }
            }
            Some(Value::String(s)) => {
                // planilhas importadas às vezes gravam número como texto
                if let Ok(f) = s.trim().replace(',', ".").parse::<f64>() {
                    return f;
                }
            }
            _ => {}
        }
    }
    0.0
}

impl Produto {
    // Normaliza uma linha crua de `lista_produtos`. A tabela foi populada a
    // partir de planilhas com cabeçalhos diferentes, então cada conceito tem
    // mais de um nome possível de coluna.
    pub fn de_linha(linha: &Value) -> Self {
        let multiplo = numero(linha, &["multiplo", "qtd_min", "qtdMin"]) as i64;
        Self {
            codigo: texto(linha, &["codigo", "item"]),
            nome: texto(linha, &["nome", "descricao", "detalhe"]),
            preco: numero(linha, &["preco", "vd_preco"]),
            multiplo: multiplo.max(1),
            unidade: {
                let un = texto(linha, &["un", "unidade"]);
                if un.is_empty() { "UN".to_string() } else { un }
            },
            ipi: numero(linha, &["ipi", "al_ipi"]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn normaliza_linha_com_colunas_novas() {
        let linha = json!({
            "codigo": "MV-10",
            "nome": "Bobina 30cm",
            "preco": 42.5,
            "multiplo": 6,
            "un": "RL",
            "ipi": 5.0
        });
        let p = Produto::de_linha(&linha);
        assert_eq!(p.codigo, "MV-10");
        assert_eq!(p.nome, "Bobina 30cm");
        assert_eq!(p.preco, 42.5);
        assert_eq!(p.multiplo, 6);
        assert_eq!(p.unidade, "RL");
        assert_eq!(p.ipi, 5.0);
    }

    #[test]
    fn normaliza_linha_com_colunas_legadas() {
        let linha = json!({
            "item": "77001",
            "descricao": "Filme stretch",
            "vd_preco": "10,90",
            "qtd_min": "12",
            "al_ipi": 3.25
        });
        let p = Produto::de_linha(&linha);
        assert_eq!(p.codigo, "77001");
        assert_eq!(p.nome, "Filme stretch");
        assert_eq!(p.preco, 10.90);
        assert_eq!(p.multiplo, 12);
        assert_eq!(p.unidade, "UN");
        assert_eq!(p.ipi, 3.25);
    }

    #[test]
    fn multiplo_invalido_vira_um() {
        let linha = json!({ "codigo": "X", "multiplo": 0 });
        assert_eq!(Produto::de_linha(&linha).multiplo, 1);
    }
}
