// src/services/orcamento.rs
//
// O motor do orçamento: validação, totais, versionamento e montagem do
// payload final. Tudo aqui é função pura sobre o view-model, sem I/O nem
// estado escondido, para os cálculos reproduzirem exatamente os números dos
// documentos já gerados.

use chrono::{Days, NaiveDateTime, Timelike};
use lazy_static::lazy_static;
use regex::Regex;

use crate::models::cliente::TIPOS_VENDA;
use crate::models::orcamento::{
    ComercialPayload, ErroItem, ErrosOrcamento, GerarOrcamentoPayload, Item, ItemPayload,
    OrcamentoPayload, Totais,
};
use crate::models::produto::Produto;

// Percentuais oferecidos nos selects do formulário
pub const ICMS_OPCOES: [f64; 3] = [7.0, 12.0, 18.0];
pub const DESCONTO_MAX: f64 = 8.0;

pub const UFS: [&str; 27] = [
    "AC", "AL", "AP", "AM", "BA", "CE", "DF", "ES", "GO", "MA", "MT", "MS", "MG", "PA", "PB", "PR",
    "PE", "PI", "RJ", "RN", "RS", "RO", "RR", "SC", "SP", "SE", "TO",
];

// Hora local a partir da qual a validade ganha um dia extra de folga
const HORA_CORTE_VALIDADE: u32 = 17;
const DIAS_VALIDADE: u64 = 7;

// --------------------------------------------------
// Helpers de formatação
// --------------------------------------------------

pub fn apenas_digitos(valor: &str) -> String {
    valor.chars().filter(|c| c.is_ascii_digit()).collect()
}

// Fatia segura de uma string só de dígitos ASCII
fn fatia(nums: &str, de: usize, ate: usize) -> &str {
    &nums[de.min(nums.len())..ate.min(nums.len())]
}

// Máscara progressiva de CNPJ: 12.345.678/0001-99
pub fn formatar_cnpj(valor: &str) -> String {
    let nums: String = apenas_digitos(valor).chars().take(14).collect();
    let (p1, p2, p3, p4, p5) = (
        fatia(&nums, 0, 2),
        fatia(&nums, 2, 5),
        fatia(&nums, 5, 8),
        fatia(&nums, 8, 12),
        fatia(&nums, 12, 14),
    );

    let mut saida = p1.to_string();
    if !p2.is_empty() {
        saida.push('.');
        saida.push_str(p2);
    }
    if !p3.is_empty() {
        saida.push('.');
        saida.push_str(p3);
    }
    if !p4.is_empty() {
        saida.push('/');
        saida.push_str(p4);
    }
    if !p5.is_empty() {
        saida.push('-');
        saida.push_str(p5);
    }
    saida
}

// Máscara de telefone: (11)91234-5678, 10 ou 11 dígitos
pub fn formatar_telefone(valor: &str) -> String {
    let nums: String = apenas_digitos(valor).chars().take(11).collect();
    let (ddd, parte1, parte2) = (fatia(&nums, 0, 2), fatia(&nums, 2, 7), fatia(&nums, 7, 11));

    if nums.len() <= 2 {
        return if ddd.is_empty() { String::new() } else { format!("({ddd}") };
    }
    if nums.len() <= 7 {
        return format!("({ddd}){parte1}");
    }
    format!("({ddd}){parte1}-{parte2}")
}

// --------------------------------------------------
// Validação
// --------------------------------------------------

fn vazio(valor: &str) -> bool {
    valor.trim().is_empty()
}

lazy_static! {
    // local@dominio.tld, sem espaços, sufixo com 2+ caracteres
    static ref EMAIL_RE: Regex = Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]{2,}$").unwrap();
}

// Checagem estrutural de e-mail (não tenta cobrir a RFC inteira)
pub fn email_valido(email: &str) -> bool {
    let s = email.trim();
    if s.is_empty() || s.chars().any(char::is_whitespace) {
        return false;
    }
    if s.contains("..") {
        return false;
    }
    if s.starts_with('@') || s.ends_with('@') {
        return false;
    }
    if s.contains("@.") || s.contains(".@") {
        return false;
    }
    EMAIL_RE.is_match(s)
}

// Número "seguro": entrada não finita vira o default, o motor nunca propaga NaN
pub fn num(valor: f64, padrao: f64) -> f64 {
    if valor.is_finite() { valor } else { padrao }
}

// Quantidade válida = múltiplo positivo do múltiplo de compra do produto.
// Item sem produto selecionado não acusa erro de quantidade (o erro é de código).
pub fn multiplo_valido(item: &Item) -> bool {
    if item.codigo.is_empty() {
        return true;
    }
    let multiplo = item.multiplo.max(1);
    item.quantidade > 0 && item.quantidade % multiplo == 0
}

// Passada única de validação: preenche o mapa seção/campo e devolve Err com
// ele quando qualquer regra falha. A ordem de foco fica em
// `ErrosOrcamento::primeiro_campo`.
pub fn validar(pedido: &GerarOrcamentoPayload) -> Result<(), ErrosOrcamento> {
    let mut erros = ErrosOrcamento::default();
    let cliente = &pedido.cliente;
    let comercial = &pedido.comercial;

    if apenas_digitos(&cliente.cnpj).len() != 14 {
        erros.cliente.insert("cnpj".into(), true);
    }
    if vazio(&cliente.nome) {
        erros.cliente.insert("nome".into(), true);
    }
    if vazio(&cliente.empresa) {
        erros.cliente.insert("empresa".into(), true);
    }
    if !email_valido(&cliente.email) {
        erros.cliente.insert("email".into(), true);
    }
    if !email_valido(&cliente.email_cobranca) {
        erros.cliente.insert("emailCobranca".into(), true);
    }
    if apenas_digitos(&cliente.telefone).len() < 10 {
        erros.cliente.insert("telefone".into(), true);
    }
    if vazio(&cliente.cidade) {
        erros.cliente.insert("cidade".into(), true);
    }
    if vazio(&cliente.estado) {
        erros.cliente.insert("estado".into(), true);
    }
    if !cliente.isento_ie && vazio(&cliente.inscricao_estadual) {
        erros.cliente.insert("inscricaoEstadual".into(), true);
    }
    if !TIPOS_VENDA.contains(&cliente.tipo_venda.as_str()) {
        erros.cliente.insert("tipoVenda".into(), true);
    }

    if vazio(&comercial.forma_pagamento) {
        erros.comercial.insert("formaPagamento".into(), true);
    }
    if comercial.forma_pagamento == "Outros" && vazio(&comercial.forma_pagamento_detalhe) {
        erros.comercial.insert("formaPagamentoDetalhe".into(), true);
    }
    if vazio(&comercial.prazo_entrega) {
        erros.comercial.insert("prazoEntrega".into(), true);
    }
    if vazio(&comercial.frete) {
        erros.comercial.insert("frete".into(), true);
    }
    if matches!(comercial.frete.as_str(), "Transportadora" | "Outros")
        && vazio(&comercial.transportadora)
    {
        erros.comercial.insert("transportadora".into(), true);
    }

    match pedido.icms {
        Some(v) if v.is_finite() && ICMS_OPCOES.contains(&v) => {}
        _ => {
            erros.impostos.insert("icms".into(), true);
        }
    }

    for (indice, item) in pedido.itens.iter().enumerate() {
        let erro = ErroItem {
            codigo: vazio(&item.codigo),
            quantidade: !multiplo_valido(item),
        };
        if erro.algum() {
            erros.itens.insert(indice, erro);
        }
    }

    if erros.vazio() { Ok(()) } else { Err(erros) }
}

// --------------------------------------------------
// Totais
// --------------------------------------------------

pub fn subtotal_item(item: &Item) -> f64 {
    item.quantidade as f64 * num(item.preco_unitario, 0.0)
}

pub fn ipi_item(item: &Item) -> f64 {
    subtotal_item(item) * (num(item.ipi, 0.0) / 100.0)
}

// Totais derivados: recalculados a cada chamada, nunca cacheados.
// total = subtotal - desconto + icms + ipi
pub fn calcular_totais(itens: &[Item], icms_pct: f64, desconto_pct: f64) -> Totais {
    let subtotal: f64 = itens.iter().map(subtotal_item).sum();
    let desconto = subtotal * (num(desconto_pct, 0.0) / 100.0);
    let icms = subtotal * (num(icms_pct, 0.0) / 100.0);
    let ipi: f64 = itens.iter().map(ipi_item).sum();

    Totais {
        subtotal,
        desconto,
        icms,
        ipi,
        total: num(subtotal - desconto + icms + ipi, 0.0),
    }
}

// --------------------------------------------------
// Validade padrão
// --------------------------------------------------

// Hoje + 7 dias; a partir das 17:00 a base passa a ser amanhã, dando um dia
// extra de folga para orçamentos gerados fora do horário comercial.
// Calculada uma vez por orçamento, nunca reavaliada depois.
pub fn validade_padrao(agora: NaiveDateTime) -> String {
    let mut base = agora.date();
    if agora.hour() >= HORA_CORTE_VALIDADE {
        base = base + Days::new(1);
    }
    let validade = base + Days::new(DIAS_VALIDADE);
    validade.format("%d/%m/%Y").to_string()
}

// --------------------------------------------------
// Autocomplete do catálogo
// --------------------------------------------------

// Filtra o catálogo pelo texto digitado. Entradas ecoadas de uma seleção
// anterior ("código - nome") usam só a parte antes do " - ". Zero resultados
// volta o catálogo inteiro em vez de uma lista vazia.
pub fn filtrar_produtos<'a>(produtos: &'a [Produto], busca: &str) -> Vec<&'a Produto> {
    let bruto = busca.to_lowercase().trim().to_string();
    if bruto.is_empty() {
        return produtos.iter().collect();
    }
    let termo = match bruto.split_once(" - ") {
        Some((antes, _)) => antes.trim().to_string(),
        None => bruto,
    };

    let filtrados: Vec<&Produto> = produtos
        .iter()
        .filter(|p| {
            p.codigo.to_lowercase().contains(&termo) || p.nome.to_lowercase().contains(&termo)
        })
        .collect();

    if filtrados.is_empty() { produtos.iter().collect() } else { filtrados }
}

// --------------------------------------------------
// Montagem do payload final
// --------------------------------------------------

fn sanear_item(item: &Item) -> Item {
    Item {
        codigo: item.codigo.clone(),
        nome: item.nome.clone(),
        quantidade: item.quantidade,
        preco_unitario: num(item.preco_unitario, 0.0),
        multiplo: item.multiplo.max(1),
        unidade: if item.unidade.trim().is_empty() {
            "UN".to_string()
        } else {
            item.unidade.clone()
        },
        ipi: num(item.ipi, 0.0),
    }
}

// Snapshot completo do orçamento: saneia os números, calcula os derivados,
// aplica o versionamento e anexa às observações os detalhes condicionais de
// pagamento e frete. É este JSON que vai ao gateway e ao histórico.
pub fn montar_payload(
    pedido: &GerarOrcamentoPayload,
    representante: &str,
    agora: NaiveDateTime,
) -> OrcamentoPayload {
    let icms = num(pedido.icms.unwrap_or(0.0), 0.0);
    let desconto = num(pedido.desconto.unwrap_or(0.0), 0.0).clamp(0.0, DESCONTO_MAX);

    // Edição parte da versão do registro original; orçamento novo é V1 sem rótulo
    let versao_atual = if pedido.edit_mode { pedido.version.unwrap_or(1).max(1) } else { 0 };
    let versao = versao_atual + 1;
    let versao_label = if versao > 1 { format!("V{versao}") } else { String::new() };

    let mut cliente = pedido.cliente.clone();
    cliente.cnpj = formatar_cnpj(&cliente.cnpj);
    if cliente.isento_ie {
        cliente.inscricao_estadual = "ISENTO".to_string();
    }

    let mut comercial = pedido.comercial.clone();
    if vazio(&comercial.validade) {
        comercial.validade = validade_padrao(agora);
    }

    // Detalhes condicionais viram linhas extras de observação, que é onde o
    // documento gerado os exibe.
    let mut extras = String::new();
    if comercial.forma_pagamento == "Outros" && !vazio(&comercial.forma_pagamento_detalhe) {
        extras.push_str(&format!(
            "\nForma de Pagamento: {}",
            comercial.forma_pagamento_detalhe
        ));
    }
    if comercial.frete == "Transportadora" && !vazio(&comercial.transportadora) {
        extras.push_str(&format!("\nTransportadora: {}", comercial.transportadora));
    } else if comercial.frete == "Outros" && !vazio(&comercial.transportadora) {
        extras.push_str(&format!("\nFrete (Detalhes): {}", comercial.transportadora));
    }
    comercial.observacoes = format!("{}{}", comercial.observacoes, extras);

    let itens_saneados: Vec<Item> = pedido.itens.iter().map(sanear_item).collect();
    let valores = calcular_totais(&itens_saneados, icms, desconto);

    let itens = itens_saneados
        .iter()
        .map(|i| ItemPayload {
            codigo: i.codigo.clone(),
            nome: i.nome.clone(),
            quantidade: i.quantidade,
            preco_unitario: i.preco_unitario,
            multiplo: i.multiplo,
            unidade: i.unidade.clone(),
            ipi: i.ipi,
            subtotal: subtotal_item(i),
            ipi_valor: ipi_item(i),
        })
        .collect();

    OrcamentoPayload {
        is_edited: pedido.edit_mode,
        version: versao,
        versao_label,
        representante: representante.to_string(),
        cliente,
        itens,
        comercial: ComercialPayload { dados: comercial, icms, desconto },
        icms,
        desconto,
        valores,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::cliente::Cliente;
    use crate::models::orcamento::DadosComerciais;
    use chrono::NaiveDate;

    fn cliente_valido() -> Cliente {
        Cliente {
            nome: "Maria".into(),
            empresa: "Acme Ltda".into(),
            cnpj: "12.345.678/0001-99".into(),
            inscricao_estadual: "123456".into(),
            isento_ie: false,
            email: "maria@acme.com.br".into(),
            email_cobranca: "fiscal@acme.com.br".into(),
            telefone: "(11)91234-5678".into(),
            cidade: "Campinas".into(),
            estado: "SP".into(),
            tipo_venda: "consumidor-final".into(),
        }
    }

    fn item(quantidade: i64, preco: f64, multiplo: i64, ipi: f64) -> Item {
        Item {
            codigo: "MV-10".into(),
            nome: "Bobina".into(),
            quantidade,
            preco_unitario: preco,
            multiplo,
            unidade: "UN".into(),
            ipi,
        }
    }

    fn pedido_valido() -> GerarOrcamentoPayload {
        GerarOrcamentoPayload {
            cliente: cliente_valido(),
            itens: vec![item(10, 100.0, 1, 5.0)],
            comercial: DadosComerciais {
                prazo_entrega: "15 dias úteis".into(),
                ..DadosComerciais::default()
            },
            icms: Some(18.0),
            desconto: Some(2.0),
            edit_mode: false,
            version: None,
        }
    }

    fn meio_dia(ano: i32, mes: u32, dia: u32, hora: u32, minuto: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(ano, mes, dia)
            .unwrap()
            .and_hms_opt(hora, minuto, 0)
            .unwrap()
    }

    // ---------------- formatação ----------------

    #[test]
    fn cnpj_mascarado_e_cru_normalizam_igual() {
        assert_eq!(apenas_digitos("12.345.678/0001-99"), "12345678000199");
        assert_eq!(apenas_digitos("12345678000199"), "12345678000199");
        assert_eq!(formatar_cnpj("12345678000199"), "12.345.678/0001-99");
    }

    #[test]
    fn cnpj_parcial_mascara_progressiva() {
        assert_eq!(formatar_cnpj("12"), "12");
        assert_eq!(formatar_cnpj("12345"), "12.345");
        assert_eq!(formatar_cnpj("123456789"), "12.345.678/9");
    }

    #[test]
    fn telefone_mascarado() {
        assert_eq!(formatar_telefone("11912345678"), "(11)91234-5678");
        assert_eq!(formatar_telefone("1191234"), "(11)91234");
        assert_eq!(formatar_telefone("1"), "(1");
        assert_eq!(formatar_telefone(""), "");
    }

    // ---------------- e-mail ----------------

    #[test]
    fn emails_validos() {
        assert!(email_valido("a@b.co"));
        assert!(email_valido("nome.sobrenome@empresa.com.br"));
    }

    #[test]
    fn emails_invalidos() {
        assert!(!email_valido("a@@b.com"));
        assert!(!email_valido("a@b"));
        assert!(!email_valido("a..b@c.com"));
        assert!(!email_valido("\"a b\"@c.com"));
        assert!(!email_valido("@b.com"));
        assert!(!email_valido("a@.com"));
        assert!(!email_valido("a@b.c"));
        assert!(!email_valido(""));
    }

    // ---------------- totais ----------------

    #[test]
    fn totais_do_cenario_completo() {
        // 1 item: qtd 10 × R$100, IPI 5%, ICMS 18%, desconto 2%
        let itens = vec![item(10, 100.0, 1, 5.0)];
        let t = calcular_totais(&itens, 18.0, 2.0);
        assert_eq!(t.subtotal, 1000.0);
        assert_eq!(t.ipi, 50.0);
        assert_eq!(t.desconto, 20.0);
        assert_eq!(t.icms, 180.0);
        assert_eq!(t.total, 1210.0);
    }

    #[test]
    fn subtotal_e_ipi_por_item() {
        let i = item(3, 25.0, 1, 10.0);
        assert_eq!(subtotal_item(&i), 75.0);
        assert_eq!(ipi_item(&i), 7.5);
    }

    #[test]
    fn totais_somam_varios_itens() {
        let itens = vec![item(2, 10.0, 1, 0.0), item(5, 4.0, 1, 50.0)];
        let t = calcular_totais(&itens, 7.0, 0.0);
        assert_eq!(t.subtotal, 40.0);
        assert_eq!(t.ipi, 10.0);
        assert_eq!(t.total, 40.0 + 2.8 + 10.0);
    }

    #[test]
    fn numeros_nao_finitos_nao_propagam() {
        let i = item(2, f64::NAN, 1, f64::INFINITY);
        assert_eq!(subtotal_item(&i), 0.0);
        assert_eq!(ipi_item(&i), 0.0);
        let t = calcular_totais(&[i], f64::NAN, f64::NAN);
        assert_eq!(t.total, 0.0);
    }

    // ---------------- múltiplos ----------------

    #[test]
    fn quantidade_igual_ao_multiplo_vale() {
        assert!(multiplo_valido(&item(6, 1.0, 6, 0.0)));
        assert!(multiplo_valido(&item(12, 1.0, 6, 0.0)));
    }

    #[test]
    fn quantidade_fora_do_multiplo_falha() {
        assert!(!multiplo_valido(&item(5, 1.0, 6, 0.0)));
        assert!(!multiplo_valido(&item(7, 1.0, 6, 0.0)));
        assert!(!multiplo_valido(&item(0, 1.0, 1, 0.0)));
        assert!(!multiplo_valido(&item(-6, 1.0, 6, 0.0)));
    }

    #[test]
    fn item_sem_produto_nao_acusa_quantidade() {
        let mut i = item(5, 1.0, 6, 0.0);
        i.codigo.clear();
        assert!(multiplo_valido(&i));
    }

    // ---------------- validade ----------------

    #[test]
    fn validade_antes_do_corte_e_hoje_mais_sete() {
        let agora = meio_dia(2026, 3, 10, 16, 59);
        assert_eq!(validade_padrao(agora), "17/03/2026");
    }

    #[test]
    fn validade_apos_o_corte_ganha_um_dia() {
        let agora = meio_dia(2026, 3, 10, 17, 0);
        assert_eq!(validade_padrao(agora), "18/03/2026");
        let tarde = meio_dia(2026, 3, 10, 22, 30);
        assert_eq!(validade_padrao(tarde), "18/03/2026");
    }

    #[test]
    fn validade_cruza_fim_de_mes() {
        let agora = meio_dia(2026, 1, 28, 18, 0);
        assert_eq!(validade_padrao(agora), "05/02/2026");
    }

    // ---------------- validação ----------------

    #[test]
    fn pedido_valido_passa() {
        assert!(validar(&pedido_valido()).is_ok());
    }

    #[test]
    fn cnpj_curto_reprova() {
        let mut pedido = pedido_valido();
        pedido.cliente.cnpj = "12.345.678".into();
        let erros = validar(&pedido).unwrap_err();
        assert_eq!(erros.cliente.get("cnpj"), Some(&true));
    }

    #[test]
    fn cnpj_invalido_foca_antes_da_empresa() {
        let mut pedido = pedido_valido();
        pedido.cliente.cnpj = "123".into();
        pedido.cliente.empresa = "  ".into();
        let erros = validar(&pedido).unwrap_err();
        assert_eq!(erros.primeiro_campo().as_deref(), Some("cliente.cnpj"));
    }

    #[test]
    fn isento_dispensa_inscricao_estadual() {
        let mut pedido = pedido_valido();
        pedido.cliente.isento_ie = true;
        pedido.cliente.inscricao_estadual = String::new();
        assert!(validar(&pedido).is_ok());

        pedido.cliente.isento_ie = false;
        let erros = validar(&pedido).unwrap_err();
        assert_eq!(erros.cliente.get("inscricaoEstadual"), Some(&true));
    }

    #[test]
    fn tipo_venda_fora_do_conjunto_reprova() {
        let mut pedido = pedido_valido();
        pedido.cliente.tipo_venda = "atacado".into();
        let erros = validar(&pedido).unwrap_err();
        assert_eq!(erros.cliente.get("tipoVenda"), Some(&true));
    }

    #[test]
    fn forma_pagamento_outros_exige_detalhe() {
        let mut pedido = pedido_valido();
        pedido.comercial.forma_pagamento = "Outros".into();
        let erros = validar(&pedido).unwrap_err();
        assert_eq!(erros.comercial.get("formaPagamentoDetalhe"), Some(&true));

        pedido.comercial.forma_pagamento_detalhe = "50% entrada".into();
        assert!(validar(&pedido).is_ok());
    }

    #[test]
    fn detalhe_da_forma_de_pagamento_foca_antes_do_prazo() {
        let mut pedido = pedido_valido();
        pedido.comercial.forma_pagamento = "Outros".into();
        pedido.comercial.prazo_entrega = " ".into();
        let erros = validar(&pedido).unwrap_err();
        assert_eq!(
            erros.primeiro_campo().as_deref(),
            Some("comercial.formaPagamentoDetalhe")
        );
    }

    #[test]
    fn frete_transportadora_exige_nome() {
        let mut pedido = pedido_valido();
        pedido.comercial.frete = "Transportadora".into();
        let erros = validar(&pedido).unwrap_err();
        assert_eq!(erros.comercial.get("transportadora"), Some(&true));

        pedido.comercial.frete = "Retira".into();
        assert!(validar(&pedido).is_ok());
    }

    #[test]
    fn icms_ausente_ou_fora_das_opcoes_reprova() {
        let mut pedido = pedido_valido();
        pedido.icms = None;
        assert_eq!(
            validar(&pedido).unwrap_err().impostos.get("icms"),
            Some(&true)
        );

        pedido.icms = Some(10.0);
        assert_eq!(
            validar(&pedido).unwrap_err().impostos.get("icms"),
            Some(&true)
        );
    }

    #[test]
    fn telefone_curto_reprova() {
        let mut pedido = pedido_valido();
        pedido.cliente.telefone = "(11)9123".into();
        let erros = validar(&pedido).unwrap_err();
        assert_eq!(erros.cliente.get("telefone"), Some(&true));
    }

    #[test]
    fn item_com_quantidade_quebrada_entra_no_mapa() {
        let mut pedido = pedido_valido();
        pedido.itens.push(item(7, 10.0, 6, 0.0));
        let erros = validar(&pedido).unwrap_err();
        let erro = erros.itens.get(&1).unwrap();
        assert!(erro.quantidade);
        assert!(!erro.codigo);
        assert_eq!(erros.primeiro_campo().as_deref(), Some("itens.1.quantidade"));
    }

    #[test]
    fn item_sem_codigo_foca_no_produto() {
        let mut pedido = pedido_valido();
        pedido.itens[0].codigo.clear();
        let erros = validar(&pedido).unwrap_err();
        assert_eq!(erros.primeiro_campo().as_deref(), Some("itens.0.codigo"));
    }

    // ---------------- autocomplete ----------------

    fn catalogo() -> Vec<Produto> {
        vec![
            Produto {
                codigo: "MV-10".into(),
                nome: "Bobina 30cm".into(),
                preco: 10.0,
                multiplo: 1,
                unidade: "UN".into(),
                ipi: 0.0,
            },
            Produto {
                codigo: "77001".into(),
                nome: "Filme stretch".into(),
                preco: 20.0,
                multiplo: 6,
                unidade: "RL".into(),
                ipi: 3.25,
            },
        ]
    }

    #[test]
    fn busca_por_codigo_ou_nome() {
        let produtos = catalogo();
        let r = filtrar_produtos(&produtos, "mv-1");
        assert_eq!(r.len(), 1);
        assert_eq!(r[0].codigo, "MV-10");

        let r = filtrar_produtos(&produtos, "stretch");
        assert_eq!(r.len(), 1);
        assert_eq!(r[0].codigo, "77001");
    }

    #[test]
    fn busca_com_eco_de_selecao_usa_so_o_codigo() {
        let produtos = catalogo();
        let r = filtrar_produtos(&produtos, "77001 - Filme stretch");
        assert_eq!(r.len(), 1);
        assert_eq!(r[0].codigo, "77001");
    }

    #[test]
    fn zero_resultados_volta_o_catalogo_inteiro() {
        let produtos = catalogo();
        assert_eq!(filtrar_produtos(&produtos, "inexistente").len(), 2);
        assert_eq!(filtrar_produtos(&produtos, "").len(), 2);
    }

    // ---------------- payload / versionamento ----------------

    #[test]
    fn orcamento_novo_e_v1_sem_rotulo() {
        let payload = montar_payload(&pedido_valido(), "Ana", meio_dia(2026, 3, 10, 10, 0));
        assert!(!payload.is_edited);
        assert_eq!(payload.version, 1);
        assert_eq!(payload.versao_label, "");
        assert_eq!(payload.representante, "Ana");
        assert_eq!(payload.valores.total, 1210.0);
    }

    #[test]
    fn edicao_incrementa_versao_e_rotula() {
        let mut pedido = pedido_valido();
        pedido.edit_mode = true;
        pedido.version = Some(1);
        let payload = montar_payload(&pedido, "Ana", meio_dia(2026, 3, 10, 10, 0));
        assert!(payload.is_edited);
        assert_eq!(payload.version, 2);
        assert_eq!(payload.versao_label, "V2");

        pedido.version = Some(2);
        let payload = montar_payload(&pedido, "Ana", meio_dia(2026, 3, 10, 10, 0));
        assert_eq!(payload.version, 3);
        assert_eq!(payload.versao_label, "V3");
    }

    #[test]
    fn edicao_sem_versao_informada_assume_v1() {
        let mut pedido = pedido_valido();
        pedido.edit_mode = true;
        pedido.version = None;
        let payload = montar_payload(&pedido, "Ana", meio_dia(2026, 3, 10, 10, 0));
        assert_eq!(payload.version, 2);
    }

    #[test]
    fn validade_vazia_recebe_o_padrao() {
        let mut pedido = pedido_valido();
        pedido.comercial.validade = String::new();
        let payload = montar_payload(&pedido, "Ana", meio_dia(2026, 3, 10, 18, 0));
        assert_eq!(payload.comercial.dados.validade, "18/03/2026");
    }

    #[test]
    fn observacoes_ganham_detalhes_condicionais() {
        let mut pedido = pedido_valido();
        pedido.comercial.forma_pagamento = "Outros".into();
        pedido.comercial.forma_pagamento_detalhe = "50% entrada + 50% na entrega".into();
        pedido.comercial.frete = "Transportadora".into();
        pedido.comercial.transportadora = "TransLog".into();

        let payload = montar_payload(&pedido, "Ana", meio_dia(2026, 3, 10, 10, 0));
        let obs = &payload.comercial.dados.observacoes;
        assert!(obs.contains("\nForma de Pagamento: 50% entrada + 50% na entrega"));
        assert!(obs.contains("\nTransportadora: TransLog"));
    }

    #[test]
    fn frete_outros_anota_detalhes_do_envio() {
        let mut pedido = pedido_valido();
        pedido.comercial.frete = "Outros".into();
        pedido.comercial.transportadora = "Motoboy".into();
        let payload = montar_payload(&pedido, "Ana", meio_dia(2026, 3, 10, 10, 0));
        assert!(payload
            .comercial
            .dados
            .observacoes
            .contains("\nFrete (Detalhes): Motoboy"));
    }

    #[test]
    fn ie_isenta_vai_como_literal() {
        let mut pedido = pedido_valido();
        pedido.cliente.isento_ie = true;
        pedido.cliente.inscricao_estadual = String::new();
        let payload = montar_payload(&pedido, "Ana", meio_dia(2026, 3, 10, 10, 0));
        assert_eq!(payload.cliente.inscricao_estadual, "ISENTO");
    }

    #[test]
    fn desconto_fora_da_faixa_e_grampeado() {
        let mut pedido = pedido_valido();
        pedido.desconto = Some(50.0);
        let payload = montar_payload(&pedido, "Ana", meio_dia(2026, 3, 10, 10, 0));
        assert_eq!(payload.desconto, 8.0);

        pedido.desconto = Some(-3.0);
        let payload = montar_payload(&pedido, "Ana", meio_dia(2026, 3, 10, 10, 0));
        assert_eq!(payload.desconto, 0.0);
    }

    #[test]
    fn itens_do_payload_carregam_derivados() {
        let payload = montar_payload(&pedido_valido(), "Ana", meio_dia(2026, 3, 10, 10, 0));
        let item = &payload.itens[0];
        assert_eq!(item.subtotal, 1000.0);
        assert_eq!(item.ipi_valor, 50.0);
        assert_eq!(payload.comercial.icms, 18.0);
        assert_eq!(payload.comercial.desconto, 2.0);
    }
}
