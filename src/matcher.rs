//! # Matcher Fuzzy — Detecção Aproximada de Precursores
//!
//! O coração algorítmico do sistema: para cada termo do dicionário, em
//! cada idioma, mede a **presença aproximada** do termo nas sentenças do
//! relatório e conta em quantas sentenças o termo aparece.
//!
//! ## Algoritmo
//!
//! ```text
//! para cada entrada do dicionário:
//!   para cada idioma em {PT, EN}:
//!     para cada termo da lista (separada por ';'):
//!       termo_norm = normalizar(termo)          // mesma canonicalização do texto
//!       ocorrências = nº de sentenças com pontuacao_parcial(termo_norm, sentença) >= limiar
//!       se ocorrências > 0: emite MatchRecord   // resultado esparso
//! ```
//!
//! ## Por que granularidade de sentença?
//!
//! Comparar o termo contra o documento inteiro inflaria o score parcial
//! (qualquer termo "alinha" em algum lugar de um texto longo). A sentença
//! limita o risco de falso positivo e ainda tolera ruído de OCR, paráfrase
//! e flexão via score aproximado em vez de busca exata de substring.
//!
//! ## Complexidade
//!
//! O(entradas × idiomas × termos × sentenças × custo do score). Quadrática
//! no tamanho do documento × dicionário, mas ambos são limitados (um
//! relatório, um dicionário curado de poucas centenas de termos) — nenhuma
//! indexação ou término antecipado é necessário nesta escala. Dicionários
//! muito maiores pediriam pré-filtro de sentenças por comprimento ou
//! sobreposição de tokens antes do score.

use crate::dictionary::Dicionario;
use crate::language::Idioma;
use crate::text::{normalizar, NormalizedText};

/// Um acerto fuzzy: um termo do dicionário presente no relatório.
///
/// Esparso por construção: termos ausentes não produzem registro algum
/// (nunca um registro com zero ocorrências).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchRecord {
    /// Termo em forma canônica (sem acentos, minúsculas).
    pub termo: String,
    /// Dimensão da taxonomia à qual o termo pertence.
    pub dimensao: String,
    /// Idioma da lista de origem do termo na planilha.
    pub idioma: Idioma,
    /// Número de sentenças cujo score atingiu o limiar.
    pub ocorrencias: u32,
}

/// Score de similaridade parcial entre duas strings, na escala 0–100.
///
/// Mede o melhor alinhamento da string **mais curta** dentro da mais
/// longa: desliza uma janela do tamanho da curta sobre a longa (em
/// caracteres, não bytes) e retorna a maior similaridade Levenshtein
/// normalizada entre a curta e alguma janela.
///
/// Tolerante a substring: `pontuacao_parcial("ruido", "houve muito ruido
/// na cabine")` é 100 mesmo com a sentença bem maior que o termo.
///
/// String vazia contra qualquer coisa pontua 0 — sentenças vazias da
/// segmentação nunca casam.
pub fn pontuacao_parcial(a: &str, b: &str) -> u8 {
    let (curta, longa) = if a.chars().count() <= b.chars().count() {
        (a, b)
    } else {
        (b, a)
    };
    if curta.is_empty() {
        return 0;
    }

    let chars_longa: Vec<char> = longa.chars().collect();
    let tamanho = curta.chars().count();
    let mut melhor = 0.0f64;
    for janela in chars_longa.windows(tamanho) {
        let trecho: String = janela.iter().collect();
        let score = strsim::normalized_levenshtein(curta, &trecho);
        if score > melhor {
            melhor = score;
            // Alinhamento perfeito encontrado, nada a melhorar
            if melhor >= 1.0 {
                break;
            }
        }
    }
    (melhor * 100.0).round() as u8
}

/// Busca todos os termos do dicionário nas sentenças do texto normalizado.
///
/// O `limiar` é um percentual inteiro em [60, 100] — a validação de faixa
/// acontece no pipeline, antes de chegar aqui. Elevar o limiar só remove
/// ou preserva acertos, nunca cria novos (monotonicidade por construção:
/// a contagem é `score >= limiar` por sentença).
pub fn buscar_precursores(
    texto: &NormalizedText,
    dicionario: &Dicionario,
    limiar: u8,
) -> Vec<MatchRecord> {
    let mut registros = Vec::new();

    for entrada in dicionario.entradas() {
        for idioma in Idioma::TODOS {
            for termo in entrada.termos(idioma) {
                // Mesma canonicalização aplicada ao texto do documento
                let termo_norm = normalizar(termo);
                let ocorrencias = texto
                    .sentencas
                    .iter()
                    .filter(|sentenca| pontuacao_parcial(&termo_norm, sentenca) >= limiar)
                    .count() as u32;
                if ocorrencias > 0 {
                    tracing::debug!(
                        termo = %termo_norm,
                        dimensao = %entrada.dimensao,
                        %idioma,
                        ocorrencias,
                        "Precursor encontrado"
                    );
                    registros.push(MatchRecord {
                        termo: termo_norm,
                        dimensao: entrada.dimensao.clone(),
                        idioma,
                        ocorrencias,
                    });
                }
            }
        }
    }

    tracing::info!(
        registros = registros.len(),
        limiar,
        sentencas = texto.sentencas.len(),
        "Busca fuzzy concluída"
    );
    registros
}
