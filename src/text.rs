//! # Normalização de Texto — Forma Canônica para Comparação
//!
//! Todo o matching fuzzy acontece sobre uma **forma canônica**: texto sem
//! acentos e em minúsculas. A mesma canonicalização é aplicada ao texto do
//! relatório e a cada termo do dicionário, o que garante matching
//! insensível a acentos e a caixa ("Ação" ≡ "acao" ≡ "ACAO").
//!
//! ## Pipeline de Canonicalização
//!
//! ```text
//! "Falha de Comunicação"
//!   ├── 1. NFD — decompõe "ç" em "c" + U+0327, "ã" em "a" + U+0303
//!   ├── 2. Descarta as marcas combinantes (diacríticos)
//!   └── 3. Minúsculas
//! → "falha de comunicacao"
//! ```
//!
//! ## Segmentação em Sentenças
//!
//! O matcher trabalha em granularidade de **sentença** (ver
//! [`crate::matcher`]): o texto normalizado é dividido nos terminadores
//! `.`, `!` e `?`. A segmentação cobre o texto inteiro e não se sobrepõe;
//! segmentos vazios são permitidos e simplesmente nunca casam com nada.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Canonicaliza uma string para comparação: NFD, sem diacríticos, minúsculas.
///
/// Função pura e total — aceita qualquer string, inclusive vazia, e nunca
/// falha. Idempotente: `normalizar(normalizar(s)) == normalizar(s)`.
pub fn normalizar(texto: &str) -> String {
    texto
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase()
}

/// Texto do relatório em forma canônica, já segmentado em sentenças.
///
/// A segmentação é feita uma única vez na construção; o matcher itera
/// sobre [`sentencas`](NormalizedText::sentencas) para cada termo do
/// dicionário, então pré-computar evita re-segmentar milhares de vezes.
#[derive(Debug, Clone)]
pub struct NormalizedText {
    /// Texto completo canonicalizado.
    pub texto: String,
    /// Unidades de sentença, divididas em `.`, `!`, `?`, com espaços
    /// das bordas removidos. Pode conter strings vazias.
    pub sentencas: Vec<String>,
}

impl NormalizedText {
    /// Canonicaliza o texto bruto extraído e o segmenta em sentenças.
    pub fn new(texto_bruto: &str) -> Self {
        let texto = normalizar(texto_bruto);
        let sentencas = texto
            .split(['.', '!', '?'])
            .map(|s| s.trim().to_string())
            .collect();
        Self { texto, sentencas }
    }

    /// O texto não tem nenhuma sentença com conteúdo.
    pub fn vazio(&self) -> bool {
        self.sentencas.iter().all(|s| s.is_empty())
    }
}
