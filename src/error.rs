//! # Erros — Taxonomia de Falhas da Análise
//!
//! Classificação das falhas possíveis do pipeline, em três famílias:
//!
//! | Família | Exemplos | Política |
//! |---------|----------|----------|
//! | Configuração | coluna ausente, fonte inacessível | fatal, aborta a análise, sem retry |
//! | Entrada inválida | extensão não suportada, limiar fora da faixa | fatal para a requisição |
//! | Casos degenerados | texto vazio, detecção de idioma falha | recuperados localmente, nunca chegam aqui |
//!
//! Falha de detecção de idioma **não tem variante**: ela é absorvida pelo
//! detector (fallback para PT) e nunca se propaga como erro.

use thiserror::Error;

/// Erro do pipeline de análise de precursores.
#[derive(Debug, Error)]
pub enum AnaliseError {
    /// Extensão de arquivo fora de {pdf, docx}. Rejeitado antes de
    /// qualquer tentativa de extração.
    #[error("formato de arquivo não suportado: .{0} (use .pdf ou .docx)")]
    FormatoNaoSuportado(String),

    /// O documento tem a extensão certa mas a biblioteca de extração falhou
    /// (PDF corrompido, DOCX malformado).
    #[error("falha ao extrair texto do documento: {0}")]
    Extracao(String),

    /// A fonte do dicionário (caminho local ou URL) não pôde ser lida.
    /// Fatal, sem retry — a análise não faz sentido sem dicionário.
    #[error("fonte de precursores inacessível ({fonte}): {motivo}")]
    FonteInacessivel { fonte: String, motivo: String },

    /// A planilha de precursores existe mas não tem o esquema exigido.
    #[error("a planilha de precursores deve conter as colunas 'Dimensao', 'PT' e 'EN' (ausente: {0})")]
    ColunaAusente(String),

    /// A planilha existe mas não é um CSV parseável.
    #[error("falha ao ler a planilha de precursores: {0}")]
    PlanilhaInvalida(String),

    /// Limiar de similaridade fora do intervalo operacional [60, 100].
    #[error("limiar de similaridade fora do intervalo [60, 100]: {0}")]
    LimiarInvalido(u8),
}
