//! # Detecção de Idioma — Classificação Binária PT/EN
//!
//! O dicionário de precursores é bilíngue (Português e Inglês), e o resumo
//! de frequência é restrito ao idioma dominante do relatório. Este módulo
//! reduz a identificação estatística de idioma do `whatlang` a um rótulo
//! binário [`Idioma`].
//!
//! ## Política de Fallback
//!
//! Relatórios de acidente no domínio deste sistema são majoritariamente
//! em Português; por isso **qualquer** resultado que não seja Inglês —
//! incluindo falha total de detecção (texto vazio, só números, etc.) —
//! resolve para [`Idioma::PT`]. Detecção nunca é um erro.

use std::fmt;

use serde::Serialize;
use whatlang::Lang;

/// Idioma suportado pelo dicionário de precursores.
///
/// Serializa como `"PT"` / `"EN"` — os mesmos rótulos usados na coluna
/// `Idioma` da planilha de status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Idioma {
    /// Português (idioma padrão do domínio).
    PT,
    /// Inglês.
    EN,
}

impl Idioma {
    /// Os dois idiomas do dicionário, na ordem das colunas da planilha.
    pub const TODOS: [Idioma; 2] = [Idioma::PT, Idioma::EN];

    /// Nome da coluna correspondente na planilha de precursores.
    pub fn coluna(self) -> &'static str {
        match self {
            Idioma::PT => "PT",
            Idioma::EN => "EN",
        }
    }
}

impl fmt::Display for Idioma {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.coluna())
    }
}

/// Classifica o idioma dominante do texto extraído.
///
/// Retorna [`Idioma::EN`] somente quando o `whatlang` identifica Inglês;
/// qualquer outro idioma detectado, ou falha de detecção, resolve para
/// [`Idioma::PT`]. Total — nunca retorna erro.
pub fn detectar_idioma(texto: &str) -> Idioma {
    match whatlang::detect(texto) {
        Some(info) if info.lang() == Lang::Eng => {
            tracing::debug!(confianca = info.confidence(), "Idioma detectado: EN");
            Idioma::EN
        }
        Some(info) => {
            tracing::debug!(lang = ?info.lang(), confianca = info.confidence(), "Idioma não-inglês, usando PT");
            Idioma::PT
        }
        None => {
            tracing::debug!("Detecção de idioma falhou, usando PT como padrão");
            Idioma::PT
        }
    }
}
