//! # Extração de Texto — Do Documento ao Blob de Texto
//!
//! Converte o relatório enviado (PDF ou DOCX) em uma única string de
//! texto corrido, pronta para a canonicalização de [`crate::text`].
//!
//! ## Formatos Suportados
//!
//! | Extensão | Biblioteca | Estratégia |
//! |----------|-----------|------------|
//! | `.pdf`   | `pdf-extract` | texto de todas as páginas |
//! | `.docx`  | `docx-rs` | parágrafos do corpo do documento |
//!
//! Qualquer outra extensão é rejeitada com
//! [`AnaliseError::FormatoNaoSuportado`] **antes** de qualquer leitura do
//! conteúdo — sem processamento parcial.
//!
//! ## Limpeza Pós-Extração
//!
//! PDFs frequentemente introduzem artefatos: quebras de linha arbitrárias
//! e espaços espúrios no meio de palavras, especialmente antes de sufixos
//! comuns do PT-BR ("comunica ção" → "comunicação"). A limpeza colapsa
//! todo whitespace em espaços simples e rejunta sílabas separadas.
//!
//! Documento sem texto extraível **não é erro**: retorna string vazia e o
//! pipeline reporta o desfecho "nada encontrado" na agregação.

use std::path::Path;

use regex::Regex;
use unicode_normalization::UnicodeNormalization;

use crate::error::AnaliseError;

/// Formato de documento aceito pela extração.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Formato {
    Pdf,
    Docx,
}

impl Formato {
    /// Resolve o formato a partir da extensão do nome do arquivo.
    ///
    /// A comparação é insensível a caixa (`relatorio.PDF` é aceito).
    ///
    /// # Erros
    ///
    /// [`AnaliseError::FormatoNaoSuportado`] para qualquer extensão fora
    /// de {pdf, docx}, inclusive arquivos sem extensão.
    pub fn da_extensao(nome_arquivo: &str) -> Result<Self, AnaliseError> {
        let ext = Path::new(nome_arquivo)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "pdf" => Ok(Formato::Pdf),
            "docx" => Ok(Formato::Docx),
            _ => Err(AnaliseError::FormatoNaoSuportado(ext)),
        }
    }
}

/// Extrai todo o texto de um documento, dispatchando pelo formato.
///
/// Retorna o texto já limpo (whitespace colapsado, sílabas rejuntadas).
/// String vazia significa documento sem texto extraível — caso degenerado
/// recuperável, não erro.
pub fn extrair_texto(nome_arquivo: &str, bytes: &[u8]) -> Result<String, AnaliseError> {
    let formato = Formato::da_extensao(nome_arquivo)?;
    tracing::info!(arquivo = nome_arquivo, ?formato, "Extraindo texto do documento");

    let bruto = match formato {
        Formato::Pdf => extrair_pdf(bytes)?,
        Formato::Docx => extrair_docx(bytes)?,
    };
    let texto = limpar_texto(&bruto);
    tracing::info!(chars = texto.len(), "Texto extraído e limpo");
    Ok(texto)
}

/// Extrai o texto de todas as páginas de um PDF em memória.
fn extrair_pdf(bytes: &[u8]) -> Result<String, AnaliseError> {
    pdf_extract::extract_text_from_mem(bytes)
        .map_err(|e| AnaliseError::Extracao(format!("PDF: {e}")))
}

/// Extrai o texto dos parágrafos do corpo de um DOCX.
///
/// Percorre a árvore documento → parágrafo → run → texto, juntando os
/// runs de cada parágrafo sem separador e os parágrafos com espaço
/// simples. Parágrafos sem texto são pulados.
fn extrair_docx(bytes: &[u8]) -> Result<String, AnaliseError> {
    let docx = docx_rs::read_docx(bytes)
        .map_err(|e| AnaliseError::Extracao(format!("DOCX: {e:?}")))?;

    let mut paragrafos: Vec<String> = Vec::new();
    for child in docx.document.children {
        if let docx_rs::DocumentChild::Paragraph(para) = child {
            let texto: String = para
                .children
                .iter()
                .filter_map(|pc| match pc {
                    docx_rs::ParagraphChild::Run(run) => Some(
                        run.children
                            .iter()
                            .filter_map(|rc| match rc {
                                docx_rs::RunChild::Text(t) => Some(t.text.as_str()),
                                _ => None,
                            })
                            .collect::<Vec<_>>()
                            .join(""),
                    ),
                    _ => None,
                })
                .collect::<Vec<_>>()
                .join("");
            if !texto.trim().is_empty() {
                paragrafos.push(texto);
            }
        }
    }
    Ok(paragrafos.join(" "))
}

/// Limpa texto extraído: NFC, whitespace colapsado, sílabas rejuntadas.
///
/// ## Passo 1: NFC
///
/// Recompõe caracteres decompostos ("a" + U+0303 → "ã") para que a
/// contagem de caracteres e as regexes vejam uma representação única.
///
/// ## Passo 2: Colapso de whitespace
///
/// Quebras de linha e espaços múltiplos viram um espaço simples — o
/// equivalente a juntar páginas/parágrafos com `" "`.
///
/// ## Passo 3: Reconstrução de sílabas PT-BR
///
/// Extratores de PDF quebram palavras em posições arbitrárias, com
/// frequência antes de sufixos comuns: "comunica ção" → "comunicação".
fn limpar_texto(texto: &str) -> String {
    let nfc: String = texto.nfc().collect();
    let colapsado = nfc.split_whitespace().collect::<Vec<_>>().join(" ");
    let re = Regex::new(r"(\w+)\s+(ção|ções|cia|ência|ância|mente|dade|ável|ível)")
        .expect("invalid regex");
    re.replace_all(&colapsado, "$1$2").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    // ─── Formato::da_extensao ──────────────────────────────────

    #[test]
    fn aceita_pdf_e_docx() {
        assert_eq!(Formato::da_extensao("relatorio.pdf").unwrap(), Formato::Pdf);
        assert_eq!(Formato::da_extensao("relatorio.docx").unwrap(), Formato::Docx);
    }

    #[test]
    fn extensao_insensivel_a_caixa() {
        assert_eq!(Formato::da_extensao("RELATORIO.PDF").unwrap(), Formato::Pdf);
        assert_eq!(Formato::da_extensao("Relatorio.Docx").unwrap(), Formato::Docx);
    }

    #[test]
    fn rejeita_txt() {
        let err = Formato::da_extensao("relatorio.txt").unwrap_err();
        assert!(matches!(err, AnaliseError::FormatoNaoSuportado(ext) if ext == "txt"));
    }

    #[test]
    fn rejeita_sem_extensao() {
        assert!(Formato::da_extensao("relatorio").is_err());
    }

    #[test]
    fn rejeicao_acontece_antes_da_extracao() {
        // Bytes que seriam um PDF válido não importam: a extensão decide primeiro
        let err = extrair_texto("relatorio.txt", b"%PDF-1.4 ...").unwrap_err();
        assert!(matches!(err, AnaliseError::FormatoNaoSuportado(_)));
    }

    // ─── limpar_texto ──────────────────────────────────────────

    #[test]
    fn colapsa_whitespace() {
        assert_eq!(
            limpar_texto("linha um\nlinha   dois\n\n  linha tres"),
            "linha um linha dois linha tres"
        );
    }

    #[test]
    fn rejunta_sufixo_quebrado() {
        assert_eq!(limpar_texto("falha de comunica ção"), "falha de comunicação");
        assert_eq!(limpar_texto("manuten ção preventiva"), "manutenção preventiva");
    }

    #[test]
    fn preserva_texto_integro() {
        assert_eq!(
            limpar_texto("falha de comunicação grave"),
            "falha de comunicação grave"
        );
    }

    #[test]
    fn texto_vazio_permanece_vazio() {
        assert_eq!(limpar_texto(""), "");
        assert_eq!(limpar_texto("   \n  "), "");
    }
}
