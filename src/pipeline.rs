//! # Pipeline — Orquestração Síncrona da Análise
//!
//! Encadeia as fases da análise em sequência, uma invocação por
//! relatório, sem estado mutável compartilhado entre análises:
//!
//! ```text
//! bytes do documento
//!   ├── 1. Extração       → extract::extrair_texto()
//!   ├── 2. Detecção       → language::detectar_idioma() (sobre o texto bruto)
//!   ├── 3. Normalização   → text::NormalizedText::new()
//!   ├── 4. Matching fuzzy → matcher::buscar_precursores()
//!   └── 5. Agregação      → report::agregar()
//! ```
//!
//! O matching domina a latência; as demais fases são I/O curto ou passes
//! lineares. Nenhum paralelismo — a escala (um relatório, um dicionário
//! curado) não o justifica. Quem portar isto para um serviço deve impor
//! timeout em volta do pipeline inteiro, não por fase.
//!
//! Documento sem texto extraível atravessa o pipeline como caso
//! degenerado: zero sentenças → zero registros → desfecho
//! [`Resultado::NadaEncontrado`], nunca um crash.

use std::time::Instant;

use crate::dictionary::Dicionario;
use crate::error::AnaliseError;
use crate::extract;
use crate::language::{detectar_idioma, Idioma};
use crate::matcher::{buscar_precursores, MatchRecord};
use crate::report::{agregar, ConfigRelatorio, Resultado};
use crate::text::NormalizedText;

/// Faixa operacional do limiar de similaridade (percentual inclusivo).
pub const LIMIAR_MIN: u8 = 60;
pub const LIMIAR_MAX: u8 = 100;

/// Resultado completo de uma análise.
#[derive(Debug, Clone)]
pub struct Analise {
    /// Idioma dominante detectado no relatório.
    pub idioma: Idioma,
    /// Registros brutos do matcher (esparsos, pré-agregação).
    pub registros: Vec<MatchRecord>,
    /// Tabelas agregadas prontas para exibição/exportação.
    pub resultado: Resultado,
}

/// Pipeline de análise configurado: dicionário + limiar + política de
/// relatório. Reutilizável entre documentos — cada execução é
/// independente dos anteriores.
pub struct Pipeline<'a> {
    dicionario: &'a Dicionario,
    limiar: u8,
    config: ConfigRelatorio,
}

impl<'a> Pipeline<'a> {
    /// Cria o pipeline, validando o limiar.
    ///
    /// # Erros
    ///
    /// [`AnaliseError::LimiarInvalido`] se o limiar estiver fora de
    /// [[`LIMIAR_MIN`], [`LIMIAR_MAX`]].
    pub fn new(
        dicionario: &'a Dicionario,
        limiar: u8,
        config: ConfigRelatorio,
    ) -> Result<Self, AnaliseError> {
        if !(LIMIAR_MIN..=LIMIAR_MAX).contains(&limiar) {
            return Err(AnaliseError::LimiarInvalido(limiar));
        }
        Ok(Self {
            dicionario,
            limiar,
            config,
        })
    }

    /// Executa a análise completa sobre os bytes de um documento.
    ///
    /// A extensão do nome do arquivo decide o extrator; extensão não
    /// suportada é rejeitada antes de ler qualquer byte do conteúdo.
    pub fn executar(&self, nome_arquivo: &str, bytes: &[u8]) -> Result<Analise, AnaliseError> {
        let t_total = Instant::now();

        // ─── Fase 1: Extração ────────────────────────────────────
        let texto = extract::extrair_texto(nome_arquivo, bytes)?;
        let previa: String = texto.chars().take(1000).collect();
        tracing::info!(previa = %previa, "Exemplo do texto extraído");

        let analise = self.analisar_texto(&texto);
        tracing::info!(
            total_ms = t_total.elapsed().as_millis() as u64,
            "Análise concluída"
        );
        Ok(analise)
    }

    /// Executa as fases 2–5 sobre texto já extraído.
    ///
    /// Ponto de entrada para testes e para chamadores que já têm o texto
    /// em mãos (ex.: reprocessamento com outro limiar).
    pub fn analisar_texto(&self, texto: &str) -> Analise {
        // ─── Fase 2: Detecção de idioma (sobre o texto bruto) ────
        let idioma = detectar_idioma(texto);
        tracing::info!(%idioma, "Idioma detectado");

        // ─── Fase 3: Normalização e segmentação ──────────────────
        let normalizado = NormalizedText::new(texto);
        if normalizado.vazio() {
            tracing::warn!("Documento sem texto extraível — a análise seguirá vazia");
        }

        // ─── Fase 4: Matching fuzzy ──────────────────────────────
        let t_match = Instant::now();
        let registros = buscar_precursores(&normalizado, self.dicionario, self.limiar);
        tracing::info!(
            match_ms = t_match.elapsed().as_millis() as u64,
            registros = registros.len(),
            "Matching concluído"
        );

        // ─── Fase 5: Agregação ───────────────────────────────────
        let resultado = agregar(&registros, idioma, self.dicionario, self.config);

        Analise {
            idioma,
            registros,
            resultado,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{EscopoPresenca, ModoRelatorio};

    fn dicionario_exemplo() -> Dicionario {
        Dicionario::parse_csv(
            "Dimensao,PT,EN\n\
             Comunicação,\"falha de comunicacao;ruido\",\"communication failure;noise\"\n",
        )
        .unwrap()
    }

    fn config_padrao() -> ConfigRelatorio {
        ConfigRelatorio {
            modo: ModoRelatorio::Frequencia,
            escopo: EscopoPresenca::Ambos,
        }
    }

    // ─── validação de limiar ───────────────────────────────────

    #[test]
    fn limiar_fora_da_faixa_eh_rejeitado() {
        let dic = dicionario_exemplo();
        assert!(matches!(
            Pipeline::new(&dic, 59, config_padrao()),
            Err(AnaliseError::LimiarInvalido(59))
        ));
        assert!(Pipeline::new(&dic, 60, config_padrao()).is_ok());
        assert!(Pipeline::new(&dic, 100, config_padrao()).is_ok());
    }

    // ─── cenário de ponta a ponta (texto já extraído) ──────────

    #[test]
    fn cenario_falha_de_comunicacao_no_limiar_75() {
        let dic = dicionario_exemplo();
        let pipeline = Pipeline::new(&dic, 75, config_padrao()).unwrap();
        let analise =
            pipeline.analisar_texto("Houve uma falha de comunicação grave durante o procedimento.");

        assert_eq!(analise.idioma, Idioma::PT);
        assert_eq!(analise.registros.len(), 1);
        assert_eq!(analise.registros[0].termo, "falha de comunicacao");
        assert_eq!(analise.registros[0].ocorrencias, 1);

        let resumo = analise.resultado.resumo();
        assert_eq!(resumo.len(), 1);
        assert_eq!(resumo[0].frequencia, 1);
    }

    #[test]
    fn frequencia_conserva_as_contagens_por_sentenca() {
        // "ruido" aparece em 3 sentenças; a soma reportada deve ser 3
        let dic = dicionario_exemplo();
        let pipeline = Pipeline::new(&dic, 75, config_padrao()).unwrap();
        let analise = pipeline.analisar_texto(
            "Havia ruido na linha. O ruido aumentou. Com o ruido, nada se ouvia. Fim.",
        );
        let linha = analise
            .resultado
            .resumo()
            .iter()
            .find(|l| l.precursor == "ruido")
            .unwrap();
        assert_eq!(linha.frequencia, analise.registros[0].ocorrencias);
        assert_eq!(linha.frequencia, 3);
    }

    #[test]
    fn texto_vazio_resulta_em_nada_encontrado() {
        let dic = dicionario_exemplo();
        let pipeline = Pipeline::new(&dic, 75, config_padrao()).unwrap();
        let analise = pipeline.analisar_texto("");
        assert!(matches!(
            analise.resultado,
            crate::report::Resultado::NadaEncontrado { .. }
        ));
        // Caso degenerado recuperável: idioma resolve para o padrão
        assert_eq!(analise.idioma, Idioma::PT);
    }

    #[test]
    fn extensao_txt_eh_rejeitada_antes_da_extracao() {
        let dic = dicionario_exemplo();
        let pipeline = Pipeline::new(&dic, 75, config_padrao()).unwrap();
        let err = pipeline.executar("relatorio.txt", b"qualquer coisa").unwrap_err();
        assert!(matches!(err, AnaliseError::FormatoNaoSuportado(_)));
    }
}
