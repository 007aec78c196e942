//! # Exportação — Tabelas em CSV ou JSON
//!
//! Materializa o [`Resultado`] da agregação nos dois artefatos que o
//! operador baixa:
//!
//! - `precursores_resumo` — resumo de frequência (`Dimensao`,
//!   `Precursor`, `Frequência`); só existe quando algo foi encontrado.
//! - `status_precursores` — planilha Sim/Não (`Dimensao`, `Idioma`,
//!   `Precursor`, `Encontrado`); sempre escrita, mesmo toda "Não".
//!
//! Os nomes de coluna saem dos atributos `serde(rename)` das structs de
//! linha — CSV e JSON compartilham a mesma fonte de verdade.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::Serialize;

use crate::report::Resultado;

/// Formato dos arquivos exportados.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatoSaida {
    /// Texto delimitado por vírgula, uma linha por registro.
    Csv,
    /// JSON pretty-printed, um array de objetos.
    Json,
}

impl FormatoSaida {
    fn extensao(self) -> &'static str {
        match self {
            FormatoSaida::Csv => "csv",
            FormatoSaida::Json => "json",
        }
    }
}

/// Serializa linhas de tabela como CSV com cabeçalho.
pub fn para_csv<T: Serialize>(linhas: &[T]) -> Result<String> {
    let mut escritor = csv::Writer::from_writer(Vec::new());
    for linha in linhas {
        escritor.serialize(linha).context("Falha ao serializar linha CSV")?;
    }
    let bytes = escritor
        .into_inner()
        .map_err(csv::IntoInnerError::into_error)
        .context("Falha ao finalizar CSV")?;
    String::from_utf8(bytes).context("CSV gerado não é UTF-8")
}

/// Serializa linhas de tabela como JSON pretty-printed.
pub fn para_json<T: Serialize>(linhas: &[T]) -> Result<String> {
    serde_json::to_string_pretty(linhas).context("Falha ao serializar JSON")
}

/// Escreve os artefatos da análise no diretório de saída.
///
/// Cria o diretório se não existir. Retorna os caminhos escritos, na
/// ordem resumo → status (o resumo é omitido no desfecho
/// [`Resultado::NadaEncontrado`]).
pub fn exportar(
    resultado: &Resultado,
    diretorio: &Path,
    formato: FormatoSaida,
) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(diretorio)
        .with_context(|| format!("Falha ao criar diretório {}", diretorio.display()))?;

    let mut escritos = Vec::new();
    let ext = formato.extensao();

    let resumo = resultado.resumo();
    if !resumo.is_empty() {
        let caminho = diretorio.join(format!("precursores_resumo.{ext}"));
        let conteudo = match formato {
            FormatoSaida::Csv => para_csv(resumo)?,
            FormatoSaida::Json => para_json(resumo)?,
        };
        std::fs::write(&caminho, conteudo)
            .with_context(|| format!("Falha ao escrever {}", caminho.display()))?;
        escritos.push(caminho);
    }

    let caminho = diretorio.join(format!("status_precursores.{ext}"));
    let conteudo = match formato {
        FormatoSaida::Csv => para_csv(resultado.status())?,
        FormatoSaida::Json => para_json(resultado.status())?,
    };
    std::fs::write(&caminho, conteudo)
        .with_context(|| format!("Falha ao escrever {}", caminho.display()))?;
    escritos.push(caminho);

    tracing::info!(arquivos = escritos.len(), ?formato, "Tabelas exportadas");
    Ok(escritos)
}
