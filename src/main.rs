//! # Análise de Precursores em Relatórios de Acidente
//!
//! **Ponto de entrada** do analisador de precursores HTO.
//!
//! Recebe um relatório de acidente (`.pdf` ou `.docx`), detecta o idioma
//! dominante (PT/EN), procura os termos do dicionário bilíngue de
//! precursores por similaridade fuzzy em granularidade de sentença, e
//! exporta duas tabelas:
//!
//! - `precursores_resumo` — frequência por (Dimensao, Precursor)
//! - `status_precursores` — o dicionário inteiro anotado com Sim/Não
//!
//! ## Exemplo de Uso
//!
//! ```bash
//! # Análise com os padrões (limiar 75, precursores.csv no diretório atual)
//! cargo run -- relatorio.pdf
//!
//! # Dicionário remoto, limiar mais estrito, saída em JSON
//! cargo run -- relatorio.docx \
//!     --precursores https://exemplo.org/precursores.csv \
//!     --limiar 85 --formato json --saida resultados/
//!
//! # Logs detalhados
//! RUST_LOG=debug cargo run -- relatorio.pdf
//! ```

// Declaração dos módulos da aplicação.
// Cada módulo corresponde a uma fase do pipeline:

/// Módulo `dictionary` — carga e cache da planilha de precursores.
mod dictionary;

/// Módulo `error` — taxonomia de erros da análise.
mod error;

/// Módulo `export` — exportação das tabelas em CSV/JSON.
mod export;

/// Módulo `extract` — extração de texto de PDF e DOCX.
mod extract;

/// Módulo `language` — detecção binária de idioma (PT/EN).
mod language;

/// Módulo `matcher` — matching fuzzy termo × sentença.
mod matcher;

/// Módulo `pipeline` — orquestração síncrona das fases.
mod pipeline;

/// Módulo `report` — agregação em resumo e tabela de status.
mod report;

/// Módulo `text` — canonicalização e segmentação de sentenças.
mod text;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::dictionary::CacheDicionario;
use crate::export::FormatoSaida;
use crate::pipeline::Pipeline;
use crate::report::{ConfigRelatorio, EscopoPresenca, ModoRelatorio, Resultado};

/// Análise fuzzy de precursores HTO em relatórios de acidente.
#[derive(Debug, Parser)]
#[command(name = "analise-precursores", version, about)]
struct Cli {
    /// Caminho do relatório de acidente (.pdf ou .docx)
    relatorio: PathBuf,

    /// Fonte da planilha de precursores: caminho local ou URL http(s)
    #[arg(long, default_value = "precursores.csv")]
    precursores: String,

    /// Limiar de similaridade fuzzy (%), entre 60 e 100
    #[arg(long, default_value = "75")]
    limiar: u8,

    /// Semântica de contagem do resumo
    #[arg(long, value_enum, default_value = "frequencia")]
    modo: ModoRelatorio,

    /// Escopo de idioma da tabela Sim/Não
    #[arg(long, value_enum, default_value = "ambos")]
    escopo: EscopoPresenca,

    /// Diretório de saída das tabelas exportadas
    #[arg(long, default_value = ".")]
    saida: PathBuf,

    /// Formato de exportação
    #[arg(long, value_enum, default_value = "csv")]
    formato: FormatoSaida,
}

fn main() -> Result<()> {
    // Logging configurável via RUST_LOG (padrão: info)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    // O cache pertence à raiz de composição. Numa invocação única do CLI
    // ele não economiza nada, mas mantém a política de memoização
    // explícita e invalidável, em vez de um estado global implícito.
    let mut cache = CacheDicionario::new();
    let dicionario = cache
        .obter(&cli.precursores)
        .context("Erro ao carregar precursores")?;

    let bytes = std::fs::read(&cli.relatorio)
        .with_context(|| format!("Falha ao ler o relatório {}", cli.relatorio.display()))?;
    let nome_arquivo = cli.relatorio.file_name().map_or_else(
        || cli.relatorio.display().to_string(),
        |n| n.to_string_lossy().into_owned(),
    );

    let config = ConfigRelatorio {
        modo: cli.modo,
        escopo: cli.escopo,
    };
    let pipeline = Pipeline::new(dicionario, cli.limiar, config)?;
    let analise = pipeline.executar(&nome_arquivo, &bytes)?;

    println!("Idioma detectado: {}", analise.idioma);
    match &analise.resultado {
        Resultado::NadaEncontrado { .. } => {
            println!("⚠️  Nenhum precursor foi identificado no relatório.");
        }
        Resultado::Encontrado { resumo, .. } => {
            println!("🔍 Foram identificados {} precursores únicos.\n", resumo.len());
            println!("{:<30} {:<40} {:>10}", "Dimensao", "Precursor", "Frequência");
            for linha in resumo {
                println!(
                    "{:<30} {:<40} {:>10}",
                    linha.dimensao, linha.precursor, linha.frequencia
                );
            }
            println!();
        }
    }

    let escritos = export::exportar(&analise.resultado, &cli.saida, cli.formato)?;
    for caminho in &escritos {
        println!("📥 {}", caminho.display());
    }

    Ok(())
}
