//! # Agregação e Relatório — Das Ocorrências às Tabelas Finais
//!
//! Consolida os [`MatchRecord`]s esparsos do matcher em duas tabelas:
//!
//! - **Resumo de frequência** — uma linha por (Dimensao, Precursor)
//!   encontrado, com a contagem somada.
//! - **Tabela de status (Sim/Não)** — o dicionário **inteiro** anotado:
//!   exatamente uma linha por tripla (Dimensao, Idioma, Precursor),
//!   tenha o termo sido encontrado ou não.
//!
//! ## Comportamento Configurável
//!
//! As duas variantes históricas do relatório viraram uma única política
//! configurável:
//!
//! | Eixo | Opções | Efeito |
//! |------|--------|--------|
//! | [`ModoRelatorio`] | `Presenca` / `Frequencia` | peso 1 por termo vs soma de ocorrências; `Frequencia` restringe o resumo ao idioma detectado |
//! | [`EscopoPresenca`] | `Ambos` / `IdiomaDetectado` | conjunto de termos encontrados considera os dois idiomas ou só o detectado |
//!
//! ## Desfecho "Nada Encontrado"
//!
//! Sem nenhum `MatchRecord`, o resultado é [`Resultado::NadaEncontrado`]
//! — um desfecho distinto, não uma tabela vazia "bem-sucedida", para que
//! o chamador não renderize gráficos vazios como se a análise não tivesse
//! rodado. A tabela de status continua disponível (toda "Não").

use std::collections::{BTreeMap, HashSet};

use clap::ValueEnum;
use serde::{Serialize, Serializer};

use crate::dictionary::Dicionario;
use crate::language::Idioma;
use crate::matcher::MatchRecord;
use crate::text::normalizar;

/// Semântica de contagem do resumo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModoRelatorio {
    /// Presença booleana: cada termo encontrado pesa 1, sem filtro de idioma.
    Presenca,
    /// Frequência de ocorrências por sentença, restrita ao idioma detectado.
    Frequencia,
}

/// Escopo de idioma da tabela de status Sim/Não.
///
/// Política deixada explícita e configurável porque as duas versões
/// históricas divergiam; o padrão do CLI é [`EscopoPresenca::Ambos`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum EscopoPresenca {
    /// Termos encontrados em qualquer idioma contam como presentes.
    Ambos,
    /// Só os acertos no idioma detectado do documento contam.
    IdiomaDetectado,
}

/// Configuração da agregação, decidida pelo operador.
#[derive(Debug, Clone, Copy)]
pub struct ConfigRelatorio {
    pub modo: ModoRelatorio,
    pub escopo: EscopoPresenca,
}

impl Default for ConfigRelatorio {
    fn default() -> Self {
        Self {
            modo: ModoRelatorio::Frequencia,
            escopo: EscopoPresenca::Ambos,
        }
    }
}

/// Uma linha do resumo de frequência.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinhaResumo {
    #[serde(rename = "Dimensao")]
    pub dimensao: String,
    #[serde(rename = "Precursor")]
    pub precursor: String,
    #[serde(rename = "Frequência")]
    pub frequencia: u32,
}

/// Uma linha da tabela de status: o termo da planilha e seu veredito.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinhaStatus {
    #[serde(rename = "Dimensao")]
    pub dimensao: String,
    #[serde(rename = "Idioma")]
    pub idioma: Idioma,
    /// Termo como está na planilha (aparado, sem canonicalizar) — a
    /// planilha exportada deve ser legível pelo curador do dicionário.
    #[serde(rename = "Precursor")]
    pub precursor: String,
    #[serde(rename = "Encontrado", serialize_with = "sim_nao")]
    pub encontrado: bool,
}

/// Serializa o booleano como os rótulos "Sim"/"Não" da planilha exportada.
fn sim_nao<S: Serializer>(encontrado: &bool, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(if *encontrado { "Sim" } else { "Não" })
}

/// Desfecho da análise.
#[derive(Debug, Clone)]
pub enum Resultado {
    /// Nenhum precursor identificado no relatório — desfecho distinto,
    /// comunicado como aviso ao operador, nunca como tabela vazia.
    NadaEncontrado {
        /// Dicionário completo anotado, toda linha "Não".
        status: Vec<LinhaStatus>,
    },
    /// Ao menos um precursor identificado.
    Encontrado {
        resumo: Vec<LinhaResumo>,
        status: Vec<LinhaStatus>,
    },
}

impl Resultado {
    /// Tabela de status, presente em ambos os desfechos.
    pub fn status(&self) -> &[LinhaStatus] {
        match self {
            Resultado::NadaEncontrado { status } | Resultado::Encontrado { status, .. } => status,
        }
    }

    /// Resumo de frequência; vazio no desfecho [`Resultado::NadaEncontrado`].
    pub fn resumo(&self) -> &[LinhaResumo] {
        match self {
            Resultado::NadaEncontrado { .. } => &[],
            Resultado::Encontrado { resumo, .. } => resumo,
        }
    }
}

/// Agrega os registros do matcher nas tabelas finais.
///
/// Determinístico: o resumo sai ordenado por (Dimensao, Precursor) e a
/// tabela de status segue a ordem da planilha (linha a linha, PT antes
/// de EN, termos na ordem do campo).
pub fn agregar(
    registros: &[MatchRecord],
    idioma_detectado: Idioma,
    dicionario: &Dicionario,
    config: ConfigRelatorio,
) -> Resultado {
    let status = tabela_status(registros, idioma_detectado, dicionario, config.escopo);

    if registros.is_empty() {
        tracing::warn!("Nenhum precursor foi identificado no relatório");
        return Resultado::NadaEncontrado { status };
    }

    // Agrupa por (dimensao, termo) somando o peso de cada registro.
    // BTreeMap garante ordem determinística na saída.
    let mut grupos: BTreeMap<(String, String), u32> = BTreeMap::new();
    for registro in registros {
        if config.modo == ModoRelatorio::Frequencia && registro.idioma != idioma_detectado {
            continue;
        }
        let peso = match config.modo {
            ModoRelatorio::Frequencia => registro.ocorrencias,
            ModoRelatorio::Presenca => 1,
        };
        *grupos
            .entry((registro.dimensao.clone(), registro.termo.clone()))
            .or_default() += peso;
    }

    let resumo: Vec<LinhaResumo> = grupos
        .into_iter()
        .map(|((dimensao, precursor), frequencia)| LinhaResumo {
            dimensao,
            precursor,
            frequencia,
        })
        .collect();

    tracing::info!(
        precursores_unicos = resumo.len(),
        idioma = %idioma_detectado,
        "Agregação concluída"
    );
    Resultado::Encontrado { resumo, status }
}

/// Constrói a tabela Sim/Não: o dicionário inteiro, linha por linha.
///
/// A pertinência compara formas canônicas dos dois lados — o registro do
/// matcher já vem canonicalizado e o termo da planilha é canonicalizado
/// aqui, para que "Comunicação" na planilha case com "comunicacao" no
/// conjunto de encontrados.
fn tabela_status(
    registros: &[MatchRecord],
    idioma_detectado: Idioma,
    dicionario: &Dicionario,
    escopo: EscopoPresenca,
) -> Vec<LinhaStatus> {
    let encontrados: HashSet<&str> = registros
        .iter()
        .filter(|r| match escopo {
            EscopoPresenca::Ambos => true,
            EscopoPresenca::IdiomaDetectado => r.idioma == idioma_detectado,
        })
        .map(|r| r.termo.as_str())
        .collect();

    let mut linhas = Vec::new();
    for entrada in dicionario.entradas() {
        for idioma in Idioma::TODOS {
            for termo in entrada.termos(idioma) {
                linhas.push(LinhaStatus {
                    dimensao: entrada.dimensao.clone(),
                    idioma,
                    precursor: termo.clone(),
                    encontrado: encontrados.contains(normalizar(termo).as_str()),
                });
            }
        }
    }
    linhas
}
