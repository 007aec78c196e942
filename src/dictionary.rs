//! # Dicionário de Precursores — Carga e Cache da Planilha
//!
//! O dicionário é uma planilha tabular com uma linha por **dimensão** da
//! taxonomia HTO e listas de termos separadas por `;` em cada idioma:
//!
//! ```text
//! Dimensao,PT,EN
//! Comunicação,"falha de comunicacao;ruido","communication failure;noise"
//! Manutenção,"manutencao inadequada","poor maintenance"
//! ```
//!
//! ## Regras de Carga
//!
//! - As três colunas `Dimensao`, `PT` e `EN` são **obrigatórias**; a
//!   ausência de qualquer uma aborta a carga ([`AnaliseError::ColunaAusente`]).
//! - Linhas sem nenhum termo em **nenhum** dos dois idiomas são descartadas.
//! - Termos são separados por `;` e aparados; termos vazios são ignorados.
//!
//! Invariante resultante: toda [`EntradaPrecursor`] tem ao menos um termo
//! não-vazio em ao menos um idioma.
//!
//! ## Fonte Local ou Remota
//!
//! A fonte pode ser um caminho local ou uma URL `http(s)`. Falha de
//! leitura é **fatal e sem retry** — a análise não roda sem dicionário.
//!
//! ## Cache Explícito
//!
//! [`CacheDicionario`] memoiza a última carga, chaveada pela identidade
//! da fonte, com invalidação explícita. O cache pertence à raiz de
//! composição (o `main`), nunca a um estado global implícito — isso
//! mantém o núcleo testável em isolamento.

use crate::error::AnaliseError;
use crate::language::Idioma;

/// Uma linha do dicionário: uma dimensão da taxonomia e seus termos.
#[derive(Debug, Clone)]
pub struct EntradaPrecursor {
    /// Rótulo da dimensão (ex.: "Comunicação", "Fatores Organizacionais").
    pub dimensao: String,
    termos_pt: Vec<String>,
    termos_en: Vec<String>,
}

impl EntradaPrecursor {
    /// Termos desta entrada no idioma dado, na ordem da planilha.
    /// Os termos estão aparados mas **não** canonicalizados — a
    /// canonicalização acontece no ponto de comparação.
    pub fn termos(&self, idioma: Idioma) -> &[String] {
        match idioma {
            Idioma::PT => &self.termos_pt,
            Idioma::EN => &self.termos_en,
        }
    }
}

/// Dicionário de precursores carregado, imutável após a carga.
#[derive(Debug, Clone)]
pub struct Dicionario {
    entradas: Vec<EntradaPrecursor>,
}

impl Dicionario {
    /// Carrega o dicionário de um caminho local ou URL `http(s)`.
    ///
    /// # Erros
    ///
    /// - [`AnaliseError::FonteInacessivel`] — fonte não pôde ser lida
    /// - [`AnaliseError::ColunaAusente`] — esquema incompleto
    /// - [`AnaliseError::PlanilhaInvalida`] — CSV malformado
    pub fn carregar(fonte: &str) -> Result<Self, AnaliseError> {
        let conteudo = ler_fonte(fonte)?;
        let dicionario = Self::parse_csv(&conteudo)?;
        tracing::info!(
            fonte,
            entradas = dicionario.entradas.len(),
            termos = dicionario.total_termos(),
            "Dicionário de precursores carregado"
        );
        Ok(dicionario)
    }

    /// Parseia o conteúdo CSV do dicionário.
    ///
    /// Valida o esquema antes de ler qualquer linha: coluna obrigatória
    /// ausente aborta imediatamente, antes de processar documento algum.
    pub fn parse_csv(conteudo: &str) -> Result<Self, AnaliseError> {
        let mut leitor = csv::ReaderBuilder::new().from_reader(conteudo.as_bytes());
        let cabecalho = leitor
            .headers()
            .map_err(|e| AnaliseError::PlanilhaInvalida(e.to_string()))?
            .clone();

        let indice = |coluna: &str| cabecalho.iter().position(|c| c.trim() == coluna);
        let obrigatorias = ["Dimensao", "PT", "EN"];
        let ausentes: Vec<&str> = obrigatorias
            .iter()
            .copied()
            .filter(|c| indice(c).is_none())
            .collect();
        if !ausentes.is_empty() {
            return Err(AnaliseError::ColunaAusente(ausentes.join(", ")));
        }
        // Posições validadas logo acima
        let (i_dim, i_pt, i_en) = (
            indice("Dimensao").expect("coluna validada"),
            indice("PT").expect("coluna validada"),
            indice("EN").expect("coluna validada"),
        );

        let mut entradas = Vec::new();
        for registro in leitor.records() {
            let registro = registro.map_err(|e| AnaliseError::PlanilhaInvalida(e.to_string()))?;
            let campo = |i: usize| registro.get(i).unwrap_or("").trim();

            let termos_pt = separar_termos(campo(i_pt));
            let termos_en = separar_termos(campo(i_en));
            if termos_pt.is_empty() && termos_en.is_empty() {
                tracing::debug!(dimensao = campo(i_dim), "Linha sem termos descartada");
                continue;
            }
            entradas.push(EntradaPrecursor {
                dimensao: campo(i_dim).to_string(),
                termos_pt,
                termos_en,
            });
        }
        Ok(Self { entradas })
    }

    /// Entradas na ordem da planilha.
    pub fn entradas(&self) -> &[EntradaPrecursor] {
        &self.entradas
    }

    /// Número de dimensões carregadas.
    pub fn len(&self) -> usize {
        self.entradas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entradas.is_empty()
    }

    /// Total de termos em todos os idiomas.
    pub fn total_termos(&self) -> usize {
        self.entradas
            .iter()
            .map(|e| e.termos_pt.len() + e.termos_en.len())
            .sum()
    }
}

/// Divide um campo `termo a;termo b; termo c` em termos aparados não-vazios.
fn separar_termos(campo: &str) -> Vec<String> {
    campo
        .split(';')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Lê o conteúdo da fonte: arquivo local ou URL `http(s)`.
///
/// Sem retry em nenhum dos caminhos: a falha remota é tão fatal quanto a
/// local nesta versão do design.
fn ler_fonte(fonte: &str) -> Result<String, AnaliseError> {
    let inacessivel = |motivo: String| AnaliseError::FonteInacessivel {
        fonte: fonte.to_string(),
        motivo,
    };
    if fonte.starts_with("http://") || fonte.starts_with("https://") {
        tracing::info!(fonte, "Baixando dicionário remoto");
        let resposta = reqwest::blocking::get(fonte)
            .and_then(reqwest::blocking::Response::error_for_status)
            .map_err(|e| inacessivel(e.to_string()))?;
        resposta.text().map_err(|e| inacessivel(e.to_string()))
    } else {
        std::fs::read_to_string(fonte).map_err(|e| inacessivel(e.to_string()))
    }
}

/// Cache explícito do dicionário, chaveado pela identidade da fonte.
///
/// Guarda no máximo uma carga (a análise usa um dicionário por vez).
/// Trocar de fonte recarrega; [`invalidar`](CacheDicionario::invalidar)
/// força a recarga na próxima consulta. Otimização, não requisito de
/// correção — [`Dicionario::carregar`] continua disponível diretamente.
#[derive(Debug, Default)]
pub struct CacheDicionario {
    slot: Option<(String, Dicionario)>,
}

impl CacheDicionario {
    pub fn new() -> Self {
        Self::default()
    }

    /// Retorna o dicionário da fonte, carregando-o somente se a fonte
    /// mudou desde a última carga (ou se o cache foi invalidado).
    pub fn obter(&mut self, fonte: &str) -> Result<&Dicionario, AnaliseError> {
        let valido = self.slot.as_ref().is_some_and(|(f, _)| f == fonte);
        if valido {
            tracing::debug!(fonte, "Dicionário servido do cache");
        } else {
            let dicionario = Dicionario::carregar(fonte)?;
            self.slot = Some((fonte.to_string(), dicionario));
        }
        let (_, dicionario) = self.slot.as_ref().expect("slot preenchido acima");
        Ok(dicionario)
    }

    /// Descarta a carga memoizada; a próxima consulta relê a fonte.
    pub fn invalidar(&mut self) {
        self.slot = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const CSV_MINIMO: &str = "Dimensao,PT,EN\n\
        Comunicação,\"falha de comunicacao;ruido\",\"communication failure;noise\"\n\
        Manutenção,manutencao inadequada,poor maintenance\n";

    // ─── parse_csv ─────────────────────────────────────────────

    #[test]
    fn carrega_entradas_e_separa_termos() {
        let dic = Dicionario::parse_csv(CSV_MINIMO).unwrap();
        assert_eq!(dic.len(), 2);
        let primeira = &dic.entradas()[0];
        assert_eq!(primeira.dimensao, "Comunicação");
        assert_eq!(primeira.termos(Idioma::PT), ["falha de comunicacao", "ruido"]);
        assert_eq!(
            primeira.termos(Idioma::EN),
            ["communication failure", "noise"]
        );
        assert_eq!(dic.total_termos(), 6);
    }

    #[test]
    fn apara_termos_e_ignora_vazios() {
        let csv = "Dimensao,PT,EN\nProcedimentos,\" desvio de procedimento ; ;atalho \",\n";
        let dic = Dicionario::parse_csv(csv).unwrap();
        assert_eq!(
            dic.entradas()[0].termos(Idioma::PT),
            ["desvio de procedimento", "atalho"]
        );
        assert!(dic.entradas()[0].termos(Idioma::EN).is_empty());
    }

    #[test]
    fn coluna_en_ausente_aborta_a_carga() {
        let csv = "Dimensao,PT\nComunicação,ruido\n";
        let err = Dicionario::parse_csv(csv).unwrap_err();
        assert!(matches!(err, AnaliseError::ColunaAusente(c) if c == "EN"));
    }

    #[test]
    fn todas_as_colunas_ausentes_sao_listadas() {
        let err = Dicionario::parse_csv("Foo,Bar\na,b\n").unwrap_err();
        assert!(matches!(err, AnaliseError::ColunaAusente(c) if c == "Dimensao, PT, EN"));
    }

    #[test]
    fn linha_sem_nenhum_termo_eh_descartada() {
        let csv = "Dimensao,PT,EN\nVazia,,\nComunicação,ruido,noise\n";
        let dic = Dicionario::parse_csv(csv).unwrap();
        assert_eq!(dic.len(), 1);
        assert_eq!(dic.entradas()[0].dimensao, "Comunicação");
    }

    #[test]
    fn linha_com_um_so_idioma_eh_mantida() {
        let csv = "Dimensao,PT,EN\nSó PT,fadiga,\nSó EN,,fatigue\n";
        let dic = Dicionario::parse_csv(csv).unwrap();
        assert_eq!(dic.len(), 2);
    }

    #[test]
    fn colunas_em_ordem_diferente_funcionam() {
        let csv = "EN,Dimensao,PT\nnoise,Comunicação,ruido\n";
        let dic = Dicionario::parse_csv(csv).unwrap();
        assert_eq!(dic.entradas()[0].dimensao, "Comunicação");
        assert_eq!(dic.entradas()[0].termos(Idioma::EN), ["noise"]);
    }

    // ─── fontes e cache ────────────────────────────────────────

    fn planilha_temporaria(conteudo: &str) -> tempfile::NamedTempFile {
        let mut arquivo = tempfile::NamedTempFile::new().unwrap();
        arquivo.write_all(conteudo.as_bytes()).unwrap();
        arquivo
    }

    #[test]
    fn carrega_de_arquivo_local() {
        let arquivo = planilha_temporaria(CSV_MINIMO);
        let dic = Dicionario::carregar(arquivo.path().to_str().unwrap()).unwrap();
        assert_eq!(dic.len(), 2);
    }

    #[test]
    fn fonte_inexistente_eh_fatal() {
        let err = Dicionario::carregar("/caminho/que/nao/existe.csv").unwrap_err();
        assert!(matches!(err, AnaliseError::FonteInacessivel { .. }));
    }

    #[test]
    fn cache_reusa_a_mesma_fonte() {
        let arquivo = planilha_temporaria(CSV_MINIMO);
        let fonte = arquivo.path().to_str().unwrap().to_string();
        let mut cache = CacheDicionario::new();
        assert_eq!(cache.obter(&fonte).unwrap().len(), 2);

        // Mudar o arquivo sem invalidar: o cache ainda serve a carga antiga
        std::fs::write(&fonte, "Dimensao,PT,EN\nNova,termo,term\n").unwrap();
        assert_eq!(cache.obter(&fonte).unwrap().len(), 2);

        // Invalidar força a recarga
        cache.invalidar();
        assert_eq!(cache.obter(&fonte).unwrap().len(), 1);
    }

    #[test]
    fn cache_recarrega_quando_a_fonte_muda() {
        let a = planilha_temporaria(CSV_MINIMO);
        let b = planilha_temporaria("Dimensao,PT,EN\nÚnica,termo,term\n");
        let mut cache = CacheDicionario::new();
        assert_eq!(cache.obter(a.path().to_str().unwrap()).unwrap().len(), 2);
        assert_eq!(cache.obter(b.path().to_str().unwrap()).unwrap().len(), 1);
    }
}
