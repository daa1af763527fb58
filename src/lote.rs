use rayon::prelude::*;
use std::{
    fs::File,
    io::{self, BufRead, BufReader, BufWriter},
    path::Path,
};

use crate::{
    Campo, CamposGs1, CodigoLido, GsError, GsResult, RastroTracing, decodificar_codigo,
    normalizar_gtin,
};

/// Formato de cada linha do arquivo em lote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum FormatoLote {
    /// Dados crus em base64 (campo `data` do leitor)
    Base64,
    /// Texto do código (campo `text` do leitor)
    Texto,
}

impl FormatoLote {
    fn codigo(self, linha: &str) -> CodigoLido {
        match self {
            FormatoLote::Base64 => CodigoLido {
                data: Some(linha.to_string()),
                ..Default::default()
            },
            FormatoLote::Texto => CodigoLido {
                text: Some(linha.to_string()),
                ..Default::default()
            },
        }
    }
}

/// Resultado da decodificação de uma linha do arquivo.
#[derive(Debug)]
pub struct ResultadoLinha {
    /// Nº da linha no arquivo (a partir de 1)
    pub linha: usize,
    pub entrada: String,
    pub campos: GsResult<CamposGs1>,
}

/// Decodifica um único código no formato indicado.
pub fn decodificar_linha(linha: &str, formato: FormatoLote) -> GsResult<CamposGs1> {
    decodificar_codigo(&formato.codigo(linha), &mut RastroTracing)
}

/// Lê um código por linha e decodifica todos em paralelo.
///
/// Linhas em branco são ignoradas. O resultado mantém a ordem do arquivo.
pub fn decodificar_lote(path: &Path, formato: FormatoLote) -> GsResult<Vec<ResultadoLinha>> {
    let file = File::open(path).map_err(|e| GsError::IoReader {
        source: e,
        arquivo: path.to_path_buf(),
    })?;

    let linhas: Vec<(usize, String)> = BufReader::new(file)
        .lines()
        .enumerate()
        .map(|(i, line)| line.map(|l| (i + 1, l)))
        .collect::<io::Result<_>>()?;

    // par_iter em Vec preserva a ordem no collect
    let resultados: Vec<ResultadoLinha> = linhas
        .into_par_iter()
        .filter(|(_, l)| !l.trim().is_empty())
        .map(|(linha, entrada)| {
            let campos = decodificar_linha(&entrada, formato);
            ResultadoLinha {
                linha,
                entrada,
                campos,
            }
        })
        .collect();

    Ok(resultados)
}

/// Grava os resultados em CSV delimitado por `;`.
pub fn exportar_csv(resultados: &[ResultadoLinha], destino: &Path) -> GsResult<()> {
    let file = File::create(destino).map_err(|e| GsError::IoWriter {
        source: e,
        arquivo: destino.to_path_buf(),
    })?;
    let mut wtr = csv::WriterBuilder::new()
        .delimiter(b';')
        .from_writer(BufWriter::new(file));

    let mut cabecalho = vec!["Linha", "Entrada", "GTIN Normalizado"];
    cabecalho.extend(Campo::TODOS.iter().map(|c| c.rotulo()));
    cabecalho.push("Erro");
    wtr.write_record(&cabecalho)?;

    for resultado in resultados {
        let mut registro = vec![resultado.linha.to_string(), resultado.entrada.clone()];

        match &resultado.campos {
            Ok(campos) => {
                let gtin = campos.gtin.as_deref().map(normalizar_gtin);
                registro.push(gtin.unwrap_or_default().to_string());
                registro.extend(
                    Campo::TODOS
                        .iter()
                        .map(|&c| campos.get(c).unwrap_or_default().to_string()),
                );
                registro.push(String::new());
            }
            Err(e) => {
                registro.extend(std::iter::repeat_n(String::new(), Campo::TODOS.len() + 1));
                registro.push(e.to_string());
            }
        }

        wtr.write_record(&registro)?;
    }

    wtr.flush()?;
    println!(" ---> Resultados gravados em <{}>", destino.display());
    Ok(())
}

/// Contagens usadas no resumo do lote.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ResumoLote {
    pub total: usize,
    pub com_gtin: usize,
    pub sem_gtin: usize,
    pub com_erro: usize,
}

impl ResumoLote {
    pub fn calcular(resultados: &[ResultadoLinha]) -> Self {
        resultados
            .iter()
            .fold(ResumoLote::default(), |mut acc, resultado| {
                acc.total += 1;
                match &resultado.campos {
                    Ok(campos) if campos.exigir_gtin().is_ok() => acc.com_gtin += 1,
                    Ok(_) => acc.sem_gtin += 1,
                    Err(_) => acc.com_erro += 1,
                }
                acc
            })
    }
}

pub fn imprimir_resumo(resumo: &ResumoLote) {
    println!(" Códigos analisados: {:>8}", fmt_milhares(resumo.total));
    println!(" Com GTIN:           {:>8}", fmt_milhares(resumo.com_gtin));
    println!(" Sem GTIN:           {:>8}", fmt_milhares(resumo.sem_gtin));
    println!(" Com erro:           {:>8}\n", fmt_milhares(resumo.com_erro));
}

/// Formata números com separador de milhar (ponto).
pub fn fmt_milhares(n: usize) -> String {
    let s = n.to_string();
    let len = s.len();
    let mut result = String::with_capacity(len + len / 3);

    s.chars().enumerate().for_each(|(i, c)| {
        if i > 0 && (len - i).is_multiple_of(3) {
            result.push('.');
        }
        result.push(c);
    });

    result
}
