use clap::{ArgGroup, Parser};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use crate::{DECODIFICADOR_PADRAO, FormatoLote, GsError, GsResult};

// Estrutura para o Clap processar os argumentos da linha de comando
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(group(
    ArgGroup::new("entrada")
        .required(true)
        .args(["base64", "texto", "json", "imagem", "arquivo"]),
))]
struct Arguments {
    /// Dados crus do código em base64 (campo `data` do leitor)
    #[arg(short, long)]
    base64: Option<String>,

    /// Texto do código (campo `text` do leitor).
    ///
    /// O token `{GS}` e o byte 0x1D são removidos antes da leitura linear.
    #[arg(short, long)]
    texto: Option<String>,

    /// Arquivo JSON produzido pelo leitor de códigos
    #[arg(short, long)]
    json: Option<PathBuf>,

    /// Imagem a ser lida pelo leitor externo (DataMatrix, QR, UCC-128)
    #[arg(short, long)]
    imagem: Option<PathBuf>,

    /// Arquivo com um código por linha (processamento em lote)
    #[arg(short, long)]
    arquivo: Option<PathBuf>,

    /// Formato das linhas do arquivo em lote
    #[arg(short, long, value_enum, default_value_t = FormatoLote::Texto)]
    formato: FormatoLote,

    /// Arquivo CSV para os resultados do lote (somente com --arquivo)
    #[arg(short, long)]
    saida: Option<PathBuf>,

    /// Programa leitor de códigos de barras
    #[arg(short, long, env = "DECODIFICADOR_BIN", default_value = DECODIFICADOR_PADRAO)]
    decodificador: String,

    /// Exibir o GTIN normalizado (GTIN-14 iniciado por zero → 13 dígitos)
    #[arg(short, long, default_value_t = false)]
    normalizar: bool,

    /// Ativar modo detalhado (verbose)
    #[arg(short, long, default_value_t = false)]
    verbose: bool,
}

/// Origem do código a decodificar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entrada {
    Base64(String),
    Texto(String),
    Json(PathBuf),
    Imagem(PathBuf),
    Arquivo(PathBuf),
}

#[derive(Debug)]
pub struct Config {
    pub entrada: Entrada,
    pub formato: FormatoLote,
    pub saida: Option<PathBuf>,
    pub decodificador: String,
    pub normalizar: bool,
    pub verbose: bool,
}

pub fn get_config() -> GsResult<Config> {
    config_from(Arguments::parse())
}

fn config_from(args: Arguments) -> GsResult<Config> {
    // O grupo 'entrada' é obrigatório no Clap; este erro só ocorreria em casos extremos.
    let entrada = args
        .base64
        .map(Entrada::Base64)
        .or(args.texto.map(Entrada::Texto))
        .or(args.json.map(Entrada::Json))
        .or(args.imagem.map(Entrada::Imagem))
        .or(args.arquivo.map(Entrada::Arquivo))
        .ok_or_else(|| GsError::Config("nenhuma entrada informada".into()))?;

    if args.saida.is_some() && !matches!(entrada, Entrada::Arquivo(_)) {
        return Err(GsError::Config("--saida exige --arquivo".into()));
    }

    if args.decodificador.trim().is_empty() {
        return Err(GsError::Config("DECODIFICADOR_BIN vazio".into()));
    }

    Ok(Config {
        entrada,
        formato: args.formato,
        saida: args.saida,
        decodificador: args.decodificador,
        normalizar: args.normalizar,
        verbose: args.verbose,
    })
}

/// Inicializa o log em stderr.
///
/// `RUST_LOG` tem precedência; sem ele, `--verbose` ativa o nível debug.
pub fn iniciar_log(verbose: bool) {
    let padrao = if verbose { "debug" } else { "warn" };
    let filtro = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(padrao));

    // Ignora o erro se outro subscriber já estiver registrado
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filtro)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
