use std::{io, path::PathBuf};
use thiserror::Error;

/// Tipo de retorno conveniente para todo o projeto
pub type GsResult<T> = Result<T, GsError>;

#[derive(Error, Debug)]
pub enum GsError {
    #[error("Conteúdo base64 inválido: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("Erro de configuração: {0}")]
    Config(String),

    #[error("Erro no processamento CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("GTIN não identificado no código.")]
    GtinAusente,

    #[error("Erro de I/O: {0}")]
    Io(#[from] io::Error),

    #[error(
        "Arquivo não encontrado!\n\
        Arquivo: {arquivo:?}\n\
        {source}"
    )]
    IoReader {
        #[source] // Indica que este é o erro original
        source: io::Error,
        arquivo: PathBuf,
    },

    #[error(
        "Falha ao criar arquivo!\n\
        Arquivo: {arquivo:?}\n\
        {source}"
    )]
    IoWriter {
        #[source]
        source: io::Error,
        arquivo: PathBuf,
    },

    #[error("Resposta JSON do leitor inválida: {0}")]
    Json(#[from] serde_json::Error),

    #[error(
        "Leitor de códigos falhou!\n\
        Programa: {programa}\n\
        Status: {status}\n\
        {stderr}"
    )]
    LeitorFalhou {
        programa: String,
        status: String,
        stderr: String,
    },

    #[error("Falha ao executar o leitor <{programa}>: {source}")]
    LeitorIndisponivel {
        #[source]
        source: io::Error,
        programa: String,
    },

    #[error("Leitor não retornou conteúdo legível (text/data).")]
    SemConteudo,
}
