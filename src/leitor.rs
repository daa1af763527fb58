//! Integração com o leitor externo de códigos de barras (BarcodeReaderCLI).

use base64::{
    Engine, alphabet,
    engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig},
};
use serde::Deserialize;
use std::{path::Path, process::Command};

use crate::{
    CamposGs1, GsError, GsResult, Observador, RE_SEPARADOR_TEXTO, TABELA_GS1, bytes_para_binario,
    decodificar_linear_com, decodificar_segmentos_com,
};

/// Programa usado quando `DECODIFICADOR_BIN` não é informado.
pub const DECODIFICADOR_PADRAO: &str = "BarcodeReaderCLI";

/// Argumentos fixos passados ao leitor; o caminho da imagem vai por último.
pub const ARGUMENTOS_LEITOR: [&str; 6] = [
    "-type=datamatrix,qr,ucc128",
    "-max-bc=20",
    "-timeout=8",
    "-s",
    "-format=json",
    "-fields=text,data,type,length",
];

/// Saída JSON do leitor: `{"sessions":[{"barcodes":[{...}]}]}`.
#[derive(Debug, Default, Deserialize)]
pub struct RespostaLeitor {
    #[serde(default)]
    pub sessions: Vec<Sessao>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Sessao {
    #[serde(default)]
    pub barcodes: Vec<CodigoLido>,
}

/// Um código lido: `data` traz os bytes crus em base64.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CodigoLido {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub data: Option<String>,
    #[serde(default, rename = "type")]
    pub tipo: Option<String>,
    #[serde(default)]
    pub length: Option<u64>,
}

impl CodigoLido {
    /// Texto não vazio, se houver.
    pub fn texto(&self) -> Option<&str> {
        self.text.as_deref().filter(|t| !t.is_empty())
    }

    /// Base64 não vazio, se houver.
    pub fn dados_base64(&self) -> Option<&str> {
        self.data.as_deref().filter(|d| !d.is_empty())
    }
}

/// Primeiro código da primeira sessão, se existir.
pub fn ler_resposta_leitor(json: &str) -> GsResult<Option<CodigoLido>> {
    let resposta: RespostaLeitor = serde_json::from_str(json)?;
    Ok(resposta
        .sessions
        .into_iter()
        .next()
        .and_then(|sessao| sessao.barcodes.into_iter().next()))
}

/// Alfabeto padrão com `=` final opcional.
const BASE64_TOLERANTE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Decodifica base64 para string binária crua (um `char` por byte).
///
/// Espaços e quebras de linha no meio do conteúdo são ignorados.
///
/// ### Exemplo
/// ```
/// use decodifica_gs1::base64_para_binario;
///
/// assert_eq!(base64_para_binario("MTBBQg").unwrap(), "10AB");
/// assert_eq!(base64_para_binario("MTBB\nQg==").unwrap(), "10AB");
/// ```
pub fn base64_para_binario(b64: &str) -> GsResult<String> {
    let compacto: String = b64.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    let bytes = BASE64_TOLERANTE.decode(compacto)?;
    Ok(bytes_para_binario(&bytes))
}

/// Remove os separadores que sobram no campo texto: `{GS}` e 0x1D.
pub fn limpar_texto(texto: &str) -> String {
    RE_SEPARADOR_TEXTO.replace_all(texto, "").into_owned()
}

/// Decodifica um código lido escolhendo o caminho adequado.
///
/// - `data` presente: bytes crus → parser por segmentos;
/// - senão, `text` presente: separadores removidos → parser linear;
/// - senão: [`GsError::SemConteudo`].
pub fn decodificar_codigo<O: Observador>(
    codigo: &CodigoLido,
    observador: &mut O,
) -> GsResult<CamposGs1> {
    if let Some(b64) = codigo.dados_base64() {
        let binario = base64_para_binario(b64)?;
        return Ok(decodificar_segmentos_com(&TABELA_GS1, &binario, observador));
    }

    if let Some(texto) = codigo.texto() {
        let limpo = limpar_texto(texto);
        return Ok(decodificar_linear_com(&TABELA_GS1, &limpo, observador));
    }

    Err(GsError::SemConteudo)
}

/// Executa o leitor externo sobre uma imagem e devolve o JSON produzido.
pub fn executar_leitor(programa: &str, imagem: &Path) -> GsResult<String> {
    tracing::debug!(programa, args = ?ARGUMENTOS_LEITOR, imagem = %imagem.display(), "executando leitor");

    let saida = Command::new(programa)
        .args(ARGUMENTOS_LEITOR)
        .arg(imagem)
        .output()
        .map_err(|source| GsError::LeitorIndisponivel {
            source,
            programa: programa.to_string(),
        })?;

    if !saida.status.success() {
        return Err(GsError::LeitorFalhou {
            programa: programa.to_string(),
            status: saida.status.to_string(),
            stderr: String::from_utf8_lossy(&saida.stderr).trim().to_string(),
        });
    }

    let json = String::from_utf8_lossy(&saida.stdout).trim().to_string();

    if tracing::enabled!(tracing::Level::DEBUG) {
        let previa: String = json.chars().take(1200).collect();
        tracing::debug!(bytes = json.len(), json = %previa, "resposta do leitor");
    }

    Ok(json)
}
