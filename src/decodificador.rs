//! Decodificação de element strings GS1.
//!
//! Dois caminhos:
//! - [`decodificar_segmentos`]: dados crus com separadores 0x1D (caminho preferido);
//! - [`decodificar_linear`]: texto sem separadores (heurístico).
//!
//! Nenhuma das funções falha: a ausência de um campo no resultado é o único
//! sinal de dado truncado ou irreconhecível.

use crate::{Campo, CamposGs1, DefinicaoAi, GS, TABELA_GS1, TabelaAi};

/// Caminho de decodificação que produziu um evento.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modo {
    Segmentos,
    Linear,
}

/// Eventos de rastreamento emitidos durante a varredura.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventoRastro {
    /// Dados divididos pelo separador GS.
    Segmentos { quantidade: usize },
    Segmento {
        indice: usize,
        hex: String,
        texto: String,
    },
    /// Campo registrado (ou descartado, se `registrado == false`).
    Campo {
        modo: Modo,
        ai: &'static str,
        campo: Campo,
        valor: String,
        inicio: usize,
        fim: usize,
        registrado: bool,
    },
    /// AI de comprimento fixo sem dados suficientes.
    FixoAbortado {
        modo: Modo,
        ai: &'static str,
        campo: Campo,
        posicao: usize,
    },
    /// Varredura linear interrompida por falta de AI na posição.
    LinearInterrompido { posicao: usize },
}

/// Recebe os eventos de rastreamento sem interferir no resultado.
pub trait Observador {
    fn evento(&mut self, evento: &EventoRastro);

    /// `false` dispensa a montagem dos eventos caros (visão hex dos segmentos).
    fn ativo(&self) -> bool {
        true
    }
}

impl<F> Observador for F
where
    F: FnMut(&EventoRastro),
{
    fn evento(&mut self, evento: &EventoRastro) {
        self(evento)
    }
}

/// Observador que descarta todos os eventos.
pub struct SemRastro;

impl Observador for SemRastro {
    fn evento(&mut self, _evento: &EventoRastro) {}

    fn ativo(&self) -> bool {
        false
    }
}

/// Acumula os eventos para inspeção posterior.
impl Observador for Vec<EventoRastro> {
    fn evento(&mut self, evento: &EventoRastro) {
        self.push(evento.clone());
    }
}

/// Repassa os eventos para `tracing` em nível debug.
pub struct RastroTracing;

impl Observador for RastroTracing {
    fn ativo(&self) -> bool {
        tracing::enabled!(tracing::Level::DEBUG)
    }

    fn evento(&mut self, evento: &EventoRastro) {
        match evento {
            EventoRastro::Segmentos { quantidade } => {
                tracing::debug!(quantidade, "segmentos GS");
            }
            EventoRastro::Segmento { indice, hex, texto } => {
                tracing::debug!(indice, %hex, texto = ?texto, "segmento");
            }
            EventoRastro::Campo {
                modo,
                ai,
                campo,
                valor,
                inicio,
                fim,
                registrado,
            } => {
                tracing::debug!(
                    ?modo,
                    ai,
                    campo = campo.rotulo(),
                    valor = ?valor,
                    inicio,
                    fim,
                    registrado,
                    "AI reconhecido"
                );
            }
            EventoRastro::FixoAbortado {
                modo,
                ai,
                campo,
                posicao,
            } => {
                tracing::debug!(
                    ?modo,
                    ai,
                    campo = campo.rotulo(),
                    posicao,
                    "AI fixo abortado (falta dado)"
                );
            }
            EventoRastro::LinearInterrompido { posicao } => {
                tracing::debug!(posicao, "varredura linear interrompida");
            }
        }
    }
}

/// Converte bytes crus em texto preservando cada byte (latin1).
///
/// Cada byte vira exatamente um `char` de mesmo valor, de modo que o separador
/// 0x1D sobrevive intacto. Qualquer conversão multibyte (UTF-8, por exemplo)
/// quebraria a detecção dos segmentos.
pub fn bytes_para_binario(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}

/// Visualização hexadecimal, marcando o separador GS como `[1D]`.
pub fn visao_hex(binario: &str) -> String {
    binario
        .chars()
        .map(|c| {
            if c == GS {
                "[1D]".to_string()
            } else {
                format!("{:02x}", u32::from(c))
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Procura um AI começando exatamente em `pos`, na ordem de tentativa da tabela.
fn casar_ai<'t>(tabela: &'t TabelaAi, chars: &[char], pos: usize) -> Option<&'t DefinicaoAi> {
    tabela
        .definicoes()
        .iter()
        .find(|def| comeca_com(chars, pos, def.identificador))
}

fn comeca_com(chars: &[char], pos: usize, prefixo: &str) -> bool {
    let mut resto = chars.get(pos..).unwrap_or_default().iter();
    prefixo.chars().all(|p| resto.next() == Some(&p))
}

/// Menor posição `>= inicio` em que qualquer AI da tabela ocorre.
fn proximo_ai(tabela: &TabelaAi, chars: &[char], inicio: usize) -> Option<usize> {
    (inicio..chars.len()).find(|&pos| {
        tabela
            .definicoes()
            .iter()
            .any(|def| comeca_com(chars, pos, def.identificador))
    })
}

fn registrar<O: Observador>(
    campos: &mut CamposGs1,
    observador: &mut O,
    modo: Modo,
    def: &DefinicaoAi,
    valor: &[char],
    inicio: usize,
    fim: usize,
) {
    let valor: String = valor.iter().collect();
    let registrado = campos.registrar(def.campo, valor.as_str());
    observador.evento(&EventoRastro::Campo {
        modo,
        ai: def.identificador,
        campo: def.campo,
        valor,
        inicio,
        fim,
        registrado,
    });
}

/// Decodifica dados crus com separadores GS usando a tabela padrão.
///
/// ### Exemplo
/// ```
/// use decodifica_gs1::decodificar_segmentos;
///
/// let campos = decodificar_segmentos("0107891234567895\u{1D}10AB12\u{1D}24003");
/// assert_eq!(campos.gtin.as_deref(), Some("07891234567895"));
/// assert_eq!(campos.lote.as_deref(), Some("AB12"));
/// assert_eq!(campos.tonalidade.as_deref(), Some("03"));
/// ```
pub fn decodificar_segmentos(binario: &str) -> CamposGs1 {
    decodificar_segmentos_com(&TABELA_GS1, binario, &mut SemRastro)
}

/// Parser orientado a segmentos de GS (0x1D).
///
/// Para cada segmento:
/// - varre até achar um AI válido (ruído antes dele é ignorado);
/// - AIs de comprimento FIXO consomem os N próximos caracteres; se faltar
///   dado, o restante do segmento é abandonado;
/// - AIs de comprimento VARIÁVEL consomem ATÉ O FIM DO SEGMENTO.
///
/// Os campos de todos os segmentos vão para o mesmo resultado.
pub fn decodificar_segmentos_com<O: Observador>(
    tabela: &TabelaAi,
    binario: &str,
    observador: &mut O,
) -> CamposGs1 {
    let segmentos: Vec<&str> = binario.split(GS).collect();
    observador.evento(&EventoRastro::Segmentos {
        quantidade: segmentos.len(),
    });

    let mut campos = CamposGs1::default();

    for (indice, segmento) in segmentos.iter().enumerate() {
        if observador.ativo() {
            observador.evento(&EventoRastro::Segmento {
                indice,
                hex: visao_hex(segmento),
                texto: segmento.to_string(),
            });
        }

        let seg: Vec<char> = segmento.chars().collect();
        let mut i = 0;

        while i < seg.len() {
            let Some(def) = casar_ai(tabela, &seg, i) else {
                i += 1;
                continue;
            };

            let inicio = i;
            i += def.identificador.chars().count();

            match def.comprimento_fixo {
                Some(n) if i + n > seg.len() => {
                    observador.evento(&EventoRastro::FixoAbortado {
                        modo: Modo::Segmentos,
                        ai: def.identificador,
                        campo: def.campo,
                        posicao: inicio,
                    });
                    break;
                }
                Some(n) => {
                    registrar(
                        &mut campos,
                        observador,
                        Modo::Segmentos,
                        def,
                        &seg[i..i + n],
                        inicio,
                        i + n,
                    );
                    i += n;
                }
                None => {
                    registrar(
                        &mut campos,
                        observador,
                        Modo::Segmentos,
                        def,
                        &seg[i..],
                        inicio,
                        seg.len(),
                    );
                    i = seg.len();
                }
            }
        }
    }

    campos
}

/// Decodifica texto sem separadores usando a tabela padrão.
///
/// ### Exemplo
/// ```
/// use decodifica_gs1::decodificar_linear;
///
/// let campos = decodificar_linear("10L70107891234567895");
/// assert_eq!(campos.lote.as_deref(), Some("L7"));
/// assert_eq!(campos.gtin.as_deref(), Some("07891234567895"));
/// ```
pub fn decodificar_linear(texto: &str) -> CamposGs1 {
    decodificar_linear_com(&TABELA_GS1, texto, &mut SemRastro)
}

/// Fallback linear (sem GS), útil quando o leitor só devolve texto.
///
/// Heurístico:
/// - sem AI na posição atual, a varredura termina (não há descarte de ruído);
/// - AI fixo sem dados suficientes também termina a varredura;
/// - AI variável vai até a próxima ocorrência de qualquer AI, ou até o fim.
///
/// Pode errar se uma sequência com cara de AI (ex.: "01") aparecer dentro de
/// um valor variável.
pub fn decodificar_linear_com<O: Observador>(
    tabela: &TabelaAi,
    texto: &str,
    observador: &mut O,
) -> CamposGs1 {
    let s: Vec<char> = texto.chars().collect();
    let mut campos = CamposGs1::default();
    let mut i = 0;

    while i < s.len() {
        let Some(def) = casar_ai(tabela, &s, i) else {
            observador.evento(&EventoRastro::LinearInterrompido { posicao: i });
            break;
        };

        let inicio = i;
        i += def.identificador.chars().count();

        match def.comprimento_fixo {
            Some(n) if i + n > s.len() => {
                observador.evento(&EventoRastro::FixoAbortado {
                    modo: Modo::Linear,
                    ai: def.identificador,
                    campo: def.campo,
                    posicao: inicio,
                });
                break;
            }
            Some(n) => {
                registrar(
                    &mut campos,
                    observador,
                    Modo::Linear,
                    def,
                    &s[i..i + n],
                    inicio,
                    i + n,
                );
                i += n;
            }
            None => {
                let fim = proximo_ai(tabela, &s, i).unwrap_or(s.len());
                registrar(
                    &mut campos,
                    observador,
                    Modo::Linear,
                    def,
                    &s[i..fim],
                    inicio,
                    fim,
                );
                i = fim;
            }
        }
    }

    campos
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seg(partes: &[&str]) -> String {
        partes.join("\u{1D}")
    }

    #[test]
    fn cada_ai_isolado_preserva_o_valor() {
        let casos = [
            ("01", "07891234567895", Campo::Gtin),
            ("11", "240131", Campo::Fabricacao),
            ("17", "261231", Campo::Validade),
            ("10", "LOTE-A1", Campo::Lote),
            ("21", "SERIE77", Campo::Serie),
            ("240", "C3", Campo::Tonalidade),
            ("90", "9.5MM", Campo::Bitola),
        ];

        for (ai, valor, campo) in casos {
            let campos = decodificar_segmentos(&format!("{ai}{valor}"));
            assert_eq!(campos.get(campo), Some(valor), "AI {ai}");
            assert_eq!(campos.len(), 1, "AI {ai}");
        }
    }

    #[test]
    fn fixo_nao_atravessa_o_separador() {
        // "01" + 5 caracteres; o restante do GTIN está no próximo segmento
        let campos = decodificar_segmentos(&seg(&["0107891", "234567895"]));
        assert_eq!(campos.gtin, None);
    }

    #[test]
    fn fixo_truncado_abandona_o_segmento() {
        let entrada = seg(&["0112345", "10LOTE"]);
        let mut eventos: Vec<EventoRastro> = Vec::new();
        let campos = decodificar_segmentos_com(&TABELA_GS1, &entrada, &mut eventos);

        assert_eq!(campos.gtin, None);
        assert_eq!(campos.lote.as_deref(), Some("LOTE"));
        assert!(eventos.iter().any(|e| matches!(
            e,
            EventoRastro::FixoAbortado { ai: "01", modo: Modo::Segmentos, .. }
        )));
    }

    #[test]
    fn fixo_truncado_nao_continua_no_mesmo_segmento() {
        // Depois do "17" truncado existe um "10" no mesmo segmento: não é lido
        let campos = decodificar_segmentos("172510");
        assert!(campos.is_empty());
    }

    #[test]
    fn primeira_ocorrencia_vence_entre_segmentos() {
        let campos = decodificar_segmentos(&seg(&["10PRIMEIRO", "10SEGUNDO"]));
        assert_eq!(campos.lote.as_deref(), Some("PRIMEIRO"));
    }

    #[test]
    fn tres_digitos_antes_de_dois() {
        let campos = decodificar_segmentos("24012345");
        assert_eq!(campos.tonalidade.as_deref(), Some("12345"));
        assert_eq!(campos.gtin, None);
        assert_eq!(campos.len(), 1);
    }

    #[test]
    fn variavel_vai_ate_o_fim_do_segmento() {
        // "17" dentro do lote não inicia outro AI
        let campos = decodificar_segmentos(&seg(&["10AB1726123190X", "21S1"]));
        assert_eq!(campos.lote.as_deref(), Some("AB1726123190X"));
        assert_eq!(campos.validade, None);
        assert_eq!(campos.serie.as_deref(), Some("S1"));
    }

    #[test]
    fn ruido_antes_do_ai_e_ignorado() {
        let campos = decodificar_segmentos(&seg(&["]d2\u{e8}0107891234567895", "##10X"]));
        assert_eq!(campos.gtin.as_deref(), Some("07891234567895"));
        assert_eq!(campos.lote.as_deref(), Some("X"));
    }

    #[test]
    fn varios_fixos_no_mesmo_segmento() {
        let campos = decodificar_segmentos(&seg(&["010789123456789511250101172612311012"]));
        assert_eq!(campos.gtin.as_deref(), Some("07891234567895"));
        assert_eq!(campos.fabricacao.as_deref(), Some("250101"));
        assert_eq!(campos.validade.as_deref(), Some("261231"));
        assert_eq!(campos.lote.as_deref(), Some("12"));
    }

    #[test]
    fn segmentos_vazios_nao_geram_campos() {
        let campos = decodificar_segmentos(&seg(&["", "10A", "", ""]));
        assert_eq!(campos.lote.as_deref(), Some("A"));
        assert_eq!(campos.len(), 1);
        assert!(decodificar_segmentos(&seg(&["", ""])).is_empty());
    }

    #[test]
    fn entrada_sem_ai_resulta_vazia() {
        assert!(decodificar_segmentos("").is_empty());
        assert!(decodificar_segmentos("xyz-qwerty").is_empty());
        assert!(decodificar_linear("").is_empty());
        assert!(decodificar_linear("ABC0107891234567895").is_empty());
    }

    #[test]
    fn linear_corta_variavel_no_proximo_ai() {
        let gtin = "00000000000000";
        let entrada = format!("109ABC01{gtin}1");
        let campos = decodificar_linear(&entrada);
        assert_eq!(campos.lote.as_deref(), Some("9ABC"));
        assert_eq!(campos.gtin.as_deref(), Some(gtin));
    }

    #[test]
    fn linear_variavel_sem_proximo_ai_vai_ao_fim() {
        let campos = decodificar_linear("0107891234567895ABCDEFG");
        assert_eq!(campos.gtin.as_deref(), Some("07891234567895"));

        let campos = decodificar_linear("010789123456789521XYZ");
        assert_eq!(campos.serie.as_deref(), Some("XYZ"));
    }

    #[test]
    fn linear_para_no_primeiro_trecho_sem_ai() {
        let mut eventos: Vec<EventoRastro> = Vec::new();
        let campos = decodificar_linear_com(
            &TABELA_GS1,
            "0107891234567895XX10LOTE",
            &mut eventos,
        );
        assert_eq!(campos.gtin.as_deref(), Some("07891234567895"));
        assert_eq!(campos.lote, None);
        assert_eq!(
            eventos.last(),
            Some(&EventoRastro::LinearInterrompido { posicao: 16 })
        );
    }

    #[test]
    fn linear_fixo_truncado_interrompe() {
        let campos = decodificar_linear("10AB0112345");
        assert_eq!(campos.lote.as_deref(), Some("AB"));
        assert_eq!(campos.gtin, None);
    }

    #[test]
    fn linear_variavel_vazio_seguido_de_ai() {
        let campos = decodificar_linear("10240C3");
        assert_eq!(campos.lote.as_deref(), Some(""));
        assert_eq!(campos.tonalidade.as_deref(), Some("C3"));
    }

    #[test]
    fn observador_nao_altera_o_resultado() {
        let entrada = seg(&["0107891234567895", "10AB", "10CD"]);
        let mut eventos: Vec<EventoRastro> = Vec::new();
        let com = decodificar_segmentos_com(&TABELA_GS1, &entrada, &mut eventos);
        assert_eq!(com, decodificar_segmentos(&entrada));

        assert_eq!(eventos[0], EventoRastro::Segmentos { quantidade: 3 });
        let descartados = eventos
            .iter()
            .filter(|e| matches!(e, EventoRastro::Campo { registrado: false, .. }))
            .count();
        assert_eq!(descartados, 1);
    }

    #[test]
    fn observador_inativo_nao_recebe_segmentos() {
        struct Inativo(Vec<EventoRastro>);

        impl Observador for Inativo {
            fn evento(&mut self, evento: &EventoRastro) {
                self.0.push(evento.clone());
            }

            fn ativo(&self) -> bool {
                false
            }
        }

        let entrada = seg(&["0107891234567895", "10AB", "24003"]);
        let mut inativo = Inativo(Vec::new());
        let campos = decodificar_segmentos_com(&TABELA_GS1, &entrada, &mut inativo);

        assert_eq!(campos, decodificar_segmentos(&entrada));
        assert!(!inativo.0.is_empty());
        assert!(
            !inativo
                .0
                .iter()
                .any(|e| matches!(e, EventoRastro::Segmento { .. }))
        );

        let mut eventos: Vec<EventoRastro> = Vec::new();
        decodificar_segmentos_com(&TABELA_GS1, &entrada, &mut eventos);
        let segmentos = eventos
            .iter()
            .filter(|e| matches!(e, EventoRastro::Segmento { .. }))
            .count();
        assert_eq!(segmentos, 3);
    }

    #[test]
    fn bytes_preservados_e_visao_hex() {
        let binario = bytes_para_binario(&[0x30, 0x31, 0x1D, 0xE8]);
        assert_eq!(binario.chars().count(), 4);
        assert_eq!(visao_hex(&binario), "30 31 [1D] e8");
    }
}
