use regex::Regex;
use std::sync::LazyLock;

/// Separador de grupo (FNC1 / GS) nos dados crus do código.
pub const GS: char = '\u{1D}';

/// Marcações de separador que os leitores deixam no campo texto:
/// o token literal `{GS}` (somente em maiúsculas) e o próprio byte 0x1D.
pub static RE_SEPARADOR_TEXTO: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{GS\}|\x1D").unwrap());

/// Regex consolidada seguindo o padrão (?isx)
/// i: case-insensitive
/// x: modo verbose (ignora espaços e permite comentários)
///
/// Ex: `[#LCHK PROD=123 GTIN=7891234567895 LOTE=AB12]`
pub static RE_TAG_LCHK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?ix)
        \[\#LCHK
        \s+ PROD = (?<produto>\S+)
        \s+ GTIN = (?<gtin>\S+)
        \s+ LOTE = (?<lote>\S+)
        \]
        ",
    )
    .unwrap()
});
