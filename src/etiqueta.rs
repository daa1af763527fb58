use std::fmt;

use crate::RE_TAG_LCHK;

/// Tag legível por máquina anexada à resposta de "lote não cadastrado".
///
/// Formato: `[#LCHK PROD=<produto> GTIN=<gtin> LOTE=<lote>]`. A tag precisa
/// ficar na primeira linha da resposta para ser recuperada quando o usuário
/// responder à mensagem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagLote {
    pub produto: String,
    pub gtin: String,
    pub lote: String,
}

impl TagLote {
    pub fn new(
        produto: impl Into<String>,
        gtin: impl Into<String>,
        lote: impl Into<String>,
    ) -> Self {
        TagLote {
            produto: produto.into(),
            gtin: gtin.into(),
            lote: lote.into(),
        }
    }

    /// Procura a tag em qualquer ponto do texto (ex.: corpo da mensagem citada).
    ///
    /// ### Exemplo
    /// ```
    /// use decodifica_gs1::TagLote;
    ///
    /// let corpo = "[#LCHK PROD=123 GTIN=7891234567895 LOTE=AB12]\n❗ *LOTE NÃO CADASTRADO*";
    /// let tag = TagLote::extrair(corpo).unwrap();
    /// assert_eq!(tag, TagLote::new("123", "7891234567895", "AB12"));
    /// ```
    pub fn extrair(texto: &str) -> Option<Self> {
        let caps = RE_TAG_LCHK.captures(texto)?;
        Some(TagLote::new(&caps["produto"], &caps["gtin"], &caps["lote"]))
    }
}

impl fmt::Display for TagLote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[#LCHK PROD={} GTIN={} LOTE={}]",
            self.produto, self.gtin, self.lote
        )
    }
}
