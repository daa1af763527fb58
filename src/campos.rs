use crate::{Campo, GsError, GsResult};

/// Linha exibida quando nenhum campo foi reconhecido.
pub const SEM_DADOS_GS1: &str = "⚠️ Nenhum dado GS1 reconhecido.";

/// Remove o zero à esquerda de um GTIN-14, se aplicável.
///
/// Apenas valores com exatamente 14 caracteres iniciados por `'0'` perdem o
/// primeiro dígito (GTIN-14 → EAN-13). Qualquer outro valor volta inalterado,
/// apenas sem espaços nas bordas.
///
/// ### Exemplo
/// ```
/// use decodifica_gs1::normalizar_gtin;
///
/// assert_eq!(normalizar_gtin("01234567890123"), "1234567890123");
/// assert_eq!(normalizar_gtin("12345678901234"), "12345678901234");
/// assert_eq!(normalizar_gtin(""), "");
/// ```
pub fn normalizar_gtin(gtin: &str) -> &str {
    let s = gtin.trim();
    if s.chars().count() == 14 && s.starts_with('0') {
        &s[1..]
    } else {
        s
    }
}

/// Resultado de uma decodificação: um campo opcional por rótulo conhecido.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CamposGs1 {
    pub gtin: Option<String>,
    pub fabricacao: Option<String>,
    pub validade: Option<String>,
    pub lote: Option<String>,
    pub tonalidade: Option<String>,
    pub bitola: Option<String>,
    pub serie: Option<String>,
}

impl CamposGs1 {
    pub fn get(&self, campo: Campo) -> Option<&str> {
        self.slot(campo).as_deref()
    }

    fn slot(&self, campo: Campo) -> &Option<String> {
        match campo {
            Campo::Gtin => &self.gtin,
            Campo::Fabricacao => &self.fabricacao,
            Campo::Validade => &self.validade,
            Campo::Lote => &self.lote,
            Campo::Tonalidade => &self.tonalidade,
            Campo::Bitola => &self.bitola,
            Campo::Serie => &self.serie,
        }
    }

    fn slot_mut(&mut self, campo: Campo) -> &mut Option<String> {
        match campo {
            Campo::Gtin => &mut self.gtin,
            Campo::Fabricacao => &mut self.fabricacao,
            Campo::Validade => &mut self.validade,
            Campo::Lote => &mut self.lote,
            Campo::Tonalidade => &mut self.tonalidade,
            Campo::Bitola => &mut self.bitola,
            Campo::Serie => &mut self.serie,
        }
    }

    /// Registra o valor se o campo ainda não tiver um valor não vazio.
    ///
    /// Retorna `true` se o valor foi gravado. A primeira leitura vence; um
    /// valor vazio, porém, ainda pode ser substituído por uma leitura posterior.
    pub fn registrar(&mut self, campo: Campo, valor: impl Into<String>) -> bool {
        let slot = self.slot_mut(campo);
        if slot.as_deref().is_none_or(str::is_empty) {
            *slot = Some(valor.into());
            true
        } else {
            false
        }
    }

    /// Pares (campo, valor) presentes, na ordem de exibição.
    pub fn iter(&self) -> impl Iterator<Item = (Campo, &str)> + '_ {
        Campo::TODOS
            .into_iter()
            .filter_map(|campo| self.get(campo).map(|valor| (campo, valor)))
    }

    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    /// GTIN normalizado, obrigatório para qualquer consulta de produto.
    pub fn exigir_gtin(&self) -> GsResult<&str> {
        self.gtin
            .as_deref()
            .map(normalizar_gtin)
            .filter(|gtin| !gtin.is_empty())
            .ok_or(GsError::GtinAusente)
    }

    /// Lote sem espaços nas bordas; `None` se ausente ou vazio.
    pub fn lote_aparado(&self) -> Option<&str> {
        self.lote
            .as_deref()
            .map(str::trim)
            .filter(|lote| !lote.is_empty())
    }

    /// Texto multilinha para o usuário, na ordem fixa dos campos.
    ///
    /// Campos ausentes ou vazios são omitidos. O GTIN é exibido como lido.
    pub fn formatar(&self) -> String {
        let linhas: Vec<String> = self
            .iter()
            .filter(|(_, valor)| !valor.is_empty())
            .map(|(campo, valor)| format!("• {}: {}", campo.descricao(), valor))
            .collect();

        if linhas.is_empty() {
            SEM_DADOS_GS1.to_string()
        } else {
            linhas.join("\n")
        }
    }
}
