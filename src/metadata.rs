use std::sync::LazyLock;

// --- Tabela de Identificadores de Aplicação (AI) ---

/// Campos GS1 reconhecidos pelo decodificador.
///
/// A ordem das variantes é a ordem de exibição em [`crate::CamposGs1::formatar`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Campo {
    Gtin,
    Fabricacao,
    Validade,
    Lote,
    Tonalidade,
    Bitola,
    Serie,
}

impl Campo {
    /// Todos os campos, na ordem de exibição.
    pub const TODOS: [Campo; 7] = [
        Campo::Gtin,
        Campo::Fabricacao,
        Campo::Validade,
        Campo::Lote,
        Campo::Tonalidade,
        Campo::Bitola,
        Campo::Serie,
    ];

    /// Rótulo usado como chave do mapeamento decodificado.
    pub fn rotulo(self) -> &'static str {
        match self {
            Campo::Gtin => "GTIN",
            Campo::Fabricacao => "Fabricação",
            Campo::Validade => "Validade",
            Campo::Lote => "Lote",
            Campo::Tonalidade => "Tonalidade",
            Campo::Bitola => "Bitola",
            Campo::Serie => "Série",
        }
    }

    /// Rótulo usado nas respostas formatadas para o usuário.
    pub fn descricao(self) -> &'static str {
        match self {
            Campo::Fabricacao => "Data Fabricação",
            outro => outro.rotulo(),
        }
    }
}

/// Definição estática de um AI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DefinicaoAi {
    pub identificador: &'static str,
    pub campo: Campo,
    /// `None` = comprimento variável.
    pub comprimento_fixo: Option<usize>,
}

impl DefinicaoAi {
    pub const fn fixo(identificador: &'static str, campo: Campo, comprimento: usize) -> Self {
        DefinicaoAi {
            identificador,
            campo,
            comprimento_fixo: Some(comprimento),
        }
    }

    pub const fn variavel(identificador: &'static str, campo: Campo) -> Self {
        DefinicaoAi {
            identificador,
            campo,
            comprimento_fixo: None,
        }
    }
}

/// AIs suportados, na ordem de tentativa (3 dígitos antes de 2).
pub const DEFINICOES_GS1: [DefinicaoAi; 7] = [
    DefinicaoAi::variavel("240", Campo::Tonalidade),
    DefinicaoAi::fixo("01", Campo::Gtin, 14),
    DefinicaoAi::fixo("11", Campo::Fabricacao, 6),
    DefinicaoAi::fixo("17", Campo::Validade, 6),
    DefinicaoAi::variavel("10", Campo::Lote),
    DefinicaoAi::variavel("21", Campo::Serie),
    DefinicaoAi::variavel("90", Campo::Bitola),
];

/// Tabela de AIs já ordenada para casamento por prefixo.
///
/// A construção garante que identificadores mais longos sejam tentados antes
/// dos mais curtos, preservando a ordem relativa entre os de mesmo tamanho.
#[derive(Debug, Clone)]
pub struct TabelaAi {
    definicoes: Vec<DefinicaoAi>,
}

impl TabelaAi {
    pub fn new(definicoes: impl IntoIterator<Item = DefinicaoAi>) -> Self {
        let mut definicoes: Vec<DefinicaoAi> = definicoes.into_iter().collect();
        // sort_by_key é estável: empates mantêm a ordem informada
        definicoes.sort_by_key(|def| std::cmp::Reverse(def.identificador.len()));
        TabelaAi { definicoes }
    }

    /// Definições na ordem de tentativa.
    pub fn definicoes(&self) -> &[DefinicaoAi] {
        &self.definicoes
    }

    pub fn get(&self, identificador: &str) -> Option<&DefinicaoAi> {
        self.definicoes
            .iter()
            .find(|def| def.identificador == identificador)
    }
}

/// Tabela única usada por todos os chamadores.
pub static TABELA_GS1: LazyLock<TabelaAi> = LazyLock::new(|| TabelaAi::new(DEFINICOES_GS1));
