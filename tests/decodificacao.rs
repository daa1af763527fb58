use decodifica_gs1::{
    Campo, CamposGs1, DEFINICOES_GS1, EventoRastro, GsError, Modo, SemRastro, TABELA_GS1,
    TagLote, base64_para_binario, decodificar_codigo, decodificar_linear, decodificar_segmentos,
    decodificar_segmentos_com, ler_resposta_leitor, normalizar_gtin,
};

fn segmentos(partes: &[&str]) -> String {
    partes.join("\u{1D}")
}

/// Valor de teste com o comprimento exigido pelo AI (ou curto, se variável).
fn valor_para(comprimento: Option<usize>) -> String {
    match comprimento {
        Some(n) => "7".repeat(n),
        None => "VAR-X".to_string(),
    }
}

#[test]
fn todos_os_ais_da_tabela() {
    for def in DEFINICOES_GS1 {
        let valor = valor_para(def.comprimento_fixo);
        let campos = decodificar_segmentos(&format!("{}{}", def.identificador, valor));
        assert_eq!(campos.get(def.campo), Some(valor.as_str()), "AI {}", def.identificador);
    }
}

#[test]
fn payload_completo_de_piso() {
    let binario = segmentos(&[
        "01078912345678951125010117271231",
        "10L2025-07",
        "240C2",
        "9008.5",
        "21000123",
    ]);
    let campos = decodificar_segmentos(&binario);

    assert_eq!(
        campos,
        CamposGs1 {
            gtin: Some("07891234567895".into()),
            fabricacao: Some("250101".into()),
            validade: Some("271231".into()),
            lote: Some("L2025-07".into()),
            tonalidade: Some("C2".into()),
            bitola: Some("08.5".into()),
            serie: Some("000123".into()),
        }
    );
    assert_eq!(campos.exigir_gtin().unwrap(), "7891234567895");
    assert_eq!(
        campos.formatar(),
        "• GTIN: 07891234567895\n\
         • Data Fabricação: 250101\n\
         • Validade: 271231\n\
         • Lote: L2025-07\n\
         • Tonalidade: C2\n\
         • Bitola: 08.5\n\
         • Série: 000123"
    );
}

#[test]
fn gtin_nao_le_alem_do_segmento() {
    let campos = decodificar_segmentos(&segmentos(&["010]]]]", "AAAAAAAAAAAAAA"]));
    assert_eq!(campos.gtin, None);
}

#[test]
fn lote_repetido_mantem_o_primeiro() {
    let campos = decodificar_segmentos(&segmentos(&["10AAA", "0107891234567895", "10BBB"]));
    assert_eq!(campos.lote.as_deref(), Some("AAA"));
}

#[test]
fn gtin_curto_anula_o_segmento() {
    let campos = decodificar_segmentos("011234510X");
    assert_eq!(campos.gtin, None);
    assert_eq!(campos.lote, None);
    assert!(campos.is_empty());
}

#[test]
fn tonalidade_tem_prioridade_sobre_gtin() {
    let mut eventos: Vec<EventoRastro> = Vec::new();
    let campos = decodificar_segmentos_com(&TABELA_GS1, "24012345", &mut eventos);

    assert_eq!(campos.tonalidade.as_deref(), Some("12345"));
    assert!(eventos.iter().any(|e| matches!(
        e,
        EventoRastro::Campo {
            modo: Modo::Segmentos,
            ai: "240",
            campo: Campo::Tonalidade,
            inicio: 0,
            ..
        }
    )));
}

#[test]
fn linear_corta_lote_no_proximo_ai() {
    let campos = decodificar_linear("109ABC01000000000000001");
    assert_eq!(campos.lote.as_deref(), Some("9ABC"));
    assert_eq!(campos.gtin.as_deref(), Some("00000000000000"));
}

#[test]
fn linear_limitacao_documentada() {
    // "17" dentro do lote "AB17XY" é confundido com Validade
    let campos = decodificar_linear("10AB17XY250101");
    assert_eq!(campos.lote.as_deref(), Some("AB"));
    assert_eq!(campos.validade.as_deref(), Some("XY2501"));
}

#[test]
fn normalizacao_de_gtin() {
    assert_eq!(normalizar_gtin("01234567890123"), "1234567890123");
    assert_eq!(normalizar_gtin("12345678901234"), "12345678901234");
    assert_eq!(normalizar_gtin(""), "");
}

#[test]
fn lixo_resulta_vazio() {
    for entrada in ["", "abc", "\u{1D}\u{1D}", "ÿÿÿ", "99999"] {
        assert!(decodificar_segmentos(entrada).is_empty(), "{entrada:?}");
        assert!(decodificar_linear(entrada).is_empty(), "{entrada:?}");
    }
}

#[test]
fn json_do_leitor_ate_a_tag_de_lote() {
    // data = "0107891234567895<GS>10AB12<GS>24003"
    let json = r#"{"sessions":[{"barcodes":[{
        "text": "(01)07891234567895(10)AB12(240)03",
        "data": "MDEwNzg5MTIzNDU2Nzg5NR0xMEFCMTIdMjQwMDM=",
        "type": "DataMatrix",
        "length": 34
    }]}]}"#;

    let codigo = ler_resposta_leitor(json).unwrap().unwrap();
    let campos = decodificar_codigo(&codigo, &mut SemRastro).unwrap();

    let gtin = campos.exigir_gtin().unwrap();
    let lote = campos.lote_aparado().unwrap();
    let tag = TagLote::new("1501", gtin, lote);

    assert_eq!(tag.to_string(), "[#LCHK PROD=1501 GTIN=7891234567895 LOTE=AB12]");
    assert_eq!(TagLote::extrair(&format!("{tag}\n❗ *LOTE NÃO CADASTRADO*")), Some(tag));
}

#[test]
fn bytes_altos_sobrevivem_ao_base64() {
    // 0xE8 antes do AI e dentro do lote: um char por byte
    let binario = base64_para_binario("6DEwQejp").unwrap();
    assert_eq!(binario.chars().count(), 6);
    let campos = decodificar_segmentos(&binario);
    assert_eq!(campos.lote.as_deref(), Some("A\u{e8}\u{e9}"));
}

#[test]
fn codigo_sem_texto_nem_dados() {
    let codigo = ler_resposta_leitor(r#"{"sessions":[{"barcodes":[{"type":"QRCode"}]}]}"#)
        .unwrap()
        .unwrap();
    assert!(matches!(
        decodificar_codigo(&codigo, &mut SemRastro),
        Err(GsError::SemConteudo)
    ));
}
