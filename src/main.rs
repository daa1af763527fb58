use execution_time::ExecutionTime;
use std::{fs, path::Path, process};

use decodifica_gs1::{
    CodigoLido, Config, Entrada, GsError, GsResult, RastroTracing, ResumoLote, decodificar_codigo,
    decodificar_lote, executar_leitor, exportar_csv, get_config, imprimir_resumo, iniciar_log,
    ler_resposta_leitor,
};

fn main() {
    // A forma mais idiomática de reportar erros ao usuário final sem stack trace técnico
    if let Err(err) = run() {
        eprintln!("\n[ERRO CRÍTICO]: {err}");
        process::exit(1);
    }
}

fn run() -> GsResult<()> {
    // 1. Obter Configurações
    let config = get_config()?;

    // 2. Log em stderr (RUST_LOG ou --verbose)
    iniciar_log(config.verbose);
    tracing::debug!(?config, "configuração");

    // 3. Obter o código conforme a origem e decodificar
    match &config.entrada {
        Entrada::Arquivo(path) => processar_lote(&config, path),
        Entrada::Base64(b64) => {
            let codigo = CodigoLido {
                data: Some(b64.clone()),
                ..Default::default()
            };
            exibir_codigo(&config, &codigo)
        }
        Entrada::Texto(texto) => {
            let codigo = CodigoLido {
                text: Some(texto.clone()),
                ..Default::default()
            };
            exibir_codigo(&config, &codigo)
        }
        Entrada::Json(path) => {
            let json = fs::read_to_string(path).map_err(|e| GsError::IoReader {
                source: e,
                arquivo: path.to_path_buf(),
            })?;
            exibir_json(&config, &json)
        }
        Entrada::Imagem(path) => {
            let json = executar_leitor(&config.decodificador, path)?;
            exibir_json(&config, &json)
        }
    }
}

fn exibir_json(config: &Config, json: &str) -> GsResult<()> {
    let codigo = ler_resposta_leitor(json)?.ok_or(GsError::SemConteudo)?;
    exibir_codigo(config, &codigo)
}

fn exibir_codigo(config: &Config, codigo: &CodigoLido) -> GsResult<()> {
    if let Some(texto) = codigo.texto() {
        println!("Código lido: {texto}");
    }

    let campos = decodificar_codigo(codigo, &mut RastroTracing)?;
    println!("✅ Decodificação:\n{}", campos.formatar());

    if config.normalizar {
        match campos.exigir_gtin() {
            Ok(gtin) => println!("• GTIN normalizado: {gtin}"),
            Err(err) => println!("⚠️ {err}"),
        }
    }

    Ok(())
}

fn processar_lote(config: &Config, path: &Path) -> GsResult<()> {
    let timer = ExecutionTime::start();

    println!("Decodificando códigos do arquivo <{}>...\n", path.display());
    let resultados = decodificar_lote(path, config.formato)?;

    if config.verbose {
        for resultado in &resultados {
            match &resultado.campos {
                Ok(campos) => println!("[linha {}]\n{}\n", resultado.linha, campos.formatar()),
                Err(err) => println!("[linha {}] ⚠️ {err}\n", resultado.linha),
            }
        }
    }

    imprimir_resumo(&ResumoLote::calcular(&resultados));

    if let Some(saida) = &config.saida {
        exportar_csv(&resultados, saida)?;
    }

    timer.print_elapsed_time();
    Ok(())
}
