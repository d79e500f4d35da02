//! Interface de linha de comando do dateplan baseada em clap.
//!
//! Define a struct [`Cli`] com subcomandos [`Command`] (serve, generate,
//! search) e flags globais (--config, --verbose).

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::DEFAULT_CONFIG_PATH;

/// dateplan: planos de encontro em Chengdu a partir de tags de interesse.
#[derive(Debug, Parser)]
#[command(name = "dateplan", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Caminho do arquivo de configuração TOML.
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// Habilita saída detalhada (verbose).
    #[arg(long, short, global = true, default_value_t = false)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Inicia o servidor HTTP.
    Serve {
        /// Porta de escuta; sobrescreve `port` da configuração.
        #[arg(long)]
        port: Option<u16>,
    },

    /// Gera planos para as tags informadas e os exibe no terminal.
    Generate {
        /// Tags de interesse (ex.: 美食 复古).
        #[arg(required = true)]
        tags: Vec<String>,

        /// Imprime os planos como JSON em vez de cartões.
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Executa apenas a busca de notas e imprime o texto retornado.
    Search {
        #[arg(required = true)]
        tags: Vec<String>,
    },
}
