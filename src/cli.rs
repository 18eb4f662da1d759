//! Interface de linha de comando do vendomat baseada em clap.
//!
//! Define a struct [`Cli`] com subcomandos [`Command`] (demo, inventory,
//! buy, replay) e flags globais (--config, --verbose).

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// vendomat — máquina de venda automática de estados finitos.
#[derive(Debug, Parser)]
#[command(name = "vendomat", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Caminho para o arquivo de configuração (padrão: vendomat.toml).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Exibe estado e saldo da máquina após cada operação.
    #[arg(long, short, global = true, default_value_t = false)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Executa os cenários de demonstração embutidos.
    Demo,

    /// Lista o catálogo de produtos com preço e estoque.
    Inventory,

    /// Compra um produto: insere as moedas, seleciona e dispensa.
    Buy {
        /// Nome do produto no catálogo.
        product: String,

        /// Moeda a inserir, em centavos (repetível).
        #[arg(long = "coin", value_parser = clap::value_parser!(u32).range(1..))]
        coins: Vec<u32>,
    },

    /// Reproduz um roteiro de eventos em JSON contra uma máquina nova.
    Replay {
        /// Caminho para o arquivo de roteiro.
        #[arg(long)]
        file: PathBuf,
    },
}
