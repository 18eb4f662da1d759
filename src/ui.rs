//! Interface de terminal do vendomat — spinner e saída colorida.
//!
//! Usa as crates `indicatif` para o spinner de dispensa e `console` para
//! estilização com cores. O [`MachineDisplay`] imprime respostas da
//! máquina, o catálogo e os recibos de venda.

use std::time::Duration;

use console::Style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::state_machine::{Event, Response, SaleRecord, VendingMachine};

/// Saída visual da máquina no terminal.
///
/// Aceites em verde com checkmark, recusas em vermelho com X; no modo
/// verbose, estado e saldo após cada operação em amarelo.
pub struct MachineDisplay {
    // Estilo verde para operações aceitas.
    green: Style,
    // Estilo vermelho para recusas.
    red: Style,
    // Estilo amarelo para o rastro de estado.
    yellow: Style,
    // Estilo apagado para o anúncio de eventos.
    dim: Style,
    verbose: bool,
}

impl MachineDisplay {
    pub fn new(verbose: bool) -> Self {
        Self {
            green: Style::new().green().bold(),
            red: Style::new().red().bold(),
            yellow: Style::new().yellow(),
            dim: Style::new().dim(),
            verbose,
        }
    }

    /// Anuncia o evento prestes a ser aplicado.
    pub fn event(&self, event: &Event) {
        println!("{}", self.dim.apply_to(format!("▸ {event}")));
    }

    /// Imprime a resposta de uma operação com glifo colorido.
    pub fn response(&self, machine: &VendingMachine, response: &Response) {
        match response {
            Response::Accepted(_) => {
                println!("  {} {response}", self.green.apply_to("✓"));
            }
            Response::Denied(_) => {
                println!("  {} {response}", self.red.apply_to("✗"));
            }
        }
        if self.verbose {
            println!(
                "    {} state: {}, balance: {} cents",
                self.yellow.apply_to("↻"),
                machine.state(),
                machine.balance()
            );
        }
    }

    /// Lista o catálogo com preço e situação de estoque.
    pub fn show_inventory(&self, machine: &VendingMachine) {
        println!("Products:");
        for (name, product) in machine.inventory() {
            if product.in_stock() {
                println!(
                    "  • {name}: {} cents ({} in stock)",
                    product.price, product.stock
                );
            } else {
                println!(
                    "  • {name}: {} cents ({})",
                    product.price,
                    self.red.apply_to("SOLD OUT")
                );
            }
        }
    }

    /// Cabeçalho de cenário ou seção.
    pub fn banner(&self, title: &str) {
        println!();
        println!("{}", self.yellow.apply_to(format!("═══ {title} ═══")));
    }

    /// Spinner curto enquanto o produto cai na bandeja.
    pub fn vend_spinner(&self, product: &str) {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .expect("invalid template"),
        );
        pb.set_message(format!("dispensing {product}..."));
        pb.enable_steady_tick(Duration::from_millis(100));
        std::thread::sleep(Duration::from_millis(400));
        pb.finish_and_clear();
    }

    /// Imprime o recibo formatado em JSON.
    pub fn print_sale(&self, record: &SaleRecord) {
        println!();
        println!("{}", self.green.apply_to("─── Sale Record ───"));
        println!(
            "{}",
            serde_json::to_string_pretty(record).unwrap_or_default()
        );
    }
}
