mod cli;
mod config;
mod demo;
mod error;
mod session;
mod state_machine;
mod ui;

use anyhow::Result;
use clap::Parser;

use cli::{Cli, Command};
use config::VendomatConfig;
use session::{VendSession, load_script};
use state_machine::{Event, VendingMachine};
use ui::MachineDisplay;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => VendomatConfig::load_from(path)?,
        None => VendomatConfig::load()?,
    };
    let ui = MachineDisplay::new(cli.verbose);

    match cli.command {
        Command::Demo => demo::run(config.inventory(), &ui),

        Command::Inventory => {
            let machine = VendingMachine::new(config.inventory());
            ui.show_inventory(&machine);
        }

        Command::Buy { product, coins } => {
            let mut session = VendSession::new(VendingMachine::new(config.inventory()));
            for amount in coins {
                let response = session.handle(Event::InsertMoney { amount });
                ui.response(session.machine(), &response);
            }
            let response = session.handle(Event::SelectProduct {
                product: product.clone(),
            });
            ui.response(session.machine(), &response);

            if response.is_accepted() {
                ui.vend_spinner(&product);
                let response = session.handle(Event::Dispense);
                ui.response(session.machine(), &response);
            }
            for sale in session.sales() {
                ui.print_sale(sale);
            }
        }

        Command::Replay { file } => {
            let events = load_script(&file)?;
            let mut session = VendSession::new(VendingMachine::new(config.inventory()));
            demo::play(&mut session, events, &ui);

            let accepted = session
                .transcript()
                .iter()
                .filter(|(_, response)| response.is_accepted())
                .count();
            println!();
            println!("{accepted}/{} events accepted", session.transcript().len());
            for sale in session.sales() {
                ui.print_sale(sale);
            }
        }
    }

    Ok(())
}
