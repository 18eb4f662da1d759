//! Built-in demonstration scenarios.
//!
//! Five scripted sequences exercising every state and every refusal,
//! played against a single machine so stock carries over between them.

use crate::session::VendSession;
use crate::state_machine::{Event, Inventory, VendingMachine};
use crate::ui::MachineDisplay;

pub struct Scenario {
    pub title: &'static str,
    pub events: Vec<Event>,
}

fn select(product: &str) -> Event {
    Event::SelectProduct {
        product: product.to_string(),
    }
}

fn insert(amount: u32) -> Event {
    Event::InsertMoney { amount }
}

/// The demo script. Assumes the default catalogue (Cola 250×5,
/// Water 150×3, Sap 200×0).
pub fn scenarios() -> Vec<Scenario> {
    vec![
        Scenario {
            title: "Normal purchase",
            events: vec![insert(300), select("Cola"), Event::Dispense],
        },
        Scenario {
            title: "Insufficient balance, then top up",
            events: vec![
                insert(100),
                select("Cola"),
                insert(200),
                select("Cola"),
                Event::Dispense,
            ],
        },
        Scenario {
            title: "Cancelled transaction",
            events: vec![insert(200), select("Water"), Event::Cancel],
        },
        Scenario {
            title: "Sold-out product",
            events: vec![insert(300), select("Sap"), select("Water"), Event::Dispense],
        },
        Scenario {
            title: "Wrong-order actions",
            events: vec![select("Cola"), Event::Dispense, Event::Cancel],
        },
    ]
}

/// Play a list of events through a session with terminal output.
pub fn play(session: &mut VendSession, events: Vec<Event>, ui: &MachineDisplay) {
    for event in events {
        ui.event(&event);
        if event == Event::Dispense
            && let Some(product) = session.machine().selected_product()
        {
            ui.vend_spinner(product);
        }
        let response = session.handle(event);
        ui.response(session.machine(), &response);
    }
}

/// Run every scenario against one fresh machine and print the receipts.
pub fn run(inventory: Inventory, ui: &MachineDisplay) {
    let mut session = VendSession::new(VendingMachine::new(inventory));
    ui.show_inventory(session.machine());

    for scenario in scenarios() {
        ui.banner(scenario.title);
        play(&mut session, scenario.events, ui);
    }

    for sale in session.sales() {
        ui.print_sale(sale);
    }
}
