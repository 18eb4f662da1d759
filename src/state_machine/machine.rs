use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::state::{Accepted, Denial, Event, Response, State};

/// A catalogue entry. Prices are integer cents, never floats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub price: u32,
    pub stock: u32,
}

impl Product {
    pub fn new(price: u32, stock: u32) -> Self {
        Self { price, stock }
    }

    pub fn in_stock(&self) -> bool {
        self.stock > 0
    }
}

/// Product catalogue keyed by name. BTreeMap keeps listings deterministic.
pub type Inventory = BTreeMap<String, Product>;

/// The state machine context.
///
/// Owns all mutable data (balance, inventory, selection) and the current
/// [`State`]. Each operation matches on the current state, mutates the
/// context, and may transition. Operations never panic and never return
/// an error; refusals come back as [`Response::Denied`] and leave the
/// machine unchanged.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VendingMachine {
    balance: u32,
    inventory: Inventory,
    selected_product: Option<String>,
    state: State,
    state_history: Vec<State>,
}

impl VendingMachine {
    /// Create a machine with a fixed catalogue, starting in `NoMoney`.
    pub fn new(inventory: Inventory) -> Self {
        Self {
            balance: 0,
            inventory,
            selected_product: None,
            state: State::NoMoney,
            state_history: Vec::new(),
        }
    }

    pub fn balance(&self) -> u32 {
        self.balance
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn selected_product(&self) -> Option<&str> {
        self.selected_product.as_deref()
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    pub fn product(&self, name: &str) -> Option<&Product> {
        self.inventory.get(name)
    }

    /// States this machine has left, in order.
    pub fn state_history(&self) -> &[State] {
        &self.state_history
    }

    /// Route an event to the matching operation.
    pub fn apply(&mut self, event: &Event) -> Response {
        match event {
            Event::InsertMoney { amount } => self.insert_money(*amount),
            Event::SelectProduct { product } => self.select_product(product),
            Event::Dispense => self.dispense(),
            Event::Cancel => self.cancel(),
        }
    }

    /// Add money to the held balance. Accepted in every state; from
    /// `NoMoney` this starts a transaction.
    pub fn insert_money(&mut self, amount: u32) -> Response {
        self.balance += amount;
        if self.state == State::NoMoney {
            self.transition(State::HasMoney);
        }
        Response::Accepted(Accepted::MoneyInserted {
            amount,
            balance: self.balance,
        })
    }

    /// Pick a product from the catalogue.
    ///
    /// Refused without money, or while another selection is pending.
    /// A sold-out pick from `HasMoney` parks the machine in `OutOfStock`;
    /// a short balance from `OutOfStock` returns it to `HasMoney`.
    pub fn select_product(&mut self, name: &str) -> Response {
        match self.state {
            State::NoMoney => Response::Denied(Denial::WrongState {
                hint: "insert money first".into(),
            }),
            State::ProductSelected => {
                let current = self.selected_product.as_deref().unwrap_or("a product");
                Response::Denied(Denial::WrongState {
                    hint: format!("{current} is already selected, dispense or cancel first"),
                })
            }
            State::HasMoney | State::OutOfStock => self.try_select(name),
        }
    }

    fn try_select(&mut self, name: &str) -> Response {
        let Some(product) = self.inventory.get(name) else {
            return Response::Denied(Denial::UnknownProduct {
                product: name.to_string(),
            });
        };
        let price = product.price;

        if !product.in_stock() {
            if self.state == State::HasMoney {
                self.transition(State::OutOfStock);
            }
            return Response::Denied(Denial::OutOfStock {
                product: name.to_string(),
            });
        }

        if self.balance < price {
            let shortage = price - self.balance;
            // The sold-out episode is over; the money is still held.
            if self.state == State::OutOfStock {
                self.transition(State::HasMoney);
            }
            return Response::Denied(Denial::InsufficientBalance {
                product: name.to_string(),
                price,
                shortage,
            });
        }

        self.selected_product = Some(name.to_string());
        self.transition(State::ProductSelected);
        Response::Accepted(Accepted::Selected {
            product: name.to_string(),
            price,
        })
    }

    /// Hand out the selected product, return change, end the transaction.
    /// Valid only in `ProductSelected`.
    pub fn dispense(&mut self) -> Response {
        if self.state != State::ProductSelected {
            let hint = match self.state {
                State::NoMoney => "insert money first",
                _ => "select a product first",
            };
            return Response::Denied(Denial::WrongState { hint: hint.into() });
        }

        // `ProductSelected` implies a pending selection for a catalogued,
        // in-stock product with balance >= price.
        let Some(name) = self.selected_product.clone() else {
            return Response::Denied(Denial::WrongState {
                hint: "select a product first".into(),
            });
        };
        let Some(product) = self.inventory.get_mut(&name) else {
            return Response::Denied(Denial::UnknownProduct { product: name });
        };

        product.stock -= 1;
        let change = self.balance - product.price;
        self.balance = 0;
        self.selected_product = None;
        self.transition(State::NoMoney);
        Response::Accepted(Accepted::Dispensed {
            product: name,
            change,
        })
    }

    /// Refund the whole balance and drop any selection. Refused only in
    /// `NoMoney`, where there is nothing to give back.
    pub fn cancel(&mut self) -> Response {
        if self.state == State::NoMoney {
            return Response::Denied(Denial::NothingToCancel);
        }
        let refunded = self.balance;
        self.balance = 0;
        self.selected_product = None;
        self.transition(State::NoMoney);
        Response::Accepted(Accepted::Cancelled { refunded })
    }

    fn transition(&mut self, next: State) {
        if next != self.state {
            self.state_history.push(self.state);
            self.state = next;
        }
    }
}

/// Structured receipt produced when a dispense completes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaleRecord {
    pub id: String,
    pub product: String,
    pub price: u32,
    pub paid: u32,
    pub change: u32,
    pub state_transitions: Vec<State>,
    pub completed_at: DateTime<Utc>,
}

impl SaleRecord {
    pub fn new(product: String, price: u32, change: u32, state_transitions: Vec<State>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            product,
            price,
            paid: price + change,
            change,
            state_transitions,
            completed_at: Utc::now(),
        }
    }
}
