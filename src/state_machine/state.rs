use std::fmt;

use serde::{Deserialize, Serialize};

/// The four states of the vending machine.
///
/// Every machine starts in `NoMoney` and returns there after each
/// completed or cancelled transaction. States carry no data of their
/// own; all mutable fields live on the machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum State {
    NoMoney,
    HasMoney,
    ProductSelected,
    OutOfStock,
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            State::NoMoney => write!(f, "NO_MONEY"),
            State::HasMoney => write!(f, "HAS_MONEY"),
            State::ProductSelected => write!(f, "PRODUCT_SELECTED"),
            State::OutOfStock => write!(f, "OUT_OF_STOCK"),
        }
    }
}

/// An external stimulus applied to the machine.
///
/// The tagged representation keeps event scripts writable by hand:
/// `{"op": "insert_money", "amount": 100}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Event {
    InsertMoney { amount: u32 },
    SelectProduct { product: String },
    Dispense,
    Cancel,
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Event::InsertMoney { amount } => write!(f, "insert {amount} cents"),
            Event::SelectProduct { product } => write!(f, "select {product}"),
            Event::Dispense => write!(f, "dispense"),
            Event::Cancel => write!(f, "cancel"),
        }
    }
}

/// Why an operation was refused.
///
/// Every refusal is recoverable and leaves the machine unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Denial {
    /// The requested product is not in the catalogue.
    UnknownProduct { product: String },
    /// The requested product has zero stock.
    OutOfStock { product: String },
    /// The held balance does not cover the product price.
    InsufficientBalance {
        product: String,
        price: u32,
        shortage: u32,
    },
    /// The operation is not valid in the current state.
    WrongState { hint: String },
    /// `cancel` with no transaction in progress.
    NothingToCancel,
}

impl fmt::Display for Denial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Denial::UnknownProduct { product } => {
                write!(f, "product '{product}' does not exist")
            }
            Denial::OutOfStock { product } => write!(f, "{product} is sold out"),
            Denial::InsufficientBalance {
                product,
                price,
                shortage,
            } => write!(
                f,
                "insufficient balance for {product} ({price} cents): {shortage} cents short"
            ),
            Denial::WrongState { hint } => write!(f, "{hint}"),
            Denial::NothingToCancel => write!(f, "nothing to cancel"),
        }
    }
}

/// What a successful operation did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Accepted {
    MoneyInserted { amount: u32, balance: u32 },
    Selected { product: String, price: u32 },
    Dispensed { product: String, change: u32 },
    Cancelled { refunded: u32 },
}

impl fmt::Display for Accepted {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Accepted::MoneyInserted { amount, balance } => {
                write!(f, "inserted {amount} cents, balance is {balance} cents")
            }
            Accepted::Selected { product, price } => {
                write!(f, "{product} selected ({price} cents)")
            }
            Accepted::Dispensed { product, change } => {
                if *change > 0 {
                    write!(f, "dispensed {product}, {change} cents change")
                } else {
                    write!(f, "dispensed {product}")
                }
            }
            Accepted::Cancelled { refunded } => {
                write!(f, "transaction cancelled, {refunded} cents refunded")
            }
        }
    }
}

/// The result of applying one event.
///
/// Operations never fail hard; a refusal is an ordinary value and its
/// `Display` form is the status line shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Response {
    Accepted(Accepted),
    Denied(Denial),
}

impl Response {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Response::Accepted(_))
    }
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Response::Accepted(accepted) => accepted.fmt(f),
            Response::Denied(denial) => denial.fmt(f),
        }
    }
}
