use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};

use crate::error::VendomatError;
use crate::state_machine::{Accepted, Event, Response, SaleRecord, State, VendingMachine};

/// Drives a machine through event sequences and keeps the paper trail.
///
/// Every handled event lands in the transcript; every completed dispense
/// is captured as a [`SaleRecord`].
pub struct VendSession {
    machine: VendingMachine,
    transcript: Vec<(Event, Response)>,
    sales: Vec<SaleRecord>,
    // Start of the current transaction's slice of the state history.
    history_mark: usize,
}

impl VendSession {
    pub fn new(machine: VendingMachine) -> Self {
        Self {
            machine,
            transcript: Vec::new(),
            sales: Vec::new(),
            history_mark: 0,
        }
    }

    pub fn machine(&self) -> &VendingMachine {
        &self.machine
    }

    pub fn transcript(&self) -> &[(Event, Response)] {
        &self.transcript
    }

    pub fn sales(&self) -> &[SaleRecord] {
        &self.sales
    }

    /// Apply one event, record the outcome, capture a sale on dispense.
    pub fn handle(&mut self, event: Event) -> Response {
        let response = self.machine.apply(&event);

        if let Response::Accepted(Accepted::Dispensed { product, change }) = &response {
            let price = self
                .machine
                .product(product)
                .map(|p| p.price)
                .unwrap_or_default();
            let mut transitions = self.machine.state_history()[self.history_mark..].to_vec();
            transitions.push(self.machine.state());
            self.sales
                .push(SaleRecord::new(product.clone(), price, *change, transitions));
        }

        // A return to NoMoney closes the transaction window.
        if self.machine.state() == State::NoMoney {
            self.history_mark = self.machine.state_history().len();
        }

        self.transcript.push((event, response.clone()));
        response
    }

    /// Apply a whole script in order, collecting every response.
    #[allow(dead_code)]
    pub fn run_script(&mut self, events: &[Event]) -> Vec<Response> {
        events
            .iter()
            .map(|event| self.handle(event.clone()))
            .collect()
    }
}

/// Load an event script: a JSON array of tagged events.
pub fn load_script(path: &Path) -> Result<Vec<Event>, VendomatError> {
    let contents = fs::read_to_string(path)?;
    let events: Vec<Event> = serde_json::from_str(&contents)?;
    if events.is_empty() {
        return Err(VendomatError::Script(format!(
            "{} contains no events",
            path.display()
        )));
    }
    Ok(events)
}

/// Thread-safe handle to one machine: a single mutex held for the full
/// duration of each operation.
///
/// Operations read-then-write balance, stock and state, so they are not
/// individually re-entrant; the lock serializes them.
#[derive(Clone)]
#[allow(dead_code)]
pub struct SharedMachine {
    inner: Arc<Mutex<VendingMachine>>,
}

#[allow(dead_code)]
impl SharedMachine {
    pub fn new(machine: VendingMachine) -> Self {
        Self {
            inner: Arc::new(Mutex::new(machine)),
        }
    }

    /// Apply one event under the lock.
    pub fn apply(&self, event: &Event) -> Response {
        // A poisoned lock still guards a machine whose invariants are
        // carried by its types; recover the guard.
        let mut machine = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        machine.apply(event)
    }

    /// Clone of the machine as of now.
    pub fn snapshot(&self) -> VendingMachine {
        self.inner
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state_machine::{Denial, Inventory, Product};
    use std::io::Write as _;

    fn machine() -> VendingMachine {
        let mut inventory = Inventory::new();
        inventory.insert("Cola".into(), Product::new(250, 5));
        inventory.insert("Water".into(), Product::new(150, 3));
        inventory.insert("Sap".into(), Product::new(200, 0));
        VendingMachine::new(inventory)
    }

    #[test]
    fn session_records_transcript_and_sale() {
        let mut session = VendSession::new(machine());
        session.handle(Event::InsertMoney { amount: 300 });
        session.handle(Event::SelectProduct {
            product: "Cola".into(),
        });
        session.handle(Event::Dispense);

        assert_eq!(session.transcript().len(), 3);
        assert!(session.transcript().iter().all(|(_, r)| r.is_accepted()));

        let sale = &session.sales()[0];
        assert_eq!(sale.product, "Cola");
        assert_eq!(sale.price, 250);
        assert_eq!(sale.paid, 300);
        assert_eq!(sale.change, 50);
        assert_eq!(
            sale.state_transitions,
            vec![
                State::NoMoney,
                State::HasMoney,
                State::ProductSelected,
                State::NoMoney
            ]
        );
    }

    #[test]
    fn sale_transitions_cover_only_their_own_transaction() {
        let mut session = VendSession::new(machine());

        // A cancelled transaction first.
        session.handle(Event::InsertMoney { amount: 100 });
        session.handle(Event::Cancel);

        // Then a complete purchase.
        session.handle(Event::InsertMoney { amount: 150 });
        session.handle(Event::SelectProduct {
            product: "Water".into(),
        });
        session.handle(Event::Dispense);

        assert_eq!(session.sales().len(), 1);
        assert_eq!(
            session.sales()[0].state_transitions,
            vec![
                State::NoMoney,
                State::HasMoney,
                State::ProductSelected,
                State::NoMoney
            ]
        );
    }

    #[test]
    fn denied_events_produce_no_sales() {
        let mut session = VendSession::new(machine());
        let responses = session.run_script(&[
            Event::SelectProduct {
                product: "Cola".into(),
            },
            Event::Dispense,
            Event::Cancel,
        ]);

        assert!(responses.iter().all(|r| !r.is_accepted()));
        assert!(session.sales().is_empty());
        assert_eq!(session.machine().state(), State::NoMoney);
    }

    #[test]
    fn run_script_reports_every_response_in_order() {
        let mut session = VendSession::new(machine());
        let responses = session.run_script(&[
            Event::InsertMoney { amount: 100 },
            Event::SelectProduct {
                product: "Cola".into(),
            },
            Event::Cancel,
        ]);

        assert_eq!(responses.len(), 3);
        assert!(responses[0].is_accepted());
        assert_eq!(
            responses[1],
            Response::Denied(Denial::InsufficientBalance {
                product: "Cola".into(),
                price: 250,
                shortage: 150
            })
        );
        assert_eq!(
            responses[2],
            Response::Accepted(Accepted::Cancelled { refunded: 100 })
        );
    }

    #[test]
    fn load_script_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[
                {{"op": "insert_money", "amount": 300}},
                {{"op": "select_product", "product": "Cola"}},
                {{"op": "dispense"}}
            ]"#
        )
        .unwrap();

        let events = load_script(file.path()).unwrap();
        assert_eq!(events.len(), 3);
        assert_eq!(events[0], Event::InsertMoney { amount: 300 });
        assert_eq!(events[2], Event::Dispense);
    }

    #[test]
    fn load_script_rejects_empty_and_malformed_files() {
        let mut empty = tempfile::NamedTempFile::new().unwrap();
        write!(empty, "[]").unwrap();
        assert!(matches!(
            load_script(empty.path()),
            Err(VendomatError::Script(_))
        ));

        let mut malformed = tempfile::NamedTempFile::new().unwrap();
        write!(malformed, r#"[{{"op": "press_buttons"}}]"#).unwrap();
        assert!(matches!(
            load_script(malformed.path()),
            Err(VendomatError::Json(_))
        ));

        assert!(matches!(
            load_script(Path::new("does-not-exist.json")),
            Err(VendomatError::Io(_))
        ));
    }

    #[test]
    fn shared_machine_keeps_invariants_across_threads() {
        let shared = SharedMachine::new(machine());

        let mut handles = Vec::new();
        for _ in 0..4 {
            let handle = shared.clone();
            handles.push(std::thread::spawn(move || {
                let mut dispensed = 0u32;
                for _ in 0..50 {
                    handle.apply(&Event::InsertMoney { amount: 200 });
                    if handle
                        .apply(&Event::SelectProduct {
                            product: "Water".into(),
                        })
                        .is_accepted()
                        && handle.apply(&Event::Dispense).is_accepted()
                    {
                        dispensed += 1;
                    }
                    handle.apply(&Event::Cancel);
                }
                dispensed
            }));
        }

        let total_dispensed: u32 = handles.into_iter().map(|h| h.join().unwrap()).sum();
        let snapshot = shared.snapshot();

        // Water started at 3; every unit is accounted for.
        let water = snapshot.product("Water").unwrap();
        assert_eq!(water.stock + total_dispensed, 3);
        // Selection is Some exactly in ProductSelected.
        assert_eq!(
            snapshot.selected_product().is_some(),
            snapshot.state() == State::ProductSelected
        );
    }
}
