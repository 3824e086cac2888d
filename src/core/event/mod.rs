pub mod poller;

pub use poller::{Poller, Readiness};
