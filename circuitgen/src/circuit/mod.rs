//! Circuit document types and the netlist view over them.

pub mod netlist;
pub mod schema;

pub use netlist::{Net, Netlist};
pub use schema::*;
