//! Contract host: a static registry of code names to dispatch logic, plus
//! execution of deploy/call transactions against world-state.

pub mod contract;
pub mod error;
pub mod executor;
pub mod pharma;
pub mod registry;

pub use contract::Contract;
pub use error::{ContractError, Result};
pub use executor::{execute_block, execute_transaction};
pub use pharma::PharmaContract;
pub use registry::ContractRegistry;
