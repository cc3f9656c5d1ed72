use crate::contract::Contract;
use crate::error::{ContractError, Result};
use crate::pharma::PharmaContract;
use std::collections::HashMap;
use std::sync::Arc;

/// Explicit static map from code name to contract logic, built once at node
/// startup. Replaces the source's dynamic `importlib.import_module` lookup
/// by computed path -- there is no runtime code loading here, registering a
/// new contract type means adding a line to [`ContractRegistry::builtin`].
#[derive(Clone)]
pub struct ContractRegistry {
    contracts: HashMap<&'static str, Arc<dyn Contract>>,
}

impl ContractRegistry {
    pub fn new() -> Self {
        Self {
            contracts: HashMap::new(),
        }
    }

    /// The registry populated with every contract this workspace ships.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.register(PharmaContract);
        registry
    }

    pub fn register(&mut self, contract: impl Contract + 'static) {
        self.contracts.insert(contract.name(), Arc::new(contract));
    }

    pub fn get(&self, code_name: &str) -> Result<Arc<dyn Contract>> {
        self.contracts
            .get(code_name)
            .cloned()
            .ok_or_else(|| ContractError::UnknownContract(code_name.to_string()))
    }

    pub fn code_names(&self) -> Vec<&'static str> {
        self.contracts.keys().copied().collect()
    }
}

impl Default for ContractRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
