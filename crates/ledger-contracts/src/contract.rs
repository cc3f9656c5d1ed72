use crate::error::Result;
use serde_json::Value;

/// A registered contract type: stateless dispatch logic shared by every
/// deployed instance of that code name. Per-instance state lives entirely
/// in the `storage` JSON value the caller threads through; this trait never
/// holds state of its own.
///
/// Replaces the source's dynamic dispatch by method name (`getattr` on a
/// class instance) with an explicit, typed `call` match -- unknown methods
/// fail with [`crate::ContractError::UnknownMethod`] instead of an
/// attribute-not-found error at call time.
pub trait Contract: Send + Sync {
    /// The code name this contract is registered under, e.g. `"PharmaContract"`.
    fn name(&self) -> &'static str;

    /// Build the initial storage for a new deployment. `args` is `None` for
    /// the bare-code-name deploy form (genesis uses this: the deployed
    /// contract starts with empty storage, matching the original node's
    /// deploy path, which never invoked a constructor for that form) and
    /// `Some` for the `{contract, args}` form.
    fn construct(&self, deployer: &str, args: Option<&Value>) -> Result<Value>;

    /// Dispatch `method` against `storage`, mutating it in place.
    fn call(&self, method: &str, params: &Value, caller: &str, storage: &mut Value) -> Result<()>;
}
