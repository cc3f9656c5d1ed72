//! Pharmaceutical cold-chain reference contract: tracks shipments and
//! flags a shipment `BREACHED` (sticky) once any reading falls outside its
//! configured temperature band. Temperatures are scaled integers -- no
//! floating point may influence persisted state, since that would diverge
//! state roots across replicas running different float implementations.

use crate::contract::Contract;
use crate::error::{ContractError, Result};
use serde_json::{json, Map, Value};

pub struct PharmaContract;

const BREACHED: &str = "BREACHED";
const IN_TRANSIT: &str = "IN_TRANSIT";

impl PharmaContract {
    fn require_i64(params: &Map<String, Value>, key: &str) -> Result<i64> {
        params
            .get(key)
            .and_then(Value::as_i64)
            .ok_or_else(|| ContractError::InvalidParams("record_temperature".into(), format!("missing or non-integer '{key}'")))
    }
}

impl Contract for PharmaContract {
    fn name(&self) -> &'static str {
        "PharmaContract"
    }

    fn construct(&self, deployer: &str, args: Option<&Value>) -> Result<Value> {
        let Some(args) = args else {
            // Bare-name deploy (genesis uses this form): storage starts
            // empty, matching the original executor's deploy path, which
            // never invoked a constructor in that case.
            return Ok(json!({}));
        };
        let args = args
            .as_object()
            .ok_or_else(|| ContractError::InvalidParams("construct".into(), "args must be an object".into()))?;
        let min_temp = Self::require_i64(args, "min_temp")?;
        let max_temp = Self::require_i64(args, "max_temp")?;
        Ok(json!({
            "owner": deployer,
            "min_temp": min_temp,
            "max_temp": max_temp,
            "shipments": {},
        }))
    }

    fn call(&self, method: &str, params: &Value, caller: &str, storage: &mut Value) -> Result<()> {
        match method {
            "record_temperature" => self.record_temperature(params, caller, storage),
            other => Err(ContractError::UnknownMethod {
                contract: self.name().to_string(),
                method: other.to_string(),
            }),
        }
    }
}

impl PharmaContract {
    fn record_temperature(&self, params: &Value, caller: &str, storage: &mut Value) -> Result<()> {
        let params = params
            .as_object()
            .ok_or_else(|| ContractError::MalformedPayload("record_temperature params must be an object".into()))?;

        let shipment_id = params
            .get("shipment_id")
            .and_then(Value::as_str)
            .ok_or_else(|| ContractError::InvalidParams("record_temperature".into(), "missing 'shipment_id'".into()))?
            .to_string();
        let temp = Self::require_i64(params, "temp")?;
        let location = params.get("location").cloned().unwrap_or(Value::Array(Vec::new()));

        let storage = storage
            .as_object_mut()
            .ok_or_else(|| ContractError::MalformedPayload("contract storage must be an object".into()))?;

        let min_temp = Self::require_i64(storage, "min_temp")?;
        let max_temp = Self::require_i64(storage, "max_temp")?;

        let shipments = storage
            .entry("shipments")
            .or_insert_with(|| json!({}))
            .as_object_mut()
            .ok_or_else(|| ContractError::MalformedPayload("'shipments' must be an object".into()))?;

        let shipment = shipments
            .entry(shipment_id.clone())
            .or_insert_with(|| json!({"status": IN_TRANSIT, "readings": []}));
        let shipment = shipment
            .as_object_mut()
            .ok_or_else(|| ContractError::MalformedPayload("shipment entry must be an object".into()))?;

        let was_breached = shipment.get("status").and_then(Value::as_str) == Some(BREACHED);
        let out_of_range = temp < min_temp || temp > max_temp;
        let status = if was_breached || out_of_range { BREACHED } else { IN_TRANSIT };

        let readings = shipment
            .entry("readings")
            .or_insert_with(|| Value::Array(Vec::new()))
            .as_array_mut()
            .ok_or_else(|| ContractError::MalformedPayload("'readings' must be an array".into()))?;
        readings.push(json!({"temp": temp, "location": location, "reporter": caller}));

        shipment.insert("status".to_string(), Value::String(status.to_string()));
        Ok(())
    }
}
