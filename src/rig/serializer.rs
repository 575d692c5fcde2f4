use serde_json::Value;

use crate::copy::{ComponentSerializer, Payload, SerializeError, TreeError};

use super::{ComponentId, RigTree};

/// Serializes rig components as compact JSON objects of their fields.
///
/// Deserializing overwrites the fields named in the payload and leaves every
/// other field alone, so applying the same payload twice has the same effect
/// as applying it once.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonFieldSerializer;

impl ComponentSerializer<RigTree> for JsonFieldSerializer {
    fn serialize(&self, tree: &RigTree, component: ComponentId) -> Result<Payload, SerializeError> {
        let component = tree
            .get_component(component)
            .ok_or_else(|| TreeError::MissingComponent(component.to_string()))?;

        Ok(Payload::new(serde_json::to_string(&component.fields)?))
    }

    fn deserialize(
        &self,
        tree: &mut RigTree,
        component: ComponentId,
        payload: &Payload,
    ) -> Result<(), SerializeError> {
        let fields = match serde_json::from_str::<Value>(payload.as_str())? {
            Value::Object(fields) => fields,
            _ => return Err(SerializeError::NotAnObject),
        };

        let component = tree
            .get_component_mut(component)
            .ok_or_else(|| TreeError::MissingComponent(component.to_string()))?;

        component.fields.extend(fields);

        Ok(())
    }
}
