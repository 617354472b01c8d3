//! Interchange <-> runtime conversion and JSON (de)serialization.
//!
//! Files store rotations with the X and Z axes mirrored relative to the rig.
//! Negating both components is its own inverse, so the same fix-up runs in
//! either direction.

use crate::{JointId, JointTransform, Pose, PoseDefinition, PoseError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Envelope version written by [`serialize_definition`].
pub const DOCUMENT_VERSION: u32 = 1;

/// A parsed pose file: the runtime pose plus whatever envelope metadata it carried.
#[derive(Debug, Clone, Default)]
pub struct PoseDocument {
    pub version: Option<Value>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub pose: Pose,
}

#[derive(Deserialize)]
struct RawJoint {
    rotation: Option<[f32; 4]>,
    position: Option<[f32; 3]>,
}

#[derive(Serialize)]
struct Envelope<'a> {
    version: u32,
    name: &'a str,
    description: &'a str,
    pose: Pose,
}

fn mirror(t: &JointTransform) -> JointTransform {
    let [x, y, z, w] = t.rotation;
    JointTransform {
        rotation: [-x, y, -z, w],
        position: t.position,
    }
}

pub fn to_runtime(interchange: &Pose) -> Pose {
    interchange.iter().map(|(id, t)| (id.clone(), mirror(t))).collect()
}

pub fn to_interchange(runtime: &Pose) -> Pose {
    runtime.iter().map(|(id, t)| (id.clone(), mirror(t))).collect()
}

/// Parse a bare joint map or a `{ version, pose }` envelope into a runtime pose.
pub fn parse(json_text: &str) -> Result<Pose> {
    parse_document(json_text).map(|doc| doc.pose)
}

pub fn parse_document(json_text: &str) -> Result<PoseDocument> {
    let value: Value = serde_json::from_str(json_text)
        .map_err(|e| PoseError::Format(format!("invalid JSON: {e}")))?;
    let Value::Object(mut root) = value else {
        return Err(PoseError::Format(
            "expected a JSON object holding a joint map".into(),
        ));
    };

    let doc = match root.remove("pose") {
        Some(Value::Object(joints)) => PoseDocument {
            version: root.remove("version"),
            name: take_string(&mut root, "name"),
            description: take_string(&mut root, "description"),
            pose: decode_joints(joints)?,
        },
        Some(Value::Null) | None => PoseDocument {
            pose: decode_joints(root)?,
            ..Default::default()
        },
        Some(other) => {
            return Err(PoseError::Format(format!(
                "`pose` must be a joint map, found {}",
                kind_of(&other)
            )))
        }
    };

    if doc.pose.is_empty() {
        tracing::warn!("pose document has no joint entries");
    } else {
        tracing::debug!(joints = doc.pose.len(), "parsed pose document");
    }
    Ok(doc)
}

fn decode_joints(joints: Map<String, Value>) -> Result<Pose> {
    let mut interchange = Pose::new();
    for (name, value) in joints {
        // Top-level scalars such as `version` in a bare map are not joints.
        if !value.is_object() {
            continue;
        }
        let raw: RawJoint = serde_json::from_value(value)
            .map_err(|e| PoseError::Format(format!("joint `{name}`: {e}")))?;
        let Some(rotation) = raw.rotation else {
            tracing::debug!(joint = %name, "joint has no rotation, dropped");
            continue;
        };
        interchange.insert(
            JointId::from(name),
            JointTransform {
                rotation,
                position: raw.position.unwrap_or([0.0; 3]),
            },
        );
    }
    Ok(to_runtime(&interchange))
}

fn take_string(map: &mut Map<String, Value>, key: &str) -> Option<String> {
    match map.remove(key) {
        Some(Value::String(s)) => Some(s),
        _ => None,
    }
}

fn kind_of(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Render a runtime pose as a pretty-printed bare interchange joint map.
pub fn serialize(runtime: &Pose) -> Result<String> {
    serde_json::to_string_pretty(&to_interchange(runtime))
        .map_err(|e| PoseError::Format(format!("serializing pose: {e}")))
}

/// Render a definition as a pretty-printed interchange envelope.
pub fn serialize_definition(def: &PoseDefinition) -> Result<String> {
    let envelope = Envelope {
        version: DOCUMENT_VERSION,
        name: &def.name,
        description: &def.description,
        pose: to_interchange(&def.pose),
    };
    serde_json::to_string_pretty(&envelope)
        .map_err(|e| PoseError::Format(format!("serializing pose definition: {e}")))
}
