use async_trait::async_trait;
use serde_json::{json, Value};

use toolrig_core::{Capability, CapabilityDescriptor, Execution};

/// Capability: robo_action — mock dual-arm robot manipulation.
///
/// Simulates sending high-level commands (grasp, lift, move, rotate, ...)
/// to a two-handed robot. No hardware is involved; real use would hand the
/// command to a motion planning and execution stack.
pub struct RoboActionTool {
    descriptor: CapabilityDescriptor,
}

const SUPPORTED_ACTIONS: [&str; 9] = [
    "grasp", "release", "lift", "place", "move", "rotate", "tilt", "push", "pull",
];

impl RoboActionTool {
    pub fn new() -> Self {
        let descriptor = CapabilityDescriptor::new(
            "robo_action",
            "A tool that sends high-level commands to a two-handed robot for manipulation tasks. \
             Actions cover common operations like grasp, lift, move, rotate, and release.",
            "1.0.0",
        )
        .with_input("action", "str - Name of the action to perform (one of the supported actions)")
        .with_input(
            "target",
            "str - Identifier or description of the target object (e.g., 'box1')",
        )
        .with_input(
            "parameters",
            "dict - Additional parameters such as hand ('left'|'right'|'both'), \
             position ([x, y, z] in meters), orientation ({roll, pitch, yaw} in degrees), \
             and optional speed (m/s)",
        )
        .with_output("dict - A dictionary containing status, executed action, and details.")
        .with_demo_command(json!({
            "command": "execute(action='grasp', target='cube_1', parameters={'hand': 'both', 'position': [0.1, 0.2, 0.3]})",
            "description": "Grasp cube_1 at the specified position using both hands.",
        }))
        .with_demo_command(json!({
            "command": "execute(action='lift', target='cube_1', parameters={'hand': 'both', 'speed': 0.2})",
            "description": "Lift the previously grasped object at 0.2 m/s.",
        }))
        .with_demo_command(json!({
            "command": "execute(action='rotate', target='cube_1', parameters={'hand': 'both', 'orientation': {'yaw': 90}})",
            "description": "Rotate the object 90 degrees around the yaw axis.",
        }))
        .with_user_metadata(json!({
            "limitations": "This is a mock implementation for demonstration. It does not \
                communicate with real hardware. For actual robot control, integrate with a \
                motion planning and execution stack."
        }));
        Self { descriptor }
    }

    pub fn supported_actions() -> &'static [&'static str] {
        &SUPPORTED_ACTIONS
    }
}

impl Default for RoboActionTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Capability for RoboActionTool {
    fn descriptor(&self) -> &CapabilityDescriptor {
        &self.descriptor
    }

    async fn execute_raw(&self, parameters: Value) -> Execution {
        let action = parameters["action"].as_str().unwrap_or_default().to_string();
        let target = parameters["target"].as_str().unwrap_or_default().to_string();
        let extra = parameters.get("parameters").cloned().unwrap_or(json!({}));

        if !SUPPORTED_ACTIONS.contains(&action.as_str()) {
            return Execution::new(json!({
                "status": "error",
                "message": format!(
                    "Unsupported action '{}'. Supported actions: {:?}",
                    action, SUPPORTED_ACTIONS
                ),
                "action": action,
                "target": target,
                "parameters": extra,
            }))
            .with_metric("action_supported", json!(false));
        }

        // Mock execution: real use would send the command to robot middleware.
        Execution::new(json!({
            "status": "success",
            "action": action,
            "target": target,
            "parameters": extra,
            "message": format!(
                "Action '{}' executed on target '{}' with parameters {}.",
                action, target, extra
            ),
        }))
        .with_metric("action_supported", json!(true))
    }
}
