use crate::models::{ActionDescriptor, PluginDescriptor};

/// Static descriptor returned by `info`. Same output for every call,
/// independent of any request content.
pub fn descriptor() -> PluginDescriptor {
    PluginDescriptor {
        name: "Actions Check".to_string(),
        plugin_type: "action".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        author: "JustNZ".to_string(),
        action: ActionDescriptor {
            name: "Actions Check".to_string(),
            description: "Check for actions in flow".to_string(),
            action_type: "actions_check".to_string(),
            icon: "solar:bolt-linear".to_string(),
            category: "Flow".to_string(),
            params: Vec::new(),
            hidden: true,
        },
        endpoints: Vec::new(),
    }
}
