// elx-common/src/env.rs
use std::collections::HashMap;

/// Variables that make an Electron binary behave as a plain Node runtime.
pub const STRIPPED_ENV_VARS: [&str; 2] = ["ATOM_SHELL_INTERNAL_RUN_AS_NODE", "ELECTRON_RUN_AS_NODE"];

pub fn sanitize_env(mut env: HashMap<String, String>) -> HashMap<String, String> {
    for key in STRIPPED_ENV_VARS {
        env.remove(key);
    }
    env
}
