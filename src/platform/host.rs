use sysinfo::System;

/// Host name as reported by the OS, `localhost` when unknown
pub fn hostname() -> String {
    System::host_name()
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| "localhost".to_string())
}
