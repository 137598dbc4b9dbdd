//! GitHub Actions workflow commands.
//!
//! Commands are lines of the form `::name key=value,key=value::message`
//! printed to stdout. Messages and property values are percent-escaped so a
//! value can never terminate the command early.

/// Escape a command message
pub fn escape_data(value: &str) -> String {
    value
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

/// Escape a command property value
pub fn escape_property(value: &str) -> String {
    escape_data(value).replace(':', "%3A").replace(',', "%2C")
}

/// Render one workflow command line
pub fn workflow_command(name: &str, properties: &[(&str, &str)], message: &str) -> String {
    let mut line = format!("::{}", name);
    if !properties.is_empty() {
        let rendered: Vec<String> = properties
            .iter()
            .map(|(key, value)| format!("{}={}", key, escape_property(value)))
            .collect();
        line.push(' ');
        line.push_str(&rendered.join(","));
    }
    line.push_str("::");
    line.push_str(&escape_data(message));
    line
}
