//! List commands implementation

use sensorcli_bus::available_backends;

/// List all compiled-in backends
pub fn list_backends() {
    println!("Available backends:");
    println!();

    for backend in available_backends() {
        let hw = if backend.requires_hardware {
            " [hardware]"
        } else {
            ""
        };
        println!("  {:10} - {}{}", backend.name, backend.description, hw);
        if !backend.aliases.is_empty() {
            println!("  {:10}   aliases: {}", "", backend.aliases.join(", "));
        }
    }
}
