//! Version command

use console::style;
use kubeit_core::TypeRegistry;

pub fn run() {
    println!("Kubeit version: {}", style(env!("CARGO_PKG_VERSION")).bold());
    println!();
    println!("Supported kinds:");

    let registry = TypeRegistry::with_builtin_kinds();
    for kind in registry.kinds() {
        println!("  {} ({})", kind, registry.versions(kind).join(", "));
    }
}
