//! Persona listing

use crate::core::persona::Persona;

pub fn list_personas(active: Persona) {
    println!("🎭 Available personas");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!();
    for persona in Persona::ALL {
        let marker = if persona == active { "*" } else { " " };
        println!("{marker} {:<12} {}", persona.id(), persona.system_prompt());
    }
    println!();
    println!("* = active. Change with --persona <id> or 'localchat set default-persona <id>'.");
}
