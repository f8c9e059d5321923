use crate::core::config::data::Config;
use crate::core::config::defaults::{
    DEFAULT_BASE_URL, DEFAULT_MODEL, DEFAULT_POLL_INTERVAL_SECS, DEFAULT_TEMPERATURE,
};
use crate::core::persona::Persona;

impl Config {
    pub fn print_all(&self) {
        println!("Current configuration:");
        match &self.base_url {
            Some(url) => println!("  base-url: {url}"),
            None => println!("  base-url: (unset, default {DEFAULT_BASE_URL})"),
        }
        match &self.model {
            Some(model) => println!("  model: {model}"),
            None => println!("  model: (unset, default {DEFAULT_MODEL})"),
        }
        match self.temperature {
            Some(temperature) => println!("  temperature: {temperature}"),
            None => println!("  temperature: (unset, default {DEFAULT_TEMPERATURE})"),
        }
        match self.poll_interval_secs {
            Some(secs) => println!("  poll-interval: {secs}s"),
            None => println!("  poll-interval: (unset, default {DEFAULT_POLL_INTERVAL_SECS}s)"),
        }
        match self.default_persona {
            Some(persona) => println!("  default-persona: {}", persona.id()),
            None => println!("  default-persona: (unset, default {})", Persona::default().id()),
        }
    }
}
