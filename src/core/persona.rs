use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Selectable persona shaping the system message sent ahead of the conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Persona {
    #[default]
    Assistant,
    Programmer,
    Teacher,
    Writer,
    Concise,
}

impl Persona {
    pub const ALL: [Persona; 5] = [
        Persona::Assistant,
        Persona::Programmer,
        Persona::Teacher,
        Persona::Writer,
        Persona::Concise,
    ];

    pub fn id(self) -> &'static str {
        match self {
            Persona::Assistant => "assistant",
            Persona::Programmer => "programmer",
            Persona::Teacher => "teacher",
            Persona::Writer => "writer",
            Persona::Concise => "concise",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Persona::Assistant => "Assistant",
            Persona::Programmer => "Programmer",
            Persona::Teacher => "Teacher",
            Persona::Writer => "Writer",
            Persona::Concise => "Concise",
        }
    }

    /// Content of the synthesized system message for this persona.
    pub fn system_prompt(self) -> &'static str {
        match self {
            Persona::Assistant => {
                "You are a helpful assistant. Answer clearly and accurately."
            }
            Persona::Programmer => {
                "You are an experienced software engineer. Give precise technical answers \
and include working code examples when they help."
            }
            Persona::Teacher => {
                "You are a patient teacher. Explain concepts step by step and check \
understanding with short examples."
            }
            Persona::Writer => {
                "You are a skilled writer and editor. Help craft clear, engaging prose \
and suggest improvements to style and structure."
            }
            Persona::Concise => {
                "You are a terse assistant. Reply in as few words as possible without \
losing accuracy."
            }
        }
    }

    /// Next persona in declaration order, wrapping at the end.
    pub fn next(self) -> Persona {
        let index = Self::ALL.iter().position(|p| *p == self).unwrap_or(0);
        Self::ALL[(index + 1) % Self::ALL.len()]
    }
}

impl fmt::Display for Persona {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for Persona {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let wanted = value.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|persona| persona.id().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| {
                let available: Vec<&str> = Self::ALL.iter().map(|p| p.id()).collect();
                format!(
                    "Persona '{}' not found. Available personas: {}",
                    wanted,
                    available.join(", ")
                )
            })
    }
}

impl TryFrom<String> for Persona {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Persona> for String {
    fn from(value: Persona) -> Self {
        value.id().to_string()
    }
}
