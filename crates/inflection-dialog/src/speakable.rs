//! Dual print/speak strings.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A string with a printed rendering and an optional spoken rendering.
///
/// The spoken rendering is only stored when it was supplied; `speak()` falls
/// back to the printed text otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SpeakableString {
    print: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    speak: Option<String>,
}

impl SpeakableString {
    pub fn new(print: impl Into<String>) -> Self {
        Self {
            print: print.into(),
            speak: None,
        }
    }

    pub fn with_speak(print: impl Into<String>, speak: impl Into<String>) -> Self {
        Self {
            print: print.into(),
            speak: Some(speak.into()),
        }
    }

    pub fn print(&self) -> &str {
        &self.print
    }

    /// The spoken rendering, or the printed text when none was supplied.
    pub fn speak(&self) -> &str {
        self.speak.as_deref().unwrap_or(&self.print)
    }

    /// The explicitly supplied spoken annotation, if any.
    pub fn speak_annotation(&self) -> Option<&str> {
        self.speak.as_deref()
    }

    pub fn speak_equals_print(&self) -> bool {
        self.speak() == self.print
    }
}

impl fmt::Display for SpeakableString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.print)
    }
}

impl From<&str> for SpeakableString {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for SpeakableString {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}
