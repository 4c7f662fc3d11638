//! Content line decoding: property name, parameter list, raw value.
//!
//! Splitting is deliberately naive, the way real-world producers are parsed:
//! first colon ends the name+parameter section (further colons belong to the
//! value, quoting is rare in practice), semicolons separate raw parameters.

use crate::core::Parameter;

/// A decoded content line, before value type resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct ContentLine {
    /// Property name as written.
    pub name: String,
    /// Parameters in order of appearance; `=`-less segments are dropped.
    pub params: Vec<Parameter>,
    /// Raw value (after unfolding, before unescaping).
    pub raw_value: String,
}

impl ContentLine {
    /// Decodes a logical line.
    ///
    /// Returns `None` for lines without a colon separator; such lines are
    /// malformed and skipped, never fatal.
    #[must_use]
    pub fn decode(line: &str) -> Option<Self> {
        let (head, raw_value) = line.split_once(':')?;

        let mut segments = head.split(';');
        let name = segments.next().unwrap_or_default().to_string();
        let raw_params: Vec<&str> = segments.collect();

        // A lone CHARSET=utf-8 marks plain UTF-8 text; treating it as no
        // parameters keeps backward-compatible bare-scalar storage.
        let params = if raw_params == ["CHARSET=utf-8"] {
            Vec::new()
        } else {
            raw_params
                .iter()
                .filter_map(|segment| {
                    let (key, value) = segment.split_once('=')?;
                    Some(Parameter::new(key, value))
                })
                .collect()
        };

        Some(Self {
            name,
            params,
            raw_value: raw_value.to_string(),
        })
    }

    /// Returns the parameter with the given name (case-insensitive).
    #[must_use]
    pub fn param(&self, name: &str) -> Option<&Parameter> {
        self.params
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(name))
    }

    /// Returns a parameter's text content, if it stayed textual.
    #[must_use]
    pub fn param_text(&self, name: &str) -> Option<&str> {
        self.param(name)?.value.as_text()
    }

    /// Whether a parameter with the given textual value is present.
    #[must_use]
    pub fn has_param_value(&self, name: &str, value: &str) -> bool {
        self.param_text(name) == Some(value)
    }

    /// Whether any meaningful parameters survived decoding.
    #[must_use]
    pub fn has_params(&self) -> bool {
        !self.params.is_empty()
    }
}
