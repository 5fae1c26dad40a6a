//! Converter registry for converter discovery and selection
//!
//! Converters are registered in priority order. [`ConverterRegistry::preferred`] picks the
//! first one that can run, which is how "auto" conversion finds pandoc when it is
//! installed and the built-in rule engine otherwise.

use crate::error::{BabelError, Result};
use crate::format::Converter;

/// Registry of converters, kept in priority order
pub struct ConverterRegistry {
    converters: Vec<Box<dyn Converter>>,
}

impl ConverterRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        ConverterRegistry {
            converters: Vec::new(),
        }
    }

    /// Register a converter at the lowest priority
    ///
    /// If a converter with the same name already exists, it is replaced in place.
    pub fn register<C: Converter + 'static>(&mut self, converter: C) {
        let boxed: Box<dyn Converter> = Box::new(converter);
        match self
            .converters
            .iter()
            .position(|known| known.name() == boxed.name())
        {
            Some(idx) => self.converters[idx] = boxed,
            None => self.converters.push(boxed),
        }
    }

    /// Get a converter by name
    pub fn get(&self, name: &str) -> Result<&dyn Converter> {
        self.converters
            .iter()
            .find(|converter| converter.name() == name)
            .map(|converter| converter.as_ref())
            .ok_or_else(|| BabelError::ConverterNotFound(name.to_string()))
    }

    /// Get a converter by name, failing if it cannot run here
    pub fn get_available(&self, name: &str) -> Result<&dyn Converter> {
        let converter = self.get(name)?;
        if converter.is_available() {
            Ok(converter)
        } else {
            Err(BabelError::ConverterUnavailable(name.to_string()))
        }
    }

    /// Check if a converter exists
    pub fn has(&self, name: &str) -> bool {
        self.converters.iter().any(|converter| converter.name() == name)
    }

    /// Converter names in priority order
    pub fn list_converters(&self) -> Vec<String> {
        self.converters
            .iter()
            .map(|converter| converter.name().to_string())
            .collect()
    }

    /// First available converter in priority order
    pub fn preferred(&self) -> Option<&dyn Converter> {
        self.converters
            .iter()
            .find(|converter| converter.is_available())
            .map(|converter| converter.as_ref())
    }

    /// Create a registry with the built-in converters
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();

        #[cfg(feature = "native-export")]
        registry.register(crate::formats::pandoc::PandocConverter::default());
        registry.register(crate::formats::fallback::FallbackConverter::default());

        registry
    }
}

impl Default for ConverterRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
