use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::compose::{Record, decode, mask_keys};
use crate::decoder::{Field, UnknownField};
use crate::error::InvalidInput;

/// Errors returned while building a [`Layout`].
#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("layout JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    UnknownField(#[from] UnknownField),
    #[error("empty entry at position {position}")]
    EmptyEntry { position: usize },
    #[error("empty name at position {position}")]
    EmptyName { position: usize },
    #[error(transparent)]
    Invalid(#[from] InvalidInput),
}

/// One mask element with its optional key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    #[serde(rename = "type")]
    pub field: Field,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// A mask and its names, described as data.
///
/// Either every field carries a name or none does.
///
/// # Examples
/// ```
/// use bufmask_core::Layout;
///
/// let layout = Layout::parse("time:unixtime,battery:uint8")?;
/// assert_eq!(layout.width(), 5);
///
/// let record = layout.decode(&[0x1d, 0x4b, 0x7a, 0x57, 0x64])?;
/// assert_eq!(serde_json::to_string(&record)?, r#"{"time":1467632413,"battery":100}"#);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Layout {
    pub fields: Vec<FieldSpec>,
}

impl Layout {
    /// Build an unnamed layout from a mask.
    pub fn from_mask(mask: &[Field]) -> Result<Self, InvalidInput> {
        let layout = Self {
            fields: mask
                .iter()
                .map(|&field| FieldSpec { field, name: None })
                .collect(),
        };
        layout.validate()?;
        Ok(layout)
    }

    /// Parse the compact form: `latLng,unixtime` or `pos:latLng,time:unixtime`.
    pub fn parse(spec: &str) -> Result<Self, LayoutError> {
        let fields = spec
            .split(',')
            .enumerate()
            .map(|(position, entry)| {
                let entry = entry.trim();
                if entry.is_empty() {
                    return Err(LayoutError::EmptyEntry { position });
                }
                let field_spec = match entry.split_once(':') {
                    Some((name, field)) => FieldSpec {
                        field: field.trim().parse()?,
                        name: Some(name.trim().to_string()),
                    },
                    None => FieldSpec {
                        field: entry.parse()?,
                        name: None,
                    },
                };
                Ok(field_spec)
            })
            .collect::<Result<Vec<_>, LayoutError>>()?;

        let layout = Self { fields };
        layout.check_names()?;
        layout.validate()?;
        Ok(layout)
    }

    pub fn from_json_str(json: &str) -> Result<Self, LayoutError> {
        let layout: Self = serde_json::from_str(json)?;
        layout.check_names()?;
        layout.validate()?;
        Ok(layout)
    }

    pub fn load(path: &Path) -> Result<Self, LayoutError> {
        let json = fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Replace every field name, in mask order.
    pub fn with_names<S: AsRef<str>>(mut self, names: &[S]) -> Result<Self, InvalidInput> {
        mask_keys(self.fields.len(), Some(names))?;
        for (spec, name) in self.fields.iter_mut().zip(names) {
            spec.name = Some(name.as_ref().to_string());
        }
        Ok(self)
    }

    pub fn mask(&self) -> Vec<Field> {
        self.fields.iter().map(|spec| spec.field).collect()
    }

    /// Field names when every field is named, `None` when none are.
    pub fn names(&self) -> Result<Option<Vec<&str>>, InvalidInput> {
        let names: Vec<&str> = self
            .fields
            .iter()
            .filter_map(|spec| spec.name.as_deref())
            .collect();
        if names.is_empty() {
            return Ok(None);
        }
        if names.len() != self.fields.len() {
            return Err(InvalidInput::NamesMaskMismatch {
                names: names.len(),
                mask: self.fields.len(),
            });
        }
        Ok(Some(names))
    }

    /// Total byte width.
    pub fn width(&self) -> usize {
        self.fields.iter().map(|spec| spec.field.byte_width()).sum()
    }

    pub fn validate(&self) -> Result<(), InvalidInput> {
        let names = self.names()?;
        mask_keys(self.fields.len(), names.as_deref())?;
        Ok(())
    }

    pub fn decode(&self, buffer: &[u8]) -> Result<Record, InvalidInput> {
        let names = self.names()?;
        decode(buffer, &self.mask(), names.as_deref())
    }

    fn check_names(&self) -> Result<(), LayoutError> {
        for (position, spec) in self.fields.iter().enumerate() {
            if matches!(spec.name.as_deref(), Some(name) if name.trim().is_empty()) {
                return Err(LayoutError::EmptyName { position });
            }
        }
        Ok(())
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, spec) in self.fields.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            match &spec.name {
                Some(name) => write!(f, "{name}:{}", spec.field)?,
                None => write!(f, "{}", spec.field)?,
            }
        }
        Ok(())
    }
}
