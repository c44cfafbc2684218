// SPDX-License-Identifier: MIT OR Apache-2.0
use crate::GraphicsError;
use crate::loader::Loader;
use ash::vk::ExtensionProperties;
use log::warn;
use std::ffi::{CStr, CString};

/// Instance extensions reported by the driver stack.
///
/// This is a snapshot at the time of [`ExtensionInventory::query()`] and the order is the same as
/// the driver reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionInventory {
    names: Vec<CString>,
}

impl ExtensionInventory {
    pub fn query(loader: &Loader) -> Result<Self, GraphicsError> {
        let props = unsafe { loader.entry().enumerate_instance_extension_properties(None) }
            .map_err(GraphicsError::EnumerateExtensions)?;

        let inv = Self::from_properties(&props);

        if inv.is_empty() {
            return Err(GraphicsError::NoExtensions);
        }

        Ok(inv)
    }

    /// Entries with a malformed name are skipped.
    pub fn from_properties(props: &[ExtensionProperties]) -> Self {
        let mut names = Vec::with_capacity(props.len());

        for (i, p) in props.iter().enumerate() {
            match p.extension_name_as_c_str() {
                Ok(v) => names.push(v.to_owned()),
                Err(_) => warn!("Ignoring instance extension #{i} without NUL-terminated name."),
            }
        }

        Self { names }
    }

    pub fn from_names<I>(names: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<CString>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    pub fn names(&self) -> &[CString] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Returns `true` if every name in `required` is present.
    pub fn contains_all(&self, required: &[&CStr]) -> bool {
        let mut found = vec![false; required.len()];
        let mut remaining = required.len();

        if remaining == 0 {
            return true;
        }

        for name in &self.names {
            for (i, &r) in required.iter().enumerate() {
                if !found[i] && name.as_c_str() == r {
                    found[i] = true;
                    remaining -= 1;
                }
            }

            if remaining == 0 {
                return true;
            }
        }

        false
    }

    /// Returns the items of `required` that are not present, in the same order as `required`.
    pub fn missing<'a>(&self, required: &[&'a CStr]) -> Vec<&'a CStr> {
        required
            .iter()
            .copied()
            .filter(|&r| !self.names.iter().any(|n| n.as_c_str() == r))
            .collect()
    }

    /// Fails with [`GraphicsError::MissingExtensions`] if any name in `required` is absent.
    pub fn require(&self, required: &[&CStr]) -> Result<(), GraphicsError> {
        if self.contains_all(required) {
            return Ok(());
        }

        let missing = self
            .missing(required)
            .into_iter()
            .map(|n| n.to_string_lossy().into_owned())
            .collect();

        Err(GraphicsError::MissingExtensions(missing))
    }
}
