use crate::shared::WizardError;

pub const MAX_CUSTOM_PROPERTIES: usize = 5;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomProperty {
    pub label: String,
    pub value: String,
}

impl CustomProperty {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }

    /// Entries without a label carry nothing to encode.
    pub fn is_blank(&self) -> bool {
        self.label.trim().is_empty()
    }

    fn trimmed(mut self) -> Self {
        let label = self.label.trim();
        if label.len() != self.label.len() {
            self.label = label.to_string();
        }
        self
    }
}

/// Ordered, position-addressed list capped at [`MAX_CUSTOM_PROPERTIES`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomProperties(Vec<CustomProperty>);

impl CustomProperties {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.0.len() >= MAX_CUSTOM_PROPERTIES
    }

    pub fn as_slice(&self) -> &[CustomProperty] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = &CustomProperty> {
        self.0.iter()
    }

    pub fn get(&self, index: usize) -> Option<&CustomProperty> {
        self.0.get(index)
    }

    /// Appends `property` and returns its position. Labels are stored
    /// trimmed, which is the key they encode under.
    pub fn add(&mut self, property: CustomProperty) -> Result<usize, WizardError> {
        if self.is_full() {
            return Err(WizardError::CustomPropertyLimit {
                limit: MAX_CUSTOM_PROPERTIES,
            });
        }
        self.0.push(property.trimmed());
        Ok(self.0.len() - 1)
    }

    pub fn update(&mut self, index: usize, property: CustomProperty) -> Result<(), WizardError> {
        let len = self.0.len();
        let slot = self
            .0
            .get_mut(index)
            .ok_or(WizardError::CustomPropertyIndex { index, len })?;
        *slot = property.trimmed();
        Ok(())
    }

    /// Removes the entry at `index`; later entries shift down by one.
    pub fn remove(&mut self, index: usize) -> Result<CustomProperty, WizardError> {
        if index >= self.0.len() {
            return Err(WizardError::CustomPropertyIndex {
                index,
                len: self.0.len(),
            });
        }
        Ok(self.0.remove(index))
    }
}
