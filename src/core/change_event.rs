//! Change events delivered to configuration listeners.

use std::fmt;

/// Kind of change a listener is being notified about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeType {
    /// The key was added to the configuration.
    Add,
    /// An existing key received a new value.
    Modify,
    /// The key was removed.
    Delete,
}

impl fmt::Display for ChangeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Add => "ADD",
            Self::Modify => "MODIFY",
            Self::Delete => "DELETE",
        };
        f.write_str(name)
    }
}

/// A single-key change event, built per affected key at dispatch time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigurationChangeEvent {
    data_id: String,
    new_value: Option<String>,
    change_type: ChangeType,
}

impl ConfigurationChangeEvent {
    /// Create an event for `data_id` carrying its new value, if any.
    pub fn new(data_id: impl Into<String>, new_value: Option<String>, change_type: ChangeType) -> Self {
        Self {
            data_id: data_id.into(),
            new_value,
            change_type,
        }
    }

    /// The key that changed.
    pub fn data_id(&self) -> &str {
        &self.data_id
    }

    /// The new value, or `None` when the key was deleted or set to nil.
    pub fn new_value(&self) -> Option<&str> {
        self.new_value.as_deref()
    }

    /// The kind of change.
    pub fn change_type(&self) -> ChangeType {
        self.change_type
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessors() {
        let event = ConfigurationChangeEvent::new("a.b", Some("1".to_string()), ChangeType::Add);
        assert_eq!(event.data_id(), "a.b");
        assert_eq!(event.new_value(), Some("1"));
        assert_eq!(event.change_type(), ChangeType::Add);
    }

    #[test]
    fn test_change_type_display() {
        assert_eq!(ChangeType::Delete.to_string(), "DELETE");
        assert_eq!(ChangeType::Modify.to_string(), "MODIFY");
    }
}
