//! Single-byte device parameters: the immutable descriptor and its live value.

use crate::error::{Error, Result};
use serde::Serialize;
use std::borrow::Cow;
use std::fmt;
use std::ops::RangeInclusive;
use std::sync::Arc;

/// Shared list of display labels, indexed by value offset from the range start.
pub type Choices = Arc<[String]>;

/// Build a [`Choices`] list from string literals.
pub fn choices<S: AsRef<str>>(labels: &[S]) -> Choices {
    labels.iter().map(|l| l.as_ref().to_string()).collect()
}

/// Schema entry for one addressable byte. Never mutated once attached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParameterDescriptor {
    name: String,
    min: u8,
    max: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    choices: Option<Choices>,
    default: u8,
    address: u32,
}

impl ParameterDescriptor {
    /// Default value falls back to the lower bound of `range`.
    pub fn new(
        name: impl Into<String>,
        range: RangeInclusive<u8>,
        choices: Option<Choices>,
        default: Option<u8>,
        address: u32,
    ) -> Self {
        Self {
            name: name.into(),
            min: *range.start(),
            max: *range.end(),
            choices,
            default: default.unwrap_or(*range.start()),
            address,
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn range(&self) -> RangeInclusive<u8> {
        self.min..=self.max
    }

    #[inline]
    pub fn choices(&self) -> Option<&[String]> {
        self.choices.as_deref()
    }

    #[inline]
    pub fn default_value(&self) -> u8 {
        self.default
    }

    #[inline]
    pub fn address(&self) -> u32 {
        self.address
    }

    #[inline]
    pub fn contains(&self, value: u8) -> bool {
        (self.min..=self.max).contains(&value)
    }

    /// Label for `value`: the matching choice when one exists, else the number.
    pub fn display(&self, value: u8) -> Cow<'_, str> {
        value
            .checked_sub(self.min)
            .and_then(|i| self.choices.as_ref()?.get(i as usize))
            .map(|label| Cow::Borrowed(label.as_str()))
            .unwrap_or_else(|| Cow::Owned(value.to_string()))
    }

    fn out_of_range(&self, value: u8) -> Error {
        Error::ValueOutOfRange {
            name: self.name.clone(),
            value,
            min: self.min,
            max: self.max,
        }
    }
}

impl fmt::Display for ParameterDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:8x} | {} ({}..={})",
            self.address, self.name, self.min, self.max
        )
    }
}

/// Notification passed to observers after a value changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValueChange {
    pub address: u32,
    pub old: u8,
    pub new: u8,
}

/// Handle returned by [`ParameterValue::observe`]; pass to `unobserve` to cancel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

type Observer = Box<dyn FnMut(&ValueChange) + Send>;

/// Live value cell for one descriptor.
///
/// Observers run synchronously, in registration order, inside the `set` call
/// that changed the value.
pub struct ParameterValue {
    descriptor: Arc<ParameterDescriptor>,
    value: u8,
    observers: Vec<(ObserverId, Observer)>,
    next_observer: u64,
}

impl ParameterValue {
    pub fn new(descriptor: Arc<ParameterDescriptor>) -> Self {
        let value = descriptor.default_value();
        Self {
            descriptor,
            value,
            observers: Vec::new(),
            next_observer: 0,
        }
    }

    #[inline]
    pub fn descriptor(&self) -> &Arc<ParameterDescriptor> {
        &self.descriptor
    }

    #[inline]
    pub fn value(&self) -> u8 {
        self.value
    }

    #[inline]
    pub fn address(&self) -> u32 {
        self.descriptor.address()
    }

    pub fn display(&self) -> Cow<'_, str> {
        self.descriptor.display(self.value)
    }

    /// Store `value`. Returns `Ok(true)` when it changed, `Ok(false)` when it
    /// was already current.
    ///
    /// Out-of-range values are stored anyway; the change is still observed and
    /// `Err(ValueOutOfRange)` reports the violation.
    pub fn set(&mut self, value: u8) -> Result<bool> {
        if value == self.value {
            return Ok(false);
        }

        let violation = if self.descriptor.contains(value) {
            None
        } else {
            let error = self.descriptor.out_of_range(value);
            tracing::warn!("{:8x} | {}", self.descriptor.address(), error);
            Some(error)
        };

        let change = ValueChange {
            address: self.descriptor.address(),
            old: self.value,
            new: value,
        };
        self.value = value;
        tracing::trace!("{:8x} | {:2x} | {}", change.address, value, self.descriptor.name());
        for (_, observer) in self.observers.iter_mut() {
            observer(&change);
        }

        match violation {
            Some(error) => Err(error),
            None => Ok(true),
        }
    }

    pub fn observe<F>(&mut self, observer: F) -> ObserverId
    where
        F: FnMut(&ValueChange) + Send + 'static,
    {
        let id = ObserverId(self.next_observer);
        self.next_observer += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    pub fn unobserve(&mut self, id: ObserverId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(existing, _)| *existing != id);
        self.observers.len() != before
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }
}

impl fmt::Debug for ParameterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParameterValue")
            .field("name", &self.descriptor.name())
            .field("address", &self.descriptor.address())
            .field("value", &self.value)
            .field("observers", &self.observers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn descriptor(range: RangeInclusive<u8>) -> Arc<ParameterDescriptor> {
        Arc::new(ParameterDescriptor::new("Cutoff", range, None, None, 0x51))
    }

    #[test]
    fn test_default_is_range_start() {
        let value = ParameterValue::new(descriptor(1..=127));
        assert_eq!(value.value(), 1);

        let explicit = ParameterDescriptor::new("Level", 0..=127, None, Some(100), 0);
        assert_eq!(ParameterValue::new(Arc::new(explicit)).value(), 100);
    }

    #[test]
    fn test_display_uses_choices() {
        let labels = choices(&["Off", "On"]);
        let switch = ParameterDescriptor::new("Chorus", 0..=1, Some(labels), None, 0);
        assert_eq!(switch.display(1), "On");
        assert_eq!(switch.display(5), "5");

        let offset = ParameterDescriptor::new("Velo", 1..=3, Some(choices(&["a", "b", "c"])), None, 0);
        assert_eq!(offset.display(1), "a");
        assert_eq!(offset.display(0), "0");
    }

    #[test]
    fn test_set_notifies_once_per_change() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut value = ParameterValue::new(descriptor(0..=127));
        let seen = Arc::clone(&calls);
        value.observe(move |change| {
            assert_eq!(change.address, 0x51);
            seen.fetch_add(1, Ordering::SeqCst);
        });

        assert_eq!(value.set(64), Ok(true));
        assert_eq!(value.set(64), Ok(false));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(value.value(), 64);
    }

    #[test]
    fn test_out_of_range_is_stored_and_reported() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut value = ParameterValue::new(descriptor(0..=3));
        let seen = Arc::clone(&calls);
        value.observe(move |_| {
            seen.fetch_add(1, Ordering::SeqCst);
        });

        let result = value.set(9);
        assert!(matches!(result, Err(Error::ValueOutOfRange { value: 9, max: 3, .. })));
        assert_eq!(value.value(), 9);
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        // Same value again: no second report.
        assert_eq!(value.set(9), Ok(false));
    }

    #[test]
    fn test_unobserve_stops_notifications() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut value = ParameterValue::new(descriptor(0..=127));
        let seen = Arc::clone(&calls);
        let id = value.observe(move |_| {
            seen.fetch_add(1, Ordering::SeqCst);
        });

        value.set(1).unwrap();
        assert!(value.unobserve(id));
        assert!(!value.unobserve(id));
        value.set(2).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(value.observer_count(), 0);
    }
}
