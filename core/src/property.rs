//! Managed properties.
//!
//! A property can be written through two paths:
//!
//! - the direct path ([`Property::set`]), used by ordinary application code;
//! - the composition path ([`Property::update_managed`]), used when the value is
//!   driven reactively by the composition engine.
//!
//! Once a property has been written through the direct path, the composition
//! path stops reaching it: the application has taken control of the value and
//! recomposition must not overwrite it. Unchanged writes never run the update
//! callback, so the backing node is only touched when something changed.
//!
//! [`Property`] is the statically typed slot used for properties known at
//! compile time. [`PropertyDelegate`] is a name-keyed bag of
//! [`Property<PropValue>`] for genuinely dynamic property sets such as element
//! attributes.

use core::fmt;
use std::borrow::Cow;
use std::rc::Rc;

/// Callback invoked with the new value (`None` when the value was cleared).
pub type UpdateFn<T> = Box<dyn Fn(Option<&T>)>;

/// Whether the composition path may drive a property.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyKind {
    /// Driven by the composition engine until the first direct write.
    Managed,
    /// Never driven by the composition engine.
    Unmanaged,
}

/// A typed property slot with change tracking.
pub struct Property<T> {
    value: Option<T>,
    kind: PropertyKind,
    skip_update: bool,
    locally_set: bool,
    on_update: Option<UpdateFn<T>>,
}

impl<T: PartialEq> Property<T> {
    /// Declares a property without an update callback.
    #[must_use]
    pub const fn new(kind: PropertyKind, initial: Option<T>) -> Self {
        Self {
            value: initial,
            kind,
            skip_update: false,
            locally_set: false,
            on_update: None,
        }
    }

    /// Declares a property the composition engine may drive.
    ///
    /// The initial value is stored as-is; `on_update` only runs for later
    /// writes, and never when `skip_update` is set.
    #[must_use]
    pub fn managed(
        initial: Option<T>,
        skip_update: bool,
        on_update: impl Fn(Option<&T>) + 'static,
    ) -> Self {
        Self::new(PropertyKind::Managed, initial)
            .with_skip_update(skip_update)
            .with_update(on_update)
    }

    /// Declares a property that only the direct write path can change.
    #[must_use]
    pub fn unmanaged(
        initial: Option<T>,
        skip_update: bool,
        on_update: impl Fn(Option<&T>) + 'static,
    ) -> Self {
        Self::new(PropertyKind::Unmanaged, initial)
            .with_skip_update(skip_update)
            .with_update(on_update)
    }

    /// Replaces the update callback.
    #[must_use]
    pub fn with_update(mut self, on_update: impl Fn(Option<&T>) + 'static) -> Self {
        self.on_update = Some(Box::new(on_update));
        self
    }

    /// Controls whether changed writes run the update callback.
    #[must_use]
    pub fn with_skip_update(mut self, skip_update: bool) -> Self {
        self.skip_update = skip_update;
        self
    }

    /// Returns the current value.
    #[must_use]
    pub const fn get(&self) -> Option<&T> {
        self.value.as_ref()
    }

    /// Returns the kind of this property.
    #[must_use]
    pub const fn kind(&self) -> PropertyKind {
        self.kind
    }

    /// Returns `true` once the direct path has changed this property.
    #[must_use]
    pub const fn is_locally_set(&self) -> bool {
        self.locally_set
    }

    /// Writes through the direct path.
    ///
    /// Returns `true` when the value changed. A changed write marks the
    /// property as locally set and runs the update callback unless the property
    /// skips updates.
    pub fn set(&mut self, value: Option<T>) -> bool {
        if self.value == value {
            return false;
        }
        self.value = value;
        self.locally_set = true;
        self.notify();
        true
    }

    /// Writes through the composition path.
    ///
    /// Inert on unmanaged properties and on properties that were locally set;
    /// otherwise behaves like [`set`](Self::set) without marking the property
    /// as locally set. Returns `true` when the value changed.
    pub fn update_managed(&mut self, value: Option<T>) -> bool {
        if self.kind == PropertyKind::Unmanaged || self.locally_set {
            return false;
        }
        if self.value == value {
            return false;
        }
        self.value = value;
        self.notify();
        true
    }

    fn notify(&self) {
        if self.skip_update {
            return;
        }
        if let Some(on_update) = &self.on_update {
            on_update(self.value.as_ref());
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Property<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Property")
            .field("value", &self.value)
            .field("kind", &self.kind)
            .field("skip_update", &self.skip_update)
            .field("locally_set", &self.locally_set)
            .field("on_update", &self.on_update.is_some())
            .finish()
    }
}

/// Dynamically typed property value.
#[derive(Debug, Clone, PartialEq)]
pub enum PropValue {
    /// Text value.
    Str(String),
    /// Integer value.
    Int(i64),
    /// Floating point value.
    Float(f64),
    /// Boolean value. `false` is rendered as an absent attribute.
    Bool(bool),
}

impl PropValue {
    /// Returns the text payload, if this is a [`PropValue::Str`].
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(value) => Some(value),
            _ => None,
        }
    }

    /// Returns the attribute text for this value, or `None` for `Bool(false)`.
    ///
    /// `Bool(true)` maps to the empty string, which serializes as a bare
    /// attribute name.
    #[must_use]
    pub fn to_attribute(&self) -> Option<String> {
        match self {
            Self::Bool(false) => None,
            Self::Bool(true) => Some(String::new()),
            other => Some(other.to_string()),
        }
    }
}

impl fmt::Display for PropValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(value) => f.write_str(value),
            Self::Int(value) => write!(f, "{value}"),
            Self::Float(value) => write!(f, "{value}"),
            Self::Bool(value) => write!(f, "{value}"),
        }
    }
}

impl From<&str> for PropValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_owned())
    }
}

impl From<String> for PropValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<i64> for PropValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for PropValue {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<f64> for PropValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for PropValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

type SharedUpdateFn = Rc<dyn Fn(&str, Option<&PropValue>)>;

/// Name-keyed bag of managed properties, kept in declaration order.
#[derive(Default)]
pub struct PropertyDelegate {
    entries: Vec<(Cow<'static, str>, Property<PropValue>)>,
    default_update: Option<SharedUpdateFn>,
}

impl PropertyDelegate {
    /// Creates an empty delegate.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a delegate whose properties report changes to `on_update`
    /// unless declared with their own callback.
    #[must_use]
    pub fn with_default_update(on_update: impl Fn(&str, Option<&PropValue>) + 'static) -> Self {
        Self {
            entries: Vec::new(),
            default_update: Some(Rc::new(on_update)),
        }
    }

    /// Declares a managed property using the default update callback.
    pub fn managed_property(
        &mut self,
        name: impl Into<Cow<'static, str>>,
        initial: Option<PropValue>,
        skip_update: bool,
    ) {
        self.declare_with_default(name.into(), PropertyKind::Managed, initial, skip_update);
    }

    /// Declares an unmanaged property using the default update callback.
    pub fn unmanaged_property(
        &mut self,
        name: impl Into<Cow<'static, str>>,
        initial: Option<PropValue>,
        skip_update: bool,
    ) {
        self.declare_with_default(name.into(), PropertyKind::Unmanaged, initial, skip_update);
    }

    /// Declares a property with its own slot, replacing an earlier declaration
    /// in place.
    pub fn declare(&mut self, name: impl Into<Cow<'static, str>>, property: Property<PropValue>) {
        let name = name.into();
        if let Some(index) = self.position(&name) {
            self.entries[index].1 = property;
        } else {
            self.entries.push((name, property));
        }
    }

    fn declare_with_default(
        &mut self,
        name: Cow<'static, str>,
        kind: PropertyKind,
        initial: Option<PropValue>,
        skip_update: bool,
    ) -> usize {
        let mut property = Property::new(kind, initial).with_skip_update(skip_update);
        if let Some(default_update) = &self.default_update {
            let default_update = Rc::clone(default_update);
            let key = name.clone();
            property = property.with_update(move |value| default_update(&key, value));
        }
        self.declare(name.clone(), property);
        self.position(&name).unwrap_or(self.entries.len() - 1)
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|(key, _)| key == name)
    }

    fn slot(&mut self, name: &str) -> usize {
        match self.position(name) {
            Some(index) => index,
            None => self.declare_with_default(
                Cow::Owned(name.to_owned()),
                PropertyKind::Managed,
                None,
                false,
            ),
        }
    }

    /// Writes through the direct path. Undeclared names are declared as
    /// managed properties first. Returns `true` when the value changed.
    pub fn set(&mut self, name: &str, value: Option<PropValue>) -> bool {
        let index = self.slot(name);
        let changed = self.entries[index].1.set(value);
        tracing::trace!(property = name, changed, "direct property write");
        changed
    }

    /// Writes through the composition path. Returns `true` when the value changed.
    pub fn update_managed_property(&mut self, name: &str, value: Option<PropValue>) -> bool {
        let index = self.slot(name);
        let changed = self.entries[index].1.update_managed(value);
        tracing::trace!(property = name, changed, "managed property write");
        changed
    }

    /// Returns the current value of a property.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&PropValue> {
        self.position(name).and_then(|index| self.entries[index].1.get())
    }

    /// Returns the slot of a declared property.
    #[must_use]
    pub fn property(&self, name: &str) -> Option<&Property<PropValue>> {
        self.position(name).map(|index| &self.entries[index].1)
    }

    /// Returns `true` once the direct path has changed `name`.
    #[must_use]
    pub fn is_locally_set(&self, name: &str) -> bool {
        self.property(name).is_some_and(Property::is_locally_set)
    }

    /// Iterates over the properties that currently hold a value, in
    /// declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropValue)> {
        self.entries
            .iter()
            .filter_map(|(name, property)| property.get().map(|value| (name.as_ref(), value)))
    }

    /// Returns the number of declared properties.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when no property has been declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for PropertyDelegate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.entries.iter().map(|(name, property)| (name, property)))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    fn recorder<T: Clone + 'static>() -> (Rc<RefCell<Vec<Option<T>>>>, impl Fn(Option<&T>) + 'static) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        (seen, move |value: Option<&T>| {
            sink.borrow_mut().push(value.cloned());
        })
    }

    #[test]
    fn unchanged_writes_are_elided() {
        let (seen, on_update) = recorder::<i32>();
        let mut count = Property::managed(Some(1), false, on_update);

        assert!(!count.set(Some(1)));
        assert!(seen.borrow().is_empty());
        assert!(!count.is_locally_set());

        assert!(count.set(Some(2)));
        assert_eq!(*seen.borrow(), [Some(2)]);
        assert_eq!(count.get(), Some(&2));
    }

    #[test]
    fn clearing_removes_the_value() {
        let (seen, on_update) = recorder::<String>();
        let mut title = Property::managed(Some("a".to_owned()), false, on_update);
        assert!(title.set(None));
        assert_eq!(title.get(), None);
        assert_eq!(*seen.borrow(), [None]);
    }

    #[test]
    fn skip_update_stores_without_callback() {
        let (seen, on_update) = recorder::<i32>();
        let mut value = Property::managed(None, true, on_update);
        assert!(value.set(Some(3)));
        assert_eq!(value.get(), Some(&3));
        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn managed_updates_reach_untouched_properties() {
        let (seen, on_update) = recorder::<i32>();
        let mut value = Property::managed(Some(0), false, on_update);

        assert!(value.update_managed(Some(1)));
        assert!(value.update_managed(Some(2)));
        assert!(!value.is_locally_set());
        assert_eq!(*seen.borrow(), [Some(1), Some(2)]);
    }

    #[test]
    fn local_write_makes_managed_updates_inert() {
        let (seen, on_update) = recorder::<i32>();
        let mut value = Property::managed(Some(0), false, on_update);

        value.set(Some(5));
        for next in [6, 7, 5, 0] {
            assert!(!value.update_managed(Some(next)));
        }
        assert!(!value.update_managed(None));
        assert_eq!(*seen.borrow(), [Some(5)]);
        assert_eq!(value.get(), Some(&5));
    }

    #[test]
    fn unmanaged_properties_ignore_the_composition_path() {
        let (seen, on_update) = recorder::<i32>();
        let mut value = Property::unmanaged(Some(0), false, on_update);

        assert!(!value.update_managed(Some(1)));
        assert!(value.set(Some(2)));
        assert_eq!(*seen.borrow(), [Some(2)]);
        assert_eq!(value.kind(), PropertyKind::Unmanaged);
    }

    #[test]
    fn delegate_keeps_declaration_order() {
        let mut props = PropertyDelegate::new();
        props.managed_property("id", Some("main".into()), false);
        props.managed_property("class", None, false);
        props.set("title", Some("hello".into()));
        props.set("class", Some("wide".into()));

        let names: Vec<&str> = props.iter().map(|(name, _)| name).collect();
        assert_eq!(names, ["id", "class", "title"]);
        assert_eq!(props.len(), 3);
    }

    #[test]
    fn delegate_routes_changes_to_default_callback() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let mut props = PropertyDelegate::with_default_update(move |name, value| {
            sink.borrow_mut()
                .push((name.to_owned(), value.map(ToString::to_string)));
        });

        props.update_managed_property("value", Some(PropValue::Int(1)));
        props.update_managed_property("value", Some(PropValue::Int(1)));
        props.set("value", Some(PropValue::Int(2)));
        props.update_managed_property("value", Some(PropValue::Int(3)));
        props.set("value", None);

        assert_eq!(
            *seen.borrow(),
            [
                ("value".to_owned(), Some("1".to_owned())),
                ("value".to_owned(), Some("2".to_owned())),
                ("value".to_owned(), None),
            ]
        );
        assert!(props.is_locally_set("value"));
        assert_eq!(props.get("value"), None);
    }

    #[test]
    fn delegate_unmanaged_properties_stay_local() {
        let mut props = PropertyDelegate::new();
        props.unmanaged_property("tabindex", Some(PropValue::Int(0)), false);
        assert!(!props.update_managed_property("tabindex", Some(PropValue::Int(1))));
        assert_eq!(props.get("tabindex"), Some(&PropValue::Int(0)));
    }

    #[test]
    fn attribute_text_for_booleans() {
        assert_eq!(PropValue::Bool(true).to_attribute().as_deref(), Some(""));
        assert_eq!(PropValue::Bool(false).to_attribute(), None);
        assert_eq!(PropValue::from(2.5).to_attribute().as_deref(), Some("2.5"));
    }
}
