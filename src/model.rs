use crate::{EventEmitter, Listener, ModelError, RuleSet, ValidationEvent};
use std::cell::{Cell, RefCell};

/// The value of a single field, the rules it is checked against, and
/// the listeners notified of the outcome of each check.
///
/// All methods take `&self` so that a model can be shared (usually in
/// an `Rc`) between the code feeding it input and the listeners
/// reacting to its events. Listeners may read the model while they
/// are being notified, but may not update it: [set()](Self::set) and
/// [validate()](Self::validate) return [ModelError::Reentrant] during
/// dispatch.
///
/// ## Example
/// ```
/// use field_validation::{ValidationEvent, ValidationModel};
/// use std::rc::Rc;
///
/// let model = Rc::new(ValidationModel::new());
///
/// let weak = Rc::downgrade(&model);
/// model.on(ValidationEvent::Invalid, move || {
///     let model = weak.upgrade().unwrap();
///     println!("invalid: {:?}", model.errors());
/// });
///
/// assert_eq!(Ok(Some(ValidationEvent::Invalid)), model.set("abc"));
/// assert_eq!(vec!["minlength"], model.errors());
///
/// assert_eq!(Ok(Some(ValidationEvent::Valid)), model.set("abcd"));
/// assert!(model.errors().is_empty());
///
/// // unchanged value, nothing happens
/// assert_eq!(Ok(None), model.set("abcd"));
/// ```
#[derive(Debug)]
pub struct ValidationModel {
    value: RefCell<String>,
    rules: RuleSet,
    errors: RefCell<Vec<&'static str>>,
    state: Cell<Option<ValidationEvent>>,
    listeners: RefCell<EventEmitter>,
    dispatching: Cell<bool>,
}

impl ValidationModel {
    /// Create a new `ValidationModel` with an empty value and the
    /// default [RuleSet].
    pub fn new() -> Self {
        Self::with_rules(RuleSet::default())
    }

    /// Create a new `ValidationModel` with an empty value, checked
    /// against `rules`.
    pub fn with_rules(rules: RuleSet) -> Self {
        Self {
            value: RefCell::new(String::new()),
            rules,
            errors: RefCell::new(Vec::new()),
            state: Cell::new(None),
            listeners: RefCell::new(EventEmitter::new()),
            dispatching: Cell::new(false),
        }
    }

    /// Register a listener for `event`. Listeners are called in the
    /// order they were registered. A listener registered while the
    /// model is notifying is first called on the next notification.
    pub fn on<L: Into<Listener>>(&self, event: ValidationEvent, listener: L) {
        self.listeners.borrow_mut().on(event, listener);
    }

    /// Remove a previously registered listener (or a clone of it) from
    /// the list for `event`. Returns `false` if it was not registered.
    /// A listener removed while the model is notifying is still called
    /// during that notification.
    ///
    /// ## Example
    /// ```
    /// use field_validation::{Listener, ValidationEvent, ValidationModel};
    ///
    /// let model = ValidationModel::new();
    /// let listener = Listener::new(|| println!("invalid"));
    /// model.on(ValidationEvent::Invalid, listener.clone());
    ///
    /// assert!(model.off(ValidationEvent::Invalid, &listener));
    /// assert!(!model.off(ValidationEvent::Invalid, &listener));
    /// assert_eq!(0, model.listener_count(ValidationEvent::Invalid));
    /// ```
    pub fn off(&self, event: ValidationEvent, listener: &Listener) -> bool {
        self.listeners.borrow_mut().off(event, listener)
    }

    /// Register a listener for the event called `name`.
    ///
    /// ## Example
    /// ```
    /// use field_validation::{ModelError, ValidationModel};
    ///
    /// let model = ValidationModel::new();
    /// assert!(model.on_named("valid", || ()).is_ok());
    /// assert_eq!(
    ///     Err(ModelError::invalid_event("submit")),
    ///     model.on_named("submit", || ())
    /// );
    /// ```
    pub fn on_named<L: Into<Listener>>(&self, name: &str, listener: L) -> Result<(), ModelError> {
        let event: ValidationEvent = name.parse()?;
        self.on(event, listener);
        Ok(())
    }

    /// Update the value and validate it. Returns the event that was
    /// triggered, or `None` if `value` equals the current value, in
    /// which case nothing is recomputed and no listener is called.
    pub fn set(&self, value: &str) -> Result<Option<ValidationEvent>, ModelError> {
        self.check_not_dispatching()?;

        if *self.value.borrow() == value {
            tracing::trace!(value, "value unchanged, skipping validation");
            return Ok(None);
        }

        self.value.replace(value.to_owned());
        self.validate().map(Some)
    }

    /// Run every rule against the current value, record the names of
    /// the failing rules, and notify the listeners of
    /// [ValidationEvent::Valid] if none failed, otherwise of
    /// [ValidationEvent::Invalid].
    pub fn validate(&self) -> Result<ValidationEvent, ModelError> {
        self.check_not_dispatching()?;

        let errors = self.rules.evaluate(&self.value.borrow());
        let event = if errors.is_empty() {
            ValidationEvent::Valid
        } else {
            ValidationEvent::Invalid
        };
        tracing::debug!(%event, ?errors, "validated field value");

        self.errors.replace(errors);
        self.state.set(Some(event));
        self.trigger(event);

        Ok(event)
    }

    fn trigger(&self, event: ValidationEvent) {
        // snapshot, so listeners can register or remove listeners
        let listeners = self.listeners.borrow().clone();
        let _guard = DispatchGuard::enter(&self.dispatching);
        listeners.trigger(event);
    }

    fn check_not_dispatching(&self) -> Result<(), ModelError> {
        if self.dispatching.get() {
            tracing::warn!("rejected update of a validation model from its own listener");
            return Err(ModelError::Reentrant);
        }
        Ok(())
    }

    /// The current value.
    pub fn value(&self) -> String {
        self.value.borrow().clone()
    }

    /// The names of the rules that failed during the most recent
    /// validation, in rule order.
    pub fn errors(&self) -> Vec<&'static str> {
        self.errors.borrow().clone()
    }

    /// The rules the value is checked against.
    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// The event triggered by the most recent validation, or `None`
    /// if the model has not been validated yet.
    pub fn state(&self) -> Option<ValidationEvent> {
        self.state.get()
    }

    /// Returns `true` if the most recent validation passed.
    pub fn is_valid(&self) -> bool {
        self.state() == Some(ValidationEvent::Valid)
    }

    /// The number of listeners registered for `event`.
    pub fn listener_count(&self, event: ValidationEvent) -> usize {
        self.listeners.borrow().listeners(event).len()
    }

    /// Returns `true` while listeners are being notified.
    pub fn is_dispatching(&self) -> bool {
        self.dispatching.get()
    }
}

impl Default for ValidationModel {
    fn default() -> Self {
        ValidationModel::new()
    }
}

/// Marks a model as dispatching until dropped, including when a
/// listener panics.
struct DispatchGuard<'a> {
    flag: &'a Cell<bool>,
    previous: bool,
}

impl<'a> DispatchGuard<'a> {
    fn enter(flag: &'a Cell<bool>) -> Self {
        let previous = flag.replace(true);
        Self { flag, previous }
    }
}

impl Drop for DispatchGuard<'_> {
    fn drop(&mut self) {
        self.flag.set(self.previous);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Rule;
    use std::{
        panic::{catch_unwind, AssertUnwindSafe},
        rc::Rc,
    };

    fn recorder(model: &ValidationModel) -> Rc<RefCell<Vec<ValidationEvent>>> {
        let events = Rc::new(RefCell::new(Vec::new()));
        for event in ValidationEvent::ALL.iter().copied() {
            let e = events.clone();
            model.on(event, move || e.borrow_mut().push(event));
        }
        events
    }

    #[test]
    fn new_model_is_empty_and_unvalidated() {
        let model = ValidationModel::new();
        assert_eq!("", model.value());
        assert!(model.errors().is_empty());
        assert_eq!(None, model.state());
        assert!(!model.is_valid());
        assert_eq!(&RuleSet::default(), model.rules());
    }

    #[test]
    fn validate_empty_value() {
        let model = ValidationModel::new();
        let events = recorder(&model);

        assert_eq!(Ok(ValidationEvent::Invalid), model.validate());
        assert_eq!(vec!["required", "minlength"], model.errors());
        assert_eq!(vec![ValidationEvent::Invalid], *events.borrow());
    }

    #[test]
    fn setting_same_value_twice_validates_once() {
        let model = ValidationModel::new();
        let events = recorder(&model);

        assert_eq!(Ok(Some(ValidationEvent::Valid)), model.set("abcd"));
        assert_eq!(Ok(None), model.set("abcd"));
        assert_eq!(vec![ValidationEvent::Valid], *events.borrow());
    }

    #[test]
    fn setting_initial_empty_value_is_a_no_op() {
        let model = ValidationModel::new();
        let events = recorder(&model);

        assert_eq!(Ok(None), model.set(""));
        assert!(events.borrow().is_empty());
        assert_eq!(None, model.state());
    }

    #[test]
    fn errors_empty_iff_last_event_valid() {
        let model = ValidationModel::new();
        let events = recorder(&model);

        for value in &["a", "abcd", "abcdefghi", "", "abcdefgh", "abc"] {
            model.set(value).unwrap();
            let last = *events.borrow().last().unwrap();
            assert_eq!(model.errors().is_empty(), last == ValidationEvent::Valid);
            assert_eq!(model.is_valid(), last == ValidationEvent::Valid);
        }
    }

    #[test]
    fn listeners_called_in_registration_order() {
        let model = ValidationModel::new();
        let calls = Rc::new(RefCell::new(Vec::new()));
        for i in 0..5 {
            let c = calls.clone();
            model.on(ValidationEvent::Invalid, move || c.borrow_mut().push(i));
        }

        model.set("x").unwrap();
        assert_eq!(vec![0, 1, 2, 3, 4], *calls.borrow());
        assert_eq!(5, model.listener_count(ValidationEvent::Invalid));
        assert_eq!(0, model.listener_count(ValidationEvent::Valid));
    }

    #[test]
    fn surrogate_pairs_exceed_maxlength() {
        let model = ValidationModel::new();
        let events = recorder(&model);

        assert_eq!(Ok(Some(ValidationEvent::Invalid)), model.set("😀😀😀😀😀"));
        assert_eq!(vec!["maxlength"], model.errors());
        assert_eq!(Ok(Some(ValidationEvent::Valid)), model.set("😀😀"));
        assert_eq!(vec![ValidationEvent::Invalid, ValidationEvent::Valid], *events.borrow());
    }

    #[test]
    fn removed_listener_is_not_called() {
        let model = ValidationModel::new();
        let calls = Rc::new(Cell::new(0));
        let c = calls.clone();
        let listener = Listener::new(move || c.set(c.get() + 1));
        model.on(ValidationEvent::Invalid, listener.clone());

        model.set("a").unwrap();
        assert!(model.off(ValidationEvent::Invalid, &listener));
        assert!(!model.off(ValidationEvent::Valid, &listener));
        model.set("b").unwrap();

        assert_eq!(1, calls.get());
    }

    #[test]
    fn listener_removed_during_dispatch_runs_until_next_time() {
        let model = Rc::new(ValidationModel::new());
        let calls = Rc::new(Cell::new(0));

        let c = calls.clone();
        let second = Listener::new(move || c.set(c.get() + 1));
        let weak = Rc::downgrade(&model);
        let removed = second.clone();
        model.on(ValidationEvent::Invalid, move || {
            weak.upgrade().unwrap().off(ValidationEvent::Invalid, &removed);
        });
        model.on(ValidationEvent::Invalid, second);

        model.set("a").unwrap();
        assert_eq!(1, calls.get());
        assert_eq!(1, model.listener_count(ValidationEvent::Invalid));

        model.set("b").unwrap();
        assert_eq!(1, calls.get());
    }

    #[test]
    fn custom_rules() {
        let model = ValidationModel::with_rules(RuleSet::new().rule(Rule::MaxLength(2)));
        assert_eq!(Ok(Some(ValidationEvent::Valid)), model.set("ab"));
        assert_eq!(Ok(Some(ValidationEvent::Invalid)), model.set("abc"));
        assert_eq!(vec!["maxlength"], model.errors());
        // without a required rule the empty value passes
        assert_eq!(Ok(Some(ValidationEvent::Valid)), model.set(""));
    }

    #[test]
    fn set_from_listener_is_rejected() {
        let model = Rc::new(ValidationModel::new());
        let result = Rc::new(RefCell::new(None));

        let weak = Rc::downgrade(&model);
        let r = result.clone();
        model.on(ValidationEvent::Invalid, move || {
            let model = weak.upgrade().unwrap();
            assert!(model.is_dispatching());
            *r.borrow_mut() = Some((model.set("abcd"), model.validate(), model.errors()));
        });

        assert_eq!(Ok(Some(ValidationEvent::Invalid)), model.set("a"));
        assert_eq!(
            Some((
                Err(ModelError::Reentrant),
                Err(ModelError::Reentrant),
                vec!["minlength"]
            )),
            *result.borrow()
        );
        assert_eq!("a", model.value());
        assert!(!model.is_dispatching());
    }

    #[test]
    fn listener_registered_during_dispatch_runs_next_time() {
        let model = Rc::new(ValidationModel::new());
        let late_calls = Rc::new(Cell::new(0));

        let weak = Rc::downgrade(&model);
        let late = late_calls.clone();
        model.on(ValidationEvent::Invalid, move || {
            let model = weak.upgrade().unwrap();
            let late = late.clone();
            model.on(ValidationEvent::Invalid, move || late.set(late.get() + 1));
        });

        model.set("a").unwrap();
        assert_eq!(0, late_calls.get());
        assert_eq!(2, model.listener_count(ValidationEvent::Invalid));

        model.set("b").unwrap();
        assert_eq!(1, late_calls.get());
    }

    #[test]
    fn panicking_listener_propagates_and_model_recovers() {
        let model = ValidationModel::new();
        model.on(ValidationEvent::Invalid, || panic!("listener failed"));

        let result = catch_unwind(AssertUnwindSafe(|| model.set("a")));
        assert!(result.is_err());
        assert!(!model.is_dispatching());
        assert_eq!(vec!["minlength"], model.errors());

        assert_eq!(Ok(Some(ValidationEvent::Valid)), model.set("abcd"));
    }
}
