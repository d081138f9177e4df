use crate::{
    ConfigError, ErrorMessage, FieldConfig, FieldElement, ModelError, RuleSet, ValidationEvent,
    ValidationModel,
};
use std::rc::{Rc, Weak};

/// The class added to an element while its value is invalid.
pub const ERROR_CLASS: &str = "error";

/// Connects one [FieldElement] to its own [ValidationModel].
///
/// Input from the element is forwarded to the model, and the model's
/// [ValidationEvent]s toggle the [ERROR_CLASS] on the element and the
/// visibility of its error messages. The binding owns the model:
/// dropping it detaches the element's input handler from the model.
pub struct FieldBinding<E: FieldElement> {
    view: Rc<FieldView<E>>,
    model: Rc<ValidationModel>,
    config: FieldConfig,
}

/// The display side of a binding, shared with the model's listeners.
struct FieldView<E: FieldElement> {
    element: E,
    messages: Vec<E::Message>,
}

impl<E: FieldElement> FieldView<E> {
    fn show_valid(&self) {
        self.element.set_class(ERROR_CLASS, false);
        self.hide_messages();
    }

    fn show_invalid(&self, errors: &[&'static str]) {
        self.element.set_class(ERROR_CLASS, true);
        self.hide_messages();

        for rule in errors {
            let mut shown = false;
            for message in self.tagged(rule) {
                message.set_visible(true);
                shown = true;
            }
            if !shown {
                tracing::debug!(rule, "no error message tagged for failed rule");
            }
        }
    }

    fn hide_messages(&self) {
        for message in &self.messages {
            message.set_visible(false);
        }
    }

    fn tagged<'a>(&'a self, rule: &'a str) -> impl Iterator<Item = &'a E::Message> + 'a {
        self.messages
            .iter()
            .filter(move |message| message.tag().as_deref() == Some(rule))
    }
}

impl<E> FieldBinding<E>
where
    E: FieldElement + 'static,
{
    /// Bind `element`, validating it against the default [RuleSet].
    /// The element's markup is read into [config()](Self::config) but
    /// does not change the rules.
    pub fn new(element: E) -> Self {
        Self::with_rules(element, RuleSet::default())
    }

    /// Bind `element`, validating it against `rules`.
    pub fn with_rules(element: E, rules: RuleSet) -> Self {
        let config = FieldConfig::from_element(&element);
        Self::attach(element, config, rules)
    }

    /// Bind `element`, validating it against the rules declared in
    /// its own markup (see [RuleSet::from_config()]).
    pub fn from_markup(element: E) -> Result<Self, ConfigError> {
        let config = FieldConfig::from_element(&element);
        let rules = RuleSet::from_config(&config)?;
        Ok(Self::attach(element, config, rules))
    }

    fn attach(element: E, config: FieldConfig, rules: RuleSet) -> Self {
        tracing::debug!(?config, ?rules, "binding field");

        let messages = element.error_messages();
        let view = Rc::new(FieldView { element, messages });
        let model = Rc::new(ValidationModel::with_rules(rules));

        let valid_view = Rc::downgrade(&view);
        model.on(ValidationEvent::Valid, move || {
            if let Some(view) = valid_view.upgrade() {
                view.show_valid();
            }
        });

        let invalid_view = Rc::downgrade(&view);
        let invalid_model = Rc::downgrade(&model);
        model.on(ValidationEvent::Invalid, move || {
            if let (Some(view), Some(model)) = (invalid_view.upgrade(), invalid_model.upgrade()) {
                view.show_invalid(&model.errors());
            }
        });

        let input_model: Weak<ValidationModel> = Rc::downgrade(&model);
        view.element.on_input(Box::new(move |value| {
            if let Some(model) = input_model.upgrade() {
                if let Err(error) = model.set(&value) {
                    tracing::warn!(%error, "dropped field input");
                }
            }
        }));

        Self {
            view,
            model,
            config,
        }
    }
}

impl<E: FieldElement> FieldBinding<E> {
    /// Forward a new value to the model, as the element's input
    /// handler does.
    pub fn on_input(&self, value: &str) -> Result<Option<ValidationEvent>, ModelError> {
        self.model.set(value)
    }

    /// Forward the element's current value to the model, for fields
    /// that were filled in before they were bound.
    pub fn sync(&self) -> Result<Option<ValidationEvent>, ModelError> {
        self.model.set(&self.view.element.value())
    }

    /// Clear the error display: remove the error class and hide every
    /// message.
    pub fn on_valid(&self) {
        self.view.show_valid();
    }

    /// Display the model's errors: add the error class, and show only
    /// the messages tagged with the name of a failed rule. A failed
    /// rule without a tagged message is not displayed.
    pub fn on_invalid(&self) {
        self.view.show_invalid(&self.model.errors());
    }

    /// The model validating this field.
    pub fn model(&self) -> &ValidationModel {
        &self.model
    }

    /// The configuration read from the element's markup when it was
    /// bound.
    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    /// The bound element.
    pub fn element(&self) -> &E {
        &self.view.element
    }
}

/// Bind every element with the default [RuleSet]. The caller keeps
/// the returned bindings alive for as long as the elements should be
/// validated.
pub fn bind_all<E, I>(elements: I) -> Vec<FieldBinding<E>>
where
    E: FieldElement + 'static,
    I: IntoIterator<Item = E>,
{
    let bindings: Vec<FieldBinding<E>> = elements.into_iter().map(FieldBinding::new).collect();
    tracing::debug!(count = bindings.len(), "bound fields");
    bindings
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{
        cell::{Cell, RefCell},
        collections::BTreeMap,
    };

    #[derive(Clone)]
    struct Message {
        tag: Option<String>,
        visible: Rc<Cell<bool>>,
    }

    impl ErrorMessage for Message {
        fn tag(&self) -> Option<String> {
            self.tag.clone()
        }

        fn set_visible(&self, visible: bool) {
            self.visible.set(visible)
        }
    }

    #[derive(Default)]
    struct Element {
        error: Cell<bool>,
        messages: Vec<Message>,
        handlers: RefCell<Vec<crate::InputHandler>>,
    }

    impl FieldElement for Element {
        type Message = Message;

        fn value(&self) -> String {
            String::new()
        }

        fn data_attributes(&self) -> BTreeMap<String, String> {
            BTreeMap::new()
        }

        fn is_required(&self) -> bool {
            true
        }

        fn set_class(&self, class: &str, enabled: bool) {
            assert_eq!(ERROR_CLASS, class);
            self.error.set(enabled);
        }

        fn error_messages(&self) -> Vec<Message> {
            self.messages.clone()
        }

        fn on_input(&self, handler: crate::InputHandler) {
            self.handlers.borrow_mut().push(handler);
        }
    }

    fn message(tag: &str) -> Message {
        Message {
            tag: Some(tag.to_owned()),
            visible: Rc::new(Cell::new(true)),
        }
    }

    #[test]
    fn model_events_drive_the_view() {
        let required = message("required");
        let element = Element {
            messages: vec![required.clone()],
            ..Element::default()
        };
        let binding = FieldBinding::new(element);

        binding.on_input("ab").unwrap();
        assert!(binding.element().error.get());
        assert!(!required.visible.get());

        binding.on_input("").unwrap();
        assert!(required.visible.get());

        binding.on_input("abcd").unwrap();
        assert!(!binding.element().error.get());
        assert!(!required.visible.get());
    }

    #[test]
    fn registers_one_listener_per_event_and_one_input_handler() {
        let binding = FieldBinding::new(Element::default());
        assert_eq!(1, binding.model().listener_count(ValidationEvent::Valid));
        assert_eq!(1, binding.model().listener_count(ValidationEvent::Invalid));
        assert_eq!(1, binding.element().handlers.borrow().len());
        assert!(binding.config().required);
    }

    #[test]
    fn untagged_messages_stay_hidden() {
        let untagged = Message {
            tag: None,
            visible: Rc::new(Cell::new(true)),
        };
        let element = Element {
            messages: vec![untagged.clone()],
            ..Element::default()
        };
        let binding = FieldBinding::new(element);

        binding.on_input("a").unwrap();
        assert!(!untagged.visible.get());
    }

    #[test]
    fn bind_all_creates_independent_models() {
        let bindings = bind_all(vec![Element::default(), Element::default()]);
        assert_eq!(2, bindings.len());

        bindings[0].on_input("abcd").unwrap();
        assert_eq!("abcd", bindings[0].model().value());
        assert_eq!("", bindings[1].model().value());
        assert_eq!(None, bindings[1].model().state());
    }
}
