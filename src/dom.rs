use std::collections::BTreeMap;

/// The handler a [FieldElement] calls with the current value whenever
/// the user changes the field.
pub type InputHandler = Box<dyn Fn(String)>;

/// An input element that a [FieldBinding](crate::FieldBinding) can be
/// attached to.
///
/// Methods take `&self` because element handles are shared: the
/// binding, its model listeners and the element's own input handlers
/// all refer to the same element.
pub trait FieldElement {
    /// A node displaying the error message for one rule.
    type Message: ErrorMessage;

    /// The current value of the field.
    fn value(&self) -> String;

    /// The `data-*` attributes of the element, keyed by attribute name
    /// without the `data-` prefix.
    fn data_attributes(&self) -> BTreeMap<String, String>;

    /// Whether the element is marked as required.
    fn is_required(&self) -> bool;

    /// Add (`enabled == true`) or remove a class from the element.
    fn set_class(&self, class: &str, enabled: bool);

    /// The error message nodes for this element: the children of the
    /// element immediately following it.
    fn error_messages(&self) -> Vec<Self::Message>;

    /// Register a handler called with the new value on every input or
    /// change of the field.
    fn on_input(&self, handler: InputHandler);
}

/// A node displaying the error message for a single rule.
pub trait ErrorMessage {
    /// The name of the rule this message belongs to, if the node is
    /// tagged with one.
    fn tag(&self) -> Option<String>;

    /// Show or hide the message.
    fn set_visible(&self, visible: bool);
}
