//! [FieldElement] and [ErrorMessage] for
//! [web-sys](https://crates.io/crates/web-sys) elements.
//!
//! ```html
//! <input type="text" required data-maxlength="8">
//! <ul>
//!   <li data-error="required">Please enter a value</li>
//!   <li data-error="maxlength">At most 8 characters</li>
//!   <li data-error="minlength">At least 4 characters</li>
//! </ul>
//! ```

use crate::{bind_all, ErrorMessage, FieldBinding, FieldElement, InputHandler};
use std::{cell::RefCell, collections::BTreeMap, rc::Rc};
use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::{Document, Element, Event, HtmlElement, HtmlInputElement};

/// The DOM events that forward the value of a field to its model.
pub const INPUT_EVENTS: [&str; 2] = ["input", "change"];

/// The attribute naming the rule an error message belongs to.
pub const ERROR_TAG_ATTRIBUTE: &str = "data-error";

const DATA_PREFIX: &str = "data-";

type EventClosure = Closure<dyn FnMut(Event)>;

/// An `<input>` element. Event listeners registered through
/// [FieldElement::on_input()] are removed when this is dropped.
pub struct InputElement {
    input: HtmlInputElement,
    listeners: RefCell<Vec<(&'static str, EventClosure)>>,
}

impl InputElement {
    /// Wrap `input`, without listening to it yet.
    pub fn new(input: HtmlInputElement) -> Self {
        Self {
            input,
            listeners: RefCell::new(Vec::new()),
        }
    }

    /// The wrapped `<input>` element.
    pub fn input(&self) -> &HtmlInputElement {
        &self.input
    }
}

impl From<HtmlInputElement> for InputElement {
    fn from(input: HtmlInputElement) -> Self {
        InputElement::new(input)
    }
}

impl FieldElement for InputElement {
    type Message = MessageNode;

    fn value(&self) -> String {
        self.input.value()
    }

    fn data_attributes(&self) -> BTreeMap<String, String> {
        let attributes = self.input.attributes();
        (0..attributes.length())
            .filter_map(|i| attributes.item(i))
            .filter_map(|attr| {
                attr.name()
                    .strip_prefix(DATA_PREFIX)
                    .map(|name| (name.to_owned(), attr.value()))
            })
            .collect()
    }

    fn is_required(&self) -> bool {
        self.input.required()
    }

    fn set_class(&self, class: &str, enabled: bool) {
        let class_list = self.input.class_list();
        let result = if enabled {
            class_list.add_1(class)
        } else {
            class_list.remove_1(class)
        };
        if let Err(error) = result {
            tracing::warn!(class, enabled, ?error, "unable to update class of input element");
        }
    }

    fn error_messages(&self) -> Vec<MessageNode> {
        let container: Element = match self.input.next_element_sibling() {
            Some(container) => container,
            None => return Vec::new(),
        };
        let children = container.children();
        (0..children.length())
            .filter_map(|i| children.item(i))
            .filter_map(|child| child.dyn_into::<HtmlElement>().ok())
            .map(MessageNode::new)
            .collect()
    }

    fn on_input(&self, handler: InputHandler) {
        let handler: Rc<dyn Fn(String)> = Rc::from(handler);
        let mut listeners = self.listeners.borrow_mut();

        for event_type in INPUT_EVENTS.iter().copied() {
            let handler = Rc::clone(&handler);
            let closure = Closure::wrap(Box::new(move |event: Event| {
                match event
                    .current_target()
                    .and_then(|target| target.dyn_into::<HtmlInputElement>().ok())
                {
                    Some(input) => handler(input.value()),
                    None => tracing::warn!(event_type, "input event without an input element target"),
                }
            }) as Box<dyn FnMut(Event)>);

            match self
                .input
                .add_event_listener_with_callback(event_type, closure.as_ref().unchecked_ref())
            {
                Ok(()) => listeners.push((event_type, closure)),
                Err(error) => tracing::warn!(event_type, ?error, "unable to listen to input element"),
            }
        }
    }
}

impl Drop for InputElement {
    fn drop(&mut self) {
        for (event_type, closure) in self.listeners.get_mut().drain(..) {
            if let Err(error) = self
                .input
                .remove_event_listener_with_callback(event_type, closure.as_ref().unchecked_ref())
            {
                tracing::warn!(event_type, ?error, "unable to remove input listener");
            }
        }
    }
}

/// A child of the element following an `<input>`, tagged with the
/// rule it displays the error message for.
#[derive(Debug, Clone)]
pub struct MessageNode {
    element: HtmlElement,
}

impl MessageNode {
    /// Wrap `element`, which should carry a `data-error` attribute.
    pub fn new(element: HtmlElement) -> Self {
        Self { element }
    }
}

impl ErrorMessage for MessageNode {
    fn tag(&self) -> Option<String> {
        self.element.get_attribute(ERROR_TAG_ATTRIBUTE)
    }

    fn set_visible(&self, visible: bool) {
        let style = self.element.style();
        let result = if visible {
            style.remove_property("display").map(|_| ())
        } else {
            style.set_property("display", "none")
        };
        if let Err(error) = result {
            tracing::warn!(visible, ?error, "unable to change visibility of error message");
        }
    }
}

thread_local! {
    static PAGE_BINDINGS: RefCell<Vec<FieldBinding<InputElement>>> = RefCell::new(Vec::new());
}

/// Bind every `<input>` element in `document` with the default
/// [RuleSet](crate::RuleSet).
///
/// The fields are only validated while the returned bindings are
/// alive: dropping them removes the listeners from the elements. To
/// validate for the lifetime of the page, for example from a
/// `#[wasm_bindgen(start)]` function, use [bind_page()].
pub fn bind_document(document: &Document) -> Result<Vec<FieldBinding<InputElement>>, JsValue> {
    let nodes = document.query_selector_all("input")?;
    let inputs = (0..nodes.length())
        .filter_map(|i| nodes.item(i))
        .filter_map(|node| node.dyn_into::<HtmlInputElement>().ok())
        .map(InputElement::new);
    Ok(bind_all(inputs))
}

/// Bind every `<input>` element in `document` like [bind_document()],
/// and keep the bindings alive for the rest of the page's lifetime.
/// Returns the number of fields bound.
pub fn bind_page(document: &Document) -> Result<usize, JsValue> {
    let bindings = bind_document(document)?;
    let count = bindings.len();
    PAGE_BINDINGS.with(|page| page.borrow_mut().extend(bindings));
    Ok(count)
}

/// The number of bindings kept alive by [bind_page()].
pub fn page_binding_count() -> usize {
    PAGE_BINDINGS.with(|page| page.borrow().len())
}
