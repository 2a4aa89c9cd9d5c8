#![forbid(unsafe_code)]

//! Profile screen: a greeting label, an editable name field and a
//! newsletter toggle.

use okbind_core::{BindingComponent, BindingError, ConverterExt, Observable};
use okbind_widgets::{
    TextExpressionExt, TextField, TextInputExt, Toggle, ToggleExpressionExt, ToggleInputExt,
};

pub struct ProfileViewModel {
    pub name: Observable<String>,
    pub subscribed: Observable<bool>,
}

impl ProfileViewModel {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Observable::with_default(name.into(), String::from("anonymous")),
            subscribed: Observable::new(false),
        }
    }
}

pub struct ProfileScreen {
    pub component: BindingComponent<ProfileViewModel>,
    pub greeting: TextField,
    pub name_input: TextField,
    pub subscribed: Toggle,
    pub status: TextField,
}

impl ProfileScreen {
    pub fn new(view_model: ProfileViewModel) -> Result<Self, BindingError> {
        let greeting = TextField::new();
        let name_input = TextField::new();
        let subscribed = Toggle::new();
        let status = TextField::new();
        let mut component = BindingComponent::new(view_model);

        let hello = component
            .bind(|vm| &vm.name)
            .on(|name| format!("Hello, {name}"))
            .to_text(&greeting);
        let name = component
            .bind(|vm| &vm.name)
            .on_self()
            .to_text(&name_input)
            .two_way()?
            .to_field_from_text();
        let toggle = component
            .bind(|vm| &vm.subscribed)
            .on_self()
            .to_checked(&subscribed)
            .two_way()?
            .to_field_from_toggle();
        let summary = component
            .bind(|vm| &vm.subscribed)
            .on(|on| (if on { "subscribed" } else { "not subscribed" }).to_string())
            .to_text(&status);
        component.hold(hello).hold(name).hold(toggle).hold(summary);

        Ok(Self {
            component,
            greeting,
            name_input,
            subscribed,
            status,
        })
    }
}
