use std::collections::HashMap;
use std::hash::Hash;
use std::rc::Rc;

use yew::prelude::*;

pub const REQUIRED_MESSAGE: &str = "This field is required";

#[derive(Clone, Debug, PartialEq)]
pub enum FieldValue {
    Text(String),
    Number(f64),
}

impl FieldValue {
    fn is_blank(&self) -> bool {
        matches!(self, FieldValue::Text(text) if text.is_empty())
    }

    pub fn as_input(&self) -> String {
        match self {
            FieldValue::Text(text) => text.clone(),
            FieldValue::Number(number) => number.to_string(),
        }
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Number(value)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Number,
    Date,
    Select,
    Password,
}

impl FieldKind {
    fn input_type(&self) -> &'static str {
        match self {
            FieldKind::Text | FieldKind::Select => "text",
            FieldKind::Number => "number",
            FieldKind::Date => "date",
            FieldKind::Password => "password",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

impl SelectOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// One form field, keyed by a resource-specific enum so schemas are checked at compile time.
#[derive(Clone, Debug, PartialEq)]
pub struct FieldDef<K> {
    pub key: K,
    pub label: &'static str,
    pub kind: FieldKind,
    pub options: Vec<SelectOption>,
    pub required: bool,
}

impl<K> FieldDef<K> {
    fn new(key: K, label: &'static str, kind: FieldKind) -> Self {
        Self {
            key,
            label,
            kind,
            options: Vec::new(),
            required: false,
        }
    }

    pub fn text(key: K, label: &'static str) -> Self {
        Self::new(key, label, FieldKind::Text)
    }

    pub fn number(key: K, label: &'static str) -> Self {
        Self::new(key, label, FieldKind::Number)
    }

    pub fn date(key: K, label: &'static str) -> Self {
        Self::new(key, label, FieldKind::Date)
    }

    pub fn password(key: K, label: &'static str) -> Self {
        Self::new(key, label, FieldKind::Password)
    }

    pub fn select(key: K, label: &'static str, options: Vec<SelectOption>) -> Self {
        Self {
            options,
            ..Self::new(key, label, FieldKind::Select)
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    fn default_value(&self) -> FieldValue {
        match self.kind {
            FieldKind::Number => FieldValue::Number(0.0),
            _ => FieldValue::Text(String::new()),
        }
    }

    fn parse_input(&self, raw: String) -> FieldValue {
        match self.kind {
            FieldKind::Number => raw
                .trim()
                .parse::<f64>()
                .map(FieldValue::Number)
                .unwrap_or(FieldValue::Text(raw)),
            _ => FieldValue::Text(raw),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct FormValues<K: Eq + Hash>(HashMap<K, FieldValue>);

impl<K: Eq + Hash> Default for FormValues<K> {
    fn default() -> Self {
        Self(HashMap::new())
    }
}

impl<K: Copy + Eq + Hash> FormValues<K> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: K, value: impl Into<FieldValue>) -> Self {
        self.set(key, value);
        self
    }

    pub fn set(&mut self, key: K, value: impl Into<FieldValue>) {
        self.0.insert(key, value.into());
    }

    pub fn get(&self, key: K) -> Option<&FieldValue> {
        self.0.get(&key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn text(&self, key: K) -> String {
        self.get(key).map(FieldValue::as_input).unwrap_or_default()
    }

    /// Trimmed text, or `None` when blank.
    pub fn optional_text(&self, key: K) -> Option<String> {
        let text = self.text(key);
        let trimmed = text.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    }

    pub fn number(&self, key: K) -> f64 {
        match self.get(key) {
            Some(FieldValue::Number(number)) => *number,
            Some(FieldValue::Text(text)) => text.trim().parse().unwrap_or(0.0),
            None => 0.0,
        }
    }
}

/// What the modal hands back on submit.
#[derive(Clone, Debug, PartialEq)]
pub enum ModalOutcome<K: Eq + Hash> {
    /// Confirm-only mode: the user accepted, no data attached.
    Confirmed,
    Saved(FormValues<K>),
}

/// Values being edited plus per-field validation errors.
#[derive(Clone, Debug, PartialEq)]
pub struct FormDraft<K: Eq + Hash> {
    values: FormValues<K>,
    errors: HashMap<K, String>,
}

impl<K: Eq + Hash> Default for FormDraft<K> {
    fn default() -> Self {
        Self {
            values: FormValues::default(),
            errors: HashMap::new(),
        }
    }
}

impl<K: Copy + Eq + Hash> FormDraft<K> {
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Seeds the draft from `initial` and per-kind defaults. A draft that already
    /// holds values is left alone, so unsaved edits survive new initial data.
    pub fn initialize(&mut self, fields: &[FieldDef<K>], initial: Option<&FormValues<K>>) -> bool {
        if !self.is_empty() {
            return false;
        }
        for field in fields {
            let value = initial
                .and_then(|initial| initial.get(field.key))
                .cloned()
                .unwrap_or_else(|| field.default_value());
            self.values.set(field.key, value);
        }
        self.errors.clear();
        true
    }

    pub fn edit(&mut self, key: K, value: FieldValue) {
        self.values.set(key, value);
        self.errors.remove(&key);
    }

    /// Validates required fields; `None` means submission was blocked.
    pub fn submit(&mut self, fields: &[FieldDef<K>], confirm_only: bool) -> Option<ModalOutcome<K>> {
        if confirm_only {
            return Some(ModalOutcome::Confirmed);
        }
        let mut errors = HashMap::new();
        for field in fields.iter().filter(|field| field.required) {
            if self.values.get(field.key).map_or(true, FieldValue::is_blank) {
                errors.insert(field.key, REQUIRED_MESSAGE.to_string());
            }
        }
        if !errors.is_empty() {
            self.errors = errors;
            return None;
        }
        Some(ModalOutcome::Saved(self.values.clone()))
    }

    pub fn value(&self, key: K) -> Option<&FieldValue> {
        self.values.get(key)
    }

    pub fn error(&self, key: K) -> Option<&str> {
        self.errors.get(&key).map(String::as_str)
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

#[derive(Properties, PartialEq)]
pub struct FormModalProps<K: Copy + Eq + Hash + 'static> {
    pub open: bool,
    pub title: String,
    #[prop_or_default]
    pub fields: Rc<Vec<FieldDef<K>>>,
    #[prop_or_default]
    pub initial: Option<Rc<FormValues<K>>>,
    #[prop_or_default]
    pub confirm_only: bool,
    #[prop_or_default]
    pub confirm_message: Option<String>,
    /// Disables the submit button while the caller's request is in flight.
    #[prop_or_default]
    pub busy: bool,
    #[prop_or_default]
    pub error: Option<String>,
    pub on_close: Callback<()>,
    pub on_submit: Callback<ModalOutcome<K>>,
    #[prop_or_default]
    pub children: Children,
}

const INPUT_CLASS: &str = "w-full px-4 py-2 bg-transparent border rounded-lg focus:outline-none focus:ring-2";

#[function_component(FormModal)]
pub fn form_modal<K>(props: &FormModalProps<K>) -> Html
where
    K: Copy + Eq + Hash + 'static,
{
    let draft = use_state(FormDraft::<K>::default);

    {
        let draft = draft.clone();
        let fields = props.fields.clone();
        let initial = props.initial.clone();
        let confirm_only = props.confirm_only;
        use_effect_with_deps(
            move |open| {
                if *open && !confirm_only && draft.is_empty() {
                    let mut next = (*draft).clone();
                    next.initialize(&fields, initial.as_deref());
                    draft.set(next);
                } else if !*open && !draft.is_empty() {
                    draft.set(FormDraft::default());
                }
                || ()
            },
            props.open,
        );
    }

    if !props.open {
        return html! {};
    }

    let on_cancel = {
        let on_close = props.on_close.clone();
        Callback::from(move |_| on_close.emit(()))
    };

    let on_submit = {
        let draft = draft.clone();
        let fields = props.fields.clone();
        let confirm_only = props.confirm_only;
        let on_submit = props.on_submit.clone();
        Callback::from(move |_| {
            let mut next = (*draft).clone();
            let outcome = next.submit(&fields, confirm_only);
            draft.set(next);
            if let Some(outcome) = outcome {
                on_submit.emit(outcome);
            }
        })
    };

    let body = if props.confirm_only {
        html! {
            <p class="py-2">{ props.confirm_message.clone().unwrap_or_else(|| "Are you sure?".to_string()) }</p>
        }
    } else {
        html! {
            <div class="flex flex-col gap-4">
                { for props.fields.iter().map(|field| render_field(field, &draft)) }
                { for props.children.iter() }
            </div>
        }
    };

    html! {
        <div class="fixed inset-0 z-50 flex items-center justify-center bg-black/50 p-4">
            <div class="w-full max-w-lg rounded-2xl shadow-lg p-6 max-h-[90vh] overflow-y-auto" style="background-color: var(--color-paper); color: var(--color-text);">
                <h2 class="text-xl font-bold mb-4">{ props.title.clone() }</h2>
                { body }
                if let Some(message) = &props.error {
                    <div class="mt-4 text-sm text-red-500">{ message.clone() }</div>
                }
                <div class="flex justify-end gap-3 mt-6">
                    <button type="button" onclick={on_cancel} class="px-4 py-2 rounded-lg font-semibold hover:opacity-80">{"Cancel"}</button>
                    <button type="button" onclick={on_submit} disabled={props.busy}
                        class="px-4 py-2 rounded-lg font-semibold text-white disabled:opacity-50" style="background-color: var(--color-primary-light);">
                        { if props.busy { "Please wait..." } else if props.confirm_only { "Accept" } else { "Save" } }
                    </button>
                </div>
            </div>
        </div>
    }
}

fn render_field<K>(field: &FieldDef<K>, draft: &UseStateHandle<FormDraft<K>>) -> Html
where
    K: Copy + Eq + Hash + 'static,
{
    let value = draft.value(field.key).map(FieldValue::as_input).unwrap_or_default();
    let error = draft.error(field.key).map(str::to_string);
    let border = if error.is_some() { "border-red-500" } else { "border-border" };

    let control = if field.kind == FieldKind::Select {
        let onchange = {
            let draft = draft.clone();
            let field = field.clone();
            Callback::from(move |e: Event| {
                let input: web_sys::HtmlSelectElement = e.target_unchecked_into();
                let mut next = (*draft).clone();
                next.edit(field.key, field.parse_input(input.value()));
                draft.set(next);
            })
        };
        html! {
            <select class={classes!(INPUT_CLASS, border)} {onchange}>
                <option value="" selected={value.is_empty()} disabled={true}>{ format!("Select {}", field.label.to_lowercase()) }</option>
                { for field.options.iter().map(|option| html! {
                    <option value={option.value.clone()} selected={option.value == value}>{ option.label.clone() }</option>
                }) }
            </select>
        }
    } else {
        let oninput = {
            let draft = draft.clone();
            let field = field.clone();
            Callback::from(move |e: InputEvent| {
                let input: web_sys::HtmlInputElement = e.target_unchecked_into();
                let mut next = (*draft).clone();
                next.edit(field.key, field.parse_input(input.value()));
                draft.set(next);
            })
        };
        html! {
            <input type={field.kind.input_type()} class={classes!(INPUT_CLASS, border)} {value} {oninput} />
        }
    };

    html! {
        <div class="space-y-1">
            <label class="text-sm font-medium">
                { field.label }
                if field.required { <span class="text-red-500">{" *"}</span> }
            </label>
            { control }
            if let Some(message) = error {
                <p class="text-xs text-red-500">{ message }</p>
            }
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    enum Key {
        Name,
        Amount,
        Kind,
        Notes,
    }

    fn fields() -> Vec<FieldDef<Key>> {
        vec![
            FieldDef::text(Key::Name, "Name").required(),
            FieldDef::number(Key::Amount, "Amount").required(),
            FieldDef::select(Key::Kind, "Kind", vec![SelectOption::new("0", "Zero")]).required(),
            FieldDef::text(Key::Notes, "Notes"),
        ]
    }

    #[test]
    fn defaults_fill_unmapped_fields() {
        let mut draft = FormDraft::default();
        assert!(draft.initialize(&fields(), None));
        assert_eq!(draft.value(Key::Name), Some(&FieldValue::Text(String::new())));
        assert_eq!(draft.value(Key::Amount), Some(&FieldValue::Number(0.0)));
        assert_eq!(draft.value(Key::Notes), Some(&FieldValue::Text(String::new())));
    }

    #[test]
    fn initial_record_prefills_fields() {
        let initial = FormValues::new().with(Key::Name, "Rent").with(Key::Kind, "0");
        let mut draft = FormDraft::default();
        draft.initialize(&fields(), Some(&initial));
        assert_eq!(draft.value(Key::Name), Some(&FieldValue::from("Rent")));
        assert_eq!(draft.value(Key::Kind), Some(&FieldValue::from("0")));
        assert_eq!(draft.value(Key::Amount), Some(&FieldValue::Number(0.0)));
    }

    #[test]
    fn initialization_does_not_clobber_edits() {
        let mut draft = FormDraft::default();
        draft.initialize(&fields(), None);
        draft.edit(Key::Name, "typed".into());
        let other = FormValues::new().with(Key::Name, "Other record");
        assert!(!draft.initialize(&fields(), Some(&other)));
        assert_eq!(draft.value(Key::Name), Some(&FieldValue::from("typed")));
    }

    #[test]
    fn missing_required_field_blocks_submit() {
        let mut draft = FormDraft::default();
        draft.initialize(&fields(), None);
        draft.edit(Key::Kind, "0".into());
        assert_eq!(draft.submit(&fields(), false), None);
        assert_eq!(draft.error(Key::Name), Some(REQUIRED_MESSAGE));
        assert_eq!(draft.error(Key::Amount), None);
        assert_eq!(draft.error(Key::Kind), None);
        assert_eq!(draft.error(Key::Notes), None);

        draft.edit(Key::Name, "R".into());
        assert_eq!(draft.error(Key::Name), None);
        assert!(!draft.has_errors());
    }

    #[test]
    fn edit_only_clears_its_own_error() {
        let mut draft = FormDraft::default();
        draft.initialize(&fields(), None);
        draft.submit(&fields(), false);
        assert!(draft.error(Key::Name).is_some());
        assert!(draft.error(Key::Kind).is_some());
        draft.edit(Key::Name, "x".into());
        assert!(draft.error(Key::Name).is_none());
        assert!(draft.error(Key::Kind).is_some());
    }

    #[test]
    fn complete_form_hands_back_values() {
        let mut draft = FormDraft::default();
        draft.initialize(&fields(), None);
        draft.edit(Key::Name, "Rent".into());
        draft.edit(Key::Amount, FieldValue::Number(250.0));
        draft.edit(Key::Kind, "0".into());
        match draft.submit(&fields(), false) {
            Some(ModalOutcome::Saved(values)) => {
                assert_eq!(values.text(Key::Name), "Rent");
                assert_eq!(values.number(Key::Amount), 250.0);
                assert_eq!(values.optional_text(Key::Notes), None);
            }
            other => panic!("unexpected outcome {:?}", other),
        }
    }

    #[test]
    fn confirm_only_skips_validation() {
        let mut empty = FormDraft::<Key>::default();
        assert_eq!(empty.submit(&fields(), true), Some(ModalOutcome::Confirmed));
        assert!(!empty.has_errors());

        let mut filled = FormDraft::default();
        filled.initialize(&fields(), None);
        assert_eq!(filled.submit(&fields(), true), Some(ModalOutcome::Confirmed));
    }

    #[test]
    fn number_input_parsing() {
        let field = FieldDef::number(Key::Amount, "Amount");
        assert_eq!(field.parse_input("12.5".into()), FieldValue::Number(12.5));
        assert_eq!(field.parse_input("".into()), FieldValue::Text(String::new()));
        let values = FormValues::new().with(Key::Amount, "");
        assert_eq!(values.number(Key::Amount), 0.0);
    }
}
