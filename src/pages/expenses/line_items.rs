use std::cell::Cell;
use std::rc::Rc;

use yew::prelude::*;

use crate::api::expense::{ExpenseDetail, ExpenseDetailDto, ExpenseHeader};
use crate::components::icons::{icon_minus, icon_plus};
use crate::format::format_currency;
use crate::pages::crud::Lookup;

pub const NO_VALID_ITEMS: &str =
    "Add at least one line item with an expense type and an amount greater than zero";

#[derive(Clone, Debug, Default, PartialEq)]
pub struct LineItem {
    /// Set when the item already exists on the server.
    pub id: Option<String>,
    pub expense_type_id: String,
    pub amount: f64,
}

impl LineItem {
    pub fn is_valid(&self) -> bool {
        !self.expense_type_id.trim().is_empty() && self.amount > 0.0
    }
}

/// Ordered line items of one expense. Never empty.
#[derive(Clone, Debug, PartialEq)]
pub struct LineItems(Vec<LineItem>);

impl Default for LineItems {
    fn default() -> Self {
        Self(vec![LineItem::default()])
    }
}

impl LineItems {
    pub fn from_details(details: &[ExpenseDetail]) -> Self {
        if details.is_empty() {
            return Self::default();
        }
        Self(
            details
                .iter()
                .map(|detail| LineItem {
                    id: Some(detail.id.clone()),
                    expense_type_id: detail.expense_type_id.clone(),
                    amount: detail.amount,
                })
                .collect(),
        )
    }

    pub fn items(&self) -> &[LineItem] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn can_remove(&self) -> bool {
        self.0.len() > 1
    }

    pub fn add(&mut self) {
        self.0.push(LineItem::default());
    }

    /// Removing the last remaining item is refused.
    pub fn remove(&mut self, index: usize) -> bool {
        if !self.can_remove() || index >= self.0.len() {
            return false;
        }
        self.0.remove(index);
        true
    }

    pub fn set_expense_type(&mut self, index: usize, expense_type_id: String) {
        if let Some(item) = self.0.get_mut(index) {
            item.expense_type_id = expense_type_id;
        }
    }

    pub fn set_amount(&mut self, index: usize, amount: f64) {
        if let Some(item) = self.0.get_mut(index) {
            item.amount = amount;
        }
    }

    pub fn total(&self) -> f64 {
        self.0
            .iter()
            .filter(|item| item.is_valid())
            .map(|item| item.amount)
            .sum()
    }

    /// Valid items in order; incomplete rows are dropped.
    pub fn to_details(&self) -> Result<Vec<ExpenseDetailDto>, &'static str> {
        let details: Vec<_> = self
            .0
            .iter()
            .filter(|item| item.is_valid())
            .map(|item| ExpenseDetailDto {
                id: item.id.clone(),
                expense_type_id: item.expense_type_id.clone(),
                amount: item.amount,
            })
            .collect();
        if details.is_empty() {
            return Err(NO_VALID_ITEMS);
        }
        Ok(details)
    }
}

/// Permission for an in-flight `get_expense` to replace the line items of the
/// expense being edited. Revoked when the modal changes mode or the user edits.
#[derive(Clone, Debug)]
pub struct RefreshTicket {
    expense_id: Option<String>,
    live: Rc<Cell<bool>>,
}

impl RefreshTicket {
    /// A ticket that accepts nothing.
    pub fn idle() -> Self {
        Self {
            expense_id: None,
            live: Rc::new(Cell::new(false)),
        }
    }

    pub fn for_expense(id: &str) -> Self {
        Self {
            expense_id: Some(id.to_string()),
            live: Rc::new(Cell::new(true)),
        }
    }

    pub fn revoke(&self) {
        self.live.set(false);
    }

    pub fn is_live(&self) -> bool {
        self.live.get()
    }

    /// Line items to apply from the fetched expense, if it still belongs to
    /// the open modal and nothing has been edited since it was requested.
    pub fn accept(&self, fetched: &ExpenseHeader) -> Option<LineItems> {
        if !self.is_live() || self.expense_id.as_deref() != Some(fetched.id.as_str()) {
            return None;
        }
        self.revoke();
        Some(LineItems::from_details(&fetched.expense_details))
    }
}

#[derive(Properties, PartialEq)]
pub struct LineItemsEditorProps {
    pub items: LineItems,
    pub expense_types: Lookup,
    pub on_change: Callback<LineItems>,
}

#[function_component(LineItemsEditor)]
pub fn line_items_editor(props: &LineItemsEditorProps) -> Html {
    let on_add = {
        let items = props.items.clone();
        let on_change = props.on_change.clone();
        Callback::from(move |_| {
            let mut next = items.clone();
            next.add();
            on_change.emit(next);
        })
    };

    let options = props.expense_types.options();
    let can_remove = props.items.can_remove();

    html! {
        <div class="space-y-2">
            <div class="flex items-center justify-between">
                <span class="text-sm font-medium">{"Line items"}</span>
                <button type="button" onclick={on_add} class="flex items-center gap-1 text-sm px-2 py-1 rounded hover:opacity-80">
                    { icon_plus() }{"Add"}
                </button>
            </div>
            { for props.items.items().iter().enumerate().map(|(index, item)| {
                let on_type = {
                    let items = props.items.clone();
                    let on_change = props.on_change.clone();
                    Callback::from(move |e: Event| {
                        let input: web_sys::HtmlSelectElement = e.target_unchecked_into();
                        let mut next = items.clone();
                        next.set_expense_type(index, input.value());
                        on_change.emit(next);
                    })
                };
                let on_amount = {
                    let items = props.items.clone();
                    let on_change = props.on_change.clone();
                    Callback::from(move |e: InputEvent| {
                        let input: web_sys::HtmlInputElement = e.target_unchecked_into();
                        let mut next = items.clone();
                        next.set_amount(index, input.value().trim().parse().unwrap_or(0.0));
                        on_change.emit(next);
                    })
                };
                let on_remove = {
                    let items = props.items.clone();
                    let on_change = props.on_change.clone();
                    Callback::from(move |_| {
                        let mut next = items.clone();
                        if next.remove(index) {
                            on_change.emit(next);
                        }
                    })
                };
                html! {
                    <div key={index} class="flex items-center gap-2">
                        <select onchange={on_type} class="flex-1 px-3 py-2 bg-transparent border border-border rounded-lg">
                            <option value="" selected={item.expense_type_id.is_empty()} disabled={true}>{"Expense type"}</option>
                            { for options.iter().map(|option| html! {
                                <option value={option.value.clone()} selected={option.value == item.expense_type_id}>{ option.label.clone() }</option>
                            }) }
                        </select>
                        <input type="number" min="0" step="0.01" oninput={on_amount}
                            value={if item.amount == 0.0 { String::new() } else { item.amount.to_string() }}
                            class="w-32 px-3 py-2 bg-transparent border border-border rounded-lg text-right" />
                        if can_remove {
                            <button type="button" title="Remove" onclick={on_remove} class="p-1.5 rounded-full hover:opacity-80">
                                { icon_minus() }
                            </button>
                        }
                    </div>
                }
            }) }
            <div class="text-right text-sm font-semibold">{ format!("Total: {}", format_currency(props.items.total())) }</div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_expense_starts_with_one_blank_item() {
        let items = LineItems::default();
        assert_eq!(items.len(), 1);
        assert!(!items.can_remove());
    }

    #[test]
    fn last_item_cannot_be_removed() {
        let mut items = LineItems::default();
        assert!(!items.remove(0));
        items.add();
        assert_eq!(items.len(), 2);
        assert!(items.remove(1));
        assert!(!items.remove(0));
        assert_eq!(items.len(), 1);
    }

    #[test]
    fn only_complete_items_are_sent() {
        let mut items = LineItems::default();
        items.set_expense_type(0, "t1".into());
        items.set_amount(0, 25.0);
        items.add();
        items.set_amount(1, 40.0);

        let details = items.to_details().unwrap();
        assert_eq!(details.len(), 1);
        assert_eq!(
            serde_json::to_value(&details[0]).unwrap(),
            serde_json::json!({"expenseTypeId": "t1", "amount": 25.0})
        );
        assert_eq!(items.total(), 25.0);
    }

    #[test]
    fn nothing_valid_refuses_submission() {
        let mut items = LineItems::default();
        items.set_expense_type(0, "t1".into());
        assert_eq!(items.to_details(), Err(NO_VALID_ITEMS));
    }

    fn expense(id: &str, detail_id: &str) -> ExpenseHeader {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "userId": "u1",
            "date": "2025-06-02T00:00:00Z",
            "monetaryFundId": "f1",
            "commerceName": "Market",
            "documentType": "Factura",
            "expenseDetails": [
                {"id": detail_id, "expenseHeaderId": id, "expenseTypeId": "t1", "amount": 10.0}
            ]
        }))
        .unwrap()
    }

    #[test]
    fn refresh_applies_to_the_expense_still_open() {
        let ticket = RefreshTicket::for_expense("e1");
        let items = ticket.accept(&expense("e1", "d1")).unwrap();
        assert_eq!(items.items()[0].id.as_deref(), Some("d1"));
        // A second answer for the same request is ignored.
        assert_eq!(ticket.accept(&expense("e1", "d1")), None);
    }

    #[test]
    fn late_refresh_after_the_modal_moved_on_is_dropped() {
        // Edit A, cancel, then New: the effect cleanup revokes A's ticket.
        let ticket = RefreshTicket::for_expense("a");
        let in_flight = ticket.clone();
        ticket.revoke();
        assert!(!in_flight.is_live());
        assert_eq!(in_flight.accept(&expense("a", "dA")), None);

        assert_eq!(RefreshTicket::idle().accept(&expense("a", "dA")), None);
    }

    #[test]
    fn refresh_for_another_expense_is_dropped() {
        let ticket = RefreshTicket::for_expense("b");
        assert_eq!(ticket.accept(&expense("a", "dA")), None);
        assert!(ticket.is_live());
    }

    #[test]
    fn existing_details_keep_their_ids() {
        let details = vec![ExpenseDetail {
            id: "d1".into(),
            expense_header_id: "e1".into(),
            expense_type_id: "t1".into(),
            amount: 10.0,
        }];
        let items = LineItems::from_details(&details);
        assert_eq!(items.items()[0].id.as_deref(), Some("d1"));
        assert_eq!(LineItems::from_details(&[]), LineItems::default());
    }
}
