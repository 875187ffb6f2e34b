use std::fmt;
use std::ops::Range;
use std::rc::Rc;

use yew::prelude::*;

use super::icons::{icon_chevron_left, icon_chevron_right};
use crate::config::PAGE_SIZE_OPTIONS;

/// Which page of rows is visible. Only explicit user actions change it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pagination {
    page: usize,
    page_size: usize,
}

impl Pagination {
    pub fn new(page_size: usize) -> Self {
        Self {
            page: 0,
            page_size: page_size.max(1),
        }
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn go_to(self, page: usize) -> Self {
        Self { page, ..self }
    }

    /// A new page size always starts over at the first page.
    pub fn with_page_size(self, page_size: usize) -> Self {
        Self::new(page_size)
    }

    pub fn page_count(&self, total: usize) -> usize {
        total.div_ceil(self.page_size)
    }

    pub fn has_previous(&self) -> bool {
        self.page > 0
    }

    pub fn has_next(&self, total: usize) -> bool {
        self.page + 1 < self.page_count(total)
    }

    pub fn range(&self, total: usize) -> Range<usize> {
        let start = self.page.saturating_mul(self.page_size).min(total);
        let end = start.saturating_add(self.page_size).min(total);
        start..end
    }

    pub fn slice<'a, T>(&self, rows: &'a [T]) -> &'a [T] {
        &rows[self.range(rows.len())]
    }

    /// "6–10 of 12".
    pub fn label(&self, total: usize) -> String {
        let range = self.range(total);
        if range.is_empty() {
            return format!("0 of {}", total);
        }
        format!("{}–{} of {}", range.start + 1, range.end, total)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
}

impl Align {
    fn class(&self) -> &'static str {
        match self {
            Align::Left => "text-left",
            Align::Center => "text-center",
            Align::Right => "text-right",
        }
    }
}

/// Raw value of one cell before any column formatting.
#[derive(Clone, Debug, PartialEq)]
pub enum CellValue {
    Text(String),
    Number(f64),
    Empty,
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(text) => f.write_str(text),
            CellValue::Number(number) => write!(f, "{}", number),
            CellValue::Empty => Ok(()),
        }
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

impl From<Option<String>> for CellValue {
    fn from(value: Option<String>) -> Self {
        value.map(CellValue::Text).unwrap_or(CellValue::Empty)
    }
}

pub type CellFormatter<R> = fn(&CellValue, &R) -> String;

pub struct Column<R> {
    pub key: &'static str,
    pub label: &'static str,
    pub align: Align,
    value: fn(&R) -> CellValue,
    format: Option<CellFormatter<R>>,
}

impl<R> Column<R> {
    pub fn new(key: &'static str, label: &'static str, value: fn(&R) -> CellValue) -> Self {
        Self {
            key,
            label,
            align: Align::Left,
            value,
            format: None,
        }
    }

    pub fn align(mut self, align: Align) -> Self {
        self.align = align;
        self
    }

    /// Formatter receiving the raw cell value and the whole row.
    pub fn format(mut self, format: CellFormatter<R>) -> Self {
        self.format = Some(format);
        self
    }

    pub fn render(&self, row: &R) -> String {
        let value = (self.value)(row);
        match self.format {
            Some(format) => format(&value, row),
            None => value.to_string(),
        }
    }
}

impl<R> Clone for Column<R> {
    fn clone(&self) -> Self {
        Self {
            key: self.key,
            label: self.label,
            align: self.align,
            value: self.value,
            format: self.format,
        }
    }
}

impl<R> PartialEq for Column<R> {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key && self.label == other.label && self.align == other.align
    }
}

pub struct RowAction<R> {
    pub title: &'static str,
    pub icon: fn() -> Html,
    pub on_click: Callback<R>,
}

impl<R> RowAction<R> {
    pub fn new(title: &'static str, icon: fn() -> Html, on_click: Callback<R>) -> Self {
        Self {
            title,
            icon,
            on_click,
        }
    }
}

impl<R> Clone for RowAction<R> {
    fn clone(&self) -> Self {
        Self {
            title: self.title,
            icon: self.icon,
            on_click: self.on_click.clone(),
        }
    }
}

impl<R> PartialEq for RowAction<R> {
    fn eq(&self, other: &Self) -> bool {
        self.title == other.title && self.on_click == other.on_click
    }
}

#[derive(Properties, PartialEq)]
pub struct DataTableProps<R: PartialEq + 'static> {
    pub columns: Rc<Vec<Column<R>>>,
    pub rows: Rc<Vec<R>>,
    #[prop_or_default]
    pub actions: Vec<RowAction<R>>,
    #[prop_or(PAGE_SIZE_OPTIONS[0])]
    pub initial_page_size: usize,
    #[prop_or_else(|| PAGE_SIZE_OPTIONS.to_vec())]
    pub page_size_options: Vec<usize>,
    #[prop_or_else(|| "No records found.".to_string())]
    pub empty_message: String,
}

#[function_component(DataTable)]
pub fn data_table<R>(props: &DataTableProps<R>) -> Html
where
    R: Clone + PartialEq + 'static,
{
    let pagination = use_state(|| Pagination::new(props.initial_page_size));

    if props.rows.is_empty() {
        return html! {
            <div class="rounded-[10px] border border-border p-8 flex items-center justify-center min-h-[200px]" style="background-color: var(--color-paper);">
                <p class="text-sm" style="color: var(--color-text-muted);">{ props.empty_message.clone() }</p>
            </div>
        };
    }

    let total = props.rows.len();
    let offset = pagination.range(total).start;
    let visible = pagination.slice(&props.rows);
    let has_actions = !props.actions.is_empty();

    let on_page_size = {
        let pagination = pagination.clone();
        Callback::from(move |e: Event| {
            let input: web_sys::HtmlSelectElement = e.target_unchecked_into();
            if let Ok(size) = input.value().parse::<usize>() {
                pagination.set(pagination.with_page_size(size));
            }
        })
    };

    let on_previous = {
        let pagination = pagination.clone();
        Callback::from(move |_| {
            if pagination.has_previous() {
                pagination.set(pagination.go_to(pagination.page() - 1));
            }
        })
    };

    let on_next = {
        let pagination = pagination.clone();
        Callback::from(move |_| {
            if pagination.has_next(total) {
                pagination.set(pagination.go_to(pagination.page() + 1));
            }
        })
    };

    html! {
        <div class="rounded-[10px] border border-border overflow-hidden" style="background-color: var(--color-paper);">
            <div class="overflow-auto max-h-[440px]">
                <table class="w-full text-sm">
                    <thead class="sticky top-0" style="background-color: var(--color-primary); color: #FFFFFF;">
                        <tr>
                            { for props.columns.iter().map(|column| html! {
                                <th key={column.key} class={classes!("px-4", "py-3", "font-semibold", column.align.class())}>{ column.label }</th>
                            }) }
                            if has_actions {
                                <th class="px-4 py-3 font-semibold text-center min-w-[100px]">{"Actions"}</th>
                            }
                        </tr>
                    </thead>
                    <tbody>
                        { for visible.iter().enumerate().map(|(index, row)| html! {
                            <tr key={offset + index} class="border-t border-border hover:opacity-90">
                                { for props.columns.iter().map(|column| html! {
                                    <td key={column.key} class={classes!("px-4", "py-2", column.align.class())}>{ column.render(row) }</td>
                                }) }
                                if has_actions {
                                    <td class="px-4 py-2 text-center whitespace-nowrap">
                                        { for props.actions.iter().map(|action| {
                                            let on_click = action.on_click.clone();
                                            let row = row.clone();
                                            html! {
                                                <button type="button" title={action.title} class="p-1.5 rounded-full hover:bg-white/10 transition-colors"
                                                    onclick={Callback::from(move |_| on_click.emit(row.clone()))}>
                                                    { (action.icon)() }
                                                </button>
                                            }
                                        }) }
                                    </td>
                                }
                            </tr>
                        }) }
                    </tbody>
                </table>
            </div>
            <div class="flex items-center justify-end gap-4 px-4 py-2 border-t border-border text-xs" style="color: var(--color-text-muted);">
                <label class="flex items-center gap-2">
                    <span>{"Rows per page"}</span>
                    <select onchange={on_page_size} class="px-2 py-1 rounded border border-border bg-transparent">
                        { for props.page_size_options.iter().map(|size| html! {
                            <option value={size.to_string()} selected={*size == pagination.page_size()}>{ size.to_string() }</option>
                        }) }
                    </select>
                </label>
                <span>{ pagination.label(total) }</span>
                <button type="button" aria-label="Previous page" disabled={!pagination.has_previous()} onclick={on_previous} class="p-1 rounded disabled:opacity-40">
                    { icon_chevron_left() }
                </button>
                <button type="button" aria-label="Next page" disabled={!pagination.has_next(total)} onclick={on_next} class="p-1 rounded disabled:opacity-40">
                    { icon_chevron_right() }
                </button>
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, PartialEq)]
    struct Row {
        name: String,
        amount: f64,
    }

    #[test]
    fn every_page_shows_the_expected_count() {
        let rows: Vec<usize> = (0..23).collect();
        for size in [1, 5, 10, 25] {
            let pagination = Pagination::new(size);
            for page in 0..pagination.page_count(rows.len()) + 1 {
                let shown = pagination.go_to(page).slice(&rows).len();
                let expected = size.min(rows.len().saturating_sub(page * size));
                assert_eq!(shown, expected, "size {} page {}", size, page);
            }
        }
    }

    #[test]
    fn pages_concatenate_back_to_the_input() {
        let rows = vec!["c", "a", "b", "e", "d", "f", "g"];
        let pagination = Pagination::new(3);
        let joined: Vec<&str> = (0..pagination.page_count(rows.len()))
            .flat_map(|page| pagination.go_to(page).slice(&rows).to_vec())
            .collect();
        assert_eq!(joined, rows);
    }

    #[test]
    fn page_size_change_resets_to_first_page() {
        let pagination = Pagination::new(5).go_to(3);
        assert_eq!(pagination.page(), 3);
        let resized = pagination.with_page_size(10);
        assert_eq!(resized.page(), 0);
        assert_eq!(resized.page_size(), 10);
        assert_eq!(Pagination::new(25).with_page_size(25).page(), 0);
    }

    #[test]
    fn navigation_limits_and_label() {
        let pagination = Pagination::new(5);
        assert!(!pagination.has_previous());
        assert!(pagination.has_next(12));
        let last = pagination.go_to(2);
        assert!(!last.has_next(12));
        assert_eq!(last.label(12), "11–12 of 12");
        assert_eq!(pagination.go_to(1).label(12), "6–10 of 12");
        assert_eq!(Pagination::new(0).page_size(), 1);
        assert_eq!(pagination.page_count(0), 0);
    }

    #[test]
    fn formatter_sees_value_and_row() {
        let column = Column::new("amount", "Amount", |r: &Row| CellValue::from(r.amount))
            .align(Align::Right)
            .format(|value, row| format!("{} ({})", value, row.name));
        let row = Row {
            name: "rent".into(),
            amount: 12.5,
        };
        assert_eq!(column.render(&row), "12.5 (rent)");

        let plain = Column::new("name", "Name", |r: &Row| CellValue::from(r.name.clone()));
        assert_eq!(plain.render(&row), "rent");
    }

    #[test]
    fn missing_optional_text_renders_empty() {
        assert_eq!(CellValue::from(None::<String>).to_string(), "");
    }
}
