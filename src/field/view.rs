pub const INCOMPATIBLE_TITLE: &str = "Field value is incompatible";
pub const INCOMPATIBLE_MESSAGE: &str =
    "The JSON value stored in this field cannot be managed with this app.";
pub const OVERRIDE_ACTION: &str = "I want to override the value using the app";

/// What the rendering layer should show for a field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldView {
    /// A warning with a single override action.
    Incompatible,
    Editor {
        rows: Vec<ItemRow>,
        reorder_enabled: bool,
        picker_enabled: bool,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ItemRow {
    pub index: usize,
    pub id: Option<String>,
    pub label: String,
}

impl FieldView {
    pub fn has_items(&self) -> bool {
        matches!(self, FieldView::Editor { rows, .. } if !rows.is_empty())
    }

    /// Plain-text rendering, one line per row.
    pub fn to_lines(&self) -> Vec<String> {
        match self {
            FieldView::Incompatible => vec![
                format!("! {INCOMPATIBLE_TITLE}"),
                INCOMPATIBLE_MESSAGE.to_string(),
                format!("[{OVERRIDE_ACTION}]"),
            ],
            FieldView::Editor {
                rows,
                reorder_enabled,
                picker_enabled,
            } => {
                let mut lines: Vec<String> = rows
                    .iter()
                    .map(|row| {
                        let handle = if *reorder_enabled { "≡" } else { " " };
                        format!("{handle} #{} {}", row.index + 1, row.label)
                    })
                    .collect();
                let picker = if *picker_enabled { "[+ add]" } else { "[+ add] (disabled)" };
                lines.push(picker.to_string());
                lines
            }
        }
    }
}
