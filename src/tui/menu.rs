//! Menu model: informational rows and actionable items.

/// Something the user can trigger from the menu.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuAction {
    Refresh,
    SetHoldings,
    Quit,
}

impl MenuAction {
    /// All actions in display order.
    pub const ALL: [MenuAction; 3] = [Self::Refresh, Self::SetHoldings, Self::Quit];

    pub fn label(&self) -> &'static str {
        match self {
            MenuAction::Refresh => "Refresh",
            MenuAction::SetHoldings => "Set Holdings…",
            MenuAction::Quit => "Quit",
        }
    }

    /// Single-key shortcut that triggers the action directly.
    pub fn shortcut(&self) -> char {
        match self {
            MenuAction::Refresh => 'r',
            MenuAction::SetHoldings => 'h',
            MenuAction::Quit => 'q',
        }
    }
}

/// One row of the menu. Rows without an action are shown disabled.
#[derive(Clone, Debug, PartialEq)]
pub struct MenuItem {
    pub label: String,
    pub action: Option<MenuAction>,
}

impl MenuItem {
    /// A disabled informational row.
    pub fn info(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            action: None,
        }
    }

    /// An empty disabled row.
    pub fn separator() -> Self {
        Self::info("")
    }

    pub fn action(action: MenuAction) -> Self {
        Self {
            label: action.label().to_string(),
            action: Some(action),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.action.is_some()
    }
}
