use std::fmt;

/// The six operations of the capability contract.
///
/// The lowercase name is what appears in method names (`widget.create`) and
/// bus topics (`svc.widget.create`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Create,
    Read,
    Update,
    Delete,
    Search,
    Patch,
}

impl Action {
    /// All actions, in registration order.
    pub const ALL: [Action; 6] = [
        Action::Create,
        Action::Read,
        Action::Update,
        Action::Delete,
        Action::Search,
        Action::Patch,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Create => "create",
            Action::Read => "read",
            Action::Update => "update",
            Action::Delete => "delete",
            Action::Search => "search",
            Action::Patch => "patch",
        }
    }

    /// Parse a lowercase action name.
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.as_str() == name)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Method name for an action: `{entity}.{action}`.
pub fn method(entity: &str, action: Action) -> String {
    format!("{}.{}", entity, action)
}

/// Topic for an action: `{prefix}.{entity}.{action}`.
pub fn topic(prefix: &str, entity: &str, action: Action) -> String {
    format!("{}.{}.{}", prefix, entity, action)
}
